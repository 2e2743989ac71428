// crates/sedml-rs/src/document.rs

//! The `<sedML>` root: top-level lists, namespaces and the error log.

use crate::attributes::{AttrKind, AttributeSpec, ElementInfo, ReadContext, Slot};
use crate::base::{BaseFields, DocumentId, NodeKey, SedBase, node_fields, read_declared_attributes};
use crate::diagnostics::{ErrorCode, ErrorLog};
use crate::elements::{
    AbstractTask, DataGenerator, Model, OneStep, Output, Plot2D, Plot3D, RepeatedTask, Report,
    Simulation, SteadyState, Task, UniformTimeCourse,
};
use crate::error::{OperationStatus, SedmlError};
use crate::identity::{IdentitySpace, is_valid_sid, is_valid_xml_id};
use crate::list_of::ListOf;
use crate::types::SedNamespaces;
use crate::visitor::SedVisitor;
use crate::xml::{AttributeSource, XmlSink};
use log::debug;

static DOCUMENT_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("level", AttrKind::UInt)
        .invalid(ErrorCode::SedmlDocumentLevelMustBeNonNegativeInteger),
    AttributeSpec::new("version", AttrKind::UInt)
        .invalid(ErrorCode::SedmlDocumentVersionMustBeNonNegativeInteger),
];

static DOCUMENT_INFO: ElementInfo = ElementInfo {
    type_code: crate::types::TypeCode::Document,
    id_required: false,
    attributes: DOCUMENT_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlDocumentAllowedAttributes,
    allowed_elements: ErrorCode::SedmlDocumentAllowedElements,
};

/// Generates the add/get/remove/count accessors of one top-level list.
macro_rules! document_list {
    (
        $field:ident: $item:ty,
        $list:ident, $list_mut:ident, $add:ident, $get:ident, $get_mut:ident,
        $get_by_id:ident, $remove:ident, $remove_by_id:ident, $num:ident
    ) => {
        pub fn $list(&self) -> &ListOf<$item> {
            &self.$field
        }

        pub fn $list_mut(&mut self) -> &mut ListOf<$item> {
            &mut self.$field
        }

        /// Appends a copy; see [`ListOf::append`] for the checks made.
        pub fn $add(&mut self, item: &$item) -> OperationStatus {
            self.$field.append(item)
        }

        pub fn $get(&self, index: usize) -> Option<&$item> {
            self.$field.get(index)
        }

        pub fn $get_mut(&mut self, index: usize) -> Option<&mut $item> {
            self.$field.get_mut(index)
        }

        pub fn $get_by_id(&self, id: &str) -> Option<&$item> {
            self.$field.get_by_id(id)
        }

        pub fn $remove(&mut self, index: usize) -> Option<$item> {
            self.$field.remove(index)
        }

        pub fn $remove_by_id(&mut self, id: &str) -> Option<$item> {
            self.$field.remove_by_id(id)
        }

        pub fn $num(&self) -> usize {
            self.$field.len()
        }
    };
}

/// A SED-ML document.
#[derive(Debug)]
pub struct SedDocument {
    base: BaseFields,
    document_id: DocumentId,
    level: Option<u32>,
    version: Option<u32>,
    models: ListOf<Model>,
    simulations: ListOf<Simulation>,
    tasks: ListOf<AbstractTask>,
    data_generators: ListOf<DataGenerator>,
    outputs: ListOf<Output>,
    error_log: ErrorLog,
}

impl SedDocument {
    /// An empty document for a supported level/version pair.
    pub fn new(level: u32, version: u32) -> Result<Self, SedmlError> {
        let namespaces = SedNamespaces::new(level, version)?;
        Ok(Self::with_namespaces(namespaces))
    }

    pub fn with_namespaces(namespaces: SedNamespaces) -> Self {
        let mut doc = Self {
            base: BaseFields::new(&namespaces),
            document_id: DocumentId::fresh(),
            level: Some(namespaces.level()),
            version: Some(namespaces.version()),
            models: ListOf::new("listOfModels", &namespaces),
            simulations: ListOf::new("listOfSimulations", &namespaces),
            tasks: ListOf::new("listOfTasks", &namespaces),
            data_generators: ListOf::new("listOfDataGenerators", &namespaces),
            outputs: ListOf::new("listOfOutputs", &namespaces),
            error_log: ErrorLog::new(),
        };
        doc.reconnect();
        doc
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub(crate) fn reconnect(&mut self) {
        self.base.set_document_id(Some(self.document_id));
        self.connect_to_child();
    }

    // --- Error Log ---

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    pub fn error_log_mut(&mut self) -> &mut ErrorLog {
        &mut self.error_log
    }

    pub fn num_errors(&self) -> usize {
        self.error_log.num_errors()
    }

    // --- Namespaces ---

    /// Declares `xmlns:prefix="uri"` on the document and makes it known to every node.
    pub fn add_namespace(&mut self, prefix: &str, uri: &str) -> OperationStatus {
        if prefix.is_empty() || uri.is_empty() {
            return OperationStatus::InvalidAttributeValue;
        }
        declare_everywhere(self, Some(prefix), uri);
        OperationStatus::Success
    }

    /// Makes the document's own extra declarations known to every descendant.
    pub(crate) fn propagate_namespaces(&mut self) {
        let declared = self.base.namespaces.extra_namespaces().to_vec();
        for child in self.children_mut() {
            for decl in &declared {
                declare_everywhere(&mut *child, decl.prefix.as_deref(), &decl.uri);
            }
        }
    }

    // --- Top-Level Lists ---

    document_list!(models: Model,
        models, models_mut, add_model, get_model, get_model_mut,
        get_model_by_id, remove_model, remove_model_by_id, num_models);

    document_list!(simulations: Simulation,
        simulations, simulations_mut, add_simulation, get_simulation, get_simulation_mut,
        get_simulation_by_id, remove_simulation, remove_simulation_by_id, num_simulations);

    document_list!(tasks: AbstractTask,
        tasks, tasks_mut, add_task, get_task, get_task_mut,
        get_task_by_id, remove_task, remove_task_by_id, num_tasks);

    document_list!(data_generators: DataGenerator,
        data_generators, data_generators_mut, add_data_generator, get_data_generator,
        get_data_generator_mut, get_data_generator_by_id, remove_data_generator,
        remove_data_generator_by_id, num_data_generators);

    document_list!(outputs: Output,
        outputs, outputs_mut, add_output, get_output, get_output_mut,
        get_output_by_id, remove_output, remove_output_by_id, num_outputs);

    // --- Factories ---

    pub fn create_model(&mut self) -> &mut Model {
        let model = Model::new(&self.base.namespaces);
        self.models.append_new(model)
    }

    pub fn create_uniform_time_course(&mut self) -> &mut UniformTimeCourse {
        let sim = UniformTimeCourse::new(&self.base.namespaces);
        match self.simulations.append_new(Simulation::UniformTimeCourse(sim)) {
            Simulation::UniformTimeCourse(inner) => inner,
            _ => unreachable!("a uniformTimeCourse was just appended"),
        }
    }

    pub fn create_one_step(&mut self) -> &mut OneStep {
        let sim = OneStep::new(&self.base.namespaces);
        match self.simulations.append_new(Simulation::OneStep(sim)) {
            Simulation::OneStep(inner) => inner,
            _ => unreachable!("a oneStep was just appended"),
        }
    }

    pub fn create_steady_state(&mut self) -> &mut SteadyState {
        let sim = SteadyState::new(&self.base.namespaces);
        match self.simulations.append_new(Simulation::SteadyState(sim)) {
            Simulation::SteadyState(inner) => inner,
            _ => unreachable!("a steadyState was just appended"),
        }
    }

    pub fn create_task(&mut self) -> &mut Task {
        let task = Task::new(&self.base.namespaces);
        match self.tasks.append_new(AbstractTask::Task(task)) {
            AbstractTask::Task(inner) => inner,
            AbstractTask::Repeated(_) => unreachable!("a task was just appended"),
        }
    }

    pub fn create_repeated_task(&mut self) -> &mut RepeatedTask {
        let task = RepeatedTask::new(&self.base.namespaces);
        match self.tasks.append_new(AbstractTask::Repeated(task)) {
            AbstractTask::Repeated(inner) => inner,
            AbstractTask::Task(_) => unreachable!("a repeatedTask was just appended"),
        }
    }

    pub fn create_data_generator(&mut self) -> &mut DataGenerator {
        let generator = DataGenerator::new(&self.base.namespaces);
        self.data_generators.append_new(generator)
    }

    pub fn create_report(&mut self) -> &mut Report {
        let report = Report::new(&self.base.namespaces);
        match self.outputs.append_new(Output::Report(report)) {
            Output::Report(inner) => inner,
            _ => unreachable!("a report was just appended"),
        }
    }

    pub fn create_plot2d(&mut self) -> &mut Plot2D {
        let plot = Plot2D::new(&self.base.namespaces);
        match self.outputs.append_new(Output::Plot2D(plot)) {
            Output::Plot2D(inner) => inner,
            _ => unreachable!("a plot2D was just appended"),
        }
    }

    pub fn create_plot3d(&mut self) -> &mut Plot3D {
        let plot = Plot3D::new(&self.base.namespaces);
        match self.outputs.append_new(Output::Plot3D(plot)) {
            Output::Plot3D(inner) => inner,
            _ => unreachable!("a plot3D was just appended"),
        }
    }

    // --- Identity ---

    /// Resolves a back-reference handle.
    pub fn find_node(&self, key: NodeKey) -> Option<&dyn SedBase> {
        self.find_by_key(key)
    }

    /// The node owning `node`, if both belong to this document.
    pub fn parent_of(&self, node: &dyn SedBase) -> Option<&dyn SedBase> {
        if node.base().document() != Some(self.document_id) {
            return None;
        }
        self.find_by_key(node.base().parent()?)
    }

    /// Renames every SIdRef that names `old_id`. Declared ids are left alone.
    ///
    /// Returns the number of references changed.
    pub fn rename_everywhere(&mut self, old_id: &str, new_id: &str) -> usize {
        let renamed = self.rename_sid_refs(old_id, new_id);
        debug!("Renamed {} reference(s) from '{}' to '{}'", renamed, old_id, new_id);
        renamed
    }

    /// Validates the whole tree and logs every problem found.
    ///
    /// Returns the number of diagnostics added to the error log.
    pub fn check_consistency(&mut self) -> usize {
        let mut findings = Vec::new();
        for child in self.children() {
            collect_node_problems(child, &mut findings);
        }

        let space = IdentitySpace::build(self);
        for duplicate in space.duplicates() {
            findings.push(Finding {
                code: ErrorCode::SedmlDuplicateComponentId,
                details: format!(
                    "The id '{}' on the <{}> element is already used in this scope.",
                    duplicate.id, duplicate.element
                ),
                line: duplicate.line,
                column: duplicate.column,
            });
        }
        for reference in space.unresolved_references(self) {
            let code = reference
                .code
                .unwrap_or(ErrorCode::SedAllowedAttributes);
            let details = match reference.found {
                Some(found) => format!(
                    "The {} '{}' on the <{}> element names a {} rather than a {}.",
                    reference.attribute, reference.value, reference.element, found, reference.expected
                ),
                None => format!(
                    "The {} '{}' on the <{}> element does not name any {}.",
                    reference.attribute, reference.value, reference.element, reference.expected
                ),
            };
            findings.push(Finding {
                code,
                details,
                line: reference.line,
                column: reference.column,
            });
        }

        let (level, version) = (self.level(), self.version());
        for finding in &findings {
            self.error_log.log_error(
                finding.code,
                level,
                version,
                &finding.details,
                finding.line,
                finding.column,
            );
        }
        debug!("Consistency check found {} problem(s)", findings.len());
        findings.len()
    }
}

struct Finding {
    code: ErrorCode,
    details: String,
    line: u32,
    column: u32,
}

fn collect_node_problems(node: &dyn SedBase, findings: &mut Vec<Finding>) {
    let info = node.info();
    let element = node.element_name();
    let (line, column) = (node.line(), node.column());

    if let Some(id) = node.id() {
        if !is_valid_sid(id) {
            findings.push(Finding {
                code: ErrorCode::SedmlIdSyntaxRule,
                details: format!("The id '{}' on the <{}> element is not a valid SId.", id, element),
                line,
                column,
            });
        }
    }
    if let Some(metaid) = node.metaid() {
        if !is_valid_xml_id(metaid) {
            findings.push(Finding {
                code: ErrorCode::SedInvalidMetaidSyntax,
                details: format!(
                    "The metaid '{}' on the <{}> element is not a valid XML ID.",
                    metaid, element
                ),
                line,
                column,
            });
        }
    }
    for name in node.missing_required_attributes() {
        findings.push(Finding {
            code: info.allowed_attributes,
            details: format!("Sedml attribute '{}' is missing from the <{}> element.", name, element),
            line,
            column,
        });
    }
    for name in node.missing_required_elements() {
        findings.push(Finding {
            code: info.allowed_elements,
            details: format!("The <{}> element requires a <{}> child.", element, name),
            line,
            column,
        });
    }
    for child in node.children() {
        collect_node_problems(child, findings);
    }
}

fn declare_everywhere(node: &mut dyn SedBase, prefix: Option<&str>, uri: &str) {
    node.base_mut().namespaces.add_namespace(prefix, uri);
    for child in node.children_mut() {
        declare_everywhere(child, prefix, uri);
    }
}

impl Default for SedDocument {
    fn default() -> Self {
        Self::with_namespaces(SedNamespaces::default())
    }
}

/// A deep copy under a new [`DocumentId`]; every back-reference points into the copy.
impl Clone for SedDocument {
    fn clone(&self) -> Self {
        let mut copy = Self {
            base: self.base.clone(),
            document_id: DocumentId::fresh(),
            level: self.level,
            version: self.version,
            models: self.models.clone(),
            simulations: self.simulations.clone(),
            tasks: self.tasks.clone(),
            data_generators: self.data_generators.clone(),
            outputs: self.outputs.clone(),
            error_log: self.error_log.clone(),
        };
        copy.reconnect();
        copy
    }
}

/// Content equality: the trees must match. Error logs and identities are ignored.
impl PartialEq for SedDocument {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
            && self.models == other.models
            && self.simulations == other.simulations
            && self.tasks == other.tasks
            && self.data_generators == other.data_generators
            && self.outputs == other.outputs
    }
}

impl SedBase for SedDocument {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &DOCUMENT_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "level" => Some(Slot::UInt(&self.level)),
            "version" => Some(Slot::UInt(&self.version)),
            _ => None,
        }
    }

    fn children(&self) -> Vec<&dyn SedBase> {
        vec![
            &self.models,
            &self.simulations,
            &self.tasks,
            &self.data_generators,
            &self.outputs,
        ]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
        vec![
            &mut self.models,
            &mut self.simulations,
            &mut self.tasks,
            &mut self.data_generators,
            &mut self.outputs,
        ]
    }

    /// Level and version are fixed by the namespaces the document was built
    /// with, so they are only checked here.
    fn read_attributes(&mut self, source: &dyn AttributeSource, ctx: &mut ReadContext<'_>) {
        read_declared_attributes(self, source, ctx);
        let (line, column) = (self.base.line(), self.base.column());
        for spec in DOCUMENT_ATTRIBUTES {
            let problem = match source.get(spec.name) {
                None => format!("Sedml attribute '{}' is missing from the <sedML> element.", spec.name),
                Some(text) if text.trim().parse::<u32>().is_err() => format!(
                    "The {} attribute on the <sedML> element must be a non-negative integer, but is '{}'.",
                    spec.name, text
                ),
                Some(_) => continue,
            };
            if let Some(code) = spec.invalid_code {
                ctx.log_error(code, &problem, line, column);
            }
        }
    }

    fn create_object(&mut self, name: &str, ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
        let list: &mut dyn SedBase = match name {
            "listOfModels" => &mut self.models,
            "listOfSimulations" => &mut self.simulations,
            "listOfTasks" => &mut self.tasks,
            "listOfDataGenerators" => &mut self.data_generators,
            "listOfOutputs" => &mut self.outputs,
            _ => return None,
        };
        // A list that has been read before carries a source position.
        if list.line() != 0 {
            let details = format!("The <sedML> element may contain only one <{}>.", name);
            ctx.log_error(ErrorCode::SedmlDocumentAllowedElements, &details, list.line(), list.column());
        }
        Some(list)
    }

    fn write_namespaces(&self, sink: &mut dyn XmlSink) -> Result<(), SedmlError> {
        sink.write_namespace(None, self.base.namespaces.uri())?;
        // The default namespace is always the SED-ML one.
        for decl in self.base.namespaces.extra_namespaces().iter().filter(|d| d.prefix.is_some()) {
            sink.write_namespace(decl.prefix.as_deref(), &decl.uri)?;
        }
        Ok(())
    }

    fn set_document(&mut self, _document: Option<DocumentId>) {
        self.reconnect();
    }

    fn accept(&self, visitor: &mut dyn SedVisitor) -> bool {
        visitor.visit_document(self);
        for child in self.children() {
            if !child.accept(visitor) {
                break;
            }
        }
        visitor.leave_document(self);
        !visitor.is_done()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeCode;
    use crate::visitor::TypeFilter;

    fn l1v3() -> SedDocument {
        SedDocument::new(1, 3).unwrap()
    }

    fn add_model(doc: &mut SedDocument, id: &str) {
        let model = doc.create_model();
        let _ = model.set_id(id);
        let _ = model.set_source("model.xml");
    }

    #[test]
    fn test_new_rejects_unsupported_revision() {
        assert!(matches!(
            SedDocument::new(2, 1),
            Err(SedmlError::InvalidLevelVersion { level: 2, version: 1 })
        ));
        let doc = SedDocument::default();
        assert_eq!((doc.level(), doc.version()), (1, 4));
        assert_eq!(doc.get_attribute("level").as_deref(), Some("1"));
    }

    #[test]
    fn test_factories_attach_to_document() {
        let mut doc = l1v3();
        add_model(&mut doc, "m1");
        let model = doc.get_model(0).unwrap();
        assert_eq!(model.base().document(), Some(doc.document_id()));
        assert_eq!(model.level(), 1);
        assert_eq!(model.version(), 3);

        let parent = doc.parent_of(model).unwrap();
        assert_eq!(parent.type_code(), TypeCode::ListOf);
        assert_eq!(parent.element_name(), "listOfModels");
        let grandparent = doc.parent_of(parent).unwrap();
        assert_eq!(grandparent.type_code(), TypeCode::Document);
    }

    #[test]
    fn test_rename_everywhere_keeps_declared_id() {
        let mut doc = l1v3();
        add_model(&mut doc, "m1");
        let task = doc.create_task();
        let _ = task.set_id("t1");
        let _ = task.set_model_reference("m1");

        assert_eq!(doc.rename_everywhere("m1", "m2"), 1);

        let Some(AbstractTask::Task(task)) = doc.get_task_by_id("t1") else {
            panic!("task t1 is missing");
        };
        assert_eq!(task.model_reference(), Some("m2"));
        assert_eq!(doc.get_model(0).unwrap().id(), Some("m1"));
        assert!(doc.get_element_by_sid("m2").is_none());
    }

    #[test]
    fn test_add_duplicate_is_rejected() {
        let mut doc = l1v3();
        add_model(&mut doc, "m1");
        let copy = doc.get_model(0).unwrap().clone();
        assert_eq!(doc.add_model(&copy), OperationStatus::DuplicateObjectId);
        assert_eq!(doc.num_models(), 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut doc = l1v3();
        add_model(&mut doc, "m1");
        let mut copy = doc.clone();
        assert_eq!(copy, doc);
        assert_ne!(copy.document_id(), doc.document_id());
        assert_eq!(
            copy.get_model(0).unwrap().base().document(),
            Some(copy.document_id())
        );

        let _ = copy.get_model_mut(0).unwrap().set_source("other.xml");
        assert_eq!(doc.get_model(0).unwrap().source(), Some("model.xml"));
        assert_ne!(copy, doc);
    }

    #[test]
    fn test_check_consistency_reports_problems() {
        let mut doc = l1v3();
        add_model(&mut doc, "m1");
        add_model(&mut doc, "dup");
        let generator = doc.create_data_generator();
        let _ = generator.set_id("dup");
        let _ = generator.set_math("<math><ci>v</ci></math>");
        let variable = generator.create_variable();
        let _ = variable.set_id("v");
        let _ = variable.set_task_reference("nowhere");
        let task = doc.create_task();
        let _ = task.set_id("t1");
        let _ = task.set_simulation_reference("m1");

        let found = doc.check_consistency();
        let log = doc.error_log();
        assert_eq!(found, log.num_errors());
        assert!(log.contains(ErrorCode::SedmlDuplicateComponentId));
        assert!(log.contains(ErrorCode::SedmlVariableTaskReferenceMustBeAbstractTask));
        assert!(log.contains(ErrorCode::SedmlTaskSimulationReferenceMustBeSimulation));
        assert_eq!(found, 3);
    }

    #[test]
    fn test_add_namespace_reaches_existing_nodes() {
        let mut doc = l1v3();
        add_model(&mut doc, "m1");
        let sbml = "http://www.sbml.org/sbml/level3/version1/core";
        assert_eq!(doc.add_namespace("sbml", sbml), OperationStatus::Success);
        assert!(doc.get_model(0).unwrap().namespaces().has_namespace_uri(sbml));

        let mut model = Model::new(doc.namespaces());
        let _ = model.set_id("m2");
        let _ = model.set_source("b.xml");
        assert_eq!(doc.add_model(&model), OperationStatus::Success);
    }

    #[test]
    fn test_get_all_elements_by_type() {
        let mut doc = l1v3();
        let generator = doc.create_data_generator();
        let _ = generator.set_id("dg");
        let _ = generator.create_variable().set_id("a");
        let _ = generator.create_variable().set_id("b");
        let variables = doc.get_all_elements(Some(&TypeFilter(TypeCode::Variable)));
        let ids: Vec<_> = variables.iter().filter_map(|v| v.id()).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
