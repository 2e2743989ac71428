// crates/sedml-rs/src/elements/task.rs

use super::range::{FunctionalRange, Range, UniformRange, VectorRange};
use super::{read_math, sibling_kinds, write_math};
use crate::attributes::{AttrKind, AttributeSpec, ElementInfo, ReadContext, Slot, SlotMut};
use crate::base::{BaseFields, SedBase, node_fields};
use crate::diagnostics::ErrorCode;
use crate::error::{OperationStatus, SedmlError};
use crate::list_of::{ListOf, list_item};
use crate::types::{SedNamespaces, TypeCode};
use crate::xml::{XmlInput, XmlSink};

// --- Task ---

static TASK_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("modelReference", AttrKind::SIdRef(TypeCode::Model))
        .invalid(ErrorCode::SedmlTaskModelReferenceMustBeModel),
    AttributeSpec::new("simulationReference", AttrKind::SIdRef(TypeCode::Simulation))
        .invalid(ErrorCode::SedmlTaskSimulationReferenceMustBeSimulation),
];

pub(crate) static TASK_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::Task,
    id_required: true,
    attributes: TASK_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlTaskAllowedAttributes,
    allowed_elements: ErrorCode::SedmlAbstractTaskAllowedAttributes,
};

/// Runs one simulation on one model.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    base: BaseFields,
    model_reference: Option<String>,
    simulation_reference: Option<String>,
}

impl Task {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            model_reference: None,
            simulation_reference: None,
        }
    }

    pub fn model_reference(&self) -> Option<&str> {
        self.model_reference.as_deref()
    }

    pub fn set_model_reference(&mut self, model: &str) -> OperationStatus {
        self.set_attribute("modelReference", model)
    }

    pub fn simulation_reference(&self) -> Option<&str> {
        self.simulation_reference.as_deref()
    }

    pub fn set_simulation_reference(&mut self, simulation: &str) -> OperationStatus {
        self.set_attribute("simulationReference", simulation)
    }
}

impl SedBase for Task {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &TASK_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "modelReference" => Some(Slot::Str(&self.model_reference)),
            "simulationReference" => Some(Slot::Str(&self.simulation_reference)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "modelReference" => Some(SlotMut::Str(&mut self.model_reference)),
            "simulationReference" => Some(SlotMut::Str(&mut self.simulation_reference)),
            _ => None,
        }
    }
}

// --- Repeated Task ---

static REPEATED_TASK_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("range", AttrKind::SIdRef(TypeCode::Range))
        .invalid(ErrorCode::SedmlRepeatedTaskRangeMustBeRange),
    AttributeSpec::new("resetModel", AttrKind::Bool)
        .invalid(ErrorCode::SedmlRepeatedTaskResetModelMustBeBoolean),
    AttributeSpec::new("concatenate", AttrKind::Bool)
        .invalid(ErrorCode::SedmlRepeatedTaskConcatenateMustBeBoolean)
        .aliases(&["concatentate"]),
];

pub(crate) static REPEATED_TASK_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::RepeatedTask,
    id_required: true,
    attributes: REPEATED_TASK_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlRepeatedTaskAllowedAttributes,
    allowed_elements: ErrorCode::SedmlRepeatedTaskAllowedElements,
};

/// Repeats its sub-tasks once per value of the master `range`.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatedTask {
    base: BaseFields,
    range: Option<String>,
    reset_model: Option<bool>,
    concatenate: Option<bool>,
    ranges: ListOf<Range>,
    changes: ListOf<SetValue>,
    sub_tasks: ListOf<SubTask>,
}

impl RepeatedTask {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            range: None,
            reset_model: None,
            concatenate: None,
            ranges: ListOf::new("listOfRanges", namespaces),
            changes: ListOf::new("listOfChanges", namespaces),
            sub_tasks: ListOf::new("listOfSubTasks", namespaces),
        }
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    pub fn set_range(&mut self, range: &str) -> OperationStatus {
        self.set_attribute("range", range)
    }

    pub fn reset_model(&self) -> Option<bool> {
        self.reset_model
    }

    pub fn set_reset_model(&mut self, reset: bool) -> OperationStatus {
        self.reset_model = Some(reset);
        OperationStatus::Success
    }

    pub fn unset_reset_model(&mut self) -> OperationStatus {
        self.reset_model = None;
        OperationStatus::Success
    }

    /// Read from `concatenate`, or from the legacy `concatentate` spelling.
    pub fn concatenate(&self) -> Option<bool> {
        self.concatenate
    }

    pub fn set_concatenate(&mut self, concatenate: bool) -> OperationStatus {
        self.concatenate = Some(concatenate);
        OperationStatus::Success
    }

    pub fn ranges(&self) -> &ListOf<Range> {
        &self.ranges
    }

    pub fn add_range(&mut self, range: &Range) -> OperationStatus {
        self.ranges.append(range)
    }

    pub fn create_uniform_range(&mut self) -> &mut UniformRange {
        let range = UniformRange::new(&self.base.namespaces);
        match self.ranges.append_new(Range::Uniform(range)) {
            Range::Uniform(inner) => inner,
            _ => unreachable!("a uniformRange was just appended"),
        }
    }

    pub fn create_vector_range(&mut self) -> &mut VectorRange {
        let range = VectorRange::new(&self.base.namespaces);
        match self.ranges.append_new(Range::Vector(range)) {
            Range::Vector(inner) => inner,
            _ => unreachable!("a vectorRange was just appended"),
        }
    }

    pub fn create_functional_range(&mut self) -> &mut FunctionalRange {
        let range = FunctionalRange::new(&self.base.namespaces);
        match self.ranges.append_new(Range::Functional(range)) {
            Range::Functional(inner) => inner,
            _ => unreachable!("a functionalRange was just appended"),
        }
    }

    pub fn changes(&self) -> &ListOf<SetValue> {
        &self.changes
    }

    pub fn add_change(&mut self, change: &SetValue) -> OperationStatus {
        self.changes.append(change)
    }

    pub fn create_set_value(&mut self) -> &mut SetValue {
        let change = SetValue::new(&self.base.namespaces);
        self.changes.append_new(change)
    }

    pub fn sub_tasks(&self) -> &ListOf<SubTask> {
        &self.sub_tasks
    }

    pub fn add_sub_task(&mut self, sub_task: &SubTask) -> OperationStatus {
        self.sub_tasks.append(sub_task)
    }

    pub fn create_sub_task(&mut self) -> &mut SubTask {
        let sub_task = SubTask::new(&self.base.namespaces);
        self.sub_tasks.append_new(sub_task)
    }
}

impl SedBase for RepeatedTask {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &REPEATED_TASK_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "range" => Some(Slot::Str(&self.range)),
            "resetModel" => Some(Slot::Bool(&self.reset_model)),
            "concatenate" => Some(Slot::Bool(&self.concatenate)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "range" => Some(SlotMut::Str(&mut self.range)),
            "resetModel" => Some(SlotMut::Bool(&mut self.reset_model)),
            "concatenate" => Some(SlotMut::Bool(&mut self.concatenate)),
            _ => None,
        }
    }

    fn children(&self) -> Vec<&dyn SedBase> {
        vec![&self.ranges, &self.changes, &self.sub_tasks]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
        vec![&mut self.ranges, &mut self.changes, &mut self.sub_tasks]
    }

    fn missing_required_elements(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.ranges.is_empty() {
            missing.push("listOfRanges");
        }
        if self.sub_tasks.is_empty() {
            missing.push("listOfSubTasks");
        }
        missing
    }

    fn create_object(&mut self, name: &str, _ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
        match name {
            "listOfRanges" => Some(&mut self.ranges),
            "listOfChanges" => Some(&mut self.changes),
            "listOfSubTasks" => Some(&mut self.sub_tasks),
            _ => None,
        }
    }
}

// --- Sub-Task ---

static SUB_TASK_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("task", AttrKind::SIdRef(TypeCode::AbstractTask))
        .required()
        .invalid(ErrorCode::SedmlSubTaskTaskMustBeAbstractTask),
    AttributeSpec::new("order", AttrKind::Int).invalid(ErrorCode::SedmlSubTaskOrderMustBeInteger),
];

pub(crate) static SUB_TASK_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::SubTask,
    id_required: false,
    attributes: SUB_TASK_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlSubTaskAllowedAttributes,
    allowed_elements: ErrorCode::SedmlSubTaskAllowedAttributes,
};

/// One task executed per iteration of a [`RepeatedTask`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubTask {
    base: BaseFields,
    task: Option<String>,
    order: Option<i32>,
}

impl SubTask {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            task: None,
            order: None,
        }
    }

    pub fn task(&self) -> Option<&str> {
        self.task.as_deref()
    }

    pub fn set_task(&mut self, task: &str) -> OperationStatus {
        self.set_attribute("task", task)
    }

    pub fn order(&self) -> Option<i32> {
        self.order
    }

    pub fn set_order(&mut self, order: i32) -> OperationStatus {
        self.order = Some(order);
        OperationStatus::Success
    }
}

impl SedBase for SubTask {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &SUB_TASK_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "task" => Some(Slot::Str(&self.task)),
            "order" => Some(Slot::Int(&self.order)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "task" => Some(SlotMut::Str(&mut self.task)),
            "order" => Some(SlotMut::Int(&mut self.order)),
            _ => None,
        }
    }
}

// --- Set Value ---

static SET_VALUE_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("modelReference", AttrKind::SIdRef(TypeCode::Model))
        .required()
        .invalid(ErrorCode::SedmlSetValueModelReferenceMustBeModel),
    AttributeSpec::new("target", AttrKind::Str),
    AttributeSpec::new("symbol", AttrKind::Str),
    AttributeSpec::new("range", AttrKind::SIdRef(TypeCode::Range))
        .invalid(ErrorCode::SedmlSetValueRangeMustBeRange),
];

pub(crate) static SET_VALUE_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::SetValue,
    id_required: false,
    attributes: SET_VALUE_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlSetValueAllowedAttributes,
    allowed_elements: ErrorCode::SedmlSetValueAllowedElements,
};

/// Sets a model quantity to the value of `math` before each iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct SetValue {
    base: BaseFields,
    model_reference: Option<String>,
    target: Option<String>,
    symbol: Option<String>,
    range: Option<String>,
    math: Option<String>,
}

impl SetValue {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            model_reference: None,
            target: None,
            symbol: None,
            range: None,
            math: None,
        }
    }

    pub fn model_reference(&self) -> Option<&str> {
        self.model_reference.as_deref()
    }

    pub fn set_model_reference(&mut self, model: &str) -> OperationStatus {
        self.set_attribute("modelReference", model)
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn set_target(&mut self, target: &str) -> OperationStatus {
        self.target = Some(target.to_string());
        OperationStatus::Success
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn set_symbol(&mut self, symbol: &str) -> OperationStatus {
        self.symbol = Some(symbol.to_string());
        OperationStatus::Success
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    pub fn set_range(&mut self, range: &str) -> OperationStatus {
        self.set_attribute("range", range)
    }

    /// Sets the MathML expression, given as a complete `<math>` element.
    pub fn set_math(&mut self, math: &str) -> OperationStatus {
        self.math = Some(math.trim().to_string());
        OperationStatus::Success
    }
}

impl SedBase for SetValue {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &SET_VALUE_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "modelReference" => Some(Slot::Str(&self.model_reference)),
            "target" => Some(Slot::Str(&self.target)),
            "symbol" => Some(Slot::Str(&self.symbol)),
            "range" => Some(Slot::Str(&self.range)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "modelReference" => Some(SlotMut::Str(&mut self.model_reference)),
            "target" => Some(SlotMut::Str(&mut self.target)),
            "symbol" => Some(SlotMut::Str(&mut self.symbol)),
            "range" => Some(SlotMut::Str(&mut self.range)),
            _ => None,
        }
    }

    fn missing_required_elements(&self) -> Vec<&'static str> {
        if self.math.is_none() { vec!["math"] } else { Vec::new() }
    }

    fn math(&self) -> Option<&str> {
        self.math.as_deref()
    }

    fn math_mut(&mut self) -> Option<&mut String> {
        self.math.as_mut()
    }

    fn read_other_xml(&mut self, input: &mut dyn XmlInput, _ctx: &mut ReadContext<'_>) -> bool {
        read_math(input, &mut self.math)
    }

    fn write_own_elements(&self, sink: &mut dyn XmlSink) -> Result<(), SedmlError> {
        write_math(&self.math, sink)
    }
}

list_item!(
    SubTask => SUB_TASK_INFO,
    SetValue => SET_VALUE_INFO,
);

sibling_kinds! {
    /// Any task: a plain task or a repeated one.
    AbstractTask: TypeCode::AbstractTask => {
        Task(Task) => TASK_INFO,
        Repeated(RepeatedTask) => REPEATED_TASK_INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorLog;
    use crate::xml::XmlAttributes;

    #[test]
    fn test_reference_setter_checks_syntax() {
        let mut task = Task::new(&SedNamespaces::default());
        assert_eq!(task.set_model_reference("m1"), OperationStatus::Success);
        assert_eq!(
            task.set_model_reference("not valid"),
            OperationStatus::InvalidAttributeValue
        );
        assert_eq!(task.model_reference(), Some("m1"));
    }

    #[test]
    fn test_concatenate_accepts_misspelling_and_writes_correct_name() {
        let mut task = RepeatedTask::new(&SedNamespaces::default());
        let mut attrs = XmlAttributes::default();
        attrs.push("id", "rt");
        attrs.push("concatentate", "false");
        attrs.push("resetModel", "maybe");
        let mut log = ErrorLog::new();
        let mut ctx = ReadContext::new(&mut log, 1, 4);
        task.read_attributes(&attrs, &mut ctx);

        assert_eq!(task.concatenate(), Some(false));
        assert_eq!(task.reset_model(), None);
        assert_eq!(log.num_errors(), 1);
        assert!(log.contains(ErrorCode::SedmlRepeatedTaskResetModelMustBeBoolean));
        assert_eq!(task.get_attribute("concatenate").as_deref(), Some("false"));
        assert_eq!(task.get_attribute("concatentate").as_deref(), Some("false"));
    }

    #[test]
    fn test_repeated_task_required_elements() {
        let mut task = RepeatedTask::new(&SedNamespaces::default());
        assert_eq!(
            task.missing_required_elements(),
            vec!["listOfRanges", "listOfSubTasks"]
        );
        let _ = task.create_vector_range().set_id("r0");
        let _ = task.create_sub_task().set_task("t1");
        assert!(task.has_required_elements());
        assert_eq!(task.ranges().len(), 1);
    }

    #[test]
    fn test_rename_reaches_set_value_math() {
        let mut task = RepeatedTask::new(&SedNamespaces::default());
        let change = task.create_set_value();
        let _ = change.set_model_reference("m1");
        let _ = change.set_range("r0");
        let _ = change.set_math("<math><ci>r0</ci></math>");
        let _ = task.set_range("r0");

        let renamed = task.rename_sid_refs("r0", "r1");
        assert_eq!(renamed, 3);
        assert_eq!(task.range(), Some("r1"));
        let change = task.changes().get(0).unwrap();
        assert_eq!(change.range(), Some("r1"));
        assert_eq!(change.math(), Some("<math><ci>r1</ci></math>"));
    }
}
