// crates/sedml-rs/src/base.rs

//! The tree-node contract shared by every SED-ML element.
//!
//! Ownership runs strictly downwards: a node owns its attributes and child
//! lists as plain fields. The parent and document back-references stored in
//! [`BaseFields`] are opaque handles ([`NodeKey`], [`DocumentId`]) that can be
//! looked up from the owning document, never followed as pointers.

use crate::attributes::{
    CORE_ATTRIBUTES, ElementInfo, ElementRef, ReadContext, Slot, SlotMut,
    check_metaid, read_attribute, set_checked, write_attribute,
};
use crate::diagnostics::ErrorCode;
use crate::error::{OperationStatus, SedmlError};
use crate::identity::{is_valid_sid, is_valid_xml_id, rename_in_math};
use crate::types::{NamespaceDecl, SedNamespaces, TypeCode};
use crate::visitor::{ElementFilter, SedVisitor, collect_elements};
use crate::xml::{AttributeSource, StartTag, XmlInput, XmlSink, XmlToken};
use core::any::Any;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use log::trace;

// --- Handles ---

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one node instance.
///
/// Clones get a fresh key, so two nodes never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(u64);

impl NodeKey {
    pub(crate) fn fresh() -> Self {
        NodeKey(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity of a [`SedDocument`](crate::SedDocument) instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    pub(crate) fn fresh() -> Self {
        DocumentId(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }
}

// --- Base Fields ---

/// State common to every node.
#[derive(Debug)]
pub struct BaseFields {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) metaid: Option<String>,
    pub(crate) notes: Option<String>,
    pub(crate) annotation: Option<String>,
    pub(crate) namespaces: SedNamespaces,
    /// Namespace declarations made on this element's own start tag.
    pub(crate) xmlns: Vec<NamespaceDecl>,
    line: u32,
    column: u32,
    key: NodeKey,
    parent: Option<NodeKey>,
    document: Option<DocumentId>,
}

impl BaseFields {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            id: None,
            name: None,
            metaid: None,
            notes: None,
            annotation: None,
            namespaces: namespaces.clone(),
            xmlns: Vec::new(),
            line: 0,
            column: 0,
            key: NodeKey::fresh(),
            parent: None,
            document: None,
        }
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// Handle of the owning node, if attached.
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Handle of the owning document, if attached.
    pub fn document(&self) -> Option<DocumentId> {
        self.document
    }

    pub fn namespaces(&self) -> &SedNamespaces {
        &self.namespaces
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub(crate) fn set_location(&mut self, line: u32, column: u32) {
        self.line = line;
        self.column = column;
    }

    pub(crate) fn attach(&mut self, parent: Option<NodeKey>, document: Option<DocumentId>) {
        self.parent = parent;
        self.document = document;
    }

    pub(crate) fn set_document_id(&mut self, document: Option<DocumentId>) {
        self.document = document;
    }

    pub(crate) fn declare_namespace(&mut self, decl: &NamespaceDecl) {
        if decl.prefix.is_none() && SedNamespaces::is_sedml_uri(&decl.uri) {
            return;
        }
        self.namespaces.add_namespace(decl.prefix.as_deref(), &decl.uri);
        self.xmlns.push(decl.clone());
    }
}

/// Clones content only: the copy gets a new key and no back-references.
impl Clone for BaseFields {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            metaid: self.metaid.clone(),
            notes: self.notes.clone(),
            annotation: self.annotation.clone(),
            namespaces: self.namespaces.clone(),
            xmlns: self.xmlns.clone(),
            line: self.line,
            column: self.column,
            key: NodeKey::fresh(),
            parent: None,
            document: None,
        }
    }
}

/// Content equality; keys, back-references and source positions are ignored.
impl PartialEq for BaseFields {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.metaid == other.metaid
            && self.notes == other.notes
            && self.annotation == other.annotation
            && self.namespaces == other.namespaces
            && self.xmlns == other.xmlns
    }
}

/// Attaches `child` (and its subtree) below the node owning `parent`.
pub(crate) fn adopt_child(parent: &BaseFields, child: &mut dyn SedBase) {
    child.base_mut().attach(Some(parent.key()), parent.document());
    child.connect_to_child();
}

/// Implements the `base`/`base_mut` accessors for a struct with a `base` field.
macro_rules! node_fields {
    () => {
        fn base(&self) -> &$crate::base::BaseFields {
            &self.base
        }

        fn base_mut(&mut self) -> &mut $crate::base::BaseFields {
            &mut self.base
        }
    };
}
pub(crate) use node_fields;

// --- Dynamic Typing ---

/// Object-safe helpers implemented for every concrete node type.
pub trait NodeAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn as_node(&self) -> &dyn SedBase;
    fn as_node_mut(&mut self) -> &mut dyn SedBase;
    /// Deep copy behind a box; see [`BaseFields`]'s `Clone`.
    fn clone_node(&self) -> Box<dyn SedBase>;
}

impl<T: SedBase + Clone + 'static> NodeAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_node(&self) -> &dyn SedBase {
        self
    }

    fn as_node_mut(&mut self) -> &mut dyn SedBase {
        self
    }

    fn clone_node(&self) -> Box<dyn SedBase> {
        Box::new(self.clone())
    }
}

impl<'a> dyn SedBase + 'a {
    pub fn downcast_ref<T: SedBase + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: SedBase + 'static>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: SedBase + 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

// --- The Node Contract ---

/// The contract every SED-ML element implements.
///
/// Concrete kinds supply their [`ElementInfo`], attribute slots and children;
/// reading, writing, validation, traversal and reference renaming are
/// provided on top of those.
pub trait SedBase: NodeAny + fmt::Debug {
    fn base(&self) -> &BaseFields;

    fn base_mut(&mut self) -> &mut BaseFields;

    fn info(&self) -> &'static ElementInfo;

    fn type_code(&self) -> TypeCode {
        self.info().type_code
    }

    fn element_name(&self) -> &str {
        self.info().element_name()
    }

    /// Storage of a kind-specific attribute, by canonical name.
    fn slot(&self, _name: &str) -> Option<Slot<'_>> {
        None
    }

    fn slot_mut(&mut self, _name: &str) -> Option<SlotMut<'_>> {
        None
    }

    /// Owned child nodes (including child lists), in document order.
    fn children(&self) -> Vec<&dyn SedBase> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
        Vec::new()
    }

    // --- Core Attributes ---

    fn id(&self) -> Option<&str> {
        self.base().id.as_deref()
    }

    fn set_id(&mut self, id: &str) -> OperationStatus {
        if !is_valid_sid(id) {
            return OperationStatus::InvalidAttributeValue;
        }
        self.base_mut().id = Some(id.to_string());
        OperationStatus::Success
    }

    fn is_set_id(&self) -> bool {
        self.base().id.is_some()
    }

    fn unset_id(&mut self) -> OperationStatus {
        self.base_mut().id = None;
        OperationStatus::Success
    }

    fn name(&self) -> Option<&str> {
        self.base().name.as_deref()
    }

    fn set_name(&mut self, name: &str) -> OperationStatus {
        self.base_mut().name = Some(name.to_string());
        OperationStatus::Success
    }

    fn unset_name(&mut self) -> OperationStatus {
        self.base_mut().name = None;
        OperationStatus::Success
    }

    fn metaid(&self) -> Option<&str> {
        self.base().metaid.as_deref()
    }

    fn set_metaid(&mut self, metaid: &str) -> OperationStatus {
        let status = check_metaid(metaid);
        if status.is_success() {
            self.base_mut().metaid = Some(metaid.to_string());
        }
        status
    }

    /// The `<notes>` element, verbatim.
    fn notes(&self) -> Option<&str> {
        self.base().notes.as_deref()
    }

    /// Sets notes from a full `<notes>` element or from its XHTML content.
    fn set_notes(&mut self, xml: &str) -> OperationStatus {
        self.base_mut().notes = Some(wrap_element("notes", xml));
        OperationStatus::Success
    }

    fn unset_notes(&mut self) -> OperationStatus {
        self.base_mut().notes = None;
        OperationStatus::Success
    }

    /// The `<annotation>` element, verbatim.
    fn annotation(&self) -> Option<&str> {
        self.base().annotation.as_deref()
    }

    fn set_annotation(&mut self, xml: &str) -> OperationStatus {
        self.base_mut().annotation = Some(wrap_element("annotation", xml));
        OperationStatus::Success
    }

    fn unset_annotation(&mut self) -> OperationStatus {
        self.base_mut().annotation = None;
        OperationStatus::Success
    }

    fn level(&self) -> u32 {
        self.base().namespaces.level()
    }

    fn version(&self) -> u32 {
        self.base().namespaces.version()
    }

    fn namespaces(&self) -> &SedNamespaces {
        &self.base().namespaces
    }

    fn line(&self) -> u32 {
        self.base().line()
    }

    fn column(&self) -> u32 {
        self.base().column()
    }

    // --- Generic Attribute Access ---

    /// The XML text of a core or kind-specific attribute, if set.
    fn get_attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.base().id.clone(),
            "name" => self.base().name.clone(),
            "metaid" => self.base().metaid.clone(),
            _ => {
                let spec = self.info().spec(name)?;
                self.slot(spec.name)?.to_xml()
            }
        }
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> OperationStatus {
        match name {
            "id" => self.set_id(value),
            "name" => self.set_name(value),
            "metaid" => self.set_metaid(value),
            _ => {
                let Some(spec) = self.info().spec(name) else {
                    return OperationStatus::UnexpectedAttribute;
                };
                match self.slot_mut(spec.name) {
                    Some(slot) => set_checked(spec, slot, value),
                    None => OperationStatus::OperationFailed,
                }
            }
        }
    }

    fn is_set_attribute(&self, name: &str) -> bool {
        match name {
            "id" | "name" | "metaid" => self.get_attribute(name).is_some(),
            _ => self
                .info()
                .spec(name)
                .and_then(|spec| self.slot(spec.name))
                .is_some_and(|slot| slot.is_set()),
        }
    }

    fn unset_attribute(&mut self, name: &str) -> OperationStatus {
        match name {
            "id" => self.unset_id(),
            "name" => self.unset_name(),
            "metaid" => {
                self.base_mut().metaid = None;
                OperationStatus::Success
            }
            _ => {
                let Some(spec) = self.info().spec(name) else {
                    return OperationStatus::UnexpectedAttribute;
                };
                match self.slot_mut(spec.name) {
                    Some(mut slot) => {
                        slot.clear();
                        OperationStatus::Success
                    }
                    None => OperationStatus::OperationFailed,
                }
            }
        }
    }

    // --- Validity ---

    /// Names of required attributes that are not set. The `id` check comes first.
    fn missing_required_attributes(&self) -> Vec<&'static str> {
        let info = self.info();
        let mut missing = Vec::new();
        if info.id_required && self.base().id.is_none() {
            missing.push("id");
        }
        for spec in info.attributes.iter().filter(|s| s.required) {
            if !self.slot(spec.name).is_some_and(|slot| slot.is_set()) {
                missing.push(spec.name);
            }
        }
        missing
    }

    fn has_required_attributes(&self) -> bool {
        self.missing_required_attributes().is_empty()
    }

    /// Names of required child elements that are absent or empty.
    fn missing_required_elements(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn has_required_elements(&self) -> bool {
        self.missing_required_elements().is_empty()
    }

    // --- Reading ---

    fn read_attributes(&mut self, source: &dyn AttributeSource, ctx: &mut ReadContext<'_>) {
        read_declared_attributes(self.as_node_mut(), source, ctx);
    }

    /// Returns the child that should absorb the element `name`, creating it if needed.
    fn create_object(&mut self, _name: &str, _ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
        None
    }

    /// Consumes a child element that is not a node (e.g. `<math>`), if this kind knows it.
    ///
    /// The element's start tag is the next token of `input`.
    fn read_other_xml(&mut self, _input: &mut dyn XmlInput, _ctx: &mut ReadContext<'_>) -> bool {
        false
    }

    /// Receives character data found directly inside this element.
    fn set_element_text(&mut self, _text: &str) {}

    // --- Writing ---

    fn write(&self, sink: &mut dyn XmlSink) -> Result<(), SedmlError> {
        sink.start_element(self.element_name())?;
        self.write_namespaces(sink)?;
        self.write_attributes(sink)?;
        self.write_elements(sink)?;
        sink.end_element(self.element_name())
    }

    fn write_namespaces(&self, sink: &mut dyn XmlSink) -> Result<(), SedmlError> {
        for decl in &self.base().xmlns {
            sink.write_namespace(decl.prefix.as_deref(), &decl.uri)?;
        }
        Ok(())
    }

    fn write_attributes(&self, sink: &mut dyn XmlSink) -> Result<(), SedmlError> {
        write_declared_attributes(self.as_node(), sink)
    }

    /// Notes, annotation, non-empty children, then [`write_own_elements`](SedBase::write_own_elements).
    fn write_elements(&self, sink: &mut dyn XmlSink) -> Result<(), SedmlError> {
        if let Some(notes) = &self.base().notes {
            sink.write_raw(notes)?;
        }
        if let Some(annotation) = &self.base().annotation {
            sink.write_raw(annotation)?;
        }
        for child in self.children() {
            if !child.is_empty_container() {
                child.write(sink)?;
            }
        }
        self.write_own_elements(sink)
    }

    /// Kind-specific child content that is not a node (math, values).
    fn write_own_elements(&self, _sink: &mut dyn XmlSink) -> Result<(), SedmlError> {
        Ok(())
    }

    /// `true` for containers that are omitted from output when empty.
    fn is_empty_container(&self) -> bool {
        false
    }

    // --- Back-References ---

    /// Points every descendant's parent and document handles at its owner.
    fn connect_to_child(&mut self) {
        let key = self.base().key();
        let document = self.base().document();
        for child in self.children_mut() {
            child.base_mut().attach(Some(key), document);
            child.connect_to_child();
        }
    }

    fn set_document(&mut self, document: Option<DocumentId>) {
        self.base_mut().set_document_id(document);
        for child in self.children_mut() {
            child.set_document(document);
        }
    }

    // --- Identifier References ---

    /// Renames this node's own SIdRef attributes (and math `ci` references).
    ///
    /// Returns the number of values replaced.
    fn rename_own_sid_refs(&mut self, old_id: &str, new_id: &str) -> usize {
        let mut renamed = 0;
        for spec in self.info().attributes.iter().filter(|s| s.is_reference()) {
            if let Some(SlotMut::Str(value)) = self.slot_mut(spec.name) {
                if value.as_deref() == Some(old_id) {
                    *value = Some(new_id.to_string());
                    renamed += 1;
                }
            }
        }
        if let Some(math) = self.math_mut() {
            renamed += rename_in_math(math, old_id, new_id);
        }
        renamed
    }

    /// Renames references in this node and all descendants.
    fn rename_sid_refs(&mut self, old_id: &str, new_id: &str) -> usize {
        let mut renamed = self.rename_own_sid_refs(old_id, new_id);
        for child in self.children_mut() {
            renamed += child.rename_sid_refs(old_id, new_id);
        }
        renamed
    }

    /// The MathML content of kinds that carry one.
    fn math(&self) -> Option<&str> {
        None
    }

    fn math_mut(&mut self) -> Option<&mut String> {
        None
    }

    // --- Search & Traversal ---

    /// Depth-first search for `id`, checking this node before its children.
    fn get_element_by_sid(&self, id: &str) -> Option<&dyn SedBase> {
        if id.is_empty() {
            return None;
        }
        if self.base().id.as_deref() == Some(id) {
            return Some(self.as_node());
        }
        for child in self.children() {
            if let Some(found) = child.get_element_by_sid(id) {
                return Some(found);
            }
        }
        None
    }

    fn get_element_by_sid_mut(&mut self, id: &str) -> Option<&mut dyn SedBase> {
        if id.is_empty() {
            return None;
        }
        if self.base().id.as_deref() == Some(id) {
            return Some(self.as_node_mut());
        }
        for child in self.children_mut() {
            if let Some(found) = child.get_element_by_sid_mut(id) {
                return Some(found);
            }
        }
        None
    }

    fn get_element_by_metaid(&self, metaid: &str) -> Option<&dyn SedBase> {
        if self.base().metaid.as_deref() == Some(metaid) {
            return Some(self.as_node());
        }
        self.children()
            .into_iter()
            .find_map(|child| child.get_element_by_metaid(metaid))
    }

    /// Resolves a [`NodeKey`] handle inside this subtree.
    fn find_by_key(&self, key: NodeKey) -> Option<&dyn SedBase> {
        if self.base().key() == key {
            return Some(self.as_node());
        }
        self.children()
            .into_iter()
            .find_map(|child| child.find_by_key(key))
    }

    /// Walks this subtree in pre-order. Returns `false` once the visitor is done.
    fn accept(&self, visitor: &mut dyn SedVisitor) -> bool {
        if visitor.visit(self.as_node()) {
            for child in self.children() {
                if !child.accept(visitor) {
                    break;
                }
            }
        }
        visitor.leave(self.as_node());
        !visitor.is_done()
    }

    /// Every descendant accepted by `filter` (all of them for `None`), in document order.
    fn get_all_elements(&self, filter: Option<&dyn ElementFilter>) -> Vec<&dyn SedBase> {
        let mut found = Vec::new();
        for child in self.children() {
            collect_elements(child, filter, &mut found);
        }
        found
    }
}

fn wrap_element(element: &str, xml: &str) -> String {
    let trimmed = xml.trim();
    if trimmed.starts_with(&format!("<{}", element)) {
        trimmed.to_string()
    } else {
        format!("<{0}>{1}</{0}>", element, trimmed)
    }
}

// --- Generic Read/Write Paths ---

/// Reads `id`, `name`, `metaid` and the kind's declared attributes, and
/// reports every unprefixed attribute the kind does not declare.
pub fn read_declared_attributes(
    node: &mut dyn SedBase,
    source: &dyn AttributeSource,
    ctx: &mut ReadContext<'_>,
) {
    let info = node.info();
    let element = node.element_name().to_string();
    let (line, column) = (node.base().line(), node.base().column());

    for attr in source.attributes() {
        // Attributes in other namespaces (xsi:, xml:, ...) are not ours to judge.
        if attr.prefix.is_some() {
            continue;
        }
        let name = attr.name.as_str();
        if CORE_ATTRIBUTES.contains(&name) || info.spec(name).is_some() {
            continue;
        }
        let details = format!("Unknown attribute '{}' on the <{}> element.", name, element);
        ctx.log_error(info.allowed_attributes, &details, line, column);
    }

    match source.get("id") {
        Some("") => {
            let details = format!("The id attribute on the <{}> element is empty.", element);
            ctx.log_error(info.allowed_attributes, &details, line, column);
        }
        Some(id) => {
            if ctx.validate_ids && !is_valid_sid(id) {
                let details = format!(
                    "The id '{}' on the <{}> element does not conform to the syntax.",
                    id, element
                );
                ctx.log_error(ErrorCode::SedmlIdSyntaxRule, &details, line, column);
            }
            node.base_mut().id = Some(id.to_string());
        }
        None if info.id_required => {
            let details = format!(
                "Sedml attribute 'id' is missing from the <{}> element.",
                element
            );
            ctx.log_error(info.allowed_attributes, &details, line, column);
        }
        None => {}
    }

    if let Some(name) = source.get("name") {
        node.base_mut().name = Some(name.to_string());
    }

    if let Some(metaid) = source.get("metaid") {
        if ctx.validate_ids && !is_valid_xml_id(metaid) {
            let details = format!(
                "The metaid '{}' on the <{}> element does not conform to the syntax.",
                metaid, element
            );
            ctx.log_error(ErrorCode::SedInvalidMetaidSyntax, &details, line, column);
        }
        node.base_mut().metaid = Some(metaid.to_string());
    }

    let id = node.base().id.clone();
    let element_ref = ElementRef {
        element: &element,
        id: id.as_deref(),
        line,
        column,
        allowed_attributes: info.allowed_attributes,
    };
    for spec in info.attributes {
        if let Some(slot) = node.slot_mut(spec.name) {
            read_attribute(spec, source, slot, &element_ref, ctx);
        }
    }
}

/// Writes `id`, `name`, `metaid`, then each set kind-specific attribute.
pub fn write_declared_attributes(
    node: &dyn SedBase,
    sink: &mut dyn XmlSink,
) -> Result<(), SedmlError> {
    let base = node.base();
    write_attribute("id", Slot::Str(&base.id), sink)?;
    write_attribute("name", Slot::Str(&base.name), sink)?;
    write_attribute("metaid", Slot::Str(&base.metaid), sink)?;
    for spec in node.info().attributes {
        if let Some(slot) = node.slot(spec.name) {
            write_attribute(spec.name, slot, sink)?;
        }
    }
    Ok(())
}

/// Reads the element opened by `tag` into `node`, consuming up to and including its end tag.
pub fn read_element(
    node: &mut dyn SedBase,
    tag: &StartTag,
    input: &mut dyn XmlInput,
    ctx: &mut ReadContext<'_>,
) {
    node.base_mut().set_location(tag.line, tag.column);
    for decl in &tag.namespaces {
        node.base_mut().declare_namespace(decl);
    }
    node.read_attributes(&tag.attributes, ctx);
    if tag.is_empty {
        return;
    }

    loop {
        let (line, column) = (input.line(), input.column());
        let child_name = match input.peek() {
            XmlToken::Eof => return,
            XmlToken::End { .. } => {
                input.next_token();
                return;
            }
            XmlToken::Text(_) => {
                if let XmlToken::Text(text) = input.next_token() {
                    node.set_element_text(&text);
                }
                continue;
            }
            XmlToken::Start(child) => child.name.clone(),
        };

        if child_name == "notes" || child_name == "annotation" {
            let existing = match child_name.as_str() {
                "notes" => node.base().notes.is_some(),
                _ => node.base().annotation.is_some(),
            };
            if existing {
                let details = format!(
                    "Only one <{}> element is permitted inside <{}>.",
                    child_name,
                    node.element_name()
                );
                ctx.log_error(node.info().allowed_elements, &details, line, column);
            }
            let raw = input.read_raw_element();
            match child_name.as_str() {
                "notes" => node.base_mut().notes = raw,
                _ => node.base_mut().annotation = raw,
            }
            continue;
        }

        if let Some(child) = node.create_object(&child_name, ctx) {
            trace!("<{}> read as {}", child_name, child.type_code());
            if let XmlToken::Start(child_tag) = input.next_token() {
                read_element(child, &child_tag, input, ctx);
            }
        } else if !node.read_other_xml(input, ctx) {
            let details = format!(
                "Element <{}> is not allowed inside <{}>.",
                child_name,
                node.element_name()
            );
            ctx.log_error(ErrorCode::SedUnrecognizedElement, &details, line, column);
            input.skip_element();
        }
    }
}
