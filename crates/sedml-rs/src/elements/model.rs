// crates/sedml-rs/src/elements/model.rs

use super::sibling_kinds;
use crate::attributes::{AttrKind, AttributeSpec, ElementInfo, ReadContext, Slot, SlotMut};
use crate::base::{BaseFields, SedBase, node_fields};
use crate::diagnostics::ErrorCode;
use crate::error::OperationStatus;
use crate::list_of::{ListOf, list_item};
use crate::types::{SedNamespaces, TypeCode};

// --- Model ---

static MODEL_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("language", AttrKind::Str),
    AttributeSpec::new("source", AttrKind::Str).required(),
];

pub(crate) static MODEL_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::Model,
    id_required: true,
    attributes: MODEL_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlModelAllowedAttributes,
    allowed_elements: ErrorCode::SedmlModelAllowedElements,
};

/// A model to simulate, with the changes to apply before simulating it.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    base: BaseFields,
    language: Option<String>,
    source: Option<String>,
    changes: ListOf<Change>,
}

impl Model {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            language: None,
            source: None,
            changes: ListOf::new("listOfChanges", namespaces),
        }
    }

    /// URN of the model language, e.g. `urn:sedml:language:sbml`.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn set_language(&mut self, language: &str) -> OperationStatus {
        self.language = Some(language.to_string());
        OperationStatus::Success
    }

    pub fn unset_language(&mut self) -> OperationStatus {
        self.language = None;
        OperationStatus::Success
    }

    /// Where to find the model: a URI, a file, or the id of another model.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn set_source(&mut self, source: &str) -> OperationStatus {
        self.source = Some(source.to_string());
        OperationStatus::Success
    }

    pub fn unset_source(&mut self) -> OperationStatus {
        self.source = None;
        OperationStatus::Success
    }

    pub fn changes(&self) -> &ListOf<Change> {
        &self.changes
    }

    pub fn changes_mut(&mut self) -> &mut ListOf<Change> {
        &mut self.changes
    }

    pub fn add_change(&mut self, change: &Change) -> OperationStatus {
        self.changes.append(change)
    }

    pub fn num_changes(&self) -> usize {
        self.changes.len()
    }

    pub fn create_change_attribute(&mut self) -> &mut ChangeAttribute {
        let change = ChangeAttribute::new(&self.base.namespaces);
        match self.changes.append_new(Change::Attribute(change)) {
            Change::Attribute(inner) => inner,
            Change::RemoveXml(_) => unreachable!("a changeAttribute was just appended"),
        }
    }

    pub fn create_remove_xml(&mut self) -> &mut RemoveXml {
        let change = RemoveXml::new(&self.base.namespaces);
        match self.changes.append_new(Change::RemoveXml(change)) {
            Change::RemoveXml(inner) => inner,
            Change::Attribute(_) => unreachable!("a removeXML was just appended"),
        }
    }
}

impl SedBase for Model {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &MODEL_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "language" => Some(Slot::Str(&self.language)),
            "source" => Some(Slot::Str(&self.source)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "language" => Some(SlotMut::Str(&mut self.language)),
            "source" => Some(SlotMut::Str(&mut self.source)),
            _ => None,
        }
    }

    fn children(&self) -> Vec<&dyn SedBase> {
        vec![&self.changes]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
        vec![&mut self.changes]
    }

    fn create_object(&mut self, name: &str, _ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
        match name {
            "listOfChanges" => Some(&mut self.changes),
            _ => None,
        }
    }
}

// --- Changes ---

static CHANGE_ATTRIBUTE_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("target", AttrKind::Str).required(),
    AttributeSpec::new("newValue", AttrKind::Str).required(),
];

pub(crate) static CHANGE_ATTRIBUTE_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::ChangeAttribute,
    id_required: false,
    attributes: CHANGE_ATTRIBUTE_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlChangeAttributeAllowedAttributes,
    allowed_elements: ErrorCode::SedmlChangeAttributeAllowedAttributes,
};

/// Sets the attribute addressed by an XPath `target` to `newValue`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeAttribute {
    base: BaseFields,
    target: Option<String>,
    new_value: Option<String>,
}

impl ChangeAttribute {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            target: None,
            new_value: None,
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn set_target(&mut self, target: &str) -> OperationStatus {
        self.target = Some(target.to_string());
        OperationStatus::Success
    }

    pub fn new_value(&self) -> Option<&str> {
        self.new_value.as_deref()
    }

    pub fn set_new_value(&mut self, value: &str) -> OperationStatus {
        self.new_value = Some(value.to_string());
        OperationStatus::Success
    }
}

impl SedBase for ChangeAttribute {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &CHANGE_ATTRIBUTE_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "target" => Some(Slot::Str(&self.target)),
            "newValue" => Some(Slot::Str(&self.new_value)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "target" => Some(SlotMut::Str(&mut self.target)),
            "newValue" => Some(SlotMut::Str(&mut self.new_value)),
            _ => None,
        }
    }
}

static REMOVE_XML_ATTRIBUTES: &[AttributeSpec] =
    &[AttributeSpec::new("target", AttrKind::Str).required()];

pub(crate) static REMOVE_XML_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::RemoveXml,
    id_required: false,
    attributes: REMOVE_XML_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlChangeAllowedAttributes,
    allowed_elements: ErrorCode::SedmlChangeAllowedAttributes,
};

/// Removes the XML node addressed by `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveXml {
    base: BaseFields,
    target: Option<String>,
}

impl RemoveXml {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            target: None,
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn set_target(&mut self, target: &str) -> OperationStatus {
        self.target = Some(target.to_string());
        OperationStatus::Success
    }
}

impl SedBase for RemoveXml {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &REMOVE_XML_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        (name == "target").then_some(Slot::Str(&self.target))
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        (name == "target").then_some(SlotMut::Str(&mut self.target))
    }
}

list_item!(
    Model => MODEL_INFO,
);

sibling_kinds! {
    /// A change applied to a model before simulation.
    Change: TypeCode::Change => {
        Attribute(ChangeAttribute) => CHANGE_ATTRIBUTE_INFO,
        RemoveXml(RemoveXml) => REMOVE_XML_INFO,
    }
}
