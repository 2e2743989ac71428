// crates/sedml-rs/src/elements/data_generator.rs

use super::{read_math, write_math};
use crate::attributes::{AttrKind, AttributeSpec, ElementInfo, ReadContext, Slot, SlotMut};
use crate::base::{BaseFields, SedBase, node_fields};
use crate::diagnostics::ErrorCode;
use crate::error::{OperationStatus, SedmlError};
use crate::list_of::{ListOf, list_item};
use crate::types::{SedNamespaces, TypeCode};
use crate::xml::{XmlInput, XmlSink};

// --- Data Generator ---

pub(crate) static DATA_GENERATOR_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::DataGenerator,
    id_required: true,
    attributes: &[],
    allowed_attributes: ErrorCode::SedmlDataGeneratorAllowedAttributes,
    allowed_elements: ErrorCode::SedmlDataGeneratorAllowedElements,
};

/// Post-processes simulation results: `math` over variables and parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DataGenerator {
    base: BaseFields,
    variables: ListOf<Variable>,
    parameters: ListOf<Parameter>,
    math: Option<String>,
}

impl DataGenerator {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            variables: ListOf::new("listOfVariables", namespaces),
            parameters: ListOf::new("listOfParameters", namespaces),
            math: None,
        }
    }

    pub fn variables(&self) -> &ListOf<Variable> {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut ListOf<Variable> {
        &mut self.variables
    }

    pub fn add_variable(&mut self, variable: &Variable) -> OperationStatus {
        self.variables.append(variable)
    }

    pub fn create_variable(&mut self) -> &mut Variable {
        let variable = Variable::new(&self.base.namespaces);
        self.variables.append_new(variable)
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn parameters(&self) -> &ListOf<Parameter> {
        &self.parameters
    }

    pub fn add_parameter(&mut self, parameter: &Parameter) -> OperationStatus {
        self.parameters.append(parameter)
    }

    pub fn create_parameter(&mut self) -> &mut Parameter {
        let parameter = Parameter::new(&self.base.namespaces);
        self.parameters.append_new(parameter)
    }

    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Sets the MathML expression, given as a complete `<math>` element.
    pub fn set_math(&mut self, math: &str) -> OperationStatus {
        self.math = Some(math.trim().to_string());
        OperationStatus::Success
    }

    pub fn unset_math(&mut self) -> OperationStatus {
        self.math = None;
        OperationStatus::Success
    }
}

impl SedBase for DataGenerator {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &DATA_GENERATOR_INFO
    }

    fn children(&self) -> Vec<&dyn SedBase> {
        vec![&self.variables, &self.parameters]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
        vec![&mut self.variables, &mut self.parameters]
    }

    fn missing_required_elements(&self) -> Vec<&'static str> {
        if self.math.is_none() { vec!["math"] } else { Vec::new() }
    }

    fn create_object(&mut self, name: &str, _ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
        match name {
            "listOfVariables" => Some(&mut self.variables),
            "listOfParameters" => Some(&mut self.parameters),
            _ => None,
        }
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

// --- Variable ---

static VARIABLE_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("symbol", AttrKind::Str),
    AttributeSpec::new("target", AttrKind::Str),
    AttributeSpec::new("taskReference", AttrKind::SIdRef(TypeCode::AbstractTask))
        .invalid(ErrorCode::SedmlVariableTaskReferenceMustBeAbstractTask),
    AttributeSpec::new("modelReference", AttrKind::SIdRef(TypeCode::Model))
        .invalid(ErrorCode::SedmlVariableModelReferenceMustBeModel),
];

pub(crate) static VARIABLE_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::Variable,
    id_required: true,
    attributes: VARIABLE_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlVariableAllowedAttributes,
    allowed_elements: ErrorCode::SedmlVariableAllowedAttributes,
};

/// A model quantity (`target` XPath or implicit `symbol`) sampled from a task.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    base: BaseFields,
    symbol: Option<String>,
    target: Option<String>,
    task_reference: Option<String>,
    model_reference: Option<String>,
}

impl Variable {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            symbol: None,
            target: None,
            task_reference: None,
            model_reference: None,
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn set_symbol(&mut self, symbol: &str) -> OperationStatus {
        self.symbol = Some(symbol.to_string());
        OperationStatus::Success
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn set_target(&mut self, target: &str) -> OperationStatus {
        self.target = Some(target.to_string());
        OperationStatus::Success
    }

    pub fn task_reference(&self) -> Option<&str> {
        self.task_reference.as_deref()
    }

    pub fn set_task_reference(&mut self, task: &str) -> OperationStatus {
        self.set_attribute("taskReference", task)
    }

    pub fn model_reference(&self) -> Option<&str> {
        self.model_reference.as_deref()
    }

    pub fn set_model_reference(&mut self, model: &str) -> OperationStatus {
        self.set_attribute("modelReference", model)
    }
}

impl SedBase for Variable {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &VARIABLE_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "symbol" => Some(Slot::Str(&self.symbol)),
            "target" => Some(Slot::Str(&self.target)),
            "taskReference" => Some(Slot::Str(&self.task_reference)),
            "modelReference" => Some(Slot::Str(&self.model_reference)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "symbol" => Some(SlotMut::Str(&mut self.symbol)),
            "target" => Some(SlotMut::Str(&mut self.target)),
            "taskReference" => Some(SlotMut::Str(&mut self.task_reference)),
            "modelReference" => Some(SlotMut::Str(&mut self.model_reference)),
            _ => None,
        }
    }
}

// --- Parameter ---

static PARAMETER_ATTRIBUTES: &[AttributeSpec] = &[AttributeSpec::new("value", AttrKind::Double)
    .required()
    .invalid(ErrorCode::SedmlParameterValueMustBeDouble)];

pub(crate) static PARAMETER_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::Parameter,
    id_required: true,
    attributes: PARAMETER_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlParameterAllowedAttributes,
    allowed_elements: ErrorCode::SedmlParameterAllowedAttributes,
};

/// A named constant used in `math`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    base: BaseFields,
    value: Option<f64>,
}

impl Parameter {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            value: None,
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn set_value(&mut self, value: f64) -> OperationStatus {
        self.value = Some(value);
        OperationStatus::Success
    }

    pub fn unset_value(&mut self) -> OperationStatus {
        self.value = None;
        OperationStatus::Success
    }
}

impl SedBase for Parameter {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &PARAMETER_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        (name == "value").then_some(Slot::Double(&self.value))
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        (name == "value").then_some(SlotMut::Double(&mut self.value))
    }
}

list_item!(
    DataGenerator => DATA_GENERATOR_INFO,
    Variable => VARIABLE_INFO,
    Parameter => PARAMETER_INFO,
);
