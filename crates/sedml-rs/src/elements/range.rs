// crates/sedml-rs/src/elements/range.rs

use super::data_generator::{Parameter, Variable};
use super::{read_math, sibling_kinds, write_math};
use crate::attributes::{
    AttrKind, AttributeSpec, ElementInfo, ReadContext, Slot, SlotMut, format_double, parse_double,
};
use crate::base::{BaseFields, SedBase, node_fields};
use crate::diagnostics::ErrorCode;
use crate::error::{OperationStatus, SedmlError};
use crate::list_of::ListOf;
use crate::types::{SedNamespaces, TypeCode};
use crate::xml::{XmlInput, XmlSink, XmlToken};

// --- Uniform Range ---

static UNIFORM_RANGE_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("start", AttrKind::Double)
        .required()
        .invalid(ErrorCode::SedmlUniformRangeStartMustBeDouble),
    AttributeSpec::new("end", AttrKind::Double)
        .required()
        .invalid(ErrorCode::SedmlUniformRangeEndMustBeDouble),
    AttributeSpec::new("numberOfPoints", AttrKind::Int)
        .required()
        .invalid(ErrorCode::SedmlUniformRangeNumberOfPointsMustBeInteger),
    AttributeSpec::new("type", AttrKind::Str).required(),
];

pub(crate) static UNIFORM_RANGE_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::UniformRange,
    id_required: true,
    attributes: UNIFORM_RANGE_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlUniformRangeAllowedAttributes,
    allowed_elements: ErrorCode::SedmlRangeAllowedAttributes,
};

/// `numberOfPoints` values from `start` to `end`, spaced `linear` or `log`.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformRange {
    base: BaseFields,
    start: Option<f64>,
    end: Option<f64>,
    number_of_points: Option<i32>,
    range_type: Option<String>,
}

impl UniformRange {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            start: None,
            end: None,
            number_of_points: None,
            range_type: None,
        }
    }

    pub fn start(&self) -> Option<f64> {
        self.start
    }

    pub fn set_start(&mut self, start: f64) -> OperationStatus {
        self.start = Some(start);
        OperationStatus::Success
    }

    pub fn end(&self) -> Option<f64> {
        self.end
    }

    pub fn set_end(&mut self, end: f64) -> OperationStatus {
        self.end = Some(end);
        OperationStatus::Success
    }

    pub fn number_of_points(&self) -> Option<i32> {
        self.number_of_points
    }

    pub fn set_number_of_points(&mut self, points: i32) -> OperationStatus {
        self.number_of_points = Some(points);
        OperationStatus::Success
    }

    /// The `type` attribute: `linear` or `log`.
    pub fn range_type(&self) -> Option<&str> {
        self.range_type.as_deref()
    }

    pub fn set_range_type(&mut self, range_type: &str) -> OperationStatus {
        self.range_type = Some(range_type.to_string());
        OperationStatus::Success
    }
}

impl SedBase for UniformRange {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &UNIFORM_RANGE_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "start" => Some(Slot::Double(&self.start)),
            "end" => Some(Slot::Double(&self.end)),
            "numberOfPoints" => Some(Slot::Int(&self.number_of_points)),
            "type" => Some(Slot::Str(&self.range_type)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "start" => Some(SlotMut::Double(&mut self.start)),
            "end" => Some(SlotMut::Double(&mut self.end)),
            "numberOfPoints" => Some(SlotMut::Int(&mut self.number_of_points)),
            "type" => Some(SlotMut::Str(&mut self.range_type)),
            _ => None,
        }
    }
}

// --- Vector Range ---

pub(crate) static VECTOR_RANGE_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::VectorRange,
    id_required: true,
    attributes: &[],
    allowed_attributes: ErrorCode::SedmlVectorRangeAllowedAttributes,
    allowed_elements: ErrorCode::SedmlVectorRangeValueMustBeString,
};

/// An explicit list of values, one `<value>` element each.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRange {
    base: BaseFields,
    values: Vec<f64>,
}

impl VectorRange {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            values: Vec::new(),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn set_values(&mut self, values: &[f64]) -> OperationStatus {
        self.values = values.to_vec();
        OperationStatus::Success
    }

    pub fn add_value(&mut self, value: f64) -> OperationStatus {
        self.values.push(value);
        OperationStatus::Success
    }

    pub fn clear_values(&mut self) -> OperationStatus {
        self.values.clear();
        OperationStatus::Success
    }
}

impl SedBase for VectorRange {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &VECTOR_RANGE_INFO
    }

    fn read_other_xml(&mut self, input: &mut dyn XmlInput, ctx: &mut ReadContext<'_>) -> bool {
        let (line, column) = (input.line(), input.column());
        let is_empty = match input.peek() {
            XmlToken::Start(tag) if tag.name == "value" => tag.is_empty,
            _ => return false,
        };
        input.next_token();
        let text = if is_empty {
            String::new()
        } else {
            input.read_text_content()
        };
        match parse_double(&text) {
            Some(value) => self.values.push(value),
            None => {
                let details = format!(
                    "The <value> '{}' of the <vectorRange> is not a number.",
                    text.trim()
                );
                ctx.log_error(ErrorCode::SedmlVectorRangeValueMustBeString, &details, line, column);
            }
        }
        true
    }

    fn write_own_elements(&self, sink: &mut dyn XmlSink) -> Result<(), SedmlError> {
        for value in &self.values {
            sink.start_element("value")?;
            sink.write_text(&format_double(*value))?;
            sink.end_element("value")?;
        }
        Ok(())
    }
}

// --- Functional Range ---

static FUNCTIONAL_RANGE_ATTRIBUTES: &[AttributeSpec] =
    &[AttributeSpec::new("range", AttrKind::SIdRef(TypeCode::Range))
        .required()
        .invalid(ErrorCode::SedmlFunctionalRangeRangeMustBeRange)];

pub(crate) static FUNCTIONAL_RANGE_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::FunctionalRange,
    id_required: true,
    attributes: FUNCTIONAL_RANGE_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlFunctionalRangeAllowedAttributes,
    allowed_elements: ErrorCode::SedmlFunctionalRangeAllowedElements,
};

/// Values computed by `math` from another range, variables and parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalRange {
    base: BaseFields,
    range: Option<String>,
    variables: ListOf<Variable>,
    parameters: ListOf<Parameter>,
    math: Option<String>,
}

impl FunctionalRange {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            range: None,
            variables: ListOf::new("listOfVariables", namespaces),
            parameters: ListOf::new("listOfParameters", namespaces),
            math: None,
        }
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    pub fn set_range(&mut self, range: &str) -> OperationStatus {
        self.set_attribute("range", range)
    }

    pub fn variables(&self) -> &ListOf<Variable> {
        &self.variables
    }

    pub fn create_variable(&mut self) -> &mut Variable {
        let variable = Variable::new(&self.base.namespaces);
        self.variables.append_new(variable)
    }

    pub fn parameters(&self) -> &ListOf<Parameter> {
        &self.parameters
    }

    pub fn create_parameter(&mut self) -> &mut Parameter {
        let parameter = Parameter::new(&self.base.namespaces);
        self.parameters.append_new(parameter)
    }

    pub fn set_math(&mut self, math: &str) -> OperationStatus {
        self.math = Some(math.trim().to_string());
        OperationStatus::Success
    }
}

impl SedBase for FunctionalRange {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &FUNCTIONAL_RANGE_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        (name == "range").then_some(Slot::Str(&self.range))
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        (name == "range").then_some(SlotMut::Str(&mut self.range))
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

sibling_kinds! {
    /// Any range a repeated task can iterate over.
    Range: TypeCode::Range => {
        Uniform(UniformRange) => UNIFORM_RANGE_INFO,
        Vector(VectorRange) => VECTOR_RANGE_INFO,
        Functional(FunctionalRange) => FUNCTIONAL_RANGE_INFO,
    }
}
