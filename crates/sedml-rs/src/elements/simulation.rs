// crates/sedml-rs/src/elements/simulation.rs

use super::sibling_kinds;
use crate::attributes::{AttrKind, AttributeSpec, ElementInfo, ReadContext, Slot, SlotMut};
use crate::base::{BaseFields, SedBase, adopt_child, node_fields};
use crate::diagnostics::ErrorCode;
use crate::error::OperationStatus;
use crate::list_of::{ListOf, list_item};
use crate::types::{SedNamespaces, TypeCode};

// --- Algorithm ---

static ALGORITHM_ATTRIBUTES: &[AttributeSpec] =
    &[AttributeSpec::new("kisaoID", AttrKind::Str).required()];

pub(crate) static ALGORITHM_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::Algorithm,
    id_required: false,
    attributes: ALGORITHM_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlAlgorithmAllowedAttributes,
    allowed_elements: ErrorCode::SedmlAlgorithmAllowedElements,
};

/// The KiSAO-identified algorithm a simulation runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct Algorithm {
    base: BaseFields,
    kisao_id: Option<String>,
    parameters: ListOf<AlgorithmParameter>,
}

impl Algorithm {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            kisao_id: None,
            parameters: ListOf::new("listOfAlgorithmParameters", namespaces),
        }
    }

    pub fn kisao_id(&self) -> Option<&str> {
        self.kisao_id.as_deref()
    }

    pub fn set_kisao_id(&mut self, kisao_id: &str) -> OperationStatus {
        self.kisao_id = Some(kisao_id.to_string());
        OperationStatus::Success
    }

    pub fn parameters(&self) -> &ListOf<AlgorithmParameter> {
        &self.parameters
    }

    pub fn add_parameter(&mut self, parameter: &AlgorithmParameter) -> OperationStatus {
        self.parameters.append(parameter)
    }

    pub fn create_parameter(&mut self) -> &mut AlgorithmParameter {
        let parameter = AlgorithmParameter::new(&self.base.namespaces);
        self.parameters.append_new(parameter)
    }
}

impl SedBase for Algorithm {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &ALGORITHM_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        (name == "kisaoID").then_some(Slot::Str(&self.kisao_id))
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        (name == "kisaoID").then_some(SlotMut::Str(&mut self.kisao_id))
    }

    fn children(&self) -> Vec<&dyn SedBase> {
        vec![&self.parameters]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
        vec![&mut self.parameters]
    }

    fn create_object(&mut self, name: &str, _ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
        (name == "listOfAlgorithmParameters").then_some(&mut self.parameters as &mut dyn SedBase)
    }
}

static ALGORITHM_PARAMETER_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("kisaoID", AttrKind::Str).required(),
    AttributeSpec::new("value", AttrKind::Str).required(),
];

pub(crate) static ALGORITHM_PARAMETER_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::AlgorithmParameter,
    id_required: false,
    attributes: ALGORITHM_PARAMETER_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlAlgorithmParameterAllowedAttributes,
    allowed_elements: ErrorCode::SedmlAlgorithmParameterAllowedElements,
};

/// A KiSAO-identified setting of an algorithm. May nest further parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmParameter {
    base: BaseFields,
    kisao_id: Option<String>,
    value: Option<String>,
    parameters: ListOf<AlgorithmParameter>,
}

impl AlgorithmParameter {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            kisao_id: None,
            value: None,
            parameters: ListOf::new("listOfAlgorithmParameters", namespaces),
        }
    }

    pub fn kisao_id(&self) -> Option<&str> {
        self.kisao_id.as_deref()
    }

    pub fn set_kisao_id(&mut self, kisao_id: &str) -> OperationStatus {
        self.kisao_id = Some(kisao_id.to_string());
        OperationStatus::Success
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: &str) -> OperationStatus {
        self.value = Some(value.to_string());
        OperationStatus::Success
    }

    pub fn parameters(&self) -> &ListOf<AlgorithmParameter> {
        &self.parameters
    }

    pub fn create_parameter(&mut self) -> &mut AlgorithmParameter {
        let parameter = AlgorithmParameter::new(&self.base.namespaces);
        self.parameters.append_new(parameter)
    }
}

impl SedBase for AlgorithmParameter {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &ALGORITHM_PARAMETER_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "kisaoID" => Some(Slot::Str(&self.kisao_id)),
            "value" => Some(Slot::Str(&self.value)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "kisaoID" => Some(SlotMut::Str(&mut self.kisao_id)),
            "value" => Some(SlotMut::Str(&mut self.value)),
            _ => None,
        }
    }

    fn children(&self) -> Vec<&dyn SedBase> {
        vec![&self.parameters]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
        vec![&mut self.parameters]
    }

    fn create_object(&mut self, name: &str, _ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
        (name == "listOfAlgorithmParameters").then_some(&mut self.parameters as &mut dyn SedBase)
    }
}

// --- Simulations ---

/// The `algorithm` child shared by every simulation kind.
macro_rules! algorithm_child {
    () => {
        pub fn algorithm(&self) -> Option<&Algorithm> {
            self.algorithm.as_ref()
        }

        pub fn algorithm_mut(&mut self) -> Option<&mut Algorithm> {
            self.algorithm.as_mut()
        }

        /// Replaces the algorithm with a copy of `algorithm`.
        pub fn set_algorithm(&mut self, algorithm: &Algorithm) -> OperationStatus {
            if algorithm.level() != self.level() {
                return OperationStatus::LevelMismatch;
            }
            if algorithm.version() != self.version() {
                return OperationStatus::VersionMismatch;
            }
            let mut copy = algorithm.clone();
            adopt_child(&self.base, &mut copy);
            self.algorithm = Some(copy);
            OperationStatus::Success
        }

        pub fn create_algorithm(&mut self) -> &mut Algorithm {
            let mut algorithm = Algorithm::new(&self.base.namespaces);
            adopt_child(&self.base, &mut algorithm);
            self.algorithm.insert(algorithm)
        }

        pub fn unset_algorithm(&mut self) -> OperationStatus {
            self.algorithm = None;
            OperationStatus::Success
        }
    };
}

/// `SedBase` methods for the `algorithm` child.
macro_rules! algorithm_node_methods {
    () => {
        fn children(&self) -> Vec<&dyn SedBase> {
            self.algorithm
                .iter()
                .map(|algorithm| algorithm as &dyn SedBase)
                .collect()
        }

        fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
            self.algorithm
                .iter_mut()
                .map(|algorithm| algorithm as &mut dyn SedBase)
                .collect()
        }

        fn missing_required_elements(&self) -> Vec<&'static str> {
            if self.algorithm.is_none() {
                vec!["algorithm"]
            } else {
                Vec::new()
            }
        }

        fn create_object(&mut self, name: &str, ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
            if name != "algorithm" {
                return None;
            }
            if self.algorithm.is_some() {
                let details = format!(
                    "Only one <algorithm> element is permitted inside <{}>.",
                    self.element_name()
                );
                ctx.log_error(
                    self.info().allowed_elements,
                    &details,
                    self.base.line(),
                    self.base.column(),
                );
            }
            let algorithm = Algorithm::new(&self.base.namespaces);
            Some(self.algorithm.insert(algorithm) as &mut dyn SedBase)
        }
    };
}

static UNIFORM_TIME_COURSE_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("initialTime", AttrKind::Double)
        .required()
        .invalid(ErrorCode::SedmlUniformTimeCourseInitialTimeMustBeDouble),
    AttributeSpec::new("outputStartTime", AttrKind::Double)
        .required()
        .invalid(ErrorCode::SedmlUniformTimeCourseOutputStartTimeMustBeDouble),
    AttributeSpec::new("outputEndTime", AttrKind::Double)
        .required()
        .invalid(ErrorCode::SedmlUniformTimeCourseOutputEndTimeMustBeDouble),
    AttributeSpec::new("numberOfPoints", AttrKind::Int)
        .required()
        .invalid(ErrorCode::SedmlUniformTimeCourseNumberOfPointsMustBeInteger),
];

pub(crate) static UNIFORM_TIME_COURSE_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::UniformTimeCourse,
    id_required: true,
    attributes: UNIFORM_TIME_COURSE_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlUniformTimeCourseAllowedAttributes,
    allowed_elements: ErrorCode::SedmlSimulationAllowedElements,
};

/// A time course sampled at `numberOfPoints` evenly spaced outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformTimeCourse {
    base: BaseFields,
    initial_time: Option<f64>,
    output_start_time: Option<f64>,
    output_end_time: Option<f64>,
    number_of_points: Option<i32>,
    algorithm: Option<Algorithm>,
}

impl UniformTimeCourse {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            initial_time: None,
            output_start_time: None,
            output_end_time: None,
            number_of_points: None,
            algorithm: None,
        }
    }

    pub fn initial_time(&self) -> Option<f64> {
        self.initial_time
    }

    pub fn set_initial_time(&mut self, time: f64) -> OperationStatus {
        self.initial_time = Some(time);
        OperationStatus::Success
    }

    pub fn output_start_time(&self) -> Option<f64> {
        self.output_start_time
    }

    pub fn set_output_start_time(&mut self, time: f64) -> OperationStatus {
        self.output_start_time = Some(time);
        OperationStatus::Success
    }

    pub fn output_end_time(&self) -> Option<f64> {
        self.output_end_time
    }

    pub fn set_output_end_time(&mut self, time: f64) -> OperationStatus {
        self.output_end_time = Some(time);
        OperationStatus::Success
    }

    pub fn number_of_points(&self) -> Option<i32> {
        self.number_of_points
    }

    pub fn set_number_of_points(&mut self, points: i32) -> OperationStatus {
        self.number_of_points = Some(points);
        OperationStatus::Success
    }

    pub fn unset_number_of_points(&mut self) -> OperationStatus {
        self.number_of_points = None;
        OperationStatus::Success
    }

    algorithm_child!();
}

impl SedBase for UniformTimeCourse {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &UNIFORM_TIME_COURSE_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "initialTime" => Some(Slot::Double(&self.initial_time)),
            "outputStartTime" => Some(Slot::Double(&self.output_start_time)),
            "outputEndTime" => Some(Slot::Double(&self.output_end_time)),
            "numberOfPoints" => Some(Slot::Int(&self.number_of_points)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "initialTime" => Some(SlotMut::Double(&mut self.initial_time)),
            "outputStartTime" => Some(SlotMut::Double(&mut self.output_start_time)),
            "outputEndTime" => Some(SlotMut::Double(&mut self.output_end_time)),
            "numberOfPoints" => Some(SlotMut::Int(&mut self.number_of_points)),
            _ => None,
        }
    }

    algorithm_node_methods!();
}

static ONE_STEP_ATTRIBUTES: &[AttributeSpec] = &[AttributeSpec::new("step", AttrKind::Double)
    .required()
    .invalid(ErrorCode::SedmlOneStepStepMustBeDouble)];

pub(crate) static ONE_STEP_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::OneStep,
    id_required: true,
    attributes: ONE_STEP_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlOneStepAllowedAttributes,
    allowed_elements: ErrorCode::SedmlSimulationAllowedElements,
};

/// Advances the model by a single `step`.
#[derive(Debug, Clone, PartialEq)]
pub struct OneStep {
    base: BaseFields,
    step: Option<f64>,
    algorithm: Option<Algorithm>,
}

impl OneStep {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            step: None,
            algorithm: None,
        }
    }

    pub fn step(&self) -> Option<f64> {
        self.step
    }

    pub fn set_step(&mut self, step: f64) -> OperationStatus {
        self.step = Some(step);
        OperationStatus::Success
    }

    algorithm_child!();
}

impl SedBase for OneStep {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &ONE_STEP_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        (name == "step").then_some(Slot::Double(&self.step))
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        (name == "step").then_some(SlotMut::Double(&mut self.step))
    }

    algorithm_node_methods!();
}

pub(crate) static STEADY_STATE_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::SteadyState,
    id_required: true,
    attributes: &[],
    allowed_attributes: ErrorCode::SedmlSimulationAllowedAttributes,
    allowed_elements: ErrorCode::SedmlSimulationAllowedElements,
};

/// Runs the model to a steady state.
#[derive(Debug, Clone, PartialEq)]
pub struct SteadyState {
    base: BaseFields,
    algorithm: Option<Algorithm>,
}

impl SteadyState {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            algorithm: None,
        }
    }

    algorithm_child!();
}

impl SedBase for SteadyState {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &STEADY_STATE_INFO
    }

    algorithm_node_methods!();
}

list_item!(
    AlgorithmParameter => ALGORITHM_PARAMETER_INFO,
);

sibling_kinds! {
    /// Any simulation setup.
    Simulation: TypeCode::Simulation => {
        UniformTimeCourse(UniformTimeCourse) => UNIFORM_TIME_COURSE_INFO,
        OneStep(OneStep) => ONE_STEP_INFO,
        SteadyState(SteadyState) => STEADY_STATE_INFO,
    }
}

impl Simulation {
    pub fn algorithm(&self) -> Option<&Algorithm> {
        match self {
            Simulation::UniformTimeCourse(sim) => sim.algorithm(),
            Simulation::OneStep(sim) => sim.algorithm(),
            Simulation::SteadyState(sim) => sim.algorithm(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorLog;

    #[test]
    fn test_time_course_required_attributes() {
        let mut sim = UniformTimeCourse::new(&SedNamespaces::default());
        let _ = sim.set_id("sim1");
        let _ = sim.set_initial_time(0.0);
        let _ = sim.set_output_start_time(0.0);
        let _ = sim.set_output_end_time(10.0);
        assert_eq!(sim.missing_required_attributes(), vec!["numberOfPoints"]);

        let _ = sim.set_number_of_points(100);
        assert!(sim.has_required_attributes());
        assert_eq!(sim.get_attribute("outputEndTime").as_deref(), Some("10"));

        // Presence is tracked separately from the value.
        let _ = sim.set_initial_time(0.0);
        assert!(sim.is_set_attribute("initialTime"));
    }

    #[test]
    fn test_algorithm_is_a_required_element() {
        let mut sim = SteadyState::new(&SedNamespaces::default());
        assert_eq!(sim.missing_required_elements(), vec!["algorithm"]);
        let _ = sim.create_algorithm().set_kisao_id("KISAO:0000019");
        assert!(sim.has_required_elements());
        assert_eq!(
            sim.algorithm().unwrap().base().parent(),
            Some(sim.base().key())
        );
    }

    #[test]
    fn test_second_algorithm_is_reported() {
        let mut sim = OneStep::new(&SedNamespaces::default());
        let mut log = ErrorLog::new();
        let mut ctx = ReadContext::new(&mut log, 1, 4);
        assert!(sim.create_object("algorithm", &mut ctx).is_some());
        assert!(sim.create_object("algorithm", &mut ctx).is_some());
        assert!(sim.create_object("listOfTasks", &mut ctx).is_none());
        assert_eq!(log.num_errors(), 1);
        assert!(log.contains(ErrorCode::SedmlSimulationAllowedElements));
    }

    #[test]
    fn test_nested_algorithm_parameters() {
        let mut algorithm = Algorithm::new(&SedNamespaces::default());
        let parameter = algorithm.create_parameter();
        let _ = parameter.set_kisao_id("KISAO:0000211");
        let _ = parameter.set_value("1e-7");
        let _ = parameter.create_parameter().set_kisao_id("KISAO:0000212");

        let found = algorithm.get_all_elements(Some(&|node: &dyn SedBase| {
            node.type_code() == TypeCode::AlgorithmParameter
        }));
        assert_eq!(found.len(), 2);
    }
}
