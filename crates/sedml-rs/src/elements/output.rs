// crates/sedml-rs/src/elements/output.rs

use super::sibling_kinds;
use crate::attributes::{AttrKind, AttributeSpec, ElementInfo, ReadContext, Slot, SlotMut, XmlEnum};
use crate::base::{BaseFields, SedBase, node_fields};
use crate::diagnostics::ErrorCode;
use crate::error::OperationStatus;
use crate::list_of::{ListOf, list_item};
use crate::types::{SedNamespaces, TypeCode};

// --- Report ---

pub(crate) static REPORT_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::Report,
    id_required: true,
    attributes: &[],
    allowed_attributes: ErrorCode::SedmlOutputAllowedAttributes,
    allowed_elements: ErrorCode::SedmlReportAllowedElements,
};

/// A table of data sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    base: BaseFields,
    data_sets: ListOf<DataSet>,
}

impl Report {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            data_sets: ListOf::new("listOfDataSets", namespaces),
        }
    }

    pub fn data_sets(&self) -> &ListOf<DataSet> {
        &self.data_sets
    }

    pub fn add_data_set(&mut self, data_set: &DataSet) -> OperationStatus {
        self.data_sets.append(data_set)
    }

    pub fn create_data_set(&mut self) -> &mut DataSet {
        let data_set = DataSet::new(&self.base.namespaces);
        self.data_sets.append_new(data_set)
    }
}

impl SedBase for Report {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &REPORT_INFO
    }

    fn children(&self) -> Vec<&dyn SedBase> {
        vec![&self.data_sets]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
        vec![&mut self.data_sets]
    }

    fn create_object(&mut self, name: &str, _ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
        (name == "listOfDataSets").then_some(&mut self.data_sets as &mut dyn SedBase)
    }
}

static DATA_SET_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("label", AttrKind::Str).required(),
    AttributeSpec::new("dataReference", AttrKind::SIdRef(TypeCode::DataGenerator))
        .required()
        .invalid(ErrorCode::SedmlDataSetDataReferenceMustBeDataGenerator),
];

pub(crate) static DATA_SET_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::DataSet,
    id_required: true,
    attributes: DATA_SET_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlDataSetAllowedAttributes,
    allowed_elements: ErrorCode::SedmlDataSetAllowedAttributes,
};

/// One labelled column of a [`Report`].
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    base: BaseFields,
    label: Option<String>,
    data_reference: Option<String>,
}

impl DataSet {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            label: None,
            data_reference: None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: &str) -> OperationStatus {
        self.label = Some(label.to_string());
        OperationStatus::Success
    }

    pub fn data_reference(&self) -> Option<&str> {
        self.data_reference.as_deref()
    }

    pub fn set_data_reference(&mut self, data_generator: &str) -> OperationStatus {
        self.set_attribute("dataReference", data_generator)
    }
}

impl SedBase for DataSet {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &DATA_SET_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "label" => Some(Slot::Str(&self.label)),
            "dataReference" => Some(Slot::Str(&self.data_reference)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "label" => Some(SlotMut::Str(&mut self.label)),
            "dataReference" => Some(SlotMut::Str(&mut self.data_reference)),
            _ => None,
        }
    }
}

// --- 2D Plots ---

pub(crate) static PLOT2D_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::Plot2D,
    id_required: true,
    attributes: &[],
    allowed_attributes: ErrorCode::SedmlPlotAllowedAttributes,
    allowed_elements: ErrorCode::SedmlPlot2DAllowedElements,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Plot2D {
    base: BaseFields,
    curves: ListOf<Curve>,
}

impl Plot2D {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            curves: ListOf::new("listOfCurves", namespaces),
        }
    }

    pub fn curves(&self) -> &ListOf<Curve> {
        &self.curves
    }

    pub fn add_curve(&mut self, curve: &Curve) -> OperationStatus {
        self.curves.append(curve)
    }

    pub fn create_curve(&mut self) -> &mut Curve {
        let curve = Curve::new(&self.base.namespaces);
        self.curves.append_new(curve)
    }
}

impl SedBase for Plot2D {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &PLOT2D_INFO
    }

    fn children(&self) -> Vec<&dyn SedBase> {
        vec![&self.curves]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
        vec![&mut self.curves]
    }

    fn create_object(&mut self, name: &str, _ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
        (name == "listOfCurves").then_some(&mut self.curves as &mut dyn SedBase)
    }
}

static CURVE_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("logX", AttrKind::Bool).invalid(ErrorCode::SedmlAbstractCurveLogXMustBeBoolean),
    AttributeSpec::new("logY", AttrKind::Bool).invalid(ErrorCode::SedmlCurveLogYMustBeBoolean),
    AttributeSpec::new("xDataReference", AttrKind::SIdRef(TypeCode::DataGenerator))
        .required()
        .invalid(ErrorCode::SedmlAbstractCurveXDataReferenceMustBeDataReference),
    AttributeSpec::new("yDataReference", AttrKind::SIdRef(TypeCode::DataGenerator))
        .required()
        .invalid(ErrorCode::SedmlCurveYDataReferenceMustBeDataGenerator),
];

pub(crate) static CURVE_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::Curve,
    id_required: false,
    attributes: CURVE_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlCurveAllowedAttributes,
    allowed_elements: ErrorCode::SedmlCurveAllowedAttributes,
};

/// One line of a [`Plot2D`]: y data against x data.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    base: BaseFields,
    log_x: Option<bool>,
    log_y: Option<bool>,
    x_data_reference: Option<String>,
    y_data_reference: Option<String>,
}

impl Curve {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            log_x: None,
            log_y: None,
            x_data_reference: None,
            y_data_reference: None,
        }
    }

    pub fn log_x(&self) -> Option<bool> {
        self.log_x
    }

    pub fn set_log_x(&mut self, log: bool) -> OperationStatus {
        self.log_x = Some(log);
        OperationStatus::Success
    }

    pub fn log_y(&self) -> Option<bool> {
        self.log_y
    }

    pub fn set_log_y(&mut self, log: bool) -> OperationStatus {
        self.log_y = Some(log);
        OperationStatus::Success
    }

    pub fn x_data_reference(&self) -> Option<&str> {
        self.x_data_reference.as_deref()
    }

    pub fn set_x_data_reference(&mut self, data_generator: &str) -> OperationStatus {
        self.set_attribute("xDataReference", data_generator)
    }

    pub fn y_data_reference(&self) -> Option<&str> {
        self.y_data_reference.as_deref()
    }

    pub fn set_y_data_reference(&mut self, data_generator: &str) -> OperationStatus {
        self.set_attribute("yDataReference", data_generator)
    }
}

impl SedBase for Curve {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &CURVE_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "logX" => Some(Slot::Bool(&self.log_x)),
            "logY" => Some(Slot::Bool(&self.log_y)),
            "xDataReference" => Some(Slot::Str(&self.x_data_reference)),
            "yDataReference" => Some(Slot::Str(&self.y_data_reference)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "logX" => Some(SlotMut::Bool(&mut self.log_x)),
            "logY" => Some(SlotMut::Bool(&mut self.log_y)),
            "xDataReference" => Some(SlotMut::Str(&mut self.x_data_reference)),
            "yDataReference" => Some(SlotMut::Str(&mut self.y_data_reference)),
            _ => None,
        }
    }
}

// --- 3D Plots ---

pub(crate) static PLOT3D_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::Plot3D,
    id_required: true,
    attributes: &[],
    allowed_attributes: ErrorCode::SedmlPlotAllowedAttributes,
    allowed_elements: ErrorCode::SedmlPlot3DAllowedElements,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Plot3D {
    base: BaseFields,
    surfaces: ListOf<Surface>,
}

impl Plot3D {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            surfaces: ListOf::new("listOfSurfaces", namespaces),
        }
    }

    pub fn surfaces(&self) -> &ListOf<Surface> {
        &self.surfaces
    }

    pub fn add_surface(&mut self, surface: &Surface) -> OperationStatus {
        self.surfaces.append(surface)
    }

    pub fn create_surface(&mut self) -> &mut Surface {
        let surface = Surface::new(&self.base.namespaces);
        self.surfaces.append_new(surface)
    }
}

impl SedBase for Plot3D {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &PLOT3D_INFO
    }

    fn children(&self) -> Vec<&dyn SedBase> {
        vec![&self.surfaces]
    }

    fn children_mut(&mut self) -> Vec<&mut dyn SedBase> {
        vec![&mut self.surfaces]
    }

    fn create_object(&mut self, name: &str, _ctx: &mut ReadContext<'_>) -> Option<&mut dyn SedBase> {
        (name == "listOfSurfaces").then_some(&mut self.surfaces as &mut dyn SedBase)
    }
}

/// How a [`Surface`] is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceType {
    ParametricCurve,
    SurfaceMesh,
    SurfaceContour,
    Contour,
    HeatMap,
    StackedCurves,
    Bar,
}

impl XmlEnum for SurfaceType {
    const VALUES: &'static [(Self, &'static str)] = &[
        (SurfaceType::ParametricCurve, "parametricCurve"),
        (SurfaceType::SurfaceMesh, "surfaceMesh"),
        (SurfaceType::SurfaceContour, "surfaceContour"),
        (SurfaceType::Contour, "contour"),
        (SurfaceType::HeatMap, "heatMap"),
        (SurfaceType::StackedCurves, "stackedCurves"),
        (SurfaceType::Bar, "bar"),
    ];

    fn from_xml(text: &str) -> Option<Self> {
        Self::VALUES
            .iter()
            .find(|(_, name)| *name == text)
            .map(|(value, _)| *value)
    }

    fn as_xml(self) -> &'static str {
        Self::VALUES
            .iter()
            .find(|(value, _)| *value == self)
            .map_or("", |(_, name)| *name)
    }
}

static SURFACE_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new("logX", AttrKind::Bool).invalid(ErrorCode::SedmlSurfaceLogXMustBeBoolean),
    AttributeSpec::new("logY", AttrKind::Bool).invalid(ErrorCode::SedmlSurfaceLogYMustBeBoolean),
    AttributeSpec::new("logZ", AttrKind::Bool).invalid(ErrorCode::SedmlSurfaceLogZMustBeBoolean),
    AttributeSpec::new("xDataReference", AttrKind::SIdRef(TypeCode::DataGenerator))
        .required()
        .invalid(ErrorCode::SedmlSurfaceXDataReferenceMustBeDataGenerator),
    AttributeSpec::new("yDataReference", AttrKind::SIdRef(TypeCode::DataGenerator))
        .required()
        .invalid(ErrorCode::SedmlSurfaceYDataReferenceMustBeDataGenerator),
    AttributeSpec::new("zDataReference", AttrKind::SIdRef(TypeCode::DataGenerator))
        .required()
        .invalid(ErrorCode::SedmlSurfaceZDataReferenceMustBeDataGenerator),
    AttributeSpec::new("type", AttrKind::Enum).invalid(ErrorCode::SedmlSurfaceTypeMustBeSurfaceTypeEnum),
];

pub(crate) static SURFACE_INFO: ElementInfo = ElementInfo {
    type_code: TypeCode::Surface,
    id_required: false,
    attributes: SURFACE_ATTRIBUTES,
    allowed_attributes: ErrorCode::SedmlSurfaceAllowedAttributes,
    allowed_elements: ErrorCode::SedmlSurfaceAllowedAttributes,
};

/// One surface of a [`Plot3D`]: z data over x and y data.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    base: BaseFields,
    log_x: Option<bool>,
    log_y: Option<bool>,
    log_z: Option<bool>,
    x_data_reference: Option<String>,
    y_data_reference: Option<String>,
    z_data_reference: Option<String>,
    surface_type: Option<SurfaceType>,
}

impl Surface {
    pub fn new(namespaces: &SedNamespaces) -> Self {
        Self {
            base: BaseFields::new(namespaces),
            log_x: None,
            log_y: None,
            log_z: None,
            x_data_reference: None,
            y_data_reference: None,
            z_data_reference: None,
            surface_type: None,
        }
    }

    pub fn log_z(&self) -> Option<bool> {
        self.log_z
    }

    pub fn set_log_z(&mut self, log: bool) -> OperationStatus {
        self.log_z = Some(log);
        OperationStatus::Success
    }

    pub fn x_data_reference(&self) -> Option<&str> {
        self.x_data_reference.as_deref()
    }

    pub fn set_x_data_reference(&mut self, data_generator: &str) -> OperationStatus {
        self.set_attribute("xDataReference", data_generator)
    }

    pub fn y_data_reference(&self) -> Option<&str> {
        self.y_data_reference.as_deref()
    }

    pub fn set_y_data_reference(&mut self, data_generator: &str) -> OperationStatus {
        self.set_attribute("yDataReference", data_generator)
    }

    pub fn z_data_reference(&self) -> Option<&str> {
        self.z_data_reference.as_deref()
    }

    pub fn set_z_data_reference(&mut self, data_generator: &str) -> OperationStatus {
        self.set_attribute("zDataReference", data_generator)
    }

    pub fn surface_type(&self) -> Option<SurfaceType> {
        self.surface_type
    }

    pub fn set_surface_type(&mut self, surface_type: SurfaceType) -> OperationStatus {
        self.surface_type = Some(surface_type);
        OperationStatus::Success
    }
}

impl SedBase for Surface {
    node_fields!();

    fn info(&self) -> &'static ElementInfo {
        &SURFACE_INFO
    }

    fn slot(&self, name: &str) -> Option<Slot<'_>> {
        match name {
            "logX" => Some(Slot::Bool(&self.log_x)),
            "logY" => Some(Slot::Bool(&self.log_y)),
            "logZ" => Some(Slot::Bool(&self.log_z)),
            "xDataReference" => Some(Slot::Str(&self.x_data_reference)),
            "yDataReference" => Some(Slot::Str(&self.y_data_reference)),
            "zDataReference" => Some(Slot::Str(&self.z_data_reference)),
            "type" => Some(Slot::Enum(&self.surface_type)),
            _ => None,
        }
    }

    fn slot_mut(&mut self, name: &str) -> Option<SlotMut<'_>> {
        match name {
            "logX" => Some(SlotMut::Bool(&mut self.log_x)),
            "logY" => Some(SlotMut::Bool(&mut self.log_y)),
            "logZ" => Some(SlotMut::Bool(&mut self.log_z)),
            "xDataReference" => Some(SlotMut::Str(&mut self.x_data_reference)),
            "yDataReference" => Some(SlotMut::Str(&mut self.y_data_reference)),
            "zDataReference" => Some(SlotMut::Str(&mut self.z_data_reference)),
            "type" => Some(SlotMut::Enum(&mut self.surface_type)),
            _ => None,
        }
    }
}

list_item!(
    DataSet => DATA_SET_INFO,
    Curve => CURVE_INFO,
    Surface => SURFACE_INFO,
);

sibling_kinds! {
    /// Any output: a report or a plot.
    Output: TypeCode::Output => {
        Report(Report) => REPORT_INFO,
        Plot2D(Plot2D) => PLOT2D_INFO,
        Plot3D(Plot3D) => PLOT3D_INFO,
    }
}
