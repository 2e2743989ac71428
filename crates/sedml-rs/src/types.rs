// crates/sedml-rs/src/types.rs

//! Element kind registry and SED-ML namespace/revision handling.

use crate::error::SedmlError;
use core::fmt;
use serde::{Deserialize, Serialize};

// --- Type Codes ---

/// Stable tag identifying the kind of every tree node.
///
/// The integer values follow the numbering used by other SED-ML libraries, so
/// they are not contiguous: kinds this crate does not model are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum TypeCode {
    Unknown = 0,
    Document = 1,
    Model = 2,
    Change = 3,
    ChangeAttribute = 5,
    Variable = 6,
    Parameter = 7,
    Simulation = 8,
    UniformTimeCourse = 9,
    Algorithm = 10,
    AbstractTask = 11,
    Task = 12,
    DataGenerator = 13,
    Output = 14,
    Plot2D = 16,
    Plot3D = 17,
    Curve = 19,
    Surface = 20,
    DataSet = 21,
    Report = 22,
    AlgorithmParameter = 23,
    Range = 24,
    RemoveXml = 26,
    SetValue = 27,
    UniformRange = 28,
    VectorRange = 29,
    FunctionalRange = 30,
    SubTask = 31,
    OneStep = 33,
    SteadyState = 34,
    RepeatedTask = 35,
    ListOf = 61,
}

/// (kind, class name, XML element name, abstract parent kind)
const REGISTRY: &[(TypeCode, &str, &str, Option<TypeCode>)] = &[
    (TypeCode::Unknown, "(Unknown SED-ML Type)", "", None),
    (TypeCode::Document, "SedDocument", "sedML", None),
    (TypeCode::Model, "Model", "model", None),
    (TypeCode::Change, "Change", "change", None),
    (TypeCode::ChangeAttribute, "ChangeAttribute", "changeAttribute", Some(TypeCode::Change)),
    (TypeCode::Variable, "Variable", "variable", None),
    (TypeCode::Parameter, "Parameter", "parameter", None),
    (TypeCode::Simulation, "Simulation", "simulation", None),
    (TypeCode::UniformTimeCourse, "UniformTimeCourse", "uniformTimeCourse", Some(TypeCode::Simulation)),
    (TypeCode::Algorithm, "Algorithm", "algorithm", None),
    (TypeCode::AbstractTask, "AbstractTask", "abstractTask", None),
    (TypeCode::Task, "Task", "task", Some(TypeCode::AbstractTask)),
    (TypeCode::DataGenerator, "DataGenerator", "dataGenerator", None),
    (TypeCode::Output, "Output", "output", None),
    (TypeCode::Plot2D, "Plot2D", "plot2D", Some(TypeCode::Output)),
    (TypeCode::Plot3D, "Plot3D", "plot3D", Some(TypeCode::Output)),
    (TypeCode::Curve, "Curve", "curve", None),
    (TypeCode::Surface, "Surface", "surface", None),
    (TypeCode::DataSet, "DataSet", "dataSet", None),
    (TypeCode::Report, "Report", "report", Some(TypeCode::Output)),
    (TypeCode::AlgorithmParameter, "AlgorithmParameter", "algorithmParameter", None),
    (TypeCode::Range, "Range", "range", None),
    (TypeCode::RemoveXml, "RemoveXML", "removeXML", Some(TypeCode::Change)),
    (TypeCode::SetValue, "SetValue", "setValue", None),
    (TypeCode::UniformRange, "UniformRange", "uniformRange", Some(TypeCode::Range)),
    (TypeCode::VectorRange, "VectorRange", "vectorRange", Some(TypeCode::Range)),
    (TypeCode::FunctionalRange, "FunctionalRange", "functionalRange", Some(TypeCode::Range)),
    (TypeCode::SubTask, "SubTask", "subTask", None),
    (TypeCode::OneStep, "OneStep", "oneStep", Some(TypeCode::Simulation)),
    (TypeCode::SteadyState, "SteadyState", "steadyState", Some(TypeCode::Simulation)),
    (TypeCode::RepeatedTask, "RepeatedTask", "repeatedTask", Some(TypeCode::AbstractTask)),
    (TypeCode::ListOf, "SedListOf", "listOf", None),
];

/// Kinds that only exist as the shared base of a closed set of siblings.
const ABSTRACT_KINDS: &[TypeCode] = &[
    TypeCode::Change,
    TypeCode::Simulation,
    TypeCode::AbstractTask,
    TypeCode::Output,
    TypeCode::Range,
];

impl TypeCode {
    fn entry(self) -> &'static (TypeCode, &'static str, &'static str, Option<TypeCode>) {
        // Every variant has a registry row; Unknown is the first one.
        REGISTRY
            .iter()
            .find(|(code, ..)| *code == self)
            .unwrap_or(&REGISTRY[0])
    }

    /// The stable numeric value.
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        REGISTRY.iter().map(|e| e.0).find(|c| c.code() == code)
    }

    /// Human-readable class name, e.g. `"Model"` or `"SedListOf"`.
    pub fn as_str(self) -> &'static str {
        self.entry().1
    }

    /// The XML element name used when reading and writing this kind.
    pub fn element_name(self) -> &'static str {
        self.entry().2
    }

    pub fn is_abstract(self) -> bool {
        ABSTRACT_KINDS.contains(&self)
    }

    /// The abstract kind this kind belongs to, if any.
    pub fn parent_kind(self) -> Option<Self> {
        self.entry().3
    }

    /// `true` if `self` is `kind` or one of its concrete subkinds.
    pub fn is_a(self, kind: TypeCode) -> bool {
        self == kind || self.parent_kind() == Some(kind)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Namespaces ---

pub const DEFAULT_LEVEL: u32 = 1;
pub const DEFAULT_VERSION: u32 = 4;

pub const SEDML_XMLNS_L1V1: &str = "http://sed-ml.org/";
pub const SEDML_XMLNS_L1V2: &str = "http://sed-ml.org/sed-ml/level1/version2";
pub const SEDML_XMLNS_L1V3: &str = "http://sed-ml.org/sed-ml/level1/version3";
pub const SEDML_XMLNS_L1V4: &str = "http://sed-ml.org/sed-ml/level1/version4";
pub const SEDML_XMLNS_L1V5: &str = "http://sed-ml.org/sed-ml/level1/version5";

const SUPPORTED_REVISIONS: &[(u32, u32, &str)] = &[
    (1, 1, SEDML_XMLNS_L1V1),
    (1, 2, SEDML_XMLNS_L1V2),
    (1, 3, SEDML_XMLNS_L1V3),
    (1, 4, SEDML_XMLNS_L1V4),
    (1, 5, SEDML_XMLNS_L1V5),
];

/// An additional `xmlns` declaration carried alongside the SED-ML namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDecl {
    /// `None` for a default namespace declaration.
    pub prefix: Option<String>,
    pub uri: String,
}

/// The SED-ML revision a node was built against, plus extra namespace declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SedNamespaces {
    level: u32,
    version: u32,
    uri: String,
    extra: Vec<NamespaceDecl>,
}

impl SedNamespaces {
    /// Creates the namespace set for a supported level/version pair.
    pub fn new(level: u32, version: u32) -> Result<Self, SedmlError> {
        let uri = Self::uri_for(level, version)
            .ok_or(SedmlError::InvalidLevelVersion { level, version })?;
        Ok(Self {
            level,
            version,
            uri: uri.to_string(),
            extra: Vec::new(),
        })
    }

    pub fn uri_for(level: u32, version: u32) -> Option<&'static str> {
        SUPPORTED_REVISIONS
            .iter()
            .find(|(l, v, _)| *l == level && *v == version)
            .map(|(_, _, uri)| *uri)
    }

    /// The (level, version) pair a SED-ML namespace URI stands for.
    pub fn level_version_for_uri(uri: &str) -> Option<(u32, u32)> {
        SUPPORTED_REVISIONS
            .iter()
            .find(|(_, _, u)| *u == uri)
            .map(|(l, v, _)| (*l, *v))
    }

    pub fn is_sedml_uri(uri: &str) -> bool {
        Self::level_version_for_uri(uri).is_some()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn extra_namespaces(&self) -> &[NamespaceDecl] {
        &self.extra
    }

    /// Adds (or replaces) a prefixed namespace declaration.
    ///
    /// Declarations of a SED-ML URI itself are ignored; that one is implied
    /// by the level/version pair.
    pub fn add_namespace(&mut self, prefix: Option<&str>, uri: &str) {
        if prefix.is_none() && Self::is_sedml_uri(uri) {
            return;
        }
        let prefix = prefix.map(str::to_string);
        match self.extra.iter_mut().find(|d| d.prefix == prefix) {
            Some(existing) => existing.uri = uri.to_string(),
            None => self.extra.push(NamespaceDecl {
                prefix,
                uri: uri.to_string(),
            }),
        }
    }

    pub fn remove_namespace(&mut self, prefix: Option<&str>) -> bool {
        let before = self.extra.len();
        self.extra.retain(|d| d.prefix.as_deref() != prefix);
        before != self.extra.len()
    }

    pub fn has_namespace_uri(&self, uri: &str) -> bool {
        self.uri == uri || self.extra.iter().any(|d| d.uri == uri)
    }

    /// Whether an object carrying `other` may be added to a tree carrying `self`.
    ///
    /// The SED-ML URIs must agree and every extra namespace `other` relies on
    /// must also be declared here.
    pub fn accepts(&self, other: &SedNamespaces) -> bool {
        self.uri == other.uri && other.extra.iter().all(|d| self.has_namespace_uri(&d.uri))
    }
}

impl Default for SedNamespaces {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            version: DEFAULT_VERSION,
            uri: SEDML_XMLNS_L1V4.to_string(),
            extra: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes_match_registry() {
        assert_eq!(TypeCode::Document.code(), 1);
        assert_eq!(TypeCode::Surface.code(), 20);
        assert_eq!(TypeCode::RepeatedTask.code(), 35);
        assert_eq!(TypeCode::ListOf.code(), 61);
        assert_eq!(TypeCode::from_code(12), Some(TypeCode::Task));
        assert_eq!(TypeCode::from_code(4), None);
        assert_eq!(TypeCode::ListOf.as_str(), "SedListOf");
        assert_eq!(TypeCode::RemoveXml.element_name(), "removeXML");
    }

    #[test]
    fn test_is_a() {
        assert!(TypeCode::OneStep.is_a(TypeCode::Simulation));
        assert!(TypeCode::Simulation.is_a(TypeCode::Simulation));
        assert!(TypeCode::RepeatedTask.is_a(TypeCode::AbstractTask));
        assert!(!TypeCode::Model.is_a(TypeCode::Simulation));
    }

    #[test]
    fn test_namespace_table() {
        let ns = SedNamespaces::new(1, 3).unwrap();
        assert_eq!(ns.uri(), SEDML_XMLNS_L1V3);
        assert_eq!(
            SedNamespaces::level_version_for_uri(SEDML_XMLNS_L1V1),
            Some((1, 1))
        );
        assert!(matches!(
            SedNamespaces::new(2, 1),
            Err(SedmlError::InvalidLevelVersion {
                level: 2,
                version: 1
            })
        ));
        let default = SedNamespaces::default();
        assert_eq!((default.level(), default.version()), (1, 4));
    }

    #[test]
    fn test_namespace_acceptance() {
        let mut doc_ns = SedNamespaces::new(1, 4).unwrap();
        let mut node_ns = SedNamespaces::new(1, 4).unwrap();
        assert!(doc_ns.accepts(&node_ns));

        node_ns.add_namespace(Some("sbml"), "http://www.sbml.org/sbml/level2/version3");
        assert!(!doc_ns.accepts(&node_ns));

        doc_ns.add_namespace(Some("sbml"), "http://www.sbml.org/sbml/level2/version3");
        assert!(doc_ns.accepts(&node_ns));

        let other_revision = SedNamespaces::new(1, 3).unwrap();
        assert!(!doc_ns.accepts(&other_revision));
    }

    #[test]
    fn test_add_namespace_replaces_prefix() {
        let mut ns = SedNamespaces::default();
        ns.add_namespace(Some("math"), "urn:a");
        ns.add_namespace(Some("math"), "urn:b");
        ns.add_namespace(None, SEDML_XMLNS_L1V4);
        assert_eq!(ns.extra_namespaces().len(), 1);
        assert_eq!(ns.extra_namespaces()[0].uri, "urn:b");
        assert!(ns.remove_namespace(Some("math")));
        assert!(ns.extra_namespaces().is_empty());
    }
}
