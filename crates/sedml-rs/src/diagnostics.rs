// crates/sedml-rs/src/diagnostics.rs

//! Diagnostic records and the per-document error log.
//!
//! Every content problem found while reading or validating a document is
//! appended to an [`ErrorLog`] as a [`SedError`]. The numeric values of
//! [`ErrorCode`] are those used by other SED-ML tools, so logs can be compared
//! across implementations.

use core::fmt;
use log::warn;
use serde::{Deserialize, Serialize};
use std::io;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

/// Broad grouping of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Internal,
    System,
    Xml,
    Sedml,
    GeneralConsistency,
    IdentifierConsistency,
}

macro_rules! error_codes {
    ($( $name:ident = $value:literal, $category:ident, $severity:ident, $msg:literal; )*) => {
        /// Identifies the kind of a diagnostic. Discriminants are the stable numeric ids.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(u32)]
        pub enum ErrorCode {
            $( $name = $value, )*
        }

        impl ErrorCode {
            /// Every known code, in ascending numeric order.
            pub const ALL: &'static [ErrorCode] = &[ $( ErrorCode::$name, )* ];

            pub fn category(self) -> Category {
                match self {
                    $( ErrorCode::$name => Category::$category, )*
                }
            }

            pub fn default_severity(self) -> Severity {
                match self {
                    $( ErrorCode::$name => Severity::$severity, )*
                }
            }

            /// One-line description of the rule behind this code.
            pub fn short_message(self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $msg, )*
                }
            }
        }
    };
}

error_codes! {
    XmlFileUnreadable = 2, System, Fatal, "File unreadable";
    XmlFileUnwritable = 3, System, Fatal, "File unwritable";
    BadlyFormedXml = 1006, Xml, Fatal, "Badly formed XML";
    XmlTagMismatch = 1009, Xml, Fatal, "XML start and end elements mismatch";
    DuplicateXmlAttribute = 1010, Xml, Fatal, "Duplicate XML attribute";
    UndefinedXmlEntity = 1011, Xml, Fatal, "Undefined XML entity";
    XmlBadUtf8Content = 1017, Xml, Fatal, "Invalid UTF-8 content";
    XmlUnexpectedEof = 1024, Xml, Fatal, "Unexpected end of XML input";

    SedUnknown = 10000, Internal, Error, "Unknown internal SED-ML error";
    SedNotUtf8 = 10001, Sedml, Error, "File does not use UTF-8 encoding";
    SedUnrecognizedElement = 10002, Sedml, Error, "Encountered unrecognized element";
    SedNotSchemaConformant = 10003, Sedml, Error, "Document does not conform to the SED-ML XML schema";
    SedmlNsUndeclared = 10101, Sedml, Error, "The SED-ML XML namespace must be declared";
    SedmlElementNotInNs = 10102, Sedml, Error, "Element not in SED-ML namespace";
    SedmlDuplicateComponentId = 10301, IdentifierConsistency, Error, "Duplicate 'id' attribute value";
    SedmlIdSyntaxRule = 10302, IdentifierConsistency, Error, "Invalid SId syntax";
    SedInvalidMetaidSyntax = 10303, IdentifierConsistency, Error, "Invalid 'metaid' syntax";

    InvalidNamespaceOnSed = 20101, Sedml, Error, "Invalid namespace";
    SedAllowedAttributes = 20102, Sedml, Error, "Allowed attributes";
    SedEmptyListElement = 20103, Sedml, Error, "No empty listOf elements allowed";

    SedmlDocumentAllowedCoreAttributes = 20201, GeneralConsistency, Error, "Core attributes allowed on <sedML>.";
    SedmlDocumentAllowedAttributes = 20203, GeneralConsistency, Error, "Attributes allowed on <sedML>.";
    SedmlDocumentAllowedElements = 20204, GeneralConsistency, Error, "Elements allowed on <sedML>.";
    SedmlDocumentLevelMustBeNonNegativeInteger = 20205, GeneralConsistency, Error, "The 'level' attribute must be a non-negative integer.";
    SedmlDocumentVersionMustBeNonNegativeInteger = 20206, GeneralConsistency, Error, "The 'version' attribute must be a non-negative integer.";

    SedmlModelAllowedAttributes = 20303, GeneralConsistency, Error, "Attributes allowed on <model>.";
    SedmlModelAllowedElements = 20304, GeneralConsistency, Error, "Elements allowed on <model>.";

    SedmlChangeAllowedAttributes = 20403, GeneralConsistency, Error, "Attributes allowed on <change>.";
    SedmlChangeAttributeAllowedAttributes = 20603, GeneralConsistency, Error, "Attributes allowed on <changeAttribute>.";

    SedmlVariableAllowedAttributes = 20703, GeneralConsistency, Error, "Attributes allowed on <variable>.";
    SedmlVariableTaskReferenceMustBeAbstractTask = 20707, GeneralConsistency, Error, "The attribute 'taskReference' must point to AbstractTask object.";
    SedmlVariableModelReferenceMustBeModel = 20708, GeneralConsistency, Error, "The attribute 'modelReference' must point to Model object.";

    SedmlParameterAllowedAttributes = 20803, GeneralConsistency, Error, "Attributes allowed on <parameter>.";
    SedmlParameterValueMustBeDouble = 20804, GeneralConsistency, Error, "The 'value' attribute must be Double.";

    SedmlSimulationAllowedAttributes = 20903, GeneralConsistency, Error, "Attributes allowed on <simulation>.";
    SedmlSimulationAllowedElements = 20904, GeneralConsistency, Error, "Elements allowed on <simulation>.";

    SedmlUniformTimeCourseAllowedAttributes = 21003, GeneralConsistency, Error, "Attributes allowed on <uniformTimeCourse>.";
    SedmlUniformTimeCourseInitialTimeMustBeDouble = 21004, GeneralConsistency, Error, "The 'initialTime' attribute must be Double.";
    SedmlUniformTimeCourseOutputStartTimeMustBeDouble = 21005, GeneralConsistency, Error, "The 'outputStartTime' attribute must be Double.";
    SedmlUniformTimeCourseOutputEndTimeMustBeDouble = 21006, GeneralConsistency, Error, "The 'outputEndTime' attribute must be Double.";
    SedmlUniformTimeCourseNumberOfPointsMustBeInteger = 21007, GeneralConsistency, Error, "The 'numberOfPoints' attribute must be Integer.";

    SedmlAlgorithmAllowedAttributes = 21103, GeneralConsistency, Error, "Attributes allowed on <algorithm>.";
    SedmlAlgorithmAllowedElements = 21104, GeneralConsistency, Error, "Elements allowed on <algorithm>.";

    SedmlAbstractTaskAllowedAttributes = 21203, GeneralConsistency, Error, "Attributes allowed on <abstractTask>.";
    SedmlTaskAllowedAttributes = 21303, GeneralConsistency, Error, "Attributes allowed on <task>.";
    SedmlTaskModelReferenceMustBeModel = 21304, GeneralConsistency, Error, "The attribute 'modelReference' must point to Model object.";
    SedmlTaskSimulationReferenceMustBeSimulation = 21305, GeneralConsistency, Error, "The attribute 'simulationReference' must point to Simulation object.";

    SedmlDataGeneratorAllowedAttributes = 21403, GeneralConsistency, Error, "Attributes allowed on <dataGenerator>.";
    SedmlDataGeneratorAllowedElements = 21404, GeneralConsistency, Error, "Elements allowed on <dataGenerator>.";

    SedmlOutputAllowedAttributes = 21503, GeneralConsistency, Error, "Attributes allowed on <output>.";
    SedmlPlotAllowedAttributes = 21603, GeneralConsistency, Error, "Attributes allowed on <plot>.";
    SedmlPlot2DAllowedElements = 21703, GeneralConsistency, Error, "Elements allowed on <plot2D>.";
    SedmlPlot3DAllowedElements = 21803, GeneralConsistency, Error, "Elements allowed on <plot3D>.";

    SedmlAbstractCurveLogXMustBeBoolean = 21905, GeneralConsistency, Error, "The 'logX' attribute must be Boolean.";
    SedmlAbstractCurveXDataReferenceMustBeDataReference = 21909, GeneralConsistency, Error, "The attribute 'xDataReference' must point to DataGenerator object.";
    SedmlCurveAllowedAttributes = 22003, GeneralConsistency, Error, "Attributes allowed on <curve>.";
    SedmlCurveYDataReferenceMustBeDataGenerator = 22004, GeneralConsistency, Error, "The attribute 'yDataReference' must point to DataGenerator object.";
    SedmlCurveLogYMustBeBoolean = 22005, GeneralConsistency, Error, "The 'logY' attribute must be Boolean.";

    SedmlSurfaceAllowedAttributes = 22103, GeneralConsistency, Error, "Attributes allowed on <surface>.";
    SedmlSurfaceZDataReferenceMustBeDataGenerator = 22104, GeneralConsistency, Error, "The attribute 'zDataReference' must point to DataGenerator object.";
    SedmlSurfaceXDataReferenceMustBeDataGenerator = 22106, GeneralConsistency, Error, "The attribute 'xDataReference' must point to DataGenerator object.";
    SedmlSurfaceYDataReferenceMustBeDataGenerator = 22107, GeneralConsistency, Error, "The attribute 'yDataReference' must point to DataGenerator object.";
    SedmlSurfaceTypeMustBeSurfaceTypeEnum = 22108, GeneralConsistency, Error, "The 'type' attribute must be SurfaceTypeEnum.";
    SedmlSurfaceLogXMustBeBoolean = 22110, GeneralConsistency, Error, "The 'logX' attribute must be Boolean.";
    SedmlSurfaceLogYMustBeBoolean = 22111, GeneralConsistency, Error, "The 'logY' attribute must be Boolean.";
    SedmlSurfaceLogZMustBeBoolean = 22112, GeneralConsistency, Error, "The 'logZ' attribute must be Boolean.";

    SedmlDataSetAllowedAttributes = 22203, GeneralConsistency, Error, "Attributes allowed on <dataSet>.";
    SedmlDataSetDataReferenceMustBeDataGenerator = 22205, GeneralConsistency, Error, "The attribute 'dataReference' must point to DataGenerator object.";
    SedmlReportAllowedElements = 22303, GeneralConsistency, Error, "Elements allowed on <report>.";

    SedmlAlgorithmParameterAllowedAttributes = 22403, GeneralConsistency, Error, "Attributes allowed on <algorithmParameter>.";
    SedmlAlgorithmParameterAllowedElements = 22404, GeneralConsistency, Error, "Elements allowed on <algorithmParameter>.";

    SedmlRangeAllowedAttributes = 22503, GeneralConsistency, Error, "Attributes allowed on <range>.";

    SedmlSetValueAllowedAttributes = 22803, GeneralConsistency, Error, "Attributes allowed on <setValue>.";
    SedmlSetValueAllowedElements = 22804, GeneralConsistency, Error, "Elements allowed on <setValue>.";
    SedmlSetValueModelReferenceMustBeModel = 22805, GeneralConsistency, Error, "The attribute 'modelReference' must point to Model object.";
    SedmlSetValueRangeMustBeRange = 22808, GeneralConsistency, Error, "The attribute 'range' must point to Range object.";

    SedmlUniformRangeAllowedAttributes = 22903, GeneralConsistency, Error, "Attributes allowed on <uniformRange>.";
    SedmlUniformRangeStartMustBeDouble = 22904, GeneralConsistency, Error, "The 'start' attribute must be Double.";
    SedmlUniformRangeEndMustBeDouble = 22905, GeneralConsistency, Error, "The 'end' attribute must be Double.";
    SedmlUniformRangeNumberOfPointsMustBeInteger = 22906, GeneralConsistency, Error, "The 'numberOfPoints' attribute must be Integer.";

    SedmlVectorRangeAllowedAttributes = 23003, GeneralConsistency, Error, "Attributes allowed on <vectorRange>.";
    SedmlVectorRangeValueMustBeString = 23004, GeneralConsistency, Error, "The <value> elements of a <vectorRange> must hold numbers.";

    SedmlFunctionalRangeAllowedAttributes = 23103, GeneralConsistency, Error, "Attributes allowed on <functionalRange>.";
    SedmlFunctionalRangeAllowedElements = 23104, GeneralConsistency, Error, "Elements allowed on <functionalRange>.";
    SedmlFunctionalRangeRangeMustBeRange = 23105, GeneralConsistency, Error, "The attribute 'range' must point to Range object.";

    SedmlSubTaskAllowedAttributes = 23203, GeneralConsistency, Error, "Attributes allowed on <subTask>.";
    SedmlSubTaskOrderMustBeInteger = 23204, GeneralConsistency, Error, "The 'order' attribute must be Integer.";
    SedmlSubTaskTaskMustBeAbstractTask = 23205, GeneralConsistency, Error, "The attribute 'task' must point to AbstractTask object.";

    SedmlOneStepAllowedAttributes = 23303, GeneralConsistency, Error, "Attributes allowed on <oneStep>.";
    SedmlOneStepStepMustBeDouble = 23304, GeneralConsistency, Error, "The 'step' attribute must be Double.";

    SedmlRepeatedTaskAllowedAttributes = 23503, GeneralConsistency, Error, "Attributes allowed on <repeatedTask>.";
    SedmlRepeatedTaskAllowedElements = 23504, GeneralConsistency, Error, "Elements allowed on <repeatedTask>.";
    SedmlRepeatedTaskRangeMustBeRange = 23505, GeneralConsistency, Error, "The attribute 'range' must point to Range object.";
    SedmlRepeatedTaskResetModelMustBeBoolean = 23506, GeneralConsistency, Error, "The 'resetModel' attribute must be Boolean.";
    SedmlRepeatedTaskConcatenateMustBeBoolean = 23513, GeneralConsistency, Error, "The 'concatenate' attribute must be Boolean.";

    SedUnknownCoreAttribute = 99994, Internal, Error, "Unknown attribute";
}

impl ErrorCode {
    /// The stable numeric id.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Looks up a code by its numeric id.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.short_message(), self.code())
    }
}

// --- Diagnostic Record ---

/// A single diagnostic produced while reading or validating a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SedError {
    pub error_id: ErrorCode,
    pub code: u32,
    pub severity: Severity,
    pub category: Category,
    pub level: u32,
    pub version: u32,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl SedError {
    /// Builds a record using the code's default severity and category.
    ///
    /// `details` is appended to the rule's short message when non-empty.
    pub fn new(
        error_id: ErrorCode,
        level: u32,
        version: u32,
        details: &str,
        line: u32,
        column: u32,
    ) -> Self {
        let message = if details.is_empty() {
            error_id.short_message().to_string()
        } else {
            format!("{}\n{}", error_id.short_message(), details)
        };
        Self {
            error_id,
            code: error_id.code(),
            severity: error_id.default_severity(),
            category: error_id.category(),
            level,
            version,
            message,
            line,
            column,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }
}

impl fmt::Display for SedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Fatal => "Fatal",
        };
        write!(
            f,
            "line {}: ({:05} [{}]) {}",
            self.line, self.code, severity, self.message
        )
    }
}

// --- Error Log ---

/// Ordered, append-only (during a pass) collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLog {
    errors: Vec<SedError>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and appends a diagnostic.
    pub fn log_error(
        &mut self,
        error_id: ErrorCode,
        level: u32,
        version: u32,
        details: &str,
        line: u32,
        column: u32,
    ) {
        self.add(SedError::new(error_id, level, version, details, line, column));
    }

    pub fn add(&mut self, error: SedError) {
        warn!("SED-ML diagnostic: {}", error);
        self.errors.push(error);
    }

    /// Moves every record of `other` to the end of this log, preserving order.
    pub fn append(&mut self, other: &mut ErrorLog) {
        self.errors.append(&mut other.errors);
    }

    pub fn num_errors(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SedError> {
        self.errors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SedError> {
        self.errors.iter()
    }

    /// Number of records whose severity is exactly `severity`.
    pub fn num_failures_with_severity(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|e| e.severity == severity).count()
    }

    /// `true` when any record is an error or fatal.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(SedError::is_error)
    }

    pub fn contains(&self, error_id: ErrorCode) -> bool {
        self.errors.iter().any(|e| e.error_id == error_id)
    }

    /// Removes the first record with the given code. Returns whether one was found.
    pub fn remove(&mut self, error_id: ErrorCode) -> bool {
        match self.errors.iter().position(|e| e.error_id == error_id) {
            Some(pos) => {
                self.errors.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Removes every record with the given code and returns how many were dropped.
    pub fn remove_all(&mut self, error_id: ErrorCode) -> usize {
        let before = self.errors.len();
        self.errors.retain(|e| e.error_id != error_id);
        before - self.errors.len()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Writes one line per record to `out`.
    pub fn print_errors<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for error in &self.errors {
            writeln!(out, "{}", error)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ErrorLog {
    type Item = &'a SedError;
    type IntoIter = core::slice::Iter<'a, SedError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
