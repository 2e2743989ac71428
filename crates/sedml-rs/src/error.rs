// crates/sedml-rs/src/error.rs

use core::fmt;
use std::io;

/// Errors that abort a read or write call outright.
///
/// Problems with the *content* of a document (bad attribute values, missing
/// required attributes, dangling references) are never reported through this
/// type; they are collected in the document's [`ErrorLog`](crate::ErrorLog).
#[derive(Debug)]
pub enum SedmlError {
    /// An I/O error while reading or writing a file.
    Io(io::Error),

    /// An error from the underlying `quick-xml` writer.
    XmlWriting(quick_xml::Error),

    /// The produced or supplied bytes were not valid UTF-8.
    NotUtf8,

    /// The level/version pair is not one of the supported SED-ML revisions.
    InvalidLevelVersion { level: u32, version: u32 },

    /// A sink call was made out of order (e.g. an attribute after element content).
    InvalidXmlOperation(&'static str),
}

impl From<io::Error> for SedmlError {
    fn from(e: io::Error) -> Self {
        SedmlError::Io(e)
    }
}

impl From<quick_xml::Error> for SedmlError {
    fn from(e: quick_xml::Error) -> Self {
        SedmlError::XmlWriting(e)
    }
}

impl From<std::string::FromUtf8Error> for SedmlError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        SedmlError::NotUtf8
    }
}

impl fmt::Display for SedmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SedmlError::Io(e) => write!(f, "I/O error: {}", e),
            SedmlError::XmlWriting(e) => write!(f, "XML writing error: {}", e),
            SedmlError::NotUtf8 => write!(f, "Document is not valid UTF-8"),
            SedmlError::InvalidLevelVersion { level, version } => write!(
                f,
                "Unsupported SED-ML level {} version {}",
                level, version
            ),
            SedmlError::InvalidXmlOperation(msg) => write!(f, "Invalid XML operation: {}", msg),
        }
    }
}

impl std::error::Error for SedmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SedmlError::Io(e) => Some(e),
            SedmlError::XmlWriting(e) => Some(e),
            _ => None,
        }
    }
}

// --- Operation status codes ---

/// Result of a structural mutation (append, set, unset).
///
/// These are returned instead of `Result` because every failure is locally
/// recoverable and the numeric codes are part of the public contract.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationStatus {
    Success,
    IndexExceedsSize,
    UnexpectedAttribute,
    OperationFailed,
    InvalidAttributeValue,
    InvalidObject,
    DuplicateObjectId,
    LevelMismatch,
    VersionMismatch,
    InvalidXmlOperation,
    NamespacesMismatch,
}

impl OperationStatus {
    /// The stable integer value of this status.
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::IndexExceedsSize => -1,
            Self::UnexpectedAttribute => -2,
            Self::OperationFailed => -3,
            Self::InvalidAttributeValue => -4,
            Self::InvalidObject => -5,
            Self::DuplicateObjectId => -6,
            Self::LevelMismatch => -7,
            Self::VersionMismatch => -8,
            Self::InvalidXmlOperation => -9,
            Self::NamespacesMismatch => -10,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Success => "operation succeeded",
            Self::IndexExceedsSize => "index exceeds list size",
            Self::UnexpectedAttribute => "attribute is not valid on this element",
            Self::OperationFailed => "operation failed",
            Self::InvalidAttributeValue => "invalid attribute value",
            Self::InvalidObject => "object is incomplete or of the wrong kind",
            Self::DuplicateObjectId => "an object with this id already exists",
            Self::LevelMismatch => "SED-ML level mismatch",
            Self::VersionMismatch => "SED-ML version mismatch",
            Self::InvalidXmlOperation => "invalid XML operation",
            Self::NamespacesMismatch => "namespace mismatch",
        };
        write!(f, "{} ({})", text, self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::{OperationStatus, SedmlError};
    use std::error::Error;
    use std::io;
    use std::string::ToString;

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: SedmlError = io_err.into();
        assert!(matches!(err, SedmlError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_xml_error() {
        let xml_err = quick_xml::Error::Io(std::sync::Arc::new(io::Error::other("boom")));
        let err: SedmlError = xml_err.into();
        assert!(matches!(err, SedmlError::XmlWriting(_)));
    }

    #[test]
    fn test_from_utf8_error() {
        let utf8_err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: SedmlError = utf8_err.into();
        assert!(matches!(err, SedmlError::NotUtf8));
    }

    #[test]
    fn test_display_level_version() {
        let err = SedmlError::InvalidLevelVersion {
            level: 2,
            version: 9,
        };
        assert_eq!(err.to_string(), "Unsupported SED-ML level 2 version 9");
    }

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(OperationStatus::Success.code(), 0);
        assert_eq!(OperationStatus::InvalidObject.code(), -5);
        assert_eq!(OperationStatus::DuplicateObjectId.code(), -6);
        assert_eq!(OperationStatus::LevelMismatch.code(), -7);
        assert_eq!(OperationStatus::VersionMismatch.code(), -8);
        assert_eq!(OperationStatus::NamespacesMismatch.code(), -10);
        assert!(OperationStatus::Success.is_success());
        assert!(!OperationStatus::OperationFailed.is_success());
    }
}
