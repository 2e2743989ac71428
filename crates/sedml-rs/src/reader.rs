// crates/sedml-rs/src/reader.rs

use crate::attributes::ReadContext;
use crate::base::{SedBase, read_element};
use crate::diagnostics::{ErrorCode, ErrorLog};
use crate::document::SedDocument;
use crate::error::SedmlError;
use crate::types::SedNamespaces;
use crate::xml::{AttributeSource, QuickXmlInput, StartTag, XmlInput, XmlToken};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options for reading a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Check `id`, `metaid` and reference syntax while reading.
    pub validate_ids: bool,
    /// Run [`SedDocument::check_consistency`] once the tree is built.
    pub check_consistency: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            validate_ids: true,
            check_consistency: false,
        }
    }
}

/// Reads a SED-ML document from a string with the default configuration.
///
/// Reading never fails: malformed XML and content problems are recorded in
/// the returned document's error log, and whatever was read before the
/// problem is kept.
pub fn read_sedml_from_str(xml: &str) -> SedDocument {
    read_sedml_with_config(xml, &ReaderConfig::default())
}

pub fn read_sedml_with_config(xml: &str, config: &ReaderConfig) -> SedDocument {
    let mut input = QuickXmlInput::new(xml);
    read_sedml(&mut input, config)
}

/// Reads a SED-ML file.
///
/// # Errors
/// Returns `SedmlError::Io` if the file cannot be read. A file that is not
/// UTF-8 yields an empty document whose log holds `SedNotUtf8`.
pub fn read_sedml_from_file(path: impl AsRef<Path>) -> Result<SedDocument, SedmlError> {
    let path = path.as_ref();
    debug!("Reading SED-ML file {}", path.display());
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(xml) => Ok(read_sedml_from_str(&xml)),
        Err(_) => {
            let mut doc = SedDocument::default();
            let (level, version) = (doc.level(), doc.version());
            let details = format!("The file '{}' is not valid UTF-8.", path.display());
            doc.error_log_mut()
                .log_error(ErrorCode::SedNotUtf8, level, version, &details, 0, 0);
            Ok(doc)
        }
    }
}

/// Reads a document from any [`XmlInput`].
pub fn read_sedml(input: &mut dyn XmlInput, config: &ReaderConfig) -> SedDocument {
    let root = match input.next_token() {
        XmlToken::Start(tag) => tag,
        _ => return missing_root(input),
    };

    let (namespaces, problems) = resolve_revision(&root);
    let (level, version) = (namespaces.level(), namespaces.version());
    let mut doc = SedDocument::with_namespaces(namespaces);
    let mut log = ErrorLog::new();
    {
        let mut ctx = ReadContext::new(&mut log, level, version);
        ctx.validate_ids = config.validate_ids;
        for (code, details) in &problems {
            ctx.log_error(*code, details, root.line, root.column);
        }
        if root.name == "sedML" {
            read_element(&mut doc, &root, input, &mut ctx);
        } else {
            let details = format!("The root element is <{}>, not <sedML>.", root.name);
            ctx.log_error(ErrorCode::SedNotSchemaConformant, &details, root.line, root.column);
        }
    }
    drain_issues(input, &mut log, level, version);

    doc.error_log_mut().append(&mut log);
    doc.propagate_namespaces();
    doc.reconnect();
    if config.check_consistency {
        doc.check_consistency();
    }
    info!(
        "Read SED-ML L{}V{} document: {} element(s), {} diagnostic(s)",
        level,
        version,
        doc.get_all_elements(None).len(),
        doc.num_errors()
    );
    doc
}

fn missing_root(input: &mut dyn XmlInput) -> SedDocument {
    let mut doc = SedDocument::default();
    let (level, version) = (doc.level(), doc.version());
    let mut log = ErrorLog::new();
    drain_issues(input, &mut log, level, version);
    if log.is_empty() {
        log.log_error(
            ErrorCode::SedNotSchemaConformant,
            level,
            version,
            "The input holds no root element.",
            0,
            0,
        );
    }
    doc.error_log_mut().append(&mut log);
    doc
}

fn drain_issues(input: &mut dyn XmlInput, log: &mut ErrorLog, level: u32, version: u32) {
    while let Some(issue) = input.take_issue() {
        log.log_error(issue.code, level, version, &issue.message, issue.line, issue.column);
    }
}

/// Picks the SED-ML revision of the root element.
///
/// The `level`/`version` attributes win when they name a supported pair;
/// otherwise the default namespace decides, then L1V4.
fn resolve_revision(root: &StartTag) -> (SedNamespaces, Vec<(ErrorCode, String)>) {
    let mut problems = Vec::new();
    let parse = |name: &str| root.attributes.get(name).and_then(|t| t.trim().parse::<u32>().ok());
    let default_uri = root
        .namespaces
        .iter()
        .find(|decl| decl.prefix.is_none())
        .map(|decl| decl.uri.as_str());

    let namespaces = match (parse("level"), parse("version")) {
        (Some(level), Some(version)) => match SedNamespaces::new(level, version) {
            Ok(namespaces) => {
                if let Some(uri) = default_uri.filter(|uri| *uri != namespaces.uri()) {
                    problems.push((
                        ErrorCode::InvalidNamespaceOnSed,
                        format!(
                            "The namespace '{}' does not match SED-ML level {} version {}.",
                            uri, level, version
                        ),
                    ));
                }
                namespaces
            }
            Err(_) => {
                problems.push((
                    ErrorCode::InvalidNamespaceOnSed,
                    format!("SED-ML level {} version {} is not supported.", level, version),
                ));
                SedNamespaces::default()
            }
        },
        _ => default_uri
            .and_then(SedNamespaces::level_version_for_uri)
            .and_then(|(level, version)| SedNamespaces::new(level, version).ok())
            .unwrap_or_default(),
    };

    if default_uri.is_none() {
        problems.push((
            ErrorCode::SedmlNsUndeclared,
            "The <sedML> element does not declare the SED-ML namespace.".to_string(),
        ));
    }
    (namespaces, problems)
}

#[cfg(test)]
mod tests {
    use super::*;

    const L1V3: &str = "http://sed-ml.org/sed-ml/level1/version3";

    #[test]
    fn test_reader_config_defaults() {
        let config = ReaderConfig::default();
        assert!(config.validate_ids);
        assert!(!config.check_consistency);
    }

    #[test]
    fn test_revision_from_attributes() {
        let xml = format!("<sedML xmlns=\"{}\" level=\"1\" version=\"3\"/>", L1V3);
        let doc = read_sedml_from_str(&xml);
        assert_eq!((doc.level(), doc.version()), (1, 3));
        assert!(doc.error_log().is_empty());
    }

    #[test]
    fn test_revision_from_namespace_when_attributes_missing() {
        let xml = format!("<sedML xmlns=\"{}\"/>", L1V3);
        let doc = read_sedml_from_str(&xml);
        assert_eq!((doc.level(), doc.version()), (1, 3));
        assert!(doc.error_log().contains(ErrorCode::SedmlDocumentLevelMustBeNonNegativeInteger));
        assert!(doc.error_log().contains(ErrorCode::SedmlDocumentVersionMustBeNonNegativeInteger));
    }

    #[test]
    fn test_unsupported_revision_falls_back() {
        let doc = read_sedml_from_str("<sedML xmlns=\"urn:other\" level=\"3\" version=\"1\"/>");
        assert_eq!((doc.level(), doc.version()), (1, 4));
        assert!(doc.error_log().contains(ErrorCode::InvalidNamespaceOnSed));
    }

    #[test]
    fn test_missing_namespace_is_reported() {
        let doc = read_sedml_from_str("<sedML level=\"1\" version=\"4\"/>");
        assert!(doc.error_log().contains(ErrorCode::SedmlNsUndeclared));
    }

    #[test]
    fn test_wrong_root_and_empty_input() {
        let doc = read_sedml_from_str("<sbml level=\"3\" version=\"1\"/>");
        assert!(doc.error_log().contains(ErrorCode::SedNotSchemaConformant));

        let doc = read_sedml_from_str("");
        assert_eq!(doc.num_errors(), 1);
        assert!(doc.error_log().contains(ErrorCode::SedNotSchemaConformant));
    }
}
