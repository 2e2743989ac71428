// crates/sedml-rs/src/writer.rs

use crate::base::SedBase;
use crate::document::SedDocument;
use crate::error::SedmlError;
use crate::xml::{QuickXmlSink, XmlSink};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options for serializing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Spaces per nesting level. 0 writes a single line.
    pub indent: usize,
    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` first.
    pub xml_declaration: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            xml_declaration: true,
        }
    }
}

/// Streams `doc` into any [`XmlSink`].
pub fn write_sedml(doc: &SedDocument, sink: &mut dyn XmlSink) -> Result<(), SedmlError> {
    doc.write(sink)
}

/// Serializes `doc` with the default configuration.
///
/// # Errors
/// Returns a `SedmlError` if the XML writer fails. Content problems (missing
/// required attributes, dangling references) do not prevent writing.
pub fn write_sedml_to_string(doc: &SedDocument) -> Result<String, SedmlError> {
    write_sedml_with_config(doc, &WriterConfig::default())
}

pub fn write_sedml_with_config(doc: &SedDocument, config: &WriterConfig) -> Result<String, SedmlError> {
    let mut sink = QuickXmlSink::new(config.indent);
    if config.xml_declaration {
        sink.write_declaration()?;
    }
    write_sedml(doc, &mut sink)?;
    let xml = sink.into_string()?;
    info!(
        "Wrote SED-ML L{}V{} document ({} bytes)",
        doc.level(),
        doc.version(),
        xml.len()
    );
    Ok(xml)
}

pub fn write_sedml_to_file(doc: &SedDocument, path: impl AsRef<Path>) -> Result<(), SedmlError> {
    let xml = write_sedml_to_string(doc)?;
    fs::write(path, xml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_self_closing() {
        let doc = SedDocument::new(1, 3).unwrap();
        let config = WriterConfig {
            indent: 0,
            xml_declaration: false,
        };
        let xml = write_sedml_with_config(&doc, &config).unwrap();
        assert_eq!(
            xml,
            "<sedML xmlns=\"http://sed-ml.org/sed-ml/level1/version3\" level=\"1\" version=\"3\"/>\n"
        );
    }

    #[test]
    fn test_declaration_and_empty_lists() {
        let mut doc = SedDocument::default();
        let model = doc.create_model();
        let _ = model.set_id("m1");
        let _ = model.set_source("m.xml");
        let xml = write_sedml_to_string(&doc).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<listOfModels>"));
        assert!(!xml.contains("listOfSimulations"));
        assert!(!xml.contains("listOfChanges"));
    }
}
