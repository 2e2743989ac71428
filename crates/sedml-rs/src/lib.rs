// crates/sedml-rs/src/lib.rs

#![doc = "Reads, edits, validates and writes SED-ML (Simulation Experiment Description Markup Language) documents."]
#![doc = ""]
#![doc = "A document is an owned tree rooted at [`SedDocument`]. Every element kind"]
#![doc = "implements the [`SedBase`] trait, which provides typed attribute access,"]
#![doc = "validation predicates, XML reading and writing, reference renaming and"]
#![doc = "traversal on top of a per-kind attribute table."]
#![doc = ""]
#![doc = "It supports:"]
#![doc = "- `read_sedml_from_str` / `read_sedml_from_file`: parsing with per-attribute diagnostics."]
#![doc = "- `write_sedml_to_string` / `write_sedml_to_file`: lossless serialization."]
#![doc = "- `SedDocument::rename_everywhere` and `SedDocument::check_consistency`."]

// --- Crate Modules ---

pub mod attributes;
pub mod base;
pub mod diagnostics;
pub mod document;
pub mod elements;
mod error;
pub mod identity;
pub mod list_of;
mod reader;
pub mod types;
pub mod visitor;
mod writer;
pub mod xml;

// --- Public API Re-exports ---

pub use base::{BaseFields, DocumentId, NodeKey, SedBase};
pub use diagnostics::{Category, ErrorCode, ErrorLog, SedError, Severity};
pub use document::SedDocument;
pub use elements::*;
pub use error::{OperationStatus, SedmlError};
pub use identity::IdentitySpace;
pub use list_of::{ListItem, ListOf};
pub use reader::{
    ReaderConfig, read_sedml, read_sedml_from_file, read_sedml_from_str, read_sedml_with_config,
};
pub use types::{NamespaceDecl, SedNamespaces, TypeCode};
pub use visitor::{ElementFilter, IdCollector, SedVisitor, TypeFilter};
pub use writer::{
    WriterConfig, write_sedml, write_sedml_to_file, write_sedml_to_string, write_sedml_with_config,
};
pub use xml::{AttributeSource, QuickXmlInput, QuickXmlSink, XmlInput, XmlSink};
