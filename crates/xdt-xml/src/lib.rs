//! XDT XML - parsing and serialization
//!
//! Turns XML text into an `xdt_dom` arena document and back. Namespace
//! URIs are resolved while reading and stored on each element.

mod parser;
mod serializer;

pub use parser::{parse_document, parse_fragment};
pub use serializer::{document_to_string, node_to_string};

/// XML reading errors
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Parse(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("document has no root element")]
    NoRootElement,
}
