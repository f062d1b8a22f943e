//! XDT
//!
//! jQuery-flavored querying and editing of XML documents: load a file or a
//! string, select elements with a CSS-style selector dialect, edit the tree
//! through the result set, save explicitly.
//!
//! # Example
//! ```rust,ignore
//! use xdt::Xdt;
//!
//! let mut store = Xdt::new("data");
//! store.connect("store")?;
//! let items = store.select("item.sale");
//! if let Some(doc) = store.document_mut() {
//!     xdt::ops::set_attr(doc, &items, "state", "sold");
//! }
//! store.close()?;
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use xdt_dom::{Document, NodeId};
use xdt_query::{Engine, NodeList, QueryContext, SelectMode};
use xdt_xml::XmlError;

// Re-export sub-crates for direct usage
pub use xdt_dom as dom;
pub use xdt_query as query;
pub use xdt_query::ops;
pub use xdt_query::traverse;
pub use xdt_xml as xml;

pub use xdt_query::{Content, SelectError};

/// Facade errors
#[derive(Debug, thiserror::Error)]
pub enum XdtError {
    #[error("no document loaded")]
    NotLoaded,
    #[error("no file connected")]
    NotConnected,
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Entry point: a working directory, an optionally loaded document and an
/// optional namespace filter.
///
/// Query state is never held here; every selection threads an explicit
/// [`QueryContext`] and returns a fresh [`NodeList`].
#[derive(Debug)]
pub struct Xdt {
    dir: PathBuf,
    file_name: Option<PathBuf>,
    doc: Option<Document>,
    namespace: Option<String>,
}

impl Default for Xdt {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Xdt {
    /// Create an instance rooted at a working directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: None,
            doc: None,
            namespace: None,
        }
    }

    /// Create an instance whose every query filters by namespace URI
    /// (`*` matches any namespace)
    pub fn with_namespace(dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: None,
            doc: None,
            namespace: Some(namespace.into()),
        }
    }

    /// Change the namespace filter
    pub fn set_namespace(&mut self, namespace: Option<String>) {
        self.namespace = namespace;
    }

    /// Change the working directory
    pub fn set_directory(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
    }

    /// The current working directory
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Load an XML file from the working directory; the `.xml` extension is
    /// appended when the name does not already carry it
    pub fn connect(&mut self, name: &str) -> Result<(), XdtError> {
        let file = ensure_xml_extension(name);
        let path = self.dir.join(&file);
        let text = fs::read_to_string(&path)?;
        self.doc = Some(xdt_xml::parse_document(&text)?);
        self.file_name = Some(file);
        tracing::debug!(path = %path.display(), "connected XML file");
        Ok(())
    }

    /// Load a string containing an XML document
    pub fn load(&mut self, xml: &str) -> Result<(), XdtError> {
        self.doc = Some(xdt_xml::parse_document(xml)?);
        self.file_name = None;
        Ok(())
    }

    /// Serialize the loaded document's root element to a string
    pub fn save(&self) -> Result<String, XdtError> {
        let doc = self.doc.as_ref().ok_or(XdtError::NotLoaded)?;
        let root = doc.root_element().ok_or(XdtError::NotLoaded)?;
        Ok(xdt_xml::node_to_string(doc.tree(), root))
    }

    /// Write the loaded document back to the connected file
    pub fn close(&mut self) -> Result<(), XdtError> {
        let doc = self.doc.as_ref().ok_or(XdtError::NotLoaded)?;
        let file = self.file_name.as_ref().ok_or(XdtError::NotConnected)?;
        let path = self.dir.join(file);
        fs::write(&path, xdt_xml::document_to_string(doc))?;
        tracing::debug!(path = %path.display(), "saved XML file");
        Ok(())
    }

    /// Create (or overwrite) an XML file in the working directory with an
    /// XML declaration and optional root markup
    pub fn create_file(&self, name: &str, root: Option<&str>) -> Result<(), XdtError> {
        let file = ensure_xml_extension(name);
        let mut content = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        if let Some(root) = root {
            content.push_str(root);
        }
        fs::write(self.dir.join(&file), content)?;
        Ok(())
    }

    /// The loaded document
    pub fn document(&self) -> Option<&Document> {
        self.doc.as_ref()
    }

    /// The loaded document, mutably (for the `ops` mutation layer)
    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.doc.as_mut()
    }

    /// The document root element as a singleton result set
    pub fn document_root(&self) -> NodeList {
        match self.doc.as_ref().and_then(Document::root_element) {
            Some(root) => NodeList::single(root),
            None => NodeList::new(),
        }
    }

    /// A fresh query context for the loaded document
    pub fn context(&self) -> QueryContext {
        let mut ctx = QueryContext::new(NodeId::ROOT);
        ctx.namespace = self.namespace.clone();
        ctx
    }

    /// Evaluate a selector against the whole document
    pub fn select(&self, selector: &str) -> NodeList {
        self.select_with(selector, &self.context(), SelectMode::Reset)
    }

    /// Evaluate a selector with an explicit context and mode
    pub fn select_with(&self, selector: &str, ctx: &QueryContext, mode: SelectMode) -> NodeList {
        match self.doc.as_ref() {
            Some(doc) => Engine::new(doc.tree()).select(selector, ctx, mode),
            None => NodeList::new(),
        }
    }

    /// Evaluate a selector against the subtree below a context node
    pub fn select_in(&self, selector: &str, context: NodeId) -> NodeList {
        match self.doc.as_ref() {
            Some(doc) => Engine::new(doc.tree()).select_in(selector, context, &self.context()),
            None => NodeList::new(),
        }
    }
}

fn ensure_xml_extension(name: &str) -> PathBuf {
    if name.to_ascii_lowercase().contains(".xml") {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}.xml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_appended_case_insensitively() {
        assert_eq!(ensure_xml_extension("store"), PathBuf::from("store.xml"));
        assert_eq!(ensure_xml_extension("store.xml"), PathBuf::from("store.xml"));
        assert_eq!(ensure_xml_extension("store.XML"), PathBuf::from("store.XML"));
    }

    #[test]
    fn test_select_without_document_is_empty() {
        let xdt = Xdt::new(".");
        assert!(xdt.select("item").is_empty());
        assert!(xdt.document_root().is_empty());
    }

    #[test]
    fn test_save_without_document_fails() {
        let xdt = Xdt::new(".");
        assert!(matches!(xdt.save(), Err(XdtError::NotLoaded)));
    }
}
