//! XML Node - Compact representation
//!
//! Sibling-linked layout: each node stores parent, first/last child and
//! prev/next sibling as `NodeId` indices instead of owning pointers.

use crate::NodeId;

/// XML Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if detached)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn unlinked(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::unlinked(NodeData::Document)
    }

    /// Create a new element node
    pub fn element(data: ElementData) -> Self {
        Self::unlinked(NodeData::Element(data))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::unlinked(NodeData::Text(content))
    }

    /// Create a comment node
    pub fn comment(content: String) -> Self {
        Self::unlinked(NodeData::Comment(content))
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Local tag name
    pub name: String,
    /// Namespace prefix as written in the source markup
    pub prefix: Option<String>,
    /// Resolved namespace URI
    pub namespace: Option<String>,
    /// Attributes, in document order
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            namespace: None,
            attrs: Vec::new(),
        }
    }

    pub fn with_namespace(
        name: impl Into<String>,
        prefix: Option<String>,
        namespace: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prefix,
            namespace,
            attrs: Vec::new(),
        }
    }

    /// Qualified name as written in markup (`prefix:name` or `name`)
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.name),
            None => self.name.clone(),
        }
    }

    /// Get an attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Check whether an attribute is present
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute, replacing an existing value or appending a new one
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                attr.value = value;
                return;
            }
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value,
        });
    }

    /// Whitespace-separated entries of the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Check whether the `class` attribute contains the given class
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

/// Attribute (name kept qualified, e.g. `xmlns:q`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
