//! Document - High-level document API

use crate::{NodeId, XmlTree};

/// XML Document
///
/// Thin wrapper owning the arena; the root element is the first element
/// child of the document node.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The XML tree
    pub tree: XmlTree,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            tree: XmlTree::new(),
        }
    }

    /// Get the document root element
    pub fn root_element(&self) -> Option<NodeId> {
        self.tree
            .children(self.tree.root())
            .find(|&c| self.tree.is_element(c))
    }

    /// Access the tree
    pub fn tree(&self) -> &XmlTree {
        &self.tree
    }

    /// Access the tree mutably
    pub fn tree_mut(&mut self) -> &mut XmlTree {
        &mut self.tree
    }
}
