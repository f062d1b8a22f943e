//! XDT DOM - XML tree representation
//!
//! Arena-backed tree: nodes live in a flat vector and refer to each other
//! by index, so node identity is integer equality and a handle stays valid
//! across structural edits.

mod document;
mod node;
mod tree;

pub use document::Document;
pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{Children, DomError, DomResult, XmlTree};

/// Node identifier (index into the arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Check whether this ID refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw index value
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
