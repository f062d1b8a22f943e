//! XML Tree (arena-based allocation)
//!
//! Structural operations keep the sibling links consistent; a node removed
//! from its parent stays allocated in the arena and can be re-inserted.

use crate::{ElementData, Node, NodeData, NodeId};

/// Result type for tree operations
pub type DomResult<T> = Result<T, DomError>;

/// Tree operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node not found")]
    NotFound,
    #[error("operation would create a cycle")]
    HierarchyRequest,
    #[error("node has no parent")]
    NotAChild,
}

/// Arena-based XML tree
///
/// Index 0 is always the document node; the root element is its first
/// element child.
#[derive(Debug, Clone)]
pub struct XmlTree {
    nodes: Vec<Node>,
}

impl XmlTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (detached nodes included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element node
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(Node::element(ElementData::new(name)))
    }

    /// Create a detached element node carrying namespace information
    pub fn create_element_ns(
        &mut self,
        name: &str,
        prefix: Option<String>,
        namespace: Option<String>,
    ) -> NodeId {
        self.alloc(Node::element(ElementData::with_namespace(
            name, prefix, namespace,
        )))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.alloc(Node::comment(content.to_string()))
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent;
        parent.is_valid().then_some(parent)
    }

    /// Check if a node is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Element data accessor
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    /// Mutable element data accessor
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id)?.as_element_mut()
    }

    /// Local tag name of an element node
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    /// Attribute value of an element node
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    /// Iterate over the direct children of a node
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next: first }
    }

    /// Direct element children, in document order
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).filter(|&c| self.is_element(c)).collect()
    }

    /// All descendant elements of a node in document order, the node excluded
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendant_elements(id, &mut out);
        out
    }

    fn collect_descendant_elements(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(id) {
            if self.is_element(child) {
                out.push(child);
            }
            self.collect_descendant_elements(child, out);
        }
    }

    /// Position of an element among its parent's element children.
    ///
    /// Returns `(index, count)` with a 0-based index, or `None` for a
    /// detached node.
    pub fn element_position(&self, id: NodeId) -> Option<(usize, usize)> {
        let parent = self.parent(id)?;
        let siblings = self.element_children(parent);
        let pos = siblings.iter().position(|&s| s == id)?;
        Some((pos, siblings.len()))
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut cur = self.get(of).map(|n| n.parent).unwrap_or(NodeId::NONE);
        while cur.is_valid() {
            if cur == candidate {
                return true;
            }
            cur = self.get(cur).map(|n| n.parent).unwrap_or(NodeId::NONE);
        }
        false
    }

    /// Unlink a node from its parent and siblings. No-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };
        if parent.is_valid() {
            let p = &mut self.nodes[parent.index()];
            if p.first_child == id {
                p.first_child = next;
            }
            if p.last_child == id {
                p.last_child = prev;
            }
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        }
        let n = &mut self.nodes[id.index()];
        n.parent = NodeId::NONE;
        n.prev_sibling = NodeId::NONE;
        n.next_sibling = NodeId::NONE;
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return Err(DomError::NotFound);
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest);
        }
        Ok(())
    }

    /// Append a node as the last child of a parent, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check_insertable(parent, child)?;
        self.detach(child);
        let last = self.nodes[parent.index()].last_child;
        {
            let c = &mut self.nodes[child.index()];
            c.parent = parent;
            c.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }

    /// Insert a node as the first child of a parent, detaching it first
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.check_insertable(parent, child)?;
        self.detach(child);
        let first = self.nodes[parent.index()].first_child;
        {
            let c = &mut self.nodes[child.index()];
            c.parent = parent;
            c.next_sibling = first;
        }
        if first.is_valid() {
            self.nodes[first.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
        self.nodes[parent.index()].first_child = child;
        Ok(())
    }

    /// Insert a node immediately before a reference node
    pub fn insert_before(&mut self, new: NodeId, reference: NodeId) -> DomResult<()> {
        let parent = self.parent(reference).ok_or(DomError::NotAChild)?;
        self.check_insertable(parent, new)?;
        if new == reference {
            return Ok(());
        }
        self.detach(new);
        let prev = self.nodes[reference.index()].prev_sibling;
        {
            let n = &mut self.nodes[new.index()];
            n.parent = parent;
            n.prev_sibling = prev;
            n.next_sibling = reference;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = new;
        } else {
            self.nodes[parent.index()].first_child = new;
        }
        self.nodes[reference.index()].prev_sibling = new;
        Ok(())
    }

    /// Insert a node immediately after a reference node
    pub fn insert_after(&mut self, new: NodeId, reference: NodeId) -> DomResult<()> {
        let parent = self.parent(reference).ok_or(DomError::NotAChild)?;
        let next = self
            .get(reference)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        if next.is_valid() && next != new {
            self.insert_before(new, next)
        } else if next == new {
            Ok(())
        } else {
            self.append_child(parent, new)
        }
    }

    /// Replace an attached node with another, detaching the old one
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> DomResult<()> {
        if old == new {
            return Ok(());
        }
        self.insert_before(new, old)?;
        self.detach(old);
        Ok(())
    }

    /// Remove a node (with its subtree) from the tree
    pub fn remove(&mut self, id: NodeId) -> DomResult<()> {
        if self.get(id).is_none() {
            return Err(DomError::NotFound);
        }
        self.detach(id);
        Ok(())
    }

    /// Deep-clone a subtree into the arena; the clone is detached
    pub fn clone_subtree(&mut self, id: NodeId) -> DomResult<NodeId> {
        let data = self.get(id).ok_or(DomError::NotFound)?.data.clone();
        let copy = self.alloc(match data {
            NodeData::Document => Node::document(),
            NodeData::Element(e) => Node::element(e),
            NodeData::Text(t) => Node::text(t),
            NodeData::Comment(c) => Node::comment(c),
        });
        let kids: Vec<NodeId> = self.children(id).collect();
        for kid in kids {
            let cloned = self.clone_subtree(kid)?;
            self.append_child(copy, cloned)?;
        }
        Ok(copy)
    }

    /// Concatenated text of a node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            out.push_str(text);
        }
        for child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// Replace a node's children with a single text node (or nothing when
    /// the text is empty)
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let kids: Vec<NodeId> = self.children(id).collect();
        for kid in kids {
            self.detach(kid);
        }
        if !text.is_empty() {
            let t = self.create_text(text);
            // id was just verified by children(); append cannot cycle
            let _ = self.append_child(id, t);
        }
    }
}

impl Default for XmlTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the direct children of a node
pub struct Children<'a> {
    tree: &'a XmlTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let cur = self.next;
        self.next = self
            .tree
            .get(cur)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(cur)
    }
}
