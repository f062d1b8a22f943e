//! Mutation layer
//!
//! Tree edits expressed against a result set. Every operation resolves its
//! content/target argument once, through the tagged [`Content`] union, and
//! acts on live tree nodes in place; nothing touches storage until the
//! caller explicitly saves. An argument that cannot be resolved makes the
//! operation a no-op.

use crate::engine::{Engine, QueryContext, SelectMode};
use crate::list::NodeList;
use xdt_dom::{Document, NodeId};
use xdt_xml::parse_fragment;

/// Content or target of a mutation operation
#[derive(Debug, Clone)]
pub enum Content<'a> {
    /// A literal markup fragment, parsed into detached nodes
    Markup(&'a str),
    /// A selector, resolved against the current tree
    Selector(&'a str),
    /// An existing node
    Node(NodeId),
    /// An existing result set
    Set(NodeList),
}

impl From<NodeId> for Content<'_> {
    fn from(id: NodeId) -> Self {
        Content::Node(id)
    }
}

impl From<NodeList> for Content<'_> {
    fn from(list: NodeList) -> Self {
        Content::Set(list)
    }
}

fn resolve(doc: &mut Document, ctx: &QueryContext, content: &Content<'_>) -> Option<NodeList> {
    let resolved = match content {
        Content::Markup(xml) => {
            let nodes = parse_fragment(doc.tree_mut(), xml).ok()?;
            NodeList::from_vec(nodes)
        }
        Content::Selector(selector) => {
            Engine::new(doc.tree()).select(selector, ctx, SelectMode::Reset)
        }
        Content::Node(id) => NodeList::single(*id),
        Content::Set(list) => list.clone(),
    };
    if resolved.is_empty() {
        None
    } else {
        Some(resolved)
    }
}

/// Insert every node of the set before the first resolved target node
pub fn insert_before(
    doc: &mut Document,
    ctx: &QueryContext,
    list: &NodeList,
    target: &Content<'_>,
) {
    let Some(anchor) = resolve(doc, ctx, target).and_then(|t| t.first()) else {
        return;
    };
    for node in list {
        let _ = doc.tree_mut().insert_before(node, anchor);
    }
}

/// Insert every node of the set after the first resolved target node,
/// preserving set order
pub fn insert_after(doc: &mut Document, ctx: &QueryContext, list: &NodeList, target: &Content<'_>) {
    let Some(anchor) = resolve(doc, ctx, target).and_then(|t| t.first()) else {
        return;
    };
    let mut reference = anchor;
    for node in list {
        if doc.tree_mut().insert_after(node, reference).is_ok() {
            reference = node;
        }
    }
}

/// Append the first resolved content node to each node of the set.
///
/// Appending moves the node, so with a multi-node set the content ends up
/// inside the last one.
pub fn append(doc: &mut Document, ctx: &QueryContext, list: &NodeList, content: &Content<'_>) {
    let Some(node) = resolve(doc, ctx, content).and_then(|c| c.first()) else {
        return;
    };
    for target in list {
        let _ = doc.tree_mut().append_child(target, node);
    }
}

/// Prepend the first resolved content node to each node of the set
pub fn prepend(doc: &mut Document, ctx: &QueryContext, list: &NodeList, content: &Content<'_>) {
    let Some(node) = resolve(doc, ctx, content).and_then(|c| c.first()) else {
        return;
    };
    for target in list {
        let _ = doc.tree_mut().prepend_child(target, node);
    }
}

/// Append every node of the set to every resolved target
pub fn append_to(doc: &mut Document, ctx: &QueryContext, list: &NodeList, target: &Content<'_>) {
    let Some(targets) = resolve(doc, ctx, target) else {
        return;
    };
    for node in list {
        for t in &targets {
            let _ = doc.tree_mut().append_child(t, node);
        }
    }
}

/// Prepend every node of the set to every resolved target
pub fn prepend_to(doc: &mut Document, ctx: &QueryContext, list: &NodeList, target: &Content<'_>) {
    let Some(targets) = resolve(doc, ctx, target) else {
        return;
    };
    for node in list {
        for t in &targets {
            let _ = doc.tree_mut().prepend_child(t, node);
        }
    }
}

/// Wrap the set in the first resolved wrapper node.
///
/// One wrapper serves the whole set: it moves in front of each node in
/// turn and collects it, so a multi-node set accumulates inside a single
/// wrapper sitting at the last node's position.
pub fn wrap(doc: &mut Document, ctx: &QueryContext, list: &NodeList, wrapper: &Content<'_>) {
    let Some(wrap_node) = resolve(doc, ctx, wrapper).and_then(|w| w.first()) else {
        return;
    };
    for node in list {
        if doc.tree().parent(node).is_none() {
            continue;
        }
        if doc.tree_mut().insert_before(wrap_node, node).is_ok() {
            let _ = doc.tree_mut().append_child(wrap_node, node);
        }
    }
}

/// Replace each node of the set with a fresh deep clone of the first
/// resolved content node; returns the replaced set
pub fn replace_with(
    doc: &mut Document,
    ctx: &QueryContext,
    list: &NodeList,
    content: &Content<'_>,
) -> NodeList {
    let Some(template) = resolve(doc, ctx, content).and_then(|c| c.first()) else {
        return NodeList::new();
    };
    // the template leaves the tree; the replacements are clones of it
    doc.tree_mut().detach(template);
    for node in list {
        let Ok(fresh) = doc.tree_mut().clone_subtree(template) else {
            continue;
        };
        let _ = doc.tree_mut().replace(node, fresh);
    }
    list.clone()
}

/// Remove the set from the tree; the nodes stay alive for re-insertion
pub fn remove(doc: &mut Document, list: &NodeList) {
    for node in list {
        doc.tree_mut().detach(node);
    }
}

/// Remove all children of each node in the set
pub fn empty(doc: &mut Document, list: &NodeList) {
    for node in list {
        doc.tree_mut().set_text_content(node, "");
    }
}

/// Attribute value of the first node in the set
pub fn attr(doc: &Document, list: &NodeList, name: &str) -> Option<String> {
    let first = list.first()?;
    doc.tree().attr(first, name).map(str::to_string)
}

/// Set an attribute on every node of the set that already carries it
pub fn set_attr(doc: &mut Document, list: &NodeList, name: &str, value: &str) {
    for node in list {
        if let Some(elem) = doc.tree_mut().element_mut(node) {
            if elem.has_attr(name) {
                elem.set_attr(name, value);
            }
        }
    }
}

/// Create or overwrite attributes on every node of the set
pub fn set_data(doc: &mut Document, list: &NodeList, pairs: &[(&str, &str)]) {
    for node in list {
        if let Some(elem) = doc.tree_mut().element_mut(node) {
            for (name, value) in pairs {
                elem.set_attr(name, *value);
            }
        }
    }
}

/// Text value of the first node in the set
pub fn val(doc: &Document, list: &NodeList) -> Option<String> {
    list.first().map(|node| doc.tree().text_content(node))
}

/// Set the text value of every node in the set
pub fn set_val(doc: &mut Document, list: &NodeList, value: &str) {
    for node in list {
        doc.tree_mut().set_text_content(node, value);
    }
}

/// Trimmed text content of the first node in the set
pub fn text(doc: &Document, list: &NodeList) -> Option<String> {
    list.first()
        .map(|node| doc.tree().text_content(node).trim().to_string())
}

/// Serialized markup of the first node in the set
pub fn html(doc: &Document, list: &NodeList) -> Option<String> {
    list.first()
        .map(|node| xdt_xml::node_to_string(doc.tree(), node))
}

/// Replace each node's content with a freshly parsed copy of the markup
pub fn set_html(doc: &mut Document, list: &NodeList, markup: &str) {
    for node in list {
        doc.tree_mut().set_text_content(node, "");
        let Ok(tops) = parse_fragment(doc.tree_mut(), markup) else {
            continue;
        };
        if let Some(first) = tops.first().copied() {
            let _ = doc.tree_mut().append_child(node, first);
        }
    }
}
