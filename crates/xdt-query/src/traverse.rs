//! Result-set traversal
//!
//! jQuery-flavored navigation helpers over a result set. Optional selector
//! arguments narrow the produced set by running the engine in filter mode.
//! Only element nodes ever enter a result set.

use crate::engine::{Engine, QueryContext, SelectMode};
use crate::list::NodeList;
use xdt_dom::Document;

fn filter_scope(
    doc: &Document,
    ctx: &QueryContext,
    list: NodeList,
    selector: Option<&str>,
) -> NodeList {
    match selector {
        None => list,
        Some(selector) => {
            let scoped = ctx.scoped(list);
            Engine::new(doc.tree()).select(selector, &scoped, SelectMode::Filter)
        }
    }
}

/// Element children of each node in the set
pub fn children(
    doc: &Document,
    ctx: &QueryContext,
    list: &NodeList,
    selector: Option<&str>,
) -> NodeList {
    let mut out = NodeList::new();
    for node in list {
        for child in doc.tree().element_children(node) {
            out.push(child);
        }
    }
    filter_scope(doc, ctx, out, selector)
}

/// Parent element of each node in the set
pub fn parent(
    doc: &Document,
    ctx: &QueryContext,
    list: &NodeList,
    selector: Option<&str>,
) -> NodeList {
    let mut out = NodeList::new();
    for node in list {
        if let Some(p) = doc.tree().parent(node) {
            if doc.tree().is_element(p) {
                out.push(p);
            }
        }
    }
    filter_scope(doc, ctx, out, selector)
}

/// Ancestor elements of each node in the set, nearest first
pub fn parents(
    doc: &Document,
    ctx: &QueryContext,
    list: &NodeList,
    selector: Option<&str>,
) -> NodeList {
    let mut out = NodeList::new();
    for node in list {
        let mut cur = doc.tree().parent(node);
        while let Some(p) = cur {
            if doc.tree().is_element(p) {
                out.push(p);
            }
            cur = doc.tree().parent(p);
        }
    }
    filter_scope(doc, ctx, out, selector)
}

/// The full element-child set of each node's parent, the node included
pub fn siblings(
    doc: &Document,
    ctx: &QueryContext,
    list: &NodeList,
    selector: Option<&str>,
) -> NodeList {
    let mut out = NodeList::new();
    for node in list {
        let Some(p) = doc.tree().parent(node) else {
            continue;
        };
        for sibling in doc.tree().element_children(p) {
            out.push(sibling);
        }
    }
    filter_scope(doc, ctx, out, selector)
}

/// All element siblings following each node in the set
pub fn next(
    doc: &Document,
    ctx: &QueryContext,
    list: &NodeList,
    selector: Option<&str>,
) -> NodeList {
    let mut out = NodeList::new();
    for node in list {
        let Some(p) = doc.tree().parent(node) else {
            continue;
        };
        let siblings = doc.tree().element_children(p);
        if let Some(pos) = siblings.iter().position(|&s| s == node) {
            for &sibling in &siblings[pos + 1..] {
                out.push(sibling);
            }
        }
    }
    filter_scope(doc, ctx, out, selector)
}

/// All element siblings preceding each node in the set, nearest first
pub fn prev(
    doc: &Document,
    ctx: &QueryContext,
    list: &NodeList,
    selector: Option<&str>,
) -> NodeList {
    let mut out = NodeList::new();
    for node in list {
        let Some(p) = doc.tree().parent(node) else {
            continue;
        };
        let siblings = doc.tree().element_children(p);
        if let Some(pos) = siblings.iter().position(|&s| s == node) {
            for &sibling in siblings[..pos].iter().rev() {
                out.push(sibling);
            }
        }
    }
    filter_scope(doc, ctx, out, selector)
}

/// Select within each node's subtree, unioning the per-node results
pub fn find(doc: &Document, ctx: &QueryContext, list: &NodeList, selector: &str) -> NodeList {
    let engine = Engine::new(doc.tree());
    let mut out = NodeList::new();
    for node in list {
        out.merge(engine.select_in(selector, node, ctx));
    }
    out
}

/// Reduce the set to the nodes matching the selector
pub fn filter(doc: &Document, ctx: &QueryContext, list: &NodeList, selector: &str) -> NodeList {
    filter_scope(doc, ctx, list.clone(), Some(selector))
}

/// Reduce the set to the nodes NOT matching the selector
pub fn not(doc: &Document, ctx: &QueryContext, list: &NodeList, selector: &str) -> NodeList {
    let matched = filter(doc, ctx, list, selector);
    list.iter().filter(|&n| !matched.contains(n)).collect()
}

/// Position of the set's first node among all of its parent's children
/// (text and comment siblings count)
pub fn index(doc: &Document, list: &NodeList) -> Option<usize> {
    let node = list.first()?;
    let parent = doc.tree().parent(node)?;
    doc.tree().children(parent).position(|c| c == node)
}

/// True when every node in the set carries the class
pub fn has_class(doc: &Document, list: &NodeList, class: &str) -> bool {
    list.iter().all(|node| {
        doc.tree()
            .element(node)
            .is_some_and(|e| e.has_class(class))
    })
}

/// True when every node in the set carries the attribute
pub fn has_attr(doc: &Document, list: &NodeList, name: &str) -> bool {
    list.iter()
        .all(|node| doc.tree().element(node).is_some_and(|e| e.has_attr(name)))
}

/// Qualified tag name of the set's first node
pub fn name(doc: &Document, list: &NodeList) -> Option<String> {
    let node = list.first()?;
    doc.tree().element(node).map(|e| e.qualified_name())
}

/// Text values of every node in the set
pub fn values(doc: &Document, list: &NodeList) -> Vec<String> {
    list.iter()
        .map(|node| doc.tree().text_content(node))
        .collect()
}
