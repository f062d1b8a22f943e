//! XML parser
//!
//! Drives quick-xml's namespace-resolving reader and builds the arena tree.
//! Whitespace-only text is dropped; empty-element tags are expanded so the
//! tree never distinguishes `<a/>` from `<a></a>`.

use crate::XmlError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use xdt_dom::{Document, NodeId, XmlTree};

/// Parse a complete XML document
pub fn parse_document(xml: &str) -> Result<Document, XmlError> {
    let mut doc = Document::new();
    let anchor = doc.tree.root();
    parse_into(doc.tree_mut(), Some(anchor), xml)?;
    if doc.root_element().is_none() {
        return Err(XmlError::NoRootElement);
    }
    tracing::debug!("parsed XML document, {} nodes", doc.tree().len());
    Ok(doc)
}

/// Parse a markup fragment into an existing arena.
///
/// The produced top-level nodes are left detached and returned in document
/// order, ready to be inserted wherever the caller wants them.
pub fn parse_fragment(tree: &mut XmlTree, xml: &str) -> Result<Vec<NodeId>, XmlError> {
    parse_into(tree, None, xml)
}

fn parse_into(
    tree: &mut XmlTree,
    anchor: Option<NodeId>,
    xml: &str,
) -> Result<Vec<NodeId>, XmlError> {
    let mut reader = NsReader::from_str(xml);
    let config = reader.config_mut();
    config.trim_text_start = true;
    config.trim_text_end = true;
    config.expand_empty_elements = true;

    let mut stack: Vec<NodeId> = Vec::new();
    let mut top_level: Vec<NodeId> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let (resolve, event) = reader.read_resolved_event_into(&mut buf)?;
        match event {
            Event::Start(start) => {
                let elem = create_element(tree, &start, resolve)?;
                attach(tree, &stack, anchor, &mut top_level, elem);
                stack.push(elem);
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(text) => {
                let content = text.unescape()?;
                if !content.is_empty() {
                    let node = tree.create_text(&content);
                    attach(tree, &stack, anchor, &mut top_level, node);
                }
            }
            Event::CData(cdata) => {
                let content = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                let node = tree.create_text(&content);
                attach(tree, &stack, anchor, &mut top_level, node);
            }
            Event::Comment(comment) => {
                let content = String::from_utf8_lossy(&comment).into_owned();
                let node = tree.create_comment(&content);
                attach(tree, &stack, anchor, &mut top_level, node);
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Empty(_) => {}
            Event::Eof => break,
        }
        buf.clear();
    }

    Ok(top_level)
}

fn create_element(
    tree: &mut XmlTree,
    start: &BytesStart<'_>,
    resolve: ResolveResult<'_>,
) -> Result<NodeId, XmlError> {
    let name = start.name();
    let local = String::from_utf8_lossy(name.local_name().into_inner()).into_owned();
    let prefix = name
        .prefix()
        .map(|p| String::from_utf8_lossy(p.into_inner()).into_owned());
    let namespace = match resolve {
        ResolveResult::Bound(ns) => {
            Some(String::from_utf8_lossy(ns.into_inner()).into_owned())
        }
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    };

    let elem = tree.create_element_ns(&local, prefix, namespace);
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.into_inner()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        if let Some(data) = tree.element_mut(elem) {
            data.set_attr(&key, value);
        }
    }
    Ok(elem)
}

fn attach(
    tree: &mut XmlTree,
    stack: &[NodeId],
    anchor: Option<NodeId>,
    top_level: &mut Vec<NodeId>,
    node: NodeId,
) {
    match stack.last().copied().or(anchor) {
        // parent and node are freshly allocated, the append cannot cycle
        Some(parent) => {
            let _ = tree.append_child(parent, node);
        }
        None => top_level.push(node),
    }
}
