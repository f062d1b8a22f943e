//! XML serializer
//!
//! Depth-first writer over the arena. Close tags are always written out in
//! full, so an empty element serializes as `<a></a>`, never `<a/>`.

use quick_xml::escape::escape;
use xdt_dom::{Document, NodeData, NodeId, XmlTree};

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Serialize a whole document, XML declaration included
pub fn document_to_string(doc: &Document) -> String {
    let mut out = String::from(XML_DECL);
    for child in doc.tree().children(doc.tree().root()) {
        write_node(doc.tree(), child, &mut out);
    }
    out
}

/// Serialize a single node and its subtree, no declaration
pub fn node_to_string(tree: &XmlTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

fn write_node(tree: &XmlTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.data {
        NodeData::Document => {
            for child in tree.children(id) {
                write_node(tree, child, out);
            }
        }
        NodeData::Element(elem) => {
            let name = elem.qualified_name();
            out.push('<');
            out.push_str(&name);
            for attr in &elem.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                out.push_str(&escape(attr.value.as_str()));
                out.push('"');
            }
            out.push('>');
            for child in tree.children(id) {
                write_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(&name);
            out.push('>');
        }
        NodeData::Text(text) => out.push_str(&escape(text.as_str())),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_document;

    #[test]
    fn test_explicit_close_tags() {
        let doc = parse_document("<root><a/></root>").unwrap();
        let xml = node_to_string(doc.tree(), doc.root_element().unwrap());
        assert_eq!(xml, "<root><a></a></root>");
    }

    #[test]
    fn test_document_declaration() {
        let doc = parse_document("<root/>").unwrap();
        let xml = document_to_string(&doc);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.ends_with("<root></root>"));
    }

    #[test]
    fn test_escaping() {
        let doc = parse_document("<root a=\"x &amp; y\">1 &lt; 2</root>").unwrap();
        let xml = node_to_string(doc.tree(), doc.root_element().unwrap());
        assert_eq!(xml, "<root a=\"x &amp; y\">1 &lt; 2</root>");
    }

    #[test]
    fn test_round_trip() {
        let src = "<root xmlns:q=\"urn:example\"><q:item id=\"a\">v</q:item><!--note--></root>";
        let doc = parse_document(src).unwrap();
        let xml = node_to_string(doc.tree(), doc.root_element().unwrap());
        let again = parse_document(&xml).unwrap();
        assert_eq!(
            node_to_string(again.tree(), again.root_element().unwrap()),
            xml
        );
    }
}
