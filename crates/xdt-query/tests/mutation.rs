//! Mutation and traversal tests
//!
//! Edits act on live tree nodes; nothing here touches storage.

use xdt_dom::Document;
use xdt_query::{ops, traverse, Content, Engine, NodeList, QueryContext, SelectMode};
use xdt_xml::{node_to_string, parse_document, parse_fragment};

fn load(xml: &str) -> (Document, QueryContext) {
    let doc = parse_document(xml).unwrap();
    let ctx = QueryContext::new(doc.tree().root());
    (doc, ctx)
}

fn select(doc: &Document, ctx: &QueryContext, selector: &str) -> NodeList {
    Engine::new(doc.tree()).select(selector, ctx, SelectMode::Reset)
}

fn root_markup(doc: &Document) -> String {
    node_to_string(doc.tree(), doc.root_element().unwrap())
}

const TWO_ITEMS: &str =
    "<root><item id=\"a\" class=\"x\">1</item><item id=\"b\" class=\"y\">2</item></root>";

#[test]
fn test_append_markup_then_reselect() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let root = select(&doc, &ctx, "root");
    ops::append(
        &mut doc,
        &ctx,
        &root,
        &Content::Markup("<item id=\"c\" class=\"z\">3</item>"),
    );

    let found = select(&doc, &ctx, "item.z");
    assert_eq!(found.len(), 1);
    let node = found.first().unwrap();
    assert_eq!(doc.tree().attr(node, "id"), Some("c"));
    // the selection refers to the exact inserted node
    assert_eq!(doc.tree().element_children(doc.root_element().unwrap())[2], node);
}

#[test]
fn test_insert_before_selector_target() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let fresh = parse_fragment(doc.tree_mut(), "<item id=\"n\"/>").unwrap();
    let list = NodeList::from_vec(fresh);

    ops::insert_before(&mut doc, &ctx, &list, &Content::Selector("#b"));
    assert_eq!(root_children_ids(&doc), vec!["a", "n", "b"]);
}

#[test]
fn test_insert_after_preserves_order() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let fresh = parse_fragment(doc.tree_mut(), "<item id=\"n1\"/><item id=\"n2\"/>").unwrap();
    let list = NodeList::from_vec(fresh);

    ops::insert_after(&mut doc, &ctx, &list, &Content::Selector("#a"));
    assert_eq!(root_children_ids(&doc), vec!["a", "n1", "n2", "b"]);
}

fn root_children_ids(doc: &Document) -> Vec<String> {
    doc.tree()
        .element_children(doc.root_element().unwrap())
        .iter()
        .map(|&n| doc.tree().attr(n, "id").unwrap_or("?").to_string())
        .collect()
}

#[test]
fn test_prepend_markup() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let root = select(&doc, &ctx, "root");
    ops::prepend(&mut doc, &ctx, &root, &Content::Markup("<item id=\"n\"/>"));
    assert_eq!(root_children_ids(&doc), vec!["n", "a", "b"]);
}

#[test]
fn test_append_to_every_target() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let fresh = parse_fragment(doc.tree_mut(), "<mark/>").unwrap();
    let list = NodeList::from_vec(fresh);

    ops::append_to(&mut doc, &ctx, &list, &Content::Selector("item"));
    // the node moves through every target and settles in the last one
    let b = select(&doc, &ctx, "#b").first().unwrap();
    let a = select(&doc, &ctx, "#a").first().unwrap();
    assert_eq!(doc.tree().element_children(b).len(), 1);
    assert_eq!(doc.tree().element_children(a).len(), 0);
}

#[test]
fn test_wrap_collects_set_into_one_wrapper() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let items = select(&doc, &ctx, "item");
    ops::wrap(&mut doc, &ctx, &items, &Content::Markup("<box/>"));

    let root = doc.root_element().unwrap();
    let kids = doc.tree().element_children(root);
    assert_eq!(kids.len(), 1);
    assert_eq!(doc.tree().tag_name(kids[0]), Some("box"));
    assert_eq!(
        doc.tree()
            .element_children(kids[0])
            .iter()
            .map(|&n| doc.tree().attr(n, "id").unwrap().to_string())
            .collect::<Vec<_>>(),
        vec!["a", "b"]
    );
}

#[test]
fn test_replace_with_clones_per_node() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let items = select(&doc, &ctx, "item");
    let replaced = ops::replace_with(&mut doc, &ctx, &items, &Content::Markup("<new/>"));

    assert_eq!(replaced, items);
    let root = doc.root_element().unwrap();
    let kids = doc.tree().element_children(root);
    assert_eq!(kids.len(), 2);
    assert!(kids.iter().all(|&k| doc.tree().tag_name(k) == Some("new")));
    // two independent clones
    assert_ne!(kids[0], kids[1]);
}

#[test]
fn test_remove_and_reinsert() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let items = select(&doc, &ctx, "item.x");
    ops::remove(&mut doc, &items);
    assert_eq!(root_children_ids(&doc), vec!["b"]);

    // removed nodes stay alive and can come back
    let root = select(&doc, &ctx, "root");
    ops::append(&mut doc, &ctx, &root, &Content::Set(items));
    assert_eq!(root_children_ids(&doc), vec!["b", "a"]);
}

#[test]
fn test_empty_node() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let items = select(&doc, &ctx, "item");
    ops::empty(&mut doc, &items);
    assert_eq!(root_markup(&doc).contains('1'), false);
    assert_eq!(root_children_ids(&doc), vec!["a", "b"]);
}

#[test]
fn test_set_attr_only_touches_existing() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let items = select(&doc, &ctx, "item");

    ops::set_attr(&mut doc, &items, "class", "changed");
    ops::set_attr(&mut doc, &items, "missing", "value");

    assert_eq!(ops::attr(&doc, &items, "class").as_deref(), Some("changed"));
    assert_eq!(ops::attr(&doc, &items, "missing"), None);
}

#[test]
fn test_set_data_creates_attributes() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let items = select(&doc, &ctx, "item");
    ops::set_data(&mut doc, &items, &[("missing", "value"), ("id", "z")]);

    assert_eq!(ops::attr(&doc, &items, "missing").as_deref(), Some("value"));
    assert_eq!(ops::attr(&doc, &items, "id").as_deref(), Some("z"));
}

#[test]
fn test_val_and_text() {
    let (mut doc, ctx) = load("<root><item id=\"a\">  padded  </item></root>");
    let items = select(&doc, &ctx, "item");
    assert_eq!(ops::val(&doc, &items).as_deref(), Some("  padded  "));
    assert_eq!(ops::text(&doc, &items).as_deref(), Some("padded"));

    ops::set_val(&mut doc, &items, "new");
    assert_eq!(ops::val(&doc, &items).as_deref(), Some("new"));
}

#[test]
fn test_html_get_and_set() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let items = select(&doc, &ctx, "item.x");
    assert_eq!(
        ops::html(&doc, &items).as_deref(),
        Some("<item id=\"a\" class=\"x\">1</item>")
    );

    ops::set_html(&mut doc, &items, "<inner>v</inner>");
    assert_eq!(
        ops::html(&doc, &items).as_deref(),
        Some("<item id=\"a\" class=\"x\"><inner>v</inner></item>")
    );
}

#[test]
fn test_unresolvable_target_is_noop() {
    let (mut doc, ctx) = load(TWO_ITEMS);
    let items = select(&doc, &ctx, "item");
    let before = root_markup(&doc);

    ops::insert_before(&mut doc, &ctx, &items, &Content::Selector("missing"));
    ops::append(&mut doc, &ctx, &items, &Content::Markup("<unclosed"));

    assert_eq!(root_markup(&doc), before);
}

const NESTED: &str = "<root>\
    <section id=\"s1\"><item id=\"a\" class=\"x\"/><item id=\"b\"/></section>\
    <section id=\"s2\"><item id=\"c\"/></section>\
    </root>";

fn ids(doc: &Document, list: &NodeList) -> Vec<String> {
    list.iter()
        .map(|n| doc.tree().attr(n, "id").unwrap_or("?").to_string())
        .collect()
}

#[test]
fn test_children_with_filter() {
    let (doc, ctx) = load(NESTED);
    let sections = select(&doc, &ctx, "section");
    let all = traverse::children(&doc, &ctx, &sections, None);
    assert_eq!(ids(&doc, &all), vec!["a", "b", "c"]);

    let filtered = traverse::children(&doc, &ctx, &sections, Some(".x"));
    assert_eq!(ids(&doc, &filtered), vec!["a"]);
}

#[test]
fn test_parent_and_parents() {
    let (doc, ctx) = load(NESTED);
    let a = select(&doc, &ctx, "#a");
    assert_eq!(
        ids(&doc, &traverse::parent(&doc, &ctx, &a, None)),
        vec!["s1"]
    );

    let ancestors = traverse::parents(&doc, &ctx, &a, None);
    let names: Vec<_> = ancestors
        .iter()
        .map(|n| doc.tree().tag_name(n).unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["section", "root"]);
}

#[test]
fn test_siblings_include_self() {
    let (doc, ctx) = load(NESTED);
    let a = select(&doc, &ctx, "#a");
    assert_eq!(
        ids(&doc, &traverse::siblings(&doc, &ctx, &a, None)),
        vec!["a", "b"]
    );
}

#[test]
fn test_next_and_prev() {
    let (doc, ctx) = load(FIVE);
    let three = select(&doc, &ctx, "#3");
    assert_eq!(
        ids(&doc, &traverse::next(&doc, &ctx, &three, None)),
        vec!["4", "5"]
    );
    // preceding siblings come nearest first
    assert_eq!(
        ids(&doc, &traverse::prev(&doc, &ctx, &three, None)),
        vec!["2", "1"]
    );
}

const FIVE: &str = "<list>\
    <li id=\"1\"/><li id=\"2\"/><li id=\"3\"/><li id=\"4\"/><li id=\"5\"/>\
    </list>";

#[test]
fn test_find_unions_subtrees() {
    let (doc, ctx) = load(NESTED);
    let sections = select(&doc, &ctx, "section");
    assert_eq!(
        ids(&doc, &traverse::find(&doc, &ctx, &sections, "item")),
        vec!["a", "b", "c"]
    );
}

#[test]
fn test_filter_and_not_partition() {
    let (doc, ctx) = load(NESTED);
    let items = select(&doc, &ctx, "item");
    assert_eq!(
        ids(&doc, &traverse::filter(&doc, &ctx, &items, ".x")),
        vec!["a"]
    );
    assert_eq!(
        ids(&doc, &traverse::not(&doc, &ctx, &items, ".x")),
        vec!["b", "c"]
    );
}

#[test]
fn test_index_counts_all_sibling_kinds() {
    let (doc, ctx) = load("<root>lead<item id=\"a\"/></root>");
    let a = select(&doc, &ctx, "#a");
    // the text node before the item counts
    assert_eq!(traverse::index(&doc, &a), Some(1));
}

#[test]
fn test_has_class_and_has_attr_require_all() {
    let (doc, ctx) = load(NESTED);
    let items = select(&doc, &ctx, "item");
    assert!(!traverse::has_class(&doc, &items, "x"));
    assert!(traverse::has_attr(&doc, &items, "id"));

    let a = select(&doc, &ctx, "#a");
    assert!(traverse::has_class(&doc, &a, "x"));
}

#[test]
fn test_name_and_values() {
    let (doc, ctx) = load("<root><a>1</a><b>2</b></root>");
    let all = select(&doc, &ctx, "a, b");
    assert_eq!(traverse::name(&doc, &all).as_deref(), Some("a"));
    assert_eq!(traverse::values(&doc, &all), vec!["1", "2"]);
}
