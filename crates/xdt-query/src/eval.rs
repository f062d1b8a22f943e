//! Predicate evaluators
//!
//! Per-element tests consulted by the executor: tag, class, attribute
//! operators and positional pseudo-classes. Attribute ordering comparisons
//! are string-level, not numeric: `"10" > "5"` is false because `'1' < '5'`.
//! The namespace filter is applied here, at the predicate boundary, which is
//! what makes one engine serve both the plain and namespace-aware dialects.

use crate::ast::{AttrOp, AttributeTest, Pseudo, TagMatch};
use std::collections::BTreeSet;
use xdt_dom::ElementData;

/// Tag test (`*` matches any element)
pub fn tag_matches(elem: &ElementData, tag: &TagMatch) -> bool {
    match tag {
        TagMatch::Any => true,
        TagMatch::Name(name) => elem.name.eq_ignore_ascii_case(name),
    }
}

/// All selector classes must appear in the element's `class` attribute
pub fn class_matches(elem: &ElementData, classes: &BTreeSet<String>) -> bool {
    classes.iter().all(|c| elem.has_class(c))
}

/// Attribute test; absent attribute never matches
pub fn attr_matches(elem: &ElementData, test: &AttributeTest) -> bool {
    let Some(actual) = elem.attr(&test.name) else {
        return false;
    };
    match (&test.op, &test.value) {
        (Some(op), Some(expected)) => {
            let expected = expected.as_str();
            match op {
                AttrOp::Equals => actual == expected,
                AttrOp::Contains => actual.contains(expected),
                AttrOp::StartsWith => actual.starts_with(expected),
                AttrOp::EndsWith => actual.ends_with(expected),
                AttrOp::GreaterThan => actual > expected,
                AttrOp::GreaterOrEqual => actual >= expected,
                AttrOp::LessThan => actual < expected,
                AttrOp::LessOrEqual => actual <= expected,
            }
        }
        // bare [name] is a presence test
        _ => true,
    }
}

/// Namespace filter; `None` and `*` match every element
pub fn namespace_matches(elem: &ElementData, filter: Option<&str>) -> bool {
    match filter {
        None | Some("*") => true,
        Some(uri) => elem.namespace.as_deref() == Some(uri),
    }
}

/// Positional pseudo test against a 0-based sibling position among the
/// parent's element children. `Not` and `Root` are resolved by the executor.
pub fn positional_matches(pseudo: &Pseudo, position: usize, count: usize) -> bool {
    let position_1 = position as i64 + 1;
    match pseudo {
        Pseudo::First => position == 0,
        Pseudo::Last => position + 1 == count,
        Pseudo::Eq(i) => position_1 == *i,
        Pseudo::Nth(formula) => formula.matches(position_1),
        Pseudo::Not(_) | Pseudo::Root => true,
    }
}
