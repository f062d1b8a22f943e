//! Selector AST
//!
//! A `SelectorGroup` is a set of comma-separated branches; each branch is a
//! sequence of simple selectors glued by combinators. Compilation is pure:
//! the same selector text always produces an equal AST.

use std::collections::BTreeSet;

/// Operator relating two consecutive simple selectors in a branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: all descendant elements
    Descendant,
    /// `>`: direct element children
    Child,
    /// `+`: the full element-child set of the previous match's parent.
    ///
    /// Not CSS adjacent-sibling semantics; the selection deliberately
    /// re-expands to the whole sibling group.
    AdjacentGroup,
}

/// Tag test of a simple selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatch {
    /// `*`
    Any,
    /// Literal tag name
    Name(String),
}

/// Attribute operators, all comparing at the string level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// `=` exact match
    Equals,
    /// `*=` substring
    Contains,
    /// `^=` prefix
    StartsWith,
    /// `$=` suffix
    EndsWith,
    /// `|` (or `>`) lexicographic greater-than
    GreaterThan,
    /// `|=` (or `>=`) lexicographic greater-or-equal
    GreaterOrEqual,
    /// `<` lexicographic less-than
    LessThan,
    /// `<=` lexicographic less-or-equal
    LessOrEqual,
}

/// `[name]` / `[name op value]` test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTest {
    pub name: String,
    pub op: Option<AttrOp>,
    pub value: Option<String>,
}

/// Positional/structural pseudo-class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pseudo {
    /// `:first` / `:first-child`
    First,
    /// `:last` / `:last-child`
    Last,
    /// `:eq(i)`, 1-based sibling position
    Eq(i64),
    /// `:nth(...)` / `:nth-child(...)`
    Nth(NthFormula),
    /// `:not(group)`
    Not(SelectorGroup),
    /// `:root`
    Root,
}

/// The argument of an nth formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NthFormula {
    Even,
    Odd,
    /// Literal 1-based position
    Literal(i64),
    /// `a·n+b` with `n` ranging over non-negative integers
    Linear { a: i64, b: i64 },
}

impl NthFormula {
    /// Check whether a 1-based sibling position satisfies the formula
    pub fn matches(&self, position: i64) -> bool {
        match *self {
            Self::Even => position % 2 == 0,
            Self::Odd => position % 2 != 0,
            Self::Literal(i) => position == i,
            Self::Linear { a, b } => {
                if a == 0 {
                    return position == b;
                }
                let diff = position - b;
                diff >= 0 && diff % a == 0
            }
        }
    }
}

/// One tag/id/class/attribute/pseudo test group with no combinator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleSelector {
    pub tag: Option<TagMatch>,
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub attr: Option<AttributeTest>,
    pub pseudo: Option<Pseudo>,
    /// Set when a bracket or pseudo fragment failed to parse; such a
    /// selector matches no element
    pub malformed: bool,
}

impl SimpleSelector {
    /// True when the selector carries no test at all (matches the scope
    /// unchanged)
    pub fn is_bare(&self) -> bool {
        !self.malformed
            && self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attr.is_none()
            && self.pseudo.is_none()
    }
}

/// A simple selector plus the combinator gluing it to the previous one
/// (absent on the first step of a branch)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorStep {
    pub combinator: Option<Combinator>,
    pub simple: SimpleSelector,
}

/// One comma-branch of a selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSelector {
    pub steps: Vec<SelectorStep>,
}

/// A full selector: comma-separated alternatives, evaluated by union
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorGroup {
    pub branches: Vec<CompiledSelector>,
}

impl SelectorGroup {
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nth_even_odd() {
        assert!(!NthFormula::Even.matches(1));
        assert!(NthFormula::Even.matches(2));
        assert!(NthFormula::Odd.matches(1));
        assert!(NthFormula::Odd.matches(5));
    }

    #[test]
    fn test_nth_linear() {
        // 2n+1 over five siblings selects 1, 3, 5
        let f = NthFormula::Linear { a: 2, b: 1 };
        let hits: Vec<i64> = (1..=5).filter(|&p| f.matches(p)).collect();
        assert_eq!(hits, vec![1, 3, 5]);

        // 3n selects every third position
        let f = NthFormula::Linear { a: 3, b: 0 };
        let hits: Vec<i64> = (1..=9).filter(|&p| f.matches(p)).collect();
        assert_eq!(hits, vec![3, 6, 9]);
    }

    #[test]
    fn test_nth_literal() {
        assert!(NthFormula::Literal(4).matches(4));
        assert!(!NthFormula::Literal(4).matches(3));
    }

    #[test]
    fn test_bare_selector() {
        assert!(SimpleSelector::default().is_bare());
        let tagged = SimpleSelector {
            tag: Some(TagMatch::Any),
            ..Default::default()
        };
        assert!(!tagged.is_bare());
    }
}
