//! XDT Query - selector engine
//!
//! The core of XDT: a typed-token lexer, a recursive-descent compiler
//! producing a `SelectorGroup` AST, predicate evaluators, and an executor
//! that walks the tree (or a prior result set) to produce a `NodeList`.
//! Selector problems degrade to empty results; the only hard failure in
//! this crate is out-of-range indexed access into a `NodeList`.

mod ast;
mod engine;
mod eval;
mod lexer;
mod list;
mod parser;

pub mod ops;
pub mod traverse;

pub use ast::{
    AttrOp, AttributeTest, Combinator, CompiledSelector, NthFormula, Pseudo, SelectorGroup,
    SelectorStep, SimpleSelector, TagMatch,
};
pub use engine::{Engine, QueryContext, SelectMode};
pub use list::{NodeList, SelectError};
pub use ops::Content;
pub use parser::compile;
