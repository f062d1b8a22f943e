//! Selector compiler
//!
//! Recursive-descent parser over the token stream. Branches split on
//! top-level commas, steps split on combinators, and each segment's markers
//! populate one `SimpleSelector`. A fragment the grammar cannot place marks
//! the simple selector as malformed, which matches nothing at execution
//! time; compilation itself never fails.

use crate::ast::{
    AttrOp, AttributeTest, CompiledSelector, Combinator, NthFormula, Pseudo, SelectorGroup,
    SelectorStep, SimpleSelector, TagMatch,
};
use crate::lexer::{tokenize, Token};

/// Compile a selector string into a `SelectorGroup`
pub fn compile(selector: &str) -> SelectorGroup {
    let tokens = tokenize(selector);
    let branches = tokens
        .split(|t| *t == Token::Comma)
        .filter_map(parse_branch)
        .collect();
    SelectorGroup { branches }
}

fn parse_branch(tokens: &[Token]) -> Option<CompiledSelector> {
    let mut steps = Vec::new();
    let mut pending: Option<Combinator> = None;
    let mut segment: Vec<&Token> = Vec::new();

    for token in tokens {
        if let Token::Combinator(c) = token {
            if !segment.is_empty() {
                push_step(&mut steps, pending, &segment);
                segment.clear();
            }
            pending = Some(*c);
        } else {
            segment.push(token);
        }
    }
    if !segment.is_empty() {
        push_step(&mut steps, pending, &segment);
    }

    if steps.is_empty() {
        None
    } else {
        Some(CompiledSelector { steps })
    }
}

fn push_step(steps: &mut Vec<SelectorStep>, pending: Option<Combinator>, segment: &[&Token]) {
    // a combinator with nothing on its left is dropped, the segment
    // becomes the branch head
    let combinator = if steps.is_empty() { None } else { pending };
    steps.push(SelectorStep {
        combinator,
        simple: parse_simple(segment),
    });
}

fn parse_simple(tokens: &[&Token]) -> SimpleSelector {
    let mut simple = SimpleSelector::default();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            Token::Star => {
                if simple.tag.is_none() {
                    simple.tag = Some(TagMatch::Any);
                }
                i += 1;
            }
            Token::Ident(name) => {
                if simple.tag.is_none() {
                    simple.tag = Some(TagMatch::Name(name.clone()));
                }
                i += 1;
            }
            Token::Hash => {
                if let Some(Token::Ident(name)) = tokens.get(i + 1) {
                    simple.id = Some(name.clone());
                    i += 2;
                } else {
                    simple.malformed = true;
                    i += 1;
                }
            }
            Token::Dot => {
                if let Some(Token::Ident(name)) = tokens.get(i + 1) {
                    simple.classes.insert(name.clone());
                    i += 2;
                } else {
                    simple.malformed = true;
                    i += 1;
                }
            }
            Token::Colon => {
                let name = match tokens.get(i + 1) {
                    Some(Token::Ident(name)) => name.as_str(),
                    _ => {
                        simple.malformed = true;
                        i += 1;
                        continue;
                    }
                };
                let arg = match tokens.get(i + 2) {
                    Some(Token::Arg(arg)) => {
                        i += 3;
                        Some(arg.as_str())
                    }
                    _ => {
                        i += 2;
                        None
                    }
                };
                match parse_pseudo(name, arg) {
                    Some(pseudo) => simple.pseudo = Some(pseudo),
                    None => simple.malformed = true,
                }
            }
            Token::AttrStart => {
                let consumed = parse_attr(&tokens[i..], &mut simple);
                i += consumed;
            }
            Token::Malformed => {
                simple.malformed = true;
                i += 1;
            }
            // stray tokens outside their context
            _ => {
                simple.malformed = true;
                i += 1;
            }
        }
    }

    simple
}

/// Parse an attribute block starting at `AttrStart`; returns tokens consumed
fn parse_attr(tokens: &[&Token], simple: &mut SimpleSelector) -> usize {
    let mut i = 1;
    let mut name = None;
    let mut op = None;
    let mut value = None;
    let mut closed = false;

    while i < tokens.len() {
        match tokens[i] {
            Token::Ident(n) if name.is_none() && op.is_none() => name = Some(n.clone()),
            Token::AttrOp(raw) => match parse_attr_op(raw) {
                Some(parsed) => op = Some(parsed),
                None => simple.malformed = true,
            },
            Token::AttrValue(v) => value = Some(v.clone()),
            Token::AttrEnd => {
                closed = true;
                i += 1;
                break;
            }
            Token::Malformed => {
                simple.malformed = true;
                i += 1;
                break;
            }
            _ => {
                simple.malformed = true;
            }
        }
        i += 1;
    }

    match name {
        Some(name) if closed && !simple.malformed => {
            let op_needs_value = op.is_some() && value.is_none();
            if op_needs_value {
                simple.malformed = true;
            } else {
                simple.attr = Some(AttributeTest { name, op, value });
            }
        }
        _ => simple.malformed = true,
    }
    i
}

fn parse_attr_op(raw: &str) -> Option<AttrOp> {
    match raw {
        "=" => Some(AttrOp::Equals),
        "*=" => Some(AttrOp::Contains),
        "^=" => Some(AttrOp::StartsWith),
        "$=" => Some(AttrOp::EndsWith),
        "|" | ">" => Some(AttrOp::GreaterThan),
        "|=" | ">=" => Some(AttrOp::GreaterOrEqual),
        "<" => Some(AttrOp::LessThan),
        "<=" => Some(AttrOp::LessOrEqual),
        _ => None,
    }
}

fn parse_pseudo(name: &str, arg: Option<&str>) -> Option<Pseudo> {
    match (name, arg) {
        ("first" | "first-child", None) => Some(Pseudo::First),
        ("last" | "last-child", None) => Some(Pseudo::Last),
        ("root", None) => Some(Pseudo::Root),
        ("eq", Some(arg)) => match parse_nth(arg)? {
            NthFormula::Literal(i) => Some(Pseudo::Eq(i)),
            formula => Some(Pseudo::Nth(formula)),
        },
        ("nth" | "nth-child", Some(arg)) => Some(Pseudo::Nth(parse_nth(arg)?)),
        ("not", Some(arg)) => Some(Pseudo::Not(compile(arg))),
        _ => None,
    }
}

fn parse_nth(arg: &str) -> Option<NthFormula> {
    let s: String = arg
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    match s.as_str() {
        "even" => return Some(NthFormula::Even),
        "odd" => return Some(NthFormula::Odd),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(NthFormula::Literal(i));
    }

    let n_pos = s.find('n')?;
    let a_str = &s[..n_pos];
    let a = if a_str.is_empty() || a_str == "+" {
        1
    } else {
        a_str.parse().ok()?
    };
    let rest = &s[n_pos + 1..];
    let b = if rest.is_empty() {
        0
    } else {
        rest.strip_prefix('+').unwrap_or(rest).parse().ok()?
    };
    Some(NthFormula::Linear { a, b })
}
