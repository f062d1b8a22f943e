//! Query executor
//!
//! Walks the tree (or a prior result set) applying one branch step at a
//! time: the combinator expands the scope, then the simple selector's
//! predicates narrow it. All state lives in the caller-held `QueryContext`;
//! the engine itself only borrows the tree.

use crate::ast::{Combinator, CompiledSelector, Pseudo, SelectorGroup, SimpleSelector, TagMatch};
use crate::eval;
use crate::list::NodeList;
use crate::parser::compile;
use xdt_dom::{NodeId, XmlTree};

/// What to do with the context's current scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Ignore any prior result set and search the whole document
    Reset,
    /// Narrow the context's current scope
    Filter,
}

/// Caller-held query state
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// Prior result set, consumed in [`SelectMode::Filter`]
    pub scope: Option<NodeList>,
    /// Document node (or root element) queries start from
    pub root: NodeId,
    /// Namespace URI filter; `None` or `*` matches everything
    pub namespace: Option<String>,
}

impl QueryContext {
    pub fn new(root: NodeId) -> Self {
        Self {
            scope: None,
            root,
            namespace: None,
        }
    }

    pub fn with_namespace(root: NodeId, namespace: impl Into<String>) -> Self {
        Self {
            scope: None,
            root,
            namespace: Some(namespace.into()),
        }
    }

    /// Same context with the scope replaced, for chained filtering
    pub fn scoped(&self, scope: NodeList) -> Self {
        Self {
            scope: Some(scope),
            root: self.root,
            namespace: self.namespace.clone(),
        }
    }
}

/// Selector executor over a borrowed tree
pub struct Engine<'a> {
    tree: &'a XmlTree,
}

impl<'a> Engine<'a> {
    pub fn new(tree: &'a XmlTree) -> Self {
        Self { tree }
    }

    /// Evaluate a selector string.
    ///
    /// In [`SelectMode::Filter`] the context's scope is the starting set;
    /// otherwise the whole document under `ctx.root` is.
    pub fn select(&self, selector: &str, ctx: &QueryContext, mode: SelectMode) -> NodeList {
        let group = compile(selector);
        let initial = match (mode, &ctx.scope) {
            (SelectMode::Filter, Some(scope)) => scope.clone(),
            _ => self.universe(ctx.root),
        };
        let result = self.run(&group, &initial, ctx);
        tracing::debug!(selector, matches = result.len(), "selector evaluated");
        result
    }

    /// Evaluate a selector against the subtree below a context node
    pub fn select_in(&self, selector: &str, context: NodeId, ctx: &QueryContext) -> NodeList {
        let group = compile(selector);
        let initial = NodeList::from_vec(self.tree.descendant_elements(context));
        self.run(&group, &initial, ctx)
    }

    /// Every element under (and including) the root
    fn universe(&self, root: NodeId) -> NodeList {
        let mut nodes = Vec::new();
        if self.tree.is_element(root) {
            nodes.push(root);
        }
        nodes.extend(self.tree.descendant_elements(root));
        NodeList::from_vec(nodes)
    }

    fn root_element(&self, ctx: &QueryContext) -> Option<NodeId> {
        if self.tree.is_element(ctx.root) {
            return Some(ctx.root);
        }
        self.tree
            .children(ctx.root)
            .find(|&c| self.tree.is_element(c))
    }

    /// Evaluate a compiled group: branches run independently from the same
    /// initial scope and concatenate, without cross-branch dedup
    pub fn run(&self, group: &SelectorGroup, initial: &NodeList, ctx: &QueryContext) -> NodeList {
        let mut out = NodeList::new();
        for branch in &group.branches {
            out.merge(self.run_branch(branch, initial.clone(), ctx));
        }
        out
    }

    fn run_branch(
        &self,
        branch: &CompiledSelector,
        mut scope: NodeList,
        ctx: &QueryContext,
    ) -> NodeList {
        for step in &branch.steps {
            match step.combinator {
                None => {}
                Some(Combinator::Descendant) => scope = self.expand_descendant(&scope),
                Some(Combinator::Child) => scope = self.expand_child(&scope),
                Some(Combinator::AdjacentGroup) => scope = self.expand_adjacent(&scope),
            }
            if !step.simple.malformed && matches!(step.simple.pseudo, Some(Pseudo::Root)) {
                return match self.root_element(ctx) {
                    Some(root) => NodeList::single(root),
                    None => NodeList::new(),
                };
            }
            scope = self.apply_simple(&step.simple, scope, ctx);
        }
        scope
    }

    fn expand_descendant(&self, scope: &NodeList) -> NodeList {
        let mut out = NodeList::new();
        for node in scope {
            for desc in self.tree.descendant_elements(node) {
                out.push(desc);
            }
        }
        out
    }

    fn expand_child(&self, scope: &NodeList) -> NodeList {
        let mut out = NodeList::new();
        for node in scope {
            for child in self.tree.element_children(node) {
                out.push(child);
            }
        }
        out
    }

    /// `+` re-expands each match to the full element-child set of its
    /// parent, the matched node included
    fn expand_adjacent(&self, scope: &NodeList) -> NodeList {
        let mut out = NodeList::new();
        for node in scope {
            let Some(parent) = self.tree.parent(node) else {
                continue;
            };
            for sibling in self.tree.element_children(parent) {
                out.push(sibling);
            }
        }
        out
    }

    fn apply_simple(
        &self,
        simple: &SimpleSelector,
        scope: NodeList,
        ctx: &QueryContext,
    ) -> NodeList {
        if simple.malformed {
            return NodeList::new();
        }
        if simple.is_bare() {
            return scope;
        }
        let ns = ctx.namespace.as_deref();

        // an id test stands alone: it ignores co-occurring filters
        if let Some(id) = &simple.id {
            return self.select_by_id(&scope, simple.tag.as_ref(), id, ns);
        }

        let mut current: Vec<NodeId> = scope
            .iter()
            .filter(|&node| {
                self.tree
                    .element(node)
                    .is_some_and(|e| eval::namespace_matches(e, ns))
            })
            .collect();

        if let Some(tag) = &simple.tag {
            current.retain(|&node| {
                self.tree
                    .element(node)
                    .is_some_and(|e| eval::tag_matches(e, tag))
            });
        }
        if !simple.classes.is_empty() {
            current.retain(|&node| {
                self.tree
                    .element(node)
                    .is_some_and(|e| eval::class_matches(e, &simple.classes))
            });
        }
        if let Some(test) = &simple.attr {
            current.retain(|&node| {
                self.tree
                    .element(node)
                    .is_some_and(|e| eval::attr_matches(e, test))
            });
        }

        match &simple.pseudo {
            None => NodeList::from_vec(current),
            Some(Pseudo::Root) => match self.root_element(ctx) {
                Some(root) => NodeList::single(root),
                None => NodeList::new(),
            },
            Some(Pseudo::Not(group)) => {
                let base = NodeList::from_vec(current);
                let matched = self.run(group, &base, ctx);
                base.iter().filter(|&n| !matched.contains(n)).collect()
            }
            Some(pseudo) => {
                let mut out = NodeList::new();
                for node in current {
                    let Some((position, count)) = self.tree.element_position(node) else {
                        continue;
                    };
                    // the membership check keeps one sibling scan from
                    // collecting the same node twice
                    if eval::positional_matches(pseudo, position, count) && !out.contains(node) {
                        out.push(node);
                    }
                }
                out
            }
        }
    }

    /// First scope node carrying the id wins. A tag-qualified scan that
    /// misses falls back to an id-only scan of the whole scope.
    fn select_by_id(
        &self,
        scope: &NodeList,
        tag: Option<&TagMatch>,
        id: &str,
        ns: Option<&str>,
    ) -> NodeList {
        if let Some(tag @ TagMatch::Name(_)) = tag {
            for node in scope {
                let Some(elem) = self.tree.element(node) else {
                    continue;
                };
                if eval::namespace_matches(elem, ns)
                    && eval::tag_matches(elem, tag)
                    && elem.attr("id") == Some(id)
                {
                    return NodeList::single(node);
                }
            }
        }
        for node in scope {
            let Some(elem) = self.tree.element(node) else {
                continue;
            };
            if eval::namespace_matches(elem, ns) && elem.attr("id") == Some(id) {
                return NodeList::single(node);
            }
        }
        NodeList::new()
    }
}
