// validate.rs — dialect validation and callback binding.
//
// Validation checks a parsed tree against a dialect's name tables; binding
// resolves each expando to a callback from a context-specific table. The
// same tree can be re-bound to a different table at any time (the
// "revalidation" used when one format string is rendered by two different
// dialogs); binding builds a fresh BoundTree and never touches the tree.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

use crate::dialect::Dialect;
use crate::error::ValidationError;
use crate::node::{DateKind, DateNode, ExpandoNode, HookNode, Node, PadNode, TextNode, Tree};
use crate::render::RenderFlags;

/// Re-check every identifier in `tree` against `dialect`.
///
/// The parser already validates names against the dialect it was given;
/// this is for checking a cached tree against a *different* dialect before
/// re-binding it.
pub fn validate(tree: &Tree, dialect: &Dialect) -> Result<(), ValidationError> {
    let mut first: Option<ValidationError> = None;
    tree.walk(&mut |node| {
        if first.is_some() {
            return;
        }
        match node {
            Node::Expando(e) if !dialect.permits(&e.name) => {
                first = Some(ValidationError::new(
                    format!("unknown expando '%{}' in {}", e.name, dialect.name),
                    e.span,
                ));
            }
            Node::Date(d) if !dialect.dates => {
                first = Some(ValidationError::new(
                    format!("date expandos are not valid in {}", dialect.name),
                    d.span,
                ));
            }
            Node::Hook(h) if !dialect.hooks => {
                first = Some(ValidationError::new(
                    format!("index-format hooks are not valid in {}", dialect.name),
                    h.span,
                ));
            }
            _ => {}
        }
    });
    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

// ─────────────────── callback tables ──────────────────────────

/// Produces the text for one expando. Returns plain content; the renderer
/// applies the node's format descriptor and clamps to the column budget.
pub type ExpandoFn<D> = fn(&ExpandoNode, &D, RenderFlags) -> String;

/// Supplies the timestamp a date node formats.
pub type DateFn<D> = fn(&D, DateKind) -> Option<DateTime<FixedOffset>>;

/// Resolves a `%@name@` hook to its replacement text.
pub type HookFn<D> = fn(&D, &str, RenderFlags) -> Option<String>;

/// One rendering context's callbacks, keyed by expando name.
pub struct CallbackTable<D: ?Sized> {
    expandos: HashMap<&'static str, ExpandoFn<D>>,
    date: Option<DateFn<D>>,
    hook: Option<HookFn<D>>,
}

impl<D: ?Sized> Default for CallbackTable<D> {
    fn default() -> Self {
        Self { expandos: HashMap::new(), date: None, hook: None }
    }
}

impl<D: ?Sized> CallbackTable<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expando(mut self, name: &'static str, f: ExpandoFn<D>) -> Self {
        self.expandos.insert(name, f);
        self
    }

    pub fn date(mut self, f: DateFn<D>) -> Self {
        self.date = Some(f);
        self
    }

    pub fn hook(mut self, f: HookFn<D>) -> Self {
        self.hook = Some(f);
        self
    }

    pub fn get(&self, name: &str) -> Option<ExpandoFn<D>> {
        self.expandos.get(name).copied()
    }

    pub(crate) fn date_fn(&self) -> Option<DateFn<D>> {
        self.date
    }

    pub(crate) fn hook_fn(&self) -> Option<HookFn<D>> {
        self.hook
    }
}

// ───────────────────────── binding ────────────────────────────

/// A tree paired with callbacks resolved once, ready to render. Borrows the
/// tree and table immutably, so many bindings of the same tree can coexist.
pub struct BoundTree<'a, D: ?Sized> {
    pub(crate) nodes: Vec<BoundNode<'a, D>>,
    pub(crate) table: &'a CallbackTable<D>,
}

pub(crate) enum BoundNode<'a, D: ?Sized> {
    Text(&'a TextNode),
    Expando(&'a ExpandoNode, Option<ExpandoFn<D>>),
    Date(&'a DateNode),
    Pad(&'a PadNode),
    Condition {
        cond: Box<BoundNode<'a, D>>,
        if_true: Vec<BoundNode<'a, D>>,
        if_false: Option<Vec<BoundNode<'a, D>>>,
    },
    Hook(&'a HookNode),
    Empty,
}

/// Resolve every expando in `tree` against `table`. Expandos the table does
/// not cover stay unbound and render as empty (conditions on them count as
/// true, matching the reference behavior).
pub fn bind<'a, D: ?Sized>(tree: &'a Tree, table: &'a CallbackTable<D>) -> BoundTree<'a, D> {
    BoundTree { nodes: bind_nodes(&tree.nodes, table), table }
}

fn bind_nodes<'a, D: ?Sized>(
    nodes: &'a [Node],
    table: &'a CallbackTable<D>,
) -> Vec<BoundNode<'a, D>> {
    nodes.iter().map(|n| bind_node(n, table)).collect()
}

fn bind_node<'a, D: ?Sized>(node: &'a Node, table: &'a CallbackTable<D>) -> BoundNode<'a, D> {
    match node {
        Node::Text(t) => BoundNode::Text(t),
        Node::Expando(e) => BoundNode::Expando(e, table.get(&e.name)),
        Node::Date(d) => BoundNode::Date(d),
        Node::Pad(p) => BoundNode::Pad(p),
        Node::Condition(c) => BoundNode::Condition {
            cond: Box::new(bind_node(&c.cond, table)),
            if_true: bind_nodes(&c.if_true, table),
            if_false: c.if_false.as_ref().map(|f| bind_nodes(f, table)),
        },
        Node::Hook(h) => BoundNode::Hook(h),
        Node::Empty(_) => BoundNode::Empty,
    }
}
