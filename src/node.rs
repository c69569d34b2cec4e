// node.rs — the parsed representation of a format string.
//
// A format string parses into an ordered list of nodes (the Tree). Nodes own
// their payload text (copied out of the source at parse time) and also carry
// a byte span into the source for error reporting. The tree is immutable
// after parsing; rendering is a read-only walk, so trees can be shared
// freely across redraws.

// ─────────────────────────── spans ────────────────────────────

/// Half-open byte range into the original format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(end >= start);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slice the original source by this span.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

// ─────────────────── format descriptor ────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    Left,
    #[default]
    Right,
}

/// Width/justification directive attached to an expando or date, parsed from
/// the `[-][0][digits][.digits]` prefix. Absent entirely when no prefix was
/// written (`%X` has no descriptor, not a zeroed one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    /// Pad the rendered value out to at least this many columns.
    pub min_width: usize,
    /// Truncate to at most this many columns. `None` = unbounded.
    pub max_width: Option<usize>,
    pub just: Justify,
    /// Character used to pad up to `min_width` (`' '` or `'0'`).
    pub leader: char,
}

impl Default for Format {
    fn default() -> Self {
        Self { min_width: 0, max_width: None, just: Justify::Right, leader: ' ' }
    }
}

// ───────────────────── node variants ──────────────────────────

/// Which timestamp a date node formats, selected by its delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// `%{fmt}` — sender's send time, original UTC offset restored.
    SenderSend,
    /// `%[fmt]` — send time in the local zone.
    LocalSend,
    /// `%(fmt)` — receive time in the local zone.
    LocalReceive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadKind {
    /// `%|c` — fill to the end of the line; nothing after it survives.
    Fill,
    /// `%>c` — right-align the rest of the line against the column budget.
    HardFill,
    /// `%*c` — like HardFill, but gives up its padding (and then the text to
    /// its left) when the rest of the line would overflow the budget.
    SoftFill,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub span: Span,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandoNode {
    pub span: Span,
    /// One or two characters, or a named `{…}` form.
    pub name: String,
    pub format: Option<Format>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateNode {
    pub span: Span,
    pub kind: DateKind,
    /// strftime-style sub-format between the delimiters.
    pub pattern: String,
    /// Leading `!`: format in the fixed "C" locale.
    pub ignore_locale: bool,
    pub format: Option<Format>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadNode {
    pub span: Span,
    pub kind: PadKind,
    pub pad_char: char,
}

/// `%?X?A&B?` (legacy) or `%<X?A&B>` (current); both syntaxes produce this
/// one shape. The condition is always a single expando or date node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionNode {
    pub span: Span,
    pub cond: Box<Node>,
    pub if_true: Vec<Node>,
    pub if_false: Option<Vec<Node>>,
}

/// `%@name@` — dispatched to an externally registered, string-keyed hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookNode {
    pub span: Span,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(TextNode),
    Expando(ExpandoNode),
    Date(DateNode),
    Pad(PadNode),
    Condition(ConditionNode),
    Hook(HookNode),
    /// Marker produced by parsing the empty string.
    Empty(Span),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Text(n) => n.span,
            Node::Expando(n) => n.span,
            Node::Date(n) => n.span,
            Node::Pad(n) => n.span,
            Node::Condition(n) => n.span,
            Node::Hook(n) => n.span,
            Node::Empty(s) => *s,
        }
    }
}

// ─────────────────────────── tree ─────────────────────────────

/// Ordered list of top-level nodes parsed from one format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn is_empty(&self) -> bool {
        matches!(self.nodes.as_slice(), [] | [Node::Empty(_)])
    }

    /// Depth-first visit of every node, condition sub-trees included.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        walk_nodes(&self.nodes, visit);
    }
}

fn walk_nodes<'a>(nodes: &'a [Node], visit: &mut dyn FnMut(&'a Node)) {
    for node in nodes {
        visit(node);
        if let Node::Condition(c) = node {
            visit(&*c.cond);
            walk_nodes(&c.if_true, visit);
            if let Some(f) = &c.if_false {
                walk_nodes(f, visit);
            }
        }
    }
}
