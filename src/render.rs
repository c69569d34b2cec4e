// render.rs — tree-walking renderer.
//
// Walks a bound tree left to right under a column budget (screen columns,
// not bytes). Callbacks return plain content; the renderer applies each
// node's format descriptor and clamps everything to the remaining budget,
// so a misbehaving callback can truncate a line but never overflow it.
// Running out of budget is normal termination, not an error.

use std::fmt::Write;

use crate::format::{self, char_width};
use crate::node::{DateNode, PadKind};
use crate::validate::{BoundNode, BoundTree, CallbackTable};

/// Columns given to a condition when rendered for its truth value.
const COND_SCRATCH_COLS: usize = 128;

// ─────────────────────── render flags ─────────────────────────

/// Bitset forwarded verbatim to every callback. The engine itself only
/// distinguishes "outer flags" from the neutral flags used for condition
/// scratch renders; the meaning of each bit belongs to the callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderFlags(u32);

impl RenderFlags {
    pub const NONE: Self = Self(0);
    /// Rendering a main-index line; inline color markers may be applied.
    pub const INDEX: Self = Self(1 << 0);
    /// Thread-tree branch characters are present in the line.
    pub const TREE: Self = Self(1 << 1);
    pub const FORCE_SUBJECT: Self = Self(1 << 2);
    /// Optional-field mode.
    pub const OPTIONAL: Self = Self(1 << 3);
    /// No decoration at all, plain text output.
    pub const PLAIN: Self = Self(1 << 4);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for RenderFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for RenderFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// ───────────────────────── rendering ──────────────────────────

/// A rendered line and its display width in columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub width: usize,
}

/// Render a bound tree against `data` into at most `max_cols` columns.
///
/// Conditions are evaluated by rendering their expando into a scratch
/// buffer with neutral flags: the condition is false iff that output is
/// exactly the string `"0"` (so an unbound condition, which renders empty,
/// counts as true — reference behavior).
pub fn render<D: ?Sized>(
    tree: &BoundTree<'_, D>,
    data: &D,
    max_cols: usize,
    flags: RenderFlags,
) -> Rendered {
    let mut out = String::new();
    let width = render_nodes(&tree.nodes, tree.table, data, max_cols, flags, &mut out);
    Rendered { text: out, width }
}

fn render_nodes<D: ?Sized>(
    nodes: &[BoundNode<'_, D>],
    table: &CallbackTable<D>,
    data: &D,
    budget: usize,
    flags: RenderFlags,
    out: &mut String,
) -> usize {
    let seg_start = out.len();
    let mut used = 0usize;
    // No early break on an exhausted budget: emissions clamp to zero, and a
    // later SoftFill may still reclaim columns from this segment.
    for (i, node) in nodes.iter().enumerate() {
        let remaining = budget.saturating_sub(used);
        match node {
            BoundNode::Empty => {}
            BoundNode::Text(t) => {
                used += emit_clamped(out, &t.text, remaining);
            }
            BoundNode::Expando(e, callback) => {
                let raw = match callback {
                    Some(f) => f(e, data, flags),
                    None => String::new(),
                };
                let content = format::apply(e.format.as_ref(), &raw);
                used += emit_clamped(out, &content, remaining);
            }
            BoundNode::Date(d) => {
                let raw = render_date(d, table, data);
                let content = format::apply(d.format.as_ref(), &raw);
                used += emit_clamped(out, &content, remaining);
            }
            BoundNode::Hook(h) => {
                let raw = match table.hook_fn() {
                    Some(f) => f(data, &h.name, flags).unwrap_or_default(),
                    None => String::new(),
                };
                used += emit_clamped(out, &raw, remaining);
            }
            BoundNode::Condition { cond, if_true, if_false } => {
                let mut scratch = String::new();
                render_nodes(
                    std::slice::from_ref(cond.as_ref()),
                    table,
                    data,
                    COND_SCRATCH_COLS,
                    RenderFlags::NONE,
                    &mut scratch,
                );
                // String equality against "0", not a numeric parse: numeric
                // expandos render "0" for false, and empty output is true.
                let branch = if scratch != "0" { Some(if_true) } else { if_false.as_ref() };
                if let Some(branch) = branch {
                    used += render_nodes(branch, table, data, remaining, flags, out);
                }
            }
            BoundNode::Pad(p) => {
                let rest = &nodes[i + 1..];
                match p.kind {
                    PadKind::Fill => {
                        // Fill to the end of the line; the rest of the tree
                        // gets no budget.
                        used += fill(out, p.pad_char, remaining);
                    }
                    PadKind::HardFill => {
                        let mut scratch = String::new();
                        let w = render_nodes(rest, table, data, remaining, flags, &mut scratch);
                        if w < remaining {
                            used += fill(out, p.pad_char, remaining - w);
                        }
                        out.push_str(&scratch);
                        used += w;
                    }
                    PadKind::SoftFill => {
                        // Measure the remainder at the full budget: when it
                        // overflows the space left, the pad gives up its
                        // columns and then the left content is truncated.
                        let mut scratch = String::new();
                        let w = render_nodes(rest, table, data, budget, flags, &mut scratch);
                        if w <= remaining {
                            if w < remaining {
                                used += fill(out, p.pad_char, remaining - w);
                            }
                        } else {
                            let need = w - remaining;
                            used = used.saturating_sub(pop_cols(out, seg_start, need));
                        }
                        let room = budget - used;
                        used += emit_clamped(out, &scratch, room);
                    }
                }
                return used;
            }
        }
    }
    used
}

/// Append `s` to `out`, stopping before the column budget is exceeded and
/// never splitting a wide character. Returns the width actually emitted.
fn emit_clamped(out: &mut String, s: &str, remaining: usize) -> usize {
    let (kept, width) = format::truncate_cols(s, remaining);
    out.push_str(kept);
    width
}

/// Emit copies of `pad` until `cols` columns are covered.
fn fill(out: &mut String, pad: char, cols: usize) -> usize {
    let w = char_width(pad).max(1);
    let count = cols / w;
    for _ in 0..count {
        out.push(pad);
    }
    count * w
}

/// Pop characters off the end of `out` (never past `floor`) until `need`
/// columns are freed. Returns the columns actually freed.
fn pop_cols(out: &mut String, floor: usize, need: usize) -> usize {
    let mut freed = 0;
    while freed < need && out.len() > floor {
        let Some(ch) = out.pop() else { break };
        freed += char_width(ch);
    }
    freed
}

fn render_date<D: ?Sized>(node: &DateNode, table: &CallbackTable<D>, data: &D) -> String {
    let Some(dates) = table.date_fn() else {
        return String::new();
    };
    let Some(ts) = dates(data, node.kind) else {
        return String::new();
    };
    // chrono's strftime is always locale-independent, so `ignore_locale`
    // needs no special path here.
    let formatted = ts.format(&node.pattern);
    let mut buf = String::with_capacity(node.pattern.len() + 16);
    if write!(buf, "{}", formatted).is_err() {
        // Bad user pattern; render nothing rather than fail the line.
        return String::new();
    }
    buf
}
