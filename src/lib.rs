// expando — a printf-style expando templating engine.
//
// Powers user-configurable display formats of the kind mail clients use
// (`index_format`, `status_format`, PGP command lines, ...): a format
// string is parsed once into an immutable tree, validated against the
// per-variable dialect of legal expando names, bound to a table of
// callbacks, and rendered per redraw under a screen-column budget.
//
// Pipeline: parse → validate → bind → render.
//
//   let dialect = expando::dialect::find("index_format").unwrap();
//   let tree = expando::parse("%4C %-15.15L %s", dialect)?;
//   let bound = expando::bind(&tree, &callbacks);
//   let line = expando::render(&bound, &email, 80, RenderFlags::INDEX);
//
// Rendering never fails: output is clamped to the budget and a bad
// callback can truncate a line, not crash it. Trees are read-only after
// parsing and freely shareable across redraws.

pub mod dialect;
pub mod error;
pub mod format;
pub mod node;
pub mod parser;
pub mod registry;
pub mod render;
pub mod validate;

pub use error::{EngineError, ParseError, ValidationError};
pub use node::{
    ConditionNode, DateKind, DateNode, ExpandoNode, Format, HookNode, Justify, Node, PadKind,
    PadNode, Span, TextNode, Tree,
};
pub use parser::parse;
pub use registry::FormatVar;
pub use render::{render, Rendered, RenderFlags};
pub use validate::{bind, validate, BoundTree, CallbackTable, DateFn, ExpandoFn, HookFn};
