// registry.rs — config integration for format-string variables.
//
// A FormatVar owns one user-configurable format string: its dialect, its
// compiled-in default, and the currently active source + parsed tree. The
// tree is rebuilt only when the source actually changes and is swapped in
// whole, never mutated, so renders against the old tree stay valid.

use log::warn;

use crate::dialect::{self, Dialect};
use crate::error::{EngineError, ParseError};
use crate::node::Tree;
use crate::parser;

/// One format-string config variable with parse-on-set and default
/// fallback semantics.
#[derive(Debug, Clone)]
pub struct FormatVar {
    name: String,
    dialect: &'static Dialect,
    default_source: String,
    default_tree: Tree,
    source: String,
    tree: Tree,
}

impl FormatVar {
    /// Create a variable bound to a built-in dialect. The default must
    /// parse; a default that does not is a programming error and is
    /// surfaced here rather than at first render.
    pub fn new(name: &str, default: &str) -> Result<Self, EngineError> {
        let dialect = dialect::find(name)
            .ok_or_else(|| EngineError::UnknownDialect(name.to_string()))?;
        Self::with_dialect(dialect, default)
    }

    /// Create a variable with an explicit (possibly non-built-in) dialect.
    pub fn with_dialect(dialect: &'static Dialect, default: &str) -> Result<Self, EngineError> {
        let default_tree = parser::parse(default, dialect)?;
        Ok(Self {
            name: dialect.name.to_string(),
            dialect,
            default_source: default.to_string(),
            default_tree: default_tree.clone(),
            source: default.to_string(),
            tree: default_tree,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dialect(&self) -> &'static Dialect {
        self.dialect
    }

    /// The currently active format string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The currently active parsed tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Set a new format string. On a parse/validation failure the variable
    /// falls back to its default, a warning is logged, and the error is
    /// returned for the caller to display.
    pub fn set(&mut self, value: &str) -> Result<(), ParseError> {
        if value == self.source {
            return Ok(());
        }
        match parser::parse(value, self.dialect) {
            Ok(tree) => {
                self.source = value.to_string();
                self.tree = tree;
                Ok(())
            }
            Err(err) => {
                warn!(
                    "invalid expando in ${}: {}. Default value will be used.",
                    self.name, err
                );
                self.reset();
                Err(err)
            }
        }
    }

    /// Restore the compiled-in default.
    pub fn reset(&mut self) {
        self.source = self.default_source.clone();
        self.tree = self.default_tree.clone();
    }

    pub fn is_default(&self) -> bool {
        self.source == self.default_source
    }
}

// ─────────────────── compiled-in defaults ─────────────────────

/// Default format string for a built-in dialect, where one exists.
pub fn builtin_default(name: &str) -> Option<&'static str> {
    let default = match name {
        "alias_format" => "%3n %f%t %-15a %-56r | %c",
        "attach_format" => "%u%D%I %t%4n %T%d %> [%.7m/%.10M, %.6e%?C?, %C?, %s] ",
        "compose_format" => "-- Compose [Approx. msg size: %l Atts: %a]%>-",
        "folder_format" => "%2C %t %N %F %2l %-8.8u %-8.8g %8s %d %i",
        "group_index_format" => "%4C %M%N %5s %-45.45f %d",
        "history_format" => "%s",
        "index_format" => "%4C %Z %{%b %d} %-15.15L (%?l?%4l&%4c?) %s",
        "pager_format" => "-%Z- %C/%m: %-20.20n %s%* -- (%P)",
        "pgp_entry_format" => "%4n %t%f %4l/0x%k %-4a %2c %u",
        "query_format" => "%3c %t %-25.25n %-25.25a | %e",
        "sidebar_format" => "%D%?F? [%F]?%* %?N?%N/?%S",
        "status_format" => {
            "-%r-Mail: %f [Msgs:%?M?%M/?%m%?n? New:%n?%?o? Old:%o?%?d? Del:%d?\
             %?F? Flag:%F?%?t? Tag:%t?%?p? Post:%p?%?b? Inc:%b?%?l? %l?]---(%s/%S)-%>-(%P)---"
        }
        _ => return None,
    };
    Some(default)
}
