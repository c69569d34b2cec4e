// format.rs — shared width/justification helpers.
//
// All widths here are display columns (wide CJK/emoji count 2), never bytes.
// Every place a value meets a column budget goes through these helpers so
// truncation and padding behave the same for expandos, dates and literals.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::node::{Format, Justify};

/// Display width of a string in terminal columns.
#[inline]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Display width of a single character (control chars count 0).
#[inline]
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Truncate to at most `max` columns, never splitting a wide character.
/// Returns the kept prefix and its width.
pub fn truncate_cols(s: &str, max: usize) -> (&str, usize) {
    let mut width = 0;
    for (idx, ch) in s.char_indices() {
        let w = char_width(ch);
        if width + w > max {
            return (&s[..idx], width);
        }
        width += w;
    }
    (s, width)
}

/// Drop columns from the end of a string, in place. Returns how many columns
/// were actually freed (a trailing wide char may free one more than asked).
pub fn truncate_cols_end(s: &mut String, mut cols: usize) -> usize {
    let mut freed = 0;
    while cols > 0 {
        let Some(ch) = s.chars().next_back() else { break };
        let w = char_width(ch);
        s.pop();
        freed += w;
        cols = cols.saturating_sub(w);
    }
    freed
}

/// Apply a format descriptor: truncate to `max_width`, then pad out to
/// `min_width` with the leader char. Right justification pads on the left;
/// left justification pads on the right with spaces.
pub fn apply(fmt: Option<&Format>, content: &str) -> String {
    let Some(f) = fmt else {
        return content.to_string();
    };
    let (kept, width) = match f.max_width {
        Some(max) => truncate_cols(content, max),
        None => (content, display_width(content)),
    };
    if width >= f.min_width {
        return kept.to_string();
    }
    let pad = f.min_width - width;
    match f.just {
        Justify::Right => {
            let mut out = String::with_capacity(kept.len() + pad);
            for _ in 0..pad {
                out.push(f.leader);
            }
            out.push_str(kept);
            out
        }
        Justify::Left => {
            let mut out = String::with_capacity(kept.len() + pad);
            out.push_str(kept);
            for _ in 0..pad {
                out.push(' ');
            }
            out
        }
    }
}
