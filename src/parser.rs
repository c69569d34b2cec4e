// parser.rs — recursive-descent parser for the expando mini-language.
//
// Grammar (informal):
//   format      := (text | directive)*
//   directive   := "%" ( "%" | date | pad | condition | hook | expando )
//   date        := ("{" | "[" | "(") ["!"] strftime_fmt ("}" | "]" | ")")
//   pad         := ("|" | ">" | "*") pad_char
//   condition   := "?" expando "?" format ["&" format] "?"     -- legacy
//                | "<" expando "?" format ["&" format] ">"     -- current
//   hook        := "@" ident "@"
//   expando     := ["-"] ["0"] [digits] ["." digits] name
//
// Single forward byte scan; the only lookahead is one extra character to
// prefer a two-character expando name over a one-character one. The first
// error wins and carries the exact byte offset of the problem.

use crate::dialect::Dialect;
use crate::error::ParseError;
use crate::node::{
    ConditionNode, DateKind, DateNode, ExpandoNode, Format, HookNode, Justify, Node, PadKind,
    PadNode, Span, TextNode, Tree,
};

/// Parse a format string against a dialect's name tables.
///
/// The empty string parses to a tree holding a single `Empty` node.
pub fn parse(input: &str, dialect: &Dialect) -> Result<Tree, ParseError> {
    let mut parser = Parser { src: input, bytes: input.as_bytes(), pos: 0, dialect };
    let nodes = parser.parse_sequence(Until::Eof)?;
    debug_assert_eq!(parser.pos, input.len());
    if nodes.is_empty() {
        return Ok(Tree { nodes: vec![Node::Empty(Span::new(0, 0))] });
    }
    Ok(Tree { nodes })
}

/// Where a node sequence ends. Top-level sequences run to end of input;
/// condition branches stop at the syntax's separator/closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Until {
    Eof,
    /// Legacy true branch: `&` starts the false branch, `?` closes.
    LegacyTrue,
    /// Legacy false branch: `?` closes.
    LegacyFalse,
    /// Current true branch: `&` starts the false branch, `>` closes.
    CurrentTrue,
    /// Current false branch: `>` closes.
    CurrentFalse,
}

impl Until {
    fn stops(self, b: u8) -> bool {
        match self {
            Until::Eof => false,
            Until::LegacyTrue => b == b'&' || b == b'?',
            Until::LegacyFalse => b == b'?',
            Until::CurrentTrue => b == b'&' || b == b'>',
            Until::CurrentFalse => b == b'>',
        }
    }
}

struct Parser<'s, 'd> {
    src: &'s str,
    bytes: &'s [u8],
    pos: usize,
    dialect: &'d Dialect,
}

impl Parser<'_, '_> {
    fn err(&self, message: impl Into<String>, position: usize) -> ParseError {
        ParseError::new(message, position)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    // ───────────────────── sequences ──────────────────────

    fn parse_sequence(&mut self, until: Until) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        while let Some(b) = self.peek() {
            if until.stops(b) {
                break;
            }
            if b == b'%' {
                nodes.push(self.parse_directive()?);
            } else {
                nodes.push(self.parse_text(until));
            }
        }
        Ok(nodes)
    }

    fn parse_text(&mut self, until: Until) -> Node {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'%' || until.stops(b) {
                break;
            }
            self.pos += 1;
        }
        Node::Text(TextNode {
            span: Span::new(start, self.pos),
            text: self.src[start..self.pos].to_string(),
        })
    }

    // ───────────────────── directives ─────────────────────

    fn parse_directive(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        self.pos += 1; // '%'
        let Some(b) = self.peek() else {
            return Err(self.err("format string ends with a bare '%'", start));
        };
        match b {
            b'%' => {
                self.pos += 1;
                Ok(Node::Text(TextNode {
                    span: Span::new(start, self.pos),
                    text: "%".to_string(),
                }))
            }
            b'|' | b'>' | b'*' => self.parse_pad(start),
            b'?' => self.parse_condition(start, true),
            b'<' => self.parse_condition(start, false),
            b'@' => self.parse_hook(start),
            _ => self.parse_expando(start),
        }
    }

    fn parse_pad(&mut self, start: usize) -> Result<Node, ParseError> {
        let kind = match self.bytes[self.pos] {
            b'|' => PadKind::Fill,
            b'>' => PadKind::HardFill,
            _ => PadKind::SoftFill,
        };
        self.pos += 1;
        let Some(pad_char) = self.src[self.pos..].chars().next() else {
            return Err(self.err("pad directive is missing its pad character", self.pos));
        };
        self.pos += pad_char.len_utf8();
        Ok(Node::Pad(PadNode { span: Span::new(start, self.pos), kind, pad_char }))
    }

    fn parse_hook(&mut self, start: usize) -> Result<Node, ParseError> {
        if !self.dialect.hooks {
            return Err(self.err(
                format!("index-format hooks are not valid in {}", self.dialect.name),
                start,
            ));
        }
        self.pos += 1; // '@'
        let name_start = self.pos;
        match self.bytes[self.pos..].iter().position(|&b| b == b'@') {
            Some(off) => {
                let name = self.src[name_start..name_start + off].to_string();
                self.pos = name_start + off + 1;
                Ok(Node::Hook(HookNode { span: Span::new(start, self.pos), name }))
            }
            None => Err(self.err("unterminated hook; expected '@'", self.bytes.len())),
        }
    }

    // ─────────────── format prefix and names ──────────────

    /// Parse `[-][0][digits][.digits]` followed by a date or an expando
    /// name. `start` is the span start (the `%`, or the condition start).
    fn parse_expando(&mut self, start: usize) -> Result<Node, ParseError> {
        let format = self.parse_format_prefix()?;
        match self.peek() {
            Some(b'{') | Some(b'[') | Some(b'(') => self.parse_date(start, format),
            Some(_) => self.parse_name(start, format),
            None => Err(self.err("format string ends before an expando name", self.pos)),
        }
    }

    fn parse_format_prefix(&mut self) -> Result<Option<Format>, ParseError> {
        let mut fmt = Format::default();
        let mut seen = false;
        if self.peek() == Some(b'-') {
            fmt.just = Justify::Left;
            seen = true;
            self.pos += 1;
        }
        if self.peek() == Some(b'0') {
            fmt.leader = '0';
            seen = true;
            self.pos += 1;
        }
        while let Some(b @ b'0'..=b'9') = self.peek() {
            fmt.min_width = fmt.min_width.saturating_mul(10).saturating_add((b - b'0') as usize);
            seen = true;
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.err("expected digits after '.'", self.pos));
            }
            let mut max = 0usize;
            while let Some(b @ b'0'..=b'9') = self.peek() {
                max = max.saturating_mul(10).saturating_add((b - b'0') as usize);
                self.pos += 1;
            }
            fmt.max_width = Some(max);
            seen = true;
        }
        Ok(if seen { Some(fmt) } else { None })
    }

    fn parse_name(&mut self, start: usize, format: Option<Format>) -> Result<Node, ParseError> {
        // Two-character names win over one-character ones: one char of
        // lookahead against the dialect's two-char table.
        if let Some(pair) = self.src.get(self.pos..self.pos + 2) {
            if self.dialect.matches_two_char(pair) {
                self.pos += 2;
                return Ok(Node::Expando(ExpandoNode {
                    span: Span::new(start, self.pos),
                    name: pair.to_string(),
                    format,
                }));
            }
        }
        let ch = self.src[self.pos..]
            .chars()
            .next()
            .ok_or_else(|| self.err("format string ends before an expando name", self.pos))?;
        let name = &self.src[self.pos..self.pos + ch.len_utf8()];
        if !self.dialect.permits(name) {
            return Err(self.err(
                format!("unknown expando '%{}' in {}", name, self.dialect.name),
                self.pos,
            ));
        }
        self.pos += ch.len_utf8();
        Ok(Node::Expando(ExpandoNode {
            span: Span::new(start, self.pos),
            name: name.to_string(),
            format,
        }))
    }

    fn parse_date(&mut self, start: usize, format: Option<Format>) -> Result<Node, ParseError> {
        let open_idx = self.pos;
        let (close, kind) = match self.bytes[self.pos] {
            b'{' => (b'}', DateKind::SenderSend),
            b'[' => (b']', DateKind::LocalSend),
            _ => (b')', DateKind::LocalReceive),
        };
        self.pos += 1;
        let ignore_locale = if self.peek() == Some(b'!') {
            self.pos += 1;
            true
        } else {
            false
        };
        let pattern_start = self.pos;
        let Some(off) = self.bytes[self.pos..].iter().position(|&b| b == close) else {
            return Err(self.err(
                format!("unterminated date expando; expected '{}'", close as char),
                self.bytes.len(),
            ));
        };
        let pattern = &self.src[pattern_start..pattern_start + off];

        // `%{name}` is a named expando when the dialect declares the name;
        // otherwise braces mean a strftime date like the other delimiters.
        if close == b'}' && !ignore_locale && self.dialect.long.contains(&pattern) {
            let name = pattern.to_string();
            self.pos = pattern_start + off + 1;
            return Ok(Node::Expando(ExpandoNode {
                span: Span::new(start, self.pos),
                name,
                format,
            }));
        }
        if !self.dialect.dates {
            return Err(self.err(
                format!("date expandos are not valid in {}", self.dialect.name),
                open_idx,
            ));
        }
        let pattern = pattern.to_string();
        self.pos = pattern_start + off + 1;
        Ok(Node::Date(DateNode {
            span: Span::new(start, self.pos),
            kind,
            pattern,
            ignore_locale,
            format,
        }))
    }

    // ──────────────────── conditionals ────────────────────

    /// Both syntaxes normalize to the same node shape:
    /// legacy `%?X?A&B?`, current `%<X?A&B>`.
    fn parse_condition(&mut self, start: usize, legacy: bool) -> Result<Node, ParseError> {
        self.pos += 1; // '?' or '<'
        let cond = self.parse_cond_item()?;
        if self.peek() != Some(b'?') {
            return Err(self.err("expected '?' after condition", self.pos));
        }
        self.pos += 1;

        let (true_until, false_until, closer) = if legacy {
            (Until::LegacyTrue, Until::LegacyFalse, b'?')
        } else {
            (Until::CurrentTrue, Until::CurrentFalse, b'>')
        };

        let if_true = self.parse_sequence(true_until)?;
        let if_false = match self.peek() {
            Some(b'&') => {
                self.pos += 1;
                let nodes = self.parse_sequence(false_until)?;
                if self.peek() != Some(closer) {
                    return Err(self.err(
                        format!("unterminated conditional; expected '{}'", closer as char),
                        self.pos.min(self.bytes.len()),
                    ));
                }
                self.pos += 1;
                Some(nodes)
            }
            Some(b) if b == closer => {
                self.pos += 1;
                None
            }
            _ => {
                return Err(self.err(
                    format!("unterminated conditional; expected '{}'", closer as char),
                    self.bytes.len(),
                ));
            }
        };

        Ok(Node::Condition(ConditionNode {
            span: Span::new(start, self.pos),
            cond: Box::new(cond),
            if_true,
            if_false,
        }))
    }

    /// The condition itself: a single expando or date, written without the
    /// leading '%'. Text, pads, hooks and nested conditions are not valid
    /// conditions.
    fn parse_cond_item(&mut self) -> Result<Node, ParseError> {
        let start = self.pos;
        if self.peek().is_none() {
            return Err(self.err("expected a condition expando", self.pos));
        }
        self.parse_expando(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    fn test_dialect() -> Dialect {
        Dialect {
            name: "test",
            short: &["a", "b", "c", "l", "s", "X"],
            two_char: &["aa", "cr"],
            long: &["attr"],
            dates: true,
            hooks: true,
        }
    }

    fn expando(node: &Node) -> &ExpandoNode {
        match node {
            Node::Expando(e) => e,
            other => panic!("expected expando, got {:?}", other),
        }
    }

    fn text(node: &Node) -> &str {
        match node {
            Node::Text(t) => &t.text,
            other => panic!("expected text, got {:?}", other),
        }
    }

    fn cond(node: &Node) -> &ConditionNode {
        match node {
            Node::Condition(c) => c,
            other => panic!("expected condition, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_empty_node() {
        let tree = parse("", &test_dialect()).unwrap();
        assert_eq!(tree.nodes, vec![Node::Empty(Span::new(0, 0))]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_plain_text() {
        let tree = parse("hello", &test_dialect()).unwrap();
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(text(&tree.nodes[0]), "hello");
        assert_eq!(tree.nodes[0].span(), Span::new(0, 5));
    }

    #[test]
    fn test_percent_percent_is_literal() {
        let tree = parse("100%%", &test_dialect()).unwrap();
        assert_eq!(text(&tree.nodes[0]), "100");
        assert_eq!(text(&tree.nodes[1]), "%");
    }

    #[test]
    fn test_expando_without_prefix_has_no_format() {
        let tree = parse("%X", &test_dialect()).unwrap();
        let e = expando(&tree.nodes[0]);
        assert_eq!(e.name, "X");
        assert_eq!(e.format, None);
    }

    #[test]
    fn test_format_prefix_full() {
        let tree = parse("%-12.8s", &test_dialect()).unwrap();
        let e = expando(&tree.nodes[0]);
        let f = e.format.unwrap();
        assert_eq!(f.just, Justify::Left);
        assert_eq!(f.min_width, 12);
        assert_eq!(f.max_width, Some(8));
        assert_eq!(f.leader, ' ');
    }

    #[test]
    fn test_format_prefix_zero_leader() {
        let tree = parse("%08l", &test_dialect()).unwrap();
        let f = expando(&tree.nodes[0]).format.unwrap();
        assert_eq!(f.leader, '0');
        assert_eq!(f.min_width, 8);
        assert_eq!(f.just, Justify::Right);
    }

    #[test]
    fn test_bad_max_width_offset() {
        let err = parse("%.a", &test_dialect()).unwrap_err();
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_unknown_expando_offset() {
        let dialect = Dialect {
            name: "tiny",
            short: &["a", "b"],
            two_char: &[],
            long: &[],
            dates: false,
            hooks: false,
        };
        let err = parse("%c", &dialect).unwrap_err();
        assert_eq!(err.position, 1);
        assert!(err.message.contains("'%c'"));
    }

    #[test]
    fn test_two_char_precedence() {
        // "%aa %ab": node 0 is the two-char "aa"; "%ab" is "a" then text "b"
        let tree = parse("%aa %ab", &test_dialect()).unwrap();
        assert_eq!(expando(&tree.nodes[0]).name, "aa");
        assert_eq!(text(&tree.nodes[1]), " ");
        assert_eq!(expando(&tree.nodes[2]).name, "a");
        assert_eq!(text(&tree.nodes[3]), "b");
    }

    #[test]
    fn test_date_delimiters_select_kind() {
        let tree = parse("%{%Y}%[%m]%(%d)", &test_dialect()).unwrap();
        let kinds: Vec<DateKind> = tree
            .nodes
            .iter()
            .map(|n| match n {
                Node::Date(d) => d.kind,
                other => panic!("expected date, got {:?}", other),
            })
            .collect();
        assert_eq!(kinds, vec![DateKind::SenderSend, DateKind::LocalSend, DateKind::LocalReceive]);
    }

    #[test]
    fn test_date_ignore_locale() {
        let tree = parse("%{!%b %d}", &test_dialect()).unwrap();
        match &tree.nodes[0] {
            Node::Date(d) => {
                assert!(d.ignore_locale);
                assert_eq!(d.pattern, "%b %d");
            }
            other => panic!("expected date, got {:?}", other),
        }
    }

    #[test]
    fn test_date_with_width_prefix() {
        let tree = parse("%-12[%H:%M]", &test_dialect()).unwrap();
        match &tree.nodes[0] {
            Node::Date(d) => {
                let f = d.format.unwrap();
                assert_eq!(f.min_width, 12);
                assert_eq!(f.just, Justify::Left);
            }
            other => panic!("expected date, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_date_names_closer() {
        let err = parse("%{%Y", &test_dialect()).unwrap_err();
        assert!(err.message.contains("'}'"));
        assert_eq!(err.position, 4);
    }

    #[test]
    fn test_long_expando_in_braces() {
        let tree = parse("%{attr}", &test_dialect()).unwrap();
        assert_eq!(expando(&tree.nodes[0]).name, "attr");
    }

    #[test]
    fn test_pads_round_trip() {
        let tree = parse("%|A %>B %*C", &test_dialect()).unwrap();
        let pads: Vec<(PadKind, char)> = tree
            .nodes
            .iter()
            .filter_map(|n| match n {
                Node::Pad(p) => Some((p.kind, p.pad_char)),
                _ => None,
            })
            .collect();
        assert_eq!(
            pads,
            vec![
                (PadKind::Fill, 'A'),
                (PadKind::HardFill, 'B'),
                (PadKind::SoftFill, 'C'),
            ]
        );
        assert_eq!(text(&tree.nodes[1]), " ");
        assert_eq!(text(&tree.nodes[3]), " ");
    }

    #[test]
    fn test_pad_missing_char() {
        let err = parse("%|", &test_dialect()).unwrap_err();
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_hook() {
        let tree = parse("%@spam@", &test_dialect()).unwrap();
        match &tree.nodes[0] {
            Node::Hook(h) => assert_eq!(h.name, "spam"),
            other => panic!("expected hook, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_hook() {
        let err = parse("%@spam", &test_dialect()).unwrap_err();
        assert!(err.message.contains("'@'"));
    }

    #[test]
    fn test_conditional_current() {
        let tree = parse("%<l?%4l>", &test_dialect()).unwrap();
        let c = cond(&tree.nodes[0]);
        assert_eq!(expando(&c.cond).name, "l");
        assert_eq!(c.if_true.len(), 1);
        assert!(c.if_false.is_none());
    }

    #[test]
    fn test_conditional_syntaxes_equivalent() {
        let current = parse("%<l?%4l>", &test_dialect()).unwrap();
        let legacy = parse("%?l?%4l?", &test_dialect()).unwrap();
        let c1 = cond(&current.nodes[0]);
        let c2 = cond(&legacy.nodes[0]);
        assert_eq!(expando(&c1.cond).name, expando(&c2.cond).name);
        assert_eq!(expando(&c1.if_true[0]).name, expando(&c2.if_true[0]).name);
        assert_eq!(expando(&c1.if_true[0]).format, expando(&c2.if_true[0]).format);
        assert_eq!(c1.if_false.is_none(), c2.if_false.is_none());
    }

    #[test]
    fn test_conditional_false_branch() {
        for src in ["%<l?yes&no>", "%?l?yes&no?"] {
            let tree = parse(src, &test_dialect()).unwrap();
            let c = cond(&tree.nodes[0]);
            assert_eq!(text(&c.if_true[0]), "yes");
            assert_eq!(text(&c.if_false.as_ref().unwrap()[0]), "no");
        }
    }

    #[test]
    fn test_conditional_nested() {
        let tree = parse("%<l?%<a?x&y>&z>", &test_dialect()).unwrap();
        let outer = cond(&tree.nodes[0]);
        let inner = cond(&outer.if_true[0]);
        assert_eq!(expando(&inner.cond).name, "a");
        assert_eq!(text(&inner.if_false.as_ref().unwrap()[0]), "y");
        assert_eq!(text(&outer.if_false.as_ref().unwrap()[0]), "z");
    }

    #[test]
    fn test_conditional_date_condition() {
        let tree = parse("%<[%H]?am&pm>", &test_dialect()).unwrap();
        let c = cond(&tree.nodes[0]);
        assert!(matches!(*c.cond, Node::Date(_)));
    }

    #[test]
    fn test_conditional_condition_cannot_be_pad() {
        // '|' is not a legal name, so a pad in condition position fails
        assert!(parse("%<|x?a&b>", &test_dialect()).is_err());
    }

    #[test]
    fn test_unterminated_conditional() {
        let err = parse("%<l?yes", &test_dialect()).unwrap_err();
        assert!(err.message.contains("'>'"));
        let err = parse("%?l?yes", &test_dialect()).unwrap_err();
        assert!(err.message.contains("'?'"));
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let src = "%4c %Z %<l?%4l&%4a> %-15.15s%|-";
        let d = Dialect {
            name: "test2",
            short: &["a", "c", "l", "s", "Z"],
            two_char: &[],
            long: &[],
            dates: true,
            hooks: false,
        };
        assert_eq!(parse(src, &d).unwrap(), parse(src, &d).unwrap());
    }

    #[test]
    fn test_text_spans_round_trip() {
        let src = "ab %s cd";
        let tree = parse(src, &test_dialect()).unwrap();
        for node in &tree.nodes {
            if let Node::Text(t) = node {
                assert_eq!(t.span.slice(src), t.text);
            }
        }
    }

    #[test]
    fn test_trailing_percent() {
        let err = parse("abc%", &test_dialect()).unwrap_err();
        assert_eq!(err.position, 3);
    }

    #[test]
    fn test_top_level_closers_are_literal() {
        let tree = parse("a>b&c?d", &test_dialect()).unwrap();
        assert_eq!(text(&tree.nodes[0]), "a>b&c?d");
    }
}
