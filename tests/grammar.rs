// End-to-end properties of the parse → bind → render pipeline, exercised
// through the public API with a mail-like context.

use chrono::{DateTime, FixedOffset, TimeZone};
use expando::dialect::{self, Dialect};
use expando::{
    bind, parse, render, validate, CallbackTable, DateKind, ExpandoNode, Node, RenderFlags,
};

struct Email {
    number: usize,
    lines: i64,
    subject: String,
    author: String,
    sent: DateTime<FixedOffset>,
    received: DateTime<FixedOffset>,
}

fn email() -> Email {
    let tz_east = FixedOffset::east_opt(2 * 3600).unwrap();
    let tz_local = FixedOffset::west_opt(5 * 3600).unwrap();
    Email {
        number: 7,
        lines: 128,
        subject: "Re: [PATCH] widen the index".into(),
        author: "Grace Hopper".into(),
        sent: tz_east.with_ymd_and_hms(2024, 11, 3, 9, 15, 0).unwrap(),
        received: tz_local.with_ymd_and_hms(2024, 11, 3, 4, 20, 0).unwrap(),
    }
}

static DIALECT: Dialect = Dialect {
    name: "mail_index",
    short: &["C", "L", "l", "s"],
    two_char: &["cr"],
    long: &[],
    dates: true,
    hooks: true,
};

fn number_cb(_: &ExpandoNode, e: &Email, _: RenderFlags) -> String {
    e.number.to_string()
}
fn author_cb(_: &ExpandoNode, e: &Email, _: RenderFlags) -> String {
    e.author.clone()
}
fn lines_cb(_: &ExpandoNode, e: &Email, _: RenderFlags) -> String {
    e.lines.to_string()
}
fn subject_cb(_: &ExpandoNode, e: &Email, _: RenderFlags) -> String {
    e.subject.clone()
}
fn cumulative_cb(_: &ExpandoNode, e: &Email, _: RenderFlags) -> String {
    (e.lines * 2).to_string()
}
fn date_cb(e: &Email, kind: DateKind) -> Option<DateTime<FixedOffset>> {
    match kind {
        DateKind::SenderSend | DateKind::LocalSend => Some(e.sent),
        DateKind::LocalReceive => Some(e.received),
    }
}

fn callbacks() -> CallbackTable<Email> {
    CallbackTable::new()
        .expando("C", number_cb)
        .expando("L", author_cb)
        .expando("l", lines_cb)
        .expando("s", subject_cb)
        .expando("cr", cumulative_cb)
        .date(date_cb)
}

fn run(src: &str, cols: usize) -> String {
    let tree = parse(src, &DIALECT).unwrap();
    let table = callbacks();
    let bound = bind(&tree, &table);
    render(&bound, &email(), cols, RenderFlags::INDEX).text
}

#[test]
fn index_line_renders_within_budget() {
    let line = run("%4C %{!%b %d} %-12.12L (%4l) %s", 80);
    assert_eq!(line, "   7 Nov 03 Grace Hopper ( 128) Re: [PATCH] widen the index");
}

#[test]
fn two_char_expando_dispatches_separately() {
    assert_eq!(run("%l/%cr", 80), "128/256");
}

#[test]
fn date_kinds_pick_their_timestamp() {
    assert_eq!(run("%[%H:%M]|%(%H:%M)", 80), "09:15|04:20");
}

#[test]
fn conditional_syntaxes_render_identically() {
    assert_eq!(run("%<l?%4l>", 80), run("%?l?%4l?", 80));
}

#[test]
fn status_bar_hard_fill() {
    let line = run("-%C-%>-(%l)-", 20);
    assert_eq!(line, "-7------------(128)-");
    // HardFill pads exactly to the budget minus the remainder
    assert_eq!(line.len(), 20);
}

#[test]
fn spans_reconstruct_literal_projection() {
    let src = "a %s b %l c";
    let tree = parse(src, &DIALECT).unwrap();
    let mut literal = String::new();
    for node in &tree.nodes {
        if let Node::Text(t) = node {
            assert_eq!(t.span.slice(src), t.text);
            literal.push_str(&t.text);
        }
    }
    assert_eq!(literal, "a  b  c");
}

#[test]
fn builtin_dialects_cover_the_registry() {
    // every shipped default belongs to a registered dialect and parses
    for d in dialect::DIALECTS {
        if let Some(default) = expando::registry::builtin_default(d.name) {
            let tree = parse(default, d).unwrap();
            assert!(validate(&tree, d).is_ok(), "default for {}", d.name);
        }
    }
}

#[test]
fn revalidation_across_dialects() {
    // the pgp_entry_format tree is shared by two key-selection dialogs;
    // model them as two dialects and check the same tree against both
    static CLASSIC: Dialect = Dialect {
        name: "pgp_classic",
        short: &["k", "l", "n", "u"],
        two_char: &[],
        long: &[],
        dates: true,
        hooks: false,
    };
    static GPGME: Dialect = Dialect {
        name: "pgp_gpgme",
        short: &["k", "n", "u"],
        two_char: &[],
        long: &[],
        dates: true,
        hooks: false,
    };
    let tree = parse("%4n %k %u", &CLASSIC).unwrap();
    assert!(validate(&tree, &CLASSIC).is_ok());
    assert!(validate(&tree, &GPGME).is_ok());

    let tree = parse("%4n %l %u", &CLASSIC).unwrap();
    let err = validate(&tree, &GPGME).unwrap_err();
    assert_eq!(err.span.slice("%4n %l %u"), "%l");
}

#[test]
fn unicode_subject_counts_columns_not_bytes() {
    let mut e = email();
    e.subject = "🙂 wide".into();
    let tree = parse("%s", &DIALECT).unwrap();
    let table = callbacks();
    let bound = bind(&tree, &table);
    let r = render(&bound, &e, 4, RenderFlags::NONE);
    // "🙂 w" is 6 bytes but 4 columns
    assert_eq!(r.text, "🙂 w");
    assert_eq!(r.width, 4);
}

#[test]
fn soft_fill_keeps_the_tail_visible() {
    // the counter on the right survives; the subject gives way
    let line = run("%s%* %4l", 16);
    assert_eq!(line.chars().count(), 16);
    assert!(line.ends_with(" 128"));
    assert!(line.starts_with("Re: [PATCH]"));
}
