// dialect.rs — per-format-string name tables.
//
// Every user-configurable format string has a dialect: the set of expando
// names that are legal in it. The parser consults the dialect for two-char
// lookahead and name validation; the validator re-checks a tree against a
// (possibly different) dialect. Tables mirror the format variables of a
// terminal mail client, one entry per config variable.

/// Name tables for one format-string dialect.
#[derive(Debug, Clone, Copy)]
pub struct Dialect {
    /// Config variable this dialect belongs to, e.g. `"index_format"`.
    pub name: &'static str,
    /// Single-character expando names.
    pub short: &'static [&'static str],
    /// Two-character names, checked with one char of lookahead before any
    /// single-character match is committed.
    pub two_char: &'static [&'static str],
    /// Named `%{…}` expandos.
    pub long: &'static [&'static str],
    /// Whether `%{fmt}` / `%[fmt]` / `%(fmt)` date nodes are legal.
    pub dates: bool,
    /// Whether `%@name@` hook nodes are legal.
    pub hooks: bool,
}

impl Dialect {
    /// True if `name` is a legal expando identifier in this dialect,
    /// whichever table its length selects.
    pub fn permits(&self, name: &str) -> bool {
        let chars = name.chars().count();
        match chars {
            1 => self.short.contains(&name),
            2 => self.two_char.contains(&name),
            _ => self.long.contains(&name),
        }
    }

    /// True if the next two characters of input should be consumed as a
    /// single two-character expando.
    pub fn matches_two_char(&self, pair: &str) -> bool {
        self.two_char.contains(&pair)
    }
}

// ─────────────────── built-in dialect tables ──────────────────

const NO_NAMES: &[&str] = &[];

macro_rules! dialect {
    ($name:literal, short: $short:expr) => {
        dialect!($name, short: $short, two: NO_NAMES, long: NO_NAMES, dates: false, hooks: false)
    };
    ($name:literal, short: $short:expr, dates: $dates:expr) => {
        dialect!($name, short: $short, two: NO_NAMES, long: NO_NAMES, dates: $dates, hooks: false)
    };
    ($name:literal, short: $short:expr, two: $two:expr, long: $long:expr,
     dates: $dates:expr, hooks: $hooks:expr) => {
        Dialect {
            name: $name,
            short: $short,
            two_char: $two,
            long: $long,
            dates: $dates,
            hooks: $hooks,
        }
    };
}

/// All built-in dialects, one per format-string config variable.
pub static DIALECTS: &[Dialect] = &[
    dialect!("alias_format", short: &["a", "c", "e", "f", "n", "r", "t"]),
    dialect!("attach_format",
        short: &["c", "C", "d", "D", "e", "f", "F", "I", "m", "M", "n", "Q", "s", "t", "T", "u", "X"]),
    dialect!("attribution_intro", short: &["a", "d", "f", "n", "v"], dates: true),
    dialect!("attribution_trailer", short: &["a", "d", "f", "n", "v"], dates: true),
    dialect!("autocrypt_acct_format", short: &["a", "k", "n", "p", "s"]),
    dialect!("compose_format", short: &["a", "h", "l", "v"]),
    dialect!("folder_format",
        short: &["a", "C", "d", "D", "f", "F", "g", "i", "l", "m", "n", "N", "s", "t", "u"],
        dates: true),
    dialect!("forward_attribution_intro", short: &["a", "d", "f", "n", "v"], dates: true),
    dialect!("forward_attribution_trailer", short: &["a", "d", "f", "n", "v"], dates: true),
    dialect!("forward_format", short: &["a", "s"]),
    dialect!("greeting", short: &["n", "u", "v"]),
    dialect!("group_index_format", short: &["C", "d", "f", "M", "n", "N", "s"]),
    dialect!("history_format", short: &["s"]),
    dialect!("indent_string", short: &["a", "d", "f", "n", "v"], dates: true),
    dialect!("index_format",
        short: &["a", "A", "b", "B", "c", "C", "d", "D", "e", "E", "f", "F", "g", "H",
                 "i", "I", "J", "K", "l", "L", "m", "M", "n", "N", "O", "P", "q", "r",
                 "R", "s", "S", "t", "T", "u", "v", "W", "x", "X", "y", "Y", "Z"],
        two: &["cr", "Fp", "zc", "zs", "zt"],
        long: NO_NAMES,
        dates: true,
        hooks: true),
    dialect!("inews", short: &["a", "s"]),
    dialect!("message_format", short: &["s"]),
    dialect!("mix_entry_format", short: &["a", "c", "n", "s"]),
    dialect!("new_mail_command", short: &["f", "n", "u", "v"]),
    dialect!("newsrc_format", short: &["a", "p", "P", "s"]),
    dialect!("pager_format",
        short: &["a", "A", "b", "B", "c", "C", "d", "D", "e", "E", "f", "F", "g", "H",
                 "i", "I", "J", "K", "l", "L", "m", "M", "n", "N", "O", "P", "q", "r",
                 "R", "s", "S", "t", "T", "u", "v", "W", "x", "X", "y", "Y", "Z"],
        two: &["cr", "Fp", "zc", "zs", "zt"],
        long: NO_NAMES,
        dates: true,
        hooks: true),
    dialect!("pattern_format", short: &["d", "e", "n"]),
    dialect!("pgp_clear_sign_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_decode_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_decrypt_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_encrypt_only_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_encrypt_sign_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_entry_format",
        short: &["a", "c", "f", "i", "k", "l", "n", "p", "t", "u"],
        dates: true),
    dialect!("pgp_export_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_get_keys_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_import_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_list_pubring_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_list_secring_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_sign_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_verify_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("pgp_verify_key_command", short: &["a", "f", "p", "r", "s"]),
    dialect!("query_format", short: &["a", "c", "e", "n", "t"]),
    dialect!("sidebar_format",
        short: &["!", "a", "B", "c", "d", "D", "F", "L", "n", "N", "o", "p", "r", "S", "t", "Z"]),
    dialect!("smime_decrypt_command", short: &["a", "c", "C", "d", "f", "i", "k", "s"]),
    dialect!("smime_encrypt_command", short: &["a", "c", "C", "d", "f", "i", "k", "s"]),
    dialect!("smime_get_cert_command", short: &["a", "c", "C", "d", "f", "i", "k", "s"]),
    dialect!("smime_get_cert_email_command", short: &["a", "c", "C", "d", "f", "i", "k", "s"]),
    dialect!("smime_get_signer_cert_command", short: &["a", "c", "C", "d", "f", "i", "k", "s"]),
    dialect!("smime_import_cert_command", short: &["a", "c", "C", "d", "f", "i", "k", "s"]),
    dialect!("smime_pk7out_command", short: &["a", "c", "C", "d", "f", "i", "k", "s"]),
    dialect!("smime_sign_command", short: &["a", "c", "C", "d", "f", "i", "k", "s"]),
    dialect!("smime_verify_command", short: &["a", "c", "C", "d", "f", "i", "k", "s"]),
    dialect!("smime_verify_opaque_command", short: &["a", "c", "C", "d", "f", "i", "k", "s"]),
    dialect!("status_format",
        short: &["b", "d", "D", "f", "F", "h", "l", "L", "m", "M", "n", "o", "p", "P",
                 "r", "R", "s", "S", "t", "T", "u", "v", "V"]),
    dialect!("ts_icon_format", short: &["f", "h", "v"]),
    dialect!("ts_status_format",
        short: &["b", "d", "D", "f", "F", "h", "l", "L", "m", "M", "n", "o", "p", "P",
                 "r", "R", "s", "S", "t", "T", "u", "v", "V"]),
];

/// Look up a built-in dialect by config variable name.
pub fn find(name: &str) -> Option<&'static Dialect> {
    DIALECTS.iter().find(|d| d.name == name)
}
