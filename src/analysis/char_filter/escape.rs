//! Removal of literal escape sequences.
//!
//! Text that went through JSON or CSV exports often carries escape sequences
//! as literal characters (`\n` as a backslash followed by `n`). They are not
//! words and would otherwise glue onto neighbouring tokens.

use std::sync::LazyLock;

use regex::Regex;

use super::CharFilter;

static WHITESPACE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\[tnr]").expect("static pattern"));
static UNICODE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\u[0-9a-fA-F]{4}").expect("static pattern"));
static BACKSLASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\+").expect("static pattern"));

/// Replaces `\t`, `\n`, `\r` and `\uXXXX` escapes with a space and drops any
/// remaining backslashes.
#[derive(Clone, Copy, Debug, Default)]
pub struct EscapeCharFilter;

impl EscapeCharFilter {
    /// Create a new escape char filter.
    pub fn new() -> Self {
        EscapeCharFilter
    }
}

impl CharFilter for EscapeCharFilter {
    fn filter(&self, input: &str) -> String {
        if !input.contains('\\') {
            return input.to_string();
        }
        let text = WHITESPACE_ESCAPE.replace_all(input, " ");
        let text = UNICODE_ESCAPE.replace_all(&text, " ");
        BACKSLASHES.replace_all(&text, "").into_owned()
    }

    fn name(&self) -> &'static str {
        "escape"
    }
}
