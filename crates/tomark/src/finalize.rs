//! Whitespace cleanup for the assembled Markdown.
//!
//! Block rules pad their output with blank lines and `<br>` becomes a
//! two-space hard break, so naive concatenation leaves runs of empty and
//! space-only lines behind. The passes below remove them. They run once, in
//! this order; later passes rely on the shapes earlier ones leave.

use once_cell::sync::Lazy;
use regex::Regex;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("normalizer pattern is valid")
}

/// Hard break directly followed by a block gap
static BREAK_BEFORE_BLOCK_GAP: Lazy<Regex> = Lazy::new(|| regex(r"[ \x{A0}]+\n\n\n"));
/// Space-padded empty line followed by a blank line
static PADDED_EMPTY_LINE: Lazy<Regex> = Lazy::new(|| regex(r"\n[ \x{A0}]+\n\n"));
/// Hard break directly followed by a blank line
static BREAK_BEFORE_BLANK_LINE: Lazy<Regex> = Lazy::new(|| regex(r"[ \x{A0}]+\n\n"));
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| regex(r"\n{3,}"));
/// Two or more space-only lines, optionally after a blank line
static EMPTY_LINES_BETWEEN_BLOCKS: Lazy<Regex> = Lazy::new(|| regex(r"(\n\n)?([ \x{A0}]+\n){2,}"));
static EDGE_WHITESPACE: Lazy<Regex> = Lazy::new(|| regex(r"^\n+|\s+$"));
/// Trailing-space hard break
static HARD_BREAK: Lazy<Regex> = Lazy::new(|| regex(r"[ \x{A0}]{2,}\n"));

/// Normalize the whitespace of a converted document.
///
/// With `gfm` set, remaining two-space hard breaks become plain newlines;
/// the basic dialect keeps them.
pub fn finalize(text: &str, gfm: bool) -> String {
    let text = BREAK_BEFORE_BLOCK_GAP.replace_all(text, "\n\n");
    let text = PADDED_EMPTY_LINE.replace_all(&text, "\n  \n");
    let text = BREAK_BEFORE_BLANK_LINE.replace_all(&text, "\n");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = EMPTY_LINES_BETWEEN_BLOCKS.replace_all(&text, "\n\n");
    let text = EDGE_WHITESPACE.replace_all(&text, "");

    if gfm {
        HARD_BREAK.replace_all(&text, "\n").into_owned()
    } else {
        text.into_owned()
    }
}
