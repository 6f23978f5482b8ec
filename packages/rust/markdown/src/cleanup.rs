//! Inline cleanup passes for paragraph text.
//!
//! Each pass is a function `&str -> String` applied in sequence.
//! Together they turn a markdown paragraph into plain prose for snippets.

use std::sync::LazyLock;

use regex::Regex;

/// Run the full cleanup pipeline on a single paragraph.
pub(crate) fn run_pipeline(para: &str) -> String {
    let mut result = para.to_string();

    result = strip_markers(&result);
    result = collapse_links(&result);

    result
}

// ---------------------------------------------------------------------------
// Pass 1: Strip emphasis, heading and code markers
// ---------------------------------------------------------------------------

/// Delete `#`, `*`, `_` and backtick characters wherever they appear.
fn strip_markers(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '#' | '*' | '_' | '`'))
        .collect()
}

// ---------------------------------------------------------------------------
// Pass 2: Collapse links to their text
// ---------------------------------------------------------------------------

/// Replace `[text](target)` with `text`.
fn collapse_links(text: &str) -> String {
    static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex")
    });

    LINK_RE.replace_all(text, "$1").to_string()
}
