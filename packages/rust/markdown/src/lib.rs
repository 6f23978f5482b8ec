//! Markdown text helpers used by the classifier and the validator.
//!
//! Parses leading front-matter, pulls out headings and paragraphs, and runs
//! a small cleanup pipeline that turns a paragraph into plain prose. Also
//! lists the markdown files of a folder.

mod cleanup;
mod files;
mod frontmatter;

use std::sync::LazyLock;

use regex::Regex;

pub use files::markdown_file_names;
pub use frontmatter::{
    frontmatter_or_default, parse_frontmatter, split_frontmatter, strip_frontmatter,
    value_as_text, value_kind,
};

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Count whitespace-separated tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count `\n`-separated segments; a trailing newline adds an empty segment.
pub fn count_lines(text: &str) -> usize {
    text.split('\n').count()
}

// ---------------------------------------------------------------------------
// Headings
// ---------------------------------------------------------------------------

/// Collect up to `limit` heading lines with their `#` markers removed.
///
/// Any line whose trimmed form starts with `#` counts, with or without a
/// space after the markers.
pub fn extract_headings(text: &str, limit: usize) -> Vec<String> {
    static MARKER_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^#+\s*").expect("valid regex"));

    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with('#'))
        .map(|line| MARKER_RE.replace(line, "").to_string())
        .take(limit)
        .collect()
}

/// Iterate over ATX heading texts (`#` markers followed by whitespace).
pub fn heading_texts(text: &str) -> impl Iterator<Item = &str> {
    static HEADING_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^#+\s+(.+)$").expect("valid regex"));

    HEADING_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim_end_matches('\r')))
}

/// Whether `body` has a level-2-or-deeper heading whose text starts with
/// `title`, ignoring leading emoji or symbols (`## 🎯 CONTEXT`).
pub fn has_section(body: &str, title: &str) -> bool {
    body.lines().any(|line| {
        let Some(rest) = line.trim_start().strip_prefix("##") else {
            return false;
        };
        rest.trim_start_matches('#')
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .starts_with(title)
    })
}

// ---------------------------------------------------------------------------
// Paragraphs
// ---------------------------------------------------------------------------

/// Split text on blank lines into trimmed, non-empty paragraphs.
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Strip inline markup from a paragraph: `#*_` and backticks are deleted
/// and `[text](url)` becomes `text`.
pub fn plain_text(paragraph: &str) -> String {
    cleanup::run_pipeline(paragraph)
}

/// The first `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
