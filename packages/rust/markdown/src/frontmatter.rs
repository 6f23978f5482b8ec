//! Leading `---` metadata blocks.
//!
//! The block opens with `---` at the very first byte of the document and ends
//! at the next `---`, wherever it occurs. Its content is YAML. A top-level
//! key given more than once keeps its last value.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use agentsmd_shared::{AgentsMdError, Frontmatter, Result};

const DELIMITER: &str = "---";

/// A `key:` entry starting at column 0.
static TOP_LEVEL_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s#\-?][^:]*?)\s*:(?:\s|$)").expect("valid regex"));

/// Split a document into its raw front-matter text and the body after it.
///
/// Returns `None` when the document does not start with a delimiter or the
/// block is never closed.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let after_open = content.strip_prefix(DELIMITER)?;
    let close = after_open.find(DELIMITER)?;
    Some((&after_open[..close], &after_open[close + DELIMITER.len()..]))
}

/// The document body with any front-matter block removed.
pub fn strip_frontmatter(content: &str) -> &str {
    split_frontmatter(content).map_or(content, |(_, body)| body)
}

/// Parse the front-matter block into a mapping, returning it with the body.
///
/// A document without a block yields an empty mapping and the full text.
/// Malformed YAML or a block that is not a mapping is an error.
pub fn parse_frontmatter(content: &str) -> Result<(Frontmatter, &str)> {
    let Some((raw, body)) = split_frontmatter(content) else {
        return Ok((Frontmatter::new(), content));
    };

    let yaml = raw.trim();
    if yaml
        .lines()
        .all(|line| line.trim().is_empty() || line.trim_start().starts_with('#'))
    {
        return Ok((Frontmatter::new(), body));
    }

    let yaml = keep_last_top_level_keys(yaml);
    let value: Value = serde_yaml_bw::from_str(&yaml)
        .map_err(|e| AgentsMdError::parse(format!("YAML parsing error: {e}")))?;

    match value {
        Value::Object(map) => Ok((map, body)),
        Value::Null => Ok((Frontmatter::new(), body)),
        other => Err(AgentsMdError::parse(format!(
            "YAML parsing error: front-matter must be a mapping, found {}",
            value_kind(&other)
        ))),
    }
}

/// Remove every top-level entry whose key is repeated further down.
///
/// An entry spans its key line plus everything up to the next top-level key,
/// so block lists and nested mappings go with it.
fn keep_last_top_level_keys(yaml: &str) -> Cow<'_, str> {
    let lines: Vec<&str> = yaml.lines().collect();
    let entries: Vec<(&str, usize)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let caps = TOP_LEVEL_KEY.captures(line)?;
            let key = caps.get(1)?.as_str().trim_matches(|c: char| c == '"' || c == '\'');
            Some((key, i))
        })
        .collect();

    let mut dropped = vec![false; lines.len()];
    let mut any_dropped = false;
    for (idx, (key, start)) in entries.iter().enumerate() {
        if entries[idx + 1..].iter().any(|(later, _)| later == key) {
            let end = entries.get(idx + 1).map_or(lines.len(), |(_, next)| *next);
            dropped[*start..end].fill(true);
            any_dropped = true;
            debug!(key = %key, "repeated front-matter key, keeping the last value");
        }
    }

    if !any_dropped {
        return Cow::Borrowed(yaml);
    }
    let kept: Vec<&str> = lines
        .iter()
        .zip(&dropped)
        .filter(|(_, drop)| !**drop)
        .map(|(line, _)| *line)
        .collect();
    Cow::Owned(kept.join("\n"))
}

/// Lenient variant for classification: malformed blocks degrade to an empty
/// mapping.
pub fn frontmatter_or_default(content: &str) -> Frontmatter {
    match parse_frontmatter(content) {
        Ok((map, _)) => map,
        Err(e) => {
            debug!(error = %e, "ignoring malformed front-matter");
            Frontmatter::new()
        }
    }
}

/// Render a scalar front-matter value as text. Lists and maps yield `None`.
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Short name of a JSON value's type, for diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_requires_leading_delimiter() {
        assert!(split_frontmatter("# Title\n---\nx: 1\n---\n").is_none());
        assert!(split_frontmatter("---\nunclosed: true\n").is_none());

        let (raw, body) = split_frontmatter("---\ntitle: A\n---\n# Body").expect("block");
        assert_eq!(raw, "\ntitle: A\n");
        assert_eq!(body, "\n# Body");
    }

    #[test]
    fn parse_returns_mapping_and_body() {
        let doc = "---\ntitle: \"Guide\"\nversion: 1.0\ntags: [a, b]\n---\nBody text";
        let (fm, body) = parse_frontmatter(doc).expect("parse");
        assert_eq!(fm["title"], "Guide");
        assert_eq!(value_as_text(&fm["version"]).as_deref(), Some("1.0"));
        assert_eq!(fm["tags"].as_array().map(Vec::len), Some(2));
        assert_eq!(body, "\nBody text");
    }

    #[test]
    fn parse_without_block_is_empty() {
        let (fm, body) = parse_frontmatter("# Just markdown").expect("parse");
        assert!(fm.is_empty());
        assert_eq!(body, "# Just markdown");
    }

    #[test]
    fn parse_handles_block_lists() {
        let doc = "---\nkey_concepts:\n  - tiered loading\n  - agents\n---\n";
        let (fm, _) = parse_frontmatter(doc).expect("parse");
        assert_eq!(fm["key_concepts"][1], "agents");
    }

    #[test]
    fn parse_rejects_malformed_yaml() {
        let err = parse_frontmatter("---\ntitle: [unclosed\n---\n").unwrap_err();
        assert!(err.to_string().contains("YAML parsing error"));
    }

    #[test]
    fn parse_rejects_non_mapping() {
        let err = parse_frontmatter("---\n- a\n- b\n---\n").unwrap_err();
        assert!(err.to_string().contains("must be a mapping"));
    }

    #[test]
    fn empty_or_comment_only_block_is_empty_mapping() {
        let (fm, _) = parse_frontmatter("---\n---\nbody").expect("parse");
        assert!(fm.is_empty());
        let (fm, _) = parse_frontmatter("---\n# just a note\n---\nbody").expect("parse");
        assert!(fm.is_empty());
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let doc = "---\ntitle: T\ntitle: U\nversion: 1\n---\nbody";
        let (fm, body) = parse_frontmatter(doc).expect("parse");
        assert_eq!(fm["title"], "U");
        assert_eq!(fm["version"], 1);
        assert_eq!(body, "\nbody");
    }

    #[test]
    fn repeated_block_entry_is_replaced_whole() {
        let doc = "---\nkeywords:\n  - old\n  - stale\npurpose: Explains releases\nkeywords:\n  - fresh\n---\n";
        let (fm, _) = parse_frontmatter(doc).expect("parse");
        assert_eq!(fm["keywords"], serde_json::json!(["fresh"]));
        assert_eq!(fm["purpose"], "Explains releases");
    }

    #[test]
    fn repeated_key_does_not_drop_the_block_in_lenient_mode() {
        let fm = frontmatter_or_default("---\ntags: a\ntags: b\npurpose: Explains the release train\n---\n");
        assert_eq!(fm["tags"], "b");
        assert_eq!(fm["purpose"], "Explains the release train");
    }

    #[test]
    fn nested_keys_are_left_to_the_parser() {
        let doc = "---\nmeta:\n  owner: a\nowner: b\n---\n";
        let (fm, _) = parse_frontmatter(doc).expect("parse");
        assert_eq!(fm["meta"]["owner"], "a");
        assert_eq!(fm["owner"], "b");
    }

    #[test]
    fn lenient_parse_swallows_errors() {
        assert!(frontmatter_or_default("---\nkey: [oops\n---\n").is_empty());
        assert_eq!(frontmatter_or_default("---\npurpose: Setup\n---\n")["purpose"], "Setup");
    }
}
