//! Folder-level key concept aggregation.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use agentsmd_markdown::{frontmatter_or_default, heading_texts, value_as_text};

/// Headings considered per document.
const HEADINGS_PER_DOCUMENT: usize = 10;

/// Headings must be longer than this to count as a concept.
const MIN_HEADING_CHARS: usize = 10;

/// Known phrases and the concept each one signals.
const CONCEPT_DICTIONARY: &[(&str, &str)] = &[
    ("progressive context loading", "progressive context loading"),
    ("context loading", "progressive context loading"),
    ("tier", "tiered file loading"),
    ("agent", "AI agent"),
    ("llm", "LLM context management"),
];

/// Derive key concepts from every document in a folder.
///
/// Sources: each document's front-matter `key_concepts`, long headings, and
/// dictionary phrases found anywhere in the combined text. The result is
/// sorted and capped at `max_concepts`.
pub fn extract_key_concepts<S: AsRef<str>>(documents: &[S], max_concepts: usize) -> Vec<String> {
    let mut concepts: BTreeSet<String> = BTreeSet::new();

    for doc in documents {
        let doc = doc.as_ref();
        concepts.extend(declared_concepts(doc));
        concepts.extend(
            heading_texts(doc)
                .take(HEADINGS_PER_DOCUMENT)
                .map(str::trim)
                .filter(|h| h.chars().count() > MIN_HEADING_CHARS)
                .map(str::to_string),
        );
    }

    let combined = documents
        .iter()
        .map(|doc| doc.as_ref())
        .collect::<Vec<&str>>()
        .join("\n\n")
        .to_lowercase();
    concepts.extend(
        CONCEPT_DICTIONARY
            .iter()
            .filter(|(phrase, _)| combined.contains(phrase))
            .map(|(_, concept)| concept.to_string()),
    );

    debug!(found = concepts.len(), "aggregated key concepts");

    concepts.into_iter().take(max_concepts).collect()
}

/// Concepts listed under `key_concepts` in a document's front-matter.
///
/// A YAML list contributes its items; a plain string contributes each quoted
/// token inside it.
fn declared_concepts(doc: &str) -> Vec<String> {
    static QUOTED_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"["']([^"']+)["']"#).expect("valid regex"));

    let frontmatter = frontmatter_or_default(doc);
    match frontmatter.get("key_concepts") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(value_as_text)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Some(Value::String(s)) => QUOTED_RE
            .captures_iter(s)
            .map(|caps| caps[1].to_string())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_phrases_map_to_canonical_concepts() {
        let docs = ["Agents load files by Tier.", "Uses an LLM for context loading."];
        let concepts = extract_key_concepts(&docs, 10);
        assert_eq!(
            concepts,
            vec![
                "AI agent",
                "LLM context management",
                "progressive context loading",
                "tiered file loading",
            ]
        );
    }

    #[test]
    fn long_headings_become_concepts() {
        let docs = ["# Short\n## Deployment Pipeline\n### Rollback Strategy  \n"];
        let concepts = extract_key_concepts(&docs, 10);
        assert_eq!(concepts, vec!["Deployment Pipeline", "Rollback Strategy"]);
    }

    #[test]
    fn headings_are_limited_per_document() {
        let first: String = (0..12).map(|i| format!("# Heading number {i:02}\n")).collect();
        let second = "# Second document heading\n";
        let concepts = extract_key_concepts(&[first.as_str(), second], 20);
        assert!(concepts.contains(&"Heading number 09".to_string()));
        assert!(!concepts.contains(&"Heading number 10".to_string()));
        assert!(concepts.contains(&"Second document heading".to_string()));
    }

    #[test]
    fn frontmatter_concepts_from_list_and_string() {
        let list_doc = "---\nkey_concepts:\n  - release cadence\n  - rollout\n---\nBody";
        let string_doc = "---\nkey_concepts: \"'blue green' and 'canary'\"\n---\nBody";
        let concepts = extract_key_concepts(&[list_doc, string_doc], 10);
        assert_eq!(concepts, vec!["blue green", "canary", "release cadence", "rollout"]);
    }

    #[test]
    fn concepts_are_deduplicated_sorted_and_capped() {
        let docs = [
            "# Zebra crossing rules\n# Alpha release notes\nagent agent",
            "# Alpha release notes\n",
        ];
        let concepts = extract_key_concepts(&docs, 2);
        assert_eq!(concepts, vec!["AI agent", "Alpha release notes"]);
    }

    #[test]
    fn no_documents_no_concepts() {
        let docs: [&str; 0] = [];
        assert!(extract_key_concepts(&docs, 10).is_empty());
    }
}
