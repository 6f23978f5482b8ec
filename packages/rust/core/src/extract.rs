//! Per-file extraction: snippet, keywords, purpose and use-when text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use agentsmd_markdown::{
    heading_texts, paragraphs, plain_text, strip_frontmatter, truncate_chars, value_as_text,
};
use agentsmd_shared::{FileType, Frontmatter};

/// Returned when a document has no prose paragraph at all.
pub const FALLBACK_SNIPPET: &str = "Documentation file";

/// Returned when no keyword source yields anything.
pub const FALLBACK_KEYWORDS: [&str; 3] = ["documentation", "markdown", "file"];

/// Domain terms picked up when they occur in the snippet.
const VOCABULARY: [&str; 10] = [
    "guide",
    "template",
    "example",
    "framework",
    "protocol",
    "execution",
    "validation",
    "checklist",
    "summary",
    "overview",
];

/// A paragraph must be longer than this (after cleanup) to be preferred.
const MIN_PARAGRAPH_CHARS: usize = 20;

const MAX_SNIPPET_CHARS: usize = 200;

const HEADINGS_FOR_KEYWORDS: usize = 5;

// ---------------------------------------------------------------------------
// Snippet
// ---------------------------------------------------------------------------

/// Extract a one-sentence preview of a document.
///
/// Front-matter is skipped, then the first non-heading paragraph longer than
/// 20 characters is cut to its first sentence. Documents whose prose is all
/// shorter fall back to their first non-heading paragraph.
pub fn extract_snippet(content: &str) -> String {
    let body = strip_frontmatter(content);

    let mut first_short: Option<String> = None;
    for para in paragraphs(body) {
        if para.starts_with('#') {
            continue;
        }
        let cleaned = plain_text(para);
        if cleaned.chars().count() > MIN_PARAGRAPH_CHARS {
            return first_sentence(&cleaned);
        }
        if first_short.is_none() && !cleaned.trim().is_empty() {
            first_short = Some(cleaned);
        }
    }

    first_short
        .map(|para| first_sentence(&para))
        .unwrap_or_else(|| FALLBACK_SNIPPET.to_string())
}

/// Text before the first `.`, capped at 200 characters plus an ellipsis.
fn first_sentence(text: &str) -> String {
    let sentence = text.split('.').next().unwrap_or(text).trim();
    if sentence.chars().count() > MAX_SNIPPET_CHARS {
        format!("{}...", truncate_chars(sentence, MAX_SNIPPET_CHARS))
    } else {
        sentence.to_string()
    }
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// Build the keyword set for a document.
///
/// Sources: filename words, the front-matter `keywords` field, words from the
/// first headings and vocabulary terms found in `snippet`. The result is
/// ordered longest first, then alphabetically, and capped at `max_keywords`.
pub fn extract_keywords(
    filename: &str,
    content: &str,
    frontmatter: &Frontmatter,
    snippet: &str,
    max_keywords: usize,
) -> Vec<String> {
    static WORD_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b[a-z]{4,}\b").expect("valid regex"));

    let mut keywords: BTreeSet<String> = BTreeSet::new();

    let stem = filename.to_lowercase().replace(".md", "");
    keywords.extend(
        stem.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
            .filter(|word| word.chars().count() > 3)
            .map(str::to_string),
    );

    keywords.extend(frontmatter_keywords(frontmatter));

    for heading in heading_texts(content).take(HEADINGS_FOR_KEYWORDS) {
        let lower = heading.to_lowercase();
        keywords.extend(WORD_RE.find_iter(&lower).map(|m| m.as_str().to_string()));
    }

    let snippet_lower = snippet.to_lowercase();
    keywords.extend(
        VOCABULARY
            .iter()
            .filter(|term| snippet_lower.contains(*term))
            .map(|term| term.to_string()),
    );

    if keywords.is_empty() {
        return FALLBACK_KEYWORDS.iter().map(|k| k.to_string()).collect();
    }

    let mut ordered: Vec<String> = keywords.into_iter().collect();
    ordered.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    ordered.truncate(max_keywords);
    ordered
}

/// Keywords declared in front-matter, either as a YAML list or as a string
/// holding a bracketed comma-separated list.
fn frontmatter_keywords(frontmatter: &Frontmatter) -> Vec<String> {
    let Some(value) = frontmatter.get("keywords").or_else(|| frontmatter.get("keyword")) else {
        return Vec::new();
    };

    let items: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(value_as_text).collect(),
        Value::String(s) => bracketed_items(s),
        _ => Vec::new(),
    };

    items
        .iter()
        .map(|item| item.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn bracketed_items(text: &str) -> Vec<String> {
    let Some(open) = text.find('[') else {
        return Vec::new();
    };
    let Some(len) = text[open + 1..].find(']') else {
        return Vec::new();
    };
    text[open + 1..open + 1 + len]
        .split(',')
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Purpose / use_when
// ---------------------------------------------------------------------------

/// Describe what a document is for.
///
/// An explicit `purpose` (or `description`) in front-matter is used verbatim.
pub fn generate_purpose(file_type: FileType, snippet: &str, frontmatter: &Frontmatter) -> String {
    if let Some(explicit) = ["purpose", "description"]
        .iter()
        .find_map(|key| frontmatter.get(*key).and_then(value_as_text))
    {
        return explicit;
    }

    match file_type {
        FileType::Readme => "Overview and quick start guide for the entire package - explains \
            what the package does, how to use it, and where to start"
            .to_string(),
        FileType::QuickStart => "Step-by-step execution guide with copy-paste ready prompts and \
            troubleshooting guidance"
            .to_string(),
        FileType::Template => "Template file with placeholders for generating new files - \
            provides structure and format"
            .to_string(),
        FileType::Guide => format!("Detailed guide explaining {}", truncate_chars(snippet, 100)),
        FileType::Sop => "Standard Operating Procedure with step-by-step instructions and \
            quality gates"
            .to_string(),
        FileType::Example => {
            "Example file showing correct implementation and usage patterns".to_string()
        }
        FileType::Log => "Conversation log or historical record documenting generation process \
            or development history"
            .to_string(),
        other => format!("{} file: {}", other.title(), truncate_chars(snippet, 150)),
    }
}

/// Describe the situation in which a reader should open a document.
pub fn generate_use_when(filename: &str, file_type: FileType) -> &'static str {
    let name = filename.to_lowercase();

    if file_type == FileType::Readme || name.contains("readme") {
        "First time using the package, need orientation and understanding of package contents"
    } else if file_type == FileType::QuickStart || name.contains("quick") {
        "Ready to execute, need exact steps and commands, troubleshooting guidance"
    } else {
        match file_type {
            FileType::Template => "Creating new files based on template, need structure and format",
            FileType::Guide => "Need detailed guidance on specific topic, learning the framework",
            FileType::Sop => {
                "Conducting comprehensive process, need full methodology and quality gates"
            }
            FileType::Example => {
                "Need concrete example, learning the framework, validating approach"
            }
            FileType::Log => "Understanding package origins, historical context, generation process",
            FileType::Index => {
                "Need file navigation, usage matrix, or troubleshooting quick reference"
            }
            FileType::Summary => "First time using package, need orientation and quality guarantees",
            _ => "Need reference material for specific task or topic",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
