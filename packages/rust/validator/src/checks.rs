//! The ordered battery of checks run against a generated index.
//!
//! Every check runs regardless of what earlier checks reported. A check that
//! trips over an unexpected data shape returns `Err`, and its descriptor
//! decides whether that becomes a fail or a warning.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde_json::{Map, Value};

use agentsmd_markdown::{has_section, parse_frontmatter, truncate_chars, value_as_text, value_kind};
use agentsmd_shared::{AgentsMdError, Frontmatter, ValidationConfig};

use crate::report::ValidationReport;

type CheckResult = std::result::Result<(), String>;

/// How an `Err` from a check is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    Fail,
    Warn,
}

/// One entry of the battery.
pub struct Check {
    /// Report name used for execution errors.
    pub name: &'static str,
    /// Noun used in `Error checking <subject>: ...`.
    pub subject: &'static str,
    pub on_error: OnError,
    pub run: fn(&CheckContext<'_>, &mut ValidationReport) -> CheckResult,
}

/// Checks in execution order.
pub const CHECKS: &[Check] = &[
    Check {
        name: "YAML frontmatter",
        subject: "frontmatter",
        on_error: OnError::Fail,
        run: check_frontmatter,
    },
    Check {
        name: "Required sections",
        subject: "required sections",
        on_error: OnError::Fail,
        run: check_required_sections,
    },
    Check {
        name: "Tier assignments",
        subject: "tiers",
        on_error: OnError::Fail,
        run: check_tier_assignments,
    },
    Check {
        name: "No placeholders",
        subject: "placeholders",
        on_error: OnError::Fail,
        run: check_placeholders,
    },
    Check {
        name: "File inventory",
        subject: "file inventory",
        on_error: OnError::Fail,
        run: check_file_inventory,
    },
    Check {
        name: "Key concepts",
        subject: "key concepts",
        on_error: OnError::Fail,
        run: check_key_concepts,
    },
    Check {
        name: "Expected outcomes",
        subject: "expected outcomes",
        on_error: OnError::Fail,
        run: check_expected_outcomes,
    },
    Check {
        name: "Content quality",
        subject: "content quality",
        on_error: OnError::Warn,
        run: check_content_quality,
    },
];

/// Run every check in [`CHECKS`] order.
pub fn run_checks(ctx: &CheckContext<'_>, report: &mut ValidationReport) {
    for check in CHECKS {
        let Err(e) = (check.run)(ctx, report) else {
            continue;
        };
        match check.on_error {
            OnError::Fail => {
                report.add_fail(check.name, format!("Error checking {}: {e}", check.subject));
            }
            OnError::Warn => report.add_warning(
                check.name,
                format!(
                    "Error checking {}: {e} (manual verification recommended)",
                    check.subject
                ),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Inputs shared by all checks: the parsed document, the folder listing and
/// the cardinality bounds.
pub struct CheckContext<'a> {
    content: &'a str,
    parsed: std::result::Result<(Frontmatter, &'a str), String>,
    folder_files: &'a [String],
    config: &'a ValidationConfig,
}

impl<'a> CheckContext<'a> {
    pub fn new(content: &'a str, folder_files: &'a [String], config: &'a ValidationConfig) -> Self {
        let parsed = parse_frontmatter(content).map_err(|e| match e {
            AgentsMdError::Parse { message } => message,
            other => other.to_string(),
        });
        Self {
            content,
            parsed,
            folder_files,
            config,
        }
    }

    fn frontmatter(&self) -> std::result::Result<&Frontmatter, String> {
        self.parsed.as_ref().map(|(fm, _)| fm).map_err(Clone::clone)
    }

    /// Text after the front-matter block, or the whole document when the
    /// block is absent or malformed.
    fn body(&self) -> &'a str {
        match &self.parsed {
            Ok((_, body)) => *body,
            Err(_) => self.content,
        }
    }
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

/// The list stored under `key`; `None` when absent.
fn list_field<'v>(
    fm: &'v Frontmatter,
    key: &str,
) -> std::result::Result<Option<&'v Vec<Value>>, String> {
    match fm.get(key) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(format!("{key} must be a list, found {}", value_kind(other))),
    }
}

fn as_mapping<'v>(
    entry: &'v Value,
    key: &str,
    index: usize,
) -> std::result::Result<&'v Map<String, Value>, String> {
    entry
        .as_object()
        .ok_or_else(|| format!("{key}[{index}] must be a mapping, found {}", value_kind(entry)))
}

fn text_of(value: &Value) -> String {
    value_as_text(value).unwrap_or_else(|| value.to_string())
}

fn field_text(entry: &Map<String, Value>, key: &str, default: &str) -> String {
    entry.get(key).map_or_else(|| default.to_string(), text_of)
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

/// Tier 1, 2 or 3, written as an integer or an integral float such as `2.0`.
fn is_valid_tier(value: Option<&Value>) -> bool {
    let Some(Value::Number(n)) = value else {
        return false;
    };
    match n.as_u64() {
        Some(tier) => (1..=3).contains(&tier),
        None => n
            .as_f64()
            .is_some_and(|f| f.fract() == 0.0 && (1.0..=3.0).contains(&f)),
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

// ---------------------------------------------------------------------------
// 1. Front-matter
// ---------------------------------------------------------------------------

const REQUIRED_FIELDS: [&str; 5] = ["title", "version", "date", "status", "classification"];

fn check_frontmatter(ctx: &CheckContext<'_>, report: &mut ValidationReport) -> CheckResult {
    const NAME: &str = "YAML frontmatter";

    let fm = match ctx.frontmatter() {
        Ok(fm) => fm,
        Err(e) => {
            report.add_fail(NAME, e);
            return Ok(());
        }
    };

    if let Some(field) = REQUIRED_FIELDS.iter().find(|f| !fm.contains_key(**f)) {
        report.add_fail(NAME, format!("Missing required field: {field}"));
        return Ok(());
    }

    let mut valid = true;
    if !matches!(fm.get("title"), Some(Value::String(s)) if !s.is_empty()) {
        report.add_fail(NAME, "Invalid field value: title");
        valid = false;
    }
    if !is_truthy(fm.get("version")) {
        report.add_fail(NAME, "Invalid field value: version");
        valid = false;
    }

    if valid {
        report.add_pass(NAME);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// 2. Required sections
// ---------------------------------------------------------------------------

const CONTEXT_LEVELS: [&str; 4] = ["Level 1", "Level 2", "Level 3", "Level 4"];

fn check_required_sections(ctx: &CheckContext<'_>, report: &mut ValidationReport) -> CheckResult {
    if has_section(ctx.content, "CONTEXT") {
        let lower = ctx.content.to_lowercase();
        let missing: Vec<&str> = CONTEXT_LEVELS
            .iter()
            .filter(|level| !lower.contains(&level.to_lowercase()))
            .copied()
            .collect();
        if missing.is_empty() {
            report.add_pass("CONTEXT section");
        } else {
            report.add_fail("CONTEXT section", format!("Missing levels: {}", missing.join(", ")));
        }
    } else {
        report.add_fail("CONTEXT section", "CONTEXT section missing");
    }

    if has_section(ctx.content, "Document Guide") {
        report.add_pass("Document Guide section");
    } else {
        report.add_fail("Document Guide section", "Document Guide section missing");
    }

    let Ok(fm) = ctx.frontmatter() else {
        report.add_fail("File inventory", "Cannot parse file inventory");
        return Ok(());
    };

    let non_empty_list = |key: &str| matches!(fm.get(key), Some(Value::Array(items)) if !items.is_empty());

    if non_empty_list("files") {
        report.add_pass("File inventory");
    } else {
        report.add_fail("File inventory", "File inventory missing or empty");
    }

    if non_empty_list("contextual_snippets") {
        report.add_pass("Contextual snippets");
    } else {
        report.add_fail("Contextual snippets", "Contextual snippets missing or empty");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// 3. Tier assignments
// ---------------------------------------------------------------------------

fn check_tier_assignments(ctx: &CheckContext<'_>, report: &mut ValidationReport) -> CheckResult {
    const NAME: &str = "Tier assignments";
    let fm = ctx.frontmatter()?;

    if let Some(snippets) = list_field(fm, "contextual_snippets")? {
        for (i, entry) in snippets.iter().enumerate() {
            let snippet = as_mapping(entry, "contextual_snippets", i)?;
            let tier = snippet.get("tier");
            if !is_valid_tier(tier) {
                report.add_fail(
                    NAME,
                    format!(
                        "Invalid tier: {} (must be 1, 2, or 3) in snippet for {}",
                        tier.map_or_else(|| "null".to_string(), text_of),
                        field_text(snippet, "file", "unknown")
                    ),
                );
                return Ok(());
            }
        }
    }

    if let Some(files) = list_field(fm, "files")? {
        for (i, entry) in files.iter().enumerate() {
            let file = as_mapping(entry, "files", i)?;
            let tier = file.get("tier");
            if !is_valid_tier(tier) {
                report.add_fail(
                    NAME,
                    format!(
                        "Invalid tier: {} (must be 1, 2, or 3) for file {}",
                        tier.map_or_else(|| "null".to_string(), text_of),
                        field_text(file, "name", "unknown")
                    ),
                );
                return Ok(());
            }
        }
    }

    report.add_pass(NAME);
    Ok(())
}

// ---------------------------------------------------------------------------
// 4. Placeholders
// ---------------------------------------------------------------------------

const PLACEHOLDERS: [&str; 12] = [
    "[PLACEHOLDER]",
    "[FILL_ME]",
    "[REPLACE]",
    "[EXAMPLE]",
    "[CHANGE_ME]",
    "[FOLDER_TITLE]",
    "[FILE_NAME]",
    "[FILE_PURPOSE]",
    "[TIER_ASSIGNMENT]",
    "[KEYWORDS]",
    "[KEY_CONCEPTS]",
    "[OUTCOMES]",
];

const TEMPLATE_COMMENTS: [&str; 4] = [
    "# REPLACE:",
    "# EXTRACT:",
    "# ADD MORE:",
    "# PLACEHOLDER REPLACEMENT GUIDE",
];

const MAX_LISTED: usize = 5;

static PLACEHOLDER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PLACEHOLDERS
        .iter()
        .map(|p| {
            RegexBuilder::new(&regex::escape(p))
                .case_insensitive(true)
                .build()
                .expect("valid regex")
        })
        .collect()
});

fn check_placeholders(ctx: &CheckContext<'_>, report: &mut ValidationReport) -> CheckResult {
    let mut found: Vec<&str> = Vec::new();
    for re in PLACEHOLDER_RES.iter() {
        for m in re.find_iter(ctx.content) {
            if !found.contains(&m.as_str()) {
                found.push(m.as_str());
            }
        }
    }

    if found.is_empty() {
        report.add_pass("No placeholders");
    } else {
        found.truncate(MAX_LISTED);
        report.add_fail(
            "No placeholders",
            format!("Placeholder text found: {}", found.join(", ")),
        );
    }

    let lower = ctx.content.to_lowercase();
    let comments: Vec<&str> = TEMPLATE_COMMENTS
        .iter()
        .filter(|c| lower.contains(&c.to_lowercase()))
        .copied()
        .collect();
    if !comments.is_empty() {
        report.add_warning(
            "Template comments",
            format!("Template comments found: {}", comments.join(", ")),
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// 5. File inventory
// ---------------------------------------------------------------------------

const FILE_FIELDS: [&str; 5] = ["name", "purpose", "use_when", "tier", "word_count"];

fn check_file_inventory(ctx: &CheckContext<'_>, report: &mut ValidationReport) -> CheckResult {
    const NAME: &str = "File inventory";
    let fm = ctx.frontmatter()?;

    let Some(files) = list_field(fm, "files")? else {
        report.add_fail(NAME, "File inventory missing");
        return Ok(());
    };

    let entries = files
        .iter()
        .enumerate()
        .map(|(i, entry)| as_mapping(entry, "files", i))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let actual: BTreeSet<&str> = ctx.folder_files.iter().map(String::as_str).collect();
    let listed: BTreeSet<String> = entries
        .iter()
        .map(|entry| field_text(entry, "name", ""))
        .filter(|name| !name.is_empty())
        .collect();
    let listed_refs: BTreeSet<&str> = listed.iter().map(String::as_str).collect();

    let missing: Vec<&str> = actual.difference(&listed_refs).take(MAX_LISTED).copied().collect();
    let extra: Vec<&str> = listed_refs.difference(&actual).take(MAX_LISTED).copied().collect();

    if !missing.is_empty() {
        report.add_fail(NAME, format!("Missing files: {}", missing.join(", ")));
    } else if !extra.is_empty() {
        report.add_warning(NAME, format!("Extra files listed: {}", extra.join(", ")));
    } else {
        report.add_pass(NAME);
    }

    let mut complete = true;
    for entry in &entries {
        let absent: Vec<&str> = FILE_FIELDS
            .iter()
            .filter(|f| !entry.contains_key(**f))
            .copied()
            .collect();
        if !absent.is_empty() {
            report.add_fail(
                "File metadata",
                format!(
                    "File {} missing fields: {}",
                    field_text(entry, "name", "unknown"),
                    absent.join(", ")
                ),
            );
            complete = false;
        }
    }
    if complete {
        report.add_pass("File metadata");
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// 6. Key concepts / 7. Expected outcomes
// ---------------------------------------------------------------------------

const GENERIC_CONCEPTS: [&str; 4] = ["files", "documentation", "markdown", "content"];

const MAX_GENERIC_LISTED: usize = 3;

fn check_key_concepts(ctx: &CheckContext<'_>, report: &mut ValidationReport) -> CheckResult {
    const NAME: &str = "Key concepts";
    let fm = ctx.frontmatter()?;
    let (min, max) = (ctx.config.min_key_concepts, ctx.config.max_key_concepts);

    let Some(value) = fm.get("key_concepts") else {
        report.add_fail(NAME, "Key concepts missing");
        return Ok(());
    };
    let Value::Array(concepts) = value else {
        report.add_fail(NAME, "Key concepts must be a list");
        return Ok(());
    };

    if concepts.len() < min {
        report.add_fail(
            NAME,
            format!("Too few concepts: {} (expected: {min}-{max})", concepts.len()),
        );
    } else if concepts.len() > max {
        report.add_warning(
            NAME,
            format!("Too many concepts: {} (expected: {min}-{max})", concepts.len()),
        );
    } else {
        report.add_pass(NAME);
    }

    let generic: Vec<String> = concepts
        .iter()
        .map(text_of)
        .filter(|c| {
            let lower = c.to_lowercase();
            GENERIC_CONCEPTS.iter().any(|g| lower.contains(g))
        })
        .take(MAX_GENERIC_LISTED)
        .collect();
    if !generic.is_empty() {
        report.add_warning(NAME, format!("Generic concepts found: {}", generic.join(", ")));
    }

    Ok(())
}

fn check_expected_outcomes(ctx: &CheckContext<'_>, report: &mut ValidationReport) -> CheckResult {
    const NAME: &str = "Expected outcomes";
    let fm = ctx.frontmatter()?;
    let (min, max) = (ctx.config.min_outcomes, ctx.config.max_outcomes);

    let Some(value) = fm.get("outcomes") else {
        report.add_fail(NAME, "Expected outcomes missing");
        return Ok(());
    };
    let Value::Array(outcomes) = value else {
        report.add_fail(NAME, "Expected outcomes must be a list");
        return Ok(());
    };

    if outcomes.len() < min {
        report.add_fail(
            NAME,
            format!("Too few outcomes: {} (expected: {min}-{max})", outcomes.len()),
        );
    } else if outcomes.len() > max {
        report.add_warning(
            NAME,
            format!("Too many outcomes: {} (expected: {min}-{max})", outcomes.len()),
        );
    } else {
        report.add_pass(NAME);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// 8. Content quality
// ---------------------------------------------------------------------------

const GENERIC_SNIPPET_TERMS: [&str; 6] = [
    "documentation",
    "file",
    "content",
    "information",
    "guide",
    "reference",
];

const GENERIC_GUIDE_PHRASES: [&str; 4] = [
    "various sections",
    "multiple topics",
    "different sections",
    "various topics",
];

const GENERIC_OVERVIEW_PHRASES: [&str; 4] = [
    "collection of files",
    "documentation folder",
    "set of files",
    "group of files",
];

const GENERIC_CONCEPT_TERMS: [&str; 5] = ["files", "documentation", "markdown", "content", "information"];

/// Overview scanned when the body has no `##` heading.
const OVERVIEW_CHARS: usize = 500;

/// Short text is flagged only below these word counts.
const SHORT_SNIPPET_WORDS: usize = 10;
const SHORT_PURPOSE_WORDS: usize = 5;

fn is_generic(text: &str, max_words: usize) -> bool {
    let lower = text.to_lowercase();
    word_count(&lower) < max_words && GENERIC_SNIPPET_TERMS.iter().any(|t| lower.contains(t))
}

fn check_content_quality(ctx: &CheckContext<'_>, report: &mut ValidationReport) -> CheckResult {
    let fm = ctx.frontmatter()?;
    let body = ctx.body();

    if let Some(snippets) = list_field(fm, "contextual_snippets")? {
        for (i, entry) in snippets.iter().enumerate() {
            let snippet = as_mapping(entry, "contextual_snippets", i)?;
            if is_generic(&field_text(snippet, "snippet", ""), SHORT_SNIPPET_WORDS) {
                report.add_warning(
                    "Snippet content quality",
                    format!(
                        "Snippet for {} may be too generic (verify by reading actual file)",
                        field_text(snippet, "file", "unknown")
                    ),
                );
            }
        }
    }

    if let Some(files) = list_field(fm, "files")? {
        for (i, entry) in files.iter().enumerate() {
            let file = as_mapping(entry, "files", i)?;
            let purpose = field_text(file, "purpose", "");
            if is_generic(&purpose, SHORT_PURPOSE_WORDS) {
                report.add_warning(
                    "File purpose specificity",
                    format!(
                        "File purpose for {} may be too vague: '{purpose}' (should be specific and actionable)",
                        field_text(file, "name", "unknown")
                    ),
                );
            }
        }
    }

    let body_lower = body.to_lowercase();
    if has_section(body, "Document Guide") {
        for phrase in GENERIC_GUIDE_PHRASES {
            if body_lower.contains(phrase) {
                report.add_warning(
                    "Document Guide content",
                    "Document Guide may contain generic content (verify by reading actual files)",
                );
            }
        }
    }

    let overview = match body.split_once("##") {
        Some((before, _)) => before,
        None => truncate_chars(body, OVERVIEW_CHARS),
    };
    let overview_lower = overview.to_lowercase();
    if GENERIC_OVERVIEW_PHRASES.iter().any(|p| overview_lower.contains(p)) {
        report.add_warning(
            "Overview text source",
            "Overview text may be generic (verify by reading README)",
        );
    }

    if let Some(Value::Array(concepts)) = fm.get("key_concepts") {
        for concept in concepts.iter().map(text_of) {
            let lower = concept.to_lowercase();
            if GENERIC_CONCEPT_TERMS.iter().any(|t| lower.contains(t)) {
                report.add_warning(
                    "Key concepts source",
                    format!(
                        "Key concept may be too generic: '{concept}' (should be specific to folder content)"
                    ),
                );
            }
        }
    }

    report.add_pass("Content quality");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
