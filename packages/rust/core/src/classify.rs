//! File-type inference and tier assignment.
//!
//! Both are first-match-wins cascades. The rule tables below are ordered
//! slices because their patterns overlap: `readme-quick-start.md` must stay
//! a readme, `changelog.md` must stay a log.

use agentsmd_markdown::truncate_chars;
use agentsmd_shared::{FileType, Tier};

/// Characters of content inspected by the `example` filename rule.
const EXAMPLE_SCAN_CHARS: usize = 500;

/// Characters of content inspected when no filename rule matches.
const CONTENT_SCAN_CHARS: usize = 1000;

/// Lower-cased views of a document used by the type rules.
struct Signals {
    name: String,
    head: String,
}

struct TypeRule {
    file_type: FileType,
    matches: fn(&Signals) -> bool,
}

/// Filename rules, in priority order.
const FILENAME_RULES: &[TypeRule] = &[
    TypeRule {
        file_type: FileType::Readme,
        matches: |s| s.name.contains("readme"),
    },
    TypeRule {
        file_type: FileType::QuickStart,
        matches: |s| s.name.contains("quick") && s.name.contains("start"),
    },
    TypeRule {
        file_type: FileType::Template,
        matches: |s| s.name.contains("template"),
    },
    TypeRule {
        file_type: FileType::Guide,
        matches: |s| s.name.contains("guide"),
    },
    TypeRule {
        file_type: FileType::Example,
        matches: |s| s.name.contains("example") || s.head.contains("example"),
    },
    TypeRule {
        file_type: FileType::Sop,
        matches: |s| s.name.contains("sop"),
    },
    TypeRule {
        file_type: FileType::Log,
        matches: |s| s.name.contains("clog") || s.name.contains("log"),
    },
    TypeRule {
        file_type: FileType::Index,
        matches: |s| s.name.contains("index"),
    },
    TypeRule {
        file_type: FileType::Summary,
        matches: |s| s.name.contains("summary"),
    },
    TypeRule {
        file_type: FileType::Attachment,
        matches: |s| s.name.contains("attachment"),
    },
];

/// Content rules over the first [`CONTENT_SCAN_CHARS`] characters.
const CONTENT_RULES: &[(FileType, &[&str])] = &[
    (FileType::Overview, &["overview", "introduction"]),
    (FileType::ExecutionGuide, &["execution", "step"]),
];

/// Infer a document's [`FileType`] from its file name and content.
pub fn identify_file_type(filename: &str, content: &str) -> FileType {
    let signals = Signals {
        name: filename.to_lowercase(),
        head: truncate_chars(content, EXAMPLE_SCAN_CHARS).to_lowercase(),
    };

    if let Some(rule) = FILENAME_RULES.iter().find(|rule| (rule.matches)(&signals)) {
        return rule.file_type;
    }

    let head = truncate_chars(content, CONTENT_SCAN_CHARS).to_lowercase();
    CONTENT_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| head.contains(n)))
        .map_or(FileType::Documentation, |(file_type, _)| *file_type)
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

const ESSENTIAL_PATTERNS: &[&str] = &["readme", "quick", "start", "overview", "summary", "index"];

const ESSENTIAL_TYPES: &[FileType] = &[
    FileType::Readme,
    FileType::QuickStart,
    FileType::Overview,
    FileType::Summary,
    FileType::Index,
];

const REFERENCE_PATTERNS: &[&str] = &["clog", "log", "history", "archive", "old", "backup"];

const REFERENCE_TYPES: &[FileType] = &[FileType::Log];

/// Assign a loading tier.
///
/// Tier 1 patterns always win; the size threshold only pushes files that
/// are not essential into tier 3.
pub fn assign_tier(
    filename: &str,
    file_type: FileType,
    word_count: usize,
    reference_word_threshold: usize,
) -> Tier {
    let name = filename.to_lowercase();

    if ESSENTIAL_PATTERNS.iter().any(|p| name.contains(p)) || ESSENTIAL_TYPES.contains(&file_type)
    {
        return Tier::Essential;
    }

    if REFERENCE_PATTERNS.iter().any(|p| name.contains(p))
        || REFERENCE_TYPES.contains(&file_type)
        || word_count > reference_word_threshold
    {
        return Tier::Reference;
    }

    Tier::Core
}
