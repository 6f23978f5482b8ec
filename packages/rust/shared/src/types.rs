//! Core domain types for folder analysis and AGENTS.md metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parsed front-matter: a JSON-shaped mapping so that artifacts can embed it
/// as-is.
pub type Frontmatter = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// FileType
// ---------------------------------------------------------------------------

/// The role a document plays inside its folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileType {
    Readme,
    QuickStart,
    Template,
    Guide,
    Example,
    Sop,
    Log,
    Index,
    Summary,
    Attachment,
    Overview,
    ExecutionGuide,
    #[default]
    Documentation,
}

impl FileType {
    /// The kebab-case tag used in artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Readme => "readme",
            Self::QuickStart => "quick-start",
            Self::Template => "template",
            Self::Guide => "guide",
            Self::Example => "example",
            Self::Sop => "sop",
            Self::Log => "log",
            Self::Index => "index",
            Self::Summary => "summary",
            Self::Attachment => "attachment",
            Self::Overview => "overview",
            Self::ExecutionGuide => "execution-guide",
            Self::Documentation => "documentation",
        }
    }

    /// Human label: `execution-guide` becomes `Execution Guide`.
    pub fn title(&self) -> String {
        self.as_str()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(c) => {
                        let upper: String = c.to_uppercase().collect();
                        format!("{upper}{}", chars.as_str())
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Loading priority bucket for a context-assembly consumer.
///
/// Serialized as the bare integer `1`, `2` or `3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    /// Load first: orientation material.
    Essential = 1,
    /// Load on demand: the working set.
    Core = 2,
    /// Load only when needed: logs, archives, very large files.
    Reference = 3,
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Essential),
            2 => Ok(Self::Core),
            3 => Ok(Self::Reference),
            other => Err(format!("invalid tier {other} (must be 1, 2, or 3)")),
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier as u8
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

// ---------------------------------------------------------------------------
// Folder analysis (`<folder>_analysis.json`)
// ---------------------------------------------------------------------------

/// Structural facts about one readable document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub name: String,
    /// `<folder_name>/<name>`.
    pub path: String,
    pub size_bytes: u64,
    /// Whitespace-separated token count of the whole file.
    pub word_count: usize,
    pub last_modified: DateTime<Utc>,
    pub file_type: FileType,
    pub has_frontmatter: bool,
    #[serde(default)]
    pub frontmatter: Frontmatter,
    /// First headings, markers stripped.
    #[serde(default)]
    pub headings: Vec<String>,
    pub line_count: usize,
}

/// A document that could not be read; kept so the run can continue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadableFile {
    pub name: String,
    pub error: String,
}

/// One entry of [`FolderAnalysis::files`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileEntry {
    Analyzed(DocumentAnalysis),
    Unreadable(UnreadableFile),
}

impl FileEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Analyzed(doc) => &doc.name,
            Self::Unreadable(file) => &file.name,
        }
    }

    pub fn word_count(&self) -> usize {
        match self {
            Self::Analyzed(doc) => doc.word_count,
            Self::Unreadable(_) => 0,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        match self {
            Self::Analyzed(doc) => doc.size_bytes,
            Self::Unreadable(_) => 0,
        }
    }
}

/// Root structure for `<folder>_analysis.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderAnalysis {
    pub folder_path: String,
    pub folder_name: String,
    pub analysis_date: DateTime<Utc>,
    pub file_count: usize,
    pub total_words: usize,
    pub total_size_bytes: u64,
    pub files: Vec<FileEntry>,
}

// ---------------------------------------------------------------------------
// Extracted context (`<folder>_context.json`)
// ---------------------------------------------------------------------------

/// Navigation metadata for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub name: String,
    pub snippet: String,
    pub keywords: Vec<String>,
    pub tier: Tier,
    pub purpose: String,
    pub use_when: String,
    pub word_count: usize,
    pub file_type: FileType,
}

/// Root structure for `<folder>_context.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderMetadata {
    pub folder_path: String,
    pub folder_name: String,
    pub file_count: usize,
    pub total_words: usize,
    pub total_size_bytes: u64,
    pub files: Vec<FileMetadata>,
    pub key_concepts: Vec<String>,
}
