//! Folder loading and per-document structural analysis.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use agentsmd_markdown::{
    count_lines, count_words, extract_headings, frontmatter_or_default, markdown_file_names,
};
use agentsmd_shared::{
    AgentsMdError, AnalysisConfig, DocumentAnalysis, FileEntry, FolderAnalysis, Result,
    UnreadableFile,
};

use crate::classify::identify_file_type;

/// A markdown file read into memory.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
    pub content: String,
}

/// Outcome of reading one file of the folder.
#[derive(Debug, Clone)]
pub enum LoadedFile {
    Read(Document),
    Failed { name: String, error: String },
}

impl LoadedFile {
    pub fn name(&self) -> &str {
        match self {
            Self::Read(doc) => &doc.name,
            Self::Failed { name, .. } => name,
        }
    }
}

/// Folder name as shown in artifacts (the last path component).
pub fn folder_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| folder.to_string_lossy().to_string())
}

/// List the `*.md` files directly inside `folder`, sorted by name.
///
/// The generated index (`skip_name`) and hidden files are left out. Fails when
/// the folder is missing, is not a directory, or holds no markdown files.
pub fn list_markdown_files(folder: &Path, skip_name: &str) -> Result<Vec<PathBuf>> {
    let names = markdown_file_names(folder, &[skip_name])?;
    if names.is_empty() {
        return Err(AgentsMdError::NoMarkdownFiles(folder.to_path_buf()));
    }
    Ok(names.iter().map(|name| folder.join(name)).collect())
}

/// Read one file. Failures are captured on the entry rather than returned.
pub fn load_file(path: &Path) -> LoadedFile {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let read = std::fs::read_to_string(path).and_then(|content| {
        let meta = std::fs::metadata(path)?;
        let modified = meta.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now());
        Ok(Document {
            name: name.clone(),
            size_bytes: meta.len(),
            modified,
            content,
        })
    });

    match read {
        Ok(doc) => LoadedFile::Read(doc),
        Err(e) => {
            warn!(file = %name, error = %e, "cannot read file");
            LoadedFile::Failed {
                name,
                error: format!("Cannot read file: {e}"),
            }
        }
    }
}

/// Read every markdown file of a folder.
///
/// `on_loaded` runs right after each file is read, with its 1-based position
/// and the number of files.
#[instrument(skip_all, fields(folder = %folder.display()))]
pub fn load_folder(
    folder: &Path,
    config: &AnalysisConfig,
    mut on_loaded: impl FnMut(&LoadedFile, usize, usize),
) -> Result<Vec<LoadedFile>> {
    let paths = list_markdown_files(folder, &config.output_file)?;
    let total = paths.len();
    debug!(files = total, "found markdown files");

    let mut files = Vec::with_capacity(total);
    for (i, path) in paths.iter().enumerate() {
        let file = load_file(path);
        on_loaded(&file, i + 1, total);
        files.push(file);
    }
    Ok(files)
}

/// Structural analysis of a single document.
pub fn analyze_document(doc: &Document, folder_name: &str, config: &AnalysisConfig) -> DocumentAnalysis {
    let frontmatter = frontmatter_or_default(&doc.content);

    DocumentAnalysis {
        name: doc.name.clone(),
        path: format!("{folder_name}/{}", doc.name),
        size_bytes: doc.size_bytes,
        word_count: count_words(&doc.content),
        last_modified: doc.modified,
        file_type: identify_file_type(&doc.name, &doc.content),
        has_frontmatter: !frontmatter.is_empty(),
        frontmatter,
        headings: extract_headings(&doc.content, config.max_headings),
        line_count: count_lines(&doc.content),
    }
}

/// Turn loaded files into the folder analysis record.
pub fn summarize_folder(folder: &Path, files: &[LoadedFile], config: &AnalysisConfig) -> FolderAnalysis {
    let name = folder_name(folder);

    let entries: Vec<FileEntry> = files
        .iter()
        .map(|file| match file {
            LoadedFile::Read(doc) => FileEntry::Analyzed(analyze_document(doc, &name, config)),
            LoadedFile::Failed { name, error } => FileEntry::Unreadable(UnreadableFile {
                name: name.clone(),
                error: error.clone(),
            }),
        })
        .collect();

    let folder_path = std::path::absolute(folder).unwrap_or_else(|_| folder.to_path_buf());

    FolderAnalysis {
        folder_path: folder_path.to_string_lossy().to_string(),
        folder_name: name,
        analysis_date: Utc::now(),
        file_count: entries.len(),
        total_words: entries.iter().map(FileEntry::word_count).sum(),
        total_size_bytes: entries.iter().map(FileEntry::size_bytes).sum(),
        files: entries,
    }
}
