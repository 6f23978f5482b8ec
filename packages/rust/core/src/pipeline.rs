//! End-to-end pipelines: folder → analysis, analysis → context metadata.

use std::path::Path;
use std::time::Instant;

use tracing::{info, instrument, warn};

use agentsmd_markdown::frontmatter_or_default;
use agentsmd_shared::{
    AgentsMdError, AnalysisConfig, FileEntry, FileMetadata, FileType, FolderAnalysis,
    FolderMetadata, Result,
};

use crate::analyze::{self, LoadedFile};
use crate::classify::assign_tier;
use crate::concepts::extract_key_concepts;
use crate::extract::{extract_keywords, extract_snippet, generate_purpose, generate_use_when};

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each file has been handled.
    fn file_processed(&self, name: &str, current: usize, total: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_processed(&self, _name: &str, _current: usize, _total: usize) {}
}

/// Analyze every markdown file of `folder`.
#[instrument(skip_all, fields(folder = %folder.display()))]
pub fn analyze_folder(
    folder: &Path,
    config: &AnalysisConfig,
    progress: &dyn ProgressReporter,
) -> Result<FolderAnalysis> {
    let start = Instant::now();

    progress.phase("Reading markdown files");
    let files = analyze::load_folder(folder, config, |file, current, total| {
        progress.file_processed(file.name(), current, total);
    })?;

    progress.phase("Analyzing documents");
    let analysis = analyze::summarize_folder(folder, &files, config);

    info!(
        files = analysis.file_count,
        words = analysis.total_words,
        elapsed_ms = start.elapsed().as_millis(),
        "folder analysis complete"
    );
    Ok(analysis)
}

/// Derive the metadata record of a single document.
pub fn extract_file_metadata(
    name: &str,
    content: &str,
    file_type: FileType,
    word_count: usize,
    config: &AnalysisConfig,
) -> FileMetadata {
    let frontmatter = frontmatter_or_default(content);
    let snippet = extract_snippet(content);
    let keywords = extract_keywords(name, content, &frontmatter, &snippet, config.max_keywords);

    FileMetadata {
        name: name.to_string(),
        tier: assign_tier(name, file_type, word_count, config.reference_word_threshold),
        purpose: generate_purpose(file_type, &snippet, &frontmatter),
        use_when: generate_use_when(name, file_type).to_string(),
        snippet,
        keywords,
        word_count,
        file_type,
    }
}

/// A document ready for metadata extraction.
struct Source {
    name: String,
    content: String,
    file_type: FileType,
    word_count: usize,
}

/// Build the folder-level context metadata.
///
/// With `analysis` the listed files are re-read from `folder` and their
/// recorded type and word count are reused; a listed file that no longer
/// exists aborts the run. Without it the folder is analyzed in-process.
#[instrument(skip_all, fields(folder = %folder.display()))]
pub fn extract_context(
    folder: &Path,
    analysis: Option<&FolderAnalysis>,
    config: &AnalysisConfig,
    progress: &dyn ProgressReporter,
) -> Result<FolderMetadata> {
    let start = Instant::now();

    let (analysis, sources) = match analysis {
        Some(analysis) => {
            progress.phase("Reading analyzed files");
            (analysis.clone(), sources_from_analysis(folder, analysis)?)
        }
        None => {
            progress.phase("Reading markdown files");
            let files = analyze::load_folder(folder, config, |file, current, total| {
                progress.file_processed(file.name(), current, total);
            })?;
            progress.phase("Analyzing documents");
            let analysis = analyze::summarize_folder(folder, &files, config);
            let sources = sources_from_loaded(files, &analysis);
            (analysis, sources)
        }
    };

    progress.phase("Extracting file metadata");
    let total = sources.len();
    let files: Vec<FileMetadata> = sources
        .iter()
        .enumerate()
        .map(|(i, src)| {
            let meta =
                extract_file_metadata(&src.name, &src.content, src.file_type, src.word_count, config);
            progress.file_processed(&src.name, i + 1, total);
            meta
        })
        .collect();

    progress.phase("Aggregating key concepts");
    let contents: Vec<&str> = sources.iter().map(|s| s.content.as_str()).collect();
    let key_concepts = extract_key_concepts(&contents, config.max_concepts);

    let metadata = FolderMetadata {
        folder_path: analysis.folder_path,
        folder_name: analysis.folder_name,
        file_count: files.len(),
        total_words: files.iter().map(|f| f.word_count).sum(),
        total_size_bytes: analysis.total_size_bytes,
        files,
        key_concepts,
    };

    info!(
        files = metadata.file_count,
        concepts = metadata.key_concepts.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "context extraction complete"
    );
    Ok(metadata)
}

fn sources_from_analysis(folder: &Path, analysis: &FolderAnalysis) -> Result<Vec<Source>> {
    let mut sources = Vec::with_capacity(analysis.files.len());

    for entry in &analysis.files {
        let doc = match entry {
            FileEntry::Analyzed(doc) => doc,
            FileEntry::Unreadable(file) => {
                warn!(file = %file.name, error = %file.error, "skipping unreadable file");
                continue;
            }
        };

        let path = folder.join(&doc.name);
        if !path.exists() {
            return Err(AgentsMdError::MissingFile(path));
        }

        let content = std::fs::read_to_string(&path).unwrap_or_else(|e| {
            warn!(file = %doc.name, error = %e, "cannot read file, using empty content");
            String::new()
        });

        sources.push(Source {
            name: doc.name.clone(),
            content,
            file_type: doc.file_type,
            word_count: doc.word_count,
        });
    }

    Ok(sources)
}

fn sources_from_loaded(files: Vec<LoadedFile>, analysis: &FolderAnalysis) -> Vec<Source> {
    files
        .into_iter()
        .zip(&analysis.files)
        .filter_map(|(file, entry)| match (file, entry) {
            (LoadedFile::Read(doc), FileEntry::Analyzed(record)) => Some(Source {
                name: doc.name,
                content: doc.content,
                file_type: record.file_type,
                word_count: record.word_count,
            }),
            _ => None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use agentsmd_shared::Tier;
    use std::path::PathBuf;
    use std::sync::Mutex;

    fn fixture_docs() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures/docs")
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).expect("write fixture file");
    }

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<String>>,
        files: Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.phases.lock().expect("lock").push(name.to_string());
        }
        fn file_processed(&self, name: &str, _current: usize, _total: usize) {
            self.files.lock().expect("lock").push(name.to_string());
        }
    }

    #[test]
    fn readme_overview_scenario() {
        let meta = extract_file_metadata(
            "README.md",
            "# Overview\n\nThis tool does X.",
            FileType::Readme,
            7,
            &AnalysisConfig::default(),
        );
        assert_eq!(meta.file_type, FileType::Readme);
        assert_eq!(meta.tier, Tier::Essential);
        assert_eq!(meta.snippet, "This tool does X");
        assert!(meta.keywords.contains(&"overview".to_string()));
        assert!(meta.keywords.contains(&"readme".to_string()));
    }

    #[test]
    fn large_plain_file_is_reference_tier() {
        let meta = extract_file_metadata(
            "notes.md",
            "plain",
            FileType::Documentation,
            12_000,
            &AnalysisConfig::default(),
        );
        assert_eq!(meta.tier, Tier::Reference);
    }

    #[test]
    fn frontmatter_purpose_is_verbatim() {
        let content = "---\npurpose: Explains the release train\n---\n# Releases\n";
        let meta = extract_file_metadata("releases.md", content, FileType::Documentation, 5, &AnalysisConfig::default());
        assert_eq!(meta.purpose, "Explains the release train");
    }

    #[test]
    fn analyze_fixture_folder() {
        let progress = RecordingProgress::default();
        let analysis = analyze_folder(&fixture_docs(), &AnalysisConfig::default(), &progress)
            .expect("analyze fixtures");

        assert_eq!(analysis.folder_name, "docs");
        let names: Vec<&str> = analysis.files.iter().map(FileEntry::name).collect();
        assert!(!names.contains(&"AGENTS.md"));
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(analysis.file_count, names.len());
        assert_eq!(*progress.files.lock().expect("lock"), names);
        assert_eq!(
            *progress.phases.lock().expect("lock"),
            vec!["Reading markdown files", "Analyzing documents"]
        );
    }

    #[test]
    fn extract_context_in_process_matches_analysis() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "README.md", "# Overview\n\nThis tool does X.");
        write(dir.path(), "deployment-guide.md", "# Deployment Pipeline\n\nAgents deploy by tier.");
        write(dir.path(), "AGENTS.md", "---\ntitle: generated\n---\n");

        let metadata = extract_context(dir.path(), None, &AnalysisConfig::default(), &SilentProgress)
            .expect("extract context");

        assert_eq!(metadata.file_count, 2);
        assert_eq!(metadata.files[0].name, "README.md");
        assert_eq!(metadata.files[1].file_type, FileType::Guide);
        assert_eq!(metadata.total_words, 6 + 7);
        assert!(metadata.key_concepts.contains(&"Deployment Pipeline".to_string()));
        assert!(metadata.key_concepts.contains(&"AI agent".to_string()));
        assert!(metadata.key_concepts.contains(&"tiered file loading".to_string()));
    }

    #[test]
    fn extract_context_from_saved_analysis() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "README.md", "# Overview\n\nThis tool does X.");
        let analysis =
            analyze_folder(dir.path(), &AnalysisConfig::default(), &SilentProgress).expect("analyze");

        let metadata = extract_context(
            dir.path(),
            Some(&analysis),
            &AnalysisConfig::default(),
            &SilentProgress,
        )
        .expect("extract context");
        assert_eq!(metadata.folder_path, analysis.folder_path);
        assert_eq!(metadata.files[0].tier, Tier::Essential);
    }

    #[test]
    fn extract_context_aborts_when_listed_file_is_gone() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(dir.path(), "README.md", "# Overview\n");
        write(dir.path(), "notes.md", "notes");
        let analysis =
            analyze_folder(dir.path(), &AnalysisConfig::default(), &SilentProgress).expect("analyze");
        std::fs::remove_file(dir.path().join("notes.md")).expect("remove");

        let err = extract_context(
            dir.path(),
            Some(&analysis),
            &AnalysisConfig::default(),
            &SilentProgress,
        )
        .unwrap_err();
        assert!(matches!(err, AgentsMdError::MissingFile(_)));
        assert!(err.is_input_error());
    }

    #[test]
    fn extract_context_rejects_empty_folder() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = extract_context(dir.path(), None, &AnalysisConfig::default(), &SilentProgress)
            .unwrap_err();
        assert!(matches!(err, AgentsMdError::NoMarkdownFiles(_)));
    }

    #[test]
    fn repeated_frontmatter_key_keeps_purpose() {
        let meta = extract_file_metadata(
            "release-notes.md",
            "---\ntags: a\ntags: b\npurpose: Explains the release train\n---\n# Releases\n",
            FileType::Documentation,
            3,
            &AnalysisConfig::default(),
        );
        assert_eq!(meta.purpose, "Explains the release train");
    }

    #[test]
    fn keyword_cap_comes_from_config() {
        let config = AnalysisConfig {
            max_keywords: 2,
            ..AnalysisConfig::default()
        };
        let meta = extract_file_metadata(
            "deployment-runbook.md",
            "# Rollback procedures explained",
            FileType::Documentation,
            4,
            &config,
        );
        assert_eq!(meta.keywords.len(), 2);
    }
}
