//! JSON artifact I/O for agentsmd.
//!
//! The analysis and context records are written as pretty-printed JSON next
//! to each other in an output directory:
//!
//! ```text
//! <out>/
//! ├── <folder>_analysis.json
//! └── <folder>_context.json
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use agentsmd_shared::{AgentsMdError, FolderAnalysis, FolderMetadata, Result};

/// Metadata about a written artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactMeta {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

pub fn analysis_file_name(folder_name: &str) -> String {
    format!("{folder_name}_analysis.json")
}

pub fn context_file_name(folder_name: &str) -> String {
    format!("{folder_name}_context.json")
}

/// Serialize `data` as pretty JSON and write it atomically to `dir/filename`.
///
/// The content goes to a hidden temp file first and is then renamed into
/// place, so readers never observe a partial file.
#[instrument(skip_all, fields(dir = %dir.display(), filename = %filename))]
pub fn write_json_artifact<T: Serialize>(dir: &Path, filename: &str, data: &T) -> Result<ArtifactMeta> {
    let json = serde_json::to_string_pretty(data)?;

    std::fs::create_dir_all(dir).map_err(|e| AgentsMdError::io(dir, e))?;

    let target = dir.join(filename);
    let temp = dir.join(format!(".{filename}.tmp"));

    std::fs::write(&temp, &json).map_err(|e| AgentsMdError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| AgentsMdError::io(&target, e))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(file = %filename, size = json.len(), "wrote artifact");

    Ok(ArtifactMeta {
        path: target,
        sha256,
        size_bytes: json.len(),
    })
}

/// Write `<folder>_analysis.json` into `dir`.
pub fn write_analysis(dir: &Path, analysis: &FolderAnalysis) -> Result<ArtifactMeta> {
    write_json_artifact(dir, &analysis_file_name(&analysis.folder_name), analysis)
}

/// Write `<folder>_context.json` into `dir`.
pub fn write_context(dir: &Path, metadata: &FolderMetadata) -> Result<ArtifactMeta> {
    write_json_artifact(dir, &context_file_name(&metadata.folder_name), metadata)
}

/// Load a previously written analysis artifact.
pub fn read_analysis(path: &Path) -> Result<FolderAnalysis> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(AgentsMdError::MissingFile(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|e| AgentsMdError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| AgentsMdError::parse(format!("invalid artifact {}: {e}", path.display())))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use agentsmd_shared::{FileMetadata, FileType, Tier};

    fn sample_metadata() -> FolderMetadata {
        FolderMetadata {
            folder_path: "/tmp/docs".into(),
            folder_name: "docs".into(),
            file_count: 1,
            total_words: 6,
            total_size_bytes: 30,
            files: vec![FileMetadata {
                name: "README.md".into(),
                snippet: "This tool does X".into(),
                keywords: vec!["overview".into(), "readme".into()],
                tier: Tier::Essential,
                purpose: "Overview".into(),
                use_when: "First time".into(),
                word_count: 6,
                file_type: FileType::Readme,
            }],
            key_concepts: vec![],
        }
    }

    #[test]
    fn artifact_names_follow_folder_name() {
        assert_eq!(analysis_file_name("docs"), "docs_analysis.json");
        assert_eq!(context_file_name("docs"), "docs_context.json");
    }

    #[test]
    fn write_context_is_atomic_and_checksummed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("nested/out");
        let meta = write_context(&out, &sample_metadata()).expect("write");

        assert_eq!(meta.path, out.join("docs_context.json"));
        assert!(!out.join(".docs_context.json.tmp").exists());

        let written = std::fs::read(&meta.path).expect("read back");
        assert_eq!(written.len(), meta.size_bytes);
        assert_eq!(meta.sha256.len(), 64);
        assert_eq!(meta.sha256, format!("{:x}", Sha256::digest(&written)));
    }

    #[test]
    fn context_json_uses_integer_tier_and_kebab_types() {
        let dir = tempfile::tempdir().expect("tempdir");
        let meta = write_context(dir.path(), &sample_metadata()).expect("write");
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&meta.path).expect("read")).expect("json");
        assert_eq!(value["files"][0]["tier"], 1);
        assert_eq!(value["files"][0]["file_type"], "readme");

        let back: FolderMetadata = serde_json::from_value(value).expect("context record");
        assert_eq!(back.files[0].tier, Tier::Essential);
    }

    #[test]
    fn read_analysis_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("none_analysis.json");
        assert!(matches!(read_analysis(&missing), Err(AgentsMdError::MissingFile(_))));

        let bad = dir.path().join("bad_analysis.json");
        std::fs::write(&bad, "{ not json").expect("write");
        assert!(matches!(read_analysis(&bad), Err(AgentsMdError::Parse { .. })));
    }

    #[test]
    fn analysis_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let analysis = FolderAnalysis {
            folder_path: "/tmp/docs".into(),
            folder_name: "docs".into(),
            analysis_date: chrono::Utc::now(),
            file_count: 0,
            total_words: 0,
            total_size_bytes: 0,
            files: vec![],
        };
        let meta = write_analysis(dir.path(), &analysis).expect("write");
        let back = read_analysis(&meta.path).expect("read");
        assert_eq!(back.folder_name, "docs");
        assert_eq!(back.analysis_date, analysis.analysis_date);
    }
}
