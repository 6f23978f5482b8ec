//! Validation of generated `AGENTS.md` indexes against their source folder.
//!
//! [`validate`] is pure: it takes the document text and the folder listing
//! and returns a [`ValidationReport`]. [`validate_path`] adds the file system
//! side and turns missing inputs into [`AgentsMdError`]s.

pub mod checks;
pub mod report;

use std::path::Path;

use tracing::{info, instrument};

use agentsmd_markdown::markdown_file_names;
use agentsmd_shared::{AgentsMdError, AppConfig, Result, ValidationConfig};

pub use checks::{CHECKS, Check, CheckContext, OnError, run_checks};
pub use report::{Finding, Status, ValidationReport};

/// Run the full battery against `content`.
///
/// `folder_files` are the markdown file names the index is expected to list.
pub fn validate(content: &str, folder_files: &[String], config: &ValidationConfig) -> ValidationReport {
    let ctx = CheckContext::new(content, folder_files, config);
    let mut report = ValidationReport::new();
    run_checks(&ctx, &mut report);
    report
}

/// Validate the index at `agents_md` against the markdown files of `folder`.
///
/// The configured output file name and the index's own file name are both
/// left out of the folder listing.
#[instrument(skip_all, fields(agents_md = %agents_md.display(), folder = %folder.display()))]
pub fn validate_path(agents_md: &Path, folder: &Path, config: &AppConfig) -> Result<ValidationReport> {
    if !agents_md.is_file() {
        return Err(AgentsMdError::MissingFile(agents_md.to_path_buf()));
    }

    let own_name = agents_md
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let folder_files = markdown_file_names(
        folder,
        &[config.analysis.output_file.as_str(), own_name.as_str()],
    )?;

    let content =
        std::fs::read_to_string(agents_md).map_err(|e| AgentsMdError::io(agents_md, e))?;

    let report = validate(&content, &folder_files, &config.validation);
    info!(
        status = %report.status(),
        passed = report.passed.len(),
        failed = report.failed.len(),
        warnings = report.warnings.len(),
        "validation complete"
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixtures() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
    }

    fn read_fixture(name: &str) -> String {
        std::fs::read_to_string(fixtures().join(name)).expect("read fixture")
    }

    fn docs_files() -> Vec<String> {
        markdown_file_names(&fixtures().join("docs"), &["AGENTS.md"]).expect("list docs")
    }

    #[test]
    fn valid_index_passes_every_check() {
        let report = validate(
            &read_fixture("docs/AGENTS.md"),
            &docs_files(),
            &ValidationConfig::default(),
        );
        assert!(report.failed.is_empty(), "unexpected failures: {:?}", report.failed);
        assert!(report.is_pass());
        for check in [
            "YAML frontmatter",
            "CONTEXT section",
            "Document Guide section",
            "File inventory",
            "Contextual snippets",
            "Tier assignments",
            "No placeholders",
            "File metadata",
            "Key concepts",
            "Expected outcomes",
            "Content quality",
        ] {
            assert!(report.passed.iter().any(|p| p == check), "missing pass for {check}");
        }
    }

    #[test]
    fn missing_outcomes_fail_the_report() {
        let report = validate(
            &read_fixture("agents/missing-outcomes.md"),
            &docs_files(),
            &ValidationConfig::default(),
        );
        assert!(report.failed.contains(&Finding {
            check: "Expected outcomes".into(),
            reason: "Expected outcomes missing".into(),
        }));
        assert_eq!(report.status(), Status::Fail);
        assert!(report.summary().starts_with("Overall: FAIL"));
    }

    #[test]
    fn omitted_folder_file_is_named() {
        let mut files = docs_files();
        files.push("zz-new-runbook.md".to_string());
        let report = validate(&read_fixture("docs/AGENTS.md"), &files, &ValidationConfig::default());
        assert!(report.failed.contains(&Finding {
            check: "File inventory".into(),
            reason: "Missing files: zz-new-runbook.md".into(),
        }));
    }

    #[test]
    fn identical_input_yields_identical_report() {
        let content = read_fixture("agents/missing-outcomes.md");
        let files = docs_files();
        let config = ValidationConfig::default();
        assert_eq!(validate(&content, &files, &config), validate(&content, &files, &config));
    }

    #[test]
    fn validate_path_reports_missing_inputs() {
        let config = AppConfig::default();
        let err = validate_path(Path::new("/nope/AGENTS.md"), &fixtures().join("docs"), &config)
            .unwrap_err();
        assert!(matches!(err, AgentsMdError::MissingFile(_)));

        let err = validate_path(
            &fixtures().join("docs/AGENTS.md"),
            Path::new("/nope/docs"),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, AgentsMdError::FolderNotFound(_)));
    }

    #[test]
    fn validate_path_skips_the_index_itself() {
        let dir = tempfile::tempdir().expect("tempdir");
        let index = read_fixture("docs/AGENTS.md");
        for name in docs_files() {
            std::fs::copy(fixtures().join("docs").join(&name), dir.path().join(&name))
                .expect("copy doc");
        }
        let target = dir.path().join("INDEX-AGENTS.md");
        std::fs::write(&target, index).expect("write index");

        let report = validate_path(&target, dir.path(), &AppConfig::default()).expect("validate");
        assert!(report.is_pass(), "unexpected failures: {:?}", report.failed);
    }

    #[test]
    fn validate_path_on_fixture_folder() {
        let docs = fixtures().join("docs");
        let report =
            validate_path(&docs.join("AGENTS.md"), &docs, &AppConfig::default()).expect("validate");
        assert!(report.is_pass(), "unexpected failures: {:?}", report.failed);
        assert!(report.warnings.is_empty(), "unexpected warnings: {:?}", report.warnings);
    }
}
