//! Application configuration for agentsmd.
//!
//! User config lives at `~/.agentsmd/agentsmd.toml`.
//! An explicit `--config` path overrides the user file, which overrides defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AgentsMdError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "agentsmd.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".agentsmd";

// ---------------------------------------------------------------------------
// Config structs (matching agentsmd.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Classifier, extractor and aggregator limits.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Validator cardinality bounds.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// `[analysis]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Documents above this word count fall back to tier 3.
    #[serde(default = "default_reference_word_threshold")]
    pub reference_word_threshold: usize,

    /// Maximum keywords kept per file.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Maximum folder-level key concepts.
    #[serde(default = "default_max_concepts")]
    pub max_concepts: usize,

    /// Headings recorded per document.
    #[serde(default = "default_max_headings")]
    pub max_headings: usize,

    /// File name of the generated index; skipped during analysis.
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            reference_word_threshold: default_reference_word_threshold(),
            max_keywords: default_max_keywords(),
            max_concepts: default_max_concepts(),
            max_headings: default_max_headings(),
            output_file: default_output_file(),
        }
    }
}

fn default_reference_word_threshold() -> usize {
    10_000
}
fn default_max_keywords() -> usize {
    10
}
fn default_max_concepts() -> usize {
    10
}
fn default_max_headings() -> usize {
    10
}
fn default_output_file() -> String {
    "AGENTS.md".into()
}

/// `[validation]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_min_key_concepts")]
    pub min_key_concepts: usize,

    #[serde(default = "default_max_key_concepts")]
    pub max_key_concepts: usize,

    #[serde(default = "default_min_outcomes")]
    pub min_outcomes: usize,

    #[serde(default = "default_max_outcomes")]
    pub max_outcomes: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_key_concepts: default_min_key_concepts(),
            max_key_concepts: default_max_key_concepts(),
            min_outcomes: default_min_outcomes(),
            max_outcomes: default_max_outcomes(),
        }
    }
}

fn default_min_key_concepts() -> usize {
    3
}
fn default_max_key_concepts() -> usize {
    10
}
fn default_min_outcomes() -> usize {
    3
}
fn default_max_outcomes() -> usize {
    5
}

impl AppConfig {
    /// Reject bounds that would make a check impossible to pass.
    pub fn validate(&self) -> Result<()> {
        let v = &self.validation;
        if v.min_key_concepts > v.max_key_concepts {
            return Err(AgentsMdError::config(format!(
                "validation.min_key_concepts ({}) exceeds max_key_concepts ({})",
                v.min_key_concepts, v.max_key_concepts
            )));
        }
        if v.min_outcomes > v.max_outcomes {
            return Err(AgentsMdError::config(format!(
                "validation.min_outcomes ({}) exceeds max_outcomes ({})",
                v.min_outcomes, v.max_outcomes
            )));
        }
        if self.analysis.max_keywords == 0 {
            return Err(AgentsMdError::config("analysis.max_keywords must be at least 1"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.agentsmd/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AgentsMdError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.agentsmd/agentsmd.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AgentsMdError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        AgentsMdError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| AgentsMdError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| AgentsMdError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| AgentsMdError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
