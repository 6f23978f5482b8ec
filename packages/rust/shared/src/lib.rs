//! Shared types, error model, and configuration for agentsmd.
//!
//! This crate is the foundation depended on by all other agentsmd crates.
//! It provides:
//! - [`AgentsMdError`]: the unified error type
//! - Domain types ([`FileType`], [`Tier`], [`FolderAnalysis`], [`FolderMetadata`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AnalysisConfig, AppConfig, ValidationConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{AgentsMdError, Result};
pub use types::{
    DocumentAnalysis, FileEntry, FileMetadata, FileType, FolderAnalysis, FolderMetadata,
    Frontmatter, Tier, UnreadableFile,
};
