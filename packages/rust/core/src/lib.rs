//! Classification, extraction and folder-level aggregation for agentsmd.
//!
//! Reads a folder of markdown documents, records a structural analysis of
//! each file, and derives the per-file metadata and key concepts that an
//! `AGENTS.md` index is assembled from.

pub mod analyze;
pub mod classify;
pub mod concepts;
pub mod extract;
pub mod pipeline;

pub use classify::{assign_tier, identify_file_type};
pub use concepts::extract_key_concepts;
pub use extract::{extract_keywords, extract_snippet, generate_purpose, generate_use_when};
pub use pipeline::{
    ProgressReporter, SilentProgress, analyze_folder, extract_context, extract_file_metadata,
};
