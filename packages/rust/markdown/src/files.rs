//! Markdown files of a documentation folder.

use std::path::Path;

use tracing::debug;

use agentsmd_shared::{AgentsMdError, Result};

/// Names of the `*.md` files directly inside `folder`, sorted.
///
/// Hidden files, directories, names listed in `exclude` and names that are
/// not valid UTF-8 are left out. Fails when the folder is missing or is not a
/// directory; an empty listing is not an error here.
pub fn markdown_file_names(folder: &Path, exclude: &[&str]) -> Result<Vec<String>> {
    if !folder.exists() {
        return Err(AgentsMdError::FolderNotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(AgentsMdError::NotADirectory(folder.to_path_buf()));
    }

    let entries = std::fs::read_dir(folder).map_err(|e| AgentsMdError::io(folder, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AgentsMdError::io(folder, e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            debug!(path = %path.display(), "skipping non UTF-8 file name");
            continue;
        };
        if name.starts_with('.') || exclude.contains(&name.as_str()) {
            continue;
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}
