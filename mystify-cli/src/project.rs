use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Find the project root for a run started in `start`.
///
/// Walks `start` and its ancestors and returns the first directory that
/// contains `chapters_dir`. An absolute `chapters_dir` pins the search to
/// `start` itself.
pub fn find_project_root(start: &Path, chapters_dir: &Path) -> Result<PathBuf> {
    if chapters_dir.is_absolute() {
        return Ok(start.to_path_buf());
    }

    for candidate in start.ancestors() {
        if candidate.join(chapters_dir).is_dir() {
            return Ok(candidate.to_path_buf());
        }
    }

    Err(anyhow!(
        "Could not find a '{}' directory.\n\
         Searched in {} and every parent directory.\n\
         Pass --root to point at the project explicitly.",
        chapters_dir.display(),
        start.display()
    ))
}
