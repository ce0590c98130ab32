//! Screenshot discovery in a local directory tree.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// File-name suffix that marks a screenshot artifact.
///
/// Matching is exact-case: `.PNG` is deliberately not matched, mirroring the
/// capture helper which always writes lowercase extensions.
pub const SCREENSHOT_SUFFIX: &str = ".png";

/// Discovery errors.
#[derive(Debug, Error)]
pub enum DiscoverError {
    /// The root directory does not exist.
    #[error("screenshot directory {} does not exist", root.display())]
    RootNotFound {
        /// The missing root directory.
        root: PathBuf,
    },

    /// The directory tree could not be walked.
    #[error("failed to walk screenshot directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Recursively finds every screenshot file under `root`.
///
/// The returned paths are sorted lexicographically so that remote-key
/// assignment is deterministic across runs with identical inputs. An empty
/// tree (or one with no matching files) yields an empty vector, not an
/// error. No result is cached; each call re-walks the filesystem.
///
/// # Errors
///
/// Returns [`DiscoverError::RootNotFound`] if `root` does not exist, or
/// [`DiscoverError::Walk`] if a directory in the tree cannot be read.
pub fn find_screenshots(root: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    if !root.exists() {
        return Err(DiscoverError::RootNotFound {
            root: root.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry
                .file_name()
                .to_string_lossy()
                .ends_with(SCREENSHOT_SUFFIX)
        {
            found.push(entry.into_path());
        }
    }

    found.sort();
    Ok(found)
}
