//! Upload orchestration errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::discover::DiscoverError;
use crate::storage::StorageError;

/// Batch-level upload errors. All of these abort the run.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Screenshot discovery failed.
    #[error(transparent)]
    Discover(#[from] DiscoverError),

    /// Discovery found no screenshots to upload.
    #[error("no screenshots found in {}", directory.display())]
    NoScreenshots {
        /// The directory that was searched.
        directory: PathBuf,
    },

    /// The storage backend could not be initialized.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Every single upload in a non-empty batch failed.
    #[error("failed to upload any of the {attempted} discovered screenshots")]
    AllUploadsFailed {
        /// Number of screenshots that were attempted.
        attempted: usize,
    },
}
