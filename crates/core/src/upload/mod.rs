//! Batch upload orchestration.
//!
//! Composes discovery, remote-key resolution and a storage variant into a
//! single partial-failure-tolerant batch: one broken screenshot is logged
//! and skipped, an entirely failed batch aborts the run.

mod error;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::discover::find_screenshots;
use crate::remote_key::{DEFAULT_PATH_TEMPLATE, resolve_remote_key};
use crate::storage::{ScreenshotStorage, StorageTarget, storage_for};

pub use error::UploadError;

use serde::{Deserialize, Serialize};

/// Metadata identifying the pull request and CI run for an upload batch.
///
/// Pure metadata: consumed by remote-key resolution, never mutated.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Pull-request number, if known.
    pub pr_number: Option<String>,
    /// CI run identifier, if known.
    pub run_id: Option<String>,
}

/// Fully-resolved inputs for one upload batch.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Directory containing the screenshots.
    pub directory: PathBuf,
    /// Storage backend configuration.
    pub target: StorageTarget,
    /// Run metadata for remote-key resolution.
    pub run: RunContext,
    /// Remote key template, defaulting to [`DEFAULT_PATH_TEMPLATE`].
    pub path_template: Option<String>,
}

/// One successfully uploaded screenshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedScreenshot {
    /// Original filename (display name).
    pub name: String,
    /// Public URL of the stored object.
    pub url: String,
    /// Remote key the object was stored under.
    #[serde(rename = "path")]
    pub remote_key: String,
}

/// Uploads every screenshot under `options.directory`.
///
/// Discovers screenshots (sorted), constructs the storage variant matching
/// the target's tag, initializes it once, then uploads sequentially in
/// sorted order. Per-file failures are logged and skipped; the returned
/// list preserves sorted-input order.
///
/// # Errors
///
/// - [`UploadError::Discover`] if the directory does not exist or cannot
///   be walked.
/// - [`UploadError::NoScreenshots`] if discovery finds nothing.
/// - [`UploadError::Storage`] if backend initialization fails.
/// - [`UploadError::AllUploadsFailed`] if no file could be uploaded.
pub async fn upload_screenshots(
    options: &UploadOptions,
) -> Result<Vec<UploadedScreenshot>, UploadError> {
    let screenshots = find_screenshots(&options.directory)?;
    if screenshots.is_empty() {
        return Err(UploadError::NoScreenshots {
            directory: options.directory.clone(),
        });
    }
    info!(
        count = screenshots.len(),
        backend = options.target.name(),
        "found screenshots to upload"
    );

    let storage = storage_for(&options.target);
    let template = options
        .path_template
        .as_deref()
        .unwrap_or(DEFAULT_PATH_TEMPLATE);

    upload_with_storage(storage.as_ref(), &screenshots, template, &options.run).await
}

/// Uploads an already-discovered, sorted screenshot list through `storage`.
///
/// Split out from [`upload_screenshots`] so tests (and embedders with their
/// own backends) can inject a storage implementation directly. Initializes
/// the backend once before the first upload; assumes `screenshots` is
/// non-empty and sorted.
///
/// # Errors
///
/// Returns [`UploadError::Storage`] if backend initialization fails, or
/// [`UploadError::AllUploadsFailed`] if every upload fails.
pub async fn upload_with_storage(
    storage: &dyn ScreenshotStorage,
    screenshots: &[PathBuf],
    template: &str,
    run: &RunContext,
) -> Result<Vec<UploadedScreenshot>, UploadError> {
    storage.initialize().await?;

    let mut attempts = Vec::with_capacity(screenshots.len());

    for path in screenshots {
        let Some(filename) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            warn!(path = %path.display(), "skipping path without a file name");
            continue;
        };
        let remote_key = resolve_remote_key(
            template,
            &filename,
            run.pr_number.as_deref(),
            run.run_id.as_deref(),
        );

        let attempt = storage.upload(path, &remote_key).await.map(|url| {
            UploadedScreenshot {
                name: filename.clone(),
                url,
                remote_key: remote_key.clone(),
            }
        });
        if let Err(error) = &attempt {
            warn!(file = %filename, %error, "upload failed, continuing with remaining files");
        }
        attempts.push(attempt);
    }

    // Single terminal-emptiness gate over the accumulated results.
    let uploaded: Vec<UploadedScreenshot> =
        attempts.into_iter().filter_map(Result::ok).collect();
    if uploaded.is_empty() {
        return Err(UploadError::AllUploadsFailed {
            attempted: screenshots.len(),
        });
    }

    info!(uploaded = uploaded.len(), "upload batch complete");
    Ok(uploaded)
}
