//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
///
/// Initialization errors ([`StorageError::BucketMissing`],
/// [`StorageError::Init`]) abort the whole run; upload errors are caught by
/// the orchestrator, logged, and skipped.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The configured bucket does not exist (S3 variant never creates it).
    #[error("bucket \"{bucket}\" does not exist; create it first")]
    BucketMissing {
        /// The missing bucket.
        bucket: String,
    },

    /// The backend could not be initialized or provisioned.
    #[error("storage initialization failed: {0}")]
    Init(String),

    /// A single object upload failed.
    #[error("failed to upload {key}: {reason}")]
    Upload {
        /// Remote key of the failed upload.
        key: String,
        /// Backend-reported reason.
        reason: String,
    },

    /// The backend accepted the object but returned no usable public URL.
    #[error("no usable public URL returned for {key}")]
    NoPublicUrl {
        /// Remote key of the uploaded object.
        key: String,
    },

    /// Invalid target configuration (e.g. unparseable endpoint URL).
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// The local screenshot file could not be read.
    #[error("failed to read screenshot file: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error.
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl StorageError {
    /// Create a bucket-missing error.
    #[must_use]
    pub fn bucket_missing(bucket: impl Into<String>) -> Self {
        Self::BucketMissing {
            bucket: bucket.into(),
        }
    }

    /// Create an initialization error.
    #[must_use]
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    /// Create an upload error.
    #[must_use]
    pub fn upload(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Upload {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
