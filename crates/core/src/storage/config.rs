//! Storage target configuration.

use serde::{Deserialize, Serialize};

/// Bucket used by the Supabase variant when none is configured.
pub const DEFAULT_SUPABASE_BUCKET: &str = "screenshots";

/// Storage backend configuration.
///
/// Exactly one variant is active per run; the tag is fixed once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageTarget {
    /// S3-compatible object storage: AWS S3, MinIO, DigitalOcean Spaces.
    S3 {
        /// AWS region.
        region: String,
        /// Bucket name. Must already exist; this variant never creates it.
        bucket: String,
        /// Access key id. Requests are sent unsigned when absent.
        #[serde(default)]
        access_key_id: Option<String>,
        /// Secret access key.
        #[serde(default)]
        secret_access_key: Option<String>,
        /// Custom endpoint for S3-compatible services. Switches URL
        /// construction to path-style addressing.
        #[serde(default)]
        endpoint: Option<String>,
        /// Request a public-read ACL on each uploaded object.
        #[serde(default = "default_public_read")]
        public_read: bool,
    },
    /// Supabase Storage (managed backend with bucket self-provisioning).
    Supabase {
        /// Project base URL, e.g. `https://xyz.supabase.co`.
        url: String,
        /// Service-role (or anon) API key.
        key: String,
        /// Bucket name, defaulting to [`DEFAULT_SUPABASE_BUCKET`].
        #[serde(default)]
        bucket: Option<String>,
    },
}

fn default_public_read() -> bool {
    true
}

impl StorageTarget {
    /// Creates an S3 target with default settings (no explicit credentials,
    /// no custom endpoint, public-read enabled).
    #[must_use]
    pub fn s3(region: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self::S3 {
            region: region.into(),
            bucket: bucket.into(),
            access_key_id: None,
            secret_access_key: None,
            endpoint: None,
            public_read: true,
        }
    }

    /// Creates a Supabase target using the default bucket.
    #[must_use]
    pub fn supabase(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Supabase {
            url: url.into(),
            key: key.into(),
            bucket: None,
        }
    }

    /// Returns the variant name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::Supabase { .. } => "supabase",
        }
    }

    /// Returns the bucket this target uploads into.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } => bucket,
            Self::Supabase { bucket, .. } => {
                bucket.as_deref().unwrap_or(DEFAULT_SUPABASE_BUCKET)
            }
        }
    }
}
