//! The storage capability contract and variant dispatch.

use std::path::Path;

use async_trait::async_trait;

use super::config::StorageTarget;
use super::error::StorageError;
use super::s3::S3Storage;
use super::supabase::SupabaseStorage;

/// Capability contract shared by all storage variants.
#[async_trait]
pub trait ScreenshotStorage: Send + Sync {
    /// Performs one-time backend setup.
    ///
    /// At-most-once-effective per instance: may be called repeatedly, but
    /// the setup work runs only once after it has succeeded. Failures here
    /// are fatal for the run - no upload can succeed without them.
    async fn initialize(&self) -> Result<(), StorageError>;

    /// Uploads a local file to `remote_key` and returns its public URL.
    ///
    /// Failures are recoverable: the orchestrator logs and skips the file.
    async fn upload(&self, local_path: &Path, remote_key: &str) -> Result<String, StorageError>;
}

/// Constructs the storage variant matching the target's tag.
#[must_use]
pub fn storage_for(target: &StorageTarget) -> Box<dyn ScreenshotStorage> {
    match target.clone() {
        StorageTarget::S3 {
            region,
            bucket,
            access_key_id,
            secret_access_key,
            endpoint,
            public_read,
        } => Box::new(S3Storage::new(
            region,
            bucket,
            access_key_id.zip(secret_access_key),
            endpoint,
            public_read,
        )),
        StorageTarget::Supabase { url, key, bucket } => {
            Box::new(SupabaseStorage::new(url, key, bucket))
        }
    }
}
