//! Supabase Storage variant.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::config::DEFAULT_SUPABASE_BUCKET;
use super::error::StorageError;
use super::provider::ScreenshotStorage;

const CONTENT_TYPE_PNG: &str = "image/png";

/// Maximum object size configured on self-provisioned buckets (10 MiB).
const BUCKET_FILE_SIZE_LIMIT: u64 = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct BucketInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    /// `{bucket}/{key}` of the stored object, as issued by the provider.
    #[serde(rename = "Key")]
    key: Option<String>,
}

/// Storage backed by Supabase Storage.
///
/// Unlike the S3 variant this one self-provisions: initialization lists the
/// project's buckets and creates the target bucket (public, with a fixed
/// object-size limit) when it is absent.
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    api_key: String,
    bucket: String,
    ready: OnceCell<()>,
}

impl SupabaseStorage {
    /// Creates a Supabase storage variant.
    #[must_use]
    pub fn new(url: String, key: String, bucket: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: url.trim_end_matches('/').to_string(),
            api_key: key,
            bucket: bucket.unwrap_or_else(|| DEFAULT_SUPABASE_BUCKET.to_string()),
            ready: OnceCell::new(),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
    }

    /// Public URL for a provider-issued `{bucket}/{key}` pair.
    fn public_url(&self, issued_key: &str) -> String {
        format!("{}/storage/v1/object/public/{issued_key}", self.base_url)
    }

    async fn ensure_bucket(&self) -> Result<(), StorageError> {
        let list_url = format!("{}/storage/v1/bucket", self.base_url);
        let response = self
            .authorized(self.client.get(&list_url))
            .send()
            .await
            .map_err(|e| StorageError::init(e.to_string()))?;
        if !response.status().is_success() {
            return Err(StorageError::init(format!(
                "failed to list Supabase buckets: HTTP {}",
                response.status()
            )));
        }
        let buckets: Vec<BucketInfo> = response
            .json()
            .await
            .map_err(|e| StorageError::init(e.to_string()))?;

        if buckets.iter().any(|b| b.name == self.bucket) {
            info!(bucket = %self.bucket, "using Supabase bucket");
            return Ok(());
        }

        info!(bucket = %self.bucket, "creating Supabase bucket");
        let response = self
            .authorized(self.client.post(&list_url))
            .json(&json!({
                "name": self.bucket,
                "public": true,
                "file_size_limit": BUCKET_FILE_SIZE_LIMIT,
            }))
            .send()
            .await
            .map_err(|e| StorageError::init(e.to_string()))?;
        if !response.status().is_success() {
            return Err(StorageError::init(format!(
                "failed to create Supabase bucket \"{}\": HTTP {}",
                self.bucket,
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ScreenshotStorage for SupabaseStorage {
    async fn initialize(&self) -> Result<(), StorageError> {
        self.ready.get_or_try_init(|| self.ensure_bucket()).await?;
        Ok(())
    }

    async fn upload(&self, local_path: &Path, remote_key: &str) -> Result<String, StorageError> {
        self.initialize().await?;

        let body = tokio::fs::read(local_path).await?;
        debug!(key = remote_key, bytes = body.len(), "uploading to Supabase");

        let url = format!(
            "{}/storage/v1/object/{}/{remote_key}",
            self.base_url, self.bucket
        );
        let response = self
            .authorized(self.client.post(&url))
            .header("content-type", CONTENT_TYPE_PNG)
            // Re-uploads to the same key always overwrite.
            .header("x-upsert", "true")
            .body(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StorageError::upload(
                remote_key,
                format!("HTTP {}", response.status()),
            ));
        }

        let issued: UploadResponse = response.json().await.map_err(|_| {
            StorageError::NoPublicUrl {
                key: remote_key.to_string(),
            }
        })?;
        let Some(issued_key) = issued.key.filter(|k| !k.is_empty()) else {
            return Err(StorageError::NoPublicUrl {
                key: remote_key.to_string(),
            });
        };

        let public_url = self.public_url(&issued_key);
        info!(url = %public_url, "uploaded screenshot");
        Ok(public_url)
    }
}
