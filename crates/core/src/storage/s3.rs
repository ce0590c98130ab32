//! S3-compatible object storage variant.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, StatusCode, Url};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::error::StorageError;
use super::provider::ScreenshotStorage;
use super::sigv4::{self, SigningParams};

const CONTENT_TYPE_PNG: &str = "image/png";

/// Storage backed by an S3-compatible object store.
///
/// Uses virtual-hosted-style addressing against AWS by default, or
/// path-style addressing under a custom `endpoint` (for S3-compatible
/// stores that do not support virtual hosts). Requests are signed with
/// SigV4 when credentials are present and sent anonymously otherwise.
pub struct S3Storage {
    client: Client,
    region: String,
    bucket: String,
    credentials: Option<(String, String)>,
    endpoint: Option<String>,
    public_read: bool,
    ready: OnceCell<()>,
}

impl S3Storage {
    /// Creates an S3 storage variant.
    #[must_use]
    pub fn new(
        region: String,
        bucket: String,
        credentials: Option<(String, String)>,
        endpoint: Option<String>,
        public_read: bool,
    ) -> Self {
        Self {
            client: Client::new(),
            region,
            bucket,
            credentials,
            endpoint: endpoint.map(|e| e.trim_end_matches('/').to_string()),
            public_read,
            ready: OnceCell::new(),
        }
    }

    /// URL of an object, which doubles as its public URL.
    fn object_url(&self, encoded_key: &str) -> String {
        match &self.endpoint {
            // Path-style for S3-compatible services with custom endpoints.
            Some(endpoint) => format!("{endpoint}/{}/{encoded_key}", self.bucket),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{encoded_key}",
                self.bucket, self.region
            ),
        }
    }

    fn bucket_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{endpoint}/{}", self.bucket),
            None => format!("https://{}.s3.{}.amazonaws.com/", self.bucket, self.region),
        }
    }

    /// Sends a request, SigV4-signed when credentials are configured.
    async fn send(
        &self,
        method: Method,
        url: &str,
        extra_headers: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, StorageError> {
        let parsed = Url::parse(url)
            .map_err(|e| StorageError::configuration(format!("invalid request URL {url}: {e}")))?;

        let mut request = self.client.request(method.clone(), parsed.clone());
        for (name, value) in extra_headers {
            request = request.header(*name, *value);
        }

        if let Some((access_key_id, secret_access_key)) = &self.credentials {
            let host = match parsed.port() {
                Some(port) => format!(
                    "{}:{port}",
                    parsed.host_str().unwrap_or_default()
                ),
                None => parsed.host_str().unwrap_or_default().to_string(),
            };
            let payload_hash = sigv4::sha256_hex(body.as_deref().unwrap_or_default());
            let signed = sigv4::sign_request(
                &SigningParams {
                    access_key_id,
                    secret_access_key,
                    region: &self.region,
                    service: "s3",
                },
                method.as_str(),
                &host,
                parsed.path(),
                extra_headers,
                &payload_hash,
                Utc::now(),
            );
            request = request
                .header("authorization", signed.authorization)
                .header("x-amz-date", signed.amz_date)
                .header("x-amz-content-sha256", signed.content_sha256);
        }

        if let Some(body) = body {
            request = request.body(body);
        }

        Ok(request.send().await?)
    }

    async fn check_bucket(&self) -> Result<(), StorageError> {
        let response = self
            .send(Method::HEAD, &self.bucket_url(), &[], None)
            .await
            .map_err(|e| StorageError::init(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                info!(bucket = %self.bucket, "using S3 bucket");
                Ok(())
            }
            StatusCode::NOT_FOUND => Err(StorageError::bucket_missing(&self.bucket)),
            status => Err(StorageError::init(format!(
                "failed to access S3 bucket \"{}\": HTTP {status}",
                self.bucket
            ))),
        }
    }
}

#[async_trait]
impl ScreenshotStorage for S3Storage {
    async fn initialize(&self) -> Result<(), StorageError> {
        // This variant verifies its bucket and never creates one.
        self.ready.get_or_try_init(|| self.check_bucket()).await?;
        Ok(())
    }

    async fn upload(&self, local_path: &Path, remote_key: &str) -> Result<String, StorageError> {
        self.initialize().await?;

        let body = tokio::fs::read(local_path).await?;
        debug!(key = remote_key, bytes = body.len(), "uploading to S3");

        let encoded_key = sigv4::uri_encode_path(remote_key);
        let url = self.object_url(&encoded_key);

        let mut headers: Vec<(&str, &str)> = vec![("content-type", CONTENT_TYPE_PNG)];
        if self.public_read {
            headers.push(("x-amz-acl", "public-read"));
        }

        let response = self.send(Method::PUT, &url, &headers, Some(body)).await?;
        if !response.status().is_success() {
            return Err(StorageError::upload(
                remote_key,
                format!("HTTP {}", response.status()),
            ));
        }

        info!(url = %url, "uploaded screenshot");
        Ok(url)
    }
}
