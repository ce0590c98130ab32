//! Storage backends for uploaded screenshots.
//!
//! Two variants share one capability contract ([`ScreenshotStorage`]):
//!
//! - S3-compatible object storage (AWS S3, MinIO, DigitalOcean Spaces) -
//!   verifies its bucket on initialization and never creates one.
//! - Supabase Storage - self-provisions its bucket on initialization.
//!
//! The variant is selected once, at construction time, from the
//! [`StorageTarget`] tag.

mod config;
mod error;
mod provider;
mod s3;
mod sigv4;
mod supabase;

pub use config::{DEFAULT_SUPABASE_BUCKET, StorageTarget};
pub use error::StorageError;
pub use provider::{ScreenshotStorage, storage_for};
pub use s3::S3Storage;
pub use supabase::SupabaseStorage;
