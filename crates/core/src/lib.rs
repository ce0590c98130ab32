//! Core pipeline for prshots.
//!
//! Moves PNG screenshots produced by automated browser tests from a local
//! build directory to remote object storage, then renders a deterministic
//! markdown report of the uploaded artifacts for a pull-request discussion.
//!
//! This crate contains the whole pipeline as a library with ZERO CLI or
//! environment-variable concerns. Callers hand in fully-resolved
//! configuration structs and get back plain values.
//!
//! # Modules
//!
//! - `discover` - Screenshot discovery in a local directory tree
//! - `storage` - Storage backends (S3-compatible, Supabase) behind one trait
//! - `remote_key` - Template-based remote key resolution
//! - `upload` - Batch upload orchestration with partial-failure tolerance
//! - `report` - Markdown comment rendering from upload results

pub mod discover;
pub mod remote_key;
pub mod report;
pub mod storage;
pub mod upload;

pub use discover::{DiscoverError, find_screenshots};
pub use remote_key::{DEFAULT_PATH_TEMPLATE, resolve_remote_key};
pub use report::{CommentContext, render_comment};
pub use storage::{ScreenshotStorage, StorageError, StorageTarget, storage_for};
pub use upload::{
    RunContext, UploadError, UploadOptions, UploadedScreenshot, upload_screenshots,
    upload_with_storage,
};
