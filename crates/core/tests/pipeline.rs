//! End-to-end pipeline tests: discovery, orchestration against a fake
//! storage backend, and comment rendering.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use prshots_core::report::{CommentContext, render_comment};
use prshots_core::storage::{ScreenshotStorage, StorageError, StorageTarget};
use prshots_core::{
    DEFAULT_PATH_TEMPLATE, RunContext, UploadError, UploadOptions, find_screenshots,
    upload_screenshots, upload_with_storage,
};

/// In-memory storage backend recording uploads and failing on request.
#[derive(Default)]
struct FakeStorage {
    fail_init: bool,
    fail_on: Vec<String>,
    uploads: Mutex<Vec<(PathBuf, String)>>,
}

impl FakeStorage {
    fn failing_on(names: &[&str]) -> Self {
        Self {
            fail_on: names.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ScreenshotStorage for FakeStorage {
    async fn initialize(&self) -> Result<(), StorageError> {
        if self.fail_init {
            return Err(StorageError::init("backend unreachable"));
        }
        Ok(())
    }

    async fn upload(&self, local_path: &Path, remote_key: &str) -> Result<String, StorageError> {
        if self.fail_on.iter().any(|name| remote_key.ends_with(name)) {
            return Err(StorageError::upload(remote_key, "simulated outage"));
        }
        self.uploads
            .lock()
            .expect("uploads lock")
            .push((local_path.to_path_buf(), remote_key.to_string()));
        Ok(format!("https://cdn.example.com/{remote_key}"))
    }
}

fn populate(dir: &Path) -> Vec<PathBuf> {
    let nested = dir.join("nested");
    std::fs::create_dir_all(&nested).expect("create nested dir");
    for path in [
        dir.join("b-dashboard.png"),
        dir.join("a-homepage.png"),
        nested.join("c-settings.png"),
        dir.join("notes.txt"),
    ] {
        std::fs::write(&path, b"fake png").expect("write test file");
    }
    find_screenshots(dir).expect("discovery succeeds")
}

fn run() -> RunContext {
    RunContext {
        pr_number: Some("12".to_string()),
        run_id: Some("99".to_string()),
    }
}

#[tokio::test]
async fn batch_upload_preserves_sorted_order_and_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let screenshots = populate(dir.path());
    assert_eq!(screenshots.len(), 3);

    let storage = FakeStorage::default();
    let uploaded = upload_with_storage(&storage, &screenshots, DEFAULT_PATH_TEMPLATE, &run())
        .await
        .expect("batch succeeds");

    let names: Vec<&str> = uploaded.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["a-homepage.png", "b-dashboard.png", "c-settings.png"]
    );
    assert_eq!(uploaded[0].remote_key, "pr-12/run-99/a-homepage.png");
    assert_eq!(
        uploaded[0].url,
        "https://cdn.example.com/pr-12/run-99/a-homepage.png"
    );
}

#[tokio::test]
async fn one_failure_is_skipped_without_aborting() {
    let dir = tempfile::tempdir().expect("tempdir");
    let screenshots = populate(dir.path());

    let storage = FakeStorage::failing_on(&["b-dashboard.png"]);
    let uploaded = upload_with_storage(&storage, &screenshots, DEFAULT_PATH_TEMPLATE, &run())
        .await
        .expect("batch still succeeds");

    let names: Vec<&str> = uploaded.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a-homepage.png", "c-settings.png"]);
}

#[tokio::test]
async fn empty_directory_is_fatal_before_any_upload() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("empty/nested")).expect("create dirs");

    // The gate fires before the backend is constructed, so an unreachable
    // target is never contacted.
    let options = UploadOptions {
        directory: dir.path().to_path_buf(),
        target: StorageTarget::s3("us-east-1", "shots"),
        run: run(),
        path_template: None,
    };
    let err = upload_screenshots(&options).await.expect_err("batch fails");

    assert!(matches!(err, UploadError::NoScreenshots { directory } if directory == dir.path()));
}

#[tokio::test]
async fn initialization_failure_aborts_the_whole_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let screenshots = populate(dir.path());

    let storage = FakeStorage::failing_init();
    let err = upload_with_storage(&storage, &screenshots, DEFAULT_PATH_TEMPLATE, &run())
        .await
        .expect_err("batch fails");

    assert!(matches!(err, UploadError::Storage(StorageError::Init(_))));
    assert!(storage.uploads.lock().expect("uploads lock").is_empty());
}

#[tokio::test]
async fn all_failures_abort_the_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let screenshots = populate(dir.path());

    let storage = FakeStorage::failing_on(&[".png"]);
    let err = upload_with_storage(&storage, &screenshots, DEFAULT_PATH_TEMPLATE, &run())
        .await
        .expect_err("batch fails");

    assert!(matches!(
        err,
        UploadError::AllUploadsFailed { attempted: 3 }
    ));
}

#[tokio::test]
async fn uploads_feed_the_rendered_comment_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let screenshots = populate(dir.path());

    let storage = FakeStorage::default();
    let uploaded = upload_with_storage(&storage, &screenshots, DEFAULT_PATH_TEMPLATE, &run())
        .await
        .expect("batch succeeds");

    let comment = render_comment(
        &uploaded,
        &CommentContext {
            pr_number: 12,
            owner: "acme".to_string(),
            repo: "webapp".to_string(),
            run_id: Some("99".to_string()),
            repository_url: Some("https://github.com/acme/webapp".to_string()),
        },
    );

    assert!(comment.starts_with("## 📸 UI Screenshots"));
    let a = comment.find("### a homepage").expect("a section");
    let b = comment.find("### b dashboard").expect("b section");
    let c = comment.find("### c settings").expect("c section");
    assert!(a < b && b < c);
    assert!(comment.contains("![a-homepage.png](https://cdn.example.com/pr-12/run-99/a-homepage.png)"));
    assert!(comment.contains("[View CI run](https://github.com/acme/webapp/actions/runs/99)"));
}
