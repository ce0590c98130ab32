//! prshots CLI
//!
//! CI entry point around `prshots-core`: resolves storage settings from the
//! environment, runs the upload batch, and renders the PR comment. All env
//! plumbing lives here; the core takes fully-resolved structs.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prshots_core::report::{CommentContext, render_comment};
use prshots_core::{RunContext, StorageTarget, UploadOptions, UploadedScreenshot};

#[derive(Debug, Parser)]
#[command(
    name = "prshots",
    version,
    about = "Upload browser-test screenshots to remote storage and render PR review comments"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload screenshots to storage and write their public URLs as JSON
    Upload {
        /// Directory containing screenshots
        #[arg(short, long)]
        directory: PathBuf,
        /// Storage backend
        #[arg(short, long, value_enum)]
        storage: StorageKind,
        /// PR number
        #[arg(short = 'p', long, env = "PR_NUMBER")]
        pr: Option<String>,
        /// CI run ID
        #[arg(short = 'r', long = "run-id", env = "RUN_ID")]
        run_id: Option<String>,
        /// Remote key template ({pr}, {runId}, {filename})
        #[arg(short = 't', long)]
        path_template: Option<String>,
        /// Output file for screenshot URLs (JSON)
        #[arg(short, long, env = "OUTPUT_FILE", default_value = "screenshot-urls.json")]
        output: PathBuf,
    },
    /// Render PR comment markdown from uploaded screenshot URLs
    GenerateComment {
        /// Input file with screenshot URLs (JSON, as written by `upload`)
        #[arg(short, long)]
        input: PathBuf,
        /// PR number
        #[arg(short = 'p', long, env = "PR_NUMBER")]
        pr: Option<u64>,
        /// CI run ID
        #[arg(short = 'r', long = "run-id", env = "RUN_ID")]
        run_id: Option<String>,
        /// Repository URL for the CI-run link
        #[arg(long = "repo-url")]
        repo_url: Option<String>,
        /// Output file for the comment markdown
        #[arg(short, long, default_value = "pr-comment.md")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StorageKind {
    S3,
    Supabase,
}

/// Builds the storage target from environment variables, mirroring the
/// settings CI workflows already export.
fn storage_target_from_env(kind: StorageKind) -> anyhow::Result<StorageTarget> {
    match kind {
        StorageKind::Supabase => {
            let url = std::env::var("SUPABASE_URL")
                .context("SUPABASE_URL is required for supabase storage")?;
            let key = std::env::var("SUPABASE_PRIVATE_KEY")
                .or_else(|_| std::env::var("SUPABASE_KEY"))
                .context("SUPABASE_PRIVATE_KEY (or SUPABASE_KEY) is required for supabase storage")?;
            Ok(StorageTarget::Supabase {
                url,
                key,
                bucket: std::env::var("SUPABASE_BUCKET").ok(),
            })
        }
        StorageKind::S3 => {
            let region = std::env::var("AWS_REGION")
                .or_else(|_| std::env::var("S3_REGION"))
                .context("AWS_REGION (or S3_REGION) is required for s3 storage")?;
            let bucket = std::env::var("S3_BUCKET")
                .or_else(|_| std::env::var("AWS_BUCKET"))
                .context("S3_BUCKET (or AWS_BUCKET) is required for s3 storage")?;
            Ok(StorageTarget::S3 {
                region,
                bucket,
                access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
                secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
                endpoint: std::env::var("S3_ENDPOINT").ok(),
                public_read: std::env::var("S3_PUBLIC_READ").as_deref() != Ok("false"),
            })
        }
    }
}

async fn upload(
    directory: PathBuf,
    storage: StorageKind,
    pr: Option<String>,
    run_id: Option<String>,
    path_template: Option<String>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let options = UploadOptions {
        directory,
        target: storage_target_from_env(storage)?,
        run: RunContext {
            pr_number: pr,
            run_id,
        },
        path_template,
    };

    let screenshots = prshots_core::upload_screenshots(&options).await?;

    let json = serde_json::to_string_pretty(&screenshots)?;
    std::fs::write(&output, &json)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(output = %output.display(), "saved screenshot URLs");

    // Expose the URL list to later GitHub Actions steps.
    if let Ok(github_output) = std::env::var("GITHUB_OUTPUT") {
        let line = format!("urls={}\n", serde_json::to_string(&screenshots)?);
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&github_output)
            .and_then(|mut f| f.write_all(line.as_bytes()))
            .with_context(|| format!("failed to append to {github_output}"))?;
    }

    Ok(())
}

fn generate_comment(
    input: PathBuf,
    pr: Option<u64>,
    run_id: Option<String>,
    repo_url: Option<String>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let screenshots: Vec<UploadedScreenshot> =
        serde_json::from_str(&raw).context("input file is not a screenshot URL list")?;

    let pr_number = pr.context("PR number is required (--pr or PR_NUMBER)")?;
    let owner =
        std::env::var("GITHUB_REPOSITORY_OWNER").unwrap_or_else(|_| "owner".to_string());
    let repo = std::env::var("GITHUB_REPOSITORY")
        .ok()
        .and_then(|full| full.split('/').nth(1).map(ToString::to_string))
        .unwrap_or_else(|| "repo".to_string());
    let repository_url = repo_url.or_else(|| {
        let server = std::env::var("GITHUB_SERVER_URL").ok()?;
        let full = std::env::var("GITHUB_REPOSITORY").ok()?;
        Some(format!("{server}/{full}"))
    });

    let body = render_comment(
        &screenshots,
        &CommentContext {
            pr_number,
            owner,
            repo,
            run_id,
            repository_url,
        },
    );

    std::fs::write(&output, &body)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(output = %output.display(), "generated comment");

    println!("--- Comment Preview ---\n");
    println!("{body}");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prshots=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Upload {
            directory,
            storage,
            pr,
            run_id,
            path_template,
            output,
        } => upload(directory, storage, pr, run_id, path_template, output).await,
        Command::GenerateComment {
            input,
            pr,
            run_id,
            repo_url,
            output,
        } => generate_comment(input, pr, run_id, repo_url, output),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn upload_requires_directory_and_storage() {
        let err = Cli::try_parse_from(["prshots", "upload"]).expect_err("missing args");
        let rendered = err.to_string();
        assert!(rendered.contains("--directory"));
        assert!(rendered.contains("--storage"));
    }

    #[test]
    fn upload_parses_full_invocation() {
        let cli = Cli::try_parse_from([
            "prshots",
            "upload",
            "--directory",
            "test-results/pr-screenshots",
            "--storage",
            "s3",
            "--pr",
            "123",
            "--run-id",
            "456",
            "--path-template",
            "shots/{pr}/{filename}",
        ])
        .expect("parses");
        let Command::Upload {
            directory,
            pr,
            run_id,
            path_template,
            output,
            ..
        } = cli.cmd
        else {
            panic!("expected upload command");
        };
        assert_eq!(directory, PathBuf::from("test-results/pr-screenshots"));
        assert_eq!(pr.as_deref(), Some("123"));
        assert_eq!(run_id.as_deref(), Some("456"));
        assert_eq!(path_template.as_deref(), Some("shots/{pr}/{filename}"));
        assert_eq!(output, PathBuf::from("screenshot-urls.json"));
    }
}
