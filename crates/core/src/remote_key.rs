//! Template-based remote key resolution.

use chrono::Utc;

/// Default remote key template.
pub const DEFAULT_PATH_TEMPLATE: &str = "pr-{pr}/run-{runId}/{filename}";

/// Resolves a remote key from a template and run metadata.
///
/// Each of the placeholders `{pr}`, `{runId}` and `{filename}` is replaced
/// at most once (first occurrence only). A missing `pr` resolves to the
/// literal `unknown`; a missing `run_id` resolves to the current Unix
/// timestamp in milliseconds. Two runs without an explicit run id that land
/// on the same millisecond will collide - a documented limitation kept for
/// remote-key layout compatibility.
#[must_use]
pub fn resolve_remote_key(
    template: &str,
    filename: &str,
    pr: Option<&str>,
    run_id: Option<&str>,
) -> String {
    let pr = pr.map_or_else(|| "unknown".to_string(), ToString::to_string);
    let run_id = run_id.map_or_else(
        || Utc::now().timestamp_millis().to_string(),
        ToString::to_string,
    );

    template
        .replacen("{pr}", &pr, 1)
        .replacen("{runId}", &run_id, 1)
        .replacen("{filename}", filename, 1)
}
