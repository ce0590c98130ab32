//! Markdown comment rendering from upload results.

use std::fmt::Write as _;

use crate::upload::UploadedScreenshot;

/// Fixed heading that opens every screenshot report.
pub const COMMENT_HEADING: &str = "## 📸 UI Screenshots";

/// Context for rendering a pull-request comment.
#[derive(Debug, Clone)]
pub struct CommentContext {
    /// Pull-request number.
    pub pr_number: u64,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// CI run identifier, if known.
    pub run_id: Option<String>,
    /// Repository URL, used for the CI-run link.
    pub repository_url: Option<String>,
}

/// Derives a subsection heading from a screenshot's display name.
///
/// Strips the `.png` suffix, collapses every run of non-alphanumeric
/// characters into a single space, lowercases, and trims:
/// `my-homepage-screenshot.png` becomes `my homepage screenshot`.
#[must_use]
pub fn display_heading(name: &str) -> String {
    let stem = name.strip_suffix(".png").unwrap_or(name);
    let mut heading = String::with_capacity(stem.len());
    let mut pending_space = false;
    for c in stem.chars() {
        if c.is_alphanumeric() {
            if pending_space && !heading.is_empty() {
                heading.push(' ');
            }
            pending_space = false;
            heading.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    heading
}

/// Renders the screenshot report as markdown.
///
/// Pure and total: no I/O, never fails, and preserves the input order -
/// ordering is the orchestrator's responsibility. Every screenshot appears
/// exactly once, as a subsection embedding its public URL as an image.
#[must_use]
pub fn render_comment(screenshots: &[UploadedScreenshot], ctx: &CommentContext) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "{COMMENT_HEADING}");
    let _ = writeln!(body);
    let _ = writeln!(
        body,
        "Visual review for {}/{}#{}.",
        ctx.owner, ctx.repo, ctx.pr_number
    );

    for shot in screenshots {
        let _ = writeln!(body);
        let _ = writeln!(body, "### {}", display_heading(&shot.name));
        let _ = writeln!(body);
        let _ = writeln!(body, "![{}]({})", shot.name, shot.url);
    }

    if let (Some(run_id), Some(repository_url)) = (&ctx.run_id, &ctx.repository_url) {
        let _ = writeln!(body);
        let _ = writeln!(body, "---");
        let _ = writeln!(body);
        let _ = writeln!(
            body,
            "[View CI run]({}/actions/runs/{run_id})",
            repository_url.trim_end_matches('/')
        );
    }

    body
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn shot(name: &str, url: &str) -> UploadedScreenshot {
        UploadedScreenshot {
            name: name.to_string(),
            url: url.to_string(),
            remote_key: format!("pr-123/{name}"),
        }
    }

    fn ctx() -> CommentContext {
        CommentContext {
            pr_number: 123,
            owner: "test-owner".to_string(),
            repo: "test-repo".to_string(),
            run_id: None,
            repository_url: None,
        }
    }

    #[rstest]
    #[case("my-homepage-screenshot.png", "my homepage screenshot")]
    #[case("homepage.png", "homepage")]
    #[case("Login__Form.png", "login form")]
    #[case("a--b__c.png", "a b c")]
    #[case("--edge--.png", "edge")]
    #[case("no-extension", "no extension")]
    fn heading_derivation_is_exact(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(display_heading(name), expected);
    }

    #[test]
    fn opens_with_fixed_heading() {
        let comment = render_comment(&[shot("homepage.png", "https://e.com/h.png")], &ctx());
        assert!(comment.starts_with("## 📸 UI Screenshots\n"));
    }

    #[test]
    fn every_screenshot_appears_once_in_input_order() {
        let shots = vec![
            shot("homepage.png", "https://example.com/homepage.png"),
            shot("dashboard.png", "https://example.com/dashboard.png"),
        ];
        let comment = render_comment(&shots, &ctx());

        assert_eq!(comment.matches("### homepage").count(), 1);
        assert_eq!(comment.matches("### dashboard").count(), 1);
        let homepage_at = comment.find("### homepage").expect("homepage section");
        let dashboard_at = comment.find("### dashboard").expect("dashboard section");
        assert!(homepage_at < dashboard_at);
    }

    #[test]
    fn embeds_public_urls_as_images() {
        let comment = render_comment(
            &[shot("my-homepage-screenshot.png", "https://example.com/img.png")],
            &ctx(),
        );
        assert!(comment.contains("### my homepage screenshot"));
        assert!(comment.contains("![my-homepage-screenshot.png](https://example.com/img.png)"));
    }

    #[test]
    fn ci_run_link_requires_run_id_and_repository_url() {
        let shots = vec![shot("a.png", "https://e.com/a.png")];

        let mut with_both = ctx();
        with_both.run_id = Some("456".to_string());
        with_both.repository_url = Some("https://github.com/test-owner/test-repo".to_string());
        let comment = render_comment(&shots, &with_both);
        assert!(comment.contains(
            "[View CI run](https://github.com/test-owner/test-repo/actions/runs/456)"
        ));

        let mut run_only = ctx();
        run_only.run_id = Some("456".to_string());
        assert!(!render_comment(&shots, &run_only).contains("View CI run"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let shots = vec![shot("a.png", "https://e.com/a.png")];
        assert_eq!(render_comment(&shots, &ctx()), render_comment(&shots, &ctx()));
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            // Headings never contain consecutive spaces, uppercase letters,
            // or leading/trailing whitespace, whatever the input name.
            #[test]
            fn headings_are_normalized(name in ".{0,40}") {
                let heading = display_heading(&name);
                prop_assert!(!heading.contains("  "));
                prop_assert_eq!(heading.trim(), heading.as_str());
                prop_assert!(!heading.chars().any(char::is_uppercase));
            }
        }
    }
}
