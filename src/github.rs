use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::config::ActivityConfig;

pub const NO_CHANGES_MESSAGE: &str = "No recent changes found.";
pub const ERROR_MESSAGE: &str = "Error loading recent changes. Please try again later.";

/// One entry of the recent-activity feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub author_name: String,
    pub iso_date: String,
    pub message: String,
    pub html_url: String,
}

impl CommitRecord {
    fn timestamp(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.iso_date, &Rfc3339).ok()
    }

    /// `YYYY-MM-DD`, or the raw string when it is not RFC 3339
    pub fn display_date(&self) -> String {
        self.timestamp()
            .map(|t| t.date().to_string())
            .unwrap_or_else(|| self.iso_date.clone())
    }

    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityOutcome {
    Commits(Vec<CommitRecord>),
    Empty,
    Failed(String),
}

// ── API payload ──

#[derive(Debug, Deserialize)]
struct ApiCommit {
    commit: ApiCommitDetail,
    #[serde(default)]
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiCommitDetail {
    author: Option<ApiAuthor>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiAuthor {
    #[serde(default)]
    name: String,
    #[serde(default)]
    date: String,
}

fn to_records(raw: Vec<ApiCommit>) -> Vec<CommitRecord> {
    let mut records: Vec<CommitRecord> = raw
        .into_iter()
        .map(|c| {
            let (author_name, iso_date) = c
                .commit
                .author
                .map(|a| (a.name, a.date))
                .unwrap_or_default();
            CommitRecord {
                author_name,
                iso_date,
                message: c.commit.message,
                html_url: c.html_url,
            }
        })
        .collect();

    // Unparsable dates sort last; stable so API order breaks ties
    records.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    records
}

/// Parse the commits endpoint body into records, newest first.
/// Anything other than a JSON array (e.g. a rate-limit object) is an error.
pub fn parse_commits(body: &str) -> Result<Vec<CommitRecord>> {
    let raw: Vec<ApiCommit> =
        serde_json::from_str(body).context("Failed to parse commit list JSON")?;
    Ok(to_records(raw))
}

/// Classify a 2xx body. Unreadable JSON is swallowed into `Empty`;
/// a well-formed non-array answer (rate limit, error object) is `Failed`.
fn outcome_from_body(body: &str) -> ActivityOutcome {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "unparsable commit list");
            return ActivityOutcome::Empty;
        }
    };
    if !value.is_array() {
        let message = value
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("commit list is not an array");
        tracing::error!(reason = message, "commit endpoint returned a non-array body");
        return ActivityOutcome::Failed(message.to_string());
    }
    match parse_commits(body) {
        Ok(records) if records.is_empty() => ActivityOutcome::Empty,
        Ok(records) => ActivityOutcome::Commits(records),
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "commit list entries have an unexpected shape");
            ActivityOutcome::Empty
        }
    }
}

fn commits_url(config: &ActivityConfig, slug: &str) -> String {
    format!(
        "{}/repos/{}/commits?per_page={}",
        config.api_url.trim_end_matches('/'),
        slug,
        config.per_page
    )
}

/// One best-effort call, no retry.
///
/// Transport failures read the same as zero commits (`Empty`, logged at error level).
/// Non-2xx answers and non-array bodies are `Failed`.
pub fn fetch_recent_commits(config: &ActivityConfig, slug: &str) -> ActivityOutcome {
    let url = commits_url(config, slug);
    let body = match send_request(&url) {
        Ok(Ok(body)) => body,
        Ok(Err(status)) => {
            tracing::error!(repo = slug, status, "commit endpoint rejected the request");
            return ActivityOutcome::Failed(format!("GET {} returned status {}", url, status));
        }
        Err(err) => {
            tracing::error!(repo = slug, error = %format!("{:#}", err), "error fetching commits");
            return ActivityOutcome::Empty;
        }
    };
    let outcome = outcome_from_body(&body);
    if let ActivityOutcome::Commits(records) = &outcome {
        tracing::info!(repo = slug, count = records.len(), "loaded recent commits");
    }
    outcome
}

/// Outer `Err` is transport; inner `Err` carries a non-success status.
fn send_request(url: &str) -> Result<std::result::Result<String, u16>> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("nb/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("build reqwest client")?;
    let resp = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/vnd.github+json")
        .send()
        .with_context(|| format!("GET {}", url))?;
    let status = resp.status();
    if !status.is_success() {
        return Ok(Err(status.as_u16()));
    }
    let body = resp.text().context("read commit list body")?;
    Ok(Ok(body))
}

/// Repository slug for the feed: configured value, else the local checkout's origin.
pub fn resolve_repo_slug(config: &ActivityConfig, local_root: Option<&Path>) -> Option<String> {
    let configured = config.repo.trim();
    if !configured.is_empty() {
        return Some(configured.to_string());
    }
    let root = local_root?;
    let output = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .current_dir(root)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let remote = String::from_utf8_lossy(&output.stdout).trim().to_string();
    parse_owner_repo_from_remote(&remote)
        .map(|(owner, repo)| format!("{}/{}", owner, repo))
        .ok()
}

/// Parse owner/repo from a git remote URL
fn parse_owner_repo_from_remote(remote: &str) -> Result<(String, String)> {
    // SSH: git@github.com:owner/repo.git
    // HTTPS: https://github.com/owner/repo.git
    let stripped = remote
        .strip_prefix("https://github.com/")
        .or_else(|| remote.strip_prefix("http://github.com/"))
        .or_else(|| remote.strip_prefix("git@github.com:"))
        .ok_or_else(|| anyhow::anyhow!("Not a GitHub remote: {}", remote))?;

    let stripped = stripped.strip_suffix(".git").unwrap_or(stripped);
    let parts: Vec<&str> = stripped.split('/').collect();
    if parts.len() >= 2 && !parts[0].is_empty() && !parts[1].is_empty() {
        Ok((parts[0].to_string(), parts[1].to_string()))
    } else {
        anyhow::bail!("Cannot parse owner/repo from remote: {}", remote);
    }
}
