//! Trigger context for one invocation.
//!
//! The GitHub Actions runner hands us the webhook payload as a JSON file.
//! Only the pull request fields the check needs are read; everything else
//! in the payload is ignored.

use std::path::Path;

use abref_state::RepoRef;
use serde::Deserialize;

use crate::error::{AbrefError, Result};

/// Pull request fields the check depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestContext {
    pub number: u64,
    pub head_sha: String,
    /// `None` when the author left the description empty.
    pub body: Option<String>,
    pub draft: bool,
}

/// Everything an invocation needs, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationInput {
    pub repository: RepoRef,
    /// `None` when the triggering event is not a pull request event.
    pub pull_request: Option<PullRequestContext>,
    pub skip_drafts: bool,
}

#[derive(Deserialize)]
struct EventPayload {
    #[serde(default)]
    pull_request: Option<PullRequestPayload>,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    number: u64,
    head: HeadPayload,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    draft: bool,
}

#[derive(Deserialize)]
struct HeadPayload {
    sha: String,
}

/// Extract the pull request context from a webhook payload.
pub fn parse_event(json: &str) -> Result<Option<PullRequestContext>> {
    let payload: EventPayload =
        serde_json::from_str(json).map_err(|e| AbrefError::EventPayload(e.to_string()))?;

    Ok(payload.pull_request.map(|pr| PullRequestContext {
        number: pr.number,
        head_sha: pr.head.sha,
        body: pr.body,
        draft: pr.draft,
    }))
}

/// Read and parse the payload file at `GITHUB_EVENT_PATH`.
pub fn load_event(path: &Path) -> Result<Option<PullRequestContext>> {
    let json = std::fs::read_to_string(path).map_err(|e| {
        AbrefError::EventPayload(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_event(&json)
}

/// Parse an Actions boolean input (`true|True|TRUE|false|False|FALSE`).
pub fn parse_action_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(AbrefError::Config(format!(
            "input '{}' does not meet YAML 1.2 \"Core Schema\" specification: '{}'",
            name, other
        ))),
    }
}
