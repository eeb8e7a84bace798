//! Storage trait definitions for abref
//!
//! A check run is the externally visible pass/fail record attached to a
//! commit. It is keyed by (repository, head SHA, name); the store assigns
//! an opaque numeric identity on create.
//!
//! `CheckRunStore` exposes exactly the three operations the reconciler
//! needs: look up by name, create, update. An in-memory fake lives in the
//! `fakes` module and the GitHub REST backend in `github`.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Repository coordinates (`owner/name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for RepoRef {
    type Err = StorageError;

    /// Parse the `GITHUB_REPOSITORY` form, e.g. `stevedores-org/abref`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(RepoRef::new(owner, name))
            }
            _ => Err(StorageError::Config(format!(
                "repository must be in owner/name form, got '{}'",
                s
            ))),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Store-assigned identity of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckRunId(pub u64);

impl std::fmt::Display for CheckRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Check run state
// ---------------------------------------------------------------------------

/// Lifecycle state of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
}

/// Final outcome of a completed check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
}

impl CheckConclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckConclusion::Success => "success",
            CheckConclusion::Failure => "failure",
            CheckConclusion::Neutral => "neutral",
            CheckConclusion::Cancelled => "cancelled",
            CheckConclusion::Skipped => "skipped",
            CheckConclusion::TimedOut => "timed_out",
            CheckConclusion::ActionRequired => "action_required",
        }
    }
}

/// Display payload shown on the check run page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckOutput {
    pub title: String,
    pub summary: String,
    /// Long-form Markdown body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Everything sent on create or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRunPayload {
    pub name: String,
    pub head_sha: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckConclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub output: CheckOutput,
}

/// A check run as the store reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRunRecord {
    pub id: CheckRunId,
    pub name: String,
    pub head_sha: String,
    pub status: CheckStatus,
    pub conclusion: Option<CheckConclusion>,
    pub output: CheckOutput,
}

// ---------------------------------------------------------------------------
// CheckRunStore
// ---------------------------------------------------------------------------

/// External check-run store.
///
/// Guarantees expected from implementations:
/// - `find_by_name` asks the backend for at most one record and never writes.
/// - `create` returns the record with its newly assigned id.
/// - `update` keeps the id stable; `StorageError::NotFound` if it is unknown.
/// - No identity is cached between calls.
#[async_trait]
pub trait CheckRunStore: Send + Sync {
    /// Look up the check run named `name` on `head_sha`, if one exists.
    async fn find_by_name(
        &self,
        repo: &RepoRef,
        head_sha: &str,
        name: &str,
    ) -> StorageResult<Option<CheckRunRecord>>;

    /// Create a new check run.
    async fn create(&self, repo: &RepoRef, payload: &CheckRunPayload)
        -> StorageResult<CheckRunRecord>;

    /// Overwrite an existing check run in place.
    async fn update(
        &self,
        repo: &RepoRef,
        id: CheckRunId,
        payload: &CheckRunPayload,
    ) -> StorageResult<CheckRunRecord>;
}
