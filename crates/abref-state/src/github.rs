//! GitHub Checks API backend
//!
//! Implements [`CheckRunStore`] over the REST endpoints:
//! - `GET   /repos/{owner}/{repo}/commits/{sha}/check-runs?check_name=..&per_page=1`
//! - `POST  /repos/{owner}/{repo}/check-runs`
//! - `PATCH /repos/{owner}/{repo}/check-runs/{id}`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StorageError;
use crate::storage_traits::*;

/// Default REST endpoint for github.com.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

/// GitHub client configuration
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// REST API base URL (GHES installs use `https://host/api/v3`)
    pub api_url: String,
    /// Installation or workflow token with `checks: write`
    pub token: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl GitHubConfig {
    /// Create config for github.com with the default timeout.
    pub fn new(token: &str) -> Self {
        GitHubConfig {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("abref/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Point the client at a different API base URL.
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject configs that could never make a successful call.
    pub fn validate(&self) -> StorageResult<()> {
        if self.token.trim().is_empty() {
            return Err(StorageError::Config("GitHub token must not be empty".to_string()));
        }
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(StorageError::Config(format!(
                "API URL must be http(s), got '{}'",
                self.api_url
            )));
        }
        Ok(())
    }
}

/// Check-run store backed by the GitHub Checks API.
pub struct GitHubChecksClient {
    api_url: String,
    http_client: reqwest::Client,
}

impl GitHubChecksClient {
    /// Build a client; fails on an invalid config or an unusable token header.
    pub fn new(config: GitHubConfig) -> StorageResult<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| StorageError::Config(format!("invalid token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(GitHubChecksClient {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn repo_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}", self.api_url, repo.owner, repo.name)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> StorageResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        debug!(status = status.as_u16(), message = %message, "GitHub API request failed");

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                StorageError::Unauthorized { message }
            }
            _ => StorageError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl CheckRunStore for GitHubChecksClient {
    async fn find_by_name(
        &self,
        repo: &RepoRef,
        head_sha: &str,
        name: &str,
    ) -> StorageResult<Option<CheckRunRecord>> {
        let url = format!("{}/commits/{}/check-runs", self.repo_url(repo), head_sha);
        let list: CheckRunList = self
            .send(
                self.http_client
                    .get(&url)
                    .query(&[("check_name", name), ("per_page", "1")]),
            )
            .await?;
        debug!(total_count = list.total_count, "listed check runs");
        Ok(list.check_runs.into_iter().next().map(CheckRunRecord::from))
    }

    async fn create(
        &self,
        repo: &RepoRef,
        payload: &CheckRunPayload,
    ) -> StorageResult<CheckRunRecord> {
        let url = format!("{}/check-runs", self.repo_url(repo));
        let run: WireCheckRun = self
            .send(self.http_client.post(&url).json(payload))
            .await?;
        Ok(run.into())
    }

    async fn update(
        &self,
        repo: &RepoRef,
        id: CheckRunId,
        payload: &CheckRunPayload,
    ) -> StorageResult<CheckRunRecord> {
        let url = format!("{}/check-runs/{}", self.repo_url(repo), id);
        let body = UpdateBody {
            name: &payload.name,
            status: payload.status,
            conclusion: payload.conclusion,
            completed_at: payload.completed_at,
            output: &payload.output,
        };
        let run: WireCheckRun = self
            .send(self.http_client.patch(&url).json(&body))
            .await?;
        Ok(run.into())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct CheckRunList {
    total_count: u64,
    check_runs: Vec<WireCheckRun>,
}

#[derive(Deserialize)]
struct WireCheckRun {
    id: u64,
    name: String,
    head_sha: String,
    // GitHub also reports `waiting`, `requested` and `pending`
    status: String,
    // `stale` is GitHub-only and maps to no conclusion
    conclusion: Option<String>,
    #[serde(default)]
    output: Option<WireOutput>,
}

#[derive(Deserialize, Default)]
struct WireOutput {
    title: Option<String>,
    summary: Option<String>,
    text: Option<String>,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    name: &'a str,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    conclusion: Option<CheckConclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
    output: &'a CheckOutput,
}

impl From<WireCheckRun> for CheckRunRecord {
    fn from(run: WireCheckRun) -> Self {
        let status = match run.status.as_str() {
            "completed" => CheckStatus::Completed,
            "in_progress" => CheckStatus::InProgress,
            _ => CheckStatus::Queued,
        };
        let output = run.output.unwrap_or_default();
        CheckRunRecord {
            id: CheckRunId(run.id),
            name: run.name,
            head_sha: run.head_sha,
            status,
            conclusion: run
                .conclusion
                .and_then(|c| serde_json::from_value(serde_json::Value::String(c)).ok()),
            output: CheckOutput {
                title: output.title.unwrap_or_default(),
                summary: output.summary.unwrap_or_default(),
                text: output.text,
            },
        }
    }
}
