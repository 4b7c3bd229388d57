//! GitHub Issues client
//!
//! This module implements the IssueTracker trait for the GitHub REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{Result, SyncError};
use crate::issues::tracker::{CreatedIssue, IssueTracker, NewIssue, Repository};

/// Default GitHub API base URL
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub REST API version
const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client
pub struct GitHubClient {
    client: Client,
    token: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    html_url: String,
    number: u64,
}

impl GitHubClient {
    /// Create a client against the public GitHub API
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_api_url(token, DEFAULT_GITHUB_API_URL, timeout)
    }

    /// Create a client with an explicit API URL (GitHub Enterprise)
    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::Tracker(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: token.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn issues_url(&self, repo: &Repository) -> String {
        format!("{}/repos/{}/{}/issues", self.api_url, repo.owner, repo.name)
    }
}

/// Describe a failed response, calling out rate limiting
fn describe_failure(status: StatusCode, headers: &HeaderMap, body: &str) -> String {
    let header = |name: &str| headers.get(name).and_then(|h| h.to_str().ok());

    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN
            && (header("x-ratelimit-remaining") == Some("0") || header("retry-after").is_some()));

    if rate_limited {
        match header("retry-after") {
            Some(secs) => format!("Rate limited ({}), retry after {} seconds: {}", status, secs, body),
            None => format!("Rate limited ({}): {}", status, body),
        }
    } else {
        format!("API error {}: {}", status, body)
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn create_issue(&self, repo: &Repository, issue: &NewIssue) -> Result<CreatedIssue> {
        let response = self
            .client
            .post(self.issues_url(repo))
            .bearer_auth(&self.token)
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", GITHUB_API_VERSION)
            .json(issue)
            .send()
            .await
            .map_err(|e| SyncError::Tracker(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SyncError::Tracker(describe_failure(status, &headers, &body)));
        }

        let created: IssueResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Tracker(format!("Failed to parse response: {}", e)))?;

        Ok(CreatedIssue {
            url: created.html_url,
            number: created.number,
        })
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish()
    }
}
