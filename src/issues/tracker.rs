//! Issue tracker trait and request/response types

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{Result, SyncError};

/// Creates tracking issues
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Create one issue and return its canonical URL
    async fn create_issue(&self, repo: &Repository, issue: &NewIssue) -> Result<CreatedIssue>;
}

/// Repository an issue is filed against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for Repository {
    type Err = SyncError;

    /// Parse `owner/repo`
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(SyncError::Config(format!(
                "repository must be in 'owner/repo' form, got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Issue to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Issue returned by the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub url: String,
    pub number: u64,
}
