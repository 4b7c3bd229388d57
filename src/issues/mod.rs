//! Issue tracker layer - trait abstraction and GitHub implementation

pub mod github;
pub mod tracker;

pub use github::{DEFAULT_GITHUB_API_URL, GitHubClient};
pub use tracker::{CreatedIssue, IssueTracker, NewIssue, Repository};
