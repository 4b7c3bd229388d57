//! Error types for sheet2issue
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::sync::RunReport;

/// All error types that can occur while syncing rows to issues
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Column letters that are not A-Z or overflow
    #[error("Invalid column letter: {0}")]
    InvalidColumn(String),

    /// Read range that does not start with a column reference
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Template compile or render failure
    #[error("Template error: {0}")]
    Template(String),

    /// Spreadsheet API error
    #[error("Sheets error: {0}")]
    Sheets(String),

    /// Issue tracker API error
    #[error("Issue tracker error: {0}")]
    Tracker(String),

    /// An issue was created but its row could not be marked as synced.
    ///
    /// Carries the report accumulated up to and including the failing row.
    #[error(
        "Created issue {issue_url} for row {row}, but failed to update the spreadsheet: {reason}"
    )]
    WriteBack {
        row: u32,
        issue_url: String,
        reason: String,
        partial: Box<RunReport>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML config parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SyncError {
    /// Report accumulated before the run was aborted, if any.
    pub fn partial_report(&self) -> Option<&RunReport> {
        match self {
            SyncError::WriteBack { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// Result type alias for sheet2issue operations
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = SyncError::Config("SHEET_NAME is required".to_string());
        assert_eq!(err.to_string(), "Configuration error: SHEET_NAME is required");
    }

    #[test]
    fn test_invalid_column_error() {
        let err = SyncError::InvalidColumn("A1".to_string());
        assert_eq!(err.to_string(), "Invalid column letter: A1");
    }

    #[test]
    fn test_tracker_error() {
        let err = SyncError::Tracker("rate limited".to_string());
        assert_eq!(err.to_string(), "Issue tracker error: rate limited");
    }

    #[test]
    fn test_write_back_error_mentions_issue_and_row() {
        let err = SyncError::WriteBack {
            row: 7,
            issue_url: "https://github.com/o/r/issues/3".to_string(),
            reason: "403 Forbidden".to_string(),
            partial: Box::default(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://github.com/o/r/issues/3"));
        assert!(msg.contains("row 7"));
        assert!(err.partial_report().is_some());
    }

    #[test]
    fn test_partial_report_absent_for_other_errors() {
        let err = SyncError::Sheets("boom".to_string());
        assert!(err.partial_report().is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SyncError = io_err.into();
        assert!(matches!(err, SyncError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: SyncError = json_err.into();
        assert!(matches!(err, SyncError::Json(_)));
    }
}
