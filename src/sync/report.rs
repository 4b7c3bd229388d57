//! Run report - aggregate counters and created issue URLs.

use serde::Serialize;

/// Maximum number of created issue URLs listed in a report.
pub const MAX_REPORTED_URLS: usize = 100;

/// Where and why a run stopped before finishing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbortInfo {
    pub row: u32,
    pub issue_url: String,
    pub reason: String,
}

/// Counters accumulated over one run.
///
/// Counters are exact; `created_urls` keeps only the first
/// `MAX_REPORTED_URLS` URLs in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Rows attempted: created, planned, or failed
    pub processed: usize,
    /// Issues actually created
    pub created: usize,
    /// Issues that would have been created in dry-run mode
    pub planned: usize,
    /// Rows already synced, out of range under the closed policy, or with an empty title
    pub skipped: usize,
    /// Rows whose issue creation failed
    pub failed: usize,
    pub created_urls: Vec<String>,
    /// Run-level warnings, each recorded once
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<AbortInfo>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_planned(&mut self) {
        self.processed += 1;
        self.planned += 1;
    }

    pub fn record_failed(&mut self) {
        self.processed += 1;
        self.failed += 1;
    }

    pub fn record_created(&mut self, url: &str) {
        self.processed += 1;
        self.created += 1;
        if self.created_urls.len() < MAX_REPORTED_URLS {
            self.created_urls.push(url.to_string());
        }
    }

    pub fn record_warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.warnings.contains(&message) {
            self.warnings.push(message);
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// Multi-line markdown summary with one bullet per created URL.
    pub fn summary_markdown(&self) -> String {
        let mut lines = vec![
            format!("Processed: {}", self.processed),
            format!("Created: {}", self.created),
        ];
        if self.planned > 0 {
            lines.push(format!("Planned: {}", self.planned));
        }
        lines.push(format!("Skipped: {}", self.skipped));
        lines.push(format!("Failed: {}", self.failed));
        lines.push(String::new());
        lines.extend(self.created_urls.iter().map(|url| format!("- {}", url)));
        lines.join("\n")
    }
}
