//! GitHub Actions step outputs
//!
//! Appends the run report to the file named by `GITHUB_OUTPUT` using the
//! `name=value` / `name<<DELIMITER` formats understood by the runner.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::sync::RunReport;

/// Output name/value pairs for a report, in a stable order.
pub fn report_outputs(report: &RunReport) -> Result<Vec<(&'static str, String)>> {
    Ok(vec![
        ("processed_count", report.processed.to_string()),
        ("created_count", report.created.to_string()),
        ("planned_count", report.planned.to_string()),
        ("skipped_count", report.skipped.to_string()),
        ("failed_count", report.failed.to_string()),
        ("created_issue_urls", serde_json::to_string(&report.created_urls)?),
        ("summary_markdown", report.summary_markdown()),
    ])
}

/// Format one output entry, using heredoc syntax for multi-line values.
pub fn format_output(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{}={}\n", name, value);
    }

    let digest = hex::encode(Sha256::digest(value.as_bytes()));
    let mut delimiter = format!("ghadelimiter_{}", &digest[..16]);
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter)
}

/// Append all report outputs to `path`.
pub fn write_outputs(path: &Path, report: &RunReport) -> Result<()> {
    let mut content = String::new();
    for (name, value) in report_outputs(report)? {
        content.push_str(&format_output(name, &value));
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(content.as_bytes())?;
    log::debug!("Wrote step outputs to {}", path.display());
    Ok(())
}
