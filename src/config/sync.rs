//! Validated sync configuration.

use std::str::FromStr;
use std::time::Duration;

use crate::config::labels::LabelSpec;
use crate::config::raw::{InputList, RawConfig, Scalar};
use crate::error::{Result, SyncError};
use crate::issues::{DEFAULT_GITHUB_API_URL, Repository};
use crate::sheets::{DEFAULT_SHEETS_API_URL, column_letter_to_index, parse_range_start};

pub const DEFAULT_READ_RANGE: &str = "A:Z";
pub const DEFAULT_DATA_START_ROW: u32 = 2;
pub const DEFAULT_TRUTHY_VALUES: &[&str] = &["TRUE", "true", "True", "1", "はい", "済"];
pub const DEFAULT_MAX_ISSUES_PER_RUN: usize = 10;
pub const DEFAULT_RATE_LIMIT_DELAY_MS: u64 = 1000;
pub const DEFAULT_WRITE_BACK_VALUE: &str = "TRUE";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;

/// What to do with rows whose sync cell lies outside the fetched range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutOfRangePolicy {
    /// Treat the row as unsynced (may duplicate issues on reruns).
    #[default]
    Open,
    /// Skip the row.
    Closed,
}

impl FromStr for OutOfRangePolicy {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(OutOfRangePolicy::Open),
            "closed" => Ok(OutOfRangePolicy::Closed),
            other => Err(SyncError::Config(format!(
                "SYNC_OUT_OF_RANGE must be 'open' or 'closed', got '{}'",
                other
            ))),
        }
    }
}

/// Fully validated settings for one run.
#[derive(Clone)]
pub struct SyncConfig {
    pub access_token: String,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub read_range: String,
    pub data_start_row: u32,
    pub truthy_values: Vec<String>,
    pub title_template: String,
    pub body_template: String,
    /// Upper-cased column letters
    pub sync_column: String,
    pub labels: Vec<String>,
    /// 0 means unlimited
    pub max_issues_per_run: usize,
    pub rate_limit_delay: Duration,
    pub dry_run: bool,
    pub write_back_value: String,
    pub github_token: String,
    pub repository: Repository,
    pub github_api_url: String,
    pub sheets_api_url: String,
    pub sync_out_of_range: OutOfRangePolicy,
    pub http_timeout: Duration,
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_name", &self.sheet_name)
            .field("read_range", &self.read_range)
            .field("data_start_row", &self.data_start_row)
            .field("truthy_values", &self.truthy_values)
            .field("sync_column", &self.sync_column)
            .field("labels", &self.labels)
            .field("max_issues_per_run", &self.max_issues_per_run)
            .field("rate_limit_delay", &self.rate_limit_delay)
            .field("dry_run", &self.dry_run)
            .field("write_back_value", &self.write_back_value)
            .field("repository", &self.repository)
            .field("sync_out_of_range", &self.sync_out_of_range)
            .finish_non_exhaustive()
    }
}

impl SyncConfig {
    /// Zero-based index of the sync column.
    pub fn sync_col_index(&self) -> usize {
        // validated in RawConfig::validate
        column_letter_to_index(&self.sync_column).unwrap_or(0)
    }
}

fn parse_truthy(input: Option<InputList>) -> Result<Vec<String>> {
    let values = match input {
        None => return Ok(DEFAULT_TRUTHY_VALUES.iter().map(|s| s.to_string()).collect()),
        Some(InputList::Values(values)) => values,
        Some(InputList::Text(text)) => {
            let parsed: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
                SyncError::Config(format!(
                    "BOOLEAN_TRUTHY_VALUES must be a valid JSON array. Input: {}. Error: {}",
                    text, e
                ))
            })?;
            match parsed {
                serde_json::Value::Array(values) => values,
                _ => {
                    return Err(SyncError::Config(format!(
                        "BOOLEAN_TRUTHY_VALUES must be a valid JSON array. Input: {}. Error: Input is not a JSON array.",
                        text
                    )));
                }
            }
        }
    };

    Ok(values
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

fn parse_int(value: &Option<Scalar>) -> Option<std::result::Result<i64, String>> {
    value.as_ref().map(|v| match v {
        Scalar::Int(n) => Ok(*n),
        other => {
            let text = other.as_text();
            text.trim().parse::<i64>().map_err(|_| text)
        }
    })
}

impl RawConfig {
    /// Validate the merged layers into a `SyncConfig`.
    pub fn validate(self) -> Result<SyncConfig> {
        let required = [
            ("GOOGLE_OAUTH_ACCESS_TOKEN", &self.access_token),
            ("SPREADSHEET_ID", &self.spreadsheet_id),
            ("SHEET_NAME", &self.sheet_name),
            ("TITLE_TEMPLATE", &self.title_template),
            ("BODY_TEMPLATE", &self.body_template),
            ("SYNC_COLUMN", &self.sync_column),
            ("GITHUB_TOKEN", &self.github_token),
            ("GITHUB_REPOSITORY", &self.repository),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, v)| v.as_deref().is_none_or(|s| s.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(SyncError::Config(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }

        let read_range = self.read_range.unwrap_or_else(|| DEFAULT_READ_RANGE.to_string());
        parse_range_start(&read_range)?;

        let data_start_row = match parse_int(&self.data_start_row) {
            None | Some(Err(_)) => DEFAULT_DATA_START_ROW as i64,
            Some(Ok(n)) => n,
        };
        if data_start_row < 1 || data_start_row > u32::MAX as i64 {
            return Err(SyncError::Config(format!(
                "DATA_START_ROW must be a positive integer, but got {}.",
                data_start_row
            )));
        }

        let max_issues_per_run = match parse_int(&self.max_issues_per_run) {
            None => DEFAULT_MAX_ISSUES_PER_RUN,
            Some(Ok(n)) => usize::try_from(n).unwrap_or(0),
            Some(Err(text)) => {
                log::warn!("Invalid MAX_ISSUES_PER_RUN input: '{}'. Treating as unlimited.", text);
                0
            }
        };

        let rate_limit_delay_ms = match parse_int(&self.rate_limit_delay) {
            None => DEFAULT_RATE_LIMIT_DELAY_MS,
            Some(Ok(n)) => u64::try_from(n).unwrap_or(0),
            Some(Err(text)) => {
                log::warn!(
                    "Invalid RATE_LIMIT_DELAY input: '{}'. Using default {}ms.",
                    text,
                    DEFAULT_RATE_LIMIT_DELAY_MS
                );
                DEFAULT_RATE_LIMIT_DELAY_MS
            }
        };

        let http_timeout_ms = match parse_int(&self.http_timeout_ms) {
            Some(Ok(n)) if n > 0 => n as u64,
            _ => DEFAULT_HTTP_TIMEOUT_MS,
        };

        let dry_run = match &self.dry_run {
            None => false,
            Some(Scalar::Bool(b)) => *b,
            Some(other) => other.as_text().trim().eq_ignore_ascii_case("true"),
        };

        let sync_column = self.sync_column.unwrap_or_default().trim().to_ascii_uppercase();
        column_letter_to_index(&sync_column)
            .map_err(|_| SyncError::Config(format!("SYNC_COLUMN is not a column letter: '{}'", sync_column)))?;

        let labels = match self.labels {
            None => Vec::new(),
            Some(InputList::Text(text)) => LabelSpec::parse(&text).map(LabelSpec::into_names).unwrap_or_default(),
            Some(InputList::Values(values)) => LabelSpec::from_values(values).into_names(),
        };

        let repository: Repository = self.repository.unwrap_or_default().parse()?;

        let sync_out_of_range = match &self.sync_out_of_range {
            None => OutOfRangePolicy::default(),
            Some(s) => s.parse()?,
        };

        Ok(SyncConfig {
            access_token: self.access_token.unwrap_or_default(),
            spreadsheet_id: self.spreadsheet_id.unwrap_or_default(),
            sheet_name: self.sheet_name.unwrap_or_default(),
            read_range,
            data_start_row: data_start_row as u32,
            truthy_values: parse_truthy(self.truthy_values)?,
            title_template: self.title_template.unwrap_or_default(),
            body_template: self.body_template.unwrap_or_default(),
            sync_column,
            labels,
            max_issues_per_run,
            rate_limit_delay: Duration::from_millis(rate_limit_delay_ms),
            dry_run,
            write_back_value: self
                .write_back_value
                .unwrap_or_else(|| DEFAULT_WRITE_BACK_VALUE.to_string()),
            github_token: self.github_token.unwrap_or_default(),
            repository,
            github_api_url: self
                .github_api_url
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            sheets_api_url: self
                .sheets_api_url
                .unwrap_or_else(|| DEFAULT_SHEETS_API_URL.to_string()),
            sync_out_of_range,
            http_timeout: Duration::from_millis(http_timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RawConfig {
        RawConfig {
            access_token: Some("ya29.token".to_string()),
            spreadsheet_id: Some("sheet-1".to_string()),
            sheet_name: Some("Tasks".to_string()),
            title_template: Some("{{row.A}}".to_string()),
            body_template: Some("{{row.B}}".to_string()),
            sync_column: Some("f".to_string()),
            github_token: Some("ghp_x".to_string()),
            repository: Some("octo/tasks".to_string()),
            ..Default::default()
        }
    }

    fn text(s: &str) -> Option<Scalar> {
        Some(Scalar::Text(s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = base().validate().unwrap();
        assert_eq!(config.read_range, "A:Z");
        assert_eq!(config.data_start_row, 2);
        assert_eq!(config.truthy_values, DEFAULT_TRUTHY_VALUES);
        assert_eq!(config.sync_column, "F");
        assert_eq!(config.sync_col_index(), 5);
        assert!(config.labels.is_empty());
        assert_eq!(config.max_issues_per_run, 10);
        assert_eq!(config.rate_limit_delay, Duration::from_millis(1000));
        assert!(!config.dry_run);
        assert_eq!(config.write_back_value, "TRUE");
        assert_eq!(config.repository, Repository::new("octo", "tasks"));
        assert_eq!(config.github_api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(config.sync_out_of_range, OutOfRangePolicy::Open);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_required_lists_all() {
        let raw = RawConfig {
            sheet_name: None,
            github_token: Some("  ".to_string()),
            ..base()
        };
        let err = raw.validate().unwrap_err().to_string();
        assert!(err.contains("SHEET_NAME"));
        assert!(err.contains("GITHUB_TOKEN"));
        assert!(!err.contains("SPREADSHEET_ID"));
    }

    #[test]
    fn test_data_start_row() {
        let config = RawConfig { data_start_row: text("5"), ..base() }.validate().unwrap();
        assert_eq!(config.data_start_row, 5);

        let config = RawConfig { data_start_row: text("abc"), ..base() }.validate().unwrap();
        assert_eq!(config.data_start_row, 2);

        let err = RawConfig { data_start_row: text("0"), ..base() }.validate().unwrap_err();
        assert!(err.to_string().contains("positive integer"));

        assert!(RawConfig { data_start_row: Some(Scalar::Int(-4)), ..base() }.validate().is_err());
    }

    #[test]
    fn test_truthy_values() {
        let raw = RawConfig {
            truthy_values: Some(InputList::Text(r#"["x", 1, true]"#.to_string())),
            ..base()
        };
        assert_eq!(raw.validate().unwrap().truthy_values, vec!["x", "1", "true"]);

        let raw = RawConfig {
            truthy_values: Some(InputList::Text(r#"{"a": 1}"#.to_string())),
            ..base()
        };
        let err = raw.validate().unwrap_err().to_string();
        assert!(err.contains("not a JSON array"));

        let raw = RawConfig {
            truthy_values: Some(InputList::Text("TRUE,yes".to_string())),
            ..base()
        };
        assert!(raw.validate().is_err());
    }

    #[test]
    fn test_max_issues_and_delay_lenient() {
        let config = RawConfig {
            max_issues_per_run: text("lots"),
            rate_limit_delay: text("soon"),
            ..base()
        }
        .validate()
        .unwrap();
        assert_eq!(config.max_issues_per_run, 0);
        assert_eq!(config.rate_limit_delay, Duration::from_millis(1000));

        let config = RawConfig {
            max_issues_per_run: text("-1"),
            rate_limit_delay: text("-5"),
            ..base()
        }
        .validate()
        .unwrap();
        assert_eq!(config.max_issues_per_run, 0);
        assert_eq!(config.rate_limit_delay, Duration::ZERO);
    }

    #[test]
    fn test_dry_run_parsing() {
        assert!(RawConfig { dry_run: text("TRUE"), ..base() }.validate().unwrap().dry_run);
        assert!(!RawConfig { dry_run: text("yes"), ..base() }.validate().unwrap().dry_run);
        assert!(RawConfig { dry_run: Some(Scalar::Bool(true)), ..base() }.validate().unwrap().dry_run);
    }

    #[test]
    fn test_labels_resolved_once() {
        let config = RawConfig {
            labels: Some(InputList::Text(r#"[{"name":"bug"},"p1"]"#.to_string())),
            ..base()
        }
        .validate()
        .unwrap();
        assert_eq!(config.labels, vec!["bug", "p1"]);
    }

    #[test]
    fn test_invalid_sync_column() {
        let err = RawConfig { sync_column: Some("F1".to_string()), ..base() }
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("SYNC_COLUMN"));
    }

    #[test]
    fn test_invalid_read_range() {
        let err = RawConfig { read_range: Some("5A:Z".to_string()), ..base() }
            .validate()
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidRange(_)));
    }

    #[test]
    fn test_invalid_repository() {
        let err = RawConfig { repository: Some("just-a-name".to_string()), ..base() }
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("owner/repo"));
    }

    #[test]
    fn test_out_of_range_policy() {
        let config = RawConfig { sync_out_of_range: Some("Closed".to_string()), ..base() }
            .validate()
            .unwrap();
        assert_eq!(config.sync_out_of_range, OutOfRangePolicy::Closed);
        assert!(RawConfig { sync_out_of_range: Some("maybe".to_string()), ..base() }
            .validate()
            .is_err());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let config = base().validate().unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("ya29.token"));
        assert!(!debug.contains("ghp_x"));
    }
}
