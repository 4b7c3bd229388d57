//! Unvalidated configuration layers.
//!
//! Each source (YAML file, environment, command line) produces a
//! `RawConfig` with every field optional. Layers are merged with later
//! layers winning, then validated into a `SyncConfig`.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scalar that may be written as text (environment) or typed (YAML).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Scalar {
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

/// A list given either as structured values (YAML) or as raw text (environment).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum InputList {
    Values(Vec<Value>),
    Text(String),
}

/// One configuration layer with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawConfig {
    pub access_token: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub sheet_name: Option<String>,
    pub read_range: Option<String>,
    pub data_start_row: Option<Scalar>,
    pub truthy_values: Option<InputList>,
    pub title_template: Option<String>,
    pub body_template: Option<String>,
    pub sync_column: Option<String>,
    pub labels: Option<InputList>,
    pub max_issues_per_run: Option<Scalar>,
    pub rate_limit_delay: Option<Scalar>,
    pub dry_run: Option<Scalar>,
    pub write_back_value: Option<String>,
    pub github_token: Option<String>,
    pub repository: Option<String>,
    pub github_api_url: Option<String>,
    pub sheets_api_url: Option<String>,
    pub sync_out_of_range: Option<String>,
    pub http_timeout_ms: Option<Scalar>,
}

impl RawConfig {
    /// Load the file layer with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. ./sheet2issue.yml
    /// 3. ~/.config/sheet2issue/sheet2issue.yml
    /// 4. Empty layer
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_name = env!("CARGO_PKG_NAME");
        let project_config = PathBuf::from(format!("{}.yml", project_name));
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", project_config.display(), e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::debug!("No config file found, using environment and flags only");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Build the environment layer through `lookup`. Empty values count as unset.
    pub fn from_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let text = |key: &str| get(key).map(Scalar::Text);
        let list = |key: &str| get(key).map(InputList::Text);

        Self {
            access_token: get("GOOGLE_OAUTH_ACCESS_TOKEN").or_else(|| get("ACCESS_TOKEN")),
            spreadsheet_id: get("SPREADSHEET_ID"),
            sheet_name: get("SHEET_NAME"),
            read_range: get("READ_RANGE"),
            data_start_row: text("DATA_START_ROW"),
            truthy_values: list("BOOLEAN_TRUTHY_VALUES"),
            title_template: get("TITLE_TEMPLATE"),
            body_template: get("BODY_TEMPLATE"),
            sync_column: get("SYNC_COLUMN"),
            labels: list("LABELS"),
            max_issues_per_run: text("MAX_ISSUES_PER_RUN"),
            rate_limit_delay: text("RATE_LIMIT_DELAY"),
            dry_run: text("DRY_RUN"),
            write_back_value: get("SYNC_WRITE_BACK_VALUE"),
            github_token: get("GITHUB_TOKEN"),
            repository: get("GITHUB_REPOSITORY"),
            github_api_url: get("GITHUB_API_URL"),
            sheets_api_url: get("SHEETS_API_URL"),
            sync_out_of_range: get("SYNC_OUT_OF_RANGE"),
            http_timeout_ms: text("HTTP_TIMEOUT_MS"),
        }
    }

    /// Environment layer from the process environment.
    pub fn from_process_env() -> Self {
        Self::from_env(|key| std::env::var(key).ok())
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: RawConfig) -> RawConfig {
        RawConfig {
            access_token: other.access_token.or(self.access_token),
            spreadsheet_id: other.spreadsheet_id.or(self.spreadsheet_id),
            sheet_name: other.sheet_name.or(self.sheet_name),
            read_range: other.read_range.or(self.read_range),
            data_start_row: other.data_start_row.or(self.data_start_row),
            truthy_values: other.truthy_values.or(self.truthy_values),
            title_template: other.title_template.or(self.title_template),
            body_template: other.body_template.or(self.body_template),
            sync_column: other.sync_column.or(self.sync_column),
            labels: other.labels.or(self.labels),
            max_issues_per_run: other.max_issues_per_run.or(self.max_issues_per_run),
            rate_limit_delay: other.rate_limit_delay.or(self.rate_limit_delay),
            dry_run: other.dry_run.or(self.dry_run),
            write_back_value: other.write_back_value.or(self.write_back_value),
            github_token: other.github_token.or(self.github_token),
            repository: other.repository.or(self.repository),
            github_api_url: other.github_api_url.or(self.github_api_url),
            sheets_api_url: other.sheets_api_url.or(self.sheets_api_url),
            sync_out_of_range: other.sync_out_of_range.or(self.sync_out_of_range),
            http_timeout_ms: other.http_timeout_ms.or(self.http_timeout_ms),
        }
    }
}
