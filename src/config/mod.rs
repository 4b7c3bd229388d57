//! Configuration system for sheet2issue.
//!
//! Three-layer configuration hierarchy, later layers win:
//! 1. YAML file (--config, ./sheet2issue.yml, ~/.config/sheet2issue/sheet2issue.yml)
//! 2. Environment variables (the GitHub Action inputs)
//! 3. Command-line overrides
//!
//! The merged layers are validated once into an immutable `SyncConfig`.

use std::path::PathBuf;

use eyre::{Context, Result};

pub use self::labels::{LabelEntry, LabelSpec};
pub use self::raw::{InputList, RawConfig, Scalar};
pub use self::sync::{
    DEFAULT_DATA_START_ROW, DEFAULT_MAX_ISSUES_PER_RUN, DEFAULT_RATE_LIMIT_DELAY_MS, DEFAULT_READ_RANGE,
    DEFAULT_TRUTHY_VALUES, DEFAULT_WRITE_BACK_VALUE, OutOfRangePolicy, SyncConfig,
};

mod labels;
mod raw;
mod sync;

/// Load, merge, and validate configuration.
pub fn load_config(explicit_path: Option<&PathBuf>, overrides: RawConfig) -> Result<SyncConfig> {
    let file = RawConfig::load(explicit_path)?;
    let merged = file.merge(RawConfig::from_process_env()).merge(overrides);
    merged.validate().context("Invalid configuration")
}
