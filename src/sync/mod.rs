//! Row reconciliation - the core of sheet2issue.
//!
//! This module provides:
//! - Row classification against the sync column
//! - Content rendering from row cells
//! - The per-row create / write-back state machine
//! - The run driver and its report

pub mod classify;
pub mod driver;
pub mod processor;
pub mod render;
pub mod report;

pub use classify::{SyncStatus, classify};
pub use driver::SyncRunner;
pub use processor::{RowOutcome, RowProcessor, RunContext, SkipReason};
pub use render::{ContentRenderer, RenderContext, RenderedIssue, RowView};
pub use report::{AbortInfo, MAX_REPORTED_URLS, RunReport};
