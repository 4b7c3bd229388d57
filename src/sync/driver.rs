//! Run driver - walks the fetched rectangle row by row.
//!
//! Rows are visited strictly in sheet order, one at a time. The driver
//! enforces the per-run issue limit, throttles between processed rows,
//! folds row outcomes into the report, and stops the run on the one fatal
//! condition: an issue that was created but could not be marked as synced.

use std::sync::Arc;

use crate::config::{OutOfRangePolicy, SyncConfig};
use crate::error::{Result, SyncError};
use crate::issues::IssueTracker;
use crate::sheets::{RangeOrigin, SheetClient, parse_range_start, qualified_range};
use crate::sync::classify::{SyncStatus, classify};
use crate::sync::processor::{RowOutcome, RowProcessor, RunContext};
use crate::sync::render::ContentRenderer;
use crate::sync::report::{AbortInfo, RunReport};

/// Syncs the rows of one sheet into issues.
pub struct SyncRunner<S, T>
where
    S: SheetClient,
    T: IssueTracker,
{
    ctx: RunContext<S, T>,
    processor: RowProcessor,
}

impl<S, T> SyncRunner<S, T>
where
    S: SheetClient,
    T: IssueTracker,
{
    /// Create a runner; fails if either template does not compile.
    pub fn new(config: SyncConfig, sheets: Arc<S>, tracker: Arc<T>) -> Result<Self> {
        let renderer = ContentRenderer::new(&config.title_template, &config.body_template)?;
        Ok(Self {
            ctx: RunContext::new(Arc::new(config), sheets, tracker),
            processor: RowProcessor::new(renderer),
        })
    }

    /// Replace the run timestamp exposed to templates as `now`.
    pub fn with_now(mut self, now: impl Into<String>) -> Self {
        self.ctx = self.ctx.with_now(now);
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.ctx.config
    }

    /// Fetch the configured read range once, then run over it.
    pub async fn fetch_and_run(&self) -> Result<RunReport> {
        let config = &self.ctx.config;
        let origin = parse_range_start(&config.read_range)?;
        let range = qualified_range(&config.sheet_name, &config.read_range);

        log::info!("Fetching {} from spreadsheet {}", range, config.spreadsheet_id);
        let rows = self.ctx.sheets.get_values(&config.spreadsheet_id, &range).await?;
        log::info!("Fetched {} rows", rows.len());

        self.run(&rows, origin).await
    }

    /// Process `rows`, whose first element is sheet row `origin.start_row_number`.
    pub async fn run(&self, rows: &[Vec<String>], origin: RangeOrigin) -> Result<RunReport> {
        let config = &self.ctx.config;
        let mut report = RunReport::new();

        let sync_col_index = config.sync_col_index();
        let start_row_index = config.data_start_row.saturating_sub(origin.start_row_number) as usize;
        let mut warned_out_of_range = false;

        for (offset, cells) in rows.iter().enumerate().skip(start_row_index) {
            if limit_reached(config, &report) {
                log::info!(
                    "Reached max_issues_per_run ({}); stopping early",
                    config.max_issues_per_run
                );
                break;
            }

            let status = classify(cells, sync_col_index, &origin, &config.truthy_values);
            if status == SyncStatus::OutOfRange && !warned_out_of_range {
                let warning = out_of_range_warning(config);
                log::warn!("{}", warning);
                report.record_warning(warning);
                warned_out_of_range = true;
            }

            let row_number = origin.row_number(offset);
            let outcome = self
                .processor
                .process(&self.ctx, cells, status, origin, row_number)
                .await;
            log::debug!("Row {}: {:?}", row_number, outcome);
            let processed = outcome.is_processed();

            match outcome {
                RowOutcome::Skipped(_) => report.record_skipped(),
                RowOutcome::Planned { .. } => report.record_planned(),
                RowOutcome::Failed { .. } => report.record_failed(),
                RowOutcome::Created { ref url } => report.record_created(url),
                RowOutcome::WriteBackFailed { url, reason } => {
                    report.record_created(&url);
                    report.aborted = Some(AbortInfo {
                        row: row_number,
                        issue_url: url.clone(),
                        reason: reason.clone(),
                    });
                    return Err(SyncError::WriteBack {
                        row: row_number,
                        issue_url: url,
                        reason,
                        partial: Box::new(report),
                    });
                }
            }

            if processed && !config.rate_limit_delay.is_zero() {
                tokio::time::sleep(config.rate_limit_delay).await;
            }
        }

        Ok(report)
    }
}

/// Warning for a sync column the read range does not cover.
fn out_of_range_warning(config: &SyncConfig) -> String {
    format!(
        "SYNC_COLUMN ({}) is outside READ_RANGE ({}). Existing sync flags cannot be read; {}",
        config.sync_column,
        config.read_range,
        match config.sync_out_of_range {
            OutOfRangePolicy::Open => "rows will be treated as unsynced.",
            OutOfRangePolicy::Closed => "rows will be skipped.",
        }
    )
}

/// Whether the issue limit (planned issues under dry-run) has been hit.
fn limit_reached(config: &SyncConfig, report: &RunReport) -> bool {
    let count = if config.dry_run { report.planned } else { report.created };
    config.max_issues_per_run > 0 && count >= config.max_issues_per_run
}
