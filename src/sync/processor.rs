//! Row processor - the per-row state machine.
//!
//! For one classified row:
//! 1. Skip synced rows (and out-of-range rows under the closed policy)
//! 2. Render title and body; a blank title is a skip
//! 3. In dry-run mode, log the planned issue and stop
//! 4. Create the issue; failure here is recoverable
//! 5. Write the sync marker back; failure here is fatal for the run

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use crate::config::{OutOfRangePolicy, SyncConfig};
use crate::issues::{IssueTracker, NewIssue};
use crate::sheets::{RangeOrigin, SheetClient, cell_range};
use crate::sync::classify::SyncStatus;
use crate::sync::render::{ContentRenderer, RowView};

/// Everything a row needs from the surrounding run, passed explicitly.
pub struct RunContext<S, T>
where
    S: SheetClient,
    T: IssueTracker,
{
    pub config: Arc<SyncConfig>,
    /// Timestamp shared by every row of the run
    pub now: String,
    pub sheets: Arc<S>,
    pub tracker: Arc<T>,
}

impl<S, T> RunContext<S, T>
where
    S: SheetClient,
    T: IssueTracker,
{
    pub fn new(config: Arc<SyncConfig>, sheets: Arc<S>, tracker: Arc<T>) -> Self {
        Self {
            config,
            now: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            sheets,
            tracker,
        }
    }

    /// Replace the run timestamp.
    pub fn with_now(mut self, now: impl Into<String>) -> Self {
        self.now = now.into();
        self
    }
}

/// Why a row was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadySynced,
    OutOfRangeClosed,
    EmptyTitle,
}

/// Terminal state of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Skipped(SkipReason),
    /// Dry run: the issue that would have been created
    Planned { title: String },
    /// Issue created and row marked as synced
    Created { url: String },
    /// Rendering or issue creation failed; nothing was written
    Failed { reason: String },
    /// Issue created but the row could not be marked; the run must stop
    WriteBackFailed { url: String, reason: String },
}

impl RowOutcome {
    /// Whether the row counts as processed (and is followed by the rate limit delay).
    pub fn is_processed(&self) -> bool {
        !matches!(self, RowOutcome::Skipped(_))
    }
}

/// Runs the per-row pipeline.
pub struct RowProcessor {
    renderer: ContentRenderer,
}

impl RowProcessor {
    pub fn new(renderer: ContentRenderer) -> Self {
        Self { renderer }
    }

    /// Drive one row from its classification to a terminal outcome.
    pub async fn process<S, T>(
        &self,
        ctx: &RunContext<S, T>,
        cells: &[String],
        status: SyncStatus,
        origin: RangeOrigin,
        row_number: u32,
    ) -> RowOutcome
    where
        S: SheetClient,
        T: IssueTracker,
    {
        let config = &ctx.config;

        match (status, config.sync_out_of_range) {
            (SyncStatus::Synced, _) => return RowOutcome::Skipped(SkipReason::AlreadySynced),
            (SyncStatus::OutOfRange, OutOfRangePolicy::Closed) => {
                return RowOutcome::Skipped(SkipReason::OutOfRangeClosed);
            }
            _ => {}
        }

        let view = RowView::from_cells(cells, origin.start_col_index);
        let rendered = match self.renderer.render(&view, row_number, &ctx.now) {
            Ok(Some(rendered)) => rendered,
            Ok(None) => {
                log::info!("Skipping row {}: empty title after rendering", row_number);
                return RowOutcome::Skipped(SkipReason::EmptyTitle);
            }
            Err(e) => {
                log::warn!("Error processing row {}: {}", row_number, e);
                return RowOutcome::Failed { reason: e.to_string() };
            }
        };

        if config.dry_run {
            log::info!("[dry_run] Create issue: {}", rendered.title);
            return RowOutcome::Planned { title: rendered.title };
        }

        let issue = NewIssue {
            title: rendered.title,
            body: rendered.body,
            labels: config.labels.clone(),
        };
        let created = match ctx.tracker.create_issue(&config.repository, &issue).await {
            Ok(created) => created,
            Err(e) => {
                log::warn!("Error processing row {}: {}", row_number, e);
                return RowOutcome::Failed { reason: e.to_string() };
            }
        };
        log::info!("Created issue #{} for row {}: {}", created.number, row_number, created.url);

        let target = cell_range(&config.sheet_name, &config.sync_column, row_number);
        match ctx
            .sheets
            .update_cell(&config.spreadsheet_id, &target, &config.write_back_value)
            .await
        {
            Ok(()) => RowOutcome::Created { url: created.url },
            Err(e) => {
                log::error!(
                    "CRITICAL: Created issue {} for row {}, but failed to update the spreadsheet. \
                     Manual fix is required to prevent duplicate creation.",
                    created.url,
                    row_number
                );
                log::error!("Write-back to {} failed: {}", target, e);
                RowOutcome::WriteBackFailed {
                    url: created.url,
                    reason: e.to_string(),
                }
            }
        }
    }
}
