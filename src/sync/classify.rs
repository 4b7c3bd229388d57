//! Row classification - decide whether a fetched row still needs an issue.

use crate::sheets::RangeOrigin;

/// Sync state of one fetched row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Sync cell holds a truthy marker
    Synced,
    /// Sync cell is blank or holds anything else
    Eligible,
    /// Sync column is not part of the fetched rectangle
    OutOfRange,
}

/// Classify `row` by its sync cell.
///
/// `sync_col_index` is an absolute zero-based column index. A row shorter
/// than the rectangle reads its missing cells as empty. The cell is trimmed
/// and compared by exact membership.
pub fn classify<S: AsRef<str>>(
    row: &[S],
    sync_col_index: usize,
    origin: &RangeOrigin,
    truthy_values: &[String],
) -> SyncStatus {
    if !origin.contains_column(sync_col_index) {
        return SyncStatus::OutOfRange;
    }

    let value = row
        .get(sync_col_index - origin.start_col_index)
        .map(|cell| cell.as_ref().trim())
        .unwrap_or("");
    if truthy_values.iter().any(|t| t == value) {
        SyncStatus::Synced
    } else {
        SyncStatus::Eligible
    }
}
