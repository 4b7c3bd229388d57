//! Spreadsheet client trait

use async_trait::async_trait;

use crate::error::Result;

/// Reads a rectangle of cell values and writes single cells.
#[async_trait]
pub trait SheetClient: Send + Sync {
    /// Fetch the values of `range`; rows may be ragged, an empty range yields no rows.
    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>>;

    /// Overwrite exactly one cell, interpreting `value` as if typed by a user.
    async fn update_cell(&self, spreadsheet_id: &str, range: &str, value: &str) -> Result<()>;
}
