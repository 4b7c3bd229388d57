//! Spreadsheet access - range addressing and the Sheets client
//!
//! This module provides:
//! - A1 column/range arithmetic
//! - SheetClient trait for reading and writing cells
//! - GoogleSheetsClient implementation

pub mod client;
pub mod google;
pub mod range;

pub use client::SheetClient;
pub use google::{DEFAULT_SHEETS_API_URL, GoogleSheetsClient};
pub use range::{
    RangeOrigin, cell_range, column_letter_to_index, index_to_column_letter, parse_range_start,
    qualified_range,
};
