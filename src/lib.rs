//! sheet2issue - sync spreadsheet rows into GitHub issues
//!
//! Each run fetches a range of a Google Sheet once, creates an issue for
//! every row whose sync column is not yet marked, and writes the marker
//! back so repeated runs never file the same row twice.

pub mod config;
pub mod error;
pub mod issues;
pub mod output;
pub mod sheets;
pub mod sync;
pub mod template;

pub use error::{Result, SyncError};
