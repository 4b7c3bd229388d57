//! A1-style range addressing.
//!
//! Maps between column letters and zero-based column indices, and finds the
//! top-left origin of a read range so positions inside a fetched rectangle
//! can be translated back to absolute sheet coordinates.

use crate::error::{Result, SyncError};

/// Top-left corner and column span of a read range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeOrigin {
    /// Zero-based index of the first fetched column.
    pub start_col_index: usize,
    /// One-based sheet row number of the first fetched row.
    pub start_row_number: u32,
    /// Zero-based index of the last fetched column; `None` when the end
    /// reference names no column (`A2:10`).
    pub end_col_index: Option<usize>,
}

impl RangeOrigin {
    /// Absolute sheet row number of the row at `offset` inside the rectangle.
    pub fn row_number(&self, offset: usize) -> u32 {
        self.start_row_number.saturating_add(offset as u32)
    }

    /// Whether the absolute column `index` is part of the fetched rectangle.
    pub fn contains_column(&self, index: usize) -> bool {
        index >= self.start_col_index && self.end_col_index.is_none_or(|end| index <= end)
    }
}

/// Convert column letters to a zero-based index ('A' -> 0, 'Z' -> 25, 'AA' -> 26).
///
/// Letters are case-insensitive. Digits run 1..=26 with no zero digit.
pub fn column_letter_to_index(letter: &str) -> Result<usize> {
    if letter.is_empty() {
        return Err(SyncError::InvalidColumn(letter.to_string()));
    }

    let mut value: usize = 0;
    for ch in letter.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(SyncError::InvalidColumn(letter.to_string()));
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        value = value
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| SyncError::InvalidColumn(letter.to_string()))?;
    }

    Ok(value - 1)
}

/// Convert a zero-based column index to letters (0 -> "A", 26 -> "AA").
pub fn index_to_column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index as u128 + 1;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Parse the start reference of an A1 range, plus the column of its end.
///
/// `"C5:F"` gives column index 2, row 5 and end column 5. A missing row
/// defaults to 1, a leading `Sheet!` qualifier and `$` absolute markers are
/// ignored. A single reference (`"B7"`) ends at its own column.
pub fn parse_range_start(range: &str) -> Result<RangeOrigin> {
    let invalid = || {
        SyncError::InvalidRange(format!(
            "read range must start with a column reference (e.g., 'A:Z', 'C5:F'). Given: '{}'",
            range
        ))
    };

    let mut parts = range.trim().splitn(2, ':');
    let first_ref = parts.next().unwrap_or("");
    let end_ref = parts.next();

    let (letters, rest) = split_column(first_ref);
    if letters.is_empty() {
        return Err(invalid());
    }

    let digits = rest.strip_prefix('$').unwrap_or(rest);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let start_row_number = if digits.is_empty() {
        1
    } else {
        match digits.parse::<u32>() {
            Ok(0) | Err(_) => return Err(invalid()),
            Ok(n) => n,
        }
    };

    let start_col_index = column_letter_to_index(letters)?;
    let end_col_index = match end_ref {
        None => Some(start_col_index),
        Some(end) => match split_column(end) {
            ("", _) => None,
            (end_letters, _) => Some(column_letter_to_index(end_letters)?),
        },
    };

    Ok(RangeOrigin {
        start_col_index,
        start_row_number,
        // a reversed end collapses onto the start column
        end_col_index: end_col_index.map(|end| end.max(start_col_index)),
    })
}

/// Split a reference into its column letters and the remainder, dropping
/// any sheet qualifier and a leading `$`.
fn split_column(reference: &str) -> (&str, &str) {
    let reference = reference.rsplit('!').next().unwrap_or("");
    let rest = reference.strip_prefix('$').unwrap_or(reference);
    let letters_end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    rest.split_at(letters_end)
}

/// Qualify a range with its sheet name, quoting the name when needed.
pub fn qualified_range(sheet_name: &str, range: &str) -> String {
    format!("{}!{}", quote_sheet_name(sheet_name), range)
}

/// Range addressing exactly one cell, e.g. `Tasks!F12`.
pub fn cell_range(sheet_name: &str, column: &str, row_number: u32) -> String {
    qualified_range(sheet_name, &format!("{}{}", column, row_number))
}

fn quote_sheet_name(sheet_name: &str) -> String {
    let plain = sheet_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        sheet_name.to_string()
    } else {
        format!("'{}'", sheet_name.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_spot_values() {
        assert_eq!(column_letter_to_index("A").unwrap(), 0);
        assert_eq!(column_letter_to_index("Z").unwrap(), 25);
        assert_eq!(column_letter_to_index("AA").unwrap(), 26);
        assert_eq!(column_letter_to_index("ZZ").unwrap(), 701);
        assert_eq!(index_to_column_letter(0), "A");
        assert_eq!(index_to_column_letter(25), "Z");
        assert_eq!(index_to_column_letter(26), "AA");
        assert_eq!(index_to_column_letter(701), "ZZ");
        assert_eq!(index_to_column_letter(702), "AAA");
    }

    #[test]
    fn test_column_lowercase() {
        assert_eq!(column_letter_to_index("ab").unwrap(), 27);
    }

    #[test]
    fn test_column_roundtrip() {
        for i in (0..20_000).step_by(7) {
            let letters = index_to_column_letter(i);
            assert_eq!(column_letter_to_index(&letters).unwrap(), i, "{}", letters);
        }
    }

    #[test]
    fn test_column_invalid() {
        assert!(matches!(column_letter_to_index(""), Err(SyncError::InvalidColumn(_))));
        assert!(matches!(column_letter_to_index("A1"), Err(SyncError::InvalidColumn(_))));
        assert!(matches!(column_letter_to_index("É"), Err(SyncError::InvalidColumn(_))));
        assert!(matches!(
            column_letter_to_index(&"Z".repeat(40)),
            Err(SyncError::InvalidColumn(_))
        ));
    }

    #[test]
    fn test_parse_range_start_whole_columns() {
        let origin = parse_range_start("A:Z").unwrap();
        assert_eq!(
            origin,
            RangeOrigin {
                start_col_index: 0,
                start_row_number: 1,
                end_col_index: Some(25),
            }
        );
    }

    #[test]
    fn test_parse_range_end_column() {
        assert_eq!(parse_range_start("C5:F").unwrap().end_col_index, Some(5));
        assert_eq!(parse_range_start("Sheet1!B2:$AA$9").unwrap().end_col_index, Some(26));
        assert_eq!(parse_range_start("B7").unwrap().end_col_index, Some(1));
        assert_eq!(parse_range_start("A2:10").unwrap().end_col_index, None);
        assert_eq!(parse_range_start("D:B").unwrap().end_col_index, Some(3));
    }

    #[test]
    fn test_contains_column() {
        let origin = parse_range_start("B2:D").unwrap();
        assert!(!origin.contains_column(0));
        assert!(origin.contains_column(1));
        assert!(origin.contains_column(3));
        assert!(!origin.contains_column(4));

        let open_ended = parse_range_start("B2:10").unwrap();
        assert!(open_ended.contains_column(500));
    }

    #[test]
    fn test_parse_range_start_with_row() {
        let origin = parse_range_start("C5:F").unwrap();
        assert_eq!(origin.start_col_index, 2);
        assert_eq!(origin.start_row_number, 5);
    }

    #[test]
    fn test_parse_range_start_sheet_qualified() {
        let origin = parse_range_start("Sheet1!B2:D").unwrap();
        assert_eq!(origin.start_col_index, 1);
        assert_eq!(origin.start_row_number, 2);

        let origin = parse_range_start("'My!Sheet'!$D$10:$H").unwrap();
        assert_eq!(origin.start_col_index, 3);
        assert_eq!(origin.start_row_number, 10);
    }

    #[test]
    fn test_parse_range_start_single_reference() {
        let origin = parse_range_start("  b7 ").unwrap();
        assert_eq!(origin.start_col_index, 1);
        assert_eq!(origin.start_row_number, 7);
    }

    #[test]
    fn test_parse_range_start_malformed() {
        let err = parse_range_start("5A:Z").unwrap_err();
        assert!(matches!(err, SyncError::InvalidRange(_)));
        assert!(err.to_string().contains("5A:Z"));

        assert!(parse_range_start("").is_err());
        assert!(parse_range_start("A0:B").is_err());
        assert!(parse_range_start("A-1:B").is_err());
    }

    #[test]
    fn test_row_number() {
        let origin = parse_range_start("C5:F").unwrap();
        assert_eq!(origin.row_number(0), 5);
        assert_eq!(origin.row_number(3), 8);
    }

    #[test]
    fn test_qualified_range_quoting() {
        assert_eq!(qualified_range("Sheet1", "A:Z"), "Sheet1!A:Z");
        assert_eq!(qualified_range("My Tasks", "A:Z"), "'My Tasks'!A:Z");
        assert_eq!(qualified_range("Bob's", "A1"), "'Bob''s'!A1");
    }

    #[test]
    fn test_cell_range() {
        assert_eq!(cell_range("Tasks", "F", 12), "Tasks!F12");
    }
}
