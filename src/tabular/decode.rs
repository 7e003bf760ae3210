//! Workbook decoding: byte buffer in, ordered raw rows out.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use thiserror::Error;

use super::{CellScalar, RawRow};

/// Errors produced while decoding a tabular upload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unrecognized tabular format: {0}")]
    Unreadable(String),

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("Failed to read sheet '{0}': {1}")]
    Sheet(String, String),
}

/// Decode a spreadsheet-like byte buffer into one `RawRow` per data row.
///
/// The first sheet is used; its first row is the header. Blank header cells
/// and empty data cells are skipped, and fully empty rows are dropped.
/// Returns an empty vec for a sheet with a header but no data rows; the
/// caller decides whether that is an error.
pub fn decode_workbook(bytes: &[u8]) -> Result<Vec<RawRow>, DecodeError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| DecodeError::Unreadable(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = sheet_names.first().ok_or(DecodeError::NoSheets)?.clone();

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DecodeError::Sheet(sheet_name.clone(), e.to_string()))?;

    let mut rows_iter = range.rows();
    let header_row = match rows_iter.next() {
        Some(row) => row,
        None => return Ok(Vec::new()),
    };

    let headers: Vec<Option<String>> = header_row.iter().map(header_name).collect();

    let mut rows = Vec::new();
    for data_row in rows_iter {
        let mut row = RawRow::default();
        for (cell, header) in data_row.iter().zip(headers.iter()) {
            let header = match header {
                Some(h) => h,
                None => continue,
            };
            if let Some(value) = cell_scalar(cell) {
                row.insert(header.clone(), value);
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn header_name(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.clone(),
        other => other.to_string(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn cell_scalar(cell: &Data) -> Option<CellScalar> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            if s.is_empty() {
                None
            } else {
                Some(CellScalar::Text(s.clone()))
            }
        }
        Data::Float(n) => Some(CellScalar::Number(*n)),
        Data::Int(n) => Some(CellScalar::Number(*n as f64)),
        Data::Bool(b) => Some(CellScalar::Bool(*b)),
        // Dates come through as spreadsheet serials.
        Data::DateTime(dt) => Some(CellScalar::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellScalar::Text(s.clone())),
        Data::Error(_) => None,
    }
}
