//! Tabular (de)serialization: spreadsheet-like batches in and out.

mod decode;
mod encode;

pub use decode::{decode_workbook, DecodeError};
pub use encode::{encode_rows, encode_template, EncodeError, ExportRow};

use clap::ValueEnum;
use std::collections::HashMap;
use thiserror::Error;

/// Canonical column order of the upload template. Both the import
/// expectation and every export format use exactly these 19 columns.
pub const TEMPLATE_COLUMNS: [&str; 19] = [
    "name",
    "tags",
    "category",
    "brand",
    "specialAppearance",
    "shortDescription",
    "stockQuantity",
    "price",
    "discountedPrice",
    "numberOfPieces",
    "soundLevel",
    "lightEffect",
    "safetyRating",
    "usageArea",
    "duration",
    "weightPerBox",
    "productHeroImage",
    "productGallery",
    "status",
];

/// Filename stem used for export and template downloads.
pub const EXPORT_FILENAME_STEM: &str = "BulkProductUploadTemplate";

/// Requested output format for exports and templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Full spreadsheet workbook (xlsx).
    Excel,
    /// Comma-separated text.
    Csv,
    /// Tab-separated text.
    Txt,
}

/// Request-level validation error for an unrecognized format token.
#[derive(Debug, Error)]
#[error("Invalid export format: {0} (use excel, csv, or txt)")]
pub struct UnknownFormat(pub String);

impl ExportFormat {
    /// Parse a user-supplied format token, case-insensitively.
    pub fn parse(token: &str) -> Result<Self, UnknownFormat> {
        match token.trim().to_lowercase().as_str() {
            "excel" => Ok(Self::Excel),
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Txt),
            other => Err(UnknownFormat(other.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Excel => "xlsx",
            Self::Csv => "csv",
            Self::Txt => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Csv => "text/csv",
            Self::Txt => "text/plain",
        }
    }
}

/// A loosely-typed cell value as decoded from a tabular source.
#[derive(Debug, Clone, PartialEq)]
pub enum CellScalar {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellScalar {
    /// Render the cell for text output. Integral numbers print without a
    /// decimal point.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Self::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        }
    }
}

/// One decoded data row: column name to loosely-typed value. Cells that were
/// empty in the source are absent from the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, CellScalar>,
}

impl RawRow {
    pub fn insert(&mut self, key: impl Into<String>, value: CellScalar) {
        self.cells.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Trimmed text of a cell. `None` if the cell is absent or blank.
    pub fn text(&self, key: &str) -> Option<String> {
        let value = self.cells.get(key)?;
        let text = value.display();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Numeric value of a cell, accepting numeric text.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.cells.get(key)? {
            CellScalar::Number(n) => Some(*n),
            CellScalar::Text(s) => s.trim().parse().ok(),
            CellScalar::Bool(_) => None,
        }
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        self.number(key).map(|n| n as i64)
    }

    /// Boolean value of a cell. Accepts native booleans, the template's
    /// `"True"`/`"False"` literals, and 0/1.
    pub fn boolean(&self, key: &str) -> Option<bool> {
        match self.cells.get(key)? {
            CellScalar::Bool(b) => Some(*b),
            CellScalar::Number(n) => Some(*n != 0.0),
            CellScalar::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
        }
    }
}
