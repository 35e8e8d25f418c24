//! Tabular Export
//!
//! Export is driven by compile-time field descriptors declared per DTO type
//! rather than runtime reflection: each exportable type carries a static list
//! of named accessors, and the CSV writer walks that list.

use serde::Serialize;
use std::str::FromStr;

/// A single named column of an exportable row type.
pub struct FieldSpec<T: ?Sized> {
    pub name: &'static str,
    pub get: fn(&T) -> String,
}

/// Row types that can be exported as tabular data.
pub trait Exportable: Sized + 'static {
    const FIELDS: &'static [FieldSpec<Self>];
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    Json,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            // Excel opens CSV content served under its own media type; the
            // platform does not produce binary workbooks.
            ExportFormat::Excel => "application/vnd.ms-excel",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xls",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}

/// Render rows as CSV with a header line. The caller is responsible for
/// rejecting empty row sets before asking for a file.
pub fn to_csv<T: Exportable>(rows: &[T]) -> String {
    let mut out = String::new();

    let header: Vec<&str> = T::FIELDS.iter().map(|f| f.name).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = T::FIELDS
            .iter()
            .map(|f| csv_escape(&(f.get)(row)))
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }

    out
}

/// Render rows as a JSON array document.
pub fn to_json<T: Serialize>(rows: &[T]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
