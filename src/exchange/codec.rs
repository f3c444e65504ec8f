//! Tabular file codecs.

use super::row::{CellValue, TabularRow};
use crate::error::{CatalogError, Result};
use std::path::Path;

/// Sheet title used for exports.
pub const EXPORT_SHEET_TITLE: &str = "AI Tools";

/// File name suggested for exports.
pub const DEFAULT_EXPORT_FILENAME: &str = "robo-ai-toolshed-export.csv";

/// Converts between file bytes and rows of named cells.
pub trait TabularCodec: Send + Sync {
    /// Parse the first table in `bytes`.
    fn parse(&self, bytes: &[u8]) -> Result<Vec<TabularRow>>;

    /// Serialize rows as a single table.
    fn serialize(&self, rows: &[TabularRow], sheet_title: &str) -> Result<Vec<u8>>;
}

/// Supported exchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(CatalogError::UnsupportedFormat(format!(
                "{} (expected .csv or .json)",
                path.display()
            ))),
        }
    }

    pub fn codec(&self) -> Box<dyn TabularCodec> {
        match self {
            Self::Csv => Box::new(CsvCodec),
            Self::Json => Box::new(JsonCodec),
        }
    }
}

/// Column names in first-seen order across all rows.
fn union_columns(rows: &[TabularRow]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for column in row.columns() {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
    }
    columns
}

/// Comma-separated values with a header row.
///
/// Every cell is read as text; the mapper coerces as needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCodec;

impl TabularCodec for CsvCodec {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<TabularRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: TabularRow = headers
                .iter()
                .zip(record.iter())
                .filter(|(header, _)| !header.is_empty())
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }

    fn serialize(&self, rows: &[TabularRow], _sheet_title: &str) -> Result<Vec<u8>> {
        let columns = union_columns(rows);
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(&columns)?;
        for row in rows {
            let record: Vec<String> = columns
                .iter()
                .map(|c| row.get(c).map(CellValue::to_text).unwrap_or_default())
                .collect();
            writer.write_record(&record)?;
        }

        writer
            .into_inner()
            .map_err(|e| CatalogError::Codec(e.to_string()))
    }
}

/// A JSON array of flat objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl TabularCodec for JsonCodec {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<TabularRow>> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| CatalogError::Codec(e.to_string()))?;

        let serde_json::Value::Array(elements) = value else {
            return Err(CatalogError::Codec("expected an array of rows".into()));
        };

        Ok(elements
            .iter()
            .map(|element| match element.as_object() {
                Some(obj) => obj
                    .iter()
                    .map(|(k, v)| {
                        let cell = CellValue::from_json(v)
                            .unwrap_or_else(|| CellValue::Text(v.to_string()));
                        (k.as_str(), cell)
                    })
                    .collect(),
                None => TabularRow::new(),
            })
            .collect())
    }

    fn serialize(&self, rows: &[TabularRow], _sheet_title: &str) -> Result<Vec<u8>> {
        let array: Vec<serde_json::Value> = rows
            .iter()
            .map(|row| {
                let obj: serde_json::Map<String, serde_json::Value> = row
                    .cells()
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.to_text())))
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect();

        Ok(serde_json::to_vec_pretty(&array)?)
    }
}
