//! Bulk exchange between tabular rows and catalog items.
//!
//! Import reconciles loosely named spreadsheet columns with the item
//! schema through a fixed alias list per field. Export emits the exact
//! shape the import side reads back.
//!
//! Codecs turn bytes into rows of named cells and back; the mapper never
//! looks past that row shape.

mod codec;
mod mapper;
mod row;

pub use codec::{CsvCodec, Format, JsonCodec, TabularCodec, DEFAULT_EXPORT_FILENAME, EXPORT_SHEET_TITLE};
pub use mapper::{
    map_export_rows, map_import_rows, required_columns, ImportBatch, ImportSummary, CATEGORY_ALIASES,
    DESCRIPTION_ALIASES, NAME_ALIASES, URL_ALIASES,
};
pub use row::{CellValue, TabularRow};
