//! Row-to-item mapping for import and export.

use super::row::{CellValue, TabularRow};
use crate::error::{CatalogError, Result};
use crate::types::{Collection, ItemDraft, ItemId};

/// Accepted column names for each field, tried in order.
pub const NAME_ALIASES: &[&str] = &["Name", "name"];
pub const URL_ALIASES: &[&str] = &["URL", "Url", "url"];
pub const DESCRIPTION_ALIASES: &[&str] = &["Description", "description"];
pub const CATEGORY_ALIASES: &[&str] = &["Category", "category"];

const NAME_COLUMN: &str = "Name";
const URL_COLUMN: &str = "URL";
const DESCRIPTION_COLUMN: &str = "Description";
const CATEGORY_COLUMN: &str = "Category";

/// Column headers an import must provide.
pub fn required_columns() -> Vec<String> {
    [NAME_COLUMN, URL_COLUMN, DESCRIPTION_COLUMN]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// Drafts accepted from an import, plus how many rows were rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportBatch {
    pub drafts: Vec<ItemDraft>,
    pub rejected: usize,
}

/// Result of applying an import to a catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub rejected: usize,
    pub ids: Vec<ItemId>,
}

/// First alias whose cell carries a usable value.
fn resolve<'a>(row: &'a TabularRow, aliases: &[&str]) -> Option<&'a CellValue> {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|cell| cell.is_truthy())
}

fn resolve_text(row: &TabularRow, aliases: &[&str]) -> String {
    resolve(row, aliases).map(CellValue::to_text).unwrap_or_default()
}

/// Map one row to a draft, or `None` if a required field is empty.
fn map_row(row: &TabularRow) -> Option<ItemDraft> {
    let draft = ItemDraft {
        name: resolve_text(row, NAME_ALIASES),
        url: resolve_text(row, URL_ALIASES),
        description: resolve_text(row, DESCRIPTION_ALIASES),
        category: resolve(row, CATEGORY_ALIASES).map(CellValue::to_text),
    };
    draft.is_complete().then_some(draft)
}

/// Translate imported rows into drafts.
///
/// Rows missing a name, url or description are counted and skipped. When
/// no row survives, `NoValidRecords` names the required headers instead of
/// returning an empty batch.
pub fn map_import_rows(rows: &[TabularRow]) -> Result<ImportBatch> {
    let mut batch = ImportBatch::default();

    for row in rows {
        match map_row(row) {
            Some(draft) => batch.drafts.push(draft),
            None => batch.rejected += 1,
        }
    }

    if batch.drafts.is_empty() {
        return Err(CatalogError::NoValidRecords {
            required: required_columns(),
        });
    }

    Ok(batch)
}

/// One row per item, in collection order, with `Name`, `URL`,
/// `Description` and `Category` columns.
pub fn map_export_rows(collection: &Collection) -> Vec<TabularRow> {
    collection
        .iter()
        .map(|item| {
            TabularRow::new()
                .with(NAME_COLUMN, item.name.as_str())
                .with(URL_COLUMN, item.url.as_str())
                .with(DESCRIPTION_COLUMN, item.description.as_str())
                .with(CATEGORY_COLUMN, item.category_or_empty())
        })
        .collect()
}
