//! Error types for the catalog store.

use crate::types::ItemId;
use thiserror::Error;

/// Main error type for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// The durable slot does not hold a parseable array of items.
    #[error("Corrupt persisted data: {0}")]
    CorruptPersistedData(String),

    /// Writing the durable slot failed.
    #[error("Failed to persist catalog: {0}")]
    PersistFailure(String),

    /// An externally supplied file could not be read.
    #[error("Failed to read the file: {0}")]
    FileReadFailure(String),

    /// Every row of an import failed validation.
    #[error(
        "No valid tools found. Ensure columns are named {}.",
        quoted_list(.required)
    )]
    NoValidRecords { required: Vec<String> },

    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("Store is locked by another process")]
    Locked,

    #[error("Store not initialized")]
    NotInitialized,
}

fn quoted_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n)).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{}, and {}", rest.join(", "), last),
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for CatalogError {
    fn from(e: csv::Error) -> Self {
        CatalogError::Codec(e.to_string())
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_valid_records_names_required_columns() {
        let err = CatalogError::NoValidRecords {
            required: vec!["Name".into(), "URL".into(), "Description".into()],
        };
        assert_eq!(
            err.to_string(),
            "No valid tools found. Ensure columns are named 'Name', 'URL', and 'Description'."
        );
    }
}
