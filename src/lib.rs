//! # Toolshed
//!
//! A small catalog of curated items (name, link, description, optional
//! category) with a durable snapshot store, search and category facets,
//! and bulk spreadsheet import/export.
//!
//! ## Core Concepts
//!
//! - **Items**: Catalog records with a store-assigned id
//! - **Collection**: The ordered set of items; every mutation yields a new one
//! - **Durable slot**: A single entry holding the JSON-encoded collection
//! - **Exchange**: Tabular rows mapped to and from items through column aliases
//!
//! ## Example
//!
//! ```ignore
//! use toolshed::{Catalog, CatalogQuery, ItemDraft, StoreConfig};
//!
//! let catalog = Catalog::open_or_create(StoreConfig {
//!     path: "./my-catalog".into(),
//!     ..Default::default()
//! })?;
//!
//! // Add an item
//! catalog.submit(
//!     ItemDraft::new("Gemini Pro", "https://gemini.google.com", "Chat model")
//!         .with_category("Chat"),
//! )?;
//!
//! // Search within a category
//! let hits = catalog.search(&CatalogQuery::term("gemini").with_category("Chat"));
//!
//! // Bulk import a spreadsheet export
//! let summary = catalog.import_file("tools.csv")?;
//! ```

pub mod error;
pub mod exchange;
pub mod mutations;
pub mod persistence;
pub mod search;
pub mod slot;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use error::{CatalogError, Result};
pub use exchange::{
    map_export_rows, map_import_rows, CellValue, CsvCodec, Format, ImportBatch, ImportSummary,
    JsonCodec, TabularCodec, TabularRow,
};
pub use mutations::{add_many, add_one, delete_one, update_one, IdAllocator};
pub use persistence::{Hydrated, LoadReport, Persistence, SlotStatus};
pub use search::{categories, filter, matches_text, CatalogQuery};
pub use slot::{DurableSlot, FileSlot, MemorySlot};
pub use store::{Catalog, StoreConfig};
pub use subscriptions::{
    CatalogEvent, DropReason, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
