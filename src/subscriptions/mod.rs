//! Change notifications for catalog snapshots.
//!
//! The owning [`Catalog`](crate::Catalog) broadcasts an event after every
//! transform has been applied and persisted, so listing views know when to
//! re-render.
//!
//! # Example
//!
//! ```ignore
//! let handle = catalog.subscribe(SubscriptionConfig::default());
//!
//! catalog.add(ItemDraft::new("Gemini Pro", "https://gemini.google.com", "Chat model"));
//!
//! match handle.recv() {
//!     Ok(CatalogEvent::Added { ids, len }) => println!("{} new, {} total", ids.len(), len),
//!     Ok(CatalogEvent::Dropped { .. }) | Err(_) => {}
//!     Ok(other) => println!("{:?}", other),
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    CatalogEvent, DropReason, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
