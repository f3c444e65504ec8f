//! Load and save of the full collection to a durable slot.
//!
//! The whole snapshot is written on every save, never a delta, so loading
//! is idempotent and saving twice equals saving once. Failures are reported
//! through `tracing` and absorbed: the in-memory collection stays
//! authoritative for the session.

use crate::error::{CatalogError, Result};
use crate::slot::DurableSlot;
use crate::types::{is_valid_item, Collection, Item};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Outcome of reading the durable slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    /// Nothing was stored yet.
    Absent,
    /// A sequence was read (possibly with dropped entries).
    Loaded,
    /// The payload was unusable and was discarded.
    Corrupt,
}

/// What happened while reading the slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadReport {
    pub status: SlotStatus,
    /// Elements rejected by the validity predicate or duplicating an id.
    pub dropped: usize,
}

/// A hydrated collection together with its load report.
#[derive(Clone, Debug)]
pub struct Hydrated {
    pub collection: Collection,
    pub report: LoadReport,
}

impl Hydrated {
    fn new(collection: Collection, status: SlotStatus, dropped: usize) -> Self {
        Self {
            collection,
            report: LoadReport { status, dropped },
        }
    }
}

/// Persistent store bound to one durable slot.
#[derive(Clone)]
pub struct Persistence {
    slot: Arc<dyn DurableSlot>,
}

impl Persistence {
    pub fn new(slot: Arc<dyn DurableSlot>) -> Self {
        Self { slot }
    }

    /// Read the slot into a collection. Never fails.
    pub fn load(&self) -> Collection {
        match self.hydrate() {
            Ok(hydrated) => hydrated.collection,
            Err(e) => {
                error!(error = %e, "Failed to load catalog, starting empty");
                Collection::new()
            }
        }
    }

    /// Read the slot, reporting what was kept and what was dropped.
    ///
    /// Only an I/O failure of the slot itself is returned as an error;
    /// unparseable or non-array payloads yield an empty, `Corrupt` result.
    pub fn hydrate(&self) -> Result<Hydrated> {
        let Some(bytes) = self.slot.read()? else {
            debug!("Durable slot is empty");
            return Ok(Hydrated::new(Collection::new(), SlotStatus::Absent, 0));
        };

        match decode_collection(&bytes) {
            Ok((collection, dropped)) => {
                if dropped > 0 {
                    warn!(dropped, kept = collection.len(), "Dropped invalid catalog entries");
                }
                Ok(Hydrated::new(collection, SlotStatus::Loaded, dropped))
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable catalog payload");
                Ok(Hydrated::new(Collection::new(), SlotStatus::Corrupt, 0))
            }
        }
    }

    /// Write the whole collection. Failures are logged and swallowed.
    pub fn save(&self, collection: &Collection) {
        if let Err(e) = self.try_save(collection) {
            error!(error = %e, items = collection.len(), "Failed to save catalog");
        }
    }

    /// Write the whole collection, returning any failure.
    pub fn try_save(&self, collection: &Collection) -> Result<()> {
        let bytes = serde_json::to_vec(collection)?;
        self.slot
            .write(&bytes)
            .map_err(|e| match e {
                CatalogError::PersistFailure(_) => e,
                other => CatalogError::PersistFailure(other.to_string()),
            })?;
        debug!(items = collection.len(), bytes = bytes.len(), "Saved catalog");
        Ok(())
    }
}

/// Parse a stored payload, keeping only valid items with unseen ids.
///
/// Returns the kept collection and the number of dropped elements.
fn decode_collection(bytes: &[u8]) -> Result<(Collection, usize)> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| CatalogError::CorruptPersistedData(e.to_string()))?;

    let serde_json::Value::Array(elements) = value else {
        return Err(CatalogError::CorruptPersistedData(
            "payload is not an array".into(),
        ));
    };

    let total = elements.len();
    let mut seen = HashSet::new();
    let items: Vec<Item> = elements
        .into_iter()
        .filter(is_valid_item)
        .filter_map(|value| serde_json::from_value::<Item>(value).ok())
        .filter(|item| seen.insert(item.id))
        .collect();

    let dropped = total - items.len();
    Ok((Collection::from(items), dropped))
}
