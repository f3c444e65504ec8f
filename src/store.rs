//! The owning catalog object.
//!
//! `Catalog` holds the current snapshot and is the only writer. Each
//! mutation runs a pure transform from [`crate::mutations`], persists the
//! whole result, swaps the snapshot, and then notifies subscribers.

use crate::error::{CatalogError, Result};
use crate::exchange::{
    map_export_rows, map_import_rows, Format, ImportSummary, TabularRow, EXPORT_SHEET_TITLE,
};
use crate::mutations::{self, IdAllocator};
use crate::persistence::{LoadReport, Persistence, SlotStatus};
use crate::search::{self, CatalogQuery};
use crate::slot::{DurableSlot, FileSlot, MemorySlot};
use crate::subscriptions::{
    CatalogEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{Collection, Item, ItemDraft, ItemId};
use fs2::FileExt;
use parking_lot::{Mutex, RwLock};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Directory holding the slot and lock file.
    pub path: PathBuf,

    /// Name of the durable slot (file stem of the JSON payload).
    pub slot_name: String,

    /// Whether to create the store if it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./toolshed"),
            slot_name: "robo-ai-tools".to_string(),
            create_if_missing: true,
        }
    }
}

impl StoreConfig {
    /// Path of the JSON file backing the durable slot.
    pub fn slot_path(&self) -> PathBuf {
        self.path.join(format!("{}.json", self.slot_name))
    }
}

/// The catalog store.
///
/// Provides a unified interface for:
/// - Reading the current snapshot and derived views (search, categories)
/// - Adding, updating, and deleting items
/// - Bulk import and export through tabular codecs
/// - Subscribing to snapshot changes
pub struct Catalog {
    /// Store directory, when file-backed.
    path: Option<PathBuf>,

    /// Lock file for exclusive access.
    _lock_file: Option<File>,

    persistence: Persistence,

    ids: IdAllocator,

    /// Current snapshot. Replaced whole on every mutation.
    snapshot: RwLock<Arc<Collection>>,

    /// Report from the most recent hydration.
    load_report: RwLock<LoadReport>,

    subscriptions: SubscriptionManager,

    /// Lock for write operations to ensure atomicity.
    write_lock: Mutex<()>,
}

impl Catalog {
    /// Open an existing store or create a new one.
    pub fn open_or_create(config: StoreConfig) -> Result<Self> {
        if config.path.exists() {
            Self::open(config)
        } else if config.create_if_missing {
            Self::create(config)
        } else {
            Err(CatalogError::NotInitialized)
        }
    }

    /// Create the store directory (if needed) and open it.
    pub fn create(config: StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.path)?;
        Self::open(config)
    }

    /// Open an existing store directory.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if !config.path.is_dir() {
            return Err(CatalogError::NotInitialized);
        }

        let lock_file = Self::acquire_lock(&config.path)?;
        let slot = Arc::new(FileSlot::new(config.slot_path()));

        let mut catalog = Self::with_slot(slot);
        catalog.path = Some(config.path);
        catalog._lock_file = Some(lock_file);
        Ok(catalog)
    }

    /// Catalog backed by an empty in-memory slot.
    pub fn in_memory() -> Self {
        Self::with_slot(Arc::new(MemorySlot::new()))
    }

    /// Catalog over any durable slot, hydrated immediately.
    pub fn with_slot(slot: Arc<dyn DurableSlot>) -> Self {
        let persistence = Persistence::new(slot);
        let (collection, report) = Self::hydrate(&persistence);

        Self {
            path: None,
            _lock_file: None,
            ids: IdAllocator::seeded(collection.ids()),
            persistence,
            snapshot: RwLock::new(Arc::new(collection)),
            load_report: RwLock::new(report),
            subscriptions: SubscriptionManager::new(),
            write_lock: Mutex::new(()),
        }
    }

    fn hydrate(persistence: &Persistence) -> (Collection, LoadReport) {
        match persistence.hydrate() {
            Ok(hydrated) => {
                info!(
                    items = hydrated.collection.len(),
                    dropped = hydrated.report.dropped,
                    status = ?hydrated.report.status,
                    "Catalog loaded"
                );
                (hydrated.collection, hydrated.report)
            }
            Err(e) => {
                warn!(error = %e, "Catalog slot unreadable, starting empty");
                let report = LoadReport {
                    status: SlotStatus::Corrupt,
                    dropped: 0,
                };
                (Collection::new(), report)
            }
        }
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_path = path.join("LOCK");
        let lock_file = File::create(lock_path)?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| CatalogError::Locked)?;

        Ok(lock_file)
    }

    /// Store directory, if file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// How the most recent load went.
    pub fn load_report(&self) -> LoadReport {
        self.load_report.read().clone()
    }

    // --- Reads ---

    /// The current snapshot. Later mutations never change it.
    pub fn snapshot(&self) -> Arc<Collection> {
        Arc::clone(&self.snapshot.read())
    }

    pub fn len(&self) -> usize {
        self.snapshot.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.read().is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<Item> {
        self.snapshot.read().get(id).cloned()
    }

    /// Category facets, `"All"` first.
    pub fn categories(&self) -> Vec<String> {
        search::categories(&self.snapshot())
    }

    pub fn search(&self, query: &CatalogQuery) -> Collection {
        query.apply(&self.snapshot())
    }

    // --- Mutations ---

    /// Apply a transform to the current snapshot, persist, and swap.
    fn commit<F>(&self, transform: F) -> Arc<Collection>
    where
        F: FnOnce(&Collection) -> Collection,
    {
        match self.commit_if(|c| Some(transform(c))) {
            Some(next) => next,
            None => self.snapshot(),
        }
    }

    /// Like [`Catalog::commit`], but the transform may decline under the
    /// write lock, in which case nothing is written or swapped.
    fn commit_if<F>(&self, transform: F) -> Option<Arc<Collection>>
    where
        F: FnOnce(&Collection) -> Option<Collection>,
    {
        let _lock = self.write_lock.lock();

        let current = self.snapshot();
        let next = Arc::new(transform(current.as_ref())?);
        self.persistence.save(&next);
        *self.snapshot.write() = Arc::clone(&next);

        Some(next)
    }

    /// Append one item. Required fields are not checked here; see
    /// [`Catalog::submit`] for the validated path.
    pub fn add(&self, draft: ItemDraft) -> Item {
        let next = self.commit(|c| mutations::add_one(c, draft, &self.ids));
        let item = next.items()[next.len() - 1].clone();

        debug!(id = %item.id, "Added item");
        self.subscriptions.broadcast(CatalogEvent::Added {
            ids: vec![item.id],
            len: next.len(),
        });
        item
    }

    /// Validate a draft and add it. Nothing changes on a missing field.
    pub fn submit(&self, draft: ItemDraft) -> Result<Item> {
        draft.validate()?;
        Ok(self.add(draft))
    }

    /// Append a batch in input order. Returns the assigned ids.
    pub fn add_many(&self, drafts: Vec<ItemDraft>) -> Vec<ItemId> {
        let count = drafts.len();
        let next = self.commit(|c| mutations::add_many(c, drafts, &self.ids));
        let ids: Vec<ItemId> = next.items()[next.len() - count..]
            .iter()
            .map(|item| item.id)
            .collect();

        if !ids.is_empty() {
            self.subscriptions.broadcast(CatalogEvent::Added {
                ids: ids.clone(),
                len: next.len(),
            });
        }
        ids
    }

    /// Replace the item with the same id. Returns false if no such item
    /// exists, in which case nothing is written.
    pub fn update(&self, item: Item) -> bool {
        let id = item.id;
        let next = self.commit_if(|c| c.contains(id).then(|| mutations::update_one(c, item)));
        let Some(next) = next else {
            debug!(id = %id, "Update of unknown item ignored");
            return false;
        };

        self.subscriptions.broadcast(CatalogEvent::Updated {
            id,
            len: next.len(),
        });
        true
    }

    /// Validate an edited item and apply it.
    pub fn edit(&self, item: Item) -> Result<()> {
        item.to_draft().validate()?;
        if self.update(item.clone()) {
            Ok(())
        } else {
            Err(CatalogError::ItemNotFound(item.id))
        }
    }

    /// Remove an item. Returns false if it was not present.
    pub fn delete(&self, id: ItemId) -> bool {
        let next = self.commit_if(|c| c.contains(id).then(|| mutations::delete_one(c, id)));
        let Some(next) = next else {
            return false;
        };

        debug!(id = %id, "Deleted item");
        self.subscriptions.broadcast(CatalogEvent::Deleted {
            id,
            len: next.len(),
        });
        true
    }

    /// Re-read the durable slot, replacing the in-memory snapshot.
    pub fn reload(&self) -> Arc<Collection> {
        let _lock = self.write_lock.lock();

        let (collection, report) = Self::hydrate(&self.persistence);
        for id in collection.ids() {
            self.ids.observe(id);
        }
        let next = Arc::new(collection);
        *self.snapshot.write() = Arc::clone(&next);
        *self.load_report.write() = report;

        self.subscriptions
            .broadcast(CatalogEvent::Reloaded { len: next.len() });
        next
    }

    // --- Bulk exchange ---

    /// Map rows to drafts and append the valid ones as one batch.
    ///
    /// When no row is valid the catalog is left unchanged and
    /// `NoValidRecords` is returned.
    pub fn import_rows(&self, rows: &[TabularRow]) -> Result<ImportSummary> {
        let batch = map_import_rows(rows)?;
        let count = batch.drafts.len();

        let next = self.commit(|c| mutations::add_many(c, batch.drafts, &self.ids));
        let ids: Vec<ItemId> = next.items()[next.len() - count..]
            .iter()
            .map(|item| item.id)
            .collect();

        info!(imported = count, rejected = batch.rejected, "Imported items");
        self.subscriptions.broadcast(CatalogEvent::Imported {
            ids: ids.clone(),
            rejected: batch.rejected,
            len: next.len(),
        });

        Ok(ImportSummary {
            imported: count,
            rejected: batch.rejected,
            ids,
        })
    }

    /// Decode file bytes with the given format and import them.
    pub fn import_bytes(&self, bytes: &[u8], format: Format) -> Result<ImportSummary> {
        let rows = format.codec().parse(bytes)?;
        self.import_rows(&rows)
    }

    /// Read a `.csv` or `.json` file and import it.
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportSummary> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let bytes = fs::read(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to read import file");
            CatalogError::FileReadFailure(format!("{}: {}", path.display(), e))
        })?;
        self.import_bytes(&bytes, format)
    }

    /// One row per item with `Name`, `URL`, `Description`, `Category`.
    pub fn export_rows(&self) -> Vec<TabularRow> {
        map_export_rows(&self.snapshot())
    }

    pub fn export_bytes(&self, format: Format) -> Result<Vec<u8>> {
        format
            .codec()
            .serialize(&self.export_rows(), EXPORT_SHEET_TITLE)
    }

    /// Write the catalog to a `.csv` or `.json` file.
    ///
    /// An empty catalog writes nothing and returns `Ok(0)`.
    pub fn export_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;

        let rows = self.export_rows();
        if rows.is_empty() {
            info!("No tools to export");
            return Ok(0);
        }

        let bytes = format.codec().serialize(&rows, EXPORT_SHEET_TITLE)?;
        fs::write(path, bytes)?;
        info!(rows = rows.len(), path = %path.display(), "Exported catalog");
        Ok(rows.len())
    }

    // --- Subscriptions ---

    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id)
    }
}
