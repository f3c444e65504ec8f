//! Subscription types for catalog updates.

use crate::types::ItemId;
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 256
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256,
            filter: SubscriptionFilter::all(),
        }
    }
}

/// Which event kinds a subscriber wants.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Single-item add, update, and delete.
    pub include_edits: bool,

    /// Bulk imports.
    pub include_imports: bool,

    /// Reloads from the durable slot.
    pub include_reloads: bool,
}

impl SubscriptionFilter {
    pub fn edits() -> Self {
        Self {
            include_edits: true,
            ..Default::default()
        }
    }

    pub fn imports() -> Self {
        Self {
            include_imports: true,
            ..Default::default()
        }
    }

    pub fn all() -> Self {
        Self {
            include_edits: true,
            include_imports: true,
            include_reloads: true,
        }
    }

    pub(crate) fn matches(&self, event: &CatalogEvent) -> bool {
        match event {
            CatalogEvent::Added { .. }
            | CatalogEvent::Updated { .. }
            | CatalogEvent::Deleted { .. } => self.include_edits,
            CatalogEvent::Imported { .. } => self.include_imports,
            CatalogEvent::Reloaded { .. } => self.include_reloads,
            CatalogEvent::Dropped { .. } => true,
        }
    }
}

/// Events emitted after the catalog snapshot changes.
///
/// `len` is the collection size after the change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// Items were added interactively.
    Added { ids: Vec<ItemId>, len: usize },

    /// An item was replaced in place.
    Updated { id: ItemId, len: usize },

    /// An item was removed.
    Deleted { id: ItemId, len: usize },

    /// A bulk import was applied.
    Imported {
        ids: Vec<ItemId>,
        rejected: usize,
        len: usize,
    },

    /// The snapshot was re-read from the durable slot.
    Reloaded { len: usize },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<CatalogEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<CatalogEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<CatalogEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<CatalogEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
