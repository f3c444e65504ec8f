//! Add, update, and delete over whole-collection snapshots.

use super::IdAllocator;
use crate::types::{Collection, Item, ItemDraft, ItemId};

/// Append one draft with a fresh id.
///
/// No validation happens here; the interactive path and the import mapper
/// check required fields before calling.
pub fn add_one(collection: &Collection, draft: ItemDraft, ids: &IdAllocator) -> Collection {
    let id = ids.next_id();
    collection
        .iter()
        .cloned()
        .chain(std::iter::once(Item::from_draft(id, draft)))
        .collect()
}

/// Append a batch of drafts in input order, each with a distinct fresh id.
pub fn add_many(collection: &Collection, drafts: Vec<ItemDraft>, ids: &IdAllocator) -> Collection {
    let fresh = ids.next_batch(drafts.len());
    collection
        .iter()
        .cloned()
        .chain(
            fresh
                .into_iter()
                .zip(drafts)
                .map(|(id, draft)| Item::from_draft(id, draft)),
        )
        .collect()
}

/// Replace the item sharing `updated.id`, keeping its position.
///
/// An unknown id leaves the collection unchanged.
pub fn update_one(collection: &Collection, updated: Item) -> Collection {
    collection
        .iter()
        .map(|item| {
            if item.id == updated.id {
                updated.clone()
            } else {
                item.clone()
            }
        })
        .collect()
}

/// Remove the item with `id`, if present.
pub fn delete_one(collection: &Collection, id: ItemId) -> Collection {
    collection
        .iter()
        .filter(|item| item.id != id)
        .cloned()
        .collect()
}
