//! Core types for the catalog store.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Sentinel category that matches every item.
pub const ALL_CATEGORIES: &str = "All";

/// Largest id magnitude that survives a round trip through a JSON number.
pub const MAX_ITEM_ID: i64 = (1 << 53) - 1;

/// Unique identifier for an item (assigned by the store).
///
/// Persisted as a JSON number. Integer-valued floats such as `7.0` are
/// accepted on decode and written back as plain integers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Number", into = "i64")]
pub struct ItemId(pub i64);

impl ItemId {
    /// Read an id from a JSON number, if it is an integer within
    /// `±MAX_ITEM_ID`.
    pub fn from_json_number(number: &serde_json::Number) -> Option<Self> {
        let raw = match number.as_i64() {
            Some(n) => n,
            None => {
                let f = number.as_f64()?;
                if f.fract() != 0.0 || f.abs() > MAX_ITEM_ID as f64 {
                    return None;
                }
                f as i64
            }
        };
        (raw.abs() <= MAX_ITEM_ID).then_some(ItemId(raw))
    }
}

impl TryFrom<serde_json::Number> for ItemId {
    type Error = String;

    fn try_from(number: serde_json::Number) -> std::result::Result<Self, Self::Error> {
        Self::from_json_number(&number).ok_or_else(|| format!("invalid item id: {}", number))
    }
}

impl From<ItemId> for i64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Milliseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Timestamp(millis)
    }
}

/// A single catalog record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub url: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Item {
    /// Attach an id to a draft.
    pub fn from_draft(id: ItemId, draft: ItemDraft) -> Self {
        Self {
            id,
            name: draft.name,
            url: draft.url,
            description: draft.description,
            category: draft.category,
        }
    }

    /// The editable fields of this item, without its id.
    pub fn to_draft(&self) -> ItemDraft {
        ItemDraft {
            name: self.name.clone(),
            url: self.url.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
        }
    }

    /// Category text for display; empty when absent.
    pub fn category_or_empty(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

/// Input for creating a new item (before the id is assigned).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub url: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ItemDraft {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: description.into(),
            category: None,
        }
    }

    /// Set the category. Empty text leaves the draft uncategorized.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.is_empty() { None } else { Some(category) };
        self
    }

    /// Check that name, url, and description are all present.
    ///
    /// Reports the first missing field in form order.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(CatalogError::MissingRequiredField("name"));
        }
        if self.url.is_empty() {
            return Err(CatalogError::MissingRequiredField("url"));
        }
        if self.description.is_empty() {
            return Err(CatalogError::MissingRequiredField("description"));
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Validity predicate for an untyped item payload.
///
/// True iff `id` is an integer (see [`ItemId::from_json_number`]), `name`, `url` and `description`
/// are non-empty strings, and `category` is a string or absent.
pub fn is_valid_item(value: &serde_json::Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };

    let id_ok = match obj.get("id") {
        Some(serde_json::Value::Number(n)) => ItemId::from_json_number(n).is_some(),
        _ => false,
    };
    let text_ok = |key: &str| {
        obj.get(key)
            .and_then(|v| v.as_str())
            .map_or(false, |s| !s.is_empty())
    };
    let category_ok = match obj.get("category") {
        None => true,
        Some(v) => v.is_string(),
    };

    id_ok && text_ok("name") && text_ok("url") && text_ok("description") && category_ok
}

/// The full ordered set of items.
///
/// Insertion order is canonical. A collection is never edited in place;
/// the mutation functions return a new value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    items: Vec<Item>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().map(|item| item.id)
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }
}

impl From<Vec<Item>> for Collection {
    fn from(items: Vec<Item>) -> Self {
        Self { items }
    }
}

impl FromIterator<Item> for Collection {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_item_predicate() {
        assert!(is_valid_item(&json!({
            "id": 1, "name": "a", "url": "b", "description": "c"
        })));
        assert!(is_valid_item(&json!({
            "id": 1, "name": "a", "url": "b", "description": "c", "category": "x"
        })));
    }

    #[test]
    fn test_signed_and_integral_float_ids_are_valid() {
        for id in [json!(-5), json!(7.0), json!(0), json!(MAX_ITEM_ID)] {
            assert!(is_valid_item(&json!({
                "id": id, "name": "a", "url": "b", "description": "c"
            })));
        }
    }

    #[test]
    fn test_ids_beyond_json_safe_range_are_invalid() {
        let ids = [
            json!(MAX_ITEM_ID + 1),
            json!(u64::MAX),
            json!(-MAX_ITEM_ID - 1),
            json!(1e300),
        ];
        for id in ids {
            assert!(!is_valid_item(&json!({
                "id": id, "name": "a", "url": "b", "description": "c"
            })));
        }
    }

    #[test]
    fn test_float_id_decodes_as_integer() {
        let item: Item = serde_json::from_value(json!({
            "id": 7.0, "name": "a", "url": "b", "description": "c"
        }))
        .unwrap();
        assert_eq!(item.id, ItemId(7));
        assert_eq!(serde_json::to_value(&item).unwrap()["id"], json!(7));
    }

    #[test]
    fn test_invalid_item_predicate() {
        assert!(!is_valid_item(&json!("not an object")));
        assert!(!is_valid_item(&json!({"id": "1", "name": "a", "url": "b", "description": "c"})));
        assert!(!is_valid_item(&json!({"id": 1.5, "name": "a", "url": "b", "description": "c"})));
        assert!(!is_valid_item(&json!({"id": 1, "name": "", "url": "b", "description": "c"})));
        assert!(!is_valid_item(&json!({"id": 1, "name": "a", "description": "c"})));
        assert!(!is_valid_item(&json!({
            "id": 1, "name": "a", "url": "b", "description": "c", "category": null
        })));
        assert!(!is_valid_item(&json!({
            "id": 1, "name": "a", "url": "b", "description": "c", "category": 3
        })));
    }

    #[test]
    fn test_item_json_omits_absent_category() {
        let item = Item::from_draft(ItemId(7), ItemDraft::new("a", "b", "c"));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value, json!({"id": 7, "name": "a", "url": "b", "description": "c"}));
    }

    #[test]
    fn test_draft_validate_reports_first_missing() {
        let draft = ItemDraft::new("", "", "c");
        assert!(matches!(
            draft.validate(),
            Err(CatalogError::MissingRequiredField("name"))
        ));
        let draft = ItemDraft::new("a", "b", "");
        assert!(matches!(
            draft.validate(),
            Err(CatalogError::MissingRequiredField("description"))
        ));
        assert!(ItemDraft::new("a", "b", "c").is_complete());
    }

    #[test]
    fn test_with_empty_category_is_absent() {
        let draft = ItemDraft::new("a", "b", "c").with_category("");
        assert_eq!(draft.category, None);
    }
}
