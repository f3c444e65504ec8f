//! Category facets and search predicates.

use crate::types::{Collection, Item, ALL_CATEGORIES};
use std::collections::BTreeSet;

/// A listing query: free-text term plus category facet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogQuery {
    pub term: String,
    pub category: String,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            term: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl CatalogQuery {
    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn apply(&self, collection: &Collection) -> Collection {
        filter(collection, &self.term, &self.category)
    }
}

/// Distinct, trimmed, non-empty categories in lexicographic order,
/// preceded by the `"All"` sentinel.
pub fn categories(collection: &Collection) -> Vec<String> {
    let distinct: BTreeSet<&str> = collection
        .iter()
        .filter_map(|item| item.category.as_deref())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    std::iter::once(ALL_CATEGORIES)
        .chain(distinct)
        .map(String::from)
        .collect()
}

/// Case-insensitive substring match against name, url, description and
/// category. An empty term matches everything.
pub fn matches_text(item: &Item, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    let hit = |field: &str| field.to_lowercase().contains(&needle);

    hit(&item.name)
        || hit(&item.url)
        || hit(&item.description)
        || item.category.as_deref().map_or(false, hit)
}

/// Items in the given category (exact match, or any for `"All"`) that
/// match the text term, in collection order.
pub fn filter(collection: &Collection, term: &str, category: &str) -> Collection {
    collection
        .iter()
        .filter(|item| {
            category == ALL_CATEGORIES || item.category.as_deref() == Some(category)
        })
        .filter(|item| matches_text(item, term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemDraft, ItemId};

    fn item(id: i64, name: &str, category: Option<&str>) -> Item {
        let mut draft = ItemDraft::new(name, format!("https://{}.example", id), "An assistant");
        draft.category = category.map(String::from);
        Item::from_draft(ItemId(id), draft)
    }

    fn sample() -> Collection {
        Collection::from(vec![
            item(1, "Gemini Pro", Some("Chat")),
            item(2, "Midjourney", Some("Image")),
            item(3, "Whisper", None),
            item(4, "Claude", Some(" Chat ")),
            item(5, "Copilot", Some("")),
        ])
    }

    #[test]
    fn test_categories_sorted_distinct_trimmed() {
        assert_eq!(categories(&sample()), vec!["All", "Chat", "Image"]);
    }

    #[test]
    fn test_categories_of_empty_collection() {
        assert_eq!(categories(&Collection::new()), vec!["All"]);
    }

    #[test]
    fn test_matches_text_case_insensitive() {
        let gemini = item(1, "Gemini Pro", Some("Chat"));
        assert!(matches_text(&gemini, ""));
        assert!(matches_text(&gemini, "GEMINI"));
        assert!(matches_text(&gemini, "chat"));
        assert!(matches_text(&gemini, "example"));
        assert!(!matches_text(&gemini, "image"));
    }

    #[test]
    fn test_filter_all_empty_returns_everything() {
        let collection = sample();
        assert_eq!(filter(&collection, "", ALL_CATEGORIES), collection);
    }

    #[test]
    fn test_filter_category_is_exact() {
        let result = filter(&sample(), "", "Chat");
        let ids: Vec<i64> = result.iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![1]);
        assert!(filter(&sample(), "", "chat").is_empty());
    }

    #[test]
    fn test_filter_combines_term_and_category() {
        let result = filter(&sample(), "mid", "Image");
        assert_eq!(result.len(), 1);
        assert!(filter(&sample(), "mid", "Chat").is_empty());
    }

    #[test]
    fn test_query_defaults_to_all() {
        let query = CatalogQuery::term("whisper");
        assert_eq!(query.apply(&sample()).len(), 1);
    }
}
