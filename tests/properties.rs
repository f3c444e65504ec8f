//! Property tests for catalog invariants.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use toolshed::{
    add_many, add_one, categories, delete_one, filter, is_valid_item, update_one, Collection,
    IdAllocator, Item, ItemDraft, ItemId, MemorySlot, Persistence, ALL_CATEGORIES,
};

#[derive(Clone, Debug)]
enum Op {
    AddOne(ItemDraft),
    AddMany(Vec<ItemDraft>),
    Update(usize, String),
    Delete(usize),
}

fn draft_strategy() -> impl Strategy<Value = ItemDraft> {
    (
        "[a-zA-Z ]{1,12}",
        "[a-z]{1,8}",
        "[a-zA-Z ]{1,20}",
        proptest::option::of(prop_oneof!["Chat", "Image", "Audio", " Chat", "Dev"]),
    )
        .prop_map(|(name, host, description, category)| {
            let mut draft = ItemDraft::new(name, format!("https://{}.test", host), description);
            draft.category = category.map(String::from);
            draft
        })
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        draft_strategy().prop_map(Op::AddOne),
        prop::collection::vec(draft_strategy(), 0..5).prop_map(Op::AddMany),
        (any::<usize>(), "[a-z]{1,6}").prop_map(|(i, n)| Op::Update(i, n)),
        any::<usize>().prop_map(Op::Delete),
    ]
}

fn apply(collection: &Collection, op: Op, ids: &IdAllocator) -> Collection {
    match op {
        Op::AddOne(draft) => add_one(collection, draft, ids),
        Op::AddMany(drafts) => add_many(collection, drafts, ids),
        Op::Update(i, name) if !collection.is_empty() => {
            let mut item = collection.items()[i % collection.len()].clone();
            item.name = name;
            update_one(collection, item)
        }
        Op::Delete(i) if !collection.is_empty() => {
            let id = collection.items()[i % collection.len()].id;
            delete_one(collection, id)
        }
        _ => collection.clone(),
    }
}

/// Stored elements, a mix of well-formed items and near misses.
fn stored_element_strategy() -> impl Strategy<Value = Value> {
    let id = prop_oneof![
        (-20i64..20).prop_map(|n| json!(n)),
        (0u8..20).prop_map(|n| json!(f64::from(n))),
        Just(json!(1.5)),
        Just(json!("3")),
        Just(json!(u64::MAX)),
    ];
    let text = prop_oneof![Just(json!("x")), Just(json!("")), Just(json!(4)), Just(Value::Null)];
    let category = prop_oneof![
        Just(None),
        Just(Some(json!("Chat"))),
        Just(Some(Value::Null)),
        Just(Some(json!(["Chat"]))),
    ];

    prop_oneof![
        4 => (id, text.clone(), text, category).prop_map(|(id, name, url, category)| {
            let mut obj = json!({"id": id, "name": name, "url": url, "description": "d"});
            if let Some(category) = category {
                obj["category"] = category;
            }
            obj
        }),
        1 => Just(json!(42)),
        1 => Just(json!("tool")),
        1 => Just(Value::Null),
    ]
}

fn build(drafts: Vec<ItemDraft>) -> Collection {
    add_many(&Collection::new(), drafts, &IdAllocator::new())
}

proptest! {
    #[test]
    fn ids_stay_distinct(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let ids = IdAllocator::new();
        let mut collection = Collection::new();
        for op in ops {
            collection = apply(&collection, op, &ids);
            let distinct: HashSet<_> = collection.iter().map(|i| i.id).collect();
            prop_assert_eq!(distinct.len(), collection.len());
        }
    }

    #[test]
    fn save_then_load_roundtrips(drafts in prop::collection::vec(draft_strategy(), 0..20)) {
        let collection = build(drafts);
        let persistence = Persistence::new(Arc::new(MemorySlot::new()));

        persistence.save(&collection);
        prop_assert_eq!(persistence.load(), collection);
    }

    #[test]
    fn load_never_panics_on_garbage(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let persistence = Persistence::new(Arc::new(MemorySlot::with_bytes(bytes)));
        let collection = persistence.load();
        prop_assert!(collection.len() <= 64);
    }

    #[test]
    fn load_keeps_valid_elements_in_order(
        elements in prop::collection::vec(stored_element_strategy(), 0..24),
    ) {
        let payload = serde_json::to_vec(&elements).unwrap();
        let persistence = Persistence::new(Arc::new(MemorySlot::with_bytes(payload)));
        let collection = persistence.load();

        for item in collection.iter() {
            prop_assert!(is_valid_item(&serde_json::to_value(item).unwrap()));
        }

        let mut seen = HashSet::new();
        let expected: Vec<ItemId> = elements
            .iter()
            .filter(|e| is_valid_item(e))
            .filter_map(|e| serde_json::from_value::<Item>(e.clone()).ok())
            .map(|item| item.id)
            .filter(|id| seen.insert(*id))
            .collect();
        let kept: Vec<ItemId> = collection.iter().map(|i| i.id).collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn unfiltered_view_is_whole_collection(drafts in prop::collection::vec(draft_strategy(), 0..20)) {
        let collection = build(drafts);
        prop_assert_eq!(filter(&collection, "", ALL_CATEGORIES), collection);
    }

    #[test]
    fn filter_is_idempotent(
        drafts in prop::collection::vec(draft_strategy(), 0..20),
        term in "[a-z]{0,3}",
        category in prop_oneof!["All", "Chat", "Image", " Chat"],
    ) {
        let collection = build(drafts);
        let once = filter(&collection, &term, &category);
        let twice = filter(&once, &term, &category);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn categories_sorted_and_distinct(drafts in prop::collection::vec(draft_strategy(), 0..20)) {
        let facets = categories(&build(drafts));
        prop_assert_eq!(facets[0].as_str(), ALL_CATEGORIES);

        let rest = &facets[1..];
        let distinct: HashSet<_> = rest.iter().collect();
        prop_assert_eq!(distinct.len(), rest.len());
        prop_assert!(rest.windows(2).all(|w| w[0] < w[1]));
    }
}
