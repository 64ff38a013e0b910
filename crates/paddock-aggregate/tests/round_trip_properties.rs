//! Round-trip bounds hold for any relation sizes

use std::sync::Arc;

use paddock_aggregate::prelude::*;
use paddock_store::MemoryStore;
use paddock_test_helpers::prelude::*;
use proptest::prelude::*;

fn runtime() -> tokio::runtime::Runtime {
    must(
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_child_types_cost_one_plus_non_empty(
        categories in 0usize..40,
        stages in 0usize..40,
        regulations in 0usize..40,
    ) {
        let store = Arc::new(MemoryStore::new());
        store.insert_hash("season:S1", [("name", "2024")]);
        seed_relation(&store, "season:S1:categories", "category", categories);
        seed_relation(&store, "season:S1:stages", "stage", stages);
        seed_relation(&store, "season:S1:regulations", "regulation", regulations);

        let aggregator = Aggregator::new(store.clone());
        let season = runtime().block_on(aggregator.parent_with_child_types(
            EntityKind::Season,
            "S1",
            EntityKind::Season.children(),
        ));
        let season = must(season);

        let non_empty = [categories, stages, regulations].iter().filter(|n| **n > 0).count();
        prop_assert_eq!(store.round_trips(), 1 + non_empty);
        prop_assert_eq!(season.children(EntityKind::Category).len(), categories);
        prop_assert_eq!(season.children(EntityKind::Stage).len(), stages);
        prop_assert_eq!(season.children(EntityKind::Regulation).len(), regulations);
    }

    #[test]
    fn test_fetch_many_is_one_round_trip(present in 1usize..60, missing in 0usize..20) {
        let store = MemoryStore::new();
        let ids = seed_relation(&store, "season:S1:stages", "stage", present);
        let mut keys: Vec<EntityKey> = ids
            .iter()
            .map(|id| EntityKey::new(EntityKind::Stage, id.as_str()))
            .collect();
        keys.extend((0..missing).map(|i| EntityKey::new(EntityKind::Stage, format!("gone-{i}"))));

        let records = must(runtime().block_on(BatchFetcher::new(&store).fetch_many(&keys)));

        prop_assert_eq!(store.round_trips(), 1);
        prop_assert_eq!(records.len(), present);
        prop_assert!(records.len() <= keys.len());
    }

    #[test]
    fn test_regulation_order_is_ascending(orders in proptest::collection::vec(proptest::option::of(-50i64..50), 0..30)) {
        let store = Arc::new(MemoryStore::new());
        store.insert_hash("season:S1", [("name", "2024")]);
        let mut members = Vec::new();
        for (i, order) in orders.iter().enumerate() {
            let id = format!("R{i}");
            match order {
                Some(order) => store.insert_hash(
                    format!("regulation:{id}"),
                    [("title", id.clone()), ("order", order.to_string())],
                ),
                None => store.insert_hash(format!("regulation:{id}"), [("title", id.clone())]),
            }
            members.push(id);
        }
        store.insert_set("season:S1:regulations", members);

        let aggregator = Aggregator::new(store.clone());
        let season = must(runtime().block_on(aggregator.parent_with_children(
            EntityKind::Season,
            "S1",
            EntityKind::Regulation,
        )));

        let sorted: Vec<i64> = season
            .children(EntityKind::Regulation)
            .iter()
            .map(|r| r.integer("order").unwrap_or(0))
            .collect();
        prop_assert_eq!(sorted.len(), orders.len());
        prop_assert!(sorted.windows(2).all(|w| w[0] <= w[1]));
    }
}
