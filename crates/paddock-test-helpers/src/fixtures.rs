//! Seeded stores for common test scenarios.
//!
//! Key layout follows the service: records are hashes under `{tag}:{id}`,
//! relations are sets under `{parent}:{relation}`.

use paddock_store::MemoryStore;

/// Championship `C1` with seasons `S1` and `S2`. `S1` has stages `T1` and
/// `T2`; `S2` has no children at all.
pub fn minimal_championship_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_hash("championship:C1", [("name", "Karting Cup"), ("active", "true")]);
    store.insert_set("championship:C1:seasons", ["S1", "S2"]);
    store.insert_hash("season:S1", [("name", "2024"), ("year", "2024")]);
    store.insert_hash("season:S2", [("name", "2025"), ("year", "2025")]);
    store.insert_set("season:S1:stages", ["T1", "T2"]);
    store.insert_hash("stage:T1", [("name", "Round 1"), ("round", "1")]);
    store.insert_hash("stage:T2", [("name", "Round 2"), ("round", "2")]);
    store
}

/// A fuller data set covering every kind:
///
/// - `championship:C1` with seasons `S1` (full) and `S2` (empty)
/// - `S1` with category `K1`, stages `T1` and `T2`, regulations `R1`, `R2`,
///   `R3` and an unordered `R0`
/// - race tracks `spa` and `monza` as hashes and `old-ring` as a legacy scalar
/// - user `U1` and club `K-1`
pub fn championship_store() -> MemoryStore {
    let store = minimal_championship_store();
    store.insert_hash(
        "championship:C1",
        [
            ("name", "Karting Cup"),
            ("active", "true"),
            ("published", "1"),
            ("start_date", "2024-03-01"),
            ("sponsors", r#"[{"name":"Acme Tyres"}]"#),
            ("created_at", "2024-01-10T09:30:00Z"),
        ],
    );
    store.insert_hash(
        "season:S1",
        [
            ("name", "2024"),
            ("year", "2024"),
            ("registrations_open", "false"),
            ("classification", r#"[{"pilot":"P1","points":50}]"#),
        ],
    );

    store.insert_set("season:S1:categories", ["category:K1"]);
    store.insert_hash(
        "category:K1",
        [("name", "Junior"), ("min_age", "12"), ("max_pilots", "30")],
    );

    store.insert_set("season:S1:regulations", ["R3", "R1", "R0", "R2"]);
    store.insert_hash("regulation:R3", [("title", "Parc ferme"), ("order", "3")]);
    store.insert_hash("regulation:R1", [("title", "Tyres"), ("order", "1")]);
    store.insert_hash("regulation:R0", [("title", "General")]);
    store.insert_hash("regulation:R2", [("title", "Fuel"), ("order", "2")]);

    store.insert_hash(
        "race_track:spa",
        [("name", "Spa"), ("capacity", "70000"), ("length_m", "7004")],
    );
    store.insert_hash("race_track:monza", [("name", "Monza"), ("active", "1")]);
    store.insert_scalar("race_track:old-ring", r#"{"name":"Old Ring","capacity":5000}"#);

    store.insert_hash(
        "user:U1",
        [("name", "Ana"), ("is_admin", "true"), ("roles", r#"["steward"]"#)],
    );
    store.insert_hash("club:K-1", [("name", "Kart Club"), ("members_limit", "40")]);

    store.reset_counters();
    store
}

/// Seed `count` child hashes of `child_tag` and list them in the set at
/// `relation_key`. Returns the member ids in insertion order.
pub fn seed_relation(
    store: &MemoryStore,
    relation_key: &str,
    child_tag: &str,
    count: usize,
) -> Vec<String> {
    let ids: Vec<String> = (0..count).map(|i| format!("{child_tag}-{i}")).collect();
    for id in &ids {
        store.insert_hash(format!("{child_tag}:{id}"), [("name", id.as_str())]);
    }
    store.insert_set(relation_key, ids.iter().cloned());
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_relation() {
        let store = MemoryStore::new();
        let ids = seed_relation(&store, "season:S9:stages", "stage", 3);
        assert_eq!(ids, vec!["stage-0", "stage-1", "stage-2"]);
        assert_eq!(store.round_trips(), 0);
    }

    #[test]
    fn test_championship_store_starts_with_zero_counters() {
        let store = championship_store();
        assert_eq!(store.round_trips(), 0);
        assert!(store.history().is_empty());
    }
}
