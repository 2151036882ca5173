//! Property-based tests for FrozenMap.
//!
//! These tests verify that FrozenMap satisfies the expected persistent-map
//! laws using proptest.

use frozenmap::persistent::FrozenMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Get-Insert Laws
// =============================================================================

proptest! {
    /// Law: get after insert returns the inserted value.
    /// map.insert(key, value).get(&key) == Some(&value)
    #[test]
    fn prop_get_insert_law(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..20),
        key: i32,
        value: i32
    ) {
        let map: FrozenMap<i32, i32> = entries.into_iter().collect();
        let updated = map.insert(key, value);
        prop_assert_eq!(updated.get(&key), Some(&value));
    }

    /// Law: insert does not affect other keys.
    /// key1 != key2 => map.insert(key1, value).get(&key2) == map.get(&key2)
    #[test]
    fn prop_get_insert_other_law(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..20),
        key1: i32,
        key2: i32,
        value: i32
    ) {
        prop_assume!(key1 != key2);
        let map: FrozenMap<i32, i32> = entries.into_iter().collect();
        let updated = map.insert(key1, value);
        prop_assert_eq!(updated.get(&key2), map.get(&key2));
    }

    /// Law: try_get agrees with get on present keys and fails on absent ones.
    #[test]
    fn prop_try_get_consistent_with_get(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..20),
        key: i32
    ) {
        let map: FrozenMap<i32, i32> = entries.into_iter().collect();
        match map.get(&key) {
            Some(value) => prop_assert_eq!(map.try_get(&key), Ok(value)),
            None => prop_assert!(map.try_get(&key).is_err()),
        }
    }
}

// =============================================================================
// Length Laws
// =============================================================================

proptest! {
    /// Law: insert of a new key increases length by 1.
    /// !map.contains_key(&key) => map.insert(key, value).len() == map.len() + 1
    #[test]
    fn prop_insert_length_new_key(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..20),
        key: i32,
        value: i32
    ) {
        let map: FrozenMap<i32, i32> = entries.into_iter().collect();
        if !map.contains_key(&key) {
            let updated = map.insert(key, value);
            prop_assert_eq!(updated.len(), map.len() + 1);
        }
    }

    /// Law: overwriting an existing key leaves the length unchanged.
    #[test]
    fn prop_insert_length_existing_key(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 1..20),
        value: i32
    ) {
        let map: FrozenMap<i32, i32> = entries.clone().into_iter().collect();
        if let Some((key, _)) = entries.first() {
            let updated = map.insert(*key, value);
            prop_assert_eq!(updated.len(), map.len());
            prop_assert_eq!(updated.get(key), Some(&value));
        }
    }

    /// Law: length equals the number of distinct keys inserted.
    #[test]
    fn prop_length_counts_distinct_keys(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..30)
    ) {
        let map: FrozenMap<i32, i32> = entries.clone().into_iter().collect();
        let distinct: std::collections::BTreeSet<i32> =
            entries.iter().map(|(key, _)| *key).collect();
        prop_assert_eq!(map.len(), distinct.len());
    }
}

// =============================================================================
// Ordering Laws
// =============================================================================

proptest! {
    /// Law: keys() yields a strictly ascending sequence for any insertion
    /// order.
    #[test]
    fn prop_keys_strictly_ascending(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..30)
    ) {
        let map: FrozenMap<i32, i32> = entries.into_iter().collect();
        let keys: Vec<i32> = map.keys().copied().collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Law: maps built from the same entries in different orders are equal.
    #[test]
    fn prop_insertion_order_irrelevant(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..20)
    ) {
        // Reversing changes which write wins on duplicate keys, so dedup
        // by key first.
        let deduped: BTreeMap<i32, i32> = entries.into_iter().collect();
        let pairs: Vec<(i32, i32)> = deduped.into_iter().collect();
        let reversed: FrozenMap<i32, i32> = pairs.iter().rev().copied().collect();
        let ordered: FrozenMap<i32, i32> = pairs.into_iter().collect();
        prop_assert_eq!(reversed, ordered);
    }
}

// =============================================================================
// Persistence Laws
// =============================================================================

proptest! {
    /// Law: inserting into a map leaves every observation on the original
    /// unchanged.
    #[test]
    fn prop_insert_preserves_original(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..20),
        key: i32,
        value: i32
    ) {
        let map: FrozenMap<i32, i32> = entries.into_iter().collect();
        let length_before = map.len();
        let entries_before: Vec<(i32, i32)> =
            map.iter().map(|(key, value)| (*key, *value)).collect();

        let updated = map.insert(key, value);

        prop_assert_eq!(map.len(), length_before);
        let entries_after: Vec<(i32, i32)> =
            map.iter().map(|(key, value)| (*key, *value)).collect();
        prop_assert_eq!(entries_before, entries_after);
        prop_assert_eq!(updated.get(&key), Some(&value));
    }
}

// =============================================================================
// Model Laws
// =============================================================================

proptest! {
    /// Law: FrozenMap observes the same entries as a std BTreeMap fed the
    /// same insert sequence.
    #[test]
    fn prop_matches_btreemap_model(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..40)
    ) {
        let map: FrozenMap<i32, i32> = entries.clone().into_iter().collect();
        let model: BTreeMap<i32, i32> = entries.into_iter().collect();

        prop_assert_eq!(map.len(), model.len());
        let map_entries: Vec<(i32, i32)> =
            map.iter().map(|(key, value)| (*key, *value)).collect();
        let model_entries: Vec<(i32, i32)> = model.into_iter().collect();
        prop_assert_eq!(map_entries, model_entries);
    }
}
