//! Collapsing repeated records
//!
//! The same suggestion is often filed more than once. Records are keyed and
//! inserted in input order; a later record replaces an earlier one with the
//! same key but keeps the slot where that key first appeared.

use std::collections::HashMap;
use std::hash::Hash;

/// Deduplicates records by key, last write wins
pub fn dedupe_by<T, K, F>(records: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::new();

    for record in records {
        let k = key(&record);
        match slots.get(&k) {
            Some(&slot) => out[slot] = record,
            None => {
                slots.insert(k, out.len());
                out.push(record);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn later_record_wins() {
        let records = vec![("a", 1), ("b", 2), ("a", 3)];
        let deduped = dedupe_by(records, |r| r.0);

        assert_eq!(deduped, vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn empty_input() {
        let deduped: Vec<(u8, u8)> = dedupe_by(Vec::new(), |r: &(u8, u8)| r.0);
        assert!(deduped.is_empty());
    }

    #[test]
    fn distinct_keys_preserve_order() {
        let deduped = dedupe_by(vec![3, 1, 2], |r| *r);
        assert_eq!(deduped, vec![3, 1, 2]);
    }

    proptest! {
        #[test]
        fn dedupe_is_idempotent(records in prop::collection::vec((0u8..8, any::<u16>()), 0..50)) {
            let once = dedupe_by(records, |r| r.0);
            let twice = dedupe_by(once.clone(), |r| r.0);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn keys_are_unique(records in prop::collection::vec((0u8..8, any::<u16>()), 0..50)) {
            let deduped = dedupe_by(records, |r| r.0);
            let mut keys: Vec<u8> = deduped.iter().map(|r| r.0).collect();
            let len = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), len);
        }
    }
}
