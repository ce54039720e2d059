//! Keyed set reconciliation.
//!
//! Compares what is stored against what is proposed and produces the edit script that
//! converges one onto the other. Pure: nothing here touches the database. The order
//! reconciler applies the script inside a transaction.

use std::collections::BTreeMap;

/// Edits needed to turn the current collection into the proposed one.
///
/// `K` is the key both sides are matched on, `C` a current entry and `P` a proposed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditScript<K, C, P> {
    /// Proposed entries with no current counterpart, in proposal order
    pub inserts: Vec<(K, P)>,
    /// Current entries paired with their replacement, in proposal order
    pub updates: Vec<(C, P)>,
    /// Current entries missing from the proposal, in key order
    pub deletes: Vec<C>,
}

impl<K, C, P> EditScript<K, C, P> {
    /// True when applying the script changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// Plans the edits that make `current` match `proposed`.
///
/// Every proposed key that already exists becomes an update (even if the value is the same),
/// every new key an insert, and every current key not proposed a delete. Proposed keys are
/// expected to be distinct; a repeated key after the first is planned as an insert.
pub fn plan<K, C, P>(
    current: impl IntoIterator<Item = (K, C)>,
    proposed: impl IntoIterator<Item = (K, P)>,
) -> EditScript<K, C, P>
where
    K: Ord,
{
    let mut remaining: BTreeMap<K, C> = current.into_iter().collect();
    let mut inserts = Vec::new();
    let mut updates = Vec::new();

    for (key, value) in proposed {
        match remaining.remove(&key) {
            Some(existing) => updates.push((existing, value)),
            None => inserts.push((key, value)),
        }
    }

    EditScript {
        inserts,
        updates,
        deletes: remaining.into_values().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_insert_update_delete() {
        let current = [(1, "a"), (2, "b"), (3, "c")];
        let proposed = [(3, 30), (4, 40), (1, 10)];

        let script = plan(current, proposed);

        assert_eq!(script.inserts, vec![(4, 40)]);
        assert_eq!(script.updates, vec![("c", 30), ("a", 10)]);
        assert_eq!(script.deletes, vec!["b"]);
    }

    #[test]
    fn test_plan_from_empty() {
        let script = plan(Vec::<(i64, ())>::new(), [(1, 5), (2, 6)]);
        assert_eq!(script.inserts, vec![(1, 5), (2, 6)]);
        assert!(script.updates.is_empty());
        assert!(script.deletes.is_empty());
    }

    #[test]
    fn test_plan_to_empty_deletes_everything() {
        let script = plan([(2, "b"), (1, "a")], Vec::<(i32, ())>::new());
        assert!(script.inserts.is_empty());
        assert!(script.updates.is_empty());
        assert_eq!(script.deletes, vec!["a", "b"]);
    }

    #[test]
    fn test_same_keys_are_all_updates() {
        let script = plan([(1, 1), (2, 2)], [(1, 1), (2, 2)]);
        assert_eq!(script.updates, vec![(1, 1), (2, 2)]);
        assert!(script.inserts.is_empty());
        assert!(script.deletes.is_empty());
        assert!(!script.is_empty());
    }

    #[test]
    fn test_empty_script() {
        let script = plan(Vec::<(u8, ())>::new(), Vec::<(u8, ())>::new());
        assert!(script.is_empty());
    }
}
