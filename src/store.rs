//! Question set persistence boundary.
//!
//! The durable backend is an external collaborator; the library only pins
//! its contract: sets are stored whole (the aggregate owns its questions,
//! so deletion cascades for free), looked up by an opaque identifier, and
//! listed newest-first. [`MemoryStore`] is the in-process reference
//! implementation used by the CLI and by tests; a database-backed
//! implementation slots in behind the same trait.

use crate::model::QuestionSet;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Storage contract for persisted question sets.
pub trait QuestionSetStore: Send + Sync {
    /// Persist the set, assigning and returning its identifier.
    fn save(&self, set: QuestionSet) -> u64;

    /// Fetch one set by identifier.
    fn get(&self, id: u64) -> Option<QuestionSet>;

    /// All sets, newest-first by creation time (identifier as tie-break).
    fn history(&self) -> Vec<QuestionSet>;

    /// Delete one set and, with it, every question it owns.
    /// Returns whether anything was deleted.
    fn delete(&self, id: u64) -> bool;
}

/// In-memory store: a lock around a map plus a monotonic id counter.
#[derive(Default)]
pub struct MemoryStore {
    sets: RwLock<HashMap<u64, QuestionSet>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            sets: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl QuestionSetStore for MemoryStore {
    fn save(&self, mut set: QuestionSet) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        set.id = id;
        self.sets
            .write()
            .expect("store lock poisoned")
            .insert(id, set);
        id
    }

    fn get(&self, id: u64) -> Option<QuestionSet> {
        self.sets
            .read()
            .expect("store lock poisoned")
            .get(&id)
            .cloned()
    }

    fn history(&self) -> Vec<QuestionSet> {
        let mut all: Vec<QuestionSet> = self
            .sets
            .read()
            .expect("store lock poisoned")
            .values()
            .cloned()
            .collect();
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        all
    }

    fn delete(&self, id: u64) -> bool {
        self.sets
            .write()
            .expect("store lock poisoned")
            .remove(&id)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use chrono::{Duration, Utc};

    fn set_with(title: &str) -> QuestionSet {
        let mut s = QuestionSet::new(title);
        s.add_question(Question::general("q"));
        s
    }

    #[test]
    fn save_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let a = store.save(set_with("a"));
        let b = store.save(set_with("b"));
        assert!(b > a);
        assert_eq!(store.get(a).unwrap().title, "a");
        assert_eq!(store.get(a).unwrap().id, a);
    }

    #[test]
    fn get_unknown_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(999).is_none());
    }

    #[test]
    fn history_is_newest_first() {
        let store = MemoryStore::new();
        let mut older = set_with("older");
        older.created_at = Utc::now() - Duration::hours(2);
        let mut newer = set_with("newer");
        newer.created_at = Utc::now();
        store.save(older);
        store.save(newer);

        let titles: Vec<_> = store.history().into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[test]
    fn history_breaks_timestamp_ties_by_id() {
        let store = MemoryStore::new();
        let stamp = Utc::now();
        for title in ["first", "second"] {
            let mut s = set_with(title);
            s.created_at = stamp;
            store.save(s);
        }
        let titles: Vec<_> = store.history().into_iter().map(|s| s.title).collect();
        // Later save (higher id) wins the tie.
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[test]
    fn delete_cascades_and_reports() {
        let store = MemoryStore::new();
        let id = store.save(set_with("doomed"));
        assert!(store.delete(id));
        assert!(store.get(id).is_none());
        assert!(!store.delete(id));
    }
}
