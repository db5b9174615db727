//! Shared in-process feedback store
//!
//! One store is created at startup and handed by clone to every consumer
//! (HTTP handlers, the ingestion adapter, the table model). Each mutation bumps
//! a monotonic `version` and is broadcast to subscribers, so views re-derive
//! their state when the version they rendered is stale.

use crate::feedback::{FeedbackRecord, Status};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// What a mutation did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeKind {
    Replaced {
        count: usize,
        file_name: Option<String>,
    },
    Upserted {
        id: String,
        inserted: bool,
    },
    Removed {
        id: String,
        existed: bool,
    },
    StatusChanged {
        id: String,
        status: Status,
    },
}

/// Change notification sent to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreChange {
    pub version: u64,
    #[serde(flatten)]
    pub kind: ChangeKind,
}

/// Consistent view of the store at one version
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub records: Vec<FeedbackRecord>,
    pub file_name: Option<String>,
    pub version: u64,
}

#[derive(Debug, Default)]
struct StoreState {
    records: Vec<FeedbackRecord>,
    source_file_name: Option<String>,
    version: u64,
}

#[derive(Clone)]
pub struct FeedbackStore {
    state: Arc<RwLock<StoreState>>,
    changes: broadcast::Sender<StoreChange>,
}

impl FeedbackStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            changes,
        }
    }

    /// Receive every subsequent change
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// Snapshot of all records in display order
    pub fn get_all(&self) -> Vec<FeedbackRecord> {
        self.state.read().records.clone()
    }

    pub fn get(&self, id: &str) -> Option<FeedbackRecord> {
        self.state.read().records.iter().find(|r| r.id == id).cloned()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read();
        StoreSnapshot {
            records: state.records.clone(),
            file_name: state.source_file_name.clone(),
            version: state.version,
        }
    }

    pub fn version(&self) -> u64 {
        self.state.read().version
    }

    pub fn source_file_name(&self) -> Option<String> {
        self.state.read().source_file_name.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().records.is_empty()
    }

    /// Swap the whole list and its source file name
    ///
    /// Callers hand in a list with unique ids; a repeated id keeps only its
    /// first occurrence.
    pub fn replace_all(&self, records: Vec<FeedbackRecord>, file_name: Option<String>) -> u64 {
        let mut seen = std::collections::HashSet::with_capacity(records.len());
        let records: Vec<FeedbackRecord> = records
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect();
        let kind = ChangeKind::Replaced {
            count: records.len(),
            file_name: file_name.clone(),
        };

        self.mutate(
            |state| {
                state.records = records;
                state.source_file_name = file_name;
            },
            kind,
        )
    }

    /// Replace the record with the same id in place, or prepend it
    pub fn upsert(&self, record: FeedbackRecord) -> u64 {
        let id = record.id.clone();
        let mut state = self.state.write();
        let inserted = match state.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record;
                false
            }
            None => {
                state.records.insert(0, record);
                true
            }
        };
        self.bump(&mut state, ChangeKind::Upserted { id, inserted })
    }

    /// Remove the record if present
    pub fn remove(&self, id: &str) -> u64 {
        let mut state = self.state.write();
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        let existed = state.records.len() != before;
        self.bump(
            &mut state,
            ChangeKind::Removed {
                id: id.to_string(),
                existed,
            },
        )
    }

    /// Update a record's status; `None` removes the record
    pub fn set_status(&self, id: &str, status: Option<Status>) -> u64 {
        let Some(status) = status else {
            return self.remove(id);
        };

        let mut state = self.state.write();
        if let Some(record) = state.records.iter_mut().find(|r| r.id == id) {
            record.status = status;
        }
        self.bump(
            &mut state,
            ChangeKind::StatusChanged {
                id: id.to_string(),
                status,
            },
        )
    }

    fn mutate<F>(&self, apply: F, kind: ChangeKind) -> u64
    where
        F: FnOnce(&mut StoreState),
    {
        let mut state = self.state.write();
        apply(&mut state);
        self.bump(&mut state, kind)
    }

    // Sent while the write lock is held so subscribers see versions in order.
    fn bump(&self, state: &mut StoreState, kind: ChangeKind) -> u64 {
        state.version += 1;
        let version = state.version;
        tracing::debug!(version, records = state.records.len(), ?kind, "feedback store changed");
        // No receivers is fine
        let _ = self.changes.send(StoreChange { version, kind });
        version
    }
}

impl Default for FeedbackStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{Category, Urgency};

    fn record(id: &str, summary: &str) -> FeedbackRecord {
        FeedbackRecord::new(id, Category::Bug, summary)
    }

    fn ids(store: &FeedbackStore) -> Vec<String> {
        store.get_all().into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_starts_empty() {
        let store = FeedbackStore::new();
        assert!(store.is_empty());
        assert_eq!(store.version(), 0);
        assert_eq!(store.source_file_name(), None);
    }

    #[test]
    fn test_replace_all() {
        let store = FeedbackStore::new();
        let v = store.replace_all(
            vec![record("a", "one"), record("b", "two")],
            Some("feedback.csv".to_string()),
        );
        assert_eq!(v, 1);
        assert_eq!(ids(&store), vec!["a", "b"]);
        assert_eq!(store.source_file_name().as_deref(), Some("feedback.csv"));

        store.replace_all(vec![], None);
        assert!(store.is_empty());
        assert_eq!(store.source_file_name(), None);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn test_replace_all_drops_duplicate_ids() {
        let store = FeedbackStore::new();
        store.replace_all(vec![record("a", "one"), record("a", "again")], None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().summary, "one");
    }

    #[test]
    fn test_upsert_prepends_then_replaces() {
        let store = FeedbackStore::new();
        store.replace_all(vec![record("a", "one")], None);

        store.upsert(record("b", "two"));
        assert_eq!(ids(&store), vec!["b", "a"]);

        store.upsert(record("b", "two v1"));
        store.upsert(record("b", "two v2").with_urgency(Urgency::Critical));
        assert_eq!(ids(&store), vec!["b", "a"]);
        let b = store.get("b").unwrap();
        assert_eq!(b.summary, "two v2");
        assert_eq!(b.urgency, Urgency::Critical);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = FeedbackStore::new();
        store.replace_all(vec![record("a", "one"), record("b", "two")], None);

        let v1 = store.remove("a");
        let v2 = store.remove("a");
        assert!(v2 > v1);
        assert_eq!(ids(&store), vec!["b"]);

        store.remove("missing");
        assert_eq!(ids(&store), vec!["b"]);
    }

    #[test]
    fn test_set_status() {
        let store = FeedbackStore::new();
        store.replace_all(vec![record("a", "one")], None);

        store.set_status("a", Some(Status::Ongoing));
        store.set_status("a", Some(Status::Ongoing));
        assert_eq!(store.get("a").unwrap().status, Status::Ongoing);
        assert_eq!(store.version(), 3);
    }

    #[test]
    fn test_set_status_none_matches_remove() {
        let initial = vec![record("a", "one"), record("b", "two"), record("c", "three")];

        let removed = FeedbackStore::new();
        removed.replace_all(initial.clone(), None);
        removed.remove("b");

        let cleared = FeedbackStore::new();
        cleared.replace_all(initial, None);
        cleared.set_status("b", None);

        assert_eq!(removed.get_all(), cleared.get_all());
        assert_eq!(removed.version(), cleared.version());
    }

    #[tokio::test]
    async fn test_subscribers_see_every_version() {
        let store = FeedbackStore::new();
        let mut rx = store.subscribe();

        store.replace_all(vec![record("a", "one")], Some("f.csv".to_string()));
        store.upsert(record("b", "two"));
        store.set_status("a", None);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(
            first.kind,
            ChangeKind::Replaced {
                count: 1,
                file_name: Some("f.csv".to_string())
            }
        );

        let second = rx.recv().await.unwrap();
        assert_eq!(second.version, 2);
        assert!(matches!(second.kind, ChangeKind::Upserted { inserted: true, .. }));

        let third = rx.recv().await.unwrap();
        assert_eq!(third.version, 3);
        assert_eq!(
            third.kind,
            ChangeKind::Removed {
                id: "a".to_string(),
                existed: true
            }
        );
    }

    #[test]
    fn test_clones_share_state() {
        let store = FeedbackStore::new();
        let view = store.clone();
        store.upsert(record("a", "one"));
        assert_eq!(view.len(), 1);
        assert_eq!(view.version(), 1);
    }
}
