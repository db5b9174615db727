//! Editable feedback table
//!
//! Holds at most one draft. Every change reaches the records through the
//! shared store, so other views pick it up from the store's change feed.

use crate::core::error::{Error, Result};
use crate::feedback::{Category, FeedbackRecord};
use crate::store::FeedbackStore;
use chrono::{DateTime, Utc};

pub const NEW_RECORD_SUMMARY: &str = "New manually added feedback";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Viewing,
    Editing { id: String, draft: FeedbackRecord },
}

pub struct EditableTable {
    store: FeedbackStore,
    state: EditState,
}

impl EditableTable {
    pub fn new(store: FeedbackStore) -> Self {
        Self {
            store,
            state: EditState::Viewing,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    pub fn draft(&self) -> Option<&FeedbackRecord> {
        match &self.state {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Viewing => None,
        }
    }

    /// Rows as currently stored
    pub fn rows(&self) -> Vec<FeedbackRecord> {
        self.store.get_all()
    }

    /// Start editing `id`, dropping any other unsaved draft
    pub fn begin_edit(&mut self, id: &str) -> Result<()> {
        let record = self
            .store
            .get(id)
            .ok_or_else(|| Error::NotFound { id: id.to_string() })?;
        if let EditState::Editing { id: previous, .. } = &self.state {
            if previous != id {
                tracing::debug!("Discarding unsaved draft for {}", previous);
            }
        }
        self.state = EditState::Editing {
            id: id.to_string(),
            draft: record,
        };
        Ok(())
    }

    /// Apply `change` to the draft; no-op while viewing
    pub fn update_draft<F>(&mut self, change: F)
    where
        F: FnOnce(&mut FeedbackRecord),
    {
        if let EditState::Editing { draft, .. } = &mut self.state {
            change(draft);
        }
    }

    /// Upsert the draft and return to viewing
    ///
    /// Returns the new store version, or `None` when nothing was being
    /// edited. A draft with a blank summary is rejected and kept.
    pub fn save(&mut self) -> Result<Option<u64>> {
        let EditState::Editing { draft, .. } = &self.state else {
            return Ok(None);
        };
        draft.validate().map_err(Error::invalid_request)?;

        let draft = draft.clone();
        self.state = EditState::Viewing;
        Ok(Some(self.store.upsert(draft)))
    }

    pub fn cancel(&mut self) {
        self.state = EditState::Viewing;
    }

    /// Remove `id` when `confirm` agrees
    ///
    /// Returns whether the record was deleted.
    pub fn delete<F>(&mut self, id: &str, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(id) {
            return false;
        }
        if matches!(&self.state, EditState::Editing { id: editing, .. } if editing == id) {
            self.state = EditState::Viewing;
        }
        self.store.remove(id);
        true
    }

    /// Prepend a placeholder record and start editing it
    pub fn add_new(&mut self, now: DateTime<Utc>) -> String {
        let id = format!("manual-{}", now.timestamp_millis());
        let record = FeedbackRecord::new(id.clone(), Category::Other, NEW_RECORD_SUMMARY)
            .with_date(now.to_rfc3339());
        self.store.upsert(record.clone());
        self.state = EditState::Editing {
            id: id.clone(),
            draft: record,
        };
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{Impact, Status, Urgency};
    use chrono::TimeZone;

    fn seeded() -> (FeedbackStore, EditableTable) {
        let store = FeedbackStore::new();
        store.replace_all(
            vec![
                FeedbackRecord::new("#BUG-001", Category::Bug, "Login crash"),
                FeedbackRecord::new("#FR-001", Category::Feature, "Dark mode"),
            ],
            Some("feedback.csv".to_string()),
        );
        let table = EditableTable::new(store.clone());
        (store, table)
    }

    #[test]
    fn test_edit_and_save() {
        let (store, mut table) = seeded();
        table.begin_edit("#FR-001").unwrap();
        table.update_draft(|d| d.urgency = Urgency::High);

        // not visible until saved
        assert_eq!(store.get("#FR-001").unwrap().urgency, Urgency::Medium);

        let before = store.version();
        assert_eq!(table.save().unwrap(), Some(before + 1));
        assert!(!table.is_editing());
        assert_eq!(store.get("#FR-001").unwrap().urgency, Urgency::High);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_cancel_discards_draft() {
        let (store, mut table) = seeded();
        table.begin_edit("#BUG-001").unwrap();
        table.update_draft(|d| d.summary = "changed".to_string());
        table.cancel();

        assert_eq!(table.state(), &EditState::Viewing);
        assert_eq!(store.get("#BUG-001").unwrap().summary, "Login crash");
        assert_eq!(table.save().unwrap(), None);
    }

    #[test]
    fn test_begin_edit_switches_draft() {
        let (store, mut table) = seeded();
        table.begin_edit("#BUG-001").unwrap();
        table.update_draft(|d| d.summary = "lost".to_string());
        table.begin_edit("#FR-001").unwrap();
        table.save().unwrap();

        assert_eq!(store.get("#BUG-001").unwrap().summary, "Login crash");
        assert!(table.begin_edit("#NOPE").is_err());
    }

    #[test]
    fn test_blank_summary_rejected() {
        let (store, mut table) = seeded();
        table.begin_edit("#BUG-001").unwrap();
        table.update_draft(|d| d.summary = "   ".to_string());

        let err = table.save().unwrap_err();
        assert!(matches!(err, Error::InvalidRequest { .. }));
        assert!(table.is_editing());
        assert_eq!(store.get("#BUG-001").unwrap().summary, "Login crash");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (store, mut table) = seeded();
        assert!(!table.delete("#BUG-001", |_| false));
        assert_eq!(store.len(), 2);

        table.begin_edit("#BUG-001").unwrap();
        assert!(table.delete("#BUG-001", |id| id == "#BUG-001"));
        assert_eq!(store.len(), 1);
        assert!(!table.is_editing());
    }

    #[test]
    fn test_add_new() {
        let (store, mut table) = seeded();
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let id = table.add_new(now);

        assert_eq!(id, "manual-1700000000123");
        let rows = table.rows();
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].summary, NEW_RECORD_SUMMARY);
        assert_eq!(rows[0].category, Category::Other);
        assert_eq!(rows[0].urgency, Urgency::Medium);
        assert_eq!(rows[0].impact, Impact::Medium);
        assert_eq!(rows[0].status, Status::NotStarted);
        assert_eq!(store.len(), 3);
        assert_eq!(table.draft().map(|d| d.id.as_str()), Some(id.as_str()));
    }
}
