//! Urgent issue list with bulk completion

use crate::analytics::urgent_issues;
use crate::feedback::FeedbackRecord;
use crate::store::FeedbackStore;
use std::collections::BTreeSet;

pub struct UrgentIssues {
    store: FeedbackStore,
    selected: BTreeSet<String>,
}

impl UrgentIssues {
    pub fn new(store: FeedbackStore) -> Self {
        Self {
            store,
            selected: BTreeSet::new(),
        }
    }

    /// Critical and high records currently in the store
    pub fn issues(&self) -> Vec<FeedbackRecord> {
        urgent_issues(&self.store.get_all())
    }

    /// Flip selection of `id`; returns whether it is now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Complete every selected issue
    ///
    /// Completed urgent issues leave the working list, so each one goes
    /// through `set_status(id, None)`. Returns how many records were removed.
    pub fn mark_selected_complete(&mut self) -> usize {
        let mut removed = 0;
        for id in std::mem::take(&mut self.selected) {
            if self.store.get(&id).is_some() {
                removed += 1;
            }
            self.store.set_status(&id, None);
        }
        tracing::info!("Marked {} urgent issues complete", removed);
        removed
    }
}
