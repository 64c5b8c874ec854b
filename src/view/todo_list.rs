use std::sync::Arc;

use crate::api::todos::TodoStore;
use crate::error::Error;
use crate::model::todo::{TodoEntry, TodoId};
use crate::session::SessionHandle;

/// The follow-up list screen: every entry the current user has saved, a
/// has-voted checkbox per entry, and a progress line. Every mutation
/// round-trips to the server and re-fetches the list, so two tabs looking
/// at the same account converge.
pub struct TodoListView {
    store: Arc<dyn TodoStore>,
    session: SessionHandle,
    entries: Vec<TodoEntry>,
    error: Option<String>,
}

impl TodoListView {
    pub fn new(store: Arc<dyn TodoStore>, session: SessionHandle) -> Self {
        Self {
            store,
            session,
            entries: Vec::new(),
            error: None,
        }
    }

    pub fn entries(&self) -> &[TodoEntry] {
        &self.entries
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// (voted, total) across the list.
    pub fn progress(&self) -> (usize, usize) {
        let voted = self.entries.iter().filter(|entry| entry.has_voted).count();
        (voted, self.entries.len())
    }

    /// Whole-percent completion; an empty list counts as 0%.
    pub fn progress_percent(&self) -> u8 {
        let (voted, total) = self.progress();
        if total == 0 {
            return 0;
        }
        ((voted * 100) / total) as u8
    }

    /// Re-fetch the list. An unauthenticated session is told to log in
    /// without a network call.
    pub async fn refresh(&mut self) {
        if !self.session.is_authenticated() {
            self.error = Some("Please log in to view your todo list.".to_string());
            return;
        }
        match self.store.list_mine().await {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(err) => {
                self.error = Some(err.display_message("Failed to fetch todo list"));
            }
        }
    }

    /// Flip the has-voted flag for one entry. The request always goes out,
    /// and the list is re-fetched so the server stays authoritative.
    pub async fn toggle_voted(&mut self, entry_id: &TodoId) {
        let Some(entry) = self.entries.iter().find(|entry| &entry.id == entry_id) else {
            return;
        };
        let outcome = self.store.set_voted(entry_id, !entry.has_voted).await;
        self.apply_mutation(outcome, "Failed to update voting status")
            .await;
    }

    /// Remove an entry outright.
    pub async fn remove_entry(&mut self, entry_id: &TodoId) {
        let outcome = self.store.remove_entry(entry_id).await;
        self.apply_mutation(outcome, "Failed to delete todo").await;
    }

    async fn apply_mutation(&mut self, outcome: Result<(), Error>, fallback: &str) {
        match outcome {
            Ok(()) => self.refresh().await,
            Err(err) => self.error = Some(err.display_message(fallback)),
        }
    }
}
