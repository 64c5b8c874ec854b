use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::api::todos::TodoStore;
use crate::error::{Error, Result};
use crate::model::voter::VoterId;
use crate::session::SessionHandle;

/// Per-row request flags keyed by voter id, so actions on different rows
/// never block each other. A row's own control is disabled exactly while
/// its flag is set.
#[derive(Debug, Default)]
pub struct RowFlags(HashMap<VoterId, bool>);

impl RowFlags {
    pub fn get(&self, id: &VoterId) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: &VoterId, busy: bool) {
        self.0.insert(id.clone(), busy);
    }

    pub fn clear(&mut self, id: &VoterId) {
        self.0.remove(id);
    }
}

/// Tracks which voters are on the current user's follow-up list, as seen
/// from the roster screen. The set mirrors server state: it only changes
/// after the server acknowledges an add or a confirmed deletion.
pub struct TodoMembership {
    store: Arc<dyn TodoStore>,
    session: SessionHandle,
    in_todo: HashSet<VoterId>,
    busy: RowFlags,
}

impl TodoMembership {
    pub fn new(store: Arc<dyn TodoStore>, session: SessionHandle) -> Self {
        Self {
            store,
            session,
            in_todo: HashSet::new(),
            busy: RowFlags::default(),
        }
    }

    /// True iff a todo entry exists for (current user, voter).
    pub fn contains(&self, id: &VoterId) -> bool {
        self.in_todo.contains(id)
    }

    pub fn is_busy(&self, id: &VoterId) -> bool {
        self.busy.get(id)
    }

    /// Rebuild the membership set from the server's view of the list.
    pub async fn refresh(&mut self) -> Result<()> {
        let entries = self.store.list_mine().await?;
        self.in_todo = entries.into_iter().map(|entry| entry.voter.id).collect();
        Ok(())
    }

    /// Add a voter to the list. Refuses locally, without a network call,
    /// when the session is not authenticated. Returns `Ok(false)` when the
    /// row is already mid-request and nothing was done.
    pub async fn add(&mut self, id: &VoterId) -> Result<bool> {
        if !self.session.is_authenticated() {
            return Err(Error::AuthenticationRequired);
        }
        if self.busy.get(id) {
            return Ok(false);
        }
        self.busy.set(id, true);
        let outcome = self.store.add(id).await;
        self.busy.clear(id);

        let entry = outcome?;
        self.in_todo.insert(entry.voter.id);
        Ok(true)
    }

    /// Remove a voter from the list. There is no delete-by-voter endpoint,
    /// so the entry id is resolved through `list_mine` first. The set is
    /// only updated after the deletion is confirmed.
    pub async fn remove(&mut self, id: &VoterId) -> Result<bool> {
        if self.busy.get(id) {
            return Ok(false);
        }
        self.busy.set(id, true);
        let outcome = self.remove_resolved(id).await;
        self.busy.clear(id);
        outcome
    }

    async fn remove_resolved(&mut self, id: &VoterId) -> Result<bool> {
        let entries = self.store.list_mine().await?;
        let Some(entry) = entries.into_iter().find(|entry| &entry.voter.id == id) else {
            // Someone else (another tab, the todo screen) already removed it.
            self.in_todo.remove(id);
            return Ok(false);
        };
        self.store.remove_entry(&entry.id).await?;
        self.in_todo.remove(id);
        Ok(true)
    }

    #[cfg(test)]
    pub(crate) fn force_busy(&mut self, id: &VoterId) {
        self.busy.set(id, true);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::model::session::{Role, Session};
    use crate::model::todo::{TodoEntry, TodoId};
    use crate::model::voter::Voter;

    fn voter(id: &str, serial_no: u32) -> Voter {
        Voter {
            id: VoterId::from(id),
            serial_no,
            name: format!("Voter {serial_no}"),
            guardian_name: "G".to_string(),
            house_no: "1".to_string(),
            house_name: "H".to_string(),
            gender_age: "F / 30".to_string(),
            id_card_no: format!("ID-{serial_no}"),
        }
    }

    fn entry(entry_id: &str, voter_id: &str, serial_no: u32) -> TodoEntry {
        TodoEntry {
            id: TodoId::from(entry_id),
            voter: voter(voter_id, serial_no),
            has_voted: false,
        }
    }

    /// In-memory stand-in for the remote store, recording every call.
    #[derive(Default)]
    struct FakeStore {
        entries: Mutex<Vec<TodoEntry>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeStore {
        fn with_entries(entries: Vec<TodoEntry>) -> Self {
            Self {
                entries: Mutex::new(entries),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TodoStore for FakeStore {
        async fn list_mine(&self) -> Result<Vec<TodoEntry>> {
            self.calls.lock().unwrap().push("list".to_string());
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn add(&self, voter_id: &VoterId) -> Result<TodoEntry> {
            self.calls.lock().unwrap().push(format!("add {voter_id}"));
            let new = entry(&format!("t-{voter_id}"), voter_id.as_str(), 1);
            self.entries.lock().unwrap().push(new.clone());
            Ok(new)
        }

        async fn set_voted(&self, entry_id: &TodoId, has_voted: bool) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("voted {entry_id} {has_voted}"));
            Ok(())
        }

        async fn remove_entry(&self, entry_id: &TodoId) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("remove {entry_id}"));
            self.entries.lock().unwrap().retain(|e| &e.id != entry_id);
            Ok(())
        }
    }

    fn authenticated_session() -> SessionHandle {
        let session = SessionHandle::new();
        session.resolve(Session {
            role: Some(Role::User),
            user_id: Some("u1".to_string()),
            is_authenticated: true,
        });
        session
    }

    #[tokio::test]
    async fn add_converges_membership_and_re_enables_control() {
        let store = Arc::new(FakeStore::default());
        let mut membership = TodoMembership::new(store.clone(), authenticated_session());

        let v7 = VoterId::from("v7");
        assert!(!membership.contains(&v7));
        assert!(membership.add(&v7).await.unwrap());

        assert!(membership.contains(&v7));
        assert!(!membership.is_busy(&v7));
        assert_eq!(vec!["add v7".to_string()], store.calls());
    }

    #[tokio::test]
    async fn unauthenticated_add_never_touches_the_network() {
        let store = Arc::new(FakeStore::default());
        let session = SessionHandle::new();
        session.invalidate();
        let mut membership = TodoMembership::new(store.clone(), session);

        let outcome = membership.add(&VoterId::from("v7")).await;
        assert!(matches!(outcome, Err(Error::AuthenticationRequired)));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn busy_row_ignores_duplicate_commands() {
        let store = Arc::new(FakeStore::default());
        let mut membership = TodoMembership::new(store.clone(), authenticated_session());

        let v1 = VoterId::from("v1");
        membership.force_busy(&v1);
        assert!(!membership.add(&v1).await.unwrap());
        assert!(!membership.remove(&v1).await.unwrap());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn busy_row_does_not_block_other_rows() {
        let store = Arc::new(FakeStore::default());
        let mut membership = TodoMembership::new(store.clone(), authenticated_session());

        let v1 = VoterId::from("v1");
        let v2 = VoterId::from("v2");
        membership.force_busy(&v1);

        assert!(membership.add(&v2).await.unwrap());
        assert!(membership.contains(&v2));
        assert!(membership.is_busy(&v1), "the other row stays disabled");
        assert_eq!(vec!["add v2".to_string()], store.calls());
    }

    #[tokio::test]
    async fn remove_resolves_entry_id_then_deletes() {
        let store = Arc::new(FakeStore::with_entries(vec![
            entry("t1", "v1", 1),
            entry("t2", "v2", 2),
        ]));
        let mut membership = TodoMembership::new(store.clone(), authenticated_session());
        membership.refresh().await.unwrap();
        assert!(membership.contains(&VoterId::from("v2")));

        assert!(membership.remove(&VoterId::from("v2")).await.unwrap());
        assert!(!membership.contains(&VoterId::from("v2")));
        assert_eq!(
            vec!["list".to_string(), "list".to_string(), "remove t2".to_string()],
            store.calls()
        );
    }

    #[tokio::test]
    async fn remove_of_absent_voter_is_a_clean_miss() {
        let store = Arc::new(FakeStore::default());
        let mut membership = TodoMembership::new(store.clone(), authenticated_session());

        assert!(!membership.remove(&VoterId::from("ghost")).await.unwrap());
        assert_eq!(vec!["list".to_string()], store.calls());
    }
}
