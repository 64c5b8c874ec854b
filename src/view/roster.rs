use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::api::voters::VoterRegistry;
use crate::config::Config;
use crate::error::Error;
use crate::model::query::{Pagination, RosterQuery, SortField, VoterPage};
use crate::model::voter::{Voter, VoterDraft, VoterId};
use crate::session::SessionHandle;
use crate::view::banner::{Notice, StatusBanner};
use crate::view::membership::TodoMembership;

/// Where the roster stands with respect to the server. Re-entered on every
/// parameter change and after every completed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Which flavour of "nothing to show" applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyRoster {
    /// The registry itself is empty: "Start by adding your first voter."
    NoVoters,
    /// The committed search term matched nothing: "Try adjusting your
    /// search terms."
    NoMatches,
}

/// An in-progress edit of a single row (admin only). Holds its own draft
/// copy so Cancel can throw everything away without touching the table.
#[derive(Debug, Clone)]
pub struct RowEdit {
    pub id: VoterId,
    pub draft: VoterDraft,
}

/// Raw search text waiting out the debounce window.
#[derive(Debug)]
struct PendingSearch {
    text: String,
    entered_at: Instant,
}

/// The roster screen's state machine: one server-delegated query, the page
/// of records it produced, and the interactive sort/search/page/edit state
/// around it. All mutations re-fetch from the server; nothing is patched
/// locally.
pub struct RosterView {
    registry: Arc<dyn VoterRegistry>,
    todos: Option<TodoMembership>,
    session: SessionHandle,
    query: RosterQuery,
    raw_search: String,
    pending_search: Option<PendingSearch>,
    debounce: Duration,
    records: Vec<Voter>,
    pagination: Pagination,
    state: LoadState,
    editing: Option<RowEdit>,
    pending_delete: Option<VoterId>,
    banner: StatusBanner,
    load_seq: u64,
}

impl RosterView {
    /// `todos` is present only on the todo-augmented (signed-in user)
    /// variant of the screen.
    pub fn new(
        registry: Arc<dyn VoterRegistry>,
        todos: Option<TodoMembership>,
        session: SessionHandle,
        config: &Config,
    ) -> Self {
        let page_size = config.default_page_size();
        Self {
            registry,
            todos,
            session,
            query: RosterQuery::new(page_size),
            raw_search: String::new(),
            pending_search: None,
            debounce: config.debounce(),
            records: Vec::new(),
            pagination: Pagination::empty(page_size),
            state: LoadState::Idle,
            editing: None,
            pending_delete: None,
            banner: StatusBanner::new(config.success_banner_ttl()),
            load_seq: 0,
        }
    }

    /// Start from a caller-supplied query instead of the defaults (used by
    /// the console's CLI flags).
    pub fn with_query(mut self, query: RosterQuery) -> Self {
        self.raw_search = query.search.clone();
        self.query = query;
        self
    }

    pub fn query(&self) -> &RosterQuery {
        &self.query
    }

    pub fn records(&self) -> &[Voter] {
        &self.records
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The text currently in the search box, which may be ahead of the
    /// committed term while the debounce window is open.
    pub fn raw_search(&self) -> &str {
        &self.raw_search
    }

    pub fn editing(&self) -> Option<&RowEdit> {
        self.editing.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&VoterId> {
        self.pending_delete.as_ref()
    }

    pub fn membership(&self) -> Option<&TodoMembership> {
        self.todos.as_ref()
    }

    /// The banner message to display, expiring stale successes.
    pub fn banner_message(&mut self, now: Instant) -> Option<(Notice, String)> {
        self.banner
            .current(now)
            .map(|(notice, text)| (notice, text.to_string()))
    }

    /// Distinguish "registry is empty" from "nothing matched this search".
    pub fn empty_state(&self) -> Option<EmptyRoster> {
        if self.state != LoadState::Loaded || !self.records.is_empty() {
            return None;
        }
        if self.query.search.trim().is_empty() {
            Some(EmptyRoster::NoVoters)
        } else {
            Some(EmptyRoster::NoMatches)
        }
    }

    /// Initial load when the screen mounts.
    pub async fn mount(&mut self) {
        self.reload().await;
    }

    // ----- loading -----

    /// Issue a fresh load for the current query, returning the sequence
    /// number that must accompany its response.
    pub fn begin_load(&mut self) -> (u64, RosterQuery) {
        self.load_seq += 1;
        self.state = LoadState::Loading;
        (self.load_seq, self.query.clone())
    }

    /// Apply a finished load. A response carrying anything but the latest
    /// issued sequence number belongs to a superseded query and is
    /// dropped, so a slow search can never overwrite a newer one.
    pub fn apply_load(&mut self, seq: u64, outcome: crate::error::Result<VoterPage>) {
        if seq != self.load_seq {
            debug!("dropping stale roster response (seq {seq}, latest {})", self.load_seq);
            return;
        }
        match outcome {
            Ok(page) => {
                self.records = page.records;
                self.pagination = page.pagination;
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                self.state = LoadState::Failed;
                self.banner
                    .error(err.display_message("Failed to fetch voters"), Instant::now());
            }
        }
    }

    /// Fetch the current query and, for signed-in users, refresh the todo
    /// membership set alongside it.
    pub async fn reload(&mut self) {
        let (seq, query) = self.begin_load();
        let outcome = self.registry.list(&query).await;
        self.apply_load(seq, outcome);

        if self.session.is_authenticated() {
            if let Some(todos) = self.todos.as_mut() {
                if let Err(err) = todos.refresh().await {
                    warn!("failed to refresh todo membership: {err}");
                }
            }
        }
    }

    // ----- search -----

    /// Raw text updates immediately for input responsiveness; the
    /// effective term commits once the debounce window has elapsed.
    pub fn search_input(&mut self, text: &str, now: Instant) {
        self.raw_search = text.to_string();
        self.pending_search = Some(PendingSearch {
            text: text.to_string(),
            entered_at: now,
        });
    }

    /// Commit a pending search whose debounce window has elapsed. Returns
    /// true when a commit happened and the roster reloaded.
    pub async fn poll_search(&mut self, now: Instant) -> bool {
        let term = match self.pending_search.take() {
            Some(pending) if now.duration_since(pending.entered_at) >= self.debounce => {
                pending.text
            }
            Some(pending) => {
                self.pending_search = Some(pending);
                return false;
            }
            None => return false,
        };
        if term == self.query.search {
            // Typed and reverted within the window; the effective
            // parameters never changed.
            return false;
        }
        self.query.set_search(&term);
        self.reload().await;
        true
    }

    // ----- sort / pagination -----

    /// Column-header click: active field flips order, new field sorts
    /// ascending, and either resets to the first page.
    pub async fn sort_by(&mut self, field: SortField) {
        self.query.toggle_sort(field);
        self.reload().await;
    }

    pub async fn set_page(&mut self, page: u32) {
        self.query.set_page(page);
        self.reload().await;
    }

    pub async fn set_page_size(&mut self, page_size: u32) {
        self.query.set_page_size(page_size);
        self.reload().await;
    }

    // ----- row editing (admin) -----

    /// Enter edit mode for one row. Only one row can be in edit mode at a
    /// time; entering it for another row replaces the previous draft.
    pub fn begin_edit(&mut self, id: &VoterId) -> bool {
        if !self.session.is_admin() {
            return false;
        }
        let Some(voter) = self.records.iter().find(|voter| &voter.id == id) else {
            return false;
        };
        self.editing = Some(RowEdit {
            id: id.clone(),
            draft: voter.draft(),
        });
        true
    }

    /// Mutable access to the active draft, for the edit inputs.
    pub fn edit_draft_mut(&mut self) -> Option<&mut VoterDraft> {
        self.editing.as_mut().map(|edit| &mut edit.draft)
    }

    /// Discard the draft and leave edit mode. No network call.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Submit the draft. On success: exit edit mode and reload from the
    /// server. On failure: stay in edit mode with the draft intact so the
    /// admin can correct it.
    pub async fn save_edit(&mut self) {
        let Some(edit) = self.editing.clone() else {
            return;
        };
        match self.registry.update(&edit.id, &edit.draft).await {
            Ok(_) => {
                self.editing = None;
                self.banner
                    .success("Voter updated successfully!", Instant::now());
                self.reload().await;
            }
            Err(err) => {
                self.banner
                    .error(err.display_message("Failed to update voter"), Instant::now());
            }
        }
    }

    // ----- deletion (admin) -----

    /// Arm the confirmation step for a delete. Nothing is sent until
    /// `confirm_delete`.
    pub fn request_delete(&mut self, id: &VoterId) -> bool {
        if !self.session.is_admin() {
            return false;
        }
        self.pending_delete = Some(id.clone());
        true
    }

    /// Confirmation declined: forget the pending delete, no network call.
    pub fn decline_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Confirmation accepted: issue the delete and reload. Deleting the
    /// last record of a later page leaves the view on that (now possibly
    /// empty) page; the page must be revisited explicitly.
    pub async fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        match self.registry.remove(&id).await {
            Ok(()) => {
                self.banner
                    .success("Voter deleted successfully!", Instant::now());
                self.reload().await;
            }
            Err(err) => {
                self.banner
                    .error(err.display_message("Failed to delete voter"), Instant::now());
            }
        }
    }

    // ----- todo membership (signed-in users) -----

    pub async fn add_to_todo(&mut self, id: &VoterId) {
        let now = Instant::now();
        let Some(todos) = self.todos.as_mut() else {
            return;
        };
        match todos.add(id).await {
            Ok(true) => self
                .banner
                .success("Voter added to your todo list!", now),
            Ok(false) => {}
            Err(Error::AuthenticationRequired) => self
                .banner
                .error("Please log in to add voters to your todo list", now),
            Err(err) => self.banner.error(
                err.display_message("Failed to add voter to todo list"),
                now,
            ),
        }
    }

    pub async fn remove_from_todo(&mut self, id: &VoterId) {
        let now = Instant::now();
        let Some(todos) = self.todos.as_mut() else {
            return;
        };
        match todos.remove(id).await {
            Ok(true) => self
                .banner
                .success("Voter removed from your todo list!", now),
            Ok(false) => {}
            Err(err) => self.banner.error(
                err.display_message("Failed to remove voter from todo list"),
                now,
            ),
        }
    }
}
