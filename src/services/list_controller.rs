//! List controller for the user collection.
//!
//! The [`ListController`] is the single authority over what the user list
//! shows: the current page, the search term, the in-place edit buffer and
//! the loading flag. Views read it through [`ListController::snapshot`] and
//! drive it through its operations; nothing else mutates the state.
//!
//! Operations take `&self` and may overlap. Every page load and every commit
//! is numbered when it starts. A page response is dropped once a newer load
//! has started; a commit response is dropped once a newer commit for the
//! same record has started.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::app::events::Notifier;
use crate::app::routes::{Navigator, Route};
use crate::domain::{EditableField, Record, RecordId};
use crate::services::gateway::RecordGateway;
use crate::services::search;
use crate::services::session::SessionGuard;

pub const FETCH_FAILED: &str = "Failed to fetch users";
pub const UPDATE_SUCCEEDED: &str = "User updated successfully";
pub const UPDATE_FAILED: &str = "Failed to update user";
pub const DELETE_SUCCEEDED: &str = "User deleted successfully";
pub const DELETE_FAILED: &str = "Failed to delete user";

/// Direction of a page change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDelta {
    Previous,
    Next,
}

impl PageDelta {
    /// Returns the page reached from `current`, clamped to `[1, total_pages]`.
    pub fn apply(self, current: u32, total_pages: u32) -> u32 {
        let last = total_pages.max(1);
        let next = match self {
            PageDelta::Previous => current.saturating_sub(1),
            PageDelta::Next => current.saturating_add(1),
        };
        next.clamp(1, last)
    }
}

/// Draft of the record being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EditBuffer {
    /// Bumped on every `begin_edit`, so a commit can tell whether the
    /// buffer it started from is still the active one.
    session: u64,
    draft: Record,
}

/// Everything the controller owns.
#[derive(Debug, Clone)]
struct ListState {
    page_number: u32,
    total_pages: u32,
    items: Vec<Record>,
    loading: bool,
    search_term: String,
    edit: Option<EditBuffer>,
    /// Page of the newest in-flight load.
    pending_page: Option<u32>,
    load_generation: u64,
    commit_generation: u64,
    /// Newest in-flight commit per record.
    pending_commits: HashMap<RecordId, u64>,
    edit_session: u64,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            page_number: 1,
            total_pages: 1,
            items: Vec::new(),
            loading: false,
            search_term: String::new(),
            edit: None,
            pending_page: None,
            load_generation: 0,
            commit_generation: 0,
            pending_commits: HashMap::new(),
            edit_session: 0,
        }
    }
}

impl ListState {
    /// Page navigation starts from: the one being loaded, if any.
    fn cursor(&self) -> u32 {
        self.pending_page.unwrap_or(self.page_number)
    }
}

/// Read-only view of the controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadModel {
    /// Records of the current page matching the search term.
    pub visible_items: Vec<Record>,
    pub page_number: u32,
    pub total_pages: u32,
    /// While true the view shows a loading state instead of the table.
    pub loading: bool,
    pub search_term: String,
    /// The draft being edited, if any.
    pub edit_buffer: Option<Record>,
    /// Whether "Previous" is enabled.
    pub can_go_previous: bool,
    /// Whether "Next" is enabled.
    pub can_go_next: bool,
}

impl ReadModel {
    /// Returns whether `id` is the row being edited.
    pub fn is_editing(&self, id: RecordId) -> bool {
        self.edit_buffer.as_ref().is_some_and(|draft| draft.id == id)
    }
}

/// Controller for one paginated, searchable, editable list of records.
pub struct ListController<G: RecordGateway> {
    gateway: Arc<G>,
    session: Arc<dyn SessionGuard>,
    navigator: Arc<dyn Navigator>,
    notifier: Notifier,
    state: RwLock<ListState>,
}

impl<G: RecordGateway> ListController<G> {
    /// Creates a controller on page 1 with nothing loaded yet.
    pub fn new(
        gateway: Arc<G>,
        session: Arc<dyn SessionGuard>,
        navigator: Arc<dyn Navigator>,
        notifier: Notifier,
    ) -> Self {
        Self {
            gateway,
            session,
            navigator,
            notifier,
            state: RwLock::new(ListState::default()),
        }
    }

    /// Returns the current read model.
    pub async fn snapshot(&self) -> ReadModel {
        let state = self.state.read().await;
        ReadModel {
            visible_items: search::visible_items(&state.items, &state.search_term),
            page_number: state.page_number,
            total_pages: state.total_pages,
            loading: state.loading,
            search_term: state.search_term.clone(),
            edit_buffer: state.edit.as_ref().map(|e| e.draft.clone()),
            can_go_previous: state.cursor() > 1,
            can_go_next: state.cursor() < state.total_pages,
        }
    }

    /// Returns the cached records of the current page, unfiltered.
    pub async fn items(&self) -> Vec<Record> {
        self.state.read().await.items.clone()
    }

    /// Fetches `page` and replaces the current page with it.
    ///
    /// On failure the previous page stays as it was and an error
    /// notification is sent. Page 0 is treated as page 1. A page past the
    /// reported total is fetched again as the last page.
    pub async fn load_page(&self, page: u32) {
        let mut page = page.max(1);
        loop {
            let generation = {
                let mut state = self.state.write().await;
                state.load_generation += 1;
                state.loading = true;
                state.pending_page = Some(page);
                state.load_generation
            };
            tracing::debug!(page, generation, "Loading page");

            let result = self.gateway.fetch_page(page).await;

            let mut state = self.state.write().await;
            if generation != state.load_generation {
                tracing::debug!(page, generation, "Discarding stale page response");
                return;
            }

            match result {
                Ok(fetched) => {
                    let total_pages = fetched.total_pages.max(1);
                    if page > total_pages {
                        tracing::debug!(
                            page,
                            total_pages,
                            "Page out of range, loading last page"
                        );
                        state.total_pages = total_pages;
                        page = total_pages;
                        continue;
                    }
                    state.loading = false;
                    state.pending_page = None;
                    state.total_pages = total_pages;
                    state.page_number = page;
                    state.items = fetched.items;
                    tracing::debug!(
                        page,
                        total_pages,
                        count = state.items.len(),
                        "Page loaded"
                    );
                }
                Err(e) => {
                    state.loading = false;
                    state.pending_page = None;
                    tracing::warn!(page, "Failed to fetch page: {}", e);
                    self.notifier.error(FETCH_FAILED);
                }
            }
            return;
        }
    }

    /// Reloads the current page.
    pub async fn refresh(&self) {
        let page = self.state.read().await.cursor();
        self.load_page(page).await;
    }

    /// Moves one page back or forward. A no-op at either end.
    pub async fn change_page(&self, delta: PageDelta) {
        let target = {
            let state = self.state.read().await;
            let current = state.cursor();
            let next = delta.apply(current, state.total_pages);
            if next == current {
                tracing::debug!(?delta, page = current, "Page change ignored at boundary");
                return;
            }
            next
        };
        self.load_page(target).await;
    }

    /// Sets the search term. Does not fetch.
    pub async fn set_search_term(&self, term: impl Into<String>) {
        self.state.write().await.search_term = term.into();
    }

    /// Starts editing record `id`, discarding any other draft.
    ///
    /// Does nothing if `id` is not on the current page.
    pub async fn begin_edit(&self, id: RecordId) {
        let mut state = self.state.write().await;
        let Some(record) = state.items.iter().find(|r| r.id == id).cloned() else {
            tracing::debug!(%id, "Edit ignored: record not on current page");
            return;
        };
        state.edit_session += 1;
        let session = state.edit_session;
        state.edit = Some(EditBuffer {
            session,
            draft: record,
        });
    }

    /// Changes one field of the draft. Does nothing without a draft.
    pub async fn update_draft_field(&self, field: EditableField, value: impl Into<String>) {
        if let Some(edit) = self.state.write().await.edit.as_mut() {
            edit.draft.set_field(field, value);
        }
    }

    /// Sends the draft to the server.
    ///
    /// On success the cached record is replaced by the draft and the draft
    /// is cleared. On failure the draft stays so the user can retry or
    /// cancel.
    pub async fn commit_edit(&self) {
        let (buffer, generation) = {
            let mut state = self.state.write().await;
            let Some(buffer) = state.edit.clone() else {
                tracing::debug!("Commit ignored: nothing is being edited");
                return;
            };
            state.commit_generation += 1;
            let generation = state.commit_generation;
            state.pending_commits.insert(buffer.draft.id, generation);
            (buffer, generation)
        };
        let id = buffer.draft.id;
        tracing::debug!(%id, generation, "Committing edit");

        let result = self.gateway.update_record(id, buffer.draft.patch()).await;

        let mut state = self.state.write().await;
        if state.pending_commits.get(&id) != Some(&generation) {
            tracing::debug!(%id, generation, "Discarding stale update response");
            return;
        }
        state.pending_commits.remove(&id);

        match result {
            Ok(()) => {
                if let Some(cached) = state.items.iter_mut().find(|r| r.id == id) {
                    let updated = Record {
                        id: cached.id,
                        avatar: cached.avatar.clone(),
                        ..buffer.draft
                    };
                    *cached = updated;
                }
                if state
                    .edit
                    .as_ref()
                    .is_some_and(|e| e.session == buffer.session)
                {
                    state.edit = None;
                }
                tracing::info!(%id, "User updated");
                self.notifier.success(UPDATE_SUCCEEDED);
            }
            Err(e) => {
                tracing::warn!(%id, "Failed to update user: {}", e);
                self.notifier.error(UPDATE_FAILED);
            }
        }
    }

    /// Discards the draft.
    pub async fn cancel_edit(&self) {
        self.state.write().await.edit = None;
    }

    /// Deletes record `id` and, once the server confirms, drops it locally.
    pub async fn delete_record(&self, id: RecordId) {
        tracing::debug!(%id, "Deleting user");

        match self.gateway.delete_record(id).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.items.retain(|r| r.id != id);
                if state.edit.as_ref().is_some_and(|e| e.draft.id == id) {
                    state.edit = None;
                }
                tracing::info!(%id, "User deleted");
                self.notifier.success(DELETE_SUCCEEDED);
            }
            Err(e) => {
                tracing::warn!(%id, "Failed to delete user: {}", e);
                self.notifier.error(DELETE_FAILED);
            }
        }
    }

    /// Ends the session and leaves the user list.
    pub fn sign_out(&self) {
        self.session.end_session();
        self.navigator.navigate(Route::Login);
    }
}
