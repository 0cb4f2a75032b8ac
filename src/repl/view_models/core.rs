//! # Core ViewModel Structure
//!
//! Contains the list view model struct, basic initialization logic and the
//! entry point for background events. Fetches and mutations never block the
//! caller: they run on spawned tasks and report back through two channels
//! that [`ListViewModel::next_background_event`] waits on.
//!
//! Behaviour lives in the sibling managers:
//! - `query_manager`: fetching, pagination, search, cache subscription
//! - `modal_manager`: add/edit modal and form submission
//! - `delete_manager`: delete confirmation flow

use crate::repl::events::{BackgroundEvent, CacheEvent, MutationOutcome, SubscriptionId, ViewEvent};
use crate::repl::models::{
    Notification, PaginationInfo, ProfilePage, ProfileRecord, SearchCriteria, StatusLine,
};
use crate::repl::services::{QueryKey, QuerySnapshot, QueryStatus, Services, USERS_TAG};
use crate::repl::view_models::record_form::{FormMode, RecordForm};
use tokio::sync::mpsc;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// UI state owned by the list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub current_page: u32,
    pub search_text: String,
    pub search_criteria: SearchCriteria,
    pub selected_record_id: Option<i64>,
    pub is_add_modal_visible: bool,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            current_page: 1,
            search_text: String::new(),
            search_criteria: SearchCriteria::default(),
            selected_record_id: None,
            is_add_modal_visible: false,
        }
    }
}

/// What the user is currently being asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Browsing the table
    Browsing,
    /// Filling the add/edit form
    EditingForm,
    /// Answering the delete confirmation for this id
    ConfirmingDelete(i64),
}

/// Coordinates list state, the query cache, the modal form and notifications
pub struct ListViewModel {
    pub(super) services: Services,
    pub(super) page_size: u32,
    pub(super) state: ListState,
    pub(super) snapshot: QuerySnapshot<ProfilePage>,
    pub(super) edit_record: Option<ProfileRecord>,
    pub(super) form: Option<RecordForm>,
    pub(super) pending_delete: Option<i64>,
    pub(super) status_line: StatusLine,
    pub(super) subscription: Option<(QueryKey, SubscriptionId)>,
    pub(super) cache_events_tx: mpsc::UnboundedSender<CacheEvent>,
    pub(super) cache_events_rx: mpsc::UnboundedReceiver<CacheEvent>,
    pub(super) mutations_tx: mpsc::UnboundedSender<MutationOutcome>,
    pub(super) mutations_rx: mpsc::UnboundedReceiver<MutationOutcome>,
    /// Mutations spawned whose outcome has not been processed yet
    pub(super) pending_mutations: usize,
    pub(super) pending_view_events: Vec<ViewEvent>,
}

impl ListViewModel {
    pub fn new(services: Services, page_size: u32) -> Self {
        let (cache_events_tx, cache_events_rx) = mpsc::unbounded_channel();
        let (mutations_tx, mutations_rx) = mpsc::unbounded_channel();
        let page_size = page_size.max(1);
        let state = ListState::default();
        let key = QueryKey::new(
            USERS_TAG,
            state.current_page,
            page_size,
            state.search_text.clone(),
            state.search_criteria,
        );
        let snapshot = services.cache.snapshot(&key);

        Self {
            services,
            page_size,
            state,
            snapshot,
            edit_record: None,
            form: None,
            pending_delete: None,
            status_line: StatusLine::new(),
            subscription: None,
            cache_events_tx,
            cache_events_rx,
            mutations_tx,
            mutations_rx,
            pending_mutations: 0,
            pending_view_events: Vec::new(),
        }
    }

    /// Cache key derived from the current list state
    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(
            USERS_TAG,
            self.state.current_page,
            self.page_size,
            self.state.search_text.clone(),
            self.state.search_criteria,
        )
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn snapshot(&self) -> &QuerySnapshot<ProfilePage> {
        &self.snapshot
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.is_loading()
    }

    /// Whether a fetch or mutation started by this view is still running
    pub fn is_busy(&self) -> bool {
        self.snapshot.is_fetching || self.pending_mutations > 0
    }

    pub fn is_error(&self) -> bool {
        self.snapshot.status == QueryStatus::Error
    }

    /// Loaded page, possibly stale after a failed refetch
    pub fn page(&self) -> Option<&ProfilePage> {
        self.snapshot.data.as_ref()
    }

    /// Rows to display, never more than the page size
    pub fn rows(&self) -> &[ProfileRecord] {
        match &self.snapshot.data {
            Some(page) => &page.data[..page.data.len().min(self.page_size as usize)],
            None => &[],
        }
    }

    /// Values for the pagination control
    pub fn pagination(&self) -> PaginationInfo {
        PaginationInfo {
            current_page: self.state.current_page,
            page_size: self.page_size,
            total: self.page().map(|p| p.count).unwrap_or(0),
        }
    }

    pub fn interaction(&self) -> Interaction {
        if let Some(id) = self.pending_delete {
            Interaction::ConfirmingDelete(id)
        } else if self.form.is_some() {
            Interaction::EditingForm
        } else {
            Interaction::Browsing
        }
    }

    pub fn status_line(&self) -> &StatusLine {
        &self.status_line
    }

    pub fn set_profile_info(&mut self, name: String, path: String) {
        self.status_line.set_profile(name, path);
    }

    pub fn notify(&mut self, notification: Notification) {
        self.status_line.notify(notification);
        self.emit_view_event(ViewEvent::StatusBarUpdateRequired);
    }

    /// Drain notifications queued since the last render
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.status_line.take_notifications()
    }

    pub(super) fn emit_view_event(&mut self, event: ViewEvent) {
        if !self.pending_view_events.contains(&event) {
            self.pending_view_events.push(event);
        }
        tracing::debug!("View event emitted: {:?}", event);
    }

    /// Collect and clear pending view events
    pub fn collect_pending_view_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.pending_view_events)
    }

    // === Background Work ===

    /// Wait for the next cache event or finished mutation.
    ///
    /// Cancel safe, so it can sit in a `select!` next to the input source.
    pub async fn next_background_event(&mut self) -> Option<BackgroundEvent> {
        tokio::select! {
            Some(event) = self.cache_events_rx.recv() => Some(BackgroundEvent::Cache(event)),
            Some(outcome) = self.mutations_rx.recv() => Some(BackgroundEvent::Mutation(outcome)),
            else => None,
        }
    }

    pub fn process_background_event(&mut self, event: BackgroundEvent) {
        match event {
            BackgroundEvent::Cache(event) => self.process_cache_event(event),
            BackgroundEvent::Mutation(outcome) => {
                self.pending_mutations = self.pending_mutations.saturating_sub(1);
                tracing::debug!(
                    "Mutation finished (success: {}), {} still pending",
                    outcome.is_success(),
                    self.pending_mutations
                );
                match outcome {
                    MutationOutcome::Created(result) => {
                        self.finish_form_submission(FormMode::Create, result)
                    }
                    MutationOutcome::Updated(result) => {
                        self.finish_form_submission(FormMode::Edit, result)
                    }
                    MutationOutcome::Deleted { id, result } => self.finish_delete(id, result),
                }
            }
        }
    }
}

impl Drop for ListViewModel {
    fn drop(&mut self) {
        if let Some((_, id)) = self.subscription.take() {
            self.services.cache.unsubscribe(id);
        }
    }
}
