//! # Query Management
//!
//! Fetching the active page through the query cache, pagination and search
//! state changes, and reacting to cache events for the active key.

use crate::repl::events::{CacheEvent, ViewEvent};
use crate::repl::models::SearchCriteria;
use crate::repl::services::{QueryKey, QueryStatus};
use crate::repl::view_models::core::ListViewModel;
use std::sync::Arc;

impl ListViewModel {
    /// Start loading the page for the current state.
    ///
    /// Returns at once. The snapshot shows the fetch in flight, and the
    /// settled result arrives later as a [`CacheEvent::Updated`].
    pub fn refresh(&mut self) {
        let key = self.query_key();
        self.ensure_subscribed(&key);

        let api = Arc::clone(&self.services.api);
        let query = key.list_query();
        let started = self
            .services
            .cache
            .spawn_fetch(&key, move || async move { api.list_profiles(&query).await });
        tracing::debug!("Refresh of {key}: {started:?}");

        self.snapshot = self.services.cache.snapshot(&key);
        // Rows already on screen stay there until the refetch settles
        if !(self.snapshot.is_fetching && self.snapshot.data.is_some()) {
            self.emit_view_event(ViewEvent::ListRedrawRequired);
        }
        self.emit_view_event(ViewEvent::StatusBarUpdateRequired);
    }

    /// Subscribe to the active key, dropping any subscription to a previous key
    fn ensure_subscribed(&mut self, key: &QueryKey) {
        if let Some((current, id)) = &self.subscription {
            if current == key {
                return;
            }
            self.services.cache.unsubscribe(*id);
        }

        let sender = self.cache_events_tx.clone();
        let id = self.services.cache.subscribe(
            key.clone(),
            Arc::new(move |event: &CacheEvent| {
                // Receiver lives as long as the view model
                let _ = sender.send(event.clone());
            }),
        );
        self.subscription = Some((key.clone(), id));
    }

    /// Re-read the active key after one of its fetches settled
    fn reload_snapshot(&mut self, key: &QueryKey) {
        self.snapshot = self.services.cache.snapshot(key);
        if self.snapshot.status == QueryStatus::Error {
            if let Some(e) = &self.snapshot.error {
                tracing::warn!("Fetching {key} failed: {e}");
            }
        }
        self.emit_view_event(ViewEvent::ListRedrawRequired);
        self.emit_view_event(ViewEvent::StatusBarUpdateRequired);
    }

    /// Move to `page` (clamped to the known page range) and refetch
    pub fn go_to_page(&mut self, page: u32) {
        let mut target = page.max(1);
        if let Some(num_pages) = self.page().map(|p| p.num_pages).filter(|n| *n > 0) {
            target = target.min(num_pages);
        }
        tracing::debug!("Page change {} -> {}", self.state.current_page, target);
        self.state.current_page = target;
        self.refresh();
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.state.current_page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.state.current_page.saturating_sub(1));
    }

    /// Apply a search submission.
    ///
    /// Blank text clears the filter and returns to the first page; any other
    /// text becomes the filter while the current page is kept.
    pub fn submit_search(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.state.search_text.clear();
            self.state.current_page = 1;
        } else {
            self.state.search_text = trimmed.to_string();
        }
        tracing::debug!(
            "Search submitted: {}='{}' (page {})",
            self.state.search_criteria,
            self.state.search_text,
            self.state.current_page
        );
        self.refresh();
    }

    pub fn set_search_criteria(&mut self, criteria: SearchCriteria) {
        self.state.search_criteria = criteria;
        self.refresh();
    }

    /// React to one cache event; events for keys no longer active are ignored
    pub fn process_cache_event(&mut self, event: CacheEvent) {
        let key = self.query_key();
        if event.key() != &key {
            tracing::debug!("Ignoring cache event for inactive key {}", event.key());
            return;
        }

        match event {
            CacheEvent::Invalidated { .. } => {
                tracing::debug!("Active key {key} invalidated, refetching");
                self.refresh();
            }
            CacheEvent::Updated { .. } => self.reload_snapshot(&key),
        }
    }

    /// Handle every cache event already queued, refetching at most once
    pub fn sync_with_cache(&mut self) {
        let key = self.query_key();
        let mut invalidated = false;
        let mut updated = false;
        while let Ok(event) = self.cache_events_rx.try_recv() {
            if event.key() != &key {
                continue;
            }
            match event {
                CacheEvent::Invalidated { .. } => invalidated = true,
                CacheEvent::Updated { .. } => updated = true,
            }
        }

        if invalidated {
            self.refresh();
        } else if updated {
            self.reload_snapshot(&key);
        }
    }
}
