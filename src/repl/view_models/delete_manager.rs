//! # Delete Confirmation
//!
//! Deleting a record takes two steps: a request that asks for confirmation,
//! then either a confirmation that issues the mutation or a cancellation.

use crate::repl::events::{MutationOutcome, ViewEvent};
use crate::repl::models::Notification;
use crate::repl::services::ApiError;
use crate::repl::view_models::core::ListViewModel;

impl ListViewModel {
    /// Ask for confirmation before deleting `id`
    pub fn request_delete(&mut self, id: i64) {
        self.pending_delete = Some(id);
        self.emit_view_event(ViewEvent::ConfirmationRequired);
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    /// Issue the pending delete on a spawned task.
    ///
    /// The list refreshes once the outcome is processed and the backend
    /// confirmed the delete.
    pub fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            tracing::debug!("confirm_delete called with nothing pending");
            return;
        };

        let mutations = self.services.mutations.clone();
        let sender = self.mutations_tx.clone();
        self.pending_mutations += 1;
        tokio::spawn(async move {
            let result = mutations.delete(id).await;
            // Receiver lives as long as the view model
            let _ = sender.send(MutationOutcome::Deleted { id, result });
        });
        tracing::debug!("Delete of user {id} started");
        self.emit_view_event(ViewEvent::StatusBarUpdateRequired);
    }

    /// Apply the outcome of a delete started by [`confirm_delete`](Self::confirm_delete)
    pub(super) fn finish_delete(&mut self, id: i64, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.notify(Notification::success("User deleted successfully"));
                if self.state.selected_record_id == Some(id) {
                    self.close_modal();
                }
                self.sync_with_cache();
            }
            Err(e) => {
                tracing::error!("Deleting user {id} failed: {e}");
                self.notify(Notification::error(e.to_string()));
            }
        }
    }

    /// Drop the pending delete without touching the backend
    pub fn cancel_delete(&mut self) {
        if self.pending_delete.take().is_some() {
            self.notify(Notification::info("Deletion cancelled"));
        }
    }
}
