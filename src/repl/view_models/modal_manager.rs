//! # Modal Management
//!
//! Opening the add/edit modal, editing its form, and submitting it through
//! the profile mutations in the background.

use crate::repl::events::{MutationOutcome, ViewEvent};
use crate::repl::models::{Notification, ProfileRecord};
use crate::repl::services::ApiError;
use crate::repl::view_models::core::ListViewModel;
use crate::repl::view_models::record_form::{FormError, FormField, FormMode, RecordForm};

impl ListViewModel {
    /// A modal is shown while a record is selected or the add modal is open
    pub fn is_modal_visible(&self) -> bool {
        self.state.selected_record_id.is_some() || self.state.is_add_modal_visible
    }

    pub fn form(&self) -> Option<&RecordForm> {
        self.form.as_ref()
    }

    /// Snapshot of the record being edited
    pub fn edit_record(&self) -> Option<&ProfileRecord> {
        self.edit_record.as_ref()
    }

    pub fn open_add_modal(&mut self) {
        self.state.selected_record_id = None;
        self.state.is_add_modal_visible = true;
        self.edit_record = None;
        self.form = Some(RecordForm::for_create());
        self.emit_view_event(ViewEvent::ModalChanged);
    }

    /// Open the edit modal for a record on the loaded page.
    ///
    /// Returns false, leaving the modal closed, when the record is not on
    /// the page currently held by the view.
    pub fn select_for_edit(&mut self, id: i64) -> bool {
        let Some(snapshot) = self.page().and_then(|page| page.find(id)).cloned() else {
            tracing::debug!("Record {id} not found on the loaded page");
            self.notify(Notification::warning(format!(
                "User {id} is not on the loaded page; refresh the list and try again"
            )));
            return false;
        };

        self.state.selected_record_id = Some(id);
        self.state.is_add_modal_visible = false;
        self.form = Some(RecordForm::for_edit(snapshot.clone()));
        self.edit_record = Some(snapshot);
        self.emit_view_event(ViewEvent::ModalChanged);
        true
    }

    pub fn close_modal(&mut self) {
        self.state.selected_record_id = None;
        self.state.is_add_modal_visible = false;
        self.edit_record = None;
        self.form = None;
        self.emit_view_event(ViewEvent::ModalChanged);
    }

    /// Set one field of the open form
    pub fn set_form_field(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        let form = self.form.as_mut().ok_or(FormError::NotOpen)?;
        if form.is_submitting() {
            return Err(FormError::AlreadySubmitting);
        }
        form.set(field, value);
        self.emit_view_event(ViewEvent::ModalChanged);
        Ok(())
    }

    /// Submit the open form: create when adding, update when editing.
    ///
    /// Validation runs immediately; the save runs on a spawned task and
    /// the form reports [`RecordForm::is_submitting`] until its outcome is
    /// processed. On success the modal closes and the list catches up with
    /// the cache invalidation. On failure the form stays open with its values
    /// and an error notification is queued.
    pub fn submit_form(&mut self) -> Result<(), FormError> {
        let Some(form) = self.form.as_mut() else {
            return Err(FormError::NotOpen);
        };

        let mode = form.mode();
        let record = match form.begin_submit() {
            Ok(record) => record,
            Err(e) => {
                self.notify(Notification::error(e.to_string()));
                self.emit_view_event(ViewEvent::ModalChanged);
                return Err(e);
            }
        };

        let mutations = self.services.mutations.clone();
        let sender = self.mutations_tx.clone();
        self.pending_mutations += 1;
        tokio::spawn(async move {
            let outcome = match mode {
                FormMode::Create => MutationOutcome::Created(mutations.create(&record).await),
                FormMode::Edit => MutationOutcome::Updated(mutations.update(&record).await),
            };
            // Receiver lives as long as the view model
            let _ = sender.send(outcome);
        });

        self.emit_view_event(ViewEvent::ModalChanged);
        self.emit_view_event(ViewEvent::StatusBarUpdateRequired);
        Ok(())
    }

    /// Apply the outcome of a save started by [`submit_form`](Self::submit_form)
    pub(super) fn finish_form_submission(
        &mut self,
        mode: FormMode,
        result: Result<ProfileRecord, ApiError>,
    ) {
        let form_open = self.form.as_ref().is_some_and(RecordForm::is_submitting);
        let outcome = match self.form.as_mut() {
            Some(form) if form_open => form.finish_submit(result),
            _ => {
                tracing::debug!("Form was closed before its save completed");
                result.map_err(|e| {
                    tracing::error!("Failed to submit form: {e}");
                    FormError::Persist(e)
                })
            }
        };

        match outcome {
            Ok(saved) => {
                tracing::debug!("Saved user {}", saved.id);
                let message = match mode {
                    FormMode::Create => "User added successfully",
                    FormMode::Edit => "User updated successfully",
                };
                self.notify(Notification::success(message));
                if form_open {
                    self.close_modal();
                }
                self.sync_with_cache();
            }
            Err(e) => {
                self.notify(Notification::error(e.to_string()));
                if form_open {
                    self.emit_view_event(ViewEvent::ModalChanged);
                }
            }
        }
    }
}
