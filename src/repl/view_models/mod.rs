//! # ViewModel Module
//!
//! The list view model is split into focused responsibilities, each an
//! `impl ListViewModel` block in its own file. The record form lives
//! alongside it and is owned by the view model while a modal is open.

mod core;
mod delete_manager;
mod modal_manager;
mod query_manager;
pub mod record_form;

// Re-export the main ViewModel
pub use self::core::{Interaction, ListState, ListViewModel, DEFAULT_PAGE_SIZE};

pub use record_form::{
    FieldError, FormError, FormField, FormMode, FormValues, RecordForm, UnknownField,
};
