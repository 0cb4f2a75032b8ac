//! # Command Events
//!
//! Events produced by commands that describe what should happen.
//! Commands produce these events, and the controller applies them to the ViewModel.

use crate::repl::models::SearchCriteria;
use crate::repl::view_models::FormField;

/// Events that commands can produce to request changes
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEvent {
    /// Refetch the current page
    RefreshRequested,

    /// Jump to a page (1-based)
    PageRequested { page: u32 },

    NextPageRequested,

    PreviousPageRequested,

    /// Submit search text; empty text clears the filter
    SearchRequested { text: String },

    /// Change the field the search text applies to
    CriteriaChangeRequested { criteria: SearchCriteria },

    /// Open the empty create form
    AddModalRequested,

    /// Open the edit form for a loaded record
    EditRequested { id: i64 },

    /// Set one field of the open form
    FieldChangeRequested { field: FormField, value: String },

    /// Print the open form
    ShowFormRequested,

    /// Validate and persist the open form
    FormSubmitRequested,

    /// Close the open form without saving
    ModalCloseRequested,

    /// Ask for confirmation before deleting a record
    DeleteRequested { id: i64 },

    DeleteConfirmed,

    DeleteCancelled,

    /// Print the command list
    HelpRequested,

    /// Request to quit application
    QuitRequested,

    /// Input that could not be turned into a request
    InvalidInput { message: String },
}

impl CommandEvent {
    /// Create an invalid input event
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
