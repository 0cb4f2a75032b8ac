//! # Command Context
//!
//! Read-only view of the list state handed to commands, so they can decide
//! relevance and validate arguments without touching the view model.

use crate::repl::models::SearchCriteria;
use crate::repl::view_models::{Interaction, ListViewModel};

/// Read-only snapshot of ViewModel state for commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModelSnapshot {
    pub interaction: Interaction,
    pub current_page: u32,
    pub page_count: u32,
    pub search_text: String,
    pub search_criteria: SearchCriteria,
}

impl ViewModelSnapshot {
    /// Create snapshot from current ViewModel state
    pub fn from_view_model(view_model: &ListViewModel) -> Self {
        let state = view_model.state();
        Self {
            interaction: view_model.interaction(),
            current_page: state.current_page,
            page_count: view_model.pagination().page_count(),
            search_text: state.search_text.clone(),
            search_criteria: state.search_criteria,
        }
    }
}

impl Default for ViewModelSnapshot {
    fn default() -> Self {
        Self {
            interaction: Interaction::Browsing,
            current_page: 1,
            page_count: 1,
            search_text: String::new(),
            search_criteria: SearchCriteria::default(),
        }
    }
}

/// Base context available to all commands
pub struct CommandContext {
    pub state: ViewModelSnapshot,
}

impl CommandContext {
    pub fn new(state: ViewModelSnapshot) -> Self {
        Self { state }
    }

    pub fn interaction(&self) -> Interaction {
        self.state.interaction
    }

    pub fn is_browsing(&self) -> bool {
        self.state.interaction == Interaction::Browsing
    }

    pub fn is_editing(&self) -> bool {
        self.state.interaction == Interaction::EditingForm
    }

    pub fn is_confirming_delete(&self) -> bool {
        matches!(self.state.interaction, Interaction::ConfirmingDelete(_))
    }
}
