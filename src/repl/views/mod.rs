//! # Views Module
//!
//! Contains all view-related components for rendering the profile table,
//! the modal form and notifications as plain terminal lines.

pub mod ansi_escape_codes;
pub mod table_renderer;

// Re-export main types for convenience
pub use table_renderer::{TableRenderer, ViewRenderer, HELP_ENTRIES};
