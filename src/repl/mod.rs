//! # REPL Implementation
//!
//! The line-oriented front-end for browsing and editing profile records.
//! All components are designed with clear separation of concerns and testability.

pub mod commands;
pub mod controllers;
pub mod events;
pub mod io;
pub mod models;
pub mod services;
pub mod view_models;
pub mod views;

#[cfg(test)]
pub mod testing;

// Re-export core types
pub use controllers::AppController;
pub use events::{BackgroundEvent, CacheEvent, ViewEvent};
pub use io::{LineSource, ScriptedLineSource, SharedOutput, StdinLineSource};
pub use models::{Gender, Notification, ProfilePage, ProfileRecord, SearchCriteria, UserAccount};
pub use services::{ApiError, HttpProfileService, ProfileApi, QueryCache, Services};
pub use view_models::{Interaction, ListState, ListViewModel};
pub use views::{TableRenderer, ViewRenderer};

// Re-export specific items from commands to avoid conflicts
pub use commands::{Command, CommandContext, CommandEvent, CommandRegistry, ViewModelSnapshot};
