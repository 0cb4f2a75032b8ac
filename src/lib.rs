//! # Rosterline - Terminal Admin Client for User Profiles
//!
//! A REPL for browsing, searching and editing the user profile records of a
//! REST backend. Results are served from a keyed query cache that
//! deduplicates in-flight fetches and refetches after every mutation.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    Events    ┌──────────────┐    Queries   ┌─────────────┐
//! │    View     │◄─────────────│  ViewModel   │─────────────►│ QueryCache  │
//! │             │              │              │◄─────────────│             │
//! │ - Table     │              │ - List state │ Cache events │ - Pages     │
//! │ - Form      │              │ - Form       │              │ - Tags      │
//! └─────────────┘              └──────────────┘              └─────────────┘
//!                                      ▲                             │
//!                                      │ Commands                    ▼
//!                               ┌──────────────┐              ┌─────────────┐
//!                               │  Controller  │              │ ProfileApi  │
//!                               │ - Line input │              │ - reqwest   │
//!                               │ - Event loop │              └─────────────┘
//!                               └──────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod repl;

// Re-export main types for easy access
pub use repl::*;
