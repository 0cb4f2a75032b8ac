//! # I/O Abstraction Layer
//!
//! Input lines come from a [`LineSource`] and output goes to any
//! [`std::io::Write`], so the controller runs the same way against a real
//! terminal and against scripted input in tests.
//!
//! ```text
//! Production:  AppController ──▶ StdinLineSource    ──▶ tokio::io::stdin()
//!                            ──▶ TableRenderer<Stdout>
//!
//! Testing:     AppController ──▶ ScriptedLineSource ──▶ VecDeque<String>
//!                            ──▶ TableRenderer<SharedOutput>
//! ```

use anyhow::Result;
use async_trait::async_trait;

pub mod mock;
pub mod terminal;

pub use mock::{ScriptedLineSource, SharedOutput};
pub use terminal::StdinLineSource;

/// Input line stream abstraction
#[async_trait]
pub trait LineSource: Send {
    /// Next line without its terminator; `None` once input is exhausted.
    ///
    /// Must be cancel safe: the controller races it against cache events.
    async fn next_line(&mut self) -> Result<Option<String>>;

    /// Whether input comes from a person at a terminal (prompts are shown)
    fn is_interactive(&self) -> bool {
        false
    }
}
