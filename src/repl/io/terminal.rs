//! # Terminal Input
//!
//! Production [`LineSource`] reading lines from standard input.

use super::LineSource;
use anyhow::Result;
use async_trait::async_trait;
use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Reads lines from stdin
pub struct StdinLineSource {
    lines: Lines<BufReader<Stdin>>,
    interactive: bool,
}

impl StdinLineSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            interactive: std::io::stdin().is_terminal(),
        }
    }
}

impl Default for StdinLineSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineSource for StdinLineSource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
