//! # Mock I/O Implementations for Testing
//!
//! Scripted input lines and a shareable output buffer, so the controller
//! can be driven end to end without a terminal.

use super::LineSource;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Pre-programmed input lines consumed in order
#[derive(Debug, Default)]
pub struct ScriptedLineSource {
    lines: VecDeque<String>,
}

impl ScriptedLineSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[async_trait]
impl LineSource for ScriptedLineSource {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Cloneable in-memory writer; clones share one buffer
#[derive(Debug, Clone, Default)]
pub struct SharedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl SharedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).to_string()
    }

    pub fn clear(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_source_should_yield_lines_then_end() {
        let mut source = ScriptedLineSource::new(["list", "quit"]);
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("list"));
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("quit"));
        assert_eq!(source.next_line().await.unwrap(), None);
        assert!(!source.is_interactive());
    }

    #[test]
    fn shared_output_clones_should_see_same_buffer() {
        let output = SharedOutput::new();
        let mut writer = output.clone();
        write!(writer, "hello").unwrap();
        assert_eq!(output.contents(), "hello");
        output.clear();
        assert_eq!(writer.contents(), "");
    }
}
