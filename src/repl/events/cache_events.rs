//! # Cache Events
//!
//! Events emitted by the query cache when an entry changes state.
//! Subscribers use them to refetch or re-read the entry they display.

use crate::repl::services::query_cache::{QueryKey, QueryStatus};

/// Events emitted when cache entries change
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    /// A fetch for the key settled and its result was stored
    Updated { key: QueryKey, status: QueryStatus },

    /// The key was marked stale by a mutation and should be refetched
    Invalidated { key: QueryKey },
}

impl CacheEvent {
    pub fn key(&self) -> &QueryKey {
        match self {
            CacheEvent::Updated { key, .. } | CacheEvent::Invalidated { key } => key,
        }
    }
}
