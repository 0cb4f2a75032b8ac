//! # Event Bus
//!
//! Keyed distribution of cache events using the observer pattern.
//! Each subscriber registers for one query key and only receives events
//! about that key.

use super::cache_events::CacheEvent;
use crate::repl::services::query_cache::QueryKey;
use std::sync::Arc;

/// Type alias for cache event handlers to reduce complexity
pub type CacheEventHandler = Arc<dyn Fn(&CacheEvent) + Send + Sync>;

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Event bus for decoupled communication between the cache and its consumers
pub trait EventBus: Send + Sync {
    /// Handlers subscribed to the event's key, cloned so the caller can run
    /// them after releasing any lock around the bus
    fn handlers_for(&self, event: &CacheEvent) -> Vec<CacheEventHandler>;

    /// Subscribe to events about `key`
    fn subscribe_to_cache_events(&mut self, key: QueryKey, handler: CacheEventHandler)
        -> SubscriptionId;

    /// Remove a subscription, returning whether it existed
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;

    /// Keys that currently have at least one subscriber
    fn subscribed_keys(&self) -> Vec<QueryKey>;
}

struct CacheSubscription {
    id: SubscriptionId,
    key: QueryKey,
    handler: CacheEventHandler,
}

/// Simple in-memory event bus implementation
#[derive(Default)]
pub struct SimpleEventBus {
    cache_handlers: Vec<CacheSubscription>,
    next_id: u64,
}

impl SimpleEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.cache_handlers.len()
    }
}

impl EventBus for SimpleEventBus {
    fn handlers_for(&self, event: &CacheEvent) -> Vec<CacheEventHandler> {
        self.cache_handlers
            .iter()
            .filter(|sub| &sub.key == event.key())
            .map(|sub| Arc::clone(&sub.handler))
            .collect()
    }

    fn subscribe_to_cache_events(
        &mut self,
        key: QueryKey,
        handler: CacheEventHandler,
    ) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        tracing::debug!("Subscription {} registered for {}", id.0, key);
        self.cache_handlers.push(CacheSubscription { id, key, handler });
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.cache_handlers.len();
        self.cache_handlers.retain(|sub| sub.id != id);
        before != self.cache_handlers.len()
    }

    fn subscribed_keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = Vec::new();
        for sub in &self.cache_handlers {
            if !keys.contains(&sub.key) {
                keys.push(sub.key.clone());
            }
        }
        keys
    }
}
