//! # Query Cache
//!
//! Process-wide cache of query results keyed by [`QueryKey`].
//!
//! - A fresh successful entry is served without touching the network.
//! - At most one fetch per key is in flight; concurrent callers share its result.
//! - Every fetch is stamped with the entry generation. Generations come from
//!   one counter that only grows; invalidation, removal and clearing all move
//!   an entry past it, so a result that settles afterwards reaches its callers
//!   but is never written into the cache.
//! - [`QueryCache::spawn_fetch`] starts the fetch on the runtime and returns at
//!   once; subscribers learn the outcome from [`CacheEvent::Updated`].
//! - Subscribers registered for a key are told when it settles or is invalidated.
//!
//! The state lock is never held across an await, and subscriber handlers run
//! after it is released.

use crate::repl::events::{CacheEvent, CacheEventHandler, EventBus, SimpleEventBus, SubscriptionId};
use crate::repl::models::SearchCriteria;
use crate::repl::services::http::{ApiError, ListQuery};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Entity tag shared by every profile list query
pub const USERS_TAG: &str = "users";

/// Default time a successful entry is served without refetching
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);

/// Default cap on a single fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Composite cache key: entity tag plus pagination and filter parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    tag: String,
    page: u32,
    page_size: u32,
    search_text: String,
    search_criteria: SearchCriteria,
}

impl QueryKey {
    pub fn new(
        tag: impl Into<String>,
        page: u32,
        page_size: u32,
        search_text: impl Into<String>,
        search_criteria: SearchCriteria,
    ) -> Self {
        Self {
            tag: tag.into(),
            page,
            page_size,
            search_text: search_text.into(),
            search_criteria,
        }
    }

    /// Key of a profile list query
    pub fn users(query: &ListQuery) -> Self {
        Self::new(
            USERS_TAG,
            query.page,
            query.page_size,
            query.search_text.clone(),
            query.search_criteria,
        )
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn search_criteria(&self) -> SearchCriteria {
        self.search_criteria
    }

    /// List request described by this key
    pub fn list_query(&self) -> ListQuery {
        ListQuery::new(self.page, self.page_size)
            .with_search(self.search_criteria, self.search_text.clone())
    }

    /// Canonical text form: tag followed by parameters sorted by name
    pub fn canonical(&self) -> String {
        format!(
            "{}?criteria={}&page={}&pageSize={}&search={}",
            self.tag, self.search_criteria, self.page, self.page_size, self.search_text
        )
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Lifecycle state of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched, or its only fetch was superseded
    Idle,
    Loading,
    Success,
    Error,
}

/// Point-in-time view of one cache entry
#[derive(Debug, Clone)]
pub struct QuerySnapshot<V> {
    pub data: Option<V>,
    pub status: QueryStatus,
    pub error: Option<ApiError>,
    pub is_fetching: bool,
    pub is_stale: bool,
    pub updated_at: Option<Instant>,
}

impl<V> QuerySnapshot<V> {
    fn idle() -> Self {
        Self {
            data: None,
            status: QueryStatus::Idle,
            error: None,
            is_fetching: false,
            is_stale: false,
            updated_at: None,
        }
    }

    /// Fetching with nothing to show yet
    pub fn is_loading(&self) -> bool {
        self.is_fetching && self.data.is_none()
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

type SharedResult<V> = Option<Result<V, ApiError>>;

struct CacheEntry<V> {
    data: Option<V>,
    settled: QueryStatus,
    error: Option<ApiError>,
    updated_at: Option<Instant>,
    stale: bool,
    generation: u64,
    in_flight: Option<watch::Receiver<SharedResult<V>>>,
}

impl<V: Clone> CacheEntry<V> {
    fn new(generation: u64) -> Self {
        Self {
            data: None,
            settled: QueryStatus::Idle,
            error: None,
            updated_at: None,
            stale: false,
            generation,
            in_flight: None,
        }
    }

    fn fresh_data(&self, stale_time: Duration) -> Option<V> {
        if self.settled != QueryStatus::Success || self.stale {
            return None;
        }
        match self.updated_at {
            Some(at) if at.elapsed() < stale_time => self.data.clone(),
            _ => None,
        }
    }

    /// In-flight receiver whose leader is still alive
    fn live_in_flight(&self) -> Option<watch::Receiver<SharedResult<V>>> {
        self.in_flight
            .as_ref()
            .filter(|rx| rx.has_changed().is_ok())
            .cloned()
    }

    fn snapshot(&self) -> QuerySnapshot<V> {
        let is_fetching = self.live_in_flight().is_some();
        QuerySnapshot {
            data: self.data.clone(),
            status: if is_fetching {
                QueryStatus::Loading
            } else {
                self.settled
            },
            error: self.error.clone(),
            is_fetching,
            is_stale: self.stale,
            updated_at: self.updated_at,
        }
    }
}

struct CacheState<V> {
    entries: HashMap<QueryKey, CacheEntry<V>>,
    bus: SimpleEventBus,
    /// Last generation handed out; never reset
    generation: u64,
}

enum FetchPlan<V> {
    Cached(V),
    Join(watch::Receiver<SharedResult<V>>),
    Lead {
        sender: watch::Sender<SharedResult<V>>,
        generation: u64,
    },
}

type Notifications = Vec<(CacheEvent, Vec<CacheEventHandler>)>;

/// What [`QueryCache::spawn_fetch`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStart {
    /// Fresh data was already cached; nothing was started
    Cached,
    /// Another fetch for the key is running; its result will be shared
    InFlight,
    /// A new fetch was spawned
    Started,
}

/// Shared handle to the query cache; clones refer to the same entries
pub struct QueryCache<V> {
    inner: Arc<Mutex<CacheState<V>>>,
    stale_time: Duration,
    fetch_timeout: Duration,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            stale_time: self.stale_time,
            fetch_timeout: self.fetch_timeout,
        }
    }
}

impl<V: Clone + Send + Sync + 'static> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME, DEFAULT_FETCH_TIMEOUT)
    }
}

impl<V: Clone + Send + Sync + 'static> QueryCache<V> {
    pub fn new(stale_time: Duration, fetch_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                bus: SimpleEventBus::new(),
                generation: 0,
            })),
            stale_time,
            fetch_timeout,
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decide how to serve `key`, registering a new in-flight fetch when needed
    fn plan(&self, key: &QueryKey) -> FetchPlan<V> {
        let mut guard = self.lock();
        let CacheState {
            entries, generation, ..
        } = &mut *guard;
        let entry = entries.entry(key.clone()).or_insert_with(|| {
            *generation += 1;
            CacheEntry::new(*generation)
        });

        if let Some(data) = entry.fresh_data(self.stale_time) {
            FetchPlan::Cached(data)
        } else if let Some(rx) = entry.live_in_flight() {
            FetchPlan::Join(rx)
        } else {
            let (sender, rx) = watch::channel(None);
            entry.in_flight = Some(rx);
            FetchPlan::Lead {
                sender,
                generation: entry.generation,
            }
        }
    }

    /// Return fresh data for `key`, join an in-flight fetch, or run `fetcher`
    pub async fn fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<V, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        match self.plan(key) {
            FetchPlan::Cached(data) => {
                tracing::debug!("Cache hit for {key}");
                Ok(data)
            }
            FetchPlan::Join(rx) => {
                tracing::debug!("Joining in-flight fetch for {key}");
                Self::await_shared(rx).await
            }
            FetchPlan::Lead { sender, generation } => {
                self.lead(key, sender, generation, fetcher).await
            }
        }
    }

    /// Like [`fetch`](Self::fetch) but returns immediately.
    ///
    /// When a fetch is needed it runs on a spawned task; it is registered as
    /// in flight before this returns, so a snapshot taken right after shows
    /// it. Subscribers of `key` receive [`CacheEvent::Updated`] when it settles.
    pub fn spawn_fetch<F, Fut>(&self, key: &QueryKey, fetcher: F) -> FetchStart
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, ApiError>> + Send + 'static,
    {
        match self.plan(key) {
            FetchPlan::Cached(_) => {
                tracing::debug!("Cache hit for {key}");
                FetchStart::Cached
            }
            FetchPlan::Join(_) => {
                tracing::debug!("Fetch for {key} already in flight");
                FetchStart::InFlight
            }
            FetchPlan::Lead { sender, generation } => {
                let cache = self.clone();
                let key = key.clone();
                tokio::spawn(async move {
                    // The outcome reaches subscribers through the cache events
                    let _ = cache.lead(&key, sender, generation, fetcher).await;
                });
                FetchStart::Started
            }
        }
    }

    /// Run `fetcher` as the single leader for `key` and publish its result
    async fn lead<F, Fut>(
        &self,
        key: &QueryKey,
        sender: watch::Sender<SharedResult<V>>,
        generation: u64,
        fetcher: F,
    ) -> Result<V, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ApiError>>,
    {
        tracing::debug!("Fetching {key} (generation {generation})");
        let result = match tokio::time::timeout(self.fetch_timeout, fetcher()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("Fetch for {key} timed out after {:?}", self.fetch_timeout);
                Err(ApiError::TimedOut(self.fetch_timeout))
            }
        };

        let notifications = self.settle(key, generation, &result);
        sender.send_replace(Some(result.clone()));
        Self::deliver(notifications);
        result
    }

    async fn await_shared(mut rx: watch::Receiver<SharedResult<V>>) -> Result<V, ApiError> {
        match rx.wait_for(|value| value.is_some()).await {
            Ok(value) => value.clone().unwrap_or(Err(ApiError::Cancelled)),
            Err(_) => Err(ApiError::Cancelled),
        }
    }

    /// Store a settled result unless its generation was superseded
    fn settle(
        &self,
        key: &QueryKey,
        generation: u64,
        result: &Result<V, ApiError>,
    ) -> Notifications {
        let mut state = self.lock();
        let Some(entry) = state.entries.get_mut(key) else {
            tracing::debug!("Entry {key} was removed while fetching; result not cached");
            return Vec::new();
        };
        if entry.generation != generation {
            tracing::debug!("Discarding superseded result for {key} (generation {generation})");
            return Vec::new();
        }

        entry.in_flight = None;
        match result {
            Ok(data) => {
                entry.data = Some(data.clone());
                entry.settled = QueryStatus::Success;
                entry.error = None;
                entry.updated_at = Some(Instant::now());
                entry.stale = false;
            }
            Err(e) => {
                entry.settled = QueryStatus::Error;
                entry.error = Some(e.clone());
            }
        }

        let event = CacheEvent::Updated {
            key: key.clone(),
            status: entry.settled,
        };
        let handlers = state.bus.handlers_for(&event);
        vec![(event, handlers)]
    }

    fn deliver(notifications: Notifications) {
        for (event, handlers) in notifications {
            for handler in handlers {
                handler(&event);
            }
        }
    }

    /// Current state of `key`
    pub fn snapshot(&self, key: &QueryKey) -> QuerySnapshot<V> {
        self.lock()
            .entries
            .get(key)
            .map(CacheEntry::snapshot)
            .unwrap_or_else(QuerySnapshot::idle)
    }

    /// Mark every entry tagged `tag` stale and notify its subscribers.
    ///
    /// Returns the number of entries affected.
    pub fn invalidate(&self, tag: &str) -> usize {
        let (affected, notifications) = {
            let mut guard = self.lock();
            let state = &mut *guard;
            let mut affected = 0;
            for (key, entry) in state.entries.iter_mut() {
                if key.tag() == tag {
                    state.generation += 1;
                    entry.stale = true;
                    entry.generation = state.generation;
                    entry.in_flight = None;
                    affected += 1;
                }
            }
            tracing::debug!("Invalidated {affected} entries tagged '{tag}'");

            let notifications: Notifications = state
                .bus
                .subscribed_keys()
                .into_iter()
                .filter(|key| key.tag() == tag)
                .map(|key| {
                    let event = CacheEvent::Invalidated { key };
                    let handlers = state.bus.handlers_for(&event);
                    (event, handlers)
                })
                .collect();
            (affected, notifications)
        };

        Self::deliver(notifications);
        affected
    }

    /// Register `handler` for events about `key`
    pub fn subscribe(&self, key: QueryKey, handler: CacheEventHandler) -> SubscriptionId {
        self.lock().bus.subscribe_to_cache_events(key, handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().bus.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().bus.subscriber_count()
    }

    /// Drop one entry; an in-flight fetch for it will not be cached.
    ///
    /// A later entry for the same key gets a newer generation, so the old
    /// fetch cannot overwrite it either.
    pub fn remove(&self, key: &QueryKey) -> bool {
        self.lock().entries.remove(key).is_some()
    }

    /// Drop every entry, with the same guarantee as [`remove`](Self::remove)
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
