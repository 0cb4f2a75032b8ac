//! # Services Layer
//!
//! The data-access layer used by the view models:
//! - `http`: typed calls against the profile backend
//! - `query_cache`: keyed result cache with deduplication and invalidation
//! - `mutations`: create/update/delete calls that invalidate cached lists

pub mod http;
pub mod mutations;
pub mod query_cache;

pub use http::{ApiError, HttpProfileService, ListQuery, ProfileApi};
pub use mutations::ProfileMutations;
pub use query_cache::{FetchStart, QueryCache, QueryKey, QuerySnapshot, QueryStatus, USERS_TAG};

use crate::repl::models::ProfilePage;
use std::sync::Arc;

/// Aggregates the services shared by a session
#[derive(Clone)]
pub struct Services {
    /// Backend access
    pub api: Arc<dyn ProfileApi>,
    /// Cache of list pages
    pub cache: QueryCache<ProfilePage>,
    /// Mutations bound to the same cache
    pub mutations: ProfileMutations,
}

impl Services {
    pub fn new(api: Arc<dyn ProfileApi>, cache: QueryCache<ProfilePage>) -> Self {
        let mutations = ProfileMutations::new(Arc::clone(&api), cache.clone());
        Self {
            api,
            cache,
            mutations,
        }
    }
}
