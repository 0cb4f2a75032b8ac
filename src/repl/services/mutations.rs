//! # Profile Mutations
//!
//! Create, update and delete calls that invalidate every cached profile list
//! once the backend confirms them.

use crate::repl::models::{ProfilePage, ProfileRecord};
use crate::repl::services::http::{ApiError, ProfileApi};
use crate::repl::services::query_cache::{QueryCache, USERS_TAG};
use std::sync::Arc;

/// Mutation side of the data-access layer
#[derive(Clone)]
pub struct ProfileMutations {
    api: Arc<dyn ProfileApi>,
    cache: QueryCache<ProfilePage>,
}

impl ProfileMutations {
    pub fn new(api: Arc<dyn ProfileApi>, cache: QueryCache<ProfilePage>) -> Self {
        Self { api, cache }
    }

    pub async fn create(&self, record: &ProfileRecord) -> Result<ProfileRecord, ApiError> {
        let created = self.api.create_profile(record).await?;
        tracing::info!("Created profile {} ({})", created.id, created.username());
        self.cache.invalidate(USERS_TAG);
        Ok(created)
    }

    pub async fn update(&self, record: &ProfileRecord) -> Result<ProfileRecord, ApiError> {
        let updated = self.api.update_profile(record).await?;
        tracing::info!("Updated profile {}", record.id);
        self.cache.invalidate(USERS_TAG);
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete_user(id).await?;
        tracing::info!("Deleted user {id}");
        self.cache.invalidate(USERS_TAG);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::models::Gender;
    use crate::repl::services::query_cache::QueryKey;
    use crate::repl::services::ListQuery;
    use crate::repl::testing::{record, FakeProfileApi};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn setup(api: FakeProfileApi) -> (Arc<FakeProfileApi>, QueryCache<ProfilePage>, ProfileMutations) {
        let api = Arc::new(api);
        let cache = QueryCache::default();
        let mutations = ProfileMutations::new(api.clone(), cache.clone());
        (api, cache, mutations)
    }

    fn watch_invalidations(cache: &QueryCache<ProfilePage>) -> Arc<AtomicUsize> {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();
        let key = QueryKey::users(&ListQuery::new(1, 6));
        cache.subscribe(
            key,
            Arc::new(move |_| {
                counter_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        counter
    }

    #[tokio::test]
    async fn successful_delete_should_invalidate_users() {
        let (api, cache, mutations) = setup(FakeProfileApi::seeded(3));
        let invalidations = watch_invalidations(&cache);

        mutations.delete(2).await.unwrap();

        assert_eq!(invalidations.load(Ordering::SeqCst), 1);
        assert_eq!(api.records().len(), 2);
    }

    #[tokio::test]
    async fn failed_mutation_should_not_invalidate() {
        let (api, cache, mutations) = setup(FakeProfileApi::seeded(3));
        api.set_fail_mutations(true);
        let invalidations = watch_invalidations(&cache);

        let draft = record(0, "dave", 33, "Nice", Gender::Male);
        assert_eq!(mutations.create(&draft).await, Err(ApiError::AddUser));
        assert_eq!(mutations.update(&draft).await, Err(ApiError::UpdateUser));
        assert_eq!(mutations.delete(1).await, Err(ApiError::DeleteUser));

        assert_eq!(invalidations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn create_should_return_backend_assigned_ids() {
        let (_api, cache, mutations) = setup(FakeProfileApi::seeded(2));
        let invalidations = watch_invalidations(&cache);

        let mut draft = record(0, "erin", 28, "Lyon", Gender::Female);
        draft.user.id = 0;
        let created = mutations.create(&draft).await.unwrap();

        assert_eq!(created.id, 3);
        assert!(created.is_persisted());
        assert_eq!(invalidations.load(Ordering::SeqCst), 1);
    }
}
