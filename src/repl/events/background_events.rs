//! # Background Events
//!
//! Outcomes of work the view model started without waiting for it: settled
//! or invalidated cache entries, and finished mutations.

use super::cache_events::CacheEvent;
use crate::repl::models::ProfileRecord;
use crate::repl::services::ApiError;

/// Result of a mutation that ran on a spawned task
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Created(Result<ProfileRecord, ApiError>),
    Updated(Result<ProfileRecord, ApiError>),
    Deleted { id: i64, result: Result<(), ApiError> },
}

impl MutationOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            MutationOutcome::Created(result) | MutationOutcome::Updated(result) => result.is_ok(),
            MutationOutcome::Deleted { result, .. } => result.is_ok(),
        }
    }
}

/// Anything the event loop can receive from the view model besides input
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundEvent {
    Cache(CacheEvent),
    Mutation(MutationOutcome),
}
