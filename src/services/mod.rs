//! Query and mutation entry points used by the pages.
//!
//! Reads go through the session's `QueryClient`. Mutations call the API,
//! wait for the server's answer, and only then invalidate the queries they
//! affect. There are no optimistic updates.

pub mod actions;
pub mod dashboard;
pub mod meetings;

use crate::error::MutationError;

/// Lifecycle of one mutation as a page sees it.
#[derive(Debug, Clone, Default)]
pub enum MutationState<T> {
    #[default]
    Idle,
    Pending,
    Success(T),
    Error(MutationError),
}

impl<T> MutationState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MutationState::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MutationState::Error(_))
    }

    pub fn from_result(result: Result<T, MutationError>) -> Self {
        match result {
            Ok(value) => MutationState::Success(value),
            Err(e) => MutationState::Error(e),
        }
    }
}
