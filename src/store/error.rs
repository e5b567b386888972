//! Store error types.

use crate::checkpoint::CheckpointError;
use crate::core::Party;
use crate::validation::Violation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Errors that can occur while updating the store.
///
/// A call that returns one of these has changed nothing: every check runs
/// before the stored status is touched. Failures of handler-requested
/// updates are not returned this way; they are collected in
/// [`UpdateOutcome::nested_errors`](super::UpdateOutcome::nested_errors).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown entity '{name}'")]
    UnknownEntity { name: String },

    #[error("Delta would take {party} votes of '{name}' below zero")]
    VoteUnderflow { name: String, party: Party },

    #[error("Delta would take {party} votes of '{name}' past the maximum")]
    VoteOverflow { name: String, party: Party },

    #[error("Total {party} votes overflow")]
    TotalsOverflow { party: Party },

    #[error("Update rejected by {} rule violation(s)", .0.len())]
    Rejected(NonEmptyVec<Violation>),

    #[error("Nested updates are not allowed during notification")]
    ReentrantUpdate,

    #[error("Nested update cascade exceeded {limit} updates")]
    CascadeLimit { limit: usize },

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}
