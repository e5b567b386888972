//! Build errors for the store builder.

use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur when building a store.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("max_cascade must be at least 1")]
    InvalidCascadeLimit,

    #[error("Year range start {start} is after end {end}")]
    InvalidYearRange { start: i32, end: i32 },

    #[error("Initial status rejected: {0}")]
    InitialStateRejected(#[source] StoreError),
}
