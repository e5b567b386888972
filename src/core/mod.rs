//! Core status types and change detection.
//!
//! This module contains the pure part of the crate:
//! - Vote counts and relative deltas
//! - Owned status snapshots and partial updates
//! - Change detection between a snapshot and an update
//!
//! Nothing here publishes events or holds subscribers; that is the job
//! of the store.

mod change;
mod snapshot;
mod update;
mod votes;

pub use change::{detect_changes, ChangeSet};
pub use snapshot::{StateSnapshot, StateVotes};
pub use update::StateUpdate;
pub use votes::{DeltaError, Party, VoteCount, VoteDelta};
