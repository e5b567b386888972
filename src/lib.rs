//! Ecmap Status: the in-memory model behind an electoral-vote map.
//!
//! The store holds one vote distribution per entity (usually a state),
//! keeps aggregate totals in step with it, and tells subscribers what
//! changed after every update.
//!
//! # Core Concepts
//!
//! - **Vote counts**: `dem`, `rep` and `toss` electoral votes per entity
//! - **Snapshots**: owned copies of the status; the store never lends out
//!   its own
//! - **Change sets**: which entities the last update actually changed
//! - **Events**: `change:state` per supplied entity, then one `change`
//!
//! # Example
//!
//! ```rust
//! use ecmap_status::core::{StateUpdate, VoteCount, VoteDelta};
//! use ecmap_status::{EventKind, StateStore, StoreError};
//!
//! let mut store = StateStore::new();
//!
//! store.on_state_change(|_ctx, entity| {
//!     println!("recolor {} ({} / {} / {})", entity.name, entity.votes.dem, entity.votes.rep, entity.votes.toss);
//! });
//! store.on_change(|_ctx, snapshot| {
//!     println!("totals: {}", snapshot.totals);
//! });
//!
//! store
//!     .apply_update(StateUpdate::new().year(2012).votes("Ohio", VoteCount::new(0, 18, 0)))
//!     .unwrap();
//! assert_eq!(store.changed_entities().unwrap().get("Ohio"), Some(VoteCount::new(0, 18, 0)));
//!
//! store.apply_relative_delta([("Ohio", VoteDelta::new(2, 0, 0))]).unwrap();
//! assert_eq!(store.totals(), VoteCount::new(2, 18, 0));
//!
//! let err = store.apply_relative_delta([("Texas", VoteDelta::new(1, 0, 0))]);
//! assert!(matches!(err, Err(StoreError::UnknownEntity { .. })));
//!
//! assert_eq!(store.off(EventKind::Change, None), 1);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod events;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use builder::{StoreBuilder, StoreConfig};
pub use crate::core::{ChangeSet, StateSnapshot, StateUpdate, VoteCount, VoteDelta};
pub use events::{Event, EventContext, EventKind, StateChangedEvent, SubscriptionId};
pub use store::{StateStore, StoreError, UpdateOutcome};
