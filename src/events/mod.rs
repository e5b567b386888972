//! Change notifications.
//!
//! The store publishes two tiers of events through an [`EventBus`] it owns:
//!
//! - `change:state` once per supplied entity, after totals are recomputed
//! - `change` once per update, after every `change:state` of that update
//!
//! Handlers receive an [`EventContext`] alongside the [`Event`].

mod bus;
mod context;
mod event;

pub use bus::{EventBus, Handler, SubscriptionId};
pub use context::EventContext;
pub(crate) use context::PendingUpdate;
pub use event::{Event, EventKind, StateChangedEvent, UnknownEventKind};
