//! Synchronous subscriber list.

use crate::events::{Event, EventContext, EventKind};
use std::fmt;
use tracing::debug;

/// Boxed event handler.
pub type Handler = Box<dyn FnMut(&mut EventContext<'_>, &Event) + Send>;

/// Token returned by [`EventBus::subscribe`], used to unsubscribe a
/// single handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    kind: EventKind,
    handler: Handler,
}

/// Subscriber list owned by a store.
///
/// Delivery is synchronous, on the calling thread, in subscription order.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of `kind`.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut EventContext<'_>, &Event) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove one handler, or every handler for `kind` when `id` is `None`.
    ///
    /// Returns the number of handlers removed.
    pub fn unsubscribe(&mut self, kind: EventKind, id: Option<SubscriptionId>) -> usize {
        let before = self.subscribers.len();
        self.subscribers
            .retain(|sub| sub.kind != kind || id.is_some_and(|id| sub.id != id));
        before - self.subscribers.len()
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.iter().filter(|sub| sub.kind == kind).count()
    }

    /// Deliver `event` to every matching handler.
    ///
    /// Stops early if a handler calls [`EventContext::stop_propagation`].
    /// Returns the number of handlers invoked.
    pub fn publish(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> usize {
        let kind = event.kind();
        ctx.begin(kind);

        let mut delivered = 0;
        for sub in self.subscribers.iter_mut().filter(|sub| sub.kind == kind) {
            (sub.handler)(&mut *ctx, event);
            delivered += 1;
            if ctx.is_propagation_stopped() {
                debug!(event = %kind, delivered, "Propagation stopped by handler");
                break;
            }
        }
        delivered
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("change", &self.subscriber_count(EventKind::Change))
            .field("state_change", &self.subscriber_count(EventKind::StateChange))
            .finish()
    }
}
