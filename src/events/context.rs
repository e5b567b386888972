//! Context handed to event handlers.
//!
//! Handlers never get the store itself. The context lets them read the
//! status that triggered the event and ask for follow-up updates, which
//! the store applies once the current notification cycle has finished.

use crate::builder::ReentrancyPolicy;
use crate::core::{ChangeSet, StateSnapshot, StateUpdate, VoteDelta};
use crate::events::EventKind;
use crate::store::StoreError;
use tracing::warn;

/// Update requested from inside a handler.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PendingUpdate {
    Absolute(StateUpdate),
    Relative(Vec<(String, VoteDelta)>),
}

/// Per-cycle view of the store passed to every handler.
pub struct EventContext<'a> {
    kind: EventKind,
    snapshot: &'a StateSnapshot,
    changes: &'a ChangeSet,
    reentrancy: ReentrancyPolicy,
    pending: Vec<PendingUpdate>,
    propagation_stopped: bool,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(
        snapshot: &'a StateSnapshot,
        changes: &'a ChangeSet,
        reentrancy: ReentrancyPolicy,
    ) -> Self {
        Self {
            kind: EventKind::Change,
            snapshot,
            changes,
            reentrancy,
            pending: Vec::new(),
            propagation_stopped: false,
        }
    }

    /// Kind of the event currently being delivered.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Copy of the status that triggered this cycle.
    pub fn snapshot(&self) -> StateSnapshot {
        self.snapshot.clone()
    }

    /// Entities changed by the update that triggered this cycle.
    ///
    /// `None` when no entity changed.
    pub fn changed_entities(&self) -> Option<ChangeSet> {
        (!self.changes.is_empty()).then(|| self.changes.clone())
    }

    /// Ask the store to apply `update` after this cycle completes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReentrantUpdate`] when the store was built with
    /// [`ReentrancyPolicy::Reject`]. Nothing is queued in that case.
    pub fn request_update(&mut self, update: StateUpdate) -> Result<(), StoreError> {
        self.push(PendingUpdate::Absolute(update))
    }

    /// Ask the store to apply relative deltas after this cycle completes.
    ///
    /// Deltas are resolved against the status at the time they run, not
    /// the status visible now.
    ///
    /// # Errors
    ///
    /// Same as [`EventContext::request_update`].
    pub fn request_delta<I, N>(&mut self, deltas: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = (N, VoteDelta)>,
        N: Into<String>,
    {
        let deltas = deltas
            .into_iter()
            .map(|(name, delta)| (name.into(), delta))
            .collect();
        self.push(PendingUpdate::Relative(deltas))
    }

    /// Skip the remaining handlers for the event being delivered.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    fn push(&mut self, request: PendingUpdate) -> Result<(), StoreError> {
        match self.reentrancy {
            ReentrancyPolicy::Queue => {
                self.pending.push(request);
                Ok(())
            }
            ReentrancyPolicy::Reject => {
                warn!(event = %self.kind, "Nested update rejected");
                Err(StoreError::ReentrantUpdate)
            }
        }
    }

    pub(crate) fn begin(&mut self, kind: EventKind) {
        self.kind = kind;
        self.propagation_stopped = false;
    }

    pub(crate) fn into_pending(self) -> Vec<PendingUpdate> {
        self.pending
    }
}
