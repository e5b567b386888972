//! Context provided to update rules.

use crate::core::{StateSnapshot, StateUpdate, VoteCount};

/// What a rule sees: the status before the update and the update itself.
#[derive(Clone, Copy, Debug)]
pub struct UpdateContext<'a> {
    pub current: &'a StateSnapshot,
    pub update: &'a StateUpdate,
}

impl<'a> UpdateContext<'a> {
    pub fn new(current: &'a StateSnapshot, update: &'a StateUpdate) -> Self {
        Self { current, update }
    }

    /// Supplied entities, in order. Empty if the vote map was omitted.
    pub fn entities(&self) -> impl Iterator<Item = (&'a str, &'a VoteCount)> {
        self.update
            .state_votes()
            .unwrap_or_default()
            .iter()
            .map(|(name, count)| (name.as_str(), count))
    }
}
