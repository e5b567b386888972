//! Owned captures of the map status.
//!
//! A [`StateSnapshot`] is always handed out by value. Nothing in this crate
//! returns a reference into the store's canonical copy, so the only way to
//! change the stored status is through the store's update operations.

use super::votes::{Party, VoteCount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vote distribution per entity, keyed by entity name.
pub type StateVotes = BTreeMap<String, VoteCount>;

/// Full status of the map at one point in time.
///
/// `totals` is derived from `state_votes` and equals their field-wise sum
/// whenever a snapshot leaves the store.
///
/// # Example
///
/// ```rust
/// use ecmap_status::core::{StateSnapshot, VoteCount};
///
/// let mut snapshot = StateSnapshot::default();
/// snapshot.state_votes.insert("Ohio".to_string(), VoteCount::new(0, 18, 0));
/// snapshot.state_votes.insert("Iowa".to_string(), VoteCount::new(6, 0, 0));
/// snapshot.recompute_totals().unwrap();
///
/// assert_eq!(snapshot.totals, VoteCount::new(6, 18, 0));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Year the distribution applies to, if one has been set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Vote distribution per entity.
    #[serde(default)]
    pub state_votes: StateVotes,

    /// Field-wise sum over `state_votes`.
    #[serde(default)]
    pub totals: VoteCount,
}

impl StateSnapshot {
    /// Votes currently held by `name`.
    pub fn votes(&self, name: &str) -> Option<VoteCount> {
        self.state_votes.get(name).copied()
    }

    /// Rebuild `totals` from `state_votes`.
    ///
    /// On overflow `totals` is left untouched and the overflowing party is
    /// returned.
    pub fn recompute_totals(&mut self) -> Result<(), Party> {
        self.totals = VoteCount::sum(self.state_votes.values())?;
        Ok(())
    }

    /// True if `totals` matches the sum of `state_votes`.
    pub fn totals_consistent(&self) -> bool {
        VoteCount::sum(self.state_votes.values()) == Ok(self.totals)
    }
}
