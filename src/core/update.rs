//! Partial status updates.

use super::votes::VoteCount;
use std::collections::HashMap;

/// A partial snapshot supplied to the store.
///
/// Either part may be absent. An update with neither is a no-op. Entity
/// votes keep the order they were supplied in, which is the order
/// per-entity notifications are delivered in.
///
/// # Example
///
/// ```rust
/// use ecmap_status::core::{StateUpdate, VoteCount};
///
/// let update = StateUpdate::new()
///     .year(2012)
///     .votes("Ohio", VoteCount::new(0, 18, 0))
///     .votes("Iowa", VoteCount::new(6, 0, 0));
///
/// assert_eq!(update.entity_names(), vec!["Ohio", "Iowa"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateUpdate {
    year: Option<i32>,
    state_votes: Option<Vec<(String, VoteCount)>>,
    positions: HashMap<String, usize>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the year.
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Add or replace one entity's votes.
    ///
    /// Replacing keeps the entity at its original position.
    pub fn votes(mut self, name: impl Into<String>, count: VoteCount) -> Self {
        self.insert(name.into(), count);
        self
    }

    /// Add every entity from `entries`, in iteration order.
    ///
    /// An empty iterator still marks the vote map as present.
    pub fn all_votes<I, N>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (N, VoteCount)>,
        N: Into<String>,
    {
        self.state_votes.get_or_insert_with(Vec::new);
        for (name, count) in entries {
            self.insert(name.into(), count);
        }
        self
    }

    fn insert(&mut self, name: String, count: VoteCount) {
        let entries = self.state_votes.get_or_insert_with(Vec::new);
        match self.positions.get(&name) {
            Some(&idx) => entries[idx].1 = count,
            None => {
                self.positions.insert(name.clone(), entries.len());
                entries.push((name, count));
            }
        }
    }

    pub fn year_value(&self) -> Option<i32> {
        self.year
    }

    /// Supplied entity votes, or `None` if the vote map was omitted.
    pub fn state_votes(&self) -> Option<&[(String, VoteCount)]> {
        self.state_votes.as_deref()
    }

    /// Names of supplied entities, in order.
    pub fn entity_names(&self) -> Vec<&str> {
        self.state_votes()
            .unwrap_or_default()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// True if neither a year nor a vote map was supplied.
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.state_votes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_update_is_empty() {
        let update = StateUpdate::new();
        assert!(update.is_empty());
        assert!(update.state_votes().is_none());
        assert_eq!(update.year_value(), None);
    }

    #[test]
    fn year_only_update_is_not_empty() {
        let update = StateUpdate::new().year(2016);
        assert!(!update.is_empty());
        assert!(update.state_votes().is_none());
    }

    #[test]
    fn empty_vote_map_is_still_present() {
        let update = StateUpdate::new().all_votes(Vec::<(String, VoteCount)>::new());
        assert!(!update.is_empty());
        assert_eq!(update.state_votes(), Some(&[][..]));
    }

    #[test]
    fn votes_preserve_supplied_order() {
        let update = StateUpdate::new()
            .votes("Wyoming", VoteCount::new(0, 3, 0))
            .votes("Alabama", VoteCount::new(0, 9, 0))
            .votes("Maine", VoteCount::new(3, 0, 1));

        assert_eq!(update.entity_names(), vec!["Wyoming", "Alabama", "Maine"]);
    }

    #[test]
    fn repeated_name_replaces_in_place() {
        let update = StateUpdate::new()
            .votes("Ohio", VoteCount::new(0, 18, 0))
            .votes("Iowa", VoteCount::new(6, 0, 0))
            .votes("Ohio", VoteCount::new(18, 0, 0));

        let votes = update.state_votes().unwrap();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0], ("Ohio".to_string(), VoteCount::new(18, 0, 0)));
    }

    #[test]
    fn bulk_votes_with_repeats_stay_unique() {
        let entries = (0..2_000u32).map(|i| (format!("entity-{}", i % 500), VoteCount::new(i, 0, 0)));
        let update = StateUpdate::new().all_votes(entries);

        let votes = update.state_votes().unwrap();
        assert_eq!(votes.len(), 500);
        assert_eq!(votes[0], ("entity-0".to_string(), VoteCount::new(1_500, 0, 0)));
        assert_eq!(votes[499], ("entity-499".to_string(), VoteCount::new(1_999, 0, 0)));
    }
}
