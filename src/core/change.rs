//! Change detection between the stored status and an incoming update.
//!
//! Detection is a pure function of the current vote map and the supplied
//! entities. It does not mutate anything; the store decides what to do
//! with the result.

use super::snapshot::StateVotes;
use super::votes::VoteCount;
use serde::{Serialize, Serializer};

/// Entities whose vote distribution differs from the previous status.
///
/// Entries keep the order the entities were supplied in. An empty set
/// means "no entities changed".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    entries: Vec<(String, VoteCount)>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// New votes recorded for `name`, if it changed.
    pub fn get(&self, name: &str) -> Option<VoteCount> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_str() == name)
            .map(|(_, count)| *count)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VoteCount)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), count))
    }

    fn record(&mut self, name: &str, count: VoteCount) {
        self.entries.push((name.to_string(), count));
    }
}

impl Serialize for ChangeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Compare supplied entities against the current vote map.
///
/// An entity lands in the change set if it is absent from `current` or if
/// any of its three fields differs. Field comparison stops at the first
/// mismatch. Names in `incoming` are expected to be unique, as
/// [`StateUpdate`](super::StateUpdate) guarantees.
///
/// # Example
///
/// ```rust
/// use ecmap_status::core::{detect_changes, StateVotes, VoteCount};
///
/// let mut current = StateVotes::new();
/// current.insert("Ohio".to_string(), VoteCount::new(0, 18, 0));
///
/// let incoming = vec![
///     ("Ohio".to_string(), VoteCount::new(0, 18, 0)),
///     ("Iowa".to_string(), VoteCount::new(6, 0, 0)),
/// ];
///
/// let changes = detect_changes(&current, &incoming);
/// assert_eq!(changes.len(), 1);
/// assert!(changes.contains("Iowa"));
/// ```
pub fn detect_changes(current: &StateVotes, incoming: &[(String, VoteCount)]) -> ChangeSet {
    let mut changes = ChangeSet::new();
    for (name, count) in incoming {
        let changed = match current.get(name) {
            None => true,
            Some(previous) => previous.first_difference(count).is_some(),
        };
        if changed {
            changes.record(name, *count);
        }
    }
    changes
}
