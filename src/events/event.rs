//! Event kinds and payloads published by the store.

use crate::core::{StateSnapshot, VoteCount};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The two notification tiers.
///
/// Wire names are `"change"` and `"change:state"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Whole-status notification, fired once per update.
    #[serde(rename = "change")]
    Change,
    /// Per-entity notification.
    #[serde(rename = "change:state")]
    StateChange,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::StateChange => "change:state",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown event name '{0}', expected \"change\" or \"change:state\"")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "change" => Ok(Self::Change),
            "change:state" => Ok(Self::StateChange),
            other => Err(UnknownEventKind(other.to_string())),
        }
    }
}

/// Payload of a `change:state` event: one entity's new votes.
///
/// Serializes flat as `{ name, dem, rep, toss }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChangedEvent {
    pub name: String,
    #[serde(flatten)]
    pub votes: VoteCount,
}

impl StateChangedEvent {
    pub fn new(name: impl Into<String>, votes: VoteCount) -> Self {
        Self {
            name: name.into(),
            votes,
        }
    }
}

/// A notification delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Full copy of the status after an update.
    Change(StateSnapshot),
    /// One entity supplied in an update.
    StateChange(StateChangedEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Change(_) => EventKind::Change,
            Self::StateChange(_) => EventKind::StateChange,
        }
    }
}
