//! Rule violations and handling strategies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single failed update rule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    #[error("Entity '{name}' holds {total} votes, more than the allowed {max}")]
    EntityVotesExceeded { name: String, total: u64, max: u32 },

    #[error("Year {year} is outside the allowed range {start}..={end}")]
    YearOutOfRange { year: i32, start: i32, end: i32 },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}

/// What the store does when an update breaks a rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationStrategy {
    /// Refuse the update. Nothing is mutated and no events fire.
    #[default]
    Reject,

    /// Apply the update anyway and log each violation.
    IgnoreAndLog,
}
