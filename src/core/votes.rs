//! Per-entity vote distributions and relative adjustments.
//!
//! A [`VoteCount`] splits one entity's electoral votes between the two
//! parties and an undecided bucket. All arithmetic on counts is checked so
//! a bad delta or an oversized total is reported instead of wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One of the three buckets an electoral vote can sit in.
///
/// The order of [`Party::ALL`] is the order fields are compared in when
/// deciding whether an entity changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Dem,
    Rep,
    Toss,
}

impl Party {
    /// Every party, in comparison order.
    pub const ALL: [Party; 3] = [Party::Dem, Party::Rep, Party::Toss];

    /// Field name used in payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dem => "dem",
            Self::Rep => "rep",
            Self::Toss => "toss",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Electoral votes held by a single entity.
///
/// # Example
///
/// ```rust
/// use ecmap_status::core::{Party, VoteCount};
///
/// let ohio = VoteCount::new(0, 18, 0);
/// assert_eq!(ohio.get(Party::Rep), 18);
/// assert_eq!(ohio.total(), Some(18));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteCount {
    pub dem: u32,
    pub rep: u32,
    pub toss: u32,
}

impl VoteCount {
    pub const ZERO: VoteCount = VoteCount {
        dem: 0,
        rep: 0,
        toss: 0,
    };

    pub fn new(dem: u32, rep: u32, toss: u32) -> Self {
        Self { dem, rep, toss }
    }

    pub fn get(&self, party: Party) -> u32 {
        match party {
            Party::Dem => self.dem,
            Party::Rep => self.rep,
            Party::Toss => self.toss,
        }
    }

    fn slot(&mut self, party: Party) -> &mut u32 {
        match party {
            Party::Dem => &mut self.dem,
            Party::Rep => &mut self.rep,
            Party::Toss => &mut self.toss,
        }
    }

    /// Sum of all three buckets, or `None` on overflow.
    pub fn total(&self) -> Option<u32> {
        self.dem.checked_add(self.rep)?.checked_add(self.toss)
    }

    /// First party whose count differs from `other`.
    ///
    /// Comparison stops at the first mismatch.
    pub fn first_difference(&self, other: &VoteCount) -> Option<Party> {
        Party::ALL
            .into_iter()
            .find(|party| self.get(*party) != other.get(*party))
    }

    /// Field-wise checked addition.
    ///
    /// Returns the party whose sum overflowed on failure.
    pub fn checked_add(&self, other: &VoteCount) -> Result<VoteCount, Party> {
        let mut sum = *self;
        for party in Party::ALL {
            *sum.slot(party) = self
                .get(party)
                .checked_add(other.get(party))
                .ok_or(party)?;
        }
        Ok(sum)
    }

    /// Apply a relative adjustment to every field.
    ///
    /// Fails with the offending party and whether it went below zero
    /// (`DeltaError::Underflow`) or past `u32::MAX` (`DeltaError::Overflow`).
    pub fn apply_delta(&self, delta: &VoteDelta) -> Result<VoteCount, DeltaError> {
        let mut next = *self;
        for party in Party::ALL {
            let adjusted = i64::from(self.get(party)).saturating_add(delta.get(party));
            if adjusted < 0 {
                return Err(DeltaError::Underflow(party));
            }
            *next.slot(party) = u32::try_from(adjusted).map_err(|_| DeltaError::Overflow(party))?;
        }
        Ok(next)
    }

    /// Sum a collection of counts, failing on the first overflowing party.
    pub fn sum<'a, I>(counts: I) -> Result<VoteCount, Party>
    where
        I: IntoIterator<Item = &'a VoteCount>,
    {
        counts
            .into_iter()
            .try_fold(VoteCount::ZERO, |acc, count| acc.checked_add(count))
    }
}

impl fmt::Display for VoteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dem={} rep={} toss={}", self.dem, self.rep, self.toss)
    }
}

/// Relative adjustment to a [`VoteCount`].
///
/// Fields omitted when deserializing are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteDelta {
    pub dem: i64,
    pub rep: i64,
    pub toss: i64,
}

impl VoteDelta {
    pub fn new(dem: i64, rep: i64, toss: i64) -> Self {
        Self { dem, rep, toss }
    }

    /// Delta touching a single party.
    pub fn party(party: Party, amount: i64) -> Self {
        let mut delta = Self::default();
        match party {
            Party::Dem => delta.dem = amount,
            Party::Rep => delta.rep = amount,
            Party::Toss => delta.toss = amount,
        }
        delta
    }

    pub fn get(&self, party: Party) -> i64 {
        match party {
            Party::Dem => self.dem,
            Party::Rep => self.rep,
            Party::Toss => self.toss,
        }
    }
}

/// Why a delta could not be applied to a count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DeltaError {
    #[error("{0} votes would drop below zero")]
    Underflow(Party),

    #[error("{0} votes would exceed the maximum")]
    Overflow(Party),
}
