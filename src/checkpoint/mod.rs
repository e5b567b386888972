//! Shareable captures of the map status.
//!
//! A checkpoint records the year and per-entity votes at one moment. It is
//! meant for handing the status to something outside the process, such as
//! encoding it into a link or a saved scenario, and later replaying it into
//! a store. Totals are not stored; they are derived again on restore.

use crate::core::{StateSnapshot, StateUpdate, StateVotes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable capture of a store's status.
///
/// # Example
///
/// ```rust
/// use ecmap_status::checkpoint::Checkpoint;
/// use ecmap_status::core::{StateUpdate, VoteCount};
/// use ecmap_status::StateStore;
///
/// let mut store = StateStore::new();
/// store
///     .apply_update(StateUpdate::new().year(2012).votes("Ohio", VoteCount::new(18, 0, 0)))
///     .unwrap();
///
/// let json = store.checkpoint().to_json().unwrap();
/// let restored = Checkpoint::from_json(&json).unwrap();
///
/// let mut copy = StateStore::new();
/// copy.restore(&restored).unwrap();
/// assert_eq!(copy.snapshot(), store.snapshot());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub year: Option<i32>,

    pub state_votes: StateVotes,
}

impl Checkpoint {
    pub fn from_snapshot(snapshot: &StateSnapshot) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            year: snapshot.year,
            state_votes: snapshot.state_votes.clone(),
        }
    }

    /// Reject checkpoints written by an unsupported format version.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }

    /// Rebuild the snapshot, totals included.
    pub fn snapshot(&self) -> Result<StateSnapshot, CheckpointError> {
        let mut snapshot = StateSnapshot {
            year: self.year,
            state_votes: self.state_votes.clone(),
            totals: Default::default(),
        };
        snapshot
            .recompute_totals()
            .map_err(|party| CheckpointError::TotalsOverflow { party })?;
        Ok(snapshot)
    }

    /// Full update that replays this checkpoint into a store.
    pub fn to_update(&self) -> StateUpdate {
        let update = StateUpdate::new().all_votes(self.state_votes.clone());
        match self.year {
            Some(year) => update.year(year),
            None => update,
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::Encode {
            format: "json",
            reason: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json).map_err(|e| CheckpointError::Decode {
            format: "json",
            reason: e.to_string(),
        })?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode {
            format: "binary",
            reason: e.to_string(),
        })
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes).map_err(|e| CheckpointError::Decode {
            format: "binary",
            reason: e.to_string(),
        })?;
        checkpoint.validate()?;
        Ok(checkpoint)
    }
}
