//! Checkpoint error types.

use crate::core::Party;
use thiserror::Error;

/// Errors that can occur while encoding, decoding or replaying a checkpoint.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to encode checkpoint as {format}: {reason}")]
    Encode { format: &'static str, reason: String },

    #[error("Failed to decode {format} checkpoint: {reason}")]
    Decode { format: &'static str, reason: String },

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The recorded votes cannot be summed without overflowing.
    #[error("Checkpoint total {party} votes overflow")]
    TotalsOverflow { party: Party },
}
