//! Store configuration.
//!
//! Plain data that can be written by hand or loaded from JSON. Every field
//! has a default, so `{}` is a valid configuration.

use crate::builder::error::BuildError;
use serde::{Deserialize, Serialize};

/// Default bound on updates applied by one top-level call, nested
/// requests included.
pub const DEFAULT_MAX_CASCADE: usize = 32;

/// Which supplied entities get a `change:state` event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Every entity present in the update, changed or not.
    #[default]
    AllSupplied,
    /// Only entities in the update's change set.
    ChangedOnly,
}

/// What happens when a handler asks for an update mid-notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReentrancyPolicy {
    /// Apply the request after the current notification cycle completes.
    #[default]
    Queue,
    /// Refuse the request with `StoreError::ReentrantUpdate`.
    Reject,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse store config: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Store configuration.
///
/// # Example
///
/// ```rust
/// use ecmap_status::builder::{NotifyPolicy, StoreConfig};
///
/// let config = StoreConfig::from_json_str(r#"{ "notify": "changed_only" }"#).unwrap();
/// assert_eq!(config.notify, NotifyPolicy::ChangedOnly);
/// assert_eq!(config.max_cascade, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub notify: NotifyPolicy,
    pub reentrancy: ReentrancyPolicy,
    /// Upper bound on updates applied by one top-level call.
    pub max_cascade: usize,
    /// Installs a per-entity vote cap rule when set.
    pub max_entity_votes: Option<u32>,
    /// Installs an inclusive year range rule when set.
    pub year_range: Option<(i32, i32)>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            notify: NotifyPolicy::default(),
            reentrancy: ReentrancyPolicy::default(),
            max_cascade: DEFAULT_MAX_CASCADE,
            max_entity_votes: None,
            year_range: None,
        }
    }
}

impl StoreConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.max_cascade == 0 {
            return Err(BuildError::InvalidCascadeLimit);
        }
        if let Some((start, end)) = self.year_range {
            if start > end {
                return Err(BuildError::InvalidYearRange { start, end });
            }
        }
        Ok(())
    }
}
