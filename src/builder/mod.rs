//! Store construction and configuration.
//!
//! This module provides a fluent builder, serde-loadable configuration and
//! a macro for writing vote maps inline.
//!
//! # Example
//!
//! ```rust
//! use ecmap_status::builder::{NotifyPolicy, ReentrancyPolicy, StoreBuilder};
//! use ecmap_status::state_votes;
//! use ecmap_status::validation::RulesBuilder;
//!
//! let store = StoreBuilder::new()
//!     .notify_policy(NotifyPolicy::ChangedOnly)
//!     .reentrancy(ReentrancyPolicy::Reject)
//!     .rules(RulesBuilder::new().max_entity_votes(55))
//!     .initial(state_votes! {
//!         "California" => (55, 0, 0),
//!         "Texas" => (0, 38, 0),
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.len(), 2);
//! ```

mod config;
mod error;
mod macros;
mod store;

pub use config::{ConfigError, NotifyPolicy, ReentrancyPolicy, StoreConfig, DEFAULT_MAX_CASCADE};
pub use error::BuildError;
pub use store::StoreBuilder;
