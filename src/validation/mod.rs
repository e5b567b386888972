//! Opt-in rules checked before an update touches the store.
//!
//! Without rules the store accepts any well-typed update. With rules,
//! every update (including ones queued from handlers and checkpoint
//! restores) is checked first, and ALL violations are collected using
//! Stillwater's `Validation` type instead of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use ecmap_status::core::{StateSnapshot, StateUpdate, VoteCount};
//! use ecmap_status::validation::{RulesBuilder, UpdateContext, ViolationStrategy};
//!
//! let rules = RulesBuilder::new()
//!     .max_entity_votes(55)
//!     .year_range(1789, 2100)
//!     .on_violation(ViolationStrategy::Reject)
//!     .build();
//!
//! let current = StateSnapshot::default();
//! let update = StateUpdate::new().votes("Ohio", VoteCount::new(0, 18, 0));
//! assert!(rules.enforce(&UpdateContext::new(&current, &update)).is_success());
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::RulesBuilder;
pub use context::UpdateContext;
pub use rules::UpdateRules;
pub use violations::{Violation, ViolationStrategy};
