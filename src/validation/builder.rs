//! Builder API for update rules.

use crate::validation::context::UpdateContext;
use crate::validation::rules::{UpdateCheck, UpdateRules};
use crate::validation::violations::{Violation, ViolationStrategy};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating update rules
#[derive(Default)]
pub struct RulesBuilder {
    max_entity_votes: Option<u32>,
    year_range: Option<(i32, i32)>,
    required_checks: Vec<UpdateCheck>,
    on_violation: ViolationStrategy,
}

impl RulesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the total votes a single entity may hold
    pub fn max_entity_votes(mut self, max: u32) -> Self {
        self.max_entity_votes = Some(max);
        self
    }

    /// Restrict the year to `start..=end`
    pub fn year_range(mut self, start: i32, end: i32) -> Self {
        self.year_range = Some((start, end));
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&UpdateContext<'_>) -> Validation<(), NonEmptyVec<Violation>>
            + Send
            + Sync
            + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&UpdateContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.require(move |ctx| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(Violation::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        })
    }

    /// Set violation handling strategy
    pub fn on_violation(mut self, strategy: ViolationStrategy) -> Self {
        self.on_violation = strategy;
        self
    }

    pub fn build(self) -> UpdateRules {
        UpdateRules {
            max_entity_votes: self.max_entity_votes,
            year_range: self.year_range,
            required_checks: self.required_checks,
            on_violation: self.on_violation,
        }
    }
}
