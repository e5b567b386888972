//! Update rules checked with `Validation`.

use crate::validation::context::UpdateContext;
use crate::validation::violations::{Violation, ViolationStrategy};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for custom rule functions
pub type UpdateCheck =
    Box<dyn Fn(&UpdateContext<'_>) -> Validation<(), NonEmptyVec<Violation>> + Send + Sync>;

/// Rules every update must satisfy before it touches the store.
/// Uses Validation to report ALL violations at once.
#[derive(Default)]
pub struct UpdateRules {
    pub(crate) max_entity_votes: Option<u32>,
    pub(crate) year_range: Option<(i32, i32)>,
    pub(crate) required_checks: Vec<UpdateCheck>,
    pub(crate) on_violation: ViolationStrategy,
}

impl UpdateRules {
    /// True if no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.max_entity_votes.is_none()
            && self.year_range.is_none()
            && self.required_checks.is_empty()
    }

    /// Check all rules, accumulating ALL violations.
    pub fn enforce(&self, context: &UpdateContext<'_>) -> Validation<(), NonEmptyVec<Violation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<Violation>>> = Vec::new();

        if let Some(max) = self.max_entity_votes {
            for (name, count) in context.entities() {
                let total = u64::from(count.dem) + u64::from(count.rep) + u64::from(count.toss);
                let check = if total > u64::from(max) {
                    Validation::fail(Violation::EntityVotesExceeded {
                        name: name.to_string(),
                        total,
                        max,
                    })
                } else {
                    Validation::success(())
                };
                checks.push(check);
            }
        }

        if let (Some((start, end)), Some(year)) = (self.year_range, context.update.year_value()) {
            let check = if year < start || year > end {
                Validation::fail(Violation::YearOutOfRange { year, start, end })
            } else {
                Validation::success(())
            };
            checks.push(check);
        }

        for check_fn in &self.required_checks {
            checks.push(check_fn(context));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn violation_strategy(&self) -> ViolationStrategy {
        self.on_violation
    }
}
