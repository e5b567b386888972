//! Builder for constructing stores.

use crate::builder::config::{NotifyPolicy, ReentrancyPolicy, StoreConfig};
use crate::builder::error::BuildError;
use crate::core::StateUpdate;
use crate::store::StateStore;
use crate::validation::RulesBuilder;

/// Builder for constructing a [`StateStore`] with a fluent API.
#[derive(Default)]
pub struct StoreBuilder {
    config: StoreConfig,
    rules: RulesBuilder,
    initial: Option<StateUpdate>,
}

impl StoreBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn notify_policy(mut self, policy: NotifyPolicy) -> Self {
        self.config.notify = policy;
        self
    }

    pub fn reentrancy(mut self, policy: ReentrancyPolicy) -> Self {
        self.config.reentrancy = policy;
        self
    }

    pub fn max_cascade(mut self, limit: usize) -> Self {
        self.config.max_cascade = limit;
        self
    }

    /// Set the update rules.
    ///
    /// `max_entity_votes` and `year_range` from the configuration, when
    /// set, take precedence over the same rules set here.
    pub fn rules(mut self, rules: RulesBuilder) -> Self {
        self.rules = rules;
        self
    }

    /// Status the store starts with. Applied without publishing events.
    pub fn initial(mut self, update: StateUpdate) -> Self {
        self.initial = Some(update);
        self
    }

    /// Build the store.
    /// Returns an error if the configuration is invalid or the initial
    /// status breaks a rule.
    pub fn build(self) -> Result<StateStore, BuildError> {
        self.config.validate()?;

        let mut rules = self.rules;
        if let Some(max) = self.config.max_entity_votes {
            rules = rules.max_entity_votes(max);
        }
        if let Some((start, end)) = self.config.year_range {
            rules = rules.year_range(start, end);
        }

        let mut store = StateStore::from_parts(self.config, rules.build());
        if let Some(initial) = &self.initial {
            store
                .seed(initial)
                .map_err(BuildError::InitialStateRejected)?;
        }

        Ok(store)
    }
}
