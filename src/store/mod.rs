//! The status store.
//!
//! [`StateStore`] owns the canonical snapshot, the change set of the last
//! update, and the subscriber list. It is the only writer of all three.
//!
//! # Update cycle
//!
//! 1. Rules (if any) are checked against the update.
//! 2. The new status is staged: year overwritten, supplied entities
//!    compared and overwritten, totals recomputed over every entity.
//! 3. The staged status and change set are committed.
//! 4. `change:state` fires per supplied entity, in supplied order.
//! 5. `change` fires once with a copy of the committed status.
//! 6. Updates requested by handlers during steps 4 and 5 run next, each as its own
//!    full cycle.
//!
//! Steps 1 and 2 can fail. Nothing is committed or published when they do.
//! A call returns `Err` only when its own update fails; failures of
//! handler-requested updates are reported in [`UpdateOutcome`].

mod error;

pub use error::StoreError;

use crate::builder::{NotifyPolicy, ReentrancyPolicy, StoreBuilder, StoreConfig};
use crate::checkpoint::Checkpoint;
use crate::core::{
    detect_changes, ChangeSet, DeltaError, StateSnapshot, StateUpdate, VoteCount, VoteDelta,
};
use crate::events::{
    Event, EventBus, EventContext, EventKind, PendingUpdate, StateChangedEvent, SubscriptionId,
};
use crate::validation::{UpdateContext, UpdateRules, ViolationStrategy};
use std::collections::VecDeque;
use stillwater::validation::Validation;
use tracing::{debug, info, warn};

/// Summary of one top-level update call.
///
/// The caller's own update is always among `applied`. Handler-requested
/// updates that failed are skipped and land in `nested_errors`.
#[derive(Debug, Default)]
pub struct UpdateOutcome {
    /// Updates applied, including ones requested by handlers.
    pub applied: usize,
    /// Events published across all applied updates.
    pub published: usize,
    /// Failures of handler-requested updates, in the order they ran.
    pub nested_errors: Vec<StoreError>,
}

impl UpdateOutcome {
    /// True if every handler-requested update was applied.
    pub fn is_complete(&self) -> bool {
        self.nested_errors.is_empty()
    }
}

#[derive(Default)]
struct Cycle {
    published: usize,
    requested: Vec<PendingUpdate>,
}

/// Authoritative electoral-map status with change notifications.
///
/// # Example
///
/// ```rust
/// use ecmap_status::core::{StateUpdate, VoteCount, VoteDelta};
/// use ecmap_status::StateStore;
///
/// let mut store = StateStore::new();
/// store.on_change(|_ctx, snapshot| {
///     println!("dem={} rep={}", snapshot.totals.dem, snapshot.totals.rep);
/// });
///
/// store
///     .apply_update(StateUpdate::new().votes("Ohio", VoteCount::new(0, 18, 0)))
///     .unwrap();
/// store
///     .apply_relative_delta([("Ohio", VoteDelta::new(2, 0, 0))])
///     .unwrap();
///
/// assert_eq!(store.totals(), VoteCount::new(2, 18, 0));
/// ```
pub struct StateStore {
    snapshot: StateSnapshot,
    changes: ChangeSet,
    bus: EventBus,
    rules: UpdateRules,
    notify: NotifyPolicy,
    reentrancy: ReentrancyPolicy,
    max_cascade: usize,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    /// Empty store with default configuration and no rules.
    pub fn new() -> Self {
        Self::from_parts(StoreConfig::default(), UpdateRules::default())
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub(crate) fn from_parts(config: StoreConfig, rules: UpdateRules) -> Self {
        Self {
            snapshot: StateSnapshot::default(),
            changes: ChangeSet::new(),
            bus: EventBus::new(),
            rules,
            notify: config.notify,
            reentrancy: config.reentrancy,
            max_cascade: config.max_cascade,
        }
    }

    // Subscriptions

    /// Subscribe to events of `kind`.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut EventContext<'_>, &Event) + Send + 'static,
    {
        self.bus.subscribe(kind, handler)
    }

    /// Subscribe to `change` with the snapshot payload unwrapped.
    pub fn on_change<F>(&mut self, mut handler: F) -> SubscriptionId
    where
        F: FnMut(&mut EventContext<'_>, &StateSnapshot) + Send + 'static,
    {
        self.on(EventKind::Change, move |ctx, event| {
            if let Event::Change(snapshot) = event {
                handler(ctx, snapshot);
            }
        })
    }

    /// Subscribe to `change:state` with the entity payload unwrapped.
    pub fn on_state_change<F>(&mut self, mut handler: F) -> SubscriptionId
    where
        F: FnMut(&mut EventContext<'_>, &StateChangedEvent) + Send + 'static,
    {
        self.on(EventKind::StateChange, move |ctx, event| {
            if let Event::StateChange(payload) = event {
                handler(ctx, payload);
            }
        })
    }

    /// Unsubscribe one handler, or all handlers of `kind` when `id` is
    /// `None`. Returns how many were removed.
    pub fn off(&mut self, kind: EventKind, id: Option<SubscriptionId>) -> usize {
        self.bus.unsubscribe(kind, id)
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.bus.subscriber_count(kind)
    }

    // Reads

    /// Copy of the current status.
    pub fn snapshot(&self) -> StateSnapshot {
        self.snapshot.clone()
    }

    /// Entities changed by the most recent update, or `None` if it changed
    /// none (or no update has happened yet).
    pub fn changed_entities(&self) -> Option<ChangeSet> {
        (!self.changes.is_empty()).then(|| self.changes.clone())
    }

    pub fn year(&self) -> Option<i32> {
        self.snapshot.year
    }

    pub fn totals(&self) -> VoteCount {
        self.snapshot.totals
    }

    pub fn votes(&self, name: &str) -> Option<VoteCount> {
        self.snapshot.votes(name)
    }

    /// Number of entities held.
    pub fn len(&self) -> usize {
        self.snapshot.state_votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.state_votes.is_empty()
    }

    // Writes

    /// Apply a partial status update and notify subscribers.
    ///
    /// An empty update clears the change set and publishes nothing.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Rejected`] if rules refuse the update
    /// - [`StoreError::TotalsOverflow`] if totals would not fit in `u32`
    ///
    /// The store is untouched on `Err`. Once the update itself is applied
    /// the call succeeds; handler-requested updates that fail, including
    /// [`StoreError::CascadeLimit`], are collected in
    /// [`UpdateOutcome::nested_errors`].
    pub fn apply_update(&mut self, update: StateUpdate) -> Result<UpdateOutcome, StoreError> {
        self.run(PendingUpdate::Absolute(update))
    }

    /// Adjust entities relative to their current votes.
    ///
    /// The merged result covers every stored entity, so `change:state`
    /// fires for all of them, not only the adjusted ones.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownEntity`] if a delta names an entity that is not
    /// stored; [`StoreError::VoteUnderflow`] / [`StoreError::VoteOverflow`]
    /// if a field leaves the `u32` range. The store is untouched in all
    /// three cases. Handler-requested updates report failures the same way
    /// as in [`apply_update`](Self::apply_update).
    pub fn apply_relative_delta<I, N>(&mut self, deltas: I) -> Result<UpdateOutcome, StoreError>
    where
        I: IntoIterator<Item = (N, VoteDelta)>,
        N: Into<String>,
    {
        let deltas = deltas
            .into_iter()
            .map(|(name, delta)| (name.into(), delta))
            .collect();
        self.run(PendingUpdate::Relative(deltas))
    }

    /// Capture the current status for sharing.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::from_snapshot(&self.snapshot)
    }

    /// Apply a checkpoint as a full update.
    ///
    /// Entities held by the store but absent from the checkpoint are kept.
    pub fn restore(&mut self, checkpoint: &Checkpoint) -> Result<UpdateOutcome, StoreError> {
        checkpoint.validate()?;
        info!(
            checkpoint = %checkpoint.id,
            entities = checkpoint.state_votes.len(),
            "Restoring status from checkpoint"
        );
        self.apply_update(checkpoint.to_update())
    }

    /// Apply `update` without publishing anything.
    pub(crate) fn seed(&mut self, update: &StateUpdate) -> Result<(), StoreError> {
        self.enforce_rules(update)?;
        let (snapshot, _) = self.stage(update)?;
        self.snapshot = snapshot;
        Ok(())
    }

    fn run(&mut self, first: PendingUpdate) -> Result<UpdateOutcome, StoreError> {
        let cycle = self.apply_pending(first)?;
        let mut outcome = UpdateOutcome {
            applied: 1,
            published: cycle.published,
            nested_errors: Vec::new(),
        };
        let mut queue = VecDeque::from(cycle.requested);

        while let Some(next) = queue.pop_front() {
            if outcome.applied == self.max_cascade {
                warn!(
                    limit = self.max_cascade,
                    dropped = queue.len() + 1,
                    "Nested update cascade limit reached"
                );
                outcome.nested_errors.push(StoreError::CascadeLimit {
                    limit: self.max_cascade,
                });
                break;
            }

            match self.apply_pending(next) {
                Ok(cycle) => {
                    outcome.applied += 1;
                    outcome.published += cycle.published;
                    queue.extend(cycle.requested);
                }
                Err(err) => {
                    warn!(error = %err, "Nested update failed, skipping");
                    outcome.nested_errors.push(err);
                }
            }
        }

        Ok(outcome)
    }

    fn apply_pending(&mut self, pending: PendingUpdate) -> Result<Cycle, StoreError> {
        let update = match pending {
            PendingUpdate::Absolute(update) => update,
            PendingUpdate::Relative(deltas) => self.resolve_deltas(&deltas)?,
        };
        self.apply_one(&update)
    }

    fn resolve_deltas(&self, deltas: &[(String, VoteDelta)]) -> Result<StateUpdate, StoreError> {
        let mut merged = self.snapshot.state_votes.clone();
        for (name, delta) in deltas {
            let slot = merged
                .get_mut(name)
                .ok_or_else(|| StoreError::UnknownEntity { name: name.clone() })?;
            *slot = slot.apply_delta(delta).map_err(|err| match err {
                DeltaError::Underflow(party) => StoreError::VoteUnderflow {
                    name: name.clone(),
                    party,
                },
                DeltaError::Overflow(party) => StoreError::VoteOverflow {
                    name: name.clone(),
                    party,
                },
            })?;
        }
        Ok(StateUpdate::new().all_votes(merged))
    }

    fn apply_one(&mut self, update: &StateUpdate) -> Result<Cycle, StoreError> {
        if update.is_empty() {
            self.changes = ChangeSet::new();
            debug!("Empty update, nothing to publish");
            return Ok(Cycle::default());
        }

        self.enforce_rules(update)?;
        let (snapshot, changes) = self.stage(update)?;
        self.snapshot = snapshot;
        self.changes = changes;

        debug!(
            year = ?self.snapshot.year,
            supplied = update.state_votes().map_or(0, |votes| votes.len()),
            changed = self.changes.len(),
            totals = %self.snapshot.totals,
            "Update applied"
        );

        Ok(self.notify(update))
    }

    /// Build the post-update status without committing it.
    fn stage(&self, update: &StateUpdate) -> Result<(StateSnapshot, ChangeSet), StoreError> {
        let mut next = self.snapshot.clone();
        if let Some(year) = update.year_value() {
            next.year = Some(year);
        }

        let mut changes = ChangeSet::new();
        if let Some(votes) = update.state_votes() {
            changes = detect_changes(&next.state_votes, votes);
            for (name, count) in votes {
                next.state_votes.insert(name.clone(), *count);
            }
            next.recompute_totals()
                .map_err(|party| StoreError::TotalsOverflow { party })?;
        }

        Ok((next, changes))
    }

    fn enforce_rules(&self, update: &StateUpdate) -> Result<(), StoreError> {
        if self.rules.is_empty() {
            return Ok(());
        }

        match self.rules.enforce(&UpdateContext::new(&self.snapshot, update)) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(violations) => match self.rules.violation_strategy() {
                ViolationStrategy::Reject => Err(StoreError::Rejected(violations)),
                ViolationStrategy::IgnoreAndLog => {
                    for violation in violations.iter() {
                        warn!(%violation, "Update rule violated, applying anyway");
                    }
                    Ok(())
                }
            },
        }
    }

    fn notify(&mut self, update: &StateUpdate) -> Cycle {
        let mut ctx = EventContext::new(&self.snapshot, &self.changes, self.reentrancy);
        let mut published = 0;

        for (name, count) in update.state_votes().unwrap_or_default() {
            if self.notify == NotifyPolicy::ChangedOnly && !self.changes.contains(name) {
                continue;
            }
            let event = Event::StateChange(StateChangedEvent::new(name.clone(), *count));
            let delivered = self.bus.publish(&event, &mut ctx);
            debug!(event = %EventKind::StateChange, entity = %name, delivered, "Event published");
            published += 1;
        }

        let event = Event::Change(self.snapshot.clone());
        let delivered = self.bus.publish(&event, &mut ctx);
        debug!(event = %EventKind::Change, delivered, "Event published");
        published += 1;

        Cycle {
            published,
            requested: ctx.into_pending(),
        }
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("snapshot", &self.snapshot)
            .field("changes", &self.changes)
            .field("bus", &self.bus)
            .field("notify", &self.notify)
            .field("reentrancy", &self.reentrancy)
            .field("max_cascade", &self.max_cascade)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::RulesBuilder;
    use std::sync::{Arc, Mutex};

    fn ohio() -> StateUpdate {
        StateUpdate::new().votes("Ohio", VoteCount::new(0, 18, 0))
    }

    fn event_log(store: &mut StateStore) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let state_log = Arc::clone(&log);
        store.on_state_change(move |_ctx, payload| {
            state_log
                .lock()
                .unwrap()
                .push(format!("change:state({})", payload.name));
        });
        let change_log = Arc::clone(&log);
        store.on_change(move |_ctx, _snapshot| {
            change_log.lock().unwrap().push("change".to_string());
        });
        log
    }

    #[test]
    fn new_store_is_empty() {
        let store = StateStore::new();
        assert!(store.is_empty());
        assert_eq!(store.totals(), VoteCount::ZERO);
        assert_eq!(store.year(), None);
        assert!(store.changed_entities().is_none());
    }

    #[test]
    fn first_update_initializes_entity() {
        let mut store = StateStore::new();
        store.apply_update(ohio()).unwrap();

        assert_eq!(store.totals(), VoteCount::new(0, 18, 0));
        let changes = store.changed_entities().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.get("Ohio"), Some(VoteCount::new(0, 18, 0)));
    }

    #[test]
    fn partial_update_keeps_totals_over_all_entities() {
        let mut store = StateStore::new();
        store
            .apply_update(
                StateUpdate::new()
                    .votes("Ohio", VoteCount::new(0, 18, 0))
                    .votes("Iowa", VoteCount::new(6, 0, 0)),
            )
            .unwrap();
        store
            .apply_update(StateUpdate::new().votes("Iowa", VoteCount::new(0, 0, 6)))
            .unwrap();

        assert_eq!(store.totals(), VoteCount::new(0, 18, 6));
        assert!(store.snapshot().totals_consistent());
    }

    #[test]
    fn empty_update_publishes_nothing() {
        let mut store = StateStore::new();
        let log = event_log(&mut store);

        let outcome = store.apply_update(StateUpdate::new()).unwrap();

        assert_eq!(outcome.published, 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_update_clears_change_set() {
        let mut store = StateStore::new();
        store.apply_update(ohio()).unwrap();
        store.apply_update(StateUpdate::new()).unwrap();
        assert!(store.changed_entities().is_none());
    }

    #[test]
    fn year_only_update_fires_change_without_entities() {
        let mut store = StateStore::new();
        store.apply_update(ohio()).unwrap();
        let log = event_log(&mut store);

        store.apply_update(StateUpdate::new().year(2016)).unwrap();

        assert_eq!(store.year(), Some(2016));
        assert!(store.changed_entities().is_none());
        assert_eq!(*log.lock().unwrap(), vec!["change".to_string()]);
    }

    #[test]
    fn events_follow_supplied_order_then_change() {
        let mut store = StateStore::new();
        let log = event_log(&mut store);

        store
            .apply_update(
                StateUpdate::new()
                    .votes("Wyoming", VoteCount::new(0, 3, 0))
                    .votes("Alabama", VoteCount::new(0, 9, 0)),
            )
            .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "change:state(Wyoming)".to_string(),
                "change:state(Alabama)".to_string(),
                "change".to_string(),
            ]
        );
    }

    #[test]
    fn unchanged_entities_still_notified_by_default() {
        let mut store = StateStore::new();
        store.apply_update(ohio()).unwrap();
        let log = event_log(&mut store);

        store.apply_update(ohio()).unwrap();

        assert!(store.changed_entities().is_none());
        assert_eq!(
            *log.lock().unwrap(),
            vec!["change:state(Ohio)".to_string(), "change".to_string()]
        );
    }

    #[test]
    fn changed_only_policy_filters_state_events() {
        let mut store = StateStore::builder()
            .notify_policy(NotifyPolicy::ChangedOnly)
            .build()
            .unwrap();
        store.apply_update(ohio()).unwrap();
        let log = event_log(&mut store);

        store
            .apply_update(ohio().votes("Iowa", VoteCount::new(6, 0, 0)))
            .unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["change:state(Iowa)".to_string(), "change".to_string()]
        );
    }

    #[test]
    fn handlers_see_consistent_totals() {
        let mut store = StateStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.on_state_change(move |ctx, _payload| {
            sink.lock().unwrap().push(ctx.snapshot().totals);
        });

        store
            .apply_update(
                StateUpdate::new()
                    .votes("Ohio", VoteCount::new(0, 18, 0))
                    .votes("Iowa", VoteCount::new(6, 0, 0)),
            )
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![VoteCount::new(6, 18, 0), VoteCount::new(6, 18, 0)]
        );
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut store = StateStore::new();
        store.apply_update(ohio()).unwrap();

        let mut copy = store.snapshot();
        copy.state_votes.clear();
        copy.totals = VoteCount::ZERO;

        assert_eq!(store.votes("Ohio"), Some(VoteCount::new(0, 18, 0)));
        assert_eq!(store.totals(), VoteCount::new(0, 18, 0));
    }

    #[test]
    fn relative_delta_adjusts_and_notifies_all_entities() {
        let mut store = StateStore::new();
        store
            .apply_update(ohio().votes("Iowa", VoteCount::new(6, 0, 0)))
            .unwrap();
        let log = event_log(&mut store);

        store
            .apply_relative_delta([("Ohio", VoteDelta::new(2, 0, 0))])
            .unwrap();

        assert_eq!(store.votes("Ohio"), Some(VoteCount::new(2, 18, 0)));
        assert_eq!(store.totals(), VoteCount::new(8, 18, 0));
        assert_eq!(log.lock().unwrap().len(), 3);
        let changes = store.changed_entities().unwrap();
        assert_eq!(changes.names().collect::<Vec<_>>(), vec!["Ohio"]);
    }

    #[test]
    fn relative_delta_unknown_entity_leaves_store_untouched() {
        let mut store = StateStore::new();
        store.apply_update(ohio()).unwrap();
        let log = event_log(&mut store);
        let before = store.snapshot();

        let result = store.apply_relative_delta([("Texas", VoteDelta::new(1, 0, 0))]);

        assert!(matches!(result, Err(StoreError::UnknownEntity { ref name }) if name == "Texas"));
        assert_eq!(store.snapshot(), before);
        assert!(store.changed_entities().is_some());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn relative_delta_underflow_is_rejected() {
        let mut store = StateStore::new();
        store.apply_update(ohio()).unwrap();

        let result = store.apply_relative_delta([("Ohio", VoteDelta::new(-1, 0, 0))]);

        assert!(matches!(
            result,
            Err(StoreError::VoteUnderflow { party: crate::core::Party::Dem, .. })
        ));
        assert_eq!(store.votes("Ohio"), Some(VoteCount::new(0, 18, 0)));
    }

    #[test]
    fn totals_overflow_is_rejected_before_commit() {
        let mut store = StateStore::new();
        store
            .apply_update(StateUpdate::new().votes("A", VoteCount::new(u32::MAX, 0, 0)))
            .unwrap();

        let result = store.apply_update(StateUpdate::new().votes("B", VoteCount::new(1, 0, 0)));

        assert!(matches!(result, Err(StoreError::TotalsOverflow { .. })));
        assert_eq!(store.len(), 1);
        assert_eq!(store.totals(), VoteCount::new(u32::MAX, 0, 0));
    }

    #[test]
    fn nested_request_runs_after_current_cycle() {
        let mut store = StateStore::new();
        let log = event_log(&mut store);
        let mut requested = false;
        store.on_change(move |ctx, snapshot| {
            if !requested && snapshot.votes("Ohio").is_some() {
                requested = true;
                ctx.request_update(StateUpdate::new().year(2012)).unwrap();
            }
        });

        let outcome = store.apply_update(ohio()).unwrap();

        assert_eq!(outcome.applied, 2);
        assert_eq!(store.year(), Some(2012));
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "change:state(Ohio)".to_string(),
                "change".to_string(),
                "change".to_string(),
            ]
        );
    }

    #[test]
    fn nested_request_does_not_overwrite_in_flight_changes() {
        let mut store = StateStore::new();
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        store.on_state_change(move |ctx, payload| {
            if payload.name == "Ohio" {
                ctx.request_update(StateUpdate::new().votes("Iowa", VoteCount::new(6, 0, 0)))
                    .unwrap();
            }
        });
        store.on_change(move |ctx, _snapshot| {
            let names: Vec<String> = ctx
                .changed_entities()
                .map(|changes| changes.names().map(str::to_string).collect())
                .unwrap_or_default();
            sink.lock().unwrap().push(names);
        });

        store.apply_update(ohio()).unwrap();

        assert_eq!(
            *observed.lock().unwrap(),
            vec![vec!["Ohio".to_string()], vec!["Iowa".to_string()]]
        );
    }

    #[test]
    fn endless_nested_requests_hit_cascade_limit() {
        let mut store = StateStore::builder().max_cascade(3).build().unwrap();
        store.on_change(|ctx, snapshot| {
            let next = snapshot.year.unwrap_or(0) + 1;
            ctx.request_update(StateUpdate::new().year(next)).unwrap();
        });

        let outcome = store.apply_update(StateUpdate::new().year(1)).unwrap();

        assert_eq!(outcome.applied, 3);
        assert!(matches!(
            outcome.nested_errors.as_slice(),
            [StoreError::CascadeLimit { limit: 3 }]
        ));
        assert_eq!(store.year(), Some(3));
    }

    #[test]
    fn failed_nested_delta_does_not_fail_the_applied_update() {
        let mut store = StateStore::new();
        store.apply_update(ohio()).unwrap();
        let mut requested = false;
        store.on_change(move |ctx, _snapshot| {
            if !requested {
                requested = true;
                ctx.request_delta([("Texas", VoteDelta::new(1, 0, 0))])
                    .unwrap();
            }
        });

        let outcome = store
            .apply_relative_delta([("Ohio", VoteDelta::new(2, 0, 0))])
            .unwrap();

        assert_eq!(outcome.applied, 1);
        assert!(!outcome.is_complete());
        assert!(matches!(
            outcome.nested_errors.as_slice(),
            [StoreError::UnknownEntity { name }] if name == "Texas"
        ));
        assert_eq!(store.votes("Ohio"), Some(VoteCount::new(2, 18, 0)));
    }

    #[test]
    fn later_nested_requests_run_after_a_failed_one() {
        let mut store = StateStore::builder()
            .rules(RulesBuilder::new().max_entity_votes(55))
            .build()
            .unwrap();
        let mut requested = false;
        store.on_change(move |ctx, _snapshot| {
            if !requested {
                requested = true;
                ctx.request_update(StateUpdate::new().votes("Ohio", VoteCount::new(99, 0, 0)))
                    .unwrap();
                ctx.request_update(StateUpdate::new().year(2012)).unwrap();
            }
        });

        let outcome = store.apply_update(ohio()).unwrap();

        assert_eq!(outcome.applied, 2);
        assert!(matches!(
            outcome.nested_errors.as_slice(),
            [StoreError::Rejected(_)]
        ));
        assert_eq!(store.votes("Ohio"), Some(VoteCount::new(0, 18, 0)));
        assert_eq!(store.year(), Some(2012));
    }

    #[test]
    fn reject_policy_refuses_nested_requests() {
        let mut store = StateStore::builder()
            .reentrancy(ReentrancyPolicy::Reject)
            .build()
            .unwrap();
        let refused = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&refused);
        store.on_change(move |ctx, _snapshot| {
            let result = ctx.request_update(StateUpdate::new().year(1999));
            *flag.lock().unwrap() = matches!(result, Err(StoreError::ReentrantUpdate));
        });

        let outcome = store.apply_update(ohio()).unwrap();

        assert_eq!(outcome.applied, 1);
        assert!(outcome.is_complete());
        assert!(*refused.lock().unwrap());
        assert_eq!(store.year(), None);
    }

    #[test]
    fn rules_reject_update_without_side_effects() {
        let mut store = StateStore::builder()
            .rules(RulesBuilder::new().max_entity_votes(55))
            .build()
            .unwrap();
        store.apply_update(ohio()).unwrap();
        let log = event_log(&mut store);

        let result = store.apply_update(
            StateUpdate::new()
                .year(2020)
                .votes("Ohio", VoteCount::new(100, 0, 0)),
        );

        assert!(matches!(result, Err(StoreError::Rejected(ref v)) if v.len() == 1));
        assert_eq!(store.year(), None);
        assert_eq!(store.votes("Ohio"), Some(VoteCount::new(0, 18, 0)));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn ignore_and_log_applies_violating_update() {
        let mut store = StateStore::builder()
            .rules(
                RulesBuilder::new()
                    .max_entity_votes(55)
                    .on_violation(ViolationStrategy::IgnoreAndLog),
            )
            .build()
            .unwrap();

        store
            .apply_update(StateUpdate::new().votes("Ohio", VoteCount::new(100, 0, 0)))
            .unwrap();

        assert_eq!(store.totals(), VoteCount::new(100, 0, 0));
    }

    #[test]
    fn off_removes_handlers() {
        let mut store = StateStore::new();
        let log = event_log(&mut store);

        assert_eq!(store.off(EventKind::StateChange, None), 1);
        store.apply_update(ohio()).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["change".to_string()]);
        assert_eq!(store.subscriber_count(EventKind::StateChange), 0);
    }

    #[test]
    fn checkpoint_restore_round_trips_status() {
        let mut source = StateStore::new();
        source
            .apply_update(ohio().year(2012).votes("Iowa", VoteCount::new(6, 0, 0)))
            .unwrap();

        let mut target = StateStore::new();
        let log = event_log(&mut target);
        target.restore(&source.checkpoint()).unwrap();

        assert_eq!(target.snapshot(), source.snapshot());
        assert_eq!(log.lock().unwrap().len(), 3);
    }
}
