//! Stage processor
//!
//! This module contains the StageProcessor, which advances passenger
//! journeys one delivered event at a time. Each handler runs to completion
//! before the next event is delivered; any follow-up work is scheduled on
//! the clock, never performed recursively.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, trace};

use crate::events::{EventKind, EventRecord, ReentryReason, Scheduled, SimulationClock};
use crate::facility::{pool_settings, PoolSettings, RequestOutcome, StageStep};
use crate::passenger::behavior::{conditional_renege_probability, current_patience};
use crate::passenger::PassengerGenerator;
use crate::sim_event;
use crate::simulation::metrics::{MetricsSink, TransitionRecord};
use crate::simulation::{SimulationError, SimulationResult, SimulationState, TimeManager};
use crate::stages::boarding::MissReason;
use crate::stages::routing::RoutingPolicy;
use crate::stages::service_time::ServiceTimeModel;
use crate::types::{
    BehaviorConfig, FeedbackConfig, Outcome, PassengerId, PoolId, SimulationConfig, StageKind,
    TransitionKind,
};

/// Clock type driven by the processor
pub type EventClock = SimulationClock<EventKind>;

/// Handles every simulation event
#[derive(Debug)]
pub struct StageProcessor {
    generator: PassengerGenerator,
    routing: RoutingPolicy,
    service: ServiceTimeModel,
    settings: BTreeMap<PoolId, PoolSettings>,
    behavior: BehaviorConfig,
    feedback: FeedbackConfig,
    duration: f64,
    monitor_interval: f64,
}

impl StageProcessor {
    /// Build a processor from a validated configuration
    pub fn new(config: &SimulationConfig) -> SimulationResult<Self> {
        let settings = PoolId::ALL.into_iter().map(|id| (id, pool_settings(config, id))).collect();
        Ok(Self {
            generator: PassengerGenerator::new(config)?,
            routing: RoutingPolicy::new(config),
            service: ServiceTimeModel::new(
                config.attributes.clone(),
                config.behavior.clone(),
                TimeManager::new(config.time_modifiers.clone()),
                config.run.min_service_minutes,
            ),
            settings,
            behavior: config.behavior.clone(),
            feedback: config.feedback.clone(),
            duration: config.run.duration_minutes,
            monitor_interval: config.run.monitor_interval_minutes,
        })
    }

    /// Passenger generator used for arrivals and injected passengers
    pub fn generator(&self) -> &PassengerGenerator {
        &self.generator
    }

    /// Run length in minutes
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Time-of-day model shared with service sampling
    pub fn time_manager(&self) -> &TimeManager {
        self.service.time_manager()
    }

    /// `now` on the terminal clock, for log output
    fn clock_label(&self, now: f64) -> String {
        self.time_manager().format_clock(now)
    }

    /// Handle one delivered event
    pub fn dispatch<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        clock: &mut EventClock,
        scheduled: Scheduled<EventKind>,
    ) -> SimulationResult<()> {
        let Scheduled { time: now, seq, event } = scheduled;
        state.sink.record_event(&EventRecord { seq, time: now, event })?;
        trace!("t={:.3} #{} {}", now, seq, event);

        match event {
            EventKind::Generate => self.on_generate(state, clock, now),
            EventKind::Arrival { passenger } => self.on_arrival(state, clock, passenger, now),
            EventKind::BalkDecision { passenger, pool } => {
                self.on_balk_decision(state, clock, passenger, pool, now)
            }
            EventKind::ServiceStart { passenger, pool } => {
                self.on_service_start(state, clock, passenger, pool, now)
            }
            EventKind::ServiceComplete { passenger, pool } => {
                self.on_service_complete(state, clock, passenger, pool, now)
            }
            EventKind::RenegeCheck { passenger, pool, token } => {
                self.on_renege_check(state, clock, passenger, pool, token, now)
            }
            EventKind::StageReentry { passenger, stage, reason } => {
                debug!("{} re-enters {} after {:?} at {}", passenger, stage, reason, self.clock_label(now));
                self.enter_step(state, clock, passenger, StageStep::first(stage), now)
            }
            EventKind::MonitorTick => self.on_monitor_tick(state, clock, now),
        }
    }

    fn on_generate<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        clock: &mut EventClock,
        now: f64,
    ) -> SimulationResult<()> {
        let id = state.ids.allocate();
        let passenger = self.generator.create(id, now, &mut state.rng)?;
        debug!(
            "Generated {} ({}, {}) at {} departing at {}",
            id,
            passenger.class,
            passenger.strategy,
            self.clock_label(now),
            self.clock_label(passenger.departure_time)
        );
        state.insert(passenger)?;
        clock.schedule(now, EventKind::Arrival { passenger: id })?;

        if let Some(next) = self.generator.next_arrival(now, &mut state.rng) {
            if next < self.duration {
                clock.schedule(next, EventKind::Generate)?;
            }
        }
        Ok(())
    }

    fn on_arrival<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        clock: &mut EventClock,
        id: PassengerId,
        now: f64,
    ) -> SimulationResult<()> {
        state.transition(TransitionRecord::new(now, id, TransitionKind::Arrived))?;
        self.enter_step(state, clock, id, StageStep::first(StageKind::CheckIn), now)
    }

    /// Route a passenger into `at` and schedule its balk decision
    fn enter_step<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        clock: &mut EventClock,
        id: PassengerId,
        at: StageStep,
        now: f64,
    ) -> SimulationResult<()> {
        let passenger = state.passengers.get(&id).ok_or(SimulationError::UnknownPassenger(id))?;
        if at.stage == StageKind::Boarding {
            if let Some(reason) = state.flights.check_deadline(passenger, now) {
                return self.miss(state, id, None, reason, now);
            }
        }

        let pool = self.routing.choose_pool(passenger, at, &state.pools, &mut state.rng)?;
        state.passenger_mut(id)?.journey.enter_step(at, pool);
        clock.schedule(now, EventKind::BalkDecision { passenger: id, pool })?;
        Ok(())
    }

    fn on_balk_decision<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        clock: &mut EventClock,
        id: PassengerId,
        pool: PoolId,
        now: f64,
    ) -> SimulationResult<()> {
        let probability = self.settings(pool)?.balk_probability;
        if !state.rng.gen_bool(probability) {
            return self.join_queue(state, clock, id, pool, now);
        }

        if let Some(target) = self.routing.balk_jockey_target(pool, &mut state.rng) {
            let journey = &mut state.passenger_mut(id)?.journey;
            journey.balk_jockeys += 1;
            journey.enter_step(StageStep::of_pool(target), target);
            debug!("{} balked at {} and tries {}", id, pool, target);
            state.transition(TransitionRecord::between(now, id, TransitionKind::BalkJockeyed, pool, target))?;
            return self.join_queue(state, clock, id, target, now);
        }

        sim_event!(
            debug,
            "passenger balked",
            passenger = id.value(),
            time = now,
            clock = self.clock_label(now).as_str()
        );
        state.transition(TransitionRecord::at(now, id, TransitionKind::Balked, pool))?;
        self.finish(state, id, Outcome::Balked, now)
    }

    /// Request a server at `pool`; wait for it if none is free
    fn join_queue<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        clock: &mut EventClock,
        id: PassengerId,
        pool: PoolId,
        now: f64,
    ) -> SimulationResult<()> {
        let rank = state.passenger(id)?.class.rank();
        let outcome = state.pools.request(pool, id, rank, now)?;
        let journey = &mut state.passenger_mut(id)?.journey;
        journey.join_pool(pool, now);

        match outcome {
            RequestOutcome::Granted => {
                journey.grant(pool);
                clock.schedule(now, EventKind::ServiceStart { passenger: id, pool })?;
            }
            RequestOutcome::Queued { ahead } => {
                let token = journey.begin_wait(pool, now);
                debug!("{} queued at {} behind {}", id, pool, ahead);
                state.transition(TransitionRecord::at(now, id, TransitionKind::Queued, pool))?;
                self.schedule_renege_check(state, clock, id, pool, token, now)?;
            }
        }
        Ok(())
    }

    /// Patience of a waiting passenger at `now`
    fn patience_of<M: MetricsSink>(
        &self,
        state: &SimulationState<M>,
        id: PassengerId,
        pool: PoolId,
        now: f64,
    ) -> SimulationResult<f64> {
        let visible_progress = state
            .pools
            .get(pool)?
            .progressed_within(now, self.behavior.visible_progress_threshold_minutes);
        Ok(current_patience(state.passenger(id)?, now, visible_progress, &self.behavior))
    }

    /// Next check fires after the check interval or at the patience
    /// threshold, whichever comes first
    fn schedule_renege_check<M: MetricsSink>(
        &self,
        state: &SimulationState<M>,
        clock: &mut EventClock,
        id: PassengerId,
        pool: PoolId,
        token: u64,
        now: f64,
    ) -> SimulationResult<()> {
        let patience = self.patience_of(state, id, pool, now)?;
        let wait_start = state.passenger(id)?.journey.wait_started_at.unwrap_or(now);
        let at = (now + self.behavior.renege_check_interval_minutes)
            .min(wait_start + patience)
            .max(now);
        clock.schedule(at, EventKind::RenegeCheck { passenger: id, pool, token })?;
        Ok(())
    }

    /// Abandonment is decided before any queue switch at the same check
    fn on_renege_check<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        clock: &mut EventClock,
        id: PassengerId,
        pool: PoolId,
        token: u64,
        now: f64,
    ) -> SimulationResult<()> {
        let journey = &state.passenger(id)?.journey;
        if !journey.is_waiting_with(pool, token) {
            trace!("Stale renege check for {} at {}", id, pool);
            return Ok(());
        }
        let waited = now - journey.wait_started_at.unwrap_or(now);
        let checked = journey.renege_checked_wait;
        let patience = self.patience_of(state, id, pool, now)?;

        let probability = conditional_renege_probability(checked, waited, patience);
        if state.rng.gen_bool(probability) {
            self.withdraw(state, id, pool)?;
            sim_event!(
                debug,
                "passenger reneged",
                passenger = id.value(),
                clock = self.clock_label(now).as_str(),
                waited = waited,
                patience = patience
            );
            state.transition(TransitionRecord::at(now, id, TransitionKind::Reneged, pool))?;
            return self.finish(state, id, Outcome::Reneged, now);
        }

        let target = self.routing.jockey_target(state.passenger(id)?, pool, &state.pools)?;
        if let Some(target) = target {
            self.withdraw(state, id, pool)?;
            state.passenger_mut(id)?.journey.leave_for_alternative(pool)?;
            state.transition(TransitionRecord::between(now, id, TransitionKind::Jockeyed, pool, target))?;
            return self.join_queue(state, clock, id, target, now);
        }

        state.passenger_mut(id)?.journey.renege_checked_wait = waited;
        self.schedule_renege_check(state, clock, id, pool, token, now)
    }

    /// Remove a waiting passenger from `pool`
    fn withdraw<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        id: PassengerId,
        pool: PoolId,
    ) -> SimulationResult<()> {
        if state.pools.cancel(pool, id)? {
            Ok(())
        } else {
            Err(SimulationError::invariant_violation(format!(
                "{} is waiting at {} by its journey but not in the pool",
                id, pool
            )))
        }
    }

    fn on_service_start<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        clock: &mut EventClock,
        id: PassengerId,
        pool: PoolId,
        now: f64,
    ) -> SimulationResult<()> {
        let passenger = state.passengers.get(&id).ok_or(SimulationError::UnknownPassenger(id))?;
        if pool == PoolId::Gate {
            if let Some(reason) = state.flights.check_deadline(passenger, now) {
                self.release(state, clock, id, pool, now)?;
                return self.miss(state, id, Some(pool), reason, now);
            }
            // The seat is taken as soon as the gate starts processing the passenger
            state.flights.record_boarding(passenger);
        }

        let distribution = self.settings(pool)?.service;
        let minutes = self.service.sample(&distribution, passenger, pool.stage(), now, &mut state.rng)?;
        state.passenger_mut(id)?.journey.start_service(pool, now)?;
        state.transition(TransitionRecord::at(now, id, TransitionKind::ServiceStarted, pool))?;
        clock.schedule(now + minutes, EventKind::ServiceComplete { passenger: id, pool })?;
        Ok(())
    }

    /// Free the server held by `id` and wake whoever it is granted to
    fn release<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        clock: &mut EventClock,
        id: PassengerId,
        pool: PoolId,
        now: f64,
    ) -> SimulationResult<()> {
        if let Some(next) = state.pools.release(pool, id, now)? {
            state.passenger_mut(next)?.journey.grant(pool);
            clock.schedule(now, EventKind::ServiceStart { passenger: next, pool })?;
        }
        Ok(())
    }

    fn on_service_complete<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        clock: &mut EventClock,
        id: PassengerId,
        pool: PoolId,
        now: f64,
    ) -> SimulationResult<()> {
        self.release(state, clock, id, pool, now)?;
        state.passenger_mut(id)?.journey.finish_service(pool, now)?;
        state.transition(TransitionRecord::at(now, id, TransitionKind::ServiceCompleted, pool))?;

        let at = StageStep::of_pool(pool);
        match at.stage {
            StageKind::CheckIn => {
                let first_visit = state.passenger(id)?.journey.document_loops == 0;
                if first_visit && state.rng.gen_bool(self.feedback.document_issue_probability) {
                    let journey = &mut state.passenger_mut(id)?.journey;
                    journey.document_loops += 1;
                    journey.kiosk_excluded = true;
                    journey.start_transit();
                    state.transition(TransitionRecord::at(now, id, TransitionKind::DocumentIssue, pool))?;
                    clock.schedule(
                        now + self.feedback.document_issue_delay_minutes,
                        EventKind::StageReentry {
                            passenger: id,
                            stage: StageKind::CheckIn,
                            reason: ReentryReason::DocumentIssue,
                        },
                    )?;
                    return Ok(());
                }
            }
            StageKind::Security if at.is_last_in_stage() => {
                if state.rng.gen_bool(self.feedback.secondary_inspection_probability) {
                    let journey = &mut state.passenger_mut(id)?.journey;
                    journey.secondary_inspections += 1;
                    journey.start_transit();
                    state.transition(TransitionRecord::at(
                        now,
                        id,
                        TransitionKind::SecondaryInspection,
                        pool,
                    ))?;
                    clock.schedule(
                        now + self.feedback.secondary_inspection_minutes,
                        EventKind::StageReentry {
                            passenger: id,
                            stage: StageKind::Boarding,
                            reason: ReentryReason::SecondaryInspection,
                        },
                    )?;
                    return Ok(());
                }
            }
            StageKind::Security => {}
            StageKind::Boarding => {
                state.transition(TransitionRecord::at(now, id, TransitionKind::Completed, pool))?;
                return self.finish(state, id, Outcome::Completed, now);
            }
        }

        let next = at.next().ok_or_else(|| {
            SimulationError::invariant_violation(format!("no step follows {} for {}", pool, id))
        })?;
        self.enter_step(state, clock, id, next, now)
    }

    fn miss<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        id: PassengerId,
        pool: Option<PoolId>,
        reason: MissReason,
        now: f64,
    ) -> SimulationResult<()> {
        sim_event!(
            debug,
            "passenger missed flight",
            passenger = id.value(),
            clock = self.clock_label(now).as_str(),
            reason = reason.to_string().as_str()
        );
        let record = match pool {
            Some(pool) => TransitionRecord::at(now, id, TransitionKind::MissedDeadline, pool),
            None => TransitionRecord::new(now, id, TransitionKind::MissedDeadline),
        };
        state.transition(record)?;
        self.finish(state, id, Outcome::MissedDeadline, now)
    }

    /// Set the terminal outcome and emit the journey record
    fn finish<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        id: PassengerId,
        outcome: Outcome,
        now: f64,
    ) -> SimulationResult<()> {
        state.passenger_mut(id)?.journey.finish(id, outcome, now)?;
        state.record_journey(id)
    }

    fn on_monitor_tick<M: MetricsSink>(
        &self,
        state: &mut SimulationState<M>,
        clock: &mut EventClock,
        now: f64,
    ) -> SimulationResult<()> {
        for snapshot in state.pools.snapshots(now) {
            trace!(
                "{} {} busy {}/{} queue {}",
                self.clock_label(now),
                snapshot.pool,
                snapshot.busy,
                snapshot.capacity,
                snapshot.queue_length
            );
            state.sink.record_snapshot(&snapshot)?;
        }
        state.pools.check_invariants()?;

        let next = now + self.monitor_interval;
        if next < self.duration {
            clock.schedule(next, EventKind::MonitorTick)?;
        }
        Ok(())
    }

    fn settings(&self, pool: PoolId) -> SimulationResult<&PoolSettings> {
        self.settings
            .get(&pool)
            .ok_or_else(|| SimulationError::invariant_violation(format!("no settings for {}", pool)))
    }
}
