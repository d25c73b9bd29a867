//! Journey state of a passenger
//!
//! A journey records where the passenger is in the stage network, what it
//! is doing there, every pool visit so far, and the terminal outcome once
//! one is reached.

use crate::facility::StageStep;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{Outcome, PassengerId, PoolId, StageKind};
use serde::{Deserialize, Serialize};

/// What a passenger is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Activity {
    /// Created but not yet delivered its arrival event
    Pending,
    /// Chose a pool and is about to decide whether to join it
    Deciding {
        /// Selected pool
        pool: PoolId,
    },
    /// Waiting in a pool's queue
    Waiting {
        /// Pool being waited on
        pool: PoolId,
        /// Token identifying this wait; renege checks carry it
        token: u64,
    },
    /// Holding a server
    InService {
        /// Serving pool
        pool: PoolId,
    },
    /// On a timed detour (document resolution, secondary inspection)
    InTransit,
    /// Journey ended
    Finished,
}

/// One visit to a pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageVisit {
    /// Stage of the pool
    pub stage: StageKind,
    /// Pool visited
    pub pool: PoolId,
    /// When the passenger reached the step, before any queue switch
    pub step_entered_at: f64,
    /// When the passenger joined this pool
    pub enqueued_at: f64,
    /// When service began
    pub service_start: Option<f64>,
    /// When service ended
    pub service_end: Option<f64>,
    /// Whether the passenger left this pool's queue for another one
    pub switched_away: bool,
}

impl StageVisit {
    /// Minutes waited at the step before service started
    pub fn wait_minutes(&self) -> Option<f64> {
        self.service_start.map(|start| start - self.step_entered_at)
    }

    /// Minutes in service
    pub fn service_minutes(&self) -> Option<f64> {
        match (self.service_start, self.service_end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

/// Progress of a passenger through the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    /// Current stage
    pub stage: StageKind,
    /// Current step within the stage
    pub step: usize,
    /// Current activity
    pub activity: Activity,
    /// Outcome; terminal outcomes are set exactly once
    pub outcome: Outcome,
    /// Time the outcome became terminal
    pub finished_at: Option<f64>,
    /// Pool visits in order
    pub visits: Vec<StageVisit>,
    /// Times the passenger was sent back to check-in
    pub document_loops: u32,
    /// Times the passenger was held for secondary inspection
    pub secondary_inspections: u32,
    /// Queue switches while waiting
    pub jockeys: u32,
    /// Kiosk balks converted into counter visits
    pub balk_jockeys: u32,
    /// Kiosks may not be used (set after a document issue)
    pub kiosk_excluded: bool,
    /// Start of the current wait at this step, kept across queue switches
    pub wait_started_at: Option<f64>,
    /// Wait already covered by earlier renege checks
    pub renege_checked_wait: f64,
    wait_token: u64,
}

impl Default for Journey {
    fn default() -> Self {
        Self::new()
    }
}

impl Journey {
    /// A journey that has not yet started
    pub fn new() -> Self {
        Self {
            stage: StageKind::CheckIn,
            step: 0,
            activity: Activity::Pending,
            outcome: Outcome::InProgress,
            finished_at: None,
            visits: Vec::new(),
            document_loops: 0,
            secondary_inspections: 0,
            jockeys: 0,
            balk_jockeys: 0,
            kiosk_excluded: false,
            wait_started_at: None,
            renege_checked_wait: 0.0,
            wait_token: 0,
        }
    }

    /// Current position as a stage step
    pub fn position(&self) -> StageStep {
        StageStep { stage: self.stage, step: self.step }
    }

    /// Whether the journey has ended
    pub fn is_finished(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Move to a new step and start deciding on `pool`
    pub fn enter_step(&mut self, at: StageStep, pool: PoolId) {
        self.stage = at.stage;
        self.step = at.step;
        self.activity = Activity::Deciding { pool };
        self.wait_started_at = None;
        self.renege_checked_wait = 0.0;
    }

    /// Record that the passenger joined `pool` at `now`
    pub fn join_pool(&mut self, pool: PoolId, now: f64) {
        let step_entered_at = self.wait_started_at.unwrap_or(now);
        self.visits.push(StageVisit {
            stage: pool.stage(),
            pool,
            step_entered_at,
            enqueued_at: now,
            service_start: None,
            service_end: None,
            switched_away: false,
        });
    }

    /// Mark the passenger as waiting at `pool`, returning the wait token
    pub fn begin_wait(&mut self, pool: PoolId, now: f64) -> u64 {
        self.wait_token += 1;
        if self.wait_started_at.is_none() {
            self.wait_started_at = Some(now);
        }
        self.activity = Activity::Waiting { pool, token: self.wait_token };
        self.wait_token
    }

    /// Whether a renege check with `token` for `pool` is still current
    pub fn is_waiting_with(&self, pool: PoolId, token: u64) -> bool {
        self.activity == Activity::Waiting { pool, token }
    }

    /// Mark the passenger as holding a server at `pool`
    pub fn grant(&mut self, pool: PoolId) {
        self.activity = Activity::InService { pool };
    }

    /// Record the start of service in the current visit
    pub fn start_service(&mut self, pool: PoolId, now: f64) -> SimulationResult<()> {
        let visit = self.current_visit_mut(pool)?;
        visit.service_start = Some(now);
        Ok(())
    }

    /// Record the end of service in the current visit
    pub fn finish_service(&mut self, pool: PoolId, now: f64) -> SimulationResult<()> {
        let visit = self.current_visit_mut(pool)?;
        visit.service_end = Some(now);
        self.wait_started_at = None;
        self.renege_checked_wait = 0.0;
        Ok(())
    }

    /// Mark the current visit as abandoned for another pool
    pub fn leave_for_alternative(&mut self, pool: PoolId) -> SimulationResult<()> {
        let visit = self.current_visit_mut(pool)?;
        visit.switched_away = true;
        self.jockeys += 1;
        Ok(())
    }

    /// Start a timed detour
    pub fn start_transit(&mut self) {
        self.activity = Activity::InTransit;
    }

    /// Set a terminal outcome
    ///
    /// Fails if the journey already ended or `outcome` is not terminal.
    pub fn finish(&mut self, passenger: PassengerId, outcome: Outcome, now: f64) -> SimulationResult<()> {
        if self.outcome.is_terminal() {
            return Err(SimulationError::invariant_violation(format!(
                "{} already finished as {}, cannot become {}",
                passenger, self.outcome, outcome
            )));
        }
        if !outcome.is_terminal() {
            return Err(SimulationError::invariant_violation(format!(
                "{} cannot finish as {}",
                passenger, outcome
            )));
        }
        self.outcome = outcome;
        self.finished_at = Some(now);
        self.activity = Activity::Finished;
        Ok(())
    }

    /// Number of visits to pools of `stage`, excluding abandoned queues
    pub fn visits_to(&self, stage: StageKind) -> usize {
        self.visits.iter().filter(|v| v.stage == stage && !v.switched_away).count()
    }

    fn current_visit_mut(&mut self, pool: PoolId) -> SimulationResult<&mut StageVisit> {
        match self.visits.last_mut() {
            Some(visit) if visit.pool == pool => Ok(visit),
            _ => Err(SimulationError::invariant_violation(format!(
                "no open visit at {}",
                pool
            ))),
        }
    }
}
