//! Simulation event kinds
//!
//! Every state change of a passenger journey is driven by one of these
//! events being delivered by the clock.

use crate::types::{PassengerId, PoolId, StageKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a passenger re-enters the network after a timed delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReentryReason {
    /// Returning to check-in after resolving a document problem
    DocumentIssue,
    /// Moving on after secondary inspection
    SecondaryInspection,
}

/// Events processed by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Arrival process tick: create the next passenger
    Generate,
    /// A passenger enters the network
    Arrival {
        /// Arriving passenger
        passenger: PassengerId,
    },
    /// A passenger at a pool decides whether to join its queue
    BalkDecision {
        /// Deciding passenger
        passenger: PassengerId,
        /// Pool selected by routing
        pool: PoolId,
    },
    /// A passenger holding a server begins service
    ServiceStart {
        /// Passenger being served
        passenger: PassengerId,
        /// Pool providing service
        pool: PoolId,
    },
    /// A passenger's service ends
    ServiceComplete {
        /// Passenger being served
        passenger: PassengerId,
        /// Pool providing service
        pool: PoolId,
    },
    /// A waiting passenger reconsiders staying in the queue
    RenegeCheck {
        /// Waiting passenger
        passenger: PassengerId,
        /// Pool the passenger was waiting at when the check was scheduled
        pool: PoolId,
        /// Wait token; checks from an earlier wait are ignored
        token: u64,
    },
    /// A passenger re-enters a stage after a timed detour
    StageReentry {
        /// Returning passenger
        passenger: PassengerId,
        /// Stage to enter
        stage: StageKind,
        /// Cause of the detour
        reason: ReentryReason,
    },
    /// Periodic snapshot of every pool
    MonitorTick,
}

impl EventKind {
    /// Passenger the event concerns, if any
    pub fn passenger(&self) -> Option<PassengerId> {
        match *self {
            EventKind::Arrival { passenger }
            | EventKind::BalkDecision { passenger, .. }
            | EventKind::ServiceStart { passenger, .. }
            | EventKind::ServiceComplete { passenger, .. }
            | EventKind::RenegeCheck { passenger, .. }
            | EventKind::StageReentry { passenger, .. } => Some(passenger),
            EventKind::Generate | EventKind::MonitorTick => None,
        }
    }

    /// Pool the event concerns, if any
    pub fn pool(&self) -> Option<PoolId> {
        match *self {
            EventKind::BalkDecision { pool, .. }
            | EventKind::ServiceStart { pool, .. }
            | EventKind::ServiceComplete { pool, .. }
            | EventKind::RenegeCheck { pool, .. } => Some(pool),
            _ => None,
        }
    }

    /// Short name of the event kind
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Generate => "generate",
            EventKind::Arrival { .. } => "arrival",
            EventKind::BalkDecision { .. } => "balk_decision",
            EventKind::ServiceStart { .. } => "service_start",
            EventKind::ServiceComplete { .. } => "service_complete",
            EventKind::RenegeCheck { .. } => "renege_check",
            EventKind::StageReentry { .. } => "stage_reentry",
            EventKind::MonitorTick => "monitor_tick",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.passenger(), self.pool()) {
            (Some(passenger), Some(pool)) => write!(f, "{}({}, {})", self.label(), passenger, pool),
            (Some(passenger), None) => write!(f, "{}({})", self.label(), passenger),
            _ => write!(f, "{}", self.label()),
        }
    }
}

/// A dispatched event as written to the event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Insertion sequence of the event
    pub seq: u64,
    /// Logical time the event fired
    pub time: f64,
    /// The event itself
    #[serde(flatten)]
    pub event: EventKind,
}
