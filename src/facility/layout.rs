//! Terminal layout: stages, their steps, and the pools serving each step
//!
//! Check-in and boarding have a single step; security has a document check
//! followed by scanning. Priority classes are routed to dedicated pools,
//! standard passengers choose between the economy counter and the kiosk at
//! check-in.

use crate::types::{PassengerClass, PoolId, ServiceDistribution, SimulationConfig, StageKind};

/// Position inside the stage network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageStep {
    /// Stage
    pub stage: StageKind,
    /// Zero-based step within the stage
    pub step: usize,
}

impl StageStep {
    /// First step of a stage
    pub fn first(stage: StageKind) -> Self {
        Self { stage, step: 0 }
    }

    /// Step served by `pool`
    pub fn of_pool(pool: PoolId) -> Self {
        let step = match pool {
            PoolId::PriorityScanning | PoolId::RegularScanning => 1,
            _ => 0,
        };
        Self { stage: pool.stage(), step }
    }

    /// The step after this one, crossing into the next stage when needed
    pub fn next(self) -> Option<Self> {
        if self.step + 1 < step_count(self.stage) {
            return Some(Self { stage: self.stage, step: self.step + 1 });
        }
        self.stage.next().map(Self::first)
    }

    /// Whether this is the last step of its stage
    pub fn is_last_in_stage(self) -> bool {
        self.step + 1 == step_count(self.stage)
    }
}

/// Number of sequential steps in a stage
pub fn step_count(stage: StageKind) -> usize {
    match stage {
        StageKind::CheckIn => 1,
        StageKind::Security => 2,
        StageKind::Boarding => 1,
    }
}

/// Pools a passenger of `class` may use at `at`
///
/// The first entry is the class default; standard passengers at check-in
/// get the kiosk as a second alternative unless `kiosk_allowed` is false.
pub fn alternatives(at: StageStep, class: PassengerClass, kiosk_allowed: bool) -> Vec<PoolId> {
    let priority = class.is_priority();
    match (at.stage, at.step) {
        (StageKind::CheckIn, _) if priority => vec![PoolId::PriorityCounter],
        (StageKind::CheckIn, _) if kiosk_allowed => vec![PoolId::EconomyCounter, PoolId::Kiosk],
        (StageKind::CheckIn, _) => vec![PoolId::EconomyCounter],
        (StageKind::Security, 0) if priority => vec![PoolId::PriorityDocumentCheck],
        (StageKind::Security, 0) => vec![PoolId::RegularDocumentCheck],
        (StageKind::Security, _) if priority => vec![PoolId::PriorityScanning],
        (StageKind::Security, _) => vec![PoolId::RegularScanning],
        (StageKind::Boarding, _) => vec![PoolId::Gate],
    }
}

/// Alternative pool a waiting passenger could switch to, if any
pub fn jockey_alternative(pool: PoolId) -> Option<PoolId> {
    match pool {
        PoolId::EconomyCounter => Some(PoolId::Kiosk),
        PoolId::Kiosk => Some(PoolId::EconomyCounter),
        _ => None,
    }
}

/// Static settings of one pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolSettings {
    /// Number of servers
    pub capacity: usize,
    /// Service-time distribution
    pub service: ServiceDistribution,
    /// Probability of balking on arrival at the pool
    pub balk_probability: f64,
}

/// Resolve the settings of `pool` from the configuration
pub fn pool_settings(config: &SimulationConfig, pool: PoolId) -> PoolSettings {
    let check_in = &config.check_in;
    let security = &config.security;
    match pool {
        PoolId::PriorityCounter => PoolSettings {
            capacity: check_in.priority_counters,
            service: check_in.counter_service,
            balk_probability: check_in.counter_balk_probability,
        },
        PoolId::EconomyCounter => PoolSettings {
            capacity: check_in.economy_counters,
            service: check_in.counter_service,
            balk_probability: check_in.counter_balk_probability,
        },
        PoolId::Kiosk => PoolSettings {
            capacity: check_in.kiosks,
            service: check_in.kiosk_service,
            balk_probability: check_in.kiosk_balk_probability,
        },
        PoolId::PriorityDocumentCheck => PoolSettings {
            capacity: security.priority_lanes,
            service: security.document_check_service,
            balk_probability: security.balk_probability,
        },
        PoolId::RegularDocumentCheck => PoolSettings {
            capacity: security.regular_lanes,
            service: security.document_check_service,
            balk_probability: security.balk_probability,
        },
        PoolId::PriorityScanning => PoolSettings {
            capacity: security.priority_lanes,
            service: security.scanning_service,
            // The balk decision happens once per security visit, at the document check
            balk_probability: 0.0,
        },
        PoolId::RegularScanning => PoolSettings {
            capacity: security.regular_lanes,
            service: security.scanning_service,
            balk_probability: 0.0,
        },
        PoolId::Gate => PoolSettings {
            capacity: config.boarding.gate_count(),
            service: config.boarding.service,
            balk_probability: 0.0,
        },
    }
}
