//! Passenger behaviour: patience, abandonment and service-time effects
//!
//! The abandonment model is a cumulative probability that grows linearly
//! with time waited and reaches certainty at the patience threshold. Renege
//! checks sample the conditional probability of abandoning since the
//! previous check, so the cumulative curve does not depend on how often
//! checks run.

use crate::passenger::Passenger;
use crate::types::{AttributeConfig, BehaviorConfig, StageKind};

/// Cumulative probability of having abandoned after waiting `waited` minutes
pub fn renege_probability(waited: f64, patience: f64) -> f64 {
    if patience <= 0.0 {
        return 1.0;
    }
    (waited / patience).clamp(0.0, 1.0)
}

/// Probability of abandoning between two checks, given the passenger stayed
/// through the earlier one
pub fn conditional_renege_probability(previous_wait: f64, waited: f64, patience: f64) -> f64 {
    let before = renege_probability(previous_wait, patience);
    let now = renege_probability(waited, patience);
    if now >= 1.0 {
        return 1.0;
    }
    ((now - before) / (1.0 - before)).clamp(0.0, 1.0)
}

/// Whether the passenger's departure is closer than the pressure threshold
pub fn under_time_pressure(passenger: &Passenger, now: f64, behavior: &BehaviorConfig) -> bool {
    passenger.time_to_departure(now) < behavior.time_pressure_threshold_minutes
}

/// Patience at `now`
///
/// Time pressure shortens patience; a queue that recently started serving
/// someone lengthens it.
pub fn current_patience(
    passenger: &Passenger,
    now: f64,
    visible_progress: bool,
    behavior: &BehaviorConfig,
) -> f64 {
    let mut patience = passenger.base_patience;
    if under_time_pressure(passenger, now, behavior) {
        patience *= 1.0 - behavior.time_pressure_reduction;
    }
    if visible_progress {
        patience *= 1.0 + behavior.visible_progress_increase;
    }
    patience
}

/// Service-time multiplier from the passenger's own attributes
///
/// Bags only slow check-in; companions slow every stage. Frequent flyers
/// and passengers under time pressure are faster.
pub fn service_modifier(
    passenger: &Passenger,
    stage: StageKind,
    now: f64,
    attributes: &AttributeConfig,
    behavior: &BehaviorConfig,
) -> f64 {
    let mut modifier = 1.0;
    let bags = passenger.attributes.bags as f64;
    if stage == StageKind::CheckIn && bags > 0.0 {
        modifier += bags * attributes.per_bag_increase;
    }
    let companions = passenger.attributes.group_size.saturating_sub(1) as f64;
    modifier += companions * attributes.per_companion_increase;

    if passenger.attributes.frequent_flyer {
        modifier *= attributes.frequent_flyer_multiplier;
    }
    if under_time_pressure(passenger, now, behavior) {
        modifier *= attributes.time_pressure_multiplier;
    }
    modifier
}
