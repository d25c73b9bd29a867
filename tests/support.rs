//! Shared helpers for scripted runs

use passenger_flow_simulator::passenger::PassengerSpec;
use passenger_flow_simulator::simulation::{MetricsRecorder, SimulationOrchestrator, TransitionRecord};
use passenger_flow_simulator::types::{PassengerClass, PassengerId, ServiceDistribution, SimulationConfig, TransitionKind};

/// Departure far enough away that no deadline or time pressure applies
pub const FAR_DEPARTURE: f64 = 10_000.0;

/// Patience large enough that abandonment is practically impossible
pub const ENDLESS_PATIENCE: f64 = 1.0e9;

/// Configuration for runs driven only by injected passengers
///
/// Random arrivals, balking at kiosks, adaptive kiosk shifts and both
/// feedback loops are switched off so each test enables only what it needs.
pub fn scripted_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.run.seed = Some(7);
    config.run.duration_minutes = 600.0;
    config.arrivals.rate_multiplier = 0.0;
    config.check_in.kiosk_balk_probability = 0.0;
    config.check_in.adaptive_adjustment = 0.0;
    config.feedback.document_issue_probability = 0.0;
    config.feedback.secondary_inspection_probability = 0.0;
    config
}

/// Pin a pool's service time
pub fn fixed(minutes: f64) -> ServiceDistribution {
    ServiceDistribution::Fixed { minutes }
}

/// A standard passenger with a far departure
pub fn standard(arrival: f64) -> PassengerSpec {
    PassengerSpec::new(PassengerClass::Standard, arrival).with_departure(FAR_DEPARTURE)
}

/// Inject `spec`, panicking on error
pub fn inject(orchestrator: &mut SimulationOrchestrator, spec: PassengerSpec) -> PassengerId {
    orchestrator.inject_passenger(spec).unwrap()
}

/// Transitions of `kind` recorded for `passenger`
pub fn transitions_of(
    orchestrator: &SimulationOrchestrator<MetricsRecorder>,
    passenger: PassengerId,
    kind: TransitionKind,
) -> Vec<TransitionRecord> {
    orchestrator
        .sink()
        .transitions_for(passenger)
        .into_iter()
        .filter(|t| t.kind == kind)
        .cloned()
        .collect()
}
