//! Tests for run statistics
//!
//! These tests verify the statistics of scripted runs, where every wait and
//! service time is known in advance, and the report formats.

use crate::support::*;
use passenger_flow_simulator::simulation::{SimulationOrchestrator, SimulationStatistics};
use passenger_flow_simulator::types::{PassengerClass, PoolId, QueueStrategy, StageKind};

/// Two passengers share one counter; the second waits for the first
///
/// Both stay in their class queue, so the idle kiosk never tempts the
/// second passenger away from the counter.
fn contended_run() -> SimulationStatistics {
    let mut config = scripted_config();
    config.run.duration_minutes = 120.0;
    config.check_in.economy_counters = 1;
    config.check_in.kiosk_base_share = 0.0;
    config.check_in.counter_service = fixed(4.0);
    config.security.document_check_service = fixed(1.0);
    config.security.scanning_service = fixed(1.0);
    config.boarding.service = fixed(1.0);

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    for _ in 0..2 {
        let spec = standard(0.0)
            .with_patience(ENDLESS_PATIENCE)
            .with_strategy(QueueStrategy::ClassRestricted);
        inject(&mut orchestrator, spec);
    }
    orchestrator.run().unwrap()
}

/// Test outcome counts, waits and time in system of a scripted run
#[test]
fn test_scripted_run_statistics() {
    let statistics = contended_run();

    assert_eq!(statistics.generated, 2);
    assert_eq!(statistics.completed, 2);
    assert_eq!(statistics.in_system, 0);
    assert!(statistics.is_conserved());
    assert_eq!(statistics.completion_percentage(), 100.0);
    assert_eq!(statistics.abandonment_percentage(), 0.0);
    assert_eq!(statistics.jockeys, 0);

    // Second passenger waits 4 minutes at check-in, nobody waits elsewhere
    let check_in = statistics.stage(StageKind::CheckIn).unwrap();
    assert_eq!(check_in.services, 2);
    assert!((check_in.average_wait - 2.0).abs() < 1e-9);
    assert!((check_in.max_wait - 4.0).abs() < 1e-9);
    assert!((check_in.average_service - 4.0).abs() < 1e-9);
    assert_eq!(statistics.stage(StageKind::Security).unwrap().max_wait, 0.0);

    // Journeys take 7 and 11 minutes
    assert!((statistics.average_time_in_system - 9.0).abs() < 1e-9);
    assert!((statistics.throughput_per_hour - 1.0).abs() < 1e-9);
}

/// Test per-pool and per-class breakdowns
#[test]
fn test_pool_and_class_breakdowns() {
    let statistics = contended_run();

    let counter = statistics.pool(PoolId::EconomyCounter).unwrap();
    assert_eq!(counter.capacity, 1);
    assert_eq!(counter.served, 2);
    assert_eq!(counter.max_queue_length, 1);
    // 8 busy minutes out of 120
    assert!((counter.utilization - 8.0 / 120.0).abs() < 1e-9);

    assert_eq!(statistics.pool(PoolId::Kiosk).unwrap().served, 0);

    let standard = statistics
        .classes
        .iter()
        .find(|c| c.class == Some(PassengerClass::Standard))
        .unwrap();
    assert_eq!(standard.generated, 2);
    assert_eq!(standard.completed, 2);
    let priority: usize = statistics
        .classes
        .iter()
        .filter(|c| c.class.map_or(false, PassengerClass::is_priority))
        .map(|c| c.generated)
        .sum();
    assert_eq!(priority, 0);
}

/// Test the text report and the JSON summary
#[test]
fn test_report_formats() {
    let statistics = contended_run();

    let report = statistics.to_string();
    assert!(report.contains("Completed:        2 (100.0%)"));
    assert!(report.contains("economy_counter"));
    assert!(report.contains("Throughput: 1.0 passengers/hour"));
    assert_eq!(statistics.clock_at_end, "D+0 02:00");
    assert!(report.contains("Simulated 120 minutes (until D+0 02:00)"));

    let json = serde_json::to_string(&statistics).unwrap();
    let loaded: SimulationStatistics = serde_json::from_str(&json).unwrap();
    assert_eq!(loaded.completed, statistics.completed);
    assert_eq!(loaded.pools.len(), statistics.pools.len());
    assert_eq!(loaded.stages[0].stage, StageKind::CheckIn);
    assert_eq!(loaded.clock_at_end, statistics.clock_at_end);
    assert!((loaded.average_time_in_system - statistics.average_time_in_system).abs() < 1e-9);
}

/// Test statistics of a run with nobody in it
#[test]
fn test_empty_run_statistics() {
    let mut orchestrator = SimulationOrchestrator::new(scripted_config()).unwrap();
    let statistics = orchestrator.run().unwrap();

    assert_eq!(statistics.generated, 0);
    assert!(statistics.is_conserved());
    assert_eq!(statistics.completion_percentage(), 0.0);
    assert_eq!(statistics.average_time_in_system, 0.0);
    assert_eq!(statistics.clock_at_end, "D+0 10:00");
    assert!(statistics.events_processed > 0, "monitor ticks still run");
    assert!(statistics.pools.iter().all(|p| p.utilization == 0.0));
}
