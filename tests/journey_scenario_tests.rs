//! Scripted journey scenarios
//!
//! Each test injects a handful of passengers into a run with random arrivals
//! switched off and pinned service times, then checks the exact path and
//! timing of their journeys.

use crate::support::*;
use passenger_flow_simulator::passenger::PassengerSpec;
use passenger_flow_simulator::simulation::SimulationOrchestrator;
use passenger_flow_simulator::types::{
    Outcome, PassengerClass, PoolId, QueueStrategy, SimulationConfig, StageKind, TransitionKind,
};

/// Scripted configuration with every pool pinned to short fixed service times
fn pinned_config() -> SimulationConfig {
    let mut config = scripted_config();
    config.check_in.counter_service = fixed(3.0);
    config.check_in.kiosk_service = fixed(3.0);
    config.security.document_check_service = fixed(1.0);
    config.security.scanning_service = fixed(2.0);
    config.boarding.service = fixed(1.0);
    config
}

/// Test a full journey through every stage with no contention
#[test]
fn test_uncontended_journey_end_to_end() {
    let mut config = pinned_config();
    config.check_in.economy_counters = 1;
    config.check_in.kiosk_base_share = 0.0;

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    let id = inject(&mut orchestrator, standard(0.0));
    orchestrator.run_until(3.5).unwrap();

    let passenger = orchestrator.passenger(id).unwrap();
    let check_in = &passenger.journey.visits[0];
    assert_eq!(check_in.pool, PoolId::EconomyCounter);
    assert_eq!((check_in.service_start, check_in.service_end), (Some(0.0), Some(3.0)));
    assert_eq!(check_in.wait_minutes(), Some(0.0));

    let document_check = &passenger.journey.visits[1];
    assert_eq!(document_check.stage, StageKind::Security);
    assert_eq!(document_check.pool, PoolId::RegularDocumentCheck);
    assert_eq!(document_check.enqueued_at, 3.0);
    assert_eq!(document_check.service_start, Some(3.0));

    // Check-in 0-3, document check 3-4, scanning 4-6, gate 6-7
    orchestrator.run_until(100.0).unwrap();
    let passenger = orchestrator.passenger(id).unwrap();
    assert_eq!(passenger.journey.outcome, Outcome::Completed);
    assert_eq!(passenger.journey.finished_at, Some(7.0));
    assert_eq!(passenger.journey.visits.len(), 4);
    assert_eq!(orchestrator.sink().journeys.len(), 1);
    assert_eq!(orchestrator.sink().count(TransitionKind::Queued), 0);
    let flights = &orchestrator.state().flights;
    assert_eq!(flights.boarded(flights.flight_of(passenger.departure_time)), 1);
}

/// Test that a kiosk balk sends the passenger to the counter instead of leaving
#[test]
fn test_balk_then_jockey_to_counter() {
    let mut config = scripted_config();
    config.check_in.economy_counters = 1;
    config.check_in.kiosks = 1;
    config.check_in.kiosk_base_share = 1.0;
    config.check_in.kiosk_balk_probability = 1.0;
    config.check_in.balk_jockey_probability = 1.0;
    config.check_in.counter_service = fixed(10.0);

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    let first = inject(&mut orchestrator, standard(0.0).with_patience(ENDLESS_PATIENCE));
    let second = inject(&mut orchestrator, standard(1.0).with_patience(ENDLESS_PATIENCE));
    orchestrator.run_until(1.5).unwrap();

    let moved = transitions_of(&orchestrator, second, TransitionKind::BalkJockeyed);
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].time, 1.0);
    assert_eq!(moved[0].pool, Some(PoolId::Kiosk));
    assert_eq!(moved[0].to_pool, Some(PoolId::EconomyCounter));
    assert!(transitions_of(&orchestrator, second, TransitionKind::Balked).is_empty());

    let queued = transitions_of(&orchestrator, second, TransitionKind::Queued);
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].pool, Some(PoolId::EconomyCounter));

    let counter = orchestrator.pools().get(PoolId::EconomyCounter).unwrap();
    assert!(counter.is_serving(first));
    assert_eq!(counter.position_of(second), Some(0));
    assert_eq!(orchestrator.passenger(second).unwrap().journey.balk_jockeys, 1);
}

/// Test that a plain balk ends the journey
#[test]
fn test_balk_without_jockey_leaves_terminal() {
    let mut config = scripted_config();
    config.check_in.kiosk_base_share = 1.0;
    config.check_in.kiosk_balk_probability = 1.0;
    config.check_in.balk_jockey_probability = 0.0;

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    let id = inject(&mut orchestrator, standard(2.0));
    orchestrator.run_until(5.0).unwrap();

    let passenger = orchestrator.passenger(id).unwrap();
    assert_eq!(passenger.journey.outcome, Outcome::Balked);
    assert_eq!(passenger.journey.finished_at, Some(2.0));
    assert!(passenger.journey.visits.is_empty());
    assert_eq!(orchestrator.pools().location_of(id), None);
}

/// Test the document-issue loop back to check-in
#[test]
fn test_document_issue_returns_to_counter() {
    let mut config = pinned_config();
    config.check_in.kiosk_base_share = 1.0;
    config.feedback.document_issue_probability = 1.0;
    config.feedback.document_issue_delay_minutes = 10.0;

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    let id = inject(&mut orchestrator, standard(0.0));
    orchestrator.run_until(16.5).unwrap();

    let journey = &orchestrator.passenger(id).unwrap().journey;
    assert_eq!(journey.document_loops, 1);
    assert!(journey.kiosk_excluded);

    let kiosk = &journey.visits[0];
    assert_eq!(kiosk.pool, PoolId::Kiosk);
    assert_eq!((kiosk.service_start, kiosk.service_end), (Some(0.0), Some(3.0)));

    let counter = &journey.visits[1];
    assert_eq!(counter.pool, PoolId::EconomyCounter);
    assert_eq!((counter.service_start, counter.service_end), (Some(13.0), Some(16.0)));

    let security = &journey.visits[2];
    assert_eq!(security.pool, PoolId::RegularDocumentCheck);
    assert_eq!(security.enqueued_at, 16.0);

    let issues = transitions_of(&orchestrator, id, TransitionKind::DocumentIssue);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].time, 3.0);
    assert_eq!(journey.visits_to(StageKind::CheckIn), 2);
}

/// Test the secondary-inspection detour after security
#[test]
fn test_secondary_inspection_delays_boarding() {
    let mut config = pinned_config();
    config.check_in.kiosk_base_share = 0.0;
    config.feedback.secondary_inspection_probability = 1.0;
    config.feedback.secondary_inspection_minutes = 5.0;

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    let id = inject(&mut orchestrator, standard(0.0));
    orchestrator.run_until(50.0).unwrap();

    // Security ends at 6, inspection until 11, gate 11-12
    let passenger = orchestrator.passenger(id).unwrap();
    assert_eq!(passenger.journey.secondary_inspections, 1);
    assert_eq!(passenger.journey.outcome, Outcome::Completed);
    assert_eq!(passenger.journey.finished_at, Some(12.0));

    let inspection = transitions_of(&orchestrator, id, TransitionKind::SecondaryInspection);
    assert_eq!(inspection.len(), 1);
    assert_eq!(inspection[0].time, 6.0);
    assert_eq!(inspection[0].pool, Some(PoolId::RegularScanning));
}

/// Test that a class-restricted passenger reneges no later than its patience
#[test]
fn test_renege_by_patience_threshold() {
    let mut config = scripted_config();
    config.check_in.economy_counters = 1;
    config.check_in.kiosk_base_share = 0.0;
    config.check_in.counter_service = fixed(100.0);

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    let holder = inject(&mut orchestrator, standard(0.0));
    let waiting = inject(
        &mut orchestrator,
        standard(1.0).with_strategy(QueueStrategy::ClassRestricted).with_patience(15.0),
    );
    orchestrator.run_until(30.0).unwrap();

    let passenger = orchestrator.passenger(waiting).unwrap();
    assert_eq!(passenger.journey.outcome, Outcome::Reneged);
    let finished = passenger.journey.finished_at.unwrap();
    assert!(finished > 1.0 && finished <= 16.0 + 1e-9, "reneged at {}", finished);

    let reneged = transitions_of(&orchestrator, waiting, TransitionKind::Reneged);
    assert_eq!(reneged.len(), 1);
    assert_eq!(reneged[0].pool, Some(PoolId::EconomyCounter));
    assert!(transitions_of(&orchestrator, waiting, TransitionKind::Jockeyed).is_empty());

    let counter = orchestrator.pools().get(PoolId::EconomyCounter).unwrap();
    assert_eq!(counter.stats().cancelled, 1);
    assert_eq!(counter.queue_length(), 0);
    assert!(counter.is_serving(holder));
}

/// Test that abandonment wins over switching when both are due
#[test]
fn test_renege_is_decided_before_jockeying() {
    let mut config = scripted_config();
    config.check_in.economy_counters = 1;
    config.check_in.kiosk_base_share = 0.0;
    config.check_in.counter_service = fixed(100.0);

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    inject(&mut orchestrator, standard(0.0));
    let impatient = inject(&mut orchestrator, standard(1.0).with_patience(0.5));
    orchestrator.run_until(10.0).unwrap();

    // The kiosk is idle, so switching would also have been worthwhile
    let passenger = orchestrator.passenger(impatient).unwrap();
    assert_eq!(passenger.journey.outcome, Outcome::Reneged);
    assert!((passenger.journey.finished_at.unwrap() - 1.6).abs() < 1e-9);
    assert_eq!(passenger.journey.jockeys, 0);
    assert_eq!(orchestrator.sink().count(TransitionKind::Jockeyed), 0);
}

/// Test a switch from a blocked counter to an idle kiosk
#[test]
fn test_jockey_to_idle_kiosk() {
    let mut config = scripted_config();
    config.check_in.economy_counters = 1;
    config.check_in.kiosk_base_share = 0.0;
    config.check_in.counter_service = fixed(100.0);
    config.check_in.kiosk_service = fixed(3.0);

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    inject(&mut orchestrator, standard(0.0));
    let switcher = inject(&mut orchestrator, standard(1.0).with_patience(ENDLESS_PATIENCE));
    orchestrator.run_until(3.5).unwrap();

    let switches = transitions_of(&orchestrator, switcher, TransitionKind::Jockeyed);
    assert_eq!(switches.len(), 1);
    assert_eq!(switches[0].time, 3.0);
    assert_eq!(switches[0].pool, Some(PoolId::EconomyCounter));
    assert_eq!(switches[0].to_pool, Some(PoolId::Kiosk));

    let journey = &orchestrator.passenger(switcher).unwrap().journey;
    assert_eq!(journey.jockeys, 1);
    assert!(journey.visits[0].switched_away);
    assert_eq!(journey.visits[1].pool, PoolId::Kiosk);
    assert_eq!(journey.visits[1].service_start, Some(3.0));
    // Waiting time counts from the first queue
    assert_eq!(journey.visits[1].step_entered_at, 1.0);
    assert!(orchestrator.pools().get(PoolId::Kiosk).unwrap().is_serving(switcher));
}

/// Test that the priority counter serves class A ahead of earlier class B
#[test]
fn test_priority_counter_orders_by_class() {
    let mut config = scripted_config();
    config.check_in.priority_counters = 1;
    config.check_in.counter_service = fixed(10.0);

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    let spec = |class, arrival| {
        PassengerSpec::new(class, arrival).with_departure(FAR_DEPARTURE).with_patience(ENDLESS_PATIENCE)
    };
    inject(&mut orchestrator, spec(PassengerClass::PriorityB, 0.0));
    let class_b = inject(&mut orchestrator, spec(PassengerClass::PriorityB, 1.0));
    let class_a = inject(&mut orchestrator, spec(PassengerClass::PriorityA, 2.0));
    orchestrator.run_until(25.0).unwrap();

    let started = |id| {
        transitions_of(&orchestrator, id, TransitionKind::ServiceStarted)
            .into_iter()
            .find(|t| t.pool == Some(PoolId::PriorityCounter))
            .map(|t| t.time)
    };
    assert_eq!(started(class_a), Some(10.0));
    assert_eq!(started(class_b), Some(20.0));
}

/// Test that a passenger reaching boarding after departure misses the flight
#[test]
fn test_late_passenger_misses_flight() {
    let mut config = pinned_config();
    config.check_in.kiosk_base_share = 0.0;

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    let id = inject(&mut orchestrator, standard(0.0).with_departure(3.0));
    orchestrator.run_until(50.0).unwrap();

    let passenger = orchestrator.passenger(id).unwrap();
    assert_eq!(passenger.journey.outcome, Outcome::MissedDeadline);
    assert_eq!(passenger.journey.visits_to(StageKind::Boarding), 0);

    let missed = transitions_of(&orchestrator, id, TransitionKind::MissedDeadline);
    assert_eq!(missed.len(), 1);
    assert_eq!(missed[0].pool, None);
}

/// Test that a passenger reaching boarding after the last seat is taken
/// is turned away before joining the gate queue
#[test]
fn test_full_flight_turns_passenger_away() {
    let mut config = pinned_config();
    config.check_in.kiosk_base_share = 0.0;
    config.boarding.aircraft_capacity = 1;

    let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
    let first = inject(&mut orchestrator, standard(0.0).with_departure(60.0));
    let second = inject(&mut orchestrator, standard(0.5).with_departure(60.0));
    orchestrator.run_until(50.0).unwrap();

    assert_eq!(orchestrator.passenger(first).unwrap().journey.outcome, Outcome::Completed);
    let turned_away = orchestrator.passenger(second).unwrap();
    assert_eq!(turned_away.journey.outcome, Outcome::MissedDeadline);

    // The first passenger took the seat at 6, the second reaches boarding at 6.5
    let missed = transitions_of(&orchestrator, second, TransitionKind::MissedDeadline);
    assert_eq!(missed.len(), 1);
    assert_eq!(missed[0].time, 6.5);
    assert_eq!(missed[0].pool, None);
    let flights = &orchestrator.state().flights;
    assert_eq!(flights.boarded(flights.flight_of(60.0)), 1);
    assert_eq!(orchestrator.pools().location_of(second), None);
}

/// Test that passengers reaching the gate together never overfill the flight,
/// whether they queue for one gate or start at two gates at once
#[test]
fn test_simultaneous_gate_starts_respect_seats() {
    for gates in [1, 2] {
        let mut config = pinned_config();
        config.check_in.kiosk_base_share = 0.0;
        config.boarding.aircraft_capacity = 1;
        config.boarding.gates_small = gates;

        let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
        let ids = [
            inject(&mut orchestrator, standard(0.0).with_departure(60.0)),
            inject(&mut orchestrator, standard(0.0).with_departure(60.0)),
        ];
        orchestrator.run_until(50.0).unwrap();

        let outcomes: Vec<Outcome> =
            ids.iter().map(|id| orchestrator.passenger(*id).unwrap().journey.outcome).collect();
        assert_eq!(outcomes.iter().filter(|o| **o == Outcome::Completed).count(), 1, "{} gates", gates);
        assert_eq!(outcomes.iter().filter(|o| **o == Outcome::MissedDeadline).count(), 1, "{} gates", gates);

        // Both entered boarding at 6 with a free seat; the second is refused at the gate
        let turned_away = ids[1];
        let missed = transitions_of(&orchestrator, turned_away, TransitionKind::MissedDeadline);
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].pool, Some(PoolId::Gate));

        let flights = &orchestrator.state().flights;
        assert_eq!(flights.boarded(flights.flight_of(60.0)), 1, "{} gates", gates);
        assert_eq!(orchestrator.pools().location_of(turned_away), None);
        orchestrator.pools().check_invariants().unwrap();
    }
}
