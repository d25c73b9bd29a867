//! Tests for the routing policy
//!
//! These tests verify the adaptive kiosk share, the congestion metric each
//! strategy uses and the empirical split of standard passengers.

use passenger_flow_simulator::facility::{PoolRegistry, ResourcePool, StageStep};
use passenger_flow_simulator::passenger::{Passenger, PassengerAttributes};
use passenger_flow_simulator::stages::RoutingPolicy;
use passenger_flow_simulator::types::{
    PassengerClass, PassengerId, PoolId, QueueStrategy, SimulationConfig, StageKind,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn passenger(strategy: QueueStrategy) -> Passenger {
    Passenger::new(
        PassengerId::new(1),
        PassengerClass::Standard,
        strategy,
        PassengerAttributes::default(),
        0.0,
        600.0,
        20.0,
    )
}

fn check_in_pools(counter_service: f64, kiosk_service: f64) -> PoolRegistry {
    let mut registry = PoolRegistry::new();
    registry.add_pool(ResourcePool::new(PoolId::EconomyCounter, 1, counter_service).unwrap());
    registry.add_pool(ResourcePool::new(PoolId::Kiosk, 1, kiosk_service).unwrap());
    registry
}

fn occupy(registry: &mut PoolRegistry, pool: PoolId, first: u64, count: u64) {
    for n in first..first + count {
        registry.request(pool, PassengerId::new(n), 2, 0.0).unwrap();
    }
}

/// Test that the share clamps to [0, 1] even with an extreme base
#[test]
fn test_share_stays_a_probability() {
    let mut config = SimulationConfig::default();
    config.check_in.kiosk_base_share = 0.9;
    let policy = RoutingPolicy::new(&config);

    let mut pools = check_in_pools(5.0, 3.0);
    occupy(&mut pools, PoolId::EconomyCounter, 100, 20);
    let share = policy.kiosk_share(
        QueueStrategy::ShortestQueue,
        pools.get(PoolId::EconomyCounter).unwrap(),
        pools.get(PoolId::Kiosk).unwrap(),
    );
    assert_eq!(share, 1.0);
}

/// Test that fastest-moving passengers compare projected waits, not heads
#[test]
fn test_fastest_moving_uses_projected_wait() {
    // Equal queues, but the counter is five times slower
    let mut pools = check_in_pools(10.0, 2.0);
    occupy(&mut pools, PoolId::EconomyCounter, 100, 2);
    occupy(&mut pools, PoolId::Kiosk, 200, 2);

    let counter = pools.get(PoolId::EconomyCounter).unwrap();
    let kiosk = pools.get(PoolId::Kiosk).unwrap();
    assert_eq!(RoutingPolicy::queue_metric(QueueStrategy::ShortestQueue, counter), 1.0);
    assert_eq!(RoutingPolicy::queue_metric(QueueStrategy::ShortestQueue, kiosk), 1.0);
    assert!((RoutingPolicy::queue_metric(QueueStrategy::FastestMoving, counter) - 20.0).abs() < 1e-9);
    assert!((RoutingPolicy::queue_metric(QueueStrategy::FastestMoving, kiosk) - 4.0).abs() < 1e-9);

    let policy = RoutingPolicy::new(&SimulationConfig::default());
    assert_eq!(policy.kiosk_share(QueueStrategy::ShortestQueue, counter, kiosk), 0.5);
    assert!(policy.kiosk_share(QueueStrategy::FastestMoving, counter, kiosk) > 0.5);
}

/// Test that the empirical kiosk split follows the base share on idle pools
#[test]
fn test_empirical_split_matches_share() {
    let mut config = SimulationConfig::default();
    config.check_in.kiosk_base_share = 0.3;
    let policy = RoutingPolicy::new(&config);
    let pools = check_in_pools(5.0, 3.0);
    let mut rng = StdRng::seed_from_u64(5);
    let traveller = passenger(QueueStrategy::ShortestQueue);

    let trials = 10_000;
    let kiosk = (0..trials)
        .filter(|_| {
            policy
                .choose_pool(&traveller, StageStep::first(StageKind::CheckIn), &pools, &mut rng)
                .unwrap()
                == PoolId::Kiosk
        })
        .count();
    let fraction = kiosk as f64 / trials as f64;
    assert!((fraction - 0.3).abs() < 0.03, "kiosk fraction {}", fraction);
}

/// Test that security and boarding have a single pool per class
#[test]
fn test_single_choice_steps() {
    let config = SimulationConfig::default();
    let policy = RoutingPolicy::new(&config);
    let pools = PoolRegistry::from_config(&config).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    let mut traveller = passenger(QueueStrategy::FastestMoving);
    let document_check = StageStep::first(StageKind::Security);
    let scanning = document_check.next().unwrap();
    let boarding = StageStep::first(StageKind::Boarding);

    assert_eq!(policy.choose_pool(&traveller, document_check, &pools, &mut rng).unwrap(), PoolId::RegularDocumentCheck);
    assert_eq!(policy.choose_pool(&traveller, scanning, &pools, &mut rng).unwrap(), PoolId::RegularScanning);
    assert_eq!(policy.choose_pool(&traveller, boarding, &pools, &mut rng).unwrap(), PoolId::Gate);

    traveller.class = PassengerClass::PriorityA;
    assert_eq!(policy.choose_pool(&traveller, document_check, &pools, &mut rng).unwrap(), PoolId::PriorityDocumentCheck);
    assert_eq!(policy.choose_pool(&traveller, scanning, &pools, &mut rng).unwrap(), PoolId::PriorityScanning);
    assert_eq!(policy.choose_pool(&traveller, boarding, &pools, &mut rng).unwrap(), PoolId::Gate);
}

/// Test that a passenger excluded from kiosks never switches to one
#[test]
fn test_no_jockey_to_excluded_kiosk() {
    let policy = RoutingPolicy::new(&SimulationConfig::default());
    let mut pools = check_in_pools(5.0, 3.0);
    occupy(&mut pools, PoolId::EconomyCounter, 100, 1);

    let mut traveller = passenger(QueueStrategy::ShortestQueue);
    pools.request(PoolId::EconomyCounter, traveller.id, 2, 0.0).unwrap();
    assert_eq!(
        policy.jockey_target(&traveller, PoolId::EconomyCounter, &pools).unwrap(),
        Some(PoolId::Kiosk)
    );

    traveller.journey.kiosk_excluded = true;
    assert_eq!(policy.jockey_target(&traveller, PoolId::EconomyCounter, &pools).unwrap(), None);
}
