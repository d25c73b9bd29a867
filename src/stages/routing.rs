//! Queue selection and switching
//!
//! This module contains the RoutingPolicy: which pool a passenger joins at a
//! step, whether a waiting passenger switches to an alternative pool, and
//! where a passenger goes after balking from a kiosk.

use rand::Rng;
use tracing::debug;

use crate::facility::{alternatives, jockey_alternative, PoolRegistry, ResourcePool, StageStep};
use crate::passenger::Passenger;
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{BehaviorConfig, CheckInConfig, PassengerClass, PoolId, QueueStrategy, SimulationConfig};

/// Pool selection, jockeying and balk-then-jockey decisions
#[derive(Debug, Clone)]
pub struct RoutingPolicy {
    check_in: CheckInConfig,
    behavior: BehaviorConfig,
}

impl RoutingPolicy {
    /// Create a policy from the configuration
    pub fn new(config: &SimulationConfig) -> Self {
        Self { check_in: config.check_in.clone(), behavior: config.behavior.clone() }
    }

    /// Congestion metric a passenger with `strategy` compares pools by
    ///
    /// Fastest-moving passengers look at the projected wait from the pool's
    /// historical rate; everyone else counts heads in the queue.
    pub fn queue_metric(strategy: QueueStrategy, pool: &ResourcePool) -> f64 {
        match strategy {
            QueueStrategy::FastestMoving => pool.projected_wait_for_newcomer(),
            QueueStrategy::ShortestQueue | QueueStrategy::ClassRestricted => pool.queue_length() as f64,
        }
    }

    /// Probability that a standard passenger picks the kiosk over the counter
    ///
    /// Starts at the base share and moves toward the less congested pool,
    /// with the shift capped to keep choices from oscillating.
    pub fn kiosk_share(&self, strategy: QueueStrategy, counter: &ResourcePool, kiosk: &ResourcePool) -> f64 {
        let difference = Self::queue_metric(strategy, counter) - Self::queue_metric(strategy, kiosk);
        let cap = self.check_in.max_adaptive_shift;
        let shift = (self.check_in.adaptive_adjustment * difference).clamp(-cap, cap);
        (self.check_in.kiosk_base_share + shift).clamp(0.0, 1.0)
    }

    /// Pick the pool `passenger` joins at `at`
    pub fn choose_pool<R: Rng + ?Sized>(
        &self,
        passenger: &Passenger,
        at: StageStep,
        pools: &PoolRegistry,
        rng: &mut R,
    ) -> SimulationResult<PoolId> {
        let options = alternatives(at, passenger.class, !passenger.journey.kiosk_excluded);
        let [counter_id, kiosk_id] = options.as_slice() else {
            return options.first().copied().ok_or_else(|| {
                SimulationError::invariant_violation(format!("no pool serves {:?} for {}", at, passenger.class))
            });
        };

        let counter = pools.get(*counter_id)?;
        let kiosk = pools.get(*kiosk_id)?;
        let share = self.kiosk_share(passenger.strategy, counter, kiosk);
        let choice = if rng.gen_bool(share) { *kiosk_id } else { *counter_id };
        debug!(
            "{} chose {} (kiosk share {:.2}, counter queue {}, kiosk queue {})",
            passenger.id,
            choice,
            share,
            counter.queue_length(),
            kiosk.queue_length()
        );
        Ok(choice)
    }

    /// Alternative pool a waiting passenger should switch to, if any
    ///
    /// Only standard passengers that do not restrict themselves to their
    /// class pool switch, and only when the alternative's projected wait is
    /// better by more than the configured relative threshold.
    pub fn jockey_target(
        &self,
        passenger: &Passenger,
        current: PoolId,
        pools: &PoolRegistry,
    ) -> SimulationResult<Option<PoolId>> {
        if passenger.class != PassengerClass::Standard || !passenger.strategy.allows_jockeying() {
            return Ok(None);
        }
        let Some(target) = jockey_alternative(current) else {
            return Ok(None);
        };
        if target == PoolId::Kiosk && passenger.journey.kiosk_excluded {
            return Ok(None);
        }

        let pool = pools.get(current)?;
        let Some(ahead) = pool.position_of(passenger.id) else {
            return Ok(None);
        };
        let projected_current = pool.projected_wait(ahead);
        let projected_alternative = pools.get(target)?.projected_wait_for_newcomer();
        if projected_current <= 0.0 {
            return Ok(None);
        }

        let improvement = (projected_current - projected_alternative) / projected_current;
        if improvement > self.behavior.jockey_threshold {
            debug!(
                "{} switching {} -> {} ({:.1} -> {:.1} min)",
                passenger.id, current, target, projected_current, projected_alternative
            );
            Ok(Some(target))
        } else {
            Ok(None)
        }
    }

    /// Pool a passenger balking from `pool` tries instead of leaving
    pub fn balk_jockey_target<R: Rng + ?Sized>(&self, pool: PoolId, rng: &mut R) -> Option<PoolId> {
        if pool == PoolId::Kiosk && rng.gen_bool(self.check_in.balk_jockey_probability) {
            Some(PoolId::EconomyCounter)
        } else {
            None
        }
    }
}
