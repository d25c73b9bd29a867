//! Pool registry
//!
//! This module contains the PoolRegistry, which owns every resource pool of
//! the terminal and tracks which pool each passenger currently occupies.
//! A passenger is present in at most one pool at any time.

use crate::facility::layout::pool_settings;
use crate::facility::pool::{PoolSnapshot, RequestOutcome, ResourcePool};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{PassengerId, PoolId, SimulationConfig};
use std::collections::BTreeMap;

/// All resource pools plus the passenger location index
#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    pools: BTreeMap<PoolId, ResourcePool>,
    locations: BTreeMap<PassengerId, PoolId>,
}

impl PoolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every pool of the terminal from the configuration
    pub fn from_config(config: &SimulationConfig) -> SimulationResult<Self> {
        let mut registry = Self::new();
        for id in PoolId::ALL {
            let settings = pool_settings(config, id);
            registry.add_pool(ResourcePool::new(id, settings.capacity, settings.service.mean())?);
        }
        Ok(registry)
    }

    /// Add or replace a pool
    pub fn add_pool(&mut self, pool: ResourcePool) {
        self.pools.insert(pool.id(), pool);
    }

    /// Look up a pool
    pub fn pool(&self, id: PoolId) -> Option<&ResourcePool> {
        self.pools.get(&id)
    }

    /// Look up a pool that must exist
    pub fn get(&self, id: PoolId) -> SimulationResult<&ResourcePool> {
        self.pools
            .get(&id)
            .ok_or_else(|| SimulationError::invariant_violation(format!("pool {} is not registered", id)))
    }

    /// All pools in a fixed order
    pub fn pools(&self) -> impl Iterator<Item = &ResourcePool> {
        self.pools.values()
    }

    /// Pool a passenger currently occupies (waiting or in service)
    pub fn location_of(&self, passenger: PassengerId) -> Option<PoolId> {
        self.locations.get(&passenger).copied()
    }

    /// Number of passengers present in any pool
    pub fn occupancy(&self) -> usize {
        self.locations.len()
    }

    /// Request a server at `pool`
    pub fn request(
        &mut self,
        pool: PoolId,
        passenger: PassengerId,
        rank: u8,
        now: f64,
    ) -> SimulationResult<RequestOutcome> {
        if let Some(current) = self.locations.get(&passenger) {
            return Err(SimulationError::invariant_violation(format!(
                "{} requested {} while present at {}",
                passenger, pool, current
            )));
        }
        let outcome = self.pool_mut(pool)?.request(passenger, rank, now)?;
        self.locations.insert(passenger, pool);
        Ok(outcome)
    }

    /// Release the server held by `passenger` at `pool`
    ///
    /// Returns the waiting passenger that was granted the freed server.
    pub fn release(
        &mut self,
        pool: PoolId,
        passenger: PassengerId,
        now: f64,
    ) -> SimulationResult<Option<PassengerId>> {
        let next = self.pool_mut(pool)?.release(passenger, now)?;
        self.locations.remove(&passenger);
        Ok(next)
    }

    /// Withdraw a waiting passenger from `pool`
    ///
    /// Returns `false` when the passenger was not waiting there.
    pub fn cancel(&mut self, pool: PoolId, passenger: PassengerId) -> SimulationResult<bool> {
        let cancelled = self.pool_mut(pool)?.cancel(passenger);
        if cancelled {
            self.locations.remove(&passenger);
        }
        Ok(cancelled)
    }

    /// Snapshot every pool at `time`
    pub fn snapshots(&self, time: f64) -> Vec<PoolSnapshot> {
        self.pools.values().map(|pool| pool.snapshot(time)).collect()
    }

    /// Verify every pool and the location index
    pub fn check_invariants(&self) -> SimulationResult<()> {
        let mut present = 0;
        for pool in self.pools.values() {
            pool.check_invariants()?;
            present += pool.busy_count() + pool.queue_length();
        }
        if present != self.locations.len() {
            return Err(SimulationError::invariant_violation(format!(
                "{} passengers in pools but {} tracked locations",
                present,
                self.locations.len()
            )));
        }
        for (passenger, pool_id) in &self.locations {
            let pool = self.get(*pool_id)?;
            if !pool.is_serving(*passenger) && !pool.is_waiting(*passenger) {
                return Err(SimulationError::invariant_violation(format!(
                    "{} is tracked at {} but not present there",
                    passenger, pool_id
                )));
            }
        }
        Ok(())
    }

    fn pool_mut(&mut self, id: PoolId) -> SimulationResult<&mut ResourcePool> {
        self.pools
            .get_mut(&id)
            .ok_or_else(|| SimulationError::invariant_violation(format!("pool {} is not registered", id)))
    }
}
