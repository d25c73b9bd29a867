//! Capacity-constrained resource pools
//!
//! A pool is a set of identical servers plus a waiting structure. Standard
//! pools serve in arrival order; priority pools serve by (rank, arrival
//! order) so passengers of equal priority are still served FIFO.

use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{PassengerId, PoolId, QueueDiscipline};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of requesting a server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A server was free and is now held by the passenger
    Granted,
    /// The passenger joined the waiting structure
    Queued {
        /// Number of passengers ahead in service order
        ahead: usize,
    },
}

/// A passenger waiting for a server
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaitingEntry {
    /// Waiting passenger
    pub passenger: PassengerId,
    /// Priority rank (0 is served first on priority pools)
    pub rank: u8,
    /// Time the passenger joined the queue
    pub enqueued_at: f64,
}

/// Counters accumulated by a pool over a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Servers handed out
    pub granted: u64,
    /// Servers released
    pub completed: u64,
    /// Waiting passengers withdrawn before service
    pub cancelled: u64,
    /// Total minutes servers were held
    pub busy_minutes: f64,
    /// Longest queue observed
    pub max_queue_length: usize,
    /// Time of the most recent grant
    pub last_grant_time: Option<f64>,
}

/// Point-in-time view of a pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Logical time of the snapshot
    pub time: f64,
    /// Pool observed
    pub pool: PoolId,
    /// Passengers waiting
    pub queue_length: usize,
    /// Servers in use
    pub busy: usize,
    /// Servers in total
    pub capacity: usize,
}

/// A pool of identical servers with a waiting structure
#[derive(Debug, Clone)]
pub struct ResourcePool {
    id: PoolId,
    capacity: usize,
    discipline: QueueDiscipline,
    nominal_service_minutes: f64,
    /// Passengers holding a server, with the time they were granted it
    busy: BTreeMap<PassengerId, f64>,
    /// Waiting passengers keyed by (rank, sequence)
    waiting: BTreeMap<(u8, u64), WaitingEntry>,
    waiting_index: BTreeMap<PassengerId, (u8, u64)>,
    next_seq: u64,
    stats: PoolStats,
}

impl ResourcePool {
    /// Create a pool with `capacity` servers
    ///
    /// `nominal_service_minutes` seeds the service-rate estimate until the
    /// pool has completed its first service.
    pub fn new(id: PoolId, capacity: usize, nominal_service_minutes: f64) -> SimulationResult<Self> {
        if capacity == 0 {
            return Err(SimulationError::configuration_error(format!(
                "pool {} must have at least one server",
                id
            )));
        }
        Ok(Self {
            id,
            capacity,
            discipline: id.discipline(),
            nominal_service_minutes,
            busy: BTreeMap::new(),
            waiting: BTreeMap::new(),
            waiting_index: BTreeMap::new(),
            next_seq: 0,
            stats: PoolStats::default(),
        })
    }

    /// Pool identifier
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Number of servers
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Waiting discipline
    pub fn discipline(&self) -> QueueDiscipline {
        self.discipline
    }

    /// Servers in use
    pub fn busy_count(&self) -> usize {
        self.busy.len()
    }

    /// Passengers waiting
    pub fn queue_length(&self) -> usize {
        self.waiting.len()
    }

    /// Whether a newcomer would be served immediately
    pub fn has_idle_server(&self) -> bool {
        self.busy.len() < self.capacity && self.waiting.is_empty()
    }

    /// Accumulated counters
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Whether the passenger is waiting here
    pub fn is_waiting(&self, passenger: PassengerId) -> bool {
        self.waiting_index.contains_key(&passenger)
    }

    /// Whether the passenger holds a server here
    pub fn is_serving(&self, passenger: PassengerId) -> bool {
        self.busy.contains_key(&passenger)
    }

    /// Number of passengers ahead of `passenger` in service order
    pub fn position_of(&self, passenger: PassengerId) -> Option<usize> {
        let key = self.waiting_index.get(&passenger)?;
        Some(self.waiting.range(..*key).count())
    }

    /// The waiting entry of a passenger
    pub fn waiting_entry(&self, passenger: PassengerId) -> Option<&WaitingEntry> {
        self.waiting_index.get(&passenger).and_then(|key| self.waiting.get(key))
    }

    /// Waiting passengers in service order
    pub fn waiting_passengers(&self) -> impl Iterator<Item = &WaitingEntry> {
        self.waiting.values()
    }

    /// Request a server for `passenger`
    ///
    /// `rank` only matters on priority pools.
    pub fn request(&mut self, passenger: PassengerId, rank: u8, now: f64) -> SimulationResult<RequestOutcome> {
        if self.is_serving(passenger) || self.is_waiting(passenger) {
            return Err(SimulationError::invariant_violation(format!(
                "{} requested {} while already present",
                passenger, self.id
            )));
        }

        if self.has_idle_server() {
            self.grant(passenger, now);
            return Ok(RequestOutcome::Granted);
        }

        let rank = match self.discipline {
            QueueDiscipline::Fifo => 0,
            QueueDiscipline::Priority => rank,
        };
        let key = (rank, self.next_seq);
        self.next_seq += 1;
        self.waiting.insert(key, WaitingEntry { passenger, rank, enqueued_at: now });
        self.waiting_index.insert(passenger, key);
        self.stats.max_queue_length = self.stats.max_queue_length.max(self.waiting.len());

        let ahead = self.waiting.range(..key).count();
        Ok(RequestOutcome::Queued { ahead })
    }

    /// Release the server held by `passenger`
    ///
    /// If anyone is waiting, the head of the queue is granted the freed
    /// server and returned so its journey can be resumed.
    pub fn release(&mut self, passenger: PassengerId, now: f64) -> SimulationResult<Option<PassengerId>> {
        let granted_at = self.busy.remove(&passenger).ok_or_else(|| {
            SimulationError::invariant_violation(format!(
                "{} released {} without holding a server",
                passenger, self.id
            ))
        })?;
        self.stats.completed += 1;
        self.stats.busy_minutes += (now - granted_at).max(0.0);

        let Some((_, head)) = self.waiting.pop_first() else {
            return Ok(None);
        };
        self.waiting_index.remove(&head.passenger);
        self.grant(head.passenger, now);
        Ok(Some(head.passenger))
    }

    /// Withdraw a waiting passenger
    ///
    /// Returns `false` without side effects when the passenger is not
    /// waiting, including when it has already been granted a server.
    pub fn cancel(&mut self, passenger: PassengerId) -> bool {
        let Some(key) = self.waiting_index.remove(&passenger) else {
            return false;
        };
        self.waiting.remove(&key);
        self.stats.cancelled += 1;
        true
    }

    /// Estimated services per minute per server
    ///
    /// Uses the observed mean holding time once services have completed and
    /// the nominal service time before that.
    pub fn service_rate(&self) -> f64 {
        let mean = if self.stats.completed > 0 && self.stats.busy_minutes > 0.0 {
            self.stats.busy_minutes / self.stats.completed as f64
        } else {
            self.nominal_service_minutes
        };
        if mean > 0.0 {
            1.0 / mean
        } else {
            f64::INFINITY
        }
    }

    /// Projected wait for a passenger with `ahead` others in front
    pub fn projected_wait(&self, ahead: usize) -> f64 {
        let throughput = self.capacity as f64 * self.service_rate();
        (ahead + 1) as f64 / throughput
    }

    /// Projected wait for a passenger joining now
    pub fn projected_wait_for_newcomer(&self) -> f64 {
        if self.has_idle_server() {
            0.0
        } else {
            self.projected_wait(self.waiting.len())
        }
    }

    /// Whether the pool granted a server within `window` minutes of `now`
    pub fn progressed_within(&self, now: f64, window: f64) -> bool {
        self.stats.last_grant_time.map_or(false, |t| now - t <= window)
    }

    /// Snapshot of the pool at `time`
    pub fn snapshot(&self, time: f64) -> PoolSnapshot {
        PoolSnapshot {
            time,
            pool: self.id,
            queue_length: self.waiting.len(),
            busy: self.busy.len(),
            capacity: self.capacity,
        }
    }

    /// Verify the structural invariants of the pool
    pub fn check_invariants(&self) -> SimulationResult<()> {
        if self.busy.len() > self.capacity {
            return Err(SimulationError::invariant_violation(format!(
                "{} has {} busy servers but capacity {}",
                self.id,
                self.busy.len(),
                self.capacity
            )));
        }
        if self.waiting.len() != self.waiting_index.len() {
            return Err(SimulationError::invariant_violation(format!(
                "{} waiting index is out of sync",
                self.id
            )));
        }
        if !self.waiting.is_empty() && self.busy.len() < self.capacity {
            return Err(SimulationError::invariant_violation(format!(
                "{} has idle servers while passengers wait",
                self.id
            )));
        }
        if let Some(passenger) = self.busy.keys().find(|p| self.waiting_index.contains_key(p)) {
            return Err(SimulationError::invariant_violation(format!(
                "{} is both waiting and in service at {}",
                passenger, self.id
            )));
        }
        Ok(())
    }

    fn grant(&mut self, passenger: PassengerId, now: f64) {
        self.busy.insert(passenger, now);
        self.stats.granted += 1;
        self.stats.last_grant_time = Some(now);
    }
}
