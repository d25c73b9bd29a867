//! Terminal facilities and resource management
//!
//! This module models the servers of the terminal (counters, kiosks,
//! security lanes, gates) as capacity-constrained resource pools, the
//! registry that owns them, and the layout that maps stages to pools.
//!
//! # Overview
//!
//! - **ResourcePool**: identical servers with a FIFO or priority waiting structure
//! - **PoolRegistry**: all pools plus the index of which pool each passenger occupies
//! - **Layout**: stage steps, per-class pool alternatives and pool settings
//!
//! # Usage Example
//!
//! ```rust
//! use passenger_flow_simulator::facility::*;
//! use passenger_flow_simulator::types::*;
//!
//! let mut pool = ResourcePool::new(PoolId::PriorityCounter, 1, 5.0).unwrap();
//! let (standard, first) = (PassengerId::new(1), PassengerId::new(2));
//!
//! pool.request(PassengerId::new(0), 2, 0.0).unwrap();
//! pool.request(standard, PassengerClass::Standard.rank(), 1.0).unwrap();
//! pool.request(first, PassengerClass::PriorityA.rank(), 2.0).unwrap();
//!
//! // The priority passenger is served first even though it arrived later
//! assert_eq!(pool.release(PassengerId::new(0), 5.0).unwrap(), Some(first));
//! ```

pub mod layout;
pub mod pool;
pub mod registry;

// Re-export all public types for convenience
pub use layout::{alternatives, jockey_alternative, pool_settings, step_count, PoolSettings, StageStep};
pub use pool::{PoolSnapshot, PoolStats, RequestOutcome, ResourcePool, WaitingEntry};
pub use registry::PoolRegistry;
