//! Simulation orchestration and control
//!
//! This module contains the orchestrator that drives a run, the state the
//! event handlers share, metrics sinks, statistics, scenario presets,
//! time-of-day effects, logging setup and error handling.
//!
//! # Overview
//!
//! - **SimulationOrchestrator**: owns the clock, state and processor of one run
//! - **SimulationState**: pools, passengers, flights, the seeded generator and the sink
//! - **MetricsSink**: write-only receiver of events, transitions, journeys and snapshots
//! - **SimulationStatistics**: outcome counts, waits, utilization and throughput
//! - **Scenario**: staffing, technology and demand presets
//! - **TimeManager**: fatigue and peak-hour service multipliers
//! - **SimulationError**: error taxonomy of the engine
//!
//! # Usage Example
//!
//! ```rust
//! use passenger_flow_simulator::simulation::*;
//! use passenger_flow_simulator::types::*;
//!
//! let mut config = SimulationConfig::default();
//! config.run.seed = Some(7);
//! config.run.duration_minutes = 120.0;
//!
//! let mut orchestrator = SimulationOrchestrator::new(config).unwrap();
//! let statistics = orchestrator.run().unwrap();
//!
//! assert!(statistics.is_conserved());
//! assert_eq!(orchestrator.sink().journeys.len(), statistics.generated);
//! ```

pub mod error;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod scenario;
pub mod state;
pub mod statistics;
pub mod time_manager;

// Re-export all public types for convenience
pub use error::*;
pub use logging::*;
pub use metrics::*;
pub use orchestrator::*;
pub use scenario::*;
pub use state::*;
pub use statistics::*;
pub use time_manager::*;
