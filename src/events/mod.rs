//! Event scheduling
//!
//! This module contains the logical clock that orders all simulation work
//! and the event kinds it delivers.
//!
//! # Usage Example
//!
//! ```rust
//! use passenger_flow_simulator::events::*;
//! use passenger_flow_simulator::types::PassengerId;
//!
//! let mut clock = SimulationClock::new();
//! clock.schedule(2.0, EventKind::MonitorTick).unwrap();
//! clock.schedule(1.0, EventKind::Arrival { passenger: PassengerId::new(0) }).unwrap();
//!
//! let first = clock.pop_next().unwrap();
//! assert_eq!(first.event.label(), "arrival");
//! assert_eq!(clock.now(), 1.0);
//! ```

pub mod clock;
pub mod event;

// Re-export all public types for convenience
pub use clock::*;
pub use event::*;
