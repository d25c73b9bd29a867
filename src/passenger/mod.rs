//! Passenger modeling
//!
//! This module contains the passenger entity, its journey through the stage
//! network, the arrival and attribute generator, and the behavioural rules
//! for patience, abandonment and service-time effects.
//!
//! # Overview
//!
//! - **Passenger**: class, attributes, flight deadline and journey
//! - **Journey**: current position, activity, visits and terminal outcome
//! - **PassengerGenerator**: non-homogeneous Poisson arrivals and sampled attributes
//! - **behavior**: renege probabilities, patience adjustments, service modifiers
//!
//! # Usage Example
//!
//! ```rust
//! use passenger_flow_simulator::passenger::*;
//! use passenger_flow_simulator::types::*;
//!
//! let config = SimulationConfig::default();
//! let generator = PassengerGenerator::new(&config).unwrap();
//!
//! let spec = PassengerSpec::new(PassengerClass::Standard, 12.0).with_departure(120.0);
//! let passenger = generator.from_spec(PassengerId::new(0), &spec);
//!
//! assert_eq!(passenger.journey.outcome, Outcome::InProgress);
//! assert_eq!(behavior::renege_probability(5.0, passenger.base_patience), 0.25);
//! ```

pub mod behavior;
pub mod generator;
pub mod journey;
#[allow(clippy::module_inception)]
pub mod passenger;

// Re-export all public types for convenience
pub use generator::PassengerGenerator;
pub use journey::{Activity, Journey, StageVisit};
pub use passenger::{Passenger, PassengerAttributes, PassengerSpec};
