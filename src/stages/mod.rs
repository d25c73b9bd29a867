//! Stage processing
//!
//! This module contains the logic that moves passengers through the stage
//! network: pool selection and switching, service-time sampling, flight
//! deadlines, and the event handlers that tie them together.
//!
//! # Overview
//!
//! - **StageProcessor**: handles every delivered event and schedules follow-ups
//! - **RoutingPolicy**: adaptive kiosk choice, jockeying, balk-then-jockey
//! - **ServiceTimeModel**: per-stage distributions scaled by passenger and time-of-day effects
//! - **FlightBoard**: boarded counts per flight and missed-deadline checks
//!
//! # Usage Example
//!
//! ```rust
//! use passenger_flow_simulator::stages::*;
//! use passenger_flow_simulator::types::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let pinned = ServiceDistribution::Fixed { minutes: 2.5 };
//! assert_eq!(sample_base(&pinned, &mut rng).unwrap(), 2.5);
//!
//! let board = FlightBoard::new(&BoardingConfig::default());
//! assert_eq!(board.flight_of(125.0), 3);
//! ```

pub mod boarding;
pub mod processor;
pub mod routing;
pub mod service_time;

// Re-export all public types for convenience
pub use boarding::{FlightBoard, MissReason};
pub use processor::{EventClock, StageProcessor};
pub use routing::RoutingPolicy;
pub use service_time::{sample_base, ServiceTimeModel};
