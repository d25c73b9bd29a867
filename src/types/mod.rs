//! Core types and identifiers for the passenger flow simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: sequential passenger identifiers allocated per run
//! - **Enums**: passenger classes, strategies, outcomes, stages and pool names
//! - **Configuration**: simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use passenger_flow_simulator::types::*;
//!
//! let mut ids = PassengerIdAllocator::new();
//! let first = ids.allocate();
//! assert_eq!(first.to_string(), "PAX_000000");
//!
//! assert!(PassengerClass::PriorityA.rank() < PassengerClass::Standard.rank());
//! assert_eq!(PoolId::Kiosk.stage(), StageKind::CheckIn);
//!
//! let mut config = SimulationConfig::default();
//! config.run.seed = Some(42);
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
