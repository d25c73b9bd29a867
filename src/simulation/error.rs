//! Error types and handling
//!
//! This module contains the error type returned by the simulation core.
//! Passenger failures (balking, reneging, missed flights) are journey
//! outcomes, not errors; everything here aborts the run.

use crate::types::{ConfigError, ConfigValidationError, PassengerId};
use thiserror::Error;

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(String),

    /// An event was scheduled before the current logical time
    #[error("Cannot schedule an event at {requested} when the clock is at {now}")]
    InvalidTime {
        /// Requested firing time
        requested: f64,
        /// Clock time at the moment of scheduling
        now: f64,
    },

    /// A structural invariant of the simulation state was broken
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// An event referred to a passenger the state does not know
    #[error("Unknown passenger: {0}")]
    UnknownPassenger(PassengerId),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<ConfigValidationError> for SimulationError {
    fn from(error: ConfigValidationError) -> Self {
        SimulationError::ConfigurationError(error.to_string())
    }
}

impl From<ConfigError> for SimulationError {
    fn from(error: ConfigError) -> Self {
        SimulationError::ConfigurationError(error.to_string())
    }
}

impl SimulationError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create an invariant violation
    pub fn invariant_violation(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Check if this is a recoverable error
    ///
    /// Only output failures are recoverable; the simulation state is intact
    /// and the run can be written elsewhere.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::ConfigurationError(_) => false,
            SimulationError::InvalidTime { .. } => false,
            SimulationError::InvariantViolation(_) => false,
            SimulationError::UnknownPassenger(_) => false,
            SimulationError::IoError(_) => true,
            SimulationError::SerializationError(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::InvalidTime { .. } => "Scheduling",
            SimulationError::InvariantViolation(_) => "Invariant",
            SimulationError::UnknownPassenger(_) => "Invariant",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;
