//! Identifier types for the passenger flow simulator
//!
//! Passenger identifiers are sequential and allocated by the simulation state
//! that owns the run, so two runs with the same seed produce the same ids.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unique identifier for a passenger within one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassengerId(pub u64);

impl PassengerId {
    /// Create an identifier from its sequence number
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Sequence number of the identifier
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PAX_{:06}", self.0)
    }
}

impl Serialize for PassengerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PassengerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let digits = s.strip_prefix("PAX_").unwrap_or(&s);
        digits.parse::<u64>().map(PassengerId).map_err(serde::de::Error::custom)
    }
}

/// Sequential allocator for passenger identifiers
#[derive(Debug, Clone, Default)]
pub struct PassengerIdAllocator {
    next: u64,
}

impl PassengerIdAllocator {
    /// Create an allocator starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier
    pub fn allocate(&mut self) -> PassengerId {
        let id = PassengerId(self.next);
        self.next += 1;
        id
    }

    /// Number of identifiers handed out so far
    pub fn allocated(&self) -> u64 {
        self.next
    }
}
