//! Passenger entity
//!
//! This module contains the Passenger struct: identity, class, sampled
//! attributes, flight deadline and the journey through the terminal.

use crate::passenger::journey::Journey;
use crate::types::{PassengerClass, PassengerId, QueueStrategy};
use serde::{Deserialize, Serialize};

/// Attributes sampled once when a passenger is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerAttributes {
    /// Checked bags
    pub bags: u8,
    /// Travelling party size, including the passenger
    pub group_size: u8,
    /// Frequent flyers are served faster
    pub frequent_flyer: bool,
}

impl Default for PassengerAttributes {
    fn default() -> Self {
        Self { bags: 0, group_size: 1, frequent_flyer: false }
    }
}

/// A passenger moving through the terminal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    /// Unique identifier within the run
    pub id: PassengerId,
    /// Service class
    pub class: PassengerClass,
    /// Queue-selection strategy
    pub strategy: QueueStrategy,
    /// Sampled attributes
    pub attributes: PassengerAttributes,
    /// Time the passenger entered the terminal
    pub arrival_time: f64,
    /// Scheduled departure of the passenger's flight
    pub departure_time: f64,
    /// Patience before time pressure or progress adjustments, in minutes
    pub base_patience: f64,
    /// Progress through the network
    pub journey: Journey,
}

impl Passenger {
    /// Create a passenger that has not started its journey
    pub fn new(
        id: PassengerId,
        class: PassengerClass,
        strategy: QueueStrategy,
        attributes: PassengerAttributes,
        arrival_time: f64,
        departure_time: f64,
        base_patience: f64,
    ) -> Self {
        Self {
            id,
            class,
            strategy,
            attributes,
            arrival_time,
            departure_time,
            base_patience,
            journey: Journey::new(),
        }
    }

    /// Minutes left until departure at `now` (negative once departed)
    pub fn time_to_departure(&self, now: f64) -> f64 {
        self.departure_time - now
    }

    /// Time spent in the terminal, for finished journeys
    pub fn time_in_system(&self) -> Option<f64> {
        self.journey.finished_at.map(|end| end - self.arrival_time)
    }
}

/// Description of a passenger to place into a run by hand
///
/// Used for scripted scenarios; unset fields take neutral values that do
/// not alter service times.
#[derive(Debug, Clone, PartialEq)]
pub struct PassengerSpec {
    /// Service class
    pub class: PassengerClass,
    /// Arrival time
    pub arrival_time: f64,
    /// Departure time; derived from the class lead time when unset
    pub departure_time: Option<f64>,
    /// Attributes
    pub attributes: PassengerAttributes,
    /// Queue-selection strategy
    pub strategy: QueueStrategy,
    /// Patience override in minutes
    pub patience: Option<f64>,
}

impl PassengerSpec {
    /// A passenger of `class` arriving at `arrival_time`
    pub fn new(class: PassengerClass, arrival_time: f64) -> Self {
        Self {
            class,
            arrival_time,
            departure_time: None,
            attributes: PassengerAttributes::default(),
            strategy: QueueStrategy::ShortestQueue,
            patience: None,
        }
    }

    /// Set the departure time
    pub fn with_departure(mut self, departure_time: f64) -> Self {
        self.departure_time = Some(departure_time);
        self
    }

    /// Set the attributes
    pub fn with_attributes(mut self, attributes: PassengerAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the queue-selection strategy
    pub fn with_strategy(mut self, strategy: QueueStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Override the class patience
    pub fn with_patience(mut self, patience: f64) -> Self {
        self.patience = Some(patience);
        self
    }
}
