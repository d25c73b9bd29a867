//! Flights and boarding deadlines
//!
//! Passengers are booked on flights that leave on a fixed cadence. A flight
//! closes once its departure time has passed or once it has boarded as many
//! passengers as the aircraft seats.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::passenger::Passenger;
use crate::types::BoardingConfig;

/// Why a passenger could not board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissReason {
    /// The flight already departed
    Late,
    /// Every seat on the flight is taken
    FlightFull,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::Late => write!(f, "late"),
            MissReason::FlightFull => write!(f, "flight_full"),
        }
    }
}

/// Boarded counts per flight
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlightBoard {
    flight_interval: f64,
    aircraft_capacity: usize,
    boarded: BTreeMap<u64, usize>,
}

impl FlightBoard {
    /// Create an empty board
    pub fn new(config: &BoardingConfig) -> Self {
        Self {
            flight_interval: config.flight_interval_minutes,
            aircraft_capacity: config.aircraft_capacity,
            boarded: BTreeMap::new(),
        }
    }

    /// Flight number departing at `departure`
    pub fn flight_of(&self, departure: f64) -> u64 {
        (departure / self.flight_interval).ceil().max(0.0) as u64
    }

    /// Departure time of flight `flight`
    pub fn departure_of(&self, flight: u64) -> f64 {
        flight as f64 * self.flight_interval
    }

    /// Seats taken on `flight`, counting passengers still at the gate
    pub fn boarded(&self, flight: u64) -> usize {
        self.boarded.get(&flight).copied().unwrap_or(0)
    }

    /// Whether `passenger` can still board at `now`
    pub fn check_deadline(&self, passenger: &Passenger, now: f64) -> Option<MissReason> {
        if now > passenger.departure_time {
            return Some(MissReason::Late);
        }
        if self.boarded(self.flight_of(passenger.departure_time)) >= self.aircraft_capacity {
            return Some(MissReason::FlightFull);
        }
        None
    }

    /// Take a seat for `passenger` on its flight
    pub fn record_boarding(&mut self, passenger: &Passenger) {
        let flight = self.flight_of(passenger.departure_time);
        *self.boarded.entry(flight).or_insert(0) += 1;
    }

    /// Boarded counts in flight order
    pub fn flights(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        self.boarded.iter().map(|(flight, count)| (*flight, *count))
    }
}
