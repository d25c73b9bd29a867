//! Mutable simulation state
//!
//! Everything the event handlers touch lives here: the random generator,
//! pools, passengers, flights and the metrics sink. The clock is kept
//! separately so handlers can borrow both at once.

use std::collections::BTreeMap;

use rand::rngs::StdRng;

use crate::facility::PoolRegistry;
use crate::passenger::Passenger;
use crate::simulation::metrics::{JourneyRecord, MetricsSink, TransitionRecord};
use crate::simulation::{SimulationError, SimulationResult};
use crate::stages::FlightBoard;
use crate::types::{PassengerId, PassengerIdAllocator};

/// State shared by all event handlers of one run
#[derive(Debug)]
pub struct SimulationState<M: MetricsSink> {
    /// The single random source of the run
    pub rng: StdRng,
    /// Resource pools
    pub pools: PoolRegistry,
    /// Every passenger created so far, finished or not
    pub passengers: BTreeMap<PassengerId, Passenger>,
    /// Identifier source
    pub ids: PassengerIdAllocator,
    /// Boarded counts per flight
    pub flights: FlightBoard,
    /// Metrics output
    pub sink: M,
}

impl<M: MetricsSink> SimulationState<M> {
    /// Create the state of a new run
    pub fn new(rng: StdRng, pools: PoolRegistry, flights: FlightBoard, sink: M) -> Self {
        Self {
            rng,
            pools,
            passengers: BTreeMap::new(),
            ids: PassengerIdAllocator::new(),
            flights,
            sink,
        }
    }

    /// Look up a passenger
    pub fn passenger(&self, id: PassengerId) -> SimulationResult<&Passenger> {
        self.passengers.get(&id).ok_or(SimulationError::UnknownPassenger(id))
    }

    /// Look up a passenger for modification
    pub fn passenger_mut(&mut self, id: PassengerId) -> SimulationResult<&mut Passenger> {
        self.passengers.get_mut(&id).ok_or(SimulationError::UnknownPassenger(id))
    }

    /// Add a passenger
    pub fn insert(&mut self, passenger: Passenger) -> SimulationResult<()> {
        if self.passengers.contains_key(&passenger.id) {
            return Err(SimulationError::invariant_violation(format!(
                "{} created twice",
                passenger.id
            )));
        }
        self.passengers.insert(passenger.id, passenger);
        Ok(())
    }

    /// Report a transition to the sink
    pub fn transition(&mut self, record: TransitionRecord) -> SimulationResult<()> {
        self.sink.record_transition(&record)
    }

    /// Report a journey to the sink
    pub fn record_journey(&mut self, id: PassengerId) -> SimulationResult<()> {
        let record = JourneyRecord::from(self.passenger(id)?);
        self.sink.record_journey(&record)
    }

    /// Passengers that have not reached a terminal outcome
    pub fn in_system(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers.values().filter(|p| !p.journey.is_finished())
    }
}
