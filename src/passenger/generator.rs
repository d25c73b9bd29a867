//! Passenger generation
//!
//! This module contains the arrival process (non-homogeneous Poisson, one
//! rate per hour of day) and the sampling of new passengers: class,
//! strategy, attributes and flight departure.

use std::fmt;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_distr::{Exp, Normal};

use crate::passenger::{Passenger, PassengerAttributes, PassengerSpec};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{
    ArrivalConfig, ClassConfig, PassengerClass, PassengerId, QueueStrategy, SimulationConfig,
};

/// Creates passengers and their arrival times
///
/// The generator holds no random state of its own; every draw comes from
/// the run's seeded generator passed in by the caller.
pub struct PassengerGenerator {
    arrivals: ArrivalConfig,
    classes: ClassConfig,
    flight_interval: f64,
    class_index: WeightedIndex<f64>,
    strategy_index: WeightedIndex<f64>,
    baggage_index: WeightedIndex<f64>,
    group_index: WeightedIndex<f64>,
    frequent_flyer_probability: f64,
}

impl fmt::Debug for PassengerGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassengerGenerator")
            .field("rate_multiplier", &self.arrivals.rate_multiplier)
            .field("flight_interval", &self.flight_interval)
            .finish()
    }
}

impl PassengerGenerator {
    /// Create a generator from a validated configuration
    pub fn new(config: &SimulationConfig) -> SimulationResult<Self> {
        let proportions = &config.classes.proportions;
        let weights = &config.attributes.strategy_weights;
        Ok(Self {
            arrivals: config.arrivals.clone(),
            classes: config.classes.clone(),
            flight_interval: config.boarding.flight_interval_minutes,
            class_index: weighted("classes.proportions", PassengerClass::ALL.map(|c| proportions.get(c)))?,
            strategy_index: weighted(
                "attributes.strategy_weights",
                QueueStrategy::ALL.map(|s| weights.get(s)),
            )?,
            baggage_index: weighted("attributes.baggage_weights", config.attributes.baggage_weights.clone())?,
            group_index: weighted(
                "attributes.group_size_weights",
                config.attributes.group_size_weights.clone(),
            )?,
            frequent_flyer_probability: config.attributes.frequent_flyer_probability,
        })
    }

    /// Time of the next arrival after `now`
    ///
    /// The inter-arrival gap is exponential at the rate of the current hour.
    /// Hours with no arrivals are skipped. Returns `None` when every hour of
    /// the profile is empty.
    pub fn next_arrival<R: Rng + ?Sized>(&self, now: f64, rng: &mut R) -> Option<f64> {
        let mut cursor = now;
        for _ in 0..=self.arrivals.hourly_rates.len() {
            let rate = self.arrivals.rate_per_minute(cursor);
            if rate > 0.0 {
                let gap = Exp::new(rate).ok()?.sample(rng);
                return Some(cursor + gap);
            }
            cursor = ((cursor / 60.0).floor() + 1.0) * 60.0;
        }
        None
    }

    /// Sample a new passenger arriving at `now`
    pub fn create<R: Rng + ?Sized>(&self, id: PassengerId, now: f64, rng: &mut R) -> SimulationResult<Passenger> {
        let class = PassengerClass::ALL[self.class_index.sample(rng)];
        let strategy = QueueStrategy::ALL[self.strategy_index.sample(rng)];
        let attributes = PassengerAttributes {
            bags: self.baggage_index.sample(rng) as u8,
            group_size: self.group_index.sample(rng) as u8 + 1,
            frequent_flyer: rng.gen_bool(self.frequent_flyer_probability),
        };
        let lead = self.sample_lead_time(class, rng)?;
        let departure = self.departure_slot(now + lead);

        Ok(Passenger::new(
            id,
            class,
            strategy,
            attributes,
            now,
            departure,
            self.classes.patience_minutes.get(class),
        ))
    }

    /// Build a scripted passenger
    ///
    /// Without an explicit departure the passenger is booked on the first
    /// flight after its class's mean lead time.
    pub fn from_spec(&self, id: PassengerId, spec: &PassengerSpec) -> Passenger {
        let departure = spec.departure_time.unwrap_or_else(|| {
            let lead = self.classes.lead_time_mean.get(spec.class).max(self.classes.min_lead_minutes);
            self.departure_slot(spec.arrival_time + lead)
        });
        Passenger::new(
            id,
            spec.class,
            spec.strategy,
            spec.attributes,
            spec.arrival_time,
            departure,
            spec.patience.unwrap_or_else(|| self.classes.patience_minutes.get(spec.class)),
        )
    }

    /// First flight departing at or after `earliest`
    pub fn departure_slot(&self, earliest: f64) -> f64 {
        (earliest / self.flight_interval).ceil() * self.flight_interval
    }

    fn sample_lead_time<R: Rng + ?Sized>(&self, class: PassengerClass, rng: &mut R) -> SimulationResult<f64> {
        let normal = Normal::new(
            self.classes.lead_time_mean.get(class),
            self.classes.lead_time_std_dev.get(class),
        )
        .map_err(|e| SimulationError::configuration_error(format!("lead time for {}: {}", class, e)))?;
        Ok(normal.sample(rng).max(self.classes.min_lead_minutes))
    }
}

fn weighted<I>(field: &str, weights: I) -> SimulationResult<WeightedIndex<f64>>
where
    I: IntoIterator<Item = f64>,
{
    WeightedIndex::new(weights)
        .map_err(|e| SimulationError::configuration_error(format!("{}: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_passengers_respect_config() {
        let config = SimulationConfig::default();
        let generator = PassengerGenerator::new(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for n in 0..500 {
            let passenger = generator.create(PassengerId::new(n), 100.0, &mut rng).unwrap();
            assert!(passenger.attributes.bags <= 3);
            assert!((1..=5).contains(&passenger.attributes.group_size));
            assert!(passenger.departure_time >= 100.0 + config.classes.min_lead_minutes);
            assert_eq!(passenger.departure_time % 60.0, 0.0);
            assert_eq!(passenger.base_patience, config.classes.patience_minutes.get(passenger.class));
        }
    }

    #[test]
    fn test_class_mix_is_roughly_configured() {
        let config = SimulationConfig::default();
        let generator = PassengerGenerator::new(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let standard = (0..2000)
            .map(|n| generator.create(PassengerId::new(n), 0.0, &mut rng).unwrap())
            .filter(|p| p.class == PassengerClass::Standard)
            .count();
        let share = standard as f64 / 2000.0;
        assert!((0.75..0.85).contains(&share), "standard share {}", share);
    }

    #[test]
    fn test_next_arrival_skips_empty_hours() {
        let mut config = SimulationConfig::default();
        config.arrivals.hourly_rates = vec![0.0; 24];
        config.arrivals.hourly_rates[3] = 60.0;
        let generator = PassengerGenerator::new(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let next = generator.next_arrival(10.0, &mut rng).unwrap();
        assert!(next >= 180.0);
    }

    #[test]
    fn test_no_arrivals_when_profile_is_empty() {
        let mut config = SimulationConfig::default();
        config.arrivals.rate_multiplier = 0.0;
        let generator = PassengerGenerator::new(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(generator.next_arrival(0.0, &mut rng), None);
    }

    #[test]
    fn test_spec_defaults() {
        let config = SimulationConfig::default();
        let generator = PassengerGenerator::new(&config).unwrap();
        let spec = PassengerSpec::new(PassengerClass::PriorityA, 30.0);

        let passenger = generator.from_spec(PassengerId::new(0), &spec);
        // 30 + 120 rounded up to the next hourly departure
        assert_eq!(passenger.departure_time, 180.0);
        assert_eq!(passenger.base_patience, 10.0);
    }
}
