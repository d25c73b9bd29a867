//! Service-time sampling
//!
//! Durations are drawn from the pool's base distribution and then scaled by
//! the passenger's attribute modifier and the time-of-day multiplier. The
//! result never drops below the configured minimum.

use rand::distributions::Distribution;
use rand::Rng;
use rand_distr::{Exp, Gamma};

use crate::passenger::behavior::service_modifier;
use crate::passenger::Passenger;
use crate::simulation::{SimulationError, SimulationResult, TimeManager};
use crate::types::{AttributeConfig, BehaviorConfig, ServiceDistribution, StageKind};

/// Draw a base duration from `distribution`
///
/// Gamma uses shape `(mean/sd)^2` and scale `sd^2/mean`, which reproduces
/// the configured mean and standard deviation.
pub fn sample_base<R: Rng + ?Sized>(distribution: &ServiceDistribution, rng: &mut R) -> SimulationResult<f64> {
    match *distribution {
        ServiceDistribution::Gamma { mean, std_dev } => {
            let shape = (mean / std_dev).powi(2);
            let scale = std_dev * std_dev / mean;
            let gamma = Gamma::new(shape, scale)
                .map_err(|e| SimulationError::configuration_error(format!("gamma service time: {}", e)))?;
            Ok(gamma.sample(rng))
        }
        ServiceDistribution::Exponential { mean } => {
            let exp = Exp::new(1.0 / mean).map_err(|e| {
                SimulationError::configuration_error(format!("exponential service time: {}", e))
            })?;
            Ok(exp.sample(rng))
        }
        ServiceDistribution::Uniform { min, max } if min < max => Ok(rng.gen_range(min..max)),
        ServiceDistribution::Uniform { min, .. } => Ok(min),
        ServiceDistribution::Fixed { minutes } => Ok(minutes),
    }
}

/// Samples service durations for every stage
#[derive(Debug, Clone)]
pub struct ServiceTimeModel {
    attributes: AttributeConfig,
    behavior: BehaviorConfig,
    time: TimeManager,
    min_minutes: f64,
}

impl ServiceTimeModel {
    /// Create a model
    pub fn new(
        attributes: AttributeConfig,
        behavior: BehaviorConfig,
        time: TimeManager,
        min_minutes: f64,
    ) -> Self {
        Self { attributes, behavior, time, min_minutes }
    }

    /// Multiplier applied to the base draw for `passenger` starting service at `now`
    pub fn multiplier(&self, passenger: &Passenger, stage: StageKind, now: f64) -> f64 {
        service_modifier(passenger, stage, now, &self.attributes, &self.behavior)
            * self.time.service_multiplier(now)
    }

    /// Sample the service duration for `passenger` at a pool of `stage`
    pub fn sample<R: Rng + ?Sized>(
        &self,
        distribution: &ServiceDistribution,
        passenger: &Passenger,
        stage: StageKind,
        now: f64,
        rng: &mut R,
    ) -> SimulationResult<f64> {
        let base = sample_base(distribution, rng)?;
        Ok((base * self.multiplier(passenger, stage, now)).max(self.min_minutes))
    }

    /// Time manager used for time-of-day effects
    pub fn time_manager(&self) -> &TimeManager {
        &self.time
    }
}
