//! Statistics collection and reporting
//!
//! Run statistics are computed from the final simulation state: passenger
//! outcomes and journeys, plus the counters kept by each resource pool.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::facility::PoolRegistry;
use crate::passenger::Passenger;
use crate::types::{Outcome, PassengerClass, PoolId, StageKind};

/// Outcome counts for one passenger class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassStatistics {
    /// Class
    pub class: Option<PassengerClass>,
    /// Passengers created
    pub generated: usize,
    /// Boarded
    pub completed: usize,
    /// Missed their flight
    pub missed_deadline: usize,
    /// Balked
    pub balked: usize,
    /// Reneged
    pub reneged: usize,
}

/// Waiting and service times at one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageStatistics {
    /// Stage
    pub stage: StageKind,
    /// Services started at the stage
    pub services: usize,
    /// Mean wait before service, in minutes
    pub average_wait: f64,
    /// Longest wait before service, in minutes
    pub max_wait: f64,
    /// Mean completed service time, in minutes
    pub average_service: f64,
}

/// Load on one resource pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolStatistics {
    /// Pool
    pub pool: PoolId,
    /// Servers
    pub capacity: usize,
    /// Services completed
    pub served: usize,
    /// Waiting passengers withdrawn (reneged or switched away)
    pub cancelled: usize,
    /// Longest queue seen
    pub max_queue_length: usize,
    /// Fraction of server time spent on completed services
    pub utilization: f64,
}

/// Statistics of one simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatistics {
    /// Simulated minutes covered by the run
    pub elapsed_minutes: f64,
    /// Terminal clock at the end of the covered period, e.g. `D+0 02:00`
    #[serde(default)]
    pub clock_at_end: String,
    /// Events delivered by the clock
    pub events_processed: usize,

    // Outcomes
    /// Passengers created
    pub generated: usize,
    /// Passengers that boarded
    pub completed: usize,
    /// Passengers that missed their flight
    pub missed_deadline: usize,
    /// Passengers that balked
    pub balked: usize,
    /// Passengers that reneged
    pub reneged: usize,
    /// Passengers still in the terminal
    pub in_system: usize,

    // Behaviour
    /// Kiosk balks turned into counter visits
    pub balk_jockeys: usize,
    /// Queue switches while waiting
    pub jockeys: usize,
    /// Returns to check-in after a document issue
    pub document_loops: usize,
    /// Secondary inspections after security
    pub secondary_inspections: usize,

    // Timing
    /// Mean time in the terminal of boarded passengers, in minutes
    pub average_time_in_system: f64,
    /// Boarded passengers per simulated hour
    pub throughput_per_hour: f64,

    /// Outcomes by class
    pub classes: Vec<ClassStatistics>,
    /// Per-stage waits and service times
    pub stages: Vec<StageStatistics>,
    /// Per-pool load
    pub pools: Vec<PoolStatistics>,
}

impl SimulationStatistics {
    /// Compute statistics from the passengers and pools of a run
    ///
    /// `generated` is the number of passenger identifiers handed out, counted
    /// independently of the passengers tracked so that a lost passenger shows
    /// up as a conservation failure.
    pub fn collect<'a, I>(passengers: I, generated: usize, pools: &PoolRegistry, elapsed_minutes: f64) -> Self
    where
        I: IntoIterator<Item = &'a Passenger>,
    {
        let mut stats = Self { elapsed_minutes, generated, ..Self::default() };
        let mut classes: Vec<ClassStatistics> = PassengerClass::ALL
            .iter()
            .map(|class| ClassStatistics { class: Some(*class), ..Default::default() })
            .collect();
        let mut waits: Vec<Vec<f64>> = vec![Vec::new(); StageKind::ALL.len()];
        let mut services: Vec<Vec<f64>> = vec![Vec::new(); StageKind::ALL.len()];
        let mut total_time_in_system = 0.0;

        for passenger in passengers {
            let journey = &passenger.journey;
            let by_class = &mut classes[passenger.class.rank() as usize];
            by_class.generated += 1;
            match journey.outcome {
                Outcome::Completed => {
                    stats.completed += 1;
                    by_class.completed += 1;
                    total_time_in_system += passenger.time_in_system().unwrap_or(0.0);
                }
                Outcome::MissedDeadline => {
                    stats.missed_deadline += 1;
                    by_class.missed_deadline += 1;
                }
                Outcome::Balked => {
                    stats.balked += 1;
                    by_class.balked += 1;
                }
                Outcome::Reneged => {
                    stats.reneged += 1;
                    by_class.reneged += 1;
                }
                Outcome::InProgress => stats.in_system += 1,
            }
            stats.balk_jockeys += journey.balk_jockeys as usize;
            stats.jockeys += journey.jockeys as usize;
            stats.document_loops += journey.document_loops as usize;
            stats.secondary_inspections += journey.secondary_inspections as usize;

            for visit in &journey.visits {
                let index = stage_index(visit.stage);
                if let Some(wait) = visit.wait_minutes() {
                    waits[index].push(wait);
                }
                if let Some(service) = visit.service_minutes() {
                    services[index].push(service);
                }
            }
        }

        if stats.completed > 0 {
            stats.average_time_in_system = total_time_in_system / stats.completed as f64;
        }
        if elapsed_minutes > 0.0 {
            stats.throughput_per_hour = stats.completed as f64 / (elapsed_minutes / 60.0);
        }

        stats.classes = classes;
        stats.stages = StageKind::ALL
            .iter()
            .map(|stage| {
                let index = stage_index(*stage);
                StageStatistics {
                    stage: *stage,
                    services: waits[index].len(),
                    average_wait: mean(&waits[index]),
                    max_wait: waits[index].iter().copied().fold(0.0, f64::max),
                    average_service: mean(&services[index]),
                }
            })
            .collect();
        stats.pools = pools
            .pools()
            .map(|pool| {
                let counters = pool.stats();
                let available = pool.capacity() as f64 * elapsed_minutes;
                PoolStatistics {
                    pool: pool.id(),
                    capacity: pool.capacity(),
                    served: counters.completed as usize,
                    cancelled: counters.cancelled as usize,
                    max_queue_length: counters.max_queue_length,
                    utilization: if available > 0.0 { counters.busy_minutes / available } else { 0.0 },
                }
            })
            .collect();
        stats
    }

    /// Whether every generated passenger is accounted for exactly once
    pub fn is_conserved(&self) -> bool {
        self.generated
            == self.completed + self.missed_deadline + self.balked + self.reneged + self.in_system
    }

    /// Share of generated passengers that boarded, in percent
    pub fn completion_percentage(&self) -> f64 {
        percentage(self.completed, self.generated)
    }

    /// Share of generated passengers that balked or reneged, in percent
    pub fn abandonment_percentage(&self) -> f64 {
        percentage(self.balked + self.reneged, self.generated)
    }

    /// Statistics of one stage
    pub fn stage(&self, stage: StageKind) -> Option<&StageStatistics> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Statistics of one pool
    pub fn pool(&self, pool: PoolId) -> Option<&PoolStatistics> {
        self.pools.iter().find(|p| p.pool == pool)
    }

    /// Human-readable report
    pub fn summary(&self) -> String {
        let mut output = String::new();

        output.push_str("Passenger Flow Simulation Complete\n");
        output.push_str("==================================\n\n");
        if self.clock_at_end.is_empty() {
            output.push_str(&format!(
                "Simulated {:.0} minutes, {} events\n\n",
                self.elapsed_minutes, self.events_processed
            ));
        } else {
            output.push_str(&format!(
                "Simulated {:.0} minutes (until {}), {} events\n\n",
                self.elapsed_minutes, self.clock_at_end, self.events_processed
            ));
        }

        output.push_str("Outcomes:\n");
        output.push_str(&format!("   Generated:        {}\n", self.generated));
        output.push_str(&format!(
            "   Completed:        {} ({:.1}%)\n",
            self.completed,
            self.completion_percentage()
        ));
        output.push_str(&format!("   Missed deadline:  {}\n", self.missed_deadline));
        output.push_str(&format!("   Balked:           {}\n", self.balked));
        output.push_str(&format!("   Reneged:          {}\n", self.reneged));
        output.push_str(&format!("   Still in system:  {}\n\n", self.in_system));

        output.push_str("Behaviour:\n");
        output.push_str(&format!("   Queue switches:        {}\n", self.jockeys));
        output.push_str(&format!("   Kiosk balk -> counter: {}\n", self.balk_jockeys));
        output.push_str(&format!("   Document loops:        {}\n", self.document_loops));
        output.push_str(&format!("   Secondary inspections: {}\n\n", self.secondary_inspections));

        output.push_str("Stages:\n");
        for stage in &self.stages {
            output.push_str(&format!(
                "   {:<9} services {:>6}  wait avg {:>6.2} max {:>7.2}  service avg {:>5.2}\n",
                stage.stage.to_string(),
                stage.services,
                stage.average_wait,
                stage.max_wait,
                stage.average_service
            ));
        }
        output.push('\n');

        output.push_str("Pools:\n");
        for pool in &self.pools {
            output.push_str(&format!(
                "   {:<24} x{:<3} served {:>6}  max queue {:>4}  utilization {:>5.1}%\n",
                pool.pool.to_string(),
                pool.capacity,
                pool.served,
                pool.max_queue_length,
                pool.utilization * 100.0
            ));
        }
        output.push('\n');

        output.push_str(&format!(
            "Average time in system: {:.1} minutes\n",
            self.average_time_in_system
        ));
        output.push_str(&format!("Throughput: {:.1} passengers/hour\n", self.throughput_per_hour));
        output
    }
}

impl fmt::Display for SimulationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

fn stage_index(stage: StageKind) -> usize {
    match stage {
        StageKind::CheckIn => 0,
        StageKind::Security => 1,
        StageKind::Boarding => 2,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passenger::PassengerAttributes;
    use crate::types::{PassengerId, QueueStrategy};

    fn passenger(id: u64, class: PassengerClass, outcome: Outcome, finished_at: Option<f64>) -> Passenger {
        let mut p = Passenger::new(
            PassengerId::new(id),
            class,
            QueueStrategy::ShortestQueue,
            PassengerAttributes::default(),
            10.0,
            200.0,
            20.0,
        );
        p.journey.outcome = outcome;
        p.journey.finished_at = finished_at;
        p
    }

    #[test]
    fn test_outcome_counts_are_conserved() {
        let passengers = vec![
            passenger(0, PassengerClass::Standard, Outcome::Completed, Some(70.0)),
            passenger(1, PassengerClass::Standard, Outcome::Reneged, Some(20.0)),
            passenger(2, PassengerClass::PriorityA, Outcome::Completed, Some(40.0)),
            passenger(3, PassengerClass::PriorityB, Outcome::InProgress, None),
            passenger(4, PassengerClass::Standard, Outcome::Balked, Some(10.0)),
        ];
        let stats = SimulationStatistics::collect(&passengers, 5, &PoolRegistry::new(), 120.0);

        assert_eq!(stats.generated, 5);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.in_system, 1);
        assert!(stats.is_conserved());
        assert_eq!(stats.average_time_in_system, 45.0);
        assert_eq!(stats.throughput_per_hour, 1.0);
        assert_eq!(stats.completion_percentage(), 40.0);
        assert_eq!(stats.abandonment_percentage(), 40.0);

        let standard = &stats.classes[PassengerClass::Standard.rank() as usize];
        assert_eq!(standard.generated, 3);
        assert_eq!(standard.reneged, 1);
    }

    #[test]
    fn test_empty_run() {
        let stats = SimulationStatistics::collect(Vec::<&Passenger>::new(), 0, &PoolRegistry::new(), 0.0);
        assert!(stats.is_conserved());
        assert_eq!(stats.throughput_per_hour, 0.0);
        assert_eq!(stats.stage(StageKind::Security).map(|s| s.services), Some(0));
        assert!(stats.summary().contains("Generated:        0"));
    }

    #[test]
    fn test_untracked_passenger_breaks_conservation() {
        let passengers = vec![
            passenger(0, PassengerClass::Standard, Outcome::Completed, Some(70.0)),
            passenger(1, PassengerClass::Standard, Outcome::InProgress, None),
        ];
        // Three identifiers were handed out but only two passengers are known
        let stats = SimulationStatistics::collect(&passengers, 3, &PoolRegistry::new(), 120.0);

        assert_eq!(stats.generated, 3);
        assert_eq!(stats.completed + stats.in_system, 2);
        assert!(!stats.is_conserved());
    }
}
