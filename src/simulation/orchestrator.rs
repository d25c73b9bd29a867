//! Main simulation orchestrator
//!
//! This module contains the SimulationOrchestrator, which owns the clock,
//! the simulation state and the stage processor of one run, and drives the
//! run from setup to the final journey records.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, instrument};

use crate::events::EventKind;
use crate::facility::PoolRegistry;
use crate::passenger::{Passenger, PassengerSpec};
use crate::perf_span;
use crate::simulation::metrics::{JourneyRecord, MetricsRecorder, MetricsSink};
use crate::simulation::{SimulationError, SimulationResult, SimulationState, SimulationStatistics};
use crate::stages::{EventClock, FlightBoard, StageProcessor};
use crate::types::{PassengerId, SimulationConfig};

/// Coordinates the clock, state and processor of one run
#[derive(Debug)]
pub struct SimulationOrchestrator<M: MetricsSink = MetricsRecorder> {
    config: SimulationConfig,
    clock: EventClock,
    state: SimulationState<M>,
    processor: StageProcessor,
    events_processed: usize,
    finished: bool,
}

impl SimulationOrchestrator<MetricsRecorder> {
    /// Create an orchestrator that keeps all metrics in memory
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        Self::with_sink(config, MetricsRecorder::new())
    }
}

impl<M: MetricsSink> SimulationOrchestrator<M> {
    /// Create an orchestrator reporting to `sink`
    ///
    /// Validates the configuration, builds the pools and seeds the random
    /// generator. The first arrival and the first monitoring tick are
    /// scheduled before returning.
    #[instrument(skip(config, sink), fields(seed = ?config.run.seed, duration = config.run.duration_minutes))]
    pub fn with_sink(config: SimulationConfig, sink: M) -> SimulationResult<Self> {
        config.validate()?;
        info!("Initializing passenger flow simulation for {} minutes", config.run.duration_minutes);

        let mut rng = if let Some(seed) = config.run.seed {
            info!("Using deterministic seed: {}", seed);
            StdRng::seed_from_u64(seed)
        } else {
            debug!("Using entropy-based random seed");
            StdRng::from_entropy()
        };

        let pools = PoolRegistry::from_config(&config)?;
        let processor = StageProcessor::new(&config)?;
        let mut clock = EventClock::new();
        clock.schedule(0.0, EventKind::MonitorTick)?;
        if let Some(first) = processor.generator().next_arrival(0.0, &mut rng) {
            if first < config.run.duration_minutes {
                clock.schedule(first, EventKind::Generate)?;
            }
        }

        for pool in pools.pools() {
            debug!("Pool {} with {} servers ({:?})", pool.id(), pool.capacity(), pool.discipline());
        }

        let state = SimulationState::new(rng, pools, FlightBoard::new(&config.boarding), sink);
        Ok(Self { config, clock, state, processor, events_processed: 0, finished: false })
    }

    /// Place a scripted passenger into the run
    ///
    /// The arrival must not lie in the past of the clock.
    pub fn inject_passenger(&mut self, spec: PassengerSpec) -> SimulationResult<PassengerId> {
        let id = self.state.ids.allocate();
        let passenger = self.processor.generator().from_spec(id, &spec);
        self.clock.schedule(spec.arrival_time, EventKind::Arrival { passenger: id })?;
        self.state.insert(passenger)?;
        debug!("Injected {} arriving at {:.2}", id, spec.arrival_time);
        Ok(id)
    }

    /// Process every event before `until`
    pub fn run_until(&mut self, until: f64) -> SimulationResult<usize> {
        if self.finished {
            return Err(SimulationError::invariant_violation("run already finished"));
        }
        let Self { clock, state, processor, .. } = self;
        let delivered = clock.run_until(until, |clock, scheduled| processor.dispatch(state, clock, scheduled))?;
        self.events_processed += delivered;
        Ok(delivered)
    }

    /// Run for the configured duration and finish
    #[instrument(skip(self))]
    pub fn run(&mut self) -> SimulationResult<SimulationStatistics> {
        let span = perf_span!("simulation_run", duration = self.config.run.duration_minutes);
        let _enter = span.enter();

        let delivered = self.run_until(self.config.run.duration_minutes)?;
        info!("Processed {} events", delivered);
        self.finish()?;

        let statistics = self.statistics();
        info!(
            "Run complete at {}: {} generated, {} completed, {} missed, {} balked, {} reneged, {} in system",
            statistics.clock_at_end,
            statistics.generated,
            statistics.completed,
            statistics.missed_deadline,
            statistics.balked,
            statistics.reneged,
            statistics.in_system
        );
        Ok(statistics)
    }

    /// Close the run
    ///
    /// Emits journey records for passengers still in the terminal, flushes
    /// the sink and verifies the pool invariants. Calling it again is a no-op.
    pub fn finish(&mut self) -> SimulationResult<()> {
        if self.finished {
            return Ok(());
        }
        let open: Vec<JourneyRecord> = self.state.in_system().map(JourneyRecord::from).collect();
        for record in &open {
            self.state.sink.record_journey(record)?;
        }
        self.state.sink.flush()?;
        self.state.pools.check_invariants()?;
        self.finished = true;
        Ok(())
    }

    /// Statistics of the run so far
    pub fn statistics(&self) -> SimulationStatistics {
        let duration = self.config.run.duration_minutes;
        let elapsed = if self.finished { duration } else { self.clock.now().min(duration) };
        let mut statistics = SimulationStatistics::collect(
            self.state.passengers.values(),
            self.state.ids.allocated() as usize,
            &self.state.pools,
            elapsed,
        );
        statistics.clock_at_end = self.processor.time_manager().format_clock(elapsed);
        statistics.events_processed = self.events_processed;
        statistics
    }

    /// Current logical time
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Events still pending on the clock
    pub fn pending_events(&self) -> usize {
        self.clock.pending()
    }

    /// Configuration of the run
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulation state
    pub fn state(&self) -> &SimulationState<M> {
        &self.state
    }

    /// Look up a passenger
    pub fn passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.state.passengers.get(&id)
    }

    /// Resource pools
    pub fn pools(&self) -> &PoolRegistry {
        &self.state.pools
    }

    /// Metrics sink
    pub fn sink(&self) -> &M {
        &self.state.sink
    }

    /// Consume the orchestrator and return its sink
    pub fn into_sink(self) -> M {
        self.state.sink
    }
}
