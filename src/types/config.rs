//! Configuration structures for the passenger flow simulator
//!
//! This module contains the simulation configuration, its JSON file form, the
//! command line arguments that override it, and the validation performed
//! before any run starts.

use super::{PassengerClass, QueueStrategy, StageKind};
use crate::simulation::Scenario;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Minutes in one simulated day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Default hourly arrival profile (passengers per hour, index = hour of day)
pub const DEFAULT_HOURLY_RATES: [f64; 24] = [
    30.0, 20.0, 10.0, 5.0, 10.0, 30.0, 120.0, 150.0, 140.0, 100.0, 80.0, 70.0, 90.0, 80.0, 70.0,
    90.0, 120.0, 140.0, 100.0, 80.0, 60.0, 50.0, 40.0, 30.0,
];

/// Command line arguments structure
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "passenger-flow-simulator",
    version = "0.1.0",
    about = "Passenger Flow Simulator - discrete-event simulation of airport passenger processing",
    long_about = "Simulates passengers moving through check-in, security and boarding as a network of capacity-constrained queues with balking, reneging, jockeying and feedback loops.

EXAMPLES:
    # Run one simulated day with default settings
    passenger-flow-simulator --seed 42

    # Use a configuration file and a named scenario
    passenger-flow-simulator --config airport.json --scenario staffing_low

    # Write event, journey and snapshot logs
    passenger-flow-simulator --seed 7 --output runs/base

    # Generate configuration template
    passenger-flow-simulator --print-config > my-config.json

    # Validate configuration without running
    passenger-flow-simulator --config my-config.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Scenario preset (--scenario flag)
    3. Configuration file (--config flag)
    4. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)

    Use --print-config to generate a template configuration file."
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. Sections may be partial; missing values use defaults. CLI arguments override file settings."
    )]
    pub config: Option<String>,

    /// Scenario preset applied on top of the configuration file
    #[arg(
        short,
        long,
        help = "Scenario preset (base, staffing_low, staffing_high, technology, high_demand)"
    )]
    pub scenario: Option<String>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Length of the simulated period in minutes
    #[arg(long, help = "Simulated duration in minutes (default: 1440)")]
    pub duration_minutes: Option<f64>,

    /// Interval between pool snapshots in minutes
    #[arg(long, help = "Monitoring snapshot interval in minutes (default: 5)")]
    pub monitor_interval: Option<f64>,

    /// Multiplier applied to the hourly arrival profile
    #[arg(long, help = "Arrival rate multiplier (default: 1.0)")]
    pub arrival_multiplier: Option<f64>,

    /// Number of economy check-in counters
    #[arg(long, help = "Number of economy check-in counters")]
    pub economy_counters: Option<usize>,

    /// Number of self-service kiosks
    #[arg(long, help = "Number of self-service kiosks")]
    pub kiosks: Option<usize>,

    /// Number of regular security lanes
    #[arg(long, help = "Number of regular security lanes")]
    pub regular_lanes: Option<usize>,

    /// Output directory for JSON-lines logs and the summary
    #[arg(
        short,
        long,
        help = "Output directory for run logs",
        long_help = "Directory receiving events.jsonl, transitions.jsonl, journeys.jsonl, snapshots.jsonl and summary.json. Created if missing."
    )]
    pub output: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Emit logs as JSON
    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Per-class numeric values (patience, lead times, proportions)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClassValues {
    /// Value for priority A passengers
    pub priority_a: f64,
    /// Value for priority B passengers
    pub priority_b: f64,
    /// Value for standard passengers
    pub standard: f64,
}

impl ClassValues {
    /// Create per-class values
    pub const fn new(priority_a: f64, priority_b: f64, standard: f64) -> Self {
        Self { priority_a, priority_b, standard }
    }

    /// Value for the given class
    pub fn get(&self, class: PassengerClass) -> f64 {
        match class {
            PassengerClass::PriorityA => self.priority_a,
            PassengerClass::PriorityB => self.priority_b,
            PassengerClass::Standard => self.standard,
        }
    }

    /// Sum across classes
    pub fn sum(&self) -> f64 {
        self.priority_a + self.priority_b + self.standard
    }
}

/// Service-time distribution family and parameters (minutes)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ServiceDistribution {
    /// Gamma parameterised by mean and standard deviation
    Gamma {
        /// Mean service time
        mean: f64,
        /// Standard deviation of the service time
        std_dev: f64,
    },
    /// Exponential parameterised by its mean
    Exponential {
        /// Mean service time
        mean: f64,
    },
    /// Uniform between two bounds
    Uniform {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// Constant duration, used to pin samples when calibrating a pool
    Fixed {
        /// Service time
        minutes: f64,
    },
}

impl ServiceDistribution {
    /// Mean of the distribution
    pub fn mean(&self) -> f64 {
        match *self {
            ServiceDistribution::Gamma { mean, .. } => mean,
            ServiceDistribution::Exponential { mean } => mean,
            ServiceDistribution::Uniform { min, max } => (min + max) / 2.0,
            ServiceDistribution::Fixed { minutes } => minutes,
        }
    }

    /// Same family with every duration multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        match *self {
            ServiceDistribution::Gamma { mean, std_dev } => {
                ServiceDistribution::Gamma { mean: mean * factor, std_dev: std_dev * factor }
            }
            ServiceDistribution::Exponential { mean } => {
                ServiceDistribution::Exponential { mean: mean * factor }
            }
            ServiceDistribution::Uniform { min, max } => {
                ServiceDistribution::Uniform { min: min * factor, max: max * factor }
            }
            ServiceDistribution::Fixed { minutes } => {
                ServiceDistribution::Fixed { minutes: minutes * factor }
            }
        }
    }

    /// Family name as written in configuration files
    pub fn family(&self) -> &'static str {
        match self {
            ServiceDistribution::Gamma { .. } => "gamma",
            ServiceDistribution::Exponential { .. } => "exponential",
            ServiceDistribution::Uniform { .. } => "uniform",
            ServiceDistribution::Fixed { .. } => "fixed",
        }
    }

    /// Whether the distribution may be used for pools of `stage`
    pub fn fits_stage(&self, stage: StageKind) -> bool {
        matches!(
            (stage, self),
            (_, ServiceDistribution::Fixed { .. })
                | (StageKind::CheckIn, ServiceDistribution::Gamma { .. })
                | (StageKind::Security, ServiceDistribution::Exponential { .. })
                | (StageKind::Boarding, ServiceDistribution::Uniform { .. })
        )
    }

    fn validate(&self, field: &str, stage: StageKind) -> Result<(), ConfigValidationError> {
        if !self.fits_stage(stage) {
            return Err(ConfigValidationError::DistributionMismatch {
                field: field.to_string(),
                family: self.family().to_string(),
                stage: stage.to_string(),
            });
        }
        match *self {
            ServiceDistribution::Gamma { mean, std_dev } => {
                validate_positive(field, mean)?;
                validate_positive(field, std_dev)
            }
            ServiceDistribution::Exponential { mean } => validate_positive(field, mean),
            ServiceDistribution::Uniform { min, max } => {
                if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
                    return Err(ConfigValidationError::InvalidRange {
                        field: field.to_string(),
                        min,
                        max,
                    });
                }
                Ok(())
            }
            ServiceDistribution::Fixed { minutes } => validate_positive(field, minutes),
        }
    }
}

/// Run-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Random seed for reproducible results
    pub seed: Option<u64>,
    /// Length of the simulated period in minutes
    pub duration_minutes: f64,
    /// Interval between pool snapshots in minutes
    pub monitor_interval_minutes: f64,
    /// Lower clamp applied to every sampled service time
    pub min_service_minutes: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            duration_minutes: MINUTES_PER_DAY,
            monitor_interval_minutes: 5.0,
            min_service_minutes: 0.1,
        }
    }
}

/// Passenger class mix and class-dependent behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassConfig {
    /// Share of each class among arrivals; must sum to 1
    pub proportions: ClassValues,
    /// Base patience in minutes
    pub patience_minutes: ClassValues,
    /// Mean time between arrival and departure in minutes
    pub lead_time_mean: ClassValues,
    /// Standard deviation of the lead time in minutes
    pub lead_time_std_dev: ClassValues,
    /// Shortest allowed lead time in minutes
    pub min_lead_minutes: f64,
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            proportions: ClassValues::new(0.05, 0.15, 0.80),
            patience_minutes: ClassValues::new(10.0, 15.0, 20.0),
            lead_time_mean: ClassValues::new(120.0, 90.0, 60.0),
            lead_time_std_dev: ClassValues::new(20.0, 25.0, 30.0),
            min_lead_minutes: 30.0,
        }
    }
}

/// Arrival process settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArrivalConfig {
    /// Passengers per hour for each hour of the day (24 entries)
    pub hourly_rates: Vec<f64>,
    /// Multiplier applied to every hourly rate
    pub rate_multiplier: f64,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self { hourly_rates: DEFAULT_HOURLY_RATES.to_vec(), rate_multiplier: 1.0 }
    }
}

impl ArrivalConfig {
    /// Effective arrival rate (passengers per minute) at `minute`
    pub fn rate_per_minute(&self, minute: f64) -> f64 {
        let hours = self.hourly_rates.len().max(1);
        let hour = ((minute.max(0.0) / 60.0).floor() as usize) % hours;
        self.hourly_rates.get(hour).copied().unwrap_or(0.0) * self.rate_multiplier / 60.0
    }
}

/// Share of passengers using each queue-selection strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StrategyWeights {
    /// Weight of the shortest-queue strategy
    pub shortest_queue: f64,
    /// Weight of the fastest-moving strategy
    pub fastest_moving: f64,
    /// Weight of the class-restricted strategy
    pub class_restricted: f64,
}

impl StrategyWeights {
    /// Weight of the given strategy
    pub fn get(&self, strategy: QueueStrategy) -> f64 {
        match strategy {
            QueueStrategy::ShortestQueue => self.shortest_queue,
            QueueStrategy::FastestMoving => self.fastest_moving,
            QueueStrategy::ClassRestricted => self.class_restricted,
        }
    }

    /// Sum of all weights
    pub fn sum(&self) -> f64 {
        self.shortest_queue + self.fastest_moving + self.class_restricted
    }
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Self {
            shortest_queue: 1.0 / 3.0,
            fastest_moving: 1.0 / 3.0,
            class_restricted: 1.0 / 3.0,
        }
    }
}

/// Passenger attribute sampling and the service-time effect of attributes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AttributeConfig {
    /// Relative weights of carrying 0, 1, 2, ... bags
    pub baggage_weights: Vec<f64>,
    /// Relative weights of group sizes 1, 2, 3, ...
    pub group_size_weights: Vec<f64>,
    /// Probability that a passenger is a frequent flyer
    pub frequent_flyer_probability: f64,
    /// Share of passengers per queue-selection strategy
    pub strategy_weights: StrategyWeights,
    /// Check-in service increase per bag, as a fraction of base time
    pub per_bag_increase: f64,
    /// Service increase per additional group member, as a fraction of base time
    pub per_companion_increase: f64,
    /// Service multiplier for frequent flyers
    pub frequent_flyer_multiplier: f64,
    /// Service multiplier for passengers close to departure
    pub time_pressure_multiplier: f64,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            baggage_weights: vec![0.3, 0.4, 0.2, 0.1],
            group_size_weights: vec![0.6, 0.25, 0.1, 0.03, 0.02],
            frequent_flyer_probability: 0.2,
            strategy_weights: StrategyWeights::default(),
            per_bag_increase: 0.2,
            per_companion_increase: 0.1,
            frequent_flyer_multiplier: 0.8,
            time_pressure_multiplier: 0.9,
        }
    }
}

/// Check-in stage settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CheckInConfig {
    /// Counters reserved for priority classes
    pub priority_counters: usize,
    /// Counters for standard passengers
    pub economy_counters: usize,
    /// Self-service kiosks
    pub kiosks: usize,
    /// Counter service time
    pub counter_service: ServiceDistribution,
    /// Kiosk service time
    pub kiosk_service: ServiceDistribution,
    /// Probability of balking at a counter
    pub counter_balk_probability: f64,
    /// Probability of balking at a kiosk
    pub kiosk_balk_probability: f64,
    /// Probability that a kiosk balker joins a counter instead of leaving
    pub balk_jockey_probability: f64,
    /// Base probability that a standard passenger chooses a kiosk
    pub kiosk_base_share: f64,
    /// Shift of the kiosk probability per passenger of queue length difference
    pub adaptive_adjustment: f64,
    /// Largest shift away from the base kiosk share
    pub max_adaptive_shift: f64,
}

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            priority_counters: 2,
            economy_counters: 8,
            kiosks: 6,
            counter_service: ServiceDistribution::Gamma { mean: 5.0, std_dev: 2.0 },
            kiosk_service: ServiceDistribution::Gamma { mean: 3.0, std_dev: 1.0 },
            counter_balk_probability: 0.0,
            kiosk_balk_probability: 0.1,
            balk_jockey_probability: 0.5,
            kiosk_base_share: 0.5,
            adaptive_adjustment: 0.1,
            max_adaptive_shift: 0.3,
        }
    }
}

/// Security stage settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Priority lanes (each lane has one document checker and one scanner)
    pub priority_lanes: usize,
    /// Regular lanes
    pub regular_lanes: usize,
    /// Document check service time
    pub document_check_service: ServiceDistribution,
    /// Scanning service time
    pub scanning_service: ServiceDistribution,
    /// Probability of balking at a security queue
    pub balk_probability: f64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            priority_lanes: 2,
            regular_lanes: 5,
            document_check_service: ServiceDistribution::Exponential { mean: 1.0 },
            scanning_service: ServiceDistribution::Exponential { mean: 2.0 },
            balk_probability: 0.0,
        }
    }
}

/// Boarding stage and flight settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoardingConfig {
    /// Seats per departing flight
    pub aircraft_capacity: usize,
    /// Aircraft at or below this size board through the small gate count
    pub small_aircraft_threshold: usize,
    /// Gates used for small aircraft
    pub gates_small: usize,
    /// Gates used for large aircraft
    pub gates_large: usize,
    /// Explicit gate count, overriding the aircraft-size rule
    pub gate_override: Option<usize>,
    /// Boarding service time per passenger
    pub service: ServiceDistribution,
    /// Minutes between consecutive departures
    pub flight_interval_minutes: f64,
}

impl Default for BoardingConfig {
    fn default() -> Self {
        Self {
            aircraft_capacity: 150,
            small_aircraft_threshold: 100,
            gates_small: 1,
            gates_large: 2,
            gate_override: None,
            service: ServiceDistribution::Uniform { min: 0.5, max: 1.0 },
            flight_interval_minutes: 60.0,
        }
    }
}

impl BoardingConfig {
    /// Number of boarding gates for the configured aircraft
    pub fn gate_count(&self) -> usize {
        self.gate_override.unwrap_or(if self.aircraft_capacity <= self.small_aircraft_threshold {
            self.gates_small
        } else {
            self.gates_large
        })
    }
}

/// Feedback edges of the network
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Probability that check-in finds a document problem
    pub document_issue_probability: f64,
    /// Minutes spent resolving a document problem before returning to check-in
    pub document_issue_delay_minutes: f64,
    /// Probability of secondary inspection after scanning
    pub secondary_inspection_probability: f64,
    /// Extra minutes spent in secondary inspection
    pub secondary_inspection_minutes: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            document_issue_probability: 0.05,
            document_issue_delay_minutes: 10.0,
            secondary_inspection_probability: 0.02,
            secondary_inspection_minutes: 5.0,
        }
    }
}

/// Time-of-day window, in minutes after midnight, inclusive at both ends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PeakWindow {
    /// First minute of the window
    pub start_minute: f64,
    /// Last minute of the window
    pub end_minute: f64,
}

impl PeakWindow {
    /// Create a window from whole hours
    pub fn from_hours(start_hour: u32, end_hour: u32) -> Self {
        Self { start_minute: start_hour as f64 * 60.0, end_minute: end_hour as f64 * 60.0 }
    }

    /// Whether the time of day falls inside the window
    pub fn contains(&self, minute_of_day: f64) -> bool {
        (self.start_minute..=self.end_minute).contains(&minute_of_day)
    }
}

/// Fatigue and peak-hour effects on service times
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeModifierConfig {
    /// Staff become fatigued after this many simulated minutes
    pub fatigue_threshold_minutes: f64,
    /// Service multiplier once fatigued
    pub fatigue_multiplier: f64,
    /// Service multiplier inside peak windows
    pub peak_multiplier: f64,
    /// Peak windows by time of day
    pub peak_windows: Vec<PeakWindow>,
}

impl Default for TimeModifierConfig {
    fn default() -> Self {
        Self {
            fatigue_threshold_minutes: 360.0,
            fatigue_multiplier: 1.1,
            peak_multiplier: 1.2,
            peak_windows: vec![PeakWindow::from_hours(6, 9), PeakWindow::from_hours(16, 19)],
        }
    }
}

/// Abandonment and queue-switching behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Relative projected-wait improvement needed to switch queues
    pub jockey_threshold: f64,
    /// Minutes between renege checks while waiting
    pub renege_check_interval_minutes: f64,
    /// Passengers closer than this to departure are under time pressure
    pub time_pressure_threshold_minutes: f64,
    /// Fractional patience reduction under time pressure
    pub time_pressure_reduction: f64,
    /// A pool that granted service this recently shows visible progress
    pub visible_progress_threshold_minutes: f64,
    /// Fractional patience increase when progress is visible
    pub visible_progress_increase: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            jockey_threshold: 0.2,
            renege_check_interval_minutes: 2.0,
            time_pressure_threshold_minutes: 30.0,
            time_pressure_reduction: 0.5,
            visible_progress_threshold_minutes: 5.0,
            visible_progress_increase: 0.2,
        }
    }
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Run-level settings
    pub run: Option<RunConfig>,
    /// Class mix and class behaviour
    pub classes: Option<ClassConfig>,
    /// Arrival process
    pub arrivals: Option<ArrivalConfig>,
    /// Attribute sampling
    pub attributes: Option<AttributeConfig>,
    /// Check-in stage
    pub check_in: Option<CheckInConfig>,
    /// Security stage
    pub security: Option<SecurityConfig>,
    /// Boarding stage
    pub boarding: Option<BoardingConfig>,
    /// Feedback edges
    pub feedback: Option<FeedbackConfig>,
    /// Fatigue and peak effects
    pub time_modifiers: Option<TimeModifierConfig>,
    /// Abandonment behaviour
    pub behavior: Option<BehaviorConfig>,
}

/// Configuration for the passenger flow simulation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    /// Run-level settings
    pub run: RunConfig,
    /// Class mix and class behaviour
    pub classes: ClassConfig,
    /// Arrival process
    pub arrivals: ArrivalConfig,
    /// Attribute sampling
    pub attributes: AttributeConfig,
    /// Check-in stage
    pub check_in: CheckInConfig,
    /// Security stage
    pub security: SecurityConfig,
    /// Boarding stage
    pub boarding: BoardingConfig,
    /// Feedback edges
    pub feedback: FeedbackConfig,
    /// Fatigue and peak effects
    pub time_modifiers: TimeModifierConfig,
    /// Abandonment behaviour
    pub behavior: BehaviorConfig,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),

    /// Unknown scenario name
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    /// Probability value is out of range
    #[error("Invalid probability for {field}: {value} (must be between 0.0 and 1.0)")]
    InvalidPercentage {
        /// Name of the field
        field: String,
        /// The invalid value
        value: f64,
    },

    /// Pool capacity is zero
    #[error("Capacity for {field} must be at least 1, got {value}")]
    InvalidCapacity {
        /// Name of the field
        field: String,
        /// The invalid capacity
        value: usize,
    },

    /// Duration or rate is not a positive finite number
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive {
        /// Name of the field
        field: String,
        /// The invalid value
        value: f64,
    },

    /// Proportions or weights do not sum to 1
    #[error("{field} must sum to 1.0, got {sum}")]
    InvalidSum {
        /// Name of the field
        field: String,
        /// The actual sum
        sum: f64,
    },

    /// Range bounds are inverted or negative
    #[error("Invalid range for {field}: min ({min}) must be <= max ({max})")]
    InvalidRange {
        /// Name of the field
        field: String,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Service distribution family does not belong to the stage
    #[error("{field} uses the {family} family, which is not valid for the {stage} stage")]
    DistributionMismatch {
        /// Name of the field
        field: String,
        /// Configured family
        family: String,
        /// Stage of the pool
        stage: String,
    },

    /// Hourly arrival profile is malformed
    #[error("Arrival profile must have 24 non-negative hourly rates, got {0} entries")]
    InvalidArrivalProfile(usize),

    /// Weight list is empty or negative
    #[error("{field} must contain non-negative weights with a positive total")]
    InvalidWeights {
        /// Name of the field
        field: String,
    },
}

impl SimulationConfig {
    /// Create a new configuration from command line arguments and optional config file
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::from_cli_args(args)
    }

    /// Create configuration from parsed CLI arguments
    ///
    /// Precedence, lowest first: defaults, configuration file, scenario
    /// preset, individual flags.
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        if let Some(name) = &args.scenario {
            let scenario: Scenario =
                name.parse().map_err(|_| ConfigError::UnknownScenario(name.clone()))?;
            scenario.apply(&mut config);
        }

        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            run: config_file.run.unwrap_or(defaults.run),
            classes: config_file.classes.unwrap_or(defaults.classes),
            arrivals: config_file.arrivals.unwrap_or(defaults.arrivals),
            attributes: config_file.attributes.unwrap_or(defaults.attributes),
            check_in: config_file.check_in.unwrap_or(defaults.check_in),
            security: config_file.security.unwrap_or(defaults.security),
            boarding: config_file.boarding.unwrap_or(defaults.boarding),
            feedback: config_file.feedback.unwrap_or(defaults.feedback),
            time_modifiers: config_file.time_modifiers.unwrap_or(defaults.time_modifiers),
            behavior: config_file.behavior.unwrap_or(defaults.behavior),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.seed {
            config.run.seed = Some(value);
        }
        if let Some(value) = args.duration_minutes {
            config.run.duration_minutes = value;
        }
        if let Some(value) = args.monitor_interval {
            config.run.monitor_interval_minutes = value;
        }
        if let Some(value) = args.arrival_multiplier {
            config.arrivals.rate_multiplier = value;
        }
        if let Some(value) = args.economy_counters {
            config.check_in.economy_counters = value;
        }
        if let Some(value) = args.kiosks {
            config.check_in.kiosks = value;
        }
        if let Some(value) = args.regular_lanes {
            config.security.regular_lanes = value;
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_positive("run.duration_minutes", self.run.duration_minutes)?;
        validate_positive("run.monitor_interval_minutes", self.run.monitor_interval_minutes)?;
        validate_positive("run.min_service_minutes", self.run.min_service_minutes)?;

        self.validate_classes()?;
        self.validate_arrivals()?;
        self.validate_attributes()?;

        let check_in = &self.check_in;
        validate_capacity("check_in.priority_counters", check_in.priority_counters)?;
        validate_capacity("check_in.economy_counters", check_in.economy_counters)?;
        validate_capacity("check_in.kiosks", check_in.kiosks)?;
        check_in.counter_service.validate("check_in.counter_service", StageKind::CheckIn)?;
        check_in.kiosk_service.validate("check_in.kiosk_service", StageKind::CheckIn)?;
        validate_percentage("check_in.counter_balk_probability", check_in.counter_balk_probability)?;
        validate_percentage("check_in.kiosk_balk_probability", check_in.kiosk_balk_probability)?;
        validate_percentage("check_in.balk_jockey_probability", check_in.balk_jockey_probability)?;
        validate_percentage("check_in.kiosk_base_share", check_in.kiosk_base_share)?;
        validate_percentage("check_in.adaptive_adjustment", check_in.adaptive_adjustment)?;
        validate_percentage("check_in.max_adaptive_shift", check_in.max_adaptive_shift)?;

        let security = &self.security;
        validate_capacity("security.priority_lanes", security.priority_lanes)?;
        validate_capacity("security.regular_lanes", security.regular_lanes)?;
        security
            .document_check_service
            .validate("security.document_check_service", StageKind::Security)?;
        security.scanning_service.validate("security.scanning_service", StageKind::Security)?;
        validate_percentage("security.balk_probability", security.balk_probability)?;

        let boarding = &self.boarding;
        validate_capacity("boarding.aircraft_capacity", boarding.aircraft_capacity)?;
        validate_capacity("boarding.gate_count", boarding.gate_count())?;
        boarding.service.validate("boarding.service", StageKind::Boarding)?;
        validate_positive("boarding.flight_interval_minutes", boarding.flight_interval_minutes)?;

        let feedback = &self.feedback;
        validate_percentage(
            "feedback.document_issue_probability",
            feedback.document_issue_probability,
        )?;
        validate_non_negative(
            "feedback.document_issue_delay_minutes",
            feedback.document_issue_delay_minutes,
        )?;
        validate_percentage(
            "feedback.secondary_inspection_probability",
            feedback.secondary_inspection_probability,
        )?;
        validate_non_negative(
            "feedback.secondary_inspection_minutes",
            feedback.secondary_inspection_minutes,
        )?;

        let modifiers = &self.time_modifiers;
        validate_non_negative(
            "time_modifiers.fatigue_threshold_minutes",
            modifiers.fatigue_threshold_minutes,
        )?;
        validate_positive("time_modifiers.fatigue_multiplier", modifiers.fatigue_multiplier)?;
        validate_positive("time_modifiers.peak_multiplier", modifiers.peak_multiplier)?;
        for window in &modifiers.peak_windows {
            if !(window.start_minute < window.end_minute)
                || window.start_minute < 0.0
                || window.end_minute > MINUTES_PER_DAY
            {
                return Err(ConfigValidationError::InvalidRange {
                    field: "time_modifiers.peak_windows".to_string(),
                    min: window.start_minute,
                    max: window.end_minute,
                });
            }
        }

        let behavior = &self.behavior;
        validate_percentage("behavior.jockey_threshold", behavior.jockey_threshold)?;
        validate_positive(
            "behavior.renege_check_interval_minutes",
            behavior.renege_check_interval_minutes,
        )?;
        validate_non_negative(
            "behavior.time_pressure_threshold_minutes",
            behavior.time_pressure_threshold_minutes,
        )?;
        validate_percentage("behavior.time_pressure_reduction", behavior.time_pressure_reduction)?;
        validate_non_negative(
            "behavior.visible_progress_threshold_minutes",
            behavior.visible_progress_threshold_minutes,
        )?;
        validate_non_negative(
            "behavior.visible_progress_increase",
            behavior.visible_progress_increase,
        )?;

        Ok(())
    }

    fn validate_classes(&self) -> Result<(), ConfigValidationError> {
        let classes = &self.classes;
        for class in PassengerClass::ALL {
            validate_percentage("classes.proportions", classes.proportions.get(class))?;
            validate_positive("classes.patience_minutes", classes.patience_minutes.get(class))?;
            validate_non_negative("classes.lead_time_mean", classes.lead_time_mean.get(class))?;
            validate_non_negative(
                "classes.lead_time_std_dev",
                classes.lead_time_std_dev.get(class),
            )?;
        }
        validate_sum("classes.proportions", classes.proportions.sum())?;
        validate_non_negative("classes.min_lead_minutes", classes.min_lead_minutes)
    }

    fn validate_arrivals(&self) -> Result<(), ConfigValidationError> {
        let arrivals = &self.arrivals;
        if arrivals.hourly_rates.len() != 24
            || arrivals.hourly_rates.iter().any(|rate| !rate.is_finite() || *rate < 0.0)
        {
            return Err(ConfigValidationError::InvalidArrivalProfile(arrivals.hourly_rates.len()));
        }
        validate_non_negative("arrivals.rate_multiplier", arrivals.rate_multiplier)
    }

    fn validate_attributes(&self) -> Result<(), ConfigValidationError> {
        let attributes = &self.attributes;
        validate_weights("attributes.baggage_weights", &attributes.baggage_weights)?;
        validate_weights("attributes.group_size_weights", &attributes.group_size_weights)?;
        validate_percentage(
            "attributes.frequent_flyer_probability",
            attributes.frequent_flyer_probability,
        )?;
        for strategy in QueueStrategy::ALL {
            validate_percentage("attributes.strategy_weights", attributes.strategy_weights.get(strategy))?;
        }
        validate_sum("attributes.strategy_weights", attributes.strategy_weights.sum())?;
        validate_non_negative("attributes.per_bag_increase", attributes.per_bag_increase)?;
        validate_non_negative("attributes.per_companion_increase", attributes.per_companion_increase)?;
        validate_positive(
            "attributes.frequent_flyer_multiplier",
            attributes.frequent_flyer_multiplier,
        )?;
        validate_positive(
            "attributes.time_pressure_multiplier",
            attributes.time_pressure_multiplier,
        )
    }
}

/// Helper to validate probability values
fn validate_percentage(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigValidationError::InvalidPercentage { field: field.to_string(), value });
    }
    Ok(())
}

fn validate_capacity(field: &str, value: usize) -> Result<(), ConfigValidationError> {
    if value == 0 {
        return Err(ConfigValidationError::InvalidCapacity { field: field.to_string(), value });
    }
    Ok(())
}

fn validate_positive(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigValidationError::NonPositive { field: field.to_string(), value });
    }
    Ok(())
}

fn validate_non_negative(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigValidationError::NonPositive { field: field.to_string(), value });
    }
    Ok(())
}

fn validate_sum(field: &str, sum: f64) -> Result<(), ConfigValidationError> {
    if (sum - 1.0).abs() > 0.01 {
        return Err(ConfigValidationError::InvalidSum { field: field.to_string(), sum });
    }
    Ok(())
}

fn validate_weights(field: &str, weights: &[f64]) -> Result<(), ConfigValidationError> {
    let valid = !weights.is_empty()
        && weights.iter().all(|w| w.is_finite() && *w >= 0.0)
        && weights.iter().sum::<f64>() > 0.0;
    if !valid {
        return Err(ConfigValidationError::InvalidWeights { field: field.to_string() });
    }
    Ok(())
}
