//! Passenger Flow Simulator
//!
//! A discrete-event simulation of passengers moving through an airport
//! terminal, modelled as a network of capacity-constrained queues.
//!
//! # Overview
//!
//! Passengers arrive according to an hourly arrival profile, check in at a
//! counter or kiosk, pass a two-step security screening and board at a gate
//! before their flight departs. Along the way they may balk at a long queue,
//! renege after waiting too long, jockey to a faster alternative or loop back
//! after a document issue or secondary inspection.
//!
//! ## Key Features
//!
//! - **Event Scheduling**: Deterministic min-heap clock with insertion-order tie breaking
//! - **Resource Pools**: FIFO and priority disciplines with cancellation
//! - **Passenger Behaviour**: Balking, reneging, jockeying and balk-then-jockey
//! - **Feedback Loops**: Document issues and secondary inspection
//! - **Flight Deadlines**: Missed departures and full flights
//! - **Metrics**: In-memory or JSON-lines event, transition, journey and snapshot logs
//! - **Scenarios**: Staffing, technology and demand presets
//!
//! ## Quick Start
//!
//! ```rust
//! use passenger_flow_simulator::*;
//!
//! let mut config = SimulationConfig::default();
//! config.run.seed = Some(42);
//! config.run.duration_minutes = 240.0;
//!
//! let mut orchestrator = SimulationOrchestrator::new(config)?;
//! let statistics = orchestrator.run()?;
//! println!("{} of {} passengers boarded", statistics.completed, statistics.generated);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Core types, identifiers, and configuration
//! - [`events`]: Event kinds and the simulation clock
//! - [`facility`]: Resource pools and the stage layout
//! - [`passenger`]: Passengers, journeys and arrival generation
//! - [`stages`]: Routing, service times, boarding and event handling
//! - [`simulation`]: Orchestration, metrics, statistics and logging
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │  Facility   │    │  Passenger  │
//! │             │    │             │    │             │
//! │ Identifiers │◄───┤ Pools       │◄───┤ Journey     │
//! │ Enums       │    │ Layout      │    │ Behaviour   │
//! │ Config      │    │ Registry    │    │ Generator   │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                   ▲                   ▲
//!        │                   │                   │
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Events    │    │   Stages    │    │ Simulation  │
//! │             │    │             │    │             │
//! │ Clock       │◄───┤ Processor   │◄───┤ Orchestrator│
//! │ Event kinds │    │ Routing     │    │ Metrics     │
//! │             │    │ Boarding    │    │ Statistics  │
//! └─────────────┘    └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod events;
pub mod facility;
pub mod passenger;
pub mod simulation;
pub mod stages;
pub mod types;

// Core types and identifiers
pub use types::{
    ConfigValidationError,
    Outcome,
    // Identifiers
    PassengerId,
    // Enums
    PassengerClass,
    PoolId,
    QueueDiscipline,
    QueueStrategy,
    ServiceDistribution,
    // Configuration
    SimulationConfig,
    StageKind,
    TransitionKind,
};

// Events and scheduling
pub use events::{EventKind, Scheduled, SimulationClock};

// Facility types
pub use facility::{PoolRegistry, RequestOutcome, ResourcePool};

// Passenger types
pub use passenger::{Journey, Passenger, PassengerAttributes, PassengerGenerator, PassengerSpec};

// Stage processing
pub use stages::{FlightBoard, MissReason, RoutingPolicy, ServiceTimeModel, StageProcessor};

// Simulation types and functionality
pub use simulation::{
    JsonLinesSink, MetricsRecorder, MetricsSink, Scenario, SimulationError, SimulationOrchestrator,
    SimulationResult, SimulationStatistics, TimeManager,
};
