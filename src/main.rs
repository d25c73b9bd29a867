// Passenger Flow Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/passenger-flow-simulator --seed 42
// ```
//
// Or with a scenario and run logs:
//
// ```console
// $ ./target/release/passenger-flow-simulator --scenario staffing_low --output runs/low --verbose
// ```

use anyhow::Context;
use clap::Parser;
use passenger_flow_simulator::simulation::{
    JsonLinesSink, LoggingConfig, MetricsRecorder, MetricsSink, SimulationOrchestrator,
    SimulationStatistics,
};
use passenger_flow_simulator::types::config::CliArgs;
use passenger_flow_simulator::types::SimulationConfig;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::process;
use std::time::Instant;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Initialize logging based on CLI flags
    let logging = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else if args.json_logs {
        LoggingConfig::new().with_level(tracing::Level::INFO).with_json_format().init()
    } else {
        // Default: minimal logging for normal users
        LoggingConfig::new().with_level(tracing::Level::WARN).init()
    };

    let _guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Passenger Flow Simulator");

    let config = match SimulationConfig::from_cli_args(args.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    info!("Configuration loaded and validated successfully");

    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    let result = match &args.output {
        Some(dir) => run_to_directory(config, Path::new(dir)),
        None => run_in_memory(config),
    };

    match result {
        Ok(statistics) => {
            eprintln!("{}", statistics);
            info!("Passenger Flow Simulator completed successfully");
        }
        Err(e) => {
            error!("Simulation failed: {:#}", e);
            eprintln!("Simulation failed: {:#}", e);
            process::exit(1);
        }
    }
}

/// Run with all metrics kept in memory
fn run_in_memory(config: SimulationConfig) -> anyhow::Result<SimulationStatistics> {
    run(config, MetricsRecorder::new())
}

/// Run with JSON-lines logs and a summary written to `dir`
fn run_to_directory(config: SimulationConfig, dir: &Path) -> anyhow::Result<SimulationStatistics> {
    let sink = JsonLinesSink::create_in(dir)
        .with_context(|| format!("Failed to create run logs in {}", dir.display()))?;
    let statistics = run(config, sink)?;

    let summary_path = dir.join("summary.json");
    let file = File::create(&summary_path)
        .with_context(|| format!("Failed to create {}", summary_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &statistics)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    eprintln!("Run logs written to: {}", dir.display());
    Ok(statistics)
}

fn run<M: MetricsSink>(config: SimulationConfig, sink: M) -> anyhow::Result<SimulationStatistics> {
    let start_time = Instant::now();
    let mut orchestrator =
        SimulationOrchestrator::with_sink(config, sink).context("Failed to initialize simulation")?;
    let statistics = orchestrator.run().context("Simulation run failed")?;
    info!("Wall-clock runtime: {:.2} seconds", start_time.elapsed().as_secs_f64());
    Ok(statistics)
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Passenger Flow Simulator");
    eprintln!("========================");
    eprintln!("Discrete-event simulation of airport passenger processing");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Duration: {:.0} minutes", config.run.duration_minutes);
    eprintln!("  Arrival Multiplier: {:.2}", config.arrivals.rate_multiplier);
    eprintln!(
        "  Check-in: {} priority counters, {} economy counters, {} kiosks",
        config.check_in.priority_counters, config.check_in.economy_counters, config.check_in.kiosks
    );
    eprintln!(
        "  Security: {} priority lanes, {} regular lanes",
        config.security.priority_lanes, config.security.regular_lanes
    );
    eprintln!(
        "  Boarding: {} gates, {} seats per flight, a departure every {:.0} minutes",
        config.boarding.gate_count(),
        config.boarding.aircraft_capacity,
        config.boarding.flight_interval_minutes
    );
    eprintln!("  Kiosk Base Share: {:.1}%", config.check_in.kiosk_base_share * 100.0);
    if let Some(seed) = config.run.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}
