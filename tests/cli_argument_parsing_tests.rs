//! Tests for CLI argument parsing functionality
//!
//! These tests verify that command line arguments are parsed and applied on
//! top of configuration files and scenario presets in the documented order.

use passenger_flow_simulator::types::config::{CliArgs, ConfigError, SimulationConfig};
use clap::Parser;
use std::io::Write;

/// Test that no arguments leave everything unset
#[test]
fn test_defaults_without_arguments() {
    let args = CliArgs::try_parse_from(["test"]).unwrap();
    assert!(args.config.is_none());
    assert!(args.scenario.is_none());
    assert!(args.seed.is_none());
    assert!(!args.dry_run);

    let config = SimulationConfig::from_cli_args(args).unwrap();
    assert_eq!(config, SimulationConfig::default());
}

/// Test parsing of numeric overrides
#[test]
fn test_numeric_overrides() {
    let args = CliArgs::try_parse_from([
        "test",
        "--seed",
        "42",
        "--duration-minutes",
        "720",
        "--arrival-multiplier",
        "1.5",
        "--economy-counters",
        "3",
        "--kiosks",
        "9",
        "--regular-lanes",
        "2",
        "--monitor-interval",
        "10",
    ])
    .unwrap();

    let config = SimulationConfig::from_cli_args(args).unwrap();
    assert_eq!(config.run.seed, Some(42));
    assert_eq!(config.run.duration_minutes, 720.0);
    assert_eq!(config.run.monitor_interval_minutes, 10.0);
    assert_eq!(config.arrivals.rate_multiplier, 1.5);
    assert_eq!(config.check_in.economy_counters, 3);
    assert_eq!(config.check_in.kiosks, 9);
    assert_eq!(config.security.regular_lanes, 2);
    config.validate().unwrap();
}

/// Test that malformed values are rejected by the parser
#[test]
fn test_invalid_argument_values() {
    assert!(CliArgs::try_parse_from(["test", "--seed", "abc"]).is_err());
    assert!(CliArgs::try_parse_from(["test", "--kiosks", "-1"]).is_err());
    assert!(CliArgs::try_parse_from(["test", "--no-such-flag"]).is_err());
}

/// Test that a zero capacity parses but fails validation
#[test]
fn test_zero_capacity_fails_validation() {
    let args = CliArgs::try_parse_from(["test", "--economy-counters", "0"]).unwrap();
    let config = SimulationConfig::from_cli_args(args).unwrap();
    assert!(config.validate().is_err());
}

/// Test scenario selection and flag precedence over the scenario
#[test]
fn test_scenario_then_flags() {
    let args = CliArgs::try_parse_from(["test", "--scenario", "staffing-low"]).unwrap();
    let config = SimulationConfig::from_cli_args(args).unwrap();
    assert_eq!(config.check_in.economy_counters, 5);
    assert_eq!(config.security.regular_lanes, 4);

    let args =
        CliArgs::try_parse_from(["test", "--scenario", "staffing_low", "--regular-lanes", "6"]).unwrap();
    let config = SimulationConfig::from_cli_args(args).unwrap();
    assert_eq!(config.security.regular_lanes, 6);

    let args = CliArgs::try_parse_from(["test", "--scenario", "rush_hour"]).unwrap();
    assert!(matches!(SimulationConfig::from_cli_args(args), Err(ConfigError::UnknownScenario(_))));
}

/// Test that a partial configuration file merges with defaults
#[test]
fn test_partial_config_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{
            "run": {{ "seed": 3, "duration_minutes": 300.0 }},
            "check_in": {{ "kiosks": 2, "kiosk_service": {{ "family": "fixed", "minutes": 2.0 }} }}
        }}"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let args = CliArgs::try_parse_from(["test", "--config", &path, "--seed", "8"]).unwrap();
    let config = SimulationConfig::from_cli_args(args).unwrap();

    // Flags win over the file
    assert_eq!(config.run.seed, Some(8));
    assert_eq!(config.run.duration_minutes, 300.0);
    assert_eq!(config.check_in.kiosks, 2);
    assert_eq!(config.check_in.economy_counters, SimulationConfig::default().check_in.economy_counters);
    assert_eq!(config.security, SimulationConfig::default().security);
    config.validate().unwrap();
}

/// Test configuration file errors
#[test]
fn test_config_file_errors() {
    let missing = SimulationConfig::from_file("/definitely/not/here.json");
    assert!(matches!(missing, Err(ConfigError::FileNotFound(_))));

    let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(yaml, "run: {{}}").unwrap();
    assert!(matches!(SimulationConfig::from_file(yaml.path()), Err(ConfigError::UnsupportedFormat(_))));

    let mut broken = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    writeln!(broken, "{{ not json").unwrap();
    assert!(matches!(SimulationConfig::from_file(broken.path()), Err(ConfigError::JsonError(_))));
}

/// Test that the printed default configuration loads back unchanged
#[test]
fn test_printed_config_round_trips_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    SimulationConfig::default().save_to_file(&path).unwrap();

    let loaded = SimulationConfig::from_file(&path).unwrap();
    assert_eq!(loaded, SimulationConfig::default());
    assert!(SimulationConfig::default().print_json().unwrap().contains("\"check_in\""));
}
