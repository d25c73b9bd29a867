//! Named scenario presets
//!
//! A scenario adjusts staffing, technology or demand on top of a loaded
//! configuration. The core engine is parameterised the same way whichever
//! preset is applied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::SimulationConfig;

/// Scenario presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Configuration as loaded
    Base,
    /// Fewer economy counters and regular security lanes
    StaffingLow,
    /// More economy counters and regular security lanes
    StaffingHigh,
    /// More kiosks, a higher kiosk share and faster scanners
    Technology,
    /// Half again as many arrivals
    HighDemand,
}

impl Scenario {
    /// Every preset
    pub const ALL: [Scenario; 5] = [
        Scenario::Base,
        Scenario::StaffingLow,
        Scenario::StaffingHigh,
        Scenario::Technology,
        Scenario::HighDemand,
    ];

    /// Apply the preset to `config`
    pub fn apply(self, config: &mut SimulationConfig) {
        match self {
            Scenario::Base => {}
            Scenario::StaffingLow => {
                config.check_in.economy_counters = 5;
                config.security.regular_lanes = 4;
            }
            Scenario::StaffingHigh => {
                config.check_in.economy_counters = 12;
                config.security.regular_lanes = 8;
            }
            Scenario::Technology => {
                config.check_in.kiosks = 10;
                config.check_in.kiosk_base_share = 0.7;
                config.security.scanning_service = config.security.scanning_service.scaled(0.5);
            }
            Scenario::HighDemand => {
                config.arrivals.rate_multiplier *= 1.5;
            }
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scenario::Base => "base",
            Scenario::StaffingLow => "staffing_low",
            Scenario::StaffingHigh => "staffing_high",
            Scenario::Technology => "technology",
            Scenario::HighDemand => "high_demand",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "base" => Ok(Scenario::Base),
            "staffing_low" => Ok(Scenario::StaffingLow),
            "staffing_high" => Ok(Scenario::StaffingHigh),
            "technology" => Ok(Scenario::Technology),
            "high_demand" => Ok(Scenario::HighDemand),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
