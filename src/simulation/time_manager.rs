//! Simulated time of day
//!
//! This module maps simulation minutes onto a clock face and applies the
//! time-dependent service effects: staff fatigue and peak-hour slowdowns.

use crate::types::{TimeModifierConfig, MINUTES_PER_DAY};
use chrono::{Duration, NaiveTime};

/// Time-of-day calculations and time-dependent service multipliers
#[derive(Debug, Clone, Default)]
pub struct TimeManager {
    modifiers: TimeModifierConfig,
}

impl TimeManager {
    /// Create a time manager with the given modifier settings
    pub fn new(modifiers: TimeModifierConfig) -> Self {
        Self { modifiers }
    }

    /// Minute of the current day, in `[0, 1440)`
    pub fn minute_of_day(&self, now: f64) -> f64 {
        now.rem_euclid(MINUTES_PER_DAY)
    }

    /// Zero-based simulated day
    pub fn day(&self, now: f64) -> u32 {
        (now / MINUTES_PER_DAY).floor().max(0.0) as u32
    }

    /// Whether staff have worked past the fatigue threshold
    pub fn is_fatigued(&self, now: f64) -> bool {
        now > self.modifiers.fatigue_threshold_minutes
    }

    /// Whether `now` falls in a peak window
    pub fn is_peak(&self, now: f64) -> bool {
        let minute = self.minute_of_day(now);
        self.modifiers.peak_windows.iter().any(|window| window.contains(minute))
    }

    /// Combined fatigue and peak multiplier for services starting at `now`
    pub fn service_multiplier(&self, now: f64) -> f64 {
        let mut multiplier = 1.0;
        if self.is_fatigued(now) {
            multiplier *= self.modifiers.fatigue_multiplier;
        }
        if self.is_peak(now) {
            multiplier *= self.modifiers.peak_multiplier;
        }
        multiplier
    }

    /// Wall-clock time of `now`, with the run starting at midnight
    pub fn clock_time(&self, now: f64) -> NaiveTime {
        let millis = (self.minute_of_day(now) * 60_000.0).round() as i64;
        NaiveTime::MIN + Duration::milliseconds(millis)
    }

    /// `now` formatted as `D+day HH:MM`
    pub fn format_clock(&self, now: f64) -> String {
        format!("D+{} {}", self.day(now), self.clock_time(now).format("%H:%M"))
    }
}
