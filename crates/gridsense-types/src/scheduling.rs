// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridSense.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A schedulable unit of energy consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyTask {
    /// Human-readable label (e.g. "dishwasher")
    #[serde(default)]
    pub name: String,

    /// Power draw while running (kW)
    pub power_kw: f64,

    /// How long the task runs (hours, fractional allowed)
    pub duration_hours: f64,

    /// The task must have finished by this time
    pub deadline: DateTime<Utc>,
}

/// Largest accepted power draw (kW)
pub const MAX_POWER_KW: f64 = 10_000.0;

/// Longest accepted run (hours)
pub const MAX_DURATION_HOURS: f64 = 8_760.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    #[error("power_kw must be a positive number, got {0}")]
    InvalidPower(f64),

    #[error("power_kw must not exceed 10000 kW, got {0}")]
    PowerTooHigh(f64),

    #[error("duration_hours must be a positive number, got {0}")]
    InvalidDuration(f64),

    #[error("duration_hours must be at least one second, got {0}")]
    DurationTooShort(f64),

    #[error("duration_hours must not exceed 8760 hours, got {0}")]
    DurationTooLong(f64),
}

impl EnergyTask {
    /// Total energy consumed by one run (kWh)
    pub fn energy_kwh(&self) -> f64 {
        self.power_kw * self.duration_hours
    }

    /// Run length rounded to whole seconds, `None` if it cannot be represented
    #[expect(
        clippy::cast_possible_truncation,
        reason = "float to int casts saturate and try_seconds rejects the extremes"
    )]
    pub fn duration(&self) -> Option<Duration> {
        if !self.duration_hours.is_finite() {
            return None;
        }
        Duration::try_seconds((self.duration_hours * 3600.0).round() as i64)
    }

    pub fn validate(&self) -> Result<(), TaskError> {
        if !self.power_kw.is_finite() || self.power_kw <= 0.0 {
            return Err(TaskError::InvalidPower(self.power_kw));
        }
        if self.power_kw > MAX_POWER_KW {
            return Err(TaskError::PowerTooHigh(self.power_kw));
        }
        if !self.duration_hours.is_finite() || self.duration_hours <= 0.0 {
            return Err(TaskError::InvalidDuration(self.duration_hours));
        }
        if self.duration_hours > MAX_DURATION_HOURS {
            return Err(TaskError::DurationTooLong(self.duration_hours));
        }
        if self.duration().is_none_or(|d| d < Duration::seconds(1)) {
            return Err(TaskError::DurationTooShort(self.duration_hours));
        }
        Ok(())
    }
}

/// Request body for POST /schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub task: EnergyTask,
}

/// Optimal placement of a task within a price forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub task_name: String,

    /// Optimal start time
    pub start_time: DateTime<Utc>,

    pub end_time: DateTime<Utc>,

    pub deadline: DateTime<Utc>,

    pub energy_kwh: f64,

    /// Cost of running at the optimal start
    pub estimated_cost: f64,

    pub average_price_per_kwh: f64,

    /// Cost of running from the earliest possible start instead
    pub cost_if_started_now: f64,

    /// `cost_if_started_now - estimated_cost`
    pub savings: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn task(power_kw: f64, duration_hours: f64) -> EnergyTask {
        EnergyTask {
            name: "dishwasher".to_owned(),
            power_kw,
            duration_hours,
            deadline: Utc.with_ymd_and_hms(2025, 10, 2, 18, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_energy_and_duration() {
        let t = task(2.0, 1.5);

        assert!((t.energy_kwh() - 3.0).abs() < 1e-9);
        assert_eq!(t.duration(), Some(Duration::minutes(90)));
    }

    #[test]
    fn test_duration_out_of_range_is_none() {
        assert_eq!(task(1.0, 1e300).duration(), None);
        assert_eq!(task(1.0, f64::INFINITY).duration(), None);
        assert_eq!(task(1.0, 1e-9).duration(), Some(Duration::zero()));
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        assert!(task(2.0, 1.0).validate().is_ok());
        assert_eq!(task(0.0, 1.0).validate(), Err(TaskError::InvalidPower(0.0)));
        assert_eq!(
            task(1.0, -2.0).validate(),
            Err(TaskError::InvalidDuration(-2.0))
        );
        assert!(matches!(
            task(f64::NAN, 1.0).validate(),
            Err(TaskError::InvalidPower(_))
        ));
    }

    #[test]
    fn test_validate_rejects_extreme_durations() {
        assert_eq!(
            task(1.0, 1e10).validate(),
            Err(TaskError::DurationTooLong(1e10))
        );
        assert_eq!(
            task(1.0, 1e300).validate(),
            Err(TaskError::DurationTooLong(1e300))
        );
        // Rounds to zero seconds
        assert_eq!(
            task(1.0, 0.0001).validate(),
            Err(TaskError::DurationTooShort(0.0001))
        );
        assert!(task(1.0, MAX_DURATION_HOURS).validate().is_ok());
        assert!(task(1.0, 1.0 / 3600.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_huge_power() {
        assert_eq!(
            task(1e308, 2.0).validate(),
            Err(TaskError::PowerTooHigh(1e308))
        );
        assert!(task(MAX_POWER_KW, 2.0).validate().is_ok());
    }

    #[test]
    fn test_request_deserializes_without_name() {
        let request: ScheduleRequest = serde_json::from_value(json!({
            "task": {
                "power_kw": 7.4,
                "duration_hours": 3,
                "deadline": "2025-10-03T07:00:00Z"
            }
        }))
        .unwrap();

        assert_eq!(request.task.name, "");
        assert!((request.task.power_kw - 7.4).abs() < 1e-9);
        assert_eq!(
            request.task.deadline,
            Utc.with_ymd_and_hms(2025, 10, 3, 7, 0, 0).unwrap()
        );
    }
}
