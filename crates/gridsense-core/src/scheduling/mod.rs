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

mod cheapest_window;

pub use cheapest_window::CheapestWindowScheduler;

use chrono::{DateTime, Utc};
use gridsense_types::{EnergyTask, PriceSeries, ScheduleResult};

/// Chooses when a task should run given a price forecast.
///
/// The task never starts before `now`. Returns `None` when no window inside
/// the forecast lets the task finish before its deadline.
pub trait Scheduler: Send + Sync {
    fn schedule(
        &self,
        task: &EnergyTask,
        prices: &PriceSeries,
        now: DateTime<Utc>,
    ) -> Option<ScheduleResult>;

    fn name(&self) -> &str;
}
