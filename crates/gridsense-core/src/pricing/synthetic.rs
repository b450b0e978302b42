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

use super::{FORECAST_HOURS, PriceFeed, PriceFeedError};
use async_trait::async_trait;
use chrono::{DateTime, Duration, DurationRound, Timelike, Utc};
use gridsense_types::{PricePoint, PriceSeries};
use tracing::debug;

/// Deterministic day-ahead forecast used when no upstream feed is configured.
///
/// Pattern (relative to the base price):
/// - 00:00-06:00: 0.60x (cheap overnight)
/// - 06:00-12:00: 1.40x (morning elevated)
/// - 12:00-14:00: 1.12x (noon dip - solar surplus)
/// - 14:00-17:00: 1.28x (afternoon)
/// - 17:00-20:00: 1.80x (evening peak)
/// - 20:00-24:00: 1.00x (late evening decline)
#[derive(Debug, Clone)]
pub struct SyntheticPriceFeed {
    base_price_per_kwh: f64,
}

impl SyntheticPriceFeed {
    pub fn new(base_price_per_kwh: f64) -> Self {
        Self { base_price_per_kwh }
    }

    /// Hourly forecast for the 24 hours starting at the hour containing `start`
    pub fn forecast_from(&self, start: DateTime<Utc>) -> PriceSeries {
        let first_block = start.duration_trunc(Duration::hours(1)).unwrap_or(start);

        (0..FORECAST_HOURS)
            .map(|i| {
                let block_start = first_block + Duration::hours(i);
                let price = round_price(self.base_price_per_kwh * hour_factor(block_start.hour()));
                PricePoint::new(block_start, 60, price)
            })
            .collect::<Vec<_>>()
            .into()
    }
}

fn hour_factor(hour: u32) -> f64 {
    match hour {
        0..=5 => 0.60,   // Cheap overnight
        6..=11 => 1.40,  // Morning elevated
        12..=13 => 1.12, // Noon dip
        14..=16 => 1.28, // Afternoon
        17..=19 => 1.80, // Evening peak
        _ => 1.00,       // Late evening decline
    }
}

fn round_price(price: f64) -> f64 {
    (price * 10_000.0).round() / 10_000.0
}

#[async_trait]
impl PriceFeed for SyntheticPriceFeed {
    async fn read_prices(&self) -> Result<PriceSeries, PriceFeedError> {
        let series = self.forecast_from(Utc::now());
        debug!(
            "Generated synthetic forecast: {} blocks from {:?}",
            series.len(),
            series.start()
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
