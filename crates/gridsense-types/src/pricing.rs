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

/// A single forecast block with its price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Start time of this block
    pub start: DateTime<Utc>,

    /// Duration of this block (60 for hourly forecasts)
    pub duration_minutes: u32,

    /// Energy price for this block (currency units per kWh)
    pub price_per_kwh: f64,
}

impl PricePoint {
    pub fn new(start: DateTime<Utc>, duration_minutes: u32, price_per_kwh: f64) -> Self {
        Self {
            start,
            duration_minutes,
            price_per_kwh,
        }
    }

    /// End of this block (exclusive)
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// Time-ordered electricity price forecast.
///
/// Serialized as a bare JSON array of [`PricePoint`]s so the `/prices`
/// response body is the forecast itself. Points are kept ordered by start
/// time, including after deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, ordering the points by start time
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.start);
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Start of the first block
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.start)
    }

    /// End of the last block
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(PricePoint::end)
    }

    /// True when every block starts exactly where the previous one ends
    pub fn is_contiguous(&self) -> bool {
        self.points.windows(2).all(|w| w[0].end() == w[1].start)
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "forecasts hold at most a few hundred blocks"
    )]
    pub fn average_price(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.points.iter().map(|p| p.price_per_kwh).sum();
        Some(sum / self.points.len() as f64)
    }

    pub fn cheapest(&self) -> Option<&PricePoint> {
        self.points
            .iter()
            .min_by(|a, b| a.price_per_kwh.total_cmp(&b.price_per_kwh))
    }

    pub fn most_expensive(&self) -> Option<&PricePoint> {
        self.points
            .iter()
            .max_by(|a, b| a.price_per_kwh.total_cmp(&b.price_per_kwh))
    }

    /// Keep only blocks starting before `until`
    pub fn truncate_before(&mut self, until: DateTime<Utc>) {
        self.points.retain(|p| p.start < until);
    }
}

impl From<Vec<PricePoint>> for PriceSeries {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}
