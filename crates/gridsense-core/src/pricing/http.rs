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
use chrono::Duration as ChronoDuration;
use gridsense_types::{PricePoint, PriceSeries};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

/// Price feed backed by an upstream JSON endpoint.
///
/// The endpoint must answer `GET` with an array of price points:
/// `[{"start": "...Z", "duration_minutes": 60, "price_per_kwh": 0.21}, ...]`.
/// Only the first 24 hours of the returned forecast are kept.
#[derive(Debug, Clone)]
pub struct HttpPriceFeed {
    url: String,
    client: Client,
}

impl HttpPriceFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PriceFeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PriceFeedError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl PriceFeed for HttpPriceFeed {
    async fn read_prices(&self) -> Result<PriceSeries, PriceFeedError> {
        debug!("Fetching price forecast from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!("Price feed {} answered HTTP {}", self.url, status);
            return Err(PriceFeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let points: Vec<PricePoint> = serde_json::from_str(&body)?;
        let mut series = PriceSeries::new(points);

        let Some(first) = series.start() else {
            return Err(PriceFeedError::EmptyForecast);
        };
        series.truncate_before(first + ChronoDuration::hours(FORECAST_HOURS));

        info!(
            "Fetched {} price blocks starting {}",
            series.len(),
            first.format("%Y-%m-%d %H:%M")
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "http"
    }
}
