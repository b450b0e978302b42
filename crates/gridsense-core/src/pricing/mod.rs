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

mod http;
mod synthetic;

pub use http::HttpPriceFeed;
pub use synthetic::SyntheticPriceFeed;

use async_trait::async_trait;
use gridsense_types::{PriceFeedSettings, PriceSeries, PriceSource};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Forecast horizon served by every feed
pub const FORECAST_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum PriceFeedError {
    #[error("price feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("price feed returned HTTP {status}")]
    Status { status: u16 },

    #[error("price feed returned malformed data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("price feed returned an empty forecast")]
    EmptyForecast,

    #[error("price feed configuration error: {0}")]
    Config(String),
}

/// Source of the 24-hour electricity price forecast.
///
/// Implementations are called once per request; nothing is cached between
/// calls.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn read_prices(&self) -> Result<PriceSeries, PriceFeedError>;

    fn name(&self) -> &str;
}

/// Build the price feed selected in the `[prices]` configuration table
pub fn price_feed_from_config(
    settings: &PriceFeedSettings,
) -> Result<Arc<dyn PriceFeed>, PriceFeedError> {
    match settings.source {
        PriceSource::Synthetic => {
            info!(
                "Using synthetic price feed (base {:.4}/kWh)",
                settings.base_price_per_kwh
            );
            Ok(Arc::new(SyntheticPriceFeed::new(
                settings.base_price_per_kwh,
            )))
        }
        PriceSource::Http => {
            let url = settings.url.as_deref().ok_or_else(|| {
                PriceFeedError::Config("prices.url is required for the http source".to_owned())
            })?;
            info!("Using HTTP price feed: {url}");
            Ok(Arc::new(HttpPriceFeed::new(
                url,
                Duration::from_secs(settings.timeout_secs),
            )?))
        }
    }
}
