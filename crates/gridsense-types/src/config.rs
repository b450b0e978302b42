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

use serde::{Deserialize, Serialize};

/// Where the price forecast comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceSource {
    /// Built-in day-ahead profile, no network access
    #[default]
    Synthetic,
    /// JSON forecast fetched from `url`
    Http,
}

/// Price feed configuration (`[prices]` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFeedSettings {
    #[serde(default)]
    pub source: PriceSource,

    /// Upstream forecast endpoint, required when `source = "http"`
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Reference price the synthetic profile is scaled by
    #[serde(default = "default_base_price_per_kwh")]
    pub base_price_per_kwh: f64,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_base_price_per_kwh() -> f64 {
    0.25
}

impl Default for PriceFeedSettings {
    fn default() -> Self {
        Self {
            source: PriceSource::default(),
            url: None,
            timeout_secs: default_timeout_secs(),
            base_price_per_kwh: default_base_price_per_kwh(),
        }
    }
}
