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

//! Price feeds and the task scheduler behind the GridSense API.

pub mod pricing;
pub mod scheduling;

pub use pricing::{
    FORECAST_HOURS, HttpPriceFeed, PriceFeed, PriceFeedError, SyntheticPriceFeed,
    price_feed_from_config,
};
pub use scheduling::{CheapestWindowScheduler, Scheduler};
