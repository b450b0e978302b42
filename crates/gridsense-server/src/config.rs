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

use anyhow::{Context, Result, bail};
use gridsense_types::{PriceFeedSettings, PriceSource};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GridSenseConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub prices: PriceFeedSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Used when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8000
}

fn default_log_filter() -> String {
    "info".to_owned()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl GridSenseConfig {
    /// Load from `path`, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                info!("No config file given, using defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }

    fn validate(&self) -> Result<()> {
        if self.server.bind_address.is_empty() {
            bail!("server.bind_address must be set");
        }
        if self.prices.timeout_secs == 0 {
            bail!("prices.timeout_secs must be greater than zero");
        }
        match self.prices.source {
            PriceSource::Http => match self.prices.url.as_deref() {
                None | Some("") => bail!("prices.url must be set when prices.source = \"http\""),
                Some(url) if !url.starts_with("http://") && !url.starts_with("https://") => {
                    bail!("prices.url must be an http(s) URL, got {url}");
                }
                Some(_) => {}
            },
            PriceSource::Synthetic => {
                if !self.prices.base_price_per_kwh.is_finite() {
                    bail!("prices.base_price_per_kwh must be a finite number");
                }
            }
        }
        Ok(())
    }
}
