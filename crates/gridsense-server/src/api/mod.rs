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

mod error;
mod handlers;

pub use error::{ApiError, ErrorBody};

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use gridsense_core::{PriceFeed, Scheduler};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// The browser dev server (Vite default port) allowed to call the API
pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Application state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub price_feed: Arc<dyn PriceFeed>,
    pub scheduler: Arc<dyn Scheduler>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("price_feed", &self.price_feed.name())
            .field("scheduler", &self.scheduler.name())
            .finish()
    }
}

impl AppState {
    pub fn new(price_feed: Arc<dyn PriceFeed>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            price_feed,
            scheduler,
        }
    }
}

/// Assemble the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/prices", get(handlers::prices_handler))
        .route("/schedule", post(handlers::schedule_handler))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Only the local frontend may call the API, with any method and header
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(HeaderValue::from_static(ALLOWED_ORIGIN))
        .allow_methods(Any)
        .allow_headers(Any)
}
