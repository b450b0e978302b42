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

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use chrono::Utc;
use gridsense_types::{PriceSeries, ScheduleRequest, ScheduleResult};
use serde_json::{Value, json};
use tracing::{debug, info};

use super::{ApiError, AppState};

/// GET /prices - 24 hour price forecast for the dashboard chart
pub async fn prices_handler(State(state): State<AppState>) -> Result<Json<PriceSeries>, ApiError> {
    let prices = state.price_feed.read_prices().await?;
    debug!(
        blocks = prices.len(),
        average = prices.average_price(),
        cheapest = prices.cheapest().map(|p| p.price_per_kwh),
        peak = prices.most_expensive().map(|p| p.price_per_kwh),
        "Serving price forecast"
    );
    Ok(Json(prices))
}

/// POST /schedule - optimal start time for a task before its deadline
pub async fn schedule_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Result<Json<ScheduleResult>, ApiError> {
    let Json(request) = payload?;
    request.task.validate()?;

    let prices = state.price_feed.read_prices().await?;

    let result = state
        .scheduler
        .schedule(&request.task, &prices, Utc::now())
        .ok_or(ApiError::NoFeasibleWindow)?;

    info!(
        task = %result.task_name,
        start = %result.start_time,
        cost = result.estimated_cost,
        "Task scheduled"
    );
    Ok(Json(result))
}

/// GET /health - liveness probe
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "price_feed": state.price_feed.name(),
        "scheduler": state.scheduler.name(),
    }))
}
