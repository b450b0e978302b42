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

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gridsense_core::PriceFeedError;
use gridsense_types::TaskError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The price feed failed; the cause is logged, never returned
    #[error("Could not fetch grid data")]
    GridDataUnavailable(#[from] PriceFeedError),

    #[error("No valid window found before deadline")]
    NoFeasibleWindow,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Invalid task: {0}")]
    InvalidTask(#[from] TaskError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::GridDataUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoFeasibleWindow => StatusCode::BAD_REQUEST,
            Self::InvalidRequest(_) | Self::InvalidTask(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::GridDataUnavailable(source) = &self {
            warn!(error = %source, "Price feed failed");
        }

        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
