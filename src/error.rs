// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure to obtain or refresh an access token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Refresh token rejected: HTTP {status}: {body}")]
    RefreshRejected { status: u16, body: String },

    #[error("Access token rejected by Strava (401)")]
    TokenRejected,

    #[error("Token endpoint unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("Malformed token response: {0}")]
    MalformedResponse(String),
}

/// Non-auth failure while fetching data from the Strava API.
///
/// A 401 from Strava is carried as [`FetchError::Auth`] so callers can
/// distinguish "refresh and retry once" from "give up".
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Strava rate limit exceeded (429)")]
    RateLimited,

    #[error("Strava API error: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Strava request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed activity response: {0}")]
    MalformedResponse(String),
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Fetch(FetchError),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        // Unwrap auth failures so the response layer sees them as 401s.
        match err {
            FetchError::Auth(e) => AppError::Auth(e),
            other => AppError::Fetch(other),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Auth(err) => {
                tracing::warn!(error = %err, "Strava authorization failed");
                (StatusCode::UNAUTHORIZED, "reauthorization_required", None)
            }
            AppError::Fetch(FetchError::RateLimited) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "temporarily_unavailable",
                None,
            ),
            AppError::Fetch(err) => {
                tracing::error!(error = %err, "Strava fetch failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "strava_error",
                    Some(err.to_string()),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
