//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::claim::ClaimError;
use crate::directions::DirectionsError;
use crate::location::TrackerError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Directions API operation failed.
    #[error("Directions error: {0}")]
    Directions(#[from] DirectionsError),

    /// Claim workflow rejected a request.
    #[error("Claim error: {0}")]
    Claim(#[from] ClaimError),

    /// Location tracker rejected a sample.
    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Internal(_) | Self::Directions(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Directions(_) => StatusCode::BAD_GATEWAY,
            Self::Claim(err) => match err {
                ClaimError::UnknownNft(_) => StatusCode::NOT_FOUND,
                ClaimError::NoLocationFix | ClaimError::NotNearby(_) => StatusCode::CONFLICT,
            },
            Self::Tracker(err) => match err {
                TrackerError::StaleSample(_) => StatusCode::UNPROCESSABLE_ENTITY,
                TrackerError::SupersededWatch { .. } | TrackerError::NotWatching => {
                    StatusCode::CONFLICT
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Directions(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
