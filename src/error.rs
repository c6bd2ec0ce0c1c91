//! Error boundary for the HTTP handlers.
//!
//! Handlers return `Result<T, ApiError>`. Every error is logged once here and
//! turned into `{"error": "..."}` with the matching status code; the message
//! is shown to the user as is.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::services::prediction::PredictionError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required field is missing or out of bounds.
    #[error("{0}")]
    ClientInput(String),

    #[error("{0}")]
    NotFound(String),

    /// Every photo variation failed.
    #[error("No images generated")]
    NoImagesGenerated,

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

impl ApiError {
    pub fn client_input(message: impl Into<String>) -> Self {
        ApiError::ClientInput(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ClientInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NoImagesGenerated => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Prediction(e) => match e {
                PredictionError::Submission { status, .. }
                | PredictionError::Status { status, .. } => StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                PredictionError::MissingCredential
                | PredictionError::Http(_)
                | PredictionError::Poll { .. }
                | PredictionError::JobFailed(_)
                | PredictionError::JobTimeout { .. }
                | PredictionError::NoOutput => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ClientInput(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::ClientInput(rejection.body_text())
    }
}

impl From<garde::Report> for ApiError {
    fn from(report: garde::Report) -> Self {
        ApiError::ClientInput(report.to_string())
    }
}

/// A string field that must be present and non-empty.
pub fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, ApiError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::client_input(message)),
    }
}
