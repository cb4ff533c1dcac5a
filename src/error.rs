//! Error types.
//!
//! `ReportError` covers the report pipeline and is always absorbed by the fallback;
//! `AppError` is what the admin endpoints return to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why a model response was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("model returned no text")]
    EmptyResponse,

    #[error("malformed report: {0}")]
    Malformed(String),

    #[error("score {0} outside 0..=100")]
    ScoreOutOfRange(i64),

    #[error("expected at least 3 tips, got {got}")]
    TooFewTips { got: usize },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ReportError {
    /// Stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::Configuration(_) => "configuration",
            ReportError::Transport(_) => "transport",
            ReportError::Validation(_) => "validation",
        }
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(e: reqwest::Error) -> Self {
        ReportError::Transport(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(target: "healthyguide_backend", status = status.as_u16(), error = %self, "Request rejected");
        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
