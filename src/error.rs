//! Error types for Conduit
//!
//! Two layers: [`ProviderError`] describes what went wrong inside an adapter
//! or the proxy client, [`AppError`] is what the HTTP caller sees.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failures raised while talking to a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{status}{}", body_suffix(.body))]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("No running deployment found for model '{0}'")]
    DeploymentNotFound(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Prompt template error: {0}")]
    Template(String),
}

/// `": <body>"` for a non-empty upstream body, otherwise nothing
pub(crate) fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

/// Result type for adapter and proxy-client calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("Integration Error: {0}")]
    Integration(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Integration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
