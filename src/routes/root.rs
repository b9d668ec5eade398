//! Root endpoint
//!
//! `GET /` doubles as the liveness probe.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Message returned by `GET /`
pub const ROOT_MESSAGE: &str = "Native Integrations Backend Running";

/// Root response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

/// JSON 404 for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

/// JSON 405 for known routes hit with an unsupported method
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed("Method Not Allowed".to_string())
}
