//! Analyze endpoint
//!
//! `POST /api/analyze` forwards a prompt to the requested provider.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Analyze request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub provider: String,
    pub prompt: String,
}

/// Analyze response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub result: String,
}

/// Forward the prompt and wrap the provider's text
///
/// Body rejections (wrong content type, invalid JSON, missing fields) are
/// answered with `422` and a `detail` string like every other error.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> AppResult<Json<AnalyzeResponse>> {
    let Json(request) = payload.map_err(|rejection| AppError::Unprocessable(rejection.body_text()))?;

    let result = state
        .dispatcher
        .handle(&request.provider, &request.prompt)
        .await?;

    Ok(Json(AnalyzeResponse { result }))
}
