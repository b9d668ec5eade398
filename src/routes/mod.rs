//! HTTP routes for Conduit
//!
//! This module defines all HTTP endpoints exposed by the gateway.

pub mod analyze;
pub mod root;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnFailure, TraceLayer},
};
use tracing::Level;

use crate::AppState;

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root::root).fallback(root::method_not_allowed))
        .route(
            "/api/analyze",
            post(analyze::analyze).fallback(root::method_not_allowed),
        )
        .fallback(root::not_found)
        // Prompts are forwarded whole
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                // Failures are reported once by the dispatcher
                .layer(
                    TraceLayer::new_for_http()
                        .on_failure(DefaultOnFailure::new().level(Level::DEBUG)),
                )
                .layer(cors),
        )
        .with_state(state)
}
