//! Conduit - single-endpoint LLM gateway
//!
//! This library provides the core functionality for the Conduit server.
//! It forwards a prompt to one of four providers (chat completions, Gemini,
//! a prompt pipeline, Anthropic on Bedrock) reached through an AI Core
//! proxy, and returns the provider's text.

pub mod aicore;
pub mod chain;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod providers;
pub mod routes;

use std::sync::Arc;

use anyhow::Result;

pub use crate::aicore::AiCoreClient;
pub use crate::config::Config;
pub use crate::dispatch::Dispatcher;
pub use crate::providers::{Provider, ProviderRegistry, TextGenerator};

/// Application state shared across all request handlers
pub struct AppState {
    /// Routes prompts to provider adapters
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(100);
        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        // Initialize AI Core proxy client
        let aicore = Arc::new(AiCoreClient::new(http_client, &config.aicore));

        // Initialize provider adapters
        let registry = ProviderRegistry::from_config(aicore, &config)?;

        Ok(Self {
            dispatcher: Dispatcher::new(registry),
        })
    }

    /// Create an application state around a prepared set of adapters
    ///
    /// Lets integration tests plug stub adapters into the real router.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn new_for_testing(registry: ProviderRegistry) -> Self {
        Self {
            dispatcher: Dispatcher::new(registry),
        }
    }
}
