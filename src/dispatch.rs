//! Dispatch handler
//!
//! Routes a `(provider, prompt)` pair to the matching adapter and normalizes
//! the outcome into either the adapter's text or an [`AppError`].

use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    providers::{Provider, ProviderRegistry},
};

/// Detail returned for provider names outside the supported set
pub const UNKNOWN_PROVIDER: &str = "Unknown provider";

/// Stateless dispatcher over a fixed set of adapters
#[derive(Clone)]
pub struct Dispatcher {
    registry: ProviderRegistry,
}

impl Dispatcher {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Generate text for `prompt` with the named provider.
    ///
    /// An unrecognized name fails with [`AppError::BadRequest`] before any
    /// external call. Every adapter failure becomes [`AppError::Integration`]
    /// carrying the adapter's error text.
    pub async fn handle(&self, provider: &str, prompt: &str) -> AppResult<String> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", %request_id, provider = %provider);

        async move {
            info!(provider = %provider, prompt = %prompt, "Received request");

            let provider: Provider = provider
                .parse()
                .map_err(|_| AppError::BadRequest(UNKNOWN_PROVIDER.to_string()))?;

            let generator = self.registry.get(provider).ok_or_else(|| {
                let message = format!("Provider '{}' is not configured", provider);
                error!(error = %message, "Error processing request");
                AppError::Integration(message)
            })?;

            generator.generate(prompt).await.map_err(|e| {
                error!(error = %e, "Error processing request");
                AppError::Integration(e.to_string())
            })
        }
        .instrument(span)
        .await
    }
}
