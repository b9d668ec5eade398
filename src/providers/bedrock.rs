//! Anthropic-on-Bedrock provider
//!
//! Posts the Anthropic messages body to `{deployment}/invoke` and extracts
//! the text of the first content block.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    aicore::AiCoreClient,
    config::BedrockConfig,
    error::{ProviderError, ProviderResult},
};

use super::{Provider, TextGenerator};

#[derive(Debug, Serialize)]
pub struct InvokeRequest<'a> {
    pub anthropic_version: &'a str,
    pub max_tokens: u32,
    pub messages: Vec<InvokeMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct InvokeMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct InvokeResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub text: Option<String>,
}

impl InvokeResponse {
    /// Text of the first content block
    pub fn into_text(self) -> ProviderResult<String> {
        self.content
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedResponse("response has no content".into()))?
            .text
            .ok_or_else(|| {
                ProviderError::MalformedResponse("first content block has no text".into())
            })
    }
}

/// `bedrock` provider
pub struct BedrockProvider {
    client: Arc<AiCoreClient>,
    model: String,
    anthropic_version: String,
    max_tokens: u32,
    deployment_url: Option<String>,
}

impl BedrockProvider {
    pub fn new(client: Arc<AiCoreClient>, config: &BedrockConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            anthropic_version: config.anthropic_version.clone(),
            max_tokens: config.max_tokens,
            deployment_url: config.deployment_url.clone(),
        }
    }

    fn request<'a>(&'a self, prompt: &'a str) -> InvokeRequest<'a> {
        InvokeRequest {
            anthropic_version: &self.anthropic_version,
            max_tokens: self.max_tokens,
            messages: vec![InvokeMessage {
                role: "user",
                content: prompt,
            }],
        }
    }
}

#[async_trait]
impl TextGenerator for BedrockProvider {
    fn provider(&self) -> Provider {
        Provider::Bedrock
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let deployment = self
            .client
            .deployment_url(&self.model, self.deployment_url.as_deref())
            .await?;
        let url = format!("{}/invoke", deployment);

        let value = self
            .client
            .post_json(&url, &[], &self.request(prompt))
            .await?;

        let response: InvokeResponse = serde_json::from_value(value)?;
        response.into_text()
    }
}
