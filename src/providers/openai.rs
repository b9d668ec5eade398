//! Chat-completion provider
//!
//! Calls `{deployment}/chat/completions` through the AI Core proxy and
//! returns the first choice's message content.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    aicore::AiCoreClient,
    chain::{ChatMessage, ChatModel},
    config::OpenAIConfig,
    error::{ProviderError, ProviderResult},
};

use super::{Provider, TextGenerator};

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
}

/// Chat completion response (only the fields we read)
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice
    pub fn into_text(self) -> ProviderResult<String> {
        self.choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedResponse("response has no choices".into()))?
            .message
            .content
            .ok_or_else(|| {
                ProviderError::MalformedResponse("first choice has no message content".into())
            })
    }
}

/// Chat model backed by a chat-completions deployment
pub struct OpenAIChatModel {
    client: Arc<AiCoreClient>,
    model: String,
    api_version: String,
    deployment_url: Option<String>,
}

impl OpenAIChatModel {
    pub fn new(
        client: Arc<AiCoreClient>,
        model: impl Into<String>,
        api_version: impl Into<String>,
        deployment_url: Option<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            api_version: api_version.into(),
            deployment_url,
        }
    }

    /// Send `messages` and return the assistant's text
    #[instrument(skip(self, messages), fields(model = %self.model))]
    pub async fn complete(&self, messages: &[ChatMessage]) -> ProviderResult<String> {
        let deployment = self
            .client
            .deployment_url(&self.model, self.deployment_url.as_deref())
            .await?;
        let url = format!("{}/chat/completions", deployment);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
        };

        let value = self
            .client
            .post_json(&url, &[("api-version", self.api_version.as_str())], &request)
            .await?;

        let response: ChatCompletionResponse = serde_json::from_value(value)?;
        response.into_text()
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    async fn invoke(&self, messages: &[ChatMessage]) -> ProviderResult<ChatMessage> {
        self.complete(messages).await.map(ChatMessage::assistant)
    }
}

/// `openai` provider: one user message, first choice's content
pub struct OpenAIProvider {
    model: OpenAIChatModel,
}

impl OpenAIProvider {
    pub fn new(client: Arc<AiCoreClient>, config: &OpenAIConfig) -> Self {
        Self {
            model: OpenAIChatModel::new(
                client,
                config.model.clone(),
                config.api_version.clone(),
                config.deployment_url.clone(),
            ),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAIProvider {
    fn provider(&self) -> Provider {
        Provider::OpenAI
    }

    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        self.model.complete(&[ChatMessage::user(prompt)]).await
    }
}
