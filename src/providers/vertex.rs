//! Gemini provider
//!
//! Calls `{deployment}/models/{model}:generateContent` with one user content
//! part and returns the text of the first candidate.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    aicore::AiCoreClient,
    config::VertexConfig,
    error::{ProviderError, ProviderResult},
};

use super::{Provider, TextGenerator};

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub role: &'a str,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn user(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    pub fn into_text(self) -> ProviderResult<String> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedResponse("response has no candidates".into()))?;

        let texts: Vec<String> = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if texts.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "first candidate has no text parts".into(),
            ));
        }
        Ok(texts.concat())
    }
}

/// `vertex` provider
pub struct VertexProvider {
    client: Arc<AiCoreClient>,
    model: String,
    deployment_url: Option<String>,
}

impl VertexProvider {
    pub fn new(client: Arc<AiCoreClient>, config: &VertexConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            deployment_url: config.deployment_url.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for VertexProvider {
    fn provider(&self) -> Provider {
        Provider::Vertex
    }

    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let deployment = self
            .client
            .deployment_url(&self.model, self.deployment_url.as_deref())
            .await?;
        let url = format!("{}/models/{}:generateContent", deployment, self.model);

        let value = self
            .client
            .post_json(&url, &[], &GenerateContentRequest::user(prompt))
            .await?;

        let response: GenerateContentResponse = serde_json::from_value(value)?;
        response.into_text()
    }
}
