//! AI Core proxy client
//!
//! Every provider adapter reaches its model through this client: it attaches
//! the bearer token and resource group, resolves deployment URLs and turns
//! non-2xx answers into [`ProviderError::Upstream`].

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{
    aicore::{auth::TokenManager, deployments::DeploymentList},
    config::AiCoreConfig,
    error::{ProviderError, ProviderResult},
};

/// Header naming the resource group a request is scoped to
pub const RESOURCE_GROUP_HEADER: &str = "ai-resource-group";

/// Authenticated client for the AI Core proxy
pub struct AiCoreClient {
    client: reqwest::Client,
    base_url: String,
    resource_group: String,
    tokens: TokenManager,
    deployments: RwLock<HashMap<String, String>>,
}

impl AiCoreClient {
    /// Create a new proxy client
    pub fn new(client: reqwest::Client, config: &AiCoreConfig) -> Self {
        Self {
            tokens: TokenManager::new(client.clone(), config),
            client,
            base_url: config.base_url.clone(),
            resource_group: config.resource_group.clone(),
            deployments: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the deployment URL serving `model`
    ///
    /// `explicit` wins when set. Lookups are memoised per model for the
    /// lifetime of the client.
    #[instrument(skip(self, explicit), fields(model = %model))]
    pub async fn deployment_url(
        &self,
        model: &str,
        explicit: Option<&str>,
    ) -> ProviderResult<String> {
        if let Some(url) = explicit {
            return Ok(url.trim_end_matches('/').to_string());
        }

        if let Some(url) = self.deployments.read().await.get(model) {
            return Ok(url.clone());
        }

        let url = format!("{}/lm/deployments", self.base_url);
        debug!(url = %url, "Looking up deployment");

        let response = self
            .client
            .get(&url)
            .query(&[("status", "RUNNING")])
            .headers(self.headers().await?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = %status, "Deployment lookup failed");
            return Err(ProviderError::Upstream { status, body });
        }

        let list: DeploymentList = response.json().await?;
        let found = list
            .find(model)
            .map(|d| d.deployment_url.trim_end_matches('/').to_string())
            .ok_or_else(|| ProviderError::DeploymentNotFound(model.to_string()))?;

        debug!(deployment_url = %found, "Resolved deployment");
        self.deployments
            .write()
            .await
            .insert(model.to_string(), found.clone());

        Ok(found)
    }

    /// POST a JSON body to `url` and return the parsed JSON answer
    #[instrument(skip(self, query, body), fields(url = %url))]
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &T,
    ) -> ProviderResult<serde_json::Value> {
        debug!("Sending request through AI Core");

        let response = self
            .client
            .post(url)
            .query(query)
            .headers(self.headers().await?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(status = %status, body_len = text.len(), "Received AI Core response");

        if !status.is_success() {
            debug!(status = %status, body = %text, "AI Core request failed");
            return Err(ProviderError::Upstream { status, body: text });
        }

        Ok(serde_json::from_str(&text)?)
    }

    async fn headers(&self) -> ProviderResult<HeaderMap> {
        let token = self.tokens.token().await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ProviderError::Auth(format!("Invalid access token: {}", e)))?,
        );
        headers.insert(
            RESOURCE_GROUP_HEADER,
            HeaderValue::from_str(&self.resource_group).map_err(|e| {
                ProviderError::Auth(format!("Invalid resource group header: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}
