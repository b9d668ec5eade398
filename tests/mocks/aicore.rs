//! Mock AI Core proxy for testing
//!
//! Provides wiremock-based mocks for every endpoint the gateway touches:
//! - POST /oauth/token - client-credentials token
//! - GET /v2/lm/deployments - deployment lookup
//! - POST /v2/inference/deployments/{id}/chat/completions - chat completions
//! - POST /v2/inference/deployments/{id}/models/{model}:generateContent - Gemini
//! - POST /v2/inference/deployments/{id}/invoke - Anthropic on Bedrock
//!
//! # Example
//!
//! ```rust,ignore
//! let aicore = MockAiCore::start().await;
//! aicore.mock_token_success().await;
//! aicore.mock_deployments(&[("gpt-4o", "d-openai")]).await;
//! aicore.mock_chat_completion("d-openai", "Hello!").await;
//! ```

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// Token handed out by the mock OAuth endpoint
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";
/// Resource group expected on every proxied call
pub const TEST_RESOURCE_GROUP: &str = "test-group";

/// Mock AI Core server wrapper
pub struct MockAiCore {
    server: MockServer,
}

impl MockAiCore {
    /// Start a new mock AI Core server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI (used as the OAuth URL)
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// AI API base URL
    pub fn base_url(&self) -> String {
        format!("{}/v2", self.server.uri())
    }

    /// Deployment URL the mock advertises for `deployment_id`
    pub fn deployment_url(&self, deployment_id: &str) -> String {
        format!("{}/v2/inference/deployments/{}", self.server.uri(), deployment_id)
    }

    fn deployment_path(deployment_id: &str, suffix: &str) -> String {
        format!("/v2/inference/deployments/{}{}", deployment_id, suffix)
    }

    /// All requests received so far
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Requests received on a given path
    pub async fn requests_to(&self, request_path: &str) -> Vec<wiremock::Request> {
        self.received_requests()
            .await
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .collect()
    }

    // =========================================================================
    // POST /oauth/token
    // =========================================================================

    /// Mock a successful client-credentials exchange
    pub async fn mock_token_success(&self) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": TEST_ACCESS_TOKEN,
                "token_type": "bearer",
                "expires_in": 43199
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a successful exchange advertising the given token lifetime
    pub async fn mock_token_with_expiry(&self, expires_in: i64) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": TEST_ACCESS_TOKEN,
                "token_type": "bearer",
                "expires_in": expires_in
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a rejected client-credentials exchange
    pub async fn mock_token_failure(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // GET /v2/lm/deployments
    // =========================================================================

    /// Mock the deployment list with `(model, deployment_id)` pairs
    pub async fn mock_deployments(&self, deployments: &[(&str, &str)]) {
        let resources: Vec<Value> = deployments
            .iter()
            .map(|(model, id)| {
                json!({
                    "id": id,
                    "deploymentUrl": self.deployment_url(id),
                    "status": "RUNNING",
                    "scenarioId": "foundation-models",
                    "details": {
                        "resources": {
                            "backend_details": {
                                "model": {"name": model, "version": "latest"}
                            }
                        }
                    }
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/v2/lm/deployments"))
            .and(query_param("status", "RUNNING"))
            .and(header("authorization", format!("Bearer {}", TEST_ACCESS_TOKEN).as_str()))
            .and(header("ai-resource-group", TEST_RESOURCE_GROUP))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": resources.len(),
                "resources": resources
            })))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Chat completions
    // =========================================================================

    /// Mock a chat completion answering `content`
    pub async fn mock_chat_completion(&self, deployment_id: &str, content: &str) {
        Mock::given(method("POST"))
            .and(path(Self::deployment_path(deployment_id, "/chat/completions")))
            .and(query_param("api-version", "2023-05-15"))
            .and(header("authorization", format!("Bearer {}", TEST_ACCESS_TOKEN).as_str()))
            .and(header("ai-resource-group", TEST_RESOURCE_GROUP))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-test123",
                "object": "chat.completion",
                "created": 1706745600,
                "model": "gpt-4o",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 8, "total_tokens": 18}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a chat completion that only answers an exact request body
    pub async fn mock_chat_completion_for_body(
        &self,
        deployment_id: &str,
        expected_body: Value,
        content: &str,
    ) {
        Mock::given(method("POST"))
            .and(path(Self::deployment_path(deployment_id, "/chat/completions")))
            .and(body_json(expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }]
            })))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Gemini generateContent
    // =========================================================================

    /// Mock a generateContent answer made of `parts`
    pub async fn mock_generate_content(&self, deployment_id: &str, model: &str, parts: &[&str]) {
        let parts: Vec<Value> = parts.iter().map(|t| json!({"text": t})).collect();

        Mock::given(method("POST"))
            .and(path(Self::deployment_path(
                deployment_id,
                &format!("/models/{}:generateContent", model),
            )))
            .and(header("authorization", format!("Bearer {}", TEST_ACCESS_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": parts},
                    "finishReason": "STOP"
                }]
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a generateContent failure
    pub async fn mock_generate_content_error(
        &self,
        deployment_id: &str,
        model: &str,
        status: u16,
        body: &str,
    ) {
        Mock::given(method("POST"))
            .and(path(Self::deployment_path(
                deployment_id,
                &format!("/models/{}:generateContent", model),
            )))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Bedrock invoke
    // =========================================================================

    /// Mock an invoke call answering with a raw JSON body
    pub async fn mock_bedrock_invoke(&self, deployment_id: &str, response: Value) {
        Mock::given(method("POST"))
            .and(path(Self::deployment_path(deployment_id, "/invoke")))
            .and(header("authorization", format!("Bearer {}", TEST_ACCESS_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(response))
            .mount(&self.server)
            .await;
    }

    /// Mock an invoke call answering with a non-JSON body
    pub async fn mock_bedrock_invoke_raw(&self, deployment_id: &str, body: &str) {
        Mock::given(method("POST"))
            .and(path(Self::deployment_path(deployment_id, "/invoke")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deployment_url_points_at_mock() {
        let aicore = MockAiCore::start().await;
        assert_eq!(
            aicore.deployment_url("d-1"),
            format!("{}/v2/inference/deployments/d-1", aicore.uri())
        );
        assert_eq!(aicore.base_url(), format!("{}/v2", aicore.uri()));
    }
}
