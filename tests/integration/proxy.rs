//! AI Core proxy integration tests
//!
//! Token acquisition, deployment lookup and their failure modes as seen from
//! the HTTP caller.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{constants, GatewayTestHarness};
use crate::mocks::MockAiCore;

async fn analyze(harness: &GatewayTestHarness, provider: &str) -> (StatusCode, Value) {
    let response = harness
        .server
        .post("/api/analyze")
        .json(&json!({"provider": provider, "prompt": "Say hello"}))
        .await;
    (response.status_code(), response.json())
}

#[tokio::test]
async fn test_token_request_uses_client_credentials() {
    let harness = GatewayTestHarness::new().await;
    harness.mock_proxy_ready().await;
    harness
        .aicore
        .mock_chat_completion(constants::OPENAI_DEPLOYMENT, "Hello!")
        .await;

    let (status, _) = analyze(&harness, "openai").await;
    assert_eq!(status, StatusCode::OK);

    let token_calls = harness.aicore.requests_to("/oauth/token").await;
    assert_eq!(token_calls.len(), 1);

    let body = String::from_utf8(token_calls[0].body.clone()).unwrap();
    assert_eq!(body, "grant_type=client_credentials");

    let auth = token_calls[0]
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(auth.starts_with("Basic "));
}

#[tokio::test]
async fn test_token_and_deployment_are_reused_across_requests() {
    let harness = GatewayTestHarness::new().await;
    harness.mock_proxy_ready().await;
    harness
        .aicore
        .mock_chat_completion(constants::OPENAI_DEPLOYMENT, "Hello!")
        .await;

    for _ in 0..3 {
        let (status, body) = analyze(&harness, "openai").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], "Hello!");
    }

    assert_eq!(harness.aicore.requests_to("/oauth/token").await.len(), 1);
    assert_eq!(harness.aicore.requests_to("/v2/lm/deployments").await.len(), 1);
    assert_eq!(
        harness
            .aicore
            .requests_to("/v2/inference/deployments/d-openai/chat/completions")
            .await
            .len(),
        3
    );
}

#[tokio::test]
async fn test_rejected_credentials_are_integration_error() {
    let harness = GatewayTestHarness::new().await;
    harness
        .aicore
        .mock_token_failure(401, "{\"error\":\"invalid_client\"}")
        .await;

    let (status, body) = analyze(&harness, "openai").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Integration Error: Authentication failed: 401 Unauthorized: {\"error\":\"invalid_client\"}"
    );
}

#[tokio::test]
async fn test_out_of_range_token_lifetime_is_integration_error() {
    let harness = GatewayTestHarness::new().await;
    harness.aicore.mock_token_with_expiry(i64::MAX).await;

    let (status, body) = analyze(&harness, "openai").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        format!(
            "Integration Error: Authentication failed: token lifetime out of range: {} seconds",
            i64::MAX
        )
    );

    // The server keeps serving after the bad token response
    let (status, _) = analyze(&harness, "openai").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_missing_deployment_is_integration_error() {
    let harness = GatewayTestHarness::new().await;
    harness.aicore.mock_token_success().await;
    harness
        .aicore
        .mock_deployments(&[("gemini-1.5-flash", constants::VERTEX_DEPLOYMENT)])
        .await;

    let (status, body) = analyze(&harness, "bedrock").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "Integration Error: No running deployment found for model 'anthropic--claude-3-sonnet'"
    );
}

#[tokio::test]
async fn test_explicit_deployment_url_skips_lookup() {
    let aicore = MockAiCore::start().await;
    let pinned = aicore.deployment_url("d-pinned");
    let harness = GatewayTestHarness::on(aicore, &[("OPENAI_DEPLOYMENT_URL", pinned.as_str())]);

    harness.aicore.mock_token_success().await;
    harness.aicore.mock_chat_completion("d-pinned", "Pinned!").await;

    let (status, body) = analyze(&harness, "openai").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "Pinned!");
    assert!(harness.aicore.requests_to("/v2/lm/deployments").await.is_empty());
}
