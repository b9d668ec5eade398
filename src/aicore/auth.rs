//! OAuth2 client-credentials token manager for the AI Core proxy

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::{
    config::AiCoreConfig,
    error::{body_suffix, ProviderError, ProviderResult},
};

/// Tokens are refreshed this long before the server-side expiry
const EXPIRY_MARGIN_SECONDS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECONDS) < self.expires_at
    }
}

/// Fetches and caches bearer tokens for the proxy
pub struct TokenManager {
    client: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(client: reqwest::Client, config: &AiCoreConfig) -> Self {
        Self {
            client,
            token_url: token_url(&config.auth_url),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            cached: Mutex::new(None),
        }
    }

    /// Return a valid access token, fetching a new one when needed.
    ///
    /// The lock is held across the fetch, so at most one refresh is in flight.
    pub async fn token(&self) -> ProviderResult<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.fetch().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    #[instrument(skip(self), fields(url = %self.token_url))]
    async fn fetch(&self) -> ProviderResult<CachedToken> {
        debug!("Requesting AI Core access token");

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            debug!(status = %status, "Token request rejected");
            return Err(ProviderError::Auth(format!(
                "{}{}",
                status,
                body_suffix(&text)
            )));
        }

        let body: TokenResponse = response.json().await?;
        debug!(expires_in = body.expires_in, "Received AI Core access token");

        Ok(CachedToken {
            value: body.access_token,
            expires_at: expiry_from(Utc::now(), body.expires_in)?,
        })
    }
}

/// Absolute expiry for a token issued at `now` with a lifetime in seconds
fn expiry_from(now: DateTime<Utc>, expires_in: i64) -> ProviderResult<DateTime<Utc>> {
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            ProviderError::Auth(format!("token lifetime out of range: {} seconds", expires_in))
        })
}

/// Normalise the configured auth URL into the token endpoint
fn token_url(auth_url: &str) -> String {
    let trimmed = auth_url.trim_end_matches('/');
    if trimmed.ends_with("/oauth/token") {
        trimmed.to_string()
    } else {
        format!("{}/oauth/token", trimmed)
    }
}
