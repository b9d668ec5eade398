//! Configuration management for Conduit
//!
//! Configuration is loaded from environment variables once at startup and
//! handed to every provider adapter. Adapters never read the environment.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// AI Core proxy credentials and routing
    pub aicore: AiCoreConfig,

    /// Chat-completion provider settings
    pub openai: OpenAIConfig,
    /// Gemini provider settings
    pub vertex: VertexConfig,
    /// Prompt-template pipeline settings
    pub langchain: LangChainConfig,
    /// Anthropic-on-Bedrock provider settings
    pub bedrock: BedrockConfig,

    /// Optional timeout for upstream calls. `None` lets a call run until the
    /// provider answers.
    pub upstream_timeout: Option<Duration>,
}

/// Credentials for the AI Core proxy
#[derive(Debug, Clone)]
pub struct AiCoreConfig {
    /// OAuth server URL (`/oauth/token` is appended when missing)
    pub auth_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// AI API base URL, e.g. `https://api.ai.example.com/v2`
    pub base_url: String,
    /// Value sent in the `AI-Resource-Group` header
    pub resource_group: String,
}

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub model: String,
    pub api_version: String,
    /// Explicit deployment URL, skips deployment lookup when set
    pub deployment_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VertexConfig {
    pub model: String,
    pub deployment_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LangChainConfig {
    pub model: String,
    pub api_version: String,
    pub system_prompt: String,
    pub deployment_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub model: String,
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub deployment_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_version = or("OPENAI_API_VERSION", "2023-05-15");

        Ok(Self {
            host: or("CONDUIT_HOST", "0.0.0.0"),
            port: or("CONDUIT_PORT", "8090")
                .parse()
                .context("Invalid CONDUIT_PORT")?,

            aicore: AiCoreConfig {
                auth_url: required("AICORE_AUTH_URL")?,
                client_id: required("AICORE_CLIENT_ID")?,
                client_secret: required("AICORE_CLIENT_SECRET")?,
                base_url: required("AICORE_BASE_URL")?
                    .trim_end_matches('/')
                    .to_string(),
                resource_group: or("AICORE_RESOURCE_GROUP", "default"),
            },

            openai: OpenAIConfig {
                model: or("OPENAI_MODEL", "gpt-4o"),
                api_version: openai_api_version.clone(),
                deployment_url: optional("OPENAI_DEPLOYMENT_URL"),
            },
            vertex: VertexConfig {
                model: or("VERTEX_MODEL", "gemini-1.5-flash"),
                deployment_url: optional("VERTEX_DEPLOYMENT_URL"),
            },
            langchain: LangChainConfig {
                model: or("LANGCHAIN_MODEL", "gpt-4o"),
                api_version: openai_api_version,
                system_prompt: or("LANGCHAIN_SYSTEM_PROMPT", "You are a helpful assistant."),
                deployment_url: optional("LANGCHAIN_DEPLOYMENT_URL"),
            },
            bedrock: BedrockConfig {
                model: or("BEDROCK_MODEL", "anthropic--claude-3-sonnet"),
                anthropic_version: or("BEDROCK_ANTHROPIC_VERSION", "bedrock-2023-05-31"),
                max_tokens: or("BEDROCK_MAX_TOKENS", "1024")
                    .parse()
                    .context("Invalid BEDROCK_MAX_TOKENS")?,
                deployment_url: optional("BEDROCK_DEPLOYMENT_URL"),
            },

            upstream_timeout: optional("UPSTREAM_TIMEOUT_SECONDS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("Invalid UPSTREAM_TIMEOUT_SECONDS")?
                .map(Duration::from_secs),
        })
    }
}
