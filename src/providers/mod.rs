//! AI provider abstraction layer
//!
//! Every supported provider implements [`TextGenerator`], the one capability
//! the gateway needs: turn a prompt into text. [`ProviderRegistry`] holds one
//! adapter per [`Provider`] and is built once at startup.

pub mod bedrock;
pub mod langchain;
pub mod openai;
pub mod vertex;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{aicore::AiCoreClient, config::Config, error::ProviderResult};

pub use bedrock::BedrockProvider;
pub use langchain::LangChainProvider;
pub use openai::{OpenAIChatModel, OpenAIProvider};
pub use vertex::VertexProvider;

/// Supported providers. Names match exactly and case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAI,
    Vertex,
    LangChain,
    Bedrock,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::OpenAI,
        Provider::Vertex,
        Provider::LangChain,
        Provider::Bedrock,
    ];

    /// Wire name used in requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Vertex => "vertex",
            Provider::LangChain => "langchain",
            Provider::Bedrock => "bedrock",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a provider name is not one of the supported values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownProvider(s.to_string()))
    }
}

/// Generate text from a prompt
///
/// Implementations translate the prompt into one provider-specific call and
/// extract the textual answer. They must not alter the extracted text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Which provider this adapter serves
    fn provider(&self) -> Provider;

    /// Send `prompt` and return the provider's text
    async fn generate(&self, prompt: &str) -> ProviderResult<String>;
}

/// One adapter per provider
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    generators: HashMap<Provider, Arc<dyn TextGenerator>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build all four adapters on top of a shared proxy client
    pub fn from_config(client: Arc<AiCoreClient>, config: &Config) -> ProviderResult<Self> {
        Ok(Self::new()
            .with(Arc::new(OpenAIProvider::new(client.clone(), &config.openai)))
            .with(Arc::new(VertexProvider::new(client.clone(), &config.vertex)))
            .with(Arc::new(LangChainProvider::new(
                client.clone(),
                &config.langchain,
            )?))
            .with(Arc::new(BedrockProvider::new(client, &config.bedrock))))
    }

    /// Register (or replace) the adapter for its provider
    pub fn with(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generators.insert(generator.provider(), generator);
        self
    }

    pub fn get(&self, provider: Provider) -> Option<Arc<dyn TextGenerator>> {
        self.generators.get(&provider).cloned()
    }
}
