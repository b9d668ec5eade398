//! Prompt-pipeline provider
//!
//! Runs `[system instruction, "{text}"]` through a chat-completions model and
//! a string output parser.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    aicore::AiCoreClient,
    chain::{ChatPromptTemplate, LlmChain, Role, StrOutputParser},
    config::LangChainConfig,
    error::ProviderResult,
};

use super::{OpenAIChatModel, Provider, TextGenerator};

/// Template variable that receives the user's prompt
const PROMPT_VARIABLE: &str = "text";

/// `langchain` provider
pub struct LangChainProvider {
    chain: LlmChain<OpenAIChatModel>,
}

impl LangChainProvider {
    pub fn new(client: Arc<AiCoreClient>, config: &LangChainConfig) -> ProviderResult<Self> {
        let user_template = format!("{{{}}}", PROMPT_VARIABLE);
        let template = ChatPromptTemplate::from_messages(&[
            (Role::System, config.system_prompt.as_str()),
            (Role::User, user_template.as_str()),
        ])?;

        let model = OpenAIChatModel::new(
            client,
            config.model.clone(),
            config.api_version.clone(),
            config.deployment_url.clone(),
        );

        Ok(Self {
            chain: LlmChain::new(template, model, StrOutputParser),
        })
    }
}

#[async_trait]
impl TextGenerator for LangChainProvider {
    fn provider(&self) -> Provider {
        Provider::LangChain
    }

    async fn generate(&self, prompt: &str) -> ProviderResult<String> {
        let vars = HashMap::from([(PROMPT_VARIABLE, prompt)]);
        self.chain.invoke(&vars).await
    }
}
