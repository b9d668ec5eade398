//! Prompt pipeline
//!
//! A small composition of prompt template, chat model and output parser:
//! the template renders the input variables into messages, the model answers
//! them and the parser turns the answer into the final value.

pub mod parser;
pub mod template;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProviderResult;

pub use parser::StrOutputParser;
pub use template::ChatPromptTemplate;

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A model that answers a list of chat messages with one message
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn invoke(&self, messages: &[ChatMessage]) -> ProviderResult<ChatMessage>;
}

/// Template → model → parser
pub struct LlmChain<M> {
    template: ChatPromptTemplate,
    model: M,
    parser: StrOutputParser,
}

impl<M: ChatModel> LlmChain<M> {
    pub fn new(template: ChatPromptTemplate, model: M, parser: StrOutputParser) -> Self {
        Self {
            template,
            model,
            parser,
        }
    }

    /// Run the pipeline for one set of input variables
    pub async fn invoke(&self, vars: &HashMap<&str, &str>) -> ProviderResult<String> {
        let messages = self.template.format(vars)?;
        debug!(messages = messages.len(), "Invoking chain");

        let answer = self.model.invoke(&messages).await?;
        Ok(self.parser.parse(answer))
    }
}
