//! Output parsers

use super::ChatMessage;

/// Returns the model's message content as a plain string
#[derive(Debug, Clone, Copy, Default)]
pub struct StrOutputParser;

impl StrOutputParser {
    pub fn parse(&self, message: ChatMessage) -> String {
        message.content
    }
}
