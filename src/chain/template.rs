//! Chat prompt templates
//!
//! A template is a list of `(role, text)` pairs whose text may contain
//! `{name}` placeholders. `{{` and `}}` produce literal braces.

use std::collections::HashMap;

use crate::error::{ProviderError, ProviderResult};

use super::{ChatMessage, Role};

/// One templated message
#[derive(Debug, Clone)]
struct MessageTemplate {
    role: Role,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// Template producing a list of chat messages
#[derive(Debug, Clone)]
pub struct ChatPromptTemplate {
    messages: Vec<MessageTemplate>,
}

impl ChatPromptTemplate {
    /// Build a template from `(role, text)` pairs
    pub fn from_messages(messages: &[(Role, &str)]) -> ProviderResult<Self> {
        let messages = messages
            .iter()
            .map(|(role, text)| {
                Ok(MessageTemplate {
                    role: *role,
                    segments: parse(text)?,
                })
            })
            .collect::<ProviderResult<Vec<_>>>()?;

        Ok(Self { messages })
    }

    /// Names of every placeholder, in order of first appearance
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in self.messages.iter().flat_map(|m| &m.segments) {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        names
    }

    /// Render the template. Values are inserted verbatim.
    pub fn format(&self, vars: &HashMap<&str, &str>) -> ProviderResult<Vec<ChatMessage>> {
        self.messages
            .iter()
            .map(|message| {
                let mut content = String::new();
                for segment in &message.segments {
                    match segment {
                        Segment::Literal(text) => content.push_str(text),
                        Segment::Variable(name) => {
                            let value = vars.get(name.as_str()).ok_or_else(|| {
                                ProviderError::Template(format!(
                                    "missing variable '{}'",
                                    name
                                ))
                            })?;
                            content.push_str(value);
                        }
                    }
                }
                Ok(ChatMessage {
                    role: message.role,
                    content,
                })
            })
            .collect()
    }
}

fn parse(text: &str) -> ProviderResult<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(ProviderError::Template(format!(
                                "unclosed placeholder in '{}'",
                                text
                            )))
                        }
                    }
                }
                let name = name.trim();
                if name.is_empty() || name.contains('{') {
                    return Err(ProviderError::Template(format!(
                        "invalid placeholder in '{}'",
                        text
                    )));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name.to_string()));
            }
            '}' => {
                return Err(ProviderError::Template(format!(
                    "single '}}' in '{}'",
                    text
                )))
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
