//! Chat-completion backends.
//!
//! The answerer talks to a [`CompletionService`]: send a [`ChatRequest`],
//! get a [`ModelReply`] back. The wire types follow the OpenAI chat
//! completions shape (`{"choices": [{"message": {"content": …}}]}`) because
//! that is what the reply parser inspects.
//!
//! Two backends ship with the crate:
//!
//! - [`OpenAiChat`] speaks the OpenAI HTTP API directly with an explicitly
//!   injected API key. Any OpenAI-compatible endpoint works via `base_url`.
//! - [`ProviderChat`] adapts an `edgequake_llm` provider, so everything its
//!   `ProviderFactory` supports can back the answerer too.

mod openai;
mod provider;

pub use openai::OpenAiChat;
pub use provider::ProviderChat;

use crate::error::AnswerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A hosted chat-completion model.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Send one conversation and return the raw reply. No retries.
    async fn complete(&self, request: &ChatRequest) -> Result<ModelReply, AnswerError>;
}

/// Speaker of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
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
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Raw reply from the completion service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelReply {
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ModelReply {
    /// A reply with one candidate whose content is `content`.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: ReplyMessage {
                    role: Some(Role::Assistant),
                    content: Some(content.into()),
                },
            }],
            usage: None,
        }
    }

    /// Content of the first candidate.
    ///
    /// # Errors
    /// [`AnswerError::MalformedReply`] when there are no candidates or the
    /// first one has no text content.
    pub fn first_content(&self) -> Result<&str, AnswerError> {
        let choice = self
            .choices
            .first()
            .ok_or_else(|| AnswerError::MalformedReply {
                detail: "reply contains no choices".to_string(),
            })?;
        choice
            .message
            .content
            .as_deref()
            .ok_or_else(|| AnswerError::MalformedReply {
                detail: "first choice has no message content".to_string(),
            })
    }
}

/// One candidate completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub message: ReplyMessage,
}

/// Message inside a [`Choice`]. `content` is `null` for tool-call replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Token accounting, when the service reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}
