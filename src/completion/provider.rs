//! Adapter from an `edgequake_llm` provider to [`CompletionService`].
//!
//! edgequake-llm already unwraps the provider's reply into plain text, so
//! the adapter rebuilds a single-choice [`ModelReply`] around it. The model
//! is fixed when the provider is created; `ChatRequest::model` is ignored.

use super::{ChatRequest, CompletionService, ModelReply, Role, Usage};
use crate::error::AnswerError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A [`CompletionService`] backed by any edgequake-llm provider.
#[derive(Clone)]
pub struct ProviderChat {
    name: String,
    provider: Arc<dyn LLMProvider>,
}

impl ProviderChat {
    /// Wrap a pre-built provider.
    pub fn new(name: impl Into<String>, provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }

    /// Build a named provider (`"anthropic"`, `"gemini"`, `"ollama"`, …)
    /// through `ProviderFactory`. The factory reads that provider's API key
    /// from its usual environment variable.
    pub fn from_factory(provider_name: &str, model: &str) -> Result<Self, AnswerError> {
        let provider = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
            AnswerError::ProviderNotConfigured {
                provider: provider_name.to_string(),
                hint: format!("{e}"),
            }
        })?;
        Ok(Self::new(provider_name, provider))
    }
}

impl fmt::Debug for ProviderChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderChat")
            .field("name", &self.name)
            .field("provider", &"<dyn LLMProvider>")
            .finish()
    }
}

/// Map our conversation onto edgequake-llm messages.
fn to_provider_messages(request: &ChatRequest) -> Vec<ChatMessage> {
    request
        .messages
        .iter()
        .map(|m| match m.role {
            Role::System => ChatMessage::system(m.content.as_str()),
            Role::User => ChatMessage::user(m.content.as_str()),
            Role::Assistant => ChatMessage::assistant(m.content.as_str()),
        })
        .collect()
}

fn build_options(request: &ChatRequest) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(request.temperature),
        max_tokens: request.max_tokens.map(|n| n as usize),
        ..Default::default()
    }
}

#[async_trait]
impl CompletionService for ProviderChat {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ModelReply, AnswerError> {
        let messages = to_provider_messages(request);
        let options = build_options(request);

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| AnswerError::ProviderError {
                provider: self.name.clone(),
                detail: format!("{e}"),
            })?;

        debug!(
            "{}: {} input tokens, {} output tokens",
            self.name, response.prompt_tokens, response.completion_tokens
        );

        let mut reply = ModelReply::from_content(response.content);
        reply.usage = Some(Usage {
            prompt_tokens: response.prompt_tokens as u64,
            completion_tokens: response.completion_tokens as u64,
        });
        Ok(reply)
    }
}
