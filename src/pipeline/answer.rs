//! Answering: prompt text → completion call → bare answer string.
//!
//! The request has exactly two messages:
//! 1. **System**: the fixed persona from [`crate::prompts::SYSTEM_PROMPT`]
//!    (or the configured override), which pins the reply template
//!    `"The correct answer is: <option>"`.
//! 2. **User**: the preprocessed question block, verbatim.
//!
//! The reply is reduced to whatever follows [`ANSWER_PREFIX`] in the first
//! candidate. A reply that ignores the template is not an error; it becomes
//! [`FALLBACK_ANSWER`]. Transport failures and replies with no usable
//! candidate are errors and are returned as-is. Nothing is retried.

use crate::completion::{ChatRequest, CompletionService, Message, ModelReply, OpenAiChat};
use crate::config::SolverConfig;
use crate::error::AnswerError;
use crate::prompts::{ANSWER_PREFIX, FALLBACK_ANSWER, SYSTEM_PROMPT};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Sends prompts to a completion backend and parses the replies.
#[derive(Clone)]
pub struct Answerer {
    completion: Arc<dyn CompletionService>,
    config: SolverConfig,
}

impl Answerer {
    pub fn new(completion: Arc<dyn CompletionService>, config: SolverConfig) -> Self {
        Self { completion, config }
    }

    /// Answerer backed by the public OpenAI API using `api_key`.
    pub fn openai(api_key: impl Into<String>, config: SolverConfig) -> Self {
        Self::new(Arc::new(OpenAiChat::new(api_key)), config)
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Build the two-message request for `prompt`.
    pub fn build_request(&self, prompt: &str) -> ChatRequest {
        let system = self
            .config
            .system_prompt
            .as_deref()
            .unwrap_or(SYSTEM_PROMPT);

        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![Message::system(system), Message::user(prompt)],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Ask the model and return the extracted answer.
    pub async fn answer(&self, prompt: &str) -> Result<String, AnswerError> {
        let request = self.build_request(prompt);
        let start = Instant::now();

        let reply = self.completion.complete(&request).await?;
        info!("Model response: {:?}", reply);
        debug!(
            "{} replied in {:?}",
            self.completion.name(),
            start.elapsed()
        );

        let answer = parse_reply(&reply)?;
        debug!("Parsed answer: {}", answer);
        Ok(answer)
    }
}

impl fmt::Debug for Answerer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Answerer")
            .field("completion", &self.completion.name())
            .field("config", &self.config)
            .finish()
    }
}

/// Extract the answer from a full reply.
///
/// # Errors
/// [`AnswerError::MalformedReply`] if the reply has no first candidate or
/// that candidate has no content.
pub fn parse_reply(reply: &ModelReply) -> Result<String, AnswerError> {
    Ok(extract_answer(reply.first_content()?))
}

/// Strip [`ANSWER_PREFIX`] from `content`, or return [`FALLBACK_ANSWER`].
pub fn extract_answer(content: &str) -> String {
    match content.strip_prefix(ANSWER_PREFIX) {
        Some(answer) => answer.to_string(),
        None => FALLBACK_ANSWER.to_string(),
    }
}
