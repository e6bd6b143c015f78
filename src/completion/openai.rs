//! OpenAI chat-completions client over `reqwest`.

use super::{ChatRequest, CompletionService, ModelReply};
use crate::config::DEFAULT_BASE_URL;
use crate::error::AnswerError;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use tracing::debug;

/// Client for `POST {base_url}/chat/completions`.
///
/// The API key is passed in at construction and sent as a bearer token.
/// No timeout is set: the request waits as long as reqwest's defaults
/// allow.
#[derive(Clone)]
pub struct OpenAiChat {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiChat {
    /// Client for the public OpenAI API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point at another OpenAI-compatible endpoint (vLLM, LiteLLM, a proxy…).
    ///
    /// `base_url` is the prefix before `/chat/completions`, e.g.
    /// `http://localhost:8000/v1`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Reuse an existing `reqwest::Client` (connection pool, proxy settings).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl CompletionService for OpenAiChat {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ModelReply, AnswerError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Completion service: HTTP {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(AnswerError::CompletionStatus {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| AnswerError::MalformedReply {
            detail: format!("{e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let chat = OpenAiChat::new("sk-test").with_base_url("http://localhost:8000/v1/");
        assert_eq!(chat.endpoint(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn default_endpoint_is_openai() {
        let chat = OpenAiChat::new("sk-test");
        assert_eq!(chat.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn debug_redacts_key() {
        let chat = OpenAiChat::new("sk-very-secret");
        let dbg = format!("{chat:?}");
        assert!(!dbg.contains("sk-very-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
