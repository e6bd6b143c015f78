//! Configuration types for the answer pipeline and the HTTP server.
//!
//! Pipeline behaviour is controlled through [`SolverConfig`], built via its
//! [`SolverConfigBuilder`]. Server bind options live in [`ServerConfig`].
//!
//! The completion-service credential is deliberately absent from both: it is
//! handed straight to the completion backend's constructor (see
//! [`crate::completion::OpenAiChat::new`]) so nothing in the library reads it
//! from process-wide state.

use crate::error::AnswerError;
use serde::{Deserialize, Serialize};

/// Default chat model used by the answerer.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default sampling temperature. Low values keep answers precise.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Default OpenAI-compatible API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for a [`crate::solve::Solver`].
///
/// # Example
/// ```rust
/// use apex_vision::{OptionLabels, SolverConfig};
///
/// let config = SolverConfig::builder()
///     .model("gpt-4o-mini")
///     .temperature(0.0)
///     .option_labels(OptionLabels::Letters)
///     .build()
///     .unwrap();
/// assert_eq!(config.model, "gpt-4o-mini");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Chat model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Sampling temperature for the completion. Default: 0.2.
    ///
    /// The answerer wants the single most likely option, not variety, so the
    /// default sits close to zero.
    pub temperature: f32,

    /// Upper bound on generated tokens. Default: `None` (service default).
    ///
    /// The persona asks for a one-line answer, so the service default is
    /// normally plenty.
    pub max_tokens: Option<u32>,

    /// Custom system prompt. If `None`, uses [`crate::prompts::SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// How answer options are labelled in the prompt. Default: unlabelled.
    pub option_labels: OptionLabels,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            system_prompt: None,
            option_labels: OptionLabels::default(),
        }
    }
}

impl SolverConfig {
    /// Create a new builder for `SolverConfig`.
    pub fn builder() -> SolverConfigBuilder {
        SolverConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SolverConfig`].
#[derive(Debug)]
pub struct SolverConfigBuilder {
    config: SolverConfig,
}

impl SolverConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn option_labels(mut self, labels: OptionLabels) -> Self {
        self.config.option_labels = labels;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SolverConfig, AnswerError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(AnswerError::InvalidConfig("Model must not be empty".into()));
        }
        if !c.temperature.is_finite() {
            return Err(AnswerError::InvalidConfig(format!(
                "Temperature must be a finite number, got {}",
                c.temperature
            )));
        }
        if c.max_tokens == Some(0) {
            return Err(AnswerError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if let Some(prompt) = &c.system_prompt {
            if prompt.trim().is_empty() {
                return Err(AnswerError::InvalidConfig(
                    "System prompt must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

// ── Server ───────────────────────────────────────────────────────────────

/// Bind options for the HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind. Default: `0.0.0.0`.
    pub host: String,

    /// TCP port. Default: 5000.
    pub port: u16,

    /// Maximum accepted request body in bytes. Default: 20 MiB.
    ///
    /// A full-window screenshot in base64 is routinely several megabytes,
    /// well past axum's 2 MiB default.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_body_bytes: 20 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the preprocessor labels answer options.
///
/// OCR output carries whatever markers the screenshot showed, so the
/// default leaves option lines untouched. The labelled variants drop blank
/// option lines and prefix the rest in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionLabels {
    /// Options copied through unchanged. (default)
    #[default]
    None,
    /// `A. `, `B. `, … (`AA. ` after `Z. `).
    Letters,
    /// `1. `, `2. `, …
    Numbers,
}

impl OptionLabels {
    /// Render the label for the option at `index` (0-based), including the
    /// trailing `". "`. Returns `None` for [`OptionLabels::None`].
    pub fn label(&self, index: usize) -> Option<String> {
        match self {
            OptionLabels::None => None,
            OptionLabels::Numbers => Some(format!("{}. ", index + 1)),
            OptionLabels::Letters => Some(format!("{}. ", letter_label(index))),
        }
    }
}

/// Spreadsheet-style column letters: 0 → A, 25 → Z, 26 → AA.
fn letter_label(mut index: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
