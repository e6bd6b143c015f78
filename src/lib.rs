//! # apex-vision
//!
//! Answer a screenshot of a multiple-choice question: OCR the image, hand
//! the text to a chat-completion model, return the option it picks.
//!
//! ## Pipeline Overview
//!
//! ```text
//! {"image": "data:image/png;base64,…"}
//!  │
//!  ├─ 1. Decode      strip data-URI prefix, base64 → DynamicImage
//!  ├─ 2. Extract     tesseract (or any TextRecognizer) → raw text
//!  ├─ 3. Preprocess  line 0 = question, rest = options
//!  ├─ 4. Answer      system persona + user prompt → chat model
//!  └─ 5. Parse       "The correct answer is: X" → "X"
//! ```
//!
//! Every stage returns `Result<_, AnswerError>`. The HTTP layer in
//! [`server`] turns any error into `500 {"error": "…"}`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use apex_vision::{Answerer, Solver, SolverConfig, TesseractRecognizer};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_key = std::env::var("OPENAI_API_KEY")?;
//!     let answerer = Answerer::openai(api_key, SolverConfig::default());
//!     let solver = Solver::new(Arc::new(TesseractRecognizer::new()), answerer);
//!
//!     let screenshot = std::fs::read_to_string("question.b64")?;
//!     println!("{}", solver.solve(&screenshot).await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `apex-vision` binary (clap + anyhow + tracing-subscriber + dotenvy) |
//!
//! ## Backends
//!
//! OCR and completion are traits ([`TextRecognizer`], [`CompletionService`]).
//! The crate ships [`TesseractRecognizer`], [`OpenAiChat`] for any
//! OpenAI-compatible endpoint, and [`ProviderChat`] for every provider that
//! `edgequake-llm` supports.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod completion;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod server;
pub mod solve;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use completion::{CompletionService, ModelReply, OpenAiChat, ProviderChat};
pub use config::{OptionLabels, ServerConfig, SolverConfig, SolverConfigBuilder};
pub use error::AnswerError;
pub use pipeline::answer::Answerer;
pub use pipeline::extract::{TesseractRecognizer, TextRecognizer};
pub use server::{create_router, serve, AppState};
pub use solve::{AnswerRequest, Solver};
