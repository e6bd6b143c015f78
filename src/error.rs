//! Error type for the apex-vision library.
//!
//! Every pipeline stage returns `Result<_, AnswerError>`. The variants keep
//! the failing stage visible in logs, but callers of the HTTP API never see
//! that distinction: the server turns any `AnswerError` into a single
//! `500 {"error": "<Display text>"}` response.
//!
//! Note that the "couldn't determine a clear answer" fallback is **not** an
//! error. A reply without the expected prefix is a successful answer.

use thiserror::Error;

/// All failures produced by the answer pipeline.
#[derive(Debug, Error)]
pub enum AnswerError {
    // ── Request errors ────────────────────────────────────────────────────
    /// Request body was not a JSON object.
    #[error("Invalid request body: {detail}")]
    InvalidRequest { detail: String },

    /// Request body had no `image` field.
    #[error("Request body has no 'image' field")]
    MissingImage,

    /// The `image` field was present but empty.
    #[error("Image payload is empty")]
    EmptyImage,

    // ── Decode errors ─────────────────────────────────────────────────────
    /// Payload (after stripping the data-URI prefix) is not valid base64.
    #[error("Invalid base64 image data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// Bytes decoded fine but are not a recognisable image.
    #[error("Cannot identify image data: {0}")]
    ImageDecode(#[from] image::ImageError),

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR engine is not installed or not on PATH.
    #[error("OCR engine '{engine}' is not available: {hint}")]
    OcrUnavailable { engine: String, hint: String },

    /// The OCR engine ran but reported a failure.
    #[error("OCR failed: {detail}")]
    OcrFailed { detail: String },

    // ── Completion errors ─────────────────────────────────────────────────
    /// Network-level failure talking to the completion service.
    #[error("Completion request failed: {0}")]
    CompletionRequest(#[from] reqwest::Error),

    /// Completion service answered with a non-success HTTP status.
    #[error("Completion service returned HTTP {status}: {body}")]
    CompletionStatus { status: u16, body: String },

    /// An edgequake-llm provider call failed.
    #[error("LLM provider '{provider}' error: {detail}")]
    ProviderError { provider: String, detail: String },

    /// Completion reply did not have the expected shape.
    #[error("Malformed completion reply: {detail}")]
    MalformedReply { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// The configured provider could not be created (missing key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
