//! Pipeline stages for answering a question screenshot.
//!
//! Each submodule implements exactly one transformation step, and every
//! step returns `Result<_, AnswerError>` so the caller handles failure in
//! one place.
//!
//! ## Data Flow
//!
//! ```text
//! decode ──▶ extract ──▶ preprocess ──▶ answer
//! (base64)   (OCR)       (prompt)       (LLM)
//! ```
//!
//! 1. [`decode`]     — strip the data-URI prefix, base64-decode, sniff the
//!    image container
//! 2. [`extract`]    — run the OCR engine over the image
//! 3. [`preprocess`] — split question from options, optionally label them
//! 4. [`answer`]     — call the completion model and pull the answer out of
//!    its reply; the only stage with network I/O

pub mod answer;
pub mod decode;
pub mod extract;
pub mod preprocess;
