//! Whole-request entry points.
//!
//! A [`Solver`] owns one OCR engine and one [`Answerer`] and runs the four
//! pipeline stages in order for each request. It holds no per-request state,
//! so a single `Arc<Solver>` is shared by every HTTP handler invocation.

use crate::config::{OptionLabels, SolverConfig};
use crate::error::AnswerError;
use crate::pipeline::answer::Answerer;
use crate::pipeline::extract::TextRecognizer;
use crate::pipeline::{decode, preprocess};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// JSON body accepted by `POST /get_answer`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerRequest {
    /// Screenshot as base64, optionally with a `data:image/…;base64,` prefix.
    #[serde(default)]
    pub image: Option<String>,
}

/// Runs decode → OCR → preprocess → answer.
pub struct Solver {
    recognizer: Arc<dyn TextRecognizer>,
    answerer: Answerer,
    labels: OptionLabels,
}

impl Solver {
    pub fn new(recognizer: Arc<dyn TextRecognizer>, answerer: Answerer) -> Self {
        let labels = answerer.config().option_labels;
        Self {
            recognizer,
            answerer,
            labels,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        self.answerer.config()
    }

    /// Answer a raw HTTP request body (`{"image": "..."}`).
    pub async fn solve_request(&self, body: &[u8]) -> Result<String, AnswerError> {
        let request: AnswerRequest =
            serde_json::from_slice(body).map_err(|e| AnswerError::InvalidRequest {
                detail: format!("{e}"),
            })?;
        let image = request.image.ok_or(AnswerError::MissingImage)?;
        self.solve(&image).await
    }

    /// Answer a base64 / data-URI image payload.
    pub async fn solve(&self, payload: &str) -> Result<String, AnswerError> {
        // Decoding a multi-megapixel screenshot is CPU work; keep it off
        // the async workers.
        let owned = payload.to_string();
        let image = tokio::task::spawn_blocking(move || decode::decode_image(&owned))
            .await
            .map_err(|e| AnswerError::Internal(format!("decode task failed: {e}")))??;

        self.solve_image(&image).await
    }

    /// Answer an already-decoded image.
    pub async fn solve_image(&self, image: &DynamicImage) -> Result<String, AnswerError> {
        let start = Instant::now();

        // ── Step 1: OCR ──────────────────────────────────────────────────
        let text = self.recognizer.recognize(image).await?;
        info!("Extracted text: {}", text);

        // ── Step 2: Prompt ───────────────────────────────────────────────
        let prompt = preprocess::preprocess(&text, self.labels);
        info!("Preprocessed text: {}", prompt);

        // ── Step 3: Model ────────────────────────────────────────────────
        let answer = self.answerer.answer(&prompt).await?;
        info!("Final answer: {}", answer);
        debug!(
            "Solved with {} in {:?}",
            self.recognizer.name(),
            start.elapsed()
        );

        Ok(answer)
    }
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("recognizer", &self.recognizer.name())
            .field("answerer", &self.answerer)
            .field("labels", &self.labels)
            .finish()
    }
}
