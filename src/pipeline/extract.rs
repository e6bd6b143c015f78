//! Text extraction: `DynamicImage` → raw OCR text.
//!
//! The OCR engine is an opaque dependency behind [`TextRecognizer`]. The
//! shipped backend shells out to the `tesseract` command-line tool in its
//! default mode: no language hint, no page-segmentation hint.

use crate::error::AnswerError;
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// An OCR engine that turns an image into text with embedded line breaks.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Engine name for logs and error messages.
    fn name(&self) -> &str;

    /// Recognise the text in `image`. Called once per request; no retries.
    async fn recognize(&self, image: &DynamicImage) -> Result<String, AnswerError>;
}

/// Tesseract OCR via its command-line binary.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: OsString,
}

impl TesseractRecognizer {
    /// Use `tesseract` from `PATH`.
    pub fn new() -> Self {
        Self {
            binary: OsString::from("tesseract"),
        }
    }

    /// Use a specific tesseract executable.
    pub fn with_binary(binary: impl Into<OsString>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn display_name(&self) -> String {
        self.binary.to_string_lossy().into_owned()
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &DynamicImage) -> Result<String, AnswerError> {
        let start = Instant::now();

        // tesseract only reads from disk; the temp file is removed on drop.
        let file = tempfile::Builder::new()
            .prefix("apex-ocr-")
            .suffix(".png")
            .tempfile()?;
        image
            .save_with_format(file.path(), ImageFormat::Png)
            .map_err(|e| AnswerError::Internal(format!("writing OCR input: {e}")))?;

        let output = Command::new(&self.binary)
            .arg(file.path())
            .arg("stdout")
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AnswerError::OcrUnavailable {
                    engine: self.display_name(),
                    hint: "binary not found (install tesseract-ocr)".to_string(),
                });
            }
            Err(e) => return Err(AnswerError::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnswerError::OcrFailed {
                detail: format!("tesseract exited with {}: {}", output.status, stderr.trim()),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(
            "tesseract: {} chars in {:?}",
            text.len(),
            start.elapsed()
        );
        Ok(text)
    }
}
