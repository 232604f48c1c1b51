//! OCR extraction with fail-soft normalization.
//!
//! The engine itself sits behind the [`OcrEngine`] trait so tests can
//! substitute a scripted implementation. The [`OcrAdapter`] wrapper is the
//! only thing the orchestrator talks to, and it never fails: an engine
//! error is logged and normalized to an empty extraction, which callers
//! treat as "no text detected". Engine failure is deliberately
//! indistinguishable from a genuinely text-free image; the log line is
//! the only place the difference survives.

pub(crate) mod tesseract;

pub use tesseract::TesseractOcr;

use crate::error::PipelineError;
use crate::types::Extraction;
use image::DynamicImage;
use std::sync::Arc;

/// Trait for OCR engines.
///
/// Implementations are synchronous; the adapter moves the call onto a
/// blocking thread.
pub trait OcrEngine: Send + Sync {
    /// Engine name for logging (e.g., "tesseract").
    fn name(&self) -> &str;

    /// Extract all recognizable text from the image.
    fn recognize(&self, image: &DynamicImage) -> Result<String, PipelineError>;
}

/// Fail-soft wrapper around an OCR engine.
pub struct OcrAdapter {
    engine: Arc<dyn OcrEngine>,
}

impl OcrAdapter {
    pub fn new(engine: Box<dyn OcrEngine>) -> Self {
        Self {
            engine: Arc::from(engine),
        }
    }

    /// Extract text from the image. Never fails: engine errors come back
    /// as an empty extraction.
    pub async fn extract(&self, image: &DynamicImage) -> Extraction {
        let engine = self.engine.clone();
        let image = image.clone();

        let result =
            tokio::task::spawn_blocking(move || engine.recognize(&image).map(Extraction::new))
                .await;

        match result {
            Ok(Ok(extraction)) => {
                tracing::debug!(
                    engine = self.engine.name(),
                    chars = extraction.as_str().len(),
                    "OCR extraction complete"
                );
                extraction
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    engine = self.engine.name(),
                    "OCR failed, treating as no text detected: {e}"
                );
                Extraction::empty()
            }
            Err(e) => {
                tracing::warn!("OCR task panicked, treating as no text detected: {e}");
                Extraction::empty()
            }
        }
    }
}
