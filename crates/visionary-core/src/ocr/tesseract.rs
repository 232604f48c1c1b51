//! Tesseract OCR engine via the `rusty-tesseract` bridge.

use super::OcrEngine;
use crate::config::OcrConfig;
use crate::error::PipelineError;
use image::DynamicImage;

/// OCR engine backed by a locally installed Tesseract.
pub struct TesseractOcr {
    config: OcrConfig,
}

impl TesseractOcr {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    fn args(&self) -> rusty_tesseract::Args {
        rusty_tesseract::Args {
            lang: self.config.language.clone(),
            psm: Some(self.config.page_seg_mode),
            ..rusty_tesseract::Args::default()
        }
    }
}

impl OcrEngine for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String, PipelineError> {
        let input =
            rusty_tesseract::Image::from_dynamic_image(image).map_err(|e| PipelineError::Ocr {
                message: format!("Failed to prepare image for Tesseract: {e}"),
            })?;

        rusty_tesseract::image_to_string(&input, &self.args()).map_err(|e| PipelineError::Ocr {
            message: format!("Tesseract recognition failed: {e}"),
        })
    }
}
