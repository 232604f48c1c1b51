//! Visionary Core - accessibility assistant library.
//!
//! Visionary helps visually impaired users understand images: it runs OCR
//! on an uploaded image, routes the extraction through one of three
//! features, and produces displayable (and narratable) text.
//!
//! # Architecture
//!
//! ```text
//! Image → Decode → OCR → Prompt template → Gemini → Text → (optional) Narration
//! ```
//!
//! The text-to-speech feature short-circuits after OCR; the other two
//! features go through the prompt builder and model client. Every external
//! call is fail-soft: OCR errors become an empty extraction, model errors
//! become a fixed fallback string, so a feature invocation never fails.
//!
//! # Usage
//!
//! ```rust,ignore
//! use visionary_core::{Config, Feature, ImageDecoder, Visionary};
//!
//! #[tokio::main]
//! async fn main() -> visionary_core::Result<()> {
//!     let config = Config::load()?;
//!     let assistant = Visionary::new(config)?;
//!
//!     let decoded = assistant.decoder().decode_path("./label.jpg".as_ref()).await?;
//!     let result = assistant.run(&decoded.image, Feature::SceneUnderstanding).await;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod credentials;
pub mod decode;
pub mod error;
pub mod llm;
pub mod ocr;
pub mod prompt;
pub mod session;
pub mod speech;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use credentials::Credential;
pub use decode::{DecodedImage, ImageDecoder};
pub use error::{ConfigError, PipelineError, PipelineResult, Result, VisionaryError};
pub use llm::{ChatModel, GeminiChat, ModelClient};
pub use ocr::{OcrAdapter, OcrEngine, TesseractOcr};
pub use prompt::{FeatureKind, PromptRequest};
pub use session::{Action, Session, SessionState};
pub use speech::{GeminiSpeech, SpeechPlayer, SpeechSynthesizer};
pub use types::{Extraction, Feature, FeatureResult};

use image::DynamicImage;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shown for the text-to-speech feature when OCR finds nothing.
pub const NO_TEXT_MESSAGE: &str = "No text detected in the image.";

/// The orchestrator: owns the OCR adapter and model client and runs the
/// per-request pipeline. One instance serves the whole process; images are
/// borrowed for a single invocation and never retained.
pub struct Visionary {
    config: Config,
    // Loaded once at startup, immutable for the process lifetime. None
    // only when components are injected (tests), which never synthesize.
    credential: Option<Credential>,
    ocr: OcrAdapter,
    model: ModelClient,
}

impl Visionary {
    /// Build the assistant from configuration.
    ///
    /// Loads the API key first; a missing credential halts construction
    /// before any dependent component exists.
    pub fn new(config: Config) -> Result<Self> {
        let credential = Credential::load(&config.key_file())?;
        tracing::debug!("Initializing Visionary v{VERSION}");

        let ocr = OcrAdapter::new(Box::new(TesseractOcr::new(config.ocr.clone())));
        let model = ModelClient::new(Box::new(GeminiChat::new(
            &credential,
            &config.llm,
            config.limits.llm_timeout_ms,
        )));

        Ok(Self {
            config,
            credential: Some(credential),
            ocr,
            model,
        })
    }

    /// Build from injected components. Used by tests to substitute
    /// scripted OCR engines and model providers.
    pub fn with_components(
        config: Config,
        ocr: Box<dyn OcrEngine>,
        model: Box<dyn ChatModel>,
    ) -> Self {
        Self {
            config,
            credential: None,
            ocr: OcrAdapter::new(ocr),
            model: ModelClient::new(model),
        }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// An image decoder configured with this assistant's limits.
    pub fn decoder(&self) -> ImageDecoder {
        ImageDecoder::new(self.config.limits.clone())
    }

    /// Build a speech player for narration, reusing the startup
    /// credential. One player per session.
    pub fn speech_player(&self) -> Result<SpeechPlayer> {
        let credential = match &self.credential {
            Some(credential) => credential.clone(),
            None => Credential::load(&self.config.key_file())?,
        };
        let synth = GeminiSpeech::new(
            &credential,
            &self.config.speech,
            self.config.limits.speech_timeout_ms,
        );
        Ok(SpeechPlayer::new(Box::new(synth)))
    }

    /// Run one feature against one image: OCR, then either the extraction
    /// itself (text-to-speech) or a prompted model completion. Never
    /// fails; every error path terminates in displayable text.
    pub async fn run(&self, image: &DynamicImage, feature: Feature) -> FeatureResult {
        let extraction = self.ocr.extract(image).await;
        tracing::info!(
            feature = %feature,
            text_detected = !extraction.is_empty(),
            "Running feature"
        );

        let text = match feature {
            Feature::TextToSpeech => {
                if extraction.is_empty() {
                    NO_TEXT_MESSAGE.to_string()
                } else {
                    extraction.into_text()
                }
            }
            Feature::SceneUnderstanding => {
                let request = prompt::build(FeatureKind::SceneUnderstanding, &extraction);
                self.model
                    .complete(FeatureKind::SceneUnderstanding, &request)
                    .await
            }
            Feature::PersonalizedAssistance => {
                let request = prompt::build(FeatureKind::PersonalizedAssistance, &extraction);
                self.model
                    .complete(FeatureKind::PersonalizedAssistance, &request)
                    .await
            }
        };

        FeatureResult { feature, text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
