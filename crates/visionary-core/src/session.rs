//! Per-user session: an explicit state machine driven by user actions.
//!
//! Each user action (upload, feature button, listen, stop) arrives as an
//! [`Action`] passed to [`Session::handle`], which owns all transitions:
//!
//! ```text
//! Idle → ImageLoaded → {Describing | Extracting | Assisting} → ResultReady
//!                                             ResultReady → Narrating → ResultReady
//! ```
//!
//! A decode failure surfaces its error and returns the session to `Idle`.
//! Feature runs cannot fail (the pipeline is fail-soft end to end), so
//! every feature action terminates in `ResultReady`. One request runs at a
//! time; there is no concurrency within a session beyond `stop`, which may
//! be invoked from another task while `Listen` blocks on narration.

use crate::error::{Result, VisionaryError};
use crate::speech::SpeechPlayer;
use crate::types::{Feature, FeatureResult};
use crate::{ImageDecoder, Visionary};
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No image loaded
    Idle,
    /// An image is loaded and awaiting a feature selection
    ImageLoaded,
    /// Scene understanding in flight
    Describing,
    /// Text extraction in flight
    Extracting,
    /// Personalized assistance in flight
    Assisting,
    /// A result is available for display and narration
    ResultReady,
    /// Narration in flight
    Narrating,
}

/// A single user action against the session.
#[derive(Debug, Clone)]
pub enum Action {
    /// Upload: decode the image at this path
    LoadImage(PathBuf),
    /// One of the three feature buttons
    RunFeature(Feature),
    /// Narrate the current result
    Listen,
    /// Stop narration (no-op when nothing is playing)
    Stop,
    /// Discard the image and result
    Reset,
}

/// One interactive session: holds the loaded image, the latest result,
/// and an injected playback controller. Nothing is persisted across
/// sessions.
pub struct Session {
    assistant: Arc<Visionary>,
    player: Arc<SpeechPlayer>,
    decoder: ImageDecoder,
    image: Option<DynamicImage>,
    result: Option<FeatureResult>,
    state: SessionState,
}

impl Session {
    pub fn new(assistant: Arc<Visionary>, player: SpeechPlayer) -> Self {
        let decoder = assistant.decoder();
        Self {
            assistant,
            player: Arc::new(player),
            decoder,
            image: None,
            result: None,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The latest feature result, if any.
    pub fn result(&self) -> Option<&FeatureResult> {
        self.result.as_ref()
    }

    /// Handle to the playback controller, for stopping narration from a
    /// different task than the one blocked in `Listen`.
    pub fn player(&self) -> Arc<SpeechPlayer> {
        Arc::clone(&self.player)
    }

    /// Apply one user action. Returns the new feature result for
    /// `RunFeature`, `None` for everything else.
    pub async fn handle(&mut self, action: Action) -> Result<Option<FeatureResult>> {
        match action {
            Action::LoadImage(path) => match self.decoder.decode_path(&path).await {
                Ok(decoded) => {
                    tracing::info!(
                        path = %path.display(),
                        width = decoded.width,
                        height = decoded.height,
                        "Image loaded"
                    );
                    self.image = Some(decoded.image);
                    self.result = None;
                    self.state = SessionState::ImageLoaded;
                    Ok(None)
                }
                Err(e) => {
                    self.image = None;
                    self.result = None;
                    self.state = SessionState::Idle;
                    Err(e.into())
                }
            },

            Action::RunFeature(feature) => {
                let image = self.image.clone().ok_or_else(|| {
                    VisionaryError::InvalidAction(
                        "load an image before selecting a feature".to_string(),
                    )
                })?;
                self.state = busy_state(feature);
                let result = self.assistant.run(&image, feature).await;
                self.result = Some(result.clone());
                self.state = SessionState::ResultReady;
                Ok(Some(result))
            }

            Action::Listen => {
                let result = self.result.clone().ok_or_else(|| {
                    VisionaryError::InvalidAction("no result to narrate".to_string())
                })?;
                self.state = SessionState::Narrating;
                let outcome = self.player.play(&result.text).await;
                self.state = SessionState::ResultReady;
                outcome?;
                Ok(None)
            }

            Action::Stop => {
                self.player.stop();
                if self.state == SessionState::Narrating {
                    self.state = SessionState::ResultReady;
                }
                Ok(None)
            }

            Action::Reset => {
                self.image = None;
                self.result = None;
                self.state = SessionState::Idle;
                Ok(None)
            }
        }
    }
}

fn busy_state(feature: Feature) -> SessionState {
    match feature {
        Feature::SceneUnderstanding => SessionState::Describing,
        Feature::TextToSpeech => SessionState::Extracting,
        Feature::PersonalizedAssistance => SessionState::Assisting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, PipelineResult};
    use crate::ocr::OcrEngine;
    use crate::prompt::PromptRequest;
    use crate::speech::{AudioClip, SpeechSynthesizer};
    use crate::{ChatModel, Config, NO_TEXT_MESSAGE};
    use async_trait::async_trait;
    use image::ImageFormat;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedOcr(Option<&'static str>);

    impl OcrEngine for ScriptedOcr {
        fn name(&self) -> &str {
            "scripted"
        }
        fn recognize(&self, _image: &DynamicImage) -> PipelineResult<String> {
            match self.0 {
                Some(text) => Ok(text.to_string()),
                None => Err(PipelineError::Ocr {
                    message: "no engine".to_string(),
                }),
            }
        }
    }

    /// Records every prompt it receives; replies with a fixed narrative or
    /// a simulated provider failure.
    struct ScriptedModel {
        prompts: Arc<Mutex<Vec<PromptRequest>>>,
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }
        async fn complete(&self, prompt: &PromptRequest) -> PipelineResult<String> {
            self.prompts.lock().unwrap().push(prompt.clone());
            match self.reply {
                Some(text) => Ok(text.to_string()),
                None => Err(PipelineError::Model {
                    message: "simulated timeout".to_string(),
                    status_code: None,
                }),
            }
        }
        fn timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
    }

    struct SilentSynth;

    #[async_trait]
    impl SpeechSynthesizer for SilentSynth {
        fn name(&self) -> &str {
            "silent"
        }
        async fn synthesize(&self, _text: &str) -> PipelineResult<AudioClip> {
            Ok(AudioClip::silent())
        }
    }

    fn session(
        ocr: Option<&'static str>,
        reply: Option<&'static str>,
    ) -> (Session, Arc<Mutex<Vec<PromptRequest>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let assistant = Visionary::with_components(
            Config::default(),
            Box::new(ScriptedOcr(ocr)),
            Box::new(ScriptedModel {
                prompts: prompts.clone(),
                reply,
            }),
        );
        let player = SpeechPlayer::new(Box::new(SilentSynth));
        (Session::new(Arc::new(assistant), player), prompts)
    }

    fn write_png(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("upload.png");
        let img = DynamicImage::new_rgb8(12, 12);
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[tokio::test]
    async fn test_scene_understanding_without_text() {
        // A photograph with no text: the text-absent template is sent and
        // a non-empty narrative comes back.
        let dir = tempfile::tempdir().unwrap();
        let (mut session, prompts) = session(Some(""), Some("A wooden park bench under a tree."));

        session
            .handle(Action::LoadImage(write_png(&dir)))
            .await
            .unwrap();
        assert_eq!(session.state(), SessionState::ImageLoaded);

        let result = session
            .handle(Action::RunFeature(Feature::SceneUnderstanding))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(session.state(), SessionState::ResultReady);
        assert!(!result.text.is_empty());
        assert_eq!(result.text, "A wooden park bench under a tree.");

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(!prompts[0].human.contains("text extracted from the image"));
    }

    #[tokio::test]
    async fn test_text_to_speech_returns_extraction_without_model_call() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, prompts) = session(Some("Take 1 tablet twice daily"), Some("unused"));

        session
            .handle(Action::LoadImage(write_png(&dir)))
            .await
            .unwrap();
        let result = session
            .handle(Action::RunFeature(Feature::TextToSpeech))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.text, "Take 1 tablet twice daily");
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_text_to_speech_with_no_text() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, prompts) = session(Some("   "), Some("unused"));

        session
            .handle(Action::LoadImage(write_png(&dir)))
            .await
            .unwrap();
        let result = session
            .handle(Action::RunFeature(Feature::TextToSpeech))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.text, NO_TEXT_MESSAGE);
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assistance_embeds_extracted_text() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, prompts) = session(
            Some("Take 1 tablet twice daily"),
            Some("Set a reminder for each dose."),
        );

        session
            .handle(Action::LoadImage(write_png(&dir)))
            .await
            .unwrap();
        let result = session
            .handle(Action::RunFeature(Feature::PersonalizedAssistance))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(result.text, "Set a reminder for each dose.");
        let prompts = prompts.lock().unwrap();
        assert!(prompts[0].human.contains("Take 1 tablet twice daily"));
    }

    #[tokio::test]
    async fn test_model_failure_yields_fallback_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _prompts) = session(Some("label"), None);

        session
            .handle(Action::LoadImage(write_png(&dir)))
            .await
            .unwrap();
        let result = session
            .handle(Action::RunFeature(Feature::SceneUnderstanding))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            result.text,
            "Unable to generate a description for the image at the moment. Please try again."
        );
        assert_eq!(session.state(), SessionState::ResultReady);
    }

    #[tokio::test]
    async fn test_ocr_failure_selects_text_absent_template() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, prompts) = session(None, Some("A description."));

        session
            .handle(Action::LoadImage(write_png(&dir)))
            .await
            .unwrap();
        session
            .handle(Action::RunFeature(Feature::PersonalizedAssistance))
            .await
            .unwrap();

        let prompts = prompts.lock().unwrap();
        assert!(!prompts[0].human.contains("text extracted from the image"));
    }

    #[tokio::test]
    async fn test_decode_failure_returns_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let (mut session, _prompts) = session(Some("x"), Some("y"));
        let err = session.handle(Action::LoadImage(path)).await.unwrap_err();
        assert!(matches!(err, VisionaryError::Pipeline(_)));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_feature_without_image_is_invalid() {
        let (mut session, _prompts) = session(Some("x"), Some("y"));
        let err = session
            .handle(Action::RunFeature(Feature::SceneUnderstanding))
            .await
            .unwrap_err();
        assert!(matches!(err, VisionaryError::InvalidAction(_)));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_listen_then_returns_to_result_ready() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _prompts) = session(Some("label text"), Some("A description."));

        session
            .handle(Action::LoadImage(write_png(&dir)))
            .await
            .unwrap();
        session
            .handle(Action::RunFeature(Feature::SceneUnderstanding))
            .await
            .unwrap();
        session.handle(Action::Listen).await.unwrap();

        assert_eq!(session.state(), SessionState::ResultReady);
        assert!(!session.player().is_playing());
    }

    #[tokio::test]
    async fn test_listen_without_result_is_invalid() {
        let (mut session, _prompts) = session(Some("x"), Some("y"));
        let err = session.handle(Action::Listen).await.unwrap_err();
        assert!(matches!(err, VisionaryError::InvalidAction(_)));
    }

    #[tokio::test]
    async fn test_stop_is_noop_when_idle() {
        let (mut session, _prompts) = session(Some("x"), Some("y"));
        session.handle(Action::Stop).await.unwrap();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, _prompts) = session(Some("text"), Some("reply"));

        session
            .handle(Action::LoadImage(write_png(&dir)))
            .await
            .unwrap();
        session
            .handle(Action::RunFeature(Feature::TextToSpeech))
            .await
            .unwrap();
        session.handle(Action::Reset).await.unwrap();

        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.result().is_none());
    }
}
