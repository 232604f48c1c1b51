//! Speech synthesis and playback for result narration.
//!
//! Synthesis sits behind the [`SpeechSynthesizer`] trait (the Gemini TTS
//! provider in production, scripted clips in tests). The [`SpeechPlayer`]
//! owns the single playback-in-flight flag and the active audio sink, one
//! player instance per session.

pub(crate) mod gemini;
pub(crate) mod player;

pub use gemini::GeminiSpeech;
pub use player::SpeechPlayer;

use crate::error::PipelineError;
use async_trait::async_trait;

/// Synthesized audio ready for playback.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Interleaved signed 16-bit PCM samples
    pub samples: Vec<i16>,
    /// Channel count (Gemini TTS produces mono)
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioClip {
    /// A zero-length clip; playing it completes immediately.
    pub fn silent() -> Self {
        Self {
            samples: Vec::new(),
            channels: 1,
            sample_rate: 24_000,
        }
    }
}

/// Trait implemented by speech synthesis engines.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Engine name for logging (e.g., "gemini-tts").
    fn name(&self) -> &str;

    /// Render the text as an audio clip.
    async fn synthesize(&self, text: &str) -> Result<AudioClip, PipelineError>;
}
