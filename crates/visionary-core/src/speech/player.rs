//! Blocking narration with cross-task stop.
//!
//! `play` holds the caller until narration finishes; `stop` is therefore
//! only effective from a different task than the one awaiting `play`.
//! The playback flag is atomic because the runtime is multi-threaded and
//! `stop` can race the tail of `play`.

use super::{AudioClip, SpeechSynthesizer};
use crate::error::{PipelineError, PipelineResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Playback controller: one instance per session, injected, never global.
///
/// Invariant: at most one playback is active; the flag is set for the full
/// duration of `play` (including synthesis) and cleared on every exit
/// path.
pub struct SpeechPlayer {
    synth: Arc<dyn SpeechSynthesizer>,
    playing: Arc<AtomicBool>,
    active: Arc<Mutex<Option<Arc<rodio::Sink>>>>,
}

impl SpeechPlayer {
    pub fn new(synth: Box<dyn SpeechSynthesizer>) -> Self {
        Self {
            synth: Arc::from(synth),
            playing: Arc::new(AtomicBool::new(false)),
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// Whether a narration is currently in flight.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Narrate the text, blocking until playback completes or `stop` is
    /// called from another task. The playing flag is active for the whole
    /// call and inactive immediately after return, for all inputs
    /// including the empty string.
    pub async fn play(&self, text: &str) -> PipelineResult<()> {
        self.playing.store(true, Ordering::SeqCst);
        let result = self.play_inner(text).await;
        lock(&self.active).take();
        self.playing.store(false, Ordering::SeqCst);
        if let Err(e) = &result {
            tracing::warn!(engine = self.synth.name(), "Narration failed: {e}");
        }
        result
    }

    async fn play_inner(&self, text: &str) -> PipelineResult<()> {
        let clip = self.synth.synthesize(text).await?;
        if clip.samples.is_empty() {
            return Ok(());
        }
        // stop() during synthesis clears the flag before any sink
        // exists; honor it instead of starting unstoppable playback.
        if !self.playing.load(Ordering::SeqCst) {
            return Ok(());
        }

        let active = self.active.clone();
        tokio::task::spawn_blocking(move || play_clip(clip, &active))
            .await
            .map_err(|e| PipelineError::Speech {
                message: format!("Playback task failed: {e}"),
            })?
    }

    /// Stop the current narration, if any. A no-op when nothing is
    /// playing.
    pub fn stop(&self) {
        if self.playing.swap(false, Ordering::SeqCst) {
            if let Some(sink) = lock(&self.active).take() {
                sink.stop();
            }
        }
    }
}

/// Run a clip through an audio sink, blocking until it drains or is
/// stopped. Runs on a blocking thread; the sink is shared through the
/// player so `stop` can reach it.
fn play_clip(clip: AudioClip, active: &Mutex<Option<Arc<rodio::Sink>>>) -> PipelineResult<()> {
    let (_stream, handle) =
        rodio::OutputStream::try_default().map_err(|e| PipelineError::Speech {
            message: format!("No audio output device: {e}"),
        })?;
    let sink = Arc::new(rodio::Sink::try_new(&handle).map_err(|e| PipelineError::Speech {
        message: format!("Failed to open audio sink: {e}"),
    })?);

    *lock(active) = Some(sink.clone());
    sink.append(rodio::buffer::SamplesBuffer::new(
        clip.channels,
        clip.sample_rate,
        clip.samples,
    ));
    // Returns early if stop() drains the sink from another thread.
    sink.sleep_until_end();
    Ok(())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
