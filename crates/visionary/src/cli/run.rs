//! The `visionary run` command: one-shot feature execution.

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use visionary_core::{Config, Feature, Visionary};

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image file to analyze (JPEG or PNG)
    #[arg(required = true)]
    pub image: PathBuf,

    /// Feature to run
    #[arg(short, long, value_enum)]
    pub feature: FeatureArg,

    /// Narrate the result after printing it (Ctrl-C stops narration)
    #[arg(long)]
    pub listen: bool,
}

/// CLI names for the three features.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FeatureArg {
    /// Describe the visual content of the image
    Scene,
    /// Extract the text in the image
    ReadText,
    /// Suggest actionable tasks based on the image
    Assist,
}

impl From<FeatureArg> for Feature {
    fn from(arg: FeatureArg) -> Self {
        match arg {
            FeatureArg::Scene => Feature::SceneUnderstanding,
            FeatureArg::ReadText => Feature::TextToSpeech,
            FeatureArg::Assist => Feature::PersonalizedAssistance,
        }
    }
}

/// Spinner shown while a model-backed feature is generating.
pub(crate) fn spinner(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

pub(crate) fn progress_message(feature: Feature) -> Option<&'static str> {
    match feature {
        Feature::SceneUnderstanding => Some("Analyzing the scene..."),
        Feature::PersonalizedAssistance => Some("Generating personalized assistance..."),
        // OCR-only, fast enough that a spinner would just flicker
        Feature::TextToSpeech => None,
    }
}

/// Execute the run command.
pub async fn execute(args: RunArgs, config: Config) -> anyhow::Result<()> {
    let feature = Feature::from(args.feature);
    let assistant = Visionary::new(config)?;

    let decoded = assistant.decoder().decode_path(&args.image).await?;
    tracing::debug!(
        width = decoded.width,
        height = decoded.height,
        format = ?decoded.format,
        "Image decoded"
    );

    let bar = progress_message(feature).map(spinner);
    let result = assistant.run(&decoded.image, feature).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    println!("{}", result.text);

    if args.listen {
        let player = Arc::new(assistant.speech_player()?);

        // Narration blocks this task; Ctrl-C stops it from another.
        let stopper = Arc::clone(&player);
        let signal = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stopper.stop();
            }
        });

        eprintln!("Narrating (press Ctrl-C to stop)...");
        if let Err(e) = player.play(&result.text).await {
            tracing::warn!("Narration failed: {e}");
        }
        signal.abort();
    }

    Ok(())
}
