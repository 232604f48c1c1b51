//! Interactive mode — the guided experience for bare `visionary`
//! invocation.
//!
//! Prompt for an image, offer the three feature choices, display the
//! result, and offer listen/stop. Each menu selection becomes one
//! explicit `Action` against a `Session`.

use console::Style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::path::PathBuf;
use std::sync::Arc;
use visionary_core::{Action, Config, Feature, FeatureResult, Session, Visionary};

use super::run::{progress_message, spinner};

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const FEATURES: [Feature; 3] = [
    Feature::SceneUnderstanding,
    Feature::TextToSpeech,
    Feature::PersonalizedAssistance,
];

/// Entry point for interactive mode.
pub async fn run(config: Config) -> anyhow::Result<()> {
    print_banner();

    let assistant = Arc::new(Visionary::new(config)?);
    let player = assistant.speech_player()?;
    let mut session = Session::new(assistant, player);
    let theme = ColorfulTheme::default();

    'image: loop {
        let Some(path) = prompt_image_path(&theme)? else {
            break;
        };

        if let Err(e) = session.handle(Action::LoadImage(path)).await {
            let red = Style::new().for_stderr().red();
            eprintln!("{}", red.apply_to(format!("Error processing the image: {e}")));
            continue;
        }

        loop {
            let mut items: Vec<&str> = FEATURES.iter().map(|f| f.label()).collect();
            items.push("Load another image");
            items.push("Exit");

            let selection = Select::with_theme(&theme)
                .with_prompt("What would you like to do?")
                .items(&items)
                .default(0)
                .interact_opt()?;

            match selection {
                Some(i) if i < FEATURES.len() => {
                    let feature = FEATURES[i];
                    let bar = progress_message(feature).map(spinner);
                    let result = session.handle(Action::RunFeature(feature)).await?;
                    if let Some(bar) = bar {
                        bar.finish_and_clear();
                    }
                    if let Some(result) = result {
                        show_result(&result);
                        if !result_menu(&theme, &mut session).await? {
                            break 'image;
                        }
                    }
                }
                Some(i) if i == FEATURES.len() => continue 'image,
                _ => break 'image, // Exit or Ctrl+C / Esc
            }
        }
    }

    Ok(())
}

/// Ask for an image path. Returns `None` on interrupt.
fn prompt_image_path(theme: &ColorfulTheme) -> anyhow::Result<Option<PathBuf>> {
    let input = handle_interrupt(
        Input::<String>::with_theme(theme)
            .with_prompt("Upload an image (path to a JPEG or PNG)")
            .interact_text(),
    )?;

    Ok(input.map(|raw| {
        let expanded = shellexpand::tilde(raw.trim());
        PathBuf::from(expanded.into_owned())
    }))
}

/// Print the result panel.
fn show_result(result: &FeatureResult) {
    let heading = Style::new().for_stderr().cyan().bold();
    eprintln!();
    eprintln!("  {}", heading.apply_to(result.feature.heading()));
    eprintln!();
    println!("{}", result.text);
    eprintln!();
}

/// Listen/continue menu shown under a result. Returns `false` when the
/// user chose to exit.
async fn result_menu(theme: &ColorfulTheme, session: &mut Session) -> anyhow::Result<bool> {
    loop {
        let selection = Select::with_theme(theme)
            .with_prompt("Result options")
            .items(&["Listen", "Back"])
            .default(0)
            .interact_opt()?;

        match selection {
            Some(0) => narrate(session).await?,
            Some(_) => return Ok(true),
            None => return Ok(false), // Ctrl+C / Esc
        }
    }
}

/// Narrate the current result, with Ctrl-C wired to stop from a separate
/// task (narration blocks this one).
async fn narrate(session: &mut Session) -> anyhow::Result<()> {
    let player = session.player();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            player.stop();
        }
    });

    eprintln!("Narrating (press Ctrl-C to stop)...");
    if let Err(e) = session.handle(Action::Listen).await {
        tracing::warn!("Narration failed: {e}");
    }
    signal.abort();
    Ok(())
}

/// Prints the Visionary banner and feature summary to stderr.
fn print_banner() {
    let version_line = format!("Visionary AI Assistant v{}", visionary_core::VERSION);
    let tagline = "Empowering Vision Through AI";

    let inner_width = version_line.len() + 4;

    let top = format!("  ╔{:═<width$}╗", "", width = inner_width);
    let mid1 = format!("  ║{:^width$}║", version_line, width = inner_width);
    let mid2 = format!("  ║{:^width$}║", tagline, width = inner_width);
    let bot = format!("  ╚{:═<width$}╝", "", width = inner_width);

    let cyan = Style::new().for_stderr().cyan();
    let dim = Style::new().for_stderr().dim();

    eprintln!();
    eprintln!("{}", cyan.apply_to(&top));
    eprintln!("{}", cyan.apply_to(&mid1));
    eprintln!("{}", cyan.apply_to(&mid2));
    eprintln!("{}", cyan.apply_to(&bot));
    eprintln!();
    eprintln!(
        "{}",
        dim.apply_to("  Scene Understanding     describes uploaded images")
    );
    eprintln!(
        "{}",
        dim.apply_to("  Text-to-Speech          converts image text into audio")
    );
    eprintln!(
        "{}",
        dim.apply_to("  Personalized Assistance offers guidance for daily tasks")
    );
    eprintln!();
}
