//! Visionary CLI - accessibility assistant for image understanding.
//!
//! Upload an image, run one of three features, and optionally listen to
//! the result:
//!
//! ```bash
//! # Describe a photo
//! visionary run photo.jpg --feature scene
//!
//! # Read the text on a label aloud
//! visionary run label.png --feature read-text --listen
//!
//! # Guided interactive mode
//! visionary
//!
//! # View configuration
//! visionary config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Visionary - empowering vision through AI.
#[derive(Parser, Debug)]
#[command(name = "visionary")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a feature against an image
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI overrides.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match visionary_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `visionary config path`."
            );
            visionary_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Visionary v{}", visionary_core::VERSION);

    match cli.command {
        Some(Commands::Run(args)) => cli::run::execute(args, config).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
        None => cli::interactive::run(config).await,
    }
}
