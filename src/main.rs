//! Saga CLI entry point.

use anyhow::Result;
use clap::Parser;
use saga::cli::{commands, Cli, Commands};
use saga::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Pick up API keys from a .env file, if present.
    dotenvy::dotenv().ok();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("saga={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Recap { audio_file } => {
            commands::run_recap(audio_file, settings).await?;
        }

        Commands::Combine { copy, output } => {
            commands::run_combine(*copy, output.clone(), settings)?;
        }

        Commands::Campaign => {
            commands::run_campaign(settings).await?;
        }

        Commands::Ask { session, prompt } => {
            commands::run_ask(session, prompt.clone(), settings).await?;
        }

        Commands::Join {
            first,
            second,
            output,
        } => {
            commands::run_join(first, second, output, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
