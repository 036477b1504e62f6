//! Terminal front end for Quizionix.
//!
//! Wires configuration, logging and the game session together and hands
//! control to the selected subcommand.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration from `quizionix-config.yaml` (or `--config`)
//! 3. Initialize structured logging (tracing) to stderr
//! 4. Create or restore the game session
//! 5. Run the subcommand

mod cli;
mod error;
mod play;
mod render;

use std::path::Path;

use clap::Parser;
use quizionix_core::{GameConfig, GameSession, LoggingConfig, SessionSnapshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::play::PlayLoop;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, a save file or stdin fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse arguments.
    let cli = Cli::parse();

    // 2. Load configuration.
    let config = load_config(&cli.config)?;

    // 3. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        zones = config.catalog.zones.len(),
        "Configuration loaded"
    );

    // 4-5. Create the session and run the command.
    match cli.command {
        Command::Play { resume } => {
            let session = match resume {
                Some(path) => restore_session(config, &path).await?,
                None => GameSession::new(config).map_err(CliError::from)?,
            };
            PlayLoop::new(session).run().await?;
        }
        Command::Zones => {
            let session = GameSession::new(config).map_err(CliError::from)?;
            print!("{}", render::zones(&session));
        }
        Command::SmokeTest { json } => {
            let session = GameSession::new(config).map_err(CliError::from)?;
            let report = session.run_content_smoke_test().map_err(CliError::from)?;
            if json {
                let text = serde_json::to_string_pretty(&report).map_err(|e| {
                    CliError::Serialization {
                        message: e.to_string(),
                    }
                })?;
                println!("{text}");
            } else {
                print!("{}", render::smoke_test(&report));
            }
            if !report.pass {
                anyhow::bail!("content smoke test failed");
            }
        }
    }

    Ok(())
}

/// Load the configuration file, falling back to defaults (plus environment
/// overrides) when it does not exist.
fn load_config(path: &Path) -> Result<GameConfig, CliError> {
    if path.exists() {
        Ok(GameConfig::from_file(path)?)
    } else {
        let mut config = GameConfig::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured
/// level; output goes to stderr so the game transcript stays on stdout.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Restore a session from a save file.
async fn restore_session(config: GameConfig, path: &Path) -> Result<GameSession, CliError> {
    let json = tokio::fs::read_to_string(path).await?;
    let snapshot = SessionSnapshot::from_json(&json)?;
    let session = GameSession::restore(config, snapshot)?;
    info!(
        path = %path.display(),
        session = %session.session_id(),
        "Save file restored"
    );
    Ok(session)
}
