//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Adaptive learning quiz in the terminal.
#[derive(Debug, Parser)]
#[command(name = "quizionix", version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "quizionix-config.yaml")]
    pub config: PathBuf,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play interactively
    Play {
        /// Resume from a save file written by the `save` command
        #[arg(short, long)]
        resume: Option<PathBuf>,
    },

    /// List zones and branches of the configured catalog
    Zones,

    /// Check that the content bank covers Science/Physics
    SmokeTest {
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_flag_defaults_to_repo_file() {
        let cli = Cli::try_parse_from(["quizionix", "zones"]).expect("zones parses");
        assert_eq!(cli.config, PathBuf::from("quizionix-config.yaml"));
    }

    #[test]
    fn play_accepts_resume_file() {
        let cli = Cli::try_parse_from(["quizionix", "play", "--resume", "save.json"])
            .expect("play --resume parses");
        assert!(matches!(
            cli.command,
            Command::Play { resume: Some(ref p) } if p == &PathBuf::from("save.json")
        ));
    }
}
