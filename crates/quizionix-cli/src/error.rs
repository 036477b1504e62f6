//! Error types for the Quizionix binary.
//!
//! [`CliError`] wraps every failure that can reach `main`: configuration,
//! snapshot and research export errors from the library crates, plus file
//! and terminal I/O.

/// Top-level error for the Quizionix binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: quizionix_core::ConfigError,
    },

    /// The game session rejected an operation.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: quizionix_core::EngineError,
    },

    /// A save file could not be read or restored.
    #[error("snapshot error: {source}")]
    Snapshot {
        /// The underlying snapshot error.
        #[from]
        source: quizionix_core::SnapshotError,
    },

    /// The research log could not be exported.
    #[error("research export error: {source}")]
    Research {
        /// The underlying research error.
        #[from]
        source: quizionix_research::ResearchError,
    },

    /// Reading stdin or writing a file failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Report serialization failed.
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of the failure.
        message: String,
    },
}
