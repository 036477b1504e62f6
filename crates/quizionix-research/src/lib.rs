//! Research telemetry for Quizionix.
//!
//! Every answer evaluation produces one [`ResearchLogEntry`] appended to the
//! session's [`ResearchLog`]. The log is observational: gameplay never reads
//! it back, and nothing that goes wrong here changes game state.
//!
//! # Architecture
//!
//! - [`entry`] -- The [`ResearchEntryBuilder`] for sanitized entry construction.
//! - [`log`] -- The [`ResearchLog`]: append-only, sequence-numbered.
//! - [`summary`] -- Aggregates and the versioned JSON export.
//!
//! # Usage
//!
//! ```
//! use quizionix_research::{ResearchEntryBuilder, ResearchLog};
//! use quizionix_types::{
//!     BranchId, ChallengeId, DifficultyTier, EncounterType, QuestionType, ZoneId,
//! };
//!
//! let mut log = ResearchLog::new();
//! let builder = ResearchEntryBuilder::new(
//!     ChallengeId::new(),
//!     ZoneId::from("science"),
//!     BranchId::from("physics"),
//! )
//! .challenge_kind(DifficultyTier::Beginner, EncounterType::Normal, QuestionType::Text)
//! .timing(5.0, 22.0)
//! .outcome(true)
//! .knowledge_health(90.0, 98.0);
//!
//! assert!(log.record(builder).is_ok());
//! assert_eq!(log.len(), 1);
//! ```
//!
//! [`ResearchLogEntry`]: quizionix_types::ResearchLogEntry

pub mod entry;
pub mod log;
pub mod summary;

// Re-export primary types at crate root.
pub use entry::ResearchEntryBuilder;
pub use log::ResearchLog;
pub use summary::{EXPORT_SCHEMA_VERSION, export, export_json, summarize};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording or exporting research data.
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The log is full; the sequence counter would overflow.
    #[error("research log sequence overflow")]
    SequenceOverflow,

    /// The export could not be serialized.
    #[error("research export serialization failed: {0}")]
    Serialization(String),
}
