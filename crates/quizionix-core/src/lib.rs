//! Challenge engine and game session for Quizionix.
//!
//! This crate composes the progression rules into a playable game: it owns
//! the configuration file format, the content provider seam, the pacing
//! clock and the [`GameSession`] facade that rendering layers drive.
//!
//! # Modules
//!
//! - [`challenge`] -- Challenge generation, answer matching and evaluation
//! - [`config`] -- YAML configuration with environment overrides ([`GameConfig`])
//! - [`content`] -- The [`ContentProvider`] trait and the built-in question bank
//! - [`pacing`] -- Expected time, timing multiplier and the challenge timer
//! - [`session`] -- The [`GameSession`] facade
//! - [`snapshot`] -- Versioned save/restore of a session
//!
//! # Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use quizionix_core::{GameConfig, GameSession};
//! use quizionix_types::{BranchId, ZoneId};
//!
//! let Ok(mut session) = GameSession::new(GameConfig::default()) else {
//!     return;
//! };
//! let zone = ZoneId::from("science");
//! let branch = BranchId::from("physics");
//! let start = Instant::now();
//!
//! assert!(session.select_branch(&zone, &branch).is_ok());
//! let challenge = session.generate_challenge(&zone, &branch, start);
//! assert!(challenge.is_ok());
//!
//! let result = session.submit_answer("not the answer", start + Duration::from_secs(3));
//! assert!(result.is_ok_and(|r| !r.success));
//! ```

pub mod challenge;
pub mod config;
pub mod content;
pub mod pacing;
pub mod session;
pub mod snapshot;

// Re-export primary types at crate root for convenience.
pub use challenge::{ChallengeEngine, EngineError, answers_match, build_choice_options};
pub use config::{ConfigError, GameConfig, LoggingConfig, PacingConfig, ScoringConfig, WorldConfig};
pub use content::{
    BankItem, BuiltinContentProvider, ChallengeContent, ContentError, ContentProvider,
    ContentRequest,
};
pub use pacing::ChallengeTimer;
pub use session::GameSession;
pub use snapshot::{SNAPSHOT_VERSION, SessionSnapshot, SnapshotError};
