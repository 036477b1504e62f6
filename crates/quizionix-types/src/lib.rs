//! Shared type definitions for the Quizionix adaptive quiz engine.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Types flow downstream to `TypeScript` via `ts-rs` so the
//! rendering layer consumes exactly the shapes the engine produces.
//!
//! # Modules
//!
//! - [`ids`] -- UUID and slug identifier wrappers
//! - [`enums`] -- Tiers, encounter/question types, lifecycle states
//! - [`structs`] -- Zones, branches, bosses, badges, challenges, [`GameState`]
//! - [`results`] -- Evaluation results and derived views
//! - [`research`] -- Research log entries, summaries, and exports

pub mod enums;
pub mod ids;
pub mod research;
pub mod results;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    BadgeScope, BossStatus, BranchStatus, DifficultyTier, EncounterType, KnowledgeHealthBand,
    PaceLabel, QuestionType,
};
pub use ids::{BossKey, BranchId, ChallengeId, ResearchEntryId, SessionId, ZoneId};
pub use research::{ResearchExport, ResearchLogEntry, ResearchSummary, TierSummary};
pub use results::{
    BranchProgress, ChallengeSample, ClearTargets, ContentDiagnostics, EvaluationResult,
    EvaluationTiming, GameStateView, ProgressSnapshot, SessionSummary, SmokeTestReport,
    TickReport, ZoneProgress,
};
pub use structs::{Badge, BossEncounter, Branch, Challenge, GameState, Zone};
