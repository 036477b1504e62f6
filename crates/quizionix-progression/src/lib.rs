//! Progression rules for Quizionix.
//!
//! This crate holds the game logic that operates on a [`GameState`] without
//! touching I/O: the Knowledge Health model, the difficulty adapter, the
//! zone/branch/boss state machine and the badge and mastery ledger. It sits
//! between `quizionix-types` (data structures) and `quizionix-core`
//! (challenge engine and session orchestration).
//!
//! # Modules
//!
//! - [`badges`] -- Declarative badge rule table and idempotent award check
//! - [`boss`] -- Branch boss encounters, HP and the boss indicator
//! - [`catalog`] -- Authored zone/branch catalog and initial state ([`ZoneCatalog`])
//! - [`config`] -- Tunable constants ([`KnowledgeHealthConfig`], [`ProgressionConfig`],
//!   [`DifficultyConfig`])
//! - [`difficulty`] -- Performance signal and difficulty tier
//! - [`error`] -- Error type for progression operations ([`ProgressionError`])
//! - [`knowledge_health`] -- Clamped KH resource, time-pressure decay, answer deltas
//! - [`mastery`] -- Branch mastery gains and derived mastery map
//! - [`zones`] -- Zone entry, branch selection and zone unlocking
//!
//! [`GameState`]: quizionix_types::GameState

pub mod badges;
pub mod boss;
pub mod catalog;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod knowledge_health;
pub mod mastery;
pub mod zones;

// Re-export primary types at crate root for convenience.
pub use badges::{BADGE_RULES, BadgeRule, BadgeTrigger, check_badges};
pub use boss::{BossHit, boss_status, ensure_encounter, is_boss_active, strike_boss};
pub use catalog::{BranchSpec, ZoneCatalog, ZoneSpec};
pub use config::{DifficultyConfig, KnowledgeHealthConfig, ProgressionConfig};
pub use difficulty::{current_difficulty, performance_signal, record_outcome};
pub use error::ProgressionError;
pub use knowledge_health::{DecayTick, apply_decay, decay_per_second, modify_knowledge_health};
pub use mastery::{MasteryGain, award_mastery, overall_mastery, progress_snapshot};
pub use zones::{
    branches_for_zone, enter_zone, next_branch, select_branch, unlock_one_zone_debug,
    unlock_successors,
};
