//! Tunable parameters for Knowledge Health, progression and difficulty.
//!
//! Each struct bundles the constants of one model so callers (engine, tests)
//! can override defaults. They deserialize from the matching sections of
//! `quizionix-config.yaml`; missing fields fall back to [`Default`].

use quizionix_types::{ClearTargets, DifficultyTier};
use serde::{Deserialize, Serialize};

/// Parameters of the Knowledge Health model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeHealthConfig {
    /// Knowledge Health of a fresh game (default: 100).
    pub starting: f64,

    /// Restored on a correct answer (default: 8).
    pub success_restore: f64,

    /// Removed on an incorrect answer (default: 12).
    pub failure_penalty: f64,

    /// Below this value the urgency signal is raised (default: 30).
    pub urgent_below: f64,

    /// Below this value the display band is `strained` (default: 60).
    pub strained_below: f64,

    /// Decay per second at the Beginner tier (default: 0.55).
    pub decay_base_beginner: f64,

    /// Decay per second at the Advanced tier (default: 0.75).
    pub decay_base_advanced: f64,

    /// Decay per second at the Master tier (default: 0.95).
    pub decay_base_master: f64,

    /// Extra decay per second during boss challenges (default: 0.35).
    pub boss_load: f64,

    /// Multiplier of `elapsed / expected` in the pressure term (default: 0.4).
    pub pressure_coefficient: f64,

    /// Upper bound of the pressure term (default: 1.4).
    pub pressure_cap: f64,
}

impl Default for KnowledgeHealthConfig {
    fn default() -> Self {
        Self {
            starting: 100.0,
            success_restore: 8.0,
            failure_penalty: 12.0,
            urgent_below: 30.0,
            strained_below: 60.0,
            decay_base_beginner: 0.55,
            decay_base_advanced: 0.75,
            decay_base_master: 0.95,
            boss_load: 0.35,
            pressure_coefficient: 0.4,
            pressure_cap: 1.4,
        }
    }
}

impl KnowledgeHealthConfig {
    /// Base decay per second for a tier.
    pub const fn decay_base(&self, tier: DifficultyTier) -> f64 {
        match tier {
            DifficultyTier::Beginner => self.decay_base_beginner,
            DifficultyTier::Advanced => self.decay_base_advanced,
            DifficultyTier::Master => self.decay_base_master,
        }
    }
}

/// Branch, boss and streak parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Correct answers needed to take a branch from 0 to 100 mastery (default: 5).
    pub branch_clear_target: u32,

    /// Hit points of every boss (default: 3).
    pub boss_max_hp: u32,

    /// Hit points removed by a correct boss answer (default: 1).
    pub boss_damage: u32,

    /// Branch mastery at which the boss becomes available (default: 100).
    pub boss_unlock_mastery: u32,

    /// Number of recent outcomes kept for the accuracy signal (default: 10).
    pub recent_window: usize,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            branch_clear_target: 5,
            boss_max_hp: 3,
            boss_damage: 1,
            boss_unlock_mastery: 100,
            recent_window: 10,
        }
    }
}

impl ProgressionConfig {
    /// Mastery gained per correct normal answer: `ceil(100 / target)`.
    ///
    /// A target of 0 completes the branch in one answer.
    pub const fn mastery_step(&self) -> u32 {
        if self.branch_clear_target == 0 {
            return 100;
        }
        100_u32.div_ceil(self.branch_clear_target)
    }

    /// Completion targets shared by every branch.
    pub const fn clear_targets(&self) -> ClearTargets {
        ClearTargets {
            branch_correct: self.branch_clear_target,
            boss_hp: self.boss_max_hp,
        }
    }
}

/// Thresholds of the difficulty adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Signal at or above which the tier is Advanced (default: 50).
    pub advanced_threshold: u32,

    /// Signal at or above which the tier is Master (default: 80).
    pub master_threshold: u32,

    /// Recent outcomes required before accuracy is blended in (default: 3).
    pub min_recent_samples: usize,

    /// Weight of recent accuracy in the signal, in percent (default: 50).
    pub accuracy_weight_pct: u32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            advanced_threshold: 50,
            master_threshold: 80,
            min_recent_samples: 3,
            accuracy_weight_pct: 50,
        }
    }
}
