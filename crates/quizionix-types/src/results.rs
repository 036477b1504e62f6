//! Result and view records returned to the rendering layer.
//!
//! None of these are stored: they are computed from [`GameState`] on
//! request, or produced once by an evaluation.
//!
//! [`GameState`]: crate::structs::GameState

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{
    BossStatus, BranchStatus, DifficultyTier, EncounterType, KnowledgeHealthBand, PaceLabel,
    QuestionType,
};
use crate::ids::{BossKey, BranchId, ChallengeId, ZoneId};
use crate::research::ResearchLogEntry;
use crate::structs::{Badge, BossEncounter};

/// Timing measured by the caller for one answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EvaluationTiming {
    /// Seconds between challenge start and answer submission.
    pub elapsed_seconds: f64,
    /// Expected answer time for the challenge.
    pub expected_seconds: f64,
}

/// Everything the rendering layer needs after an answer is evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EvaluationResult {
    /// Whether the normalized answer matched.
    pub success: bool,
    /// Question type of the evaluated challenge.
    pub question_type: QuestionType,
    /// Normal or boss.
    pub encounter_type: EncounterType,
    /// Headline feedback line.
    pub message: String,
    /// Branch mastery line, e.g. `Physics mastery: 40% (2/5)`.
    pub branch_progress_text: String,
    /// Boss status line.
    pub boss_progress_text: String,
    /// Hint shown only on failure.
    pub remediation_hint: Option<String>,
    /// The branch's normal track or its boss was completed by this answer.
    pub branch_completed: bool,
    /// The branch boss reached zero hit points on this answer.
    pub boss_completed: bool,
    /// The branch boss became available on this answer.
    pub boss_ready: bool,
    /// Badges awarded by this answer.
    pub new_badges: Vec<Badge>,
    /// Zones unlocked because this answer cleared their prerequisite.
    pub unlocked_zones: Vec<ZoneId>,
    /// Points added to the total.
    pub points_awarded: u64,
    /// Timing multiplier applied to the reward.
    pub multiplier: f64,
    /// Pacing label for the answer.
    pub pace: PaceLabel,
    /// Knowledge Health change caused by the evaluation itself.
    pub knowledge_health_delta: f64,
    /// The research record appended for this evaluation.
    pub research_log_entry: Option<ResearchLogEntry>,
}

/// Live pacing values produced by one decay tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TickReport {
    /// Seconds since the challenge started.
    pub elapsed_seconds: f64,
    /// Wall-clock seconds since the previous tick.
    pub delta_seconds: f64,
    /// Knowledge Health removed by this tick.
    pub decay: f64,
    /// Knowledge Health after the tick.
    pub knowledge_health: f64,
    /// Live timing multiplier.
    pub multiplier: f64,
    /// Live pacing label.
    pub pace: PaceLabel,
    /// Knowledge Health is below the urgency threshold.
    pub urgent: bool,
}

/// Read-only view of the game state for status displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameStateView {
    /// Current zone id.
    pub current_zone_id: Option<ZoneId>,
    /// Current zone display name.
    pub current_zone: Option<String>,
    /// Current branch id.
    pub current_branch_id: Option<BranchId>,
    /// Current branch display name.
    pub current_branch: Option<String>,
    /// Tier derived from the current state.
    pub difficulty_level: DifficultyTier,
    /// Knowledge Health.
    pub knowledge_health: f64,
    /// Display band for Knowledge Health.
    pub knowledge_health_band: KnowledgeHealthBand,
    /// Accumulated points.
    pub total_points: u64,
    /// Boss encounters created so far.
    pub boss_progress: BTreeMap<BossKey, BossEncounter>,
    /// Current correct-answer streak.
    pub streak: u32,
}

/// Per-branch row of the mastery map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BranchProgress {
    /// Branch id.
    pub branch_id: BranchId,
    /// Display name.
    pub name: String,
    /// Mastery percentage.
    pub mastery: u32,
    /// Normal-track status.
    pub status: BranchStatus,
    /// Boss status.
    pub boss_status: BossStatus,
    /// Remaining boss hit points (max HP before the boss is created).
    pub boss_hp: u32,
    /// Boss max hit points.
    pub boss_max_hp: u32,
    /// Badges earned for this branch.
    pub badges: Vec<Badge>,
}

/// Per-zone card of the mastery map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ZoneProgress {
    /// Zone id.
    pub zone_id: ZoneId,
    /// Display name.
    pub zone_name: String,
    /// Whether the zone is unlocked.
    pub unlocked: bool,
    /// Mean branch mastery.
    pub mastery: u32,
    /// Percentage of branches whose boss is cleared.
    pub boss_mastery: u32,
    /// Every branch boss in the zone is cleared.
    pub boss_completed: bool,
    /// Badges earned for the zone itself.
    pub zone_badges: Vec<Badge>,
    /// Branch rows in play order.
    pub branches: Vec<BranchProgress>,
}

/// Derived progress overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProgressSnapshot {
    /// Mean branch mastery across unlocked zones.
    pub overall_mastery: u32,
    /// Knowledge Health.
    pub knowledge_health: f64,
    /// Accumulated points.
    pub total_points: u64,
    /// Tier derived from the current state.
    pub difficulty_level: DifficultyTier,
    /// Zone cards in catalog order.
    pub mastery_map: Vec<ZoneProgress>,
}

/// Completion targets shared by every branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClearTargets {
    /// Correct answers needed to reach full branch mastery.
    pub branch_correct: u32,
    /// Boss max hit points.
    pub boss_hp: u32,
}

/// Progress made since play started in the current zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SessionSummary {
    /// Zone the baseline was taken in.
    pub zone_id: ZoneId,
    /// Points gained since the baseline.
    pub points_gained: u64,
    /// Overall mastery change in percentage points.
    pub mastery_change: i64,
    /// Knowledge Health change since the baseline.
    pub knowledge_health_change: f64,
}

/// Authored-content overview reported by a content provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ContentDiagnostics {
    /// Zones with at least one authored item.
    pub authored_zones: Vec<ZoneId>,
    /// Authored items per zone.
    pub items_per_zone: BTreeMap<ZoneId, u32>,
    /// Total authored items.
    pub total_items: u32,
}

/// Minimal description of a generated sample challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChallengeSample {
    /// Challenge id.
    pub id: ChallengeId,
    /// Question type.
    pub question_type: QuestionType,
    /// Requested tier.
    pub difficulty: DifficultyTier,
    /// Normal or boss.
    pub encounter_type: EncounterType,
    /// Whether fallback content was used.
    pub fallback: bool,
}

/// Outcome of the content smoke test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SmokeTestReport {
    /// Science is authored and the sample has a valid question type.
    pub pass: bool,
    /// Provider diagnostics.
    pub diagnostics: ContentDiagnostics,
    /// The generated sample.
    pub challenge_sample: ChallengeSample,
}
