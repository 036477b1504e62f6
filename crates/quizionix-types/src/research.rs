//! Research telemetry records.
//!
//! Entries are observational: they are produced after an evaluation has
//! already been applied and are never read back by gameplay code. They
//! carry no learner identifiers and never include the submitted answer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DifficultyTier, EncounterType, QuestionType};
use crate::ids::{BranchId, ChallengeId, ResearchEntryId, SessionId, ZoneId};

/// One immutable evaluation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResearchLogEntry {
    /// Entry id.
    pub id: ResearchEntryId,
    /// Position in the log, starting at 0.
    pub sequence: u64,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Evaluated challenge.
    pub challenge_id: ChallengeId,
    /// Zone of the challenge.
    pub zone_id: ZoneId,
    /// Branch of the challenge.
    pub branch_id: BranchId,
    /// Tier the challenge was generated at.
    pub difficulty: DifficultyTier,
    /// Normal or boss.
    pub encounter_type: EncounterType,
    /// Question type.
    pub question_type: QuestionType,
    /// Whether the challenge used fallback content.
    pub fallback_content: bool,
    /// Seconds taken to answer.
    pub elapsed_seconds: f64,
    /// Expected seconds for the challenge.
    pub expected_seconds: f64,
    /// `elapsed / expected`.
    pub pace_ratio: f64,
    /// Timing multiplier at submission.
    pub multiplier: f64,
    /// Whether the answer was correct.
    pub success: bool,
    /// Knowledge Health before the evaluation.
    pub knowledge_health_before: f64,
    /// Knowledge Health after the evaluation.
    pub knowledge_health_after: f64,
    /// Points awarded.
    pub points_delta: u64,
    /// Total points after the evaluation.
    pub total_points: u64,
    /// Branch mastery after the evaluation.
    pub branch_mastery: u32,
}

impl ResearchLogEntry {
    /// Knowledge Health change caused by the evaluation.
    pub fn knowledge_health_delta(&self) -> f64 {
        self.knowledge_health_after - self.knowledge_health_before
    }
}

/// Attempt counts for one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TierSummary {
    /// Evaluations at this tier.
    pub attempts: u64,
    /// Correct evaluations at this tier.
    pub successes: u64,
}

/// Aggregates over the whole research log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResearchSummary {
    /// Number of evaluations.
    pub total_attempts: u64,
    /// Correct evaluations.
    pub successes: u64,
    /// Incorrect evaluations.
    pub failures: u64,
    /// `successes / total_attempts` as a percentage, 0 when empty.
    pub accuracy_pct: f64,
    /// Mean seconds taken.
    pub mean_elapsed_seconds: f64,
    /// Mean expected seconds.
    pub mean_expected_seconds: f64,
    /// Mean `elapsed / expected`.
    pub mean_pace_ratio: f64,
    /// Mean timing multiplier.
    pub mean_multiplier: f64,
    /// Boss evaluations.
    pub boss_attempts: u64,
    /// Correct boss evaluations.
    pub boss_successes: u64,
    /// Sum of awarded points.
    pub points_awarded: u64,
    /// Net Knowledge Health change from evaluations (decay excluded).
    pub net_knowledge_health_delta: f64,
    /// Counts per tier label.
    pub by_difficulty: BTreeMap<String, TierSummary>,
    /// Evaluations per zone.
    pub attempts_by_zone: BTreeMap<ZoneId, u64>,
}

/// Machine-readable export of the research log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResearchExport {
    /// Export schema version.
    pub schema_version: u32,
    /// Anonymous session id.
    pub session_id: SessionId,
    /// When the export was produced.
    pub generated_at: DateTime<Utc>,
    /// Aggregates.
    pub summary: ResearchSummary,
    /// Every entry in log order.
    pub entries: Vec<ResearchLogEntry>,
}
