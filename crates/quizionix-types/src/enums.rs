//! Enumeration types for the Quizionix engine.
//!
//! Wire names are kebab-case where the rendering layer already uses them
//! (`"multiple-choice"`, `"boss"`), and the difficulty tiers keep their
//! display capitalisation (`"Beginner"`).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Difficulty tier derived from the learner's performance signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DifficultyTier {
    /// Entry tier; slowest decay and longest time budget.
    Beginner,
    /// Middle tier.
    Advanced,
    /// Top tier; fastest decay and tightest time budget.
    Master,
}

impl DifficultyTier {
    /// All tiers in ascending order.
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Advanced, Self::Master];

    /// Display label used by the rendering layer.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Advanced => "Advanced",
            Self::Master => "Master",
        }
    }
}

impl core::fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Challenges
// ---------------------------------------------------------------------------

/// Whether a challenge is a regular branch question or part of a boss fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum EncounterType {
    /// Regular branch challenge that builds mastery.
    Normal,
    /// Boss challenge; a correct answer damages the branch boss.
    Boss,
}

impl EncounterType {
    /// Returns `true` for boss encounters.
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Boss)
    }
}

/// How the learner answers a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum QuestionType {
    /// Pick one option from a shuffled choice set.
    MultipleChoice,
    /// Free-text answer, compared trimmed and case-insensitively.
    Text,
}

impl QuestionType {
    /// Display label used in feedback lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::MultipleChoice => "Multiple Choice",
            Self::Text => "Text",
        }
    }
}

/// Pacing feedback derived from `elapsed / expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum PaceLabel {
    /// At most 60% of the expected time.
    Fast,
    /// Within the expected time.
    OnPace,
    /// Up to 160% of the expected time.
    Slow,
    /// Beyond 160% of the expected time.
    Overtime,
}

impl PaceLabel {
    /// Display label used in feedback lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::OnPace => "on pace",
            Self::Slow => "slow",
            Self::Overtime => "overtime",
        }
    }
}

// ---------------------------------------------------------------------------
// Progression
// ---------------------------------------------------------------------------

/// Normal-track lifecycle of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum BranchStatus {
    /// No challenge has been answered in this branch yet.
    NotStarted,
    /// At least one attempt, boss not yet cleared.
    InProgress,
    /// The branch boss has been cleared.
    Completed,
}

/// Boss lifecycle layered on top of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum BossStatus {
    /// Branch mastery has not reached the boss unlock threshold.
    BossPending,
    /// Boss is available and still has hit points.
    BossActive,
    /// Boss hit points reached zero.
    BossCleared,
}

/// Display band for Knowledge Health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum KnowledgeHealthBand {
    /// Below the urgency threshold.
    Critical,
    /// Below 60.
    Strained,
    /// 60 and above.
    Healthy,
}

/// What a badge is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum BadgeScope {
    /// Whole-session milestone.
    Global,
    /// Earned for a specific zone.
    Zone,
    /// Earned for a specific branch.
    Branch,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(DifficultyTier::Beginner < DifficultyTier::Advanced);
        assert!(DifficultyTier::Advanced < DifficultyTier::Master);
    }

    #[test]
    fn question_type_wire_names() {
        let mc = serde_json::to_string(&QuestionType::MultipleChoice).unwrap();
        assert_eq!(mc, "\"multiple-choice\"");
        let boss = serde_json::to_string(&EncounterType::Boss).unwrap();
        assert_eq!(boss, "\"boss\"");
    }

    #[test]
    fn tier_display_is_capitalised() {
        assert_eq!(DifficultyTier::Master.to_string(), "Master");
    }
}
