//! Core entity structs: zones, branches, boss encounters, badges,
//! challenges, and the mutable [`GameState`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{BadgeScope, DifficultyTier, EncounterType, QuestionType};
use crate::ids::{BossKey, BranchId, ChallengeId, ZoneId};

// ---------------------------------------------------------------------------
// Catalog entities
// ---------------------------------------------------------------------------

/// A top-level topic grouping.
///
/// `unlocked` only ever transitions from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Zone {
    /// Stable zone identifier.
    pub id: ZoneId,
    /// Display name.
    pub name: String,
    /// Short description shown on the zone screen.
    pub description: String,
    /// Whether the learner may enter the zone.
    pub unlocked: bool,
    /// Zone that must be cleared before this one unlocks, if any.
    pub prerequisite: Option<ZoneId>,
    /// Branches in play order.
    pub branch_ids: Vec<BranchId>,
}

/// An ordered sub-topic within a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Branch {
    /// Identifier, unique within the parent zone.
    pub id: BranchId,
    /// Parent zone.
    pub zone_id: ZoneId,
    /// Display name.
    pub name: String,
    /// Mastery percentage (0--100), never decreases during play.
    pub mastery: u32,
    /// Answers evaluated in this branch.
    pub attempts: u32,
    /// Correct answers in this branch.
    pub correct_answers: u32,
    /// Set once the branch boss is cleared.
    pub completed: bool,
    /// Badge ids earned for this branch, in award order.
    pub badges: Vec<String>,
}

/// Hit-point state of one branch boss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BossEncounter {
    /// Zone of the boss.
    pub zone_id: ZoneId,
    /// Branch of the boss.
    pub branch_id: BranchId,
    /// Remaining hit points (`0..=max_hp`).
    pub hp: u32,
    /// Hit points at creation; identical for every boss.
    pub max_hp: u32,
}

impl BossEncounter {
    /// Returns `true` once the boss has no hit points left.
    pub const fn is_cleared(&self) -> bool {
        self.hp == 0
    }
}

/// A permanent milestone marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Badge {
    /// Unique id; scoped rules append the zone/branch slugs.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// What the badge is attached to.
    pub scope: BadgeScope,
    /// Zone the badge belongs to, for zone and branch scopes.
    pub zone_id: Option<ZoneId>,
    /// Branch the badge belongs to, for branch scope.
    pub branch_id: Option<BranchId>,
}

// ---------------------------------------------------------------------------
// Challenge
// ---------------------------------------------------------------------------

/// One generated question. Lives only until it is answered or replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Challenge {
    /// Unique challenge id.
    pub id: ChallengeId,
    /// Zone the challenge was generated for.
    pub zone_id: ZoneId,
    /// Branch the challenge was generated for.
    pub branch_id: BranchId,
    /// Zone display name at generation time.
    pub zone_name: String,
    /// Branch display name at generation time.
    pub branch_name: String,
    /// Tier the content was requested at.
    pub difficulty: DifficultyTier,
    /// Normal or boss encounter.
    pub encounter_type: EncounterType,
    /// Multiple-choice or free text.
    pub question_type: QuestionType,
    /// Question text.
    pub prompt: String,
    /// Canonical correct answer.
    pub correct_answer: String,
    /// Wrong options for multiple-choice questions.
    pub distractors: Vec<String>,
    /// Optional authored remediation hint.
    pub hint: Option<String>,
    /// Seed for the reproducible choice shuffle.
    pub seed: u64,
    /// Expected answer time in seconds, used for pacing feedback only.
    pub expected_seconds: f64,
    /// `true` when the content provider had nothing and a fallback was generated.
    pub fallback: bool,
}

// ---------------------------------------------------------------------------
// Game state
// ---------------------------------------------------------------------------

/// The complete mutable state of one game session.
///
/// Passed explicitly to every engine operation. Derived values (difficulty
/// tier, overall mastery, KH band) are computed from it on demand and are
/// never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// Zones in catalog order.
    pub zones: Vec<Zone>,
    /// Every branch of every zone.
    pub branches: Vec<Branch>,
    /// Currently entered zone.
    pub current_zone_id: Option<ZoneId>,
    /// Currently selected branch within the current zone.
    pub current_branch_id: Option<BranchId>,
    /// Knowledge Health, clamped to `[0, 100]`.
    pub knowledge_health: f64,
    /// Accumulated points; never decreases.
    pub total_points: u64,
    /// Boss encounters created so far, keyed by `zone::branch`.
    pub boss_progress: BTreeMap<BossKey, BossEncounter>,
    /// Awarded badges in award order; ids are unique.
    pub badges: Vec<Badge>,
    /// Most recent outcomes (oldest first), bounded by the configured window.
    pub recent_outcomes: Vec<bool>,
    /// Current run of consecutive correct answers.
    pub streak: u32,
    /// Longest run of consecutive correct answers.
    pub best_streak: u32,
    /// Total evaluations.
    pub attempts: u64,
    /// Total correct evaluations.
    pub correct_answers: u64,
}

impl GameState {
    /// Create a fresh state over the given catalog with full Knowledge Health.
    pub const fn new(zones: Vec<Zone>, branches: Vec<Branch>, knowledge_health: f64) -> Self {
        Self {
            zones,
            branches,
            current_zone_id: None,
            current_branch_id: None,
            knowledge_health,
            total_points: 0,
            boss_progress: BTreeMap::new(),
            badges: Vec::new(),
            recent_outcomes: Vec::new(),
            streak: 0,
            best_streak: 0,
            attempts: 0,
            correct_answers: 0,
        }
    }

    /// Look up a zone by id.
    pub fn zone(&self, zone_id: &ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| &z.id == zone_id)
    }

    /// Look up a branch by zone and branch id.
    pub fn branch(&self, zone_id: &ZoneId, branch_id: &BranchId) -> Option<&Branch> {
        self.branches
            .iter()
            .find(|b| &b.zone_id == zone_id && &b.id == branch_id)
    }

    /// Mutable branch lookup.
    pub fn branch_mut(&mut self, zone_id: &ZoneId, branch_id: &BranchId) -> Option<&mut Branch> {
        self.branches
            .iter_mut()
            .find(|b| &b.zone_id == zone_id && &b.id == branch_id)
    }

    /// Return the boss encounter for a branch, if one was created.
    pub fn boss(&self, zone_id: &ZoneId, branch_id: &BranchId) -> Option<&BossEncounter> {
        self.boss_progress.get(&BossKey::for_branch(zone_id, branch_id))
    }

    /// Returns `true` if a badge with this id has been awarded.
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.iter().any(|b| b.id == badge_id)
    }
}
