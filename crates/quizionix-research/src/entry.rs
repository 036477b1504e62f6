//! Builder for research log entries.
//!
//! Numeric inputs are sanitized before they reach the log: non-finite values
//! become 0, elapsed time is never negative, and the expected time used for
//! the pace ratio is floored at one second.

use chrono::Utc;
use quizionix_types::{
    BranchId, ChallengeId, DifficultyTier, EncounterType, QuestionType, ResearchEntryId,
    ResearchLogEntry, ZoneId,
};

use crate::ResearchError;

/// Lower bound on the expected time used for the pace ratio.
const MIN_EXPECTED_SECONDS: f64 = 1.0;

/// Builder for constructing sanitized [`ResearchLogEntry`] values.
///
/// The challenge identity is given up front; timing, outcome and the
/// Knowledge Health before/after pair are required before building.
#[derive(Debug, Clone)]
pub struct ResearchEntryBuilder {
    challenge_id: ChallengeId,
    zone_id: ZoneId,
    branch_id: BranchId,
    difficulty: DifficultyTier,
    encounter_type: EncounterType,
    question_type: QuestionType,
    fallback_content: bool,
    timing: Option<(f64, f64)>,
    multiplier: f64,
    success: Option<bool>,
    knowledge_health: Option<(f64, f64)>,
    points_delta: u64,
    total_points: u64,
    branch_mastery: u32,
}

impl ResearchEntryBuilder {
    /// Start an entry for an evaluated challenge.
    pub const fn new(challenge_id: ChallengeId, zone_id: ZoneId, branch_id: BranchId) -> Self {
        Self {
            challenge_id,
            zone_id,
            branch_id,
            difficulty: DifficultyTier::Beginner,
            encounter_type: EncounterType::Normal,
            question_type: QuestionType::MultipleChoice,
            fallback_content: false,
            timing: None,
            multiplier: 1.0,
            success: None,
            knowledge_health: None,
            points_delta: 0,
            total_points: 0,
            branch_mastery: 0,
        }
    }

    /// Set the tier, encounter type and question type of the challenge.
    #[must_use]
    pub const fn challenge_kind(
        mut self,
        difficulty: DifficultyTier,
        encounter_type: EncounterType,
        question_type: QuestionType,
    ) -> Self {
        self.difficulty = difficulty;
        self.encounter_type = encounter_type;
        self.question_type = question_type;
        self
    }

    /// Mark the challenge as generated fallback content.
    #[must_use]
    pub const fn fallback_content(mut self, fallback: bool) -> Self {
        self.fallback_content = fallback;
        self
    }

    /// Set elapsed and expected seconds.
    #[must_use]
    pub const fn timing(mut self, elapsed_seconds: f64, expected_seconds: f64) -> Self {
        self.timing = Some((elapsed_seconds, expected_seconds));
        self
    }

    /// Set the timing multiplier at submission.
    #[must_use]
    pub const fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set whether the answer was correct.
    #[must_use]
    pub const fn outcome(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    /// Set Knowledge Health before and after the evaluation.
    #[must_use]
    pub const fn knowledge_health(mut self, before: f64, after: f64) -> Self {
        self.knowledge_health = Some((before, after));
        self
    }

    /// Set points awarded and the running total.
    #[must_use]
    pub const fn points(mut self, delta: u64, total: u64) -> Self {
        self.points_delta = delta;
        self.total_points = total;
        self
    }

    /// Set branch mastery after the evaluation.
    #[must_use]
    pub const fn branch_mastery(mut self, mastery: u32) -> Self {
        self.branch_mastery = mastery;
        self
    }

    /// Validate inputs and produce an entry at the given log position.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::MissingField`] if timing, outcome or
    /// Knowledge Health were not set.
    pub fn build(self, sequence: u64) -> Result<ResearchLogEntry, ResearchError> {
        let (elapsed, expected) = self.timing.ok_or(ResearchError::MissingField("timing"))?;
        let success = self.success.ok_or(ResearchError::MissingField("outcome"))?;
        let (kh_before, kh_after) = self
            .knowledge_health
            .ok_or(ResearchError::MissingField("knowledge_health"))?;

        let elapsed_seconds = finite_or_zero(elapsed).max(0.0);
        let expected_seconds = finite_or_zero(expected).max(0.0);
        let pace_ratio = elapsed_seconds / expected_seconds.max(MIN_EXPECTED_SECONDS);

        Ok(ResearchLogEntry {
            id: ResearchEntryId::new(),
            sequence,
            recorded_at: Utc::now(),
            challenge_id: self.challenge_id,
            zone_id: self.zone_id,
            branch_id: self.branch_id,
            difficulty: self.difficulty,
            encounter_type: self.encounter_type,
            question_type: self.question_type,
            fallback_content: self.fallback_content,
            elapsed_seconds,
            expected_seconds,
            pace_ratio,
            multiplier: finite_or_zero(self.multiplier).max(0.0),
            success,
            knowledge_health_before: finite_or_zero(kh_before),
            knowledge_health_after: finite_or_zero(kh_after),
            points_delta: self.points_delta,
            total_points: self.total_points,
            branch_mastery: self.branch_mastery.min(100),
        })
    }
}

const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn builder() -> ResearchEntryBuilder {
        ResearchEntryBuilder::new(
            ChallengeId::new(),
            ZoneId::from("science"),
            BranchId::from("physics"),
        )
    }

    #[test]
    fn complete_builder_produces_entry() {
        let entry = builder()
            .challenge_kind(DifficultyTier::Advanced, EncounterType::Boss, QuestionType::Text)
            .timing(10.0, 20.0)
            .multiplier(1.9)
            .outcome(true)
            .knowledge_health(50.0, 58.0)
            .points(28, 128)
            .branch_mastery(100)
            .build(7)
            .expect("complete builder");
        assert_eq!(entry.sequence, 7);
        assert!((entry.pace_ratio - 0.5).abs() < 1e-9);
        assert!((entry.knowledge_health_delta() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn missing_outcome_is_rejected() {
        let result = builder().timing(1.0, 2.0).knowledge_health(1.0, 2.0).build(0);
        assert!(matches!(result, Err(ResearchError::MissingField("outcome"))));
    }

    #[test]
    fn missing_timing_is_rejected() {
        let result = builder().outcome(false).knowledge_health(1.0, 2.0).build(0);
        assert!(matches!(result, Err(ResearchError::MissingField("timing"))));
    }

    #[test]
    fn non_finite_inputs_are_sanitized() {
        let entry = builder()
            .timing(f64::NAN, 0.0)
            .multiplier(f64::INFINITY)
            .outcome(false)
            .knowledge_health(f64::NEG_INFINITY, 10.0)
            .build(0)
            .expect("complete builder");
        assert!(entry.elapsed_seconds.abs() < f64::EPSILON);
        assert!(entry.pace_ratio.is_finite());
        assert!(entry.multiplier.abs() < f64::EPSILON);
        assert!(entry.knowledge_health_before.abs() < f64::EPSILON);
    }

    #[test]
    fn negative_elapsed_is_clamped() {
        let entry = builder()
            .timing(-3.0, 10.0)
            .outcome(true)
            .knowledge_health(1.0, 1.0)
            .build(0)
            .expect("complete builder");
        assert!(entry.elapsed_seconds.abs() < f64::EPSILON);
    }
}
