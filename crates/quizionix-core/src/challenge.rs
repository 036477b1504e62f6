//! Challenge engine: generation, choice building and answer evaluation.
//!
//! Generation decides the policy (encounter type, expected time, seed) and
//! delegates the question text to a [`ContentProvider`]. Evaluation applies
//! every consequence of an answer in one pass: branch attempts and mastery,
//! the recent-outcome window, boss damage, zone unlocks, points, Knowledge
//! Health, badges and the research record.

use quizionix_progression::{
    BADGE_RULES, ProgressionError, award_mastery, boss, check_badges, difficulty,
    knowledge_health, zones,
};
use quizionix_research::{ResearchEntryBuilder, ResearchLog};
use quizionix_types::{
    BossStatus, BranchId, Challenge, ChallengeId, DifficultyTier, EncounterType,
    EvaluationResult, EvaluationTiming, GameState, QuestionType, ZoneId,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::content::{ContentError, ContentProvider, ContentRequest, generated_content};
use crate::pacing;

/// Errors returned by engine operations.
///
/// All of them are recoverable; none leaves the state partially modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Locked zone, unknown zone or branch, or not the current selection.
    #[error("invalid selection: {0}")]
    InvalidSelection(ProgressionError),

    /// An answer was submitted with no challenge in flight.
    #[error("no active challenge")]
    NoActiveChallenge,

    /// Any other progression failure.
    #[error(transparent)]
    Progression(ProgressionError),
}

impl From<ProgressionError> for EngineError {
    fn from(error: ProgressionError) -> Self {
        if error.is_invalid_selection() {
            Self::InvalidSelection(error)
        } else {
            Self::Progression(error)
        }
    }
}

/// Derive a challenge seed from the world seed and the challenge sequence
/// number (splitmix64).
pub const fn challenge_seed(world_seed: u64, sequence: u64) -> u64 {
    let mut z = (world_seed ^ sequence).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ z.wrapping_shr(30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ z.wrapping_shr(27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ z.wrapping_shr(31)
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Compare a submitted answer with the correct one, ignoring case and
/// surrounding whitespace. An empty submission never matches.
pub fn answers_match(submitted: &str, correct: &str) -> bool {
    let submitted = normalize(submitted);
    !submitted.is_empty() && submitted == normalize(correct)
}

/// Answer options for a multiple-choice challenge in display order.
///
/// The correct answer appears exactly once; distractors that duplicate it
/// or each other (after normalization) are dropped. The order is a shuffle
/// seeded by the challenge, so repeated calls agree. Text challenges have
/// no options.
pub fn build_choice_options(challenge: &Challenge) -> Vec<String> {
    if challenge.question_type != QuestionType::MultipleChoice {
        return Vec::new();
    }

    let mut seen = vec![normalize(&challenge.correct_answer)];
    let mut options = vec![challenge.correct_answer.clone()];
    for distractor in &challenge.distractors {
        let key = normalize(distractor);
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        options.push(distractor.clone());
    }

    let mut rng = StdRng::seed_from_u64(challenge.seed);
    options.shuffle(&mut rng);
    options
}

/// Generates and evaluates challenges against a [`GameState`].
pub struct ChallengeEngine<'a> {
    config: &'a GameConfig,
    provider: &'a dyn ContentProvider,
}

impl<'a> ChallengeEngine<'a> {
    /// Create an engine over a configuration and a content provider.
    pub const fn new(config: &'a GameConfig, provider: &'a dyn ContentProvider) -> Self {
        Self { config, provider }
    }

    /// Generate a challenge for the currently selected zone/branch.
    ///
    /// The encounter is a boss challenge when the branch boss is active.
    /// Missing content degrades to a generated fallback challenge.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSelection`] if the pair is not the
    /// current selection of an unlocked zone.
    pub fn generate_challenge(
        &self,
        state: &GameState,
        zone_id: &ZoneId,
        branch_id: &BranchId,
        tier: DifficultyTier,
        sequence: u64,
    ) -> Result<Challenge, EngineError> {
        zones::ensure_current_selection(state, zone_id, branch_id)?;
        let encounter =
            if boss::is_boss_active(state, zone_id, branch_id, &self.config.progression) {
                EncounterType::Boss
            } else {
                EncounterType::Normal
            };
        self.compose(state, zone_id, branch_id, tier, encounter, sequence)
    }

    /// Generate a normal challenge for any existing zone/branch, ignoring
    /// the selection and lock state. Used by content diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSelection`] if the pair does not exist.
    pub fn sample_challenge(
        &self,
        state: &GameState,
        zone_id: &ZoneId,
        branch_id: &BranchId,
        tier: DifficultyTier,
        sequence: u64,
    ) -> Result<Challenge, EngineError> {
        self.compose(state, zone_id, branch_id, tier, EncounterType::Normal, sequence)
    }

    fn compose(
        &self,
        state: &GameState,
        zone_id: &ZoneId,
        branch_id: &BranchId,
        tier: DifficultyTier,
        encounter: EncounterType,
        sequence: u64,
    ) -> Result<Challenge, EngineError> {
        let zone = state
            .zone(zone_id)
            .ok_or_else(|| ProgressionError::ZoneNotFound(zone_id.clone()))?;
        let branch = state
            .branch(zone_id, branch_id)
            .ok_or_else(|| ProgressionError::BranchNotFound {
                zone_id: zone_id.clone(),
                branch_id: branch_id.clone(),
            })?;

        let seed = challenge_seed(self.config.world.seed, sequence);
        let request = ContentRequest {
            zone_id: zone_id.clone(),
            branch_id: branch_id.clone(),
            zone_name: zone.name.clone(),
            branch_name: branch.name.clone(),
            tier,
            sequence,
        };

        let (content, fallback) = match self.provider.challenge_content(&request) {
            Ok(content) => (content, false),
            Err(ContentError::Unavailable { .. }) => {
                warn!(
                    zone = %zone_id,
                    branch = %branch_id,
                    %tier,
                    "no authored content, using fallback"
                );
                (generated_content(&request, seed), true)
            }
        };

        let expected_seconds = pacing::expected_seconds(
            &self.config.pacing,
            tier,
            encounter,
            state.knowledge_health,
        );

        let challenge = Challenge {
            id: ChallengeId::new(),
            zone_id: zone_id.clone(),
            branch_id: branch_id.clone(),
            zone_name: zone.name.clone(),
            branch_name: branch.name.clone(),
            difficulty: tier,
            encounter_type: encounter,
            question_type: content.question_type,
            prompt: content.prompt,
            correct_answer: content.correct_answer,
            distractors: content.distractors,
            hint: content.hint,
            seed,
            expected_seconds,
            fallback,
        };
        debug!(
            challenge = %challenge.id,
            zone = %zone_id,
            branch = %branch_id,
            %tier,
            boss = encounter.is_boss(),
            expected_seconds,
            "challenge generated"
        );
        Ok(challenge)
    }

    /// Evaluate a submitted answer and apply its consequences.
    ///
    /// A wrong, empty or malformed answer is an ordinary failure result.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSelection`] if the challenge's branch no
    /// longer exists, or [`EngineError::Progression`] on counter overflow.
    /// In both cases the state is unchanged.
    #[allow(clippy::too_many_lines)]
    pub fn evaluate_answer(
        &self,
        state: &mut GameState,
        research: &mut ResearchLog,
        submitted: &str,
        challenge: &Challenge,
        timing: EvaluationTiming,
    ) -> Result<EvaluationResult, EngineError> {
        let zone_id = &challenge.zone_id;
        let branch_id = &challenge.branch_id;
        let progression = &self.config.progression;

        let attempts = state
            .branch(zone_id, branch_id)
            .ok_or_else(|| ProgressionError::BranchNotFound {
                zone_id: zone_id.clone(),
                branch_id: branch_id.clone(),
            })?
            .attempts
            .checked_add(1)
            .ok_or_else(|| ProgressionError::ArithmeticOverflow {
                context: format!("attempt counter for branch {branch_id}"),
            })?;

        let success = answers_match(submitted, &challenge.correct_answer);
        let ratio = pacing::pace_ratio(timing.elapsed_seconds, timing.expected_seconds);
        let multiplier = pacing::live_multiplier(
            &self.config.pacing,
            timing.elapsed_seconds,
            timing.expected_seconds,
        );
        let pace = pacing::pace_label(&self.config.pacing, ratio);
        let is_boss = challenge.encounter_type.is_boss();
        let knowledge_health_before = state.knowledge_health;

        difficulty::record_outcome(state, success, progression.recent_window)?;
        if let Some(branch) = state.branch_mut(zone_id, branch_id) {
            branch.attempts = attempts;
        }

        let mut points_awarded = 0_u64;
        let mut branch_completed = false;
        let mut boss_completed = false;
        let mut boss_ready = false;
        let mut unlocked_zones = Vec::new();

        if success {
            if is_boss {
                let hit = boss::strike_boss(state, zone_id, branch_id, progression);
                boss_completed = hit.cleared;
                branch_completed = hit.cleared;
                if hit.cleared {
                    unlocked_zones = zones::unlock_successors(state, zone_id);
                }
            } else if let Some(branch) = state.branch_mut(zone_id, branch_id) {
                let gain = award_mastery(branch, progression)?;
                branch_completed = gain.before < 100 && gain.after >= 100;
                boss_ready = gain.reached_boss_threshold && !branch.completed;
            }

            points_awarded = scale_points(
                self.config
                    .scoring
                    .base_points(challenge.difficulty, challenge.encounter_type),
                multiplier,
            );
            state.total_points = state.total_points.saturating_add(points_awarded);
        } else if is_boss {
            boss::ensure_encounter(state, zone_id, branch_id, progression);
        }

        let knowledge_health_delta =
            knowledge_health::apply_answer_outcome(state, &self.config.knowledge_health, success);
        let new_badges = check_badges(state, BADGE_RULES);

        let (branch_progress_text, boss_progress_text, branch_mastery) =
            self.progress_texts(state, zone_id, branch_id);
        let message = if success {
            success_message(is_boss, boss_completed, points_awarded, multiplier)
        } else {
            format!("Incorrect. The correct answer was: {}.", challenge.correct_answer)
        };
        let remediation_hint = (!success).then(|| remediation_hint(challenge));

        let builder = ResearchEntryBuilder::new(challenge.id, zone_id.clone(), branch_id.clone())
            .challenge_kind(
                challenge.difficulty,
                challenge.encounter_type,
                challenge.question_type,
            )
            .fallback_content(challenge.fallback)
            .timing(timing.elapsed_seconds, timing.expected_seconds)
            .multiplier(multiplier)
            .outcome(success)
            .knowledge_health(knowledge_health_before, state.knowledge_health)
            .points(points_awarded, state.total_points)
            .branch_mastery(branch_mastery);
        let research_log_entry = match research.record(builder) {
            Ok(entry) => Some(entry.clone()),
            Err(e) => {
                warn!(error = %e, "research entry dropped");
                None
            }
        };

        debug!(
            challenge = %challenge.id,
            success,
            points_awarded,
            knowledge_health = state.knowledge_health,
            "answer evaluated"
        );

        Ok(EvaluationResult {
            success,
            question_type: challenge.question_type,
            encounter_type: challenge.encounter_type,
            message,
            branch_progress_text,
            boss_progress_text,
            remediation_hint,
            branch_completed,
            boss_completed,
            boss_ready,
            new_badges,
            unlocked_zones,
            points_awarded,
            multiplier,
            pace,
            knowledge_health_delta,
            research_log_entry,
        })
    }

    fn progress_texts(
        &self,
        state: &GameState,
        zone_id: &ZoneId,
        branch_id: &BranchId,
    ) -> (String, String, u32) {
        let progression = &self.config.progression;
        let Some(branch) = state.branch(zone_id, branch_id) else {
            return (String::new(), String::new(), 0);
        };
        let target = progression.branch_clear_target;
        let branch_text = format!(
            "{} mastery: {}% ({}/{target})",
            branch.name,
            branch.mastery,
            branch.correct_answers.min(target)
        );
        let boss_text = match boss::boss_status(state, branch, progression) {
            BossStatus::BossCleared => "Branch boss defeated.".to_owned(),
            BossStatus::BossActive => state.boss(zone_id, branch_id).map_or_else(
                || format!("Branch boss ready: HP {0}/{0}.", progression.boss_max_hp),
                |e| format!("Branch boss HP: {}/{}.", e.hp, e.max_hp),
            ),
            BossStatus::BossPending => format!(
                "Branch boss unlocks at {}% mastery.",
                progression.boss_unlock_mastery
            ),
        };
        (branch_text, boss_text, branch.mastery)
    }
}

fn scale_points(base: u64, multiplier: f64) -> u64 {
    #[allow(clippy::cast_precision_loss)]
    let scaled = (base as f64 * multiplier).round();
    if scaled.is_finite() && scaled > 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let points = scaled as u64;
        points
    } else {
        0
    }
}

fn success_message(is_boss: bool, boss_completed: bool, points: u64, multiplier: f64) -> String {
    if boss_completed {
        format!("Correct! Branch boss defeated. +{points} points ({multiplier:.2}x).")
    } else if is_boss {
        format!("Correct! Direct hit on the branch boss. +{points} points ({multiplier:.2}x).")
    } else {
        format!("Correct! +{points} points ({multiplier:.2}x).")
    }
}

fn remediation_hint(challenge: &Challenge) -> String {
    challenge.hint.as_deref().map_or_else(
        || {
            format!(
                "Review the fundamentals of {} in {} before the next attempt.",
                challenge.branch_name, challenge.zone_name
            )
        },
        |hint| format!("Hint ({}): {hint}", challenge.branch_name),
    )
}
