//! The game session: the single entry point used by rendering layers.
//!
//! A [`GameSession`] owns the configuration, the content provider, the
//! [`GameState`], the research log and the challenge in flight. Every
//! mutation goes through one of its methods; read methods recompute derived
//! values (difficulty, mastery, KH band) from the state on each call.
//!
//! # Challenge lifecycle
//!
//! ```text
//! select_branch -> generate_challenge -> tick* -> submit_answer
//!                          |                         |
//!                          +---- abandon_challenge --+
//! ```
//!
//! Generating a new challenge supersedes the one in flight. Knowledge Health
//! decays only while a challenge is in flight.

use std::time::Instant;

use quizionix_progression::{boss, difficulty, knowledge_health, mastery, zones};
use quizionix_research::{self as research, ResearchError, ResearchLog};
use quizionix_types::{
    Badge, Branch, BranchId, Challenge, ChallengeSample, ClearTargets, ContentDiagnostics,
    DifficultyTier, EvaluationResult, EvaluationTiming, GameState, GameStateView,
    ProgressSnapshot, ResearchExport, ResearchSummary, SessionId, SessionSummary,
    SmokeTestReport, TickReport, Zone, ZoneId,
};
use tracing::{debug, info};

use crate::challenge::{ChallengeEngine, EngineError, build_choice_options};
use crate::config::GameConfig;
use crate::content::{self, BuiltinContentProvider, ContentProvider};
use crate::pacing::{self, ChallengeTimer};
use crate::snapshot::{SNAPSHOT_VERSION, SessionSnapshot, SnapshotError, sanitize_state};

/// Zone and branch sampled by the content smoke test.
const SMOKE_TEST_ZONE: &str = "science";
const SMOKE_TEST_BRANCH: &str = "physics";

#[derive(Debug, Clone)]
struct ActiveChallenge {
    challenge: Challenge,
    timer: ChallengeTimer,
}

#[derive(Debug, Clone, PartialEq)]
struct SessionBaseline {
    zone_id: ZoneId,
    points: u64,
    mastery: u32,
    knowledge_health: f64,
}

/// One learner's game.
pub struct GameSession {
    config: GameConfig,
    provider: Box<dyn ContentProvider>,
    state: GameState,
    research: ResearchLog,
    session_id: SessionId,
    challenges_generated: u64,
    active: Option<ActiveChallenge>,
    baseline: Option<SessionBaseline>,
}

impl core::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameSession")
            .field("session_id", &self.session_id)
            .field("challenges_generated", &self.challenges_generated)
            .field("state", &self.state)
            .field("research_entries", &self.research.len())
            .finish_non_exhaustive()
    }
}

fn fresh_state(config: &GameConfig) -> Result<GameState, EngineError> {
    Ok(config
        .catalog
        .build_state(config.knowledge_health.starting)?)
}

impl GameSession {
    /// Start a new game with the built-in question bank.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Progression`] if the catalog is invalid.
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        Self::with_provider(config, Box::new(BuiltinContentProvider::new()))
    }

    /// Start a new game with a custom content provider.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Progression`] if the catalog is invalid.
    pub fn with_provider(
        config: GameConfig,
        provider: Box<dyn ContentProvider>,
    ) -> Result<Self, EngineError> {
        let state = fresh_state(&config)?;
        let session_id = SessionId::new();
        info!(session = %session_id, zones = state.zones.len(), "game session started");
        Ok(Self {
            config,
            provider,
            state,
            research: ResearchLog::new(),
            session_id,
            challenges_generated: 0,
            active: None,
            baseline: None,
        })
    }

    /// Discard all progress and start over with the same configuration and
    /// provider. This is the only way boss encounters are reset.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Progression`] if the catalog is invalid.
    pub fn restart(&mut self) -> Result<(), EngineError> {
        self.state = fresh_state(&self.config)?;
        self.research = ResearchLog::new();
        self.session_id = SessionId::new();
        self.challenges_generated = 0;
        self.active = None;
        self.baseline = None;
        info!(session = %self.session_id, "game restarted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    /// The active configuration.
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The raw game state.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Anonymous id of this session.
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Status view for displays.
    pub fn game_state(&self) -> GameStateView {
        let current_zone = self
            .state
            .current_zone_id
            .as_ref()
            .and_then(|id| self.state.zone(id));
        let current_branch = match (&self.state.current_zone_id, &self.state.current_branch_id) {
            (Some(zone_id), Some(branch_id)) => self.state.branch(zone_id, branch_id),
            _ => None,
        };
        GameStateView {
            current_zone_id: self.state.current_zone_id.clone(),
            current_zone: current_zone.map(|z| z.name.clone()),
            current_branch_id: self.state.current_branch_id.clone(),
            current_branch: current_branch.map(|b| b.name.clone()),
            difficulty_level: self.current_difficulty(),
            knowledge_health: self.state.knowledge_health,
            knowledge_health_band: knowledge_health::band(
                self.state.knowledge_health,
                &self.config.knowledge_health,
            ),
            total_points: self.state.total_points,
            boss_progress: self.state.boss_progress.clone(),
            streak: self.state.streak,
        }
    }

    /// Difficulty tier derived from the current state.
    pub fn current_difficulty(&self) -> DifficultyTier {
        difficulty::current_difficulty(&self.state, &self.config.difficulty)
    }

    /// Mean branch mastery across unlocked zones.
    pub fn overall_mastery(&self) -> u32 {
        mastery::overall_mastery(&self.state)
    }

    /// Per-zone mastery map.
    pub fn progress_snapshot(&self) -> ProgressSnapshot {
        mastery::progress_snapshot(
            &self.state,
            &self.config.progression,
            self.current_difficulty(),
        )
    }

    /// Every awarded badge, in award order.
    pub fn badges(&self) -> &[Badge] {
        &self.state.badges
    }

    /// Zones in catalog order.
    pub fn zones(&self) -> &[Zone] {
        &self.state.zones
    }

    /// Branches of a zone in authored order.
    pub fn branches_for_zone(&self, zone_id: &ZoneId) -> Vec<&Branch> {
        zones::branches_for_zone(&self.state, zone_id)
    }

    /// Branch completion target and boss max HP.
    pub const fn clear_targets(&self) -> ClearTargets {
        self.config.progression.clear_targets()
    }

    /// The branch after the current one in its zone, completed or not.
    pub fn next_branch(&self) -> Option<&Branch> {
        let zone_id = self.state.current_zone_id.as_ref()?;
        let branch_id = self.state.current_branch_id.as_ref()?;
        zones::next_branch(&self.state, zone_id, branch_id)
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Enter an unlocked zone. Abandons any challenge in flight.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSelection`] for a missing or locked
    /// zone; the state is unchanged.
    pub fn enter_zone(&mut self, zone_id: &ZoneId) -> Result<Zone, EngineError> {
        let zone = zones::enter_zone(&mut self.state, zone_id)?;
        self.active = None;
        Ok(zone)
    }

    /// Select a branch and start a progress baseline for the session
    /// summary. Abandons any challenge in flight.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSelection`] for a locked zone or an
    /// unknown branch; the state is unchanged.
    pub fn select_branch(
        &mut self,
        zone_id: &ZoneId,
        branch_id: &BranchId,
    ) -> Result<Branch, EngineError> {
        let branch = zones::select_branch(&mut self.state, zone_id, branch_id)?;
        self.active = None;
        self.baseline = Some(SessionBaseline {
            zone_id: zone_id.clone(),
            points: self.state.total_points,
            mastery: self.overall_mastery(),
            knowledge_health: self.state.knowledge_health,
        });
        Ok(branch)
    }

    /// Debug override: unlock the first locked zone in catalog order.
    /// Returns `None` once every zone is unlocked.
    pub fn unlock_one_zone_debug(&mut self) -> Option<ZoneId> {
        zones::unlock_one_zone_debug(&mut self.state)
    }

    /// Adjust Knowledge Health by `delta`, clamped to `0..=100`.
    pub fn modify_knowledge_health(&mut self, delta: f64) -> f64 {
        knowledge_health::modify_knowledge_health(&mut self.state, delta)
    }

    // -----------------------------------------------------------------------
    // Challenges
    // -----------------------------------------------------------------------

    fn engine(&self) -> ChallengeEngine<'_> {
        ChallengeEngine::new(&self.config, self.provider.as_ref())
    }

    /// Generate a challenge for the current selection at the current tier
    /// and start its timer at `now`. Supersedes any challenge in flight.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSelection`] if the pair is not the
    /// current selection of an unlocked zone.
    pub fn generate_challenge(
        &mut self,
        zone_id: &ZoneId,
        branch_id: &BranchId,
        now: Instant,
    ) -> Result<Challenge, EngineError> {
        let tier = self.current_difficulty();
        let challenge = self.engine().generate_challenge(
            &self.state,
            zone_id,
            branch_id,
            tier,
            self.challenges_generated,
        )?;
        self.challenges_generated = self.challenges_generated.saturating_add(1);
        self.active = Some(ActiveChallenge {
            challenge: challenge.clone(),
            timer: ChallengeTimer::start(now),
        });
        Ok(challenge)
    }

    /// The challenge in flight.
    pub fn active_challenge(&self) -> Option<&Challenge> {
        self.active.as_ref().map(|a| &a.challenge)
    }

    /// Answer options for the challenge in flight.
    pub fn choice_options(&self) -> Vec<String> {
        self.active_challenge()
            .map_or_else(Vec::new, build_choice_options)
    }

    /// `"Branch Boss Active | HP h/max"` while a boss challenge is in flight.
    pub fn boss_indicator(&self) -> Option<String> {
        let challenge = self.active_challenge()?;
        if !challenge.encounter_type.is_boss() {
            return None;
        }
        let max_hp = self.config.progression.boss_max_hp;
        let text = self
            .state
            .boss(&challenge.zone_id, &challenge.branch_id)
            .map_or_else(
                || format!("Branch Boss Active | HP {max_hp}/{max_hp}"),
                boss::indicator_text,
            );
        Some(text)
    }

    /// Apply Knowledge Health decay for the wall-clock time since the
    /// previous tick. Returns `None` when no challenge is in flight.
    pub fn tick(&mut self, now: Instant) -> Option<TickReport> {
        let active = self.active.as_mut()?;
        let delta_seconds = active.timer.tick(now);
        let elapsed_seconds = active.timer.elapsed_seconds(now);
        let expected = active.challenge.expected_seconds;

        let decay = knowledge_health::apply_decay(
            &mut self.state,
            &self.config.knowledge_health,
            active.challenge.difficulty,
            active.challenge.encounter_type,
            elapsed_seconds,
            expected,
            delta_seconds,
        );
        let ratio = pacing::pace_ratio(elapsed_seconds, expected);
        Some(TickReport {
            elapsed_seconds,
            delta_seconds,
            decay: decay.decayed,
            knowledge_health: decay.knowledge_health,
            multiplier: pacing::live_multiplier(&self.config.pacing, elapsed_seconds, expected),
            pace: pacing::pace_label(&self.config.pacing, ratio),
            urgent: decay.urgent,
        })
    }

    /// Answer the challenge in flight, timed at `now`.
    ///
    /// Decay up to `now` is applied first. The challenge is consumed even if
    /// evaluation fails.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoActiveChallenge`] when nothing is in flight
    /// (a no-op), or the evaluation error.
    pub fn submit_answer(
        &mut self,
        answer: &str,
        now: Instant,
    ) -> Result<EvaluationResult, EngineError> {
        if self.active.is_none() {
            debug!("answer submitted with no active challenge");
            return Err(EngineError::NoActiveChallenge);
        }
        let _ = self.tick(now);
        let active = self.active.take().ok_or(EngineError::NoActiveChallenge)?;
        let timing = EvaluationTiming {
            elapsed_seconds: active.timer.elapsed_seconds(now),
            expected_seconds: active.challenge.expected_seconds,
        };
        self.evaluate_answer(answer, &active.challenge, timing)
    }

    /// Evaluate an answer to a given challenge with caller-measured timing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSelection`] if the challenge's branch
    /// does not exist.
    pub fn evaluate_answer(
        &mut self,
        answer: &str,
        challenge: &Challenge,
        timing: EvaluationTiming,
    ) -> Result<EvaluationResult, EngineError> {
        let engine = ChallengeEngine::new(&self.config, self.provider.as_ref());
        engine.evaluate_answer(&mut self.state, &mut self.research, answer, challenge, timing)
    }

    /// Drop the challenge in flight. Returns `false` if there was none.
    pub fn abandon_challenge(&mut self) -> bool {
        self.active.take().is_some()
    }

    // -----------------------------------------------------------------------
    // Summaries and diagnostics
    // -----------------------------------------------------------------------

    /// Progress since the last branch selection.
    pub fn session_summary(&self) -> Option<SessionSummary> {
        let baseline = self.baseline.as_ref()?;
        Some(SessionSummary {
            zone_id: baseline.zone_id.clone(),
            points_gained: self.state.total_points.saturating_sub(baseline.points),
            mastery_change: i64::from(self.overall_mastery())
                .saturating_sub(i64::from(baseline.mastery)),
            knowledge_health_change: self.state.knowledge_health - baseline.knowledge_health,
        })
    }

    /// What the content provider has authored.
    pub fn content_diagnostics(&self) -> ContentDiagnostics {
        content::content_diagnostics(self.provider.as_ref())
    }

    /// Generate a Science/Physics sample and check the provider covers it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidSelection`] if the catalog has no
    /// Science/Physics branch.
    pub fn run_content_smoke_test(&self) -> Result<SmokeTestReport, EngineError> {
        let diagnostics = self.content_diagnostics();
        let zone_id = ZoneId::from(SMOKE_TEST_ZONE);
        let sample = self.engine().sample_challenge(
            &self.state,
            &zone_id,
            &BranchId::from(SMOKE_TEST_BRANCH),
            self.current_difficulty(),
            self.challenges_generated,
        )?;
        let pass = diagnostics.authored_zones.contains(&zone_id) && !sample.prompt.is_empty();
        Ok(SmokeTestReport {
            pass,
            diagnostics,
            challenge_sample: ChallengeSample {
                id: sample.id,
                question_type: sample.question_type,
                difficulty: sample.difficulty,
                encounter_type: sample.encounter_type,
                fallback: sample.fallback,
            },
        })
    }

    // -----------------------------------------------------------------------
    // Research
    // -----------------------------------------------------------------------

    /// The research log.
    pub const fn research_log(&self) -> &ResearchLog {
        &self.research
    }

    /// Aggregates over the research log.
    pub fn research_summary(&self) -> ResearchSummary {
        research::summarize(&self.research)
    }

    /// Export document for the research log.
    pub fn research_export(&self) -> ResearchExport {
        research::export(&self.research, self.session_id)
    }

    /// Research export as JSON. Failure leaves the game untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Serialization`] if encoding fails.
    pub fn export_research_json(&self) -> Result<String, ResearchError> {
        research::export_json(&self.research, self.session_id)
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Capture state, badges and research log as one versioned snapshot.
    pub fn capture_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            session_id: self.session_id,
            challenges_generated: self.challenges_generated,
            state: self.state.clone(),
            research_log: self.research.entries().to_vec(),
        }
    }

    /// Resume a game from a snapshot with the built-in question bank.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] for other schema versions or dangling
    /// references.
    pub fn restore(config: GameConfig, snapshot: SessionSnapshot) -> Result<Self, SnapshotError> {
        Self::restore_with_provider(config, Box::new(BuiltinContentProvider::new()), snapshot)
    }

    /// Resume a game from a snapshot with a custom content provider.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] for other schema versions or dangling
    /// references.
    pub fn restore_with_provider(
        config: GameConfig,
        provider: Box<dyn ContentProvider>,
        snapshot: SessionSnapshot,
    ) -> Result<Self, SnapshotError> {
        snapshot.check_version()?;
        let mut state = snapshot.state;
        sanitize_state(&mut state)?;
        info!(session = %snapshot.session_id, "game session restored");
        Ok(Self {
            config,
            provider,
            state,
            research: ResearchLog::from_entries(snapshot.research_log),
            session_id: snapshot.session_id,
            challenges_generated: snapshot.challenges_generated,
            active: None,
            baseline: None,
        })
    }
}
