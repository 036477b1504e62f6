//! End-to-end tests of the game session: decay over real tick sequences,
//! boss encounters, zone unlocking, badge awards and snapshots.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use quizionix_core::{
    ChallengeContent, ContentError, ContentProvider, ContentRequest, EngineError, GameConfig,
    GameSession, SessionSnapshot, SnapshotError,
};
use quizionix_types::{
    BranchId, Challenge, EncounterType, EvaluationResult, EvaluationTiming, PaceLabel,
    QuestionType, ZoneId,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(start: Instant, millis: u64) -> Instant {
    start
        .checked_add(Duration::from_millis(millis))
        .unwrap_or(start)
}

fn science() -> ZoneId {
    ZoneId::from("science")
}

fn physics() -> BranchId {
    BranchId::from("physics")
}

fn new_session() -> GameSession {
    GameSession::new(GameConfig::default()).expect("default config builds a session")
}

fn capital_session() -> GameSession {
    GameSession::with_provider(GameConfig::default(), Box::new(CapitalProvider))
        .expect("custom provider builds a session")
}

/// Generate a challenge for the pair and answer it correctly after two
/// seconds.
fn answer_correctly(
    session: &mut GameSession,
    zone: &ZoneId,
    branch: &BranchId,
) -> EvaluationResult {
    let start = Instant::now();
    let challenge = session
        .generate_challenge(zone, branch, start)
        .expect("challenge generated");
    session
        .submit_answer(&challenge.correct_answer, at(start, 2_000))
        .expect("answer accepted")
}

fn answer_wrongly(
    session: &mut GameSession,
    zone: &ZoneId,
    branch: &BranchId,
) -> EvaluationResult {
    let start = Instant::now();
    session
        .generate_challenge(zone, branch, start)
        .expect("challenge generated");
    session
        .submit_answer("definitely wrong", at(start, 2_000))
        .expect("answer accepted")
}

fn select(session: &mut GameSession, zone: &ZoneId, branch: &BranchId) {
    session
        .select_branch(zone, branch)
        .expect("branch is selectable");
}

/// Select the branch and answer until its boss is available.
fn master_branch(session: &mut GameSession, zone: &ZoneId, branch: &BranchId) {
    select(session, zone, branch);
    for _ in 0..5 {
        answer_correctly(session, zone, branch);
    }
}

/// Master the branch and defeat its boss.
fn clear_branch(session: &mut GameSession, zone: &ZoneId, branch: &BranchId) {
    master_branch(session, zone, branch);
    for _ in 0..3 {
        answer_correctly(session, zone, branch);
    }
}

/// A provider that asks the same free-text question everywhere.
struct CapitalProvider;

impl ContentProvider for CapitalProvider {
    fn challenge_content(
        &self,
        _request: &ContentRequest,
    ) -> Result<ChallengeContent, ContentError> {
        Ok(ChallengeContent {
            question_type: QuestionType::Text,
            prompt: "What is the capital of France?".to_owned(),
            correct_answer: "Paris".to_owned(),
            distractors: Vec::new(),
            hint: Some("It sits on the Seine.".to_owned()),
        })
    }

    fn authored_zones(&self) -> Vec<ZoneId> {
        vec![science()]
    }

    fn authored_item_count(&self, zone_id: &ZoneId) -> u32 {
        u32::from(*zone_id == science())
    }
}

// ---------------------------------------------------------------------------
// Knowledge Health decay
// ---------------------------------------------------------------------------

#[test]
fn decay_over_ten_seconds_matches_analytic_rate() {
    let mut session = new_session();
    let start = Instant::now();
    select(&mut session, &science(), &physics());
    let challenge = session
        .generate_challenge(&science(), &physics(), start)
        .expect("challenge generated");
    assert_eq!(challenge.encounter_type, EncounterType::Normal);

    let mut now_ms = 0_u64;
    while now_ms < 10_000 {
        now_ms = now_ms.saturating_add(250);
        assert!(session.tick(at(start, now_ms)).is_some());
    }

    let kh = &session.config().knowledge_health;
    let expected = challenge.expected_seconds;
    // Integral of base + coefficient * t / expected over [0, 10].
    let analytic =
        kh.decay_base(challenge.difficulty) * 10.0 + kh.pressure_coefficient / expected * 50.0;
    let decayed = 100.0 - session.state().knowledge_health;
    assert!(
        (decayed - analytic).abs() <= analytic * 0.05,
        "decayed {decayed}, analytic {analytic}"
    );
}

#[test]
fn irregular_ticks_integrate_to_the_same_total() {
    let (mut regular, mut irregular) = (new_session(), new_session());
    let start = Instant::now();
    for session in [&mut regular, &mut irregular] {
        select(session, &science(), &physics());
        session
            .generate_challenge(&science(), &physics(), start)
            .expect("challenge generated");
    }

    let mut now_ms = 0_u64;
    while now_ms < 4_000 {
        now_ms = now_ms.saturating_add(250);
        assert!(regular.tick(at(start, now_ms)).is_some());
    }
    for ms in [100, 1_300, 1_350, 2_900, 4_000] {
        assert!(irregular.tick(at(start, ms)).is_some());
    }

    let a = 100.0 - regular.state().knowledge_health;
    let b = 100.0 - irregular.state().knowledge_health;
    assert!((a - b).abs() <= a * 0.05, "regular {a}, irregular {b}");
}

#[test]
fn no_decay_after_the_challenge_is_answered() {
    let mut session = new_session();
    select(&mut session, &science(), &physics());
    answer_wrongly(&mut session, &science(), &physics());
    let after_answer = session.state().knowledge_health;
    assert!(session.tick(at(Instant::now(), 60_000)).is_none());
    assert!((session.state().knowledge_health - after_answer).abs() < f64::EPSILON);
}

// ---------------------------------------------------------------------------
// Answer matching
// ---------------------------------------------------------------------------

#[test]
fn padded_mixed_case_answer_is_accepted() {
    let mut session = capital_session();
    let start = Instant::now();
    select(&mut session, &science(), &physics());
    session
        .generate_challenge(&science(), &physics(), start)
        .expect("challenge generated");
    assert!(session.choice_options().is_empty());

    let result = session
        .submit_answer(" Paris ", at(start, 1_000))
        .expect("answer accepted");
    assert!(result.success);
    assert!(result.remediation_hint.is_none());
}

#[test]
fn wrong_answer_reveals_answer_and_hint() {
    let mut session = capital_session();
    select(&mut session, &science(), &physics());
    let result = answer_wrongly(&mut session, &science(), &physics());
    assert!(!result.success);
    assert!(result.message.contains("Paris"));
    assert!(result.remediation_hint.is_some());
    assert_eq!(result.points_awarded, 0);
}

// ---------------------------------------------------------------------------
// Bosses
// ---------------------------------------------------------------------------

#[test]
fn boss_is_gated_on_full_mastery() {
    let mut session = new_session();
    select(&mut session, &science(), &physics());
    for _ in 0..4 {
        let result = answer_correctly(&mut session, &science(), &physics());
        assert!(!result.boss_ready);
    }
    let fifth = answer_correctly(&mut session, &science(), &physics());
    assert!(fifth.boss_ready);
    assert!(fifth.branch_completed);

    let next = session
        .generate_challenge(&science(), &physics(), Instant::now())
        .expect("challenge generated");
    assert_eq!(next.encounter_type, EncounterType::Boss);
    assert!(
        session
            .boss_indicator()
            .is_some_and(|text| text == "Branch Boss Active | HP 3/3")
    );
}

#[test]
fn three_fast_hits_defeat_the_boss() {
    let mut session = new_session();
    master_branch(&mut session, &science(), &physics());

    let timing = EvaluationTiming {
        elapsed_seconds: 5.0,
        expected_seconds: 20.0,
    };
    let mut results = Vec::new();
    for _ in 0..3 {
        let challenge = session
            .generate_challenge(&science(), &physics(), Instant::now())
            .expect("challenge generated");
        assert_eq!(challenge.encounter_type, EncounterType::Boss);
        assert!(session.abandon_challenge());
        let result = session
            .evaluate_answer(&challenge.correct_answer, &challenge, timing)
            .expect("boss answer evaluated");
        assert!(result.success);
        assert_eq!(result.pace, PaceLabel::Fast);
        assert!(result.points_awarded > 0);
        results.push(result);
    }

    let hp_texts: Vec<&str> = results
        .iter()
        .map(|r| r.boss_progress_text.as_str())
        .collect();
    assert_eq!(
        hp_texts,
        vec![
            "Branch boss HP: 2/3.",
            "Branch boss HP: 1/3.",
            "Branch boss defeated.",
        ]
    );
    let last = results.last().expect("three boss answers");
    assert!(last.boss_completed);
    assert!(last.unlocked_zones.is_empty());
    assert!(last.new_badges.iter().any(|b| b.id.starts_with("boss-breaker")));
    assert!(
        session
            .state()
            .boss(&science(), &physics())
            .is_some_and(|e| e.hp == 0)
    );

    // Cleared bosses do not come back.
    let after = session
        .generate_challenge(&science(), &physics(), Instant::now())
        .expect("challenge generated");
    assert_eq!(after.encounter_type, EncounterType::Normal);
}

#[test]
fn wrong_boss_answer_keeps_hp() {
    let mut session = new_session();
    master_branch(&mut session, &science(), &physics());
    let result = answer_wrongly(&mut session, &science(), &physics());
    assert_eq!(result.encounter_type, EncounterType::Boss);
    assert!(!result.success);
    assert!(
        session
            .state()
            .boss(&science(), &physics())
            .is_some_and(|e| e.hp == e.max_hp)
    );
}

// ---------------------------------------------------------------------------
// Zones and badges
// ---------------------------------------------------------------------------

#[test]
fn clearing_every_branch_unlocks_the_next_zone() {
    let mut session = new_session();
    let mathematics = ZoneId::from("mathematics");
    assert!(matches!(
        session.enter_zone(&mathematics),
        Err(EngineError::InvalidSelection(_))
    ));

    clear_branch(&mut session, &science(), &physics());
    clear_branch(&mut session, &science(), &BranchId::from("chemistry"));
    clear_branch(&mut session, &science(), &BranchId::from("biology"));

    assert!(session.zones().iter().any(|z| z.id == mathematics && z.unlocked));
    assert!(session.enter_zone(&mathematics).is_ok());
    assert!(session.badges().iter().any(|b| b.id.starts_with("zone-conqueror")));

    let progress = session.progress_snapshot();
    let science_progress = progress.mastery_map.iter().find(|z| z.zone_id == science());
    assert!(science_progress.is_some_and(|z| z.mastery == 100 && z.boss_completed));
}

#[test]
fn debug_unlock_is_idempotent() {
    let mut session = new_session();
    let mut unlocked = Vec::new();
    while let Some(zone) = session.unlock_one_zone_debug() {
        unlocked.push(zone);
    }
    assert_eq!(unlocked.len(), 3);
    assert!(session.unlock_one_zone_debug().is_none());
    assert!(session.zones().iter().all(|z| z.unlocked));
}

#[test]
fn badges_are_never_awarded_twice() {
    let mut session = new_session();
    clear_branch(&mut session, &science(), &physics());
    select(&mut session, &science(), &physics());
    for _ in 0..6 {
        answer_correctly(&mut session, &science(), &physics());
    }

    let ids: Vec<&str> = session.badges().iter().map(|b| b.id.as_str()).collect();
    let unique: BTreeSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());
    assert!(ids.contains(&"first-steps"));
    assert!(ids.contains(&"streak-10"));
}

#[test]
fn points_and_mastery_never_decrease() {
    let mut session = new_session();
    select(&mut session, &science(), &physics());
    let mut points = 0_u64;
    let mut mastery = 0_u32;
    for round in 0_u32..12 {
        if round % 3 == 0 {
            answer_wrongly(&mut session, &science(), &physics());
        } else {
            answer_correctly(&mut session, &science(), &physics());
        }
        let branch_mastery = session
            .state()
            .branch(&science(), &physics())
            .expect("physics exists")
            .mastery;
        assert!(session.state().total_points >= points);
        assert!(branch_mastery >= mastery);
        assert!(branch_mastery <= 100);
        points = session.state().total_points;
        mastery = branch_mastery;
    }
}

#[test]
fn session_summary_tracks_progress_since_selection() {
    let mut session = new_session();
    assert!(session.session_summary().is_none());
    select(&mut session, &science(), &physics());
    answer_correctly(&mut session, &science(), &physics());
    let summary = session.session_summary().expect("summary after selection");
    assert!(summary.points_gained > 0);
    assert!(summary.mastery_change > 0);
}

// ---------------------------------------------------------------------------
// Research and snapshots
// ---------------------------------------------------------------------------

#[test]
fn research_export_counts_every_answer() {
    let mut session = new_session();
    select(&mut session, &science(), &physics());
    answer_correctly(&mut session, &science(), &physics());
    answer_wrongly(&mut session, &science(), &physics());

    let summary = session.research_summary();
    assert_eq!(summary.total_attempts, 2);
    assert_eq!(summary.successes, 1);
    let json = session.export_research_json().expect("research log serializes");
    assert!(json.contains(&session.session_id().to_string()));
    assert!(!json.contains("definitely wrong"));
}

#[test]
fn snapshot_restores_progress() {
    let mut session = new_session();
    master_branch(&mut session, &science(), &physics());
    answer_correctly(&mut session, &science(), &physics());

    let json = session
        .capture_snapshot()
        .to_json()
        .expect("snapshot serializes");
    let snapshot = SessionSnapshot::from_json(&json).expect("snapshot parses");
    let mut restored = GameSession::restore(GameConfig::default(), snapshot)
        .expect("snapshot restores");

    assert_eq!(restored.state(), session.state());
    assert_eq!(restored.session_id(), session.session_id());
    assert_eq!(restored.research_log().len(), session.research_log().len());
    assert!(restored.active_challenge().is_none());

    // The restored boss picks up where it left off.
    let challenge: Challenge = restored
        .generate_challenge(&science(), &physics(), Instant::now())
        .expect("challenge generated");
    assert_eq!(challenge.encounter_type, EncounterType::Boss);
    assert!(
        restored
            .boss_indicator()
            .is_some_and(|text| text.ends_with("HP 2/3"))
    );
}

#[test]
fn snapshot_from_another_version_is_rejected() {
    let session = new_session();
    let mut snapshot = session.capture_snapshot();
    snapshot.version = 7;
    assert!(matches!(
        GameSession::restore(GameConfig::default(), snapshot),
        Err(SnapshotError::UnsupportedVersion { found: 7, .. })
    ));
}
