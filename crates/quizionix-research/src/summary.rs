//! Aggregates over the research log and the versioned JSON export.

use chrono::Utc;
use quizionix_types::{ResearchExport, ResearchSummary, SessionId};
use tracing::warn;

use crate::{ResearchError, ResearchLog};

/// Schema version written into every export.
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// Compute aggregates over every entry in the log.
pub fn summarize(log: &ResearchLog) -> ResearchSummary {
    let mut summary = ResearchSummary::default();
    let mut elapsed_sum = 0.0_f64;
    let mut expected_sum = 0.0_f64;
    let mut pace_sum = 0.0_f64;
    let mut multiplier_sum = 0.0_f64;

    for entry in log.entries() {
        summary.total_attempts = summary.total_attempts.saturating_add(1);
        if entry.success {
            summary.successes = summary.successes.saturating_add(1);
        } else {
            summary.failures = summary.failures.saturating_add(1);
        }
        if entry.encounter_type.is_boss() {
            summary.boss_attempts = summary.boss_attempts.saturating_add(1);
            if entry.success {
                summary.boss_successes = summary.boss_successes.saturating_add(1);
            }
        }
        summary.points_awarded = summary.points_awarded.saturating_add(entry.points_delta);
        summary.net_knowledge_health_delta += entry.knowledge_health_delta();

        elapsed_sum += entry.elapsed_seconds;
        expected_sum += entry.expected_seconds;
        pace_sum += entry.pace_ratio;
        multiplier_sum += entry.multiplier;

        let tier = summary
            .by_difficulty
            .entry(entry.difficulty.label().to_owned())
            .or_default();
        tier.attempts = tier.attempts.saturating_add(1);
        if entry.success {
            tier.successes = tier.successes.saturating_add(1);
        }

        let zone = summary
            .attempts_by_zone
            .entry(entry.zone_id.clone())
            .or_default();
        *zone = zone.saturating_add(1);
    }

    if summary.total_attempts > 0 {
        #[allow(clippy::cast_precision_loss)]
        let count = summary.total_attempts as f64;
        #[allow(clippy::cast_precision_loss)]
        let successes = summary.successes as f64;
        summary.accuracy_pct = successes / count * 100.0;
        summary.mean_elapsed_seconds = elapsed_sum / count;
        summary.mean_expected_seconds = expected_sum / count;
        summary.mean_pace_ratio = pace_sum / count;
        summary.mean_multiplier = multiplier_sum / count;
    }

    summary
}

/// Build the export document for a session.
pub fn export(log: &ResearchLog, session_id: SessionId) -> ResearchExport {
    ResearchExport {
        schema_version: EXPORT_SCHEMA_VERSION,
        session_id,
        generated_at: Utc::now(),
        summary: summarize(log),
        entries: log.entries().to_vec(),
    }
}

/// Serialize the export document as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ResearchError::Serialization`] if encoding fails. The log is
/// never modified.
pub fn export_json(log: &ResearchLog, session_id: SessionId) -> Result<String, ResearchError> {
    serde_json::to_string_pretty(&export(log, session_id)).map_err(|e| {
        warn!(error = %e, "research export failed");
        ResearchError::Serialization(e.to_string())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use quizionix_types::{
        BranchId, ChallengeId, DifficultyTier, EncounterType, QuestionType, ZoneId,
    };

    use super::*;
    use crate::ResearchEntryBuilder;

    fn record(
        log: &mut ResearchLog,
        zone: &str,
        tier: DifficultyTier,
        encounter: EncounterType,
        success: bool,
    ) {
        let builder =
            ResearchEntryBuilder::new(ChallengeId::new(), ZoneId::from(zone), BranchId::from("b"))
                .challenge_kind(tier, encounter, QuestionType::MultipleChoice)
                .timing(10.0, 20.0)
                .multiplier(2.0)
                .outcome(success)
                .knowledge_health(50.0, if success { 58.0 } else { 38.0 })
                .points(if success { 20 } else { 0 }, 0);
        assert!(log.record(builder).is_ok());
    }

    #[test]
    fn empty_log_summarizes_to_zero() {
        let summary = summarize(&ResearchLog::new());
        assert_eq!(summary.total_attempts, 0);
        assert!(summary.accuracy_pct.abs() < f64::EPSILON);
        assert!(summary.by_difficulty.is_empty());
    }

    #[test]
    fn aggregates_count_outcomes() {
        let mut log = ResearchLog::new();
        record(&mut log, "science", DifficultyTier::Beginner, EncounterType::Normal, true);
        record(&mut log, "science", DifficultyTier::Beginner, EncounterType::Normal, false);
        record(&mut log, "science", DifficultyTier::Master, EncounterType::Boss, true);
        record(&mut log, "history", DifficultyTier::Master, EncounterType::Boss, true);

        let summary = summarize(&log);
        assert_eq!(summary.total_attempts, 4);
        assert_eq!(summary.successes, 3);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.boss_attempts, 2);
        assert_eq!(summary.boss_successes, 2);
        assert_eq!(summary.points_awarded, 60);
        assert!((summary.accuracy_pct - 75.0).abs() < 1e-9);
        assert!((summary.mean_pace_ratio - 0.5).abs() < 1e-9);
        assert!((summary.net_knowledge_health_delta - 12.0).abs() < 1e-9);
        assert_eq!(
            summary.by_difficulty.get("Master").map(|t| t.attempts),
            Some(2)
        );
        assert_eq!(summary.attempts_by_zone.get(&ZoneId::from("science")), Some(&3));
    }

    #[test]
    fn export_json_is_versioned_and_has_no_answers() {
        let mut log = ResearchLog::new();
        record(&mut log, "science", DifficultyTier::Beginner, EncounterType::Normal, true);
        let json = export_json(&log, SessionId::new()).expect("export serializes");

        let value: serde_json::Value = serde_json::from_str(&json).expect("export is JSON");
        assert_eq!(value.get("schema_version").and_then(serde_json::Value::as_u64), Some(1));
        let entry = value
            .get("entries")
            .and_then(|e| e.get(0))
            .expect("one exported entry");
        assert!(entry.get("submitted_answer").is_none());
        assert!(entry.get("correct_answer").is_none());
    }
}
