//! Difficulty adapter.
//!
//! The tier is a pure function of the current state. The performance signal
//! starts from the mastery of the selected branch (overall mastery when no
//! branch is selected) and, once enough recent outcomes exist, blends in
//! recent accuracy. Higher sustained performance gives a higher tier and a
//! run of wrong answers lowers it again. There is no hysteresis.

use quizionix_types::{DifficultyTier, GameState};

use crate::config::DifficultyConfig;
use crate::error::ProgressionError;
use crate::mastery;

/// Percentage of correct answers in the recent-outcome window.
///
/// Returns `None` when the window is empty.
pub fn recent_accuracy_pct(state: &GameState) -> Option<u32> {
    let total = u64::try_from(state.recent_outcomes.len()).ok()?;
    let correct = u64::try_from(state.recent_outcomes.iter().filter(|o| **o).count()).ok()?;
    let pct = correct
        .saturating_mul(100)
        .saturating_add(total / 2)
        .checked_div(total)?;
    u32::try_from(pct).ok()
}

/// Performance signal in `0..=100`.
pub fn performance_signal(state: &GameState, config: &DifficultyConfig) -> u32 {
    let mastery = match (&state.current_zone_id, &state.current_branch_id) {
        (Some(zone_id), Some(branch_id)) => state
            .branch(zone_id, branch_id)
            .map_or_else(|| mastery::overall_mastery(state), |b| b.mastery),
        _ => mastery::overall_mastery(state),
    };

    if state.recent_outcomes.len() < config.min_recent_samples {
        return mastery.min(100);
    }

    let Some(accuracy) = recent_accuracy_pct(state) else {
        return mastery.min(100);
    };
    let weight = config.accuracy_weight_pct.min(100);
    let blended = mastery
        .saturating_mul(100_u32.saturating_sub(weight))
        .saturating_add(accuracy.saturating_mul(weight))
        .saturating_add(50)
        / 100;
    blended.min(100)
}

/// Map a signal to its tier.
pub const fn tier_for_signal(signal: u32, config: &DifficultyConfig) -> DifficultyTier {
    if signal >= config.master_threshold {
        DifficultyTier::Master
    } else if signal >= config.advanced_threshold {
        DifficultyTier::Advanced
    } else {
        DifficultyTier::Beginner
    }
}

/// Current difficulty tier, recomputed from the state on every call.
pub fn current_difficulty(state: &GameState, config: &DifficultyConfig) -> DifficultyTier {
    tier_for_signal(performance_signal(state, config), config)
}

/// Record an answer outcome in the rolling window, streaks and counters.
pub fn record_outcome(
    state: &mut GameState,
    success: bool,
    window: usize,
) -> Result<(), ProgressionError> {
    state.recent_outcomes.push(success);
    let window = window.max(1);
    if state.recent_outcomes.len() > window {
        let excess = state.recent_outcomes.len().saturating_sub(window);
        state.recent_outcomes.drain(..excess);
    }

    state.attempts = state
        .attempts
        .checked_add(1)
        .ok_or_else(|| overflow("attempt counter"))?;

    if success {
        state.correct_answers = state
            .correct_answers
            .checked_add(1)
            .ok_or_else(|| overflow("correct answer counter"))?;
        state.streak = state.streak.saturating_add(1);
        state.best_streak = state.best_streak.max(state.streak);
    } else {
        state.streak = 0;
    }

    Ok(())
}

fn overflow(context: &str) -> ProgressionError {
    ProgressionError::ArithmeticOverflow {
        context: context.to_owned(),
    }
}
