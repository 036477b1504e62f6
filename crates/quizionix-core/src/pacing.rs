//! Challenge pacing: expected-time budget, timing multiplier and the
//! per-challenge clock that drives Knowledge Health decay.
//!
//! The expected time is purely feedback. It sets the pace label and the live
//! multiplier applied to points, and it scales the time-pressure term of KH
//! decay. It never changes whether an answer is correct.
//!
//! # Tick model
//!
//! The [`ChallengeTimer`] is driven by caller-supplied [`Instant`]s. Each
//! [`ChallengeTimer::tick`] returns the wall-clock time since the previous
//! tick, so decay integrates correctly whatever the tick spacing is.

use std::time::{Duration, Instant};

use quizionix_types::{DifficultyTier, EncounterType, PaceLabel};

use crate::config::PacingConfig;

/// Expected seconds for a challenge.
///
/// `max(floor, base[tier] + boss extra + KH adjustment)` where the KH
/// adjustment grants extra time below the low threshold and trims time above
/// the high threshold.
pub fn expected_seconds(
    config: &PacingConfig,
    tier: DifficultyTier,
    encounter: EncounterType,
    knowledge_health: f64,
) -> f64 {
    let mut expected = config.base_seconds(tier);
    if encounter.is_boss() {
        expected += config.boss_extra_seconds;
    }
    if knowledge_health < config.low_health_below {
        expected += config.low_health_extra_seconds;
    } else if knowledge_health > config.high_health_above {
        expected -= config.high_health_trim_seconds;
    }
    expected.max(config.floor_seconds)
}

/// `elapsed / expected`, with expected floored at one second and negative
/// or non-finite elapsed treated as zero.
pub fn pace_ratio(elapsed_seconds: f64, expected_seconds: f64) -> f64 {
    let elapsed = if elapsed_seconds.is_finite() {
        elapsed_seconds.max(0.0)
    } else {
        0.0
    };
    let expected = if expected_seconds.is_finite() {
        expected_seconds.max(1.0)
    } else {
        1.0
    };
    elapsed / expected
}

/// Live timing multiplier: `peak * e^(-decay * ratio)` clamped to
/// `[min, max]`.
pub fn live_multiplier(config: &PacingConfig, elapsed_seconds: f64, expected_seconds: f64) -> f64 {
    let ratio = pace_ratio(elapsed_seconds, expected_seconds);
    let raw = config.multiplier_peak * (-config.multiplier_decay * ratio).exp();
    raw.clamp(config.multiplier_min, config.multiplier_max.max(config.multiplier_min))
}

/// Pace label for an elapsed/expected ratio.
pub fn pace_label(config: &PacingConfig, ratio: f64) -> PaceLabel {
    if ratio <= config.fast_ratio {
        PaceLabel::Fast
    } else if ratio <= config.on_pace_ratio {
        PaceLabel::OnPace
    } else if ratio <= config.slow_ratio {
        PaceLabel::Slow
    } else {
        PaceLabel::Overtime
    }
}

/// Tick interval from the pacing configuration.
pub const fn tick_interval(config: &PacingConfig) -> Duration {
    Duration::from_millis(config.tick_interval_ms)
}

/// Wall-clock timer for the challenge in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeTimer {
    started_at: Instant,
    last_tick: Instant,
}

impl ChallengeTimer {
    /// Start timing at `now`.
    pub const fn start(now: Instant) -> Self {
        Self {
            started_at: now,
            last_tick: now,
        }
    }

    /// Advance to `now` and return the seconds since the previous tick.
    ///
    /// An instant earlier than the previous tick yields 0 and does not move
    /// the timer backwards.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let delta = now.saturating_duration_since(self.last_tick);
        if now > self.last_tick {
            self.last_tick = now;
        }
        delta.as_secs_f64()
    }

    /// Seconds since the timer started.
    pub fn elapsed_seconds(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started_at).as_secs_f64()
    }
}
