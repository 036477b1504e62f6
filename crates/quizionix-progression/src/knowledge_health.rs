//! Knowledge Health (KH): the bounded pressure resource.
//!
//! - Every change is clamped to `[0, 100]`.
//! - While a challenge is active, KH decays continuously at
//!   `decay_per_second`, integrated over the wall-clock time between ticks.
//! - A correct answer restores a fixed amount; a wrong one removes a fixed
//!   amount.
//! - Reaching 0 has no gameplay consequence. Below the urgency threshold the
//!   state only signals urgency to displays.

use quizionix_types::{DifficultyTier, EncounterType, GameState, KnowledgeHealthBand};

use crate::config::KnowledgeHealthConfig;

/// Lower bound of Knowledge Health.
pub const KNOWLEDGE_HEALTH_MIN: f64 = 0.0;

/// Upper bound of Knowledge Health.
pub const KNOWLEDGE_HEALTH_MAX: f64 = 100.0;

/// Result of applying one decay tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayTick {
    /// Knowledge Health actually removed (after clamping).
    pub decayed: f64,
    /// Knowledge Health after the tick.
    pub knowledge_health: f64,
    /// Knowledge Health is below the urgency threshold.
    pub urgent: bool,
}

/// Clamp a value into the Knowledge Health range. NaN maps to the minimum.
pub fn clamp_knowledge_health(value: f64) -> f64 {
    if value.is_nan() {
        return KNOWLEDGE_HEALTH_MIN;
    }
    value.clamp(KNOWLEDGE_HEALTH_MIN, KNOWLEDGE_HEALTH_MAX)
}

/// Add `delta` to the state's Knowledge Health and return the clamped result.
///
/// A non-finite delta leaves the value unchanged.
pub fn modify_knowledge_health(state: &mut GameState, delta: f64) -> f64 {
    if delta.is_finite() {
        state.knowledge_health = clamp_knowledge_health(state.knowledge_health + delta);
    }
    state.knowledge_health
}

/// Decay rate in KH per second:
///
/// ```text
/// base[tier] + (boss_load if boss) + min(pressure_cap, elapsed / expected * pressure_coefficient)
/// ```
///
/// `expected` is floored at one second.
pub fn decay_per_second(
    config: &KnowledgeHealthConfig,
    tier: DifficultyTier,
    encounter: EncounterType,
    elapsed_seconds: f64,
    expected_seconds: f64,
) -> f64 {
    let base = config.decay_base(tier);
    let boss_load = if encounter.is_boss() { config.boss_load } else { 0.0 };
    let ratio = elapsed_seconds.max(0.0) / expected_seconds.max(1.0);
    let pressure = (ratio * config.pressure_coefficient).min(config.pressure_cap);
    base + boss_load + pressure
}

/// Apply `delta_seconds` of decay at the rate for `elapsed_seconds`.
///
/// Callers pass the wall-clock time since their previous tick, so irregular
/// tick intervals integrate to the same total.
pub fn apply_decay(
    state: &mut GameState,
    config: &KnowledgeHealthConfig,
    tier: DifficultyTier,
    encounter: EncounterType,
    elapsed_seconds: f64,
    expected_seconds: f64,
    delta_seconds: f64,
) -> DecayTick {
    let before = state.knowledge_health;
    if delta_seconds > 0.0 {
        let rate = decay_per_second(config, tier, encounter, elapsed_seconds, expected_seconds);
        modify_knowledge_health(state, -(rate * delta_seconds));
    }
    let after = state.knowledge_health;
    DecayTick {
        decayed: before - after,
        knowledge_health: after,
        urgent: is_urgent(after, config),
    }
}

/// Apply the fixed reward or penalty for an evaluated answer and return the
/// change actually applied.
pub fn apply_answer_outcome(
    state: &mut GameState,
    config: &KnowledgeHealthConfig,
    success: bool,
) -> f64 {
    let before = state.knowledge_health;
    let delta = if success {
        config.success_restore
    } else {
        -config.failure_penalty
    };
    let after = modify_knowledge_health(state, delta);
    after - before
}

/// Knowledge Health is below the urgency threshold.
pub fn is_urgent(knowledge_health: f64, config: &KnowledgeHealthConfig) -> bool {
    knowledge_health < config.urgent_below
}

/// Display band for a Knowledge Health value.
pub fn band(knowledge_health: f64, config: &KnowledgeHealthConfig) -> KnowledgeHealthBand {
    if knowledge_health < config.urgent_below {
        KnowledgeHealthBand::Critical
    } else if knowledge_health < config.strained_below {
        KnowledgeHealthBand::Strained
    } else {
        KnowledgeHealthBand::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(kh: f64) -> GameState {
        GameState::new(Vec::new(), Vec::new(), kh)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn large_negative_delta_floors_at_zero() {
        let mut state = state_with(50.0);
        assert!(approx(modify_knowledge_health(&mut state, -150.0), 0.0));
    }

    #[test]
    fn large_positive_delta_caps_at_hundred() {
        let mut state = state_with(90.0);
        assert!(approx(modify_knowledge_health(&mut state, 1000.0), 100.0));
    }

    #[test]
    fn non_finite_delta_is_ignored() {
        let mut state = state_with(42.0);
        assert!(approx(modify_knowledge_health(&mut state, f64::NAN), 42.0));
        assert!(approx(modify_knowledge_health(&mut state, f64::INFINITY), 42.0));
    }

    #[test]
    fn decay_rate_matches_formula() {
        let cfg = KnowledgeHealthConfig::default();
        let at_start = decay_per_second(
            &cfg,
            DifficultyTier::Beginner,
            EncounterType::Normal,
            0.0,
            22.0,
        );
        assert!(approx(at_start, 0.55));

        // 11 of 22 seconds: pressure = 0.5 * 0.4 = 0.2; boss adds 0.35
        let boss =
            decay_per_second(&cfg, DifficultyTier::Advanced, EncounterType::Boss, 11.0, 22.0);
        assert!(approx(boss, 0.75 + 0.35 + 0.2));
    }

    #[test]
    fn pressure_term_is_capped() {
        let cfg = KnowledgeHealthConfig::default();
        let rate = decay_per_second(
            &cfg,
            DifficultyTier::Master,
            EncounterType::Normal,
            1000.0,
            10.0,
        );
        assert!(approx(rate, 0.95 + 1.4));
    }

    #[test]
    fn zero_delta_tick_changes_nothing() {
        let cfg = KnowledgeHealthConfig::default();
        let mut state = state_with(70.0);
        let tick = apply_decay(
            &mut state,
            &cfg,
            DifficultyTier::Beginner,
            EncounterType::Normal,
            5.0,
            20.0,
            0.0,
        );
        assert!(approx(tick.decayed, 0.0));
        assert!(approx(state.knowledge_health, 70.0));
    }

    #[test]
    fn irregular_ticks_integrate_like_regular_ones() {
        let cfg = KnowledgeHealthConfig::default();
        let mut regular = state_with(100.0);
        let mut irregular = state_with(100.0);

        // Constant rate while elapsed pressure is held at zero.
        for _ in 0..8 {
            apply_decay(
                &mut regular,
                &cfg,
                DifficultyTier::Beginner,
                EncounterType::Normal,
                0.0,
                22.0,
                0.25,
            );
        }
        for delta in [0.1, 0.7, 0.2, 1.0] {
            apply_decay(
                &mut irregular,
                &cfg,
                DifficultyTier::Beginner,
                EncounterType::Normal,
                0.0,
                22.0,
                delta,
            );
        }
        assert!(approx(regular.knowledge_health, irregular.knowledge_health));
        assert!(approx(regular.knowledge_health, 100.0 - 0.55 * 2.0));
    }

    #[test]
    fn decay_never_drops_below_zero_and_is_not_fatal() {
        let cfg = KnowledgeHealthConfig::default();
        let mut state = state_with(1.0);
        let tick = apply_decay(
            &mut state,
            &cfg,
            DifficultyTier::Master,
            EncounterType::Boss,
            60.0,
            10.0,
            30.0,
        );
        assert!(approx(tick.knowledge_health, 0.0));
        assert!(approx(tick.decayed, 1.0));
        assert!(tick.urgent);
    }

    #[test]
    fn answer_outcomes_use_fixed_amounts() {
        let cfg = KnowledgeHealthConfig::default();
        let mut state = state_with(50.0);
        assert!(approx(apply_answer_outcome(&mut state, &cfg, true), 8.0));
        assert!(approx(apply_answer_outcome(&mut state, &cfg, false), -12.0));
        assert!(approx(state.knowledge_health, 46.0));

        let mut full = state_with(96.0);
        assert!(approx(apply_answer_outcome(&mut full, &cfg, true), 4.0));
    }

    #[test]
    fn bands_follow_thresholds() {
        let cfg = KnowledgeHealthConfig::default();
        assert_eq!(band(29.9, &cfg), KnowledgeHealthBand::Critical);
        assert_eq!(band(30.0, &cfg), KnowledgeHealthBand::Strained);
        assert_eq!(band(59.0, &cfg), KnowledgeHealthBand::Strained);
        assert_eq!(band(60.0, &cfg), KnowledgeHealthBand::Healthy);
    }
}
