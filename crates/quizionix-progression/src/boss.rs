//! Branch boss encounters.
//!
//! Layered on each branch:
//!
//! ```text
//! boss-pending --(mastery >= unlock threshold)--> boss-active --(hp == 0)--> boss-cleared
//! ```
//!
//! The encounter record is created lazily at full HP the first time a boss
//! challenge is generated or evaluated for the branch, and is only removed by
//! restarting the game.

use quizionix_types::{BossEncounter, BossKey, BossStatus, Branch, BranchId, GameState, ZoneId};
use tracing::info;

use crate::config::ProgressionConfig;

/// Outcome of a correct boss answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossHit {
    /// Hit points before the hit.
    pub hp_before: u32,
    /// Hit points after the hit.
    pub hp_after: u32,
    /// Boss max hit points.
    pub max_hp: u32,
    /// This hit took the boss from positive HP to zero.
    pub cleared: bool,
}

/// Boss status of a branch.
pub fn boss_status(state: &GameState, branch: &Branch, config: &ProgressionConfig) -> BossStatus {
    let cleared_encounter = state
        .boss(&branch.zone_id, &branch.id)
        .is_some_and(BossEncounter::is_cleared);
    if branch.completed || cleared_encounter {
        BossStatus::BossCleared
    } else if branch.mastery >= config.boss_unlock_mastery {
        BossStatus::BossActive
    } else {
        BossStatus::BossPending
    }
}

/// Returns `true` if the branch boss is available and not yet cleared.
pub fn is_boss_active(
    state: &GameState,
    zone_id: &ZoneId,
    branch_id: &BranchId,
    config: &ProgressionConfig,
) -> bool {
    state
        .branch(zone_id, branch_id)
        .is_some_and(|b| boss_status(state, b, config) == BossStatus::BossActive)
}

/// Return the branch's encounter, creating it at full HP if needed.
pub fn ensure_encounter<'a>(
    state: &'a mut GameState,
    zone_id: &ZoneId,
    branch_id: &BranchId,
    config: &ProgressionConfig,
) -> &'a mut BossEncounter {
    state
        .boss_progress
        .entry(BossKey::for_branch(zone_id, branch_id))
        .or_insert_with(|| BossEncounter {
            zone_id: zone_id.clone(),
            branch_id: branch_id.clone(),
            hp: config.boss_max_hp,
            max_hp: config.boss_max_hp,
        })
}

/// Apply one correct boss answer.
///
/// Reduces HP by the configured damage (saturating at 0). When the boss
/// reaches 0 HP for the first time the branch is marked completed.
pub fn strike_boss(
    state: &mut GameState,
    zone_id: &ZoneId,
    branch_id: &BranchId,
    config: &ProgressionConfig,
) -> BossHit {
    let encounter = ensure_encounter(state, zone_id, branch_id, config);
    let hp_before = encounter.hp;
    encounter.hp = encounter.hp.saturating_sub(config.boss_damage);
    let hit = BossHit {
        hp_before,
        hp_after: encounter.hp,
        max_hp: encounter.max_hp,
        cleared: hp_before > 0 && encounter.hp == 0,
    };

    if hit.cleared {
        if let Some(branch) = state.branch_mut(zone_id, branch_id) {
            branch.completed = true;
        }
        info!(zone = %zone_id, branch = %branch_id, "branch boss cleared");
    }

    hit
}

/// Indicator line shown while a boss challenge is active.
pub fn indicator_text(encounter: &BossEncounter) -> String {
    format!("Branch Boss Active | HP {}/{}", encounter.hp, encounter.max_hp)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::catalog::ZoneCatalog;

    fn fresh() -> GameState {
        ZoneCatalog::default()
            .build_state(100.0)
            .expect("default catalog builds")
    }

    fn ids() -> (ZoneId, BranchId) {
        (ZoneId::from("science"), BranchId::from("physics"))
    }

    #[test]
    fn boss_pending_until_mastery_threshold() {
        let mut state = fresh();
        let cfg = ProgressionConfig::default();
        let (zone, branch) = ids();
        assert!(!is_boss_active(&state, &zone, &branch, &cfg));

        state.branch_mut(&zone, &branch).expect("physics exists").mastery = 100;
        assert!(is_boss_active(&state, &zone, &branch, &cfg));
    }

    #[test]
    fn encounter_created_lazily_at_full_hp() {
        let mut state = fresh();
        let cfg = ProgressionConfig::default();
        let (zone, branch) = ids();
        assert!(state.boss(&zone, &branch).is_none());
        let hp = ensure_encounter(&mut state, &zone, &branch, &cfg).hp;
        assert_eq!(hp, 3);
        assert_eq!(state.boss_progress.len(), 1);
    }

    #[test]
    fn three_hits_clear_the_boss_and_complete_the_branch() {
        let mut state = fresh();
        let cfg = ProgressionConfig::default();
        let (zone, branch) = ids();

        let first = strike_boss(&mut state, &zone, &branch, &cfg);
        assert_eq!((first.hp_before, first.hp_after, first.cleared), (3, 2, false));
        let second = strike_boss(&mut state, &zone, &branch, &cfg);
        assert_eq!(second.hp_after, 1);
        let third = strike_boss(&mut state, &zone, &branch, &cfg);
        assert!(third.cleared);
        assert_eq!(third.hp_after, 0);
        assert!(state.branch(&zone, &branch).expect("physics exists").completed);

        // Further hits saturate and do not clear again.
        let extra = strike_boss(&mut state, &zone, &branch, &cfg);
        assert_eq!(extra.hp_after, 0);
        assert!(!extra.cleared);
    }

    #[test]
    fn indicator_shows_hp() {
        let encounter = BossEncounter {
            zone_id: ZoneId::from("science"),
            branch_id: BranchId::from("physics"),
            hp: 2,
            max_hp: 3,
        };
        assert_eq!(indicator_text(&encounter), "Branch Boss Active | HP 2/3");
    }
}
