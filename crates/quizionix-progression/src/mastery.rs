//! Branch mastery and derived mastery aggregates.
//!
//! Each correct normal answer adds `ceil(100 / branch_clear_target)` mastery
//! to the branch, capped at 100. Mastery never decreases. Zone and overall
//! mastery are means over branch values, recomputed on every call.

use quizionix_types::{
    Badge, BadgeScope, Branch, BranchProgress, BranchStatus, DifficultyTier, GameState,
    ProgressSnapshot, ZoneId, ZoneProgress,
};

use crate::boss;
use crate::config::ProgressionConfig;
use crate::error::ProgressionError;

/// Mastery change from one correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasteryGain {
    /// Mastery before the answer.
    pub before: u32,
    /// Mastery after the answer.
    pub after: u32,
    /// This answer took mastery across the boss unlock threshold.
    pub reached_boss_threshold: bool,
}

/// Record a correct normal answer on a branch.
pub fn award_mastery(
    branch: &mut Branch,
    config: &ProgressionConfig,
) -> Result<MasteryGain, ProgressionError> {
    branch.correct_answers = branch.correct_answers.checked_add(1).ok_or_else(|| {
        ProgressionError::ArithmeticOverflow {
            context: format!("correct answer counter for branch {}", branch.id),
        }
    })?;

    let before = branch.mastery;
    let after = before.saturating_add(config.mastery_step()).min(100);
    branch.mastery = after;

    Ok(MasteryGain {
        before,
        after,
        reached_boss_threshold: before < config.boss_unlock_mastery
            && after >= config.boss_unlock_mastery,
    })
}

/// Normal-track status of a branch.
pub const fn branch_status(branch: &Branch) -> BranchStatus {
    if branch.completed {
        BranchStatus::Completed
    } else if branch.attempts == 0 {
        BranchStatus::NotStarted
    } else {
        BranchStatus::InProgress
    }
}

fn rounded_mean(values: impl Iterator<Item = u32>) -> u32 {
    let (sum, count) = values.fold((0_u64, 0_u64), |(sum, count), v| {
        (sum.saturating_add(u64::from(v)), count.saturating_add(1))
    });
    sum.saturating_add(count / 2)
        .checked_div(count)
        .map_or(0, |mean| u32::try_from(mean).unwrap_or(u32::MAX))
}

/// Mean branch mastery over every branch of every unlocked zone.
pub fn overall_mastery(state: &GameState) -> u32 {
    rounded_mean(
        state
            .branches
            .iter()
            .filter(|b| state.zone(&b.zone_id).is_some_and(|z| z.unlocked))
            .map(|b| b.mastery),
    )
}

/// Mean branch mastery of one zone.
pub fn zone_mastery(state: &GameState, zone_id: &ZoneId) -> u32 {
    rounded_mean(
        state
            .branches
            .iter()
            .filter(|b| &b.zone_id == zone_id)
            .map(|b| b.mastery),
    )
}

/// Percentage of the zone's branches whose boss is cleared.
pub fn zone_boss_mastery(state: &GameState, zone_id: &ZoneId) -> u32 {
    rounded_mean(
        state
            .branches
            .iter()
            .filter(|b| &b.zone_id == zone_id)
            .map(|b| if b.completed { 100 } else { 0 }),
    )
}

/// Every branch boss in the zone is cleared.
pub fn zone_cleared(state: &GameState, zone_id: &ZoneId) -> bool {
    let mut branches = state.branches.iter().filter(|b| &b.zone_id == zone_id).peekable();
    branches.peek().is_some() && branches.all(|b| b.completed)
}

/// Number of completed branches across all zones.
pub fn completed_branch_count(state: &GameState) -> usize {
    state.branches.iter().filter(|b| b.completed).count()
}

fn badges_matching(state: &GameState, keep: impl Fn(&Badge) -> bool) -> Vec<Badge> {
    state.badges.iter().filter(|b| keep(b)).cloned().collect()
}

/// Build the derived mastery map.
pub fn progress_snapshot(
    state: &GameState,
    config: &ProgressionConfig,
    difficulty_level: DifficultyTier,
) -> ProgressSnapshot {
    let mastery_map = state
        .zones
        .iter()
        .map(|zone| {
            let branches = zone
                .branch_ids
                .iter()
                .filter_map(|id| state.branch(&zone.id, id))
                .map(|branch| {
                    let encounter = state.boss(&zone.id, &branch.id);
                    BranchProgress {
                        branch_id: branch.id.clone(),
                        name: branch.name.clone(),
                        mastery: branch.mastery,
                        status: branch_status(branch),
                        boss_status: boss::boss_status(state, branch, config),
                        boss_hp: encounter.map_or(config.boss_max_hp, |e| e.hp),
                        boss_max_hp: encounter.map_or(config.boss_max_hp, |e| e.max_hp),
                        badges: badges_matching(state, |b| {
                            b.scope == BadgeScope::Branch
                                && b.zone_id.as_ref() == Some(&zone.id)
                                && b.branch_id.as_ref() == Some(&branch.id)
                        }),
                    }
                })
                .collect();

            ZoneProgress {
                zone_id: zone.id.clone(),
                zone_name: zone.name.clone(),
                unlocked: zone.unlocked,
                mastery: zone_mastery(state, &zone.id),
                boss_mastery: zone_boss_mastery(state, &zone.id),
                boss_completed: zone_cleared(state, &zone.id),
                zone_badges: badges_matching(state, |b| {
                    b.scope == BadgeScope::Zone && b.zone_id.as_ref() == Some(&zone.id)
                }),
                branches,
            }
        })
        .collect();

    ProgressSnapshot {
        overall_mastery: overall_mastery(state),
        knowledge_health: state.knowledge_health,
        total_points: state.total_points,
        difficulty_level,
        mastery_map,
    }
}
