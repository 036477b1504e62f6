//! Badge ledger.
//!
//! Award rules form a declarative table. After every mastery-affecting event
//! the whole table is evaluated against the current state; rules whose
//! trigger holds produce a badge unless one with the same id was already
//! awarded. The awarded set only grows.
//!
//! Badge ids are the rule key for global rules, `key::zone` for zone rules
//! and `key::zone::branch` for branch rules.

use quizionix_types::{Badge, BadgeScope, Branch, GameState, Zone};
use tracing::info;

use crate::mastery;

/// Condition that awards a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTrigger {
    /// At least one correct answer in the session.
    FirstCorrect,
    /// Best answer streak reached the given length.
    BestStreak(u32),
    /// A branch reached the given mastery.
    BranchMastery(u32),
    /// A branch boss was cleared.
    BossCleared,
    /// Every branch boss of a zone was cleared.
    ZoneCleared,
    /// The given number of branches were completed across all zones.
    BranchesCompleted(usize),
    /// The given number of zones are unlocked.
    ZonesUnlocked(usize),
}

impl BadgeTrigger {
    /// What a badge from this trigger is attached to.
    pub const fn scope(self) -> BadgeScope {
        match self {
            Self::BranchMastery(_) | Self::BossCleared => BadgeScope::Branch,
            Self::ZoneCleared => BadgeScope::Zone,
            Self::FirstCorrect
            | Self::BestStreak(_)
            | Self::BranchesCompleted(_)
            | Self::ZonesUnlocked(_) => BadgeScope::Global,
        }
    }
}

/// One row of the award table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeRule {
    /// Stable key; the prefix of every badge id this rule produces.
    pub key: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Display description.
    pub description: &'static str,
    /// Award condition.
    pub trigger: BadgeTrigger,
}

/// Built-in award table.
pub const BADGE_RULES: &[BadgeRule] = &[
    BadgeRule {
        key: "first-steps",
        title: "First Steps",
        description: "Answered your first challenge correctly.",
        trigger: BadgeTrigger::FirstCorrect,
    },
    BadgeRule {
        key: "streak-5",
        title: "On a Roll",
        description: "Five correct answers in a row.",
        trigger: BadgeTrigger::BestStreak(5),
    },
    BadgeRule {
        key: "streak-10",
        title: "Unstoppable",
        description: "Ten correct answers in a row.",
        trigger: BadgeTrigger::BestStreak(10),
    },
    BadgeRule {
        key: "branch-halfway",
        title: "Halfway There",
        description: "Reached 50% mastery in a branch.",
        trigger: BadgeTrigger::BranchMastery(50),
    },
    BadgeRule {
        key: "branch-mastered",
        title: "Branch Mastered",
        description: "Reached full mastery in a branch.",
        trigger: BadgeTrigger::BranchMastery(100),
    },
    BadgeRule {
        key: "boss-breaker",
        title: "Boss Breaker",
        description: "Defeated a branch boss.",
        trigger: BadgeTrigger::BossCleared,
    },
    BadgeRule {
        key: "zone-conqueror",
        title: "Zone Conqueror",
        description: "Defeated every branch boss in a zone.",
        trigger: BadgeTrigger::ZoneCleared,
    },
    BadgeRule {
        key: "trailblazer",
        title: "Trailblazer",
        description: "Completed three branches.",
        trigger: BadgeTrigger::BranchesCompleted(3),
    },
    BadgeRule {
        key: "pathfinder",
        title: "Pathfinder",
        description: "Opened a second zone.",
        trigger: BadgeTrigger::ZonesUnlocked(2),
    },
];

fn global_holds(state: &GameState, trigger: BadgeTrigger) -> bool {
    match trigger {
        BadgeTrigger::FirstCorrect => state.correct_answers > 0,
        BadgeTrigger::BestStreak(n) => state.best_streak >= n,
        BadgeTrigger::BranchesCompleted(n) => mastery::completed_branch_count(state) >= n,
        BadgeTrigger::ZonesUnlocked(n) => state.zones.iter().filter(|z| z.unlocked).count() >= n,
        BadgeTrigger::BranchMastery(_) | BadgeTrigger::BossCleared | BadgeTrigger::ZoneCleared => {
            false
        }
    }
}

const fn branch_holds(branch: &Branch, trigger: BadgeTrigger) -> bool {
    match trigger {
        BadgeTrigger::BranchMastery(n) => branch.mastery >= n,
        BadgeTrigger::BossCleared => branch.completed,
        _ => false,
    }
}

fn zone_holds(state: &GameState, zone: &Zone, trigger: BadgeTrigger) -> bool {
    matches!(trigger, BadgeTrigger::ZoneCleared) && mastery::zone_cleared(state, &zone.id)
}

fn make_badge(rule: &BadgeRule, id: String, zone: Option<&Zone>, branch: Option<&Branch>) -> Badge {
    let title = match (zone, branch) {
        (_, Some(b)) => format!("{}: {}", rule.title, b.name),
        (Some(z), None) => format!("{}: {}", rule.title, z.name),
        (None, None) => rule.title.to_owned(),
    };
    Badge {
        id,
        title,
        description: rule.description.to_owned(),
        scope: rule.trigger.scope(),
        zone_id: zone.map(|z| z.id.clone()),
        branch_id: branch.map(|b| b.id.clone()),
    }
}

fn candidates(state: &GameState, rule: &BadgeRule) -> Vec<Badge> {
    match rule.trigger.scope() {
        BadgeScope::Global => {
            if global_holds(state, rule.trigger) {
                vec![make_badge(rule, rule.key.to_owned(), None, None)]
            } else {
                Vec::new()
            }
        }
        BadgeScope::Zone => state
            .zones
            .iter()
            .filter(|z| zone_holds(state, z, rule.trigger))
            .map(|z| make_badge(rule, format!("{}::{}", rule.key, z.id), Some(z), None))
            .collect(),
        BadgeScope::Branch => state
            .branches
            .iter()
            .filter(|b| branch_holds(b, rule.trigger))
            .map(|b| {
                let id = format!("{}::{}::{}", rule.key, b.zone_id, b.id);
                make_badge(rule, id, state.zone(&b.zone_id), Some(b))
            })
            .collect(),
    }
}

/// Evaluate the rule table and award every newly earned badge.
///
/// Returns only the badges awarded by this call. Branch-scoped badge ids
/// are also recorded on their branch.
pub fn check_badges(state: &mut GameState, rules: &[BadgeRule]) -> Vec<Badge> {
    let mut awarded: Vec<Badge> = Vec::new();
    for rule in rules {
        for badge in candidates(state, rule) {
            if state.has_badge(&badge.id) || awarded.iter().any(|b| b.id == badge.id) {
                continue;
            }
            awarded.push(badge);
        }
    }

    for badge in &awarded {
        if let (Some(zone_id), Some(branch_id)) = (&badge.zone_id, &badge.branch_id) {
            if let Some(branch) = state.branch_mut(zone_id, branch_id) {
                if !branch.badges.contains(&badge.id) {
                    branch.badges.push(badge.id.clone());
                }
            }
        }
        info!(badge = %badge.id, "badge awarded");
    }

    state.badges.extend(awarded.iter().cloned());
    awarded
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use quizionix_types::{BranchId, ZoneId};

    use super::*;
    use crate::catalog::ZoneCatalog;

    fn fresh() -> GameState {
        ZoneCatalog::default()
            .build_state(100.0)
            .expect("default catalog builds")
    }

    #[test]
    fn nothing_awarded_on_fresh_state() {
        let mut state = fresh();
        assert!(check_badges(&mut state, BADGE_RULES).is_empty());
    }

    #[test]
    fn rechecking_never_duplicates() {
        let mut state = fresh();
        state.correct_answers = 1;
        let first = check_badges(&mut state, BADGE_RULES);
        assert_eq!(first.len(), 1);
        assert_eq!(first.first().map(|b| b.id.as_str()), Some("first-steps"));

        assert!(check_badges(&mut state, BADGE_RULES).is_empty());
        assert!(check_badges(&mut state, BADGE_RULES).is_empty());
        assert_eq!(state.badges.len(), 1);
    }

    #[test]
    fn branch_badges_are_scoped_and_recorded_on_branch() {
        let mut state = fresh();
        let zone = ZoneId::from("science");
        let branch = BranchId::from("physics");
        state.branch_mut(&zone, &branch).expect("physics exists").mastery = 100;
        let awarded = check_badges(&mut state, BADGE_RULES);
        let ids: Vec<&str> = awarded.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["branch-halfway::science::physics", "branch-mastered::science::physics"]
        );
        assert_eq!(state.branch(&zone, &branch).expect("physics exists").badges.len(), 2);
        assert!(awarded.iter().all(|b| b.scope == BadgeScope::Branch));
    }

    #[test]
    fn clearing_a_zone_awards_zone_and_count_badges() {
        let mut state = fresh();
        let science = ZoneId::from("science");
        for branch in state.branches.iter_mut().filter(|b| b.zone_id == science) {
            branch.completed = true;
        }
        let awarded = check_badges(&mut state, BADGE_RULES);
        assert!(awarded.iter().any(|b| b.id == "zone-conqueror::science"));
        assert!(awarded.iter().any(|b| b.id == "trailblazer"));
        assert_eq!(
            awarded.iter().filter(|b| b.id.starts_with("boss-breaker::")).count(),
            3
        );
    }

    #[test]
    fn custom_rule_table_is_respected() {
        let mut state = fresh();
        state.best_streak = 2;
        let rules = [BadgeRule {
            key: "pair",
            title: "Pair",
            description: "Two in a row.",
            trigger: BadgeTrigger::BestStreak(2),
        }];
        let awarded = check_badges(&mut state, &rules);
        assert_eq!(awarded.len(), 1);
        assert_eq!(awarded.first().map(|b| b.scope), Some(BadgeScope::Global));
    }
}
