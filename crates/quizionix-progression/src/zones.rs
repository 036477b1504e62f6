//! Zone and branch selection.
//!
//! Zones unlock only forwards: a locked zone opens when the boss of every
//! branch in its prerequisite zone is cleared, or through the debug unlock.
//! Nothing here ever re-locks a zone. Failed selections leave the state
//! untouched.

use quizionix_types::{Branch, BranchId, GameState, Zone, ZoneId};
use tracing::{debug, info};

use crate::error::ProgressionError;
use crate::mastery;

/// Branches of a zone in authored order.
pub fn branches_for_zone<'a>(state: &'a GameState, zone_id: &ZoneId) -> Vec<&'a Branch> {
    state.zone(zone_id).map_or_else(Vec::new, |zone| {
        zone.branch_ids
            .iter()
            .filter_map(|id| state.branch(zone_id, id))
            .collect()
    })
}

fn unlocked_zone<'a>(state: &'a GameState, zone_id: &ZoneId) -> Result<&'a Zone, ProgressionError> {
    let zone = state
        .zone(zone_id)
        .ok_or_else(|| ProgressionError::ZoneNotFound(zone_id.clone()))?;
    if zone.unlocked {
        Ok(zone)
    } else {
        Err(ProgressionError::ZoneLocked(zone_id.clone()))
    }
}

/// Enter an unlocked zone. Clears the branch selection.
pub fn enter_zone(state: &mut GameState, zone_id: &ZoneId) -> Result<Zone, ProgressionError> {
    let zone = unlocked_zone(state, zone_id)?.clone();
    state.current_zone_id = Some(zone.id.clone());
    state.current_branch_id = None;
    debug!(zone = %zone.id, "entered zone");
    Ok(zone)
}

/// Select a branch of an unlocked zone, making it the current selection.
pub fn select_branch(
    state: &mut GameState,
    zone_id: &ZoneId,
    branch_id: &BranchId,
) -> Result<Branch, ProgressionError> {
    unlocked_zone(state, zone_id)?;
    let branch = state
        .branch(zone_id, branch_id)
        .cloned()
        .ok_or_else(|| ProgressionError::BranchNotFound {
            zone_id: zone_id.clone(),
            branch_id: branch_id.clone(),
        })?;
    state.current_zone_id = Some(zone_id.clone());
    state.current_branch_id = Some(branch_id.clone());
    debug!(zone = %zone_id, branch = %branch_id, "selected branch");
    Ok(branch)
}

/// Check that a zone/branch pair is the current, valid selection.
pub fn ensure_current_selection(
    state: &GameState,
    zone_id: &ZoneId,
    branch_id: &BranchId,
) -> Result<(), ProgressionError> {
    unlocked_zone(state, zone_id)?;
    if state.branch(zone_id, branch_id).is_none() {
        return Err(ProgressionError::BranchNotFound {
            zone_id: zone_id.clone(),
            branch_id: branch_id.clone(),
        });
    }
    let is_current = state.current_zone_id.as_ref() == Some(zone_id)
        && state.current_branch_id.as_ref() == Some(branch_id);
    if is_current {
        Ok(())
    } else {
        Err(ProgressionError::NotCurrentSelection {
            zone_id: zone_id.clone(),
            branch_id: branch_id.clone(),
        })
    }
}

/// Unlock the first locked zone in catalog order.
///
/// Returns `None` (and changes nothing) once every zone is unlocked.
pub fn unlock_one_zone_debug(state: &mut GameState) -> Option<ZoneId> {
    let zone = state.zones.iter_mut().find(|z| !z.unlocked)?;
    zone.unlocked = true;
    info!(zone = %zone.id, "debug unlock");
    Some(zone.id.clone())
}

/// Unlock every locked zone whose prerequisite is `cleared_zone`, provided
/// that zone is fully cleared. Returns the newly unlocked zone ids.
pub fn unlock_successors(state: &mut GameState, cleared_zone: &ZoneId) -> Vec<ZoneId> {
    if !mastery::zone_cleared(state, cleared_zone) {
        return Vec::new();
    }
    let mut unlocked = Vec::new();
    for zone in state
        .zones
        .iter_mut()
        .filter(|z| !z.unlocked && z.prerequisite.as_ref() == Some(cleared_zone))
    {
        zone.unlocked = true;
        info!(zone = %zone.id, prerequisite = %cleared_zone, "zone unlocked");
        unlocked.push(zone.id.clone());
    }
    unlocked
}

/// The branch that follows `branch_id` in authored order, completed or not.
/// `None` at the end of the zone or when `branch_id` is not in it.
pub fn next_branch<'a>(
    state: &'a GameState,
    zone_id: &ZoneId,
    branch_id: &BranchId,
) -> Option<&'a Branch> {
    let branches = branches_for_zone(state, zone_id);
    let position = branches.iter().position(|b| &b.id == branch_id)?;
    branches.get(position.saturating_add(1)).copied()
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

    #[test]
    fn branches_follow_authored_order() {
        let state = fresh();
        let names: Vec<&str> = branches_for_zone(&state, &ZoneId::from("science"))
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(names, vec!["physics", "chemistry", "biology"]);
        assert!(branches_for_zone(&state, &ZoneId::from("nowhere")).is_empty());
    }

    #[test]
    fn locked_zone_cannot_be_entered() {
        let mut state = fresh();
        let result = enter_zone(&mut state, &ZoneId::from("history"));
        assert_eq!(result.err(), Some(ProgressionError::ZoneLocked(ZoneId::from("history"))));
        assert_eq!(state.current_zone_id, None);
    }

    #[test]
    fn selecting_a_missing_branch_leaves_state_unchanged() {
        let mut state = fresh();
        let science = ZoneId::from("science");
        select_branch(&mut state, &science, &BranchId::from("physics"))
            .expect("physics selectable");

        let bad = select_branch(&mut state, &science, &BranchId::from("alchemy"));
        assert!(bad.is_err());
        assert_eq!(state.current_branch_id, Some(BranchId::from("physics")));
    }

    #[test]
    fn enter_zone_clears_branch_selection() {
        let mut state = fresh();
        let science = ZoneId::from("science");
        select_branch(&mut state, &science, &BranchId::from("physics"))
            .expect("physics selectable");
        assert!(enter_zone(&mut state, &science).is_ok());
        assert_eq!(state.current_branch_id, None);
    }

    #[test]
    fn current_selection_is_enforced() {
        let mut state = fresh();
        let zone = ZoneId::from("science");
        select_branch(&mut state, &zone, &BranchId::from("physics"))
            .expect("physics selectable");
        assert!(ensure_current_selection(&state, &zone, &BranchId::from("physics")).is_ok());
        let other = ensure_current_selection(&state, &zone, &BranchId::from("biology"));
        assert!(other.is_err_and(|e| e.is_invalid_selection()));
    }

    #[test]
    fn debug_unlock_is_ordered_and_idempotent() {
        let mut state = fresh();
        assert_eq!(unlock_one_zone_debug(&mut state), Some(ZoneId::from("mathematics")));
        assert_eq!(unlock_one_zone_debug(&mut state), Some(ZoneId::from("history")));
        assert_eq!(unlock_one_zone_debug(&mut state), Some(ZoneId::from("technology")));
        assert_eq!(unlock_one_zone_debug(&mut state), None);
        assert_eq!(unlock_one_zone_debug(&mut state), None);
        assert!(state.zones.iter().all(|z| z.unlocked));
    }

    #[test]
    fn clearing_a_zone_unlocks_its_successor() {
        let mut state = fresh();
        let science = ZoneId::from("science");
        assert!(unlock_successors(&mut state, &science).is_empty());

        for branch in state.branches.iter_mut().filter(|b| b.zone_id == science) {
            branch.completed = true;
        }
        assert_eq!(unlock_successors(&mut state, &science), vec![ZoneId::from("mathematics")]);
        // Already unlocked: nothing new.
        assert!(unlock_successors(&mut state, &science).is_empty());
    }

    #[test]
    fn next_branch_is_the_immediate_successor() {
        let mut state = fresh();
        let zone = ZoneId::from("science");
        for id in ["chemistry", "biology"] {
            state
                .branch_mut(&zone, &BranchId::from(id))
                .expect("science branch exists")
                .completed = true;
        }
        let next = next_branch(&state, &zone, &BranchId::from("physics"));
        assert_eq!(next.map(|b| b.id.as_str()), Some("chemistry"));
        let next = next_branch(&state, &zone, &BranchId::from("chemistry"));
        assert_eq!(next.map(|b| b.id.as_str()), Some("biology"));
        assert!(next_branch(&state, &zone, &BranchId::from("biology")).is_none());
        assert!(next_branch(&state, &zone, &BranchId::from("alchemy")).is_none());
    }
}
