//! Versioned session snapshots.
//!
//! A snapshot holds everything needed to resume a game: the full
//! [`GameState`] (which includes the awarded badge set and boss encounters),
//! the research log and the challenge sequence counter. The challenge in
//! flight is not saved; a restored session starts with none.

use quizionix_progression::knowledge_health::clamp_knowledge_health;
use quizionix_types::{GameState, ResearchLogEntry, SessionId};
use serde::{Deserialize, Serialize};

/// Snapshot schema version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Error type for snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot was written by an incompatible schema.
    #[error("unsupported snapshot version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the snapshot.
        found: u32,
        /// Version this build reads.
        supported: u32,
    },

    /// The snapshot references data that does not exist.
    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A serializable snapshot of one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Schema version.
    pub version: u32,
    /// Session the snapshot was taken from.
    pub session_id: SessionId,
    /// Challenges generated so far; keeps challenge seeds advancing.
    pub challenges_generated: u64,
    /// Full game state including badges and boss progress.
    pub state: GameState,
    /// Research log entries in order.
    pub research_log: Vec<ResearchLogEntry>,
}

impl SessionSnapshot {
    /// Encode as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Serialization(e.to_string()))
    }

    /// Decode from JSON and check the schema version.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Serialization`] for malformed input or
    /// [`SnapshotError::UnsupportedVersion`] for other schema versions.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| SnapshotError::Serialization(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    /// Reject snapshots from other schema versions.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::UnsupportedVersion`] on mismatch.
    pub const fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version == SNAPSHOT_VERSION {
            Ok(())
        } else {
            Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            })
        }
    }
}

/// Check a restored state for dangling references and bring bounded values
/// back into range.
///
/// # Errors
///
/// Returns [`SnapshotError::Inconsistent`] if a branch, boss encounter or
/// selection refers to a zone or branch that does not exist.
pub fn sanitize_state(state: &mut GameState) -> Result<(), SnapshotError> {
    for branch in &state.branches {
        if state.zone(&branch.zone_id).is_none() {
            return Err(SnapshotError::Inconsistent(format!(
                "branch {} belongs to unknown zone {}",
                branch.id, branch.zone_id
            )));
        }
    }
    for encounter in state.boss_progress.values() {
        if state.branch(&encounter.zone_id, &encounter.branch_id).is_none() {
            return Err(SnapshotError::Inconsistent(format!(
                "boss encounter for unknown branch {}/{}",
                encounter.zone_id, encounter.branch_id
            )));
        }
    }
    if let Some(zone_id) = &state.current_zone_id {
        if state.zone(zone_id).is_none() {
            return Err(SnapshotError::Inconsistent(format!(
                "current zone {zone_id} does not exist"
            )));
        }
    }

    state.knowledge_health = clamp_knowledge_health(state.knowledge_health);
    for branch in &mut state.branches {
        branch.mastery = branch.mastery.min(100);
    }
    for encounter in state.boss_progress.values_mut() {
        encounter.hp = encounter.hp.min(encounter.max_hp);
    }
    Ok(())
}
