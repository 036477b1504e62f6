//! Error types for the quizionix-progression crate.
//!
//! Selection failures are ordinary values the caller is expected to check;
//! none of them leave the state partially modified.

use quizionix_types::{BranchId, ZoneId};

/// Errors that can occur during progression operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    /// No zone with this id exists in the catalog.
    #[error("zone not found: {0}")]
    ZoneNotFound(ZoneId),

    /// The zone exists but has not been unlocked yet.
    #[error("zone is locked: {0}")]
    ZoneLocked(ZoneId),

    /// The zone has no branch with this id.
    #[error("branch {branch_id} not found in zone {zone_id}")]
    BranchNotFound {
        /// The zone that was searched.
        zone_id: ZoneId,
        /// The missing branch.
        branch_id: BranchId,
    },

    /// A challenge was requested for a branch other than the selected one.
    #[error("{zone_id}/{branch_id} is not the current selection")]
    NotCurrentSelection {
        /// Requested zone.
        zone_id: ZoneId,
        /// Requested branch.
        branch_id: BranchId,
    },

    /// The zone catalog failed validation.
    #[error("invalid zone catalog: {reason}")]
    InvalidCatalog {
        /// Description of the problem.
        reason: String,
    },

    /// An integer counter overflowed.
    #[error("arithmetic overflow in progression computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}

impl ProgressionError {
    /// Returns `true` for the selection failures (unknown or locked zone,
    /// unknown branch, or a branch other than the current selection).
    pub const fn is_invalid_selection(&self) -> bool {
        matches!(
            self,
            Self::ZoneNotFound(_)
                | Self::ZoneLocked(_)
                | Self::BranchNotFound { .. }
                | Self::NotCurrentSelection { .. }
        )
    }
}
