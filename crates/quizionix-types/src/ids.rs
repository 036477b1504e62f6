//! Type-safe identifier wrappers.
//!
//! Runtime entities (challenges, research entries, sessions) get UUID v7
//! identifiers so they sort by creation time. Catalog entities (zones and
//! branches) are authored, so they use human-readable slug identifiers that
//! stay stable across sessions and snapshots.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

/// Generates a newtype wrapper around an authored slug string.
macro_rules! define_slug {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string-like slug.
            pub fn new(slug: impl Into<String>) -> Self {
                Self(slug.into())
            }

            /// Borrow the slug as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(slug: &str) -> Self {
                Self(String::from(slug))
            }
        }
    };
}

define_id! {
    /// Unique identifier for a single generated challenge.
    ChallengeId
}

define_id! {
    /// Unique identifier for a research log entry.
    ResearchEntryId
}

define_id! {
    /// Anonymous identifier for one game session (never tied to a learner).
    SessionId
}

define_slug! {
    /// Identifier of a topic zone (e.g. `science`).
    ZoneId
}

define_slug! {
    /// Identifier of a branch, unique within its zone (e.g. `physics`).
    BranchId
}

define_slug! {
    /// Key of a boss encounter, formatted as `zone::branch`.
    BossKey
}

impl BossKey {
    /// Build the boss key for a zone/branch pair.
    pub fn for_branch(zone_id: &ZoneId, branch_id: &BranchId) -> Self {
        Self(format!("{zone_id}::{branch_id}"))
    }
}
