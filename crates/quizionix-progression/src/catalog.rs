//! Zone catalog: the authored zone/branch layout a game starts from.
//!
//! The built-in catalog has four zones chained by prerequisites
//! (Science -> Mathematics -> History -> Technology), three branches each.
//! A custom catalog can be supplied through the `catalog` section of the
//! configuration file.
//!
//! A zone is unlocked at the start of a game when it is flagged `unlocked`
//! or has no prerequisite.

use std::collections::BTreeSet;

use quizionix_types::{Branch, BranchId, GameState, Zone, ZoneId};
use serde::{Deserialize, Serialize};

use crate::error::ProgressionError;

/// Authored description of one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSpec {
    /// Branch slug, unique within the zone.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Authored description of one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSpec {
    /// Zone slug.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Force the zone open at game start.
    #[serde(default)]
    pub unlocked: bool,
    /// Zone that must be cleared first.
    #[serde(default)]
    pub prerequisite: Option<String>,
    /// Branches in play order.
    pub branches: Vec<BranchSpec>,
}

/// Ordered list of zones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneCatalog {
    /// Zones in catalog order. Debug unlocks follow this order.
    pub zones: Vec<ZoneSpec>,
}

fn zone(
    id: &str,
    name: &str,
    description: &str,
    prerequisite: Option<&str>,
    branches: &[(&str, &str)],
) -> ZoneSpec {
    ZoneSpec {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        unlocked: false,
        prerequisite: prerequisite.map(str::to_owned),
        branches: branches
            .iter()
            .map(|(id, name)| BranchSpec {
                id: (*id).to_owned(),
                name: (*name).to_owned(),
            })
            .collect(),
    }
}

impl Default for ZoneCatalog {
    fn default() -> Self {
        Self {
            zones: vec![
                zone(
                    "science",
                    "Science",
                    "Forces, matter, and living systems.",
                    None,
                    &[
                        ("physics", "Physics"),
                        ("chemistry", "Chemistry"),
                        ("biology", "Biology"),
                    ],
                ),
                zone(
                    "mathematics",
                    "Mathematics",
                    "Patterns, shapes, and uncertainty.",
                    Some("science"),
                    &[
                        ("algebra", "Algebra"),
                        ("geometry", "Geometry"),
                        ("statistics", "Statistics"),
                    ],
                ),
                zone(
                    "history",
                    "History",
                    "How societies rose, changed, and connected.",
                    Some("mathematics"),
                    &[
                        ("ancient", "Ancient"),
                        ("medieval", "Medieval"),
                        ("modern", "Modern"),
                    ],
                ),
                zone(
                    "technology",
                    "Technology",
                    "Machines, networks, and the code that runs them.",
                    Some("history"),
                    &[
                        ("programming", "Programming"),
                        ("networks", "Networks"),
                        ("hardware", "Hardware"),
                    ],
                ),
            ],
        }
    }
}

impl ZoneCatalog {
    /// Check the catalog for structural problems.
    ///
    /// Rejects an empty catalog, duplicate zone ids, zones without branches,
    /// duplicate branch ids within a zone, unknown or self-referencing
    /// prerequisites, and catalogs where no zone is open at the start.
    pub fn validate(&self) -> Result<(), ProgressionError> {
        if self.zones.is_empty() {
            return Err(invalid("catalog has no zones"));
        }

        let mut zone_ids = BTreeSet::new();
        for spec in &self.zones {
            if !zone_ids.insert(spec.id.as_str()) {
                return Err(invalid(&format!("duplicate zone id `{}`", spec.id)));
            }
            if spec.branches.is_empty() {
                return Err(invalid(&format!("zone `{}` has no branches", spec.id)));
            }
            let mut branch_ids = BTreeSet::new();
            for branch in &spec.branches {
                if !branch_ids.insert(branch.id.as_str()) {
                    return Err(invalid(&format!(
                        "duplicate branch id `{}` in zone `{}`",
                        branch.id, spec.id
                    )));
                }
            }
        }

        for spec in &self.zones {
            if let Some(prereq) = &spec.prerequisite {
                if prereq == &spec.id {
                    return Err(invalid(&format!("zone `{}` requires itself", spec.id)));
                }
                if !zone_ids.contains(prereq.as_str()) {
                    return Err(invalid(&format!(
                        "zone `{}` requires unknown zone `{prereq}`",
                        spec.id
                    )));
                }
            }
        }

        if !self.zones.iter().any(starts_unlocked) {
            return Err(invalid("no zone is unlocked at the start"));
        }

        Ok(())
    }

    /// Validate the catalog and build a fresh [`GameState`] from it.
    pub fn build_state(
        &self,
        starting_knowledge_health: f64,
    ) -> Result<GameState, ProgressionError> {
        self.validate()?;

        let mut zones = Vec::with_capacity(self.zones.len());
        let mut branches = Vec::new();
        for spec in &self.zones {
            let zone_id = ZoneId::new(spec.id.as_str());
            zones.push(Zone {
                id: zone_id.clone(),
                name: spec.name.clone(),
                description: spec.description.clone(),
                unlocked: starts_unlocked(spec),
                prerequisite: spec.prerequisite.as_deref().map(ZoneId::from),
                branch_ids: spec
                    .branches
                    .iter()
                    .map(|b| BranchId::new(b.id.as_str()))
                    .collect(),
            });
            branches.extend(spec.branches.iter().map(|b| Branch {
                id: BranchId::new(b.id.as_str()),
                zone_id: zone_id.clone(),
                name: b.name.clone(),
                mastery: 0,
                attempts: 0,
                correct_answers: 0,
                completed: false,
                badges: Vec::new(),
            }));
        }

        let knowledge_health =
            crate::knowledge_health::clamp_knowledge_health(starting_knowledge_health);
        Ok(GameState::new(zones, branches, knowledge_health))
    }
}

const fn starts_unlocked(spec: &ZoneSpec) -> bool {
    spec.unlocked || spec.prerequisite.is_none()
}

fn invalid(reason: &str) -> ProgressionError {
    ProgressionError::InvalidCatalog {
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = ZoneCatalog::default();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.zones.len(), 4);
    }

    #[test]
    fn only_root_zone_starts_unlocked() {
        let state = ZoneCatalog::default()
            .build_state(100.0)
            .expect("default catalog builds");
        let unlocked: Vec<&str> = state
            .zones
            .iter()
            .filter(|z| z.unlocked)
            .map(|z| z.id.as_str())
            .collect();
        assert_eq!(unlocked, vec!["science"]);
        assert_eq!(state.branches.len(), 12);
    }

    #[test]
    fn rejects_unknown_prerequisite() {
        let mut catalog = ZoneCatalog::default();
        catalog.zones.get_mut(1).expect("second zone").prerequisite =
            Some(String::from("astrology"));
        assert!(matches!(
            catalog.validate(),
            Err(ProgressionError::InvalidCatalog { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_branch_ids() {
        let mut catalog = ZoneCatalog::default();
        catalog
            .zones
            .get_mut(0)
            .expect("first zone")
            .branches
            .push(BranchSpec {
                id: String::from("physics"),
                name: String::from("Physics Again"),
            });
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn rejects_catalog_with_no_open_zone() {
        let catalog = ZoneCatalog {
            zones: vec![
                ZoneSpec {
                    id: String::from("a"),
                    name: String::from("A"),
                    description: String::new(),
                    unlocked: false,
                    prerequisite: Some(String::from("b")),
                    branches: vec![BranchSpec {
                        id: String::from("x"),
                        name: String::from("X"),
                    }],
                },
                ZoneSpec {
                    id: String::from("b"),
                    name: String::from("B"),
                    description: String::new(),
                    unlocked: false,
                    prerequisite: Some(String::from("a")),
                    branches: vec![BranchSpec {
                        id: String::from("y"),
                        name: String::from("Y"),
                    }],
                },
            ],
        };
        assert!(catalog.validate().is_err());
    }
}
