//! Content provider trait, built-in question bank and generated fallback.
//!
//! The challenge engine asks a [`ContentProvider`] for a question matching a
//! zone, branch and tier. The provider owns the authored text; the engine
//! owns the policy (tier, encounter type, expected time). When the provider
//! has nothing for a request it answers [`ContentError::Unavailable`] and the
//! engine substitutes [`generated_content`], a seeded arithmetic question
//! flagged as fallback.

use std::collections::BTreeMap;

use quizionix_types::{BranchId, ContentDiagnostics, DifficultyTier, QuestionType, ZoneId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Errors returned by content providers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// Nothing authored for this zone/branch/tier.
    #[error("no content for {zone_id}/{branch_id} at {tier}")]
    Unavailable {
        /// Requested zone.
        zone_id: ZoneId,
        /// Requested branch.
        branch_id: BranchId,
        /// Requested tier.
        tier: DifficultyTier,
    },
}

/// What the engine asks the provider for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    /// Zone id.
    pub zone_id: ZoneId,
    /// Branch id.
    pub branch_id: BranchId,
    /// Zone display name.
    pub zone_name: String,
    /// Branch display name.
    pub branch_name: String,
    /// Requested tier.
    pub tier: DifficultyTier,
    /// Number of challenges generated before this one in the session.
    pub sequence: u64,
}

/// Question text and answers returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeContent {
    /// Multiple choice or free text.
    pub question_type: QuestionType,
    /// Question shown to the learner.
    pub prompt: String,
    /// Canonical correct answer.
    pub correct_answer: String,
    /// Wrong options for multiple choice.
    pub distractors: Vec<String>,
    /// Remediation hint shown after a wrong answer.
    pub hint: Option<String>,
}

/// A source of authored challenge content.
pub trait ContentProvider {
    /// Return content for the request.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::Unavailable`] when nothing is authored for
    /// the zone/branch/tier combination.
    fn challenge_content(&self, request: &ContentRequest) -> Result<ChallengeContent, ContentError>;

    /// Zones with at least one authored item.
    fn authored_zones(&self) -> Vec<ZoneId>;

    /// Number of authored items for a zone.
    fn authored_item_count(&self, zone_id: &ZoneId) -> u32;
}

/// Summarize what a provider has authored.
pub fn content_diagnostics(provider: &dyn ContentProvider) -> ContentDiagnostics {
    let authored_zones = provider.authored_zones();
    let items_per_zone: BTreeMap<ZoneId, u32> = authored_zones
        .iter()
        .map(|zone| (zone.clone(), provider.authored_item_count(zone)))
        .collect();
    let total_items = items_per_zone
        .values()
        .fold(0_u32, |acc, n| acc.saturating_add(*n));
    ContentDiagnostics {
        authored_zones,
        items_per_zone,
        total_items,
    }
}

// ---------------------------------------------------------------------------
// Built-in bank
// ---------------------------------------------------------------------------

/// One authored question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankItem {
    /// Zone id.
    pub zone_id: ZoneId,
    /// Branch id.
    pub branch_id: BranchId,
    /// Tier the question is written for.
    pub tier: DifficultyTier,
    /// The question.
    pub content: ChallengeContent,
}

/// Provider backed by an in-memory list of [`BankItem`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinContentProvider {
    items: Vec<BankItem>,
}

impl Default for BuiltinContentProvider {
    fn default() -> Self {
        Self::from_items(builtin_bank())
    }
}

impl BuiltinContentProvider {
    /// Provider with the built-in bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with a custom bank.
    pub const fn from_items(items: Vec<BankItem>) -> Self {
        Self { items }
    }

    /// Provider with no content; every request falls back.
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }
}

impl ContentProvider for BuiltinContentProvider {
    fn challenge_content(
        &self,
        request: &ContentRequest,
    ) -> Result<ChallengeContent, ContentError> {
        let matching: Vec<&BankItem> = self
            .items
            .iter()
            .filter(|item| {
                item.zone_id == request.zone_id
                    && item.branch_id == request.branch_id
                    && item.tier == request.tier
            })
            .collect();

        let count = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        request
            .sequence
            .checked_rem(count)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| matching.get(i))
            .map(|item| item.content.clone())
            .ok_or_else(|| ContentError::Unavailable {
                zone_id: request.zone_id.clone(),
                branch_id: request.branch_id.clone(),
                tier: request.tier,
            })
    }

    fn authored_zones(&self) -> Vec<ZoneId> {
        let mut zones: Vec<ZoneId> = Vec::new();
        for item in &self.items {
            if !zones.contains(&item.zone_id) {
                zones.push(item.zone_id.clone());
            }
        }
        zones
    }

    fn authored_item_count(&self, zone_id: &ZoneId) -> u32 {
        let count = self.items.iter().filter(|i| &i.zone_id == zone_id).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}

fn item(
    zone: &str,
    branch: &str,
    tier: DifficultyTier,
    prompt: &str,
    answer: &str,
    distractors: &[&str],
    hint: &str,
) -> BankItem {
    let question_type = if distractors.is_empty() {
        QuestionType::Text
    } else {
        QuestionType::MultipleChoice
    };
    BankItem {
        zone_id: ZoneId::from(zone),
        branch_id: BranchId::from(branch),
        tier,
        content: ChallengeContent {
            question_type,
            prompt: prompt.to_owned(),
            correct_answer: answer.to_owned(),
            distractors: distractors.iter().map(|d| (*d).to_owned()).collect(),
            hint: Some(hint.to_owned()),
        },
    }
}

fn builtin_bank() -> Vec<BankItem> {
    use DifficultyTier::{Advanced, Beginner, Master};

    vec![
        item(
            "science", "physics", Beginner,
            "What is the SI unit of force?",
            "Newton", &["Joule", "Watt", "Pascal"],
            "Force is measured in the unit named after the author of the laws of motion.",
        ),
        item(
            "science", "physics", Beginner,
            "What does a speedometer measure?",
            "Speed", &["Distance", "Acceleration", "Mass"],
            "The name of the instrument contains the answer.",
        ),
        item(
            "science", "physics", Advanced,
            "An object of 2 kg accelerates at 3 m/s^2. What net force acts on it, in newtons?",
            "6", &["5", "1.5", "9"],
            "Newton's second law: F = m * a.",
        ),
        item(
            "science", "physics", Advanced,
            "Which quantity stays constant for an object in uniform circular motion?",
            "Speed", &["Velocity", "Acceleration direction", "Displacement"],
            "Velocity includes direction; the direction keeps changing on a circle.",
        ),
        item(
            "science", "physics", Master,
            "Name the law stating that energy can be neither created nor destroyed.",
            "Conservation of energy", &[],
            "Think of the first law of thermodynamics.",
        ),
        item(
            "science", "physics", Master,
            "What is the approximate speed of light in vacuum, in km/s?",
            "300000", &["30000", "3000000", "150000"],
            "Light travels about 300 million metres each second.",
        ),
        item(
            "science", "chemistry", Beginner,
            "What is the chemical symbol for water?",
            "H2O", &["CO2", "O2", "NaCl"],
            "Two hydrogen atoms bonded to one oxygen atom.",
        ),
        item(
            "science", "chemistry", Advanced,
            "What is the pH of a neutral solution at 25 C?",
            "7", &["0", "14", "1"],
            "The pH scale runs from 0 to 14 with neutral in the middle.",
        ),
        item(
            "science", "biology", Beginner,
            "Which organelle is known as the powerhouse of the cell?",
            "Mitochondria", &["Nucleus", "Ribosome", "Golgi apparatus"],
            "It produces most of the cell's ATP.",
        ),
        item(
            "science", "biology", Master,
            "What molecule carries genetic information in most living organisms?",
            "DNA", &[],
            "Its full name is deoxyribonucleic acid.",
        ),
        item(
            "mathematics", "algebra", Beginner,
            "Solve for x: x + 4 = 9",
            "5", &["4", "13", "9"],
            "Subtract 4 from both sides.",
        ),
        item(
            "mathematics", "geometry", Beginner,
            "How many degrees are in the interior angles of a triangle?",
            "180", &["90", "360", "270"],
            "Half of a full turn.",
        ),
        item(
            "history", "modern", Beginner,
            "What is the capital of France?",
            "Paris", &[],
            "The city on the Seine.",
        ),
    ]
}

// ---------------------------------------------------------------------------
// Generated fallback
// ---------------------------------------------------------------------------

/// Generate a seeded arithmetic question scaled to the tier.
///
/// Beginner and Advanced produce multiple choice (addition and
/// multiplication); Master produces a free-text two-step expression.
pub fn generated_content(request: &ContentRequest, seed: u64) -> ChallengeContent {
    let mut rng = StdRng::seed_from_u64(seed);
    let hint = Some(format!(
        "Practice round for {}: work the arithmetic one step at a time.",
        request.branch_name
    ));

    match request.tier {
        DifficultyTier::Beginner => {
            let a: u32 = rng.random_range(2..=20);
            let b: u32 = rng.random_range(2..=20);
            let sum = a.saturating_add(b);
            ChallengeContent {
                question_type: QuestionType::MultipleChoice,
                prompt: format!("[{}] What is {a} + {b}?", request.branch_name),
                correct_answer: sum.to_string(),
                distractors: vec![
                    sum.saturating_sub(1).to_string(),
                    sum.saturating_add(1).to_string(),
                    sum.saturating_add(10).to_string(),
                ],
                hint,
            }
        }
        DifficultyTier::Advanced => {
            let a: u32 = rng.random_range(3..=12);
            let b: u32 = rng.random_range(3..=12);
            let product = a.saturating_mul(b);
            ChallengeContent {
                question_type: QuestionType::MultipleChoice,
                prompt: format!("[{}] What is {a} x {b}?", request.branch_name),
                correct_answer: product.to_string(),
                distractors: vec![
                    product.saturating_sub(a).to_string(),
                    product.saturating_add(b).to_string(),
                    product.saturating_add(1).to_string(),
                ],
                hint,
            }
        }
        DifficultyTier::Master => {
            let a: u32 = rng.random_range(6..=15);
            let b: u32 = rng.random_range(6..=15);
            let c: u32 = rng.random_range(10..=99);
            ChallengeContent {
                question_type: QuestionType::Text,
                prompt: format!("[{}] What is {a} x {b} + {c}?", request.branch_name),
                correct_answer: a.saturating_mul(b).saturating_add(c).to_string(),
                distractors: Vec::new(),
                hint,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn request(zone: &str, branch: &str, tier: DifficultyTier, sequence: u64) -> ContentRequest {
        ContentRequest {
            zone_id: ZoneId::from(zone),
            branch_id: BranchId::from(branch),
            zone_name: zone.to_owned(),
            branch_name: branch.to_owned(),
            tier,
            sequence,
        }
    }

    #[test]
    fn physics_is_authored_at_every_tier() {
        let provider = BuiltinContentProvider::new();
        for tier in DifficultyTier::ALL {
            let content = provider.challenge_content(&request("science", "physics", tier, 0));
            assert!(content.is_ok(), "missing physics content at {tier}");
        }
    }

    #[test]
    fn sequence_rotates_through_items() {
        let provider = BuiltinContentProvider::new();
        let nth = |sequence| {
            let req = request("science", "physics", DifficultyTier::Beginner, sequence);
            provider.challenge_content(&req).expect("physics is authored")
        };
        let (first, second, third) = (nth(0), nth(1), nth(2));
        assert_ne!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn unauthored_branch_is_unavailable() {
        let provider = BuiltinContentProvider::new();
        let hardware = request("technology", "hardware", DifficultyTier::Beginner, 0);
        let result = provider.challenge_content(&hardware);
        assert!(matches!(result, Err(ContentError::Unavailable { .. })));
        let empty = BuiltinContentProvider::empty();
        assert!(
            empty
                .challenge_content(&request("science", "physics", DifficultyTier::Beginner, 0))
                .is_err()
        );
    }

    #[test]
    fn diagnostics_count_items() {
        let provider = BuiltinContentProvider::new();
        let diagnostics = content_diagnostics(&provider);
        assert_eq!(
            diagnostics.authored_zones.first().map(ZoneId::as_str),
            Some("science")
        );
        assert_eq!(diagnostics.items_per_zone.get(&ZoneId::from("science")), Some(&10));
        assert_eq!(diagnostics.total_items, 13);
    }

    #[test]
    fn generated_content_is_reproducible_and_well_formed() {
        for tier in DifficultyTier::ALL {
            let req = request("technology", "hardware", tier, 3);
            let a = generated_content(&req, 99);
            let b = generated_content(&req, 99);
            assert_eq!(a, b);
            assert!(!a.correct_answer.is_empty());
            assert!(!a.distractors.contains(&a.correct_answer));
            match a.question_type {
                QuestionType::MultipleChoice => assert_eq!(a.distractors.len(), 3),
                QuestionType::Text => assert!(a.distractors.is_empty()),
            }
        }
    }
}
