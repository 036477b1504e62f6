//! The research log: an append-only record of answer evaluations.
//!
//! Entries are numbered from 0 in the order they are recorded and are never
//! modified or removed individually. The whole log is discarded only when a
//! game is restarted.

use quizionix_types::ResearchLogEntry;
use tracing::debug;

use crate::{ResearchEntryBuilder, ResearchError};

/// Append-only, sequence-numbered research log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResearchLog {
    /// All entries, in recording order.
    entries: Vec<ResearchLogEntry>,
}

impl ResearchLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild a log from previously exported entries.
    ///
    /// Entries are renumbered in the given order so sequences stay
    /// contiguous.
    pub fn from_entries(entries: Vec<ResearchLogEntry>) -> Self {
        let mut log = Self { entries };
        for (sequence, entry) in (0_u64..).zip(log.entries.iter_mut()) {
            entry.sequence = sequence;
        }
        log
    }

    /// Build an entry at the next sequence number and append it.
    ///
    /// # Errors
    ///
    /// Returns the builder's validation error, or
    /// [`ResearchError::SequenceOverflow`] if the log cannot grow.
    pub fn record(
        &mut self,
        builder: ResearchEntryBuilder,
    ) -> Result<&ResearchLogEntry, ResearchError> {
        let sequence =
            u64::try_from(self.entries.len()).map_err(|_e| ResearchError::SequenceOverflow)?;
        let entry = builder.build(sequence)?;
        debug!(
            sequence,
            zone = %entry.zone_id,
            branch = %entry.branch_id,
            success = entry.success,
            "research entry recorded"
        );
        self.entries.push(entry);
        self.entries.last().ok_or(ResearchError::SequenceOverflow)
    }

    /// All entries in recording order.
    pub fn entries(&self) -> &[ResearchLogEntry] {
        &self.entries
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&ResearchLogEntry> {
        self.entries.last()
    }

    /// Number of recorded entries.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use quizionix_types::{BranchId, ChallengeId, ZoneId};

    use super::*;

    fn builder(success: bool) -> ResearchEntryBuilder {
        ResearchEntryBuilder::new(
            ChallengeId::new(),
            ZoneId::from("science"),
            BranchId::from("physics"),
        )
        .timing(4.0, 22.0)
        .outcome(success)
        .knowledge_health(80.0, if success { 88.0 } else { 68.0 })
    }

    #[test]
    fn sequences_are_contiguous() {
        let mut log = ResearchLog::new();
        for i in 0..5 {
            assert!(log.record(builder(i % 2 == 0)).is_ok());
        }
        let sequences: Vec<u64> = log.entries().iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
        assert_eq!(log.last().map(|e| e.sequence), Some(4));
    }

    #[test]
    fn invalid_builder_does_not_append() {
        let mut log = ResearchLog::new();
        let incomplete = ResearchEntryBuilder::new(
            ChallengeId::new(),
            ZoneId::from("science"),
            BranchId::from("physics"),
        );
        assert!(log.record(incomplete).is_err());
        assert!(log.is_empty());
    }

    #[test]
    fn from_entries_renumbers() {
        let mut log = ResearchLog::new();
        log.record(builder(true)).expect("complete entry");
        log.record(builder(false)).expect("complete entry");
        let mut entries = log.entries().to_vec();
        entries.reverse();
        let rebuilt = ResearchLog::from_entries(entries);
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.entries().first().map(|e| e.sequence), Some(0));
        assert_eq!(rebuilt.entries().first().map(|e| e.success), Some(false));
    }
}
