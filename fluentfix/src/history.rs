//! Caller-owned log of correction records.
//!
//! The corrector itself keeps no history: each call returns fresh records
//! and the caller decides what to keep and for how long.
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::diff::{CorrectionKind, CorrectionRecord};

/// Append-only list of correction records, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CorrectionLog {
    records: Vec<CorrectionRecord>,
}

/// Per-kind counts and mean confidence of a [`CorrectionLog`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LogSummary {
    /// number of records
    pub total: usize,
    /// records per kind; absent kinds have none
    pub by_kind: HashMap<CorrectionKind, usize>,
    /// 0 for an empty log
    pub mean_confidence: f64,
}

impl LogSummary {
    /// Records of `kind`, 0 if there are none.
    pub fn count(&self, kind: CorrectionKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

impl CorrectionLog {
    /// An empty log.
    pub fn new() -> CorrectionLog {
        CorrectionLog::default()
    }

    /// Appends one record.
    pub fn push(&mut self, record: CorrectionRecord) {
        self.records.push(record);
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, CorrectionRecord> {
        self.records.iter()
    }

    /// The last `n` records, oldest first.
    pub fn recent(&self, n: usize) -> &[CorrectionRecord] {
        &self.records[self.records.len().saturating_sub(n)..]
    }

    /// Drops everything but the last `n` records.
    pub fn retain_recent(&mut self, n: usize) {
        let excess = self.records.len().saturating_sub(n);
        if excess > 0 {
            log::debug!("Dropping {} old correction records", excess);
            self.records.drain(..excess);
        }
    }

    /// Counts per kind and mean confidence of every record held.
    pub fn summary(&self) -> LogSummary {
        let mut by_kind = HashMap::new();
        for record in &self.records {
            *by_kind.entry(record.kind).or_insert(0) += 1;
        }

        let mean_confidence = if self.records.is_empty() {
            0.0
        } else {
            self.records.iter().map(|r| r.confidence).sum::<f64>() / self.records.len() as f64
        };

        LogSummary {
            total: self.records.len(),
            by_kind,
            mean_confidence,
        }
    }
}

impl Extend<CorrectionRecord> for CorrectionLog {
    fn extend<I: IntoIterator<Item = CorrectionRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl<'a> IntoIterator for &'a CorrectionLog {
    type Item = &'a CorrectionRecord;
    type IntoIter = std::slice::Iter<'a, CorrectionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
