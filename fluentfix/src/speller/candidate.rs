//! Candidate for a spelling correction.
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
/// Candidate for a spelling correction
pub struct Candidate {
    /// the suggested word-form
    pub value: SmolStr,
    /// edit distance from the misspelled input
    pub distance: usize,
    /// corpus frequency of the word-form
    pub frequency: u64,
}

impl Candidate {
    /// creates a spelling correction candidate
    pub fn new(value: SmolStr, distance: usize, frequency: u64) -> Candidate {
        Candidate {
            value,
            distance,
            frequency,
        }
    }

    /// gets the suggested word-form
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Closest first, then most frequent, then alphabetical.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| other.frequency.cmp(&self.frequency))
            .then_with(|| self.value.cmp(&other.value))
    }
}
