//! Correction stages and the caller-selected set of enabled stages.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One pass of the correction pipeline. Declaration order is run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Dictionary replacement of unknown words
    Spelling,
    /// General corrector plus the grammar rule table
    Grammar,
    /// Spacing and sentence-final punctuation
    Punctuation,
    /// Fluency pattern table, gated by the confidence threshold
    Fluency,
}

impl Stage {
    /// Every stage in run order.
    pub const ALL: [Stage; 4] = [
        Stage::Spelling,
        Stage::Grammar,
        Stage::Punctuation,
        Stage::Fluency,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Lowercase name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Spelling => "spelling",
            Stage::Grammar => "grammar",
            Stage::Punctuation => "punctuation",
            Stage::Fluency => "fluency",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown stage name.
#[derive(Debug, thiserror::Error)]
#[error("Unknown correction stage `{0}` (expected spelling, grammar, punctuation or fluency)")]
pub struct UnknownStage(pub String);

impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" | "spelling" => Ok(Stage::Spelling),
            "g" | "grammar" => Ok(Stage::Grammar),
            "p" | "punctuation" => Ok(Stage::Punctuation),
            "f" | "fluency" => Ok(Stage::Fluency),
            _ => Err(UnknownStage(s.to_string())),
        }
    }
}

/// Set of enabled stages. Iteration always yields run order, whatever the
/// order stages were added in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Stage>", into = "Vec<Stage>")]
pub struct StageSet(u8);

impl StageSet {
    /// No stages: correcting becomes the identity.
    pub const fn empty() -> StageSet {
        StageSet(0)
    }

    /// All four stages.
    pub const fn all() -> StageSet {
        StageSet(0b1111)
    }

    /// This set with `stage` added.
    pub fn with(mut self, stage: Stage) -> StageSet {
        self.insert(stage);
        self
    }

    /// Enables `stage`.
    pub fn insert(&mut self, stage: Stage) {
        self.0 |= stage.bit();
    }

    /// Disables `stage`.
    pub fn remove(&mut self, stage: Stage) {
        self.0 &= !stage.bit();
    }

    /// Whether `stage` is enabled.
    pub fn contains(&self, stage: Stage) -> bool {
        self.0 & stage.bit() != 0
    }

    /// Whether no stage is enabled.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Enabled stages in run order.
    pub fn iter(&self) -> impl Iterator<Item = Stage> + '_ {
        Stage::ALL.iter().copied().filter(move |s| self.contains(*s))
    }

    /// Parses a comma-separated list such as `"spelling,punctuation"` or `"s,g"`.
    pub fn parse_list(list: &str) -> Result<StageSet, UnknownStage> {
        list.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Stage::from_str)
            .collect()
    }
}

impl FromIterator<Stage> for StageSet {
    fn from_iter<I: IntoIterator<Item = Stage>>(iter: I) -> Self {
        iter.into_iter().fold(StageSet::empty(), StageSet::with)
    }
}

impl From<Vec<Stage>> for StageSet {
    fn from(stages: Vec<Stage>) -> Self {
        stages.into_iter().collect()
    }
}

impl From<StageSet> for Vec<Stage> {
    fn from(set: StageSet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_follows_run_order() {
        let set: StageSet = vec![Stage::Fluency, Stage::Spelling].into();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Stage::Spelling, Stage::Fluency]);
        assert!(!set.contains(Stage::Grammar));
        assert_eq!(StageSet::all().iter().count(), 4);
        assert!(StageSet::empty().is_empty());
    }

    #[test]
    fn insert_and_remove() {
        let mut set = StageSet::empty().with(Stage::Grammar);
        set.insert(Stage::Punctuation);
        set.remove(Stage::Grammar);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Stage::Punctuation]);
    }

    #[test]
    fn parse_list() {
        let set = StageSet::parse_list("spelling, P").unwrap();
        assert_eq!(set, StageSet::empty().with(Stage::Spelling).with(Stage::Punctuation));
        assert_eq!(StageSet::parse_list("").unwrap(), StageSet::empty());
        assert!(StageSet::parse_list("spelling,style").is_err());
    }

    #[test]
    fn serde_as_list() {
        let set = StageSet::empty().with(Stage::Fluency).with(Stage::Grammar);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["grammar","fluency"]"#);
        let back: StageSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
