//! Token-level diff between an original and a corrected text.
//!
//! The diff is laid out like a unified diff: between two common tokens all
//! deletions come first, then all insertions. A deletion immediately
//! followed by an insertion is read as one token being replaced and becomes a
//! [`CorrectionRecord`]. Every other deletion or insertion is dropped, so the
//! history covers one replacement per changed region.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokenizer::Tokenize;

/// Words whose presence on either side marks a replacement as grammatical.
const GRAMMAR_INDICATORS: [&str; 7] = ["was", "were", "is", "are", "have", "has", "had"];

/// Category a diffed replacement is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrectionKind {
    /// token length changed
    Spelling,
    /// one side is a form of `be` or `have`
    Grammar,
    /// Never produced by the classifier; kept so records from other sources fit.
    Punctuation,
    /// any other same-length replacement
    Fluency,
    /// only letter case changed
    Capitalization,
}

impl CorrectionKind {
    /// Display name, as used in reports.
    pub fn name(self) -> &'static str {
        match self {
            CorrectionKind::Spelling => "Spelling",
            CorrectionKind::Grammar => "Grammar",
            CorrectionKind::Punctuation => "Punctuation",
            CorrectionKind::Fluency => "Fluency",
            CorrectionKind::Capitalization => "Capitalization",
        }
    }
}

impl fmt::Display for CorrectionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One replaced token, as reconstructed from the diff.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CorrectionRecord {
    /// token in the original text
    pub original: String,
    /// token that replaced it
    pub corrected: String,
    /// serialized as `type`
    #[serde(rename = "type")]
    pub kind: CorrectionKind,
    /// human-readable explanation
    pub reason: String,
    /// similarity of the two tokens, in `[0.5, 1]`
    pub confidence: f64,
}

impl CorrectionRecord {
    /// Classifies the replacement of `original` by `corrected`.
    pub fn new(original: &str, corrected: &str) -> CorrectionRecord {
        CorrectionRecord {
            original: original.to_string(),
            corrected: corrected.to_string(),
            kind: classify(original, corrected),
            reason: reason(original, corrected).to_string(),
            confidence: confidence(original, corrected),
        }
    }
}

/// One line of a token diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLine<'a> {
    /// token present on both sides
    Equal(&'a str),
    /// token only in the original
    Delete(&'a str),
    /// token only in the corrected text
    Insert(&'a str),
}

/// Minimal diff of two token sequences through their longest common
/// subsequence.
pub fn line_diff<'a>(original: &[&'a str], corrected: &[&'a str]) -> Vec<DiffLine<'a>> {
    let anchors = longest_common_subsequence(original, corrected);

    let mut lines = Vec::with_capacity(original.len() + corrected.len());
    let mut orig_idx = 0;
    let mut corr_idx = 0;

    for (anchor_orig, anchor_corr) in anchors
        .into_iter()
        .chain(std::iter::once((original.len(), corrected.len())))
    {
        lines.extend(original[orig_idx..anchor_orig].iter().map(|&t| DiffLine::Delete(t)));
        lines.extend(corrected[corr_idx..anchor_corr].iter().map(|&t| DiffLine::Insert(t)));

        if anchor_orig < original.len() {
            lines.push(DiffLine::Equal(original[anchor_orig]));
        }
        orig_idx = anchor_orig + 1;
        corr_idx = anchor_corr + 1;
    }

    lines
}

fn longest_common_subsequence(original: &[&str], corrected: &[&str]) -> Vec<(usize, usize)> {
    let n = original.len();
    let m = corrected.len();

    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if original[i - 1] == corrected[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut lcs = Vec::with_capacity(dp[n][m]);
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        if original[i - 1] == corrected[j - 1] {
            lcs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    lcs.reverse();
    lcs
}

/// Reconstructs the per-token correction history between two texts.
pub fn find_differences(original: &str, corrected: &str) -> Vec<CorrectionRecord> {
    let original: Vec<&str> = original.tokens().collect();
    let corrected: Vec<&str> = corrected.tokens().collect();
    let lines = line_diff(&original, &corrected);

    let records: Vec<CorrectionRecord> = lines
        .windows(2)
        .filter_map(|pair| match pair {
            [DiffLine::Delete(from), DiffLine::Insert(to)] if from != to => {
                Some(CorrectionRecord::new(from, to))
            }
            _ => None,
        })
        .collect();

    log::debug!(
        "{} diff lines, {} correction records",
        lines.len(),
        records.len()
    );
    records
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn classify(original: &str, corrected: &str) -> CorrectionKind {
    if char_len(original) != char_len(corrected) {
        return CorrectionKind::Spelling;
    }

    let original = original.to_lowercase();
    let corrected = corrected.to_lowercase();
    if original == corrected {
        CorrectionKind::Capitalization
    } else if GRAMMAR_INDICATORS
        .iter()
        .any(|w| *w == original || *w == corrected)
    {
        CorrectionKind::Grammar
    } else {
        CorrectionKind::Fluency
    }
}

fn reason(original: &str, corrected: &str) -> &'static str {
    if original.to_lowercase() != corrected.to_lowercase() {
        match char_len(original).cmp(&char_len(corrected)) {
            std::cmp::Ordering::Greater => "Removed unnecessary characters",
            std::cmp::Ordering::Less => "Added missing characters",
            std::cmp::Ordering::Equal => "Fixed spelling error",
        }
    } else if original != corrected {
        "Fixed capitalization"
    } else {
        "Improved fluency"
    }
}

/// `1 - distance / longer length`, never below 0.5. Two empty strings are a
/// certain match.
pub fn confidence(original: &str, corrected: &str) -> f64 {
    let max_len = char_len(original).max(char_len(corrected));
    if max_len == 0 {
        return 1.0;
    }

    let similarity = 1.0 - edit_distance(original, corrected) as f64 / max_len as f64;
    similarity.max(0.5)
}

/// Levenshtein distance over chars: insertions, deletions and substitutions
/// each cost one.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        matrix[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            matrix[i][j] = if a[i - 1] == b[j - 1] {
                matrix[i - 1][j - 1]
            } else {
                1 + matrix[i - 1][j]
                    .min(matrix[i][j - 1])
                    .min(matrix[i - 1][j - 1])
            };
        }
    }

    matrix[a.len()][b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("teh", "the"), 2);
        assert_eq!(edit_distance("cat", "cot"), 1);
        assert_eq!(edit_distance("åre", "are"), 1);
    }

    #[test]
    fn line_diff_layout() {
        let a = ["a", "b", "c", "d"];
        let b = ["a", "x", "y", "d", "e"];
        assert_eq!(
            line_diff(&a, &b),
            vec![
                DiffLine::Equal("a"),
                DiffLine::Delete("b"),
                DiffLine::Delete("c"),
                DiffLine::Insert("x"),
                DiffLine::Insert("y"),
                DiffLine::Equal("d"),
                DiffLine::Insert("e"),
            ]
        );
        assert!(line_diff(&[], &[]).is_empty());
    }

    #[test]
    fn spelling_fix() {
        let records = find_differences("teh cat sat", "the cat sat");
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.original, "teh");
        assert_eq!(record.corrected, "the");
        assert_eq!(record.kind, CorrectionKind::Fluency);
        assert_eq!(record.reason, "Fixed spelling error");
        assert_eq!(record.confidence, 0.5);
    }

    #[test]
    fn classification() {
        let record = CorrectionRecord::new("i", "I");
        assert_eq!(record.kind, CorrectionKind::Capitalization);
        assert_eq!(record.reason, "Fixed capitalization");
        assert_eq!(record.confidence, 0.5);

        let record = CorrectionRecord::new("was", "are");
        assert_eq!(record.kind, CorrectionKind::Grammar);

        let record = CorrectionRecord::new("cat", "cot");
        assert_eq!(record.kind, CorrectionKind::Fluency);
        assert!((record.confidence - 2.0 / 3.0).abs() < 1e-9);

        let record = CorrectionRecord::new("helllo", "hello");
        assert_eq!(record.kind, CorrectionKind::Spelling);
        assert_eq!(record.reason, "Removed unnecessary characters");
        assert!((record.confidence - 5.0 / 6.0).abs() < 1e-9);

        let record = CorrectionRecord::new("helo", "hello");
        assert_eq!(record.reason, "Added missing characters");
    }

    #[test]
    fn unpaired_changes_are_dropped() {
        assert!(find_differences("The the cat", "The cat").is_empty());
        assert!(find_differences("cat", "big cat").is_empty());

        // Every token differs, so only the last deletion meets the first insertion.
        let records = find_differences("i teh cat", "I the cat.");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original, "cat");
        assert_eq!(records[0].corrected, "I");
    }

    #[test]
    fn one_record_per_changed_region() {
        let records = find_differences("he was good good today", "he was excellent today");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].original, "good");
        assert_eq!(records[0].corrected, "excellent");
        assert_eq!(records[0].kind, CorrectionKind::Spelling);
    }

    #[test]
    fn blank_input() {
        assert!(find_differences("", "").is_empty());
        assert!(find_differences("   ", "cat").is_empty());
        assert_eq!(confidence("", ""), 1.0);
    }

    proptest! {
        #[test]
        fn edit_distance_is_a_metric(a in "[a-c]{0,8}", b in "[a-c]{0,8}", c in "[a-c]{0,8}") {
            prop_assert_eq!(edit_distance(&a, &a), 0);
            prop_assert_eq!(edit_distance(&a, &b), edit_distance(&b, &a));
            prop_assert!(edit_distance(&a, &c) <= edit_distance(&a, &b) + edit_distance(&b, &c));
        }

        #[test]
        fn same_text_has_no_differences(text in "[a-zA-Z .,]{0,60}") {
            prop_assert!(find_differences(&text, &text).is_empty());
        }

        #[test]
        fn confidence_in_range(a in "\\PC{0,10}", b in "\\PC{0,10}") {
            let c = confidence(&a, &b);
            prop_assert!((0.5..=1.0).contains(&c));
        }
    }
}
