//! Heuristic fluency score and its four components.
use itertools::Itertools;

use crate::normalize::sentences;
use crate::tokenizer::case_handling::unique_lowercase;
use crate::tokenizer::Tokenize;

const CONNECTIVES: [&str; 12] = [
    "and",
    "but",
    "or",
    "so",
    "because",
    "although",
    "however",
    "therefore",
    "moreover",
    "furthermore",
    "meanwhile",
    "consequently",
];

const SHORT_SENTENCE: usize = 3;
const LONG_SENTENCE: usize = 25;

/// Weighted blend of the components, clamped to `[0, 100]`.
pub fn fluency(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let score = 0.25 * word_variety(text)
        + 0.25 * sentence_variety(text)
        + 0.3 * grammar_score(text)
        + 0.2 * coherence_score(text);
    score.clamp(0.0, 100.0)
}

/// Distinct words per word, case-insensitive, as a percentage.
pub fn word_variety(text: &str) -> f64 {
    let total = text.token_count();
    if total == 0 {
        return 0.0;
    }

    let unique = unique_lowercase(text.tokens()).len();
    (unique as f64 / total as f64 * 100.0).min(100.0)
}

/// Coefficient of variation of sentence lengths in words, as a percentage.
/// Texts with fewer than two sentences score 50.
pub fn sentence_variety(text: &str) -> f64 {
    let lengths: Vec<f64> = sentences(text)
        .into_iter()
        .map(|s| s.token_count() as f64)
        .collect();
    if lengths.len() < 2 {
        return 50.0;
    }

    let n = lengths.len() as f64;
    let mean = lengths.iter().sum::<f64>() / n;
    let variance = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;
    (variance.sqrt() / mean * 100.0).min(100.0)
}

/// 100 minus penalties for very short sentences, very long sentences and
/// immediately repeated words.
pub fn grammar_score(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let mut score = 100.0;
    for sentence in sentences(text) {
        let words = sentence.token_count();
        if words < SHORT_SENTENCE {
            score -= 5.0;
        }
        if words > LONG_SENTENCE {
            score -= 10.0;
        }
    }

    let lowercase = text.to_lowercase();
    let repeats = lowercase
        .tokens()
        .tuple_windows()
        .filter(|(a, b)| a == b)
        .count();
    score -= 5.0 * repeats as f64;

    score.clamp(0.0, 100.0)
}

/// 50 plus 10 for every sentence containing a connective. Texts with fewer
/// than two sentences score 75.
pub fn coherence_score(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let sentences = sentences(text);
    if sentences.len() < 2 {
        return 75.0;
    }

    let connected = sentences
        .iter()
        .filter(|sentence| {
            sentence
                .to_lowercase()
                .tokens()
                .any(|word| CONNECTIVES.contains(&word))
        })
        .count();
    (50.0 + 10.0 * connected as f64).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn components() {
        assert_eq!(word_variety("a a b b"), 50.0);
        assert_eq!(word_variety("The the"), 50.0);
        assert_eq!(word_variety(""), 0.0);

        assert_eq!(sentence_variety("Hi. One two three"), 50.0);
        assert_eq!(sentence_variety("Just one sentence here."), 50.0);
        assert_eq!(sentence_variety("One two. Three four."), 0.0);

        assert_eq!(grammar_score("Hi. Hello there friend."), 95.0);
        assert_eq!(grammar_score("the the cat sat down"), 95.0);
        assert_eq!(grammar_score(&"word ".repeat(26)), 0.0);

        assert_eq!(coherence_score("I ran. And I fell. But then I rose."), 70.0);
        assert_eq!(coherence_score("One sentence only"), 75.0);
        assert_eq!(coherence_score(""), 0.0);
    }

    #[test]
    fn blended_score() {
        assert!(close(fluency("The cat sat on the mat."), 78.0 + 1.0 / 3.0));
        assert_eq!(fluency(""), 0.0);
        assert_eq!(fluency(" \t"), 0.0);

        let score = fluency("Good good good good. Bad.");
        assert!((0.0..=100.0).contains(&score));
    }
}
