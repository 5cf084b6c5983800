//! Text quality scores.
//!
//! Everything here is a pure function of its input text. Blank text never
//! fails: it scores zero (or 100 for accuracy-style ratios) instead.
use serde::{Deserialize, Serialize};

use crate::normalize::sentences;
use crate::tokenizer::Tokenize;

mod fluency;
mod readability;

pub use self::fluency::{coherence_score, fluency, grammar_score, sentence_variety, word_variety};
pub use self::readability::{count_syllables, readability};

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Whitespace-delimited tokens.
pub fn count_words(text: &str) -> usize {
    text.token_count()
}

/// Non-empty runs between `.`, `!` and `?`.
pub fn count_sentences(text: &str) -> usize {
    sentences(text).len()
}

/// Paragraphs are separated by blank lines.
pub fn count_paragraphs(text: &str) -> usize {
    text.split("\n\n").filter(|p| !p.trim().is_empty()).count()
}

fn mismatches(original: &[&str], corrected: &[&str]) -> usize {
    original
        .iter()
        .zip(corrected.iter())
        .filter(|(a, b)| a != b)
        .count()
}

/// Share of positions, over the common token prefix, where the corrected
/// text differs from the original, as a percentage.
///
/// Despite the name this measures how much was changed. The shorter of the
/// two token lists sets the denominator; an empty overlap scores 100.
pub fn accuracy(original: &str, corrected: &str) -> f64 {
    if original.is_empty() {
        return 100.0;
    }

    let original: Vec<&str> = original.tokens().collect();
    let corrected: Vec<&str> = corrected.tokens().collect();
    let overlap = original.len().min(corrected.len());
    if overlap == 0 {
        return 100.0;
    }

    let changed = mismatches(&original[..overlap], &corrected[..overlap]);
    (changed as f64 / overlap as f64 * 100.0).min(100.0)
}

/// Result of [`error_rate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorRate {
    /// percentage, two decimals
    pub error_rate: f64,
    /// `100 - error_rate`, two decimals
    pub accuracy_rate: f64,
    /// changed positions plus the word-count difference
    pub errors_corrected: usize,
}

/// Positional mismatches plus the difference in word count, relative to the
/// original's word count.
pub fn error_rate(original: &str, corrected: &str) -> ErrorRate {
    let original: Vec<&str> = original.tokens().collect();
    let corrected: Vec<&str> = corrected.tokens().collect();

    if original.is_empty() {
        return ErrorRate {
            error_rate: 0.0,
            accuracy_rate: 100.0,
            errors_corrected: 0,
        };
    }

    let errors = mismatches(&original, &corrected)
        + original.len().abs_diff(corrected.len());
    let rate = errors as f64 / original.len() as f64 * 100.0;

    ErrorRate {
        error_rate: round_to(rate, 2),
        accuracy_rate: round_to(100.0 - rate, 2),
        errors_corrected: errors,
    }
}

/// Result of [`typing_errors`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypingErrors {
    /// tokens in the original
    pub total_words: usize,
    /// positions where the tokens differ
    pub errors_corrected: usize,
    /// percentage of changed positions
    pub error_rate: f64,
    /// percentage of unchanged positions
    pub accuracy: f64,
}

/// Like [`error_rate`] but without the word-count penalty and unrounded.
pub fn typing_errors(original: &str, corrected: &str) -> TypingErrors {
    let original: Vec<&str> = original.tokens().collect();
    let corrected: Vec<&str> = corrected.tokens().collect();

    let total_words = original.len();
    let errors = mismatches(&original, &corrected);
    let (error_rate, accuracy) = if total_words == 0 {
        (0.0, 100.0)
    } else {
        let total = total_words as f64;
        (
            errors as f64 / total * 100.0,
            (total_words - errors) as f64 / total * 100.0,
        )
    };

    TypingErrors {
        total_words,
        errors_corrected: errors,
        error_rate,
        accuracy,
    }
}

/// Result of [`typing_speed`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypingSpeed {
    /// words per minute, one decimal
    pub wpm: f64,
    /// characters per minute, one decimal
    pub cpm: f64,
}

/// Words and characters per minute for `text` typed in `seconds`.
///
/// A duration that is not positive gives zero speeds.
pub fn typing_speed(text: &str, seconds: f64) -> TypingSpeed {
    if seconds <= 0.0 || seconds.is_nan() {
        return TypingSpeed { wpm: 0.0, cpm: 0.0 };
    }

    let words = count_words(text) as f64;
    let chars = text.chars().count() as f64;
    TypingSpeed {
        wpm: round_to(words / seconds * 60.0, 1),
        cpm: round_to(chars / seconds * 60.0, 1),
    }
}

/// Counts and scores for one text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    /// whitespace-delimited tokens
    pub word_count: usize,
    /// chars, whitespace included
    pub character_count: usize,
    /// see [`count_sentences`]
    pub sentence_count: usize,
    /// see [`count_paragraphs`]
    pub paragraph_count: usize,
    /// one decimal
    pub avg_words_per_sentence: f64,
    /// [`readability`], one decimal
    pub readability_score: f64,
    /// [`fluency`], one decimal
    pub fluency_score: f64,
}

/// Every count and score of `text` at once. Blank text gives all zeros.
pub fn analyze(text: &str) -> TextAnalysis {
    if text.trim().is_empty() {
        return TextAnalysis::default();
    }

    let word_count = count_words(text);
    let sentence_count = count_sentences(text);
    let avg_words_per_sentence = if sentence_count > 0 {
        word_count as f64 / sentence_count as f64
    } else {
        0.0
    };

    TextAnalysis {
        word_count,
        character_count: text.chars().count(),
        sentence_count,
        paragraph_count: count_paragraphs(text),
        avg_words_per_sentence: round_to(avg_words_per_sentence, 1),
        readability_score: round_to(readability(text), 1),
        fluency_score: round_to(fluency(text), 1),
    }
}
