//! Flesch Reading Ease.
use crate::tokenizer::Tokenize;

use super::{count_sentences, count_words};

fn vowel_groups(word: &str) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for c in word.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !in_group {
            groups += 1;
        }
        in_group = vowel;
    }
    groups
}

/// Estimated syllable count of `text`.
///
/// Each word is lowercased and reduced to `a-z`; its syllables are its vowel
/// groups, one fewer for a trailing silent `e`, and at least one. Words with
/// no `a-z` letters count for nothing.
pub fn count_syllables(text: &str) -> usize {
    text.tokens()
        .map(|token| {
            let word: String = token
                .chars()
                .flat_map(char::to_lowercase)
                .filter(char::is_ascii_lowercase)
                .collect();
            if word.is_empty() {
                return 0;
            }

            let mut groups = vowel_groups(&word);
            if word.ends_with('e') && groups > 1 {
                groups -= 1;
            }
            groups.max(1)
        })
        .sum()
}

/// Flesch Reading Ease clamped to `[0, 100]`; higher reads easier.
pub fn readability(text: &str) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let sentences = count_sentences(text);
    let words = count_words(text);
    if sentences == 0 || words == 0 {
        return 0.0;
    }

    let words = words as f64;
    let syllables = count_syllables(text) as f64;
    let score = 206.835 - 1.015 * (words / sentences as f64) - 84.6 * (syllables / words);
    score.clamp(0.0, 100.0)
}
