//! Whitespace tokenization and dictionary-key normalization.
use std::str::SplitWhitespace;

use smol_str::SmolStr;

pub mod case_handling;

/// Splits text into the whitespace-delimited tokens every stage works on.
pub trait Tokenize {
    /// Whitespace-delimited tokens, surface form kept intact
    fn tokens(&self) -> SplitWhitespace<'_>;

    /// Number of whitespace-delimited tokens
    fn token_count(&self) -> usize;
}

impl Tokenize for str {
    #[inline(always)]
    fn tokens(&self) -> SplitWhitespace<'_> {
        self.split_whitespace()
    }

    fn token_count(&self) -> usize {
        self.split_whitespace().count()
    }
}

/// Whether `ch` survives [`clean_word`]: a word character in the regex sense.
#[inline(always)]
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Lowercases `token` and drops every non-word character.
///
/// This is the key used for dictionary lookups: `"Hello,"` becomes `"hello"`.
pub fn clean_word(token: &str) -> SmolStr {
    token
        .chars()
        .filter(|&c| is_word_char(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether `token` contains at least one letter. Tokens without letters
/// (numbers, punctuation runs) are never spell-checked.
pub fn has_letters(token: &str) -> bool {
    token.chars().any(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_ignore_whitespace_runs() {
        let msg = "this  is\tan ordinary\nsentence! ";
        assert_eq!(
            msg.tokens().collect::<Vec<_>>(),
            vec!["this", "is", "an", "ordinary", "sentence!"]
        );
        assert_eq!(msg.token_count(), 5);
        assert_eq!("   ".token_count(), 0);
    }

    #[test]
    fn clean_word_strips_punctuation() {
        assert_eq!(clean_word("Hello,"), "hello");
        assert_eq!(clean_word("\"Don't!\""), "dont");
        assert_eq!(clean_word("snake_case"), "snake_case");
        assert_eq!(clean_word("ÅRET."), "året");
        assert_eq!(clean_word("--"), "");
    }

    #[test]
    fn letters() {
        assert!(has_letters("abc1"));
        assert!(!has_letters("1999"));
        assert!(!has_letters("..."));
    }
}
