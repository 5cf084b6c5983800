//! Dictionary-backed spelling lookup and correction.
//!
//! Corrections are ranked by Damerau-Levenshtein distance, then by word
//! frequency, then alphabetically.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use self::candidate::Candidate;
use self::dictionary::WordMap;
use self::error::DictionaryError;
use crate::tokenizer::clean_word;

pub mod candidate;
mod dictionary;
pub mod error;

/// Default English word list, most frequent words first.
static EMBEDDED_WORDS: &str = include_str!("../../data/en.txt");

/// Candidate search settings of a [`DictionarySpeller`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpellerConfig {
    /// largest edit distance a correction candidate may have
    pub max_distance: usize,
    /// number of candidates returned when no limit is given
    pub n_best: usize,
}

impl SpellerConfig {
    /// Distance 2, five candidates.
    pub const fn default() -> SpellerConfig {
        SpellerConfig {
            max_distance: 2,
            n_best: 5,
        }
    }
}

impl Default for SpellerConfig {
    fn default() -> Self {
        SpellerConfig::default()
    }
}

/// Read-only spelling oracle shared by every pipeline stage.
///
/// All lookups are case-insensitive and ignore non-word characters, so
/// `"Hello,"` and `"hello"` are the same query.
pub trait Speller: Send + Sync {
    /// Whether the word is in the dictionary.
    fn is_known(&self, word: &str) -> bool;
    /// Best replacement for an unknown word, `None` for known or hopeless ones.
    fn correct(&self, word: &str) -> Option<SmolStr>;
    /// Up to `limit` ranked replacements.
    fn candidates(&self, word: &str, limit: usize) -> Vec<SmolStr>;
}

/// Speller over an in-memory word-frequency dictionary.
#[derive(Debug, Clone)]
pub struct DictionarySpeller {
    words: WordMap,
    config: SpellerConfig,
}

impl DictionarySpeller {
    fn with_words(words: WordMap, config: SpellerConfig) -> DictionarySpeller {
        log::debug!(
            "Loaded dictionary with {} words (max distance {})",
            words.len(),
            config.max_distance
        );
        DictionarySpeller { words, config }
    }

    /// The built-in English dictionary.
    pub fn embedded(config: SpellerConfig) -> Result<DictionarySpeller, DictionaryError> {
        let words = dictionary::parse_word_list(EMBEDDED_WORDS.as_bytes())?;
        Ok(DictionarySpeller::with_words(words, config))
    }

    /// Loads a plain-text word list (`word` or `word count` per line).
    pub fn from_reader<R: Read>(
        reader: R,
        config: SpellerConfig,
    ) -> Result<DictionarySpeller, DictionaryError> {
        let words = dictionary::parse_word_list(BufReader::new(reader))?;
        Ok(DictionarySpeller::with_words(words, config))
    }

    /// Loads a JSON `{"word": frequency}` map.
    pub fn from_json_reader<R: Read>(
        reader: R,
        config: SpellerConfig,
    ) -> Result<DictionarySpeller, DictionaryError> {
        let words = dictionary::parse_json(BufReader::new(reader))?;
        Ok(DictionarySpeller::with_words(words, config))
    }

    /// Loads a dictionary file; `.json` files are read as a frequency map,
    /// anything else as a word list.
    pub fn from_path(path: &Path, config: SpellerConfig) -> Result<DictionarySpeller, DictionaryError> {
        let file = File::open(path)
            .map_err(|e| DictionaryError::Io(path.to_string_lossy().to_string(), e))?;

        match path.extension() {
            Some(ext) if ext == "json" => DictionarySpeller::from_json_reader(file, config),
            _ => DictionarySpeller::from_reader(file, config),
        }
    }

    /// Builds a dictionary from `(word, frequency)` pairs.
    pub fn from_frequencies<'a, I>(
        entries: I,
        config: SpellerConfig,
    ) -> Result<DictionarySpeller, DictionaryError>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut words = WordMap::new();
        for (word, frequency) in entries {
            let key = clean_word(word);
            if !key.is_empty() {
                let count = words.entry(key).or_insert(0);
                *count = count.saturating_add(frequency);
            }
        }

        if words.is_empty() {
            return Err(DictionaryError::Empty);
        }
        Ok(DictionarySpeller::with_words(words, config))
    }

    /// Wraps the speller for sharing between correctors and threads.
    pub fn into_arc(self) -> Arc<dyn Speller> {
        Arc::new(self)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the dictionary has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Settings used for candidate search.
    pub fn config(&self) -> &SpellerConfig {
        &self.config
    }

    /// Frequency of a word, `None` when it is not in the dictionary.
    pub fn frequency(&self, word: &str) -> Option<u64> {
        self.words.get(clean_word(word).as_str()).copied()
    }

    /// Every dictionary word within `max_distance` edits of `key`, best first.
    fn ranked(&self, key: &str) -> Vec<Candidate> {
        let max_distance = self.config.max_distance;
        let key_len = key.chars().count();

        let mut candidates: Vec<Candidate> = self
            .words
            .iter()
            .filter(|(word, _)| {
                let len = word.chars().count();
                len.max(key_len) - len.min(key_len) <= max_distance
            })
            .filter_map(|(word, &frequency)| {
                let distance = strsim::damerau_levenshtein(key, word);
                if distance <= max_distance {
                    Some(Candidate::new(word.clone(), distance, frequency))
                } else {
                    None
                }
            })
            .collect();

        candidates.sort();
        log::trace!("{} candidates for {:?}", candidates.len(), key);
        candidates
    }
}

impl Speller for DictionarySpeller {
    fn is_known(&self, word: &str) -> bool {
        let key = clean_word(word);
        !key.is_empty() && self.words.contains_key(key.as_str())
    }

    fn correct(&self, word: &str) -> Option<SmolStr> {
        let key = clean_word(word);
        if key.is_empty() || self.words.contains_key(key.as_str()) {
            return None;
        }

        self.ranked(&key).into_iter().next().map(|c| c.value)
    }

    fn candidates(&self, word: &str, limit: usize) -> Vec<SmolStr> {
        let key = clean_word(word);
        if key.is_empty() || limit == 0 {
            return vec![];
        }

        if self.words.contains_key(key.as_str()) {
            return vec![key];
        }

        self.ranked(&key)
            .into_iter()
            .take(limit)
            .map(|c| c.value)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speller() -> DictionarySpeller {
        DictionarySpeller::from_frequencies(
            vec![
                ("the", 10_000),
                ("then", 900),
                ("ten", 50),
                ("tea", 60),
                ("hello", 400),
                ("help", 300),
                ("world", 200),
                ("receive", 80),
            ],
            SpellerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn known_words_ignore_case_and_punctuation() {
        let speller = speller();
        assert!(speller.is_known("The"));
        assert!(speller.is_known("hello,"));
        assert!(speller.is_known("\"WORLD!\""));
        assert!(!speller.is_known("wrold"));
        assert!(!speller.is_known("..."));
        assert!(!speller.is_known(""));
    }

    #[test]
    fn correct_prefers_transposition_and_frequency() {
        let speller = speller();
        assert_eq!(speller.correct("teh").as_deref(), Some("the"));
        assert_eq!(speller.correct("recieve").as_deref(), Some("receive"));
        assert_eq!(speller.correct("helo").as_deref(), Some("hello"));
    }

    #[test]
    fn correct_known_or_hopeless() {
        let speller = speller();
        assert_eq!(speller.correct("the"), None);
        assert_eq!(speller.correct("xylophonics"), None);
        assert_eq!(speller.correct("!!"), None);
    }

    #[test]
    fn candidates_are_ranked_and_limited() {
        let speller = speller();
        assert_eq!(speller.candidates("teh", 3), vec!["the", "tea", "ten"]);
        assert_eq!(speller.candidates("teh", 1), vec!["the"]);
        assert_eq!(speller.candidates("teh", 0), Vec::<SmolStr>::new());
        assert_eq!(speller.candidates("Hello", 5), vec!["hello"]);
    }

    #[test]
    fn frequencies_saturate() {
        let speller = DictionarySpeller::from_frequencies(
            vec![("the", u64::MAX), ("The", 1)],
            SpellerConfig::default(),
        )
        .unwrap();
        assert_eq!(speller.frequency("the"), Some(u64::MAX));

        let speller = DictionarySpeller::from_json_reader(
            r#"{"The": 18446744073709551615, "the": 1}"#.as_bytes(),
            SpellerConfig::default(),
        )
        .unwrap();
        assert_eq!(speller.frequency("the"), Some(u64::MAX));
    }

    #[test]
    fn embedded_dictionary_loads() {
        let speller = DictionarySpeller::embedded(SpellerConfig::default()).unwrap();
        assert!(speller.len() > 50_000);
        for word in &["i", "a", "the", "good", "cat", "hello", "world", "very"] {
            assert!(speller.is_known(word), "{} should be known", word);
        }
        assert!(!speller.is_known("teh"));
        assert_eq!(speller.correct("teh").as_deref(), Some("the"));
        assert_eq!(speller.correct("recieve").as_deref(), Some("receive"));
        assert_eq!(speller.correct("wrold").as_deref(), Some("world"));
    }

    #[test]
    fn embedded_dictionary_knows_everyday_prose() {
        let speller = DictionarySpeller::embedded(SpellerConfig::default()).unwrap();
        for text in &[
            "The quick brown fox jumps over the lazy dog.",
            "Paris is the capital of France.",
            "She was shining her shoes while they watched the evening news.",
        ] {
            for token in text.split_whitespace() {
                assert!(speller.is_known(token), "{:?} in {:?} should be known", token, text);
            }
        }
    }

    #[test]
    fn load_from_path() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"cat": 5, "dog": 3}}"#).unwrap();
        let speller = DictionarySpeller::from_path(file.path(), SpellerConfig::default()).unwrap();
        assert_eq!(speller.frequency("Cat"), Some(5));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cat\ndog").unwrap();
        let speller = DictionarySpeller::from_path(file.path(), SpellerConfig::default()).unwrap();
        assert_eq!(speller.len(), 2);

        let missing = DictionarySpeller::from_path(Path::new("/nonexistent/words.txt"), SpellerConfig::default());
        assert!(matches!(missing, Err(DictionaryError::Io(..))));
    }
}
