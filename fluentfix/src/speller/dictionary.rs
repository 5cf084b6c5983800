//! Parsing of word-frequency lists.
use std::io::BufRead;

use hashbrown::HashMap;
use smol_str::SmolStr;

use super::error::DictionaryError;
use crate::tokenizer::clean_word;

/// Frequency given to the first word of a list without counts; later words
/// fall off as `RANKED_BASE / rank`.
const RANKED_BASE: u64 = 1_000_000;

pub(crate) type WordMap = HashMap<SmolStr, u64>;

/// Parses a plain-text word list.
///
/// One entry per line, either `word` or `word count` (tab or space
/// separated). Blank lines and lines starting with `#` are skipped. Words
/// listed without a count are assumed to be in descending frequency order
/// and receive a Zipf-style frequency derived from their rank.
pub(crate) fn parse_word_list<R: BufRead>(reader: R) -> Result<WordMap, DictionaryError> {
    let mut words = WordMap::new();
    let mut rank: u64 = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DictionaryError::Io("<reader>".into(), e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut columns = trimmed.split_whitespace();
        let word = match columns.next() {
            Some(w) => clean_word(w),
            None => continue,
        };

        let frequency = match columns.next() {
            Some(count) => count.parse::<u64>().map_err(|_| DictionaryError::MalformedLine {
                line: index + 1,
                content: line.clone(),
            })?,
            None => {
                rank += 1;
                (RANKED_BASE / rank).max(1)
            }
        };

        if word.is_empty() {
            log::warn!("Skipping dictionary line {} without word characters", index + 1);
            continue;
        }

        let count = words.entry(word).or_insert(0);
        *count = count.saturating_add(frequency);
    }

    ensure_not_empty(words)
}

/// Parses a JSON object of `{"word": frequency}` pairs.
pub(crate) fn parse_json<R: std::io::Read>(reader: R) -> Result<WordMap, DictionaryError> {
    let raw: std::collections::HashMap<String, u64> = serde_json::from_reader(reader)?;
    let mut words = WordMap::with_capacity(raw.len());

    for (word, frequency) in raw {
        let key = clean_word(&word);
        if key.is_empty() {
            continue;
        }
        let count = words.entry(key).or_insert(0);
        *count = count.saturating_add(frequency);
    }

    ensure_not_empty(words)
}

fn ensure_not_empty(words: WordMap) -> Result<WordMap, DictionaryError> {
    if words.is_empty() {
        return Err(DictionaryError::Empty);
    }
    Ok(words)
}
