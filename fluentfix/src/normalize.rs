//! Optional cleanup applied to text before it is corrected.
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,.!?;:])").unwrap());
static SPACE_AFTER_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"([,.!?;:])\s*").unwrap());
static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Expansions in the order they are tried. Whole forms come before the
/// suffixes they contain.
const CONTRACTIONS: [(&str, &str); 8] = [
    ("won't", "will not"),
    ("can't", "cannot"),
    ("n't", " not"),
    ("'re", " are"),
    ("'ve", " have"),
    ("'ll", " will"),
    ("'d", " would"),
    ("'m", " am"),
];

/// Collapses whitespace and puts exactly one space after `, . ! ? ; :`
/// and none before.
///
/// Marks inside numbers are treated like any other, so `3.14` becomes
/// `3. 14`.
pub fn preprocess(text: &str) -> String {
    let text = WHITESPACE.replace_all(text.trim(), " ");
    let text = SPACE_BEFORE_MARK.replace_all(&text, "${1}");
    let text = SPACE_AFTER_MARK.replace_all(&text, "${1} ");
    text.trim_end().to_string()
}

/// Expands English contractions (`can't` to `cannot`, `they're` to
/// `they are`). Matching is case-sensitive.
pub fn expand_contractions(text: &str) -> String {
    CONTRACTIONS
        .iter()
        .fold(text.to_string(), |text, (from, to)| text.replace(from, to))
}

/// Non-blank sentences, trimmed. Runs of `.`, `!` and `?` end a sentence.
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
