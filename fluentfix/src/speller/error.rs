//! Error types for loading a word-frequency dictionary.

/// Errors that can occur while loading a dictionary.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DictionaryError {
    /// The dictionary file could not be read
    #[error("Could not read dictionary `{0}`")]
    Io(String, #[source] std::io::Error),

    /// A line had a frequency column that is not a non-negative integer
    #[error("Malformed dictionary entry on line {line}: {content:?}")]
    MalformedLine {
        /// 1-based line number
        line: usize,
        /// The offending line
        content: String,
    },

    /// A JSON dictionary could not be parsed
    #[error("Invalid JSON dictionary")]
    Json(#[from] serde_json::Error),

    /// The dictionary contained no usable words
    #[error("Dictionary contains no words")]
    Empty,
}
