//! Error types for constructing a corrector.
//!
//! Correcting, diffing and scoring text never fails; only loading the
//! dictionary, the rule tables or a configuration file can.

use crate::config::ConfigError;
use crate::rules::RuleError;
use crate::speller::error::DictionaryError;

/// Construction-time failure of a [`Corrector`](crate::Corrector).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The word-frequency dictionary could not be loaded
    #[error("Failed to load dictionary: {0}")]
    Dictionary(#[from] DictionaryError),

    /// A grammar or fluency rule table could not be compiled
    #[error("Failed to load rule table: {0}")]
    Rules(#[from] RuleError),

    /// The configuration file could not be read
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias used by every fallible constructor in this crate.
pub type Result<T> = std::result::Result<T, Error>;
