//! Corrector configuration, loadable from JSON.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::pipeline::StageSet;
use crate::speller::SpellerConfig;

/// Errors that can occur while reading a configuration file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be read
    #[error("Could not read config `{0}`")]
    Io(String, #[source] std::io::Error),

    /// The file is not a valid configuration
    #[error("Invalid JSON config")]
    Json(#[from] serde_json::Error),
}

/// Everything needed to build a [`Corrector`](crate::Corrector) and run it.
///
/// Missing fields fall back to [`CorrectorConfig::default`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorrectorConfig {
    /// stages enabled when the caller does not choose
    pub stages: StageSet,
    /// minimum confidence for a fluency suggestion to be reported
    pub confidence_threshold: f64,
    /// candidate search settings
    pub speller: SpellerConfig,
    /// word list or JSON frequency map replacing the built-in dictionary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<PathBuf>,
    /// JSON rule set replacing the built-in grammar and fluency tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<PathBuf>,
}

impl CorrectorConfig {
    /// All stages, threshold 0.7, built-in dictionary and rules.
    pub const fn default() -> CorrectorConfig {
        CorrectorConfig {
            stages: StageSet::all(),
            confidence_threshold: 0.7,
            speller: SpellerConfig::default(),
            dictionary: None,
            rules: None,
        }
    }

    /// Reads a JSON config.
    pub fn from_reader<R: Read>(reader: R) -> Result<CorrectorConfig, ConfigError> {
        Ok(serde_json::from_reader(BufReader::new(reader))?)
    }

    /// Reads a JSON config file.
    pub fn from_path(path: &Path) -> Result<CorrectorConfig, ConfigError> {
        let file =
            File::open(path).map_err(|e| ConfigError::Io(path.to_string_lossy().to_string(), e))?;
        let config = CorrectorConfig::from_reader(file)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        CorrectorConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;

    #[test]
    fn partial_json_uses_defaults() {
        let config = CorrectorConfig::from_reader(
            r#"{"stages": ["spelling", "punctuation"], "speller": {"max_distance": 1, "n_best": 3}}"#.as_bytes(),
        )
        .unwrap();

        assert!(config.stages.contains(Stage::Spelling));
        assert!(!config.stages.contains(Stage::Fluency));
        assert_eq!(config.confidence_threshold, 0.7);
        assert_eq!(config.speller.max_distance, 1);
        assert_eq!(config.dictionary, None);
    }

    #[test]
    fn empty_object_is_default() {
        let config = CorrectorConfig::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(config, CorrectorConfig::default());
    }

    #[test]
    fn bad_json() {
        assert!(matches!(
            CorrectorConfig::from_reader(r#"{"stages": ["style"]}"#.as_bytes()),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            CorrectorConfig::from_path(Path::new("/nonexistent/fluentfix.json")),
            Err(ConfigError::Io(..))
        ));
    }
}
