//! Ordered rewrite rules for the grammar and fluency stages.
//!
//! A rule is a case-insensitive pattern, a [`Rewrite`] and a fixed
//! confidence. Tables are applied top to bottom and every rule sees the
//! output of the rules before it, so order is part of a table's meaning.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::tokenizer::case_handling::CaseMutation;

pub mod punctuation;

/// Errors that can occur while compiling a rule table.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RuleError {
    /// The pattern is not a valid regular expression
    #[error("Invalid rule pattern `{pattern}`")]
    InvalidPattern {
        /// The rejected pattern
        pattern: String,
        /// Why the regex engine rejected it
        #[source]
        source: regex::Error,
    },

    /// The confidence lies outside `[0, 1]`
    #[error("Confidence {confidence} of rule `{pattern}` is outside [0, 1]")]
    InvalidConfidence {
        /// Pattern of the offending rule
        pattern: String,
        /// The rejected confidence
        confidence: f64,
    },

    /// The rule file could not be read
    #[error("Could not read rule file `{0}`")]
    Io(String, #[source] std::io::Error),

    /// The rule file is not valid JSON
    #[error("Invalid JSON rule file")]
    Json(#[from] serde_json::Error),
}

/// How the text matched by a rule is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Inserted as written; `$1`-style group references are expanded.
    Literal(String),
    /// Inserted with the case shape of the matched text.
    MatchCase(String),
}

/// A compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    rewrite: Rewrite,
    confidence: f64,
}

impl Rule {
    /// Compiles `pattern` case-insensitively.
    pub fn new(pattern: &str, rewrite: Rewrite, confidence: f64) -> Result<Rule, RuleError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(RuleError::InvalidConfidence {
                pattern: pattern.to_string(),
                confidence,
            });
        }

        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RuleError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Rule {
            pattern: compiled,
            rewrite,
            confidence,
        })
    }

    /// The source of the compiled pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// How matches are replaced.
    pub fn rewrite(&self) -> &Rewrite {
        &self.rewrite
    }

    /// Confidence reported with every change this rule makes.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Replaces every match in `text`.
    pub fn apply(&self, text: &str) -> String {
        match &self.rewrite {
            Rewrite::Literal(template) => {
                self.pattern.replace_all(text, template.as_str()).into_owned()
            }
            Rewrite::MatchCase(word) => self
                .pattern
                .replace_all(text, |caps: &Captures| {
                    CaseMutation::of(&caps[0]).apply(word).to_string()
                })
                .into_owned(),
        }
    }
}

/// Serialized form of a [`Rule`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSpec {
    /// regular expression, matched case-insensitively
    pub pattern: String,
    /// replacement text or template
    pub replacement: String,
    /// in `[0, 1]`
    pub confidence: f64,
    /// Give the replacement the case of the matched text
    #[serde(default)]
    pub match_case: bool,
}

impl RuleSpec {
    fn new(pattern: &str, replacement: &str, confidence: f64, match_case: bool) -> RuleSpec {
        RuleSpec {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            confidence,
            match_case,
        }
    }

    /// Compiles this spec into a [`Rule`].
    pub fn compile(&self) -> Result<Rule, RuleError> {
        let rewrite = if self.match_case {
            Rewrite::MatchCase(self.replacement.clone())
        } else {
            Rewrite::Literal(self.replacement.clone())
        };
        Rule::new(&self.pattern, rewrite, self.confidence)
    }
}

/// Grammar and fluency tables in their serialized form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSet {
    /// grammar stage rules, in application order
    #[serde(default)]
    pub grammar: Vec<RuleSpec>,
    /// fluency stage rules, in application order
    #[serde(default)]
    pub fluency: Vec<RuleSpec>,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            grammar: vec![
                RuleSpec::new(r"\bi\b", "I", 0.95, false),
                RuleSpec::new(r"\bteh\b", "the", 0.9, true),
                RuleSpec::new(r"\band\s+and\b", "and", 0.9, true),
                RuleSpec::new(r"\bthe\s+the\b", "the", 0.9, true),
                RuleSpec::new(r"\bis\s+are\b", "are", 0.8, true),
            ],
            fluency: vec![
                RuleSpec::new(r"\bvery\s+very\b", "extremely", 0.8, true),
                RuleSpec::new(r"\bgood\s+good\b", "excellent", 0.7, true),
                RuleSpec::new(r"\bbig\s+big\b", "enormous", 0.7, true),
                RuleSpec::new(r"\bsmall\s+small\b", "tiny", 0.7, true),
                RuleSpec::new(r"\ba\s+lot\s+of\b", "many", 0.75, true),
            ],
        }
    }
}

impl RuleSet {
    /// Reads a JSON rule set. Missing tables are empty.
    pub fn from_reader<R: Read>(reader: R) -> Result<RuleSet, RuleError> {
        Ok(serde_json::from_reader(BufReader::new(reader))?)
    }

    /// Reads a JSON rule set file.
    pub fn from_path(path: &Path) -> Result<RuleSet, RuleError> {
        let file =
            File::open(path).map_err(|e| RuleError::Io(path.to_string_lossy().to_string(), e))?;
        RuleSet::from_reader(file)
    }

    /// Compiles both tables, failing on the first bad rule.
    pub fn compile(&self) -> Result<RuleTables, RuleError> {
        let grammar = self
            .grammar
            .iter()
            .map(RuleSpec::compile)
            .collect::<Result<Vec<_>, _>>()?;
        let fluency = self
            .fluency
            .iter()
            .map(RuleSpec::compile)
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Compiled {} grammar rules and {} fluency patterns",
            grammar.len(),
            fluency.len()
        );
        Ok(RuleTables { grammar, fluency })
    }
}

/// Compiled grammar and fluency tables.
#[derive(Debug, Clone)]
pub struct RuleTables {
    /// grammar stage rules
    pub grammar: Vec<Rule>,
    /// fluency stage patterns
    pub fluency: Vec<Rule>,
}

impl RuleTables {
    /// The built-in English tables.
    pub fn english() -> Result<RuleTables, RuleError> {
        RuleSet::default().compile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, replacement: &str, match_case: bool) -> Rule {
        RuleSpec::new(pattern, replacement, 0.9, match_case)
            .compile()
            .unwrap()
    }

    #[test]
    fn literal_rewrite() {
        let pronoun = rule(r"\bi\b", "I", false);
        assert_eq!(pronoun.apply("i think i can"), "I think I can");
        assert_eq!(pronoun.apply("hi there"), "hi there");
    }

    #[test]
    fn literal_rewrite_expands_groups() {
        let percent = rule(r"(\d+)\s*%", "${1} percent", false);
        assert_eq!(percent.apply("up 5% today"), "up 5 percent today");
    }

    #[test]
    fn match_case_rewrite() {
        let teh = rule(r"\bteh\b", "the", true);
        assert_eq!(teh.apply("Teh cat"), "The cat");
        assert_eq!(teh.apply("TEH CAT"), "THE CAT");
        assert_eq!(teh.apply("on teh mat"), "on the mat");

        let very = rule(r"\bvery\s+very\b", "extremely", true);
        assert_eq!(very.apply("Very very cold"), "Extremely cold");
    }

    #[test]
    fn invalid_rules() {
        assert!(matches!(
            Rule::new("(unclosed", Rewrite::Literal("x".into()), 0.5),
            Err(RuleError::InvalidPattern { .. })
        ));
        assert!(matches!(
            Rule::new("ok", Rewrite::Literal("x".into()), 1.5),
            Err(RuleError::InvalidConfidence { .. })
        ));
    }

    #[test]
    fn english_tables_keep_order() {
        let tables = RuleTables::english().unwrap();
        assert_eq!(tables.grammar.len(), 5);
        assert_eq!(tables.fluency.len(), 5);
        assert_eq!(tables.grammar[0].pattern(), r"\bi\b");
        assert_eq!(tables.fluency[1].confidence(), 0.7);
    }

    #[test]
    fn rule_set_from_json() {
        let json = r#"{
            "grammar": [{"pattern": "\\bcould\\s+of\\b", "replacement": "could have", "confidence": 0.85, "match_case": true}]
        }"#;
        let set = RuleSet::from_reader(json.as_bytes()).unwrap();
        assert!(set.fluency.is_empty());

        let tables = set.compile().unwrap();
        assert_eq!(tables.grammar[0].apply("Could of known"), "Could have known");
    }
}
