//! The four-stage correction pipeline.
//!
//! Stages run in a fixed order (spelling, grammar, punctuation, fluency) and
//! each consumes the text produced by the one before it. Only the fluency
//! stage consults the confidence threshold, and only to decide whether a
//! suggestion is reported: its rewrites are applied either way.
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::CorrectorConfig;
use crate::grammar::{GrammarCorrector, IdentityCorrector};
use crate::rules::punctuation::PunctuationFix;
use crate::rules::{Rule, RuleSet, RuleTables};
use crate::speller::{DictionarySpeller, Speller, SpellerConfig};
use crate::tokenizer::case_handling::reapply_case;
use crate::tokenizer::{clean_word, has_letters, Tokenize};

mod stage;

pub use self::stage::{Stage, StageSet, UnknownStage};

const SPELLING_CONFIDENCE: f64 = 0.8;
const GRAMMAR_CORRECTOR_CONFIDENCE: f64 = 0.75;

/// One change made by a pipeline stage.
///
/// Spelling suggestions carry the token before and after; rule-driven
/// suggestions carry the whole text before and after the rule fired.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    /// token or text before the change
    pub original: String,
    /// token or text after the change
    pub corrected: String,
    /// stage that made the change, serialized as `type`
    #[serde(rename = "type")]
    pub kind: Stage,
    /// fixed per rule or stage, in `[0, 1]`
    pub confidence: f64,
}

impl Suggestion {
    fn new(original: impl Into<String>, corrected: impl Into<String>, kind: Stage, confidence: f64) -> Suggestion {
        Suggestion {
            original: original.into(),
            corrected: corrected.into(),
            kind,
            confidence,
        }
    }
}

/// Result of running the pipeline over one text.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Correction {
    /// text after every enabled stage
    pub text: String,
    /// suggestions of every stage, in stage order
    pub suggestions: Vec<Suggestion>,
}

/// Spelling, grammar, punctuation and fluency corrector.
///
/// Immutable once built; share it between threads behind an `Arc` or by
/// reference.
pub struct Corrector {
    speller: Arc<dyn Speller>,
    rules: RuleTables,
    grammar: Box<dyn GrammarCorrector>,
}

impl std::fmt::Debug for Corrector {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Corrector")
            .field("grammar_rules", &self.rules.grammar.len())
            .field("fluency_patterns", &self.rules.fluency.len())
            .finish()
    }
}

impl Corrector {
    /// Corrector over the built-in English dictionary and rule tables.
    pub fn new() -> crate::Result<Corrector> {
        CorrectorBuilder::new().build()
    }

    /// Corrector whose dictionary and rule tables come from `config`.
    pub fn from_config(config: &CorrectorConfig) -> crate::Result<Corrector> {
        let speller = match &config.dictionary {
            Some(path) => DictionarySpeller::from_path(path, config.speller.clone())?,
            None => DictionarySpeller::embedded(config.speller.clone())?,
        };

        let rules = match &config.rules {
            Some(path) => RuleSet::from_path(path)?.compile()?,
            None => RuleTables::english()?,
        };

        CorrectorBuilder::new()
            .speller(speller.into_arc())
            .rules(rules)
            .build()
    }

    /// Starts a [`CorrectorBuilder`].
    pub fn builder() -> CorrectorBuilder {
        CorrectorBuilder::new()
    }

    /// The speller every stage consults.
    pub fn speller(&self) -> &Arc<dyn Speller> {
        &self.speller
    }

    /// Runs every stage in `stages` over `text`.
    pub fn correct(&self, text: &str, stages: &StageSet, confidence_threshold: f64) -> Correction {
        let mut text = text.to_string();
        let mut suggestions = Vec::new();

        for stage in stages.iter() {
            let before = suggestions.len();
            text = match stage {
                Stage::Spelling => self.correct_spelling(&text, &mut suggestions),
                Stage::Grammar => self.correct_grammar(text, &mut suggestions),
                Stage::Punctuation => correct_punctuation(text, &mut suggestions),
                Stage::Fluency => self.improve_fluency(text, confidence_threshold, &mut suggestions),
            };
            log::debug!("{} stage: {} suggestions", stage, suggestions.len() - before);
        }

        Correction { text, suggestions }
    }

    /// Spelling candidates for a single word.
    pub fn word_suggestions(&self, word: &str, limit: usize) -> Vec<String> {
        self.speller
            .candidates(word, limit)
            .into_iter()
            .map(|c| c.to_string())
            .collect()
    }

    /// Whether `word` is in the dictionary, ignoring case and punctuation.
    pub fn is_word_correct(&self, word: &str) -> bool {
        self.speller.is_known(word)
    }

    fn correct_spelling(&self, text: &str, suggestions: &mut Vec<Suggestion>) -> String {
        let words: Vec<String> = text
            .tokens()
            .map(|word| {
                if !has_letters(word) || self.speller.is_known(word) {
                    return word.to_string();
                }

                let key = clean_word(word);
                match self.speller.correct(word) {
                    Some(fix) if fix != key => {
                        let corrected = reapply_case(word, &fix);
                        log::trace!("spelling: {:?} -> {:?}", word, corrected);
                        suggestions.push(Suggestion::new(
                            word,
                            corrected.as_str(),
                            Stage::Spelling,
                            SPELLING_CONFIDENCE,
                        ));
                        corrected
                    }
                    _ => word.to_string(),
                }
            })
            .collect();

        words.join(" ")
    }

    fn correct_grammar(&self, text: String, suggestions: &mut Vec<Suggestion>) -> String {
        let guessed = self.grammar.suggest(&text);
        if guessed != text {
            suggestions.push(Suggestion::new(
                text.as_str(),
                guessed.as_str(),
                Stage::Grammar,
                GRAMMAR_CORRECTOR_CONFIDENCE,
            ));
        }

        apply_rules(&self.rules.grammar, guessed, Stage::Grammar, None, suggestions)
    }

    fn improve_fluency(
        &self,
        text: String,
        threshold: f64,
        suggestions: &mut Vec<Suggestion>,
    ) -> String {
        apply_rules(&self.rules.fluency, text, Stage::Fluency, Some(threshold), suggestions)
    }
}

/// Applies `rules` in order. A rule that changes the text is reported unless
/// its confidence is below `threshold`.
fn apply_rules(
    rules: &[Rule],
    mut text: String,
    kind: Stage,
    threshold: Option<f64>,
    suggestions: &mut Vec<Suggestion>,
) -> String {
    for rule in rules {
        if !rule.is_match(&text) {
            continue;
        }

        let rewritten = rule.apply(&text);
        if rewritten == text {
            continue;
        }

        let reported = threshold.map_or(true, |t| rule.confidence() >= t);
        log::trace!(
            "{} rule `{}` fired (reported: {})",
            kind,
            rule.pattern(),
            reported
        );
        if reported {
            suggestions.push(Suggestion::new(
                text.as_str(),
                rewritten.as_str(),
                kind,
                rule.confidence(),
            ));
        }
        text = rewritten;
    }

    text
}

fn correct_punctuation(mut text: String, suggestions: &mut Vec<Suggestion>) -> String {
    for fix in PunctuationFix::ALL.iter().copied() {
        if let Some(fixed) = fix.apply(&text) {
            suggestions.push(Suggestion::new(
                text.as_str(),
                fixed.as_str(),
                Stage::Punctuation,
                fix.confidence(),
            ));
            text = fixed;
        }
    }
    text
}

/// Assembles a [`Corrector`]; anything not provided falls back to the
/// built-in English defaults.
#[derive(Default)]
pub struct CorrectorBuilder {
    speller: Option<Arc<dyn Speller>>,
    rules: Option<RuleTables>,
    grammar: Option<Box<dyn GrammarCorrector>>,
}

impl CorrectorBuilder {
    /// A builder with nothing set.
    pub fn new() -> CorrectorBuilder {
        CorrectorBuilder::default()
    }

    /// Uses `speller` instead of the built-in dictionary.
    pub fn speller(mut self, speller: Arc<dyn Speller>) -> CorrectorBuilder {
        self.speller = Some(speller);
        self
    }

    /// Uses `rules` instead of the built-in English tables.
    pub fn rules(mut self, rules: RuleTables) -> CorrectorBuilder {
        self.rules = Some(rules);
        self
    }

    /// Runs `grammar` at the start of the grammar stage. Defaults to
    /// [`IdentityCorrector`].
    pub fn grammar_corrector(mut self, grammar: Box<dyn GrammarCorrector>) -> CorrectorBuilder {
        self.grammar = Some(grammar);
        self
    }

    /// Loads whatever defaults are still missing. Fails if they do not load.
    pub fn build(self) -> crate::Result<Corrector> {
        let speller = match self.speller {
            Some(speller) => speller,
            None => DictionarySpeller::embedded(SpellerConfig::default())?.into_arc(),
        };

        let rules = match self.rules {
            Some(rules) => rules,
            None => RuleTables::english()?,
        };

        Ok(Corrector {
            speller,
            rules,
            grammar: self.grammar.unwrap_or_else(|| Box::new(IdentityCorrector)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::SpellerCorrector;

    fn corrector() -> Corrector {
        let speller = DictionarySpeller::from_frequencies(
            vec![
                ("i", 5000),
                ("the", 10_000),
                ("a", 9000),
                ("cat", 100),
                ("good", 300),
                ("hello", 200),
                ("world", 150),
                ("very", 400),
                ("cold", 80),
                ("receive", 40),
                ("letter", 60),
            ],
            SpellerConfig::default(),
        )
        .unwrap();

        Corrector::builder()
            .speller(speller.into_arc())
            .build()
            .unwrap()
    }

    fn only(stage: Stage) -> StageSet {
        StageSet::empty().with(stage)
    }

    #[test]
    fn no_stages_is_identity() {
        let corrector = corrector();
        let text = "i  teh good good cat";
        let result = corrector.correct(text, &StageSet::empty(), 0.7);
        assert_eq!(result.text, text);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn spelling_preserves_case_and_punctuation() {
        let corrector = corrector();
        let result = corrector.correct("HELLLO Wrold, I recieve", &only(Stage::Spelling), 0.7);

        assert_eq!(result.text, "HELLO World, I receive");
        let pairs: Vec<(&str, &str)> = result
            .suggestions
            .iter()
            .map(|s| (s.original.as_str(), s.corrected.as_str()))
            .collect();
        assert_eq!(pairs, vec![("HELLLO", "HELLO"), ("Wrold,", "World,"), ("recieve", "receive")]);
        assert!(result
            .suggestions
            .iter()
            .all(|s| s.kind == Stage::Spelling && s.confidence == 0.8));
    }

    #[test]
    fn spelling_is_not_gated_by_threshold() {
        let corrector = corrector();
        let result = corrector.correct("teh cat", &only(Stage::Spelling), 0.99);
        assert_eq!(result.text, "the cat");
        assert_eq!(result.suggestions.len(), 1);
    }

    #[test]
    fn spelling_skips_numbers_and_unfixable_words() {
        let corrector = corrector();
        let result = corrector.correct("cat 1999 zzzzzzzz", &only(Stage::Spelling), 0.7);
        assert_eq!(result.text, "cat 1999 zzzzzzzz");
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn grammar_rules_apply_in_order() {
        let corrector = corrector();
        let result = corrector.correct("Teh the cat and and i", &only(Stage::Grammar), 0.7);

        // `teh` -> `the` runs before `the the` -> `the`.
        assert_eq!(result.text, "The cat and I");
        assert_eq!(result.suggestions.len(), 4);
        assert_eq!(result.suggestions[0].confidence, 0.95);
        assert_eq!(result.suggestions[0].original, "Teh the cat and and i");
        assert_eq!(result.suggestions[0].corrected, "Teh the cat and and I");
        assert!(result.suggestions.iter().all(|s| s.kind == Stage::Grammar));
    }

    #[test]
    fn grammar_is_not_gated_by_threshold() {
        let corrector = corrector();
        let result = corrector.correct("Teh cat is are happy", &only(Stage::Grammar), 0.99);

        assert_eq!(result.text, "The cat are happy");
        let confidences: Vec<f64> = result.suggestions.iter().map(|s| s.confidence).collect();
        assert_eq!(confidences, vec![0.9, 0.8]);
    }

    #[test]
    fn grammar_corrector_runs_before_rules() {
        let speller = DictionarySpeller::from_frequencies(
            vec![("the", 100), ("cat", 10), ("sat", 5)],
            SpellerConfig::default(),
        )
        .unwrap()
        .into_arc();
        let corrector = Corrector::builder()
            .speller(speller.clone())
            .grammar_corrector(Box::new(SpellerCorrector::new(speller)))
            .build()
            .unwrap();

        let result = corrector.correct("the cta sat", &only(Stage::Grammar), 0.7);
        assert_eq!(result.text, "the cat sat");
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].confidence, 0.75);
    }

    #[test]
    fn punctuation_fixes() {
        let corrector = corrector();
        let result = corrector.correct("hello.world  is  big", &only(Stage::Punctuation), 0.7);

        assert_eq!(result.text, "hello. world is big.");
        let confidences: Vec<f64> = result.suggestions.iter().map(|s| s.confidence).collect();
        assert_eq!(confidences, vec![0.9, 0.95, 0.8]);
    }

    #[test]
    fn punctuation_is_idempotent() {
        let corrector = corrector();
        let stages = only(Stage::Punctuation);
        for text in &["a.b  c", "  spaced   out  ", "Done!", "what?no", "x ,y", ""] {
            let once = corrector.correct(text, &stages, 0.7);
            let twice = corrector.correct(&once.text, &stages, 0.7);
            assert_eq!(once.text, twice.text, "input {:?}", text);
            assert!(twice.suggestions.is_empty(), "input {:?}", text);
        }
    }

    #[test]
    fn fluency_reports_only_above_threshold() {
        let corrector = corrector();
        let stages = only(Stage::Fluency);

        let result = corrector.correct("very very good good", &stages, 0.75);
        assert_eq!(result.text, "extremely excellent");
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].confidence, 0.8);

        let result = corrector.correct("very very good good", &stages, 0.7);
        assert_eq!(result.suggestions.len(), 2);

        let result = corrector.correct("Very very cold", &stages, 0.9);
        assert_eq!(result.text, "Extremely cold");
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn blank_input() {
        let corrector = corrector();
        for text in &["", "   ", "\n"] {
            let result = corrector.correct(text, &StageSet::all(), 0.7);
            assert!(result.text.trim().is_empty());
            assert!(result.suggestions.is_empty());
        }
    }

    #[test]
    fn word_queries() {
        let corrector = corrector();
        assert!(corrector.is_word_correct("Hello!"));
        assert!(!corrector.is_word_correct("helo"));
        assert_eq!(corrector.word_suggestions("helo", 5), vec!["hello".to_string()]);
    }
}
