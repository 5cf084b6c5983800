//! Pluggable general-purpose grammar correction.
//!
//! The grammar stage first hands the whole text to a [`GrammarCorrector`]
//! and only then applies the fixed grammar rule table. The default
//! corrector changes nothing; a statistical or model-backed corrector can be
//! dropped in behind the same trait.
use std::sync::Arc;

use crate::speller::Speller;
use crate::tokenizer::case_handling::reapply_case;
use crate::tokenizer::{clean_word, has_letters, Tokenize};

/// Best-guess whole-text corrector run at the start of the grammar stage.
pub trait GrammarCorrector: Send + Sync {
    /// Returns the corrected text, or the input unchanged.
    fn suggest(&self, text: &str) -> String;
}

/// Corrector that returns its input unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityCorrector;

impl GrammarCorrector for IdentityCorrector {
    fn suggest(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Corrector that re-spells every word through a [`Speller`].
///
/// Approximates a corpus-backed "correct everything" pass. Unlike the
/// spelling stage it only touches tokens whose letters are all lowercase, so
/// names and acronyms survive.
pub struct SpellerCorrector {
    speller: Arc<dyn Speller>,
}

impl SpellerCorrector {
    /// Corrects through `speller`.
    pub fn new(speller: Arc<dyn Speller>) -> SpellerCorrector {
        SpellerCorrector { speller }
    }
}

impl GrammarCorrector for SpellerCorrector {
    fn suggest(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let mut changed = false;
        let words: Vec<String> = text
            .tokens()
            .map(|token| {
                let lowercase = !token.chars().any(char::is_uppercase);
                if !lowercase || !has_letters(token) {
                    return token.to_string();
                }

                match self.speller.correct(token) {
                    Some(fix) if fix != clean_word(token) => {
                        changed = true;
                        reapply_case(token, &fix)
                    }
                    _ => token.to_string(),
                }
            })
            .collect();

        if changed {
            words.join(" ")
        } else {
            text.to_string()
        }
    }
}
