//! The three fixed punctuation sub-rules, applied in declaration order.
use once_cell::sync::Lazy;
use regex::Regex;

static MISSING_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?,:;])([A-Za-z])").unwrap());
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// One punctuation sub-rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunctuationFix {
    /// `"end.Next"` becomes `"end. Next"`
    SpaceAfterPunctuation,
    /// runs of two or more whitespace characters become one space
    CollapseWhitespace,
    /// text not ending in `.`, `!` or `?` is trimmed and gets a period
    TerminalPeriod,
}

impl PunctuationFix {
    /// Every sub-rule in application order.
    pub const ALL: [PunctuationFix; 3] = [
        PunctuationFix::SpaceAfterPunctuation,
        PunctuationFix::CollapseWhitespace,
        PunctuationFix::TerminalPeriod,
    ];

    /// Confidence reported when this fix changes the text.
    pub fn confidence(self) -> f64 {
        match self {
            PunctuationFix::SpaceAfterPunctuation => 0.9,
            PunctuationFix::CollapseWhitespace => 0.95,
            PunctuationFix::TerminalPeriod => 0.8,
        }
    }

    /// The rewritten text, or `None` when the rule does not change `text`.
    pub fn apply(self, text: &str) -> Option<String> {
        let fixed = match self {
            PunctuationFix::SpaceAfterPunctuation => {
                MISSING_SPACE.replace_all(text, "${1} ${2}").into_owned()
            }
            PunctuationFix::CollapseWhitespace => MULTI_SPACE.replace_all(text, " ").into_owned(),
            PunctuationFix::TerminalPeriod => {
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed.ends_with(&TERMINATORS[..]) {
                    return None;
                }
                format!("{}.", trimmed)
            }
        };

        if fixed == text {
            None
        } else {
            Some(fixed)
        }
    }
}
