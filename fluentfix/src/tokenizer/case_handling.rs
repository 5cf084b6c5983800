//! Case detection and re-application for corrected words.
use itertools::Itertools;
use smol_str::SmolStr;

///
#[inline(always)]
pub fn lower_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_lowercase().collect::<String>())
        .collect::<SmolStr>()
}

///
#[inline(always)]
pub fn upper_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_uppercase().collect::<String>())
        .collect::<SmolStr>()
}

/// Uppercases the first character and keeps the rest as is.
#[inline(always)]
pub fn upper_first(s: &str) -> SmolStr {
    let mut c = s.chars();
    match c.next() {
        None => SmolStr::new(""),
        Some(f) => SmolStr::from(f.to_uppercase().collect::<String>() + c.as_str()),
    }
}

fn letters(word: &str) -> impl Iterator<Item = char> + '_ {
    word.chars().filter(|c| c.is_alphabetic())
}

/// Every letter is uppercase and there are at least two of them.
///
/// A lone capital (`"I"`, `"A"`) counts as first-caps, not all-caps.
pub fn is_all_caps(word: &str) -> bool {
    letters(word).nth(1).is_some() && letters(word).all(char::is_uppercase)
}

/// The first letter is uppercase.
pub fn is_first_caps(word: &str) -> bool {
    letters(word).next().map(char::is_uppercase).unwrap_or(false)
}

/// Case shape of a piece of text, applied to a replacement so that
/// `"Teh"` becomes `"The"` and `"VERY VERY"` becomes `"EXTREMELY"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMutation {
    /// first letter uppercase
    FirstCaps,
    /// every letter uppercase, at least two letters
    AllCaps,
    /// anything else; the replacement is used as written
    None,
}

impl CaseMutation {
    /// Case shape of `text`.
    pub fn of(text: &str) -> CaseMutation {
        if is_all_caps(text) {
            CaseMutation::AllCaps
        } else if is_first_caps(text) {
            CaseMutation::FirstCaps
        } else {
            CaseMutation::None
        }
    }

    /// Gives `replacement` this case shape.
    pub fn apply(self, replacement: &str) -> SmolStr {
        match self {
            CaseMutation::AllCaps => upper_case(replacement),
            CaseMutation::FirstCaps => upper_first(&lower_case(replacement)),
            CaseMutation::None => SmolStr::new(replacement),
        }
    }
}

/// Re-applies the case and punctuation of `original` to `correction`.
///
/// Each letter of `original` consumes the next character of the lowercased
/// correction and lends it its case; every other character of `original` is
/// copied through unchanged. Correction characters left over once `original`
/// is exhausted are appended verbatim.
pub fn reapply_case(original: &str, correction: &str) -> String {
    if original.is_empty() || correction.is_empty() {
        return correction.to_string();
    }

    let lower = lower_case(correction);
    let mut source = lower.chars();
    let mut result = String::with_capacity(original.len().max(correction.len()));

    for ch in original.chars() {
        if !ch.is_alphabetic() {
            result.push(ch);
            continue;
        }

        // Letters past the end of the correction are dropped.
        if let Some(next) = source.next() {
            if ch.is_uppercase() {
                result.extend(next.to_uppercase());
            } else {
                result.push(next);
            }
        }
    }

    result.extend(source);
    result
}

/// Lowercase variants of `words` with duplicates removed, first occurrence kept.
pub fn unique_lowercase<'a, I>(words: I) -> Vec<SmolStr>
where
    I: IntoIterator<Item = &'a str>,
{
    words.into_iter().map(lower_case).unique().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_detection() {
        assert_eq!(CaseMutation::of("TEH"), CaseMutation::AllCaps);
        assert_eq!(CaseMutation::of("Teh"), CaseMutation::FirstCaps);
        assert_eq!(CaseMutation::of("teh"), CaseMutation::None);
        assert_eq!(CaseMutation::of("I"), CaseMutation::FirstCaps);
        assert_eq!(CaseMutation::of("Very very"), CaseMutation::FirstCaps);
        assert_eq!(CaseMutation::of("VERY VERY"), CaseMutation::AllCaps);
    }

    #[test]
    fn mutation_apply() {
        assert_eq!(CaseMutation::FirstCaps.apply("the"), "The");
        assert_eq!(CaseMutation::AllCaps.apply("extremely"), "EXTREMELY");
        assert_eq!(CaseMutation::None.apply("many"), "many");
    }

    #[test]
    fn reapply_title_case() {
        assert_eq!(reapply_case("Teh", "the"), "The");
        assert_eq!(reapply_case("Recieve,", "receive"), "Receive,");
    }

    #[test]
    fn reapply_all_caps() {
        assert_eq!(reapply_case("HELLLO", "hello"), "HELLO");
        assert_eq!(reapply_case("WRLD", "world"), "WORLd");
    }

    #[test]
    fn reapply_keeps_punctuation_in_place() {
        assert_eq!(reapply_case("\"helo\"", "hello"), "\"hell\"o");
        assert_eq!(reapply_case("(wrold)", "world"), "(world)");
        assert_eq!(reapply_case("(wrld)", "world"), "(worl)d");
    }

    #[test]
    fn reapply_empty() {
        assert_eq!(reapply_case("", "the"), "the");
        assert_eq!(reapply_case("teh", ""), "");
    }

    #[test]
    fn unique_words() {
        assert_eq!(unique_lowercase("The the CAT cat dog".split(' ')), vec!["the", "cat", "dog"]);
    }
}
