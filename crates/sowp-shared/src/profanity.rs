//! Whole-word profanity masking for chat messages.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

const DEFAULT_WORDS: &[&str] = &[
    "damn", "hell", "shit", "fuck", "bitch", "ass", "bastard", "crap", "piss", "dick", "cock",
    "pussy", "whore", "slut", "dumbass", "jackass", "motherfucker", "asshole", "bullshit", "wtf",
    "fck", "bugger", "prick", "twat", "cunt", "wanker", "bollocks", "tosser", "f*ck", "f**k",
    "sh*t", "b*tch", "a**hole", "d*mn", "fuk", "fuq", "shyt", "btch", "phuck", "phuk", "biatch",
    "f0ck", "sh1t", "b1tch", "a55hole", "d4mn", "fvck", "cvnt", "bsdk", "bhosdike", "madarchod",
    "behenchod", "bhenchod", "chutiya", "gandu", "harami", "haramzada", "kamina", "kutta",
];

lazy_static! {
    static ref DEFAULT_FILTER: ProfanityFilter = ProfanityFilter::with_words(DEFAULT_WORDS);
}

/// Masks listed words with asterisks of the same length.
///
/// Matching is case-insensitive and anchored on word boundaries, so "ass"
/// does not hit "class".
#[derive(Debug, Clone)]
pub struct ProfanityFilter {
    pattern: Option<Regex>,
}

impl ProfanityFilter {
    pub fn with_words<S: AsRef<str>>(words: &[S]) -> Self {
        let alternatives: Vec<String> = words
            .iter()
            .map(|w| w.as_ref().trim())
            .filter(|w| !w.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Self { pattern: None };
        }

        // Longest first so "asshole" wins over "ass".
        let mut alternatives = alternatives;
        alternatives.sort_by(|a, b| b.len().cmp(&a.len()));

        let source = format!(r"\b(?:{})\b", alternatives.join("|"));
        let pattern = match RegexBuilder::new(&source).case_insensitive(true).build() {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(error = %e, "profanity pattern rejected, filter disabled");
                None
            }
        };
        Self { pattern }
    }

    pub fn filter(&self, message: &str) -> String {
        match &self.pattern {
            Some(re) => re
                .replace_all(message, |caps: &regex::Captures<'_>| {
                    "*".repeat(caps[0].chars().count())
                })
                .into_owned(),
            None => message.to_string(),
        }
    }

    pub fn contains_profanity(&self, message: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|re| re.is_match(message))
            .unwrap_or(false)
    }
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        DEFAULT_FILTER.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_whole_words_only() {
        let filter = ProfanityFilter::default();
        assert_eq!(filter.filter("what the hell"), "what the ****");
        assert_eq!(filter.filter("a class of grass"), "a class of grass");
    }

    #[test]
    fn test_case_insensitive() {
        let filter = ProfanityFilter::default();
        assert_eq!(filter.filter("DAMN it"), "**** it");
        assert!(filter.contains_profanity("Damn"));
        assert!(!filter.contains_profanity("hello there"));
    }

    #[test]
    fn test_custom_word_list() {
        let filter = ProfanityFilter::with_words(&["spoiler"]);
        assert_eq!(filter.filter("no spoiler please"), "no ******* please");
    }

    #[test]
    fn test_empty_list_passes_through() {
        let filter = ProfanityFilter::with_words::<&str>(&[]);
        assert_eq!(filter.filter("hell"), "hell");
    }
}
