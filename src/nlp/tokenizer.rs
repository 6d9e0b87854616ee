//! Sentence and word tokenization.
//!
//! Boundaries come from UAX #29 (`unicode-segmentation`). UAX #29 knows
//! nothing about abbreviations, so sentence segments are re-joined using the
//! language's punkt tables. A segment ending in a known abbreviation or a
//! single-letter initial may continue into the next one; whether it does
//! depends on how the next word is usually capitalized (the orthographic
//! context) and on whether it is a frequent sentence starter.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::language::Language;
use crate::resources::PunktParameters;

/// Letters, optionally joined by apostrophes or hyphens. Drops numbers and punctuation.
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\W\d_](?:[^\W\d_]|['-])*$").expect("static regex must compile"));

const OPENING_PUNCTUATION: &[char] = &['"', '\'', '(', '[', '{', '«', '“', '‘', '„', '¿', '¡'];
const CLOSING_PUNCTUATION: &[char] = &['"', '\'', ')', ']', '}', '»', '”', '’'];

/// Language-aware tokenizer.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    language: Language,
    punkt: Arc<PunktParameters>,
}

impl Tokenizer {
    pub fn new(language: Language, punkt: Arc<PunktParameters>) -> Self {
        Self { language, punkt }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Split text into trimmed sentences.
    pub fn to_sentences(&self, text: &str) -> Vec<String> {
        let mut pieces: Vec<String> = Vec::new();

        for segment in text.split_sentence_bounds() {
            if segment.trim().is_empty() {
                if let Some(last) = pieces.last_mut() {
                    last.push_str(segment);
                }
                continue;
            }
            match pieces.last_mut() {
                Some(last) if self.continues(last.trim(), segment.trim()) => last.push_str(segment),
                _ => pieces.push(segment.to_string()),
            }
        }

        pieces
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Word tokens of a sentence, in order.
    pub fn to_words(&self, sentence: &str) -> Vec<String> {
        sentence
            .unicode_words()
            .filter(|w| WORD_PATTERN.is_match(w))
            .map(str::to_string)
            .collect()
    }

    /// Whether the boundary between `previous` and `next` is a false positive.
    fn continues(&self, previous: &str, next: &str) -> bool {
        let Some(last_token) = previous.split_whitespace().last() else {
            return false;
        };
        let Some(abbreviation) = last_token
            .trim_end_matches(CLOSING_PUNCTUATION)
            .strip_suffix('.')
        else {
            return false;
        };
        let abbreviation = abbreviation.trim_start_matches(OPENING_PUNCTUATION);
        // Ellipses and bare periods end sentences.
        if abbreviation.is_empty() || abbreviation.ends_with('.') {
            return false;
        }
        let abbreviation = abbreviation.to_lowercase();

        let next_token = next
            .split_whitespace()
            .next()
            .map(|w| {
                w.trim_start_matches(OPENING_PUNCTUATION)
                    .trim_end_matches(|c: char| !c.is_alphanumeric())
            })
            .unwrap_or_default();
        let next_word = next_token.to_lowercase();
        let first = next_token.chars().next();
        let first_upper = first.is_some_and(char::is_uppercase);
        let first_lower = first.is_some_and(char::is_lowercase);

        if self.punkt.is_collocation(&abbreviation, &next_word) {
            return true;
        }

        let starts_sentence = self.punkt.ortho_heuristic(&next_word, first_upper, first_lower);
        if is_initial(&abbreviation) {
            match starts_sentence {
                Some(false) => return true,
                // A capitalized word never seen in lower case is likely a name.
                None if first_upper && !self.punkt.seen_lower_case(&next_word) => return true,
                _ => {}
            }
        } else if self.punkt.is_abbreviation(&abbreviation) {
            let starter = first_upper && self.punkt.is_sentence_starter(&next_word);
            return starts_sentence != Some(true) && !starter;
        }
        self.punkt.is_abbreviation(&abbreviation)
    }
}

fn is_initial(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}
