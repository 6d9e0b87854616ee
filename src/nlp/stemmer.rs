//! Snowball stemming via `rust-stemmers`.
//!
//! Languages without a Snowball algorithm (Czech) keep the normalized
//! word as its own stem.

use crate::language::Language;

use super::normalize_word;

/// A stemmer bound to one language.
pub struct Stemmer {
    language: Language,
    inner: Option<rust_stemmers::Stemmer>,
}

impl Stemmer {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            inner: language.stemmer_algorithm().map(rust_stemmers::Stemmer::create),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Stem a word after normalizing it.
    pub fn stem(&self, word: &str) -> String {
        let normalized = normalize_word(word);
        match &self.inner {
            Some(inner) => inner.stem(&normalized).into_owned(),
            None => normalized,
        }
    }
}

impl std::fmt::Debug for Stemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stemmer")
            .field("language", &self.language)
            .field("snowball", &self.inner.is_some())
            .finish()
    }
}
