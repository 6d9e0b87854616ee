//! Natural language processing components.
//!
//! Tokenization, stemming and stop-word filtering, each configured for a single
//! [`Language`](crate::language::Language).

pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use stemmer::Stemmer;
pub use stopwords::StopWords;
pub use tokenizer::Tokenizer;

use unicode_normalization::UnicodeNormalization;

/// Canonical form of a word before stop-word lookup and stemming: NFC, lower case.
pub fn normalize_word(word: &str) -> String {
    word.nfc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_composes_and_lowercases() {
        // "Cafe" + combining acute accent.
        assert_eq!(normalize_word("Cafe\u{301}"), "café");
        assert_eq!(normalize_word("ÜBER"), "über");
    }
}
