//! Stop-word lookup backed by the `stop-words` crate.

use std::collections::HashSet;

use stop_words::get;

use crate::language::Language;

use super::normalize_word;

/// A set of normalized stop words.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The bundled list for `language`.
    pub fn for_language(language: Language) -> Self {
        let words = get(language.stop_words_language())
            .iter()
            .map(|w| normalize_word(w))
            .collect();
        Self { words }
    }

    /// A custom list.
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| normalize_word(w)).collect(),
        }
    }

    /// Extend the set, e.g. with site-specific boilerplate words.
    pub fn extend<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) {
        self.words.extend(words.into_iter().map(normalize_word));
    }

    /// Whether an already-normalized word is a stop word.
    pub fn contains(&self, normalized: &str) -> bool {
        self.words.contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_stop_words() {
        let stop = StopWords::for_language(Language::English);
        assert!(stop.contains("the"));
        assert!(stop.contains("and"));
        assert!(stop.contains("is"));
        assert!(!stop.contains("machine"));
        assert!(!stop.contains("learning"));
    }

    #[test]
    fn german_stop_words() {
        let stop = StopWords::for_language(Language::German);
        assert!(stop.contains("der"));
        assert!(stop.contains("und"));
        assert!(!stop.contains("maschine"));
    }

    #[test]
    fn custom_list_is_normalized() {
        let mut stop = StopWords::from_list(&["Custom", "WORDS"]);
        assert!(stop.contains("custom"));
        assert!(stop.contains("words"));
        assert!(!stop.contains("the"));

        stop.extend(["Extra"]);
        assert!(stop.contains("extra"));
        assert_eq!(stop.len(), 3);
    }

    #[test]
    fn every_language_has_a_list() {
        for lang in Language::ALL {
            assert!(!StopWords::for_language(lang).is_empty(), "{lang} has no stop words");
        }
    }
}
