//! Supported languages and the identifier table that maps host strings onto them.
//!
//! A `Language` picks the tokenizer rules, the stemmer and the stop-word
//! list together, so the three can never disagree. Czech has no Snowball
//! stemmer and is matched on normalized word forms instead.

use std::str::FromStr;

use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};
use stop_words::LANGUAGE;

use crate::error::ConfigError;

/// A language with a stop-word list and punkt tokenizer data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Czech,
    Danish,
    Dutch,
    English,
    Finnish,
    French,
    German,
    Greek,
    Italian,
    Norwegian,
    Portuguese,
    Russian,
    Spanish,
    Swedish,
    Turkish,
}

impl Language {
    pub const ALL: [Language; 15] = [
        Self::Czech,
        Self::Danish,
        Self::Dutch,
        Self::English,
        Self::Finnish,
        Self::French,
        Self::German,
        Self::Greek,
        Self::Italian,
        Self::Norwegian,
        Self::Portuguese,
        Self::Russian,
        Self::Spanish,
        Self::Swedish,
        Self::Turkish,
    ];

    /// Lower-case English name. Also the punkt bundle's directory name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Czech => "czech",
            Self::Danish => "danish",
            Self::Dutch => "dutch",
            Self::English => "english",
            Self::Finnish => "finnish",
            Self::French => "french",
            Self::German => "german",
            Self::Greek => "greek",
            Self::Italian => "italian",
            Self::Norwegian => "norwegian",
            Self::Portuguese => "portuguese",
            Self::Russian => "russian",
            Self::Spanish => "spanish",
            Self::Swedish => "swedish",
            Self::Turkish => "turkish",
        }
    }

    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Czech => "cs",
            Self::Danish => "da",
            Self::Dutch => "nl",
            Self::English => "en",
            Self::Finnish => "fi",
            Self::French => "fr",
            Self::German => "de",
            Self::Greek => "el",
            Self::Italian => "it",
            Self::Norwegian => "no",
            Self::Portuguese => "pt",
            Self::Russian => "ru",
            Self::Spanish => "es",
            Self::Swedish => "sv",
            Self::Turkish => "tr",
        }
    }

    /// Accepted aliases besides `name()` and `code()`: ISO 639-2/B, 639-2/T
    /// and 639-3 codes.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Czech => &["ces", "cze"],
            Self::Danish => &["dan"],
            Self::Dutch => &["nld", "dut", "flemish"],
            Self::English => &["eng"],
            Self::Finnish => &["fin"],
            Self::French => &["fra", "fre"],
            Self::German => &["deu", "ger"],
            Self::Greek => &["ell", "gre"],
            Self::Italian => &["ita"],
            Self::Norwegian => &["nor", "nb", "nob", "bokmal"],
            Self::Portuguese => &["por"],
            Self::Russian => &["rus"],
            Self::Spanish => &["spa", "castilian"],
            Self::Swedish => &["swe"],
            Self::Turkish => &["tur"],
        }
    }

    /// Snowball algorithm, if there is one for this language.
    pub(crate) fn stemmer_algorithm(&self) -> Option<Algorithm> {
        let algorithm = match self {
            Self::Czech => return None,
            Self::Danish => Algorithm::Danish,
            Self::Dutch => Algorithm::Dutch,
            Self::English => Algorithm::English,
            Self::Finnish => Algorithm::Finnish,
            Self::French => Algorithm::French,
            Self::German => Algorithm::German,
            Self::Greek => Algorithm::Greek,
            Self::Italian => Algorithm::Italian,
            Self::Norwegian => Algorithm::Norwegian,
            Self::Portuguese => Algorithm::Portuguese,
            Self::Russian => Algorithm::Russian,
            Self::Spanish => Algorithm::Spanish,
            Self::Swedish => Algorithm::Swedish,
            Self::Turkish => Algorithm::Turkish,
        };
        Some(algorithm)
    }

    pub(crate) fn stop_words_language(&self) -> LANGUAGE {
        match self {
            Self::Czech => LANGUAGE::Czech,
            Self::Danish => LANGUAGE::Danish,
            Self::Dutch => LANGUAGE::Dutch,
            Self::English => LANGUAGE::English,
            Self::Finnish => LANGUAGE::Finnish,
            Self::French => LANGUAGE::French,
            Self::German => LANGUAGE::German,
            Self::Greek => LANGUAGE::Greek,
            Self::Italian => LANGUAGE::Italian,
            Self::Norwegian => LANGUAGE::Norwegian,
            Self::Portuguese => LANGUAGE::Portuguese,
            Self::Russian => LANGUAGE::Russian,
            Self::Spanish => LANGUAGE::Spanish,
            Self::Swedish => LANGUAGE::Swedish,
            Self::Turkish => LANGUAGE::Turkish,
        }
    }

    /// Look up a language from a host identifier, case-insensitively.
    pub fn parse(identifier: &str) -> Result<Self, ConfigError> {
        let key = identifier.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.name() == key || lang.code() == key || lang.aliases().contains(&key.as_str()))
            .ok_or_else(|| ConfigError::UnsupportedLanguage {
                language: identifier.to_string(),
            })
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
