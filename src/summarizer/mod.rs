//! Extractive summarization.
//!
//! A summarizer rates every selectable sentence of a document; the best
//! `SentenceCount` sentences are kept and returned in document order.

pub mod lsa;

use std::str::FromStr;

use crate::document::{Document, Sentence};
use crate::error::{ConfigError, SummaryResult};

pub use lsa::LsaSummarizer;

/// How many sentences a summary may hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SentenceCount {
    /// At most this many sentences. Never zero.
    Absolute(usize),
    /// This share of the document's sentences, rounded down but at least one.
    /// In `(0, 100]`.
    Percent(f64),
}

impl SentenceCount {
    /// Validate a host-supplied count. Zero and negative counts are rejected.
    pub fn from_host(count: i64) -> Result<Self, ConfigError> {
        match usize::try_from(count) {
            Ok(n) if n > 0 => Ok(Self::Absolute(n)),
            _ => Err(ConfigError::InvalidSentenceCount {
                value: count.to_string(),
            }),
        }
    }

    pub fn percent(share: f64) -> Result<Self, ConfigError> {
        if share > 0.0 && share <= 100.0 {
            Ok(Self::Percent(share))
        } else {
            Err(ConfigError::InvalidSentenceCount {
                value: format!("{share}%"),
            })
        }
    }

    /// Number of sentences to keep out of `available`.
    pub fn resolve(&self, available: usize) -> usize {
        match *self {
            Self::Absolute(n) => n.min(available),
            Self::Percent(_) if available == 0 => 0,
            Self::Percent(share) => (((available as f64) * share / 100.0).floor() as usize).max(1),
        }
    }
}

impl FromStr for SentenceCount {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ConfigError::InvalidSentenceCount { value: s.to_string() };

        if let Some(share) = trimmed.strip_suffix('%') {
            let share: f64 = share.trim().parse().map_err(|_| invalid())?;
            return Self::percent(share).map_err(|_| invalid());
        }
        let count: i64 = trimmed.parse().map_err(|_| invalid())?;
        Self::from_host(count)
    }
}

impl std::fmt::Display for SentenceCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute(n) => write!(f, "{n}"),
            Self::Percent(share) => write!(f, "{share}%"),
        }
    }
}

/// A sentence-ranking algorithm.
pub trait Summarizer: Send + Sync {
    /// One rating per `document.sentences()` entry, higher is better.
    ///
    /// An empty vector means the document has nothing to rank.
    fn rate(&self, document: &Document) -> SummaryResult<Vec<f64>>;

    /// The best-rated sentences, in document order.
    fn summarize(&self, document: &Document, count: SentenceCount) -> SummaryResult<Vec<String>> {
        let ratings = self.rate(document)?;
        if ratings.is_empty() {
            return Ok(Vec::new());
        }
        let sentences: Vec<&Sentence> = document.sentences().collect();
        Ok(best_sentences(&sentences, &ratings, count)
            .into_iter()
            .map(|s| s.text().to_string())
            .collect())
    }
}

/// Keep the `count` best-rated sentences and restore document order.
///
/// Ties keep the earlier sentence.
pub fn best_sentences<'a>(
    sentences: &[&'a Sentence],
    ratings: &[f64],
    count: SentenceCount,
) -> Vec<&'a Sentence> {
    let mut order: Vec<usize> = (0..sentences.len().min(ratings.len())).collect();
    order.sort_by(|&a, &b| ratings[b].total_cmp(&ratings[a]));
    order.truncate(count.resolve(order.len()));
    order.sort_unstable();
    order.into_iter().map(|i| sentences[i]).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::language::Language;
    use crate::nlp::Tokenizer;
    use crate::resources::PunktParameters;

    fn sentences(texts: &[&str]) -> Vec<Sentence> {
        let tokenizer = Tokenizer::new(Language::English, Arc::new(PunktParameters::default()));
        texts.iter().map(|t| Sentence::new(*t, &tokenizer)).collect()
    }

    #[test]
    fn host_counts_must_be_positive() {
        assert_eq!(SentenceCount::from_host(3).unwrap(), SentenceCount::Absolute(3));
        assert!(SentenceCount::from_host(0).is_err());
        assert!(SentenceCount::from_host(-2).is_err());
    }

    #[test]
    fn parse_absolute_and_percent() {
        assert_eq!("7".parse::<SentenceCount>().unwrap(), SentenceCount::Absolute(7));
        assert_eq!("25%".parse::<SentenceCount>().unwrap(), SentenceCount::Percent(25.0));
        assert_eq!(" 50 % ".parse::<SentenceCount>().unwrap(), SentenceCount::Percent(50.0));
        assert!("0%".parse::<SentenceCount>().is_err());
        assert!("150%".parse::<SentenceCount>().is_err());
        assert!("seven".parse::<SentenceCount>().is_err());
        assert!("-1".parse::<SentenceCount>().is_err());
    }

    #[test]
    fn counts_saturate() {
        assert_eq!(SentenceCount::Absolute(10).resolve(4), 4);
        assert_eq!(SentenceCount::Absolute(2).resolve(4), 2);
        assert_eq!(SentenceCount::Percent(50.0).resolve(5), 2);
        assert_eq!(SentenceCount::Percent(100.0).resolve(5), 5);
    }

    #[test]
    fn small_shares_keep_one_sentence() {
        assert_eq!(SentenceCount::Percent(10.0).resolve(5), 1);
        assert_eq!(SentenceCount::Percent(0.5).resolve(3), 1);
        assert_eq!(SentenceCount::Percent(10.0).resolve(0), 0);
    }

    #[test]
    fn best_sentences_restore_document_order() {
        let owned = sentences(&["First.", "Second.", "Third.", "Fourth."]);
        let refs: Vec<&Sentence> = owned.iter().collect();
        let picked = best_sentences(&refs, &[0.1, 0.9, 0.2, 0.8], SentenceCount::Absolute(2));
        let texts: Vec<_> = picked.iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["Second.", "Fourth."]);
    }

    #[test]
    fn ties_prefer_earlier_sentences() {
        let owned = sentences(&["A one.", "B two.", "C three."]);
        let refs: Vec<&Sentence> = owned.iter().collect();
        let picked = best_sentences(&refs, &[0.5, 0.5, 0.5], SentenceCount::Absolute(2));
        let texts: Vec<_> = picked.iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["A one.", "B two."]);
    }
}
