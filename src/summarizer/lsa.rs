//! Latent semantic analysis sentence ranking.
//!
//! Builds a stem × sentence frequency matrix, decomposes it with `nalgebra`'s
//! SVD, and rates each sentence by the length of its column in the
//! sigma-weighted topic space: `sqrt(Σ σᵢ² · vᵢⱼ²)`.

use std::collections::HashMap;

use nalgebra::DMatrix;

use crate::document::Document;
use crate::error::{AlgorithmError, SummaryResult};
use crate::nlp::{Stemmer, StopWords, normalize_word};
use crate::summarizer::Summarizer;

/// Topic dimensions always kept, however few singular values there are.
const MIN_DIMENSIONS: usize = 3;
/// Share of singular values kept.
const REDUCTION_RATIO: f64 = 1.0;
/// Floor given to every cell of a non-empty column.
const SMOOTHING: f64 = 0.4;

/// LSA summarizer for one language.
#[derive(Debug)]
pub struct LsaSummarizer {
    stemmer: Stemmer,
    stop_words: StopWords,
}

impl LsaSummarizer {
    pub fn new(stemmer: Stemmer, stop_words: StopWords) -> Self {
        Self {
            stemmer,
            stop_words,
        }
    }

    /// Stem → row index, over every non-stop word of the document.
    fn dictionary(&self, document: &Document) -> HashMap<String, usize> {
        let mut dictionary = HashMap::new();
        for word in document.words() {
            let normalized = normalize_word(word);
            if self.stop_words.contains(&normalized) {
                continue;
            }
            let next = dictionary.len();
            dictionary.entry(self.stemmer.stem(&normalized)).or_insert(next);
        }
        dictionary
    }

    /// Raw stem counts, one column per selectable sentence.
    fn term_matrix(&self, document: &Document, dictionary: &HashMap<String, usize>) -> DMatrix<f64> {
        let sentence_count = document.sentence_count();
        let mut matrix = DMatrix::<f64>::zeros(dictionary.len(), sentence_count);

        for (col, sentence) in document.sentences().enumerate() {
            for word in sentence.words() {
                if let Some(&row) = dictionary.get(&self.stemmer.stem(word)) {
                    matrix[(row, col)] += 1.0;
                }
            }
        }
        matrix
    }
}

/// Scale each column by its maximum, lifted by `SMOOTHING`. All-zero columns stay zero.
fn smooth_term_frequency(matrix: &mut DMatrix<f64>) {
    for mut column in matrix.column_iter_mut() {
        let max = column.max();
        if max != 0.0 {
            column.apply(|cell| *cell = SMOOTHING + (1.0 - SMOOTHING) * *cell / max);
        }
    }
}

/// Sentence ranks from singular values and the rows of Vᵀ.
fn ranks(sigma: &[f64], v_t: &DMatrix<f64>) -> Vec<f64> {
    let dimensions = MIN_DIMENSIONS.max((sigma.len() as f64 * REDUCTION_RATIO) as usize);
    let powered: Vec<f64> = sigma
        .iter()
        .enumerate()
        .map(|(i, s)| if i < dimensions { s * s } else { 0.0 })
        .collect();

    v_t.column_iter()
        .map(|column| {
            powered
                .iter()
                .zip(column.iter())
                .map(|(s, v)| s * v * v)
                .sum::<f64>()
                .sqrt()
        })
        .collect()
}

impl Summarizer for LsaSummarizer {
    fn rate(&self, document: &Document) -> SummaryResult<Vec<f64>> {
        let dictionary = self.dictionary(document);
        let sentence_count = document.sentence_count();
        if dictionary.is_empty() || sentence_count == 0 {
            return Ok(Vec::new());
        }
        if dictionary.len() < sentence_count {
            tracing::warn!(
                words = dictionary.len(),
                sentences = sentence_count,
                "fewer distinct words than sentences; LSA ranking may be unreliable"
            );
        }

        let mut matrix = self.term_matrix(document, &dictionary);
        smooth_term_frequency(&mut matrix);

        let (rows, cols) = matrix.shape();
        let svd = matrix
            .try_svd(false, true, f64::EPSILON, 0)
            .ok_or(AlgorithmError::SvdFailed { rows, cols })?;
        let v_t = svd.v_t.ok_or(AlgorithmError::SvdFailed { rows, cols })?;

        Ok(ranks(svd.singular_values.as_slice(), &v_t))
    }
}
