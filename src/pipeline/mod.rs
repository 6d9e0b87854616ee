//! Summarization pipeline: parser → tokenizer → LSA, for one language.
//!
//! A `LanguageBundle` is built once per language from the installed
//! resources. A `SummarizationPipeline` owns a bundle and a summarizer and
//! turns raw input into a bounded list of verbatim sentences.

use std::sync::Arc;

use crate::document::{ContentFormat, Document};
use crate::error::{ParseError, ParseResult, SummaryResult};
use crate::language::Language;
use crate::nlp::{Stemmer, StopWords, Tokenizer};
use crate::parser::parser_for;
use crate::resources::ResourceStore;
use crate::summarizer::{LsaSummarizer, SentenceCount, Summarizer};

/// Default upper bound on a single input document.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 16 * 1024 * 1024;

/// Tokenizer rules, stemmer and stop words that all agree on one language.
#[derive(Debug)]
pub struct LanguageBundle {
    language: Language,
    tokenizer: Tokenizer,
    stemmer: Stemmer,
    stop_words: StopWords,
}

impl LanguageBundle {
    /// Build the bundle from the resource store's punkt data.
    ///
    /// Fails with a resource error if the bundle is not installed or has no
    /// data for this language.
    pub fn load(language: Language, store: &ResourceStore) -> SummaryResult<Self> {
        let punkt = store.load_punkt(language)?;
        Ok(Self::from_parts(
            language,
            Tokenizer::new(language, punkt),
            Stemmer::new(language),
            StopWords::for_language(language),
        ))
    }

    pub fn from_parts(
        language: Language,
        tokenizer: Tokenizer,
        stemmer: Stemmer,
        stop_words: StopWords,
    ) -> Self {
        Self {
            language,
            tokenizer,
            stemmer,
            stop_words,
        }
    }

    /// Treat `words` as stop words too, on top of the language's list.
    pub fn with_extra_stop_words<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.stop_words.extend(words);
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// A ready-to-run summarizer for one language.
pub struct SummarizationPipeline {
    language: Language,
    tokenizer: Tokenizer,
    summarizer: Box<dyn Summarizer>,
    max_input_bytes: usize,
}

impl SummarizationPipeline {
    /// LSA pipeline over a language bundle.
    pub fn new(bundle: LanguageBundle) -> Self {
        let LanguageBundle {
            language,
            tokenizer,
            stemmer,
            stop_words,
        } = bundle;
        Self::with_summarizer(
            language,
            tokenizer,
            Box::new(LsaSummarizer::new(stemmer, stop_words)),
        )
    }

    pub fn with_summarizer(language: Language, tokenizer: Tokenizer, summarizer: Box<dyn Summarizer>) -> Self {
        Self {
            language,
            tokenizer,
            summarizer,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    /// Reject inputs longer than `limit` bytes with a parse error.
    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Turn input text into a document without ranking it.
    pub fn parse(&self, format: ContentFormat, input: &str) -> ParseResult<Document> {
        self.check_size(format, input.len())?;
        parser_for(format).parse(input, &self.tokenizer)
    }

    pub fn summarize_html(&self, input: &str, count: SentenceCount) -> SummaryResult<Vec<String>> {
        self.summarize(ContentFormat::Html, input, count)
    }

    pub fn summarize_text(&self, input: &str, count: SentenceCount) -> SummaryResult<Vec<String>> {
        self.summarize(ContentFormat::PlainText, input, count)
    }

    /// Summarize raw bytes, which must be UTF-8.
    pub fn summarize_bytes(
        &self,
        format: ContentFormat,
        data: &[u8],
        count: SentenceCount,
    ) -> SummaryResult<Vec<String>> {
        self.check_size(format, data.len())?;
        let document = parser_for(format).parse_bytes(data, &self.tokenizer)?;
        self.rank(&document, count)
    }

    pub fn summarize(&self, format: ContentFormat, input: &str, count: SentenceCount) -> SummaryResult<Vec<String>> {
        let document = self.parse(format, input)?;
        self.rank(&document, count)
    }

    /// Summarize an already parsed document.
    pub fn summarize_document(&self, document: &Document, count: SentenceCount) -> SummaryResult<Vec<String>> {
        self.rank(document, count)
    }

    fn rank(&self, document: &Document, count: SentenceCount) -> SummaryResult<Vec<String>> {
        let summary = self.summarizer.summarize(document, count)?;
        tracing::debug!(
            language = %self.language,
            sentences = document.sentence_count(),
            selected = summary.len(),
            "summarized document"
        );
        Ok(summary)
    }

    fn check_size(&self, format: ContentFormat, size: usize) -> ParseResult<()> {
        if size > self.max_input_bytes {
            return Err(ParseError::InputTooLarge {
                format: format.to_string(),
                size,
                limit: self.max_input_bytes,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for SummarizationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizationPipeline")
            .field("language", &self.language)
            .field("max_input_bytes", &self.max_input_bytes)
            .finish_non_exhaustive()
    }
}

/// Build a shareable LSA pipeline from the store.
pub fn build_pipeline(
    language: Language,
    store: &ResourceStore,
    max_input_bytes: usize,
    extra_stop_words: &[String],
) -> SummaryResult<Arc<SummarizationPipeline>> {
    let bundle = LanguageBundle::load(language, store)?
        .with_extra_stop_words(extra_stop_words.iter().map(String::as_str));
    tracing::debug!(%language, extra_stop_words = extra_stop_words.len(), "built summarization pipeline");
    Ok(Arc::new(
        SummarizationPipeline::new(bundle).with_max_input_bytes(max_input_bytes),
    ))
}
