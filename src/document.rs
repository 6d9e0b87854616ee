//! Core data types for parsed documents.
//!
//! A document is an ordered list of paragraphs; a paragraph is an ordered list
//! of sentences, some of which are headings. Headings contribute words to the
//! vocabulary but are never selected into a summary.

use serde::{Deserialize, Serialize};

use crate::nlp::Tokenizer;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Html,
    PlainText,
}

impl ContentFormat {
    /// Human-readable name for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::PlainText => "text",
        }
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sentence and its word tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    text: String,
    words: Vec<String>,
    is_heading: bool,
}

impl Sentence {
    pub fn new(text: impl Into<String>, tokenizer: &Tokenizer) -> Self {
        Self::build(text.into(), tokenizer, false)
    }

    pub fn heading(text: impl Into<String>, tokenizer: &Tokenizer) -> Self {
        Self::build(text.into(), tokenizer, true)
    }

    fn build(text: String, tokenizer: &Tokenizer, is_heading: bool) -> Self {
        let words = tokenizer.to_words(&text);
        Self {
            text,
            words,
            is_heading,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_heading(&self) -> bool {
        self.is_heading
    }
}

impl std::fmt::Display for Sentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// A block of sentences, headings included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    sentences: Vec<Sentence>,
}

impl Paragraph {
    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    /// Non-heading sentences.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter().filter(|s| !s.is_heading())
    }

    pub fn headings(&self) -> impl Iterator<Item = &Sentence> {
        self.sentences.iter().filter(|s| s.is_heading())
    }

    /// Words of every sentence, headings included.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.sentences
            .iter()
            .flat_map(|s| s.words().iter().map(String::as_str))
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Metadata extracted from HTML `<head>` during parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    /// `<link rel="amphtml" href>` target.
    pub amp_url: Option<String>,
}

/// A parsed document, ready for summarization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub metadata: DocumentMetadata,
    paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            metadata: DocumentMetadata::default(),
            paragraphs: paragraphs.into_iter().filter(|p| !p.is_empty()).collect(),
        }
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// Selectable sentences in document order.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.paragraphs.iter().flat_map(Paragraph::sentences)
    }

    pub fn headings(&self) -> impl Iterator<Item = &Sentence> {
        self.paragraphs.iter().flat_map(Paragraph::headings)
    }

    /// Every word in the document, headings included.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.paragraphs.iter().flat_map(Paragraph::words)
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences().count()
    }
}
