//! Document parser trait and format detection.
//!
//! Each supported format (HTML, plain text) implements `DocumentParser`.
//! The `parser_for()` factory returns the correct parser for a given format.

pub mod html;

use crate::document::{ContentFormat, Document, Paragraph, Sentence};
use crate::error::{ParseError, ParseResult};
use crate::nlp::Tokenizer;

pub use html::HtmlParser;

/// Trait for format-specific document parsers.
pub trait DocumentParser: Send + Sync {
    /// Parse text into a structured document.
    fn parse(&self, input: &str, tokenizer: &Tokenizer) -> ParseResult<Document>;

    /// The format this parser handles.
    fn format(&self) -> ContentFormat;

    /// Parse raw bytes, which must be UTF-8.
    fn parse_bytes(&self, data: &[u8], tokenizer: &Tokenizer) -> ParseResult<Document> {
        let input = std::str::from_utf8(data).map_err(|e| ParseError::InvalidEncoding {
            format: self.format().to_string(),
            offset: e.valid_up_to(),
        })?;
        self.parse(input, tokenizer)
    }
}

/// Get the appropriate parser for a content format.
pub fn parser_for(format: ContentFormat) -> Box<dyn DocumentParser> {
    match format {
        ContentFormat::Html => Box::new(HtmlParser::default()),
        ContentFormat::PlainText => Box::new(PlainTextParser),
    }
}

/// Detect the content format from a file extension.
pub fn detect_format(path: &str) -> Option<ContentFormat> {
    let lower = path.to_lowercase();
    if lower.ends_with(".html") || lower.ends_with(".htm") || lower.ends_with(".xhtml") {
        Some(ContentFormat::Html)
    } else if lower.ends_with(".txt") || lower.ends_with(".md") || lower.ends_with(".text") {
        Some(ContentFormat::PlainText)
    } else {
        None
    }
}

/// Detect format from an HTTP Content-Type header value.
pub fn detect_format_from_content_type(content_type: &str) -> Option<ContentFormat> {
    let ct = content_type.to_lowercase();
    if ct.contains("text/html") || ct.contains("application/xhtml") {
        Some(ContentFormat::Html)
    } else if ct.contains("text/plain") {
        Some(ContentFormat::PlainText)
    } else {
        None
    }
}

/// Plain-text parser.
///
/// Lines are trimmed. A line whose cased characters are all upper case is a
/// heading; a blank line closes the current paragraph. Consecutive ordinary
/// lines are joined with a space before sentence splitting, so sentences may
/// span line breaks.
pub struct PlainTextParser;

impl DocumentParser for PlainTextParser {
    fn format(&self) -> ContentFormat {
        ContentFormat::PlainText
    }

    fn parse(&self, input: &str, tokenizer: &Tokenizer) -> ParseResult<Document> {
        let mut paragraphs = Vec::new();
        let mut current: Vec<Line<'_>> = Vec::new();

        for line in input.lines() {
            let line = line.trim();
            if is_upper(line) {
                current.push(Line::Heading(line));
            } else if line.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(to_paragraph(&current, tokenizer));
                    current.clear();
                }
            } else {
                current.push(Line::Text(line));
            }
        }
        paragraphs.push(to_paragraph(&current, tokenizer));

        Ok(Document::new(paragraphs))
    }
}

enum Line<'a> {
    Heading(&'a str),
    Text(&'a str),
}

fn to_paragraph(lines: &[Line<'_>], tokenizer: &Tokenizer) -> Paragraph {
    let mut sentences = Vec::new();
    let mut text = String::new();

    for line in lines {
        match line {
            Line::Heading(heading) => {
                flush_text(&mut text, &mut sentences, tokenizer);
                sentences.push(Sentence::heading(*heading, tokenizer));
            }
            Line::Text(line) => {
                text.push(' ');
                text.push_str(line);
            }
        }
    }
    flush_text(&mut text, &mut sentences, tokenizer);

    Paragraph::new(sentences)
}

fn flush_text(text: &mut String, sentences: &mut Vec<Sentence>, tokenizer: &Tokenizer) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        sentences.extend(
            tokenizer
                .to_sentences(trimmed)
                .into_iter()
                .map(|s| Sentence::new(s, tokenizer)),
        );
    }
    text.clear();
}

/// At least one cased character, and none of them lower case.
fn is_upper(line: &str) -> bool {
    let mut cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}
