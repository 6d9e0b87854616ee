//! HTML parser using the `scraper` crate.
//!
//! Extracts `<title>`, language and AMP metadata from the head, and turns
//! headings (`<h1>`–`<h6>`) and text blocks (`<p>`, `<li>`, ...) into a
//! `Document`.

use scraper::{ElementRef, Html, Selector};

use crate::document::{ContentFormat, Document, DocumentMetadata, Paragraph, Sentence};
use crate::error::{ParseError, ParseResult};
use crate::nlp::Tokenizer;
use crate::parser::DocumentParser;

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const BLOCK_TAGS: &[&str] = &["p", "li", "blockquote", "pre", "dd", "figcaption"];
const CONTENT_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, li, blockquote, pre, dd, figcaption";

/// Elements whose text never reaches the summarizer.
pub const IGNORED_TAGS: &[&str] = &[
    "script", "style", "noscript", "img", "picture", "figure", "svg", "template",
];

/// HTML document parser backed by `scraper` (servo's html5ever).
#[derive(Debug, Clone)]
pub struct HtmlParser {
    ignored_tags: Vec<String>,
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self {
            ignored_tags: IGNORED_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl HtmlParser {
    /// Also skip the text of these elements (e.g. `"aside"`, `"nav"`).
    pub fn with_ignored_tags<'a>(mut self, tags: impl IntoIterator<Item = &'a str>) -> Self {
        self.ignored_tags
            .extend(tags.into_iter().map(|t| t.to_ascii_lowercase()));
        self
    }

    /// Read only the `<head>` metadata of a page.
    pub fn metadata(input: &str) -> ParseResult<DocumentMetadata> {
        extract_metadata(&Html::parse_document(input))
    }

    fn is_ignored(&self, tag: &str) -> bool {
        self.ignored_tags.iter().any(|t| t == tag)
    }

    /// Text of an element, minus ignored descendants, whitespace collapsed.
    fn element_text(&self, element: ElementRef<'_>) -> String {
        let mut raw = String::new();
        self.collect_text(element, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                out.push_str(text);
            } else if let Some(child_el) = ElementRef::wrap(child) {
                let name = child_el.value().name();
                if name == "br" {
                    out.push(' ');
                } else if !self.is_ignored(name) {
                    self.collect_text(child_el, out);
                }
            }
        }
    }

    /// Content elements nested in another content element, or inside an
    /// ignored element, are covered elsewhere (or not at all).
    fn is_shadowed(&self, element: ElementRef<'_>) -> bool {
        element.ancestors().filter_map(ElementRef::wrap).any(|ancestor| {
            let name = ancestor.value().name();
            self.is_ignored(name) || HEADING_TAGS.contains(&name) || BLOCK_TAGS.contains(&name)
        })
    }

    /// Walk the DOM in document order and build paragraphs.
    ///
    /// - Each heading becomes a paragraph holding one heading sentence.
    /// - Each text block becomes a paragraph of tokenized sentences.
    /// - If the page has no content elements at all, the `<body>` text is
    ///   used as a single paragraph.
    fn extract_paragraphs(&self, document: &Html, tokenizer: &Tokenizer) -> ParseResult<Vec<Paragraph>> {
        let content = selector(CONTENT_SELECTOR)?;
        let mut paragraphs = Vec::new();
        let mut saw_content_element = false;

        for el in document.select(&content) {
            if self.is_shadowed(el) {
                continue;
            }
            saw_content_element = true;

            let text = self.element_text(el);
            if text.is_empty() {
                continue;
            }

            if HEADING_TAGS.contains(&el.value().name()) {
                paragraphs.push(Paragraph::new(vec![Sentence::heading(text, tokenizer)]));
            } else {
                paragraphs.push(text_paragraph(&text, tokenizer));
            }
        }

        if !saw_content_element {
            let body = selector("body")?;
            if let Some(el) = document.select(&body).next() {
                let text = self.element_text(el);
                if !text.is_empty() {
                    paragraphs.push(text_paragraph(&text, tokenizer));
                }
            }
        }

        Ok(paragraphs)
    }
}

impl DocumentParser for HtmlParser {
    fn format(&self) -> ContentFormat {
        ContentFormat::Html
    }

    fn parse(&self, input: &str, tokenizer: &Tokenizer) -> ParseResult<Document> {
        let document = Html::parse_document(input);

        let metadata = extract_metadata(&document)?;
        let paragraphs = self.extract_paragraphs(&document, tokenizer)?;

        Ok(Document::new(paragraphs).with_metadata(metadata))
    }
}

fn text_paragraph(text: &str, tokenizer: &Tokenizer) -> Paragraph {
    Paragraph::new(
        tokenizer
            .to_sentences(text)
            .into_iter()
            .map(|s| Sentence::new(s, tokenizer))
            .collect(),
    )
}

fn selector(css: &str) -> ParseResult<Selector> {
    Selector::parse(css).map_err(|e| ParseError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

fn first_attr(document: &Html, css: &str, attr: &str) -> ParseResult<Option<String>> {
    let sel = selector(css)?;
    Ok(document
        .select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string))
}

/// Extract metadata from `<title>`, `<meta>`, `<link>` and `<html lang>`.
fn extract_metadata(document: &Html) -> ParseResult<DocumentMetadata> {
    let mut meta = DocumentMetadata::default();

    let title_sel = selector("title")?;
    if let Some(el) = document.select(&title_sel).next() {
        let title = el.text().collect::<String>().trim().to_string();
        if !title.is_empty() {
            meta.title = Some(title);
        }
    }

    meta.language = first_attr(document, "html[lang]", "lang")?;
    if meta.language.is_none() {
        meta.language = first_attr(document, "meta[http-equiv=content-language]", "content")?;
    }
    meta.description = first_attr(document, "meta[name=description]", "content")?;
    meta.amp_url = first_attr(document, "link[rel=amphtml][href]", "href")?;

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::language::Language;
    use crate::resources::PunktParameters;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(
            Language::English,
            Arc::new(PunktParameters::from_parts(["dr"], [], [])),
        )
    }

    fn parse(html: &str) -> Document {
        HtmlParser::default().parse(html, &tokenizer()).unwrap()
    }

    #[test]
    fn parse_simple_html() {
        let doc = parse(
            r#"
        <html>
        <head><title>Test Page</title></head>
        <body>
            <h1>Chapter One</h1>
            <p>First paragraph of chapter one. It has two sentences.</p>
            <p>Second paragraph, written by Dr. Jones.</p>
        </body>
        </html>"#,
        );

        assert_eq!(doc.metadata.title.as_deref(), Some("Test Page"));
        let headings: Vec<_> = doc.headings().map(Sentence::text).collect();
        assert_eq!(headings, vec!["Chapter One"]);
        let sentences: Vec<_> = doc.sentences().map(Sentence::text).collect();
        assert_eq!(
            sentences,
            vec![
                "First paragraph of chapter one.",
                "It has two sentences.",
                "Second paragraph, written by Dr. Jones."
            ]
        );
    }

    #[test]
    fn parse_metadata() {
        let meta = HtmlParser::metadata(
            r#"
        <html lang="pt-BR">
        <head>
            <title>Meta Test</title>
            <meta name="description" content="A test document">
            <link rel="amphtml" href="https://example.com/amp/story">
        </head>
        <body><p>Content.</p></body>
        </html>"#,
        )
        .unwrap();

        assert_eq!(meta.title.as_deref(), Some("Meta Test"));
        assert_eq!(meta.language.as_deref(), Some("pt-BR"));
        assert_eq!(meta.description.as_deref(), Some("A test document"));
        assert_eq!(meta.amp_url.as_deref(), Some("https://example.com/amp/story"));
    }

    #[test]
    fn ignored_elements_contribute_nothing() {
        let doc = parse(
            r#"<html><body>
            <script>var notASentence = "Hello there.";</script>
            <figure><p>Caption text inside a figure.</p></figure>
            <p>Visible text.<noscript>Enable JavaScript.</noscript></p>
            </body></html>"#,
        );
        let sentences: Vec<_> = doc.sentences().map(Sentence::text).collect();
        assert_eq!(sentences, vec!["Visible text."]);
    }

    #[test]
    fn nested_blocks_are_not_counted_twice() {
        let doc = parse("<ul><li><p>Only once.</p></li></ul>");
        assert_eq!(doc.sentence_count(), 1);
    }

    #[test]
    fn inline_markup_does_not_split_words() {
        let doc = parse("<p>Sum<b>mar</b>ization   is\n <i>fun</i>.<br>Really fun.</p>");
        let sentences: Vec<_> = doc.sentences().map(Sentence::text).collect();
        assert_eq!(sentences, vec!["Summarization is fun.", "Really fun."]);
    }

    #[test]
    fn markup_only_is_empty() {
        let doc = parse("<html><head><style>p { color: red }</style></head><body><div><img src='x.png'></div></body></html>");
        assert_eq!(doc.sentence_count(), 0);
        assert_eq!(doc.words().count(), 0);
    }

    #[test]
    fn body_text_without_blocks() {
        let doc = parse("<html><body><div>Loose text here. More loose text.</div></body></html>");
        assert_eq!(doc.sentence_count(), 2);
    }

    #[test]
    fn extra_ignored_tags() {
        let parser = HtmlParser::default().with_ignored_tags(["NAV"]);
        let doc = parser
            .parse("<nav><p>Home. About.</p></nav><p>Story.</p>", &tokenizer())
            .unwrap();
        assert_eq!(doc.sentence_count(), 1);
    }
}
