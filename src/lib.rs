// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # newsumm
//!
//! Extractive summarization of news articles and plain text with latent
//! semantic analysis.
//!
//! ## Architecture
//!
//! - **Parsers** (`parser`): HTML via `scraper`, plain text by line structure
//! - **Tokenizer** (`nlp`): UAX #29 segmentation refined by NLTK punkt tables
//! - **Resources** (`resources`): one-time, atomic install of the punkt bundle
//! - **Summarizer** (`summarizer`): LSA ranking over a `nalgebra` SVD
//! - **Service** (`service`): per-language pipeline cache behind the host API
//! - **Articles** (`article`): fetch a page, follow AMP, detect language
//!
//! ## Library usage
//!
//! ```no_run
//! newsumm::ensure_linguistic_resources().unwrap();
//!
//! let html = "<html><body><p>The cat sat. The dog ran. The sun set.</p></body></html>";
//! let summary = newsumm::summarize_html(html, "english", 2).unwrap();
//! assert!(summary.len() <= 2);
//! ```

pub mod article;
pub mod config;
pub mod document;
pub mod error;
pub mod language;
pub mod nlp;
pub mod parser;
pub mod paths;
pub mod pipeline;
pub mod resources;
pub mod service;
pub mod summarizer;

pub use error::{ErrorKind, SummaryError, SummaryResult};
pub use language::Language;
pub use service::{SummaryService, ensure_linguistic_resources, summarize_html, summarize_text};
pub use summarizer::SentenceCount;
