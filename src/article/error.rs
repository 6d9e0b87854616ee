//! Rich diagnostic error types for article loading.

use miette::Diagnostic;
use thiserror::Error;

use crate::error::SummaryError;

#[derive(Debug, Error, Diagnostic)]
pub enum ArticleError {
    #[error("fetch error for URL \"{url}\": {message}")]
    #[diagnostic(
        code(newsumm::article::fetch),
        help(
            "Failed to download the article. Check that the URL is reachable \
             and the network is available."
        )
    )]
    Fetch { url: String, message: String },

    #[error("\"{url}\" is not an HTML page (content type {content_type})")]
    #[diagnostic(
        code(newsumm::article::not_html),
        help("Only HTML pages can be loaded as articles. Save other documents and use `newsumm summarize`.")
    )]
    NotHtml { url: String, content_type: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Summary(#[from] SummaryError),
}

pub type ArticleResult<T> = std::result::Result<T, ArticleError>;
