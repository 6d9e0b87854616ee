use serde::{Deserialize, Serialize};

/// A summarized web article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// The URL that was actually summarized (the AMP page, if one was followed).
    pub url: String,
    /// Page `<title>`, empty when the page has none.
    pub title: String,
    /// Language code detected from the page, or `"und"`.
    pub language: String,
    pub sentences: Vec<String>,
}
