//! Web article loading: fetch a page, prefer its AMP alternate, detect its
//! language, and summarize it.

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ArticleError, ArticleResult};
pub use loader::{ArticleLoader, HttpPageFetcher, Page, PageFetcher, detect_language};
pub use model::Article;
