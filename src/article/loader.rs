//! Article loader.
//!
//! Fetches a page, optionally hops once to its AMP alternate, detects the
//! page language from `<html lang>`, and summarizes the page with the
//! matching pipeline (or the fallback language's).

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::article::error::{ArticleError, ArticleResult};
use crate::article::model::Article;
use crate::config::ArticleConfig;
use crate::document::ContentFormat;
use crate::error::{SummaryError, SummaryResult};
use crate::language::Language;
use crate::parser::{HtmlParser, detect_format_from_content_type};
use crate::service::SummaryService;
use crate::summarizer::SentenceCount;

/// Language tag for pages that do not declare one.
pub const UNDETERMINED_LANGUAGE: &str = "und";

/// A downloaded page.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Something that can download a web page.
pub trait PageFetcher: Send + Sync {
    fn get(&self, url: &str) -> ArticleResult<Page>;
}

/// `ureq`-backed page fetcher with a fixed user agent.
pub struct HttpPageFetcher {
    agent: ureq::Agent,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();
        Self { agent }
    }
}

impl PageFetcher for HttpPageFetcher {
    fn get(&self, url: &str) -> ArticleResult<Page> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(ArticleError::Fetch {
                    url: url.into(),
                    message: format!("HTTP status {code}"),
                });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(ArticleError::Fetch {
                    url: url.into(),
                    message: transport.to_string(),
                });
            }
        };

        let final_url = response.get_url().to_string();
        let content_type = response.header("content-type").map(str::to_string);
        let body = response.into_string().map_err(|e| ArticleError::Fetch {
            url: url.into(),
            message: format!("read body: {e}"),
        })?;

        Ok(Page {
            url: final_url,
            content_type,
            body,
        })
    }
}

/// Loads and summarizes web articles.
pub struct ArticleLoader {
    service: Arc<SummaryService>,
    fetcher: Box<dyn PageFetcher>,
    follow_amp: bool,
    valid_languages: HashSet<Language>,
    fallback: Language,
    sentences: SentenceCount,
}

impl ArticleLoader {
    /// A loader over `service`, configured from `[article]`.
    pub fn new(service: Arc<SummaryService>, config: &ArticleConfig) -> SummaryResult<Self> {
        let fetcher = HttpPageFetcher::new(&config.user_agent, Duration::from_secs(config.timeout_secs));
        Self::with_fetcher(service, Box::new(fetcher), config)
    }

    pub fn with_fetcher(
        service: Arc<SummaryService>,
        fetcher: Box<dyn PageFetcher>,
        config: &ArticleConfig,
    ) -> SummaryResult<Self> {
        let fallback = Language::parse(&config.fallback_language)?;
        let sentences = SentenceCount::from_host(i64::try_from(config.sentences).unwrap_or(i64::MAX))?;

        // Entries we cannot summarize are dropped; they fall back like any other language.
        let valid_languages = config
            .valid_languages
            .iter()
            .filter_map(|code| match Language::parse(code) {
                Ok(language) => Some(language),
                Err(_) => {
                    tracing::warn!(%code, "ignoring unsupported entry in article.valid_languages");
                    None
                }
            })
            .collect();

        Ok(Self {
            service,
            fetcher,
            follow_amp: config.follow_amp,
            valid_languages,
            fallback,
            sentences,
        })
    }

    /// Summarize into this many sentences instead of the configured count.
    pub fn with_sentences(mut self, sentences: SentenceCount) -> Self {
        self.sentences = sentences;
        self
    }

    /// Do not follow `<link rel="amphtml">` alternates.
    pub fn without_amp(mut self) -> Self {
        self.follow_amp = false;
        self
    }

    /// Fetch `url` and summarize it.
    pub fn load(&self, url: &str) -> ArticleResult<Article> {
        let mut page = self.fetch_html(url)?;
        let mut metadata = HtmlParser::metadata(&page.body).map_err(SummaryError::from)?;

        let amp = match metadata.amp_url.as_deref() {
            Some(href) if self.follow_amp => Some(resolve_href(&page.url, href)),
            _ => None,
        };
        if let Some(amp) = amp.filter(|amp| *amp != page.url) {
            tracing::debug!(from = %page.url, to = %amp, "following AMP alternate");
            page = self.fetch_html(&amp)?;
            metadata = HtmlParser::metadata(&page.body).map_err(SummaryError::from)?;
        }

        let language = detect_language(metadata.language.as_deref());
        let summary_language = self.summary_language(&language);
        tracing::info!(url = %page.url, %language, using = %summary_language, "summarizing article");

        let sentences = self.service.summarize_with(
            ContentFormat::Html,
            &page.body,
            summary_language,
            self.sentences,
        )?;

        Ok(Article {
            url: page.url,
            title: metadata.title.unwrap_or_default(),
            language,
            sentences,
        })
    }

    /// The language a page tagged `detected` is summarized in.
    pub fn summary_language(&self, detected: &str) -> Language {
        Language::parse(detected)
            .ok()
            .filter(|language| self.valid_languages.contains(language))
            .unwrap_or(self.fallback)
    }

    fn fetch_html(&self, url: &str) -> ArticleResult<Page> {
        let page = self.fetcher.get(url)?;
        if let Some(content_type) = page.content_type.as_deref() {
            if detect_format_from_content_type(content_type) != Some(ContentFormat::Html) {
                return Err(ArticleError::NotHtml {
                    url: page.url,
                    content_type: content_type.to_string(),
                });
            }
        }
        Ok(page)
    }
}

/// Primary subtag of an `<html lang>` value, lower-cased; `"und"` when absent.
pub fn detect_language(lang_attr: Option<&str>) -> String {
    lang_attr
        .and_then(|tag| tag.split(['-', '_']).next())
        .map(str::trim)
        .filter(|primary| !primary.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| UNDETERMINED_LANGUAGE.to_string())
}

/// Resolve an `href` against the page it appeared on.
fn resolve_href(base: &str, href: &str) -> String {
    let href = href.trim();
    if href.contains("://") {
        return href.to_string();
    }
    let (scheme, rest) = base.split_once("://").unwrap_or(("https", base));
    if let Some(no_scheme) = href.strip_prefix("//") {
        return format!("{scheme}://{no_scheme}");
    }
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    if href.starts_with('/') {
        return format!("{scheme}://{authority}{href}");
    }
    let path = &rest[authority.len()..];
    let path = path.split(['?', '#']).next().unwrap_or("");
    let dir = path.rfind('/').map_or("/", |i| &path[..=i]);
    format!("{scheme}://{authority}{dir}{href}")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::resources::testing::installed_store;

    /// Serves canned pages and records requested URLs.
    struct StaticPages {
        pages: HashMap<String, Page>,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl PageFetcher for StaticPages {
        fn get(&self, url: &str) -> ArticleResult<Page> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| ArticleError::Fetch {
                url: url.into(),
                message: "HTTP status 404".into(),
            })
        }
    }

    fn page(url: &str, body: &str) -> (String, Page) {
        (
            url.to_string(),
            Page {
                url: url.to_string(),
                content_type: Some("text/html; charset=utf-8".into()),
                body: body.to_string(),
            },
        )
    }

    fn loader(pages: Vec<(String, Page)>) -> (tempfile::TempDir, ArticleLoader, Arc<Mutex<Vec<String>>>) {
        let (dir, store) = installed_store();
        let requested = Arc::new(Mutex::new(Vec::new()));
        let fetcher = StaticPages {
            pages: pages.into_iter().collect(),
            requested: Arc::clone(&requested),
        };
        let loader = ArticleLoader::with_fetcher(
            Arc::new(SummaryService::new(store)),
            Box::new(fetcher),
            &ArticleConfig::default(),
        )
        .unwrap();
        (dir, loader, requested)
    }

    const STORY: &str = r#"<html lang="en-GB"><head><title>Harbour news</title></head>
        <body><p>Boats returned to the harbour at dawn. Fishermen unloaded their catch.</p></body></html>"#;

    #[test]
    fn detects_primary_language_subtag() {
        assert_eq!(detect_language(Some("pt-BR")), "pt");
        assert_eq!(detect_language(Some("DE")), "de");
        assert_eq!(detect_language(Some("")), "und");
        assert_eq!(detect_language(None), "und");
    }

    #[test]
    fn resolves_relative_amp_links() {
        let base = "https://news.example/world/story.html?ref=home";
        assert_eq!(resolve_href(base, "https://amp.example/s"), "https://amp.example/s");
        assert_eq!(resolve_href(base, "//cdn.example/amp"), "https://cdn.example/amp");
        assert_eq!(resolve_href(base, "/amp/story"), "https://news.example/amp/story");
        assert_eq!(resolve_href(base, "story.amp.html"), "https://news.example/world/story.amp.html");
    }

    #[test]
    fn loads_title_language_and_summary() {
        let (_dir, loader, _) = loader(vec![page("https://news.example/a", STORY)]);
        let article = loader.load("https://news.example/a").unwrap();
        assert_eq!(article.title, "Harbour news");
        assert_eq!(article.language, "en");
        assert_eq!(article.sentences.len(), 2);
    }

    #[test]
    fn follows_amp_once() {
        let canonical = r#"<html><head><link rel="amphtml" href="/a/amp"></head><body><p>Full page.</p></body></html>"#;
        let amp = r#"<html lang="en"><head><title>AMP</title><link rel="amphtml" href="/a/amp2"></head>
            <body><p>Light page.</p></body></html>"#;
        let (_dir, loader, requested) = loader(vec![
            page("https://news.example/a", canonical),
            page("https://news.example/a/amp", amp),
        ]);

        let article = loader.load("https://news.example/a").unwrap();
        assert_eq!(article.url, "https://news.example/a/amp");
        assert_eq!(article.title, "AMP");
        assert_eq!(
            *requested.lock().unwrap(),
            vec!["https://news.example/a", "https://news.example/a/amp"]
        );
    }

    #[test]
    fn amp_can_be_disabled() {
        let canonical = r#"<html><head><link rel="amphtml" href="/a/amp"></head><body><p>Full page.</p></body></html>"#;
        let (_dir, loader, requested) = loader(vec![page("https://news.example/a", canonical)]);
        let article = loader.without_amp().load("https://news.example/a").unwrap();
        assert_eq!(article.url, "https://news.example/a");
        assert_eq!(article.language, "und");
        assert_eq!(requested.lock().unwrap().len(), 1);
    }

    #[test]
    fn unlisted_languages_fall_back() {
        let (_dir, loader, _) = loader(Vec::new());
        assert_eq!(loader.summary_language("de"), Language::German);
        assert_eq!(loader.summary_language("fi"), Language::English);
        assert_eq!(loader.summary_language("und"), Language::English);
        assert_eq!(loader.summary_language("cs"), Language::Czech);
        assert_eq!(loader.summary_language("el"), Language::English);
    }

    #[test]
    fn non_html_pages_are_rejected() {
        let (_dir, loader, _) = loader(vec![(
            "https://news.example/feed".to_string(),
            Page {
                url: "https://news.example/feed".into(),
                content_type: Some("application/rss+xml".into()),
                body: "<rss/>".into(),
            },
        )]);
        let err = loader.load("https://news.example/feed").unwrap_err();
        assert!(matches!(err, ArticleError::NotHtml { .. }));
    }
}
