//! The host-facing summarization service.
//!
//! `SummaryService` validates host arguments, builds one pipeline per
//! language on first use, and keeps it for later calls. The crate-level
//! `summarize_html` / `summarize_text` / `ensure_linguistic_resources`
//! functions go through a process-wide service configured from
//! `config.toml`.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::config::SummConfig;
use crate::document::ContentFormat;
use crate::error::SummaryResult;
use crate::language::Language;
use crate::paths::SummPaths;
use crate::pipeline::{DEFAULT_MAX_INPUT_BYTES, SummarizationPipeline, build_pipeline};
use crate::resources::{EnsureOutcome, ResourceStore};
use crate::summarizer::SentenceCount;

static GLOBAL: OnceLock<Arc<SummaryService>> = OnceLock::new();

/// Summarization entry points over one resource store.
pub struct SummaryService {
    store: Arc<ResourceStore>,
    pipelines: DashMap<Language, Arc<SummarizationPipeline>>,
    max_input_bytes: usize,
    extra_stop_words: Vec<String>,
}

impl SummaryService {
    pub fn new(store: ResourceStore) -> Self {
        Self::shared(Arc::new(store))
    }

    pub fn shared(store: Arc<ResourceStore>) -> Self {
        Self {
            store,
            pipelines: DashMap::new(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            extra_stop_words: Vec::new(),
        }
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }

    /// Words ignored by every language's summarizer, e.g. site boilerplate.
    pub fn with_extra_stop_words(mut self, words: Vec<String>) -> Self {
        self.extra_stop_words = words;
        self
    }

    /// A service rooted where `config` says resources live.
    pub fn from_config(config: &SummConfig, paths: &SummPaths) -> Self {
        let store = config.resource_store(config.resources_dir(paths));
        Self::new(store)
            .with_max_input_bytes(config.max_input_bytes)
            .with_extra_stop_words(config.extra_stop_words.clone())
    }

    /// The process-wide service, built from the user's config on first use.
    pub fn global() -> SummaryResult<Arc<SummaryService>> {
        if let Some(service) = GLOBAL.get() {
            return Ok(Arc::clone(service));
        }
        let paths = SummPaths::resolve()?;
        let config = SummConfig::load_or_default(&paths.config_file())?;
        let service = Arc::new(Self::from_config(&config, &paths));
        // A concurrent first call may have won; either service is equivalent.
        Ok(Arc::clone(GLOBAL.get_or_init(|| service)))
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    /// The cached pipeline for `language`, building it if needed.
    pub fn pipeline(&self, language: Language) -> SummaryResult<Arc<SummarizationPipeline>> {
        if let Some(pipeline) = self.pipelines.get(&language) {
            return Ok(Arc::clone(pipeline.value()));
        }
        let pipeline = build_pipeline(language, &self.store, self.max_input_bytes, &self.extra_stop_words)?;
        Ok(Arc::clone(
            self.pipelines.entry(language).or_insert(pipeline).value(),
        ))
    }

    /// Summarize an HTML document into at most `sentences_count` sentences.
    pub fn summarize_html(&self, input: &str, language: &str, sentences_count: i64) -> SummaryResult<Vec<String>> {
        self.summarize(ContentFormat::Html, input, language, sentences_count)
    }

    /// Summarize plain text into at most `sentences_count` sentences.
    pub fn summarize_text(&self, input: &str, language: &str, sentences_count: i64) -> SummaryResult<Vec<String>> {
        self.summarize(ContentFormat::PlainText, input, language, sentences_count)
    }

    /// Typed entry point: language and count already validated.
    pub fn summarize_with(
        &self,
        format: ContentFormat,
        input: &str,
        language: Language,
        count: SentenceCount,
    ) -> SummaryResult<Vec<String>> {
        self.pipeline(language)?.summarize(format, input, count)
    }

    /// Install the punkt bundle if it is not there yet. `Ok(true)` once installed.
    pub fn ensure_linguistic_resources(&self) -> SummaryResult<bool> {
        match self.store.ensure()? {
            EnsureOutcome::Downloaded => self.pipelines.clear(),
            EnsureOutcome::AlreadyInstalled => {}
        }
        Ok(true)
    }

    fn summarize(
        &self,
        format: ContentFormat,
        input: &str,
        language: &str,
        sentences_count: i64,
    ) -> SummaryResult<Vec<String>> {
        let language = Language::parse(language)?;
        let count = SentenceCount::from_host(sentences_count)?;
        self.summarize_with(format, input, language, count)
    }
}

impl std::fmt::Debug for SummaryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryService")
            .field("root", &self.store.root())
            .field("languages", &self.pipelines.len())
            .field("max_input_bytes", &self.max_input_bytes)
            .field("extra_stop_words", &self.extra_stop_words.len())
            .finish()
    }
}

/// Summarize an HTML document with the process-wide service.
pub fn summarize_html(input: &str, language: &str, sentences_count: i64) -> SummaryResult<Vec<String>> {
    SummaryService::global()?.summarize_html(input, language, sentences_count)
}

/// Summarize plain text with the process-wide service.
pub fn summarize_text(input: &str, language: &str, sentences_count: i64) -> SummaryResult<Vec<String>> {
    SummaryService::global()?.summarize_text(input, language, sentences_count)
}

/// Make sure the tokenizer resources are installed for the process-wide service.
pub fn ensure_linguistic_resources() -> SummaryResult<bool> {
    SummaryService::global()?.ensure_linguistic_resources()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::{ConfigError, ErrorKind, SummaryError};
    use crate::resources::testing::{CountingFetcher, installed_store};

    fn service() -> (tempfile::TempDir, SummaryService) {
        let (dir, store) = installed_store();
        (dir, SummaryService::new(store))
    }

    #[test]
    fn unsupported_language_is_configuration_error() {
        let (_dir, service) = service();
        let err = service.summarize_text("Hello there.", "klingon", 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(matches!(
            err,
            SummaryError::Config(ConfigError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn non_positive_counts_are_rejected() {
        let (_dir, service) = service();
        for count in [0, -1, i64::MIN] {
            let err = service.summarize_html("<p>Hi.</p>", "en", count).unwrap_err();
            assert!(matches!(
                err,
                SummaryError::Config(ConfigError::InvalidSentenceCount { .. })
            ));
        }
    }

    #[test]
    fn pipelines_are_cached_per_language() {
        let (_dir, service) = service();
        let a = service.pipeline(Language::English).unwrap();
        let b = service.pipeline(Language::English).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(service.pipelines.len(), 1);
    }

    #[test]
    fn language_aliases_share_a_pipeline() {
        let (_dir, service) = service();
        service.summarize_text("Birds sing loudly.", "EN", 1).unwrap();
        service.summarize_text("Birds sing loudly.", "english", 1).unwrap();
        assert_eq!(service.pipelines.len(), 1);
    }

    #[test]
    fn configured_stop_words_reach_the_pipeline() {
        let (_dir, store) = installed_store();
        let mut config = SummConfig::default();
        config.extra_stop_words = vec!["birds".into(), "sing".into(), "loudly".into()];
        let service = SummaryService::new(store).with_extra_stop_words(config.extra_stop_words);
        assert!(service.summarize_text("Birds sing loudly.", "en", 1).unwrap().is_empty());
    }

    #[test]
    fn missing_resources_are_reported_not_degraded() {
        let dir = tempfile::TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let service = SummaryService::new(ResourceStore::new(
            dir.path(),
            "memory://punkt_tab.zip",
            Box::new(CountingFetcher {
                calls: Arc::clone(&calls),
            }),
        ));

        let err = service.summarize_text("Birds sing.", "en", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceFetch);

        assert!(service.ensure_linguistic_resources().unwrap());
        assert!(service.ensure_linguistic_resources().unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let summary = service.summarize_text("Birds sing.", "en", 1).unwrap();
        assert_eq!(summary, vec!["Birds sing."]);
    }
}
