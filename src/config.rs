//! User configuration, persisted as TOML in `$XDG_CONFIG_HOME/newsumm/config.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::language::Language;
use crate::paths::SummPaths;
use crate::pipeline::DEFAULT_MAX_INPUT_BYTES;
use crate::resources::{DEFAULT_BUNDLE_URL, ResourceStore};
use crate::summarizer::SentenceCount;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummConfig {
    /// Language used when none is given on the command line.
    #[serde(default = "default_language")]
    pub language: String,
    /// Sentence count: an integer or a percentage such as `"20%"`.
    #[serde(default = "default_sentences")]
    pub sentences: String,
    /// Inputs larger than this are rejected.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
    /// Words ignored when ranking, in every language.
    #[serde(default)]
    pub extra_stop_words: Vec<String>,
    #[serde(default)]
    pub resources: ResourcesConfig,
    #[serde(default)]
    pub article: ArticleConfig,
}

/// `[resources]`: where the punkt bundle comes from and where it goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcesConfig {
    #[serde(default = "default_bundle_url")]
    pub url: String,
    /// Override for `$XDG_DATA_HOME/newsumm/resources`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_download_bytes")]
    pub max_download_bytes: u64,
}

/// `[article]`: web article loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Load the page's `<link rel="amphtml">` alternate instead, when present.
    #[serde(default = "default_true")]
    pub follow_amp: bool,
    /// Page languages summarized as themselves; anything else uses the fallback.
    #[serde(default = "default_valid_languages")]
    pub valid_languages: Vec<String>,
    #[serde(default = "default_fallback_language")]
    pub fallback_language: String,
    #[serde(default = "default_article_sentences")]
    pub sentences: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_language() -> String {
    "english".into()
}
fn default_sentences() -> String {
    "5".into()
}
fn default_max_input_bytes() -> usize {
    DEFAULT_MAX_INPUT_BYTES
}
fn default_bundle_url() -> String {
    DEFAULT_BUNDLE_URL.into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_download_bytes() -> u64 {
    64 * 1024 * 1024
}
fn default_user_agent() -> String {
    format!("newsumm/{}", env!("CARGO_PKG_VERSION"))
}
fn default_true() -> bool {
    true
}
fn default_valid_languages() -> Vec<String> {
    ["cs", "de", "en", "es", "fr", "it", "pt"]
        .iter()
        .map(|l| l.to_string())
        .collect()
}
fn default_fallback_language() -> String {
    "en".into()
}
fn default_article_sentences() -> usize {
    7
}

impl Default for SummConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            sentences: default_sentences(),
            max_input_bytes: default_max_input_bytes(),
            extra_stop_words: Vec::new(),
            resources: ResourcesConfig::default(),
            article: ArticleConfig::default(),
        }
    }
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            url: default_bundle_url(),
            dir: None,
            timeout_secs: default_timeout_secs(),
            max_download_bytes: default_max_download_bytes(),
        }
    }
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            follow_amp: true,
            valid_languages: default_valid_languages(),
            fallback_language: default_fallback_language(),
            sentences: default_article_sentences(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SummConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: "<serialize>".into(),
            message: e.to_string(),
        })
    }

    /// Check every value that has a closed set of meanings.
    pub fn validate(&self) -> ConfigResult<()> {
        self.default_language()?;
        self.sentence_count()?;
        Language::parse(&self.article.fallback_language)?;
        if self.article.sentences == 0 {
            return Err(ConfigError::InvalidSentenceCount {
                value: "article.sentences = 0".into(),
            });
        }
        Ok(())
    }

    pub fn default_language(&self) -> ConfigResult<Language> {
        Language::parse(&self.language)
    }

    pub fn sentence_count(&self) -> ConfigResult<SentenceCount> {
        self.sentences.parse()
    }

    /// Resource directory: the configured override, else the XDG data dir.
    pub fn resources_dir(&self, paths: &SummPaths) -> PathBuf {
        self.resources
            .dir
            .clone()
            .unwrap_or_else(|| paths.resources_dir())
    }

    /// An HTTP-backed resource store rooted at `root`.
    pub fn resource_store(&self, root: PathBuf) -> ResourceStore {
        ResourceStore::http(
            root,
            self.resources.url.clone(),
            Duration::from_secs(self.resources.timeout_secs),
            self.resources.max_download_bytes,
        )
    }
}
