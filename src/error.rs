//! Rich diagnostic error types for newsumm.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so callers know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Coarse classification of a failure, as seen by a host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input could not be turned into a document.
    Parse,
    /// Unsupported language, invalid sentence count, or a bad config file.
    Configuration,
    /// The linguistic resource bundle is missing or could not be fetched.
    ResourceFetch,
    /// The ranking algorithm itself failed.
    Algorithm,
}

/// Top-level error type for summarization.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum SummaryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Algorithm(#[from] AlgorithmError),
}

impl SummaryError {
    /// Which of the host-visible error kinds this failure belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            Self::Config(_) => ErrorKind::Configuration,
            Self::Resource(_) => ErrorKind::ResourceFetch,
            Self::Algorithm(_) => ErrorKind::Algorithm,
        }
    }
}

/// Convenience alias for summarization results.
pub type SummaryResult<T> = std::result::Result<T, SummaryError>;

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("{format} input is not valid UTF-8 (first invalid byte at offset {offset})")]
    #[diagnostic(
        code(newsumm::parse::encoding),
        help(
            "Documents must be UTF-8 encoded. Re-encode the input, or decode it \
             yourself and call the `&str` entry point."
        )
    )]
    InvalidEncoding { format: String, offset: usize },

    #[error("{format} input is {size} bytes, larger than the {limit}-byte limit")]
    #[diagnostic(
        code(newsumm::parse::too_large),
        help("Raise `max_input_bytes` in config.toml or trim the document before summarizing.")
    )]
    InputTooLarge {
        format: String,
        size: usize,
        limit: usize,
    },

    #[error("invalid selector \"{selector}\": {message}")]
    #[diagnostic(
        code(newsumm::parse::selector),
        help("This is a bug in the HTML extractor's selector table.")
    )]
    Selector { selector: String, message: String },
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unsupported language: \"{language}\"")]
    #[diagnostic(
        code(newsumm::config::unsupported_language),
        help(
            "Supported languages are: czech, danish, dutch, english, finnish, french, german, \
             greek, italian, norwegian, portuguese, russian, spanish, swedish, turkish. \
             ISO 639-1/639-3 codes (e.g. \"en\", \"deu\") are accepted too. \
             Run `newsumm languages` for the full table."
        )
    )]
    UnsupportedLanguage { language: String },

    #[error("invalid sentence count: \"{value}\"")]
    #[diagnostic(
        code(newsumm::config::sentence_count),
        help(
            "Use a positive integer (e.g. 7) or a percentage of the document \
             between 0 and 100 (e.g. \"20%\")."
        )
    )]
    InvalidSentenceCount { value: String },

    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(newsumm::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(newsumm::config::parse),
        help("Check the TOML syntax in the config file. `newsumm config show` prints a valid one.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(newsumm::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot determine home directory")]
    #[diagnostic(
        code(newsumm::config::no_home),
        help("Set the HOME environment variable, or pass --config and --resources-dir explicitly.")
    )]
    NoHome,
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Resource errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ResourceError {
    #[error("tokenizer resources are not installed in {root}")]
    #[diagnostic(
        code(newsumm::resources::missing),
        help(
            "Download them first with `newsumm resources ensure` \
             (or call `ensure_linguistic_resources()`)."
        )
    )]
    Missing { root: String },

    #[error("tokenizer data for {language} is missing from {path}")]
    #[diagnostic(
        code(newsumm::resources::language_missing),
        help(
            "The installed bundle has no punkt data for this language. \
             Delete the resource directory and run `newsumm resources ensure` again."
        )
    )]
    LanguageMissing { language: String, path: String },

    #[error("fetch error for URL \"{url}\": {message}")]
    #[diagnostic(
        code(newsumm::resources::fetch),
        help(
            "Failed to download the resource bundle. Check that the URL is reachable \
             and the network is available, or install offline with \
             `newsumm resources ensure --archive punkt_tab.zip`."
        )
    )]
    Fetch { url: String, message: String },

    #[error("download from \"{url}\" exceeds the {limit}-byte limit")]
    #[diagnostic(
        code(newsumm::resources::too_large),
        help("Raise `resources.max_download_bytes` in config.toml if the bundle really is that large.")
    )]
    TooLarge { url: String, limit: u64 },

    #[error("invalid resource archive: {message}")]
    #[diagnostic(
        code(newsumm::resources::archive),
        help("The archive must be NLTK's punkt_tab.zip (a top-level `punkt_tab/` directory).")
    )]
    InvalidArchive { message: String },

    #[error("resource I/O error at {path}")]
    #[diagnostic(
        code(newsumm::resources::io),
        help("A filesystem operation failed. Check the resource directory's permissions and free space.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ResourceResult<T> = std::result::Result<T, ResourceError>;

// ---------------------------------------------------------------------------
// Algorithm errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum AlgorithmError {
    #[error("singular value decomposition did not converge ({rows}x{cols} matrix)")]
    #[diagnostic(
        code(newsumm::lsa::svd),
        help("The sentence-term matrix is numerically degenerate. Try a longer document.")
    )]
    SvdFailed { rows: usize, cols: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_subsystem() {
        let err: SummaryError = ConfigError::UnsupportedLanguage {
            language: "klingon".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err: SummaryError = ResourceError::Missing { root: "/tmp".into() }.into();
        assert_eq!(err.kind(), ErrorKind::ResourceFetch);

        let err: SummaryError = ParseError::InvalidEncoding {
            format: "html".into(),
            offset: 3,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn messages_name_the_offender() {
        let err = ConfigError::UnsupportedLanguage {
            language: "klingon".into(),
        };
        assert_eq!(err.to_string(), "unsupported language: \"klingon\"");
    }
}
