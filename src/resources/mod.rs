//! Linguistic resources: the punkt tokenizer bundle.
//!
//! The bundle is NLTK's `punkt_tab.zip`, fetched once and extracted under
//! `<root>/tokenizers/punkt_tab/`. Installation is published atomically: the
//! archive is unpacked into a staging directory unique to the call, marked
//! with an `.installed` file, and renamed into place. Readers only trust a
//! bundle that carries the marker, and a marked bundle is only ever replaced
//! by an explicit reinstall.

pub mod fetch;
pub mod punkt;

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use zip::ZipArchive;

use crate::error::{ResourceError, ResourceResult};
use crate::language::Language;

pub use fetch::{HttpFetcher, ResourceFetcher};
pub use punkt::PunktParameters;

/// Where the punkt bundle is published by NLTK.
pub const DEFAULT_BUNDLE_URL: &str =
    "https://raw.githubusercontent.com/nltk/nltk_data/gh-pages/packages/tokenizers/punkt_tab.zip";

const BUNDLE_DIR: &str = "punkt_tab";
const MARKER_FILE: &str = ".installed";

/// One install gate per resource root, shared by every store in the process.
static INSTALL_GATES: LazyLock<DashMap<PathBuf, Arc<Mutex<()>>>> = LazyLock::new(DashMap::new);

/// What `ensure()` had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    AlreadyInstalled,
    Downloaded,
}

/// Snapshot of the local bundle, for `newsumm resources status`.
#[derive(Debug, Clone)]
pub struct ResourceStatus {
    pub root: PathBuf,
    pub installed: bool,
    /// Supported languages that have punkt data in the bundle.
    pub languages: Vec<Language>,
}

/// Owner of the resource directory.
pub struct ResourceStore {
    root: PathBuf,
    url: String,
    fetcher: Box<dyn ResourceFetcher>,
    punkt_cache: DashMap<Language, Arc<PunktParameters>>,
}

impl ResourceStore {
    pub fn new(root: impl Into<PathBuf>, url: impl Into<String>, fetcher: Box<dyn ResourceFetcher>) -> Self {
        Self {
            root: root.into(),
            url: url.into(),
            fetcher,
            punkt_cache: DashMap::new(),
        }
    }

    /// A store that downloads over HTTP.
    pub fn http(
        root: impl Into<PathBuf>,
        url: impl Into<String>,
        timeout: Duration,
        max_download_bytes: u64,
    ) -> Self {
        Self::new(root, url, Box::new(HttpFetcher::new(timeout, max_download_bytes)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `<root>/tokenizers/punkt_tab/`
    pub fn bundle_dir(&self) -> PathBuf {
        self.root.join("tokenizers").join(BUNDLE_DIR)
    }

    pub fn is_installed(&self) -> bool {
        self.bundle_dir().join(MARKER_FILE).is_file()
    }

    /// Make sure the bundle is installed, downloading it if needed.
    ///
    /// Cheap when already installed: a single `stat`, no lock, no network.
    pub fn ensure(&self) -> ResourceResult<EnsureOutcome> {
        if self.is_installed() {
            return Ok(EnsureOutcome::AlreadyInstalled);
        }

        let gate = self.gate();
        let _guard = gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // Another caller may have finished while we waited for the gate.
        if self.is_installed() {
            tracing::debug!(root = %self.root.display(), "resources installed by a concurrent caller");
            return Ok(EnsureOutcome::AlreadyInstalled);
        }

        tracing::info!(url = %self.url, root = %self.root.display(), "downloading tokenizer resources");
        let data = self.fetcher.fetch(&self.url)?;
        if !self.install_locked(&data, false)? {
            tracing::debug!(root = %self.root.display(), "resources installed by another process");
            return Ok(EnsureOutcome::AlreadyInstalled);
        }
        tracing::info!(bytes = data.len(), "tokenizer resources installed");
        Ok(EnsureOutcome::Downloaded)
    }

    /// Install (or replace) the bundle from an archive already in memory.
    pub fn install_from_archive(&self, data: &[u8]) -> ResourceResult<()> {
        let gate = self.gate();
        let _guard = gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.install_locked(data, true)?;
        Ok(())
    }

    /// Load (and cache) punkt parameters for one language.
    pub fn load_punkt(&self, language: Language) -> ResourceResult<Arc<PunktParameters>> {
        if let Some(cached) = self.punkt_cache.get(&language) {
            return Ok(Arc::clone(cached.value()));
        }

        if !self.is_installed() {
            return Err(ResourceError::Missing {
                root: self.root.display().to_string(),
            });
        }

        let dir = self.bundle_dir().join(language.name());
        if !dir.join(punkt::ABBREV_FILE).is_file() {
            return Err(ResourceError::LanguageMissing {
                language: language.to_string(),
                path: dir.display().to_string(),
            });
        }

        let params = Arc::new(PunktParameters::load(&dir)?);
        tracing::debug!(
            %language,
            abbreviations = params.abbreviation_count(),
            "loaded punkt parameters"
        );
        self.punkt_cache.insert(language, Arc::clone(&params));
        Ok(params)
    }

    pub fn status(&self) -> ResourceStatus {
        let installed = self.is_installed();
        let languages = if installed {
            languages_in(&self.bundle_dir())
        } else {
            Vec::new()
        };
        ResourceStatus {
            root: self.root.clone(),
            installed,
            languages,
        }
    }

    fn gate(&self) -> Arc<Mutex<()>> {
        Arc::clone(INSTALL_GATES.entry(self.root.clone()).or_default().value())
    }

    /// Unpack `data` and publish it. Returns whether this call's bundle is
    /// the one now installed.
    ///
    /// With `replace` unset an installed bundle is never touched. The
    /// in-process gate must be held; other processes are only excluded by
    /// the rename.
    fn install_locked(&self, data: &[u8], replace: bool) -> ResourceResult<bool> {
        let tokenizers = self.root.join("tokenizers");
        std::fs::create_dir_all(&tokenizers).map_err(io_error(&tokenizers))?;

        // Removed on drop, along with anything moved aside into it.
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&tokenizers)
            .map_err(io_error(&tokenizers))?;

        let published = self.publish(data, staging.path(), replace)?;
        if published {
            self.punkt_cache.clear();
        }
        Ok(published)
    }

    fn publish(&self, data: &[u8], staging: &Path, replace: bool) -> ResourceResult<bool> {
        let entries = extract_archive(data, staging)?;
        let extracted = staging.join(BUNDLE_DIR);
        if languages_in(&extracted).is_empty() {
            return Err(ResourceError::InvalidArchive {
                message: format!(
                    "no `{BUNDLE_DIR}/<language>/{}` for any supported language ({entries} entries)",
                    punkt::ABBREV_FILE
                ),
            });
        }
        // The bundle is marked before it becomes visible, so a bundle
        // directory without a marker is a leftover from an interrupted install.
        let marker = extracted.join(MARKER_FILE);
        std::fs::write(&marker, env!("CARGO_PKG_VERSION")).map_err(io_error(&marker))?;

        if !replace && self.is_installed() {
            return Ok(false);
        }

        let bundle = self.bundle_dir();
        if bundle.exists() && (replace || !self.is_installed()) {
            let previous = staging.join("previous");
            if let Err(e) = std::fs::rename(&bundle, &previous) {
                if !replace && self.is_installed() {
                    return Ok(false);
                }
                // Gone already: another installer moved it first.
                if bundle.exists() {
                    return Err(io_error(&bundle)(e));
                }
            }
        }

        match std::fs::rename(&extracted, &bundle) {
            Ok(()) => Ok(true),
            // Lost the race to another process that published in between.
            Err(_) if self.is_installed() => Ok(false),
            Err(e) => Err(io_error(&bundle)(e)),
        }
    }
}

/// Unpack a zip archive into `dest`, refusing entries that escape it.
fn extract_archive(data: &[u8], dest: &Path) -> ResourceResult<usize> {
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|e| ResourceError::InvalidArchive {
        message: e.to_string(),
    })?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| ResourceError::InvalidArchive {
            message: format!("entry {i}: {e}"),
        })?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(ResourceError::InvalidArchive {
                message: format!("entry escapes the archive root: {}", entry.name()),
            });
        };
        let out = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out).map_err(io_error(&out))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        let mut file = std::fs::File::create(&out).map_err(io_error(&out))?;
        std::io::copy(&mut entry, &mut file).map_err(io_error(&out))?;
    }

    Ok(archive.len())
}

fn languages_in(bundle: &Path) -> Vec<Language> {
    Language::ALL
        .into_iter()
        .filter(|lang| bundle.join(lang.name()).join(punkt::ABBREV_FILE).is_file())
        .collect()
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ResourceError + '_ {
    move |source| ResourceError::Io {
        path: path.display().to_string(),
        source,
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::testing::*;
    use super::*;

    struct FailingFetcher;

    impl ResourceFetcher for FailingFetcher {
        fn fetch(&self, url: &str) -> ResourceResult<Vec<u8>> {
            Err(ResourceError::Fetch {
                url: url.into(),
                message: "connection refused".into(),
            })
        }
    }

    #[test]
    fn ensure_downloads_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let store = ResourceStore::new(
            dir.path(),
            "memory://punkt_tab.zip",
            Box::new(CountingFetcher {
                calls: Arc::clone(&calls),
            }),
        );

        assert!(!store.is_installed());
        assert_eq!(store.ensure().unwrap(), EnsureOutcome::Downloaded);
        assert_eq!(store.ensure().unwrap(), EnsureOutcome::AlreadyInstalled);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(store.is_installed());
    }

    #[test]
    fn failed_fetch_leaves_store_uninstalled() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ResourceStore::new(dir.path(), "memory://nowhere", Box::new(FailingFetcher));

        let err = store.ensure().unwrap_err();
        assert!(matches!(err, ResourceError::Fetch { .. }));
        assert!(!store.is_installed());
        assert!(matches!(
            store.load_punkt(Language::English).unwrap_err(),
            ResourceError::Missing { .. }
        ));
    }

    #[test]
    fn load_punkt_reads_language_tables() {
        let (_dir, store) = installed_store();
        let params = store.load_punkt(Language::English).unwrap();
        assert!(params.is_abbreviation("mr"));
        assert!(params.is_collocation("st", "louis"));

        // Served from cache the second time.
        let again = store.load_punkt(Language::English).unwrap();
        assert!(Arc::ptr_eq(&params, &again));
    }

    #[test]
    fn language_absent_from_bundle() {
        let (_dir, store) = installed_store();
        let err = store.load_punkt(Language::Finnish).unwrap_err();
        assert!(matches!(err, ResourceError::LanguageMissing { .. }));
    }

    #[test]
    fn status_lists_bundled_languages() {
        let (_dir, store) = installed_store();
        let status = store.status();
        assert!(status.installed);
        assert_eq!(status.languages, vec![Language::English, Language::German]);
    }

    #[test]
    fn archive_without_bundle_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ResourceStore::new(dir.path(), "memory://", Box::new(FailingFetcher));

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("README.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        std::io::Write::write_all(&mut zip, b"nothing here").unwrap();
        let data = zip.finish().unwrap().into_inner();

        let err = store.install_from_archive(&data).unwrap_err();
        assert!(matches!(err, ResourceError::InvalidArchive { .. }));
        assert!(!store.is_installed());
    }

    #[test]
    fn garbage_is_not_an_archive() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ResourceStore::new(dir.path(), "memory://", Box::new(FailingFetcher));
        let err = store.install_from_archive(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, ResourceError::InvalidArchive { .. }));
    }

    #[test]
    fn ensure_replaces_unmarked_leftovers() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ResourceStore::new(
            dir.path(),
            "memory://punkt_tab.zip",
            Box::new(CountingFetcher {
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );
        let leftover = store.bundle_dir().join("english");
        std::fs::create_dir_all(&leftover).unwrap();
        std::fs::write(leftover.join(punkt::ABBREV_FILE), "stale\n").unwrap();
        assert!(!store.is_installed());

        assert_eq!(store.ensure().unwrap(), EnsureOutcome::Downloaded);
        let params = store.load_punkt(Language::English).unwrap();
        assert!(params.is_abbreviation("mr"));
        assert!(!params.is_abbreviation("stale"));
    }

    #[test]
    fn reinstall_cleans_up_staging() {
        let (dir, store) = installed_store();
        store.install_from_archive(&bundle_zip()).unwrap();
        assert!(store.is_installed());
        let names: Vec<_> = std::fs::read_dir(dir.path().join("tokenizers"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(BUNDLE_DIR)]);
    }
}
