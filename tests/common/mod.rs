//! Shared fixtures: an offline punkt bundle and fetchers that serve it.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use newsumm::error::{ResourceError, ResourceResult};
use newsumm::resources::{ResourceFetcher, ResourceStore};
use zip::write::SimpleFileOptions;

/// A `punkt_tab.zip` with small Czech, English and German tables.
pub fn bundle_zip() -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let files = [
        ("punkt_tab/README", "offline test bundle\n"),
        ("punkt_tab/english/abbrev_types.txt", "mr\nmrs\ndr\nprof\ninc\ne.g\n"),
        ("punkt_tab/english/collocations.tab", "st\tlouis\n"),
        ("punkt_tab/english/sent_starters.txt", "however\nthe\n"),
        // BEG_UC | MID_LC
        ("punkt_tab/english/ortho_context.tab", "nobody\t34\n"),
        ("punkt_tab/german/abbrev_types.txt", "z.b\nbzw\ndr\n"),
        ("punkt_tab/czech/abbrev_types.txt", "tzv\nnapř\n"),
    ];
    for (name, content) in files {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Serves `bundle_zip()`, optionally slowly, counting requests.
pub struct CountingFetcher {
    pub calls: Arc<AtomicUsize>,
    pub delay: Duration,
}

impl CountingFetcher {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
                delay: Duration::ZERO,
            },
            calls,
        )
    }
}

impl ResourceFetcher for CountingFetcher {
    fn fetch(&self, _url: &str) -> ResourceResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        Ok(bundle_zip())
    }
}

/// Always fails like an unreachable mirror.
pub struct UnreachableFetcher;

impl ResourceFetcher for UnreachableFetcher {
    fn fetch(&self, url: &str) -> ResourceResult<Vec<u8>> {
        Err(ResourceError::Fetch {
            url: url.to_string(),
            message: "connection refused".into(),
        })
    }
}

/// A store for `root` with the bundle already installed.
pub fn installed_store(root: &Path) -> ResourceStore {
    let (fetcher, _) = CountingFetcher::new();
    let store = ResourceStore::new(root, "memory://punkt_tab.zip", Box::new(fetcher));
    store.install_from_archive(&bundle_zip()).unwrap();
    store
}
