//! Remote fetching for resource bundles.
//!
//! Uses `ureq` for synchronous HTTP requests. Enforces a timeout and a
//! maximum body size so a bad mirror can't hang the caller or exhaust memory.

use std::io::Read;
use std::time::Duration;

use crate::error::{ResourceError, ResourceResult};

/// Something that can turn a URL into bytes.
///
/// The HTTP implementation is the default; tests substitute in-memory fakes.
pub trait ResourceFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> ResourceResult<Vec<u8>>;
}

/// `ureq`-backed fetcher.
pub struct HttpFetcher {
    agent: ureq::Agent,
    max_bytes: u64,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, max_bytes: u64) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("newsumm/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent, max_bytes }
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> ResourceResult<Vec<u8>> {
        let response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => ResourceError::Fetch {
                url: url.into(),
                message: format!("HTTP status {code}"),
            },
            ureq::Error::Transport(transport) => ResourceError::Fetch {
                url: url.into(),
                message: transport.to_string(),
            },
        })?;

        let mut data = Vec::new();
        response
            .into_reader()
            .take(self.max_bytes + 1)
            .read_to_end(&mut data)
            .map_err(|e| ResourceError::Fetch {
                url: url.into(),
                message: format!("read body: {e}"),
            })?;

        if data.len() as u64 > self.max_bytes {
            return Err(ResourceError::TooLarge {
                url: url.into(),
                limit: self.max_bytes,
            });
        }
        Ok(data)
    }
}
