//! Artifact download
//!
//! A single blocking GET per run, no retries. Errors are classified so the
//! orchestrator can surface which way the fetch went wrong: transport
//! failure, bad status, or a suspiciously empty body.

use crate::error::{PowbootError, PowbootResult};
use std::io::Read;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound for the whole request. A stalled connection must not hang
/// the launcher indefinitely.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Download seam. The orchestrator is generic over this so tests can count
/// and fake network calls.
pub trait Fetch {
    /// Download the full body at `url`
    fn fetch(&self, url: &str) -> PowbootResult<Vec<u8>>;
}

/// HTTP fetcher backed by a blocking ureq agent
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(FETCH_TIMEOUT))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> PowbootResult<Vec<u8>> {
        debug!("GET {}", url);

        let mut response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => PowbootError::HttpStatus {
                url: url.to_string(),
                status,
            },
            other => PowbootError::Network {
                url: url.to_string(),
                source: Box::new(other),
            },
        })?;

        let mut body = Vec::new();
        response
            .body_mut()
            .as_reader()
            .read_to_end(&mut body)
            .map_err(|e| PowbootError::Network {
                url: url.to_string(),
                source: Box::new(e),
            })?;

        if body.is_empty() {
            return Err(PowbootError::EmptyBody {
                url: url.to_string(),
            });
        }

        info!("fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
