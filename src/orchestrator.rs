//! Run sequencing
//!
//! One pass per invocation: check the cache, resolve the platform, fetch and
//! persist if needed, then hand the process to the artifact. Every
//! transition is attempted exactly once; a fetch or persist failure aborts
//! the run instead of retrying or degrading to another artifact kind.

use crate::cache::ArtifactCache;
use crate::config::Config;
use crate::error::PowbootResult;
use crate::fetch::Fetch;
use crate::launch::{LaunchRequest, Launcher};
use crate::platform::{ArtifactKind, HostInfo, HostPlatform};
use console::style;
use std::convert::Infallible;
use tracing::debug;

/// Sequences cache, resolver, fetcher and launcher for one run
pub struct Orchestrator<F: Fetch> {
    config: Config,
    cache: ArtifactCache,
    launcher: Launcher,
    fetcher: F,
}

impl<F: Fetch> Orchestrator<F> {
    pub fn new(config: Config, fetcher: F) -> Self {
        let cache = ArtifactCache::new(config.cache.effective_dir());
        let launcher = Launcher::new(config.launch.interpreter.clone());
        Self {
            config,
            cache,
            launcher,
            fetcher,
        }
    }

    /// Produce a ready-to-launch request, fetching and installing an
    /// artifact when the cache cannot satisfy the run.
    ///
    /// This is everything `run` does short of the terminal exec, split out
    /// so the sequencing is observable in tests.
    pub fn prepare(
        &self,
        host: &HostInfo,
        forwarded_args: Vec<String>,
    ) -> PowbootResult<LaunchRequest> {
        // A cached native binary wins before the platform is even looked at.
        let native = self.cache.read(ArtifactKind::NativeBinary);
        if let Some(path) = native.ready() {
            return Ok(LaunchRequest::new(
                path.to_path_buf(),
                ArtifactKind::NativeBinary,
                forwarded_args,
            ));
        }

        let platform = HostPlatform::from_host(host);
        let descriptor = platform.descriptor(&self.config.release);
        debug!("resolved {:?} -> {}", platform, descriptor.url);

        // Non-Linux hosts may already hold the script fallback.
        if descriptor.kind == ArtifactKind::ScriptFallback {
            let script = self.cache.read(ArtifactKind::ScriptFallback);
            if let Some(path) = script.ready() {
                return Ok(LaunchRequest::new(
                    path.to_path_buf(),
                    ArtifactKind::ScriptFallback,
                    forwarded_args,
                ));
            }
        }

        eprintln!(
            "{} fetching {}",
            style("powboot:").dim(),
            style(&descriptor.url).dim()
        );
        let bytes = self.fetcher.fetch(&descriptor.url)?;
        let slot = self.cache.write(&bytes, descriptor.kind)?;

        Ok(LaunchRequest::new(
            slot.path,
            descriptor.kind,
            forwarded_args,
        ))
    }

    /// Run to completion: on success the process image is replaced and this
    /// never returns.
    pub fn run(&self, forwarded_args: Vec<String>) -> PowbootResult<Infallible> {
        let host = HostInfo::current();
        let request = self.prepare(&host, forwarded_args)?;
        self.launcher.launch(request)
    }
}
