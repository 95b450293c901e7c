//! Host platform detection and artifact resolution
//!
//! The host is inspected exactly once per run and collapsed into the closed
//! `HostPlatform` enum. Everything downstream consumes the typed value; raw
//! OS/processor strings are never re-inspected.

use crate::config::ReleaseConfig;
use tracing::debug;

/// Kind of artifact the launcher runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Platform-specific compiled binary
    NativeBinary,
    /// Interpreted Python script, used where no binary is published
    ScriptFallback,
}

/// Raw host identity, read once from the live environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// OS name as reported by the toolchain, e.g. "linux", "macos"
    pub os: String,
    /// Processor string as reported by `uname -p`
    pub processor: String,
}

impl HostInfo {
    /// Read the identity of the running host
    pub fn current() -> Self {
        let os = std::env::consts::OS.to_string();
        let processor =
            uname_processor().unwrap_or_else(|| std::env::consts::ARCH.to_string());
        debug!("host os={} processor={}", os, processor);
        Self { os, processor }
    }
}

#[cfg(unix)]
fn uname_processor() -> Option<String> {
    let output = std::process::Command::new("uname").arg("-p").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let processor = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if processor.is_empty() {
        None
    } else {
        Some(processor)
    }
}

#[cfg(not(unix))]
fn uname_processor() -> Option<String> {
    None
}

/// Closed platform classification consumed by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    /// Linux on the primary architecture (amd64 release asset)
    LinuxPrimary,
    /// Linux reporting the "i386" processor sentinel (arm64 release asset).
    /// Some emulated runtimes report "i386" to mean "not the primary arch",
    /// not literally 32-bit x86.
    LinuxSecondary,
    /// Everything else, served by the interpreted-script fallback
    Other,
}

impl HostPlatform {
    /// Classify a host. Never fails; fallback is the default.
    pub fn from_host(host: &HostInfo) -> Self {
        if host.os != "linux" {
            return Self::Other;
        }
        if host.processor == "i386" {
            Self::LinuxSecondary
        } else {
            Self::LinuxPrimary
        }
    }

    /// Resolve the release endpoint and artifact kind for this platform
    pub fn descriptor(&self, release: &ReleaseConfig) -> ArtifactDescriptor {
        match self {
            Self::LinuxPrimary => ArtifactDescriptor {
                url: format!("{}{}", release.base_url, release.primary_asset),
                kind: ArtifactKind::NativeBinary,
            },
            Self::LinuxSecondary => ArtifactDescriptor {
                url: format!("{}{}", release.base_url, release.secondary_asset),
                kind: ArtifactKind::NativeBinary,
            },
            Self::Other => ArtifactDescriptor {
                url: release.fallback_url.clone(),
                kind: ArtifactKind::ScriptFallback,
            },
        }
    }
}

/// A resolved download target. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub url: String,
    pub kind: ArtifactKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(os: &str, processor: &str) -> HostInfo {
        HostInfo {
            os: os.to_string(),
            processor: processor.to_string(),
        }
    }

    #[test]
    fn linux_primary_arch() {
        let platform = HostPlatform::from_host(&host("linux", "x86_64"));
        assert_eq!(platform, HostPlatform::LinuxPrimary);
    }

    #[test]
    fn linux_i386_sentinel_is_secondary() {
        let platform = HostPlatform::from_host(&host("linux", "i386"));
        assert_eq!(platform, HostPlatform::LinuxSecondary);
    }

    #[test]
    fn linux_empty_processor_is_primary() {
        let platform = HostPlatform::from_host(&host("linux", ""));
        assert_eq!(platform, HostPlatform::LinuxPrimary);
    }

    #[test]
    fn non_linux_is_other() {
        assert_eq!(HostPlatform::from_host(&host("macos", "arm")), HostPlatform::Other);
        assert_eq!(
            HostPlatform::from_host(&host("windows", "x86_64")),
            HostPlatform::Other
        );
    }

    #[test]
    fn descriptor_primary_url() {
        let release = ReleaseConfig::default();
        let descriptor = HostPlatform::LinuxPrimary.descriptor(&release);
        assert!(descriptor.url.ends_with("kctf-amd64"));
        assert_eq!(descriptor.kind, ArtifactKind::NativeBinary);
    }

    #[test]
    fn descriptor_secondary_url() {
        let release = ReleaseConfig::default();
        let descriptor = HostPlatform::LinuxSecondary.descriptor(&release);
        assert!(descriptor.url.ends_with("kctf-arm64"));
        assert_eq!(descriptor.kind, ArtifactKind::NativeBinary);
    }

    #[test]
    fn descriptor_fallback_url() {
        let release = ReleaseConfig::default();
        let descriptor = HostPlatform::Other.descriptor(&release);
        assert_eq!(descriptor.url, release.fallback_url);
        assert_eq!(descriptor.kind, ArtifactKind::ScriptFallback);
    }
}
