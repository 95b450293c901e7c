//! Configuration schema for powboot
//!
//! Configuration is stored at `~/.config/powboot/config.toml`. Every field
//! has a default, so an absent or empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Release endpoint settings
    pub release: ReleaseConfig,

    /// Artifact cache settings
    pub cache: CacheConfig,

    /// Launch settings
    pub launch: LaunchConfig,
}

/// Release endpoints, one per artifact variant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Base URL the native asset names are appended to
    pub base_url: String,

    /// Asset name for the primary Linux architecture
    pub primary_asset: String,

    /// Asset name for the secondary Linux architecture
    pub secondary_asset: String,

    /// Full URL of the interpreted-script fallback
    pub fallback_url: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            base_url: "https://github.com/kernelrop/kctf/releases/latest/download/"
                .to_string(),
            primary_asset: "kctf-amd64".to_string(),
            secondary_asset: "kctf-arm64".to_string(),
            fallback_url:
                "https://raw.githubusercontent.com/google/kctf/v1/docker-images/challenge/pow.py"
                    .to_string(),
        }
    }
}

/// Artifact cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory override. Defaults to the platform cache dir.
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Effective cache directory
    pub fn effective_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("powboot")
        })
    }
}

/// Launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Interpreter used to run the script fallback
    pub interpreter: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_kctf_release() {
        let config = Config::default();
        assert!(config.release.base_url.contains("kernelrop/kctf"));
        assert_eq!(config.release.primary_asset, "kctf-amd64");
        assert_eq!(config.release.secondary_asset, "kctf-arm64");
        assert!(config.release.fallback_url.ends_with("pow.py"));
        assert_eq!(config.launch.interpreter, "python3");
    }

    #[test]
    fn empty_toml_parses_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.release.primary_asset, "kctf-amd64");
        assert!(config.cache.dir.is_none());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [cache]
            dir = "/tmp/powboot-test"

            [release]
            base_url = "http://127.0.0.1:8080/"
            "#,
        )
        .unwrap();
        assert_eq!(config.cache.dir, Some(PathBuf::from("/tmp/powboot-test")));
        assert_eq!(config.release.base_url, "http://127.0.0.1:8080/");
        assert_eq!(config.release.primary_asset, "kctf-amd64");
    }

    #[test]
    fn effective_dir_prefers_override() {
        let cache = CacheConfig {
            dir: Some(PathBuf::from("/custom")),
        };
        assert_eq!(cache.effective_dir(), PathBuf::from("/custom"));
    }
}
