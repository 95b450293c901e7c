//! Error types for powboot
//!
//! All modules use `PowbootResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for powboot operations
pub type PowbootResult<T> = Result<T, PowbootError>;

/// All errors that can occur in powboot
#[derive(Error, Debug)]
pub enum PowbootError {
    // Fetch errors
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{url} returned HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("{url} returned an empty body")]
    EmptyBody { url: String },

    // Persistence errors
    #[error("failed to create cache directory {path}: {source}")]
    CacheDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stage artifact at {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install artifact at {path}: {source}")]
    Install {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Launch errors
    #[error("failed to execute {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PowbootError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a launch error for a command that could not be executed
    pub fn launch(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Launch {
            command: command.into(),
            source,
        }
    }

    /// Pipeline stage this error belongs to, used in diagnostics
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Network { .. } | Self::HttpStatus { .. } | Self::EmptyBody { .. } => "fetch",
            Self::CacheDirCreate { .. } | Self::Stage { .. } | Self::Install { .. } => "persist",
            Self::Launch { .. } => "launch",
            Self::ConfigInvalid { .. } => "config",
            Self::Io { .. } => "setup",
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Network { .. } => Some("Check your network connection and try again"),
            Self::HttpStatus { .. } => {
                Some("The release endpoint may have moved. Check [release] in config.toml")
            }
            Self::Launch { .. } => {
                Some("Ensure the cached artifact is intact, or delete it to force a re-fetch")
            }
            Self::ConfigInvalid { .. } => Some("Fix or remove the config file and retry"),
            _ => None,
        }
    }
}
