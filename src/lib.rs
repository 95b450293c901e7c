//! powboot - Bootstrap launcher for the kCTF proof-of-work tool
//!
//! Keeps one prebuilt binary (or interpreted-script fallback) in a per-user
//! cache, fetching it from the release endpoint on first use, then replaces
//! the current process with it, forwarding all arguments verbatim.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod launch;
pub mod orchestrator;
pub mod platform;

pub use error::{PowbootError, PowbootResult};
