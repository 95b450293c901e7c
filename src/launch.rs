//! Process replacement
//!
//! The final stage of every run. On success the launcher's process image is
//! replaced by the artifact: same PID, inherited stdio, and the exit code
//! seen by the parent is the artifact's own. `launch` therefore never
//! returns `Ok` with an inhabited value; treat the call as the last
//! statement of the program.

use crate::error::{PowbootError, PowbootResult};
use crate::platform::ArtifactKind;
use std::convert::Infallible;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Everything the launcher needs, constructed once and consumed exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub artifact: PathBuf,
    pub kind: ArtifactKind,
    pub forwarded_args: Vec<String>,
}

impl LaunchRequest {
    pub fn new(artifact: PathBuf, kind: ArtifactKind, forwarded_args: Vec<String>) -> Self {
        Self {
            artifact,
            kind,
            forwarded_args,
        }
    }
}

/// Replaces the current process with the artifact
pub struct Launcher {
    interpreter: String,
}

impl Launcher {
    /// `interpreter` runs script-fallback artifacts, e.g. `python3`
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    /// Hand the process over to the artifact.
    ///
    /// Native binaries are executed directly with the forwarded arguments as
    /// their argument vector. Script fallbacks are executed through the
    /// interpreter with the artifact path prepended to the forwarded
    /// arguments. Returns only when execution could not begin; there is no
    /// further fallback after that.
    pub fn launch(&self, request: LaunchRequest) -> PowbootResult<Infallible> {
        let (program, mut command) = match request.kind {
            ArtifactKind::NativeBinary => {
                let mut command = Command::new(&request.artifact);
                command.args(&request.forwarded_args);
                (request.artifact.display().to_string(), command)
            }
            ArtifactKind::ScriptFallback => {
                let mut command = Command::new(&self.interpreter);
                command.arg(&request.artifact).args(&request.forwarded_args);
                (self.interpreter.clone(), command)
            }
        };

        debug!("replacing process with {}", program);
        let source = replace_process(&mut command);
        Err(PowbootError::launch(program, source))
    }
}

/// Exec-style control transfer. Returns only the error that prevented the
/// replacement from happening.
#[cfg(unix)]
fn replace_process(command: &mut Command) -> std::io::Error {
    use std::os::unix::process::CommandExt as _;
    command.exec()
}

/// Closest equivalent where execvp is unavailable: run the artifact as a
/// child and exit with its code, keeping stdio inherited.
#[cfg(not(unix))]
fn replace_process(command: &mut Command) -> std::io::Error {
    match command.status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(e) => e,
    }
}
