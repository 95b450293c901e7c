//! Single-slot artifact cache
//!
//! One slot per artifact kind under a single cache directory, so the native
//! binary and the script fallback coexist without collision. Writes are
//! staged to a temporary file in the same directory and renamed into place,
//! so a reader never observes a partially written artifact. There is no
//! cross-process locking: concurrent writers race and the last rename wins,
//! which is acceptable since either version is valid.

use crate::error::{PowbootError, PowbootResult};
use crate::platform::ArtifactKind;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Slot file name for the native binary
const NATIVE_SLOT: &str = "kctf";

/// Slot file name for the script fallback
const SCRIPT_SLOT: &str = "kctf.py";

/// Contents of a cache slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    NativeBinary,
    ScriptFallback,
    Empty,
}

/// A cache slot as observed at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSlot {
    pub path: PathBuf,
    pub kind: SlotKind,
    pub executable: bool,
}

impl CacheSlot {
    fn empty(path: PathBuf) -> Self {
        Self {
            path,
            kind: SlotKind::Empty,
            executable: false,
        }
    }

    /// Slot path when the slot holds a usable artifact
    pub fn ready(&self) -> Option<&Path> {
        match self.kind {
            SlotKind::Empty => None,
            _ => Some(&self.path),
        }
    }
}

/// Filesystem cache holding the most recently installed artifacts
pub struct ArtifactCache {
    dir: PathBuf,
}

impl ArtifactCache {
    /// Create a cache rooted at `dir`. Nothing is touched on disk until
    /// the first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Slot path for an artifact kind
    pub fn slot_path(&self, kind: ArtifactKind) -> PathBuf {
        match kind {
            ArtifactKind::NativeBinary => self.dir.join(NATIVE_SLOT),
            ArtifactKind::ScriptFallback => self.dir.join(SCRIPT_SLOT),
        }
    }

    /// Read a slot. Never fails: absent files, unreadable metadata and a
    /// native binary without its executable bit all report `Empty`.
    pub fn read(&self, kind: ArtifactKind) -> CacheSlot {
        let path = self.slot_path(kind);

        let metadata = match fs::metadata(&path) {
            Ok(m) if m.is_file() => m,
            _ => return CacheSlot::empty(path),
        };

        let executable = is_executable(&metadata);
        if kind == ArtifactKind::NativeBinary && !executable {
            debug!("slot {} present but not executable", path.display());
            return CacheSlot::empty(path);
        }

        debug!("cache hit at {}", path.display());
        CacheSlot {
            path,
            kind: match kind {
                ArtifactKind::NativeBinary => SlotKind::NativeBinary,
                ArtifactKind::ScriptFallback => SlotKind::ScriptFallback,
            },
            executable,
        }
    }

    /// Install artifact bytes into the slot for `kind`.
    ///
    /// Stages to a temporary file in the slot's directory, sets the
    /// executable bit for native binaries, then renames onto the slot path.
    pub fn write(&self, bytes: &[u8], kind: ArtifactKind) -> PowbootResult<CacheSlot> {
        fs::create_dir_all(&self.dir).map_err(|e| PowbootError::CacheDirCreate {
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.slot_path(kind);
        let staging = self.staging_path(&path);

        fs::write(&staging, bytes).map_err(|e| PowbootError::Stage {
            path: staging.clone(),
            source: e,
        })?;

        let executable = kind == ArtifactKind::NativeBinary;
        if executable {
            if let Err(e) = set_executable(&staging) {
                let _ = fs::remove_file(&staging);
                return Err(PowbootError::Stage {
                    path: staging,
                    source: e,
                });
            }
        }

        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(PowbootError::Install { path, source: e });
        }

        debug!("installed {} byte artifact at {}", bytes.len(), path.display());
        Ok(CacheSlot {
            path,
            kind: match kind {
                ArtifactKind::NativeBinary => SlotKind::NativeBinary,
                ArtifactKind::ScriptFallback => SlotKind::ScriptFallback,
            },
            executable,
        })
    }

    // Same directory as the slot so the final rename never crosses a
    // filesystem boundary. The pid suffix keeps concurrent writers from
    // clobbering each other's staging file.
    fn staging_path(&self, slot: &Path) -> PathBuf {
        let name = slot
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact".to_string());
        self.dir
            .join(format!(".{}.{}.tmp", name, std::process::id()))
    }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
