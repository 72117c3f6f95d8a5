//! Reading inputs and writing artifacts.
//!
//! Artifacts are staged as temp files in their destination directory and only
//! renamed into place once every artifact of a run has been written, so a
//! failed run never leaves a half-written cipher file or key file behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{FcrError, FcrResult};

/// Read an input file, mapping a missing file to [`FcrError::NotFound`].
pub fn read_input(path: &Path) -> FcrResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FcrError::NotFound(path.to_path_buf()),
        _ => FcrError::Io(e),
    })
}

/// Fail with [`FcrError::AlreadyExists`] if `path` exists and `force` is off.
pub fn ensure_writable(path: &Path, force: bool) -> FcrResult<()> {
    if !force && path.exists() {
        return Err(FcrError::AlreadyExists(path.to_path_buf()));
    }
    Ok(())
}

/// Writes a set of artifacts all-or-nothing.
#[derive(Debug)]
pub struct ArtifactWriter {
    force: bool,
    file_mode: u32,
    staged: Vec<(NamedTempFile, PathBuf)>,
}

impl ArtifactWriter {
    pub fn new(force: bool, file_mode: u32) -> Self {
        Self {
            force,
            file_mode,
            staged: Vec::new(),
        }
    }

    /// Write `bytes` to a temp file next to `dest`.
    pub fn stage(&mut self, dest: &Path, bytes: &[u8]) -> FcrResult<()> {
        ensure_writable(dest, self.force)?;

        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        set_mode(tmp.path(), self.file_mode)?;

        self.staged.push((tmp, dest.to_path_buf()));
        Ok(())
    }

    /// Move every staged file into place. Returns the written paths in
    /// staging order.
    pub fn commit(self) -> FcrResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.staged.len());
        for (tmp, dest) in self.staged {
            let persisted = if self.force {
                tmp.persist(&dest)
            } else {
                tmp.persist_noclobber(&dest)
            };
            persisted.map_err(|e| {
                if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                    FcrError::AlreadyExists(dest.clone())
                } else {
                    FcrError::Io(e.error)
                }
            })?;
            tracing::info!("wrote {}", dest.display());
            written.push(dest);
        }
        Ok(written)
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> FcrResult<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> FcrResult<()> {
    Ok(())
}
