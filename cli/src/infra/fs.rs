//! Filesystem infrastructure. Implements the `LocalFs` port for `SystemHost`.
//!
//! Nothing here follows a symlink in the final path component. Files are
//! replaced through a staging file and `rename`, so a link planted at the
//! destination is swapped out rather than written through.

use std::fs::{DirBuilder, File, FileTimes, Permissions};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nix::fcntl::OFlag;

use crate::application::ports::LocalFs;
use crate::infra::accounts::SystemHost;

impl LocalFs for SystemHost {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn create_dir(&self, path: &Path, mode: u32) -> Result<()> {
        create_dir(path, mode)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        copy_preserving(from, to)
    }

    fn replace(&self, path: &Path, content: &[u8], mode: u32) -> Result<()> {
        replace_file(path, content, mode)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        set_permissions(path, mode)
    }
}

/// Create `path` and any missing parents with `mode`; an existing directory is left as is.
///
/// # Errors
///
/// Returns an error if `path` is a symlink or the directory cannot be created.
pub fn create_dir(path: &Path, mode: u32) -> Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            anyhow::bail!("{} is a symlink", path.display())
        }
        Ok(meta) if meta.is_dir() => return Ok(()),
        _ => {}
    }
    DirBuilder::new()
        .recursive(true)
        .mode(mode)
        .create(path)
        .with_context(|| format!("creating directory {}", path.display()))
}

/// Replace `path` with a new regular file holding `content` at `mode`.
///
/// # Errors
///
/// Returns an error if the staging file cannot be written or renamed into place.
pub fn replace_file(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    write_replacing(path, content, mode, None)
}

/// Copy a regular file to `to` with its permission bits and timestamps.
///
/// # Errors
///
/// Returns an error if `from` is a symlink or not a regular file, or if the
/// copy cannot be written.
pub fn copy_preserving(from: &Path, to: &Path) -> Result<()> {
    let copy = || -> Result<()> {
        let mut src = open_nofollow(from)?;
        let meta = src.metadata()?;
        anyhow::ensure!(meta.is_file(), "{} is not a regular file", from.display());
        let mut content = Vec::new();
        src.read_to_end(&mut content)?;
        let times = match (meta.accessed(), meta.modified()) {
            (Ok(accessed), Ok(modified)) => Some(
                FileTimes::new()
                    .set_accessed(accessed)
                    .set_modified(modified),
            ),
            _ => None,
        };
        write_replacing(to, &content, meta.permissions().mode() & 0o7777, times)
    };
    copy().with_context(|| format!("copying {} to {}", from.display(), to.display()))
}

/// Set Unix permission bits on `path`, which must not be a symlink.
///
/// # Errors
///
/// Returns an error if `path` is a symlink or the permissions cannot be changed.
pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    open_nofollow(path)
        .and_then(|file| file.set_permissions(Permissions::from_mode(mode)))
        .with_context(|| format!("setting permissions on {}", path.display()))
}

/// Read-only handle on `path` itself. `O_NONBLOCK` keeps a planted FIFO from hanging the run.
fn open_nofollow(path: &Path) -> std::io::Result<File> {
    File::options()
        .read(true)
        .custom_flags((OFlag::O_NOFOLLOW | OFlag::O_NONBLOCK).bits())
        .open(path)
}

fn staging_path(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(path.with_file_name(format!(".{}.gridbanner-tmp", name.to_string_lossy())))
}

fn write_replacing(
    path: &Path,
    content: &[u8],
    mode: u32,
    times: Option<FileTimes>,
) -> Result<()> {
    let staging = staging_path(path)?;
    // Leftover from an interrupted run; removing a symlink removes only the link.
    match std::fs::remove_file(&staging) {
        Err(e) if e.kind() != ErrorKind::NotFound => {
            return Err(e).with_context(|| format!("removing {}", staging.display()));
        }
        _ => {}
    }

    let write = || -> std::io::Result<()> {
        let mut file = File::options()
            .write(true)
            .create_new(true)
            .mode(mode)
            .custom_flags(OFlag::O_NOFOLLOW.bits())
            .open(&staging)?;
        file.write_all(content)?;
        // The creation mode is filtered by the umask.
        file.set_permissions(Permissions::from_mode(mode))?;
        if let Some(Err(e)) = times.map(|t| file.set_times(t)) {
            tracing::debug!(path = %path.display(), error = %e, "timestamps not preserved");
        }
        file.sync_all()?;
        std::fs::rename(&staging, path)
    };
    let result = write();
    if result.is_err() {
        let _ = std::fs::remove_file(&staging);
    }
    result.with_context(|| format!("writing {}", path.display()))
}
