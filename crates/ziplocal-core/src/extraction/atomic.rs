//! Atomic archive file output.
//!
//! Archive bytes go to a temporary file next to the destination and are
//! renamed into place, so a failed save never leaves a truncated archive
//! behind.

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tempfile::Builder;
use tracing::debug;

use crate::ArchiveError;
use crate::Result;

/// Writes `bytes` to `path` atomically, replacing any existing file.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// - `ArchiveError::NotFound` if the parent directory does not exist
/// - `ArchiveError::UnsupportedInput` if `path` has no file name
/// - `ArchiveError::Io` if writing or renaming fails
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<u64> {
    if path.file_name().is_none() {
        return Err(ArchiveError::UnsupportedInput {
            reason: format!("{} does not name a file", path.display()),
        });
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = Builder::new()
        .prefix(".ziplocal-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| ArchiveError::from_io(parent, e))?;
    temp.write_all(bytes)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| ArchiveError::from_io(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| ArchiveError::from_io(path, e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote archive");
    Ok(bytes.len() as u64)
}

/// Runs [`write_atomic`] on the blocking thread pool.
///
/// # Errors
///
/// Same as [`write_atomic`], plus `ArchiveError::Io` if the blocking task
/// panics or is cancelled.
pub async fn write_atomic_async(path: PathBuf, bytes: Vec<u8>) -> Result<u64> {
    tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
        .await
        .map_err(|e| {
            ArchiveError::Io(std::io::Error::other(format!(
                "archive write task failed: {e}"
            )))
        })?
}
