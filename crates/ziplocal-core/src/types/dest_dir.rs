//! Validated extraction root.

use crate::ArchiveError;
use crate::Result;
use std::path::Path;
use std::path::PathBuf;

/// A validated extraction root.
///
/// Once constructed, a `DestDir` names an existing directory by its absolute
/// canonical path. Every extraction target is resolved against this path and
/// compared with it, so no step depends on the process working directory.
///
/// # Examples
///
/// ```no_run
/// use ziplocal_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/extraction")?;
/// println!("Extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Validates `path` and canonicalizes it.
    ///
    /// # Errors
    ///
    /// - `ArchiveError::NotFound` if the path does not exist or is not a
    ///   directory
    /// - `ArchiveError::Io` if the path cannot be canonicalized
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| ArchiveError::from_io(path, e))?;
        ensure_directory(path, &metadata)?;

        let canonical = path.canonicalize().map_err(|e| canonicalize_error(path, &e))?;
        Ok(Self(canonical))
    }

    /// Non-blocking counterpart of [`DestDir::new`].
    pub async fn new_async(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ArchiveError::from_io(path, e))?;
        ensure_directory(path, &metadata)?;

        let canonical = tokio::fs::canonicalize(path)
            .await
            .map_err(|e| canonicalize_error(path, &e))?;
        Ok(Self(canonical))
    }

    /// Returns the canonical root.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns `true` if `path` is the root itself or lies beneath it.
    ///
    /// The comparison is component-wise, so `/out-evil` is not inside
    /// `/out`.
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.0)
    }
}

impl AsRef<Path> for DestDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

fn ensure_directory(path: &Path, metadata: &std::fs::Metadata) -> Result<()> {
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(ArchiveError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

fn canonicalize_error(path: &Path, e: &std::io::Error) -> ArchiveError {
    ArchiveError::Io(std::io::Error::new(
        e.kind(),
        format!("failed to canonicalize path {}: {e}", path.display()),
    ))
}
