//! Filesystem tree walking into an [`ArchiveModel`].
//!
//! A directory root is packed relative to itself: packing `hello/` yields
//! `says-hello` and `world/says-world`, not `hello/says-hello`. A file root
//! yields a single entry named after the file.
//!
//! Symlinks and special files below the root are skipped with a warning.

use std::fs::FileType;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::debug;
use tracing::warn;
use walkdir::WalkDir;

use crate::ArchiveError;
use crate::ArchiveModel;
use crate::Result;

/// Walks one root path and builds an [`ArchiveModel`] from it.
///
/// # Examples
///
/// ```no_run
/// use ziplocal_core::creation::TreeWalker;
/// use std::path::Path;
///
/// let model = TreeWalker::new(Path::new("./hello")).walk()?;
/// for entry in model.entries() {
///     println!("{}", entry.name());
/// }
/// # Ok::<(), ziplocal_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TreeWalker<'a> {
    root: &'a Path,
}

impl<'a> TreeWalker<'a> {
    /// Creates a walker for `root`, which may be a file or a directory.
    #[must_use]
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// Walks the tree with blocking I/O.
    ///
    /// Directories are registered before their contents, so empty
    /// directories survive. Siblings are visited in file-name order.
    ///
    /// # Errors
    ///
    /// - `ArchiveError::NotFound` if the root does not exist
    /// - `ArchiveError::UnsupportedInput` if the root is neither a file nor
    ///   a directory, or a name is not valid UTF-8
    /// - `ArchiveError::Io` if listing or reading fails
    pub fn walk(&self) -> Result<ArchiveModel> {
        let root = self.root;
        let metadata = std::fs::metadata(root).map_err(|e| ArchiveError::from_io(root, e))?;

        let mut model = ArchiveModel::new();
        if metadata.is_file() {
            let data = std::fs::read(root).map_err(|e| ArchiveError::from_io(root, e))?;
            model.insert_file(base_name(root)?, data);
            return Ok(model);
        }
        if !metadata.is_dir() {
            return Err(unsupported_root(root));
        }

        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(root, e))?;
            let path = entry.path();
            let file_type = entry.file_type();

            if file_type.is_dir() {
                model.insert_dir(&archive_name(root, path)?);
            } else if file_type.is_file() {
                let data = std::fs::read(path).map_err(|e| ArchiveError::from_io(path, e))?;
                model.insert_file(archive_name(root, path)?, data);
            } else {
                skip_special(path, file_type);
            }
        }

        debug!(root = %root.display(), entries = model.len(), "walked tree");
        Ok(model)
    }

    /// Walks the tree with non-blocking I/O.
    ///
    /// Directory listing is sequential. File reads are dispatched
    /// concurrently, at most `max_concurrent` at a time, and all of them
    /// finish before the model is returned. The first failed read fails the
    /// walk once reads already in flight have completed; reads not yet
    /// started are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`TreeWalker::walk`].
    pub async fn walk_async(&self, max_concurrent: usize) -> Result<ArchiveModel> {
        let root = self.root;
        let metadata = tokio::fs::metadata(root)
            .await
            .map_err(|e| ArchiveError::from_io(root, e))?;

        let mut model = ArchiveModel::new();
        if metadata.is_file() {
            let data = tokio::fs::read(root)
                .await
                .map_err(|e| ArchiveError::from_io(root, e))?;
            model.insert_file(base_name(root)?, data);
            return Ok(model);
        }
        if !metadata.is_dir() {
            return Err(unsupported_root(root));
        }

        let mut pending = vec![root.to_path_buf()];
        let mut files = Vec::new();
        while let Some(dir) = pending.pop() {
            for (path, file_type) in list_dir_async(&dir).await? {
                if file_type.is_dir() {
                    model.insert_dir(&archive_name(root, &path)?);
                    pending.push(path);
                } else if file_type.is_file() {
                    files.push((archive_name(root, &path)?, path));
                } else {
                    skip_special(&path, file_type);
                }
            }
        }

        let file_count = files.len();
        let failed = &AtomicBool::new(false);
        let mut reads = stream::iter(files)
            .map(|(name, path)| async move {
                if failed.load(Ordering::Relaxed) {
                    return Ok(None);
                }
                match tokio::fs::read(&path).await {
                    Ok(data) => Ok(Some((name, data))),
                    Err(e) => {
                        failed.store(true, Ordering::Relaxed);
                        Err(ArchiveError::from_io(&path, e))
                    }
                }
            })
            .buffer_unordered(max_concurrent.max(1));

        let mut first_error: Option<ArchiveError> = None;
        while let Some(read) = reads.next().await {
            match read {
                Ok(Some((name, data))) => model.insert_file(name, data),
                Ok(None) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        debug!(
            root = %root.display(),
            entries = model.len(),
            files = file_count,
            "walked tree"
        );
        Ok(model)
    }
}

/// Lists the children of `dir` with their (non-followed) file types, sorted
/// by path.
async fn list_dir_async(dir: &Path) -> Result<Vec<(PathBuf, FileType)>> {
    let mut read_dir = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| ArchiveError::from_io(dir, e))?;

    let mut children = Vec::new();
    while let Some(child) = read_dir
        .next_entry()
        .await
        .map_err(|e| ArchiveError::from_io(dir, e))?
    {
        let path = child.path();
        let file_type = child
            .file_type()
            .await
            .map_err(|e| ArchiveError::from_io(&path, e))?;
        children.push((path, file_type));
    }

    children.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(children)
}

/// Converts `path` below `root` into a `/`-separated archive name.
fn archive_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ArchiveError::UnsupportedInput {
            reason: format!("{} is not under {}", path.display(), root.display()),
        })?;

    let parts = relative
        .components()
        .map(|component| component.as_os_str().to_str().ok_or_else(|| non_utf8(path)))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("/"))
}

/// Keeps the io kind of a listing failure, so a vanished entry still
/// reports `NotFound`.
fn walk_error(root: &Path, e: walkdir::Error) -> ArchiveError {
    let path = e.path().unwrap_or(root).to_path_buf();
    ArchiveError::from_io(&path, e.into())
}

fn base_name(path: &Path) -> Result<&str> {
    match path.file_name() {
        Some(name) => name.to_str().ok_or_else(|| non_utf8(path)),
        None => Err(ArchiveError::UnsupportedInput {
            reason: format!("cannot determine file name for {}", path.display()),
        }),
    }
}

fn non_utf8(path: &Path) -> ArchiveError {
    ArchiveError::UnsupportedInput {
        reason: format!("path is not valid UTF-8: {}", path.display()),
    }
}

fn unsupported_root(root: &Path) -> ArchiveError {
    ArchiveError::UnsupportedInput {
        reason: format!("{} is neither a file nor a directory", root.display()),
    }
}

fn skip_special(path: &Path, file_type: FileType) {
    let kind = if file_type.is_symlink() {
        "symlink"
    } else {
        "special file"
    };
    warn!(path = %path.display(), kind, "skipping entry");
}
