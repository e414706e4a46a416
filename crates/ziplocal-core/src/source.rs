//! Inputs accepted by packing and unpacking.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ArchiveError;
use crate::ArchiveModel;
use crate::Result;
use crate::inspection::ArchiveView;

/// What to pack.
///
/// # Examples
///
/// ```
/// use ziplocal_core::PackSource;
///
/// let from_disk = PackSource::from("./hello");
/// let from_memory = PackSource::buffer("notes/today.txt", "remember the milk");
/// # let _ = (from_disk, from_memory);
/// ```
#[derive(Debug, Clone)]
pub enum PackSource<'a> {
    /// A file or directory on disk.
    Path(PathBuf),
    /// An in-memory payload stored as a single file entry named `name`.
    Buffer {
        /// Entry name, `/`-separated and relative.
        name: String,
        /// File contents.
        data: Vec<u8>,
    },
    /// The contents of an already loaded archive, re-packed without disk I/O.
    View(ArchiveView<'a>),
}

impl PackSource<'_> {
    /// Creates a [`PackSource::Buffer`].
    #[must_use]
    pub fn buffer(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Buffer {
            name: name.into(),
            data: data.into(),
        }
    }
}

impl From<&Path> for PackSource<'_> {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for PackSource<'_> {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&str> for PackSource<'_> {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl<'a> From<ArchiveView<'a>> for PackSource<'a> {
    fn from(view: ArchiveView<'a>) -> Self {
        Self::View(view)
    }
}

/// What to unpack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnpackSource {
    /// Path to an archive file.
    Path(PathBuf),
    /// Archive bytes already in memory.
    Buffer(Vec<u8>),
}

impl From<&Path> for UnpackSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for UnpackSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&str> for UnpackSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for UnpackSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Buffer(bytes)
    }
}

impl From<&[u8]> for UnpackSource {
    fn from(bytes: &[u8]) -> Self {
        Self::Buffer(bytes.to_vec())
    }
}

/// Builds the model for a buffer source: one file entry plus its ancestors.
pub(crate) fn buffer_model(name: &str, data: Vec<u8>) -> Result<ArchiveModel> {
    let plain = !name.is_empty()
        && !name.ends_with('/')
        && Path::new(name)
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if !plain {
        return Err(ArchiveError::UnsupportedInput {
            reason: format!("buffer name must be a relative file path: {name:?}"),
        });
    }

    let mut model = ArchiveModel::new();
    model.insert_file(name, data);
    Ok(model)
}
