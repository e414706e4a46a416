//! High-level public API for packing and unpacking.

use std::path::Path;

use tracing::debug;

use crate::ArchiveConfig;
use crate::ArchiveError;
use crate::ArchiveModel;
use crate::ExportHandle;
use crate::PackSource;
use crate::Result;
use crate::UnpackSource;
use crate::creation::TreeWalker;
use crate::export::Blocking;
use crate::export::NonBlocking;
use crate::export::Origin;
use crate::formats::ArchiveCodec;
use crate::formats::ZipCodec;
use crate::source::buffer_model;

/// Packs a file, directory, buffer, or view into a new archive model.
///
/// A directory is packed relative to itself; a single file becomes one
/// entry named after the file.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - The source path doesn't exist (`ArchiveError::NotFound`)
/// - The source is unusable (`ArchiveError::UnsupportedInput`)
/// - Reading the source fails
///
/// # Examples
///
/// ```no_run
/// use ziplocal_core::ArchiveConfig;
/// use ziplocal_core::pack;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ArchiveConfig::default();
/// let handle = pack("./hello", &config)?;
/// handle.compress().save("./hello.zip")?;
/// # Ok(())
/// # }
/// ```
pub fn pack<'a>(
    source: impl Into<PackSource<'a>>,
    config: &ArchiveConfig,
) -> Result<ExportHandle<Blocking>> {
    config.validate()?;
    let model = match source.into() {
        PackSource::Path(path) => TreeWalker::new(&path).walk()?,
        PackSource::Buffer { name, data } => buffer_model(&name, data)?,
        PackSource::View(view) => view.model().clone(),
    };
    debug!(entries = model.len(), mode = "blocking", "packed");
    Ok(ExportHandle::new(model, Origin::Packed, config.clone()))
}

/// Non-blocking counterpart of [`pack`].
///
/// File reads fan out up to `config.max_concurrent_io` at a time.
///
/// # Errors
///
/// Same as [`pack`].
pub async fn pack_async<'a>(
    source: impl Into<PackSource<'a>>,
    config: &ArchiveConfig,
) -> Result<ExportHandle<NonBlocking>> {
    config.validate()?;
    let model = match source.into() {
        PackSource::Path(path) => {
            TreeWalker::new(&path)
                .walk_async(config.max_concurrent_io)
                .await?
        }
        PackSource::Buffer { name, data } => buffer_model(&name, data)?,
        PackSource::View(view) => view.model().clone(),
    };
    debug!(entries = model.len(), mode = "non-blocking", "packed");
    Ok(ExportHandle::new(model, Origin::Packed, config.clone()))
}

/// Loads an existing zip archive from a path or from memory.
///
/// Entry names are kept as stored; they are checked for containment when
/// the handle is saved.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - The archive path doesn't exist (`ArchiveError::NotFound`)
/// - The archive path is a directory (`ArchiveError::UnsupportedInput`)
/// - The bytes are not a zip archive (`ArchiveError::InvalidArchive`)
///
/// # Examples
///
/// ```no_run
/// use ziplocal_core::ArchiveConfig;
/// use ziplocal_core::unpack;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let handle = unpack("./hello.zip", &ArchiveConfig::default())?;
/// let report = handle.save("./out")?;
/// println!("{report:?}");
/// # Ok(())
/// # }
/// ```
pub fn unpack(
    source: impl Into<UnpackSource>,
    config: &ArchiveConfig,
) -> Result<ExportHandle<Blocking>> {
    config.validate()?;
    let bytes = match source.into() {
        UnpackSource::Path(path) => {
            let metadata =
                std::fs::metadata(&path).map_err(|e| ArchiveError::from_io(&path, e))?;
            ensure_archive_file(&path, metadata.is_dir())?;
            std::fs::read(&path).map_err(|e| ArchiveError::from_io(&path, e))?
        }
        UnpackSource::Buffer(bytes) => bytes,
    };
    let model = parse(&bytes)?;
    debug!(entries = model.len(), mode = "blocking", "unpacked");
    Ok(ExportHandle::new(model, Origin::Unpacked, config.clone()))
}

/// Non-blocking counterpart of [`unpack`].
///
/// # Errors
///
/// Same as [`unpack`].
pub async fn unpack_async(
    source: impl Into<UnpackSource>,
    config: &ArchiveConfig,
) -> Result<ExportHandle<NonBlocking>> {
    config.validate()?;
    let bytes = match source.into() {
        UnpackSource::Path(path) => {
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|e| ArchiveError::from_io(&path, e))?;
            ensure_archive_file(&path, metadata.is_dir())?;
            tokio::fs::read(&path)
                .await
                .map_err(|e| ArchiveError::from_io(&path, e))?
        }
        UnpackSource::Buffer(bytes) => bytes,
    };
    let model = parse(&bytes)?;
    debug!(entries = model.len(), mode = "non-blocking", "unpacked");
    Ok(ExportHandle::new(model, Origin::Unpacked, config.clone()))
}

fn ensure_archive_file(path: &Path, is_dir: bool) -> Result<()> {
    if is_dir {
        return Err(ArchiveError::UnsupportedInput {
            reason: format!("{} is a directory, expected an archive file", path.display()),
        });
    }
    Ok(())
}

fn parse(bytes: &[u8]) -> Result<ArchiveModel> {
    ZipCodec::new().parse(bytes)
}
