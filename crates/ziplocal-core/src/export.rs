//! Export handles returned by packing and unpacking.
//!
//! An [`ExportHandle`] owns one [`ArchiveModel`] and decides what
//! [`memory`](ExportHandle::memory) and `save` do with it:
//!
//! | origin     | `memory()`          | `save(target)`                         |
//! |------------|---------------------|----------------------------------------|
//! | `Packed`   | serialized archive  | writes one archive file at `target`    |
//! | `Unpacked` | [`ArchiveView`]     | extracts into directory `target`       |
//!
//! The scheduling mode is part of the type: `ExportHandle<Blocking>` has a
//! blocking `save`, `ExportHandle<NonBlocking>` an `async fn save` whose
//! `Result` is the only error channel.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use tracing::debug;

use crate::ArchiveConfig;
use crate::ArchiveModel;
use crate::Result;
use crate::SaveOutcome;
use crate::extraction;
use crate::formats::ArchiveCodec;
use crate::formats::Compression;
use crate::formats::ZipCodec;
use crate::inspection::ArchiveView;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Blocking {}
    impl Sealed for super::NonBlocking {}
}

/// Scheduling mode of an [`ExportHandle`]. Implemented by [`Blocking`] and
/// [`NonBlocking`] only.
pub trait Mode: sealed::Sealed + Copy + fmt::Debug + Send + Sync + 'static {
    /// `true` for [`NonBlocking`].
    const ASYNC: bool;
}

/// Every filesystem operation completes before `save` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blocking;

/// `save` is an `async fn` running on `tokio::fs`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonBlocking;

impl Mode for Blocking {
    const ASYNC: bool = false;
}

impl Mode for NonBlocking {
    const ASYNC: bool = true;
}

/// Where a handle's model came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Built by packing a path, buffer, or view.
    Packed,
    /// Parsed from existing archive bytes.
    Unpacked,
}

/// Result of [`ExportHandle::memory`].
#[derive(Debug, Clone)]
pub enum Memory<'a> {
    /// Serialized archive bytes of a packed model.
    Archive(Vec<u8>),
    /// Read-only view of an unpacked model.
    View(ArchiveView<'a>),
}

impl<'a> Memory<'a> {
    /// Returns the archive bytes, `None` for a view.
    #[must_use]
    pub fn into_archive(self) -> Option<Vec<u8>> {
        match self {
            Self::Archive(bytes) => Some(bytes),
            Self::View(_) => None,
        }
    }

    /// Returns the view, `None` for archive bytes.
    #[must_use]
    pub fn into_view(self) -> Option<ArchiveView<'a>> {
        match self {
            Self::View(view) => Some(view),
            Self::Archive(_) => None,
        }
    }
}

/// One archive model plus its export policy.
///
/// Created by [`pack`](crate::pack), [`pack_async`](crate::pack_async),
/// [`unpack`](crate::unpack), and [`unpack_async`](crate::unpack_async).
///
/// # Examples
///
/// ```no_run
/// use ziplocal_core::ArchiveConfig;
/// use ziplocal_core::pack;
///
/// let config = ArchiveConfig::default();
/// let outcome = pack("./hello", &config)?.compress().save("./hello.zip")?;
/// println!("{outcome:?}");
/// # Ok::<(), ziplocal_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ExportHandle<M: Mode> {
    model: ArchiveModel,
    origin: Origin,
    compressed: bool,
    config: ArchiveConfig,
    mode: PhantomData<M>,
}

impl<M: Mode> ExportHandle<M> {
    pub(crate) fn new(model: ArchiveModel, origin: Origin, config: ArchiveConfig) -> Self {
        Self {
            model,
            origin,
            compressed: false,
            config,
            mode: PhantomData,
        }
    }

    /// Enables deflate compression for `memory()` and `save`.
    ///
    /// Only packed models are recompressed; on an unpacked handle this is a
    /// no-op.
    #[must_use]
    pub fn compress(mut self) -> Self {
        match self.origin {
            Origin::Packed => self.compressed = true,
            Origin::Unpacked => debug!("compress() ignored for an unpacked archive"),
        }
        self
    }

    /// Returns `true` if compression is enabled.
    #[must_use]
    pub const fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Where the model came from.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Returns `true` for [`NonBlocking`] handles.
    #[must_use]
    pub const fn is_async(&self) -> bool {
        M::ASYNC
    }

    /// Configuration the handle was created with.
    #[must_use]
    pub const fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// The underlying model.
    #[must_use]
    pub const fn model(&self) -> &ArchiveModel {
        &self.model
    }

    /// Mutable access to the underlying model.
    ///
    /// Entries inserted through [`ArchiveModel::insert_file`] get their
    /// parent directories created automatically.
    pub fn model_mut(&mut self) -> &mut ArchiveModel {
        &mut self.model
    }

    /// Consumes the handle and returns its model.
    #[must_use]
    pub fn into_model(self) -> ArchiveModel {
        self.model
    }

    /// Serialized archive bytes for a packed handle, an [`ArchiveView`] for
    /// an unpacked one.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::InvalidArchive` if serialization fails.
    pub fn memory(&self) -> Result<Memory<'_>> {
        match self.origin {
            Origin::Packed => self.serialize().map(Memory::Archive),
            Origin::Unpacked => Ok(Memory::View(ArchiveView::new(&self.model))),
        }
    }

    fn compression(&self) -> Compression {
        if self.compressed {
            Compression::Deflated {
                level: self.config.compression_level,
            }
        } else {
            Compression::Stored
        }
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        ZipCodec::new().serialize(&self.model, self.compression())
    }

    fn log_save(&self, target: &Path) {
        debug!(
            target = %target.display(),
            origin = ?self.origin,
            compressed = self.compressed,
            mode = if M::ASYNC { "non-blocking" } else { "blocking" },
            "saving"
        );
    }
}

impl ExportHandle<Blocking> {
    /// Writes the archive file (packed) or extracts into a directory
    /// (unpacked), blocking until done.
    ///
    /// # Errors
    ///
    /// Packed: `ArchiveError::NotFound` if the parent directory of `target`
    /// is missing, `ArchiveError::Io` if writing fails. No partial archive is
    /// left behind.
    ///
    /// Unpacked: see [`extract`](crate::extraction::extract).
    pub fn save(&self, target: impl AsRef<Path>) -> Result<SaveOutcome> {
        let target = target.as_ref();
        self.log_save(target);
        match self.origin {
            Origin::Packed => {
                let bytes = self.serialize()?;
                let bytes_written = extraction::write_atomic(target, &bytes)?;
                Ok(SaveOutcome::Archive {
                    path: target.to_path_buf(),
                    bytes_written,
                })
            }
            Origin::Unpacked => {
                extraction::extract(&self.model, target).map(SaveOutcome::Extracted)
            }
        }
    }
}

impl ExportHandle<NonBlocking> {
    /// Non-blocking counterpart of `ExportHandle<Blocking>::save`.
    ///
    /// Every failure is returned through the `Result`.
    ///
    /// # Errors
    ///
    /// Same as the blocking `save`.
    pub async fn save(&self, target: impl AsRef<Path>) -> Result<SaveOutcome> {
        let target = target.as_ref();
        self.log_save(target);
        match self.origin {
            Origin::Packed => {
                let bytes = self.serialize()?;
                let bytes_written =
                    extraction::write_atomic_async(target.to_path_buf(), bytes).await?;
                Ok(SaveOutcome::Archive {
                    path: target.to_path_buf(),
                    bytes_written,
                })
            }
            Origin::Unpacked => {
                extraction::extract_async(&self.model, target, self.config.max_concurrent_io)
                    .await
                    .map(SaveOutcome::Extracted)
            }
        }
    }
}
