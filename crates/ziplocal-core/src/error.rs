//! Error types for packing, unpacking, and extraction operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can occur while packing, unpacking, or saving an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A source path, extraction root, or archive entry does not exist.
    #[error("{} doesn't exist", path.display())]
    NotFound {
        /// The missing path or entry name.
        path: PathBuf,
    },

    /// An archive entry resolves outside the extraction root (zip-slip).
    #[error("entry is outside the extraction path: {entry}")]
    PathEscape {
        /// The offending entry name, as stored in the archive.
        entry: String,
    },

    /// Packing or unpacking was given an input it cannot use.
    #[error("unsupported input: {reason}")]
    UnsupportedInput {
        /// Why the input was rejected.
        reason: String,
    },

    /// An `ArchiveView` read was requested in an unknown format.
    #[error("unrecognized read kind: {kind}")]
    UnsupportedKind {
        /// The requested kind.
        kind: String,
    },

    /// Archive bytes could not be parsed or written by the codec.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Configuration failed validation.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },
}

impl ArchiveError {
    /// Returns `true` if this error represents a security violation.
    ///
    /// Only containment violations count: an archive that tries to write
    /// outside the extraction root.
    ///
    /// # Examples
    ///
    /// ```
    /// use ziplocal_core::ArchiveError;
    ///
    /// let err = ArchiveError::PathEscape {
    ///     entry: "../etc/passwd".to_string(),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ArchiveError::InvalidArchive("truncated".to_string());
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::PathEscape { .. })
    }

    /// Returns `true` if this error reports something missing.
    ///
    /// Covers both [`ArchiveError::NotFound`] and I/O errors whose kind is
    /// `NotFound`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use ziplocal_core::ArchiveError;
    ///
    /// let err = ArchiveError::InvalidArchive("bad header".to_string());
    /// assert_eq!(err.context(), Some("bad header"));
    ///
    /// let err = ArchiveError::PathEscape {
    ///     entry: "../x".to_string(),
    /// };
    /// assert_eq!(err.context(), None);
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) => Some(msg),
            Self::UnsupportedInput { reason } | Self::InvalidConfig { reason } => Some(reason),
            _ => None,
        }
    }

    /// Maps an I/O error on `path` to `NotFound` when the path is missing,
    /// otherwise wraps it with the path for context.
    pub(crate) fn from_io(path: &std::path::Path, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {e}", path.display()),
            ))
        }
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}
