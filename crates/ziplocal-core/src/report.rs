//! Operation reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Report of an extraction onto disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Number of files written.
    pub files_written: usize,

    /// Number of directories created.
    pub directories_created: usize,

    /// Number of directories that already existed and were reused.
    pub directories_reused: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of directory entries processed, created or reused.
    #[must_use]
    pub fn directories_total(&self) -> usize {
        self.directories_created + self.directories_reused
    }
}

/// What [`ExportHandle::save`](crate::ExportHandle) did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A packed model was written as a single archive file.
    Archive {
        /// Path of the archive file.
        path: PathBuf,
        /// Size of the archive in bytes.
        bytes_written: u64,
    },
    /// An unpacked model was extracted into a directory.
    Extracted(ExtractionReport),
}

impl SaveOutcome {
    /// Returns the archive path for [`SaveOutcome::Archive`].
    #[must_use]
    pub fn archive_path(&self) -> Option<&Path> {
        match self {
            Self::Archive { path, .. } => Some(path),
            Self::Extracted(_) => None,
        }
    }

    /// Returns the extraction report for [`SaveOutcome::Extracted`].
    #[must_use]
    pub const fn extraction_report(&self) -> Option<&ExtractionReport> {
        match self {
            Self::Extracted(report) => Some(report),
            Self::Archive { .. } => None,
        }
    }
}
