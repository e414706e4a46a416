//! Extraction of an [`ArchiveModel`](crate::ArchiveModel) onto disk, and
//! archive file output.

pub mod atomic;
pub mod concurrent;
pub mod engine;
pub mod plan;

pub use atomic::write_atomic;
pub use atomic::write_atomic_async;
pub use concurrent::extract_async;
pub use engine::extract;
pub use plan::ExtractionPlan;

use std::io;
use std::path::Path;

use crate::ArchiveError;

/// Whether a directory entry needed creating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirOutcome {
    Created,
    Reused,
}

fn not_a_directory(path: &Path) -> ArchiveError {
    ArchiveError::Io(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} exists and is not a directory", path.display()),
    ))
}

fn write_error(path: &Path, e: &io::Error) -> ArchiveError {
    ArchiveError::Io(io::Error::new(
        e.kind(),
        format!("failed to write {}: {e}", path.display()),
    ))
}

fn create_dir_error(path: &Path, e: &io::Error) -> ArchiveError {
    ArchiveError::Io(io::Error::new(
        e.kind(),
        format!("failed to create directory {}: {e}", path.display()),
    ))
}
