//! Blocking extraction.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use tracing::debug;

use super::DirOutcome;
use super::create_dir_error;
use super::not_a_directory;
use super::write_error;
use crate::ArchiveModel;
use crate::ExtractionReport;
use crate::Result;
use crate::extraction::ExtractionPlan;
use crate::types::DestDir;

/// Extracts `model` under `target` with blocking I/O.
///
/// Every entry is checked for containment before the first directory is
/// created. Directories are then created shallowest first; a directory
/// that already exists is reused, so extracting twice into the same root
/// succeeds. Files are written afterwards, overwriting existing files.
///
/// # Errors
///
/// - `ArchiveError::NotFound` if `target` is missing or not a directory
/// - `ArchiveError::PathEscape` if any entry escapes `target`; nothing is
///   written in that case
/// - `ArchiveError::Io` if a directory path is occupied by a file, or a
///   write fails
///
/// # Examples
///
/// ```no_run
/// use ziplocal_core::ArchiveModel;
/// use ziplocal_core::extraction::extract;
///
/// let mut model = ArchiveModel::new();
/// model.insert_file("hello/says-hello", "Hello");
///
/// let report = extract(&model, "/tmp/out")?;
/// assert_eq!(report.files_written, 1);
/// # Ok::<(), ziplocal_core::ArchiveError>(())
/// ```
pub fn extract(model: &ArchiveModel, target: impl AsRef<Path>) -> Result<ExtractionReport> {
    let start = Instant::now();
    let dest = DestDir::new(target)?;
    let plan = ExtractionPlan::build(model, &dest)?;

    let mut report = ExtractionReport::new();
    for dir in plan.directories() {
        match ensure_dir(dir.target.as_path())? {
            DirOutcome::Created => report.directories_created += 1,
            DirOutcome::Reused => report.directories_reused += 1,
        }
    }

    for file in plan.files() {
        let path = file.target.as_path();
        std::fs::write(path, file.data).map_err(|e| write_error(path, &e))?;
        report.files_written += 1;
        report.bytes_written += file.data.len() as u64;
    }

    report.duration = start.elapsed();
    debug!(
        root = %dest.as_path().display(),
        files = report.files_written,
        created = report.directories_created,
        reused = report.directories_reused,
        bytes = report.bytes_written,
        "extracted"
    );
    Ok(report)
}

/// Creates `path` unless a directory is already there.
fn ensure_dir(path: &Path) -> Result<DirOutcome> {
    match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(DirOutcome::Reused),
        Ok(_) => Err(not_a_directory(path)),
        Err(e) if e.kind() == ErrorKind::NotFound => match std::fs::create_dir(path) {
            Ok(()) => Ok(DirOutcome::Created),
            // Lost a race with another writer.
            Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => {
                Ok(DirOutcome::Reused)
            }
            Err(e) => Err(create_dir_error(path, &e)),
        },
        Err(e) => Err(create_dir_error(path, &e)),
    }
}
