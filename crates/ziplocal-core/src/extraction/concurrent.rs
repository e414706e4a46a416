//! Non-blocking extraction with bounded fan-out.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Instant;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::debug;

use super::DirOutcome;
use super::create_dir_error;
use super::not_a_directory;
use super::write_error;
use crate::ArchiveError;
use crate::ArchiveModel;
use crate::ExtractionReport;
use crate::Result;
use crate::extraction::ExtractionPlan;
use crate::types::DestDir;

/// Extracts `model` under `target` with non-blocking I/O.
///
/// Directories are created one at a time, shallowest first, so every file's
/// parent exists before any file write starts. File writes then run
/// concurrently, at most `max_concurrent` at a time, and the function
/// returns only once all of them have completed.
///
/// The first failed write is reported once every write already in flight
/// has finished; their results are discarded. Writes not yet started when
/// the failure is seen are skipped.
///
/// # Errors
///
/// Same as [`extract`](crate::extraction::extract).
pub async fn extract_async(
    model: &ArchiveModel,
    target: impl AsRef<Path>,
    max_concurrent: usize,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let dest = DestDir::new_async(target).await?;
    let plan = ExtractionPlan::build_async(model, &dest).await?;

    let mut report = ExtractionReport::new();
    for dir in plan.directories() {
        match ensure_dir_async(dir.target.as_path()).await? {
            DirOutcome::Created => report.directories_created += 1,
            DirOutcome::Reused => report.directories_reused += 1,
        }
    }

    let failed = &AtomicBool::new(false);
    let mut writes = stream::iter(plan.files())
        .map(|file| async move {
            if failed.load(Ordering::Relaxed) {
                return Ok(None);
            }
            let path = file.target.as_path();
            match tokio::fs::write(path, file.data).await {
                Ok(()) => Ok(Some(file.data.len() as u64)),
                Err(e) => {
                    failed.store(true, Ordering::Relaxed);
                    Err(write_error(path, &e))
                }
            }
        })
        .buffer_unordered(max_concurrent.max(1));

    let mut first_error: Option<ArchiveError> = None;
    while let Some(written) = writes.next().await {
        match written {
            Ok(Some(bytes)) => {
                report.bytes_written += bytes;
                report.files_written += 1;
            }
            Ok(None) => {}
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }

    report.duration = start.elapsed();
    debug!(
        root = %dest.as_path().display(),
        files = report.files_written,
        created = report.directories_created,
        reused = report.directories_reused,
        bytes = report.bytes_written,
        max_concurrent,
        "extracted"
    );
    Ok(report)
}

async fn ensure_dir_async(path: &Path) -> Result<DirOutcome> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => Ok(DirOutcome::Reused),
        Ok(_) => Err(not_a_directory(path)),
        Err(e) if e.kind() == ErrorKind::NotFound => match tokio::fs::create_dir(path).await {
            Ok(()) => Ok(DirOutcome::Created),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                match tokio::fs::metadata(path).await {
                    Ok(metadata) if metadata.is_dir() => Ok(DirOutcome::Reused),
                    _ => Err(create_dir_error(path, &e)),
                }
            }
            Err(e) => Err(create_dir_error(path, &e)),
        },
        Err(e) => Err(create_dir_error(path, &e)),
    }
}
