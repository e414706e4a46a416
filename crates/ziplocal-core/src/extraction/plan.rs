//! Extraction planning.
//!
//! A plan resolves every entry of a model against the extraction root
//! before anything is written. Building the plan is the containment check:
//! a single escaping entry fails the whole plan, so no extraction starts
//! with a zip-slip entry in it.

use tracing::debug;

use crate::ArchiveModel;
use crate::Result;
use crate::types::ContainedPath;
use crate::types::DestDir;

/// A directory to create (or reuse).
#[derive(Debug, Clone)]
pub struct PlannedDirectory<'a> {
    /// Entry name in the archive.
    pub name: &'a str,
    /// Validated target on disk.
    pub target: ContainedPath,
}

/// A file to write.
#[derive(Debug, Clone)]
pub struct PlannedFile<'a> {
    /// Entry name in the archive.
    pub name: &'a str,
    /// Validated target on disk.
    pub target: ContainedPath,
    /// Payload, borrowed from the model.
    pub data: &'a [u8],
}

/// Every entry of one model, resolved and partitioned for extraction.
///
/// Directories are ordered by ascending depth so a parent is always created
/// before its children. File order carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct ExtractionPlan<'a> {
    directories: Vec<PlannedDirectory<'a>>,
    files: Vec<PlannedFile<'a>>,
}

impl<'a> ExtractionPlan<'a> {
    /// Builds the plan, checking containment lexically and against what is
    /// already on disk.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::PathEscape` for the first entry that would
    /// land outside `dest`.
    pub fn build(model: &'a ArchiveModel, dest: &DestDir) -> Result<Self> {
        let plan = Self::resolve(model, dest)?;
        for (name, target) in plan.targets() {
            target.verify_on_disk(name, dest)?;
        }
        Ok(plan)
    }

    /// Non-blocking counterpart of [`ExtractionPlan::build`].
    pub async fn build_async(model: &'a ArchiveModel, dest: &DestDir) -> Result<Self> {
        let plan = Self::resolve(model, dest)?;
        for (name, target) in plan.targets() {
            target.verify_on_disk_async(name, dest).await?;
        }
        Ok(plan)
    }

    /// Lexical resolution and partitioning. Touches no files.
    pub fn resolve(model: &'a ArchiveModel, dest: &DestDir) -> Result<Self> {
        let mut plan = Self::default();
        for entry in model.entries() {
            let target = ContainedPath::resolve(entry.name(), dest)?;
            match entry.data() {
                Some(data) => plan.files.push(PlannedFile {
                    name: entry.name(),
                    target,
                    data,
                }),
                None => plan.directories.push(PlannedDirectory {
                    name: entry.name(),
                    target,
                }),
            }
        }

        plan.directories.sort_by_key(|dir| dir.target.depth());

        debug!(
            root = %dest.as_path().display(),
            directories = plan.directories.len(),
            files = plan.files.len(),
            "planned extraction"
        );
        Ok(plan)
    }

    /// Directories, shallowest first.
    #[must_use]
    pub fn directories(&self) -> &[PlannedDirectory<'a>] {
        &self.directories
    }

    /// Files, in no particular order.
    #[must_use]
    pub fn files(&self) -> &[PlannedFile<'a>] {
        &self.files
    }

    fn targets(&self) -> impl Iterator<Item = (&'a str, &ContainedPath)> {
        self.directories
            .iter()
            .map(|dir| (dir.name, &dir.target))
            .chain(self.files.iter().map(|file| (file.name, &file.target)))
    }
}
