//! Extraction targets proven to stay inside the extraction root.

use crate::ArchiveError;
use crate::Result;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use super::DestDir;

/// An archive entry name resolved against a [`DestDir`] and verified not to
/// escape it.
///
/// # Security Properties
///
/// - Can ONLY be constructed through [`ContainedPath::resolve`]
/// - Resolution is lexical: `.` is dropped, `..` removes the previous
///   component, and a `..` with nothing left to remove escapes
/// - Absolute names, root components, and drive prefixes always escape
/// - The absolute result must start with the canonical root
///
/// Lexical resolution cannot see symlinks already present under the root.
/// [`ContainedPath::verify_on_disk`] closes that gap by canonicalizing the
/// nearest existing ancestor of the target.
///
/// # Examples
///
/// ```no_run
/// use ziplocal_core::types::ContainedPath;
/// use ziplocal_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp")?;
///
/// let target = ContainedPath::resolve("hello/world/says-world", &dest)?;
/// assert!(target.as_path().starts_with(dest.as_path()));
///
/// assert!(ContainedPath::resolve("../etc/passwd", &dest).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainedPath {
    relative: PathBuf,
    absolute: PathBuf,
}

impl ContainedPath {
    /// Resolves `name` under `dest` and checks containment.
    ///
    /// Does not touch the filesystem.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::PathEscape` if the resolved path is not the
    /// root itself or a descendant of it.
    pub fn resolve(name: &str, dest: &DestDir) -> Result<Self> {
        let mut relative = PathBuf::new();
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !relative.pop() {
                        return Err(escape(name));
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(escape(name)),
            }
        }

        let absolute = dest.as_path().join(&relative);
        if !dest.contains(&absolute) {
            return Err(escape(name));
        }

        Ok(Self { relative, absolute })
    }

    /// Checks that no symlink already on disk redirects this target outside
    /// `dest`.
    ///
    /// The nearest existing ancestor of the target (the target itself when it
    /// exists) is canonicalized and must lie within the root. A dangling
    /// symlink on the way up is rejected, since writing through it would
    /// create its missing target wherever that is.
    ///
    /// # Errors
    ///
    /// - `ArchiveError::PathEscape` if the canonical location escapes, or a
    ///   component is a symlink that does not resolve
    /// - `ArchiveError::Io` if canonicalization fails for a reason other
    ///   than a missing component
    pub fn verify_on_disk(&self, name: &str, dest: &DestDir) -> Result<()> {
        let mut ancestor = self.absolute.as_path();
        loop {
            match ancestor.canonicalize() {
                Ok(real) => return check_canonical(&real, name, dest),
                Err(e) if is_missing(&e) => {
                    if ancestor
                        .symlink_metadata()
                        .is_ok_and(|metadata| metadata.file_type().is_symlink())
                    {
                        return Err(escape(name));
                    }
                    match ancestor.parent() {
                        Some(parent) if dest.contains(parent) => ancestor = parent,
                        _ => return Ok(()),
                    }
                }
                Err(e) => return Err(ArchiveError::from_io(ancestor, e)),
            }
        }
    }

    /// Non-blocking counterpart of [`ContainedPath::verify_on_disk`].
    pub async fn verify_on_disk_async(&self, name: &str, dest: &DestDir) -> Result<()> {
        let mut ancestor = self.absolute.as_path();
        loop {
            match tokio::fs::canonicalize(ancestor).await {
                Ok(real) => return check_canonical(&real, name, dest),
                Err(e) if is_missing(&e) => {
                    if tokio::fs::symlink_metadata(ancestor)
                        .await
                        .is_ok_and(|metadata| metadata.file_type().is_symlink())
                    {
                        return Err(escape(name));
                    }
                    match ancestor.parent() {
                        Some(parent) if dest.contains(parent) => ancestor = parent,
                        _ => return Ok(()),
                    }
                }
                Err(e) => return Err(ArchiveError::from_io(ancestor, e)),
            }
        }
    }

    /// Absolute target path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.absolute
    }

    /// Normalized path relative to the root.
    #[must_use]
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Number of components below the root. The root itself has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.relative.components().count()
    }
}

fn check_canonical(real: &Path, name: &str, dest: &DestDir) -> Result<()> {
    if dest.contains(real) {
        Ok(())
    } else {
        Err(escape(name))
    }
}

fn escape(name: &str) -> ArchiveError {
    ArchiveError::PathEscape {
        entry: name.to_owned(),
    }
}

fn is_missing(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dest() -> (TempDir, DestDir) {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::new(temp.path()).unwrap();
        (temp, dest)
    }

    #[test]
    fn test_resolve_nested() {
        let (_temp, dest) = create_test_dest();
        let target = ContainedPath::resolve("hello/world/says-world", &dest).unwrap();
        assert_eq!(target.relative(), Path::new("hello/world/says-world"));
        assert_eq!(target.as_path(), dest.as_path().join("hello/world/says-world"));
        assert_eq!(target.depth(), 3);
    }

    #[test]
    fn test_resolve_directory_name() {
        let (_temp, dest) = create_test_dest();
        let target = ContainedPath::resolve("world/", &dest).unwrap();
        assert_eq!(target.relative(), Path::new("world"));
        assert_eq!(target.depth(), 1);
    }

    #[test]
    fn test_resolve_parent_traversal_rejected() {
        let (_temp, dest) = create_test_dest();
        for name in ["../evil.txt", "a/../../evil.txt", "a/b/../../../etc/passwd", ".."] {
            let result = ContainedPath::resolve(name, &dest);
            assert!(
                matches!(result, Err(ArchiveError::PathEscape { ref entry }) if entry == name),
                "{name} should escape"
            );
        }
    }

    #[test]
    fn test_resolve_inner_parent_allowed() {
        let (_temp, dest) = create_test_dest();
        let target = ContainedPath::resolve("a/../b.txt", &dest).unwrap();
        assert_eq!(target.relative(), Path::new("b.txt"));
    }

    #[test]
    fn test_resolve_equal_to_root_allowed() {
        let (_temp, dest) = create_test_dest();
        let target = ContainedPath::resolve("a/..", &dest).unwrap();
        assert_eq!(target.as_path(), dest.as_path());
        assert_eq!(target.depth(), 0);

        let target = ContainedPath::resolve("./", &dest).unwrap();
        assert_eq!(target.depth(), 0);
    }

    #[test]
    fn test_resolve_absolute_rejected() {
        let (_temp, dest) = create_test_dest();
        let result = ContainedPath::resolve("/etc/passwd", &dest);
        assert!(matches!(result, Err(ArchiveError::PathEscape { .. })));
    }

    #[test]
    fn test_resolve_current_dir_normalized() {
        let (_temp, dest) = create_test_dest();
        let target = ContainedPath::resolve("./foo/./bar.txt", &dest).unwrap();
        assert_eq!(target.relative(), Path::new("foo/bar.txt"));
    }

    #[test]
    fn test_verify_on_disk_fresh_target() {
        let (_temp, dest) = create_test_dest();
        let target = ContainedPath::resolve("a/b/c.txt", &dest).unwrap();
        assert!(target.verify_on_disk("a/b/c.txt", &dest).is_ok());
    }

    #[test]
    fn test_verify_on_disk_existing_target() {
        let (temp, dest) = create_test_dest();
        std::fs::create_dir(temp.path().join("a")).unwrap();
        std::fs::write(temp.path().join("a/c.txt"), "x").unwrap();
        let target = ContainedPath::resolve("a/c.txt", &dest).unwrap();
        assert!(target.verify_on_disk("a/c.txt", &dest).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_verify_on_disk_symlink_escape() {
        let (temp, dest) = create_test_dest();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();

        let target = ContainedPath::resolve("link/payload.txt", &dest).unwrap();
        let result = target.verify_on_disk("link/payload.txt", &dest);
        assert!(matches!(result, Err(ArchiveError::PathEscape { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_verify_on_disk_async_symlink_escape() {
        let (temp, dest) = create_test_dest();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();

        let target = ContainedPath::resolve("link/deeper/payload.txt", &dest).unwrap();
        let result = target
            .verify_on_disk_async("link/deeper/payload.txt", &dest)
            .await;
        assert!(matches!(result, Err(ArchiveError::PathEscape { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_verify_on_disk_dangling_symlink() {
        let (temp, dest) = create_test_dest();
        let outside = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path().join("gone.txt"), temp.path().join("link"))
            .unwrap();

        let target = ContainedPath::resolve("link", &dest).unwrap();
        let result = target.verify_on_disk("link", &dest);
        assert!(matches!(result, Err(ArchiveError::PathEscape { ref entry }) if entry == "link"));

        let target = ContainedPath::resolve("link/below.txt", &dest).unwrap();
        assert!(target.verify_on_disk("link/below.txt", &dest).is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_verify_on_disk_async_dangling_symlink() {
        let (temp, dest) = create_test_dest();
        std::os::unix::fs::symlink(temp.path().join("missing"), temp.path().join("link"))
            .unwrap();

        let target = ContainedPath::resolve("link", &dest).unwrap();
        let result = target.verify_on_disk_async("link", &dest).await;
        assert!(matches!(result, Err(ArchiveError::PathEscape { .. })));
    }
}
