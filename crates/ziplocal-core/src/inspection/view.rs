//! Read-only access to a loaded archive.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::ArchiveError;
use crate::ArchiveModel;
use crate::Result;
use crate::model::Entry;

/// How [`ArchiveView::read`] returns an entry's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadKind {
    /// Raw bytes.
    Binary,
    /// UTF-8 text. Invalid sequences are replaced with U+FFFD.
    Text,
}

impl FromStr for ReadKind {
    type Err = ArchiveError;

    /// Parses `"binary"` (alias `"buffer"`) or `"text"`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "binary" | "buffer" => Ok(Self::Binary),
            "text" => Ok(Self::Text),
            other => Err(ArchiveError::UnsupportedKind {
                kind: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ReadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Text => f.write_str("text"),
        }
    }
}

/// Payload returned by [`ArchiveView::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<'a> {
    /// Raw bytes, borrowed from the model.
    Binary(&'a [u8]),
    /// Decoded text. Borrowed unless decoding had to replace bytes.
    Text(Cow<'a, str>),
}

impl Content<'_> {
    /// Returns the payload as bytes regardless of kind.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Binary(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    /// Returns the text, `None` for binary content.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }
}

/// Lists and reads the file entries of an [`ArchiveModel`] without touching
/// disk.
///
/// The view borrows the model, so the model cannot change while a view is
/// alive and [`ArchiveView::contents`] always returns the same snapshot.
///
/// # Examples
///
/// ```
/// use ziplocal_core::ArchiveModel;
/// use ziplocal_core::inspection::ArchiveView;
///
/// let mut model = ArchiveModel::new();
/// model.insert_file("hello/says-hello", "Hello");
///
/// let view = ArchiveView::new(&model);
/// assert_eq!(view.contents(), ["hello/says-hello"]);
/// assert_eq!(view.read_text("hello/says-hello")?, "Hello");
/// # Ok::<(), ziplocal_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveView<'a> {
    model: &'a ArchiveModel,
    files: Vec<&'a str>,
}

impl<'a> ArchiveView<'a> {
    /// Creates a view over `model`.
    #[must_use]
    pub fn new(model: &'a ArchiveModel) -> Self {
        let files = model.files().map(Entry::name).collect();
        Self { model, files }
    }

    /// Names of all file entries, in name order. Directories are omitted.
    #[must_use]
    pub fn contents(&self) -> &[&'a str] {
        &self.files
    }

    /// Reads the file entry `name` as `kind`.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::NotFound` if `name` is not a file entry.
    pub fn read(&self, name: &str, kind: ReadKind) -> Result<Content<'a>> {
        let data = self.file_data(name)?;
        Ok(match kind {
            ReadKind::Binary => Content::Binary(data),
            ReadKind::Text => Content::Text(String::from_utf8_lossy(data)),
        })
    }

    /// Reads the file entry `name` with the kind given as a string.
    ///
    /// # Errors
    ///
    /// - `ArchiveError::NotFound` if `name` is not a file entry
    /// - `ArchiveError::UnsupportedKind` if `kind` is not `"binary"`,
    ///   `"buffer"`, or `"text"`
    pub fn read_as(&self, name: &str, kind: &str) -> Result<Content<'a>> {
        self.file_data(name)?;
        self.read(name, kind.parse()?)
    }

    /// Reads the file entry `name` as raw bytes.
    pub fn read_bytes(&self, name: &str) -> Result<&'a [u8]> {
        self.file_data(name)
    }

    /// Reads the file entry `name` as lossy UTF-8 text.
    pub fn read_text(&self, name: &str) -> Result<Cow<'a, str>> {
        self.file_data(name).map(String::from_utf8_lossy)
    }

    /// Returns `true` if `name` is a file entry.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.model.get(name).is_some_and(|entry| !entry.is_dir())
    }

    /// Number of file entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the archive has no file entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The underlying model, including directory entries.
    #[must_use]
    pub const fn model(&self) -> &'a ArchiveModel {
        self.model
    }

    fn file_data(&self, name: &str) -> Result<&'a [u8]> {
        self.model
            .get(name)
            .and_then(Entry::data)
            .ok_or_else(|| ArchiveError::NotFound { path: name.into() })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hello_model() -> ArchiveModel {
        let mut model = ArchiveModel::new();
        model.insert_file("hello/says-hello", "Hello");
        model.insert_file("hello/world/says-world", "World");
        model.insert_dir("hello/empty");
        model
    }

    #[test]
    fn test_contents_lists_files_only() {
        let model = hello_model();
        let view = ArchiveView::new(&model);
        assert_eq!(
            view.contents(),
            ["hello/says-hello", "hello/world/says-world"]
        );
        assert_eq!(view.contents(), view.contents());
        assert_eq!(view.len(), 2);
        assert!(!view.is_empty());
    }

    #[test]
    fn test_read_text_and_binary() {
        let model = hello_model();
        let view = ArchiveView::new(&model);

        let text = view.read("hello/says-hello", ReadKind::Text).unwrap();
        assert_eq!(text.as_text(), Some("Hello"));

        let binary = view.read("hello/world/says-world", ReadKind::Binary).unwrap();
        assert_eq!(binary, Content::Binary(b"World"));
        assert_eq!(binary.as_text(), None);
    }

    #[test]
    fn test_read_missing_entry() {
        let model = hello_model();
        let view = ArchiveView::new(&model);
        let err = view.read("hello/missing", ReadKind::Text).unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound { .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_read_directory_is_not_found() {
        let model = hello_model();
        let view = ArchiveView::new(&model);
        assert!(matches!(
            view.read_bytes("hello/world/"),
            Err(ArchiveError::NotFound { .. })
        ));
        assert!(!view.contains("hello/world/"));
    }

    #[test]
    fn test_read_as_parses_kind() {
        let model = hello_model();
        let view = ArchiveView::new(&model);

        let text = view.read_as("hello/says-hello", "text").unwrap();
        assert_eq!(text.as_bytes(), b"Hello");
        let buffer = view.read_as("hello/says-hello", "buffer").unwrap();
        assert_eq!(buffer, Content::Binary(b"Hello"));
    }

    #[test]
    fn test_read_as_unsupported_kind() {
        let model = hello_model();
        let view = ArchiveView::new(&model);
        let err = view.read_as("hello/says-hello", "base64").unwrap_err();
        assert!(
            matches!(err, ArchiveError::UnsupportedKind { ref kind } if kind == "base64")
        );
    }

    #[test]
    fn test_read_as_checks_entry_before_kind() {
        let model = hello_model();
        let view = ArchiveView::new(&model);
        let err = view.read_as("missing", "base64").unwrap_err();
        assert!(matches!(err, ArchiveError::NotFound { .. }));
    }

    #[test]
    fn test_read_text_is_lossy() {
        let mut model = ArchiveModel::new();
        model.insert_file("bin", vec![b'o', b'k', 0xFF]);
        let view = ArchiveView::new(&model);
        assert_eq!(view.read_text("bin").unwrap(), "ok\u{FFFD}");
    }

    #[test]
    fn test_read_kind_display_round_trips() {
        for kind in [ReadKind::Binary, ReadKind::Text] {
            assert_eq!(kind.to_string().parse::<ReadKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_view_is_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<ArchiveView<'_>>();
    }
}
