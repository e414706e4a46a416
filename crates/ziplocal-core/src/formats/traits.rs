//! Common traits for archive codecs.

use crate::ArchiveModel;
use crate::Result;

/// Compression applied to file entries when serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Entries are stored as-is.
    Stored,
    /// Entries are deflated at the given level (1-9).
    Deflated {
        /// Deflate level.
        level: u8,
    },
}

/// Converts between archive bytes and an [`ArchiveModel`].
pub trait ArchiveCodec {
    /// Serializes every entry of `model` into archive bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the codec cannot encode an entry.
    fn serialize(&self, model: &ArchiveModel, compression: Compression) -> Result<Vec<u8>>;

    /// Parses archive bytes into a model.
    ///
    /// Entry names are kept exactly as stored (containment is checked at
    /// extraction time). Implicit directories are normalized into explicit
    /// entries before returning.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::InvalidArchive` if the bytes are not a valid
    /// archive.
    fn parse(&self, bytes: &[u8]) -> Result<ArchiveModel>;

    /// Returns the archive format name.
    fn format_name(&self) -> &str;
}
