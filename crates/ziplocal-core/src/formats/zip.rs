//! ZIP codec backed by the `zip` crate.

use std::io::Cursor;
use std::io::Read;
use std::io::Write;

use tracing::debug;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::ArchiveModel;
use crate::Result;
use crate::model::Entry;
use crate::model::EntryKind;

use super::traits::ArchiveCodec;
use super::traits::Compression;

/// ZIP archive codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipCodec;

impl ZipCodec {
    /// Creates a new ZIP codec.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveCodec for ZipCodec {
    fn serialize(&self, model: &ArchiveModel, compression: Compression) -> Result<Vec<u8>> {
        let options = match compression {
            Compression::Stored => {
                SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
            }
            Compression::Deflated { level } => SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(i64::from(level))),
        };

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for entry in model.entries() {
            match entry.kind() {
                EntryKind::Directory => zip.add_directory(entry.name(), options)?,
                EntryKind::File(data) => {
                    zip.start_file(entry.name(), options)?;
                    zip.write_all(data)?;
                }
            }
        }

        let bytes = zip.finish()?.into_inner();
        debug!(
            entries = model.len(),
            bytes = bytes.len(),
            ?compression,
            "serialized zip archive"
        );
        Ok(bytes)
    }

    fn parse(&self, bytes: &[u8]) -> Result<ArchiveModel> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut model = ArchiveModel::new();

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let name = file.name().to_owned();
            if file.is_dir() {
                model.insert_raw(Entry::directory(&name));
            } else {
                let mut data = Vec::new();
                file.read_to_end(&mut data)?;
                model.insert_raw(Entry::file(name, data));
            }
        }

        let implicit = model.normalize_directories();
        debug!(
            entries = model.len(),
            implicit_directories = implicit,
            "parsed zip archive"
        );
        Ok(model)
    }

    fn format_name(&self) -> &str {
        "zip"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ArchiveError;
    use crate::test_utils::create_test_zip;

    fn hello_model() -> ArchiveModel {
        let mut model = ArchiveModel::new();
        model.insert_file("says-hello", "Hello");
        model.insert_file("world/says-world", "World");
        model
    }

    #[test]
    fn test_format_name() {
        assert_eq!(ZipCodec::new().format_name(), "zip");
    }

    #[test]
    fn test_serialize_then_parse_preserves_entries() {
        let codec = ZipCodec::new();
        let bytes = codec.serialize(&hello_model(), Compression::Stored).unwrap();
        let model = codec.parse(&bytes).unwrap();

        assert_eq!(model, hello_model());
        assert!(model.get("world/").unwrap().is_dir());
    }

    #[test]
    fn test_serialize_deflated_uses_deflate() {
        let codec = ZipCodec::new();
        let mut model = ArchiveModel::new();
        model.insert_file("big.txt", "a".repeat(4096));

        let stored = codec.serialize(&model, Compression::Stored).unwrap();
        let deflated = codec
            .serialize(&model, Compression::Deflated { level: 9 })
            .unwrap();
        assert!(deflated.len() < stored.len());

        let mut archive = ZipArchive::new(Cursor::new(deflated.as_slice())).unwrap();
        let file = archive.by_name("big.txt").unwrap();
        assert_eq!(file.compression(), CompressionMethod::Deflated);
    }

    #[test]
    fn test_parse_normalizes_implicit_directories() {
        // Written without any directory entries
        let bytes = create_test_zip(vec![
            ("folder1/file1.txt", b"one"),
            ("folder1/folder2/file2.txt", b"two"),
        ]);
        let model = ZipCodec::new().parse(&bytes).unwrap();

        assert!(model.get("folder1/").unwrap().is_dir());
        assert!(model.get("folder1/folder2/").unwrap().is_dir());
        assert_eq!(
            model.get("folder1/file1.txt").unwrap().data(),
            Some(&b"one"[..])
        );
    }

    #[test]
    fn test_parse_keeps_unsafe_names() {
        let bytes = create_test_zip(vec![("../evil.txt", b"evil")]);
        let model = ZipCodec::new().parse(&bytes).unwrap();
        assert!(model.get("../evil.txt").is_some());
    }

    #[test]
    fn test_parse_garbage_is_invalid_archive() {
        let result = ZipCodec::new().parse(b"definitely not a zip file");
        assert!(matches!(result, Err(ArchiveError::InvalidArchive(_))));
    }

    #[test]
    fn test_parse_empty_archive() {
        let codec = ZipCodec::new();
        let bytes = codec
            .serialize(&ArchiveModel::new(), Compression::Stored)
            .unwrap();
        assert!(codec.parse(&bytes).unwrap().is_empty());
    }
}
