//! Test utilities for building archive and filesystem fixtures.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (name, content). Names are written exactly as
/// given, with no directory entries, so parent directories are implicit.
/// Files are stored uncompressed.
///
/// # Examples
///
/// ```
/// use ziplocal_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, data) in entries {
        zip.start_file(name, options).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// Creates the `hello` fixture tree under `dir` and returns its path:
///
/// ```text
/// hello/
///   says-hello        "Hello"
///   world/
///     says-world      "World"
/// ```
pub fn create_hello_tree(dir: &Path) -> PathBuf {
    let hello = dir.join("hello");
    fs::create_dir_all(hello.join("world")).unwrap();
    fs::write(hello.join("says-hello"), "Hello").unwrap();
    fs::write(hello.join("world").join("says-world"), "World").unwrap();
    hello
}
