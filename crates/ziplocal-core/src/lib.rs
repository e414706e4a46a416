//! Pack directory trees into zip archives and unpack them safely.
//!
//! `ziplocal-core` walks a file or directory into an in-memory
//! [`ArchiveModel`], serializes it as a zip archive, and extracts archives
//! back onto disk. Extraction checks every entry against the target
//! directory before writing anything, so an archive with `../` or absolute
//! entry names (zip-slip) fails without touching the filesystem. Extracting
//! into a tree that already exists reuses its directories.
//!
//! Every operation comes in a blocking and a non-blocking (`tokio`) form.
//!
//! # Examples
//!
//! ```no_run
//! use ziplocal_core::ArchiveConfig;
//! use ziplocal_core::pack;
//! use ziplocal_core::unpack;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ArchiveConfig::default();
//!
//! pack("./hello", &config)?.compress().save("./hello.zip")?;
//!
//! let handle = unpack("./hello.zip", &config)?;
//! let report = handle.save("./restored")?;
//! println!("{report:?}");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod creation;
pub mod error;
pub mod export;
pub mod extraction;
pub mod formats;
pub mod inspection;
pub mod model;
pub mod report;
pub mod source;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use api::pack;
pub use api::pack_async;
pub use api::unpack;
pub use api::unpack_async;
pub use config::ArchiveConfig;
pub use error::ArchiveError;
pub use error::Result;
pub use export::Blocking;
pub use export::ExportHandle;
pub use export::Memory;
pub use export::NonBlocking;
pub use export::Origin;
pub use inspection::ArchiveView;
pub use inspection::Content;
pub use inspection::ReadKind;
pub use model::ArchiveModel;
pub use model::Entry;
pub use model::EntryKind;
pub use report::ExtractionReport;
pub use report::SaveOutcome;
pub use source::PackSource;
pub use source::UnpackSource;

// Re-export types module for easier access
pub use types::ContainedPath;
pub use types::DestDir;
