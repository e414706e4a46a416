//! Validated path types for extraction.
//!
//! Both types can only be built through validation, so holding one is proof
//! that the check ran.

pub mod contained_path;
pub mod dest_dir;

pub use contained_path::ContainedPath;
pub use dest_dir::DestDir;
