//! In-memory inspection of loaded archives.

pub mod view;

pub use view::ArchiveView;
pub use view::Content;
pub use view::ReadKind;
