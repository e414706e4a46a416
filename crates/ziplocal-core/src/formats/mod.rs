//! Archive codecs.

pub mod traits;
pub mod zip;

pub use traits::ArchiveCodec;
pub use traits::Compression;
pub use self::zip::ZipCodec;
