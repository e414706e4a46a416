//! Configuration for packing, unpacking, and saving archives.

use crate::ArchiveError;
use crate::Result;

/// Configuration shared by every pack/unpack/save operation.
///
/// # Examples
///
/// ```
/// use ziplocal_core::ArchiveConfig;
///
/// // Use defaults
/// let config = ArchiveConfig::default();
///
/// // Customize for specific needs
/// let custom = ArchiveConfig::default()
///     .with_compression_level(9)
///     .with_max_concurrent_io(4);
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Deflate level used when an export handle is compressed (1-9).
    ///
    /// Handles that are not compressed store entries without compression
    /// and ignore this value.
    ///
    /// Default: `6` (balanced).
    pub compression_level: u8,

    /// Maximum number of file reads or writes in flight at once for the
    /// non-blocking variants.
    ///
    /// Default: `16`.
    pub max_concurrent_io: usize,
}

impl Default for ArchiveConfig {
    /// Default values:
    /// - `compression_level`: `6`
    /// - `max_concurrent_io`: `16`
    fn default() -> Self {
        Self {
            compression_level: 6,
            max_concurrent_io: 16,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new `ArchiveConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    ///
    /// # Panics
    ///
    /// Panics if the compression level is not in the range 1-9.
    /// Use `validate()` for non-panicking validation.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        assert!((1..=9).contains(&level), "compression level must be 1-9");
        self.compression_level = level;
        self
    }

    /// Sets the concurrency bound for non-blocking reads and writes.
    #[must_use]
    pub fn with_max_concurrent_io(mut self, max: usize) -> Self {
        self.max_concurrent_io = max;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level is not in range 1-9
    /// - `max_concurrent_io` is zero
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.compression_level) {
            return Err(ArchiveError::InvalidConfig {
                reason: format!(
                    "compression level must be 1-9, got {}",
                    self.compression_level
                ),
            });
        }
        if self.max_concurrent_io == 0 {
            return Err(ArchiveError::InvalidConfig {
                reason: "max_concurrent_io must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ArchiveConfig::default();
        assert_eq!(config.compression_level, 6);
        assert_eq!(config.max_concurrent_io, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = ArchiveConfig::new()
            .with_compression_level(1)
            .with_max_concurrent_io(2);
        assert_eq!(config.compression_level, 1);
        assert_eq!(config.max_concurrent_io, 2);
    }

    #[test]
    #[should_panic(expected = "compression level must be 1-9")]
    fn test_with_compression_level_out_of_range() {
        let _ = ArchiveConfig::default().with_compression_level(10);
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let config = ArchiveConfig {
            compression_level: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ArchiveError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = ArchiveConfig::default().with_max_concurrent_io(0);
        assert!(matches!(
            config.validate(),
            Err(ArchiveError::InvalidConfig { .. })
        ));
    }
}
