//! Member metadata carried across rewrites

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime};

/// Metadata of an archive member, carried alongside its path and bytes
///
/// Captured from a source member and replayed verbatim when that member's
/// content is rewritten, so a rewrite never reconstructs or normalizes
/// attributes. Untouched members bypass this entirely via raw copy.
#[derive(Debug, Clone, Copy)]
pub struct MemberMeta {
    compression: CompressionMethod,
    unix_mode: Option<u32>,
    modified: Option<DateTime>,
}

impl MemberMeta {
    /// Capture the metadata of a source archive member
    pub fn new(
        compression: CompressionMethod,
        unix_mode: Option<u32>,
        modified: Option<DateTime>,
    ) -> Self {
        Self {
            compression,
            unix_mode,
            modified,
        }
    }

    /// Convert to write options for re-emitting the member
    pub fn to_options(self) -> SimpleFileOptions {
        let mut options = SimpleFileOptions::default().compression_method(self.compression);
        if let Some(mode) = self.unix_mode {
            options = options.unix_permissions(mode);
        }
        if let Some(modified) = self.modified {
            options = options.last_modified_time(modified);
        }
        options
    }
}
