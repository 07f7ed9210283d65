//! Binary format constants and structures.

use crate::{Error, Result};

/// Format version written by this crate.
pub const FORMAT_VERSION: u8 = 1;

/// Length of the leading `total_size` field.
pub const SIZE_FIELD_LEN: u64 = 4;

/// Reserved bytes trailing every record.
pub const RESERVED_LEN: usize = 8;

/// Parsed file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileHeader {
    /// Byte count from `version` to the end of the last record
    pub total_size: u32,
    /// Format version byte
    pub version: u8,
    /// Number of records that follow
    pub rule_count: u32,
}

/// Decode UTF-16LE bytes into a string.
///
/// Embedded NUL characters are kept.
pub fn decode_utf16le(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(Error::InvalidText);
    }

    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|_| Error::InvalidText)
}

/// Encode a string as UTF-16LE bytes without a byte-order mark.
pub fn encode_utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}
