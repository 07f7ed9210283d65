//! Binary codec for Process Monitor filter files.
//!
//! All integers are little-endian. Text is UTF-16LE without a byte-order
//! mark, prefixed by its byte length.
//!
//! # File Structure
//!
//! ```text
//! +----------------------+
//! | total_size    u32    |  bytes from `version` to end of records
//! +----------------------+
//! | version       u8     |  always 1
//! | rule_count    u32    |
//! +----------------------+
//! | RECORD 0             |  column u32, relation u32, action u8,
//! +----------------------+  value (u32 len + UTF-16LE), 8 reserved
//! | RECORD 1 ...         |
//! +----------------------+
//! ```

mod format;
mod reader;
mod storage;
mod writer;

#[cfg(test)]
mod tests;

pub use format::*;
pub use reader::FieldReader;
pub use storage::Storage;
pub use writer::FieldWriter;
