//! Field-level writer for filter files.

use std::io::{self, Seek, Write};

use super::format::*;
use crate::{Result, Rule};

/// Writes primitive fields at the stream's current cursor.
pub struct FieldWriter<'a, S: Write + Seek> {
    inner: &'a mut S,
}

impl<'a, S: Write + Seek> FieldWriter<'a, S> {
    /// Wrap a stream without moving its cursor.
    pub fn new(inner: &'a mut S) -> Self {
        Self { inner }
    }

    /// Current cursor position.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_all(&[value])?;
        Ok(())
    }

    /// Write a little-endian u32.
    pub fn write_u32_le(&mut self, value: u32) -> Result<()> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }

    /// Write `text` as UTF-16LE, prefixed by its byte length.
    pub fn write_utf16le_text(&mut self, text: &str) -> Result<()> {
        let bytes = encode_utf16le(text);
        let len = u32::try_from(bytes.len()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "text too long for u32 length prefix")
        })?;
        self.write_u32_le(len)?;
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    /// Write `n` zero bytes.
    pub fn write_zeros(&mut self, n: usize) -> Result<()> {
        self.inner.write_all(&vec![0u8; n])?;
        Ok(())
    }

    /// Write one record. The value is written exactly as stored.
    pub fn write_rule(&mut self, rule: &Rule) -> Result<()> {
        self.write_u32_le(rule.column.code())?;
        self.write_u32_le(rule.relation.index())?;
        self.write_u8(rule.action.as_u8())?;
        self.write_utf16le_text(&rule.value)?;
        self.write_zeros(RESERVED_LEN)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}
