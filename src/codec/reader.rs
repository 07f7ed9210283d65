//! Field-level reader for filter files.

use std::io::{self, Read, Seek};

use super::format::*;
use crate::{Action, Column, Error, Relation, Result, Rule};

/// Reads primitive fields at the stream's current cursor.
///
/// Callers seek to header or record boundaries themselves.
pub struct FieldReader<'a, S: Read + Seek> {
    inner: &'a mut S,
}

impl<'a, S: Read + Seek> FieldReader<'a, S> {
    /// Wrap a stream without moving its cursor.
    pub fn new(inner: &'a mut S) -> Self {
        Self { inner }
    }

    /// Current cursor position.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a little-endian u32.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read a u32 length `n` followed by exactly `n` raw bytes.
    pub fn read_length_prefixed_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u32_le()? as usize;
        let offset = self.position()?;

        // Bounded by what the stream holds, not by the untrusted length.
        let mut data = Vec::new();
        (&mut *self.inner).take(len as u64).read_to_end(&mut data)?;
        if data.len() < len {
            return Err(Error::TruncatedInput { offset, needed: len });
        }
        Ok(data)
    }

    /// Skip up to `n` bytes, returning how many were actually present.
    pub fn skip(&mut self, n: u64) -> Result<u64> {
        Ok(io::copy(&mut (&mut *self.inner).take(n), &mut io::sink())?)
    }

    /// Read the file header from the current position.
    pub fn read_header(&mut self) -> Result<FileHeader> {
        let total_size = self.read_u32_le()?;
        let version = self.read_u8()?;
        let rule_count = self.read_u32_le()?;
        Ok(FileHeader {
            total_size,
            version,
            rule_count,
        })
    }

    /// Read one record and tag it with a session id.
    ///
    /// The reserved tail is skipped leniently; a short tail on the last
    /// record is tolerated.
    pub fn read_rule(&mut self, id: u32) -> Result<Rule> {
        let column = Column::from_code(self.read_u32_le()?);

        let relation_index = self.read_u32_le()?;
        let relation = Relation::from_index(relation_index)
            .ok_or(Error::InvalidRelationIndex(relation_index))?;

        let action_index = self.read_u8()?;
        let action = Action::from_u8(action_index).ok_or(Error::InvalidActionIndex(action_index))?;

        let value = decode_utf16le(&self.read_length_prefixed_bytes()?)?;

        let skipped = self.skip(RESERVED_LEN as u64)?;
        if skipped < RESERVED_LEN as u64 {
            log::debug!("Record {} has {} of {} reserved bytes", id, skipped, RESERVED_LEN);
        }

        Ok(Rule::new(id, column, relation, action, value))
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let offset = self.position()?;
        let needed = buf.len();
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::TruncatedInput { offset, needed },
            _ => Error::Io(e),
        })
    }
}
