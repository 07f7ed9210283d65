//! Byte streams a filter store can live on.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, Write};

/// A random-access byte stream that can also be shortened.
///
/// `std` has no trait for truncation, so files and in-memory buffers
/// each provide their own.
pub trait Storage: Read + Write + Seek {
    /// Cut the stream to exactly `len` bytes.
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl Storage for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

impl Storage for Cursor<Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds memory"))?;
        self.get_mut().truncate(len);
        if self.position() > len as u64 {
            self.set_position(len as u64);
        }
        Ok(())
    }
}

impl<T: Storage + ?Sized> Storage for &mut T {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        (**self).truncate(len)
    }
}
