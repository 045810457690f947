use byteorder::{BigEndian, ByteOrder};

use crate::internal::error::{Error, Result};

/// Forward-only cursor over a nested-encoded buffer.
///
/// Every read is bounds-checked and fails with `InsufficientDataError`
/// instead of panicking.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// True once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// The unconsumed tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    /// Consumes exactly `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(Error::InsufficientDataError {
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads a big-endian unsigned integer of `width` bytes (1 to 8).
    pub fn read_uint(&mut self, width: usize) -> Result<u64> {
        let bytes = self.take(width)?;
        Ok(BigEndian::read_uint(bytes, width))
    }

    /// Reads a big-endian two's-complement integer of `width` bytes (1 to 8).
    pub fn read_int(&mut self, width: usize) -> Result<i64> {
        let bytes = self.take(width)?;
        Ok(BigEndian::read_int(bytes, width))
    }

    /// Reads a `u32` length prefix followed by that many bytes.
    pub fn read_sized(&mut self) -> Result<&'a [u8]> {
        let len = self.read_uint(4)? as usize;
        self.take(len)
    }
}
