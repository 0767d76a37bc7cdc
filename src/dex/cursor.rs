use crate::dex::error::{DexError, DexResult};

/// Bounds-checked little-endian reader over a byte span.
///
/// Every read either consumes exactly its width or fails with
/// [`DexError::OutOfBounds`] and leaves the position untouched.
#[derive(Debug, Clone)]
pub struct Cursor<'a>
{
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a>
{
    pub fn new(bytes: &'a [u8]) -> Self
    {
        Cursor { bytes, pos: 0 }
    }

    /// A cursor positioned at `offset`. An offset equal to the span length is
    /// allowed (nothing left to read), anything past it is not.
    pub fn at(bytes: &'a [u8], offset: usize) -> DexResult<Self>
    {
        if offset > bytes.len()
        {
            fail!(OutOfBounds { offset, width: 0, len: bytes.len() });
        }
        Ok(Cursor { bytes, pos: offset })
    }

    pub fn position(&self) -> usize
    {
        self.pos
    }

    pub fn remaining(&self) -> usize
    {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, width: usize) -> DexResult<&'a [u8]>
    {
        if width > self.remaining()
        {
            fail!(OutOfBounds { offset: self.pos, width, len: self.bytes.len() });
        }
        let slice = &self.bytes[self.pos..self.pos + width];
        self.pos += width;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> DexResult<u8>
    {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> DexResult<u16>
    {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> DexResult<u32>
    {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_bytes(&mut self, n: usize) -> DexResult<&'a [u8]>
    {
        self.take(n)
    }

    pub fn read_array<const N: usize>(&mut self) -> DexResult<[u8; N]>
    {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// The bytes from the current position up to (not including) the next NUL.
    /// Does not move the cursor.
    pub fn peek_cstring(&self) -> DexResult<&'a [u8]>
    {
        let rest = &self.bytes[self.pos..];
        match rest.iter().position(|&b| b == 0)
        {
            Some(end) => Ok(&rest[..end]),
            None => Err(DexError::OutOfBounds { offset: self.pos, width: rest.len() + 1, len: self.bytes.len() }),
        }
    }
}
