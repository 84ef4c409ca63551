//! Bounds-checked, big-endian reads from a slice.

use thiserror::Error;

/// A read ran past the end of the slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unexpectedly reached the end of the slice: {needed} bytes needed at offset {offset}, {remaining} remaining.")]
pub struct TruncatedBuffer {
    pub offset: usize,
    pub needed: usize,
    pub remaining: usize,
}

/// A forward-only read position over a slice.
///
/// A failed read leaves the position unchanged.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    r: &'a [u8],
    i: usize,
}

macro_rules! read {
    ($name:ident, $t:ident) => {
        #[doc = concat!("Read a big-endian `", stringify!($t), "`, advancing the position.")]
        pub fn $name(&mut self) -> Result<$t, TruncatedBuffer> {
            self.take().map($t::from_be_bytes)
        }
    };
}

impl<'a> Cursor<'a> {
    pub fn new(r: &'a [u8]) -> Self {
        Self { r, i: 0 }
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.i
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.r.len() - self.i
    }

    /// Take an exact number of bytes, advancing the position.
    pub fn take<const N: usize>(&mut self) -> Result<[u8; N], TruncatedBuffer> {
        let bytes = self.r[self.i..]
            .first_chunk::<N>()
            .copied()
            .ok_or_else(|| self.truncated(N))?;

        self.i += N;
        Ok(bytes)
    }

    /// Take a run-time number of bytes, advancing the position.
    pub fn take_slice(&mut self, n: usize) -> Result<&'a [u8], TruncatedBuffer> {
        if n > self.remaining() {
            Err(self.truncated(n))?;
        }

        let bytes = &self.r[self.i..self.i + n];
        self.i += n;
        Ok(bytes)
    }

    read!(read_u8, u8);
    read!(read_u16, u16);
    read!(read_u32, u32);
    read!(read_i32, i32);
    read!(read_u64, u64);

    fn truncated(&self, needed: usize) -> TruncatedBuffer {
        TruncatedBuffer {
            offset: self.i,
            needed,
            remaining: self.remaining(),
        }
    }
}
