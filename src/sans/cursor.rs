//! Forward-only byte cursor over an immutable slice.

use thiserror::Error;

use super::value::{Id, IdSize};

/// An error reading from a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorError {
    /// Unexpectedly reached the end of the slice.
    #[error("Unexpectedly reached the end of the slice.")]
    EndOfSlice,
}

/// A read position within a byte slice.
///
/// The cursor owns its offset rather than sharing it with a decoder, so any
/// decoding step can be driven in isolation from a slice and an identifier
/// width. All multi-byte integers are read big-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<'a> {
    r: &'a [u8],
    i: usize,
    id_size: IdSize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of a slice.
    pub fn new(r: &'a [u8], id_size: IdSize) -> Self {
        Self { r, i: 0, id_size }
    }

    /// Create a cursor at an offset within a slice.
    pub fn at(r: &'a [u8], i: usize, id_size: IdSize) -> Self {
        Self { r, i, id_size }
    }

    /// The current offset.
    pub fn position(&self) -> usize {
        self.i
    }

    /// Move to an absolute offset. Offsets past the end are allowed and leave
    /// the cursor exhausted.
    pub fn seek(&mut self, i: usize) {
        self.i = i;
    }

    /// The identifier width applied to [`Cursor::id`].
    pub fn id_size(&self) -> IdSize {
        self.id_size
    }

    pub(crate) fn set_id_size(&mut self, id_size: IdSize) {
        self.id_size = id_size;
    }

    /// Number of bytes left before the end of the slice.
    pub fn remaining(&self) -> usize {
        self.r.len().saturating_sub(self.i)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// A cursor over `len` bytes starting here, sharing the identifier width.
    ///
    /// The window is clamped to the end of the slice. Offsets reported by the
    /// window remain relative to the underlying slice.
    pub fn window(&self, len: usize) -> Cursor<'a> {
        let end = self.i.saturating_add(len).min(self.r.len());
        let start = self.i.min(end);

        Cursor {
            r: &self.r[..end],
            i: start,
            id_size: self.id_size,
        }
    }

    /// Take an exact number of bytes, advancing the offset.
    pub fn take<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        let mut buf = [0; N];
        buf.copy_from_slice(self.bytes(N)?);
        Ok(buf)
    }

    /// Take a run of bytes, advancing the offset.
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], CursorError> {
        let s = self.i;
        let e = s.checked_add(len).ok_or(CursorError::EndOfSlice)?;
        let r = self.r.get(s..e).ok_or(CursorError::EndOfSlice)?;
        self.i = e;
        Ok(r)
    }

    /// Skip a run of bytes without inspecting them.
    pub fn skip(&mut self, len: usize) -> Result<(), CursorError> {
        self.bytes(len).map(|_| ())
    }

    /// Take every byte up to the end of the slice.
    pub fn rest(&mut self) -> &'a [u8] {
        let s = self.i.min(self.r.len());
        self.i = self.r.len();
        &self.r[s..]
    }

    pub fn u8(&mut self) -> Result<u8, CursorError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn u16(&mut self) -> Result<u16, CursorError> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    pub fn u32(&mut self) -> Result<u32, CursorError> {
        Ok(u32::from_be_bytes(self.take()?))
    }

    pub fn u64(&mut self) -> Result<u64, CursorError> {
        Ok(u64::from_be_bytes(self.take()?))
    }

    /// Read one identifier of the configured width.
    pub fn id(&mut self) -> Result<Id, CursorError> {
        Ok(match self.id_size {
            IdSize::Four => u64::from(self.u32()?),
            IdSize::Eight => self.u64()?,
        })
    }
}
