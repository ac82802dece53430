//! Document header.

use alloc::string::String;

use thiserror::Error;

use super::{
    cursor::{Cursor, CursorError},
    value::IdSize,
};

/// Prefix every supported format name begins with.
pub const MAGIC_PREFIX: &[u8] = b"JAVA PROFILE";

/// An error decoding a document header. Any of these ends decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Incorrect format name.
    #[error("Incorrect format name.")]
    NotHprofData,
    /// The format name has no terminating null byte.
    #[error("Unterminated format name.")]
    UnterminatedFormat,
    /// Identifier width other than four or eight bytes.
    #[error("Unsupported identifier size ({0}).")]
    UnsupportedIdSize(u32),
    /// The header was cut short.
    #[error("Unexpectedly reached the end of the header.")]
    EndOfSlice,
}

impl From<CursorError> for HeaderError {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::EndOfSlice => Self::EndOfSlice,
        }
    }
}

/// A decoded document header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Format name, for example `JAVA PROFILE 1.0.2`.
    pub format: String,
    /// Identifier width for the rest of the document.
    pub id_size: IdSize,
    /// Capture time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Header {
    /// Decode the header at the start of a document.
    ///
    /// Returns the header, and a cursor positioned at the first record with
    /// the document's identifier width applied.
    pub fn decode(r: &[u8]) -> Result<(Self, Cursor<'_>), HeaderError> {
        let n = r
            .iter()
            .position(|b| *b == 0)
            .ok_or(HeaderError::UnterminatedFormat)?;

        let format = &r[..n];
        if !format.starts_with(MAGIC_PREFIX) {
            Err(HeaderError::NotHprofData)?;
        }

        let mut c = Cursor::at(r, n + 1, IdSize::Four);

        let id_size = c.u32()?;
        let id_size = IdSize::from_bytes(id_size).ok_or(HeaderError::UnsupportedIdSize(id_size))?;
        c.set_id_size(id_size);

        let timestamp = c.u64()?;

        let header = Self {
            format: String::from_utf8_lossy(format).into_owned(),
            id_size,
            timestamp,
        };

        Ok((header, c))
    }
}
