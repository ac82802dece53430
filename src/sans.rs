//! Allocation-light decoding primitives.
//!
//! This module is intended for applications that need to walk a document
//! themselves, for example to stream entities without keeping a model. See
//! [`crate::avec`] for the drivers covering common decoding patterns.
//!
//! # Architecture
//!
//! Every step reads from a [`cursor::Cursor`], which owns its offset and the
//! document's identifier width. Start by decoding the [`Decoder`] header, which
//! yields a cursor positioned at the first record. From there:
//!
//! - [`record::RecordHeader::frame`] reads one record header and moves the
//! cursor past the whole record, returning a separate cursor over its payload.
//! Whatever a payload decoder does with that window, the outer cursor stays in
//! step with the record framing.
//!
//! - [`record::decode`] turns a payload into a [`record::Record`], or into a
//! [`heap::SubRecords`] iterator for heap dumps and heap dump segments.
//!
//! - [`heap::SubRecords`] yields [`heap::SubRecord`]s until the payload ends,
//! an error occurs, or it meets a sub-record tag it cannot frame.
//!
//! Some areas of the decoding process are left to the caller:
//!
//! - Deciding how to report errors from a single payload. The drivers in
//! [`crate::avec`] log them and continue with the next record.
//!
//! - Resolving names and merging class metadata, which needs state across
//! records.

use thiserror::Error;

pub mod cursor;
pub mod header;
pub mod heap;
pub mod record;
pub mod value;

/// Entrypoint to decoding a document.
pub type Decoder = header::Header;

/// An error decoding a record or sub-record payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Unexpectedly reached the end of the payload.
    #[error("Unexpectedly reached the end of the payload.")]
    EndOfSlice,
    /// The type tag is not one of the basic types.
    #[error("Unknown basic type ({0:#04x}).")]
    UnknownBasicType(u8),
}

impl From<cursor::CursorError> for DecodeError {
    fn from(err: cursor::CursorError) -> Self {
        match err {
            cursor::CursorError::EndOfSlice => Self::EndOfSlice,
        }
    }
}
