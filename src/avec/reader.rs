//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::{io::Read, vec::Vec};

use thiserror::Error;

use crate::sans::header::{Header, HeaderError};

use super::{FromHeap, slice};

extern crate std;

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Incorrect document header.
    #[error("Incorrect document header: {0}")]
    Header(#[from] HeaderError),
}

impl From<slice::Error> for Error {
    fn from(err: slice::Error) -> Self {
        match err {
            slice::Error::Header(err) => Self::Header(err),
        }
    }
}

/// Decode records from a reader of a document, publishing to a receiver.
///
/// The reader is drained into memory before decoding starts, so records are
/// always framed against a complete buffer.
///
/// This method is also re-exported as `hprof::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(r: &mut impl Read, o: &mut impl FromHeap) -> Result<Header, Error> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;

    Ok(slice::decode(&buf, o)?)
}
