//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module decode whole documents from slices and
//! readers, publishing entities to the [`FromHeap`] trait as they are met.
//! [`HeapModel`] implements the trait by collecting everything into maps that
//! can be queried once decoding is done; most users should begin with
//! [`parse`].
//!
//! # Failure tiers
//!
//! Only a bad document header ends decoding with an error. Everything past the
//! header is recovered from and published as a [`Warning`]:
//!
//! - A record with an unrecognized tag is skipped using its declared length.
//!
//! - A record whose payload fails to decode is abandoned, and decoding resumes
//! at the next record. Entities published before the failure are kept.
//!
//! - An unrecognized heap sub-record tag abandons the rest of its heap dump
//! payload, since sub-records have no length to skip by. Decoding resumes at
//! the next record.
//!
//! - A record declaring more bytes than the document holds is reported, and
//! whatever part of it is present is still decoded.

use thiserror::Error;

use crate::sans::{
    DecodeError,
    header::Header,
    heap::{ClassDump, InstanceDump, ObjectArrayDump, PrimitiveArrayDump, Root},
    record::{LoadClass, RecordTag},
    value::Id,
};

pub mod model;
#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

pub use model::HeapModel;
#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;

/// Decode a document into a [`HeapModel`].
///
/// This method is also re-exported as `hprof::parse`.
pub fn parse(r: &[u8]) -> Result<HeapModel, slice::Error> {
    let mut model = HeapModel::default();
    decode_slice(r, &mut model)?;
    Ok(model)
}

/// A recoverable problem met while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (at offset {offset:#x})")]
pub struct Warning {
    /// Offset of the record or sub-record concerned.
    pub offset: usize,
    pub kind: WarningKind,
}

/// The kinds of [`Warning`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarningKind {
    /// Skipped a record with an unrecognized tag.
    #[error("Skipped unknown record ({tag:#04x}).")]
    UnknownRecord { tag: u8 },
    /// Abandoned a record whose payload failed to decode.
    #[error("Abandoned {tag:?} record: {error}")]
    Record { tag: RecordTag, error: DecodeError },
    /// Abandoned the rest of a heap dump at an unrecognized sub-record tag.
    #[error("Abandoned heap dump at unknown sub-record ({tag:#04x}).")]
    UnknownSubRecord { tag: u8 },
    /// A record declares more payload than the document holds. Whatever
    /// fits is still decoded.
    #[error("Truncated {tag:?} record: {available} of {length} bytes present.")]
    TruncatedRecord {
        tag: RecordTag,
        length: u32,
        available: usize,
    },
    /// The document ends partway through a record header.
    #[error("Found a truncated record header.")]
    TruncatedRecordHeader,
}

/// Receive entities decoded from a document.
///
/// Entities are published in document order. The default implementation of
/// each method ignores received values.
///
/// See [`HeapModel`] for an implementation that keeps everything.
#[allow(unused_variables)]
pub trait FromHeap {
    /// Add the document header. Called once, before anything else.
    fn add_header(&mut self, header: &Header) {}
    /// Add a string definition.
    fn add_string(&mut self, id: Id, text: &str) {}
    /// Add a class load announcement.
    fn add_load_class(&mut self, load: LoadClass) {}
    /// Add a garbage collection root.
    fn add_root(&mut self, root: Root) {}
    /// Add class metadata.
    fn add_class_dump(&mut self, class: ClassDump) {}
    /// Add an object instance.
    fn add_instance(&mut self, instance: InstanceDump<'_>) {}
    /// Add an array of object references.
    fn add_object_array(&mut self, array: ObjectArrayDump) {}
    /// Add an array of primitives.
    fn add_primitive_array(&mut self, array: PrimitiveArrayDump) {}
    /// Add a recoverable problem.
    fn add_warning(&mut self, warning: Warning) {}
}
