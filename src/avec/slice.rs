//! Slice-based decoder implementation.

use either::Either::{Left, Right};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::sans::{
    DecodeError, Decoder,
    cursor::Cursor,
    header::{Header, HeaderError},
    heap::{SubRecord, SubRecords},
    record::{self, Record, RecordHeader, RecordTag},
};

use super::{FromHeap, Warning, WarningKind};

/// Errors ending decoding from a slice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Incorrect document header.
    #[error("Incorrect document header: {0}")]
    Header(#[from] HeaderError),
}

/// Decode records from a slice of a document, publishing to a receiver.
///
/// Returns the document header. Recoverable problems are published to the
/// receiver as warnings and do not end decoding.
///
/// This method is also re-exported as `hprof::avec::decode_slice`.
pub fn decode(r: &[u8], o: &mut impl FromHeap) -> Result<Header, Error> {
    let (header, mut c) = Decoder::decode(r)?;

    debug!(
        format = %header.format,
        id_size = header.id_size.bytes(),
        timestamp = header.timestamp,
        "Decoded document header"
    );

    o.add_header(&header);

    while !c.is_empty() {
        let offset = c.position();

        let Ok((record, payload)) = RecordHeader::frame(&mut c) else {
            warn!(
                offset,
                remaining = c.remaining(),
                "Found a truncated record header"
            );
            o.add_warning(Warning {
                offset,
                kind: WarningKind::TruncatedRecordHeader,
            });
            break;
        };

        if record.is_truncated(&payload) {
            let available = payload.remaining();
            warn!(
                offset,
                tag = ?record.tag,
                length = record.length,
                available,
                "Found a truncated record"
            );
            o.add_warning(Warning {
                offset,
                kind: WarningKind::TruncatedRecord {
                    tag: record.tag,
                    length: record.length,
                    available,
                },
            });
        }

        if let Err(error) = decode_record(record, payload, offset, o) {
            warn!(
                offset,
                tag = ?record.tag,
                length = record.length,
                %error,
                "Abandoned record"
            );
            o.add_warning(Warning {
                offset,
                kind: WarningKind::Record {
                    tag: record.tag,
                    error,
                },
            });
        }
    }

    Ok(header)
}

fn decode_record(
    header: RecordHeader,
    payload: Cursor<'_>,
    offset: usize,
    o: &mut impl FromHeap,
) -> Result<(), DecodeError> {
    match record::decode(header.tag, payload)? {
        Left(Record::Utf8 { id, text }) => o.add_string(id, &text),
        Left(Record::LoadClass(load)) => o.add_load_class(load),
        Left(Record::Skipped(RecordTag::Unknown(tag))) => {
            warn!(
                offset,
                tag,
                length = header.length,
                "Skipped unknown record"
            );
            o.add_warning(Warning {
                offset,
                kind: WarningKind::UnknownRecord { tag },
            });
        }
        Left(Record::Skipped(tag)) => {
            trace!(offset, ?tag, length = header.length, "Skipped record");
        }
        Right(records) => {
            debug!(offset, tag = ?header.tag, length = header.length, "Decoding heap dump");
            decode_heap(records, o)?;
        }
    }

    Ok(())
}

fn decode_heap(mut records: SubRecords<'_>, o: &mut impl FromHeap) -> Result<(), DecodeError> {
    loop {
        let offset = records.position();

        let Some(record) = records.next() else {
            return Ok(());
        };

        match record? {
            Left(SubRecord::Root(root)) => o.add_root(root),
            Left(SubRecord::ClassDump(class)) => o.add_class_dump(class),
            Left(SubRecord::InstanceDump(instance)) => o.add_instance(instance),
            Left(SubRecord::ObjectArrayDump(array)) => o.add_object_array(array),
            Left(SubRecord::PrimitiveArrayDump(array)) => o.add_primitive_array(array),
            Right(tag) => {
                warn!(offset, tag, "Abandoned heap dump at unknown sub-record");
                o.add_warning(Warning {
                    offset,
                    kind: WarningKind::UnknownSubRecord { tag },
                });
            }
        }
    }
}
