//! Top-level records.

use alloc::{borrow::Cow, string::String};

use either::Either::{self, Left, Right};
use zerocopy::FromBytes;

use super::{
    DecodeError,
    cursor::{Cursor, CursorError},
    heap::SubRecords,
    value::Id,
};

/// Tag of a top-level record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordTag {
    Utf8,
    LoadClass,
    UnloadClass,
    StackFrame,
    StackTrace,
    AllocSites,
    HeapSummary,
    StartThread,
    EndThread,
    HeapDump,
    CpuSamples,
    ControlSettings,
    HeapDumpSegment,
    HeapDumpEnd,
    Unknown(u8),
}

impl RecordTag {
    pub fn from_byte(tag: u8) -> Self {
        match tag {
            0x01 => Self::Utf8,
            0x02 => Self::LoadClass,
            0x03 => Self::UnloadClass,
            0x04 => Self::StackFrame,
            0x05 => Self::StackTrace,
            0x06 => Self::AllocSites,
            0x07 => Self::HeapSummary,
            0x0A => Self::StartThread,
            0x0B => Self::EndThread,
            0x0C => Self::HeapDump,
            0x0D => Self::CpuSamples,
            0x0E => Self::ControlSettings,
            0x1C => Self::HeapDumpSegment,
            0x2C => Self::HeapDumpEnd,
            _ => Self::Unknown(tag),
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            Self::Utf8 => 0x01,
            Self::LoadClass => 0x02,
            Self::UnloadClass => 0x03,
            Self::StackFrame => 0x04,
            Self::StackTrace => 0x05,
            Self::AllocSites => 0x06,
            Self::HeapSummary => 0x07,
            Self::StartThread => 0x0A,
            Self::EndThread => 0x0B,
            Self::HeapDump => 0x0C,
            Self::CpuSamples => 0x0D,
            Self::ControlSettings => 0x0E,
            Self::HeapDumpSegment => 0x1C,
            Self::HeapDumpEnd => 0x2C,
            Self::Unknown(tag) => tag,
        }
    }
}

/// A decoded record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub tag: RecordTag,
    /// Microseconds since the document timestamp. Unused.
    pub time_delta: u32,
    /// Bytes of payload following the header.
    pub length: u32,
}

impl RecordHeader {
    /// Encoded size of a record header.
    pub const SIZE: usize = 9;

    pub fn decode(r: [u8; Self::SIZE]) -> Self {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct RawHeader {
            tag: u8,
            time_delta: [u8; 4],
            length: [u8; 4],
        }

        let RawHeader {
            tag,
            time_delta,
            length,
        } = zerocopy::transmute!(r);

        Self {
            tag: RecordTag::from_byte(tag),
            time_delta: u32::from_be_bytes(time_delta),
            length: u32::from_be_bytes(length),
        }
    }

    /// Read a record header and step the cursor over the whole record.
    ///
    /// Returns the header and a cursor over the payload. The outer cursor
    /// lands on the next record whatever happens to the payload, including
    /// when the declared length runs past the end of the slice.
    pub fn frame<'a>(c: &mut Cursor<'a>) -> Result<(Self, Cursor<'a>), CursorError> {
        let header = Self::decode(c.take()?);
        let payload = c.window(header.length as usize);

        c.seek(c.position().saturating_add(header.length as usize));

        Ok((header, payload))
    }

    /// Whether a framed payload holds fewer bytes than the declared length.
    pub fn is_truncated(&self, payload: &Cursor<'_>) -> bool {
        payload.remaining() < self.length as usize
    }
}

/// A class load announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadClass {
    pub serial: u32,
    pub class_id: Id,
    pub stack_trace_serial: u32,
    pub name_id: Id,
}

/// A decoded top-level record other than a heap dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record<'a> {
    /// A string definition. Invalid UTF-8 is replaced.
    Utf8 {
        id: Id,
        text: Cow<'a, str>,
    },
    LoadClass(LoadClass),
    /// A record left undecoded.
    Skipped(RecordTag),
}

/// Decode a record payload.
///
/// Returns the record, or for heap dumps and heap dump segments, an iterator
/// over the payload's sub-records.
pub fn decode<'a>(
    tag: RecordTag,
    mut c: Cursor<'a>,
) -> Result<Either<Record<'a>, SubRecords<'a>>, DecodeError> {
    Ok(match tag {
        RecordTag::Utf8 => {
            let id = c.id()?;
            let text = String::from_utf8_lossy(c.rest());
            Left(Record::Utf8 { id, text })
        }
        RecordTag::LoadClass => Left(Record::LoadClass(LoadClass {
            serial: c.u32()?,
            class_id: c.id()?,
            stack_trace_serial: c.u32()?,
            name_id: c.id()?,
        })),
        RecordTag::HeapDump | RecordTag::HeapDumpSegment => Right(SubRecords::new(c)),
        _ => Left(Record::Skipped(tag)),
    })
}
