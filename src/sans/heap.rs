//! Sub-records inside heap dump and heap dump segment records.
//!
//! Sub-records carry no length of their own; each layout is implied by its
//! tag. A tag outside the known set therefore leaves no way to find the next
//! sub-record, and [`SubRecords`] stops at the first one.

use alloc::vec::Vec;

use either::Either::{self, Left, Right};

use super::{
    DecodeError,
    cursor::Cursor,
    value::{BasicType, Id, Value, read_type, read_value, skip_value},
};

pub const ROOT_UNKNOWN: u8 = 0xFF;
pub const ROOT_JNI_GLOBAL: u8 = 0x01;
pub const ROOT_JNI_LOCAL: u8 = 0x02;
pub const ROOT_JAVA_FRAME: u8 = 0x03;
pub const ROOT_NATIVE_STACK: u8 = 0x04;
pub const ROOT_STICKY_CLASS: u8 = 0x05;
pub const ROOT_THREAD_BLOCK: u8 = 0x06;
pub const ROOT_MONITOR_USED: u8 = 0x07;
pub const ROOT_THREAD_OBJECT: u8 = 0x08;
pub const CLASS_DUMP: u8 = 0x20;
pub const INSTANCE_DUMP: u8 = 0x21;
pub const OBJECT_ARRAY_DUMP: u8 = 0x22;
pub const PRIMITIVE_ARRAY_DUMP: u8 = 0x23;

/// Thread and stack position of a thread-scoped root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadFrame {
    pub thread_serial: u32,
    pub frame_number: u32,
}

/// The reason an object is held reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Unknown,
    JniGlobal { global_ref_id: Id },
    JniLocal(ThreadFrame),
    JavaFrame(ThreadFrame),
    NativeStack(ThreadFrame),
    StickyClass,
    ThreadBlock(ThreadFrame),
    MonitorUsed,
    ThreadObject,
}

impl RootKind {
    /// Thread and frame, for thread-scoped kinds.
    pub fn thread_frame(&self) -> Option<ThreadFrame> {
        match self {
            Self::JniLocal(t)
            | Self::JavaFrame(t)
            | Self::NativeStack(t)
            | Self::ThreadBlock(t) => Some(*t),
            _ => None,
        }
    }
}

/// A garbage collection root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Root {
    pub object_id: Id,
    pub kind: RootKind,
}

/// A static field and its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticField {
    pub name_id: Id,
    pub value: Value,
}

/// An instance field declaration. Values live in instance dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name_id: Id,
    pub basic_type: BasicType,
}

/// Class metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDump {
    pub class_id: Id,
    pub stack_trace_serial: u32,
    pub super_class_id: Id,
    pub class_loader_id: Id,
    pub instance_size: u32,
    pub static_fields: Vec<StaticField>,
    pub instance_fields: Vec<FieldDescriptor>,
}

/// An object instance with its field bytes left undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDump<'a> {
    pub object_id: Id,
    pub stack_trace_serial: u32,
    pub class_id: Id,
    pub data: &'a [u8],
}

/// An array of object references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectArrayDump {
    pub array_id: Id,
    pub stack_trace_serial: u32,
    pub element_class_id: Id,
    pub elements: Vec<Id>,
    /// Element count times identifier width.
    pub size: u64,
}

/// An array of primitives. Element values are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveArrayDump {
    pub array_id: Id,
    pub stack_trace_serial: u32,
    pub length: u32,
    /// Raw element type tag, kept even when outside the basic types.
    pub element_type: u8,
    /// Total bytes of element data.
    pub size: u64,
}

/// A decoded heap sub-record.
#[derive(Debug, Clone, PartialEq)]
pub enum SubRecord<'a> {
    Root(Root),
    ClassDump(ClassDump),
    InstanceDump(InstanceDump<'a>),
    ObjectArrayDump(ObjectArrayDump),
    PrimitiveArrayDump(PrimitiveArrayDump),
}

/// Decode the sub-record at the cursor.
///
/// Returns the sub-record, or the tag if it is not recognized. After an
/// unrecognized tag the cursor sits just past the tag byte and the rest of
/// the payload cannot be framed.
pub fn decode<'a>(c: &mut Cursor<'a>) -> Result<Either<SubRecord<'a>, u8>, DecodeError> {
    let tag = c.u8()?;

    let record = match tag {
        ROOT_UNKNOWN => root(c, RootKind::Unknown)?,
        ROOT_STICKY_CLASS => root(c, RootKind::StickyClass)?,
        ROOT_MONITOR_USED => root(c, RootKind::MonitorUsed)?,
        ROOT_THREAD_OBJECT => root(c, RootKind::ThreadObject)?,
        ROOT_JNI_GLOBAL => {
            let object_id = c.id()?;
            let global_ref_id = c.id()?;
            SubRecord::Root(Root {
                object_id,
                kind: RootKind::JniGlobal { global_ref_id },
            })
        }
        ROOT_JNI_LOCAL => thread_root(c, RootKind::JniLocal)?,
        ROOT_JAVA_FRAME => thread_root(c, RootKind::JavaFrame)?,
        ROOT_NATIVE_STACK => thread_root(c, RootKind::NativeStack)?,
        ROOT_THREAD_BLOCK => thread_root(c, RootKind::ThreadBlock)?,
        CLASS_DUMP => SubRecord::ClassDump(class_dump(c)?),
        INSTANCE_DUMP => SubRecord::InstanceDump(instance_dump(c)?),
        OBJECT_ARRAY_DUMP => SubRecord::ObjectArrayDump(object_array_dump(c)?),
        PRIMITIVE_ARRAY_DUMP => SubRecord::PrimitiveArrayDump(primitive_array_dump(c)?),
        _ => return Ok(Right(tag)),
    };

    Ok(Left(record))
}

fn root<'a>(c: &mut Cursor<'a>, kind: RootKind) -> Result<SubRecord<'a>, DecodeError> {
    let object_id = c.id()?;
    Ok(SubRecord::Root(Root { object_id, kind }))
}

fn thread_root<'a>(
    c: &mut Cursor<'a>,
    kind: fn(ThreadFrame) -> RootKind,
) -> Result<SubRecord<'a>, DecodeError> {
    let object_id = c.id()?;
    let thread_serial = c.u32()?;
    let frame_number = c.u32()?;

    Ok(SubRecord::Root(Root {
        object_id,
        kind: kind(ThreadFrame {
            thread_serial,
            frame_number,
        }),
    }))
}

/// Decode the body of a class dump, after its tag.
pub fn class_dump(c: &mut Cursor<'_>) -> Result<ClassDump, DecodeError> {
    let class_id = c.id()?;
    let stack_trace_serial = c.u32()?;
    let super_class_id = c.id()?;
    let class_loader_id = c.id()?;
    let _reserved = (c.id()?, c.id()?);
    let instance_size = c.u32()?;

    let constants = c.u16()?;
    for _ in 0..constants {
        let _index = c.u16()?;
        let t = read_type(c)?;
        skip_value(c, t)?;
    }

    let statics = c.u16()?;
    let mut static_fields = Vec::with_capacity(statics.into());
    for _ in 0..statics {
        let name_id = c.id()?;
        let t = read_type(c)?;
        let value = read_value(c, t)?;
        static_fields.push(StaticField { name_id, value });
    }

    let fields = c.u16()?;
    let mut instance_fields = Vec::with_capacity(fields.into());
    for _ in 0..fields {
        let name_id = c.id()?;
        let basic_type = read_type(c)?;
        instance_fields.push(FieldDescriptor {
            name_id,
            basic_type,
        });
    }

    Ok(ClassDump {
        class_id,
        stack_trace_serial,
        super_class_id,
        class_loader_id,
        instance_size,
        static_fields,
        instance_fields,
    })
}

/// Decode the body of an instance dump, after its tag.
pub fn instance_dump<'a>(c: &mut Cursor<'a>) -> Result<InstanceDump<'a>, DecodeError> {
    let object_id = c.id()?;
    let stack_trace_serial = c.u32()?;
    let class_id = c.id()?;
    let len = c.u32()?;
    let data = c.bytes(len as usize)?;

    Ok(InstanceDump {
        object_id,
        stack_trace_serial,
        class_id,
        data,
    })
}

/// Decode the body of an object array dump, after its tag.
pub fn object_array_dump(c: &mut Cursor<'_>) -> Result<ObjectArrayDump, DecodeError> {
    let array_id = c.id()?;
    let stack_trace_serial = c.u32()?;
    let length = c.u32()? as usize;
    let element_class_id = c.id()?;

    // Bound the allocation by what the payload could hold.
    let mut elements = Vec::with_capacity(length.min(c.remaining() / c.id_size().bytes()));
    for _ in 0..length {
        elements.push(c.id()?);
    }

    let size = elements.len() as u64 * c.id_size().bytes() as u64;

    Ok(ObjectArrayDump {
        array_id,
        stack_trace_serial,
        element_class_id,
        elements,
        size,
    })
}

/// Decode the body of a primitive array dump, after its tag.
pub fn primitive_array_dump(c: &mut Cursor<'_>) -> Result<PrimitiveArrayDump, DecodeError> {
    let array_id = c.id()?;
    let stack_trace_serial = c.u32()?;
    let length = c.u32()?;
    let element_type = c.u8()?;

    let size = u64::from(length) * BasicType::element_size(element_type, c.id_size()) as u64;
    c.skip(usize::try_from(size).map_err(|_| DecodeError::EndOfSlice)?)?;

    Ok(PrimitiveArrayDump {
        array_id,
        stack_trace_serial,
        length,
        element_type,
        size,
    })
}

/// Iterator over the sub-records of one heap dump payload.
///
/// Yields each decoded sub-record. On an unrecognized tag it yields
/// `Right(tag)` and then ends, as does it after an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRecords<'a> {
    c: Cursor<'a>,
    done: bool,
}

impl<'a> SubRecords<'a> {
    /// Iterate sub-records until the end of a payload window.
    pub fn new(c: Cursor<'a>) -> Self {
        Self { c, done: false }
    }

    /// Offset of the next sub-record.
    pub fn position(&self) -> usize {
        self.c.position()
    }
}

impl<'a> Iterator for SubRecords<'a> {
    type Item = Result<Either<SubRecord<'a>, u8>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.c.is_empty() {
            return None;
        }

        let item = decode(&mut self.c);
        self.done = !matches!(item, Ok(Left(_)));

        Some(item)
    }
}
