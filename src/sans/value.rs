//! Identifiers and tagged scalar values.

use super::{DecodeError, cursor::Cursor};

/// An opaque object, class, or string identifier.
///
/// Four-byte identifiers are zero-extended.
pub type Id = u64;

/// Width of every identifier in a document, fixed by its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdSize {
    Four,
    Eight,
}

impl IdSize {
    /// Interpret a header's identifier width, if supported.
    pub fn from_bytes(n: u32) -> Option<Self> {
        match n {
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    /// Number of bytes per identifier.
    pub fn bytes(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

/// The basic types a field, constant or array element can hold.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    Object = 2,
    Boolean = 4,
    Char = 5,
    Float = 6,
    Double = 7,
    Byte = 8,
    Short = 9,
    Int = 10,
    Long = 11,
}

impl BasicType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            2 => Self::Object,
            4 => Self::Boolean,
            5 => Self::Char,
            6 => Self::Float,
            7 => Self::Double,
            8 => Self::Byte,
            9 => Self::Short,
            10 => Self::Int,
            11 => Self::Long,
            _ => None?,
        })
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Encoded width of one value of this type.
    pub fn size(self, id_size: IdSize) -> usize {
        match self {
            Self::Object => id_size.bytes(),
            Self::Boolean | Self::Byte => 1,
            Self::Char | Self::Short => 2,
            Self::Float | Self::Int => 4,
            Self::Double | Self::Long => 8,
        }
    }

    /// Width of one array element for a raw type tag, defaulting to a single
    /// byte for tags outside the basic types.
    pub fn element_size(tag: u8, id_size: IdSize) -> usize {
        Self::from_tag(tag).map_or(1, |t| t.size(id_size))
    }
}

/// A decoded scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Object(Id),
    Boolean(bool),
    Char(u16),
    Float(f32),
    Double(f64),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
}

impl Value {
    pub fn basic_type(&self) -> BasicType {
        match self {
            Self::Object(_) => BasicType::Object,
            Self::Boolean(_) => BasicType::Boolean,
            Self::Char(_) => BasicType::Char,
            Self::Float(_) => BasicType::Float,
            Self::Double(_) => BasicType::Double,
            Self::Byte(_) => BasicType::Byte,
            Self::Short(_) => BasicType::Short,
            Self::Int(_) => BasicType::Int,
            Self::Long(_) => BasicType::Long,
        }
    }
}

/// Read a one-byte type tag.
pub fn read_type(c: &mut Cursor<'_>) -> Result<BasicType, DecodeError> {
    let tag = c.u8()?;
    BasicType::from_tag(tag).ok_or(DecodeError::UnknownBasicType(tag))
}

/// Decode a value of a known type.
pub fn read_value(c: &mut Cursor<'_>, t: BasicType) -> Result<Value, DecodeError> {
    Ok(match t {
        BasicType::Object => Value::Object(c.id()?),
        BasicType::Boolean => Value::Boolean(c.u8()? != 0),
        BasicType::Char => Value::Char(c.u16()?),
        BasicType::Float => Value::Float(f32::from_bits(c.u32()?)),
        BasicType::Double => Value::Double(f64::from_bits(c.u64()?)),
        BasicType::Byte => Value::Byte(i8::from_be_bytes(c.take()?)),
        BasicType::Short => Value::Short(i16::from_be_bytes(c.take()?)),
        BasicType::Int => Value::Int(i32::from_be_bytes(c.take()?)),
        BasicType::Long => Value::Long(i64::from_be_bytes(c.take()?)),
    })
}

/// Step over a value of a known type without decoding it.
pub fn skip_value(c: &mut Cursor<'_>, t: BasicType) -> Result<(), DecodeError> {
    Ok(c.skip(t.size(c.id_size()))?)
}
