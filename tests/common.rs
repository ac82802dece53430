#![allow(dead_code)]

//! Builders for synthetic documents.

pub const UTF8: u8 = 0x01;
pub const LOAD_CLASS: u8 = 0x02;
pub const STACK_TRACE: u8 = 0x05;
pub const HEAP_DUMP: u8 = 0x0C;
pub const HEAP_DUMP_SEGMENT: u8 = 0x1C;
pub const HEAP_DUMP_END: u8 = 0x2C;

pub const OBJECT: u8 = 2;
pub const BOOLEAN: u8 = 4;
pub const CHAR: u8 = 5;
pub const INT: u8 = 10;
pub const LONG: u8 = 11;

pub const TIMESTAMP: u64 = 1_700_000_000_000;

pub struct Document {
    pub buf: Vec<u8>,
    id_size: u32,
}

impl Document {
    pub fn new(id_size: u32) -> Self {
        Self::with_format(b"JAVA PROFILE 1.0.2", id_size)
    }

    pub fn with_format(format: &[u8], id_size: u32) -> Self {
        let mut buf = format.to_vec();
        buf.push(0);
        buf.extend_from_slice(&id_size.to_be_bytes());
        buf.extend_from_slice(&TIMESTAMP.to_be_bytes());
        Self { buf, id_size }
    }

    /// Offset the next record will start at.
    pub fn offset(&self) -> usize {
        self.buf.len()
    }

    pub fn record(&mut self, tag: u8, payload: &[u8]) -> &mut Self {
        self.buf.push(tag);
        self.buf.extend_from_slice(&0u32.to_be_bytes());
        self.buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(payload);
        self
    }

    /// Overwrite the declared payload length of the record at `offset`.
    pub fn set_length(&mut self, offset: usize, length: u32) -> &mut Self {
        self.buf[offset + 5..offset + 9].copy_from_slice(&length.to_be_bytes());
        self
    }

    pub fn string(&mut self, id: u64, text: &str) -> &mut Self {
        let mut p = Payload::new(self.id_size);
        p.id(id).raw(text.as_bytes());
        self.record(UTF8, &p.buf)
    }

    pub fn load_class(&mut self, class_id: u64, name_id: u64) -> &mut Self {
        let mut p = Payload::new(self.id_size);
        p.u32(1).id(class_id).u32(0).id(name_id);
        self.record(LOAD_CLASS, &p.buf)
    }

    pub fn heap(&mut self, tag: u8, f: impl FnOnce(&mut Payload)) -> &mut Self {
        let mut p = Payload::new(self.id_size);
        f(&mut p);
        self.record(tag, &p.buf)
    }

    pub fn segment(&mut self, f: impl FnOnce(&mut Payload)) -> &mut Self {
        self.heap(HEAP_DUMP_SEGMENT, f)
    }
}

pub struct Payload {
    pub buf: Vec<u8>,
    id_size: u32,
}

impl Payload {
    pub fn new(id_size: u32) -> Self {
        Self {
            buf: Vec::new(),
            id_size,
        }
    }

    pub fn raw(&mut self, r: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(r);
        self
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.raw(&[v])
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.raw(&v.to_be_bytes())
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.raw(&v.to_be_bytes())
    }

    pub fn id(&mut self, v: u64) -> &mut Self {
        match self.id_size {
            4 => self.raw(&(v as u32).to_be_bytes()),
            _ => self.raw(&v.to_be_bytes()),
        }
    }

    pub fn root(&mut self, tag: u8, object_id: u64) -> &mut Self {
        self.u8(tag).id(object_id)
    }

    pub fn thread_root(&mut self, tag: u8, object_id: u64, thread: u32, frame: u32) -> &mut Self {
        self.u8(tag).id(object_id).u32(thread).u32(frame)
    }

    pub fn jni_global(&mut self, object_id: u64, ref_id: u64) -> &mut Self {
        self.u8(0x01).id(object_id).id(ref_id)
    }

    /// Class dump with no constants. Static values are given as raw bytes.
    pub fn class_dump(
        &mut self,
        class_id: u64,
        super_class_id: u64,
        instance_size: u32,
        statics: &[(u64, u8, &[u8])],
        fields: &[(u64, u8)],
    ) -> &mut Self {
        self.u8(0x20)
            .id(class_id)
            .u32(0)
            .id(super_class_id)
            .id(0)
            .id(0)
            .id(0)
            .u32(instance_size)
            .u16(0);

        self.u16(statics.len() as u16);
        for (name, t, value) in statics {
            self.id(*name).u8(*t).raw(value);
        }

        self.u16(fields.len() as u16);
        for (name, t) in fields {
            self.id(*name).u8(*t);
        }

        self
    }

    pub fn instance(&mut self, object_id: u64, class_id: u64, data: &[u8]) -> &mut Self {
        self.u8(0x21)
            .id(object_id)
            .u32(0)
            .id(class_id)
            .u32(data.len() as u32)
            .raw(data)
    }

    pub fn object_array(&mut self, array_id: u64, class_id: u64, elements: &[u64]) -> &mut Self {
        self.u8(0x22)
            .id(array_id)
            .u32(0)
            .u32(elements.len() as u32)
            .id(class_id);

        for e in elements {
            self.id(*e);
        }

        self
    }

    pub fn primitive_array(
        &mut self,
        array_id: u64,
        element_type: u8,
        data: &[u8],
        len: u32,
    ) -> &mut Self {
        self.u8(0x23)
            .id(array_id)
            .u32(0)
            .u32(len)
            .u8(element_type)
            .raw(data)
    }
}
