//! In-memory heap model.

use alloc::{
    borrow::Cow,
    collections::BTreeMap,
    format,
    string::{String, ToString},
    vec::Vec,
};

use crate::sans::{
    header::Header,
    heap::{
        ClassDump, FieldDescriptor, InstanceDump, ObjectArrayDump, PrimitiveArrayDump, Root,
        StaticField,
    },
    record::LoadClass,
    value::Id,
};

use super::{FromHeap, Warning};

/// A class, assembled from its load announcement and its class dump.
///
/// Either may arrive first. Until the class dump is seen, only the
/// announcement fields are set.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRecord {
    pub id: Id,
    /// Name resolved through the string table, if it was.
    pub name: Option<String>,
    pub name_id: Option<Id>,
    pub serial: Option<u32>,
    pub stack_trace_serial: Option<u32>,
    pub super_class_id: Option<Id>,
    pub class_loader_id: Option<Id>,
    pub instance_size: Option<u32>,
    pub static_fields: Vec<StaticField>,
    pub instance_fields: Vec<FieldDescriptor>,
    /// Instances in document order.
    pub instances: Vec<Id>,
}

impl ClassRecord {
    fn new(id: Id) -> Self {
        Self {
            id,
            name: None,
            name_id: None,
            serial: None,
            stack_trace_serial: None,
            super_class_id: None,
            class_loader_id: None,
            instance_size: None,
            static_fields: Vec::new(),
            instance_fields: Vec::new(),
            instances: Vec::new(),
        }
    }

    /// The resolved name, or a `Class#<id>` placeholder.
    pub fn name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Owned(placeholder_name(self.id)),
        }
    }

    /// Whether a class dump has been merged in.
    pub fn is_defined(&self) -> bool {
        self.instance_size.is_some()
    }

    fn merge_load(&mut self, load: LoadClass, name: Option<&str>) {
        if let Some(name) = name {
            self.name = Some(name.to_string());
        }
        self.name_id = Some(load.name_id);
        self.serial = Some(load.serial);
        self.stack_trace_serial = Some(load.stack_trace_serial);
    }

    fn merge_dump(&mut self, class: ClassDump) {
        self.stack_trace_serial = Some(class.stack_trace_serial);
        self.super_class_id = Some(class.super_class_id);
        self.class_loader_id = Some(class.class_loader_id);
        self.instance_size = Some(class.instance_size);
        self.static_fields = class.static_fields;
        self.instance_fields = class.instance_fields;
    }
}

fn placeholder_name(id: Id) -> String {
    format!("Class#{id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: Id,
    pub class_id: Id,
    pub stack_trace_serial: u32,
    /// Field values, undecoded.
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectArray {
    pub id: Id,
    pub element_class_id: Id,
    pub stack_trace_serial: u32,
    pub elements: Vec<Id>,
    /// Element count times identifier width.
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveArray {
    pub id: Id,
    pub element_type: u8,
    pub stack_trace_serial: u32,
    pub length: u32,
    pub size: u64,
}

/// Any heap object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Instance(Instance),
    ObjectArray(ObjectArray),
    PrimitiveArray(PrimitiveArray),
}

impl Object {
    pub fn id(&self) -> Id {
        match self {
            Self::Instance(o) => o.id,
            Self::ObjectArray(o) => o.id,
            Self::PrimitiveArray(o) => o.id,
        }
    }

    /// Recorded size in bytes, excluding any object header.
    pub fn size(&self) -> u64 {
        match self {
            Self::Instance(o) => o.data.len() as u64,
            Self::ObjectArray(o) => o.size,
            Self::PrimitiveArray(o) => o.size,
        }
    }

    /// Outgoing references. Only object arrays record any.
    pub fn references(&self) -> &[Id] {
        match self {
            Self::ObjectArray(o) => &o.elements,
            _ => &[],
        }
    }
}

/// Everything decoded from one document.
///
/// Build one with [`crate::parse`], or by passing a default model to one of
/// the decoders in [`crate::avec`].
#[derive(Debug, Clone, Default)]
pub struct HeapModel {
    header: Option<Header>,
    strings: BTreeMap<Id, String>,
    classes: BTreeMap<Id, ClassRecord>,
    objects: BTreeMap<Id, Object>,
    roots: Vec<Root>,
    warnings: Vec<Warning>,
}

impl HeapModel {
    /// The document header, once decoded.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn strings(&self) -> &BTreeMap<Id, String> {
        &self.strings
    }

    pub fn string(&self, id: Id) -> Option<&str> {
        self.strings.get(&id).map(String::as_str)
    }

    pub fn classes(&self) -> &BTreeMap<Id, ClassRecord> {
        &self.classes
    }

    pub fn class(&self, id: Id) -> Option<&ClassRecord> {
        self.classes.get(&id)
    }

    /// Name of a class, or a `Class#<id>` placeholder if it was never
    /// resolved or never seen.
    pub fn class_name(&self, id: Id) -> Cow<'_, str> {
        match self.classes.get(&id) {
            Some(class) => class.name(),
            None => Cow::Owned(placeholder_name(id)),
        }
    }

    pub fn objects(&self) -> &BTreeMap<Id, Object> {
        &self.objects
    }

    pub fn object(&self, id: Id) -> Option<&Object> {
        self.objects.get(&id)
    }

    /// Instances listed under a class, in document order.
    pub fn instances_of(&self, class_id: Id) -> impl Iterator<Item = &Instance> {
        self.classes
            .get(&class_id)
            .into_iter()
            .flat_map(|class| class.instances.iter())
            .filter_map(move |id| match self.objects.get(id) {
                Some(Object::Instance(instance)) => Some(instance),
                _ => None,
            })
    }

    /// Roots in document order. The same object may appear more than once.
    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    /// Every root holding an object.
    pub fn roots_of(&self, object_id: Id) -> impl Iterator<Item = &Root> {
        self.roots.iter().filter(move |r| r.object_id == object_id)
    }

    /// Sum of the recorded sizes of every object.
    pub fn total_size(&self) -> u64 {
        self.objects.values().map(Object::size).sum()
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

impl FromHeap for HeapModel {
    fn add_header(&mut self, header: &Header) {
        self.header = Some(header.clone());
    }

    fn add_string(&mut self, id: Id, text: &str) {
        self.strings.insert(id, text.to_string());
    }

    fn add_load_class(&mut self, load: LoadClass) {
        let name = self.strings.get(&load.name_id).map(String::as_str);

        self.classes
            .entry(load.class_id)
            .or_insert_with(|| ClassRecord::new(load.class_id))
            .merge_load(load, name);
    }

    fn add_root(&mut self, root: Root) {
        self.roots.push(root);
    }

    fn add_class_dump(&mut self, class: ClassDump) {
        self.classes
            .entry(class.class_id)
            .or_insert_with(|| ClassRecord::new(class.class_id))
            .merge_dump(class);
    }

    fn add_instance(&mut self, instance: InstanceDump<'_>) {
        if let Some(class) = self.classes.get_mut(&instance.class_id) {
            class.instances.push(instance.object_id);
        }

        let instance = Instance {
            id: instance.object_id,
            class_id: instance.class_id,
            stack_trace_serial: instance.stack_trace_serial,
            data: instance.data.to_vec(),
        };

        self.objects.insert(instance.id, Object::Instance(instance));
    }

    fn add_object_array(&mut self, array: ObjectArrayDump) {
        let array = ObjectArray {
            id: array.array_id,
            element_class_id: array.element_class_id,
            stack_trace_serial: array.stack_trace_serial,
            elements: array.elements,
            size: array.size,
        };

        self.objects.insert(array.id, Object::ObjectArray(array));
    }

    fn add_primitive_array(&mut self, array: PrimitiveArrayDump) {
        let array = PrimitiveArray {
            id: array.array_id,
            element_type: array.element_type,
            stack_trace_serial: array.stack_trace_serial,
            length: array.length,
            size: array.size,
        };

        self.objects.insert(array.id, Object::PrimitiveArray(array));
    }

    fn add_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}
