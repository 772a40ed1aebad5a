#![allow(dead_code)]

use byteorder::{BigEndian, WriteBytesExt};

type Endian = BigEndian;

pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

/// Assembles class images field by field so tests do not depend on a Java compiler.
pub struct ClassBuilder {
    constants: Vec<u8>,
    next_index: u16,
    declared_count: Option<u16>,
    pub access_flags: u16,
    interfaces: Vec<u16>,
    fields: Vec<Vec<u8>>,
    methods: Vec<Vec<u8>>,
    attributes: Vec<Vec<u8>>,
}
impl ClassBuilder {
    pub fn new() -> Self {
        Self {
            constants: Vec::new(),
            next_index: 1,
            declared_count: None,
            access_flags: 0x0021,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Appends a constant and returns its index.
    pub fn constant(&mut self, tag: u8, payload: &[u8], slots: u16) -> u16 {
        let index = self.next_index;
        self.constants.push(tag);
        self.constants.extend_from_slice(payload);
        self.next_index += slots;
        index
    }

    pub fn utf8(&mut self, s: &str) -> u16 {
        let mut payload = Vec::new();
        payload.write_u16::<Endian>(s.len() as u16).unwrap();
        payload.extend_from_slice(s.as_bytes());
        self.constant(1, &payload, 1)
    }

    pub fn integer(&mut self, value: i32) -> u16 {
        self.constant(3, &value.to_be_bytes(), 1)
    }

    pub fn float(&mut self, value: f32) -> u16 {
        self.constant(4, &value.to_be_bytes(), 1)
    }

    pub fn long(&mut self, value: i64) -> u16 {
        self.constant(5, &value.to_be_bytes(), 2)
    }

    pub fn double(&mut self, value: f64) -> u16 {
        self.constant(6, &value.to_be_bytes(), 2)
    }

    pub fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.constant(7, &name_index.to_be_bytes(), 1)
    }

    pub fn string(&mut self, s: &str) -> u16 {
        let string_index = self.utf8(s);
        self.constant(8, &string_index.to_be_bytes(), 1)
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.constant(12, &u16_pair(name_index, descriptor_index), 1)
    }

    pub fn method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(class);
        let name_and_type_index = self.name_and_type(name, descriptor);
        self.constant(10, &u16_pair(class_index, name_and_type_index), 1)
    }

    /// Overrides the constant_pool_count written by [`ClassBuilder::build`].
    pub fn declare_constant_count(&mut self, count: u16) {
        self.declared_count = Some(count);
    }

    pub fn constant_count(&self) -> u16 {
        self.declared_count.unwrap_or(self.next_index)
    }

    pub fn interface(&mut self, index: u16) {
        self.interfaces.push(index);
    }

    pub fn field(&mut self, access_flags: u16, name: &str, descriptor: &str, attributes: &[Vec<u8>]) {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.fields
            .push(member(access_flags, name_index, descriptor_index, attributes));
    }

    pub fn method(
        &mut self,
        access_flags: u16,
        name: &str,
        descriptor: &str,
        attributes: &[Vec<u8>],
    ) {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.methods
            .push(member(access_flags, name_index, descriptor_index, attributes));
    }

    pub fn attribute(&mut self, attribute: Vec<u8>) {
        self.attributes.push(attribute);
    }

    pub fn build(&self, this_class: u16, super_class: u16) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u32::<Endian>(0xCAFEBABE).unwrap();
        buf.write_u16::<Endian>(0).unwrap();
        buf.write_u16::<Endian>(61).unwrap();

        buf.write_u16::<Endian>(self.constant_count()).unwrap();
        buf.extend_from_slice(&self.constants);

        buf.write_u16::<Endian>(self.access_flags).unwrap();
        buf.write_u16::<Endian>(this_class).unwrap();
        buf.write_u16::<Endian>(super_class).unwrap();

        buf.write_u16::<Endian>(self.interfaces.len() as u16).unwrap();
        for &interface in &self.interfaces {
            buf.write_u16::<Endian>(interface).unwrap();
        }

        for table in [&self.fields, &self.methods, &self.attributes] {
            buf.write_u16::<Endian>(table.len() as u16).unwrap();
            table.iter().for_each(|entry| buf.extend_from_slice(entry));
        }

        buf
    }
}

fn u16_pair(a: u16, b: u16) -> [u8; 4] {
    let [a0, a1] = a.to_be_bytes();
    let [b0, b1] = b.to_be_bytes();
    [a0, a1, b0, b1]
}

fn member(access_flags: u16, name_index: u16, descriptor_index: u16, attributes: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_u16::<Endian>(access_flags).unwrap();
    buf.write_u16::<Endian>(name_index).unwrap();
    buf.write_u16::<Endian>(descriptor_index).unwrap();
    buf.write_u16::<Endian>(attributes.len() as u16).unwrap();
    attributes.iter().for_each(|a| buf.extend_from_slice(a));
    buf
}

/// `attribute_name_index`, `attribute_length` and the body.
pub fn attribute(name_index: u16, body: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.write_u16::<Endian>(name_index).unwrap();
    buf.write_u32::<Endian>(body.len() as u32).unwrap();
    buf.extend_from_slice(body);
    buf
}

pub fn u16s(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

pub fn code_body(
    max_stack: u16,
    max_locals: u16,
    code: &[u8],
    exception_table: &[[u16; 4]],
    nested: &[Vec<u8>],
) -> Vec<u8> {
    let mut buf = u16s(&[max_stack, max_locals]);
    buf.write_u32::<Endian>(code.len() as u32).unwrap();
    buf.extend_from_slice(code);
    buf.write_u16::<Endian>(exception_table.len() as u16).unwrap();
    for entry in exception_table {
        buf.extend_from_slice(&u16s(entry));
    }
    buf.write_u16::<Endian>(nested.len() as u16).unwrap();
    nested.iter().for_each(|a| buf.extend_from_slice(a));
    buf
}

/// A small class shaped like what javac emits for
///
/// ```java
/// package my;
///
/// public class MyClass implements java.io.Serializable {
///     private final int myField = 42;
///     public MyClass() {}
///     public float add(int i) throws java.io.IOException { ... }
///     static class Inner {}
/// }
/// ```
pub fn my_class() -> Vec<u8> {
    let mut b = ClassBuilder::new();
    let this_class = b.class("my/MyClass");
    let super_class = b.class("java/lang/Object");
    let serializable = b.class("java/io/Serializable");
    let io_exception = b.class("java/io/IOException");
    let inner_class = b.class("my/MyClass$Inner");
    let inner_name = b.utf8("Inner");
    let object_init = b.method_ref("java/lang/Object", "<init>", "()V");
    let forty_two = b.integer(42);

    let constant_value = b.utf8("ConstantValue");
    let code = b.utf8("Code");
    let line_number_table = b.utf8("LineNumberTable");
    let exceptions = b.utf8("Exceptions");
    let source_file = b.utf8("SourceFile");
    let source_file_name = b.utf8("MyClass.java");
    let inner_classes = b.utf8("InnerClasses");

    b.interface(serializable);

    b.field(
        0x0012,
        "myField",
        "I",
        &[attribute(constant_value, &u16s(&[forty_two]))],
    );

    let [init_hi, init_lo] = object_init.to_be_bytes();
    let line_numbers = attribute(line_number_table, &u16s(&[1, 0, 3, 4]));
    b.method(
        0x0001,
        "<init>",
        "()V",
        &[attribute(
            code,
            &code_body(1, 1, &[0x2a, 0xb7, init_hi, init_lo, 0xb1], &[], &[line_numbers]),
        )],
    );
    b.method(
        0x0001,
        "add",
        "(I)F",
        &[
            attribute(
                code,
                &code_body(
                    2,
                    2,
                    &[0x1b, 0x86, 0xae],
                    &[[0, 2, 2, io_exception]],
                    &[],
                ),
            ),
            attribute(exceptions, &u16s(&[1, io_exception])),
        ],
    );

    b.attribute(attribute(source_file, &u16s(&[source_file_name])));
    b.attribute(attribute(
        inner_classes,
        &u16s(&[1, inner_class, this_class, inner_name, 0x0008]),
    ));

    b.build(this_class, super_class)
}
