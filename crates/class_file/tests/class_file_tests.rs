mod common;

use jdecode_class_file::{
    attributes::{Attribute, AttributeKind},
    descriptor::{BaseType, FieldType, TypeTag},
    AccessFlags, ClassFile, ClassFileError, Parser,
};

use common::{attribute, u16s, ClassBuilder};

fn with_class_file(f: impl FnOnce(ClassFile)) {
    common::init_logger();
    f(Parser::new(&common::my_class()).parse().unwrap());
}

#[test]
fn test_header() {
    with_class_file(|class_file| {
        assert_eq!(0xCAFEBABE, class_file.magic);
        assert_eq!(61, class_file.version().major);
        assert_eq!(0, class_file.version().minor);
    });
}

#[test]
fn test_super_class() {
    with_class_file(|class_file| {
        assert_eq!(Some("java/lang/Object"), class_file.super_class().unwrap())
    });
}

#[test]
fn test_class_name() {
    with_class_file(|class_file| assert_eq!("my/MyClass", class_file.class_name().unwrap()));
}

#[test]
fn test_class_access_flags() {
    with_class_file(|class_file| {
        assert_eq!(
            AccessFlags::PUBLIC | AccessFlags::SUPER,
            class_file.access_flags()
        )
    });
}

#[test]
fn test_interface_names() {
    with_class_file(|class_file| {
        assert_eq!(
            vec!["java/io/Serializable"],
            class_file.interface_names().unwrap()
        )
    });
}

#[test]
fn test_source_file() {
    with_class_file(|class_file| {
        assert_eq!(Some("MyClass.java"), class_file.source_file().unwrap())
    });
}

#[test]
fn test_field_name() {
    with_class_file(|class_file| {
        assert_eq!(
            "myField",
            class_file.field_name(&class_file.fields()[0]).unwrap()
        )
    });
}

#[test]
fn test_int_field_descriptor() {
    with_class_file(|class_file| {
        let descriptor = class_file.field_descriptor(&class_file.fields()[0]).unwrap();

        assert_eq!("I", descriptor.descriptor);
        assert_eq!(TypeTag::Base(BaseType::Int), descriptor.type_tag);
        assert_eq!(FieldType::Base(BaseType::Int), descriptor.field_type);
        assert_eq!("private final ", descriptor.modifiers);
        assert_eq!("private final int myField;", descriptor.text);
    });
}

#[test]
fn test_field_access_flags() {
    with_class_file(|class_file| {
        assert_eq!(
            AccessFlags::FINAL | AccessFlags::PRIVATE,
            class_file.fields()[0].access_flags
        )
    });
}

#[test]
fn test_field_attributes_are_decoded() {
    with_class_file(|class_file| {
        let field = &class_file.fields()[0];

        assert_eq!(Some(18), field.constant_value_index());
        assert_eq!(
            Some(42),
            match class_file.constant_pool()[18] {
                jdecode_class_file::CpInfo::Integer(value) => Some(value),
                _ => None,
            }
        );
    });
}

#[test]
fn test_constructor_name() {
    with_class_file(|class_file| {
        assert_eq!(
            "<init>",
            class_file.method_name(&class_file.methods()[0]).unwrap()
        )
    });
}

#[test]
fn test_constructor_descriptor() {
    with_class_file(|class_file| {
        let descriptor = class_file
            .method_descriptor(&class_file.methods()[0])
            .unwrap();

        assert_eq!("()V", descriptor.descriptor);
        assert!(descriptor.signature.parameter_types.is_empty());
        assert_eq!("public void <init>();", descriptor.text);
    });
}

#[test]
fn test_method_name() {
    with_class_file(|class_file| {
        assert_eq!(
            "add",
            class_file.method_name(&class_file.methods()[1]).unwrap()
        )
    });
}

#[test]
fn test_method_descriptor() {
    with_class_file(|class_file| {
        let descriptor = class_file
            .method_descriptor(&class_file.methods()[1])
            .unwrap();

        assert_eq!("(I)F", descriptor.descriptor);
        assert_eq!(
            vec![FieldType::Base(BaseType::Int)],
            descriptor.signature.parameter_types
        );
        assert_eq!(
            FieldType::Base(BaseType::Float),
            descriptor.signature.return_type
        );
        assert_eq!("public float add(int);", descriptor.text);
    });
}

#[test]
fn test_method_access_flags() {
    with_class_file(|class_file| {
        assert_eq!(AccessFlags::PUBLIC, class_file.methods()[1].access_flags)
    });
}

#[test]
fn test_method_code() {
    with_class_file(|class_file| {
        let code = class_file.methods()[1].code().unwrap();

        assert_eq!(2, code.max_stack);
        assert_eq!(2, code.max_locals);
        assert_eq!(vec![0x1b, 0x86, 0xae], code.code);
        assert_eq!(1, code.exception_table.len());
        assert_eq!(8, code.exception_table[0].catch_type);
    });
}

#[test]
fn test_method_exceptions() {
    with_class_file(|class_file| {
        assert_eq!(&[8], class_file.methods()[1].exceptions());
        assert!(class_file.methods()[0].exceptions().is_empty());
    });
}

#[test]
fn test_classes() {
    with_class_file(|class_file| {
        assert_eq!(
            vec!["my/MyClass$Inner", "my/MyClass"],
            class_file.classes()
        )
    });
}

#[test]
fn test_class_level_attributes() {
    with_class_file(|class_file| {
        assert_eq!(2, class_file.attributes.len());
        assert!(class_file
            .find_attribute(AttributeKind::InnerClasses)
            .is_some());
        assert!(class_file.find_attribute(AttributeKind::Deprecated).is_none());
    });
}

#[test]
fn test_decoding_is_deterministic() {
    let bytes = common::my_class();

    assert_eq!(
        ClassFile::parse(&bytes).unwrap(),
        ClassFile::parse(&bytes).unwrap()
    );
}

#[test]
fn test_decoding_with_nan_float_is_deterministic() {
    let mut b = ClassBuilder::new();
    let this_class = b.class("java/lang/Float");
    // Float.NaN as javac stores it.
    let nan = b.constant(4, &[0x7f, 0xc0, 0x00, 0x00], 1);
    let bytes = b.build(this_class, 0);

    let first = ClassFile::parse(&bytes).unwrap();
    let second = ClassFile::parse(&bytes).unwrap();

    assert_eq!(first, second);
    assert!(first.constant_pool()[nan].float_value().unwrap().is_nan());
}

#[test]
fn test_truncated_anywhere_is_out_of_bounds() {
    let bytes = common::my_class();

    for len in [0, 3, 9, 40, bytes.len() / 2, bytes.len() - 1] {
        assert!(
            matches!(
                ClassFile::parse(&bytes[..len]),
                Err(ClassFileError::OutOfBounds { .. })
            ),
            "truncated at {}",
            len
        );
    }
}

#[test]
fn test_trailing_bytes_are_rejected() {
    let mut bytes = common::my_class();
    let len = bytes.len();
    bytes.extend_from_slice(&[0, 0]);

    match ClassFile::parse(&bytes) {
        Err(ClassFileError::TrailingBytes { offset, remaining }) => {
            assert_eq!((len, 2), (offset, remaining))
        }
        other => panic!("expected TrailingBytes, got {:?}", other),
    }
}

#[test]
fn test_invalid_magic() {
    let mut bytes = common::my_class();
    bytes[0] = 0xCB;

    assert!(matches!(
        ClassFile::parse(&bytes),
        Err(ClassFileError::InvalidMagicIdentifier(0xCBFEBABE))
    ));
}

#[test]
fn test_zero_interfaces_are_dropped() {
    let mut b = ClassBuilder::new();
    let this_class = b.class("A");
    let runnable = b.class("java/lang/Runnable");
    b.interface(0);
    b.interface(runnable);

    let class_file = ClassFile::parse(&b.build(this_class, 0)).unwrap();

    assert_eq!(vec![runnable], class_file.interfaces);
    assert_eq!(None, class_file.super_class().unwrap());
}

#[test]
fn test_classes_skips_zero_inner_index_but_keeps_outer() {
    let mut b = ClassBuilder::new();
    let this_class = b.class("Outer");
    let inner_classes = b.utf8("InnerClasses");
    b.attribute(attribute(inner_classes, &u16s(&[1, 0, this_class, 0, 0])));

    let class_file = ClassFile::parse(&b.build(this_class, 0)).unwrap();

    assert_eq!(vec!["Outer"], class_file.classes());
}

#[test]
fn test_classes_logs_and_skips_unresolvable_entries() {
    common::init_logger();
    let mut b = ClassBuilder::new();
    let this_class = b.class("Outer");
    let inner_classes = b.utf8("InnerClasses");
    // inner_class_info_index points at a Utf8 entry instead of a Class entry.
    b.attribute(attribute(
        inner_classes,
        &u16s(&[1, inner_classes, this_class, 0, 0]),
    ));

    let class_file = ClassFile::parse(&b.build(this_class, 0)).unwrap();

    assert_eq!(vec!["Outer"], class_file.classes());
    assert!(matches!(
        class_file.try_classes(),
        Err(ClassFileError::UnexpectedConstantPoolEntry("Class", _))
    ));
}

#[test]
fn test_field_descriptor_with_array_of_objects() {
    let mut b = ClassBuilder::new();
    let this_class = b.class("A");
    b.field(0x0019, "NAMES", "[Ljava/lang/String;", &[]);

    let class_file = ClassFile::parse(&b.build(this_class, 0)).unwrap();
    let descriptor = class_file.field_descriptor(&class_file.fields()[0]).unwrap();

    assert_eq!(TypeTag::Array, descriptor.type_tag);
    assert_eq!(
        "public static final java.lang.String[] NAMES;",
        descriptor.text
    );
}

#[test]
fn test_method_descriptor_with_unknown_type_tag() {
    let mut b = ClassBuilder::new();
    let this_class = b.class("A");
    b.method(0x0001, "broken", "(X)V", &[]);

    let class_file = ClassFile::parse(&b.build(this_class, 0)).unwrap();

    assert!(matches!(
        class_file.method_descriptor(&class_file.methods()[0]),
        Err(ClassFileError::UnknownTypeTag(_))
    ));
}

#[test]
fn test_method_descriptor_text_for_main() {
    let mut b = ClassBuilder::new();
    let this_class = b.class("A");
    b.method(0x0009, "main", "([Ljava/lang/String;)V", &[]);

    let class_file = ClassFile::parse(&b.build(this_class, 0)).unwrap();

    assert_eq!(
        "public static void main(java.lang.String[]);",
        class_file
            .method_descriptor(&class_file.methods()[0])
            .unwrap()
            .text
    );
}

#[test]
fn test_access_flag_keywords_order() {
    assert_eq!(
        "public static final ",
        (AccessFlags::FINAL | AccessFlags::STATIC | AccessFlags::PUBLIC).to_keywords()
    );
    assert_eq!(
        "private volatile transient ",
        (AccessFlags::TRANSIENT | AccessFlags::PRIVATE | AccessFlags::VOLATILE).to_keywords()
    );
    assert_eq!(
        "public interface abstract ",
        AccessFlags::from_bits_truncate(0x0601).to_keywords()
    );
    assert_eq!("", AccessFlags::empty().to_keywords());
}

#[test]
fn test_deprecated_method_attribute() {
    let mut b = ClassBuilder::new();
    let this_class = b.class("A");
    let deprecated = b.utf8("Deprecated");
    b.method(0x0001, "old", "()V", &[attribute(deprecated, &[])]);

    let class_file = ClassFile::parse(&b.build(this_class, 0)).unwrap();

    assert_eq!(
        Some(&Attribute::Deprecated),
        class_file.methods()[0]
            .attributes
            .find(AttributeKind::Deprecated)
    );
}
