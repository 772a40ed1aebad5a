// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html

#[macro_use]
mod constant_pool;
mod access_flags;
pub mod attributes;
mod class_file;
pub mod diagnostics;
mod error;
mod parser;
pub mod reader;

pub use self::class_file::{
    ClassFile, FieldDescriptor, FieldInfo, MethodDescriptor, MethodInfo, Version,
};
pub use access_flags::AccessFlags;
pub use constant_pool::{
    ClassInfo, ConstantPool, CpInfo, InvokeDynamicInfo, MethodHandleInfo, MethodTypeInfo,
    NameAndTypeInfo, RefInfo,
};
pub use diagnostics::{Diagnostic, Diagnostics, Policy};
pub use error::ClassFileError;
pub use jdecode_descriptor as descriptor;
pub use parser::Parser;

pub type Result<T, E = ClassFileError> = std::result::Result<T, E>;
