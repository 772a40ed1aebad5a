use thiserror::Error;

use crate::constant_pool;

#[derive(Error, Debug)]
pub enum ClassFileError {
    #[error("Out of bounds at offset {offset}: requested {requested} bytes, {remaining} remaining")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        remaining: usize,
    },
    #[error("Unsupported constant pool tag {tag} at offset {offset}")]
    UnsupportedConstantTag { tag: u8, offset: usize },
    #[error("This attribute type is not supported yet. [#{name_index} {entry}]")]
    UnsupportedAttribute { name_index: u16, entry: String },
    #[error(transparent)]
    UnknownTypeTag(#[from] jdecode_descriptor::DescriptorError),
    #[error("Invalid magic identifier: 0x{0:X}")]
    InvalidMagicIdentifier(u32),
    #[error("Malformed modified UTF-8 at offset {offset}")]
    MalformedModifiedUtf8 { offset: usize },
    #[error("Invalid constant pool index: {0}")]
    InvalidConstantPoolIndex(u16),
    #[error("Expected {0}, found {1:?}")]
    UnexpectedConstantPoolEntry(&'static str, constant_pool::CpInfo),
    #[error("Invalid constant pool count {count} at offset {offset}")]
    InvalidConstantPoolCount { count: u16, offset: usize },
    #[error("Eight-byte constant at index {index} overflows the declared constant pool")]
    WideConstantOverflow { index: usize },
    #[error("{remaining} trailing bytes at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },
    #[error("Unknown element_value tag [{tag}] at offset {offset}")]
    UnknownElementValueTag { tag: char, offset: usize },
}
