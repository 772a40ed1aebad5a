// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html#jvms-4.3

mod decoder;
mod error;
mod types;

pub use decoder::{decode_descriptor_type, decode_signature, decode_signature_component};
pub use error::DescriptorError;
pub use types::{BaseType, FieldType, MethodSignature, TypeTag};

pub type Result<T, E = DescriptorError> = std::result::Result<T, E>;
