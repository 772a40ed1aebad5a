use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DescriptorError {
    #[error("Unknown type [{tag} at {position} in {descriptor}]")]
    UnknownTypeTag {
        tag: char,
        position: usize,
        descriptor: String,
    },
    #[error("Descriptor ended before a type was complete: {descriptor}")]
    UnexpectedEnd { descriptor: String },
    #[error("Method descriptor has no return type: {descriptor}")]
    MissingReturnType { descriptor: String },
    #[error("Method descriptor has more than one return type: {descriptor}")]
    MultipleReturnTypes { descriptor: String },
}
