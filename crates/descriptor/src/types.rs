use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
    Void,
}
impl BaseType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            b'V' => BaseType::Void,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
            BaseType::Void => "void",
        }
    }
}

/// The kind of a descriptor, judged from its first character only.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TypeTag {
    Base(BaseType),
    Class,
    Array,
}
impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Base(base) => f.write_str(base.name()),
            TypeTag::Class => f.write_str("class"),
            TypeTag::Array => f.write_str("array"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum FieldType {
    Base(BaseType),
    /// Binary class name with `.` separators, e.g. `java.lang.String`.
    Object(String),
    Array(Box<FieldType>),
}
impl FieldType {
    /// Number of `[` the type was declared with.
    pub fn dimensions(&self) -> usize {
        match self {
            FieldType::Array(element) => 1 + element.dimensions(),
            _ => 0,
        }
    }
}
impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => f.write_str(base.name()),
            FieldType::Object(class_name) => f.write_str(class_name),
            FieldType::Array(element) => write!(f, "{}[]", element),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct MethodSignature {
    /// Empty when the descriptor declares no parameters.
    pub parameter_types: Vec<FieldType>,
    pub return_type: FieldType,
}
impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.return_type)?;
        for (i, parameter) in self.parameter_types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", parameter)?;
        }
        f.write_str(")")
    }
}
