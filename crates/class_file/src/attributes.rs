use std::fmt;

use crate::{
    constant_pool::CpInfo,
    diagnostics::{Diagnostics, Policy},
    parser::attributes::AttributeParser,
    reader::Reader,
    ConstantPool, Result,
};

/// The attribute names this decoder understands.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AttributeKind {
    ConstantValue,
    Code,
    Exceptions,
    InnerClasses,
    Synthetic,
    SourceFile,
    LineNumberTable,
    LocalVariableTable,
    MethodParameters,
    Signature,
    BootstrapMethods,
    RuntimeVisibleAnnotations,
    RuntimeInvisibleAnnotations,
    RuntimeVisibleParameterAnnotations,
    RuntimeInvisibleParameterAnnotations,
    EnclosingMethod,
    AnnotationDefault,
    Deprecated,
}
impl AttributeKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "ConstantValue" => AttributeKind::ConstantValue,
            "Code" => AttributeKind::Code,
            "Exceptions" => AttributeKind::Exceptions,
            "InnerClasses" => AttributeKind::InnerClasses,
            "Synthetic" => AttributeKind::Synthetic,
            "SourceFile" => AttributeKind::SourceFile,
            "LineNumberTable" => AttributeKind::LineNumberTable,
            "LocalVariableTable" => AttributeKind::LocalVariableTable,
            "MethodParameters" => AttributeKind::MethodParameters,
            "Signature" => AttributeKind::Signature,
            "BootstrapMethods" => AttributeKind::BootstrapMethods,
            "RuntimeVisibleAnnotations" => AttributeKind::RuntimeVisibleAnnotations,
            "RuntimeInvisibleAnnotations" => AttributeKind::RuntimeInvisibleAnnotations,
            "RuntimeVisibleParameterAnnotations" => {
                AttributeKind::RuntimeVisibleParameterAnnotations
            }
            "RuntimeInvisibleParameterAnnotations" => {
                AttributeKind::RuntimeInvisibleParameterAnnotations
            }
            "EnclosingMethod" => AttributeKind::EnclosingMethod,
            "AnnotationDefault" => AttributeKind::AnnotationDefault,
            "Deprecated" => AttributeKind::Deprecated,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            AttributeKind::ConstantValue => "ConstantValue",
            AttributeKind::Code => "Code",
            AttributeKind::Exceptions => "Exceptions",
            AttributeKind::InnerClasses => "InnerClasses",
            AttributeKind::Synthetic => "Synthetic",
            AttributeKind::SourceFile => "SourceFile",
            AttributeKind::LineNumberTable => "LineNumberTable",
            AttributeKind::LocalVariableTable => "LocalVariableTable",
            AttributeKind::MethodParameters => "MethodParameters",
            AttributeKind::Signature => "Signature",
            AttributeKind::BootstrapMethods => "BootstrapMethods",
            AttributeKind::RuntimeVisibleAnnotations => "RuntimeVisibleAnnotations",
            AttributeKind::RuntimeInvisibleAnnotations => "RuntimeInvisibleAnnotations",
            AttributeKind::RuntimeVisibleParameterAnnotations => {
                "RuntimeVisibleParameterAnnotations"
            }
            AttributeKind::RuntimeInvisibleParameterAnnotations => {
                "RuntimeInvisibleParameterAnnotations"
            }
            AttributeKind::EnclosingMethod => "EnclosingMethod",
            AttributeKind::AnnotationDefault => "AnnotationDefault",
            AttributeKind::Deprecated => "Deprecated",
        }
    }
}

/// An attribute whose body has not been decoded.
#[derive(Clone, PartialEq, Eq)]
pub struct RawAttribute {
    pub attribute_name_index: u16,
    pub info: Vec<u8>,
}
impl fmt::Debug for RawAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawAttribute")
            .field("attribute_name_index", &self.attribute_name_index)
            .field("info", &format!("({} bytes)", self.info.len()))
            .finish()
    }
}
impl RawAttribute {
    fn is_named(&self, name: &str, constant_pool: &ConstantPool) -> bool {
        matches!(
            constant_pool.get(self.attribute_name_index),
            Ok(CpInfo::Utf8(s)) if s == name
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    pub attribute_name_index: u16,
    pub attribute_length: u32,
    pub info: Attribute,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Attributes(pub Vec<AttributeInfo>);
impl Attributes {
    pub fn find(&self, kind: AttributeKind) -> Option<&Attribute> {
        self.iter().find(|a| a.kind() == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> + '_ {
        self.0.iter().map(|a| &a.info)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn code(&self) -> Option<&CodeAttribute> {
        self.iter().find_map(|a| match a {
            Attribute::Code(code) => Some(code),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    ConstantValue {
        constantvalue_index: u16,
    },
    Code(CodeAttribute),
    SourceFile {
        sourcefile_index: u16,
    },
    Exceptions {
        exception_index_table: Vec<u16>,
    },
    InnerClasses(Vec<InnerClass>),
    Synthetic,
    LineNumberTable(Vec<LineNumber>),
    LocalVariableTable(Vec<LocalVariable>),
    MethodParameters(Vec<MethodParameter>),
    Signature {
        signature_index: u16,
    },
    BootstrapMethods(Vec<BootstrapMethod>),
    RuntimeVisibleAnnotations(Vec<Annotation>),
    RuntimeInvisibleAnnotations(Vec<Annotation>),
    RuntimeVisibleParameterAnnotations(Vec<Vec<Annotation>>),
    RuntimeInvisibleParameterAnnotations(Vec<Vec<Annotation>>),
    EnclosingMethod {
        class_index: u16,
        method_index: u16,
    },
    AnnotationDefault(ElementValue),
    Deprecated,
}
impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::ConstantValue { .. } => AttributeKind::ConstantValue,
            Attribute::Code(_) => AttributeKind::Code,
            Attribute::SourceFile { .. } => AttributeKind::SourceFile,
            Attribute::Exceptions { .. } => AttributeKind::Exceptions,
            Attribute::InnerClasses(_) => AttributeKind::InnerClasses,
            Attribute::Synthetic => AttributeKind::Synthetic,
            Attribute::LineNumberTable(_) => AttributeKind::LineNumberTable,
            Attribute::LocalVariableTable(_) => AttributeKind::LocalVariableTable,
            Attribute::MethodParameters(_) => AttributeKind::MethodParameters,
            Attribute::Signature { .. } => AttributeKind::Signature,
            Attribute::BootstrapMethods(_) => AttributeKind::BootstrapMethods,
            Attribute::RuntimeVisibleAnnotations(_) => AttributeKind::RuntimeVisibleAnnotations,
            Attribute::RuntimeInvisibleAnnotations(_) => AttributeKind::RuntimeInvisibleAnnotations,
            Attribute::RuntimeVisibleParameterAnnotations(_) => {
                AttributeKind::RuntimeVisibleParameterAnnotations
            }
            Attribute::RuntimeInvisibleParameterAnnotations(_) => {
                AttributeKind::RuntimeInvisibleParameterAnnotations
            }
            Attribute::EnclosingMethod { .. } => AttributeKind::EnclosingMethod,
            Attribute::AnnotationDefault(_) => AttributeKind::AnnotationDefault,
            Attribute::Deprecated => AttributeKind::Deprecated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,
    /// Left undecoded; see [`CodeAttribute::decode_attributes`].
    pub attributes: Vec<RawAttribute>,
}
impl CodeAttribute {
    pub fn find_by_name(&self, name: &str, constant_pool: &ConstantPool) -> Option<&RawAttribute> {
        self.attributes
            .iter()
            .find(|a| a.is_named(name, constant_pool))
    }

    /// Decodes the nested attribute table under `policy`. Fails on nested attributes this decoder
    /// does not understand, such as `StackMapTable`.
    pub fn decode_attributes(
        &self,
        constant_pool: &ConstantPool,
        policy: Policy,
    ) -> Result<(Attributes, Diagnostics)> {
        let mut diagnostics = Diagnostics::default();
        let mut parser = AttributeParser::new(constant_pool, policy, &mut diagnostics);

        let attributes = self
            .attributes
            .iter()
            .map(|raw| decode_raw(&mut parser, raw))
            .collect::<Result<Vec<_>>>()?;

        Ok((Attributes(attributes), diagnostics))
    }

    /// The `LineNumberTable` entries of this body, or an empty list when it has none.
    pub fn line_numbers(
        &self,
        constant_pool: &ConstantPool,
        policy: Policy,
    ) -> Result<Vec<LineNumber>> {
        let Some(raw) = self.find_by_name(AttributeKind::LineNumberTable.name(), constant_pool)
        else {
            return Ok(Vec::new());
        };

        let mut diagnostics = Diagnostics::default();
        let mut parser = AttributeParser::new(constant_pool, policy, &mut diagnostics);
        match decode_raw(&mut parser, raw)?.info {
            Attribute::LineNumberTable(line_numbers) => Ok(line_numbers),
            _ => Ok(Vec::new()),
        }
    }
}

fn decode_raw(parser: &mut AttributeParser<'_, '_>, raw: &RawAttribute) -> Result<AttributeInfo> {
    let info = parser.parse_attribute(raw.attribute_name_index, Reader::new(&raw.info))?;

    Ok(AttributeInfo {
        attribute_name_index: raw.attribute_name_index,
        attribute_length: raw.info.len() as u32,
        info,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClass {
    pub inner_class_info_index: u16,
    pub outer_class_info_index: u16,
    pub inner_name_index: u16,
    pub inner_class_access_flags: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNumber {
    pub start_pc: u16,
    pub line_number: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVariable {
    pub start_pc: u16,
    pub length: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub index: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    pub parameter_name_index: u16,
    pub parameter_access_flags: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapMethod {
    pub bootstrap_method_ref: u16,
    pub bootstrap_arguments: Vec<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub type_index: u16,
    pub element_value_pairs: Vec<ElementValuePair>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementValuePair {
    pub element_name_index: u16,
    pub value: ElementValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementValue {
    /// One of `B C D F I J S Z s`, pointing at the constant.
    Const { tag: char, const_value_index: u16 },
    Enum {
        type_name_index: u16,
        const_name_index: u16,
    },
    Class { class_info_index: u16 },
    Annotation(Box<Annotation>),
    Array(Vec<ElementValue>),
    /// A tag that is not defined; the rest of the enclosing attribute was not decoded.
    Unknown { tag: char },
}
