use jdecode_descriptor::{
    decode_descriptor_type, decode_signature, decode_signature_component, FieldType,
    MethodSignature, TypeTag,
};

use crate::{
    attributes::{Attribute, AttributeKind, Attributes, CodeAttribute},
    parser::Parser,
    AccessFlags, ConstantPool, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub minor: u16,
    pub major: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub magic: u32,
    pub version: Version,
    pub constant_pool: ConstantPool,
    pub access_flags: AccessFlags,
    pub this_class: u16,
    pub super_class: u16,
    /// Never contains 0.
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Attributes,
}
impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<ClassFile> {
        Parser::new(bytes).parse()
    }

    pub fn class_name(&self) -> Result<&str> {
        // The constant_pool entry at this_class must be a CONSTANT_Class_info structure
        // representing the class or interface defined by this class file.
        self.constant_pool.class_name(self.this_class)
    }

    pub fn super_class(&self) -> Result<Option<&str>> {
        // If the value of the super_class item is zero, then this class file must represent the
        // class Object, the only class or interface without a direct superclass.
        if self.super_class == 0 {
            return Ok(None);
        }

        self.constant_pool.class_name(self.super_class).map(Some)
    }

    pub fn access_flags(&self) -> AccessFlags {
        self.access_flags
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn constant_pool(&self) -> &ConstantPool {
        &self.constant_pool
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn interface_names(&self) -> Result<Vec<&str>> {
        self.interfaces
            .iter()
            .map(|&index| self.constant_pool.class_name(index))
            .collect()
    }

    pub fn find_attribute(&self, kind: AttributeKind) -> Option<&Attribute> {
        self.attributes.find(kind)
    }

    pub fn source_file(&self) -> Result<Option<&str>> {
        match self.find_attribute(AttributeKind::SourceFile) {
            Some(Attribute::SourceFile { sourcefile_index }) => {
                self.constant_pool.utf8(*sourcefile_index).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Names of the classes referenced from the `InnerClasses` attribute, both the inner and the
    /// outer side of every entry. Entries that fail to resolve are logged and skipped.
    pub fn classes(&self) -> Vec<&str> {
        self.inner_class_indices()
            .filter_map(|index| match self.constant_pool.class_name(index) {
                Ok(name) => Some(name),
                Err(e) => {
                    log::warn!("Skipping inner class entry #{}: {}", index, e);
                    None
                }
            })
            .collect()
    }

    /// Like [`ClassFile::classes`], but fails on the first entry that does not resolve.
    pub fn try_classes(&self) -> Result<Vec<&str>> {
        self.inner_class_indices()
            .map(|index| self.constant_pool.class_name(index))
            .collect()
    }

    fn inner_class_indices(&self) -> impl Iterator<Item = u16> + '_ {
        self.attributes
            .iter()
            .filter_map(|a| match a {
                Attribute::InnerClasses(classes) => Some(classes),
                _ => None,
            })
            .flatten()
            .flat_map(|c| [c.inner_class_info_index, c.outer_class_info_index])
            // Index 0 means "no class".
            .filter(|&index| index != 0)
    }

    pub fn field_name(&self, field: &FieldInfo) -> Result<&str> {
        self.constant_pool.utf8(field.name_index)
    }

    pub fn method_name(&self, method: &MethodInfo) -> Result<&str> {
        self.constant_pool.utf8(method.name_index)
    }

    pub fn field_descriptor(&self, field: &FieldInfo) -> Result<FieldDescriptor<'_>> {
        let name = self.field_name(field)?;
        let descriptor = self.constant_pool.utf8(field.descriptor_index)?;
        let type_tag = decode_descriptor_type(descriptor)?;
        let field_type = decode_signature(descriptor)?.return_type;
        let text = format!(
            "{}{} {};",
            field.access_flags.to_keywords(),
            decode_signature_component(descriptor, &mut 0)?,
            name
        );

        Ok(FieldDescriptor {
            access_flags: field.access_flags,
            modifiers: field.access_flags.to_keywords(),
            name,
            descriptor,
            type_tag,
            field_type,
            text,
        })
    }

    pub fn method_descriptor(&self, method: &MethodInfo) -> Result<MethodDescriptor<'_>> {
        let name = self.method_name(method)?;
        let descriptor = self.constant_pool.utf8(method.descriptor_index)?;
        let signature = decode_signature(descriptor)?;
        let parameters = signature
            .parameter_types
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        let text = format!(
            "{}{} {}({});",
            method.access_flags.to_keywords(),
            signature.return_type,
            name,
            parameters.join(", ")
        );

        Ok(MethodDescriptor {
            access_flags: method.access_flags,
            modifiers: method.access_flags.to_keywords(),
            name,
            descriptor,
            signature,
            text,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub access_flags: AccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes,
}
impl FieldInfo {
    pub fn constant_value_index(&self) -> Option<u16> {
        match self.attributes.find(AttributeKind::ConstantValue) {
            Some(Attribute::ConstantValue {
                constantvalue_index,
            }) => Some(*constantvalue_index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub access_flags: AccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes,
}
impl MethodInfo {
    pub fn code(&self) -> Option<&CodeAttribute> {
        self.attributes.code()
    }

    pub fn exceptions(&self) -> &[u16] {
        match self.attributes.find(AttributeKind::Exceptions) {
            Some(Attribute::Exceptions {
                exception_index_table,
            }) => exception_index_table.as_slice(),
            _ => &[],
        }
    }
}

/// A field as it would be declared in source, e.g. `private final int count;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor<'a> {
    pub access_flags: AccessFlags,
    pub modifiers: String,
    pub name: &'a str,
    pub descriptor: &'a str,
    pub type_tag: TypeTag,
    pub field_type: FieldType,
    pub text: String,
}

/// A method as it would be declared in source, e.g. `public static void main(java.lang.String[]);`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor<'a> {
    pub access_flags: AccessFlags,
    pub modifiers: String,
    pub name: &'a str,
    pub descriptor: &'a str,
    pub signature: MethodSignature,
    pub text: String,
}
