use crate::{
    attributes::{
        Annotation, Attribute, AttributeInfo, AttributeKind, Attributes, BootstrapMethod,
        CodeAttribute, ElementValue, ElementValuePair, ExceptionTableEntry, InnerClass,
        LineNumber, LocalVariable, MethodParameter, RawAttribute,
    },
    constant_pool::CpInfo,
    diagnostics::{Diagnostic, Diagnostics, Policy},
    reader::Reader,
    ClassFileError, ConstantPool, Result,
};

/// Decodes attribute tables against a completed constant pool.
///
/// Every attribute body is decoded from its own [`Reader`] sliced to `attribute_length`, so a
/// misread body can never move the cursor of the table that contains it.
pub(crate) struct AttributeParser<'cp, 'd> {
    constant_pool: &'cp ConstantPool,
    policy: Policy,
    diagnostics: &'d mut Diagnostics,
    // Set once an undefined element_value tag is seen; the rest of the body is unreadable.
    abandoned: bool,
}
impl<'cp, 'd> AttributeParser<'cp, 'd> {
    pub(crate) fn new(
        constant_pool: &'cp ConstantPool,
        policy: Policy,
        diagnostics: &'d mut Diagnostics,
    ) -> Self {
        Self {
            constant_pool,
            policy,
            diagnostics,
            abandoned: false,
        }
    }

    pub(crate) fn parse_attributes(&mut self, r: &mut Reader<'_>) -> Result<Attributes> {
        let attributes_count = r.read_u16()?;

        (0..attributes_count)
            .map(|_| self.parse_attribute_info(r))
            .collect::<Result<Vec<_>>>()
            .map(Attributes)
    }

    fn parse_attribute_info(&mut self, r: &mut Reader<'_>) -> Result<AttributeInfo> {
        let attribute_name_index = r.read_u16()?;
        let attribute_length = r.read_u32()?;
        let body = r.sub_reader(attribute_length as usize)?;
        let info = self.parse_attribute(attribute_name_index, body)?;

        Ok(AttributeInfo {
            attribute_name_index,
            attribute_length,
            info,
        })
    }

    pub(crate) fn parse_attribute(
        &mut self,
        attribute_name_index: u16,
        mut r: Reader<'_>,
    ) -> Result<Attribute> {
        let kind = self.resolve_kind(attribute_name_index)?;
        log::trace!("{} attribute at offset {}", kind.name(), r.position());

        self.abandoned = false;
        let attribute = match kind {
            AttributeKind::ConstantValue => Attribute::ConstantValue {
                constantvalue_index: r.read_u16()?,
            },
            AttributeKind::Code => Attribute::Code(parse_code(&mut r)?),
            AttributeKind::SourceFile => Attribute::SourceFile {
                sourcefile_index: r.read_u16()?,
            },
            AttributeKind::Exceptions => {
                let number_of_exceptions = r.read_u16()?;
                let exception_index_table = (0..number_of_exceptions)
                    .map(|_| r.read_u16())
                    .collect::<Result<Vec<_>>>()?;
                Attribute::Exceptions {
                    exception_index_table,
                }
            }
            AttributeKind::InnerClasses => {
                let number_of_classes = r.read_u16()?;
                let classes = (0..number_of_classes)
                    .map(|_| parse_inner_class(&mut r))
                    .collect::<Result<Vec<_>>>()?;
                Attribute::InnerClasses(classes)
            }
            AttributeKind::Synthetic => Attribute::Synthetic,
            AttributeKind::LineNumberTable => {
                let line_number_table_length = r.read_u16()?;
                let line_numbers = (0..line_number_table_length)
                    .map(|_| parse_line_number(&mut r))
                    .collect::<Result<Vec<_>>>()?;
                Attribute::LineNumberTable(line_numbers)
            }
            AttributeKind::LocalVariableTable => {
                let local_variable_table_length = r.read_u16()?;
                let local_variables = (0..local_variable_table_length)
                    .map(|_| parse_local_variable(&mut r))
                    .collect::<Result<Vec<_>>>()?;
                Attribute::LocalVariableTable(local_variables)
            }
            AttributeKind::MethodParameters => {
                let parameters_count = r.read_u8()?;
                let parameters = (0..parameters_count)
                    .map(|_| parse_method_parameter(&mut r))
                    .collect::<Result<Vec<_>>>()?;
                Attribute::MethodParameters(parameters)
            }
            AttributeKind::Signature => Attribute::Signature {
                signature_index: r.read_u16()?,
            },
            AttributeKind::BootstrapMethods => {
                let num_bootstrap_methods = r.read_u8()?;
                let bootstrap_methods = (0..num_bootstrap_methods)
                    .map(|_| parse_bootstrap_method(&mut r))
                    .collect::<Result<Vec<_>>>()?;
                Attribute::BootstrapMethods(bootstrap_methods)
            }
            AttributeKind::RuntimeVisibleAnnotations => {
                Attribute::RuntimeVisibleAnnotations(self.parse_annotations(&mut r)?)
            }
            AttributeKind::RuntimeInvisibleAnnotations => {
                Attribute::RuntimeInvisibleAnnotations(self.parse_annotations(&mut r)?)
            }
            AttributeKind::RuntimeVisibleParameterAnnotations => {
                Attribute::RuntimeVisibleParameterAnnotations(
                    self.parse_parameter_annotations(&mut r)?,
                )
            }
            AttributeKind::RuntimeInvisibleParameterAnnotations => {
                Attribute::RuntimeInvisibleParameterAnnotations(
                    self.parse_parameter_annotations(&mut r)?,
                )
            }
            AttributeKind::EnclosingMethod => Attribute::EnclosingMethod {
                class_index: r.read_u16()?,
                method_index: r.read_u16()?,
            },
            AttributeKind::AnnotationDefault => {
                Attribute::AnnotationDefault(self.parse_element_value(&mut r)?)
            }
            AttributeKind::Deprecated => Attribute::Deprecated,
        };

        if !r.is_empty() && !self.abandoned {
            self.report(Diagnostic::UnreadAttributeBytes {
                attribute: kind.name(),
                offset: r.position(),
                remaining: r.remaining(),
            })?;
        }

        Ok(attribute)
    }

    /// An attribute whose name slot holds a literal constant is a `ConstantValue`; otherwise the
    /// name must be a Utf8 entry naming one of the known kinds.
    fn resolve_kind(&self, attribute_name_index: u16) -> Result<AttributeKind> {
        let cp_info = self.constant_pool.get(attribute_name_index)?;

        let kind = match cp_info {
            c if c.is_literal() => Some(AttributeKind::ConstantValue),
            CpInfo::Utf8(name) => AttributeKind::from_name(name),
            _ => None,
        };

        kind.ok_or_else(|| ClassFileError::UnsupportedAttribute {
            name_index: attribute_name_index,
            entry: format!("{:?}", cp_info),
        })
    }

    fn parse_parameter_annotations(&mut self, r: &mut Reader<'_>) -> Result<Vec<Vec<Annotation>>> {
        let num_parameters = r.read_u8()?;
        let mut parameter_annotations = Vec::with_capacity(num_parameters as usize);
        for _ in 0..num_parameters {
            if self.abandoned {
                break;
            }
            parameter_annotations.push(self.parse_annotations(r)?);
        }

        Ok(parameter_annotations)
    }

    fn parse_annotations(&mut self, r: &mut Reader<'_>) -> Result<Vec<Annotation>> {
        let num_annotations = r.read_u16()?;
        let mut annotations = Vec::with_capacity(num_annotations as usize);
        for _ in 0..num_annotations {
            if self.abandoned {
                break;
            }
            annotations.push(self.parse_annotation(r)?);
        }

        Ok(annotations)
    }

    fn parse_annotation(&mut self, r: &mut Reader<'_>) -> Result<Annotation> {
        let type_index = r.read_u16()?;
        let num_element_value_pairs = r.read_u16()?;
        let mut element_value_pairs = Vec::with_capacity(num_element_value_pairs as usize);
        for _ in 0..num_element_value_pairs {
            if self.abandoned {
                break;
            }
            let element_name_index = r.read_u16()?;
            let value = self.parse_element_value(r)?;
            element_value_pairs.push(ElementValuePair {
                element_name_index,
                value,
            });
        }

        Ok(Annotation {
            type_index,
            element_value_pairs,
        })
    }

    fn parse_element_value(&mut self, r: &mut Reader<'_>) -> Result<ElementValue> {
        let offset = r.position();
        let tag = r.read_u8()? as char;

        let element_value = match tag {
            '[' => {
                let num_values = r.read_u16()?;
                let mut values = Vec::with_capacity(num_values as usize);
                for _ in 0..num_values {
                    if self.abandoned {
                        break;
                    }
                    values.push(self.parse_element_value(r)?);
                }
                ElementValue::Array(values)
            }
            '@' => ElementValue::Annotation(Box::new(self.parse_annotation(r)?)),
            'c' => ElementValue::Class {
                class_info_index: r.read_u16()?,
            },
            'e' => ElementValue::Enum {
                type_name_index: r.read_u16()?,
                const_name_index: r.read_u16()?,
            },
            'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z' | 's' => ElementValue::Const {
                tag,
                const_value_index: r.read_u16()?,
            },
            _ => {
                self.report(Diagnostic::UnknownElementValueTag { tag, offset })?;
                self.abandoned = true;
                ElementValue::Unknown { tag }
            }
        };

        Ok(element_value)
    }

    fn report(&mut self, diagnostic: Diagnostic) -> Result<()> {
        match (self.policy, diagnostic) {
            (Policy::Strict, Diagnostic::UnknownElementValueTag { tag, offset }) => {
                Err(ClassFileError::UnknownElementValueTag { tag, offset })
            }
            (
                Policy::Strict,
                Diagnostic::UnreadAttributeBytes {
                    offset, remaining, ..
                },
            ) => Err(ClassFileError::TrailingBytes { offset, remaining }),
            (Policy::Lenient, diagnostic) => {
                self.diagnostics.push(diagnostic);
                Ok(())
            }
        }
    }
}

fn parse_code(r: &mut Reader<'_>) -> Result<CodeAttribute> {
    let max_stack = r.read_u16()?;
    let max_locals = r.read_u16()?;
    let code_length = r.read_u32()?;
    let code = r.read_bytes(code_length as usize)?.to_vec();

    let exception_table_length = r.read_u16()?;
    let exception_table = (0..exception_table_length)
        .map(|_| parse_exception_table_entry(r))
        .collect::<Result<Vec<_>>>()?;

    let attributes_count = r.read_u16()?;
    let attributes = (0..attributes_count)
        .map(|_| parse_raw_attribute(r))
        .collect::<Result<Vec<_>>>()?;

    Ok(CodeAttribute {
        max_stack,
        max_locals,
        code,
        exception_table,
        attributes,
    })
}

fn parse_raw_attribute(r: &mut Reader<'_>) -> Result<RawAttribute> {
    let attribute_name_index = r.read_u16()?;
    let attribute_length = r.read_u32()?;
    let info = r.read_bytes(attribute_length as usize)?.to_vec();

    Ok(RawAttribute {
        attribute_name_index,
        info,
    })
}

fn parse_exception_table_entry(r: &mut Reader<'_>) -> Result<ExceptionTableEntry> {
    let start_pc = r.read_u16()?;
    let end_pc = r.read_u16()?;
    let handler_pc = r.read_u16()?;
    let catch_type = r.read_u16()?;

    Ok(ExceptionTableEntry {
        start_pc,
        end_pc,
        handler_pc,
        catch_type,
    })
}

fn parse_inner_class(r: &mut Reader<'_>) -> Result<InnerClass> {
    let inner_class_info_index = r.read_u16()?;
    let outer_class_info_index = r.read_u16()?;
    let inner_name_index = r.read_u16()?;
    let inner_class_access_flags = r.read_u16()?;

    Ok(InnerClass {
        inner_class_info_index,
        outer_class_info_index,
        inner_name_index,
        inner_class_access_flags,
    })
}

fn parse_line_number(r: &mut Reader<'_>) -> Result<LineNumber> {
    let start_pc = r.read_u16()?;
    let line_number = r.read_u16()?;

    Ok(LineNumber {
        start_pc,
        line_number,
    })
}

fn parse_method_parameter(r: &mut Reader<'_>) -> Result<MethodParameter> {
    let parameter_name_index = r.read_u16()?;
    let parameter_access_flags = r.read_u16()?;

    Ok(MethodParameter {
        parameter_name_index,
        parameter_access_flags,
    })
}

fn parse_local_variable(r: &mut Reader<'_>) -> Result<LocalVariable> {
    let start_pc = r.read_u16()?;
    let length = r.read_u16()?;
    let name_index = r.read_u16()?;
    let descriptor_index = r.read_u16()?;
    let index = r.read_u16()?;

    Ok(LocalVariable {
        start_pc,
        length,
        name_index,
        descriptor_index,
        index,
    })
}

fn parse_bootstrap_method(r: &mut Reader<'_>) -> Result<BootstrapMethod> {
    let bootstrap_method_ref = r.read_u16()?;
    let num_bootstrap_arguments = r.read_u16()?;
    let bootstrap_arguments = (0..num_bootstrap_arguments)
        .map(|_| r.read_u16())
        .collect::<Result<Vec<_>>>()?;

    Ok(BootstrapMethod {
        bootstrap_method_ref,
        bootstrap_arguments,
    })
}
