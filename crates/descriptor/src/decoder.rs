use crate::{BaseType, DescriptorError, FieldType, MethodSignature, Result, TypeTag};

pub fn decode_descriptor_type(descriptor: &str) -> Result<TypeTag> {
    let tag = *descriptor
        .as_bytes()
        .first()
        .ok_or_else(|| DescriptorError::UnexpectedEnd {
            descriptor: descriptor.to_owned(),
        })?;

    match tag {
        b'L' => Ok(TypeTag::Class),
        b'[' => Ok(TypeTag::Array),
        _ => BaseType::from_tag(tag)
            .map(TypeTag::Base)
            .ok_or_else(|| unknown_type_tag(descriptor, 0)),
    }
}

/// Decodes the single type starting at `cursor` and leaves `cursor` one past its last character.
pub fn decode_signature_component(descriptor: &str, cursor: &mut usize) -> Result<FieldType> {
    let bytes = descriptor.as_bytes();
    let start = *cursor;
    let tag = *bytes
        .get(start)
        .ok_or_else(|| DescriptorError::UnexpectedEnd {
            descriptor: descriptor.to_owned(),
        })?;

    match tag {
        b'L' => {
            // An unterminated class name runs to the end of the input.
            let end = descriptor[start..]
                .find(';')
                .map_or(descriptor.len(), |i| start + i);
            *cursor = (end + 1).min(descriptor.len());

            Ok(FieldType::Object(descriptor[start + 1..end].replace('/', ".")))
        }
        b'[' => {
            *cursor += 1;
            let element = decode_signature_component(descriptor, cursor)?;

            Ok(FieldType::Array(Box::new(element)))
        }
        _ => {
            let base = BaseType::from_tag(tag).ok_or_else(|| unknown_type_tag(descriptor, start))?;
            *cursor += 1;

            Ok(FieldType::Base(base))
        }
    }
}

/// Decodes a method descriptor such as `(Ljava/lang/String;I)V`.
///
/// Types before `(` or after `)` land in the return slot, so a plain field descriptor decodes to a
/// signature with no parameters and the field's type as its return type.
pub fn decode_signature(descriptor: &str) -> Result<MethodSignature> {
    let bytes = descriptor.as_bytes();
    let mut parameter_types = Vec::new();
    let mut return_types = Vec::with_capacity(1);
    let mut in_parameters = false;

    let mut cursor = 0;
    while cursor < bytes.len() {
        match bytes[cursor] {
            b'(' => {
                in_parameters = true;
                cursor += 1;
            }
            b')' => {
                in_parameters = false;
                cursor += 1;
            }
            _ => {
                let component = decode_signature_component(descriptor, &mut cursor)?;
                if in_parameters {
                    parameter_types.push(component);
                } else {
                    return_types.push(component);
                }
            }
        }
    }

    if return_types.len() > 1 {
        return Err(DescriptorError::MultipleReturnTypes {
            descriptor: descriptor.to_owned(),
        });
    }
    let return_type = return_types
        .pop()
        .ok_or_else(|| DescriptorError::MissingReturnType {
            descriptor: descriptor.to_owned(),
        })?;

    Ok(MethodSignature {
        parameter_types,
        return_type,
    })
}

fn unknown_type_tag(descriptor: &str, position: usize) -> DescriptorError {
    DescriptorError::UnknownTypeTag {
        tag: descriptor[position..].chars().next().unwrap_or_default(),
        position,
        descriptor: descriptor.to_owned(),
    }
}
