pub(crate) mod attributes;

use crate::{
    attributes::Attributes,
    class_file::{FieldInfo, MethodInfo, Version},
    constant_pool::{
        ClassInfo, CpInfo, InvokeDynamicInfo, MethodHandleInfo, MethodTypeInfo, NameAndTypeInfo,
        RefInfo,
    },
    diagnostics::{Diagnostics, Policy},
    reader::Reader,
    AccessFlags, ClassFile, ClassFileError, ConstantPool, Result,
};

use self::attributes::AttributeParser;

const MAGIC_IDENTIFIER: u32 = 0xCAFEBABE;

/// Decodes one class image from an in-memory buffer.
pub struct Parser<'a> {
    r: Reader<'a>,
    policy: Policy,
    diagnostics: Diagnostics,
}
impl<'a> Parser<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            r: Reader::new(buf),
            policy: Policy::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn parse(self) -> Result<ClassFile> {
        self.parse_with_diagnostics().map(|(class_file, _)| class_file)
    }

    pub fn parse_with_diagnostics(mut self) -> Result<(ClassFile, Diagnostics)> {
        let magic = self.parse_magic_identifier()?;
        let version = self.parse_version()?;

        let constant_pool = self.parse_constant_pool()?;
        let access_flags = AccessFlags::from_bits_truncate(self.r.read_u16()?);
        let this_class = self.r.read_u16()?;
        let super_class = self.r.read_u16()?;
        let interfaces = self.parse_interfaces()?;

        let fields_count = self.r.read_u16()?;
        let fields = (0..fields_count)
            .map(|_| self.parse_field_info(&constant_pool))
            .collect::<Result<Vec<_>>>()?;

        let methods_count = self.r.read_u16()?;
        let methods = (0..methods_count)
            .map(|_| self.parse_method_info(&constant_pool))
            .collect::<Result<Vec<_>>>()?;

        let attributes = self.parse_attributes(&constant_pool)?;

        if !self.r.is_empty() {
            return Err(ClassFileError::TrailingBytes {
                offset: self.r.position(),
                remaining: self.r.remaining(),
            });
        }

        log::debug!(
            "decoded class image v{}.{}: {} constants, {} fields, {} methods, {} attributes",
            version.major,
            version.minor,
            constant_pool.len(),
            fields.len(),
            methods.len(),
            attributes.len()
        );

        let class_file = ClassFile {
            magic,
            version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        };

        Ok((class_file, self.diagnostics))
    }

    fn parse_magic_identifier(&mut self) -> Result<u32> {
        match self.r.read_u32()? {
            MAGIC_IDENTIFIER => Ok(MAGIC_IDENTIFIER),
            magic_identifier => Err(ClassFileError::InvalidMagicIdentifier(magic_identifier)),
        }
    }

    fn parse_version(&mut self) -> Result<Version> {
        let minor = self.r.read_u16()?;
        let major = self.r.read_u16()?;
        Ok(Version { minor, major })
    }

    fn parse_constant_pool(&mut self) -> Result<ConstantPool> {
        let offset = self.r.position();
        let count = self.r.read_u16()?;
        // The count is one more than the number of entries, so 0 describes no valid pool.
        if count == 0 {
            return Err(ClassFileError::InvalidConstantPoolCount { count, offset });
        }
        let constant_pool_count = count as usize;

        // Index 0 is never a valid entry.
        let mut res = Vec::with_capacity(constant_pool_count);
        res.push(CpInfo::Unusable);
        while res.len() < constant_pool_count {
            let cp_info = self.parse_cp_info()?;
            let wide = cp_info.is_wide();
            res.push(cp_info);

            if wide {
                if res.len() >= constant_pool_count {
                    return Err(ClassFileError::WideConstantOverflow {
                        index: res.len() - 1,
                    });
                }
                res.push(CpInfo::Unusable);
            }
        }

        log::trace!("constant pool: {} slots", res.len());
        Ok(ConstantPool::new(res))
    }

    fn parse_cp_info(&mut self) -> Result<CpInfo> {
        let offset = self.r.position();
        let tag = self.r.read_u8()?;
        let cp_info = match tag {
            1 => {
                let length = self.r.read_u16()?;
                CpInfo::Utf8(self.r.read_string(length as usize)?)
            }
            3 => CpInfo::Integer(self.r.read_i32()?),
            4 => CpInfo::Float(self.r.read_array()?),
            5 => CpInfo::Long(self.r.read_array()?),
            6 => CpInfo::Double(self.r.read_array()?),
            7 => CpInfo::Class(ClassInfo {
                name_index: self.r.read_u16()?,
            }),
            8 => CpInfo::String {
                string_index: self.r.read_u16()?,
            },
            9 => CpInfo::FieldRef(self.parse_ref_info()?),
            10 => CpInfo::MethodRef(self.parse_ref_info()?),
            11 => CpInfo::InterfaceMethodRef(self.parse_ref_info()?),
            12 => self.parse_name_and_type_info()?,
            15 => self.parse_method_handle()?,
            16 => CpInfo::MethodType(MethodTypeInfo {
                descriptor_index: self.r.read_u16()?,
            }),
            18 => self.parse_invoke_dynamic_info()?,
            _ => return Err(ClassFileError::UnsupportedConstantTag { tag, offset }),
        };

        Ok(cp_info)
    }

    fn parse_name_and_type_info(&mut self) -> Result<CpInfo> {
        let name_index = self.r.read_u16()?;
        let descriptor_index = self.r.read_u16()?;

        Ok(CpInfo::NameAndType(NameAndTypeInfo {
            name_index,
            descriptor_index,
        }))
    }

    fn parse_method_handle(&mut self) -> Result<CpInfo> {
        let reference_kind = self.r.read_u8()?;
        let reference_index = self.r.read_u16()?;

        Ok(CpInfo::MethodHandle(MethodHandleInfo {
            reference_kind,
            reference_index,
        }))
    }

    fn parse_invoke_dynamic_info(&mut self) -> Result<CpInfo> {
        let bootstrap_method_attr_index = self.r.read_u16()?;
        let name_and_type_index = self.r.read_u16()?;

        Ok(CpInfo::InvokeDynamic(InvokeDynamicInfo {
            bootstrap_method_attr_index,
            name_and_type_index,
        }))
    }

    fn parse_ref_info(&mut self) -> Result<RefInfo> {
        let class_index = self.r.read_u16()?;
        let name_and_type_index = self.r.read_u16()?;

        Ok(RefInfo {
            class_index,
            name_and_type_index,
        })
    }

    fn parse_interfaces(&mut self) -> Result<Vec<u16>> {
        let interfaces_count = self.r.read_u16()?;
        let mut interfaces = Vec::with_capacity(interfaces_count as usize);
        for _ in 0..interfaces_count {
            match self.r.read_u16()? {
                0 => continue,
                index => interfaces.push(index),
            }
        }

        Ok(interfaces)
    }

    fn parse_field_info(&mut self, constant_pool: &ConstantPool) -> Result<FieldInfo> {
        let access_flags = AccessFlags::from_bits_truncate(self.r.read_u16()?);
        let name_index = self.r.read_u16()?;
        let descriptor_index = self.r.read_u16()?;
        let attributes = self.parse_attributes(constant_pool)?;

        Ok(FieldInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_method_info(&mut self, constant_pool: &ConstantPool) -> Result<MethodInfo> {
        let access_flags = AccessFlags::from_bits_truncate(self.r.read_u16()?);
        let name_index = self.r.read_u16()?;
        let descriptor_index = self.r.read_u16()?;
        let attributes = self.parse_attributes(constant_pool)?;

        Ok(MethodInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_attributes(&mut self, constant_pool: &ConstantPool) -> Result<Attributes> {
        AttributeParser::new(constant_pool, self.policy, &mut self.diagnostics)
            .parse_attributes(&mut self.r)
    }
}
