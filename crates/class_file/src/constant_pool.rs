use std::ops::Index;

use crate::{ClassFileError, Result};

#[macro_export]
macro_rules! matches_cp_info {
    ($cp:expr, $index:expr, $i:ident) => {
        $cp.get($index).and_then(|cp_info| match cp_info {
            $crate::CpInfo::$i(n) => Ok(n),
            c => Err($crate::ClassFileError::UnexpectedConstantPoolEntry(
                stringify!($i),
                c.clone(),
            )),
        })
    };
}

/// The constant pool, indexed from 1. Slot 0 and the slot after every Long or Double hold
/// [`CpInfo::Unusable`], so `len()` equals the declared `constant_pool_count`.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct ConstantPool {
    cp_infos: Vec<CpInfo>,
}
impl ConstantPool {
    pub fn new(cp_infos: Vec<CpInfo>) -> Self {
        Self { cp_infos }
    }

    pub fn len(&self) -> usize {
        self.cp_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cp_infos.len() <= 1
    }

    pub fn get(&self, index: u16) -> Result<&CpInfo> {
        match self.cp_infos.get(index as usize) {
            Some(CpInfo::Unusable) | None => Err(ClassFileError::InvalidConstantPoolIndex(index)),
            Some(cp_info) => Ok(cp_info),
        }
    }

    pub fn utf8(&self, index: u16) -> Result<&str> {
        matches_cp_info!(self, index, Utf8).map(String::as_str)
    }

    /// Follows a `CONSTANT_Class` entry to its name.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        let ClassInfo { name_index } = matches_cp_info!(self, index, Class)?;

        self.utf8(*name_index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CpInfo> {
        self.cp_infos.iter()
    }
}
impl Index<u16> for ConstantPool {
    type Output = CpInfo;

    fn index(&self, index: u16) -> &Self::Output {
        &self.cp_infos[index as usize]
    }
}
impl<'a> IntoIterator for &'a ConstantPool {
    type Item = &'a CpInfo;
    type IntoIter = std::slice::Iter<'a, CpInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.cp_infos.iter()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum CpInfo {
    Utf8(String),
    Integer(i32),
    /// The four bytes of a `CONSTANT_Float`, high bytes first.
    Float([u8; 4]),
    /// The eight bytes of a `CONSTANT_Long`, high bytes first.
    Long([u8; 8]),
    /// The eight bytes of a `CONSTANT_Double`, high bytes first.
    Double([u8; 8]),
    Class(ClassInfo),
    String { string_index: u16 },
    FieldRef(RefInfo),
    MethodRef(RefInfo),
    InterfaceMethodRef(RefInfo),
    NameAndType(NameAndTypeInfo),
    MethodHandle(MethodHandleInfo),
    MethodType(MethodTypeInfo),
    InvokeDynamic(InvokeDynamicInfo),
    Unusable,
}
impl CpInfo {
    pub fn float_value(&self) -> Option<f32> {
        match self {
            CpInfo::Float(bytes) => Some(f32::from_be_bytes(*bytes)),
            _ => None,
        }
    }

    pub fn long_value(&self) -> Option<i64> {
        match self {
            CpInfo::Long(bytes) => Some(i64::from_be_bytes(*bytes)),
            _ => None,
        }
    }

    pub fn double_value(&self) -> Option<f64> {
        match self {
            CpInfo::Double(bytes) => Some(f64::from_be_bytes(*bytes)),
            _ => None,
        }
    }

    /// Whether the entry takes two slots in the pool.
    pub fn is_wide(&self) -> bool {
        matches!(self, CpInfo::Long(_) | CpInfo::Double(_))
    }

    /// Whether the entry is a loadable literal: Integer, Float, Long, Double or String.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            CpInfo::Integer(_)
                | CpInfo::Float(_)
                | CpInfo::Long(_)
                | CpInfo::Double(_)
                | CpInfo::String { .. }
        )
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RefInfo {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ClassInfo {
    // The constant_pool entry at name_index must be a CONSTANT_Utf8_info structure
    // representing a valid binary class or interface name encoded in internal form.
    pub name_index: u16,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NameAndTypeInfo {
    pub name_index: u16,
    pub descriptor_index: u16,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct InvokeDynamicInfo {
    pub bootstrap_method_attr_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MethodHandleInfo {
    pub reference_kind: u8,
    pub reference_index: u16,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MethodTypeInfo {
    pub descriptor_index: u16,
}
