use crate::ast::SymbolId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Type {
    #[default]
    Undefined,
    Bool,
    Byte,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Double,
    String,
    Account,
    Struct,
    Map,
    Object,
    Void,
    Tuple,
}

impl Type {
    /// Width in bytes of a value of this type in linear memory. Reference
    /// types occupy one 32-bit address word.
    pub fn byte_size(&self) -> u32 {
        match self {
            Type::Undefined | Type::Void => 0,
            Type::Bool | Type::Byte | Type::Int8 | Type::Uint8 => 1,
            Type::Int16 | Type::Uint16 => 2,
            Type::Int32 | Type::Uint32 | Type::Float => 4,
            Type::Int64 | Type::Uint64 | Type::Double => 8,
            Type::String | Type::Account | Type::Struct | Type::Map | Type::Object | Type::Tuple => 4,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Type::Byte
                | Type::Int8
                | Type::Uint8
                | Type::Int16
                | Type::Uint16
                | Type::Int32
                | Type::Uint32
                | Type::Int64
                | Type::Uint64
        )
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Type::Int8 | Type::Int16 | Type::Int32 | Type::Int64)
    }

    pub fn is_fpoint(&self) -> bool {
        matches!(self, Type::Float | Type::Double)
    }

    pub fn is_int64(&self) -> bool {
        matches!(self, Type::Int64 | Type::Uint64)
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::String | Type::Account | Type::Struct | Type::Map | Type::Object | Type::Tuple
        )
    }

    /// Inclusive value range of an integer type as (min, max).
    pub fn int_range(&self) -> Option<(i128, i128)> {
        match self {
            Type::Byte | Type::Uint8 => Some((0, u8::MAX as i128)),
            Type::Int8 => Some((i8::MIN as i128, i8::MAX as i128)),
            Type::Int16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Type::Uint16 => Some((0, u16::MAX as i128)),
            Type::Int32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Type::Uint32 => Some((0, u32::MAX as i128)),
            Type::Int64 => Some((i64::MIN as i128, i64::MAX as i128)),
            Type::Uint64 => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Type::Undefined => "undefined",
            Type::Bool => "bool",
            Type::Byte => "byte",
            Type::Int8 => "int8",
            Type::Uint8 => "uint8",
            Type::Int16 => "int16",
            Type::Uint16 => "uint16",
            Type::Int32 => "int32",
            Type::Uint32 => "uint32",
            Type::Int64 => "int64",
            Type::Uint64 => "uint64",
            Type::Float => "float",
            Type::Double => "double",
            Type::String => "string",
            Type::Account => "account",
            Type::Struct => "struct",
            Type::Map => "map",
            Type::Object => "object",
            Type::Void => "void",
            Type::Tuple => "tuple",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved type annotation of an expression or identifier.
///
/// For arrays `ty` is the element type and `arr_dim` the number of
/// dimensions. `elems` carries struct field, tuple element, or map
/// key/value metas.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meta {
    pub ty: Type,
    pub size: u32,
    #[serde(default)]
    pub arr_dim: u32,
    #[serde(default)]
    pub elems: Vec<Meta>,
    #[serde(default)]
    pub type_id: Option<SymbolId>,
}

impl Meta {
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            size: ty.byte_size(),
            ..Default::default()
        }
    }

    pub fn array(elem: Type, arr_dim: u32) -> Self {
        Self {
            arr_dim,
            ..Self::new(elem)
        }
    }

    pub fn structure(type_id: SymbolId, fields: Vec<Meta>) -> Self {
        let size = fields.iter().map(|f| f.size).sum();
        Self {
            ty: Type::Struct,
            size,
            arr_dim: 0,
            elems: fields,
            type_id: Some(type_id),
        }
    }

    pub fn map(key: Meta, value: Meta) -> Self {
        Self {
            elems: vec![key, value],
            ..Self::new(Type::Map)
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.ty == Type::Undefined
    }

    pub fn is_array(&self) -> bool {
        self.arr_dim > 0
    }

    pub fn is_map(&self) -> bool {
        self.ty == Type::Map
    }

    pub fn is_struct(&self) -> bool {
        self.ty == Type::Struct
    }

    pub fn is_int64(&self) -> bool {
        self.ty.is_int64()
    }

    pub fn is_float(&self) -> bool {
        self.ty == Type::Float
    }

    pub fn is_double(&self) -> bool {
        self.ty == Type::Double
    }

    pub fn is_integer(&self) -> bool {
        self.ty.is_integer()
    }

    pub fn is_signed(&self) -> bool {
        self.ty.is_signed()
    }

    pub fn is_void(&self) -> bool {
        self.ty == Type::Void
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        for _ in 0..self.arr_dim {
            write!(f, "[]")?;
        }
        Ok(())
    }
}
