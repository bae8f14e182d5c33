use ascl_core::{Meta, Type};
use ascl_ir::ValType;

/// IR value type holding a value of `ty`. Reference types are 32-bit
/// addresses.
pub fn type_gen(ty: Type) -> ValType {
    match ty {
        Type::Bool
        | Type::Byte
        | Type::Int8
        | Type::Uint8
        | Type::Int16
        | Type::Uint16
        | Type::Int32
        | Type::Uint32 => ValType::I32,
        Type::Int64 | Type::Uint64 => ValType::I64,
        Type::Float => ValType::F32,
        Type::Double => ValType::F64,
        Type::String
        | Type::Account
        | Type::Struct
        | Type::Map
        | Type::Object
        | Type::Tuple => ValType::I32,
        Type::Undefined | Type::Void => ValType::None,
    }
}

/// Like `type_gen`, except that arrays are held by reference.
pub fn meta_gen(meta: &Meta) -> ValType {
    if meta.is_array() {
        ValType::I32
    } else {
        type_gen(meta.ty)
    }
}

/// Bytes a value described by `meta` occupies in a memory slot.
pub fn slot_size(meta: &Meta) -> u32 {
    if meta.is_array() {
        Type::Uint32.byte_size()
    } else {
        meta.ty.byte_size()
    }
}

/// Width and signedness of a load reading a slot described by `meta`.
pub fn load_of(meta: &Meta) -> (u32, bool, ValType) {
    if meta.is_array() {
        (Type::Uint32.byte_size(), false, ValType::I32)
    } else {
        (meta.ty.byte_size(), meta.is_signed(), type_gen(meta.ty))
    }
}
