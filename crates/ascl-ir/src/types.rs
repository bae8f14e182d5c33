use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type of a local, global, or expression result. `None` marks
/// expressions that produce nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValType {
    #[default]
    None,
    I32,
    I64,
    F32,
    F64,
}

impl ValType {
    pub fn byte_size(&self) -> u32 {
        match self {
            ValType::None => 0,
            ValType::I32 | ValType::F32 => 4,
            ValType::I64 | ValType::F64 => 8,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, ValType::I32 | ValType::I64)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ValType::F32 | ValType::F64)
    }
}

impl fmt::Display for ValType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValType::None => "none",
            ValType::I32 => "i32",
            ValType::I64 => "i64",
            ValType::F32 => "f32",
            ValType::F64 => "f64",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Literal {
    pub fn ty(&self) -> ValType {
        match self {
            Literal::I32(_) => ValType::I32,
            Literal::I64(_) => ValType::I64,
            Literal::F32(_) => ValType::F32,
            Literal::F64(_) => ValType::F64,
        }
    }

    /// Zero of the given type. Panics on `ValType::None`.
    pub fn zero(ty: ValType) -> Self {
        match ty {
            ValType::I32 => Literal::I32(0),
            ValType::I64 => Literal::I64(0),
            ValType::F32 => Literal::F32(0.0),
            ValType::F64 => Literal::F64(0.0),
            ValType::None => panic!("no zero literal for type none"),
        }
    }

    /// Reads a little-endian literal of `ty` from the front of `bytes`.
    pub fn from_le_bytes(ty: ValType, bytes: &[u8]) -> Option<Self> {
        let lit = match ty {
            ValType::I32 => Literal::I32(i32::from_le_bytes(bytes.get(..4)?.try_into().ok()?)),
            ValType::I64 => Literal::I64(i64::from_le_bytes(bytes.get(..8)?.try_into().ok()?)),
            ValType::F32 => Literal::F32(f32::from_le_bytes(bytes.get(..4)?.try_into().ok()?)),
            ValType::F64 => Literal::F64(f64::from_le_bytes(bytes.get(..8)?.try_into().ok()?)),
            ValType::None => return None,
        };
        Some(lit)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::I32(v) => write!(f, "{}", v),
            Literal::I64(v) => write!(f, "{}", v),
            Literal::F32(v) => write!(f, "{}", v),
            Literal::F64(v) => write!(f, "{}", v),
        }
    }
}
