/*! Arbitrary-precision values for constant folding and data placement.
 *
 * Literal text from the parser becomes a `Value` once the checker has validated it. The checker
 * folds constant operator trees with `evaluate`, range-checks the result against the target meta
 * with `fits`, and the generator finally writes the bytes into the module with `serialize`.
 */

use crate::ast::LitKind;
use crate::op::OpKind;
use crate::types::{Meta, Type};
use num_bigint::BigInt;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Bytes reserved for an integer payload (256-bit capacity).
pub const INT_VALUE_SIZE: usize = 32;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("operator '{op}' is not defined between {lhs} and {rhs}")]
    Mismatch {
        op: OpKind,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("operator '{op}' is not applicable to {kind}")]
    InvalidOperation { op: OpKind, kind: &'static str },
    #[error("operator '{0}' requires a right operand")]
    MissingOperand(OpKind),
    #[error("cannot compare {lhs} with {rhs}")]
    Incomparable {
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("divide by zero")]
    DivideByZero,
    #[error("cannot cast {from} to {to}")]
    InvalidCast { from: &'static str, to: Type },
    #[error("invalid {kind} literal: {text}")]
    InvalidLiteral { kind: &'static str, text: String },
}

type Result<T> = std::result::Result<T, ValueError>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(BigInt),
    Double(f64),
    Str(String),
    Object(Vec<u8>),
}

impl Value {
    /// Parses validated literal text. Integers accept `0x`, `0b` and leading-zero
    /// octal prefixes, an optional sign, and `_` separators.
    pub fn from_literal(kind: LitKind, text: &str) -> Result<Self> {
        let invalid = || ValueError::InvalidLiteral {
            kind: kind.name(),
            text: text.to_string(),
        };

        match kind {
            LitKind::Null => Ok(Value::Null),
            LitKind::Bool => match text {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(invalid()),
            },
            LitKind::Int => parse_int(text).map(Value::Int).ok_or_else(invalid),
            LitKind::Float => text
                .replace('_', "")
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|_| invalid()),
            LitKind::Str => Ok(Value::Str(text.to_string())),
        }
    }

    pub fn set_null(&mut self) {
        *self = Value::Null;
    }

    pub fn set_bool(&mut self, v: bool) {
        *self = Value::Bool(v);
    }

    pub fn set_int(&mut self, v: impl Into<BigInt>) {
        *self = Value::Int(v.into());
    }

    pub fn set_f64(&mut self, v: f64) {
        *self = Value::Double(v);
    }

    pub fn set_str(&mut self, v: impl Into<String>) {
        *self = Value::Str(v.into());
    }

    pub fn set_ptr(&mut self, bytes: impl Into<Vec<u8>>) {
        *self = Value::Object(bytes.into());
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => INT_VALUE_SIZE,
            Value::Double(_) => 8,
            Value::Str(s) => s.len(),
            Value::Object(bytes) => bytes.len(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.size() == 0
    }

    /// Exact zero test: integers by sign, doubles by `== 0.0` (so `-0.0` is zero).
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(i) => i.is_zero(),
            Value::Double(d) => *d == 0.0,
            _ => false,
        }
    }

    pub fn is_neg(&self) -> bool {
        matches!(self, Value::Int(i) if i.is_negative())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(s) => Some(s.as_bytes()),
            Value::Object(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Low 64 bits of the two's-complement representation.
    pub fn to_u64_bits(&self) -> Option<u64> {
        self.as_int().map(low_u64)
    }

    pub fn fits_i32(&self) -> bool {
        match self {
            Value::Int(i) => i.to_i32().is_some() || i.to_u32().is_some(),
            _ => false,
        }
    }

    pub fn fits_i64(&self) -> bool {
        match self {
            Value::Int(i) => i.to_i64().is_some() || i.to_u64().is_some(),
            _ => false,
        }
    }

    /// Whether the value is representable in the type described by `meta`.
    pub fn fits(&self, meta: &Meta) -> bool {
        match self {
            Value::Int(i) => match meta.ty.int_range() {
                Some((min, max)) => *i >= BigInt::from(min) && *i <= BigInt::from(max),
                None => true,
            },
            Value::Double(d) if meta.is_float() => !d.is_finite() || d.abs() <= f32::MAX as f64,
            _ => true,
        }
    }

    /// Orders two values of the same kind. NaN compares equal to everything.
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Ok(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Double(a), Value::Double(b)) => Ok(a.partial_cmp(b).unwrap_or(Ordering::Equal)),
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (Value::Object(a), Value::Object(b)) => Ok(a.cmp(b)),
            _ => Err(ValueError::Incomparable {
                lhs: self.kind_name(),
                rhs: other.kind_name(),
            }),
        }
    }

    /// Applies `op` to this value and `rhs` (absent for unary operators).
    pub fn evaluate(&self, op: OpKind, rhs: Option<&Value>) -> Result<Value> {
        if op.is_unary() {
            return self.eval_unary(op);
        }

        let rhs = rhs.ok_or(ValueError::MissingOperand(op))?;

        if op.is_cmp() {
            let ord = self.compare(rhs)?;
            let res = match op {
                OpKind::Eq => ord == Ordering::Equal,
                OpKind::Ne => ord != Ordering::Equal,
                OpKind::Lt => ord == Ordering::Less,
                OpKind::Gt => ord == Ordering::Greater,
                OpKind::Le => ord != Ordering::Greater,
                _ => ord != Ordering::Less,
            };
            return Ok(Value::Bool(res));
        }

        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => eval_int(op, a, b),
            (Value::Double(a), Value::Double(b)) => eval_f64(op, *a, *b),
            (Value::Str(a), Value::Str(b)) if op == OpKind::Add => {
                Ok(Value::Str(format!("{}{}", a, b)))
            }
            (Value::Bool(a), Value::Bool(b)) if op.is_logical() => Ok(Value::Bool(match op {
                OpKind::And => *a && *b,
                _ => *a || *b,
            })),
            (Value::Bool(_), Value::Bool(_)) | (Value::Str(_), Value::Str(_)) => {
                Err(ValueError::InvalidOperation {
                    op,
                    kind: self.kind_name(),
                })
            }
            _ => Err(ValueError::Mismatch {
                op,
                lhs: self.kind_name(),
                rhs: rhs.kind_name(),
            }),
        }
    }

    fn eval_unary(&self, op: OpKind) -> Result<Value> {
        let res = match (op, self) {
            (OpKind::Neg, Value::Int(i)) => Value::Int(-i),
            (OpKind::Neg, Value::Double(d)) => Value::Double(-d),
            (OpKind::Not, Value::Bool(b)) => Value::Bool(!b),
            (OpKind::BitNot, Value::Int(i)) => Value::Int(-i - BigInt::one()),
            (OpKind::Inc, Value::Int(i)) => Value::Int(i + BigInt::one()),
            (OpKind::Dec, Value::Int(i)) => Value::Int(i - BigInt::one()),
            _ => {
                return Err(ValueError::InvalidOperation {
                    op,
                    kind: self.kind_name(),
                })
            }
        };
        Ok(res)
    }

    /// Converts the value in place to the runtime kind used for `ty`.
    pub fn cast(&mut self, ty: Type) -> Result<()> {
        let from = self.kind_name();
        let invalid = move || ValueError::InvalidCast { from, to: ty };

        let casted = match ty {
            Type::Bool => match &*self {
                Value::Bool(b) => Value::Bool(*b),
                Value::Int(i) => Value::Bool(!i.is_zero()),
                Value::Double(d) => Value::Bool(*d != 0.0),
                Value::Str(s) => Value::Bool(s == "true"),
                _ => return Err(invalid()),
            },
            _ if ty.is_integer() => match &*self {
                Value::Bool(b) => Value::Int(BigInt::from(*b as u8)),
                Value::Int(i) => Value::Int(i.clone()),
                Value::Double(d) => BigInt::from_f64(d.trunc())
                    .map(Value::Int)
                    .ok_or_else(invalid)?,
                Value::Str(s) => parse_int(s).map(Value::Int).ok_or_else(invalid)?,
                _ => return Err(invalid()),
            },
            Type::Float | Type::Double => match &*self {
                Value::Bool(b) => Value::Double(if *b { 1.0 } else { 0.0 }),
                Value::Int(i) => i.to_f64().map(Value::Double).ok_or_else(invalid)?,
                Value::Double(d) => Value::Double(*d),
                Value::Str(s) => s
                    .parse::<f64>()
                    .map(Value::Double)
                    .map_err(|_| invalid())?,
                _ => return Err(invalid()),
            },
            Type::String => match &*self {
                Value::Bool(b) => Value::Str(b.to_string()),
                Value::Int(i) => Value::Str(i.to_string()),
                Value::Double(d) => Value::Str(d.to_string()),
                Value::Str(s) => Value::Str(s.clone()),
                _ => return Err(invalid()),
            },
            _ => return Err(invalid()),
        };

        *self = casted;
        Ok(())
    }

    /// Appends the fixed-width little-endian encoding of the value for a
    /// target of type `meta` and returns the number of bytes written.
    ///
    /// Integers are written as the low 32 or 64 bits of their two's-complement
    /// form, so `-1` becomes all ones rather than the magnitude `1`.
    ///
    /// Panics on a null value: a resolved literal is never null here.
    pub fn serialize(&self, buf: &mut Vec<u8>, meta: &Meta) -> usize {
        match self {
            Value::Bool(b) => {
                buf.extend_from_slice(&(*b as u32).to_le_bytes());
                4
            }
            Value::Int(i) => {
                let bits = low_u64(i);
                if meta.is_int64() {
                    buf.extend_from_slice(&bits.to_le_bytes());
                    8
                } else {
                    buf.extend_from_slice(&(bits as u32).to_le_bytes());
                    4
                }
            }
            Value::Double(d) => {
                if meta.is_double() {
                    buf.extend_from_slice(&d.to_le_bytes());
                    8
                } else {
                    buf.extend_from_slice(&(*d as f32).to_le_bytes());
                    4
                }
            }
            Value::Str(s) => {
                buf.extend_from_slice(s.as_bytes());
                s.len()
            }
            Value::Object(bytes) => {
                buf.extend_from_slice(bytes);
                bytes.len()
            }
            Value::Null => unreachable!("invalid value: {} for meta {}", self.kind_name(), meta),
        }
    }
}

/// Widest left shift folded at compile time.
const MAX_SHIFT: usize = INT_VALUE_SIZE * 8;

fn eval_int(op: OpKind, a: &BigInt, b: &BigInt) -> Result<Value> {
    let shift = || {
        b.to_usize().ok_or(ValueError::InvalidOperation {
            op,
            kind: "int",
        })
    };
    let lshift = || match shift()? {
        n if n <= MAX_SHIFT => Ok(n),
        _ => Err(ValueError::InvalidOperation { op, kind: "int" }),
    };

    let res = match op {
        OpKind::Add => a + b,
        OpKind::Sub => a - b,
        OpKind::Mul => a * b,
        OpKind::Div | OpKind::Mod if b.is_zero() => return Err(ValueError::DivideByZero),
        OpKind::Div => a / b,
        OpKind::Mod => a % b,
        OpKind::BitAnd => a & b,
        OpKind::BitOr => a | b,
        OpKind::BitXor => a ^ b,
        OpKind::Shl => a << lshift()?,
        OpKind::Shr => a >> shift()?,
        _ => return Err(ValueError::InvalidOperation { op, kind: "int" }),
    };
    Ok(Value::Int(res))
}

fn eval_f64(op: OpKind, a: f64, b: f64) -> Result<Value> {
    let res = match op {
        OpKind::Add => a + b,
        OpKind::Sub => a - b,
        OpKind::Mul => a * b,
        OpKind::Div if b == 0.0 => return Err(ValueError::DivideByZero),
        OpKind::Div => a / b,
        _ => return Err(ValueError::InvalidOperation { op, kind: "double" }),
    };
    Ok(Value::Double(res))
}

fn low_u64(i: &BigInt) -> u64 {
    let mask = BigInt::from(u64::MAX);
    (i & &mask).to_u64().unwrap_or_default()
}

fn parse_int(text: &str) -> Option<BigInt> {
    let text = text.replace('_', "");
    let (neg, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(&text)),
    };

    let (radix, digits) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if let Some(bin) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        (2, bin)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    if digits.is_empty() {
        return None;
    }

    let magnitude = BigInt::parse_bytes(digits.as_bytes(), radix)?;
    Some(if neg { -magnitude } else { magnitude })
}
