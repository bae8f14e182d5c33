use crate::types::{Literal, ValType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    DivS,
    DivU,
    RemS,
    RemU,
    And,
    Or,
    Xor,
    Shl,
    ShrS,
    ShrU,
    Eq,
    Ne,
    LtS,
    LtU,
    GtS,
    GtU,
    LeS,
    LeU,
    GeS,
    GeU,
    // float only
    Div,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::DivS => "div_s",
            BinaryOp::DivU => "div_u",
            BinaryOp::RemS => "rem_s",
            BinaryOp::RemU => "rem_u",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::Shl => "shl",
            BinaryOp::ShrS => "shr_s",
            BinaryOp::ShrU => "shr_u",
            BinaryOp::Eq => "eq",
            BinaryOp::Ne => "ne",
            BinaryOp::LtS => "lt_s",
            BinaryOp::LtU => "lt_u",
            BinaryOp::GtS => "gt_s",
            BinaryOp::GtU => "gt_u",
            BinaryOp::LeS => "le_s",
            BinaryOp::LeU => "le_u",
            BinaryOp::GeS => "ge_s",
            BinaryOp::GeU => "ge_u",
            BinaryOp::Div => "div",
            BinaryOp::Lt => "lt",
            BinaryOp::Gt => "gt",
            BinaryOp::Le => "le",
            BinaryOp::Ge => "ge",
        }
    }

    pub fn is_cmp(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::LtS
                | BinaryOp::LtU
                | BinaryOp::GtS
                | BinaryOp::GtU
                | BinaryOp::LeS
                | BinaryOp::LeU
                | BinaryOp::GeS
                | BinaryOp::GeU
                | BinaryOp::Lt
                | BinaryOp::Gt
                | BinaryOp::Le
                | BinaryOp::Ge
        )
    }

    /// Whether the operator exists for operands of type `ty`.
    pub fn accepts(&self, ty: ValType) -> bool {
        match self {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Eq | BinaryOp::Ne => {
                ty != ValType::None
            }
            BinaryOp::Div | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => {
                ty.is_float()
            }
            _ => ty.is_int(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Eqz,
    Neg,
}

impl UnaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryOp::Eqz => "eqz",
            UnaryOp::Neg => "neg",
        }
    }

    pub fn accepts(&self, ty: ValType) -> bool {
        match self {
            UnaryOp::Eqz => ty.is_int(),
            UnaryOp::Neg => ty.is_float(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Nop,
    Const(Literal),
    LocalGet {
        index: u32,
        ty: ValType,
    },
    LocalSet {
        index: u32,
        value: Box<Expression>,
    },
    GlobalGet {
        name: String,
        ty: ValType,
    },
    GlobalSet {
        name: String,
        value: Box<Expression>,
    },
    /// Reads `bytes` bytes at `ptr + offset`, extending to `ty`.
    Load {
        bytes: u32,
        signed: bool,
        offset: u32,
        align: u32,
        ty: ValType,
        ptr: Box<Expression>,
    },
    /// Writes the low `bytes` bytes of `value` at `ptr + offset`.
    Store {
        bytes: u32,
        offset: u32,
        align: u32,
        ty: ValType,
        ptr: Box<Expression>,
        value: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        ty: ValType,
        value: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        ty: ValType,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Select {
        cond: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
        ty: ValType,
    },
    Call {
        target: String,
        operands: Vec<Expression>,
        ty: ValType,
    },
    Drop(Box<Expression>),
    Return(Option<Box<Expression>>),
    Block {
        name: Option<String>,
        children: Vec<Expression>,
        ty: ValType,
    },
    Unreachable,
}

impl Expression {
    pub fn constant(lit: Literal) -> Self {
        Expression::Const(lit)
    }

    pub fn i32(v: i32) -> Self {
        Expression::Const(Literal::I32(v))
    }

    pub fn local_get(index: u32, ty: ValType) -> Self {
        Expression::LocalGet { index, ty }
    }

    pub fn local_set(index: u32, value: Expression) -> Self {
        Expression::LocalSet {
            index,
            value: Box::new(value),
        }
    }

    pub fn global_get(name: impl Into<String>, ty: ValType) -> Self {
        Expression::GlobalGet {
            name: name.into(),
            ty,
        }
    }

    pub fn global_set(name: impl Into<String>, value: Expression) -> Self {
        Expression::GlobalSet {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn load(bytes: u32, signed: bool, offset: u32, ty: ValType, ptr: Expression) -> Self {
        Expression::Load {
            bytes,
            signed,
            offset,
            align: bytes,
            ty,
            ptr: Box::new(ptr),
        }
    }

    pub fn store(bytes: u32, offset: u32, ty: ValType, ptr: Expression, value: Expression) -> Self {
        Expression::Store {
            bytes,
            offset,
            align: bytes,
            ty,
            ptr: Box::new(ptr),
            value: Box::new(value),
        }
    }

    pub fn unary(op: UnaryOp, ty: ValType, value: Expression) -> Self {
        Expression::Unary {
            op,
            ty,
            value: Box::new(value),
        }
    }

    pub fn binary(op: BinaryOp, ty: ValType, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            ty,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn select(cond: Expression, if_true: Expression, if_false: Expression) -> Self {
        let ty = if_true.result_type();
        Expression::Select {
            cond: Box::new(cond),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
            ty,
        }
    }

    pub fn call(target: impl Into<String>, operands: Vec<Expression>, ty: ValType) -> Self {
        Expression::Call {
            target: target.into(),
            operands,
            ty,
        }
    }

    pub fn drop(value: Expression) -> Self {
        Expression::Drop(Box::new(value))
    }

    pub fn ret(value: Option<Expression>) -> Self {
        Expression::Return(value.map(Box::new))
    }

    pub fn block(name: Option<String>, children: Vec<Expression>) -> Self {
        let ty = children
            .last()
            .map(Expression::result_type)
            .unwrap_or_default();
        Expression::Block { name, children, ty }
    }

    /// Type of the value left on the stack, `ValType::None` if nothing is.
    pub fn result_type(&self) -> ValType {
        match self {
            Expression::Const(lit) => lit.ty(),
            Expression::LocalGet { ty, .. }
            | Expression::GlobalGet { ty, .. }
            | Expression::Load { ty, .. }
            | Expression::Select { ty, .. }
            | Expression::Call { ty, .. }
            | Expression::Block { ty, .. } => *ty,
            Expression::Unary { op, ty, .. } => match op {
                UnaryOp::Eqz => ValType::I32,
                UnaryOp::Neg => *ty,
            },
            Expression::Binary { op, ty, .. } => {
                if op.is_cmp() {
                    ValType::I32
                } else {
                    *ty
                }
            }
            Expression::Nop
            | Expression::LocalSet { .. }
            | Expression::GlobalSet { .. }
            | Expression::Store { .. }
            | Expression::Drop(_)
            | Expression::Return(_)
            | Expression::Unreachable => ValType::None,
        }
    }

    /// Direct operands, in evaluation order.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Nop
            | Expression::Const(_)
            | Expression::LocalGet { .. }
            | Expression::GlobalGet { .. }
            | Expression::Unreachable => Vec::new(),
            Expression::LocalSet { value, .. }
            | Expression::GlobalSet { value, .. }
            | Expression::Unary { value, .. }
            | Expression::Drop(value) => vec![&**value],
            Expression::Load { ptr, .. } => vec![&**ptr],
            Expression::Store { ptr, value, .. } => vec![&**ptr, &**value],
            Expression::Binary { left, right, .. } => vec![&**left, &**right],
            Expression::Select {
                cond,
                if_true,
                if_false,
                ..
            } => vec![&**if_true, &**if_false, &**cond],
            Expression::Call { operands, .. } => operands.iter().collect(),
            Expression::Return(value) => value.iter().map(|v| &**v).collect(),
            Expression::Block { children, .. } => children.iter().collect(),
        }
    }

    /// Pre-order walk over this expression and all nested operands.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expression)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    pub fn opcode(&self) -> String {
        match self {
            Expression::Nop => "nop".to_string(),
            Expression::Const(lit) => format!("{}.const", lit.ty()),
            Expression::LocalGet { .. } => "local.get".to_string(),
            Expression::LocalSet { .. } => "local.set".to_string(),
            Expression::GlobalGet { .. } => "global.get".to_string(),
            Expression::GlobalSet { .. } => "global.set".to_string(),
            Expression::Load {
                bytes, signed, ty, ..
            } => {
                if *bytes < ty.byte_size() {
                    let sign = if *signed { "s" } else { "u" };
                    format!("{}.load{}_{}", ty, bytes * 8, sign)
                } else {
                    format!("{}.load", ty)
                }
            }
            Expression::Store { bytes, ty, .. } => {
                if *bytes < ty.byte_size() {
                    format!("{}.store{}", ty, bytes * 8)
                } else {
                    format!("{}.store", ty)
                }
            }
            Expression::Unary { op, ty, .. } => format!("{}.{}", ty, op.name()),
            Expression::Binary { op, ty, .. } => format!("{}.{}", ty, op.name()),
            Expression::Select { .. } => "select".to_string(),
            Expression::Call { .. } => "call".to_string(),
            Expression::Drop(_) => "drop".to_string(),
            Expression::Return(_) => "return".to_string(),
            Expression::Block { .. } => "block".to_string(),
            Expression::Unreachable => "unreachable".to_string(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.opcode())?;
        match self {
            Expression::Const(lit) => write!(f, " {}", lit)?,
            Expression::LocalGet { index, .. } | Expression::LocalSet { index, .. } => {
                write!(f, " {}", index)?
            }
            Expression::GlobalGet { name, .. }
            | Expression::GlobalSet { name, .. }
            | Expression::Call { target: name, .. } => write!(f, " ${}", name)?,
            Expression::Load { offset, .. } | Expression::Store { offset, .. } if *offset > 0 => {
                write!(f, " offset={}", offset)?
            }
            Expression::Block { name: Some(name), .. } => write!(f, " ${}", name)?,
            _ => {}
        }
        for child in self.children() {
            write!(f, " {}", child)?;
        }
        write!(f, ")")
    }
}
