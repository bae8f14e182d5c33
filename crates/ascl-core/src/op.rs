use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
    Inc,
    Dec,
    Neg,
    Not,
    BitNot,
}

impl OpKind {
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            OpKind::Inc | OpKind::Dec | OpKind::Neg | OpKind::Not | OpKind::BitNot
        )
    }

    pub fn is_arith(&self) -> bool {
        matches!(
            self,
            OpKind::Add | OpKind::Sub | OpKind::Mul | OpKind::Div | OpKind::Mod
        )
    }

    pub fn is_bit(&self) -> bool {
        matches!(
            self,
            OpKind::BitAnd | OpKind::BitOr | OpKind::BitXor | OpKind::Shl | OpKind::Shr
        )
    }

    pub fn is_cmp(&self) -> bool {
        matches!(
            self,
            OpKind::Eq | OpKind::Ne | OpKind::Lt | OpKind::Gt | OpKind::Le | OpKind::Ge
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, OpKind::And | OpKind::Or)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            OpKind::Add => "+",
            OpKind::Sub => "-",
            OpKind::Mul => "*",
            OpKind::Div => "/",
            OpKind::Mod => "%",
            OpKind::BitAnd => "&",
            OpKind::BitOr => "|",
            OpKind::BitXor => "^",
            OpKind::Shl => "<<",
            OpKind::Shr => ">>",
            OpKind::Eq => "==",
            OpKind::Ne => "!=",
            OpKind::Lt => "<",
            OpKind::Gt => ">",
            OpKind::Le => "<=",
            OpKind::Ge => ">=",
            OpKind::And => "&&",
            OpKind::Or => "||",
            OpKind::Inc => "++",
            OpKind::Dec => "--",
            OpKind::Neg => "-",
            OpKind::Not => "!",
            OpKind::BitNot => "~",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
