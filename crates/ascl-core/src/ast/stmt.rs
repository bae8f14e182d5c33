use super::{BlockId, Exp, SqlKind};
use crate::source_location::SrcPos;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    Null,
    Exp(Exp),
    Assign {
        l_exp: Exp,
        r_exp: Exp,
    },
    If {
        cond: Exp,
        then_blk: BlockId,
        else_blk: Option<BlockId>,
    },
    Loop {
        cond: Option<Exp>,
        blk: BlockId,
    },
    Switch {
        cond: Option<Exp>,
        blk: BlockId,
    },
    Case {
        val: Option<Exp>,
    },
    Continue,
    Break,
    Return {
        arg: Option<Exp>,
    },
    Goto {
        label: String,
    },
    Ddl {
        kind: SqlKind,
        sql: String,
    },
    Block(BlockId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    #[serde(default)]
    pub pos: SrcPos,
}

impl Stmt {
    pub fn new(kind: StmtKind, pos: SrcPos) -> Self {
        Self { kind, pos }
    }

    pub fn exp(exp: Exp, pos: SrcPos) -> Self {
        Self::new(StmtKind::Exp(exp), pos)
    }

    pub fn assign(l_exp: Exp, r_exp: Exp, pos: SrcPos) -> Self {
        Self::new(StmtKind::Assign { l_exp, r_exp }, pos)
    }

    pub fn ret(arg: Option<Exp>, pos: SrcPos) -> Self {
        Self::new(StmtKind::Return { arg }, pos)
    }

    pub fn ddl(kind: SqlKind, sql: impl Into<String>, pos: SrcPos) -> Self {
        Self::new(StmtKind::Ddl { kind, sql: sql.into() }, pos)
    }

    pub fn block(blk: BlockId, pos: SrcPos) -> Self {
        Self::new(StmtKind::Block(blk), pos)
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            StmtKind::Null => "null",
            StmtKind::Exp(_) => "exp",
            StmtKind::Assign { .. } => "assign",
            StmtKind::If { .. } => "if",
            StmtKind::Loop { .. } => "loop",
            StmtKind::Switch { .. } => "switch",
            StmtKind::Case { .. } => "case",
            StmtKind::Continue => "continue",
            StmtKind::Break => "break",
            StmtKind::Return { .. } => "return",
            StmtKind::Goto { .. } => "goto",
            StmtKind::Ddl { .. } => "ddl",
            StmtKind::Block(_) => "block",
        }
    }
}
