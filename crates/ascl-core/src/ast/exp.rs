use super::SymbolId;
use crate::op::OpKind;
use crate::source_location::SrcPos;
use crate::types::{Meta, Type};
use crate::value::{Value, ValueError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LitKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

impl LitKind {
    pub fn name(&self) -> &'static str {
        match self {
            LitKind::Null => "null",
            LitKind::Bool => "bool",
            LitKind::Int => "integer",
            LitKind::Float => "float",
            LitKind::Str => "string",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlKind {
    Query,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpKind {
    /// Raw literal text; `val` is filled in by the checker.
    Lit {
        kind: LitKind,
        text: String,
        #[serde(default)]
        val: Value,
    },
    Type {
        ty: Type,
        name: Option<String>,
        key: Option<Box<Exp>>,
        value: Option<Box<Exp>>,
    },
    Id {
        name: String,
    },
    Array {
        base: Box<Exp>,
        index: Box<Exp>,
    },
    Call {
        callee: Box<Exp>,
        args: Vec<Exp>,
    },
    Access {
        base: Box<Exp>,
        member: Box<Exp>,
    },
    Op {
        op: OpKind,
        left: Box<Exp>,
        right: Option<Box<Exp>>,
    },
    Cond {
        cond: Box<Exp>,
        then_exp: Box<Exp>,
        else_exp: Box<Exp>,
    },
    Sql {
        kind: SqlKind,
        sql: String,
    },
    Tuple {
        elems: Vec<Exp>,
    },
    /// Reference bound to a module global.
    Global {
        name: String,
    },
    /// Reference bound to a function local slot.
    Local {
        idx: u32,
    },
    /// Reference to `local[base] + addr + offset` holding a value of `ty`.
    Stack {
        ty: Type,
        base: u32,
        addr: u32,
        offset: u32,
    },
}

/// Expression node. `meta` stays undefined until the checker runs, and `id`
/// points at the identifier the node was resolved to, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exp {
    pub kind: ExpKind,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub pos: SrcPos,
    #[serde(default)]
    pub id: Option<SymbolId>,
}

impl Exp {
    fn new(kind: ExpKind, pos: SrcPos) -> Self {
        Self {
            kind,
            meta: Meta::default(),
            pos,
            id: None,
        }
    }

    pub fn lit(kind: LitKind, text: impl Into<String>, pos: SrcPos) -> Self {
        Self::new(
            ExpKind::Lit {
                kind,
                text: text.into(),
                val: Value::Null,
            },
            pos,
        )
    }

    pub fn type_ref(
        ty: Type,
        name: Option<String>,
        key: Option<Exp>,
        value: Option<Exp>,
        pos: SrcPos,
    ) -> Self {
        let mut exp = Self::new(
            ExpKind::Type {
                ty,
                name,
                key: key.map(Box::new),
                value: value.map(Box::new),
            },
            pos,
        );
        exp.meta.ty = ty;
        exp
    }

    pub fn id_ref(name: impl Into<String>, pos: SrcPos) -> Self {
        Self::new(ExpKind::Id { name: name.into() }, pos)
    }

    pub fn array(base: Exp, index: Exp, pos: SrcPos) -> Self {
        Self::new(
            ExpKind::Array {
                base: Box::new(base),
                index: Box::new(index),
            },
            pos,
        )
    }

    pub fn call(callee: Exp, args: Vec<Exp>, pos: SrcPos) -> Self {
        Self::new(
            ExpKind::Call {
                callee: Box::new(callee),
                args,
            },
            pos,
        )
    }

    pub fn access(base: Exp, member: Exp, pos: SrcPos) -> Self {
        Self::new(
            ExpKind::Access {
                base: Box::new(base),
                member: Box::new(member),
            },
            pos,
        )
    }

    pub fn op(op: OpKind, left: Exp, right: Option<Exp>, pos: SrcPos) -> Self {
        Self::new(
            ExpKind::Op {
                op,
                left: Box::new(left),
                right: right.map(Box::new),
            },
            pos,
        )
    }

    pub fn cond(cond: Exp, then_exp: Exp, else_exp: Exp, pos: SrcPos) -> Self {
        Self::new(
            ExpKind::Cond {
                cond: Box::new(cond),
                then_exp: Box::new(then_exp),
                else_exp: Box::new(else_exp),
            },
            pos,
        )
    }

    pub fn sql(kind: SqlKind, sql: impl Into<String>, pos: SrcPos) -> Self {
        Self::new(
            ExpKind::Sql {
                kind,
                sql: sql.into(),
            },
            pos,
        )
    }

    pub fn tuple(elem: Option<Exp>, pos: SrcPos) -> Self {
        Self::new(
            ExpKind::Tuple {
                elems: elem.into_iter().collect(),
            },
            pos,
        )
    }

    pub fn global(name: impl Into<String>, pos: SrcPos) -> Self {
        Self::new(ExpKind::Global { name: name.into() }, pos)
    }

    pub fn local(idx: u32, pos: SrcPos) -> Self {
        Self::new(ExpKind::Local { idx }, pos)
    }

    pub fn stack(ty: Type, base: u32, addr: u32, offset: u32, pos: SrcPos) -> Self {
        Self::new(
            ExpKind::Stack {
                ty,
                base,
                addr,
                offset,
            },
            pos,
        )
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_id(mut self, id: SymbolId) -> Self {
        self.id = Some(id);
        self
    }

    /// Appends an element to a tuple expression.
    ///
    /// Panics if `self` is not a tuple.
    pub fn push_elem(&mut self, elem: Exp) {
        match &mut self.kind {
            ExpKind::Tuple { elems } => elems.push(elem),
            other => panic!("cannot append to a non-tuple expression: {:?}", other),
        }
    }

    /// Value of a literal node, `None` for any other node. A non-null
    /// literal whose value was never filled in is parsed from its text.
    pub fn lit_value(&self) -> Option<Result<Cow<'_, Value>, ValueError>> {
        let ExpKind::Lit { kind, text, val } = &self.kind else {
            return None;
        };
        if !val.is_null() || *kind == LitKind::Null {
            return Some(Ok(Cow::Borrowed(val)));
        }
        Some(Value::from_literal(*kind, text).map(Cow::Owned))
    }

    pub fn is_lit(&self) -> bool {
        matches!(self.kind, ExpKind::Lit { .. })
    }

    pub fn is_global(&self) -> bool {
        matches!(self.kind, ExpKind::Global { .. })
    }

    pub fn is_local(&self) -> bool {
        matches!(self.kind, ExpKind::Local { .. })
    }

    pub fn is_stack(&self) -> bool {
        matches!(self.kind, ExpKind::Stack { .. })
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ExpKind::Lit { .. } => "literal",
            ExpKind::Type { .. } => "type",
            ExpKind::Id { .. } => "identifier",
            ExpKind::Array { .. } => "array",
            ExpKind::Call { .. } => "call",
            ExpKind::Access { .. } => "access",
            ExpKind::Op { .. } => "operator",
            ExpKind::Cond { .. } => "conditional",
            ExpKind::Sql { .. } => "sql",
            ExpKind::Tuple { .. } => "tuple",
            ExpKind::Global { .. } => "global",
            ExpKind::Local { .. } => "local",
            ExpKind::Stack { .. } => "stack",
        }
    }
}
