use super::{BlockId, Exp, SymbolId};
use crate::source_location::SrcPos;
use crate::types::Meta;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IdKind {
    Var {
        init: Option<Exp>,
    },
    Struct {
        fields: Vec<SymbolId>,
    },
    Enum {
        elems: Vec<SymbolId>,
    },
    /// `meta` of a function identifier is its return type. `locals` lists the
    /// variables occupying the slots that follow the parameters.
    Fn {
        params: Vec<SymbolId>,
        locals: Vec<SymbolId>,
        blk: Option<BlockId>,
    },
    Contract {
        blk: Option<BlockId>,
    },
    Interface {
        blk: Option<BlockId>,
    },
    Label,
    Tuple {
        elems: Vec<SymbolId>,
    },
    Library {
        blk: BlockId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub kind: IdKind,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub pos: SrcPos,
    #[serde(default)]
    pub is_public: bool,
}

impl Identifier {
    pub fn new(name: impl Into<String>, kind: IdKind, pos: SrcPos) -> Self {
        Self {
            name: name.into(),
            kind,
            meta: Meta::default(),
            pos,
            is_public: false,
        }
    }

    pub fn var(name: impl Into<String>, meta: Meta, pos: SrcPos) -> Self {
        Self::new(name, IdKind::Var { init: None }, pos).with_meta(meta)
    }

    pub fn function(
        name: impl Into<String>,
        params: Vec<SymbolId>,
        ret: Meta,
        blk: Option<BlockId>,
        pos: SrcPos,
    ) -> Self {
        Self::new(
            name,
            IdKind::Fn {
                params,
                locals: Vec::new(),
                blk,
            },
            pos,
        )
        .with_meta(ret)
    }

    pub fn contract(name: impl Into<String>, blk: Option<BlockId>, pos: SrcPos) -> Self {
        Self::new(name, IdKind::Contract { blk }, pos)
    }

    pub fn interface(name: impl Into<String>, blk: Option<BlockId>, pos: SrcPos) -> Self {
        Self::new(name, IdKind::Interface { blk }, pos)
    }

    pub fn structure(name: impl Into<String>, fields: Vec<SymbolId>, pos: SrcPos) -> Self {
        Self::new(name, IdKind::Struct { fields }, pos)
    }

    pub fn enumeration(name: impl Into<String>, elems: Vec<SymbolId>, pos: SrcPos) -> Self {
        Self::new(name, IdKind::Enum { elems }, pos)
    }

    pub fn label(name: impl Into<String>, pos: SrcPos) -> Self {
        Self::new(name, IdKind::Label, pos)
    }

    pub fn tuple(elems: Vec<SymbolId>, pos: SrcPos) -> Self {
        Self::new("", IdKind::Tuple { elems }, pos)
    }

    pub fn library(name: impl Into<String>, blk: BlockId, pos: SrcPos) -> Self {
        Self::new(name, IdKind::Library { blk }, pos)
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_init(mut self, exp: Exp) -> Self {
        if let IdKind::Var { init } = &mut self.kind {
            *init = Some(exp);
        }
        self
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    pub fn is_var(&self) -> bool {
        matches!(self.kind, IdKind::Var { .. })
    }

    pub fn is_fn(&self) -> bool {
        matches!(self.kind, IdKind::Fn { .. })
    }

    pub fn is_label(&self) -> bool {
        matches!(self.kind, IdKind::Label)
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self.kind, IdKind::Tuple { .. })
    }

    pub fn is_lib(&self) -> bool {
        matches!(self.kind, IdKind::Library { .. })
    }

    /// Kinds that introduce a type name.
    pub fn is_type_id(&self) -> bool {
        matches!(
            self.kind,
            IdKind::Struct { .. }
                | IdKind::Enum { .. }
                | IdKind::Contract { .. }
                | IdKind::Interface { .. }
        )
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            IdKind::Var { .. } => "variable",
            IdKind::Struct { .. } => "struct",
            IdKind::Enum { .. } => "enumeration",
            IdKind::Fn { .. } => "function",
            IdKind::Contract { .. } => "contract",
            IdKind::Interface { .. } => "interface",
            IdKind::Label => "label",
            IdKind::Tuple { .. } => "tuple",
            IdKind::Library { .. } => "library",
        }
    }
}
