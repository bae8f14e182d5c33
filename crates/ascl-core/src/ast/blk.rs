/*! Lexical blocks and identifier resolution.
 *
 * Blocks form a tree through their `up` link. Lookup walks from the innermost block outward and
 * returns the first visible identifier. Tuple bindings and library imports are transparent: their
 * element or member identifiers are tested in place of the container, recomputed on every lookup
 * so a later change to a tuple or library is always observed.
 */

use super::{Ast, Identifier, IdKind, Stmt, SymbolId};
use crate::source_location::SrcPos;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blk{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlkKind {
    Normal,
    Root,
    Contract,
    Interface,
    Library,
    Fn,
    Loop,
    Switch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlkKind,
    #[serde(default)]
    pub up: Option<BlockId>,
    #[serde(default)]
    pub ids: Vec<SymbolId>,
    #[serde(default)]
    pub stmts: Vec<Stmt>,
    #[serde(default)]
    pub pos: SrcPos,
}

impl Block {
    pub fn new(kind: BlkKind, pos: SrcPos) -> Self {
        Self {
            kind,
            up: None,
            ids: Vec::new(),
            stmts: Vec::new(),
            pos,
        }
    }

    pub fn normal(pos: SrcPos) -> Self {
        Self::new(BlkKind::Normal, pos)
    }

    pub fn root(pos: SrcPos) -> Self {
        Self::new(BlkKind::Root, pos)
    }

    pub fn contract(pos: SrcPos) -> Self {
        Self::new(BlkKind::Contract, pos)
    }

    pub fn interface(pos: SrcPos) -> Self {
        Self::new(BlkKind::Interface, pos)
    }

    pub fn library(pos: SrcPos) -> Self {
        Self::new(BlkKind::Library, pos)
    }

    pub fn function(pos: SrcPos) -> Self {
        Self::new(BlkKind::Fn, pos)
    }

    pub fn looping(pos: SrcPos) -> Self {
        Self::new(BlkKind::Loop, pos)
    }

    pub fn switch(pos: SrcPos) -> Self {
        Self::new(BlkKind::Switch, pos)
    }
}

fn is_visible(id: &Identifier, name: &str, is_type: bool) -> bool {
    id.name == name && (!is_type || id.is_type_id())
}

impl Ast {
    /// Innermost block of `kind`, starting at `blk` itself.
    pub fn search_block(&self, blk: BlockId, kind: BlkKind) -> Option<BlockId> {
        let mut cur = Some(blk);
        while let Some(id) = cur {
            let block = self.block(id);
            if block.kind == kind {
                return Some(id);
            }
            cur = block.up;
        }
        None
    }

    /// Resolves `name` from `blk` outward. With `is_type` set only
    /// type-introducing identifiers match. Labels are never visible here.
    pub fn search_id(&self, blk: BlockId, name: &str, is_type: bool) -> Option<SymbolId> {
        let mut cur = Some(blk);
        while let Some(id) = cur {
            if let Some(found) = self.find_visible(id, |ident| is_visible(ident, name, is_type)) {
                return Some(found);
            }
            cur = self.block(id).up;
        }
        None
    }

    /// Finds a label declared directly in `blk`; enclosing blocks are not searched.
    pub fn search_label(&self, blk: BlockId, name: &str) -> Option<SymbolId> {
        self.block(blk)
            .ids
            .iter()
            .copied()
            .find(|&id| {
                let ident = self.id(id);
                ident.is_label() && ident.name == name
            })
    }

    fn find_visible(
        &self,
        blk: BlockId,
        pred: impl Fn(&Identifier) -> bool,
    ) -> Option<SymbolId> {
        for &id in &self.block(blk).ids {
            let ident = self.id(id);
            let found = match &ident.kind {
                IdKind::Label => None,
                IdKind::Tuple { elems } => elems.iter().copied().find(|&e| pred(self.id(e))),
                IdKind::Library { blk: lib } => self
                    .block(*lib)
                    .ids
                    .iter()
                    .copied()
                    .find(|&e| pred(self.id(e))),
                _ => pred(ident).then_some(id),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }
}
