/*! Resolved syntax tree handed over by the semantic checker.
 *
 * Blocks and identifiers live in arenas owned by `Ast` and refer to each other by index, so an
 * expression can point back at the identifier it was bound to and a block at its enclosing block
 * without ownership cycles. Expressions themselves are plain owned trees.
 */

pub mod blk;
pub mod exp;
pub mod id;
pub mod stmt;
pub mod validate;

pub use blk::{BlkKind, Block, BlockId};
pub use exp::{Exp, ExpKind, LitKind, SqlKind};
pub use id::{IdKind, Identifier};
pub use stmt::{Stmt, StmtKind};
pub use validate::AstError;

use crate::source_location::SrcPos;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    pub root: BlockId,
    blocks: Vec<Block>,
    ids: Vec<Identifier>,
}

impl Ast {
    pub fn new(pos: SrcPos) -> Self {
        Self {
            root: BlockId(0),
            blocks: vec![Block::root(pos)],
            ids: Vec::new(),
        }
    }

    /// Registers `block` as a child of `up`.
    pub fn add_block(&mut self, mut block: Block, up: BlockId) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        block.up = Some(up);
        self.blocks.push(block);
        id
    }

    /// Registers an identifier without declaring it in any block, as done
    /// for tuple elements and struct fields.
    pub fn new_id(&mut self, ident: Identifier) -> SymbolId {
        let id = SymbolId(self.ids.len() as u32);
        self.ids.push(ident);
        id
    }

    /// Declares `ident` in `blk` after the identifiers already there.
    pub fn add_id(&mut self, blk: BlockId, ident: Identifier) -> SymbolId {
        let id = self.new_id(ident);
        self.block_mut(blk).ids.push(id);
        id
    }

    pub fn add_stmt(&mut self, blk: BlockId, stmt: Stmt) {
        self.block_mut(blk).stmts.push(stmt);
    }

    /// Panics if `id` was not issued by this tree.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0 as usize]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.0 as usize]
    }

    pub fn get_block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0 as usize)
    }

    /// Panics if `id` was not issued by this tree.
    pub fn id(&self, id: SymbolId) -> &Identifier {
        &self.ids[id.0 as usize]
    }

    pub fn id_mut(&mut self, id: SymbolId) -> &mut Identifier {
        &mut self.ids[id.0 as usize]
    }

    pub fn get_id(&self, id: SymbolId) -> Option<&Identifier> {
        self.ids.get(id.0 as usize)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn id_count(&self) -> usize {
        self.ids.len()
    }
}
