/*! Structural checks for trees built outside this crate.
 *
 * Lookup and generation index the arenas directly and walk `up` links until they run out, so a tree
 * decoded from JSON is checked once up front: every handle must be issued by the tree, every
 * parent chain must end at a block without a parent, and a block nested by a statement must name
 * the block holding that statement as its parent.
 */

use super::{Ast, BlockId, Exp, ExpKind, IdKind, Stmt, StmtKind, SymbolId};
use crate::types::Meta;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstError {
    #[error("root {0} is not a top-level block of the tree")]
    InvalidRoot(BlockId),
    #[error("{owner} refers to unknown block {blk}")]
    UnknownBlock { owner: String, blk: BlockId },
    #[error("{owner} refers to unknown identifier {id}")]
    UnknownId { owner: String, id: SymbolId },
    #[error("parent chain of {0} does not terminate")]
    ScopeCycle(BlockId),
    #[error("{stmt} statement in {blk} nests {child}, whose parent is {up:?}")]
    Misnested {
        stmt: &'static str,
        blk: BlockId,
        child: BlockId,
        up: Option<BlockId>,
    },
}

impl Ast {
    pub fn validate(&self) -> Result<(), AstError> {
        match self.get_block(self.root) {
            Some(root) if root.up.is_none() => {}
            _ => return Err(AstError::InvalidRoot(self.root)),
        }

        for (i, block) in self.blocks.iter().enumerate() {
            let blk = BlockId(i as u32);
            let owner = || blk.to_string();

            if let Some(up) = block.up {
                self.check_block(up, owner)?;
            }
            for &id in &block.ids {
                self.check_id(id, owner)?;
            }
            self.check_chain(blk)?;
        }

        for (i, block) in self.blocks.iter().enumerate() {
            let blk = BlockId(i as u32);
            for stmt in &block.stmts {
                self.check_stmt(blk, stmt)?;
            }
        }

        for (i, ident) in self.ids.iter().enumerate() {
            let owner = || format!("{} {} ({})", ident.kind_name(), ident.name, SymbolId(i as u32));
            self.check_meta(&ident.meta, owner)?;

            match &ident.kind {
                IdKind::Var { init } => {
                    if let Some(exp) = init {
                        self.check_exp(exp)?;
                    }
                }
                IdKind::Struct { fields: ids }
                | IdKind::Enum { elems: ids }
                | IdKind::Tuple { elems: ids } => {
                    for &id in ids {
                        self.check_id(id, owner)?;
                    }
                }
                IdKind::Fn { params, locals, blk } => {
                    for &id in params.iter().chain(locals) {
                        self.check_id(id, owner)?;
                    }
                    if let Some(blk) = blk {
                        self.check_block(*blk, owner)?;
                    }
                }
                IdKind::Contract { blk } | IdKind::Interface { blk } => {
                    if let Some(blk) = blk {
                        self.check_block(*blk, owner)?;
                    }
                }
                IdKind::Library { blk } => self.check_block(*blk, owner)?,
                IdKind::Label => {}
            }
        }

        Ok(())
    }

    fn check_block(&self, blk: BlockId, owner: impl Fn() -> String) -> Result<(), AstError> {
        match self.get_block(blk) {
            Some(_) => Ok(()),
            None => Err(AstError::UnknownBlock { owner: owner(), blk }),
        }
    }

    fn check_id(&self, id: SymbolId, owner: impl Fn() -> String) -> Result<(), AstError> {
        match self.get_id(id) {
            Some(_) => Ok(()),
            None => Err(AstError::UnknownId { owner: owner(), id }),
        }
    }

    /// Parent handles are already known to be valid here.
    fn check_chain(&self, blk: BlockId) -> Result<(), AstError> {
        let mut cur = self.block(blk).up;
        for _ in 0..self.blocks.len() {
            match cur {
                Some(up) => cur = self.block(up).up,
                None => return Ok(()),
            }
        }
        Err(AstError::ScopeCycle(blk))
    }

    fn check_stmt(&self, blk: BlockId, stmt: &Stmt) -> Result<(), AstError> {
        let nested = |child: BlockId| -> Result<(), AstError> {
            self.check_block(child, || format!("{} statement in {}", stmt.kind_name(), blk))?;
            let up = self.block(child).up;
            if up == Some(blk) {
                Ok(())
            } else {
                Err(AstError::Misnested {
                    stmt: stmt.kind_name(),
                    blk,
                    child,
                    up,
                })
            }
        };

        match &stmt.kind {
            StmtKind::Exp(exp) => self.check_exp(exp),
            StmtKind::Assign { l_exp, r_exp } => {
                self.check_exp(l_exp)?;
                self.check_exp(r_exp)
            }
            StmtKind::If {
                cond,
                then_blk,
                else_blk,
            } => {
                self.check_exp(cond)?;
                nested(*then_blk)?;
                (*else_blk).map_or(Ok(()), nested)
            }
            StmtKind::Loop { cond, blk: child } | StmtKind::Switch { cond, blk: child } => {
                if let Some(cond) = cond {
                    self.check_exp(cond)?;
                }
                nested(*child)
            }
            StmtKind::Case { val: Some(exp) } | StmtKind::Return { arg: Some(exp) } => {
                self.check_exp(exp)
            }
            StmtKind::Block(child) => nested(*child),
            StmtKind::Null
            | StmtKind::Case { val: None }
            | StmtKind::Return { arg: None }
            | StmtKind::Continue
            | StmtKind::Break
            | StmtKind::Goto { .. }
            | StmtKind::Ddl { .. } => Ok(()),
        }
    }

    fn check_exp(&self, exp: &Exp) -> Result<(), AstError> {
        let owner = || format!("{} expression at {}", exp.kind_name(), exp.pos);
        if let Some(id) = exp.id {
            self.check_id(id, owner)?;
        }
        self.check_meta(&exp.meta, owner)?;

        match &exp.kind {
            ExpKind::Type { key, value, .. } => {
                for child in key.iter().chain(value) {
                    self.check_exp(child)?;
                }
                Ok(())
            }
            ExpKind::Array { base, index } => {
                self.check_exp(base)?;
                self.check_exp(index)
            }
            ExpKind::Call { callee, args } => {
                self.check_exp(callee)?;
                args.iter().try_for_each(|arg| self.check_exp(arg))
            }
            ExpKind::Access { base, member } => {
                self.check_exp(base)?;
                self.check_exp(member)
            }
            ExpKind::Op { left, right, .. } => {
                self.check_exp(left)?;
                right.as_deref().map_or(Ok(()), |right| self.check_exp(right))
            }
            ExpKind::Cond {
                cond,
                then_exp,
                else_exp,
            } => {
                self.check_exp(cond)?;
                self.check_exp(then_exp)?;
                self.check_exp(else_exp)
            }
            ExpKind::Tuple { elems } => elems.iter().try_for_each(|elem| self.check_exp(elem)),
            ExpKind::Lit { .. }
            | ExpKind::Id { .. }
            | ExpKind::Sql { .. }
            | ExpKind::Global { .. }
            | ExpKind::Local { .. }
            | ExpKind::Stack { .. } => Ok(()),
        }
    }

    fn check_meta(&self, meta: &Meta, owner: impl Fn() -> String + Copy) -> Result<(), AstError> {
        if let Some(id) = meta.type_id {
            self.check_id(id, owner)?;
        }
        meta.elems.iter().try_for_each(|elem| self.check_meta(elem, owner))
    }
}
