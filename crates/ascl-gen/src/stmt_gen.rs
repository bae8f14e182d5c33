/*! Statement lowering.
 *
 * Assignment picks the store by where the target lives: module globals and local slots have their
 * own set instructions, everything else is written through a computed byte address.
 */

use crate::context::Gen;
use crate::exp_gen::LowerMode;
use crate::util::{meta_gen, type_gen};
use ascl_core::{BlockId, Exp, ExpKind, Stmt, StmtKind, Type};
use ascl_ir::{Expression, ValType};
use tracing::trace;

impl<'a> Gen<'a> {
    /// Lowers one statement. `None` means the statement produced nothing:
    /// null statements, embedded DDL, map assignments, and statements whose
    /// expressions have no lowering.
    pub fn stmt_gen(&mut self, stmt: &Stmt) -> Option<Expression> {
        match &stmt.kind {
            StmtKind::Null => None,
            StmtKind::Exp(exp) => self.exp_stmt_gen(exp),
            StmtKind::Assign { l_exp, r_exp } => self.assign_gen(l_exp, r_exp),
            StmtKind::Return { arg } => Some(self.return_gen(arg.as_ref())),
            StmtKind::Ddl { .. } => None,
            StmtKind::Block(blk) => Some(self.block_gen(*blk)),
            _ => unreachable!("invalid statement: {}", stmt.kind_name()),
        }
    }

    /// Lowers `stmts` in order, recording a diagnostic for every statement
    /// other than a null statement that produced nothing.
    pub fn stmts_gen(&mut self, stmts: &[Stmt]) -> Vec<Expression> {
        let mut insts = Vec::with_capacity(stmts.len());

        for stmt in stmts {
            trace!("{} statement at {}", stmt.kind_name(), stmt.pos);

            match self.stmt_gen(stmt) {
                Some(inst) => insts.push(inst),
                None if matches!(stmt.kind, StmtKind::Null) => {}
                None => self.unsupported(format!("{} statement", stmt.kind_name()), stmt.pos),
            }
        }

        insts
    }

    fn exp_stmt_gen(&mut self, exp: &Exp) -> Option<Expression> {
        let inst = self.exp_gen(exp, LowerMode::Value)?;

        if inst.result_type() == ValType::None {
            Some(inst)
        } else {
            Some(Expression::drop(inst))
        }
    }

    fn assign_gen(&mut self, l_exp: &Exp, r_exp: &Exp) -> Option<Expression> {
        let id = l_exp.id.map(|id| self.id(id));

        // map updates are lowered to runtime calls elsewhere
        if id.is_some_and(|id| id.meta.is_map()) {
            return None;
        }

        let value = self.exp_gen(r_exp, LowerMode::Value)?;

        match &l_exp.kind {
            ExpKind::Global { name } => return Some(Expression::global_set(name.clone(), value)),
            ExpKind::Local { idx } => return Some(Expression::local_set(*idx, value)),
            _ => {}
        }

        let address = self.exp_gen(l_exp, LowerMode::Address)?;

        if let ExpKind::Stack { ty, .. } = &l_exp.kind {
            let ty = if l_exp.meta.is_array() {
                Type::Uint32
            } else {
                *ty
            };

            return Some(Expression::store(
                ty.byte_size(),
                0,
                type_gen(ty),
                address,
                value,
            ));
        }

        // element of an array indexed at runtime
        assert!(
            id.is_some_and(|id| id.meta.is_array()),
            "invalid assignment target: {} of {}",
            l_exp.kind_name(),
            id.map(|id| id.meta.to_string()).unwrap_or_default()
        );

        Some(Expression::store(
            l_exp.meta.ty.byte_size(),
            0,
            meta_gen(&l_exp.meta),
            address,
            value,
        ))
    }

    fn return_gen(&mut self, arg: Option<&Exp>) -> Expression {
        let value = arg.and_then(|arg| {
            let value = self.exp_gen(arg, LowerMode::Value);
            if value.is_none() {
                self.unsupported(format!("{} return value", arg.kind_name()), arg.pos);
            }
            value
        });

        Expression::ret(value)
    }

    fn block_gen(&mut self, blk: BlockId) -> Expression {
        let ast = self.ast;
        let children = self.stmts_gen(&ast.block(blk).stmts);

        Expression::Block {
            name: None,
            children,
            ty: ValType::None,
        }
    }
}
