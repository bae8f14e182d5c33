use crate::context::Gen;
use crate::util::meta_gen;
use crate::{GenOutput, Result};
use ascl_core::{BlockId, Exp, ExpKind, IdKind, Identifier, SymbolId};
use ascl_ir::{Expression, FunctionBuilder, Literal, ValType, PAGE_SIZE};
use tracing::debug;

impl<'a> Gen<'a> {
    /// Generates every contract and library declared at the root.
    pub fn module_gen(&mut self) -> Result<()> {
        let ast = self.ast;

        for &id in &ast.block(ast.root).ids {
            let ident = ast.id(id);
            match &ident.kind {
                IdKind::Contract { blk: Some(blk) } => self.contract_gen(ident, *blk)?,
                IdKind::Library { blk } => self.contract_gen(ident, *blk)?,
                _ => {}
            }
        }

        Ok(())
    }

    fn contract_gen(&mut self, contract: &Identifier, blk: BlockId) -> Result<()> {
        debug!("generating {} {}", contract.kind_name(), contract.name);
        let ast = self.ast;

        for &id in &ast.block(blk).ids {
            let ident = ast.id(id);
            match &ident.kind {
                IdKind::Var { init } => self.global_gen(ident, init.as_ref())?,
                IdKind::Tuple { elems } => {
                    for &elem in elems {
                        let elem = ast.id(elem);
                        if let IdKind::Var { init } = &elem.kind {
                            self.global_gen(elem, init.as_ref())?;
                        }
                    }
                }
                IdKind::Fn {
                    params,
                    locals,
                    blk: Some(body),
                } => self.fn_gen(ident, params, locals, *body)?,
                _ => {}
            }
        }

        Ok(())
    }

    /// Contract variables become mutable globals, initialized from a
    /// literal initializer or to zero.
    fn global_gen(&mut self, var: &Identifier, init: Option<&Exp>) -> Result<()> {
        let ty = meta_gen(&var.meta);
        if ty == ValType::None {
            self.unsupported(format!("variable {} of type {}", var.name, var.meta), var.pos);
            return Ok(());
        }

        let init = match init.map(|exp| (exp, &exp.kind)) {
            Some((exp, ExpKind::Lit { .. })) => {
                let lit = match exp.lit_value() {
                    Some(Ok(val)) => Some(self.lit_gen(&val, &var.meta)),
                    _ => None,
                };
                match lit {
                    Some(Expression::Const(lit)) if lit.ty() == ty => lit,
                    _ => {
                        self.unsupported(format!("initializer of {}", var.name), var.pos);
                        Literal::zero(ty)
                    }
                }
            }
            Some((exp, _)) => {
                self.unsupported(format!("{} initializer of {}", exp.kind_name(), var.name), exp.pos);
                Literal::zero(ty)
            }
            None => Literal::zero(ty),
        };

        self.builder.add_global(var.name.clone(), ty, true, init)?;
        Ok(())
    }

    fn fn_gen(
        &mut self,
        func: &Identifier,
        params: &[SymbolId],
        locals: &[SymbolId],
        body: BlockId,
    ) -> Result<()> {
        let ast = self.ast;
        let param_types = params.iter().map(|&p| meta_gen(&ast.id(p).meta)).collect();

        let mut builder = FunctionBuilder::new(func.name.clone(), param_types, meta_gen(&func.meta));
        for &local in locals {
            builder.add_local(meta_gen(&ast.id(local).meta));
        }

        debug!(
            "generating function {} ({} params, {} locals)",
            func.name,
            params.len(),
            locals.len()
        );

        self.enter_function(builder.local_types());
        for inst in self.stmts_gen(&ast.block(body).stmts) {
            builder.push(inst);
        }
        self.reset_function();

        self.builder.add_function(builder.build())?;
        if func.is_public && self.config.export_public {
            self.builder.add_export(func.name.clone(), func.name.clone())?;
        }

        Ok(())
    }

    /// Places the literal data, sizes memory to hold it and validates the
    /// module.
    pub fn finish(self) -> Result<GenOutput> {
        let Gen {
            config,
            mut builder,
            dsgmt,
            diagnostics,
            ..
        } = self;

        let needed = (dsgmt.end() as u64).div_ceil(PAGE_SIZE as u64) as u32;
        builder.set_memory(config.initial_pages.max(needed), config.max_pages);
        dsgmt.install(&mut builder);

        builder.validate()?;
        debug!("module validated with {} diagnostics", diagnostics.len());

        Ok(GenOutput {
            module: builder.finish(),
            diagnostics,
        })
    }
}
