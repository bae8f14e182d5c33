/*! Code generation from the resolved AST to module IR.
 *
 * The generator walks each contract's declarations and function bodies in source order and drives
 * a `ModuleBuilder`. Constructs it cannot lower are skipped and reported as diagnostics next to
 * the module; broken invariants of the resolved tree abort generation.
 */

pub mod config;
pub mod context;
pub mod data_segment;
pub mod errors;
pub mod exp_gen;
pub mod module_gen;
pub mod stmt_gen;
pub mod util;

pub use config::GenConfig;
pub use context::Gen;
pub use errors::GenError;
pub use exp_gen::LowerMode;

use ascl_core::Ast;
use ascl_ir::Module;
use tracing::info;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, Clone)]
pub struct GenOutput {
    pub module: Module,
    pub diagnostics: Vec<GenError>,
}

/// Generates the module for every contract and library in `ast`.
pub fn gen(ast: &Ast, config: &GenConfig) -> Result<GenOutput> {
    ast.validate()?;

    let mut gen = Gen::new(ast, config.clone());
    gen.module_gen()?;
    let output = gen.finish()?;

    info!(
        "generated {} functions, {} globals, {} data segments",
        output.module.functions.len(),
        output.module.globals.len(),
        output.module.data.len()
    );

    Ok(output)
}

#[cfg(test)]
mod tests;
