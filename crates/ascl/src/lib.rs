/*! Contract compiler back end.
 *
 * One import for the whole pipeline: the resolved AST model, the generator that lowers it, the
 * module IR it produces, and the text emitter.
 */

pub use ascl_core as core;
pub use ascl_emit as emit;
pub use ascl_gen as codegen;
pub use ascl_ir as ir;

pub use ascl_core::{Ast, Exp, Identifier, Meta, Stmt, Type, Value};

pub use ascl_emit::{EmitterConfig, WatEmitter};

pub use ascl_gen::{gen, GenConfig, GenError, GenOutput};

pub use ascl_ir::{Module, ModuleBuilder};
