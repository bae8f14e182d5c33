/*! Core model for the ascl contract compiler back end.
 *
 * Everything the generator reads lives here: the arbitrary-precision values used for constant
 * folding and data placement, the type metadata attached to every expression, and the AST whose
 * blocks resolve identifiers through nested scopes. The parser and semantic checker that build
 * this tree live upstream.
 */

pub mod ast;
pub mod op;
pub mod source_location;
pub mod types;
pub mod value;

pub use ast::{
    Ast, AstError, BlkKind, Block, BlockId, Exp, ExpKind, IdKind, Identifier, LitKind, SqlKind,
    Stmt, StmtKind, SymbolId,
};
pub use op::OpKind;
pub use source_location::SrcPos;
pub use types::{Meta, Type};
pub use value::{Value, ValueError};

pub type Result<T> = std::result::Result<T, ValueError>;

#[cfg(test)]
mod tests;
