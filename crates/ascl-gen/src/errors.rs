use ascl_core::{AstError, SrcPos};
use ascl_ir::IrError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenError {
    #[error("Unsupported {what} at {pos}")]
    Unsupported { what: String, pos: SrcPos },

    #[error("malformed AST: {0}")]
    Ast(#[from] AstError),

    #[error("IR builder error: {0}")]
    Ir(#[from] IrError),
}
