/*! WebAssembly-style module IR.
 *
 * Functions hold expression trees over four value types, with locals addressed by slot index,
 * globals by name, and linear memory by byte address. `ModuleBuilder` accumulates globals,
 * functions, exports and data segments and checks the finished module for dangling references
 * before it is handed to an emitter.
 */

pub mod builder;
pub mod expression;
pub mod module;
pub mod types;

pub use builder::{FunctionBuilder, ModuleBuilder};
pub use expression::{BinaryOp, Expression, UnaryOp};
pub use module::{DataSegment, Export, Function, Global, Memory, Module, PAGE_SIZE};
pub use types::{Literal, ValType};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    #[error("Duplicate {kind}: {name}")]
    Duplicate { kind: &'static str, name: String },
    #[error("Unknown global: {0}")]
    UnknownGlobal(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("Local {index} out of range in {func} ({count} locals)")]
    LocalOutOfRange {
        func: String,
        index: u32,
        count: usize,
    },
    #[error("Type error in {func}: {msg}")]
    TypeError { func: String, msg: String },
    #[error("Invalid memory access in {func}: {msg}")]
    InvalidAccess { func: String, msg: String },
    #[error("Memory error: {0}")]
    MemoryError(String),
}

pub type Result<T> = std::result::Result<T, IrError>;
