/*! Text output for generated modules.
 *
 * Modules print as WAT-style S-expressions: memory and data first, then globals, then functions
 * with their exports, parameters, locals and one body instruction per line.
 */

pub mod config;
pub mod emitter;
pub mod wat_emitter;

pub use config::{EmitterConfig, IndentStyle};
pub use emitter::{EmitContext, EmitHelper, EmitResult, Emitter, Style};
pub use wat_emitter::WatEmitter;
