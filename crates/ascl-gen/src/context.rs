use crate::config::GenConfig;
use crate::data_segment::DataSegment;
use crate::errors::GenError;
use ascl_core::{Ast, Identifier, SrcPos, SymbolId};
use ascl_ir::{ModuleBuilder, ValType};
use tracing::warn;

/// Generation state for one module.
///
/// `locals` and `buf` belong to the function being generated and are
/// cleared by `reset_function`.
pub struct Gen<'a> {
    pub(crate) ast: &'a Ast,
    pub(crate) config: GenConfig,
    pub(crate) builder: ModuleBuilder,
    pub(crate) dsgmt: DataSegment,
    pub(crate) locals: Vec<ValType>,
    pub(crate) buf: Vec<u8>,
    pub(crate) diagnostics: Vec<GenError>,
}

impl<'a> Gen<'a> {
    pub fn new(ast: &'a Ast, config: GenConfig) -> Self {
        let dsgmt = DataSegment::new(config.data_offset);
        Self {
            ast,
            config,
            builder: ModuleBuilder::new(),
            dsgmt,
            locals: Vec::new(),
            buf: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub fn id(&self, id: SymbolId) -> &'a Identifier {
        self.ast.id(id)
    }

    pub fn builder(&self) -> &ModuleBuilder {
        &self.builder
    }

    pub fn dsgmt(&self) -> &DataSegment {
        &self.dsgmt
    }

    pub fn diagnostics(&self) -> &[GenError] {
        &self.diagnostics
    }

    /// Installs the local slot table of the function about to be generated.
    pub fn enter_function(&mut self, locals: Vec<ValType>) {
        self.locals = locals;
        self.buf.clear();
    }

    pub fn reset_function(&mut self) {
        self.locals.clear();
        self.buf.clear();
    }

    pub fn local_type(&self, idx: u32) -> Option<ValType> {
        self.locals.get(idx as usize).copied()
    }

    pub(crate) fn unsupported(&mut self, what: impl Into<String>, pos: SrcPos) {
        let what = what.into();
        warn!("unsupported {} at {}", what, pos);
        self.diagnostics.push(GenError::Unsupported { what, pos });
    }
}
