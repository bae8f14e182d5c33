/*! Incremental module construction.
 *
 * `ModuleBuilder` owns the module being assembled; `FunctionBuilder` tracks one function's local
 * slots and appends its body instructions in order. Name clashes are rejected as they are added,
 * everything else is checked in one pass by `validate`.
 */

use crate::expression::Expression;
use crate::module::{DataSegment, Export, Function, Global, Memory, Module};
use crate::types::{Literal, ValType};
use crate::{IrError, Result};

pub struct FunctionBuilder {
    name: String,
    params: Vec<ValType>,
    result: ValType,
    locals: Vec<ValType>,
    body: Vec<Expression>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>, params: Vec<ValType>, result: ValType) -> Self {
        Self {
            name: name.into(),
            params,
            result,
            locals: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Allocates a local slot after the parameters and previously added
    /// locals and returns its index.
    pub fn add_local(&mut self, ty: ValType) -> u32 {
        self.locals.push(ty);
        (self.params.len() + self.locals.len() - 1) as u32
    }

    pub fn local_count(&self) -> usize {
        self.params.len() + self.locals.len()
    }

    /// Types of every slot, parameters first.
    pub fn local_types(&self) -> Vec<ValType> {
        self.params.iter().chain(self.locals.iter()).copied().collect()
    }

    pub fn local_type(&self, index: u32) -> Option<ValType> {
        self.local_types().get(index as usize).copied()
    }

    pub fn push(&mut self, inst: Expression) {
        self.body.push(inst);
    }

    pub fn instructions(&self) -> &[Expression] {
        &self.body
    }

    pub fn build(self) -> Function {
        Function {
            name: self.name,
            params: self.params,
            result: self.result,
            locals: self.locals,
            body: Expression::Block {
                name: None,
                children: self.body,
                ty: ValType::None,
            },
        }
    }
}

#[derive(Default)]
pub struct ModuleBuilder {
    module: Module,
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn add_global(
        &mut self,
        name: impl Into<String>,
        ty: ValType,
        mutable: bool,
        init: Literal,
    ) -> Result<()> {
        let name = name.into();
        if self.module.globals.contains_key(&name) {
            return Err(IrError::Duplicate {
                kind: "global",
                name,
            });
        }
        if init.ty() != ty {
            return Err(IrError::TypeError {
                func: name,
                msg: format!("global of type {} initialized with {}", ty, init.ty()),
            });
        }
        self.module.globals.insert(
            name.clone(),
            Global {
                name,
                ty,
                mutable,
                init,
            },
        );
        Ok(())
    }

    pub fn add_function(&mut self, func: Function) -> Result<()> {
        if self.module.functions.contains_key(&func.name) {
            return Err(IrError::Duplicate {
                kind: "function",
                name: func.name,
            });
        }
        self.module.functions.insert(func.name.clone(), func);
        Ok(())
    }

    pub fn add_export(&mut self, name: impl Into<String>, func: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.module.exports.contains_key(&name) {
            return Err(IrError::Duplicate {
                kind: "export",
                name,
            });
        }
        self.module.exports.insert(
            name.clone(),
            Export {
                name,
                func: func.into(),
            },
        );
        Ok(())
    }

    pub fn set_memory(&mut self, initial: u32, maximum: Option<u32>) {
        self.module.memory = Some(Memory { initial, maximum });
    }

    pub fn add_data_segment(&mut self, offset: u32, bytes: Vec<u8>) {
        self.module.data.push(DataSegment { offset, bytes });
    }

    /// Checks every function body and export against the module's tables.
    pub fn validate(&self) -> Result<()> {
        let module = &self.module;

        if let Some(memory) = &module.memory {
            if let Some(max) = memory.maximum {
                if max < memory.initial {
                    return Err(IrError::MemoryError(format!(
                        "maximum {} below initial {} pages",
                        max, memory.initial
                    )));
                }
            }
        }

        for seg in &module.data {
            let memory = module
                .memory
                .as_ref()
                .ok_or_else(|| IrError::MemoryError("data segment without memory".to_string()))?;
            if seg.end() > memory.byte_len() {
                return Err(IrError::MemoryError(format!(
                    "data segment at {} of {} bytes exceeds {} pages",
                    seg.offset,
                    seg.bytes.len(),
                    memory.initial
                )));
            }
        }

        for func in module.functions.values() {
            self.validate_function(func)?;
        }

        for export in module.exports.values() {
            if !module.functions.contains_key(&export.func) {
                return Err(IrError::UnknownFunction(export.func.clone()));
            }
        }

        Ok(())
    }

    fn validate_function(&self, func: &Function) -> Result<()> {
        let module = &self.module;
        let mut result = Ok(());

        func.body.walk(&mut |inst| {
            if result.is_err() {
                return;
            }
            result = match inst {
                Expression::LocalGet { index, ty } => match func.local_type(*index) {
                    None => Err(out_of_range(func, *index)),
                    Some(actual) if actual != *ty => Err(type_error(
                        func,
                        format!("local {} is {}, read as {}", index, actual, ty),
                    )),
                    Some(_) => Ok(()),
                },
                Expression::LocalSet { index, .. } => func
                    .local_type(*index)
                    .map(|_| ())
                    .ok_or_else(|| out_of_range(func, *index)),
                Expression::GlobalGet { name, .. } => module
                    .globals
                    .get(name)
                    .map(|_| ())
                    .ok_or_else(|| IrError::UnknownGlobal(name.clone())),
                Expression::GlobalSet { name, .. } => match module.globals.get(name) {
                    None => Err(IrError::UnknownGlobal(name.clone())),
                    Some(global) if !global.mutable => Err(type_error(
                        func,
                        format!("global {} is immutable", name),
                    )),
                    Some(_) => Ok(()),
                },
                Expression::Call { target, .. } => module
                    .functions
                    .get(target)
                    .map(|_| ())
                    .ok_or_else(|| IrError::UnknownFunction(target.clone())),
                Expression::Load { bytes, ty, .. } | Expression::Store { bytes, ty, .. } => {
                    check_access(module, func, *bytes, *ty)
                }
                Expression::Binary { op, ty, .. } if !op.accepts(*ty) => Err(type_error(
                    func,
                    format!("{} is not defined for {}", op.name(), ty),
                )),
                Expression::Unary { op, ty, .. } if !op.accepts(*ty) => Err(type_error(
                    func,
                    format!("{} is not defined for {}", op.name(), ty),
                )),
                _ => Ok(()),
            };
        });

        result
    }

    pub fn finish(self) -> Module {
        self.module
    }
}

fn check_access(module: &Module, func: &Function, bytes: u32, ty: ValType) -> Result<()> {
    if module.memory.is_none() {
        return Err(IrError::InvalidAccess {
            func: func.name.clone(),
            msg: "no memory declared".to_string(),
        });
    }
    let width_ok = if ty.is_float() {
        bytes == ty.byte_size()
    } else {
        matches!(bytes, 1 | 2 | 4 | 8) && bytes <= ty.byte_size()
    };
    if !width_ok {
        return Err(IrError::InvalidAccess {
            func: func.name.clone(),
            msg: format!("{} byte access on {}", bytes, ty),
        });
    }
    Ok(())
}

fn out_of_range(func: &Function, index: u32) -> IrError {
    IrError::LocalOutOfRange {
        func: func.name.clone(),
        index,
        count: func.local_count(),
    }
}

fn type_error(func: &Function, msg: String) -> IrError {
    IrError::TypeError {
        func: func.name.clone(),
        msg,
    }
}
