use crate::config::EmitterConfig;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter, Style};
use ascl_ir::{Expression, Function, Global, Module, ValType};
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct WatEmitter {
    config: EmitterConfig,
}

impl WatEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    fn emit_global<W: Write>(
        &self,
        global: &Global,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let ty = if global.mutable {
            format!("(mut {})", global.ty)
        } else {
            global.ty.to_string()
        };
        EmitHelper::line(
            writer,
            context,
            &format!(
                "(global ${} {} ({}.const {}))",
                global.name,
                ty,
                global.init.ty(),
                global.init
            ),
        )
    }

    fn emit_function<W: Write>(
        &self,
        module: &Module,
        func: &Function,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let mut header = format!("func ${}", func.name);
        for export in module.exports.values().filter(|e| e.func == func.name) {
            header.push_str(&format!(" (export \"{}\")", export.name));
        }
        for param in &func.params {
            header.push_str(&format!(" (param {})", param));
        }
        if func.result != ValType::None {
            header.push_str(&format!(" (result {})", func.result));
        }

        EmitHelper::sexpr(writer, context, &header, Style::Header, |w, c| {
            for (i, local) in func.locals.iter().enumerate() {
                let decl = format!("(local {})", local);
                if self.config.include_types {
                    let slot = func.params.len() + i;
                    EmitHelper::annotated(w, c, &decl, &format!("slot {}: {}", slot, local))?;
                } else {
                    EmitHelper::line(w, c, &decl)?;
                }
            }

            match &func.body {
                Expression::Block {
                    name: None,
                    children,
                    ..
                } => {
                    for inst in children {
                        self.emit_expression(inst, w, c)?;
                    }
                    Ok(())
                }
                body => self.emit_expression(body, w, c),
            }
        })
    }

    /// Blocks open a nested level; everything else prints on one line.
    fn emit_expression<W: Write>(
        &self,
        inst: &Expression,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        match inst {
            Expression::Block { name, children, .. } => {
                let header = match name {
                    Some(name) => format!("block ${}", name),
                    None => "block".to_string(),
                };
                EmitHelper::sexpr(writer, context, &header, Style::Plain, |w, c| {
                    for child in children {
                        self.emit_expression(child, w, c)?;
                    }
                    Ok(())
                })
            }
            _ => EmitHelper::line(writer, context, &inst.to_string()),
        }
    }
}

impl Emitter for WatEmitter {
    type Item = Module;

    fn emit<W: Write>(
        &self,
        module: &Module,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        EmitHelper::sexpr(writer, context, "module", Style::Plain, |w, c| {
            if let Some(memory) = &module.memory {
                let line = match memory.maximum {
                    Some(max) => format!("(memory {} {})", memory.initial, max),
                    None => format!("(memory {})", memory.initial),
                };
                EmitHelper::line(w, c, &line)?;
            }

            for seg in &module.data {
                EmitHelper::line(
                    w,
                    c,
                    &format!(
                        "(data (i32.const {}) \"{}\")",
                        seg.offset,
                        escape_bytes(&seg.bytes)
                    ),
                )?;
            }

            for global in module.globals.values() {
                self.emit_global(global, w, c)?;
            }

            for func in module.functions.values() {
                self.emit_function(module, func, w, c)?;
            }

            Ok(())
        })
    }

    fn context(&self) -> EmitContext {
        EmitContext::from_config(&self.config)
    }
}

fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{:02x}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_bytes() {
        assert_eq!(escape_bytes(b"hi"), "hi");
        assert_eq!(escape_bytes(b"a\"b\\"), "a\\\"b\\\\");
        assert_eq!(escape_bytes(&[0, 255, b'\n']), "\\00\\ff\\0a");
    }
}
