use crate::config::EmitterConfig;
use anyhow::Result;
use colored::Colorize;
use std::io::Write;

pub type EmitResult = Result<()>;

/// Nesting depth and output style of the S-expression being written.
#[derive(Debug, Clone)]
pub struct EmitContext {
    pub depth: usize,
    pub unit: String,
    pub use_colors: bool,
}

impl EmitContext {
    pub fn new(unit: impl Into<String>, use_colors: bool) -> Self {
        Self {
            depth: 0,
            unit: unit.into(),
            use_colors,
        }
    }

    pub fn from_config(config: &EmitterConfig) -> Self {
        Self::new(config.indent_style.indent_chars(), config.use_colors)
    }

    pub fn pad(&self) -> String {
        self.unit.repeat(self.depth)
    }
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::new("  ", false)
    }
}

/// Highlighting applied to a whole output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Header,
    Comment,
}

pub trait Emitter {
    type Item;

    fn emit<W: Write>(
        &self,
        item: &Self::Item,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult;

    fn context(&self) -> EmitContext {
        EmitContext::default()
    }

    fn emit_to_string(&self, item: &Self::Item) -> Result<String> {
        let mut out = Vec::new();
        self.emit(item, &mut out, &mut self.context())?;
        Ok(String::from_utf8(out)?)
    }
}

pub struct EmitHelper;

impl EmitHelper {
    pub fn line<W: Write>(writer: &mut W, context: &EmitContext, text: &str) -> EmitResult {
        Self::styled(writer, context, text, Style::Plain)
    }

    pub fn styled<W: Write>(
        writer: &mut W,
        context: &EmitContext,
        text: &str,
        style: Style,
    ) -> EmitResult {
        let pad = context.pad();
        match style {
            _ if !context.use_colors => writeln!(writer, "{}{}", pad, text)?,
            Style::Plain => writeln!(writer, "{}{}", pad, text)?,
            Style::Header => writeln!(writer, "{}{}", pad, text.cyan())?,
            Style::Comment => writeln!(writer, "{}{}", pad, text.green())?,
        }
        Ok(())
    }

    /// `code ;; note` on one line, the note highlighted as a comment.
    pub fn annotated<W: Write>(
        writer: &mut W,
        context: &EmitContext,
        code: &str,
        note: &str,
    ) -> EmitResult {
        let note = format!(";; {}", note);
        if context.use_colors {
            writeln!(writer, "{}{} {}", context.pad(), code, note.green())?;
        } else {
            writeln!(writer, "{}{} {}", context.pad(), code, note)?;
        }
        Ok(())
    }

    /// Writes `(head`, then `body` one level deeper, then the closing paren
    /// on its own line.
    pub fn sexpr<W, F>(
        writer: &mut W,
        context: &mut EmitContext,
        head: &str,
        style: Style,
        body: F,
    ) -> EmitResult
    where
        W: Write,
        F: FnOnce(&mut W, &mut EmitContext) -> EmitResult,
    {
        Self::styled(writer, context, &format!("({}", head), style)?;
        context.depth += 1;
        let res = body(writer, context);
        context.depth -= 1;
        res?;
        Self::line(writer, context, ")")
    }
}
