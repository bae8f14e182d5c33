use serde::{Deserialize, Serialize};
use std::fmt;

/// Source span of an AST node, 1-based lines and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SrcPos {
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl SrcPos {
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            end_line: line,
            end_column: column,
            start_byte: 0,
            end_byte: 0,
        }
    }

    pub fn with_bytes(mut self, start_byte: usize, end_byte: usize) -> Self {
        self.start_byte = start_byte;
        self.end_byte = end_byte;
        self
    }

    pub fn with_end(mut self, end_line: u32, end_column: u32) -> Self {
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }

    pub fn extract_snippet<'s>(&self, source_code: &'s str) -> Option<&'s str> {
        if self.start_byte < self.end_byte && self.end_byte <= source_code.len() {
            return source_code.get(self.start_byte..self.end_byte);
        }
        None
    }
}

impl fmt::Display for SrcPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
