use crate::expression::Expression;
use crate::types::{Literal, ValType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Linear memory page size in bytes.
pub const PAGE_SIZE: u32 = 65536;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Global {
    pub name: String,
    pub ty: ValType,
    pub mutable: bool,
    pub init: Literal,
}

/// A function. Parameters occupy the first local slots; `locals` lists the
/// types of the slots that follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub params: Vec<ValType>,
    pub result: ValType,
    pub locals: Vec<ValType>,
    pub body: Expression,
}

impl Function {
    pub fn local_count(&self) -> usize {
        self.params.len() + self.locals.len()
    }

    pub fn local_type(&self, index: u32) -> Option<ValType> {
        let index = index as usize;
        self.params
            .get(index)
            .or_else(|| self.locals.get(index.checked_sub(self.params.len())?))
            .copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Export {
    pub name: String,
    pub func: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    pub initial: u32,
    pub maximum: Option<u32>,
}

impl Memory {
    pub fn byte_len(&self) -> u64 {
        self.initial as u64 * PAGE_SIZE as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSegment {
    pub offset: u32,
    pub bytes: Vec<u8>,
}

impl DataSegment {
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    pub globals: IndexMap<String, Global>,
    pub functions: IndexMap<String, Function>,
    pub exports: IndexMap<String, Export>,
    pub memory: Option<Memory>,
    pub data: Vec<DataSegment>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_global(&self, name: &str) -> Option<&Global> {
        self.globals.get(name)
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn data_len(&self) -> usize {
        self.data.iter().map(|seg| seg.bytes.len()).sum()
    }
}
