use ascl_ir::ModuleBuilder;

const ALIGN: u32 = 4;

/// Literal bytes placed in linear memory, laid out back to back from a base
/// address with every entry starting on a word boundary.
#[derive(Debug, Clone, Default)]
pub struct DataSegment {
    base: u32,
    offset: u32,
    entries: Vec<(u32, Vec<u8>)>,
}

impl DataSegment {
    pub fn new(base: u32) -> Self {
        Self {
            base,
            offset: align_up(base),
            entries: Vec::new(),
        }
    }

    /// Copies `bytes` into the segment and returns their address.
    pub fn add(&mut self, bytes: &[u8]) -> u32 {
        let addr = self.offset;
        self.entries.push((addr, bytes.to_vec()));
        self.offset = align_up(addr + bytes.len() as u32);
        addr
    }

    /// First address past the placed data.
    pub fn end(&self) -> u32 {
        self.entries
            .last()
            .map(|(addr, bytes)| addr + bytes.len() as u32)
            .unwrap_or(self.base)
    }

    pub fn entries(&self) -> &[(u32, Vec<u8>)] {
        &self.entries
    }

    pub fn install(self, builder: &mut ModuleBuilder) {
        for (addr, bytes) in self.entries {
            builder.add_data_segment(addr, bytes);
        }
    }
}

fn align_up(addr: u32) -> u32 {
    (addr + ALIGN - 1) & !(ALIGN - 1)
}
