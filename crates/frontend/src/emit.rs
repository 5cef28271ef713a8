//! Data emission.
//!
//! The initializer processor drives this interface rather than a concrete
//! code generator: it just needs somewhere to push the bytes and
//! zero-padding it computes. The assembler/linker backend that ultimately
//! owns the data segment is out of scope for this core.

use crate::exprs::ExprValue;

pub trait DataEmitter {
    fn emit_bytes(&mut self, bytes: &[u8]);
    fn emit_zero_bytes(&mut self, n: u32);

    /// Emit a scalar constant, `width` bytes wide, little-endian.
    fn define_data_from_constant(&mut self, value: &ExprValue, width: u8) {
        let bytes = (value.const_val as u64).to_le_bytes();
        self.emit_bytes(&bytes[..width as usize]);
    }
}

/// In-memory data segment, standing in for the real assembler backend in
/// tests and the CLI demo.
#[derive(Debug, Default)]
pub struct BufferEmitter {
    pub bytes: Vec<u8>,
}

impl BufferEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataEmitter for BufferEmitter {
    fn emit_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    fn emit_zero_bytes(&mut self, n: u32) {
        self.bytes.extend(std::iter::repeat_n(0u8, n as usize));
    }
}
