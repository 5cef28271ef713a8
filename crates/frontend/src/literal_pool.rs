//! String literal pool.
//!
//! String literals referenced by an initializer are interned once, can be
//! charset-translated in place (the target's execution charset need not be
//! ASCII), and are released once the initializer that consumed them has
//! emitted their bytes.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiteralHandle(pub u32);

pub trait LiteralPool {
    fn intern(&mut self, s: &str) -> LiteralHandle;
    fn get_literal(&self, handle: LiteralHandle) -> &[u8];
    fn translate_literal_pool(&mut self, handle: LiteralHandle);
    fn reset_literal_offs(&mut self, handle: LiteralHandle);
}

/// Identity-charset literal pool: strings are stored NUL-terminated, as
/// this core's target-charset translation is itself out of scope.
#[derive(Debug, Default)]
pub struct StringLiteralPool {
    entries: Vec<Option<Vec<u8>>>,
}

impl StringLiteralPool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LiteralPool for StringLiteralPool {
    fn intern(&mut self, s: &str) -> LiteralHandle {
        let mut bytes = s.as_bytes().to_vec();
        bytes.push(0);
        let id = self.entries.len() as u32;
        self.entries.push(Some(bytes));
        LiteralHandle(id)
    }

    fn get_literal(&self, handle: LiteralHandle) -> &[u8] {
        self.entries[handle.0 as usize]
            .as_deref()
            .expect("literal pool entry already released")
    }

    fn translate_literal_pool(&mut self, _handle: LiteralHandle) {
        // Identity charset: nothing to translate.
    }

    fn reset_literal_offs(&mut self, handle: LiteralHandle) {
        self.entries[handle.0 as usize] = None;
    }
}
