//! Function descriptors.
//!
//! A function type byte (`TypeCode::Func`) carries only a [`FuncId`]
//! payload; the descriptor itself — parameter count, byte size of the
//! parameter block, flags, and the captured parameter symbol table — lives
//! here, indexed out of line so `TypeBuf`s stay cheap to clone.

use c65_types::{FuncFlags, FuncId};

use crate::symtab::SymTab;

#[derive(Debug)]
pub struct FuncDesc {
    pub param_count: u32,
    pub param_byte_size: u32,
    pub flags: FuncFlags,
    pub params: SymTab,
}

impl FuncDesc {
    pub fn new() -> Self {
        FuncDesc {
            param_count: 0,
            param_byte_size: 0,
            flags: FuncFlags::NONE,
            params: SymTab::new(),
        }
    }

    pub fn is_variadic(&self) -> bool {
        self.flags.contains(FuncFlags::ELLIPSIS)
    }

    pub fn is_fastcall(&self) -> bool {
        self.flags.contains(FuncFlags::FASTCALL)
    }
}

impl Default for FuncDesc {
    fn default() -> Self {
        Self::new()
    }
}

/// Arena of function descriptors, one per `TypeCode::Func` occurrence.
#[derive(Debug, Default)]
pub struct FuncDescStore {
    descs: Vec<FuncDesc>,
}

impl FuncDescStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, desc: FuncDesc) -> FuncId {
        let id = FuncId(self.descs.len() as u32);
        self.descs.push(desc);
        id
    }

    pub fn get(&self, id: FuncId) -> &FuncDesc {
        &self.descs[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: FuncId) -> &mut FuncDesc {
        &mut self.descs[id.0 as usize]
    }
}
