//! `DeclSpec`: the result of parsing a declaration's prefix.

use crate::encoding::TypeBuf;
use crate::storage::{DeclFlags, StorageClass};

/// Storage class plus base type, produced by the declaration-specifier
/// parser and consumed by the declarator parser to finish a [`crate::declaration::Declaration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclSpec {
    pub storage_class: StorageClass,
    pub base_type: TypeBuf,
    pub flags: DeclFlags,
}

impl DeclSpec {
    /// A freshly initialized spec: no storage class, `End`-only base type.
    pub fn new() -> Self {
        DeclSpec {
            storage_class: StorageClass::NONE,
            base_type: TypeBuf::end(),
            flags: DeclFlags::NONE,
        }
    }
}

impl Default for DeclSpec {
    fn default() -> Self {
        Self::new()
    }
}
