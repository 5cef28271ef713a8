//! Type encoding, declaration specifiers, and declaration records for the
//! 6502 C front end's declaration subsystem.
//!
//! This crate holds the pure data model (§3 of the design): the compact
//! type-code encoding, `DeclSpec`, `Declaration`, and the storage-class /
//! flag bitsets. Parsing logic, the symbol table, and the function/tag
//! descriptor stores that these types are indexed against live in
//! `c65-frontend`, which depends on this crate.

pub mod declaration;
pub mod declspec;
pub mod encoding;
pub mod span;
pub mod storage;

pub use declaration::Declaration;
pub use declspec::DeclSpec;
pub use encoding::{
    decode_size, encode_size, FuncId, TagId, TagSizeResolver, TypeBuf, TypeBuilder, TypeCode,
    TypeElem, DECODE_SIZE,
};
pub use span::{Node, Span};
pub use storage::{DeclFlags, FuncFlags, StorageClass};
