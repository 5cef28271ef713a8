//! Declaration, type-directed initializer, and aggregate parsing for the
//! 6502 C front end.
//!
//! Built on top of `c65_types`'s encoding scheme: this crate supplies the
//! parsing logic (declaration specifiers, declarators, enum/struct/union
//! bodies, initializers) and the concrete stores (`SymTab`, `FuncDescStore`,
//! `TagStore`) that the encoded types are indexed against, plus the
//! external-collaborator traits a caller plugs in: a constant-expression
//! evaluator, a data emitter, and a string literal pool.

pub mod aggregates;
pub mod declarator;
pub mod declspec;
pub mod driver;
pub mod emit;
pub mod error;
pub mod exprs;
pub mod func;
pub mod initializer;
pub mod lexer;
pub mod literal_pool;
pub mod symtab;
pub mod tag;

pub use driver::{DefaultParser, Options, Parser};
pub use error::{Diagnostic, Diagnostics, FrontendError};
