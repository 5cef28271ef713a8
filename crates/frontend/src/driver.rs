//! Top-level declaration parsing entry points.
//!
//! Ties the declaration-specifier parser, the declarator parser, the
//! aggregate processors and the initializer processor together behind a
//! single [`Parser`] that owns the lexical/tag/function state and the
//! external collaborators (§6: expression evaluator, data emitter, literal
//! pool) as type parameters rather than trait objects, so a caller who
//! doesn't need dynamic dispatch pays nothing for it.

use c65_types::{Declaration, StorageClass};

use crate::emit::DataEmitter;
use crate::error::Diagnostics;
use crate::exprs::ConstExprEvaluator;
use crate::func::FuncDescStore;
use crate::lexer::TokenCursor;
use crate::literal_pool::LiteralPool;
use crate::symtab::SymTab;
use crate::tag::TagStore;

/// The lone mode flag this core consults (§6): strict-ANSI toggles the
/// unnamed-parameter check and disables the void-initializer extension.
/// Threaded explicitly rather than read off a process global.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub ansi: bool,
    pub default_char_signed: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            ansi: false,
            default_char_signed: true,
        }
    }
}

pub struct Parser<E, D, L> {
    pub cursor: TokenCursor,
    pub tags: TagStore,
    pub funcs: FuncDescStore,
    pub syms: SymTab,
    pub diags: Diagnostics,
    pub options: Options,
    pub evaluator: E,
    pub emitter: D,
    pub literals: L,
}

impl<E, D, L> Parser<E, D, L>
where
    E: ConstExprEvaluator,
    D: DataEmitter,
    L: LiteralPool,
{
    pub fn new(source: &str, options: Options, evaluator: E, emitter: D, literals: L) -> Self {
        Parser {
            cursor: TokenCursor::from_source(source),
            tags: TagStore::new(),
            funcs: FuncDescStore::new(),
            syms: SymTab::new(),
            diags: Diagnostics::new(),
            options,
            evaluator,
            emitter,
            literals,
        }
    }

    /// `int x;`-style top-level declaration: DeclSpec, then one declarator
    /// in `NEED_IDENT` mode, optionally followed by an initializer.
    pub fn parse_top_level_decl(&mut self, default_storage: StorageClass) -> Declaration {
        let spec = self.parse_decl_spec(Some(default_storage));

        // A bare `struct/union/enum {...};` with no declarator at all just
        // defines the tag; §4.5 already registered it while parsing the
        // DeclSpec, so no identifier is required here.
        if *self.cursor.current() == crate::lexer::Token::Semi {
            self.cursor.advance();
            return Declaration {
                ident: None,
                ty: spec.base_type,
            };
        }

        let mut decl = self.parse_declarator(&spec, crate::declarator::Mode::NeedIdent);

        if *self.cursor.current() == crate::lexer::Token::Assign {
            self.cursor.advance();
            // The initializer may back-patch an incomplete array dimension.
            decl.ty = self.parse_initializer(&decl.ty);
        }

        if *self.cursor.current() == crate::lexer::Token::Semi {
            self.cursor.advance();
        }

        if let Some(sym) = crate::symtab::Symbol::from_declaration(&decl, spec.storage_class, 0) {
            self.syms.add_local_sym(sym);
        }

        decl
    }

    /// `(int, char *)`-equivalent abstract type, for casts/sizeof: a
    /// DeclSpec followed by a declarator in `NoIdent` mode.
    pub fn parse_type_name(&mut self) -> c65_types::TypeBuf {
        let spec = self.parse_decl_spec(None);
        let decl = self.parse_declarator(&spec, crate::declarator::Mode::NoIdent);
        decl.ty
    }
}

/// A `Parser` wired to this crate's built-in expression evaluator, buffer
/// emitter, and string literal pool — good enough for tests and the CLI
/// demo, where a real assembler backend isn't in the picture.
pub type DefaultParser = Parser<
    crate::exprs::BuiltinExprEvaluator,
    crate::emit::BufferEmitter,
    crate::literal_pool::StringLiteralPool,
>;

impl DefaultParser {
    pub fn new_default(source: &str, options: Options) -> Self {
        Parser::new(
            source,
            options,
            crate::exprs::BuiltinExprEvaluator::new(),
            crate::emit::BufferEmitter::new(),
            crate::literal_pool::StringLiteralPool::new(),
        )
    }
}
