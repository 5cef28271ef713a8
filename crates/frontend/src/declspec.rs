//! Declaration-specifier parsing: storage class, then base type.

use c65_types::{DeclFlags, DeclSpec, StorageClass, TypeBuf};

use crate::emit::DataEmitter;
use crate::error::FrontendError;
use crate::exprs::ConstExprEvaluator;
use crate::lexer::Token;
use crate::literal_pool::LiteralPool;

impl<E, D, L> super::driver::Parser<E, D, L>
where
    E: ConstExprEvaluator,
    D: DataEmitter,
    L: LiteralPool,
{
    /// Parses at most one storage-class keyword. `default_storage` is the
    /// caller-supplied fallback when none is present (e.g. `AUTO` for a
    /// local, `EXTERN` for a prototype); `None` means no storage class is
    /// permitted here (parameter lists restrict to `auto`/`register` via
    /// their own check in the declarator parser, not here).
    fn parse_storage_class(&mut self, default_storage: Option<StorageClass>) -> (StorageClass, bool) {
        let sc = match self.cursor.current() {
            Token::Extern => Some(StorageClass::EXTERN | StorageClass::STATIC),
            Token::Static => Some(StorageClass::STATIC),
            Token::Register => Some(StorageClass::REGISTER | StorageClass::STATIC),
            Token::Auto => Some(StorageClass::AUTO),
            Token::Typedef => Some(StorageClass::TYPEDEF),
            _ => None,
        };
        if let Some(sc) = sc {
            self.cursor.advance();
            (sc, false)
        } else {
            (default_storage.unwrap_or(StorageClass::NONE), true)
        }
    }

    fn skip_qualifiers(&mut self) {
        while matches!(self.cursor.current(), Token::Const | Token::Volatile) {
            self.cursor.advance();
        }
    }

    /// Parses the base-type specifier sequence per the table in §4.3.
    /// `default_allowed` mirrors the original's "default -1 forbids
    /// defaulting" convention; when `false` and nothing recognizable is
    /// seen, reports `TYPE_EXPECTED` and synthesizes `int`.
    fn parse_type_spec(&mut self, default_allowed: bool) -> (TypeBuf, bool) {
        self.skip_qualifiers();

        let mut signed = false;
        let mut unsigned = false;
        while matches!(self.cursor.current(), Token::Signed | Token::Unsigned) {
            if *self.cursor.current() == Token::Signed {
                signed = true;
            } else {
                unsigned = true;
            }
            self.cursor.advance();
            self.skip_qualifiers();
        }

        if *self.cursor.current() == Token::Char {
            self.cursor.advance();
            let ty = if unsigned {
                TypeBuf::char_unsigned()
            } else if signed || self.options.default_char_signed {
                TypeBuf::char_signed()
            } else {
                TypeBuf::char_unsigned()
            };
            return (ty, false);
        }

        let mut saw_short = false;
        let mut saw_long = false;
        let mut saw_int = false;
        loop {
            match self.cursor.current() {
                Token::Short => saw_short = true,
                Token::Long => saw_long = true,
                Token::Int => saw_int = true,
                _ => break,
            }
            self.cursor.advance();
            self.skip_qualifiers();
        }

        if signed || unsigned || saw_short || saw_long || saw_int {
            let ty = if saw_short {
                if unsigned {
                    TypeBuf::ushort()
                } else {
                    TypeBuf::short()
                }
            } else if saw_long {
                if unsigned {
                    TypeBuf::ulong()
                } else {
                    TypeBuf::long()
                }
            } else if unsigned {
                TypeBuf::uint()
            } else {
                TypeBuf::int()
            };
            return (ty, false);
        }

        match self.cursor.current().clone() {
            Token::Void => {
                self.cursor.advance();
                (TypeBuf::void(), false)
            }
            Token::Struct => {
                self.cursor.advance();
                (self.parse_struct_or_union(false), false)
            }
            Token::Union => {
                self.cursor.advance();
                (self.parse_struct_or_union(true), false)
            }
            Token::Enum => {
                self.cursor.advance();
                self.parse_enum_decl();
                (TypeBuf::int(), false)
            }
            Token::Ident(name) if self.syms.is_type_def(&name) => {
                self.cursor.advance();
                let sym = self.syms.find_sym(&name).expect("checked by is_type_def");
                (TypeBuf::type_copy(&sym.ty), false)
            }
            _ => {
                if default_allowed {
                    (TypeBuf::int(), true)
                } else {
                    self.diags.report(FrontendError::TypeExpected, self.cursor.span());
                    (TypeBuf::int(), false)
                }
            }
        }
    }

    /// Full `DeclSpec` parse: storage class, then base type, combining the
    /// two `DEF_*` flags per §3.
    pub fn parse_decl_spec(&mut self, default_storage: Option<StorageClass>) -> DeclSpec {
        let (storage_class, def_storage) = self.parse_storage_class(default_storage);
        let (base_type, def_type) = self.parse_type_spec(default_storage.is_some());

        let mut flags = DeclFlags::NONE;
        if def_storage {
            flags.insert(DeclFlags::DEF_STORAGE);
        }
        if def_type {
            flags.insert(DeclFlags::DEF_TYPE);
        }

        let spec = DeclSpec {
            storage_class,
            base_type,
            flags,
        };
        log::debug!("parse_decl_spec: completed {spec:?}");
        spec
    }
}
