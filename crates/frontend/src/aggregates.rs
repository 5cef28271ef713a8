//! Enum and struct/union body processors.

use c65_types::{StorageClass, TagId, TypeBuf};

use crate::emit::DataEmitter;
use crate::error::FrontendError;
use crate::exprs::ConstExprEvaluator;
use crate::lexer::Token;
use crate::literal_pool::LiteralPool;
use crate::symtab::Symbol;
use crate::tag::TagEntry;

impl<E, D, L> super::driver::Parser<E, D, L>
where
    E: ConstExprEvaluator,
    D: DataEmitter,
    L: LiteralPool,
{
    /// `enum [tag] { ident [= const-expr], ... }` — a forward reference
    /// (no `{`) is accepted silently, matching the loose original; an
    /// empty body `{}` is accepted with no constants added.
    pub(crate) fn parse_enum_decl(&mut self) {
        log::trace!("parse_enum_decl: entering");
        if let Token::Ident(_) = self.cursor.current() {
            self.cursor.advance();
        }

        if *self.cursor.current() != Token::LCurly {
            log::trace!("parse_enum_decl: exiting, forward reference only");
            return;
        }
        self.cursor.advance();

        let mut value = 0i64;
        while *self.cursor.current() != Token::RCurly {
            let ident = match self.cursor.current().clone() {
                Token::Ident(name) => {
                    self.cursor.advance();
                    Some(name)
                }
                _ => {
                    self.diags.report(FrontendError::IdentExpected, self.cursor.span());
                    self.cursor.skip_to_separator();
                    None
                }
            };

            if *self.cursor.current() == Token::Assign {
                self.cursor.advance();
                let v = self.evaluator.constexpr(&mut self.cursor, &self.syms);
                value = v.const_val;
            }

            if let Some(ident) = ident {
                self.syms.add_enum_sym(&ident, value);
            }
            value += 1;

            if *self.cursor.current() == Token::Comma {
                self.cursor.advance();
            } else {
                break;
            }
        }

        if *self.cursor.current() == Token::RCurly {
            self.cursor.advance();
        }
        log::trace!("parse_enum_decl: exiting, next value would be {value}");
    }

    /// `struct|union [tag] [{ member-decl* }]`, returning the type buffer
    /// wrapping the resolved (possibly still incomplete) tag.
    pub(crate) fn parse_struct_or_union(&mut self, is_union: bool) -> TypeBuf {
        log::trace!("parse_struct_or_union: entering, is_union={is_union}");
        let tag_name = match self.cursor.current().clone() {
            Token::Ident(name) => {
                self.cursor.advance();
                Some(name)
            }
            _ => None,
        };

        if *self.cursor.current() != Token::LCurly {
            let id = self.find_or_forward_declare(tag_name.as_deref());
            log::trace!("parse_struct_or_union: exiting, forward reference to {id:?}");
            return if is_union {
                TypeBuf::union_tag(id)
            } else {
                TypeBuf::struct_tag(id)
            };
        }

        let id = self.find_or_forward_declare(tag_name.as_deref());

        self.cursor.advance(); // `{`
        self.syms.enter_struct_level();

        let mut size = 0u32;
        while *self.cursor.current() != Token::RCurly && *self.cursor.current() != Token::Eof {
            let spec = self.parse_decl_spec(Some(StorageClass::NONE));
            loop {
                let decl = self.parse_declarator(&spec, crate::declarator::Mode::NeedIdent);
                let field_size = decl.ty.size_of(&self.tags).unwrap_or(0);
                let offset = if is_union {
                    size = size.max(field_size);
                    0
                } else {
                    let off = size;
                    size += field_size;
                    off
                };
                if let Some(sym) = Symbol::from_declaration(&decl, StorageClass::SFLD, offset) {
                    self.syms.add_local_sym(sym);
                }
                if *self.cursor.current() == Token::Comma {
                    self.cursor.advance();
                } else {
                    break;
                }
            }
            if *self.cursor.current() == Token::Semi {
                self.cursor.advance();
            }
        }

        if *self.cursor.current() == Token::RCurly {
            self.cursor.advance();
        }

        let fields = self.syms.leave_struct_level();
        self.tags.get_mut(id).complete(size, fields);
        log::debug!("parse_struct_or_union: completed tag {id:?}, size={size}");
        log::trace!("parse_struct_or_union: exiting");

        if is_union {
            TypeBuf::union_tag(id)
        } else {
            TypeBuf::struct_tag(id)
        }
    }

    fn find_or_forward_declare(&mut self, tag_name: Option<&str>) -> TagId {
        if let Some(name) = tag_name {
            if let Some(id) = self.syms.find_struct_sym(name) {
                return id;
            }
            let id = self.tags.insert(TagEntry::incomplete(Some(name.to_string())));
            self.syms.add_struct_sym(name, id);
            id
        } else {
            self.tags.insert(TagEntry::incomplete(None))
        }
    }
}
