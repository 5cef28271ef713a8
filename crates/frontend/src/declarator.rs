//! Declarator parsing: the recursive suffix grammar that wraps a base type
//! with pointer/array/function constructors and binds an identifier.
//!
//! Type codes end up outermost-first in the sealed buffer even though the
//! grammar is consumed left-to-right, because `*`/`fastcall` append to the
//! builder only *after* their recursive call returns, and a parenthesized
//! group falls through into the suffix loop instead of returning — see the
//! worked trace in the module tests.

use c65_types::{DeclSpec, Declaration, FuncFlags, StorageClass, TypeBuf, TypeBuilder};

use crate::emit::DataEmitter;
use crate::error::FrontendError;
use crate::exprs::ConstExprEvaluator;
use crate::func::FuncDesc;
use crate::lexer::Token;
use crate::literal_pool::LiteralPool;
use crate::symtab::{SymTab, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Identifier required (top-level variable/function declarator).
    NeedIdent,
    /// Identifier forbidden (abstract declarator: casts, `sizeof` operand).
    NoIdent,
    /// Identifier optional (function parameters).
    AcceptIdent,
}

impl<E, D, L> super::driver::Parser<E, D, L>
where
    E: ConstExprEvaluator,
    D: DataEmitter,
    L: LiteralPool,
{
    pub fn parse_declarator(&mut self, spec: &DeclSpec, mode: Mode) -> Declaration {
        log::trace!("parse_declarator: entering, mode={mode:?}");
        let mut builder = TypeBuilder::new();
        let ident = self.decl(&mut builder, mode);
        let ty = builder.seal(&spec.base_type);

        if !ty.is_func() {
            if let Some(size) = ty.size_of(&self.tags) {
                if size >= 65536 {
                    self.diags.report(FrontendError::IllegalSize, self.cursor.span());
                }
            }
        }

        let decl = Declaration { ident, ty };
        log::debug!(
            "parse_declarator: completed {} : {}",
            decl.ident.as_deref().unwrap_or("<anonymous>"),
            decl.ty
        );
        decl
    }

    fn decl(&mut self, b: &mut TypeBuilder, mode: Mode) -> Option<String> {
        log::trace!("decl: entering at {:?}", self.cursor.current());
        let ident = self.decl_inner(b, mode);
        log::trace!("decl: exiting, ident={ident:?}");
        ident
    }

    fn decl_inner(&mut self, b: &mut TypeBuilder, mode: Mode) -> Option<String> {
        match self.cursor.current() {
            Token::Star => {
                self.cursor.advance();
                while matches!(self.cursor.current(), Token::Const | Token::Volatile) {
                    // Qualifiers on the pointee are accepted and discarded.
                    self.cursor.advance();
                }
                let ident = self.decl(b, mode);
                b.push_ptr();
                ident
            }
            Token::Fastcall => {
                self.cursor.advance();
                let ident = self.decl(b, mode);
                match b.last_func_id() {
                    Some(id) => self.funcs.get_mut(id).flags.insert(FuncFlags::FASTCALL),
                    None => {
                        self.diags.report(FrontendError::IllegalModifier, self.cursor.span());
                    }
                }
                ident
            }
            Token::LParen => {
                self.cursor.advance();
                let ident = self.decl(b, mode);
                if *self.cursor.current() == Token::RParen {
                    self.cursor.advance();
                }
                self.parse_suffixes(b);
                ident
            }
            _ => {
                let ident = match (self.cursor.current().clone(), mode) {
                    (Token::Ident(name), Mode::NeedIdent | Mode::AcceptIdent) => {
                        self.cursor.advance();
                        Some(name)
                    }
                    (Token::Ident(_), Mode::NoIdent) => None,
                    (_, Mode::NeedIdent) => {
                        self.diags.report(FrontendError::IdentExpected, self.cursor.span());
                        self.cursor.skip_to_separator();
                        None
                    }
                    _ => None,
                };
                self.parse_suffixes(b);
                ident
            }
        }
    }

    fn parse_suffixes(&mut self, b: &mut TypeBuilder) {
        loop {
            match self.cursor.current() {
                Token::LParen => {
                    self.cursor.advance();
                    let desc = self.parse_param_list();
                    let id = self.funcs.insert(desc);
                    b.push_func(id);
                }
                Token::LBracket => {
                    self.cursor.advance();
                    let dim = if *self.cursor.current() != Token::RBracket {
                        self.evaluator.constexpr(&mut self.cursor, &self.syms).const_val as u32
                    } else {
                        0
                    };
                    if *self.cursor.current() == Token::RBracket {
                        self.cursor.advance();
                    }
                    b.push_array(dim);
                }
                _ => break,
            }
        }
    }

    /// Parses `(` already consumed `...)`, producing a function descriptor.
    fn parse_param_list(&mut self) -> FuncDesc {
        let mut desc = FuncDesc::new();

        if *self.cursor.current() == Token::RParen {
            self.cursor.advance();
            desc.flags.insert(FuncFlags::EMPTY);
            desc.flags.insert(FuncFlags::ELLIPSIS);
            return desc;
        }

        if *self.cursor.current() == Token::Void && *self.cursor.peek() == Token::RParen {
            self.cursor.advance();
            self.cursor.advance();
            desc.flags.insert(FuncFlags::VOID_PARAM);
            return desc;
        }

        // §4.2: parameters are captured in a real function-level scope on
        // the shared symbol table, not a disconnected table, so
        // `remember-function-level` actually hands the parser's own scope
        // off to the descriptor rather than simulating one.
        self.syms.enter_function_level();
        let mut anon_counter = 0u32;

        loop {
            if *self.cursor.current() == Token::Ellipsis {
                self.cursor.advance();
                desc.flags.insert(FuncFlags::ELLIPSIS);
                break;
            }

            let storage = match self.cursor.current() {
                Token::Auto => {
                    self.cursor.advance();
                    StorageClass::AUTO
                }
                Token::Register => {
                    self.cursor.advance();
                    StorageClass::REGISTER
                }
                Token::Static | Token::Extern | Token::Typedef => {
                    self.diags
                        .report(FrontendError::IllegalStorageClass, self.cursor.span());
                    self.cursor.advance();
                    StorageClass::AUTO
                }
                _ => StorageClass::AUTO,
            };

            let spec = self.parse_decl_spec(Some(storage));
            let param = self.parse_declarator(&spec, Mode::AcceptIdent);
            let ty = if param.ty.is_array() {
                // Array parameters decay to pointer to element type.
                let element = param_array_element(&param.ty);
                let mut pb = TypeBuilder::new();
                pb.push_ptr();
                pb.seal(&element)
            } else {
                param.ty
            };

            let ident = param.ident.unwrap_or_else(|| {
                anon_counter += 1;
                format!("__param{anon_counter}")
            });

            let flags = StorageClass::AUTO | StorageClass::PARAM | StorageClass::DEF;
            self.syms.add_local_sym(Symbol {
                ident,
                ty,
                storage: flags,
                offset: 0,
            });
            desc.param_count += 1;

            if *self.cursor.current() == Token::Comma {
                self.cursor.advance();
            } else {
                break;
            }
        }

        if *self.cursor.current() == Token::RParen {
            self.cursor.advance();
        }

        if self.options.ansi
            && anon_counter > 0
            && *self.cursor.current() == Token::LCurly
        {
            self.diags
                .report(FrontendError::MissingParamName, self.cursor.span());
        }

        // `remember-function-level`: leaving the scope hands back the
        // captured parameters in declaration order.
        let mut captured = self.syms.leave_function_level();
        assign_param_offsets(&mut captured, desc.is_variadic(), &self.tags);
        desc.param_byte_size = captured
            .iter()
            .map(|s| s.ty.size_of(&self.tags).unwrap_or(0))
            .sum();
        let mut params = SymTab::new();
        for sym in captured {
            params.add_local_sym(sym);
        }
        desc.params = params;
        desc
    }
}

/// `tail()` already strips the leading `Array` code and its dimension;
/// re-own it as a standalone `TypeBuf` for the pointer-to-element type.
fn param_array_element(ty: &TypeBuf) -> TypeBuf {
    TypeBuf::from_terminated_bytes(ty.tail().to_vec())
}

/// Assigns each captured parameter an offset from the frame, walking the
/// list tail-to-head (last-declared first) so the last-declared parameter
/// gets the lowest offset, matching the target's calling convention.
/// Variadic calls reserve the first byte for the pushed-argument-count.
/// `params` is left in its original declaration order; only the `offset`
/// fields change.
fn assign_param_offsets(params: &mut [Symbol], variadic: bool, tags: &dyn c65_types::TagSizeResolver) {
    let mut offset = if variadic { 1 } else { 0 };
    for sym in params.iter_mut().rev() {
        sym.offset = offset;
        offset += sym.ty.size_of(tags).unwrap_or(0);
    }
}
