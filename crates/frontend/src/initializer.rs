//! Type-directed initializer processing.

use c65_types::{TypeBuf, TypeElem};

use crate::emit::DataEmitter;
use crate::error::FrontendError;
use crate::exprs::{assign_adjust, ConstExprEvaluator};
use crate::lexer::Token;
use crate::literal_pool::LiteralPool;

impl<E, D, L> super::driver::Parser<E, D, L>
where
    E: ConstExprEvaluator,
    D: DataEmitter,
    L: LiteralPool,
{
    /// `parse-init`: dispatches on the leading type code and drives the
    /// data-emission interface. `ty` may have its array dimension
    /// back-patched in place by this call (incomplete array sized from the
    /// initializer).
    pub fn parse_initializer(&mut self, ty: &TypeBuf) -> TypeBuf {
        match ty.elements().next().expect("type buffer is never empty") {
            TypeElem::Char | TypeElem::UChar => {
                self.emit_scalar(ty, 1);
                ty.clone()
            }
            TypeElem::Short | TypeElem::UShort | TypeElem::Int | TypeElem::UInt | TypeElem::Ptr => {
                self.emit_scalar(ty, 2);
                ty.clone()
            }
            TypeElem::Long | TypeElem::ULong => {
                self.emit_scalar(ty, 4);
                ty.clone()
            }
            TypeElem::Array(dim) => self.parse_array_init(ty, dim),
            TypeElem::Struct(id) | TypeElem::Union(id) => self.parse_aggregate_init(ty, id),
            TypeElem::Void => self.parse_void_init(ty),
            _ => {
                self.diags.report(FrontendError::IllegalType, self.cursor.span());
                ty.clone()
            }
        }
    }

    fn emit_scalar(&mut self, ty: &TypeBuf, width: u8) {
        let mut value = self.evaluator.constexpr(&mut self.cursor, &self.syms);
        assign_adjust(ty, &mut value, &self.tags);
        self.emitter.define_data_from_constant(&value, width);
    }

    fn parse_array_init(&mut self, ty: &TypeBuf, dim: u32) -> TypeBuf {
        let element = TypeBuf::from_terminated_bytes(ty.tail().to_vec());
        let elem_size = element.size_of(&self.tags).unwrap_or(0);
        let is_char_array = matches!(
            element.elements().next(),
            Some(TypeElem::Char) | Some(TypeElem::UChar)
        );

        if is_char_array {
            if let Token::StrLit(s) = self.cursor.current().clone() {
                self.cursor.advance();
                let handle = self.literals.intern(&s);
                self.literals.translate_literal_pool(handle);
                let bytes = self.literals.get_literal(handle).to_vec();
                self.emitter.emit_bytes(&bytes);
                let final_dim = if dim == 0 { bytes.len() as u32 } else { dim };
                if dim != 0 && (bytes.len() as u32) < dim {
                    self.emitter.emit_zero_bytes((dim - bytes.len() as u32) * elem_size);
                } else if dim != 0 && (bytes.len() as u32) > dim {
                    self.diags
                        .report(FrontendError::TooManyInitializers, self.cursor.span());
                }
                self.literals.reset_literal_offs(handle);
                return rebuild_array(final_dim, &element);
            }
        }

        if *self.cursor.current() != Token::LCurly {
            self.diags.report(FrontendError::IllegalType, self.cursor.span());
            return ty.clone();
        }
        self.cursor.advance();

        let mut count = 0u32;
        while *self.cursor.current() != Token::RCurly && *self.cursor.current() != Token::Eof {
            self.parse_initializer(&element);
            count += 1;
            if *self.cursor.current() == Token::Comma {
                self.cursor.advance();
            } else {
                break;
            }
        }
        if *self.cursor.current() == Token::RCurly {
            self.cursor.advance();
        }

        let final_dim = if dim == 0 {
            count
        } else {
            if count < dim {
                self.emitter.emit_zero_bytes((dim - count) * elem_size);
            } else if count > dim {
                self.diags
                    .report(FrontendError::TooManyInitializers, self.cursor.span());
            }
            dim
        };
        rebuild_array(final_dim, &element)
    }

    fn parse_aggregate_init(&mut self, ty: &TypeBuf, id: c65_types::TagId) -> TypeBuf {
        if !self.tags.get(id).is_complete() {
            self.diags
                .report(FrontendError::InitIncompleteType, self.cursor.span());
            return ty.clone();
        }

        if *self.cursor.current() != Token::LCurly {
            self.diags.report(FrontendError::IllegalType, self.cursor.span());
            return ty.clone();
        }
        self.cursor.advance();

        let fields = self.tags.get(id).fields.clone().unwrap_or_default();
        let mut it = fields.iter();
        for field in it.by_ref() {
            if *self.cursor.current() == Token::RCurly {
                break;
            }
            self.parse_initializer(&field.ty);
            if *self.cursor.current() == Token::Comma {
                self.cursor.advance();
            } else {
                break;
            }
        }
        for field in it {
            let size = field.ty.size_of(&self.tags).unwrap_or(0);
            self.emitter.emit_zero_bytes(size);
        }

        if *self.cursor.current() == Token::RCurly {
            self.cursor.advance();
        }
        ty.clone()
    }

    /// Non-ANSI void-initializer extension: an arbitrary comma-separated
    /// list of constant expressions, each emitted per its own type.
    fn parse_void_init(&mut self, ty: &TypeBuf) -> TypeBuf {
        if self.options.ansi {
            self.diags.report(FrontendError::IllegalType, self.cursor.span());
            return ty.clone();
        }
        if *self.cursor.current() != Token::LCurly {
            self.diags.report(FrontendError::IllegalType, self.cursor.span());
            return ty.clone();
        }
        self.cursor.advance();

        while *self.cursor.current() != Token::RCurly && *self.cursor.current() != Token::Eof {
            let value = self.evaluator.constexpr(&mut self.cursor, &self.syms);
            let width = value.ty.size_of(&self.tags).unwrap_or(2).clamp(1, 4) as u8;
            self.emitter.define_data_from_constant(&value, width);
            if *self.cursor.current() == Token::Comma {
                self.cursor.advance();
            } else {
                break;
            }
        }
        if *self.cursor.current() == Token::RCurly {
            self.cursor.advance();
        }
        ty.clone()
    }
}

fn rebuild_array(dim: u32, element: &TypeBuf) -> TypeBuf {
    let mut b = c65_types::TypeBuilder::new();
    b.push_array(dim);
    b.seal(element)
}
