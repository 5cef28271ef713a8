//! `Declaration`: the fully-typed result of parsing a declarator.

use crate::encoding::TypeBuf;

/// An identifier bound to a type, the declarator parser's output. `ident`
/// is `None` for abstract declarators (casts, `sizeof` type names, unnamed
/// function parameters before a name is synthesized for them).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub ident: Option<String>,
    pub ty: TypeBuf,
}

impl Declaration {
    pub fn new() -> Self {
        Declaration {
            ident: None,
            ty: TypeBuf::end(),
        }
    }

    pub fn named(ident: impl Into<String>, ty: TypeBuf) -> Self {
        Declaration {
            ident: Some(ident.into()),
            ty,
        }
    }
}

impl Default for Declaration {
    fn default() -> Self {
        Self::new()
    }
}
