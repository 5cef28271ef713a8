//! Diagnostics.
//!
//! Errors here are *reported*, never raised: parsing keeps going in a
//! best-effort recovery mode after pushing a [`FrontendError`] onto a
//! [`Diagnostics`] collector, mirroring the original compiler's `Error()`
//! call which prints and returns rather than longjmp'ing out.

use c65_types::Span;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrontendError {
    #[error("identifier expected")]
    IdentExpected,
    #[error("type expected")]
    TypeExpected,
    #[error("illegal storage class")]
    IllegalStorageClass,
    #[error("illegal modifier")]
    IllegalModifier,
    #[error("illegal size of data type")]
    IllegalSize,
    #[error("illegal type")]
    IllegalType,
    #[error("missing parameter name")]
    MissingParamName,
    #[error("initialization of incomplete type")]
    InitIncompleteType,
    #[error("too many initializers")]
    TooManyInitializers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub error: FrontendError,
    pub span: Span,
}

/// Accumulates diagnostics during a parse instead of unwinding on the first
/// one. The enclosing driver decides whether accumulated errors suppress
/// code generation; this collector never itself aborts anything.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: FrontendError, span: Span) {
        log::error!("{} at {:?}", error, span);
        self.errors.push(Diagnostic { error, span });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<Diagnostic> {
        self.errors
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }
}
