use std::io;
use std::path::PathBuf;

use proc_macro2::Span;
use thiserror::Error;

/// Why an attribute argument list could not be turned into fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedSpecKind {
    #[error("{message}")]
    Syntax { message: String },

    #[error("field name `{name}` is not followed by a type")]
    DanglingName { name: String },

    #[error("field name `{second}` follows field name `{first}` without a type in between")]
    ConsecutiveNames { first: String, second: String },

    #[error("option `{option}` separates field name `{name}` from its type")]
    OptionInsidePair { name: String, option: String },

    #[error("field `{name}` is declared more than once")]
    DuplicateField { name: String },

    #[error("`{name}` is not a valid field name")]
    InvalidName { name: String },

    #[error("field name `{name}` collides with a generated member")]
    ReservedName { name: String },

    #[error("a wrapper may combine at most {max} fields, found {count}")]
    TooManyFields { count: usize, max: usize },

    #[error("option `{option}` expects {expected}")]
    InvalidOptionValue {
        option: String,
        expected: &'static str,
    },
}

/// A malformed `#[wrapper_value_object(..)]` argument list.
#[derive(Debug, Clone, Error)]
#[error("malformed wrapper_value_object arguments: {kind}")]
pub struct MalformedSpecError {
    kind: MalformedSpecKind,
    span: Span,
}

impl MalformedSpecError {
    pub fn new(kind: MalformedSpecKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn kind(&self) -> &MalformedSpecKind {
        &self.kind
    }

    /// Span of the offending argument.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn to_syn_error(&self) -> syn::Error {
        syn::Error::new(self.span, self.to_string())
    }
}

impl From<syn::Error> for MalformedSpecError {
    fn from(err: syn::Error) -> Self {
        Self::new(
            MalformedSpecKind::Syntax {
                message: err.to_string(),
            },
            err.span(),
        )
    }
}

/// Errors raised by the batch host.
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("failed to access `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },

    #[error("generation was cancelled")]
    Cancelled,
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
