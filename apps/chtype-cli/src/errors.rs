//! Errors raised while reading column type declarations.

use std::ops::Range;
use thiserror::Error;

/// The category a [`TypeParseError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: unterminated quote or parenthesis, unexpected character.
    Syntax,
    /// A type keyword that is not in the registry.
    UnknownType,
    /// Well-formed input describing an invalid construct.
    Validation,
}

/// Errors that can occur while parsing a column declaration.
///
/// Every variant carries the byte span of the offending input so callers can
/// point at the exact location in the original declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TypeParseError {
    #[error("Syntax error at {}..{}: {message}", span.start, span.end)]
    Syntax { message: String, span: Range<usize> },

    #[error("Unknown data type '{type_name}' at {}..{}", span.start, span.end)]
    UnknownType {
        type_name: String,
        span: Range<usize>,
    },

    #[error("Invalid declaration at {}..{}: {message}", span.start, span.end)]
    Validation { message: String, span: Range<usize> },
}

impl TypeParseError {
    pub(crate) fn syntax(message: impl Into<String>, span: Range<usize>) -> Self {
        TypeParseError::Syntax {
            message: message.into(),
            span,
        }
    }

    pub(crate) fn unknown_type(type_name: impl Into<String>, span: Range<usize>) -> Self {
        TypeParseError::UnknownType {
            type_name: type_name.into(),
            span,
        }
    }

    pub(crate) fn validation(message: impl Into<String>, span: Range<usize>) -> Self {
        TypeParseError::Validation {
            message: message.into(),
            span,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TypeParseError::Syntax { .. } => ErrorKind::Syntax,
            TypeParseError::UnknownType { .. } => ErrorKind::UnknownType,
            TypeParseError::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// Byte range of the input the error refers to.
    pub fn span(&self) -> Range<usize> {
        match self {
            TypeParseError::Syntax { span, .. }
            | TypeParseError::UnknownType { span, .. }
            | TypeParseError::Validation { span, .. } => span.clone(),
        }
    }

    /// Returns the offending slice of `input`, clamped to its bounds.
    pub fn snippet<'a>(&self, input: &'a str) -> &'a str {
        let span = self.span();
        let end = span.end.min(input.len());
        let start = span.start.min(end);
        input.get(start..end).unwrap_or_default()
    }
}
