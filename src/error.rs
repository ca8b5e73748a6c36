use crate::ast::Span;

/// Errors reported while reading.
///
/// End of input is not an error: the lexer signals it by returning
/// `Ok(None)` and the parser by completing its program sequence. The
/// lexical variants are recoverable in the sense that no partial token
/// is emitted; [`ReadError::Structure`] is fatal to the current read.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// The input ended inside a token: an unterminated string, or `#\`
    /// with nothing following.
    #[error("unexpected end of input at {span:?}")]
    UnexpectedEof { span: Span },

    /// A `.` that starts neither a number, the `...` identifier, nor a
    /// delimited dot token.
    #[error("invalid dot token at {span:?}")]
    InvalidDot { span: Span },

    /// A `#` followed by none of `(`, `t`, `f`, `\`, or a number
    /// prefix character.
    #[error("invalid hash prefixed token at {span:?}")]
    InvalidHash { span: Span },

    /// An identifier with a character outside the initial or
    /// subsequent classes.
    #[error("invalid identifier at {span:?}")]
    InvalidIdent { span: Span },

    /// A candidate numeric token that matches the `<number>` grammar
    /// for no radix.
    #[error("invalid number at {span:?}")]
    InvalidNumber { span: Span },

    /// A `#\` character name other than `space` or `newline`.
    #[error("unknown character name at {span:?}")]
    UnknownCharName { span: Span },

    /// Malformed datum structure: misplaced dots or parentheses, or a
    /// token vector that ends inside a compound datum.
    #[error("malformed structure at {span:?}: {message}")]
    Structure { span: Span, message: String },
}

impl ReadError {
    /// Helper for constructing a structural error.
    #[must_use]
    pub fn structure(span: Span, message: impl Into<String>) -> Self {
        ReadError::Structure {
            span,
            message: message.into(),
        }
    }
}
