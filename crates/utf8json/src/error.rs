use thiserror::Error;

use crate::number::NumberKind;

/// Errors raised while reading, unescaping or converting values.
///
/// Neither variant is recoverable at the point it is raised: there is no
/// resynchronization, the caller abandons the current parse or conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input is not well-formed JSON (or not a well-formed literal).
    #[error("{source} at byte {offset}")]
    InvalidFormat {
        /// What was wrong.
        source: SyntaxError,
        /// Byte offset in the view being parsed.
        offset: usize,
    },
    /// A [`NumericValue`](crate::NumericValue) was asked for a type outside
    /// the family of the value it holds.
    #[error("cannot convert a {from} value to {to}")]
    InvalidConversion {
        /// Kind of the stored value.
        from: NumberKind,
        /// Kind that was requested.
        to: NumberKind,
    },
}

impl Error {
    pub(crate) fn format(source: SyntaxError, offset: usize) -> Self {
        Self::InvalidFormat { source, offset }
    }
}

/// The specific cause of an [`Error::InvalidFormat`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// A byte that cannot start or continue the expected token.
    #[error("unexpected byte 0x{0:02X}")]
    UnexpectedByte(u8),
    /// The input ended in the middle of a token.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// A string literal without a closing quote.
    #[error("unterminated string")]
    UnterminatedString,
    /// A property name did not start with a quote.
    #[error("expected '\"'")]
    ExpectedQuote,
    /// A property name was not followed by a colon.
    #[error("expected ':' after property name")]
    ExpectedColon,
    /// A word starting with `t`, `f` or `n` that is not `true`, `false` or `null`.
    #[error("invalid literal")]
    InvalidLiteral,
    /// A number literal with stray bytes or out of range.
    #[error("invalid number")]
    InvalidNumber,
    /// `}` or `]` with nothing open.
    #[error("closing delimiter without a matching opening one")]
    UnbalancedClose,
    /// `}` closing an array or `]` closing an object.
    #[error("closing delimiter does not match the open container")]
    MismatchedClose,
    /// An unknown escape sequence, or a backslash at the end of input.
    #[error("invalid escape character '\\{}'", char::from(*.0))]
    InvalidEscape(u8),
    /// A non-hex byte inside `\u`/`\U`.
    #[error("invalid hex digit 0x{0:02X} in unicode escape")]
    InvalidHexDigit(u8),
    /// A UTF-16 surrogate escape without its other half.
    #[error("unpaired surrogate \\u{0:04X}")]
    UnpairedSurrogate(u32),
    /// A `\U` escape beyond U+10FFFF.
    #[error("invalid unicode scalar value 0x{0:X}")]
    InvalidScalar(u32),
    /// Unescaped bytes are not valid UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,
}
