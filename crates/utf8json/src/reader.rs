//! Pull tokenizer over a [`ByteView`].
//!
//! Every object member is announced by a [`TokenType::PropertyName`] token
//! and every array element by a [`TokenType::Value`] token, including members
//! and elements that are themselves containers: for those,
//! [`JsonReader::get_value`] returns an empty view and the container's own
//! [`TokenType::ObjectStart`]/[`TokenType::ArrayStart`] follows on the next
//! [`read`](JsonReader::read).
//!
//! After a `,` that follows a closing `}` or `]`, the kind of the next
//! token is inferred from two nesting counters instead of a stack of open
//! containers. This matches the inputs the reader was built for (objects in
//! arrays in objects and so on) but can misclassify some irregular
//! interleavings. The kinds of the open containers are still tracked, but
//! only to reject a `}` that closes an array or a `]` that closes an object.

use alloc::vec::Vec;

use bstr::ByteSlice;

use crate::{
    error::{Error, SyntaxError},
    literal::Literal,
    view::ByteView,
};

/// The token a [`JsonReader`] is positioned on.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenType {
    /// Before the first token and after the last one.
    #[default]
    None,
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// An object member; read it with [`JsonReader::get_property_name`].
    PropertyName,
    /// A scalar or a nested container; read it with [`JsonReader::get_value`].
    Value,
}

/// Classification of the value under the cursor, from its first byte.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ValueType {
    Object,
    Array,
    Number,
    String,
    True,
    False,
    Null,
}

impl ValueType {
    const fn classify(byte: u8) -> Option<Self> {
        Some(match byte {
            b'{' => Self::Object,
            b'[' => Self::Array,
            b'"' => Self::String,
            b't' => Self::True,
            b'f' => Self::False,
            b'n' => Self::Null,
            b'-' | b'0'..=b'9' => Self::Number,
            _ => return None,
        })
    }

    const fn literal(self) -> Option<Literal> {
        match self {
            Self::True => Some(Literal::True),
            Self::False => Some(Literal::False),
            Self::Null => Some(Literal::Null),
            _ => None,
        }
    }
}

const fn is_json_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

const fn is_word_break(byte: u8) -> bool {
    is_json_whitespace(byte) || matches!(byte, b'{' | b'}' | b'[' | b']' | b',' | b':' | b'"')
}

/// A forward-only JSON tokenizer that hands out slices of its input.
///
/// Keys and scalar values are returned as raw [`ByteView`]s into the source
/// (strings without their quotes and still escaped, numbers and literals as
/// written); nothing is copied. Use [`unescape`](crate::unescape) and
/// [`parse_number`](crate::parse_number) to interpret them.
///
/// A token that carries text ([`TokenType::PropertyName`] or
/// [`TokenType::Value`]) does not have to be consumed; the next
/// [`read`](Self::read) skips it.
///
/// ```rust
/// use utf8json::{JsonReader, TokenType};
///
/// let mut reader = JsonReader::new(r#"[1, {"a": true}]"#);
/// let mut tokens = Vec::new();
/// while reader.read().unwrap() {
///     tokens.push(reader.token_type());
/// }
/// assert_eq!(
///     tokens,
///     [
///         TokenType::ArrayStart,
///         TokenType::Value,
///         TokenType::Value,
///         TokenType::ObjectStart,
///         TokenType::PropertyName,
///         TokenType::Value,
///         TokenType::ObjectEnd,
///         TokenType::ArrayEnd,
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct JsonReader<'a> {
    source: ByteView<'a>,
    index: usize,
    token: TokenType,
    object_depth: usize,
    array_depth: usize,
    starts_with_object: bool,
    /// Kinds of the open containers, innermost last (`true` for objects).
    /// Only used to reject mismatched closes.
    open: Vec<bool>,
    /// The current token's text starts at `index` and was not consumed.
    pending: bool,
    /// A complete value (or container) ends right before `index`.
    after_value: bool,
    /// The current `Value` token is an object member's value rather than an
    /// array element.
    member_value: bool,
}

impl<'a> JsonReader<'a> {
    /// Creates a reader over `source`, skipping any leading whitespace
    /// (including a byte order mark).
    pub fn new(source: impl Into<ByteView<'a>>) -> Self {
        let source = source.into();
        let trimmed = source.trim_leading_whitespace();
        Self {
            source,
            index: source.len() - trimmed.len(),
            token: TokenType::None,
            object_depth: 0,
            array_depth: 0,
            starts_with_object: trimmed.get(0) == Some(b'{'),
            open: Vec::new(),
            pending: false,
            after_value: false,
            member_value: false,
        }
    }

    /// The token the reader is positioned on.
    #[must_use]
    pub fn token_type(&self) -> TokenType {
        self.token
    }

    /// Byte offset of the cursor in the source view.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    /// Advances to the next token.
    ///
    /// Returns `Ok(false)` once only whitespace remains.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] when the next byte cannot start a
    /// token in the current state, when a `}`/`]` has nothing to close or
    /// closes the other kind of container, when the input ends inside a
    /// container, or when an unconsumed token being skipped is malformed.
    pub fn read(&mut self) -> Result<bool, Error> {
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(
            self.index <= self.source.len(),
            "Internal error: reader index past the end of the source"
        );
        #[cfg(any(test, feature = "fuzzing"))]
        assert_eq!(
            self.open.len(),
            self.object_depth + self.array_depth,
            "Internal error: container stack out of step with the depth counters"
        );
        if self.pending {
            self.skip_pending()?;
        }
        self.skip_whitespace();
        let Some(byte) = self.peek_byte() else {
            if self.object_depth > 0 || self.array_depth > 0 {
                return Err(self.end());
            }
            self.token = TokenType::None;
            return Ok(false);
        };

        if byte == b',' && self.after_value {
            if self.object_depth == 0 && self.array_depth == 0 {
                return Err(self.unexpected(byte));
            }
            let next = match self.token {
                TokenType::PropertyName => TokenType::PropertyName,
                TokenType::Value if self.member_value => TokenType::PropertyName,
                TokenType::Value => TokenType::Value,
                _ if self.object_depth == self.array_depth => {
                    if self.starts_with_object {
                        TokenType::Value
                    } else {
                        TokenType::PropertyName
                    }
                }
                _ if self.object_depth > self.array_depth => TokenType::PropertyName,
                _ => TokenType::Value,
            };
            self.index += 1;
            self.skip_whitespace();
            return self.begin_member(next);
        }

        match (self.token, byte) {
            (TokenType::ObjectStart, b'}') | (TokenType::ArrayStart, b']') => {}
            (TokenType::ObjectStart, _) => return self.begin_member(TokenType::PropertyName),
            (TokenType::ArrayStart, _) => return self.begin_member(TokenType::Value),
            _ => {}
        }

        match byte {
            b'{' | b'[' if !self.after_value => {
                self.open.push(byte == b'{');
                if byte == b'{' {
                    self.object_depth += 1;
                    self.token = TokenType::ObjectStart;
                } else {
                    self.array_depth += 1;
                    self.token = TokenType::ArrayStart;
                }
                self.index += 1;
            }
            b'}' | b']' => self.close(byte)?,
            _ if self.after_value => return Err(self.unexpected(byte)),
            _ if ValueType::classify(byte).is_some() => {
                self.member_value = self.token == TokenType::PropertyName;
                self.token = TokenType::Value;
                self.pending = true;
            }
            _ => return Err(self.unexpected(byte)),
        }
        Ok(true)
    }

    /// Reads the property name under the cursor and moves past the `:` that
    /// follows it.
    ///
    /// The returned view excludes the quotes and is still escaped. A quote
    /// preceded by an odd run of backslashes belongs to the name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] when the cursor is not on a string,
    /// the string is unterminated, or no `:` follows it.
    pub fn get_property_name(&mut self) -> Result<ByteView<'a>, Error> {
        self.skip_whitespace();
        match self.peek_byte() {
            Some(b'"') => {}
            Some(_) => return Err(Error::format(SyntaxError::ExpectedQuote, self.index)),
            None => return Err(self.end()),
        }
        let name = self.read_string()?;
        self.skip_whitespace();
        match self.peek_byte() {
            Some(b':') => self.index += 1,
            Some(_) => return Err(Error::format(SyntaxError::ExpectedColon, self.index)),
            None => return Err(self.end()),
        }
        self.pending = false;
        self.after_value = false;
        Ok(name)
    }

    /// Classifies the value under the cursor without consuming it.
    ///
    /// On an unconsumed [`TokenType::PropertyName`] the name is skipped
    /// first, so the result describes the member's value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] when no value starts at the cursor.
    pub fn peek_value_type(&mut self) -> Result<ValueType, Error> {
        if self.pending && self.token == TokenType::PropertyName {
            self.get_property_name()?;
        }
        self.skip_whitespace();
        let byte = self.peek_byte().ok_or_else(|| self.end())?;
        ValueType::classify(byte).ok_or_else(|| self.unexpected(byte))
    }

    /// Reads the value under the cursor.
    ///
    /// - Strings come back without their quotes, still escaped.
    /// - Numbers come back exactly as written; `true`, `false` and `null`
    ///   are checked.
    /// - Objects and arrays come back as an empty view and are not
    ///   consumed; their tokens follow on subsequent [`read`](Self::read)
    ///   calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] when no value starts at the cursor,
    /// a string is unterminated, or a keyword is misspelled.
    pub fn get_value(&mut self) -> Result<ByteView<'a>, Error> {
        let value_type = self.peek_value_type()?;
        let value = match value_type {
            ValueType::Object | ValueType::Array => self.source.substring(self.index, 0),
            ValueType::String => {
                let text = self.read_string()?;
                self.after_value = true;
                text
            }
            ValueType::Number | ValueType::True | ValueType::False | ValueType::Null => {
                let start = self.index;
                let word = self.read_word();
                if let Some(expected) = value_type.literal()
                    && Literal::match_bytes(word) != Some(expected)
                {
                    return Err(Error::format(SyntaxError::InvalidLiteral, start));
                }
                self.after_value = true;
                word
            }
        };
        self.pending = false;
        Ok(value)
    }

    fn skip_pending(&mut self) -> Result<(), Error> {
        if self.token == TokenType::PropertyName {
            self.get_property_name()?;
        } else {
            self.get_value()?;
        }
        Ok(())
    }

    /// Enters `token` for the member or element starting at the cursor.
    fn begin_member(&mut self, token: TokenType) -> Result<bool, Error> {
        let byte = self.peek_byte().ok_or_else(|| self.end())?;
        if token == TokenType::PropertyName && byte != b'"' {
            return Err(Error::format(SyntaxError::ExpectedQuote, self.index));
        }
        if ValueType::classify(byte).is_none() {
            return Err(self.unexpected(byte));
        }
        self.token = token;
        self.pending = true;
        self.after_value = false;
        self.member_value = false;
        Ok(true)
    }

    fn close(&mut self, byte: u8) -> Result<(), Error> {
        let is_object = byte == b'}';
        let opened = if is_object {
            TokenType::ObjectStart
        } else {
            TokenType::ArrayStart
        };
        if !self.after_value && self.token != opened {
            return Err(self.unexpected(byte));
        }
        let depth = if is_object {
            &mut self.object_depth
        } else {
            &mut self.array_depth
        };
        *depth = depth
            .checked_sub(1)
            .ok_or(Error::format(SyntaxError::UnbalancedClose, self.index))?;
        if self.open.pop() != Some(is_object) {
            return Err(Error::format(SyntaxError::MismatchedClose, self.index));
        }
        self.token = if is_object {
            TokenType::ObjectEnd
        } else {
            TokenType::ArrayEnd
        };
        self.index += 1;
        self.after_value = true;
        Ok(())
    }

    /// Reads the string whose opening quote is under the cursor.
    fn read_string(&mut self) -> Result<ByteView<'a>, Error> {
        let bytes = self.source.as_bytes();
        let open = self.index;
        let start = open + 1;
        let mut search = start;
        loop {
            let quote = bytes
                .get(search..)
                .and_then(|rest| rest.find_byte(b'"'))
                .map(|offset| search + offset)
                .ok_or(Error::format(SyntaxError::UnterminatedString, open))?;
            let backslashes = bytes[start..quote]
                .iter()
                .rev()
                .take_while(|&&b| b == b'\\')
                .count();
            if backslashes % 2 == 0 {
                self.index = quote + 1;
                return Ok(self.source.substring(start, quote - start));
            }
            search = quote + 1;
        }
    }

    /// Reads up to the next structural byte, whitespace or quote.
    fn read_word(&mut self) -> ByteView<'a> {
        let start = self.index;
        let rest = self.source.substring_from(start);
        let len = rest
            .as_bytes()
            .iter()
            .position(|&b| is_word_break(b))
            .unwrap_or(rest.len());
        self.index += len;
        rest.substring(0, len)
    }

    fn skip_whitespace(&mut self) {
        while self.peek_byte().is_some_and(is_json_whitespace) {
            self.index += 1;
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.source.get(self.index)
    }

    fn unexpected(&self, byte: u8) -> Error {
        Error::format(SyntaxError::UnexpectedByte(byte), self.index)
    }

    fn end(&self) -> Error {
        Error::format(SyntaxError::UnexpectedEnd, self.index)
    }
}
