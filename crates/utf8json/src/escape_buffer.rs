//! Decoding of backslash escapes in JSON string content.
//!
//! [`unescape`] turns the raw bytes between the quotes of a string literal
//! (as returned by [`JsonReader::get_value`](crate::JsonReader::get_value))
//! into the text they denote. Hex digits of `\uXXXX` and `\UXXXXXXXX`
//! escapes are accumulated by a small fixed-width `UnicodeEscapeBuffer`.
//!
//! # Errors
//!
//! - An unknown escape letter, or a backslash as the last byte, is
//!   [`SyntaxError::InvalidEscape`].
//! - A non-hex byte inside a unicode escape is [`SyntaxError::InvalidHexDigit`];
//!   running out of input is [`SyntaxError::UnexpectedEnd`].
//! - A `\u` surrogate without its partner is [`SyntaxError::UnpairedSurrogate`].
//! - A `\U` value above U+10FFFF is [`SyntaxError::InvalidScalar`].
use alloc::{string::String, vec::Vec};

use bstr::ByteSlice;

use crate::{
    error::{Error, SyntaxError},
    utf8::encode_utf8,
    view::{ByteView, Utf8Array},
};

const HIGH_SURROGATES: core::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: core::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

/// Accumulates the hex digits of one unicode escape.
///
/// `\u` escapes carry four digits and `\U` escapes eight; the buffer is
/// created for one of the two widths and yields the code once it is full,
/// after which it starts over.
#[derive(Debug)]
pub(crate) struct UnicodeEscapeBuffer {
    value: u32,
    len: u8,
    width: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new(width: u8) -> Self {
        debug_assert!(width == 4 || width == 8);
        Self {
            value: 0,
            len: 0,
            width,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.value = 0;
        self.len = 0;
    }

    /// Feeds one ASCII hex digit.
    ///
    /// Returns `Ok(None)` until `width` digits were seen, then the decoded
    /// code (not necessarily a valid scalar value).
    pub(crate) fn feed(&mut self, byte: u8) -> Result<Option<u32>, SyntaxError> {
        let digit = char::from(byte)
            .to_digit(16)
            .ok_or(SyntaxError::InvalidHexDigit(byte))?;
        self.value = (self.value << 4) | digit;
        self.len += 1;
        if self.len == self.width {
            let value = self.value;
            self.reset();
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }
}

/// Reads `width` hex digits starting at `start`.
fn read_hex(bytes: &[u8], start: usize, width: u8) -> Result<u32, Error> {
    let mut buffer = UnicodeEscapeBuffer::new(width);
    let mut index = start;
    loop {
        let &byte = bytes
            .get(index)
            .ok_or(Error::format(SyntaxError::UnexpectedEnd, bytes.len()))?;
        match buffer.feed(byte) {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => index += 1,
            Err(source) => return Err(Error::format(source, index)),
        }
    }
}

/// Decodes the `\u`/`\U` escape whose backslash is at `at`.
///
/// Returns the scalar and the index just past the escape (past both halves
/// of a surrogate pair).
fn read_unicode_escape(bytes: &[u8], at: usize) -> Result<(u32, usize), Error> {
    if bytes[at + 1] == b'U' {
        let scalar = read_hex(bytes, at + 2, 8)?;
        if scalar > 0x10_FFFF {
            return Err(Error::format(SyntaxError::InvalidScalar(scalar), at));
        }
        if HIGH_SURROGATES.contains(&scalar) || LOW_SURROGATES.contains(&scalar) {
            return Err(Error::format(SyntaxError::UnpairedSurrogate(scalar), at));
        }
        return Ok((scalar, at + 10));
    }

    let high = read_hex(bytes, at + 2, 4)?;
    let next = at + 6;
    if LOW_SURROGATES.contains(&high) {
        return Err(Error::format(SyntaxError::UnpairedSurrogate(high), at));
    }
    if !HIGH_SURROGATES.contains(&high) {
        return Ok((high, next));
    }

    if bytes.get(next..next + 2) != Some(b"\\u".as_slice()) {
        return Err(Error::format(SyntaxError::UnpairedSurrogate(high), at));
    }
    let low = read_hex(bytes, next + 2, 4)?;
    if !LOW_SURROGATES.contains(&low) {
        return Err(Error::format(SyntaxError::UnpairedSurrogate(high), at));
    }
    let scalar = 0x1_0000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    Ok((scalar, next + 6))
}

/// Resolves backslash escapes in raw string content.
///
/// Bytes other than escapes are copied unchanged, including a bare `"`.
/// Content without any backslash is copied in one go.
///
/// ```rust
/// use utf8json::unescape;
///
/// let text = unescape(r"a\tbα🐈").unwrap();
/// assert_eq!(text, "a\tbα🐈");
/// ```
///
/// # Errors
///
/// See the [module documentation](self) for the malformed escapes reported.
pub fn unescape<'a>(view: impl Into<ByteView<'a>>) -> Result<Utf8Array, Error> {
    let bytes = view.into().as_bytes();
    let Some(first) = bytes.find_byte(b'\\') else {
        return Ok(Utf8Array::from(bytes));
    };

    let mut out = Vec::with_capacity(bytes.len());
    out.extend_from_slice(&bytes[..first]);
    let mut index = first;
    while index < bytes.len() {
        let Some(run) = bytes[index..].find_byte(b'\\') else {
            out.extend_from_slice(&bytes[index..]);
            break;
        };
        out.extend_from_slice(&bytes[index..index + run]);
        index += run;

        let &kind = bytes
            .get(index + 1)
            .ok_or(Error::format(SyntaxError::InvalidEscape(b'\\'), index))?;
        let decoded = match kind {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'0' => 0,
            b'u' | b'U' => {
                let (scalar, next) = read_unicode_escape(bytes, index)?;
                let mut encoded = [0_u8; 4];
                let len = encode_utf8(scalar, &mut encoded);
                out.extend_from_slice(&encoded[..len]);
                index = next;
                continue;
            }
            other => return Err(Error::format(SyntaxError::InvalidEscape(other), index + 1)),
        };
        out.push(decoded);
        index += 2;
    }
    Ok(Utf8Array::from(out))
}

/// [`unescape`] followed by UTF-8 validation.
///
/// # Errors
///
/// Everything [`unescape`] reports, plus [`SyntaxError::InvalidUtf8`] when
/// the decoded bytes are not UTF-8.
pub fn unescape_to_string<'a>(view: impl Into<ByteView<'a>>) -> Result<String, Error> {
    let bytes = unescape(view)?.into_boxed_bytes().into_vec();
    String::from_utf8(bytes)
        .map_err(|e| Error::format(SyntaxError::InvalidUtf8, e.utf8_error().valid_up_to()))
}
