//! Tagged numeric values and the number literal parser.

use core::{fmt, str::FromStr};

use crate::{
    error::{Error, SyntaxError},
    float::DecimalDigits,
    literal::Literal,
    view::ByteView,
};

/// Discriminant of a [`NumericValue`], used in conversion errors.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum NumberKind {
    Null,
    Bool,
    U8,
    I8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl NumberKind {
    /// Lower-case name of the kind (`"null"`, `"bool"`, `"u8"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON scalar that is not a string: `null`, a boolean or a number of a
/// specific primitive type.
///
/// Conversions out of a value stay within a family. Every integer variant
/// converts to every integer type by reinterpreting a common 64-bit cell
/// (signed values sign-extended, then truncated to the target width), the
/// two float variants convert to each other, and `Bool` only converts to
/// `bool`. Anything else is [`Error::InvalidConversion`]. `Null` is a value
/// of its own; it only converts to `Option::None`.
///
/// ```rust
/// use utf8json::{Error, NumberKind, NumericValue};
///
/// let v = NumericValue::from(-1_i32);
/// assert_eq!(u8::try_from(v).unwrap(), 0xFF);
/// assert_eq!(
///     f64::try_from(v),
///     Err(Error::InvalidConversion { from: NumberKind::I32, to: NumberKind::F64 })
/// );
/// assert_eq!(Option::<i64>::try_from(NumericValue::Null).unwrap(), None);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[allow(missing_docs)]
pub enum NumericValue {
    #[default]
    Null,
    Bool(bool),
    U8(u8),
    I8(i8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl NumericValue {
    /// The variant tag.
    #[must_use]
    pub const fn kind(self) -> NumberKind {
        match self {
            Self::Null => NumberKind::Null,
            Self::Bool(_) => NumberKind::Bool,
            Self::U8(_) => NumberKind::U8,
            Self::I8(_) => NumberKind::I8,
            Self::I16(_) => NumberKind::I16,
            Self::U16(_) => NumberKind::U16,
            Self::I32(_) => NumberKind::I32,
            Self::U32(_) => NumberKind::U32,
            Self::I64(_) => NumberKind::I64,
            Self::U64(_) => NumberKind::U64,
            Self::F32(_) => NumberKind::F32,
            Self::F64(_) => NumberKind::F64,
        }
    }

    /// `true` for [`NumericValue::Null`].
    #[must_use]
    pub const fn is_null(self) -> bool {
        matches!(self, Self::Null)
    }

    /// The 64-bit storage cell shared by all integer variants.
    #[allow(clippy::cast_sign_loss)]
    const fn integer_cell(self) -> Option<u64> {
        match self {
            Self::U8(v) => Some(v as u64),
            Self::U16(v) => Some(v as u64),
            Self::U32(v) => Some(v as u64),
            Self::U64(v) => Some(v),
            Self::I8(v) => Some(v as i64 as u64),
            Self::I16(v) => Some(v as i64 as u64),
            Self::I32(v) => Some(v as i64 as u64),
            Self::I64(v) => Some(v as u64),
            _ => None,
        }
    }

    fn mismatch(self, to: NumberKind) -> Error {
        Error::InvalidConversion {
            from: self.kind(),
            to,
        }
    }
}

macro_rules! integer_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for NumericValue {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }

        impl From<Option<$ty>> for NumericValue {
            fn from(value: Option<$ty>) -> Self {
                value.map_or(Self::Null, Self::from)
            }
        }

        impl TryFrom<NumericValue> for $ty {
            type Error = Error;

            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            fn try_from(value: NumericValue) -> Result<Self, Error> {
                value
                    .integer_cell()
                    .map(|cell| cell as $ty)
                    .ok_or_else(|| value.mismatch(NumberKind::$variant))
            }
        }

        impl TryFrom<NumericValue> for Option<$ty> {
            type Error = Error;

            fn try_from(value: NumericValue) -> Result<Self, Error> {
                if value.is_null() {
                    Ok(None)
                } else {
                    <$ty>::try_from(value).map(Some)
                }
            }
        }
    )*};
}

integer_conversions! {
    u8 => U8,
    i8 => I8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
}

macro_rules! simple_conversions {
    ($($ty:ty => $variant:ident { $($from:ident($v:ident) => $expr:expr),* }),* $(,)?) => {$(
        impl From<$ty> for NumericValue {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }

        impl From<Option<$ty>> for NumericValue {
            fn from(value: Option<$ty>) -> Self {
                value.map_or(Self::Null, Self::from)
            }
        }

        impl TryFrom<NumericValue> for $ty {
            type Error = Error;

            #[allow(clippy::cast_possible_truncation)]
            fn try_from(value: NumericValue) -> Result<Self, Error> {
                match value {
                    $(NumericValue::$from($v) => Ok($expr),)*
                    _ => Err(value.mismatch(NumberKind::$variant)),
                }
            }
        }

        impl TryFrom<NumericValue> for Option<$ty> {
            type Error = Error;

            fn try_from(value: NumericValue) -> Result<Self, Error> {
                if value.is_null() {
                    Ok(None)
                } else {
                    <$ty>::try_from(value).map(Some)
                }
            }
        }
    )*};
}

simple_conversions! {
    bool => Bool { Bool(v) => v },
    f32 => F32 { F32(v) => v, F64(v) => v as f32 },
    f64 => F64 { F64(v) => v, F32(v) => f64::from(v) },
}

impl fmt::Display for NumericValue {
    /// JSON text of the value. Floats use [`DecimalDigits`] formatting.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Null => f.write_str(Literal::Null.as_str()),
            Self::Bool(true) => f.write_str(Literal::True.as_str()),
            Self::Bool(false) => f.write_str(Literal::False.as_str()),
            Self::U8(v) => fmt::Display::fmt(&v, f),
            Self::I8(v) => fmt::Display::fmt(&v, f),
            Self::I16(v) => fmt::Display::fmt(&v, f),
            Self::U16(v) => fmt::Display::fmt(&v, f),
            Self::I32(v) => fmt::Display::fmt(&v, f),
            Self::U32(v) => fmt::Display::fmt(&v, f),
            Self::I64(v) => fmt::Display::fmt(&v, f),
            Self::U64(v) => fmt::Display::fmt(&v, f),
            Self::F32(v) => fmt::Display::fmt(&DecimalDigits::from_f32(v), f),
            Self::F64(v) => fmt::Display::fmt(&DecimalDigits::from_f64(v), f),
        }
    }
}

/// Lexical shape of a number literal.
#[derive(Debug, Clone, Copy)]
struct NumberLexeme<'a> {
    negative: bool,
    /// Digits before any `.`.
    integral: &'a [u8],
    /// Has a `.` or an exponent.
    is_float: bool,
}

/// Points at `index`: the end of input or an unexpected byte.
fn stray(bytes: &[u8], index: usize) -> Error {
    if index >= bytes.len() {
        Error::format(SyntaxError::UnexpectedEnd, index)
    } else {
        Error::format(SyntaxError::InvalidNumber, index)
    }
}

fn skip_digits(bytes: &[u8], mut index: usize) -> usize {
    while bytes.get(index).is_some_and(u8::is_ascii_digit) {
        index += 1;
    }
    index
}

/// Walks `-? digits* (. digits*)? ([eE] [+-]? digits+)?` once, requiring at
/// least one mantissa digit and nothing after the literal.
fn lex(bytes: &[u8]) -> Result<NumberLexeme<'_>, Error> {
    let negative = bytes.first() == Some(&b'-');
    let start = usize::from(negative);
    let mut index = skip_digits(bytes, start);
    let integral = &bytes[start..index];
    let mut mantissa_digits = integral.len();
    let mut is_float = false;

    if bytes.get(index) == Some(&b'.') {
        is_float = true;
        let fraction_start = index + 1;
        index = skip_digits(bytes, fraction_start);
        mantissa_digits += index - fraction_start;
    }
    if mantissa_digits == 0 {
        return Err(stray(bytes, index));
    }

    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        is_float = true;
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        let exponent_start = index;
        index = skip_digits(bytes, exponent_start);
        if index == exponent_start {
            return Err(stray(bytes, index));
        }
    }

    if index != bytes.len() {
        return Err(Error::format(SyntaxError::InvalidNumber, index));
    }
    Ok(NumberLexeme {
        negative,
        integral,
        is_float,
    })
}

/// Magnitude of an integral digit run, `None` past `u64::MAX`.
fn magnitude(digits: &[u8]) -> Option<u64> {
    digits.iter().try_fold(0_u64, |acc, &digit| {
        acc.checked_mul(10)?.checked_add(u64::from(digit - b'0'))
    })
}

fn float_value(bytes: &[u8]) -> Result<f64, Error> {
    core::str::from_utf8(bytes)
        .ok()
        .and_then(|text| f64::from_str(text).ok())
        .ok_or(Error::format(SyntaxError::InvalidNumber, 0))
}

/// Parses an integer literal (`-?[0-9]+`).
///
/// # Errors
///
/// [`SyntaxError::InvalidNumber`] for anything else, including literals with
/// a fraction or exponent and values outside `i64`.
pub fn parse_int<'a>(view: impl Into<ByteView<'a>>) -> Result<i64, Error> {
    let bytes = view.into().as_bytes();
    let lexeme = lex(bytes)?;
    if lexeme.is_float {
        let at = usize::from(lexeme.negative) + lexeme.integral.len();
        return Err(Error::format(SyntaxError::InvalidNumber, at));
    }
    let overflow = || Error::format(SyntaxError::InvalidNumber, 0);
    let magnitude = magnitude(lexeme.integral).ok_or_else(overflow)?;
    if lexeme.negative {
        0_i64.checked_sub_unsigned(magnitude).ok_or_else(overflow)
    } else {
        i64::try_from(magnitude).map_err(|_| overflow())
    }
}

/// Parses any number literal as an `f64`.
///
/// The literal grammar is checked in one pass; rounding to the nearest
/// double is left to core's parser.
///
/// # Errors
///
/// [`SyntaxError::InvalidNumber`] or [`SyntaxError::UnexpectedEnd`] for a
/// malformed literal.
pub fn parse_float<'a>(view: impl Into<ByteView<'a>>) -> Result<f64, Error> {
    let bytes = view.into().as_bytes();
    lex(bytes)?;
    float_value(bytes)
}

/// Parses a scalar literal into the narrowest fitting variant.
///
/// - `true`/`false` become [`NumericValue::Bool`], `null` becomes
///   [`NumericValue::Null`].
/// - Integers become [`NumericValue::I64`], or [`NumericValue::U64`] when
///   they only fit unsigned.
/// - Literals with a fraction or exponent become [`NumericValue::F64`].
///
/// ```rust
/// use utf8json::{NumericValue, parse_number};
///
/// assert_eq!(parse_number("123456789123456789").unwrap(), NumericValue::I64(123456789123456789));
/// assert_eq!(parse_number("18446744073709551615").unwrap(), NumericValue::U64(u64::MAX));
/// assert_eq!(parse_number("-1.5e3").unwrap(), NumericValue::F64(-1500.0));
/// assert_eq!(parse_number("null").unwrap(), NumericValue::Null);
/// ```
///
/// # Errors
///
/// [`SyntaxError::UnexpectedEnd`] for an empty view,
/// [`SyntaxError::InvalidLiteral`] for a misspelled keyword and
/// [`SyntaxError::InvalidNumber`] for a malformed or out-of-range number.
pub fn parse_number<'a>(view: impl Into<ByteView<'a>>) -> Result<NumericValue, Error> {
    let view = view.into();
    let bytes = view.as_bytes();
    match bytes.first() {
        None => return Err(Error::format(SyntaxError::UnexpectedEnd, 0)),
        Some(b't' | b'f' | b'n') => {
            return match Literal::match_bytes(view) {
                Some(Literal::True) => Ok(NumericValue::Bool(true)),
                Some(Literal::False) => Ok(NumericValue::Bool(false)),
                Some(Literal::Null) => Ok(NumericValue::Null),
                None => Err(Error::format(SyntaxError::InvalidLiteral, 0)),
            };
        }
        Some(_) => {}
    }

    let lexeme = lex(bytes)?;
    if lexeme.is_float {
        return float_value(bytes).map(NumericValue::F64);
    }
    let overflow = || Error::format(SyntaxError::InvalidNumber, 0);
    let magnitude = magnitude(lexeme.integral).ok_or_else(overflow)?;
    if lexeme.negative {
        0_i64
            .checked_sub_unsigned(magnitude)
            .map(NumericValue::I64)
            .ok_or_else(overflow)
    } else {
        Ok(i64::try_from(magnitude).map_or(NumericValue::U64(magnitude), NumericValue::I64))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0", 0)]
    #[case("-0", 0)]
    #[case("128", 128)]
    #[case("123456789123456789", 123_456_789_123_456_789)]
    #[case("9223372036854775807", i64::MAX)]
    #[case("-9223372036854775808", i64::MIN)]
    fn parses_ints(#[case] text: &str, #[case] expected: i64) {
        assert_eq!(parse_int(text).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("", SyntaxError::UnexpectedEnd, 0)]
    #[case::sign_only("-", SyntaxError::UnexpectedEnd, 1)]
    #[case::fraction("1.5", SyntaxError::InvalidNumber, 1)]
    #[case::exponent("-1e3", SyntaxError::InvalidNumber, 2)]
    #[case::too_big("9223372036854775808", SyntaxError::InvalidNumber, 0)]
    #[case::letters("12a", SyntaxError::InvalidNumber, 2)]
    fn rejects_bad_ints(#[case] text: &str, #[case] source: SyntaxError, #[case] offset: usize) {
        assert_eq!(parse_int(text), Err(Error::InvalidFormat { source, offset }));
    }

    #[rstest]
    #[case("1.5", 1.5)]
    #[case("-0.25", -0.25)]
    #[case("1e3", 1000.0)]
    #[case("1E+3", 1000.0)]
    #[case("2.5e-3", 0.0025)]
    #[case("12", 12.0)]
    #[case(".5", 0.5)]
    #[case("1.7976931348623157E+308", f64::MAX)]
    #[case("5E-324", 5e-324)]
    fn parses_floats(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(parse_float(text).unwrap().to_bits(), expected.to_bits());
    }

    #[rstest]
    #[case::dangling_exponent("1e", SyntaxError::UnexpectedEnd, 2)]
    #[case::exponent_sign_only("1e-", SyntaxError::UnexpectedEnd, 3)]
    #[case::bare_point(".", SyntaxError::UnexpectedEnd, 1)]
    #[case::double_point("1.2.3", SyntaxError::InvalidNumber, 3)]
    #[case::word("inf", SyntaxError::InvalidNumber, 0)]
    fn rejects_bad_floats(#[case] text: &str, #[case] source: SyntaxError, #[case] offset: usize) {
        assert_eq!(parse_float(text), Err(Error::InvalidFormat { source, offset }));
    }

    #[rstest]
    #[case("true", NumericValue::Bool(true))]
    #[case("false", NumericValue::Bool(false))]
    #[case("null", NumericValue::Null)]
    #[case("-42", NumericValue::I64(-42))]
    #[case("18446744073709551615", NumericValue::U64(u64::MAX))]
    #[case("1.0", NumericValue::F64(1.0))]
    #[case("1e2", NumericValue::F64(100.0))]
    fn parses_numbers(#[case] text: &str, #[case] expected: NumericValue) {
        assert_eq!(parse_number(text).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("", SyntaxError::UnexpectedEnd, 0)]
    #[case::literal("nul", SyntaxError::InvalidLiteral, 0)]
    #[case::truthy("trueish", SyntaxError::InvalidLiteral, 0)]
    #[case::overflow("18446744073709551616", SyntaxError::InvalidNumber, 0)]
    #[case::negative_overflow("-9223372036854775809", SyntaxError::InvalidNumber, 0)]
    fn rejects_bad_numbers(
        #[case] text: &str,
        #[case] source: SyntaxError,
        #[case] offset: usize,
    ) {
        assert_eq!(parse_number(text), Err(Error::InvalidFormat { source, offset }));
    }

    #[test]
    fn integers_reinterpret_through_common_cell() {
        let v = NumericValue::I8(-1);
        assert_eq!(u64::try_from(v).unwrap(), u64::MAX);
        assert_eq!(u16::try_from(v).unwrap(), u16::MAX);
        assert_eq!(i64::try_from(NumericValue::U64(u64::MAX)).unwrap(), -1);
        assert_eq!(u8::try_from(NumericValue::U32(0x1234)).unwrap(), 0x34);
        assert_eq!(i32::try_from(NumericValue::U8(200)).unwrap(), 200);
    }

    #[test]
    fn families_do_not_mix() {
        assert_eq!(
            i32::try_from(NumericValue::F64(1.0)),
            Err(Error::InvalidConversion {
                from: NumberKind::F64,
                to: NumberKind::I32
            })
        );
        assert_eq!(
            bool::try_from(NumericValue::I64(1)),
            Err(Error::InvalidConversion {
                from: NumberKind::I64,
                to: NumberKind::Bool
            })
        );
        assert_eq!(
            u8::try_from(NumericValue::Null),
            Err(Error::InvalidConversion {
                from: NumberKind::Null,
                to: NumberKind::U8
            })
        );
        assert!(f64::try_from(NumericValue::Bool(true)).is_err());
    }

    #[test]
    fn floats_convert_within_family() {
        assert_eq!(f64::try_from(NumericValue::F32(0.5)).unwrap(), 0.5);
        assert_eq!(f32::try_from(NumericValue::F64(0.25)).unwrap(), 0.25);
    }

    #[test]
    fn options_map_null() {
        assert_eq!(Option::<bool>::try_from(NumericValue::Null).unwrap(), None);
        assert_eq!(
            Option::<u16>::try_from(NumericValue::U16(7)).unwrap(),
            Some(7)
        );
        assert!(Option::<u16>::try_from(NumericValue::F32(7.0)).is_err());
        assert_eq!(NumericValue::from(None::<f32>), NumericValue::Null);
        assert_eq!(NumericValue::from(Some(3_i16)), NumericValue::I16(3));
    }

    #[rstest]
    #[case(NumericValue::Null, "null")]
    #[case(NumericValue::Bool(false), "false")]
    #[case(NumericValue::I8(-128), "-128")]
    #[case(NumericValue::U64(u64::MAX), "18446744073709551615")]
    #[case(NumericValue::F64(1.23e-10), "1.23E-10")]
    #[case(NumericValue::F32(0.1), "0.1")]
    fn displays_json_text(#[case] value: NumericValue, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
        assert_eq!(value.kind().to_string(), value.kind().as_str());
    }
}
