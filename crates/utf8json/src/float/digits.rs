use core::fmt::{self, Write as _};

use super::{
    grisu::{self, MAX_DIGITS},
    ieee::{DOUBLE, SINGLE},
};

/// Shortest round-trip decimal digits of an `f64` or `f32`.
///
/// For a finite value the magnitude is `D * 10^decimal_exponent` where `D`
/// is [`digits`](Self::digits) read as an integer. [`format`](Self::format)
/// renders the value as text:
///
/// - fixed point when the point position `count + decimal_exponent` is in
///   `1..=15` (`1..=7` for `f32`), padding with zeros as needed;
/// - `0.` followed by zeros and the digits when it is in `-3..=0`;
/// - otherwise scientific, `D.DDDE±X` with an unpadded exponent.
///
/// ```rust
/// use utf8json::DecimalDigits;
///
/// let d = DecimalDigits::from_f64(1.23e4);
/// assert_eq!(d.digits(), b"123");
/// assert_eq!(d.decimal_exponent(), 2);
/// assert_eq!(d.to_string(), "12300");
/// assert_eq!(DecimalDigits::from_f64(1.23e-10).to_string(), "1.23E-10");
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalDigits {
    digits: [u8; MAX_DIGITS],
    count: u8,
    decimal_exponent: i16,
    is_negative: bool,
    is_single_precision: bool,
    is_infinity: bool,
    is_nan: bool,
}

/// Collects `{:e}` output on the stack.
struct StackText {
    bytes: [u8; 32],
    len: usize,
}

impl fmt::Write for StackText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        let dst = self.bytes.get_mut(self.len..end).ok_or(fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl DecimalDigits {
    /// Longest digit string.
    pub const MAX_DIGITS: usize = MAX_DIGITS;

    /// Longest text [`format`](Self::format) writes:
    /// sign, 17 digits, point, `E`, exponent sign and three exponent digits.
    pub const MAX_CHARS: usize = 24;

    const fn special(is_negative: bool, is_single_precision: bool) -> Self {
        Self {
            digits: [b'0'; MAX_DIGITS],
            count: 1,
            decimal_exponent: 0,
            is_negative,
            is_single_precision,
            is_infinity: false,
            is_nan: false,
        }
    }

    /// Shortest digits of a double.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        let mut result = Self::special(value.is_sign_negative(), false);
        if value.is_nan() {
            result.is_nan = true;
            result.is_negative = false;
            return result;
        }
        if value.is_infinite() {
            result.is_infinity = true;
            return result;
        }
        if value == 0.0 {
            return result;
        }

        let bits = value.abs().to_bits();
        let w = DOUBLE.decompose(bits).normalize();
        let (minus, plus) = DOUBLE.normalized_boundaries(bits);
        match grisu::shortest(w, minus, plus, &mut result.digits) {
            Some((count, exponent)) => result.set_shape(count, exponent),
            None => result.fill_from_exact(format_args!("{:e}", value.abs())),
        }
        result
    }

    /// Shortest digits of a single, i.e. the fewest digits that parse back
    /// to the same `f32` (not to the same widened `f64`).
    #[must_use]
    pub fn from_f32(value: f32) -> Self {
        let mut result = Self::special(value.is_sign_negative(), true);
        if value.is_nan() {
            result.is_nan = true;
            result.is_negative = false;
            return result;
        }
        if value.is_infinite() {
            result.is_infinity = true;
            return result;
        }
        if value == 0.0 {
            return result;
        }

        let magnitude = value.abs();
        let w = DOUBLE.decompose(f64::from(magnitude).to_bits()).normalize();
        let (minus, plus) = SINGLE.normalized_boundaries(u64::from(magnitude.to_bits()));
        match grisu::shortest(w, minus, plus, &mut result.digits) {
            Some((count, exponent)) => result.set_shape(count, exponent),
            None => result.fill_from_exact(format_args!("{magnitude:e}")),
        }
        result
    }

    #[allow(clippy::cast_possible_truncation)]
    fn set_shape(&mut self, count: usize, exponent: i32) {
        self.count = count as u8;
        self.decimal_exponent = exponent as i16;
    }

    /// Takes the digits from core's shortest round-trip `{:e}` rendering,
    /// which looks like `1.2345e-7` or `5e-324`.
    fn fill_from_exact(&mut self, args: fmt::Arguments<'_>) {
        let mut text = StackText {
            bytes: [0; 32],
            len: 0,
        };
        // At most 24 bytes for any finite f64.
        let _ = text.write_fmt(args);

        let mut count = 0;
        let mut exponent: i32 = 0;
        let mut exponent_negative = false;
        let mut in_exponent = false;
        for &byte in &text.bytes[..text.len] {
            match byte {
                b'e' => in_exponent = true,
                b'-' if in_exponent => exponent_negative = true,
                b'0'..=b'9' if in_exponent => {
                    exponent = exponent * 10 + i32::from(byte - b'0');
                }
                b'0'..=b'9' if count < MAX_DIGITS => {
                    self.digits[count] = byte;
                    count += 1;
                }
                _ => {}
            }
        }
        if exponent_negative {
            exponent = -exponent;
        }
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        let shift = count as i32 - 1;
        self.set_shape(count, exponent - shift);
    }

    /// The significant digits as ASCII, at least one.
    #[must_use]
    pub fn digits(&self) -> &[u8] {
        &self.digits[..usize::from(self.count)]
    }

    /// Power of ten applied to [`digits`](Self::digits).
    #[must_use]
    pub fn decimal_exponent(&self) -> i16 {
        self.decimal_exponent
    }

    /// Position of the decimal point relative to the first digit,
    /// `count + decimal_exponent`.
    #[must_use]
    pub fn point_position(&self) -> i32 {
        i32::from(self.count) + i32::from(self.decimal_exponent)
    }

    /// Sign of the value (also set for `-0.0` and `-∞`).
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.is_negative
    }

    /// Whether the digits came from an `f32`.
    #[must_use]
    pub fn is_single_precision(&self) -> bool {
        self.is_single_precision
    }

    /// Whether the value is infinite.
    #[must_use]
    pub fn is_infinity(&self) -> bool {
        self.is_infinity
    }

    /// Whether the value is NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.is_nan
    }

    /// Writes the text form to the front of `out` and returns its length.
    ///
    /// Non-finite values are written as `NaN`, `∞` and `-∞`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is too short; [`MAX_CHARS`](Self::MAX_CHARS) bytes
    /// always suffice.
    #[allow(clippy::cast_sign_loss)]
    pub fn format(&self, out: &mut [u8]) -> usize {
        let mut cursor = Cursor { out, len: 0 };
        if self.is_nan {
            cursor.put(b"NaN");
            return cursor.len;
        }
        if self.is_negative {
            cursor.put(b"-");
        }
        if self.is_infinity {
            cursor.put("∞".as_bytes());
            return cursor.len;
        }

        let digits = self.digits();
        let exponent = i32::from(self.decimal_exponent);
        let point = self.point_position();
        let max_fixed = if self.is_single_precision { 7 } else { 15 };

        if 0 < point && point <= max_fixed {
            if exponent >= 0 {
                cursor.put(digits);
                cursor.zeros(exponent as usize);
            } else {
                let (integral, fraction) = digits.split_at(point as usize);
                cursor.put(integral);
                cursor.put(b".");
                cursor.put(fraction);
            }
        } else if -4 < point && point <= 0 {
            cursor.put(b"0.");
            cursor.zeros((-point) as usize);
            cursor.put(digits);
        } else {
            let (first, rest) = digits.split_at(1);
            cursor.put(first);
            if !rest.is_empty() {
                cursor.put(b".");
                cursor.put(rest);
            }
            let scientific = point - 1;
            cursor.put(if scientific < 0 { b"E-" } else { b"E+" });
            cursor.unsigned(scientific.unsigned_abs());
        }
        cursor.len
    }
}

struct Cursor<'a> {
    out: &'a mut [u8],
    len: usize,
}

impl Cursor<'_> {
    fn put(&mut self, bytes: &[u8]) {
        self.out[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    fn zeros(&mut self, n: usize) {
        self.out[self.len..self.len + n].fill(b'0');
        self.len += n;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn unsigned(&mut self, mut value: u32) {
        let mut scratch = [0_u8; 10];
        let mut start = scratch.len();
        loop {
            start -= 1;
            scratch[start] = b'0' + (value % 10) as u8;
            value /= 10;
            if value == 0 {
                break;
            }
        }
        self.put(&scratch[start..]);
    }
}

impl fmt::Display for DecimalDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = [0_u8; Self::MAX_CHARS];
        let len = self.format(&mut buffer);
        let text = core::str::from_utf8(&buffer[..len]).map_err(|_| fmt::Error)?;
        f.pad(text)
    }
}
