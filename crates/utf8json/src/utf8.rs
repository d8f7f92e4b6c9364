//! Stateless UTF-8 decode/encode helpers and the code point iterators built
//! on them.
//!
//! Decoding never repairs: a truncated or malformed sequence is reported as
//! `None` and the iterators simply stop there.

use core::iter::FusedIterator;

const CONT_MASK: u8 = 0b0011_1111;

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

/// Decodes the scalar value starting at `index`.
///
/// Returns the scalar and the number of bytes it occupies, or `None` when
/// `index` is out of range, the lead byte is not a lead byte, the sequence
/// does not fit in `bytes`, a continuation byte is malformed, or the result
/// is not a Unicode scalar value (overlong forms, surrogates, values past
/// U+10FFFF).
///
/// ```rust
/// use utf8json::decode_one;
///
/// assert_eq!(decode_one("aα".as_bytes(), 1), Some(('α', 2)));
/// assert_eq!(decode_one(&[0xCE], 0), None);
/// ```
#[must_use]
pub fn decode_one(bytes: &[u8], index: usize) -> Option<(char, usize)> {
    let lead = *bytes.get(index)?;
    let (width, init, min) = match lead {
        0x00..=0x7F => return Some((char::from(lead), 1)),
        0xC0..=0xDF => (2, u32::from(lead & 0b0001_1111), 0x80),
        0xE0..=0xEF => (3, u32::from(lead & 0b0000_1111), 0x800),
        0xF0..=0xF7 => (4, u32::from(lead & 0b0000_0111), 0x1_0000),
        _ => return None,
    };
    let tail = bytes.get(index + 1..index + width)?;
    let mut scalar = init;
    for &byte in tail {
        if !is_continuation(byte) {
            return None;
        }
        scalar = (scalar << 6) | u32::from(byte & CONT_MASK);
    }
    if scalar < min {
        return None;
    }
    char::from_u32(scalar).map(|c| (c, width))
}

/// Number of code points in `bytes`, counted as the number of bytes that are
/// not UTF-8 continuation bytes. Does not validate.
#[must_use]
pub fn codepoint_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| !is_continuation(b)).count()
}

/// Writes the UTF-8 encoding of `scalar` to the front of `out` and returns
/// the number of bytes written (1 to 4).
///
/// Any value below `0x20_0000` is encoded with the generic bit layout, so
/// lone surrogates produce their 3-byte generalized form.
///
/// # Panics
///
/// Panics if `out` is too short for the encoding; 4 bytes always suffice.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_utf8(scalar: u32, out: &mut [u8]) -> usize {
    let cont = |shift: u32| 0b1000_0000 | ((scalar >> shift) as u8 & CONT_MASK);
    if scalar < 0x80 {
        out[0] = scalar as u8;
        1
    } else if scalar < 0x800 {
        out[..2].copy_from_slice(&[0b1100_0000 | (scalar >> 6) as u8, cont(0)]);
        2
    } else if scalar < 0x1_0000 {
        out[..3].copy_from_slice(&[0b1110_0000 | (scalar >> 12) as u8, cont(6), cont(0)]);
        3
    } else {
        out[..4].copy_from_slice(&[
            0b1111_0000 | ((scalar >> 18) as u8 & 0b0111),
            cont(12),
            cont(6),
            cont(0),
        ]);
        4
    }
}

/// Forward iterator over the scalar values of a UTF-8 byte slice.
///
/// Created by [`ByteView::codepoints`](crate::ByteView::codepoints). Cloning
/// the iterator restarts from the clone's position; iteration ends at the
/// first truncated or invalid sequence without reporting an error, so compare
/// [`position`](Self::position) with the input length to detect that case.
#[derive(Debug, Clone)]
pub struct CodePoints<'a> {
    bytes: &'a [u8],
    index: usize,
    done: bool,
}

impl<'a> CodePoints<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            index: 0,
            done: false,
        }
    }

    /// Byte offset of the next scalar to be decoded.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    /// `true` once iteration reached the end of the input cleanly.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.index == self.bytes.len()
    }
}

impl Iterator for CodePoints<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.done {
            return None;
        }
        if let Some((c, width)) = decode_one(self.bytes, self.index) {
            self.index += width;
            Some(c)
        } else {
            self.done = true;
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.bytes.len() - self.index;
        (0, Some(rest))
    }
}

impl FusedIterator for CodePoints<'_> {}

/// Iterator over the scalar values of UTF-16 code units.
///
/// Surrogate pairs are combined. A lone surrogate (including a trailing high
/// surrogate) ends iteration, mirroring [`CodePoints`].
#[derive(Debug, Clone)]
pub struct Utf16CodePoints<'a> {
    units: &'a [u16],
    index: usize,
    done: bool,
}

impl<'a> Utf16CodePoints<'a> {
    /// Iterates `units` from the start.
    #[must_use]
    pub fn new(units: &'a [u16]) -> Self {
        Self {
            units,
            index: 0,
            done: false,
        }
    }

    /// Index of the next code unit to be decoded.
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    /// `true` once iteration reached the end of the input cleanly.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.index == self.units.len()
    }

    fn decode(&self) -> Option<(char, usize)> {
        let high = *self.units.get(self.index)?;
        match high {
            0xD800..=0xDBFF => {
                let low = *self.units.get(self.index + 1)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return None;
                }
                let scalar =
                    0x1_0000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                char::from_u32(scalar).map(|c| (c, 2))
            }
            0xDC00..=0xDFFF => None,
            _ => char::from_u32(u32::from(high)).map(|c| (c, 1)),
        }
    }
}

impl Iterator for Utf16CodePoints<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.done {
            return None;
        }
        if let Some((c, width)) = self.decode() {
            self.index += width;
            Some(c)
        } else {
            self.done = true;
            None
        }
    }
}

impl FusedIterator for Utf16CodePoints<'_> {}
