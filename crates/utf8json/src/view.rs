//! Borrowed and owned UTF-8 byte strings.

use alloc::{boxed::Box, string::String, vec::Vec};
use core::{
    fmt,
    hash::{Hash, Hasher},
};

use bstr::ByteSlice;

use crate::{
    error::{Error, SyntaxError},
    hash::farm_hash32,
    utf8::{CodePoints, Utf16CodePoints, codepoint_count, encode_utf8},
};

/// Code points skipped by [`ByteView::trim_leading_whitespace`], sorted.
///
/// Besides the Unicode `White_Space` set this includes U+FEFF so that a
/// byte-order mark is dropped together with leading blanks.
const WHITESPACE: [u32; 26] = [
    0x0009, 0x000A, 0x000B, 0x000C, 0x000D, 0x0020, 0x0085, 0x00A0, 0x1680, 0x2000, 0x2001, 0x2002,
    0x2003, 0x2004, 0x2005, 0x2006, 0x2007, 0x2008, 0x2009, 0x200A, 0x2028, 0x2029, 0x202F, 0x205F,
    0x3000, 0xFEFF,
];

/// UTF-16 operands shorter than this are compared by re-encoding them into a
/// stack buffer.
const STACK_COMPARE_UNITS: usize = 300;

/// Whether `c` belongs to the leading-whitespace set (Unicode white space
/// plus the byte-order mark).
#[must_use]
pub fn is_whitespace(c: char) -> bool {
    WHITESPACE.binary_search(&u32::from(c)).is_ok()
}

/// Immutable, non-owning view over UTF-8 bytes.
///
/// A view is a fat pointer into a buffer owned by someone else; copying it
/// never copies the bytes. Equality and hashing look at content only, and
/// the hash agrees with [`Utf8Array`] for the same bytes.
///
/// The bytes are expected to be UTF-8 but are not validated on construction.
/// Code point operations stop at the first malformed sequence.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteView<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteView<'a> {
    /// Views `bytes`.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Views the UTF-8 bytes of `text`.
    #[must_use]
    pub const fn from_text(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
        }
    }

    /// The viewed bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` for a zero-length view.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    #[track_caller]
    pub fn byte_at(&self, index: usize) -> u8 {
        self.bytes[index]
    }

    /// Byte at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    /// The `len` bytes starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if the range does not lie within the view.
    #[must_use]
    #[track_caller]
    pub fn substring(&self, start: usize, len: usize) -> ByteView<'a> {
        match self.get_substring(start, len) {
            Some(view) => view,
            None => panic!(
                "substring {start}..{start}+{len} out of range for view of length {}",
                self.len()
            ),
        }
    }

    /// Checked [`substring`](Self::substring).
    #[must_use]
    pub fn get_substring(&self, start: usize, len: usize) -> Option<ByteView<'a>> {
        let end = start.checked_add(len)?;
        self.bytes.get(start..end).map(ByteView::new)
    }

    /// Everything from `start` to the end.
    ///
    /// # Panics
    ///
    /// Panics if `start > self.len()`.
    #[must_use]
    #[track_caller]
    pub fn substring_from(&self, start: usize) -> ByteView<'a> {
        self.substring(start, self.len().saturating_sub(start))
    }

    /// The view with leading white space and byte-order marks removed.
    ///
    /// See [`is_whitespace`] for the exact set.
    #[must_use]
    pub fn trim_leading_whitespace(&self) -> ByteView<'a> {
        let mut codepoints = self.codepoints();
        loop {
            let start = codepoints.position();
            match codepoints.next() {
                Some(c) if is_whitespace(c) => {}
                _ => return self.substring_from(start),
            }
        }
    }

    /// Lazily decodes the scalar values of the view.
    ///
    /// ```rust
    /// use utf8json::ByteView;
    ///
    /// let view = ByteView::from("aα🐈");
    /// assert!(view.codepoints().eq(['a', 'α', '🐈']));
    /// ```
    #[must_use]
    pub fn codepoints(&self) -> CodePoints<'a> {
        CodePoints::new(self.bytes)
    }

    /// Number of code points, counting every byte that does not continue a
    /// multi-byte sequence.
    #[must_use]
    pub fn codepoint_len(&self) -> usize {
        codepoint_count(self.bytes)
    }

    /// Byte offset of the first occurrence of `pattern`.
    #[must_use]
    pub fn index_of(&self, pattern: impl AsRef<[u8]>) -> Option<usize> {
        self.bytes.find(pattern)
    }

    /// Byte offset of the first occurrence of `pattern` at or after `start`.
    ///
    /// Returns `None` when `start` is past the end.
    #[must_use]
    pub fn index_of_from(&self, pattern: impl AsRef<[u8]>, start: usize) -> Option<usize> {
        let rest = self.bytes.get(start..)?;
        rest.find(pattern).map(|i| i + start)
    }

    /// Compares against UTF-16 text without allocating.
    ///
    /// Lone surrogates in `units` never compare equal.
    ///
    /// ```rust
    /// use utf8json::ByteView;
    ///
    /// let units: Vec<u16> = "héllo 🐈".encode_utf16().collect();
    /// assert!(ByteView::from("héllo 🐈").eq_utf16(&units));
    /// ```
    #[must_use]
    pub fn eq_utf16(&self, units: &[u16]) -> bool {
        // Every UTF-16 unit encodes to 1..=3 UTF-8 bytes (a surrogate pair is
        // two units for four bytes).
        if units.len() > self.len() || self.len() > units.len() * 3 {
            return false;
        }
        if units.len() < STACK_COMPARE_UNITS {
            let mut buffer = [0_u8; STACK_COMPARE_UNITS * 3];
            let mut written = 0;
            let mut decoded = Utf16CodePoints::new(units);
            for c in decoded.by_ref() {
                written += encode_utf8(u32::from(c), &mut buffer[written..]);
            }
            return decoded.is_complete() && buffer[..written] == *self.bytes;
        }

        let mut ours = self.codepoints();
        let mut theirs = Utf16CodePoints::new(units);
        loop {
            match (ours.next(), theirs.next()) {
                (Some(a), Some(b)) if a == b => {}
                (None, None) => return ours.is_complete() && theirs.is_complete(),
                _ => return false,
            }
        }
    }

    /// 32-bit FarmHash of the viewed bytes.
    #[must_use]
    pub fn hash32(&self) -> u32 {
        farm_hash32(self.bytes)
    }

    /// The bytes as `&str`.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::InvalidUtf8`] at the offset of the first bad byte.
    pub fn to_str(&self) -> Result<&'a str, Error> {
        core::str::from_utf8(self.bytes)
            .map_err(|e| Error::format(SyntaxError::InvalidUtf8, e.valid_up_to()))
    }

    /// Copies the bytes into an owned [`Utf8Array`].
    #[must_use]
    pub fn to_owned_array(&self) -> Utf8Array {
        Utf8Array::from(*self)
    }
}

impl fmt::Display for ByteView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.bytes.as_bstr(), f)
    }
}

impl fmt::Debug for ByteView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.bytes.as_bstr(), f)
    }
}

impl Hash for ByteView<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash32());
    }
}

impl<'a> From<&'a str> for ByteView<'a> {
    fn from(text: &'a str) -> Self {
        Self::from_text(text)
    }
}

impl<'a> From<&'a String> for ByteView<'a> {
    fn from(text: &'a String) -> Self {
        Self::from_text(text)
    }
}

impl<'a> From<&'a [u8]> for ByteView<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for ByteView<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for ByteView<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl<'a> From<&'a Utf8Array> for ByteView<'a> {
    fn from(array: &'a Utf8Array) -> Self {
        array.as_view()
    }
}

impl AsRef<[u8]> for ByteView<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl PartialEq<str> for ByteView<'_> {
    fn eq(&self, other: &str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<&str> for ByteView<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<[u8]> for ByteView<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialEq<&[u8]> for ByteView<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.bytes == *other
    }
}

impl PartialEq<[u16]> for ByteView<'_> {
    fn eq(&self, other: &[u16]) -> bool {
        self.eq_utf16(other)
    }
}

impl PartialEq<Utf8Array> for ByteView<'_> {
    fn eq(&self, other: &Utf8Array) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<ByteView<'_>> for str {
    fn eq(&self, other: &ByteView<'_>) -> bool {
        other == self
    }
}

impl PartialEq<ByteView<'_>> for &str {
    fn eq(&self, other: &ByteView<'_>) -> bool {
        other == self
    }
}

/// Owned UTF-8 bytes, the counterpart of [`ByteView`].
///
/// Equality and hashing agree with [`ByteView`] over the same content, so a
/// map keyed by one can be probed with the other's hash.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Utf8Array {
    bytes: Box<[u8]>,
}

impl Utf8Array {
    /// Borrows the bytes as a view.
    #[must_use]
    pub fn as_view(&self) -> ByteView<'_> {
        ByteView::new(&self.bytes)
    }

    /// The owned bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` when empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 32-bit FarmHash of the bytes; equal to [`ByteView::hash32`].
    #[must_use]
    pub fn hash32(&self) -> u32 {
        farm_hash32(&self.bytes)
    }

    /// Unwraps the boxed bytes.
    #[must_use]
    pub fn into_boxed_bytes(self) -> Box<[u8]> {
        self.bytes
    }
}

impl fmt::Display for Utf8Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_view(), f)
    }
}

impl fmt::Debug for Utf8Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_view(), f)
    }
}

impl Hash for Utf8Array {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash32());
    }
}

impl From<&str> for Utf8Array {
    fn from(text: &str) -> Self {
        Self::from(text.as_bytes())
    }
}

impl From<String> for Utf8Array {
    fn from(text: String) -> Self {
        Self::from(text.into_bytes())
    }
}

impl From<&[u8]> for Utf8Array {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: Box::from(bytes),
        }
    }
}

impl From<Vec<u8>> for Utf8Array {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }
}

impl From<ByteView<'_>> for Utf8Array {
    fn from(view: ByteView<'_>) -> Self {
        Self::from(view.as_bytes())
    }
}

impl AsRef<[u8]> for Utf8Array {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl PartialEq<ByteView<'_>> for Utf8Array {
    fn eq(&self, other: &ByteView<'_>) -> bool {
        *self.bytes == *other.as_bytes()
    }
}

impl PartialEq<str> for Utf8Array {
    fn eq(&self, other: &str) -> bool {
        *self.bytes == *other.as_bytes()
    }
}

impl PartialEq<&str> for Utf8Array {
    fn eq(&self, other: &&str) -> bool {
        *self.bytes == *other.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, vec::Vec};
    use core::hash::BuildHasher;
    use std::collections::hash_map::RandomState;

    use rstest::rstest;

    use super::*;

    #[test]
    fn substring_is_zero_copy() {
        let text = "hello, world";
        let view = ByteView::from(text);
        let sub = view.substring(7, 5);
        assert_eq!(sub, "world");
        assert_eq!(sub.as_bytes().as_ptr(), text[7..].as_ptr());
        assert_eq!(view.substring_from(12), "");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn substring_out_of_range_panics() {
        let _ = ByteView::from("abc").substring(2, 2);
    }

    #[test]
    fn checked_substring() {
        let view = ByteView::from("abc");
        assert_eq!(view.get_substring(1, 2).unwrap(), "bc");
        assert_eq!(view.get_substring(2, 2), None);
        assert_eq!(view.get_substring(usize::MAX, 2), None);
    }

    #[rstest]
    #[case::bom("\u{FEFF}{\"a\":1}", "{\"a\":1}")]
    #[case::mixed(" \t\r\n\u{3000}\u{00A0}x ", "x ")]
    #[case::all_blank(" \u{2028} ", "")]
    #[case::none("abc", "abc")]
    #[case::empty("", "")]
    fn trims_leading_whitespace(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(ByteView::from(input).trim_leading_whitespace(), expected);
    }

    #[test]
    fn whitespace_table_is_sorted() {
        assert!(WHITESPACE.windows(2).all(|w| w[0] < w[1]));
        assert!(is_whitespace('\u{FEFF}'));
        assert!(!is_whitespace('\u{200B}'));
    }

    #[test]
    fn codepoint_len_counts_scalars() {
        assert_eq!(ByteView::from("aα🐈").codepoint_len(), 3);
        assert_eq!(ByteView::from("aα🐈").len(), 7);
    }

    #[test]
    fn finds_patterns() {
        let view = ByteView::from("abcabc");
        assert_eq!(view.index_of("bc"), Some(1));
        assert_eq!(view.index_of_from("bc", 2), Some(4));
        assert_eq!(view.index_of_from("bc", 5), None);
        assert_eq!(view.index_of_from("bc", 7), None);
        assert_eq!(view.index_of("x"), None);
        assert_eq!(view.index_of(""), Some(0));
    }

    #[rstest]
    #[case::empty("")]
    #[case::ascii("Name")]
    #[case::bmp("aiueâïùéøoαιυεωあいうえお亜以宇江男")]
    #[case::pairs("🐁🐂🐅")]
    #[case::bom("\u{FEFF}x")]
    fn utf16_equality_matches_native(#[case] text: &str) {
        let units: Vec<u16> = text.encode_utf16().collect();
        assert!(ByteView::from(text).eq_utf16(&units));
        assert_eq!(ByteView::from(text), *units.as_slice());

        let long = text.repeat(200);
        let long_units: Vec<u16> = long.encode_utf16().collect();
        assert!(ByteView::from(&long).eq_utf16(&long_units));
    }

    #[test]
    fn utf16_inequality() {
        let units: Vec<u16> = "abd".encode_utf16().collect();
        assert!(!ByteView::from("abc").eq_utf16(&units));
        assert!(!ByteView::from("ab").eq_utf16(&units));
        assert!(!ByteView::from("").eq_utf16(&units));
        assert!(!ByteView::from("\u{FFFD}").eq_utf16(&[0xD83D]));

        let long = "x".repeat(400);
        let mut long_units: Vec<u16> = long.encode_utf16().collect();
        *long_units.last_mut().unwrap() = u16::from(b'y');
        assert!(!ByteView::from(&long).eq_utf16(&long_units));
    }

    #[test]
    fn owned_and_borrowed_hash_alike() {
        let owned = Utf8Array::from("The quick brown fox jumps over the lazy dog");
        let view = owned.as_view();
        assert_eq!(owned.hash32(), view.hash32());
        assert_eq!(owned, view);
        assert_eq!(view, owned);

        let state = RandomState::new();
        assert_eq!(state.hash_one(&owned), state.hash_one(view));
    }

    #[test]
    fn display_is_lossy_utf8() {
        let bytes = [b'a', 0xFF, b'b'];
        let view = ByteView::from(&bytes);
        assert_eq!(format!("{view}"), "a\u{FFFD}b");
        assert_eq!(format!("{view:?}"), "\"a\\xFFb\"");
    }

    #[test]
    fn to_str_reports_offset() {
        let bytes = [b'a', b'b', 0xC3];
        let err = ByteView::from(&bytes).to_str().unwrap_err();
        assert_eq!(err, Error::format(SyntaxError::InvalidUtf8, 2));
        assert_eq!(ByteView::from("aα").to_str().unwrap(), "aα");
    }
}
