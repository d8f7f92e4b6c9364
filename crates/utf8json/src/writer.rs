use alloc::{string::String, vec, vec::Vec};

use crate::{
    buffer::ByteBuffer,
    float::DecimalDigits,
    literal::Literal,
    number::NumericValue,
    options::WriterOptions,
    view::{ByteView, Utf8Array},
};

/// String content for the writer, either UTF-8 or UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text<'a> {
    /// UTF-8 bytes, written as they are apart from escapes.
    Utf8(ByteView<'a>),
    /// UTF-16 code units, re-encoded as UTF-8. Unpaired surrogates are
    /// written as U+FFFD.
    Utf16(&'a [u16]),
}

impl<'a> From<ByteView<'a>> for Text<'a> {
    fn from(view: ByteView<'a>) -> Self {
        Self::Utf8(view)
    }
}

impl<'a> From<&'a str> for Text<'a> {
    fn from(text: &'a str) -> Self {
        Self::Utf8(ByteView::from(text))
    }
}

impl<'a> From<&'a String> for Text<'a> {
    fn from(text: &'a String) -> Self {
        Self::Utf8(ByteView::from(text))
    }
}

impl<'a> From<&'a Utf8Array> for Text<'a> {
    fn from(text: &'a Utf8Array) -> Self {
        Self::Utf8(text.as_view())
    }
}

impl<'a> From<&'a [u16]> for Text<'a> {
    fn from(units: &'a [u16]) -> Self {
        Self::Utf16(units)
    }
}

/// Anything [`JsonWriter::write_value`] accepts: a number, boolean or null,
/// or a string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// Written as bare JSON text.
    Number(NumericValue),
    /// Written quoted and escaped.
    Text(Text<'a>),
}

impl From<NumericValue> for Scalar<'_> {
    fn from(value: NumericValue) -> Self {
        Self::Number(value)
    }
}

impl<'a> From<Text<'a>> for Scalar<'a> {
    fn from(text: Text<'a>) -> Self {
        Self::Text(text)
    }
}

macro_rules! scalar_from_number {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Scalar<'_> {
            fn from(value: $ty) -> Self {
                Self::Number(NumericValue::from(value))
            }
        }

        impl From<Option<$ty>> for Scalar<'_> {
            fn from(value: Option<$ty>) -> Self {
                Self::Number(NumericValue::from(value))
            }
        }
    )*};
}

scalar_from_number!(bool, u8, i8, i16, u16, i32, u32, i64, u64, f32, f64);

impl<'a> From<ByteView<'a>> for Scalar<'a> {
    fn from(view: ByteView<'a>) -> Self {
        Self::Text(Text::Utf8(view))
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(Text::from(text))
    }
}

impl<'a> From<&'a String> for Scalar<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(Text::from(text))
    }
}

impl<'a> From<&'a Utf8Array> for Scalar<'a> {
    fn from(text: &'a Utf8Array) -> Self {
        Self::Text(Text::from(text))
    }
}

impl<'a> From<&'a [u16]> for Scalar<'a> {
    fn from(units: &'a [u16]) -> Self {
        Self::Text(Text::Utf16(units))
    }
}

/// Short escape for a byte, if JSON has one.
const fn short_escape(byte: u8) -> Option<u8> {
    Some(match byte {
        b'"' => b'"',
        b'\\' => b'\\',
        0x08 => b'b',
        0x0C => b'f',
        b'\n' => b'n',
        b'\r' => b'r',
        b'\t' => b't',
        _ => return None,
    })
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

const DISCRIMINATOR: &str = "discriminator";

/// Incremental JSON emitter writing into a growable buffer.
///
/// The writer does not validate the sequence of calls; it inserts commas
/// only through [`separator`](Self::separator) (directly or via
/// [`write_property`](Self::write_property) and
/// [`write_element`](Self::write_element)). Each open container keeps its own
/// "item written" flag, so a comma is emitted correctly after a nested
/// container closes.
///
/// ```rust
/// use utf8json::JsonWriter;
///
/// let mut writer = JsonWriter::new(64);
/// writer.begin_object();
/// writer.separator();
/// writer.write_key("list");
/// writer.begin_array();
/// writer.write_element(1_u8);
/// writer.write_element(2.5_f64);
/// writer.write_element("x\ny");
/// writer.end_array();
/// writer.write_property("ok", true);
/// writer.end_object();
/// assert_eq!(writer.result(), r#"{"list":[1,2.5,"x\ny"],"ok":true}"#);
/// ```
#[derive(Debug, Clone)]
pub struct JsonWriter {
    buffer: ByteBuffer,
    options: WriterOptions,
    /// One flag per nesting level, the root level first.
    item_written: Vec<bool>,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::with_options(WriterOptions::default())
    }
}

impl JsonWriter {
    /// Creates a writer reserving `capacity` bytes up front.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_options(WriterOptions {
            initial_capacity: capacity,
            ..WriterOptions::default()
        })
    }

    /// Creates a writer with the given options.
    #[must_use]
    pub fn with_options(options: WriterOptions) -> Self {
        Self {
            buffer: ByteBuffer::with_capacity(options.initial_capacity),
            options,
            item_written: vec![false],
        }
    }

    /// Writes `{` and opens a nesting level.
    pub fn begin_object(&mut self) {
        self.buffer.push(b'{');
        self.item_written.push(false);
    }

    /// Writes `{` followed by a `"discriminator":N` member, the tag that
    /// selects the concrete type of a polymorphic record.
    ///
    /// The member counts as the object's first item, so the next
    /// [`write_property`](Self::write_property) is preceded by a comma.
    ///
    /// ```rust
    /// use utf8json::JsonWriter;
    ///
    /// let mut writer = JsonWriter::new(32);
    /// writer.begin_object_with_discriminator(3);
    /// writer.write_property("Id", 1_u8);
    /// writer.end_object();
    /// assert_eq!(writer.result(), r#"{"discriminator":3,"Id":1}"#);
    /// ```
    pub fn begin_object_with_discriminator(&mut self, discriminator: i32) {
        self.begin_object();
        self.write_property(DISCRIMINATOR, discriminator);
    }

    /// Writes `}` and closes the current nesting level.
    pub fn end_object(&mut self) {
        self.close_level();
        self.buffer.push(b'}');
    }

    /// Writes `[` and opens a nesting level.
    pub fn begin_array(&mut self) {
        self.buffer.push(b'[');
        self.item_written.push(false);
    }

    /// Writes `]` and closes the current nesting level.
    pub fn end_array(&mut self) {
        self.close_level();
        self.buffer.push(b']');
    }

    fn close_level(&mut self) {
        if self.item_written.len() > 1 {
            self.item_written.pop();
        }
    }

    /// Writes `,` unless this is the first item of the current level, and
    /// marks the level as having an item.
    pub fn separator(&mut self) {
        if let Some(written) = self.item_written.last_mut() {
            if *written {
                self.buffer.push(b',');
            }
            *written = true;
        }
    }

    /// Writes a quoted, escaped name followed by `:`.
    pub fn write_key<'a>(&mut self, name: impl Into<Text<'a>>) {
        self.write_text(name.into());
        self.buffer.push(b':');
    }

    /// Writes a scalar value.
    ///
    /// Non-finite floats are written as `NaN`, `∞` and `-∞`. That text is
    /// not JSON: [`JsonReader`](crate::JsonReader) and other parsers reject
    /// it, so map such values to `null` or a string first if the output
    /// has to be read back.
    pub fn write_value<'a>(&mut self, value: impl Into<Scalar<'a>>) {
        match value.into() {
            Scalar::Number(number) => self.write_number(number),
            Scalar::Text(text) => self.write_text(text),
        }
    }

    /// Writes `separator`, `key` and `value`.
    pub fn write_property<'k, 'v>(&mut self, key: impl Into<Text<'k>>, value: impl Into<Scalar<'v>>) {
        self.separator();
        self.write_key(key);
        self.write_value(value);
    }

    /// Writes `separator` and `value`, for array elements.
    pub fn write_element<'a>(&mut self, value: impl Into<Scalar<'a>>) {
        self.separator();
        self.write_value(value);
    }

    /// Writes `null`.
    pub fn write_null(&mut self) {
        self.buffer.append(Literal::Null.as_str().as_bytes());
    }

    /// Writes `true` or `false`.
    pub fn write_bool(&mut self, value: bool) {
        let literal = if value { Literal::True } else { Literal::False };
        self.buffer.append(literal.as_str().as_bytes());
    }

    /// The bytes written so far.
    #[must_use]
    pub fn result(&self) -> ByteView<'_> {
        self.buffer.as_view()
    }

    /// Consumes the writer, returning its output.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer.into_vec()
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// `true` when nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn write_number(&mut self, value: NumericValue) {
        match value {
            NumericValue::Null => self.write_null(),
            NumericValue::Bool(b) => self.write_bool(b),
            NumericValue::U8(v) => self.write_unsigned(u64::from(v)),
            NumericValue::U16(v) => self.write_unsigned(u64::from(v)),
            NumericValue::U32(v) => self.write_unsigned(u64::from(v)),
            NumericValue::U64(v) => self.write_unsigned(v),
            NumericValue::I8(v) => self.write_signed(i64::from(v)),
            NumericValue::I16(v) => self.write_signed(i64::from(v)),
            NumericValue::I32(v) => self.write_signed(i64::from(v)),
            NumericValue::I64(v) => self.write_signed(v),
            NumericValue::F32(v) => self.write_float(DecimalDigits::from_f32(v)),
            NumericValue::F64(v) => self.write_float(DecimalDigits::from_f64(v)),
        }
    }

    fn write_signed(&mut self, value: i64) {
        if value < 0 {
            self.buffer.push(b'-');
        }
        self.write_unsigned(value.unsigned_abs());
    }

    /// Fills reserved space back to front by repeated division.
    #[allow(clippy::cast_possible_truncation)]
    fn write_unsigned(&mut self, mut value: u64) {
        let digits = value.checked_ilog10().map_or(1, |log| log as usize + 1);
        for slot in self.buffer.extend(digits).iter_mut().rev() {
            *slot = b'0' + (value % 10) as u8;
            value /= 10;
        }
    }

    fn write_float(&mut self, digits: DecimalDigits) {
        let mut text = [0_u8; DecimalDigits::MAX_CHARS];
        let len = digits.format(&mut text);
        self.buffer.append(&text[..len]);
    }

    fn write_text(&mut self, text: Text<'_>) {
        self.buffer.push(b'"');
        match text {
            Text::Utf8(view) => self.write_escaped(view.as_bytes()),
            Text::Utf16(units) => {
                let mut scratch = [0_u8; 4];
                for c in char::decode_utf16(units.iter().copied()) {
                    let c = c.unwrap_or(char::REPLACEMENT_CHARACTER);
                    self.write_escaped(c.encode_utf8(&mut scratch).as_bytes());
                }
            }
        }
        self.buffer.push(b'"');
    }

    /// Copies `bytes`, escaping quotes, backslashes and control bytes.
    fn write_escaped(&mut self, bytes: &[u8]) {
        let mut plain_from = 0;
        for (index, &byte) in bytes.iter().enumerate() {
            let escape_slash = byte == b'/' && self.options.escape_forward_slash;
            if byte >= 0x20 && byte != b'"' && byte != b'\\' && !escape_slash {
                continue;
            }
            self.buffer.append(&bytes[plain_from..index]);
            plain_from = index + 1;
            match short_escape(byte) {
                Some(letter) => self.buffer.append(&[b'\\', letter]),
                None if escape_slash => self.buffer.append(b"\\/"),
                None => self.buffer.append(&[
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX_DIGITS[usize::from(byte >> 4)],
                    HEX_DIGITS[usize::from(byte & 0xF)],
                ]),
            }
        }
        self.buffer.append(&bytes[plain_from..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut JsonWriter)) -> String {
        let mut writer = JsonWriter::new(8);
        f(&mut writer);
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn nested_containers_keep_parent_separator_state() {
        let json = written(|w| {
            w.begin_array();
            w.separator();
            w.begin_object();
            w.write_property("a", 1_i32);
            w.separator();
            w.write_key("b");
            w.begin_array();
            w.end_array();
            w.end_object();
            w.separator();
            w.begin_object();
            w.end_object();
            w.write_element(Option::<u8>::None);
            w.end_array();
        });
        assert_eq!(json, r#"[{"a":1,"b":[]},{},null]"#);
    }

    #[test]
    fn integers_at_the_limits() {
        let json = written(|w| {
            w.begin_array();
            w.write_element(i64::MIN);
            w.write_element(i64::MAX);
            w.write_element(u64::MAX);
            w.write_element(0_u8);
            w.write_element(-7_i8);
            w.write_element(10_u16);
            w.end_array();
        });
        assert_eq!(
            json,
            "[-9223372036854775808,9223372036854775807,18446744073709551615,0,-7,10]"
        );
    }

    #[test]
    fn floats_use_shortest_text() {
        let json = written(|w| {
            w.begin_array();
            w.write_element(0.1_f64);
            w.write_element(0.1_f32);
            w.write_element(1.23e-10_f64);
            w.write_element(-0.0_f64);
            w.write_element(1e21_f64);
            w.end_array();
        });
        assert_eq!(json, "[0.1,0.1,1.23E-10,-0,1E+21]");
    }

    #[test]
    fn escapes_control_characters() {
        let json = written(|w| w.write_value("\"\\\u{8}\u{c}\n\r\t\u{1}\u{1f}/é"));
        assert_eq!(json, r#""\"\\\b\f\n\r\t\u0001\u001f/é""#);
    }

    #[test]
    fn escapes_forward_slash_when_asked() {
        let mut writer = JsonWriter::with_options(WriterOptions {
            escape_forward_slash: true,
            ..WriterOptions::default()
        });
        writer.write_value("</script>");
        assert_eq!(writer.result(), r#""<\/script>""#);
    }

    #[test]
    fn utf16_text_is_reencoded() {
        let units: Vec<u16> = "aá🐈\"".encode_utf16().collect();
        let json = written(|w| w.write_property(units.as_slice(), units.as_slice()));
        assert_eq!(json, "\"aá🐈\\\"\":\"aá🐈\\\"\"");

        let lone: [u16; 3] = [0x61, 0xD83D, 0x62];
        let json = written(|w| w.write_value(&lone[..]));
        assert_eq!(json, "\"a\u{FFFD}b\"");
    }

    #[test]
    fn discriminator_leads_the_object() {
        let json = written(|w| {
            w.begin_array();
            w.separator();
            w.begin_object_with_discriminator(-2);
            w.write_property("a", true);
            w.end_object();
            w.separator();
            w.begin_object_with_discriminator(0);
            w.end_object();
            w.end_array();
        });
        assert_eq!(json, r#"[{"discriminator":-2,"a":true},{"discriminator":0}]"#);
    }

    #[test]
    fn non_finite_floats_are_not_json() {
        let json = written(|w| {
            w.begin_array();
            w.write_element(f64::NAN);
            w.write_element(f64::INFINITY);
            w.write_element(f32::NEG_INFINITY);
            w.end_array();
        });
        assert_eq!(json, "[NaN,∞,-∞]");

        let mut reader = crate::JsonReader::new(json.as_str());
        assert!(reader.read().unwrap());
        assert!(reader.read().is_err());
    }

    #[test]
    fn stray_end_does_not_underflow() {
        let json = written(|w| {
            w.end_object();
            w.write_element(1_u8);
            w.write_element(2_u8);
        });
        assert_eq!(json, "}1,2");
    }
}
