use alloc::{string::String, vec::Vec};

use quickcheck::QuickCheck;

use super::arbitrary::{Value, equivalent, read_document, write_value};
use crate::{JsonWriter, NumericValue, WriterOptions, parse_number, unescape_to_string};

fn tests() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

/// Property: whatever the writer emits is valid JSON and reads back as the
/// value that was written.
#[test]
fn write_then_read_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(value: Value, escape_forward_slash: bool) -> bool {
        let mut writer = JsonWriter::with_options(WriterOptions {
            initial_capacity: 16,
            escape_forward_slash,
        });
        write_value(&value, &mut writer);
        let json = writer.into_inner();

        if serde_json::from_slice::<serde_json::Value>(&json).is_err() {
            return false;
        }
        match read_document(&json) {
            Ok(read) => equivalent(&value, &read),
            Err(_) => false,
        }
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Value, bool) -> bool);
}

/// Property: string escaping agrees with serde_json's reading of it.
#[test]
fn escaped_strings_match_serde_json_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String) -> bool {
        let mut writer = JsonWriter::new(text.len() + 2);
        writer.write_value(text.as_str());
        let json = writer.result();
        let decoded: Result<String, _> = serde_json::from_slice(json.as_bytes());
        let raw = json.substring(1, json.len() - 2);
        decoded.is_ok_and(|decoded| decoded == text)
            && unescape_to_string(raw).is_ok_and(|unescaped| unescaped == text)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(String) -> bool);
}

/// Property: UTF-16 input encodes to the same bytes as the equivalent `&str`.
#[test]
fn utf16_and_utf8_text_agree_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(text: String) -> bool {
        let units: Vec<u16> = text.encode_utf16().collect();
        let mut from_utf8 = JsonWriter::default();
        from_utf8.write_property(text.as_str(), text.as_str());
        let mut from_utf16 = JsonWriter::default();
        from_utf16.write_property(units.as_slice(), units.as_slice());
        from_utf8.result() == from_utf16.result()
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(String) -> bool);
}

/// Property: integers written by the writer parse back to the same value.
#[test]
fn integers_roundtrip_quickcheck() {
    fn prop(signed: i64, unsigned: u64, small: i8) -> bool {
        let text = |value: NumericValue| {
            let mut writer = JsonWriter::new(24);
            writer.write_value(value);
            writer.into_inner()
        };
        let parsed_signed = parse_number(text(signed.into()).as_slice());
        let parsed_unsigned = parse_number(text(unsigned.into()).as_slice());
        let parsed_small = parse_number(text(small.into()).as_slice());

        parsed_signed == Ok(NumericValue::I64(signed))
            && parsed_unsigned.is_ok_and(|v| u64::try_from(v) == Ok(unsigned))
            && parsed_small.is_ok_and(|v| i8::try_from(v) == Ok(small))
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(i64, u64, i8) -> bool);
}
