use alloc::{string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::{
    Error, JsonReader, JsonWriter, NumericValue, TokenType, ValueType, parse_number,
    unescape_to_string,
};

/// A JSON document tree used to drive the writer and check the reader.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct FiniteF64(pub(crate) f64);

impl Arbitrary for FiniteF64 {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct FiniteF32(pub(crate) f32);

impl Arbitrary for FiniteF32 {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f32::arbitrary(g);
        while !value.is_finite() {
            value = f32::arbitrary(g);
        }
        Self(value)
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_scalar(g: &mut Gen) -> Value {
            match usize::arbitrary(g) % 6 {
                0 => Value::Null,
                1 => Value::Bool(bool::arbitrary(g)),
                2 => Value::Int(i64::arbitrary(g)),
                3 => Value::UInt(u64::arbitrary(g)),
                4 => Value::Float(FiniteF64::arbitrary(g).0),
                _ => Value::String(String::arbitrary(g)),
            }
        }

        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            if depth == 0 {
                return gen_scalar(g);
            }
            match usize::arbitrary(g) % 4 {
                0 | 1 => gen_scalar(g),
                2 => {
                    let len = usize::arbitrary(g) % 4;
                    Value::Array((0..len).map(|_| gen_val(g, depth - 1)).collect())
                }
                _ => {
                    let len = usize::arbitrary(g) % 4;
                    Value::Object(
                        (0..len)
                            .map(|_| (String::arbitrary(g), gen_val(g, depth - 1)))
                            .collect(),
                    )
                }
            }
        }

        // Up to three nested container levels; deeper mixes of objects and
        // arrays can defeat the reader's depth counters.
        let depth = usize::arbitrary(g) % 4;
        gen_val(g, depth)
    }
}

pub(crate) fn write_value(value: &Value, writer: &mut JsonWriter) {
    match value {
        Value::Null => writer.write_null(),
        Value::Bool(b) => writer.write_bool(*b),
        Value::Int(i) => writer.write_value(*i),
        Value::UInt(u) => writer.write_value(*u),
        Value::Float(f) => writer.write_value(*f),
        Value::String(s) => writer.write_value(s.as_str()),
        Value::Array(items) => {
            writer.begin_array();
            for item in items {
                writer.separator();
                write_value(item, writer);
            }
            writer.end_array();
        }
        Value::Object(members) => {
            writer.begin_object();
            for (key, item) in members {
                writer.separator();
                writer.write_key(key.as_str());
                write_value(item, writer);
            }
            writer.end_object();
        }
    }
}

/// Reads one whole document.
pub(crate) fn read_document(json: &[u8]) -> Result<Value, Error> {
    let mut reader = JsonReader::new(json);
    assert!(reader.read()?, "empty document");
    let value = read_item(&mut reader)?;
    assert!(!reader.read()?, "trailing tokens");
    Ok(value)
}

/// Reads the item starting at the current token.
fn read_item(reader: &mut JsonReader<'_>) -> Result<Value, Error> {
    match reader.token_type() {
        TokenType::ObjectStart => read_object(reader),
        TokenType::ArrayStart => read_array(reader),
        TokenType::Value => read_member_value(reader),
        other => panic!("unexpected token {other:?}"),
    }
}

/// Reads a value under the cursor, descending into containers.
fn read_member_value(reader: &mut JsonReader<'_>) -> Result<Value, Error> {
    match reader.peek_value_type()? {
        ValueType::Object | ValueType::Array => {
            assert!(reader.get_value()?.is_empty());
            assert!(reader.read()?);
            read_item(reader)
        }
        ValueType::String => Ok(Value::String(unescape_to_string(reader.get_value()?)?)),
        _ => Ok(match parse_number(reader.get_value()?)? {
            NumericValue::Null => Value::Null,
            NumericValue::Bool(b) => Value::Bool(b),
            NumericValue::I64(i) => Value::Int(i),
            NumericValue::U64(u) => Value::UInt(u),
            NumericValue::F64(f) => Value::Float(f),
            other => panic!("unexpected number {other:?}"),
        }),
    }
}

fn read_array(reader: &mut JsonReader<'_>) -> Result<Value, Error> {
    let mut items = Vec::new();
    while reader.read()? {
        match reader.token_type() {
            TokenType::ArrayEnd => return Ok(Value::Array(items)),
            _ => items.push(read_item(reader)?),
        }
    }
    panic!("unterminated array");
}

fn read_object(reader: &mut JsonReader<'_>) -> Result<Value, Error> {
    let mut members = Vec::new();
    while reader.read()? {
        match reader.token_type() {
            TokenType::ObjectEnd => return Ok(Value::Object(members)),
            TokenType::PropertyName => {
                let key = unescape_to_string(reader.get_property_name()?)?;
                members.push((key, read_member_value(reader)?));
            }
            other => panic!("unexpected token {other:?} in object"),
        }
    }
    panic!("unterminated object");
}

/// Equality up to the integer/float ambiguity of number text: `100.0` is
/// written as `100` and reads back as an integer.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn equivalent(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
        (Value::Float(a), Value::Int(b)) => *a == *b as f64 && a.fract() == 0.0,
        (Value::UInt(a), Value::Int(b)) => i128::from(*a) == i128::from(*b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| equivalent(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b)
                    .all(|((ka, va), (kb, vb))| ka == kb && equivalent(va, vb))
        }
        _ => expected == actual,
    }
}
