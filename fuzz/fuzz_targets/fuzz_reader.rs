#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};
use utf8json::{JsonReader, JsonWriter, TokenType, ValueType, WriterOptions, unescape};

const HEADER: usize = 1; // flags

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Leading blanks the reader trims; only the ASCII ones may appear between
/// tokens.
static LEADING_WS_TABLE: &[&[u8]] = &[
    b" ",
    b"\t",
    b"\n",
    b"\r",
    "\u{FEFF}".as_bytes(),
    "\u{00A0}".as_bytes(),
    "\u{2028}".as_bytes(),
    "\u{3000}".as_bytes(),
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x03);
        let mut prefix = HEADER;
        let limit = max_size - prefix;
        prefix += append_whitespace(&mut data[prefix..], limit);
        let limit = max_size - prefix;
        prefix += append_value(&mut data[prefix..], size, limit);
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Appends up to eight leading blanks without exceeding `limit`.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }
        let n_codepoints = rng.random_range(1..=limit.min(8));
        let mut written = 0;
        for _ in 0..n_codepoints {
            let w = LEADING_WS_TABLE[rng.random_range(0..LEADING_WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..=size * 2 + 1).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("serializable value");
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            _ => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
        };
        Ok(ArbitraryValue(value))
    }
}

/// Walks every token. Strings that unescape to valid UTF-8 are re-emitted
/// through the writer, whose output must be valid JSON.
fn reader(data: &[u8]) {
    let Some((&flags, data)) = data.split_first() else {
        return;
    };
    let consume = flags & 1 != 0;
    let mut writer = JsonWriter::with_options(WriterOptions {
        escape_forward_slash: flags & 2 != 0,
        ..WriterOptions::default()
    });
    writer.begin_array();

    let mut reader = JsonReader::new(data);
    while let Ok(true) = reader.read() {
        let text = match reader.token_type() {
            TokenType::PropertyName if consume => reader.get_property_name(),
            TokenType::Value if consume => match reader.peek_value_type() {
                Ok(ValueType::String) => reader.get_value(),
                Ok(_) => continue,
                Err(_) => break,
            },
            _ => continue,
        };
        let Ok(text) = text else { break };
        assert!(reader.position() <= data.len());
        if let Ok(unescaped) = unescape(text)
            && unescaped.as_view().to_str().is_ok()
        {
            writer.write_element(&unescaped);
        }
    }

    writer.end_array();
    serde_json::from_slice::<Value>(writer.result().as_bytes()).expect("writer output is JSON");
}

fuzz_target!(|data: &[u8]| reader(data));
