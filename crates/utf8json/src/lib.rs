//! Zero-copy JSON reading and writing directly over UTF-8 byte buffers.
//!
//! The crate is built from three layers:
//!
//! - [`ByteView`], a borrowed window over UTF-8 bytes with code point aware
//!   helpers ([`ByteView::codepoints`], [`ByteView::trim_leading_whitespace`])
//!   and equality against native text, including UTF-16 code units.
//! - Number text: [`DecimalDigits`] produces the shortest decimal string that
//!   round-trips an `f64`/`f32` (Grisu3 over a cached table of powers of ten),
//!   and [`parse_number`] turns literal bytes back into a [`NumericValue`].
//! - [`JsonReader`], a pull tokenizer handing out [`ByteView`] slices of the
//!   source, and [`JsonWriter`], its incremental mirror.
//!
//! ```rust
//! use utf8json::{JsonReader, JsonWriter, NumericValue, TokenType, parse_number};
//!
//! let mut writer = JsonWriter::new(64);
//! writer.begin_object();
//! writer.write_property("Id", 42_i64);
//! writer.write_property("Name", "aáα");
//! writer.end_object();
//! assert_eq!(writer.result(), r#"{"Id":42,"Name":"aáα"}"#);
//!
//! let mut reader = JsonReader::new(writer.result());
//! assert!(reader.read().unwrap());
//! assert_eq!(reader.token_type(), TokenType::ObjectStart);
//! assert!(reader.read().unwrap());
//! assert_eq!(reader.get_property_name().unwrap(), "Id");
//! let id = parse_number(reader.get_value().unwrap()).unwrap();
//! assert_eq!(id, NumericValue::I64(42));
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod error;
mod escape_buffer;
mod float;
mod hash;
mod literal;
mod number;
mod options;
mod reader;
mod utf8;
mod view;
mod writer;

#[cfg(test)]
mod tests;

pub use buffer::ByteBuffer;
pub use error::{Error, SyntaxError};
pub use escape_buffer::{unescape, unescape_to_string};
pub use float::{DecimalDigits, DiyFp};
pub use hash::farm_hash32;
pub use literal::{Literal, equals_false, equals_null, equals_true};
pub use number::{NumberKind, NumericValue, parse_float, parse_int, parse_number};
pub use options::WriterOptions;
pub use reader::{JsonReader, TokenType, ValueType};
pub use utf8::{CodePoints, Utf16CodePoints, codepoint_count, decode_one, encode_utf8};
pub use view::{ByteView, Utf8Array, is_whitespace};
pub use writer::{JsonWriter, Scalar, Text};
