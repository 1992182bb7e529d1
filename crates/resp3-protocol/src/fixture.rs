//! Human-readable fixture notation for wire bytes.
//!
//! Test fixtures write frames as plain text in which `<CR>` and `<LF>` are
//! the only way to introduce CR and LF; literal whitespace (spaces, tabs,
//! raw CR, raw LF) is layout and gets stripped. This is a test
//! convenience, not part of the wire contract.
//!
//! ```
//! use resp3_core::Value;
//! use resp3_protocol::fixture::read_fixture;
//!
//! let value = read_fixture(
//!     "*2<CR><LF>
//!        :1<CR><LF>
//!        #t<CR><LF>",
//! )
//! .unwrap();
//! assert_eq!(value, Value::Array(vec![Value::Integer(1), Value::Boolean(true)]));
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use resp3_core::{Result, Value};

use crate::reader::read_from_bytes;

/// Convert fixture text to wire bytes.
///
/// Strips literal whitespace, substitutes `<CR>`/`<LF>`, and encodes the
/// result one byte per character (latin-1).
///
/// # Panics
///
/// Panics on characters above U+00FF; fixture text is latin-1 only.
pub fn wire_bytes(text: &str) -> Bytes {
    let mut stripped = String::with_capacity(text.len());
    for ch in text.chars() {
        if !matches!(ch, ' ' | '\t' | '\r' | '\n') {
            stripped.push(ch);
        }
    }
    let substituted = stripped.replace("<CR>", "\r").replace("<LF>", "\n");

    let mut wire = BytesMut::with_capacity(substituted.len());
    for ch in substituted.chars() {
        let code = u32::from(ch);
        assert!(code <= 0xFF, "fixture text is latin-1 only, found {ch:?}");
        wire.put_u8(code as u8);
    }
    wire.freeze()
}

/// Decode one frame from fixture text.
pub fn read_fixture(text: &str) -> Result<Value> {
    read_from_bytes(wire_bytes(text))
}
