//! Streaming frame reader for the RESP3 wire protocol.
//!
//! A [`Reader`] decodes one [`Value`] per [`Reader::read`] call from a
//! [`ByteSource`], recursing through aggregate frames and routing push
//! frames to a caller-supplied [`PushSink`].
//!
//! # Dispatch
//!
//! Every frame opens with a one-byte type code. `read` peeks that byte and
//! selects the matching decoder from a closed `match`; the set of codes is
//! fixed by the protocol and never extended at runtime. Each decoder then
//! consumes the code byte, the header (a size or lexeme, where the kind has
//! one), the payload, and the trailing CR LF, in that order. Aggregate
//! decoders re-enter the dispatcher once per child, so children land in
//! their container in wire order.
//!
//! # Incomplete input
//!
//! Decoding over a buffer that may hold only part of a frame is the normal
//! case on a byte stream. Every scanner and decoder therefore returns
//! `Result<Step<T>>`:
//!
//! - `Ok(Step::Ready(v))` — a complete element was decoded.
//! - `Ok(Step::Incomplete)` — not enough input is buffered yet. Only
//!   produced by readers configured with
//!   [`Reader::with_incomplete_input`]; without it, short input is an
//!   [`Error::EndOfInput`].
//! - `Err(e)` — the input did not match the grammar, or the reader hit a
//!   resource limit. Errors are terminal: the position in the source is
//!   undefined afterwards and the reader is poisoned for further framed
//!   decoding.
//!
//! `Incomplete` propagates unchanged through every composition point, so
//! the same decoder code serves both blocking callers (strict mode over a
//! [`crate::source::ReadSource`]) and retry-driven callers such as
//! [`crate::codec::Resp3Codec`]. No parser state survives an `Incomplete`
//! return; callers retry by presenting a buffer that starts at the same
//! frame boundary with more bytes appended.
//!
//! # Push frames
//!
//! `>` frames are out-of-band notifications, not values. The reader
//! validates them (non-empty, bytes-typed tag), hands the payload to the
//! configured sink synchronously, and continues with the next frame, so a
//! single `read` call can consume any number of push frames before
//! returning a value. Pushes are delivered in wire order, before decoding
//! resumes.
//!
//! # Example
//!
//! ```
//! use resp3_core::Value;
//! use resp3_protocol::reader::read_from_bytes;
//!
//! let value = read_from_bytes(&b"*2\r\n:1\r\n#t\r\n"[..]).unwrap();
//! assert_eq!(
//!     value,
//!     Value::Array(vec![Value::Integer(1), Value::Boolean(true)]),
//! );
//! ```

use bytes::Bytes;
use num_bigint::BigInt;
use resp3_core::constants::{
    CODE_ARRAY, CODE_ATTRIBUTE, CODE_BIG_NUMBER, CODE_BLOB_ERROR, CODE_BLOB_STRING, CODE_BOOLEAN,
    CODE_DOUBLE, CODE_INTEGER, CODE_MAP, CODE_NULL, CODE_PUSH, CODE_SET, CODE_SIMPLE_ERROR,
    CODE_SIMPLE_STRING, CODE_VERBATIM_STRING, CRLF, MAX_BIGNUM_LEXEME, MAX_BLOB_LENGTH,
    MAX_BOOLEAN_LEXEME, MAX_DOUBLE_LEXEME, MAX_INT_LEXEME, MAX_NESTING_DEPTH,
};
use resp3_core::{Attribute, Error, Result, Value};

use crate::source::{ByteSource, BytesSource};

/// Outcome of a decode attempt over possibly-incomplete input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    /// A complete element was decoded.
    Ready(T),

    /// Not enough input is buffered yet; retry after feeding more bytes.
    Incomplete,
}

impl<T> Step<T> {
    /// The decoded element, or `None` for [`Step::Incomplete`].
    pub fn ready(self) -> Option<T> {
        match self {
            Step::Ready(value) => Some(value),
            Step::Incomplete => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Step::Ready(_))
    }
}

/// Unwrap `Step::Ready`, propagating `Step::Incomplete` (and errors) to the
/// caller unchanged.
macro_rules! ready {
    ($expr:expr) => {
        match $expr? {
            Step::Ready(value) => value,
            Step::Incomplete => return Ok(Step::Incomplete),
        }
    };
}

/// Receiver for out-of-band push frames.
///
/// The sink runs synchronously on the decoding caller, before decoding
/// resumes; it must not re-enter the reader it was installed on. Any
/// `FnMut(Vec<Value>)` closure is a sink.
pub trait PushSink {
    fn on_push(&mut self, frame: Vec<Value>);
}

impl<F: FnMut(Vec<Value>)> PushSink for F {
    fn on_push(&mut self, frame: Vec<Value>) {
        self(frame)
    }
}

/// Stateful RESP3 frame reader over a [`ByteSource`].
///
/// One reader owns one stream-consumption session. By default short input
/// raises [`Error::EndOfInput`]; [`Reader::with_incomplete_input`] switches
/// shortness to [`Step::Incomplete`] for callers that buffer and retry.
///
/// # Example
/// ```
/// use resp3_core::Value;
/// use resp3_protocol::{BytesSource, Reader, Step};
///
/// let mut reader = Reader::new(BytesSource::new(&b":-42\r\n"[..]));
/// assert_eq!(reader.read().unwrap(), Step::Ready(Value::Integer(-42)));
/// ```
pub struct Reader<S> {
    source: S,
    incomplete_input: bool,
    sink: Option<Box<dyn PushSink>>,
    depth: usize,
}

impl<S: ByteSource> Reader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            incomplete_input: false,
            sink: None,
            depth: 0,
        }
    }

    /// Yield [`Step::Incomplete`] on short input instead of raising
    /// [`Error::EndOfInput`].
    pub fn with_incomplete_input(mut self) -> Self {
        self.incomplete_input = true;
        self
    }

    /// Install the receiver for push frames.
    ///
    /// Without a sink, decoding a push frame fails with
    /// [`Error::NoPushHandler`].
    pub fn with_push_sink(mut self, sink: impl PushSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Decode the next frame.
    ///
    /// Push frames encountered along the way are routed to the sink; the
    /// returned value is always a regular frame.
    pub fn read(&mut self) -> Result<Step<Value>> {
        self.depth = 0;
        self.read_frame()
    }

    fn read_frame(&mut self) -> Result<Step<Value>> {
        // Pushes are consumed iteratively so a run of them cannot grow the
        // call stack.
        loop {
            let Some(code) = self.peek_byte()? else {
                return self.missing("frame type code");
            };
            if code == CODE_PUSH {
                ready!(self.consume_push());
                continue;
            }
            return match code {
                CODE_BLOB_STRING => {
                    self.read_blob_kind(CODE_BLOB_STRING, "blob string", Value::Blob)
                }
                CODE_BLOB_ERROR => {
                    self.read_blob_kind(CODE_BLOB_ERROR, "blob error", Value::BlobError)
                }
                CODE_VERBATIM_STRING => {
                    self.read_blob_kind(CODE_VERBATIM_STRING, "verbatim string", Value::Verbatim)
                }
                CODE_SIMPLE_STRING => {
                    self.read_simple_kind(CODE_SIMPLE_STRING, "simple string", Value::Simple)
                }
                CODE_SIMPLE_ERROR => {
                    self.read_simple_kind(CODE_SIMPLE_ERROR, "simple error", Value::SimpleError)
                }
                CODE_INTEGER => self.read_integer(),
                CODE_DOUBLE => self.read_double(),
                CODE_NULL => self.read_null(),
                CODE_BOOLEAN => self.read_boolean(),
                CODE_BIG_NUMBER => self.read_big_number(),
                CODE_ARRAY => self.read_array(),
                CODE_SET => self.read_set(),
                CODE_MAP => self.read_map(),
                CODE_ATTRIBUTE => self.read_attribute(),
                other => Err(Error::unexpected("frame type code", &[other])),
            };
        }
    }

    // ------------------------------------------------------------------
    // Low-level scanners
    // ------------------------------------------------------------------

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.source.peek(1)?.first().copied())
    }

    /// Short-input outcome: `Incomplete` when configured, `EndOfInput`
    /// otherwise.
    fn missing<T>(&self, expected: &str) -> Result<Step<T>> {
        if self.incomplete_input {
            Ok(Step::Incomplete)
        } else {
            Err(Error::end_of_input(expected))
        }
    }

    /// Consume exactly `want`, failing with `Unexpected` on mismatch.
    fn expect(&mut self, label: &str, want: &[u8]) -> Result<Step<()>> {
        let available = self.source.peek(want.len())?.len();
        if available < want.len() {
            return self.missing(label);
        }
        let got = self.source.read(want.len())?;
        if got.as_ref() != want {
            return Err(Error::unexpected(label, &got));
        }
        Ok(Step::Ready(()))
    }

    fn read_crlf(&mut self) -> Result<Step<()>> {
        self.expect("<CR><LF>", CRLF)
    }

    /// Consume exactly `n` payload bytes.
    fn take(&mut self, label: &str, n: usize) -> Result<Step<Bytes>> {
        let available = self.source.peek(n)?.len();
        if available < n {
            return self.missing(label);
        }
        Ok(Step::Ready(self.source.read(n)?))
    }

    /// Consume bytes until the next byte is one of `delims`, which stays in
    /// the source. A lexeme longer than `maxlen` overflows.
    fn read_until(&mut self, label: &str, delims: &[u8], maxlen: usize) -> Result<Step<Vec<u8>>> {
        let mut lexeme = Vec::new();
        loop {
            let Some(b) = self.peek_byte()? else {
                return self.missing(label);
            };
            if delims.contains(&b) {
                break;
            }
            if lexeme.len() == maxlen {
                return Err(Error::Overflow(label.to_string()));
            }
            lexeme.push(b);
            self.source.read(1)?;
        }
        Ok(Step::Ready(lexeme))
    }

    /// Signed decimal up to the next CR LF: optional `+`/`-`, then digits.
    fn read_int64(&mut self, label: &str) -> Result<Step<i64>> {
        let lexeme = ready!(self.read_until(label, CRLF, MAX_INT_LEXEME));
        match std::str::from_utf8(&lexeme)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
        {
            Some(n) => Ok(Step::Ready(n)),
            None => Err(Error::unexpected(label, &lexeme)),
        }
    }

    /// Unsigned decimal up to the next CR LF: optional `+`, then digits.
    fn read_uint64(&mut self, label: &str) -> Result<Step<u64>> {
        let lexeme = ready!(self.read_until(label, CRLF, MAX_INT_LEXEME));
        match std::str::from_utf8(&lexeme)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            Some(n) => Ok(Step::Ready(n)),
            None => Err(Error::unexpected(label, &lexeme)),
        }
    }

    // ------------------------------------------------------------------
    // Frame decoders
    // ------------------------------------------------------------------

    fn read_blob_kind(
        &mut self,
        code: u8,
        label: &'static str,
        make: fn(Bytes) -> Value,
    ) -> Result<Step<Value>> {
        ready!(self.expect(label, &[code]));
        let size = ready!(self.read_uint64(label));
        ready!(self.read_crlf());
        if size > MAX_BLOB_LENGTH as u64 {
            return Err(Error::Overflow(label.to_string()));
        }
        let payload = ready!(self.take(label, size as usize));
        ready!(self.read_crlf());
        Ok(Step::Ready(make(payload)))
    }

    fn read_simple_kind(
        &mut self,
        code: u8,
        label: &'static str,
        make: fn(Bytes) -> Value,
    ) -> Result<Step<Value>> {
        ready!(self.expect(label, &[code]));
        let mut payload = Vec::new();
        loop {
            let Some(b) = self.peek_byte()? else {
                return self.missing(label);
            };
            if b == b'\r' {
                break;
            }
            // A bare LF is a framing violation, not payload.
            if b == b'\n' {
                return Err(Error::unexpected(label, b"\n"));
            }
            payload.push(b);
            self.source.read(1)?;
        }
        ready!(self.read_crlf());
        Ok(Step::Ready(make(Bytes::from(payload))))
    }

    fn read_integer(&mut self) -> Result<Step<Value>> {
        ready!(self.expect("integer", &[CODE_INTEGER]));
        let n = ready!(self.read_int64("integer"));
        ready!(self.read_crlf());
        Ok(Step::Ready(Value::Integer(n)))
    }

    /// Double lexemes take whatever grammar `f64::from_str` accepts,
    /// exponent notation and `inf`/`-inf`/`nan` included.
    fn read_double(&mut self) -> Result<Step<Value>> {
        ready!(self.expect("double", &[CODE_DOUBLE]));
        let lexeme = ready!(self.read_until("double", CRLF, MAX_DOUBLE_LEXEME));
        ready!(self.read_crlf());
        match std::str::from_utf8(&lexeme)
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
        {
            Some(d) => Ok(Step::Ready(Value::Double(d))),
            None => Err(Error::unexpected("double", &lexeme)),
        }
    }

    fn read_null(&mut self) -> Result<Step<Value>> {
        ready!(self.expect("null", &[CODE_NULL]));
        ready!(self.read_crlf());
        Ok(Step::Ready(Value::Null))
    }

    fn read_boolean(&mut self) -> Result<Step<Value>> {
        ready!(self.expect("boolean", &[CODE_BOOLEAN]));
        let lexeme = ready!(self.read_until("boolean", CRLF, MAX_BOOLEAN_LEXEME));
        ready!(self.read_crlf());
        match lexeme.as_slice() {
            b"t" => Ok(Step::Ready(Value::Boolean(true))),
            b"f" => Ok(Step::Ready(Value::Boolean(false))),
            other => Err(Error::unexpected("t or f", other)),
        }
    }

    fn read_big_number(&mut self) -> Result<Step<Value>> {
        ready!(self.expect("big number", &[CODE_BIG_NUMBER]));
        let lexeme = ready!(self.read_until("big number", CRLF, MAX_BIGNUM_LEXEME));
        ready!(self.read_crlf());
        match BigInt::parse_bytes(&lexeme, 10) {
            Some(n) => Ok(Step::Ready(Value::BigNumber(n))),
            None => Err(Error::unexpected("big number", &lexeme)),
        }
    }

    // ------------------------------------------------------------------
    // Aggregates
    // ------------------------------------------------------------------

    /// Aggregate size header: signed decimal plus CR LF. Negative sizes are
    /// rejected; null is spelled `_` in this protocol revision, not `*-1`.
    fn read_size(&mut self, label: &str) -> Result<Step<usize>> {
        let n = ready!(self.read_int64(label));
        ready!(self.read_crlf());
        if n < 0 {
            return Err(Error::Unexpected {
                label: label.to_string(),
                found: n.to_string(),
            });
        }
        Ok(Step::Ready(n as usize))
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(Error::DepthExceeded {
                max: MAX_NESTING_DEPTH,
            });
        }
        Ok(())
    }

    fn read_elements(&mut self, count: usize) -> Result<Step<Vec<Value>>> {
        self.descend()?;
        let mut items = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            items.push(ready!(self.read_frame()));
        }
        self.depth -= 1;
        Ok(Step::Ready(items))
    }

    fn read_pairs(&mut self, count: usize) -> Result<Step<Vec<(Value, Value)>>> {
        self.descend()?;
        let mut pairs: Vec<(Value, Value)> = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            let key = ready!(self.read_frame());
            let value = ready!(self.read_frame());
            // Duplicate keys overwrite in place: wire order of first
            // insertion, last value wins.
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => pairs.push((key, value)),
            }
        }
        self.depth -= 1;
        Ok(Step::Ready(pairs))
    }

    fn read_array(&mut self) -> Result<Step<Value>> {
        ready!(self.expect("array", &[CODE_ARRAY]));
        let size = ready!(self.read_size("array size"));
        let items = ready!(self.read_elements(size));
        Ok(Step::Ready(Value::Array(items)))
    }

    fn read_set(&mut self) -> Result<Step<Value>> {
        ready!(self.expect("set", &[CODE_SET]));
        let size = ready!(self.read_size("set size"));
        let items = ready!(self.read_elements(size));
        let mut set: Vec<Value> = Vec::with_capacity(items.len());
        for item in items {
            if !set.contains(&item) {
                set.push(item);
            }
        }
        Ok(Step::Ready(Value::Set(set)))
    }

    fn read_map(&mut self) -> Result<Step<Value>> {
        ready!(self.expect("map", &[CODE_MAP]));
        let size = ready!(self.read_size("map size"));
        let pairs = ready!(self.read_pairs(size));
        Ok(Step::Ready(Value::Map(pairs)))
    }

    /// Attributes carry their own size header and pair list, then annotate
    /// the one frame that follows.
    fn read_attribute(&mut self) -> Result<Step<Value>> {
        ready!(self.expect("attributes", &[CODE_ATTRIBUTE]));
        let size = ready!(self.read_size("attributes size"));
        let props = ready!(self.read_pairs(size));
        self.descend()?;
        let value = ready!(self.read_frame());
        self.depth -= 1;
        Ok(Step::Ready(Value::Attribute(Box::new(Attribute {
            props,
            value,
        }))))
    }

    // ------------------------------------------------------------------
    // Push routing
    // ------------------------------------------------------------------

    fn consume_push(&mut self) -> Result<Step<()>> {
        ready!(self.expect("push", &[CODE_PUSH]));
        let size = ready!(self.read_size("push size"));
        let items = ready!(self.read_elements(size));
        if items.is_empty() {
            return Err(Error::unexpected("push", b"empty payload"));
        }
        if !items[0].is_bytes() {
            return Err(Error::Unexpected {
                label: "push tag".to_string(),
                found: format!("{:?}", items[0]),
            });
        }
        match self.sink.as_mut() {
            Some(sink) => sink.on_push(items),
            None => return Err(Error::NoPushHandler),
        }
        Ok(Step::Ready(()))
    }
}

/// Decode one frame from an in-memory buffer.
///
/// Short input raises [`Error::EndOfInput`]; trailing bytes after the frame
/// are left untouched and ignored.
///
/// # Example
/// ```
/// use resp3_core::Value;
/// use resp3_protocol::reader::read_from_bytes;
///
/// assert_eq!(read_from_bytes(&b"#f\r\n"[..]).unwrap(), Value::Boolean(false));
/// ```
pub fn read_from_bytes(buf: impl Into<Bytes>) -> Result<Value> {
    let mut reader = Reader::new(BytesSource::new(buf));
    match reader.read()? {
        Step::Ready(value) => Ok(value),
        Step::Incomplete => Err(Error::end_of_input("complete frame")),
    }
}
