//! Buffered byte sources consumed by the frame reader.
//!
//! The reader never touches a transport directly. It drives a [`ByteSource`]:
//! an abstraction with non-destructive lookahead (`peek`) and destructive
//! consumption (`read`). Both operations are allowed to come up short when
//! less input is currently available, and the reader turns that shortness
//! into its incomplete-input signaling.
//!
//! Two implementations are provided:
//!
//! - [`BytesSource`] wraps an in-memory [`Bytes`] buffer. Reads are
//!   zero-copy slices and the consumed-byte count is observable through
//!   [`BytesSource::position`], which the codec uses to advance its
//!   receive buffer after a committed decode.
//! - [`ReadSource`] wraps a blocking [`std::io::Read`] and maintains an
//!   internal buffer that grows to satisfy arbitrary-length peeks.

use bytes::{Bytes, BytesMut};
use resp3_core::Result;

/// Read-size granularity for [`ReadSource`] buffer fills.
const FILL_CHUNK_SIZE: usize = 4 * 1024;

/// A byte stream with lookahead.
///
/// `peek` must support lookahead at least as long as the largest header the
/// decoders request (65536 bytes, for big-number lexemes).
pub trait ByteSource {
    /// Up to `n` bytes of lookahead without consuming them.
    ///
    /// A slice shorter than `n` means less input is currently available.
    fn peek(&mut self, n: usize) -> Result<&[u8]>;

    /// Consume and return up to `n` bytes. Short only at end of input.
    fn read(&mut self, n: usize) -> Result<Bytes>;
}

/// In-memory byte source over a [`Bytes`] buffer.
///
/// # Example
/// ```
/// use resp3_protocol::{ByteSource, BytesSource};
///
/// let mut source = BytesSource::new(&b"abc"[..]);
/// assert_eq!(source.peek(2).unwrap(), b"ab");
/// assert_eq!(&source.read(2).unwrap()[..], b"ab");
/// assert_eq!(source.position(), 2);
/// ```
#[derive(Debug)]
pub struct BytesSource {
    buf: Bytes,
    pos: usize,
}

impl BytesSource {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self {
            buf: buf.into(),
            pos: 0,
        }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to consume.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

impl ByteSource for BytesSource {
    fn peek(&mut self, n: usize) -> Result<&[u8]> {
        let end = (self.pos + n).min(self.buf.len());
        Ok(&self.buf[self.pos..end])
    }

    fn read(&mut self, n: usize) -> Result<Bytes> {
        let end = (self.pos + n).min(self.buf.len());
        let out = self.buf.slice(self.pos..end);
        self.pos = end;
        Ok(out)
    }
}

/// Blocking byte source over any [`std::io::Read`].
///
/// Lookahead is served from an internal buffer that is refilled from the
/// inner reader on demand; a `peek` or `read` blocks until the requested
/// bytes arrive or the inner reader reports end of input.
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
    buf: BytesMut,
}

impl<R: std::io::Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(FILL_CHUNK_SIZE),
        }
    }

    /// Block until `n` bytes are buffered or the inner reader hits EOF.
    fn fill(&mut self, n: usize) -> Result<()> {
        let mut chunk = [0u8; FILL_CHUNK_SIZE];
        while self.buf.len() < n {
            let got = self.inner.read(&mut chunk)?;
            if got == 0 {
                break;
            }
            self.buf.extend_from_slice(&chunk[..got]);
        }
        Ok(())
    }
}

impl<R: std::io::Read> ByteSource for ReadSource<R> {
    fn peek(&mut self, n: usize) -> Result<&[u8]> {
        self.fill(n)?;
        let end = n.min(self.buf.len());
        Ok(&self.buf[..end])
    }

    fn read(&mut self, n: usize) -> Result<Bytes> {
        self.fill(n)?;
        let take = n.min(self.buf.len());
        Ok(self.buf.split_to(take).freeze())
    }
}
