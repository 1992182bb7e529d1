//! Tokio codec for reading RESP3 frames off a byte stream.
//!
//! [`Resp3Codec`] implements [`tokio_util::codec::Decoder`], turning a TCP
//! (or any `AsyncRead`) stream into a stream of decoded [`Value`]s via
//! `FramedRead`. Encoding is a different concern and has no counterpart
//! here; pair the codec with `FramedRead`, not `Framed`.
//!
//! # Decode strategy
//!
//! The reader itself keeps no state across an incomplete decode, so the
//! codec buffers whole frames: each `decode` call trial-decodes the
//! buffered bytes in incomplete-input mode and returns `Ok(None)` until a
//! full frame is present, leaving the buffer intact. Once a frame
//! completes, the buffer is advanced by exactly the consumed byte count
//! and the value is returned.
//!
//! Push frames observed during a trial decode are staged, not delivered:
//! a decode that later turns out incomplete is retried from the same frame
//! boundary, and delivering eagerly would hand the sink the same push
//! twice. The staged payloads go to the sink, in wire order, only when the
//! enclosing read commits.
//!
//! # DoS protection
//!
//! A configurable frame size limit (default 1 MiB) bounds both the growth
//! of the unconsumed buffer and the size of a completed frame; crossing it
//! fails the stream with [`Error::FrameTooLarge`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use resp3_protocol::Resp3Codec;
//! use tokio::net::TcpStream;
//! use tokio_util::codec::FramedRead;
//!
//! # async fn example() -> resp3_core::Result<()> {
//! let stream = TcpStream::connect("127.0.0.1:6379").await?;
//! let mut frames = FramedRead::new(stream, Resp3Codec::new());
//!
//! while let Some(frame) = frames.next().await {
//!     println!("frame: {:?}", frame?);
//! }
//! # Ok(())
//! # }
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use resp3_core::{Error, Result, Value};

use crate::reader::{PushSink, Reader, Step};
use crate::source::BytesSource;

/// Default maximum frame size in bytes (1 MiB).
///
/// Generous for command/reply traffic; callers moving large blobs can
/// raise it with [`Resp3Codec::with_max_frame_size`].
const DEFAULT_MAX_FRAME_SIZE: usize = 1024 * 1024;

/// RESP3 frame decoder for Tokio streams.
///
/// # Example
/// ```
/// use bytes::BytesMut;
/// use resp3_core::Value;
/// use resp3_protocol::Resp3Codec;
/// use tokio_util::codec::Decoder;
///
/// let mut codec = Resp3Codec::new();
/// let mut buffer = BytesMut::from(&b":7\r\n"[..]);
///
/// assert_eq!(codec.decode(&mut buffer).unwrap(), Some(Value::Integer(7)));
/// assert!(buffer.is_empty());
/// ```
pub struct Resp3Codec {
    /// Frames larger than this fail the stream.
    max_frame_size: usize,

    /// Receiver for push frames; absent means push frames error.
    sink: Option<Box<dyn PushSink + Send>>,
}

impl Resp3Codec {
    /// Codec with the default frame size limit.
    pub fn new() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            sink: None,
        }
    }

    /// Codec with a custom frame size limit.
    ///
    /// # Example
    /// ```
    /// use resp3_protocol::Resp3Codec;
    ///
    /// let codec = Resp3Codec::with_max_frame_size(16 * 1024 * 1024);
    /// assert_eq!(codec.max_frame_size(), 16 * 1024 * 1024);
    /// ```
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self {
            max_frame_size,
            sink: None,
        }
    }

    /// Install the receiver for push frames.
    pub fn with_push_sink(mut self, sink: impl PushSink + Send + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl Default for Resp3Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Resp3Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resp3Codec")
            .field("max_frame_size", &self.max_frame_size)
            .field("has_push_sink", &self.sink.is_some())
            .finish()
    }
}

impl Decoder for Resp3Codec {
    type Item = Value;
    type Error = Error;

    /// Decode one frame from the receive buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` — a complete frame was decoded and consumed;
    ///   any push frames read along the way have been delivered to the
    ///   sink first, in wire order.
    /// - `Ok(None)` — the buffer holds only part of a frame; nothing was
    ///   consumed and no push was delivered.
    /// - `Err(e)` — grammar violation, missing push sink, or a frame over
    ///   the size limit. The stream is poisoned; callers should close the
    ///   transport.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Value>> {
        if src.is_empty() {
            return Ok(None);
        }

        let staged: Rc<RefCell<Vec<Vec<Value>>>> = Rc::new(RefCell::new(Vec::new()));
        let mut reader = Reader::new(BytesSource::new(Bytes::copy_from_slice(src)))
            .with_incomplete_input();
        if self.sink.is_some() {
            let staged = Rc::clone(&staged);
            reader = reader.with_push_sink(move |frame: Vec<Value>| staged.borrow_mut().push(frame));
        }

        match reader.read()? {
            Step::Ready(value) => {
                let consumed = reader.source().position();
                if consumed > self.max_frame_size {
                    return Err(Error::FrameTooLarge {
                        size: consumed,
                        max_size: self.max_frame_size,
                    });
                }
                src.advance(consumed);
                if let Some(sink) = self.sink.as_mut() {
                    for frame in staged.borrow_mut().drain(..) {
                        trace!(elements = frame.len(), "routing push frame");
                        sink.on_push(frame);
                    }
                }
                trace!(consumed, "decoded frame");
                Ok(Some(value))
            }
            Step::Incomplete => {
                if src.len() > self.max_frame_size {
                    return Err(Error::FrameTooLarge {
                        size: src.len(),
                        max_size: self.max_frame_size,
                    });
                }
                Ok(None)
            }
        }
    }
}
