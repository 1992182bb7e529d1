use thiserror::Error;

/// Errors observable while decoding RESP3 frames.
///
/// Three kinds reach callers: input that ended too early
/// ([`Error::EndOfInput`]), input that was present but did not match the
/// grammar ([`Error::Unexpected`]), and reader-level failures that are not
/// about the input grammar (the remaining variants). Every error is terminal
/// for the stream it occurred on: the reader's position is undefined
/// afterwards and further framed decoding has no meaning.
#[derive(Error, Debug)]
pub enum Error {
    /// Input ended while the named element was still expected.
    #[error("expected {0}")]
    EndOfInput(String),

    /// Bytes were present but did not match the expected grammar.
    #[error("unexpected {label}: {found}")]
    Unexpected { label: String, found: String },

    /// A bounded scanner ran past its length limit.
    #[error("overflow in {0}")]
    Overflow(String),

    /// A push frame arrived but no push sink is configured.
    #[error("no push handler")]
    NoPushHandler,

    /// Aggregate or attribute frames nested beyond the allowed depth.
    #[error("nesting deeper than {max} frames")]
    DepthExceeded { max: usize },

    /// A frame grew past the codec's configured size limit.
    #[error("frame of {size} bytes exceeds limit of {max_size}")]
    FrameTooLarge { size: usize, max_size: usize },

    /// The underlying byte source failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Input ended while `expected` was still required.
    pub fn end_of_input(expected: impl Into<String>) -> Self {
        Error::EndOfInput(expected.into())
    }

    /// Grammar mismatch at `label`, showing the offending bytes in
    /// ASCII-escaped form.
    pub fn unexpected(label: impl Into<String>, found: &[u8]) -> Self {
        Error::Unexpected {
            label: label.into(),
            found: found.escape_ascii().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
