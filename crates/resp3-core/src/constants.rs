//! Protocol-level constants for the RESP3 wire format.
//!
//! Every RESP3 frame starts with a one-byte type code and ends each header
//! line and scalar payload with CR LF. The codes below form a closed set;
//! dispatch on them is a fixed `match`, never runtime registration.
//!
//! # Frame layout
//!
//! ```text
//! $5\r\nhello\r\n        blob string
//! *2\r\n:1\r\n:2\r\n     array of two integers
//! >2\r\n$6\r\npubsub\r\n+hi\r\n   push frame (routed, never returned)
//! ```

// ============================================================================
// Frame terminator
// ============================================================================

/// Line terminator for headers and scalar payloads.
pub const CRLF: &[u8] = b"\r\n";

// ============================================================================
// Type codes
// ============================================================================

/// Blob string: `$<len>\r\n<bytes>\r\n`.
pub const CODE_BLOB_STRING: u8 = b'$';

/// Blob error: blob-string shape, tagged as an error payload.
pub const CODE_BLOB_ERROR: u8 = b'!';

/// Verbatim string: blob-string shape; the format prefix (`txt:`)
/// stays inside the payload.
pub const CODE_VERBATIM_STRING: u8 = b'=';

/// Simple string: `+<bytes>\r\n`, no CR or LF inside the payload.
pub const CODE_SIMPLE_STRING: u8 = b'+';

/// Simple error: simple-string shape, tagged as an error payload.
pub const CODE_SIMPLE_ERROR: u8 = b'-';

/// Integer: `:<signed decimal>\r\n`.
pub const CODE_INTEGER: u8 = b':';

/// Double: `,<lexeme>\r\n`, parsed as IEEE-754 64-bit.
pub const CODE_DOUBLE: u8 = b',';

/// Null: `_\r\n`.
pub const CODE_NULL: u8 = b'_';

/// Boolean: `#t\r\n` or `#f\r\n`.
pub const CODE_BOOLEAN: u8 = b'#';

/// Big number: `(<decimal lexeme>\r\n`, arbitrary precision.
pub const CODE_BIG_NUMBER: u8 = b'(';

/// Array: `*<size>\r\n` followed by `size` frames.
pub const CODE_ARRAY: u8 = b'*';

/// Set: array shape, collected without duplicates.
pub const CODE_SET: u8 = b'~';

/// Map: `%<size>\r\n` followed by `size` key/value frame pairs.
pub const CODE_MAP: u8 = b'%';

/// Attributes: map shape followed by the one frame it annotates.
pub const CODE_ATTRIBUTE: u8 = b'|';

/// Push: array shape whose first element is a bytes tag; delivered to
/// the push sink, never returned as a value.
pub const CODE_PUSH: u8 = b'>';

// ============================================================================
// Scanner limits
// ============================================================================

/// Longest accepted integer lexeme in bytes.
///
/// Twenty bytes covers every `i64`, sign included
/// (`-9223372036854775808`). Longer lexemes overflow the scanner before
/// any parse is attempted.
pub const MAX_INT_LEXEME: usize = 20;

/// Longest accepted double lexeme in bytes.
pub const MAX_DOUBLE_LEXEME: usize = 256;

/// Longest accepted boolean lexeme in bytes.
///
/// The payload is a single `t` or `f`; the bound exists so a stream of
/// junk after `#` fails fast as an overflow rather than scanning to the
/// next CR.
pub const MAX_BOOLEAN_LEXEME: usize = 2;

/// Longest accepted big-number lexeme in bytes.
pub const MAX_BIGNUM_LEXEME: usize = 65536;

// ============================================================================
// Resource limits
// ============================================================================

/// Largest accepted blob payload in bytes (512 MiB).
///
/// The wire format allows lengths up to `2^63 - 1`; this cap keeps a
/// declared length from turning into an allocation request of that size.
pub const MAX_BLOB_LENGTH: usize = 512 * 1024 * 1024;

/// Maximum aggregate/attribute nesting depth.
pub const MAX_NESTING_DEPTH: usize = 32;
