use bytes::Bytes;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// A decoded RESP3 value.
///
/// One variant per frame kind the decoder can hand back to a caller. The
/// five bytes-carrying variants hold opaque [`Bytes`]; the protocol makes
/// no UTF-8 promise and neither does this type.
///
/// Push frames have no variant here: they are routed to the configured
/// push sink as a `Vec<Value>` and decoding continues with the next frame.
///
/// # Aggregate semantics
///
/// - [`Value::Array`] keeps children in wire order.
/// - [`Value::Set`] keeps the wire order of first occurrence; duplicate
///   elements (by `PartialEq`) collapse.
/// - [`Value::Map`] keeps pairs in wire insertion order; a duplicate key
///   overwrites the earlier value in place, so the last value wins.
///
/// # Example
/// ```
/// use bytes::Bytes;
/// use resp3_core::Value;
///
/// let frame = Value::Array(vec![
///     Value::Blob(Bytes::from_static(b"get")),
///     Value::Integer(42),
/// ]);
/// assert!(matches!(&frame, Value::Array(items) if items.len() == 2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Blob string payload.
    Blob(Bytes),

    /// Blob error payload.
    BlobError(Bytes),

    /// Verbatim string payload, format prefix included.
    Verbatim(Bytes),

    /// Simple string payload (no CR or LF inside).
    Simple(Bytes),

    /// Simple error payload.
    SimpleError(Bytes),

    /// Signed 64-bit integer.
    Integer(i64),

    /// IEEE-754 64-bit double.
    Double(f64),

    /// Boolean.
    Boolean(bool),

    /// Null.
    Null,

    /// Arbitrary-precision integer.
    BigNumber(BigInt),

    /// Ordered sequence of values.
    Array(Vec<Value>),

    /// Set of values, wire order of first occurrence.
    Set(Vec<Value>),

    /// Ordered key/value pairs, wire insertion order.
    Map(Vec<(Value, Value)>),

    /// A value annotated with attribute properties.
    Attribute(Box<Attribute>),
}

/// Attribute properties bound to the frame that follows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Annotation map, wire insertion order.
    pub props: Vec<(Value, Value)>,

    /// The annotated value.
    pub value: Value,
}

impl Value {
    /// Payload of a bytes-typed value, `None` for everything else.
    ///
    /// The bytes-typed variants are blob string, blob error, verbatim
    /// string, simple string, and simple error. Push-tag validation uses
    /// this: the first element of a push frame must be bytes-typed.
    ///
    /// # Example
    /// ```
    /// use bytes::Bytes;
    /// use resp3_core::Value;
    ///
    /// let v = Value::Simple(Bytes::from_static(b"OK"));
    /// assert_eq!(v.bytes_payload().map(|b| &b[..]), Some(&b"OK"[..]));
    /// assert_eq!(Value::Integer(7).bytes_payload(), None);
    /// ```
    pub fn bytes_payload(&self) -> Option<&Bytes> {
        match self {
            Value::Blob(b)
            | Value::BlobError(b)
            | Value::Verbatim(b)
            | Value::Simple(b)
            | Value::SimpleError(b) => Some(b),
            _ => None,
        }
    }

    /// Whether this value carries an opaque bytes payload.
    pub fn is_bytes(&self) -> bool {
        self.bytes_payload().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Blob(Bytes::from_static(b"a")))]
    #[case(Value::BlobError(Bytes::from_static(b"a")))]
    #[case(Value::Verbatim(Bytes::from_static(b"txt:a")))]
    #[case(Value::Simple(Bytes::from_static(b"a")))]
    #[case(Value::SimpleError(Bytes::from_static(b"a")))]
    fn bytes_variants_expose_payload(#[case] value: Value) {
        assert!(value.is_bytes());
        assert!(value.bytes_payload().is_some());
    }

    #[rstest]
    #[case(Value::Integer(1))]
    #[case(Value::Double(1.5))]
    #[case(Value::Boolean(true))]
    #[case(Value::Null)]
    #[case(Value::Array(vec![]))]
    #[case(Value::Map(vec![]))]
    fn non_bytes_variants_have_no_payload(#[case] value: Value) {
        assert!(!value.is_bytes());
        assert_eq!(value.bytes_payload(), None);
    }

    #[test]
    fn equality_is_structural() {
        let a = Value::Map(vec![(
            Value::Simple(Bytes::from_static(b"k")),
            Value::Integer(1),
        )]);
        let b = Value::Map(vec![(
            Value::Simple(Bytes::from_static(b"k")),
            Value::Integer(1),
        )]);
        assert_eq!(a, b);
    }

    #[test]
    fn attribute_wraps_value() {
        let attr = Value::Attribute(Box::new(Attribute {
            props: vec![(
                Value::Simple(Bytes::from_static(b"ttl")),
                Value::Integer(3600),
            )],
            value: Value::Boolean(true),
        }));
        match attr {
            Value::Attribute(inner) => {
                assert_eq!(inner.value, Value::Boolean(true));
                assert_eq!(inner.props.len(), 1);
            }
            other => panic!("expected attribute, got {other:?}"),
        }
    }
}
