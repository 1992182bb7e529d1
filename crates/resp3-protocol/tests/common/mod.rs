//! Shared helpers for integration tests: a conformant encoder used to
//! exercise decode round-trips, plus proptest strategies over decodable
//! values.

use bytes::Bytes;
use num_bigint::BigInt;
use proptest::prelude::*;
use resp3_core::Value;

/// Encode a value into wire bytes.
///
/// Inverse of the decoder for every value it can hand back, as long as
/// aggregates carry no duplicates (sets and map keys generated below are
/// always distinct). Doubles rely on `f64`'s shortest-roundtrip `Display`.
pub fn encode(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Blob(b) => encode_blob(b'$', b, out),
        Value::BlobError(b) => encode_blob(b'!', b, out),
        Value::Verbatim(b) => encode_blob(b'=', b, out),
        Value::Simple(b) => encode_line(b'+', b, out),
        Value::SimpleError(b) => encode_line(b'-', b, out),
        Value::Integer(n) => out.extend_from_slice(format!(":{n}\r\n").as_bytes()),
        Value::Double(d) => out.extend_from_slice(format!(",{d}\r\n").as_bytes()),
        Value::Boolean(true) => out.extend_from_slice(b"#t\r\n"),
        Value::Boolean(false) => out.extend_from_slice(b"#f\r\n"),
        Value::Null => out.extend_from_slice(b"_\r\n"),
        Value::BigNumber(n) => out.extend_from_slice(format!("({n}\r\n").as_bytes()),
        Value::Array(items) => {
            out.extend_from_slice(format!("*{}\r\n", items.len()).as_bytes());
            for item in items {
                encode(item, out);
            }
        }
        Value::Set(items) => {
            out.extend_from_slice(format!("~{}\r\n", items.len()).as_bytes());
            for item in items {
                encode(item, out);
            }
        }
        Value::Map(pairs) => {
            out.extend_from_slice(format!("%{}\r\n", pairs.len()).as_bytes());
            for (key, value) in pairs {
                encode(key, out);
                encode(value, out);
            }
        }
        Value::Attribute(attr) => {
            out.extend_from_slice(format!("|{}\r\n", attr.props.len()).as_bytes());
            for (key, value) in &attr.props {
                encode(key, out);
                encode(value, out);
            }
            encode(&attr.value, out);
        }
    }
}

fn encode_blob(code: u8, payload: &Bytes, out: &mut Vec<u8>) {
    out.push(code);
    out.extend_from_slice(format!("{}\r\n", payload.len()).as_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(b"\r\n");
}

fn encode_line(code: u8, payload: &Bytes, out: &mut Vec<u8>) {
    out.push(code);
    out.extend_from_slice(payload);
    out.extend_from_slice(b"\r\n");
}

/// Arbitrary blob payloads, CR and LF included.
pub fn arb_blob() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..48).prop_map(Bytes::from)
}

/// Payloads legal inside simple strings and simple errors: no CR, no LF.
pub fn arb_line_bytes() -> impl Strategy<Value = Bytes> {
    prop::collection::vec(
        any::<u8>().prop_filter("no CR or LF", |b| *b != b'\r' && *b != b'\n'),
        0..48,
    )
    .prop_map(Bytes::from)
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        arb_blob().prop_map(Value::Blob),
        arb_blob().prop_map(Value::BlobError),
        arb_blob().prop_map(Value::Verbatim),
        arb_line_bytes().prop_map(Value::Simple),
        arb_line_bytes().prop_map(Value::SimpleError),
        any::<i64>().prop_map(Value::Integer),
        any::<f64>()
            .prop_filter("finite", |d| d.is_finite())
            .prop_map(Value::Double),
        any::<bool>().prop_map(Value::Boolean),
        Just(Value::Null),
        any::<i128>().prop_map(|n| Value::BigNumber(BigInt::from(n))),
    ]
}

/// Arbitrary decodable values, aggregates included.
///
/// Set elements and map/attribute keys are drawn from distinct integers so
/// the decoder's duplicate collapsing cannot perturb a round-trip.
pub fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_set(any::<i64>(), 0..4)
                .prop_map(|s| Value::Set(s.into_iter().map(Value::Integer).collect())),
            prop::collection::btree_map(any::<i64>(), inner.clone(), 0..4).prop_map(|m| {
                Value::Map(m.into_iter().map(|(k, v)| (Value::Integer(k), v)).collect())
            }),
            (
                prop::collection::btree_map(any::<i64>(), inner.clone(), 0..3),
                inner.clone(),
            )
                .prop_map(|(props, value)| {
                    Value::Attribute(Box::new(resp3_core::Attribute {
                        props: props
                            .into_iter()
                            .map(|(k, v)| (Value::Integer(k), v))
                            .collect(),
                        value,
                    }))
                }),
        ]
    })
}
