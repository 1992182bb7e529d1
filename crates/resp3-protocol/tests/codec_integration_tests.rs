//! Integration tests for Resp3Codec over Tokio streams.
//!
//! These drive the codec the way a connection would: bytes arrive in
//! arbitrary chunks through a duplex pipe and frames come out of a
//! `FramedRead`, with push frames routed to the codec's sink.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures::StreamExt;
use resp3_core::{Error, Value};
use resp3_protocol::Resp3Codec;
use tokio::io::AsyncWriteExt;
use tokio_util::codec::FramedRead;

fn shared_pushes() -> (Arc<Mutex<Vec<Vec<Value>>>>, impl FnMut(Vec<Value>)) {
    let pushes: Arc<Mutex<Vec<Vec<Value>>>> = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&pushes);
    (pushes, move |frame: Vec<Value>| {
        captured.lock().unwrap().push(frame)
    })
}

#[tokio::test]
async fn framed_read_decodes_a_stream_of_frames() {
    let (mut tx, rx) = tokio::io::duplex(1024);
    let mut frames = FramedRead::new(rx, Resp3Codec::new());

    tx.write_all(b":1\r\n+OK\r\n$5\r\nhello\r\n_\r\n")
        .await
        .unwrap();
    drop(tx);

    let mut values = Vec::new();
    while let Some(frame) = frames.next().await {
        values.push(frame.unwrap());
    }

    assert_eq!(
        values,
        vec![
            Value::Integer(1),
            Value::Simple(Bytes::from_static(b"OK")),
            Value::Blob(Bytes::from_static(b"hello")),
            Value::Null,
        ],
    );
}

#[tokio::test]
async fn frames_survive_byte_by_byte_delivery() {
    let (mut tx, rx) = tokio::io::duplex(16);
    let mut frames = FramedRead::new(rx, Resp3Codec::new());

    let wire = b"*2\r\n:10\r\n$3\r\nfoo\r\n".to_vec();
    let writer = tokio::spawn(async move {
        for byte in wire {
            tx.write_all(&[byte]).await.unwrap();
            tx.flush().await.unwrap();
        }
        drop(tx);
    });

    let value = frames.next().await.unwrap().unwrap();
    assert_eq!(
        value,
        Value::Array(vec![
            Value::Integer(10),
            Value::Blob(Bytes::from_static(b"foo")),
        ]),
    );
    assert!(frames.next().await.is_none());
    writer.await.unwrap();
}

#[tokio::test]
async fn pushes_are_routed_before_the_value_that_follows() {
    let (pushes, sink) = shared_pushes();
    let (mut tx, rx) = tokio::io::duplex(1024);
    let mut frames = FramedRead::new(rx, Resp3Codec::new().with_push_sink(sink));

    tx.write_all(b">2\r\n$7\r\nmessage\r\n$2\r\nhi\r\n:7\r\n")
        .await
        .unwrap();
    drop(tx);

    let value = frames.next().await.unwrap().unwrap();
    assert_eq!(value, Value::Integer(7));

    let delivered = pushes.lock().unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(
        delivered[0],
        vec![
            Value::Blob(Bytes::from_static(b"message")),
            Value::Blob(Bytes::from_static(b"hi")),
        ],
    );
}

#[tokio::test]
async fn push_split_across_chunks_is_delivered_exactly_once() {
    let (pushes, sink) = shared_pushes();
    let (mut tx, rx) = tokio::io::duplex(1024);
    let mut frames = FramedRead::new(rx, Resp3Codec::new().with_push_sink(sink));

    // The push arrives whole, the following frame trickles in afterwards;
    // retries of the partial decode must not repeat the push.
    tx.write_all(b">2\r\n$6\r\npubsub\r\n+hi\r\n").await.unwrap();
    tx.flush().await.unwrap();
    tokio::task::yield_now().await;
    tx.write_all(b":7\r\n").await.unwrap();
    drop(tx);

    let value = frames.next().await.unwrap().unwrap();
    assert_eq!(value, Value::Integer(7));
    assert_eq!(pushes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn grammar_violation_surfaces_as_a_stream_error() {
    let (mut tx, rx) = tokio::io::duplex(64);
    let mut frames = FramedRead::new(rx, Resp3Codec::new());

    tx.write_all(b"#x\r\n").await.unwrap();
    drop(tx);

    let err = frames.next().await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Unexpected { .. }));
}

#[tokio::test]
async fn oversized_frame_fails_the_stream() {
    let (mut tx, rx) = tokio::io::duplex(1024);
    let mut frames = FramedRead::new(rx, Resp3Codec::with_max_frame_size(16));

    tx.write_all(b"$100\r\n").await.unwrap();
    tx.write_all(&[b'x'; 100]).await.unwrap();
    tx.write_all(b"\r\n").await.unwrap();
    drop(tx);

    let err = frames.next().await.unwrap().unwrap_err();
    assert!(matches!(err, Error::FrameTooLarge { .. }));
}

#[tokio::test]
async fn interleaved_pushes_and_values_keep_wire_order() {
    let (pushes, sink) = shared_pushes();
    let (mut tx, rx) = tokio::io::duplex(1024);
    let mut frames = FramedRead::new(rx, Resp3Codec::new().with_push_sink(sink));

    tx.write_all(
        b">2\r\n$1\r\na\r\n:1\r\n\
          :100\r\n\
          >2\r\n$1\r\nb\r\n:2\r\n\
          :200\r\n",
    )
    .await
    .unwrap();
    drop(tx);

    let mut values = Vec::new();
    while let Some(frame) = frames.next().await {
        values.push(frame.unwrap());
    }
    assert_eq!(values, vec![Value::Integer(100), Value::Integer(200)]);

    let delivered = pushes.lock().unwrap();
    assert_eq!(delivered.len(), 2);
    assert_eq!(delivered[0][0], Value::Blob(Bytes::from_static(b"a")));
    assert_eq!(delivered[1][0], Value::Blob(Bytes::from_static(b"b")));
}
