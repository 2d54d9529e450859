//! Tests for the streaming row sinks.

use serde_json::{json, Value};
use std::io::Write;
use tempfile::tempdir;
use wireform::core::models::EncodeConfig;
use wireform::core::output::{to_csv, to_jsonl};
use wireform::streaming::{CsvStream, JsonlStream};

fn sample_records() -> Vec<Value> {
    vec![
        json!({"sender": "Alice", "content": "Hello!"}),
        json!({"sender": "Bob", "content": "Hi, Alice!"}),
        json!({"sender": "Alice", "content": "How are you?"}),
    ]
}

// ============================================================================
// Equivalence with the in-memory writers
// ============================================================================

#[test]
fn test_csv_stream_matches_batch_writer() {
    let records = sample_records();

    let mut stream = CsvStream::new(Vec::new(), &EncodeConfig::new());
    for record in &records {
        stream.write(record).unwrap();
    }
    let streamed = String::from_utf8(stream.finish().unwrap()).unwrap();

    let batch = to_csv(&Value::Array(records), &EncodeConfig::new()).unwrap();
    assert_eq!(streamed, batch);
}

#[test]
fn test_jsonl_stream_matches_batch_writer() {
    let records = sample_records();

    let mut stream = JsonlStream::new(Vec::new());
    for record in &records {
        stream.write(record).unwrap();
    }
    let streamed = String::from_utf8(stream.finish().unwrap()).unwrap();

    let batch = to_jsonl(&Value::Array(records), &EncodeConfig::new()).unwrap();
    assert_eq!(streamed, batch);
}

// ============================================================================
// Streaming to a file
// ============================================================================

#[test]
fn test_csv_stream_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stream.csv");

    let file = std::fs::File::create(&path).unwrap();
    let mut stream = CsvStream::new(file, &EncodeConfig::new());
    for n in 0..100 {
        stream.write(&json!({"n": n})).unwrap();
    }
    assert_eq!(stream.rows_written(), 100);
    stream.finish().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 101);
}

// ============================================================================
// Failure behavior
// ============================================================================

/// Sink that rejects every write after the first `limit` bytes.
struct FlakySink {
    limit: usize,
    written: usize,
}

impl Write for FlakySink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.written >= self.limit {
            return Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "client disconnected",
            ));
        }
        let n = buf.len().min(self.limit - self.written);
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_csv_stream_surfaces_sink_failure() {
    let sink = FlakySink {
        limit: 32,
        written: 0,
    };
    let mut stream = CsvStream::new(sink, &EncodeConfig::new());

    let mut failed = false;
    for n in 0..1000 {
        if let Err(e) = stream
            .write(&json!({"n": n, "padding": "some longer text to fill the buffer"}))
        {
            assert!(e.is_encoding());
            failed = true;
            break;
        }
    }
    assert!(failed, "sink failure must surface, not be swallowed");
}

#[test]
fn test_divergent_record_aborts_stream() {
    let mut stream = CsvStream::new(Vec::new(), &EncodeConfig::new());
    stream.write(&json!({"a": 1, "b": 2})).unwrap();
    stream.write(&json!({"a": 3, "b": 4})).unwrap();

    let err = stream
        .write(&json!({"a": 5, "c": 6}))
        .unwrap_err();
    assert!(err.is_shape_mismatch());
    // Rows already accepted stand
    assert_eq!(stream.rows_written(), 2);
}

// ============================================================================
// Empty streams
// ============================================================================

#[test]
fn test_empty_csv_stream_with_columns() {
    let config = EncodeConfig::new().with_columns(vec!["sender".into(), "content".into()]);
    let stream = CsvStream::new(Vec::new(), &config);
    let out = String::from_utf8(stream.finish().unwrap()).unwrap();
    assert_eq!(out, "sender,content\r\n");
}

#[test]
fn test_empty_jsonl_stream() {
    let stream = JsonlStream::new(Vec::new());
    let out = stream.finish().unwrap();
    assert!(out.is_empty());
}
