//! Edge case tests: quoting corners, unicode, odd shapes, empty inputs.

use serde_json::json;
use wireform::core::models::EncodeConfig;
use wireform::core::output::{to_csv, to_json, to_jsonl};
use wireform::negotiate::RequestSignals;
use wireform::payload::{Payload, Shape};
use wireform::Responder;

// ============================================================================
// CSV quoting corners
// ============================================================================

#[test]
fn test_field_with_only_a_quote() {
    let csv = to_csv(&json!([{"a": "\""}]), &EncodeConfig::new()).unwrap();
    assert_eq!(csv, "a\r\n\"\"\"\"\r\n");
}

#[test]
fn test_field_with_lone_lf() {
    let csv = to_csv(&json!([{"a": "line1\nline2"}]), &EncodeConfig::new()).unwrap();
    assert_eq!(csv, "a\r\n\"line1\nline2\"\r\n");
}

#[test]
fn test_field_with_crlf() {
    let csv = to_csv(&json!([{"a": "line1\r\nline2"}]), &EncodeConfig::new()).unwrap();
    assert_eq!(csv, "a\r\n\"line1\r\nline2\"\r\n");
}

#[test]
fn test_header_fields_are_quoted_too() {
    let csv = to_csv(&json!([{"weird,name": 1}]), &EncodeConfig::new()).unwrap();
    assert_eq!(csv, "\"weird,name\"\r\n1\r\n");
}

#[test]
fn test_empty_string_field_is_not_quoted() {
    let csv = to_csv(&json!([{"a": "", "b": "x"}]), &EncodeConfig::new()).unwrap();
    assert_eq!(csv, "a,b\r\n,x\r\n");
}

#[test]
fn test_delimiter_only_field() {
    let csv = to_csv(&json!([{"a": ","}]), &EncodeConfig::new()).unwrap();
    assert_eq!(csv, "a\r\n\",\"\r\n");
}

// ============================================================================
// Unicode
// ============================================================================

#[test]
fn test_unicode_content() {
    let value = json!([
        {"sender": "Иван", "content": "Привет мир"},
        {"sender": "友達", "content": "🎉🔥 emoji"},
    ]);
    let csv = to_csv(&value, &EncodeConfig::new()).unwrap();
    assert!(csv.contains("Иван,Привет мир"));
    assert!(csv.contains("友達,🎉🔥 emoji"));

    let jsonl = to_jsonl(&value, &EncodeConfig::new()).unwrap();
    assert!(jsonl.contains("Иван"));
}

#[test]
fn test_unicode_payload_name_in_disposition() {
    let responder = Responder::new();
    let signals = RequestSignals::new().with_override("csv");
    let payload = Payload::named("Фильмы", json!([{"t": 1}]));

    let envelope = responder.respond_payload(&signals, &payload).unwrap();
    assert_eq!(
        envelope.content_disposition(),
        Some("attachment;filename=Фильмы.csv")
    );
}

// ============================================================================
// Odd shapes
// ============================================================================

#[test]
fn test_null_scalar_payload() {
    let csv = to_csv(&json!(null), &EncodeConfig::new()).unwrap();
    // A lone empty field is quoted to keep the row distinguishable from a
    // blank line
    assert_eq!(csv, "Result\r\n\"\"\r\n");
}

#[test]
fn test_numeric_scalar_payload() {
    let csv = to_csv(&json!(2.5), &EncodeConfig::new()).unwrap();
    assert_eq!(csv, "Result\r\n2.5\r\n");
}

#[test]
fn test_deeply_nested_field_flattens() {
    let value = json!([{"id": 1, "meta": {"tags": ["a"], "inner": {"x": true}}}]);
    let csv = to_csv(&value, &EncodeConfig::new()).unwrap();
    assert!(csv.starts_with("id,meta\r\n"));
    // Nested value flattened to compact JSON, quoted
    assert!(csv.contains("\"{\"\"tags\"\":[\"\"a\"\"],\"\"inner\"\":{\"\"x\"\":true}}\""));
}

#[test]
fn test_sequence_of_sequences_is_rejected() {
    let err = to_csv(&json!([[1, 2], [3, 4]]), &EncodeConfig::new()).unwrap_err();
    assert!(err.is_shape_mismatch());
}

#[test]
fn test_wrapper_with_two_fields_is_not_unwrapped() {
    let value = json!({"movies": [{"t": 1}], "count": 1});
    let csv = to_csv(&value, &EncodeConfig::new()).unwrap();
    assert!(csv.starts_with("movies,count\r\n"));
}

#[test]
fn test_wrapper_with_scalar_field_is_not_unwrapped() {
    let value = json!({"total": 5});
    let csv = to_csv(&value, &EncodeConfig::new()).unwrap();
    assert_eq!(csv, "total\r\n5\r\n");
}

#[test]
fn test_empty_record() {
    let json_out = to_json(&json!({}), &EncodeConfig::new()).unwrap();
    assert_eq!(json_out, "{}");
}

#[test]
fn test_shape_classification() {
    assert_eq!(Payload::named("X", json!("s")).shape(), Shape::Scalar);
    assert_eq!(Payload::named("X", json!({})).shape(), Shape::Record);
    assert_eq!(Payload::named("X", json!([])).shape(), Shape::Sequence);
}

// ============================================================================
// Large-ish payloads
// ============================================================================

#[test]
fn test_thousand_row_sequence() {
    let rows: Vec<serde_json::Value> = (0..1000)
        .map(|n| json!({"n": n, "label": format!("row {n}")}))
        .collect();
    let value = serde_json::Value::Array(rows);

    let csv = to_csv(&value, &EncodeConfig::new()).unwrap();
    let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 1001);
    assert_eq!(lines[0], "n,label");
    assert_eq!(lines[1000], "999,row 999");
}

#[test]
fn test_long_field_value() {
    let long = "x".repeat(100_000);
    let value = json!([{"data": long}]);
    let csv = to_csv(&value, &EncodeConfig::new()).unwrap();
    assert_eq!(csv.len(), "data\r\n".len() + 100_000 + 2);
}
