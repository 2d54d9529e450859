//! JSON output writer.

use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use crate::core::models::EncodeConfig;
use crate::core::registry::{SequenceFn, WriteFn};
use crate::error::{Result, WireformError};

/// Writes a value as JSON.
///
/// Sequences are rendered through the element writer so the per-element
/// rendering is shared with the registry's composed path.
pub fn write_json<W: Write>(sink: &mut W, value: &Value, config: &EncodeConfig) -> Result<()> {
    let out: &mut dyn Write = sink;
    match value {
        Value::Array(items) => sequence_writer(config)(out, items, &element_writer(config)),
        other => element_writer(config)(out, other),
    }
}

/// Converts a value to a JSON string.
pub fn to_json(value: &Value, config: &EncodeConfig) -> Result<String> {
    let mut buf = Vec::new();
    write_json(&mut buf, value, config)?;
    String::from_utf8(buf).map_err(|e| WireformError::Utf8 {
        context: "JSON output".to_string(),
        source: e.utf8_error(),
    })
}

/// The per-element writer: one value in compact or pretty form.
pub(crate) fn element_writer(config: &EncodeConfig) -> WriteFn {
    let pretty = config.pretty;
    Arc::new(move |out, value| {
        if pretty {
            serde_json::to_writer_pretty(out, value)?;
        } else {
            serde_json::to_writer(out, value)?;
        }
        Ok(())
    })
}

/// The sequence combinator: brackets and separators around the element
/// callback.
pub(crate) fn sequence_writer(config: &EncodeConfig) -> SequenceFn {
    let pretty = config.pretty;
    Arc::new(move |out, items, elem| {
        out.write_all(b"[")?;
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                let separator: &[u8] = if pretty { b",\n" } else { b"," };
                out.write_all(separator)?;
            }
            elem(&mut *out, item)?;
        }
        out.write_all(b"]")?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_compact() {
        let value = json!({"result": "Hello"});
        let out = to_json(&value, &EncodeConfig::new()).unwrap();
        assert_eq!(out, r#"{"result":"Hello"}"#);
    }

    #[test]
    fn test_sequence_compact() {
        let value = json!([{"n": 1}, {"n": 2}]);
        let out = to_json(&value, &EncodeConfig::new()).unwrap();
        assert_eq!(out, r#"[{"n":1},{"n":2}]"#);
    }

    #[test]
    fn test_empty_sequence() {
        let out = to_json(&json!([]), &EncodeConfig::new()).unwrap();
        assert_eq!(out, "[]");
    }

    #[test]
    fn test_scalar() {
        let out = to_json(&json!("Hello, World!"), &EncodeConfig::new()).unwrap();
        assert_eq!(out, r#""Hello, World!""#);
    }

    #[test]
    fn test_pretty_record() {
        let value = json!({"result": "Hello"});
        let out = to_json(&value, &EncodeConfig::new().with_pretty()).unwrap();
        assert!(out.contains("\n"));
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_sequence_round_trips() {
        let value = json!([{"title": "Alien", "rating": 8.5}]);
        let out = to_json(&value, &EncodeConfig::new()).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_field_order_preserved() {
        let value = json!({"zulu": 1, "alpha": 2});
        let out = to_json(&value, &EncodeConfig::new()).unwrap();
        assert_eq!(out, r#"{"zulu":1,"alpha":2}"#);
    }
}
