//! JSON Lines (JSONL) output writer.
//!
//! One compact JSON object per line, newline-terminated. The line-oriented
//! layout streams well: each sequence element is written and flushed
//! independently, so a consumer can process rows as they arrive.

use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use crate::core::models::EncodeConfig;
use crate::core::registry::{SequenceFn, WriteFn};
use crate::error::{Result, WireformError};

/// Writes a value as JSON Lines.
///
/// A sequence becomes one line per element; records and scalars become a
/// single line. Pretty printing does not apply (the format is line-oriented).
pub fn write_jsonl<W: Write>(sink: &mut W, value: &Value, config: &EncodeConfig) -> Result<()> {
    let out: &mut dyn Write = sink;
    match value {
        Value::Array(items) => sequence_writer(config)(out, items, &element_writer(config)),
        other => {
            element_writer(config)(&mut *out, other)?;
            out.write_all(b"\n")?;
            Ok(())
        }
    }
}

/// Converts a value to a JSONL string.
pub fn to_jsonl(value: &Value, config: &EncodeConfig) -> Result<String> {
    let mut buf = Vec::new();
    write_jsonl(&mut buf, value, config)?;
    String::from_utf8(buf).map_err(|e| WireformError::Utf8 {
        context: "JSONL output".to_string(),
        source: e.utf8_error(),
    })
}

/// The per-element writer: one compact JSON value, no terminator.
pub(crate) fn element_writer(_config: &EncodeConfig) -> WriteFn {
    Arc::new(move |out, value| {
        serde_json::to_writer(out, value)?;
        Ok(())
    })
}

/// The sequence combinator: the element callback per line.
pub(crate) fn sequence_writer(_config: &EncodeConfig) -> SequenceFn {
    Arc::new(move |out, items, elem| {
        for item in items {
            elem(&mut *out, item)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    })
}
