//! CSV output writer.
//!
//! # Format
//! - Delimiter: `,` (configurable via [`EncodeConfig`])
//! - Line terminator: CRLF, on every row including the last
//! - Quoting: RFC 4180 — a field is quoted iff it contains the delimiter,
//!   a double quote, or a line break; embedded quotes are doubled
//! - Header row: the element's field names; a bare scalar becomes a
//!   single-column table named `Result`
//! - An empty sequence emits the header row alone
//!
//! Nested records or sequences inside a row are rendered as their compact
//! JSON string form and then quoted as needed.

use std::io::Write;

use csv::Terminator;
use serde_json::Value;

use crate::core::models::EncodeConfig;
use crate::core::registry::{SequenceFn, WriteFn};
use crate::error::{Result, WireformError};
use crate::payload::Shape;

use std::sync::Arc;

/// Column name used when a bare scalar is promoted to a one-column table.
pub(crate) const SCALAR_COLUMN: &str = "Result";

/// Writes a value to CSV.
///
/// Scalars and single records become one-row tables; sequences become one
/// row per element. A record whose only field is a sequence is unwrapped
/// and encoded as that sequence (unless disabled in the config).
pub fn write_csv<W: Write>(sink: &mut W, value: &Value, config: &EncodeConfig) -> Result<()> {
    let out: &mut dyn Write = sink;
    match value {
        Value::Array(items) => sequence_writer(config)(out, items, &element_writer(config)),
        Value::Object(_) => record_writer(config)(out, value),
        _ => scalar_writer(config)(out, value),
    }
}

/// Converts a value to a CSV string.
///
/// Same output as [`write_csv`], but returned as a `String`.
pub fn to_csv(value: &Value, config: &EncodeConfig) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, value, config)?;
    String::from_utf8(buf).map_err(|e| WireformError::Utf8 {
        context: "CSV output".to_string(),
        source: e.utf8_error(),
    })
}

/// Renders one scalar cell.
///
/// Null becomes the empty string; nested records and sequences flatten to
/// their compact JSON form.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The per-element row writer.
///
/// Writes one data row from the element's own field order. The sequence
/// writer receives this as its element callback, so sequence-of-T reuses
/// the per-T rendering without duplicating quoting logic.
pub(crate) fn element_writer(config: &EncodeConfig) -> WriteFn {
    let delimiter = config.delimiter;
    Arc::new(move |out, value| {
        let cells: Vec<String> = match value {
            Value::Object(map) => map.values().map(cell_text).collect(),
            Value::Array(_) => {
                return Err(WireformError::shape_mismatch(
                    Shape::Record,
                    Shape::Sequence,
                    "encoding CSV row",
                ));
            }
            scalar => vec![cell_text(scalar)],
        };
        write_line(out, delimiter, &cells)
    })
}

/// The sequence combinator: header row, then the element callback per row.
///
/// The header comes from the explicit columns, or from the first element's
/// field names, or falls back to the single `Result` column for scalar
/// elements and empty sequences. Every element must match the first
/// element's shape and the header's field list; a divergent row aborts the
/// write with a shape mismatch, leaving prior rows in the destination.
pub(crate) fn sequence_writer(config: &EncodeConfig) -> SequenceFn {
    let delimiter = config.delimiter;
    let columns = config.columns.clone();
    Arc::new(move |out, items, elem| {
        let header = derive_header(items, columns.as_deref())?;
        write_line(&mut *out, delimiter, &header)?;

        let first_shape = items.first().map(Shape::of);
        for (index, item) in items.iter().enumerate() {
            check_row(item, &header, first_shape, index)?;
            elem(&mut *out, item)?;
        }
        Ok(())
    })
}

/// The single-record writer: a one-row table through the sequence path.
///
/// A record whose only field is a sequence is unwrapped first, so
/// response-DTO wrappers like `Movies { movies: Vec<Movie> }` render one
/// row per element.
pub(crate) fn record_writer(config: &EncodeConfig) -> WriteFn {
    let seq = sequence_writer(config);
    let elem = element_writer(config);
    let unwrap = config.unwrap_single_sequence;
    Arc::new(move |out, value| {
        let Value::Object(map) = value else {
            return Err(WireformError::shape_mismatch(
                Shape::Record,
                Shape::of(value),
                "encoding CSV record",
            ));
        };
        if unwrap && map.len() == 1 {
            if let Some(Value::Array(items)) = map.values().next() {
                return seq(&mut *out, items, &elem);
            }
        }
        seq(out, std::slice::from_ref(value), &elem)
    })
}

/// The scalar writer: promotes the value to a `Result` column record.
pub(crate) fn scalar_writer(config: &EncodeConfig) -> WriteFn {
    let record = record_writer(config);
    Arc::new(move |out, value| {
        let mut map = serde_json::Map::new();
        map.insert(SCALAR_COLUMN.to_string(), value.clone());
        record(out, &Value::Object(map))
    })
}

/// Derives the header row for a sequence.
pub(crate) fn derive_header(items: &[Value], columns: Option<&[String]>) -> Result<Vec<String>> {
    if let Some(columns) = columns {
        return Ok(columns.to_vec());
    }
    match items.first() {
        Some(Value::Object(map)) => Ok(map.keys().cloned().collect()),
        Some(Value::Array(_)) => Err(WireformError::shape_mismatch(
            Shape::Record,
            Shape::Sequence,
            "deriving CSV header",
        )),
        // Scalar elements and empty sequences use the one-column table
        Some(_) | None => Ok(vec![SCALAR_COLUMN.to_string()]),
    }
}

/// Validates one row against the header and the sequence's element shape.
pub(crate) fn check_row(
    item: &Value,
    header: &[String],
    first_shape: Option<Shape>,
    index: usize,
) -> Result<()> {
    let shape = Shape::of(item);
    if let Some(expected) = first_shape {
        if shape != expected {
            return Err(WireformError::shape_mismatch(
                expected,
                shape,
                format!("encoding row {}", index + 1),
            ));
        }
    }
    match item {
        Value::Object(map) => {
            let matches =
                map.len() == header.len() && map.keys().zip(header).all(|(k, h)| k == h);
            if !matches {
                let found: Vec<&str> = map.keys().map(String::as_str).collect();
                return Err(WireformError::shape_mismatch(
                    Shape::Record,
                    Shape::Record,
                    format!(
                        "encoding row {}: fields [{}] do not match header [{}]",
                        index + 1,
                        found.join(", "),
                        header.join(", ")
                    ),
                ));
            }
        }
        Value::Array(_) => {
            return Err(WireformError::shape_mismatch(
                Shape::Record,
                Shape::Sequence,
                format!("encoding row {}", index + 1),
            ));
        }
        _ if header.len() != 1 => {
            return Err(WireformError::shape_mismatch(
                Shape::Record,
                Shape::Scalar,
                format!("encoding row {}", index + 1),
            ));
        }
        _ => {}
    }
    Ok(())
}

/// Writes one CSV line with RFC 4180 quoting and a CRLF terminator.
fn write_line(out: &mut dyn Write, delimiter: u8, cells: &[String]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(Terminator::CRLF)
        .from_writer(out);
    writer.write_record(cells)?;
    writer.flush()?;
    Ok(())
}
