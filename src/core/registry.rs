//! Shape-keyed writer registry.
//!
//! The registry maps a `(format name, value shape)` pair to a write
//! function. Three kinds of entries exist:
//!
//! - **shape writers** — a complete writer for one shape (header handling
//!   included, for table formats)
//! - **element writers** — render one sequence element, no framing
//! - **sequence combinators** — frame a sequence and call the element
//!   writer per item
//!
//! Resolution for a sequence composes the format's sequence combinator with
//! its element writer, so sequence-of-T reuses the per-T rendering. When a
//! format has no entry for a shape, resolution falls back to a generic
//! structural writer that renders the value's named fields in declaration
//! order (its ordered JSON form).
//!
//! The registry also keys inbound parse functions by format name. The parse
//! side of a format is optional: CSV is serialize-only here.
//!
//! # Concurrency
//!
//! All registrations happen during process initialization, before the
//! registry is shared; afterwards every access is a read. The write
//! functions themselves are stateless and `Send + Sync`.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use crate::core::models::EncodeConfig;
use crate::core::output::{csv_writer, json_writer, jsonl_writer};
use crate::error::{Result, WireformError};
use crate::format::{CSV, JSON, JSONL};
use crate::payload::Shape;

/// A write function: serializes one value into the destination.
///
/// Writers are stateless and must not fail for a value matching their
/// declared shape; a shape mismatch is a caller bug surfaced as
/// [`WireformError::ShapeMismatch`].
pub type WriteFn = Arc<dyn Fn(&mut dyn Write, &Value) -> Result<()> + Send + Sync>;

/// A sequence combinator: frames the items and delegates per-element
/// rendering to the write function it receives.
pub type SequenceFn = Arc<dyn Fn(&mut dyn Write, &[Value], &WriteFn) -> Result<()> + Send + Sync>;

/// An inbound parse function: text to an ordered JSON value.
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Value> + Send + Sync>;

/// Registry of write functions keyed by format name and shape.
#[derive(Clone)]
pub struct WriterRegistry {
    writers: HashMap<(String, Shape), WriteFn>,
    elements: HashMap<String, WriteFn>,
    sequences: HashMap<String, SequenceFn>,
    parsers: HashMap<String, ParseFn>,
}

impl WriterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            writers: HashMap::new(),
            elements: HashMap::new(),
            sequences: HashMap::new(),
            parsers: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in formats wired up.
    ///
    /// CSV, JSON, and JSONL writers are registered for every shape; JSON
    /// and JSONL inbound parsers are registered. CSV has no inbound parser.
    pub fn with_defaults(config: &EncodeConfig) -> Self {
        let mut registry = Self::new();

        registry.register(CSV, Shape::Scalar, csv_writer::scalar_writer(config));
        registry.register(CSV, Shape::Record, csv_writer::record_writer(config));
        registry.register_element(CSV, csv_writer::element_writer(config));
        registry.register_sequence(CSV, csv_writer::sequence_writer(config));

        registry.register(JSON, Shape::Scalar, json_writer::element_writer(config));
        registry.register(JSON, Shape::Record, json_writer::element_writer(config));
        registry.register_element(JSON, json_writer::element_writer(config));
        registry.register_sequence(JSON, json_writer::sequence_writer(config));

        let jsonl_line: WriteFn = {
            let elem = jsonl_writer::element_writer(config);
            Arc::new(move |out, value| {
                elem(&mut *out, value)?;
                out.write_all(b"\n")?;
                Ok(())
            })
        };
        registry.register(JSONL, Shape::Scalar, jsonl_line.clone());
        registry.register(JSONL, Shape::Record, jsonl_line);
        registry.register_element(JSONL, jsonl_writer::element_writer(config));
        registry.register_sequence(JSONL, jsonl_writer::sequence_writer(config));

        registry.register_parser(JSON, Arc::new(|text| Ok(serde_json::from_str(text)?)));
        registry.register_parser(
            JSONL,
            Arc::new(|text| {
                let values = text
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(serde_json::from_str)
                    .collect::<std::result::Result<Vec<Value>, _>>()?;
                Ok(Value::Array(values))
            }),
        );

        registry
    }

    /// Registers a complete writer for one `(format, shape)` key.
    pub fn register(&mut self, format: &str, shape: Shape, writer: WriteFn) {
        self.writers.insert((format.to_lowercase(), shape), writer);
    }

    /// Registers the per-element writer for a format.
    pub fn register_element(&mut self, format: &str, writer: WriteFn) {
        self.elements.insert(format.to_lowercase(), writer);
    }

    /// Registers the sequence combinator for a format.
    pub fn register_sequence(&mut self, format: &str, sequence: SequenceFn) {
        self.sequences.insert(format.to_lowercase(), sequence);
    }

    /// Registers the inbound parse function for a format.
    pub fn register_parser(&mut self, format: &str, parser: ParseFn) {
        self.parsers.insert(format.to_lowercase(), parser);
    }

    /// Resolves the write function for a format and shape.
    ///
    /// Sequences compose the format's sequence combinator with its element
    /// writer. Anything unregistered falls back to the generic structural
    /// writer, so resolution always succeeds.
    pub fn resolve(&self, format: &str, shape: Shape) -> WriteFn {
        let key = (format.to_lowercase(), shape);
        if let Some(writer) = self.writers.get(&key) {
            return writer.clone();
        }
        if shape == Shape::Sequence {
            if let Some(sequence) = self.sequences.get(&key.0) {
                let sequence = sequence.clone();
                let element = self
                    .elements
                    .get(&key.0)
                    .cloned()
                    .unwrap_or_else(generic_writer);
                return Arc::new(move |out, value| match value {
                    Value::Array(items) => sequence(out, items, &element),
                    other => Err(WireformError::shape_mismatch(
                        Shape::Sequence,
                        Shape::of(other),
                        "resolving sequence writer",
                    )),
                });
            }
        }
        generic_writer()
    }

    /// Resolves the inbound parse function for a format.
    ///
    /// # Errors
    ///
    /// Returns [`WireformError::UnsupportedParse`] if the format has no
    /// registered parser.
    pub fn resolve_parser(&self, format: &str) -> Result<ParseFn> {
        self.parsers
            .get(&format.to_lowercase())
            .cloned()
            .ok_or_else(|| WireformError::unsupported_parse(format))
    }

    /// Returns `true` if a complete writer is registered for the key.
    pub fn has_writer(&self, format: &str, shape: Shape) -> bool {
        self.writers.contains_key(&(format.to_lowercase(), shape))
    }
}

impl Default for WriterRegistry {
    fn default() -> Self {
        Self::with_defaults(&EncodeConfig::default())
    }
}

/// The generic structural fallback writer.
///
/// Renders any value in its ordered JSON form: named fields appear in
/// declaration order, which is the closest text analogue of enumerating a
/// type's public readable members.
fn generic_writer() -> WriteFn {
    Arc::new(|out, value| {
        serde_json::to_writer(out, value)?;
        Ok(())
    })
}
