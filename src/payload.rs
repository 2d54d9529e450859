//! The value being rendered into a response.
//!
//! This module provides [`Payload`], the normalized representation of a
//! response value. Callers hand the pipeline any `T: Serialize`; the payload
//! captures its ordered field structure and its simple type name, which later
//! drives the `Content-Disposition` filename.
//!
//! # Overview
//!
//! A payload consists of:
//! - **`name`** — the simple (unqualified) type name of the value
//! - **`value`** — the value converted into an ordered [`serde_json::Value`]
//!
//! # Examples
//!
//! ## From a typed value
//!
//! ```
//! use serde::Serialize;
//! use wireform::payload::{Payload, Shape};
//!
//! #[derive(Serialize)]
//! struct Hello {
//!     result: String,
//! }
//!
//! # fn main() -> wireform::Result<()> {
//! let payload = Payload::of(&Hello { result: "Hello, World!".into() })?;
//! assert_eq!(payload.name(), "Hello");
//! assert_eq!(payload.shape(), Shape::Record);
//! # Ok(())
//! # }
//! ```
//!
//! ## Container types defer to their element
//!
//! ```
//! use serde::Serialize;
//! use wireform::payload::{Payload, Shape};
//!
//! #[derive(Serialize)]
//! struct Movie {
//!     title: String,
//! }
//!
//! # fn main() -> wireform::Result<()> {
//! let movies = vec![Movie { title: "Top Gun".into() }];
//! let payload = Payload::of(&movies)?;
//! assert_eq!(payload.name(), "Movie");
//! assert_eq!(payload.shape(), Shape::Sequence);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// The structural category of a value being serialized.
///
/// Shapes are the keys of the writer registry: every registered write
/// function targets exactly one shape, and resolution pairs the negotiated
/// format with the payload's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A bare scalar (string, number, boolean, or null)
    Scalar,
    /// A plain object with named, ordered fields
    Record,
    /// A homogeneous ordered sequence of records (or scalars)
    Sequence,
}

impl Shape {
    /// Classifies a JSON value into its shape.
    pub fn of(value: &Value) -> Shape {
        match value {
            Value::Object(_) => Shape::Record,
            Value::Array(_) => Shape::Sequence,
            _ => Shape::Scalar,
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Scalar => write!(f, "scalar"),
            Shape::Record => write!(f, "record"),
            Shape::Sequence => write!(f, "sequence"),
        }
    }
}

/// A response value paired with its simple type name.
///
/// The name feeds the `Content-Disposition` filename (`<Name>.<ext>`), so it
/// must be the unqualified type name with case preserved. [`Payload::of`]
/// captures it from the static type; [`Payload::named`] sets it explicitly
/// for dynamically built values.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    name: String,
    value: Value,
}

impl Payload {
    /// Builds a payload from any serializable value.
    ///
    /// The value is converted once into its ordered JSON form; field order
    /// follows declaration order. The payload name is the simple type name
    /// of `T`, with containers (`Vec`, slices, `Box`, `Arc`, `Option`)
    /// deferring to their element type.
    ///
    /// # Errors
    ///
    /// Returns [`WireformError::Json`](crate::WireformError::Json) if the
    /// value cannot be represented as JSON (e.g., a map with non-string keys).
    pub fn of<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Self {
            name: simple_type_name(std::any::type_name::<T>()),
            value: serde_json::to_value(value)?,
        })
    }

    /// Builds a payload from a pre-built JSON value and an explicit name.
    ///
    /// Use this when the value is constructed dynamically (e.g., parsed from
    /// an inbound document) and there is no static type to name it.
    pub fn named(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Returns the simple type name used for the download filename.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value in its ordered JSON form.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the shape of the value.
    pub fn shape(&self) -> Shape {
        Shape::of(&self.value)
    }

    /// Consumes the payload, returning its parts.
    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }
}

/// Reduces a `std::any::type_name` string to its simple, unqualified form.
///
/// Module paths are stripped everywhere. Containers defer to their first
/// type parameter so `Vec<demo::Movie>` names itself `Movie`, matching the
/// element rows actually rendered.
pub(crate) fn simple_type_name(full: &str) -> String {
    let full = full.trim().trim_start_matches('&').trim_start_matches("mut ");

    // Slice syntax: "[demo::Movie]"
    if let Some(inner) = full.strip_prefix('[') {
        return simple_type_name(inner.trim_end_matches(']'));
    }

    let (head, args) = match full.find('<') {
        Some(open) => (
            &full[..open],
            Some(full[open + 1..].trim_end_matches('>')),
        ),
        None => (full, None),
    };
    let head = head.rsplit("::").next().unwrap_or(head);

    match (head, args) {
        ("Vec" | "VecDeque" | "Box" | "Arc" | "Rc" | "Option", Some(args)) => {
            simple_type_name(first_type_argument(args))
        }
        _ => head.to_string(),
    }
}

/// Splits off the first comma-separated type argument at the top nesting level.
fn first_type_argument(args: &str) -> &str {
    let mut depth = 0usize;
    for (i, c) in args.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return args[..i].trim(),
            _ => {}
        }
    }
    args.trim()
}
