//! Unified error types for wireform.
//!
//! This module provides a single [`WireformError`] enum that covers all error
//! cases in the library. This design follows the pattern used by popular crates
//! like `reqwest`, `serde_json`, and `csv`.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging
//!
//! Negotiation fallbacks are not errors: the precedence chain in
//! [`negotiate`](crate::negotiate) absorbs unmatched signals internally and
//! only surfaces [`NoFormatResolved`](WireformError::NoFormatResolved) once
//! every signal is exhausted.

use std::io;

use thiserror::Error;

use crate::payload::Shape;

/// A specialized [`Result`] type for wireform operations.
///
/// This type is broadly used across the library for any operation that
/// may produce an error.
///
/// # Example
///
/// ```rust
/// use wireform::error::Result;
/// use wireform::ResponseEnvelope;
///
/// fn my_function() -> Result<Option<ResponseEnvelope>> {
///     // ... operations that may fail
///     Ok(None)
/// }
/// ```
pub type Result<T> = std::result::Result<T, WireformError>;

/// The error type for all wireform operations.
///
/// This enum represents all possible errors that can occur when resolving,
/// encoding, or finalizing a response. Each variant contains context about
/// what went wrong and, where applicable, the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WireformError {
    /// An I/O error occurred.
    ///
    /// This typically happens when the destination sink rejects a write
    /// (e.g., a closed connection). Partial output already flushed to the
    /// sink is accepted; the write is never retried.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// None of the negotiation signals matched a registered format.
    ///
    /// Raised only after the full precedence chain (explicit override,
    /// path token, Accept header, process default) is exhausted. Maps to
    /// HTTP 406 Not Acceptable.
    #[error("No registered format satisfies the request{}", accept.as_ref().map(|a| format!(" (Accept: {a})")).unwrap_or_default())]
    NoFormatResolved {
        /// The Accept header that was offered, if any
        accept: Option<String>,
    },

    /// A writer was resolved for a shape the actual value does not satisfy.
    ///
    /// This is a programming/integration error on the caller's side, for
    /// example a heterogeneous sequence handed to the homogeneous sequence
    /// writer. It is surfaced immediately and never retried.
    #[error("Shape mismatch while {context}: expected {expected}, found {found}")]
    ShapeMismatch {
        /// The shape the resolved writer was registered for
        expected: Shape,
        /// The shape actually encountered
        found: Shape,
        /// What the encoder was doing when the mismatch surfaced
        context: String,
    },

    /// A format name was registered twice.
    ///
    /// The format registry is write-once: descriptors are registered during
    /// process initialization and never replaced afterwards.
    #[error("Format '{name}' is already registered")]
    DuplicateFormat {
        /// The name that collided
        name: String,
    },

    /// No inbound parser is registered for the format.
    ///
    /// The outbound writer side of a format can exist without the inbound
    /// parse side (CSV is serialize-only).
    #[error("Format '{format}' has no inbound parser")]
    UnsupportedParse {
        /// The format whose parse function was requested
        format: String,
    },

    /// CSV encoding error.
    ///
    /// Raised when the `csv` writer rejects a record mid-stream. Rows
    /// already emitted stay in the destination.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    ///
    /// This can occur when converting a value into its ordered JSON form
    /// or when writing JSON/JSONL output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid date in a comparison value.
    ///
    /// Timestamp comparison targets expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// UTF-8 encoding error.
    ///
    /// Occurs when an encoded body is not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::str::Utf8Error,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl WireformError {
    /// Creates a negotiation failure from the Accept header that was offered.
    pub fn no_format_resolved(accept: Option<&str>) -> Self {
        WireformError::NoFormatResolved {
            accept: accept.map(ToString::to_string),
        }
    }

    /// Creates a shape mismatch error.
    pub fn shape_mismatch(expected: Shape, found: Shape, context: impl Into<String>) -> Self {
        WireformError::ShapeMismatch {
            expected,
            found,
            context: context.into(),
        }
    }

    /// Creates a duplicate format registration error.
    pub fn duplicate_format(name: impl Into<String>) -> Self {
        WireformError::DuplicateFormat { name: name.into() }
    }

    /// Creates an unsupported inbound parse error.
    pub fn unsupported_parse(format: impl Into<String>) -> Self {
        WireformError::UnsupportedParse {
            format: format.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        WireformError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, WireformError::Io(_))
    }

    /// Returns `true` if this is a negotiation failure (HTTP 406).
    pub fn is_no_format_resolved(&self) -> bool {
        matches!(self, WireformError::NoFormatResolved { .. })
    }

    /// Returns `true` if this is a shape mismatch.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, WireformError::ShapeMismatch { .. })
    }

    /// Returns `true` if this is an encoding failure (IO, CSV, or JSON).
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            WireformError::Io(_) | WireformError::Csv(_) | WireformError::Json(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
