//! # Wireform
//!
//! A Rust library for rendering typed values into negotiated text formats
//! for HTTP-style responses.
//!
//! ## Overview
//!
//! Wireform is the serialization core of a response pipeline. For each
//! request it:
//!
//! 1. **Negotiates** the response format from the request's signals — an
//!    explicit endpoint override, a format token embedded in the URL, or
//!    the Accept header — with a process-wide default underneath
//! 2. **Resolves** a write function for the negotiated format and the
//!    value's shape (scalar, record, or homogeneous sequence) through a
//!    shape-keyed registry
//! 3. **Encodes** the value into the response body — CSV with RFC 4180
//!    quoting and CRLF terminators, JSON, or JSON Lines
//! 4. **Finalizes** the transport headers: `Content-Type` and a
//!    `Content-Disposition` download filename derived from the value's
//!    type name
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Serialize;
//! use wireform::negotiate::RequestSignals;
//! use wireform::Responder;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Movie {
//!     title: String,
//!     rating: f64,
//! }
//!
//! fn main() -> wireform::Result<()> {
//!     let responder = Responder::new();
//!
//!     // A path-embedded format token wins over the Accept header
//!     let signals = RequestSignals::new()
//!         .with_path("/csv/syncreply/Movies")
//!         .with_accept("application/xml");
//!
//!     let movies = vec![
//!         Movie { title: "Alien".into(), rating: 8.5 },
//!         Movie { title: "Top Gun".into(), rating: 6.9 },
//!     ];
//!
//!     let envelope = responder.respond(&signals, &movies)?;
//!
//!     assert_eq!(envelope.content_type(), Some("text/csv"));
//!     assert_eq!(envelope.body_text()?, "Title,Rating\r\nAlien,8.5\r\nTop Gun,6.9\r\n");
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming for Large Payloads
//!
//! The in-memory writers buffer the encoded body; for sequences too large
//! to hold, use the row sinks in [`streaming`]:
//!
//! ```rust
//! use serde_json::json;
//! use wireform::core::models::EncodeConfig;
//! use wireform::streaming::CsvStream;
//!
//! # fn main() -> wireform::Result<()> {
//! let mut stream = CsvStream::new(Vec::new(), &EncodeConfig::new());
//! for n in 0..1000 {
//!     stream.write(&json!({"n": n}))?;
//! }
//! let bytes = stream.finish()?;
//! # assert!(!bytes.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - [`response`] — **The response formatter** (start here)
//!   - [`Responder`] — negotiate → resolve → encode → finalize
//!   - [`ResponseEnvelope`] — ordered headers + encoded body
//! - [`negotiate`] — [`RequestSignals`](negotiate::RequestSignals),
//!   [`select_format`](negotiate::select_format), Accept header parsing
//! - [`format`] — [`FormatDescriptor`](format::FormatDescriptor) and the
//!   register-once [`FormatRegistry`](format::FormatRegistry)
//! - [`payload`] — [`Payload`] and [`Shape`](payload::Shape)
//! - [`core`] — encoding machinery
//!   - [`core::registry`] — the shape-keyed writer registry
//!   - [`core::output`] — CSV / JSON / JSONL writers
//!   - [`core::validate`] — the comparison validation collaborator
//! - [`streaming`] — incremental row sinks for large sequences
//! - [`config`] — [`ResponderConfig`](config::ResponderConfig)
//! - [`error`] — unified error types ([`WireformError`], [`Result`])
//! - [`prelude`] — convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod negotiate;
pub mod payload;
pub mod response;
pub mod streaming;

// Re-export the main types at the crate root for convenience
pub use error::{Result, WireformError};
pub use payload::Payload;
pub use response::{Responder, ResponseEnvelope};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use wireform::prelude::*;
/// ```
pub mod prelude {
    // The pipeline
    pub use crate::response::{Negotiation, Responder, ResponseEnvelope, ResponseStatus};

    // Error types
    pub use crate::error::{Result, WireformError};

    // Payload model
    pub use crate::payload::{Payload, Shape};

    // Negotiation
    pub use crate::negotiate::{select_format, RequestSignals};

    // Formats
    pub use crate::format::{FormatDescriptor, FormatRegistry};

    // Configuration
    pub use crate::config::ResponderConfig;
    pub use crate::core::models::EncodeConfig;

    // Encoding (string converters and stream writers)
    pub use crate::core::output::{to_csv, to_json, to_jsonl, write_csv, write_json, write_jsonl};
    pub use crate::core::registry::WriterRegistry;

    // Validation collaborator
    pub use crate::core::validate::{
        Comparison, ComparisonValidator, ComparisonValue, ValidationFailure,
    };

    // Streaming sinks
    pub use crate::streaming::{CsvStream, JsonlStream};
}
