//! Core types and functionality.
//!
//! This module contains the encoding machinery underneath the responder:
//!
//! - [`models`] — [`EncodeConfig`]
//! - [`output`] — format writers ([`write_csv`], [`write_json`], [`write_jsonl`])
//! - [`registry`] — the shape-keyed [`WriterRegistry`]
//! - [`validate`] — the comparison validation collaborator

pub mod models;
pub mod output;
pub mod registry;
pub mod validate;

// Re-export commonly used types at the module level
pub use models::EncodeConfig;
pub use output::{to_csv, to_json, to_jsonl, write_csv, write_json, write_jsonl};
pub use registry::{ParseFn, SequenceFn, WriteFn, WriterRegistry};
pub use validate::{Comparison, ComparisonValidator, ComparisonValue, ValidationFailure};
