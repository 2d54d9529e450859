//! Output format writers.
//!
//! This module provides writers for the built-in formats:
//! - [`write_csv`] / [`to_csv`] - RFC 4180 CSV with CRLF terminators
//! - [`write_json`] / [`to_json`] - JSON (compact wire form by default)
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines (one JSON per line)
//!
//! Each writer module also exposes its per-element writer and its sequence
//! combinator to the registry, which composes them at resolution time: the
//! sequence combinator receives the element writer as a callback, so
//! sequence-of-T reuses the per-T rendering without duplicating any
//! format-specific logic.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use wireform::core::output::{to_csv, to_json};
//! use wireform::core::models::EncodeConfig;
//!
//! # fn main() -> wireform::Result<()> {
//! let movies = json!([
//!     {"title": "Alien", "rating": 8.5},
//! ]);
//!
//! let config = EncodeConfig::new();
//! assert_eq!(to_csv(&movies, &config)?, "title,rating\r\nAlien,8.5\r\n");
//! assert_eq!(to_json(&movies, &config)?, r#"[{"title":"Alien","rating":8.5}]"#);
//! # Ok(())
//! # }
//! ```

pub(crate) mod csv_writer;
pub(crate) mod json_writer;
pub(crate) mod jsonl_writer;

pub use csv_writer::{to_csv, write_csv};
pub use json_writer::{to_json, write_json};
pub use jsonl_writer::{to_jsonl, write_jsonl};
