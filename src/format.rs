//! Format descriptors and the process-wide format registry.
//!
//! A [`FormatDescriptor`] identifies one text format: its name (the token
//! used in URLs and CLI flags), its canonical media type (the `Content-Type`
//! value), and its default file extension (the `Content-Disposition`
//! filename suffix).
//!
//! Descriptors live in a [`FormatRegistry`]. Registration happens once at
//! startup; afterwards the registry is read-only and safe to share across
//! request handlers.
//!
//! # Example
//!
//! ```rust
//! use wireform::format::{FormatDescriptor, FormatRegistry};
//!
//! # fn main() -> wireform::Result<()> {
//! let registry = FormatRegistry::with_defaults();
//!
//! let csv = registry.by_name("csv").unwrap();
//! assert_eq!(csv.media_type(), "text/csv");
//! assert_eq!(csv.extension(), "csv");
//!
//! // Custom formats are registered up front
//! let mut registry = FormatRegistry::with_defaults();
//! registry.register(FormatDescriptor::new("tsv", "text/tab-separated-values", "tsv"))?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, WireformError};

/// The built-in CSV format name.
pub const CSV: &str = "csv";
/// The built-in JSON format name.
pub const JSON: &str = "json";
/// The built-in JSON Lines format name.
pub const JSONL: &str = "jsonl";

/// Identifies a text format: name, canonical media type, file extension.
///
/// Descriptors are immutable; once registered they are never replaced or
/// mutated for the lifetime of the process.
///
/// # Example
///
/// ```rust
/// use wireform::format::FormatDescriptor;
///
/// let csv = FormatDescriptor::csv();
/// assert_eq!(csv.name(), "csv");
/// assert_eq!(csv.media_type(), "text/csv");
/// assert_eq!(csv.extension(), "csv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    name: String,
    media_type: String,
    extension: String,
}

impl FormatDescriptor {
    /// Creates a descriptor from its parts.
    ///
    /// The name is lowercased: format names are case-insensitive tokens and
    /// the registry stores their canonical form.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().to_lowercase(),
            media_type: media_type.into(),
            extension: extension.into(),
        }
    }

    /// The built-in CSV descriptor (`text/csv`, `.csv`).
    pub fn csv() -> Self {
        Self::new(CSV, "text/csv", "csv")
    }

    /// The built-in JSON descriptor (`application/json`, `.json`).
    pub fn json() -> Self {
        Self::new(JSON, "application/json", "json")
    }

    /// The built-in JSON Lines descriptor (`application/x-ndjson`, `.jsonl`).
    pub fn jsonl() -> Self {
        Self::new(JSONL, "application/x-ndjson", "jsonl")
    }

    /// Returns the format name (lowercase token).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the canonical media type for `Content-Type`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Returns the default file extension (without dot).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the primary type of the media type (`text` for `text/csv`).
    pub fn primary_type(&self) -> &str {
        self.media_type.split('/').next().unwrap_or(&self.media_type)
    }

    /// Returns `true` if the given media type matches this descriptor.
    ///
    /// Matching is case-insensitive and ignores media type parameters, so
    /// `text/csv; charset=utf-8` matches `text/csv`.
    pub fn matches_media_type(&self, candidate: &str) -> bool {
        let essence = candidate.split(';').next().unwrap_or(candidate).trim();
        essence.eq_ignore_ascii_case(&self.media_type)
    }
}

impl std::fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.media_type)
    }
}

/// Process-wide, register-once collection of format descriptors.
///
/// Declaration order is preserved and meaningful: negotiation tiebreaks and
/// `primary_type` wildcard matches pick the earliest registered format.
///
/// # Concurrency
///
/// All registrations happen during process initialization, before the
/// registry is shared. After that, every access is a read.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    descriptors: Vec<FormatDescriptor>,
    default_name: String,
}

impl FormatRegistry {
    /// Creates an empty registry with the given default format name.
    ///
    /// The default applies when a request carries no usable negotiation
    /// signal. It does not have to be registered yet, but negotiation will
    /// fail until it is.
    pub fn new(default_name: impl Into<String>) -> Self {
        Self {
            descriptors: Vec::new(),
            default_name: default_name.into().to_lowercase(),
        }
    }

    /// Creates a registry with the built-in formats (json, csv, jsonl) and
    /// JSON as the process default.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new(JSON);
        // Registration order is the declaration order used for tiebreaks.
        let builtins = [
            FormatDescriptor::json(),
            FormatDescriptor::csv(),
            FormatDescriptor::jsonl(),
        ];
        for descriptor in builtins {
            registry
                .register(descriptor)
                .expect("built-in formats are distinct");
        }
        registry
    }

    /// Registers a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`WireformError::DuplicateFormat`] if a descriptor with the
    /// same name is already registered. The registry never replaces an
    /// existing descriptor.
    pub fn register(&mut self, descriptor: FormatDescriptor) -> Result<()> {
        if self.by_name(descriptor.name()).is_some() {
            return Err(WireformError::duplicate_format(descriptor.name()));
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Changes the process default format name.
    pub fn set_default(&mut self, name: impl Into<String>) {
        self.default_name = name.into().to_lowercase();
    }

    /// Looks a descriptor up by name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Option<&FormatDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    /// Looks a descriptor up by media type, ignoring parameters.
    pub fn by_media_type(&self, media_type: &str) -> Option<&FormatDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.matches_media_type(media_type))
    }

    /// Returns the first registered descriptor with the given primary type.
    ///
    /// Used for `type/*` media ranges: `text/*` resolves to the first
    /// registered `text/...` format.
    pub fn by_primary_type(&self, primary: &str) -> Option<&FormatDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.primary_type().eq_ignore_ascii_case(primary))
    }

    /// Returns the process default descriptor, if registered.
    pub fn default_format(&self) -> Option<&FormatDescriptor> {
        self.by_name(&self.default_name)
    }

    /// Returns the configured default format name.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Iterates descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FormatDescriptor> {
        self.descriptors.iter()
    }

    /// Returns all registered format names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    /// Returns the number of registered formats.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if no format is registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
