//! Core configuration model for encoders.

use serde::{Deserialize, Serialize};

/// Configuration for the format encoders.
/// Controls delimiter, JSON layout, and CSV table shaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeConfig {
    /// CSV field delimiter (default: `,`)
    pub delimiter: u8,
    /// Pretty-print JSON output (default: false, compact wire form)
    pub pretty: bool,
    /// Unwrap a record whose only field is a sequence and encode the
    /// sequence itself (default: true, the response-DTO wrapper convention)
    pub unwrap_single_sequence: bool,
    /// Explicit CSV header columns; also used when a sequence is empty and
    /// no element exists to derive the header from (default: none)
    pub columns: Option<Vec<String>>,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            pretty: false,
            unwrap_single_sequence: true,
            columns: None,
        }
    }
}

impl EncodeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the CSV field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enables pretty-printed JSON output.
    #[must_use]
    pub fn with_pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Sets explicit CSV header columns.
    ///
    /// Rows must then carry exactly these fields, in this order.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Disables the single-sequence wrapper unwrap.
    #[must_use]
    pub fn preserve_wrappers(mut self) -> Self {
        self.unwrap_single_sequence = false;
        self
    }
}
