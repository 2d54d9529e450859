//! Streaming row sinks for large sequences.
//!
//! The in-memory writers in [`core::output`](crate::core::output) take the
//! whole sequence up front. For payloads too large to buffer, the streaming
//! sinks accept one record at a time and push each row to the destination
//! as it arrives.
//!
//! If the destination rejects a write mid-stream (a disconnecting client),
//! the failing call returns the error and no further rows are emitted; rows
//! already flushed stand as partial output.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use wireform::core::models::EncodeConfig;
//! use wireform::streaming::CsvStream;
//!
//! # fn main() -> wireform::Result<()> {
//! let mut stream = CsvStream::new(Vec::new(), &EncodeConfig::new());
//!
//! stream.write(&json!({"title": "Alien", "rating": 8.5}))?;
//! stream.write(&json!({"title": "Top Gun", "rating": 6.9}))?;
//!
//! let bytes = stream.finish()?;
//! assert_eq!(
//!     String::from_utf8(bytes).unwrap(),
//!     "title,rating\r\nAlien,8.5\r\nTop Gun,6.9\r\n",
//! );
//! # Ok(())
//! # }
//! ```

use std::io::{self, Write};

use csv::Terminator;
use serde_json::Value;

use crate::core::models::EncodeConfig;
use crate::core::output::csv_writer::{cell_text, check_row, derive_header};
use crate::error::Result;
use crate::payload::Shape;

/// Incremental CSV writer: header on first record, one row per write.
///
/// The header comes from the config's explicit columns or from the first
/// record's field names. Every later record must match the first record's
/// shape and field list; a divergent record fails the write and leaves the
/// rows already emitted in the destination.
pub struct CsvStream<W: Write> {
    writer: csv::Writer<W>,
    columns: Option<Vec<String>>,
    header: Option<Vec<String>>,
    first_shape: Option<Shape>,
    rows: usize,
}

impl<W: Write> CsvStream<W> {
    /// Creates a stream over the sink.
    pub fn new(sink: W, config: &EncodeConfig) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(config.delimiter)
            .terminator(Terminator::CRLF)
            .from_writer(sink);
        Self {
            writer,
            columns: config.columns.clone(),
            header: None,
            first_shape: None,
            rows: 0,
        }
    }

    /// Writes one record as one data row, emitting the header first if
    /// this is the first record.
    pub fn write(&mut self, record: &Value) -> Result<()> {
        if self.header.is_none() {
            let header = derive_header(std::slice::from_ref(record), self.columns.as_deref())?;
            self.writer.write_record(&header)?;
            self.first_shape = Some(Shape::of(record));
            self.header = Some(header);
        }

        let header = self.header.as_ref().unwrap();
        check_row(record, header, self.first_shape, self.rows)?;

        let cells: Vec<String> = match record {
            Value::Object(map) => map.values().map(cell_text).collect(),
            scalar => vec![cell_text(scalar)],
        };
        self.writer.write_record(&cells)?;
        self.rows += 1;
        Ok(())
    }

    /// Returns the number of data rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Finishes the stream, returning the sink.
    ///
    /// An empty stream still emits the header row: the explicit columns if
    /// configured, otherwise the single `Result` column.
    pub fn finish(mut self) -> Result<W> {
        if self.header.is_none() {
            let header = derive_header(&[], self.columns.as_deref())?;
            self.writer.write_record(&header)?;
        }
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()).into())
    }
}

/// Incremental JSON Lines writer: one compact JSON object per write.
pub struct JsonlStream<W: Write> {
    sink: W,
    rows: usize,
}

impl<W: Write> JsonlStream<W> {
    /// Creates a stream over the sink.
    pub fn new(sink: W) -> Self {
        Self { sink, rows: 0 }
    }

    /// Writes one record as one line.
    pub fn write(&mut self, record: &Value) -> Result<()> {
        serde_json::to_writer(&mut self.sink, record)?;
        self.sink.write_all(b"\n")?;
        self.rows += 1;
        Ok(())
    }

    /// Returns the number of lines written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Finishes the stream, returning the sink.
    pub fn finish(mut self) -> Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
