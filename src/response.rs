//! Response formatting.
//!
//! [`Responder`] drives the full pipeline for one request: negotiate the
//! format, resolve the write function for the payload's shape, encode the
//! value, and finalize the transport headers. The result is a
//! [`ResponseEnvelope`]: ordered header pairs plus the encoded body, owned
//! by the caller until flushed to the transport.
//!
//! # Example
//!
//! ```
//! use serde::Serialize;
//! use wireform::negotiate::RequestSignals;
//! use wireform::Responder;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Hello {
//!     result: String,
//! }
//!
//! # fn main() -> wireform::Result<()> {
//! let responder = Responder::new();
//! let signals = RequestSignals::new().with_path("/csv/syncreply/Hello");
//!
//! let envelope = responder.respond(&signals, &Hello {
//!     result: "Hello, World!".into(),
//! })?;
//!
//! assert_eq!(envelope.content_type(), Some("text/csv"));
//! assert_eq!(
//!     envelope.content_disposition(),
//!     Some("attachment;filename=Hello.csv"),
//! );
//! assert_eq!(envelope.body_text()?, "Result\r\n\"Hello, World!\"\r\n");
//! # Ok(())
//! # }
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::config::ResponderConfig;
use crate::core::registry::WriterRegistry;
use crate::error::{Result, WireformError};
use crate::format::{FormatDescriptor, FormatRegistry};
use crate::negotiate::{select_format, RequestSignals};
use crate::payload::Payload;

/// A finalized response: ordered header pairs and the encoded body.
///
/// The envelope is exclusively owned by the request that created it and
/// discarded after it is flushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseEnvelope {
    fn new(headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self { headers, body }
    }

    /// Returns the header pairs in the order they were set.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks a header up by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the `Content-Type` header value.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Returns the `Content-Disposition` header value.
    pub fn content_disposition(&self) -> Option<&str> {
        self.header("Content-Disposition")
    }

    /// Returns the encoded body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as text.
    ///
    /// # Errors
    ///
    /// Returns [`WireformError::Utf8`] if the body is not valid UTF-8.
    pub fn body_text(&self) -> Result<&str> {
        std::str::from_utf8(&self.body).map_err(|source| WireformError::Utf8 {
            context: "response body".to_string(),
            source,
        })
    }

    /// Writes the body into a transport sink.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<()> {
        sink.write_all(&self.body)?;
        Ok(())
    }

    /// Consumes the envelope, returning its body.
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

/// A structured error body rendered through the response pipeline.
///
/// Validation failures and other collaborator errors convert into this
/// shape so the error payload travels in the negotiated format, with the
/// same headers and streaming as a success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// Machine-readable error code tag
    pub error_code: String,
    /// Human-readable message
    pub message: String,
}

impl ResponseStatus {
    /// Creates a status from its parts.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

/// A resolved negotiation: the selected format and the payload to render.
///
/// Produced once per request and never mutated afterwards. Feed it to
/// [`Responder::format`] to obtain the finalized envelope.
#[derive(Debug, Clone, Copy)]
pub struct Negotiation<'a> {
    format: &'a FormatDescriptor,
    payload: &'a Payload,
}

impl<'a> Negotiation<'a> {
    /// Returns the resolved format descriptor.
    pub fn format(&self) -> &'a FormatDescriptor {
        self.format
    }

    /// Returns the payload to render.
    pub fn payload(&self) -> &'a Payload {
        self.payload
    }
}

/// The response formatter: negotiate, resolve, encode, finalize.
///
/// A responder is built once at startup and shared read-only across
/// requests; per-request state lives in the [`RequestSignals`] and the
/// returned [`ResponseEnvelope`].
pub struct Responder {
    formats: FormatRegistry,
    writers: WriterRegistry,
    config: ResponderConfig,
}

impl Responder {
    /// Creates a responder with the built-in formats and defaults.
    pub fn new() -> Self {
        Self::with_config(ResponderConfig::default())
    }

    /// Creates a responder from a configuration.
    pub fn with_config(config: ResponderConfig) -> Self {
        let mut formats = FormatRegistry::with_defaults();
        formats.set_default(&config.default_format);
        let writers = WriterRegistry::with_defaults(&config.encode);
        Self {
            formats,
            writers,
            config,
        }
    }

    /// Creates a responder from pre-built registries.
    ///
    /// Use this when custom formats were registered during startup.
    pub fn from_parts(
        formats: FormatRegistry,
        writers: WriterRegistry,
        config: ResponderConfig,
    ) -> Self {
        Self {
            formats,
            writers,
            config,
        }
    }

    /// Returns the format registry.
    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    /// Returns the format registry for startup registration.
    pub fn formats_mut(&mut self) -> &mut FormatRegistry {
        &mut self.formats
    }

    /// Returns the writer registry.
    pub fn writers(&self) -> &WriterRegistry {
        &self.writers
    }

    /// Returns the writer registry for startup registration.
    pub fn writers_mut(&mut self) -> &mut WriterRegistry {
        &mut self.writers
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ResponderConfig {
        &self.config
    }

    /// Negotiates the response format for the given signals.
    pub fn negotiate(&self, signals: &RequestSignals<'_>) -> Result<&FormatDescriptor> {
        let effective = if self.config.path_tokens {
            *signals
        } else {
            signals.without_path()
        };
        select_format(&self.formats, &effective)
    }

    /// Renders a serializable value into a finalized envelope.
    pub fn respond<T: Serialize>(
        &self,
        signals: &RequestSignals<'_>,
        value: &T,
    ) -> Result<ResponseEnvelope> {
        let payload = Payload::of(value)?;
        self.respond_payload(signals, &payload)
    }

    /// Renders a prepared payload into a finalized envelope.
    pub fn respond_payload(
        &self,
        signals: &RequestSignals<'_>,
        payload: &Payload,
    ) -> Result<ResponseEnvelope> {
        let negotiation = self.negotiate_payload(signals, payload)?;
        self.format(&negotiation)
    }

    /// Resolves the negotiation for a payload without encoding it.
    pub fn negotiate_payload<'a>(
        &'a self,
        signals: &RequestSignals<'_>,
        payload: &'a Payload,
    ) -> Result<Negotiation<'a>> {
        Ok(Negotiation {
            format: self.negotiate(signals)?,
            payload,
        })
    }

    /// Encodes a resolved negotiation into a finalized envelope.
    pub fn format(&self, negotiation: &Negotiation<'_>) -> Result<ResponseEnvelope> {
        let writer = self
            .writers
            .resolve(negotiation.format.name(), negotiation.payload.shape());
        let mut body = Vec::new();
        writer(&mut body, negotiation.payload.value())?;
        Ok(ResponseEnvelope::new(
            transport_headers(negotiation.format, negotiation.payload.name()),
            body,
        ))
    }

    /// Renders a structured error body in the negotiated format.
    ///
    /// Uses the same header-setting and encoding machinery as a success
    /// response. Negotiation failures still propagate: an unsatisfiable
    /// Accept header cannot carry an error body either.
    pub fn respond_error(
        &self,
        signals: &RequestSignals<'_>,
        status: &ResponseStatus,
    ) -> Result<ResponseEnvelope> {
        self.respond(signals, status)
    }

    /// Streams an encoded payload directly into a sink.
    ///
    /// Returns the transport headers; the body bytes go to the sink as the
    /// encoder produces them, without buffering the whole payload. If the
    /// sink rejects a write mid-stream (client disconnect), encoding stops,
    /// the partial output stands, and the failure is returned.
    pub fn stream_payload<W: Write>(
        &self,
        signals: &RequestSignals<'_>,
        payload: &Payload,
        sink: &mut W,
    ) -> Result<Vec<(String, String)>> {
        let format = self.negotiate(signals)?;
        let writer = self.writers.resolve(format.name(), payload.shape());
        writer(sink, payload.value())?;
        Ok(transport_headers(format, payload.name()))
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the ordered transport headers for a response.
///
/// The disposition filename is `<Name>.<extension>` with no space after the
/// semicolon; clients key their save-as behavior off these exact bytes.
fn transport_headers(format: &FormatDescriptor, name: &str) -> Vec<(String, String)> {
    vec![
        (
            "Content-Type".to_string(),
            format.media_type().to_string(),
        ),
        (
            "Content-Disposition".to_string(),
            format!("attachment;filename={}.{}", name, format.extension()),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Hello {
        result: String,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Movie {
        title: String,
        rating: f64,
    }

    fn hello() -> Hello {
        Hello {
            result: "Hello, World!".into(),
        }
    }

    #[test]
    fn test_csv_hello_exact_envelope() {
        let responder = Responder::new();
        let signals = RequestSignals::new().with_path("/csv/syncreply/Hello");

        let envelope = responder.respond(&signals, &hello()).unwrap();

        assert_eq!(envelope.content_type(), Some("text/csv"));
        assert_eq!(
            envelope.content_disposition(),
            Some("attachment;filename=Hello.csv")
        );
        assert_eq!(envelope.body_text().unwrap(), "Result\r\n\"Hello, World!\"\r\n");
    }

    #[test]
    fn test_csv_hello_via_accept_header() {
        let responder = Responder::new();
        let signals = RequestSignals::new()
            .with_path("/hello/World!")
            .with_accept("text/csv");

        let envelope = responder.respond(&signals, &hello()).unwrap();

        assert_eq!(envelope.content_type(), Some("text/csv"));
        assert_eq!(
            envelope.content_disposition(),
            Some("attachment;filename=Hello.csv")
        );
        assert_eq!(envelope.body_text().unwrap(), "Result\r\n\"Hello, World!\"\r\n");
    }

    #[test]
    fn test_movie_list_disposition_uses_element_name() {
        let responder = Responder::new();
        let signals = RequestSignals::new().with_override("csv");
        let movies = vec![
            Movie {
                title: "Alien".into(),
                rating: 8.5,
            },
            Movie {
                title: "Top Gun".into(),
                rating: 6.9,
            },
        ];

        let envelope = responder.respond(&signals, &movies).unwrap();

        assert_eq!(
            envelope.content_disposition(),
            Some("attachment;filename=Movie.csv")
        );
        let lines: Vec<&str> = envelope
            .body_text()
            .unwrap()
            .split("\r\n")
            .filter(|l| !l.is_empty())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Title,Rating");
    }

    #[test]
    fn test_wrapper_dto_keeps_name_unwraps_body() {
        let responder = Responder::new();
        let signals = RequestSignals::new().with_override("csv");
        let payload = Payload::named(
            "Movies",
            json!({"movies": [
                {"title": "Alien"},
                {"title": "Top Gun"},
                {"title": "Jaws"},
                {"title": "Heat"},
                {"title": "Se7en"},
            ]}),
        );

        let envelope = responder.respond_payload(&signals, &payload).unwrap();

        assert_eq!(
            envelope.content_disposition(),
            Some("attachment;filename=Movies.csv")
        );
        let lines: Vec<&str> = envelope
            .body_text()
            .unwrap()
            .split("\r\n")
            .filter(|l| !l.is_empty())
            .collect();
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_json_envelope() {
        let responder = Responder::new();
        let envelope = responder
            .respond(&RequestSignals::new(), &hello())
            .unwrap();

        assert_eq!(envelope.content_type(), Some("application/json"));
        assert_eq!(
            envelope.content_disposition(),
            Some("attachment;filename=Hello.json")
        );
        assert_eq!(envelope.body_text().unwrap(), r#"{"Result":"Hello, World!"}"#);
    }

    #[test]
    fn test_unsatisfiable_accept_propagates() {
        let responder = Responder::new();
        let signals = RequestSignals::new().with_accept("application/xml");
        let err = responder.respond(&signals, &hello()).unwrap_err();
        assert!(err.is_no_format_resolved());
    }

    #[test]
    fn test_respond_error_in_negotiated_format() {
        let responder = Responder::new();
        let signals = RequestSignals::new().with_path("/csv/syncreply/Movies");
        let status = ResponseStatus::new("GreaterThan", "'rating' must be greater than '0'.");

        let envelope = responder.respond_error(&signals, &status).unwrap();

        assert_eq!(envelope.content_type(), Some("text/csv"));
        let body = envelope.body_text().unwrap();
        assert!(body.starts_with("error_code,message\r\n"));
        assert!(body.contains("GreaterThan"));
    }

    #[test]
    fn test_path_tokens_can_be_disabled() {
        let responder =
            Responder::with_config(ResponderConfig::new().without_path_tokens());
        let signals = RequestSignals::new().with_path("/csv/syncreply/Hello");
        let envelope = responder.respond(&signals, &hello()).unwrap();
        assert_eq!(envelope.content_type(), Some("application/json"));
    }

    #[test]
    fn test_stream_payload_writes_sink_and_returns_headers() {
        let responder = Responder::new();
        let signals = RequestSignals::new().with_override("csv");
        let payload = Payload::of(&hello()).unwrap();

        let mut sink = Vec::new();
        let headers = responder
            .stream_payload(&signals, &payload, &mut sink)
            .unwrap();

        assert_eq!(headers[0].0, "Content-Type");
        assert_eq!(headers[0].1, "text/csv");
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "Result\r\n\"Hello, World!\"\r\n"
        );
    }

    /// Sink that fails after a fixed number of bytes, like a client that
    /// disconnects mid-stream.
    struct Disconnecting {
        remaining: usize,
        written: Vec<u8>,
    }

    impl Write for Disconnecting {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "client disconnected",
                ));
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_client_disconnect_stops_stream_with_partial_output() {
        let responder = Responder::new();
        let signals = RequestSignals::new().with_override("jsonl");
        let rows: Vec<serde_json::Value> =
            (0..100).map(|n| json!({"n": n, "pad": "x".repeat(16)})).collect();
        let payload = Payload::named("Rows", json!(rows));

        let mut sink = Disconnecting {
            remaining: 64,
            written: Vec::new(),
        };
        let err = responder
            .stream_payload(&signals, &payload, &mut sink)
            .unwrap_err();

        assert!(err.is_encoding());
        assert!(!sink.written.is_empty());
        assert!(sink.written.len() <= 64);
    }

    #[test]
    fn test_two_step_negotiate_then_format() {
        let responder = Responder::new();
        let signals = RequestSignals::new().with_override("csv");
        let payload = Payload::of(&hello()).unwrap();

        let negotiation = responder.negotiate_payload(&signals, &payload).unwrap();
        assert_eq!(negotiation.format().name(), "csv");
        assert_eq!(negotiation.payload().name(), "Hello");

        let envelope = responder.format(&negotiation).unwrap();
        assert_eq!(envelope.body_text().unwrap(), "Result\r\n\"Hello, World!\"\r\n");
    }

    #[test]
    fn test_envelope_header_lookup_is_case_insensitive() {
        let responder = Responder::new();
        let envelope = responder
            .respond(&RequestSignals::new(), &hello())
            .unwrap();
        assert_eq!(envelope.header("content-type"), Some("application/json"));
        assert!(envelope.header("X-Missing").is_none());
    }

    #[test]
    fn test_header_order_is_stable() {
        let responder = Responder::new();
        let envelope = responder
            .respond(&RequestSignals::new(), &hello())
            .unwrap();
        let names: Vec<&str> = envelope.headers().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["Content-Type", "Content-Disposition"]);
    }

    #[test]
    fn test_write_to_sink() {
        let responder = Responder::new();
        let envelope = responder
            .respond(&RequestSignals::new(), &hello())
            .unwrap();
        let mut out = Vec::new();
        envelope.write_to(&mut out).unwrap();
        assert_eq!(out, envelope.body());
    }
}
