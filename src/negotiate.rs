//! Content negotiation.
//!
//! Given a request's negotiation signals, [`select_format`] picks one
//! registered [`FormatDescriptor`]. Precedence, highest first:
//!
//! 1. an explicit override attached to the matched endpoint
//! 2. a format token embedded in the URL (a leading path segment like
//!    `/csv/...`, or a `format=` query parameter)
//! 3. the Accept header's preferred media type (highest q-value first,
//!    ties broken by declaration order)
//! 4. the process-wide default format
//!
//! A signal that does not resolve to a registered format falls through to
//! the next one. The default applies when the Accept header is absent,
//! yields no usable media range, or offers a `*/*` wildcard; a concrete,
//! unregistered Accept with no higher-precedence signal fails with
//! [`NoFormatResolved`](crate::WireformError::NoFormatResolved) instead of
//! silently defaulting.
//!
//! # Example
//!
//! ```
//! use wireform::format::FormatRegistry;
//! use wireform::negotiate::{select_format, RequestSignals};
//!
//! # fn main() -> wireform::Result<()> {
//! let registry = FormatRegistry::with_defaults();
//!
//! // Path token beats a conflicting Accept header
//! let signals = RequestSignals::new()
//!     .with_path("/csv/syncreply/Movies")
//!     .with_accept("application/xml");
//!
//! let format = select_format(&registry, &signals)?;
//! assert_eq!(format.name(), "csv");
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, WireformError};
use crate::format::{FormatDescriptor, FormatRegistry};

/// The negotiation signals carried by one request.
///
/// All fields are optional; an empty set of signals resolves to the
/// process default format.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSignals<'a> {
    /// The Accept header value, verbatim.
    pub accept: Option<&'a str>,

    /// The request path, optionally carrying a format token.
    pub path: Option<&'a str>,

    /// An explicit per-endpoint format override (a registered format name).
    pub format_override: Option<&'a str>,
}

impl<'a> RequestSignals<'a> {
    /// Creates an empty signal set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Accept header value.
    #[must_use]
    pub fn with_accept(mut self, accept: &'a str) -> Self {
        self.accept = Some(accept);
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn with_path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }

    /// Sets the explicit endpoint override.
    #[must_use]
    pub fn with_override(mut self, format_name: &'a str) -> Self {
        self.format_override = Some(format_name);
        self
    }

    /// Returns a copy with the path signal removed.
    pub(crate) fn without_path(mut self) -> Self {
        self.path = None;
        self
    }
}

/// One media range parsed from an Accept header.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    /// Primary type (`text` in `text/csv`), lowercased
    pub primary: String,
    /// Subtype (`csv` in `text/csv`), lowercased
    pub sub: String,
    /// The q-value, clamped to `0.0..=1.0` (default 1.0)
    pub quality: f32,
}

impl MediaRange {
    /// Returns `true` for the full wildcard `*/*`.
    pub fn is_any(&self) -> bool {
        self.primary == "*" && self.sub == "*"
    }

    /// Returns `true` for a primary-type wildcard like `text/*`.
    pub fn is_primary_wildcard(&self) -> bool {
        self.primary != "*" && self.sub == "*"
    }

    /// Returns the range as a `type/subtype` string.
    pub fn media_type(&self) -> String {
        format!("{}/{}", self.primary, self.sub)
    }
}

/// Parses an Accept header into media ranges, highest preference first.
///
/// Malformed entries are skipped, as are ranges explicitly refused with
/// `q=0`. The sort is stable, so equal q-values keep declaration order.
pub fn parse_accept(header: &str) -> Vec<MediaRange> {
    let mut ranges: Vec<MediaRange> = header
        .split(',')
        .filter_map(parse_media_range)
        .filter(|range| range.quality > 0.0)
        .collect();
    ranges.sort_by(|a, b| {
        b.quality
            .partial_cmp(&a.quality)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranges
}

/// Parses one `type/subtype;q=...` entry. Returns `None` when malformed.
fn parse_media_range(entry: &str) -> Option<MediaRange> {
    let mut parts = entry.split(';');
    let essence = parts.next()?.trim();
    let (primary, sub) = essence.split_once('/')?;
    let primary = primary.trim();
    let sub = sub.trim();
    if primary.is_empty() || sub.is_empty() {
        return None;
    }

    let mut quality = 1.0_f32;
    for param in parts {
        if let Some((key, value)) = param.split_once('=') {
            if key.trim().eq_ignore_ascii_case("q") {
                if let Ok(q) = value.trim().parse::<f32>() {
                    quality = q.clamp(0.0, 1.0);
                }
            }
        }
    }

    Some(MediaRange {
        primary: primary.to_lowercase(),
        sub: sub.to_lowercase(),
        quality,
    })
}

/// Selects the response format for the given signals.
///
/// # Errors
///
/// Returns [`WireformError::NoFormatResolved`] when every signal is
/// exhausted without matching a registered format.
pub fn select_format<'r>(
    registry: &'r FormatRegistry,
    signals: &RequestSignals<'_>,
) -> Result<&'r FormatDescriptor> {
    // (1) explicit endpoint override
    if let Some(name) = signals.format_override {
        if let Some(found) = registry.by_name(name) {
            return Ok(found);
        }
    }

    // (2) format token embedded in the URL
    if let Some(path) = signals.path {
        for token in format_tokens(path) {
            if let Some(found) = registry.by_name(token) {
                return Ok(found);
            }
        }
    }

    // (3) Accept header, highest q first
    let ranges = signals.accept.map(parse_accept).unwrap_or_default();
    for range in &ranges {
        if range.is_any() {
            if let Some(found) = registry.default_format() {
                return Ok(found);
            }
        } else if range.is_primary_wildcard() {
            if let Some(found) = registry.by_primary_type(&range.primary) {
                return Ok(found);
            }
        } else if let Some(found) = registry.by_media_type(&range.media_type()) {
            return Ok(found);
        }
    }

    // (4) process default, only when the Accept header offered nothing usable
    if ranges.is_empty() {
        if let Some(found) = registry.default_format() {
            return Ok(found);
        }
    }

    Err(WireformError::no_format_resolved(signals.accept))
}

/// Extracts candidate format tokens from a request path.
///
/// A `format=` query parameter is checked before the leading path segment,
/// so `/movies?format=csv` and `/csv/syncreply/Movies` both surface `csv`.
fn format_tokens(path: &str) -> Vec<&str> {
    let (route, query) = match path.split_once('?') {
        Some((route, query)) => (route, Some(query)),
        None => (path, None),
    };

    let mut tokens = Vec::new();
    if let Some(query) = query {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                if key == "format" && !value.is_empty() {
                    tokens.push(value);
                }
            }
        }
    }
    if let Some(segment) = route.split('/').find(|s| !s.is_empty()) {
        tokens.push(segment);
    }
    tokens
}
