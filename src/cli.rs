//! Command-line interface definition using clap.
//!
//! The `wireform` binary renders a JSON document through the full response
//! pipeline: negotiation signals come from flags that mirror the request
//! surface (`--accept`, `--path`, `--format`), and the output is the
//! response body, optionally preceded by the transport headers.
//!
//! # Example
//!
//! ```rust
//! use wireform::cli::Args;
//!
//! let args = Args {
//!     input: "movies.json".into(),
//!     accept: Some("text/csv".into()),
//!     path: None,
//!     format: None,
//!     output: None,
//!     name: None,
//!     show_headers: true,
//!     delimiter: ',',
//!     pretty: false,
//!     default_format: "json".into(),
//! };
//!
//! // The payload name drives the Content-Disposition filename
//! assert_eq!(args.payload_name(), "Movies");
//! ```

use std::path::Path;

use clap::Parser;

/// Render a JSON document into a negotiated text format (CSV, JSON, JSONL)
/// with HTTP-style response headers.
#[derive(Parser, Debug, Clone)]
#[command(name = "wireform")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    wireform movies.json --accept text/csv
    wireform movies.json --path /csv/syncreply/Movies --show-headers
    wireform hello.json --format jsonl -o out.jsonl
    wireform movies.json --accept 'application/xml, text/csv;q=0.5'")]
pub struct Args {
    /// Path to the input JSON document (the value to render)
    pub input: String,

    /// Accept header to negotiate against
    #[arg(long, value_name = "MEDIA_RANGES")]
    pub accept: Option<String>,

    /// Request path, optionally carrying a format token (e.g. /csv/movies)
    #[arg(long, value_name = "PATH")]
    pub path: Option<String>,

    /// Explicit format override (highest precedence)
    #[arg(short, long, value_name = "NAME")]
    pub format: Option<String>,

    /// Write the body to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Payload name for the Content-Disposition filename
    /// (defaults to the capitalized input file stem)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Print the response headers before the body
    #[arg(long)]
    pub show_headers: bool,

    /// CSV field delimiter
    #[arg(long, value_name = "CHAR", default_value = ",")]
    pub delimiter: char,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Default format when no negotiation signal is present
    #[arg(long, value_name = "NAME", default_value = "json")]
    pub default_format: String,
}

impl Args {
    /// Resolves the payload name: the `--name` flag, or the capitalized
    /// stem of the input file (`movies.json` becomes `Movies`).
    pub fn payload_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        let stem = Path::new(&self.input)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Result");
        let mut chars = stem.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => "Result".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str) -> Args {
        Args {
            input: input.into(),
            accept: None,
            path: None,
            format: None,
            output: None,
            name: None,
            show_headers: false,
            delimiter: ',',
            pretty: false,
            default_format: "json".into(),
        }
    }

    #[test]
    fn test_payload_name_from_stem() {
        assert_eq!(args("movies.json").payload_name(), "Movies");
        assert_eq!(args("/tmp/data/hello.json").payload_name(), "Hello");
    }

    #[test]
    fn test_payload_name_explicit() {
        let mut a = args("movies.json");
        a.name = Some("Top5Movies".into());
        assert_eq!(a.payload_name(), "Top5Movies");
    }

    #[test]
    fn test_payload_name_preserves_inner_case() {
        assert_eq!(args("moviesResponse.json").payload_name(), "MoviesResponse");
    }

    #[test]
    fn test_args_parse_defaults() {
        let a = Args::try_parse_from(["wireform", "movies.json"]).unwrap();
        assert_eq!(a.input, "movies.json");
        assert_eq!(a.delimiter, ',');
        assert_eq!(a.default_format, "json");
        assert!(!a.show_headers);
    }

    #[test]
    fn test_args_parse_flags() {
        let a = Args::try_parse_from([
            "wireform",
            "movies.json",
            "--accept",
            "text/csv",
            "--path",
            "/csv/movies",
            "-f",
            "jsonl",
            "--show-headers",
        ])
        .unwrap();
        assert_eq!(a.accept.as_deref(), Some("text/csv"));
        assert_eq!(a.path.as_deref(), Some("/csv/movies"));
        assert_eq!(a.format.as_deref(), Some("jsonl"));
        assert!(a.show_headers);
    }

    #[test]
    fn test_args_require_input() {
        assert!(Args::try_parse_from(["wireform"]).is_err());
    }
}
