//! # wireform CLI
//!
//! Command-line interface for the wireform library.

use std::fs;
use std::io::{self, Write};
use std::process;

use clap::Parser as ClapParser;

use wireform::cli::Args;
use wireform::config::ResponderConfig;
use wireform::core::models::EncodeConfig;
use wireform::negotiate::RequestSignals;
use wireform::{Payload, Responder, WireformError};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), WireformError> {
    let args = <Args as ClapParser>::parse();

    if !args.delimiter.is_ascii() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "delimiter must be a single ASCII character",
        )
        .into());
    }

    let text = fs::read_to_string(&args.input)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let payload = Payload::named(args.payload_name(), value);

    let mut encode = EncodeConfig::new().with_delimiter(args.delimiter as u8);
    if args.pretty {
        encode = encode.with_pretty();
    }
    let config = ResponderConfig::new()
        .with_default_format(&args.default_format)
        .with_encode(encode);
    let responder = Responder::with_config(config);

    let mut signals = RequestSignals::new();
    if let Some(accept) = &args.accept {
        signals = signals.with_accept(accept);
    }
    if let Some(path) = &args.path {
        signals = signals.with_path(path);
    }
    if let Some(format) = &args.format {
        signals = signals.with_override(format);
    }

    let envelope = responder.respond_payload(&signals, &payload)?;

    if args.show_headers {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for (name, value) in envelope.headers() {
            writeln!(handle, "{}: {}", name, value)?;
        }
        writeln!(handle)?;
    }

    match &args.output {
        Some(path) => {
            fs::write(path, envelope.body())?;
            println!("✅ Wrote {} bytes to {}", envelope.body().len(), path);
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(envelope.body())?;
        }
    }

    Ok(())
}
