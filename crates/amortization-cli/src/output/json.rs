use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print JSON to stdout.
pub fn print_json(value: &Value) {
    if let Err(e) = write_json(value, io::stdout().lock()) {
        eprintln!("JSON serialization error: {}", e);
    }
}

pub fn write_json<W: Write>(value: &Value, mut out: W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)
}
