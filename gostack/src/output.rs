//! Write parsed goroutines as NDJSON records or as dump text.
//!
//! The JSON form emits one object per line, each tagged with a `type`
//! field: a `goroutine` record per goroutine followed by a `warning`
//! record per parse warning.

use gostack_parse::{Dump, Goroutine, Warnings};
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur while writing output.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OutputError>;

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Newline-delimited JSON records.
    Json,
    /// The runtime's own dump text.
    Text,
}

pub fn write_output<'a, W, I>(
    writer: W,
    format: OutputFormat,
    goroutines: I,
    warnings: &Warnings,
) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Goroutine>,
{
    match format {
        OutputFormat::Json => write_json(writer, goroutines, warnings),
        OutputFormat::Text => write_text(writer, goroutines),
    }
}

pub fn write_json<'a, W, I>(mut writer: W, goroutines: I, warnings: &Warnings) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Goroutine>,
{
    for goroutine in goroutines {
        write_record(&mut writer, "goroutine", goroutine)?;
    }
    for warning in warnings {
        write_record(&mut writer, "warning", warning)?;
    }
    Ok(())
}

pub fn write_text<'a, W, I>(writer: W, goroutines: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Goroutine>,
{
    let dump: Dump = goroutines.into_iter().cloned().collect();
    dump.write(writer)?;
    Ok(())
}

fn write_record<W: Write, T: Serialize>(writer: &mut W, record_type: &str, data: &T) -> Result<()> {
    let mut map = serde_json::to_value(data)?;
    if let serde_json::Value::Object(ref mut obj) = map {
        obj.insert(
            "type".to_string(),
            serde_json::Value::String(record_type.to_string()),
        );
    }
    writeln!(writer, "{}", serde_json::to_string(&map)?)?;
    Ok(())
}
