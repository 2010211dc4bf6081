//! CLI output formatting.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use fibengine_device::ReadResponse;

/// The exerciser's line for one read.
#[must_use]
pub fn format_read_line(index: u64, decimal: &str) -> String {
    format!("Reading at offset {index}, returned the sequence {decimal}.")
}

/// The exerciser's line for one side-channel write.
#[must_use]
pub fn format_write_line(last_ns: u64) -> String {
    format!("Writing to fibengine, returned the sequence {last_ns}")
}

/// Format a decimal string for display, potentially truncating.
#[must_use]
pub fn format_result(decimal: &str, verbose: bool) -> String {
    if !verbose && decimal.len() > 100 {
        format!(
            "{}...{} ({} digits)",
            &decimal[..50],
            &decimal[decimal.len() - 50..],
            decimal.len()
        )
    } else {
        decimal.to_string()
    }
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// One read as a JSON-lines record.
#[derive(Debug, Serialize)]
struct ReadRecord<'a> {
    index: u64,
    strategy: &'a str,
    limbs: usize,
    elapsed_ns: u64,
    digits: usize,
    value: &'a str,
}

/// One side-channel write as a JSON-lines record.
#[derive(Debug, Serialize)]
struct WriteRecord {
    written: usize,
    elapsed_ns: u64,
}

/// Serialize a side-channel write as a single-line JSON object.
#[must_use]
pub fn format_json_write(written: usize, last_ns: u64) -> String {
    let record = WriteRecord {
        written,
        elapsed_ns: last_ns,
    };
    serde_json::to_string(&record).unwrap_or_default()
}

/// Serialize a read as a single-line JSON object.
#[must_use]
pub fn format_json_line(response: &ReadResponse, decimal: &str) -> String {
    let record = ReadRecord {
        index: response.index,
        strategy: response.strategy.name(),
        limbs: response.limbs,
        elapsed_ns: u64::try_from(response.elapsed.as_nanos()).unwrap_or(u64::MAX),
        digits: decimal.len(),
        value: decimal,
    };
    // Plain strings and integers cannot fail to serialize.
    serde_json::to_string(&record).unwrap_or_default()
}

/// Write a decimal result to a file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_to_file(path: impl AsRef<Path>, decimal: &str) -> io::Result<()> {
    let path = path.as_ref();
    let mut file = std::fs::File::create(path)?;
    writeln!(file, "{decimal}")?;
    tracing::debug!(path = %path.display(), digits = decimal.len(), "result written");
    Ok(())
}
