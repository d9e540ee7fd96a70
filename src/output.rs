//! Output formatters for analysis results.
//!
//! Supports human-readable (with colors) and JSON formats.

use std::io::{self, Write};

use crate::models::{AlertKind, OutputResult};

// ANSI color codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

// Alert colors
const ALERT_GREEN: &str = "\x1b[42;30m"; // Green background
const ALERT_ORANGE: &str = "\x1b[48;5;208;30m"; // Orange background
const ALERT_RED: &str = "\x1b[41;97m"; // Red background
const ALERT_GREY: &str = "\x1b[47;30m"; // Grey background

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Human-readable terminal output (default)
    #[default]
    Human,
    /// Pretty-printed JSON object
    Json,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown format: {s} (expected: human, json)")),
        }
    }
}

/// Badge for an alert category.
fn format_alert(alert: AlertKind) -> String {
    let color = match alert {
        AlertKind::NoDetection => ALERT_GREY,
        AlertKind::Noise => ALERT_GREEN,
        AlertKind::Seismic => ALERT_ORANGE,
        AlertKind::Tsunami => ALERT_RED,
    };
    let label = alert.as_str().to_uppercase();
    format!("{color} {label} {RESET}")
}

fn format_optional(value: Option<f64>, precision: usize, unit: &str) -> String {
    value
        .map(|v| format!("{v:.precision$}{unit}"))
        .unwrap_or_else(|| "n/a".into())
}

/// Write a result in human-readable format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human<W: Write>(writer: &mut W, result: &OutputResult) -> io::Result<()> {
    let alert = result.alert_type;
    writeln!(
        writer,
        "{} {BOLD}Alert:{RESET} {} {DIM}({}){RESET}",
        alert.emoji(),
        format_alert(alert),
        result.source.as_str()
    )?;

    if alert != AlertKind::NoDetection {
        writeln!(
            writer,
            "  Arrival  │ {}",
            format_optional(result.p_time, 2, " s")
        )?;
        writeln!(
            writer,
            "  PGA      │ {}",
            format_optional(result.pga_g, 4, " g")
        )?;
        writeln!(
            writer,
            "  Mag      │ {}",
            format_optional(result.magnitude, 2, "")
        )?;
        writeln!(
            writer,
            "  Period   │ {} {DIM}({}){RESET}",
            format_optional(result.dom_period, 2, " s"),
            format_optional(result.dom_freq, 2, " Hz")
        )?;
    }

    writeln!(writer)?;
    writeln!(writer, "{}", result.explanation)
}

/// Write a result as a pretty JSON object.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: &mut W, result: &OutputResult) -> io::Result<()> {
    let json = serde_json::to_string_pretty(result)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

/// Write a result in the specified format.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_result<W: Write>(writer: &mut W, result: &OutputResult, format: Format) -> io::Result<()> {
    match format {
        Format::Human => write_human(writer, result),
        Format::Json => write_json(writer, result),
    }
}
