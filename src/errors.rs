//! Error types for sat-eew.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur in sat-eew operations.
#[derive(Error, Debug)]
pub enum EewError {
    /// Configuration violates one of its invariants
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Caller passed malformed input (bad duration, sample rate, lengths)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Low-pass filter design did not yield second-order sections
    #[error("filter design failed: {0}")]
    FilterDesign(String),

    /// Configuration file could not be read
    #[error("failed to read config file: {0}")]
    ConfigFile(#[from] std::io::Error),

    /// JSON parsing failed
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
