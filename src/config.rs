//! Pipeline configuration.
//!
//! A single immutable record per run. The shell copies [`DEFAULT_CONFIG`],
//! applies overrides from a JSON file and command-line flags, then calls
//! [`Config::validate`] before handing it to the pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::EewError;

/// Default configuration shared by every session.
pub const DEFAULT_CONFIG: Config = Config {
    g: 9.81,
    sample_rate: 100.0,
    sta_window: 1.0,
    lta_window: 30.0,
    sta_lta_threshold: 3.0,
    pga_threshold_g: 0.05,
    tsunami_magnitude_threshold: 7.0,
    tsunami_period_threshold: 10.0,
    filter_cutoff: 20.0,
};

/// Named pipeline parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gravitational acceleration (m/s²)
    pub g: f64,
    /// Nominal sample rate (Hz)
    pub sample_rate: f64,
    /// Short-term average window (s)
    pub sta_window: f64,
    /// Long-term average window (s)
    pub lta_window: f64,
    /// STA/LTA trigger threshold
    pub sta_lta_threshold: f64,
    /// Alert threshold on PGA, in units of g
    pub pga_threshold_g: f64,
    /// Minimum magnitude proxy for a tsunami alert
    pub tsunami_magnitude_threshold: f64,
    /// Minimum dominant period for a tsunami alert (s)
    pub tsunami_period_threshold: f64,
    /// Low-pass cutoff frequency (Hz)
    pub filter_cutoff: f64,
}

impl Default for Config {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

impl Config {
    /// Nyquist frequency for the configured sample rate.
    #[must_use]
    pub fn nyquist(&self) -> f64 {
        0.5 * self.sample_rate
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// the resulting configuration is invalid.
    pub fn from_json_file(path: &Path) -> Result<Self, EewError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or the configuration
    /// is invalid.
    pub fn from_json_str(text: &str) -> Result<Self, EewError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns [`EewError::InvalidConfig`] naming the first violated rule.
    pub fn validate(&self) -> Result<(), EewError> {
        let fields = [
            ("g", self.g),
            ("sample_rate", self.sample_rate),
            ("sta_window", self.sta_window),
            ("lta_window", self.lta_window),
            ("sta_lta_threshold", self.sta_lta_threshold),
            ("pga_threshold_g", self.pga_threshold_g),
            ("tsunami_magnitude_threshold", self.tsunami_magnitude_threshold),
            ("tsunami_period_threshold", self.tsunami_period_threshold),
            ("filter_cutoff", self.filter_cutoff),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }

        if self.g <= 0.0 {
            return Err(invalid(format!("g must be positive, got {}", self.g)));
        }
        if self.sample_rate <= 0.0 {
            return Err(invalid(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.sta_window <= 0.0 {
            return Err(invalid(format!(
                "sta_window must be positive, got {}",
                self.sta_window
            )));
        }
        if self.sta_window >= self.lta_window {
            return Err(invalid(format!(
                "sta_window {} must be shorter than lta_window {}",
                self.sta_window, self.lta_window
            )));
        }
        if self.filter_cutoff <= 0.0 || self.filter_cutoff >= self.nyquist() {
            return Err(invalid(format!(
                "filter_cutoff {} Hz must lie in (0, {}) Hz",
                self.filter_cutoff,
                self.nyquist()
            )));
        }
        if self.sta_lta_threshold < 0.0 {
            return Err(invalid(format!(
                "sta_lta_threshold must be non-negative, got {}",
                self.sta_lta_threshold
            )));
        }
        if self.pga_threshold_g < 0.0 {
            return Err(invalid(format!(
                "pga_threshold_g must be non-negative, got {}",
                self.pga_threshold_g
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> EewError {
    EewError::InvalidConfig(message)
}
