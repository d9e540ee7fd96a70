//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use sat_eew::config::Config;
use sat_eew::output::Format;
use sat_eew::report::Language;

/// Educational seismic early-warning pipeline.
#[derive(Parser, Debug)]
#[command(name = "sat-eew")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate and analyze a synthetic seismic record
    Synthetic(SyntheticArgs),

    /// Generate and analyze a Doppler-shifted tone
    Doppler(DopplerArgs),
}

/// Arguments for the `synthetic` command.
#[derive(Parser, Debug)]
pub struct SyntheticArgs {
    /// Record length in seconds
    #[arg(long, default_value = "120.0", value_parser = parse_positive)]
    pub duration: f64,

    /// Signal-to-noise ratio in dB
    #[arg(long, default_value = "8.0", allow_negative_numbers = true)]
    pub snr_db: f64,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Arguments for the `doppler` command.
#[derive(Parser, Debug)]
pub struct DopplerArgs {
    /// Record length in seconds
    #[arg(long, default_value = "120.0", value_parser = parse_positive)]
    pub duration: f64,

    /// Base frequency of the source in Hz
    #[arg(long, default_value = "0.8", value_parser = parse_positive)]
    pub f0: f64,

    /// Peak relative velocity of the source in m/s
    #[arg(long, default_value = "30.0", allow_negative_numbers = true)]
    pub v_rel: f64,

    /// Propagation speed in m/s
    #[arg(long, default_value = "300.0", value_parser = parse_positive)]
    pub c: f64,

    /// Tone amplitude in m/s² (defaults to 0.02 g)
    #[arg(long, value_parser = parse_non_negative)]
    pub amplitude: Option<f64>,

    /// Signal-to-noise ratio in dB
    #[arg(long, default_value = "8.0", allow_negative_numbers = true)]
    pub snr_db: f64,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options shared by every analysis command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Sample rate in Hz (defaults to the configured rate)
    #[arg(long, value_parser = parse_positive)]
    pub sample_rate: Option<f64>,

    /// Seed for the random source (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON configuration file; missing fields keep their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,

    /// Language of the explanation
    #[arg(long, default_value = "en", value_parser = parse_language)]
    pub lang: Language,

    /// Include raw, filtered and spectrum series in JSON output
    #[arg(long)]
    pub series: bool,
}

/// Per-field configuration overrides.
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Gravitational acceleration in m/s²
    #[arg(long, value_parser = parse_positive)]
    pub gravity: Option<f64>,

    /// STA window in seconds
    #[arg(long, value_parser = parse_positive)]
    pub sta_window: Option<f64>,

    /// LTA window in seconds (at least 1.0)
    #[arg(long, value_parser = parse_lta_window)]
    pub lta_window: Option<f64>,

    /// STA/LTA trigger threshold
    #[arg(long, value_parser = parse_non_negative)]
    pub threshold: Option<f64>,

    /// PGA alert threshold in g
    #[arg(long, value_parser = parse_non_negative)]
    pub pga_threshold: Option<f64>,

    /// Minimum magnitude for a tsunami alert
    #[arg(long, allow_negative_numbers = true)]
    pub tsunami_magnitude: Option<f64>,

    /// Minimum dominant period for a tsunami alert, in seconds
    #[arg(long, allow_negative_numbers = true)]
    pub tsunami_period: Option<f64>,

    /// Low-pass cutoff in Hz
    #[arg(long, value_parser = parse_positive)]
    pub cutoff: Option<f64>,
}

impl ConfigOverrides {
    /// Apply every override that was given on top of `config`.
    #[must_use]
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(v) = self.gravity {
            config.g = v;
        }
        if let Some(v) = self.sta_window {
            config.sta_window = v;
        }
        if let Some(v) = self.lta_window {
            config.lta_window = v;
        }
        if let Some(v) = self.threshold {
            config.sta_lta_threshold = v;
        }
        if let Some(v) = self.pga_threshold {
            config.pga_threshold_g = v;
        }
        if let Some(v) = self.tsunami_magnitude {
            config.tsunami_magnitude_threshold = v;
        }
        if let Some(v) = self.tsunami_period {
            config.tsunami_period_threshold = v;
        }
        if let Some(v) = self.cutoff {
            config.filter_cutoff = v;
        }
        config
    }
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

/// Parse a report language from string.
fn parse_language(s: &str) -> Result<Language, String> {
    s.parse()
}

fn parse_number(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid number {s:?}: {e}"))?;
    if !value.is_finite() {
        return Err(format!("value must be finite, got {value}"));
    }
    Ok(value)
}

/// Parse a strictly positive number.
fn parse_positive(s: &str) -> Result<f64, String> {
    let value = parse_number(s)?;
    if value <= 0.0 {
        return Err(format!("value must be positive, got {value}"));
    }
    Ok(value)
}

/// Parse a number that is zero or greater.
fn parse_non_negative(s: &str) -> Result<f64, String> {
    let value = parse_number(s)?;
    if value < 0.0 {
        return Err(format!("value must not be negative, got {value}"));
    }
    Ok(value)
}

/// Parse an LTA window, which must span at least one second.
fn parse_lta_window(s: &str) -> Result<f64, String> {
    let value = parse_number(s)?;
    if value < 1.0 {
        return Err(format!("LTA window must be at least 1.0 s, got {value}"));
    }
    Ok(value)
}
