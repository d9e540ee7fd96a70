//! Feature extraction on the post-onset window.
//!
//! PGA, dominant frequency and period from a Hann-windowed real spectrum,
//! and a magnitude proxy from PGA.

use std::f64::consts::PI;

use rustfft::{FftPlanner, num_complex::Complex};
use serde::Serialize;
use tracing::debug;

use crate::config::Config;

/// Length of the analysis window after the onset (s).
pub const ANALYSIS_WINDOW_SECS: f64 = 10.0;

/// Features of the post-onset segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventFeatures {
    /// Peak absolute acceleration (m/s²)
    pub pga: f64,
    /// Peak absolute acceleration in units of g
    pub pga_g: f64,
    /// Dominant frequency (Hz), zero if undefined
    pub dominant_frequency: f64,
    /// Dominant period (s), `f64::INFINITY` if the frequency is zero
    pub dominant_period: f64,
    /// Magnitude proxy
    pub magnitude: f64,
}

impl EventFeatures {
    /// Compute every feature of `segment`.
    #[must_use]
    pub fn extract(segment: &[f64], sample_rate: f64, config: &Config) -> Self {
        let pga = peak_ground_acceleration(segment);
        let (dominant_frequency, dominant_period) = dominant_frequency(segment, sample_rate);
        let features = Self {
            pga,
            pga_g: pga / config.g,
            dominant_frequency,
            dominant_period,
            magnitude: estimate_magnitude(pga),
        };
        debug!(
            samples = segment.len(),
            pga_g = features.pga_g,
            dominant_frequency,
            magnitude = features.magnitude,
            "extracted features"
        );
        features
    }
}

/// Samples from `onset` through the next ten seconds, or to the record end.
#[must_use]
pub fn onset_segment(samples: &[f64], onset: usize, sample_rate: f64) -> &[f64] {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let span = (ANALYSIS_WINDOW_SECS * sample_rate) as usize;
    let start = onset.min(samples.len());
    let end = samples.len().min(start.saturating_add(span));
    &samples[start..end]
}

/// Maximum absolute value, zero for an empty slice.
#[must_use]
pub fn peak_ground_acceleration(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0_f64, |m, x| m.max(x.abs()))
}

/// Magnitude proxy: `log10(PGA in mm/s²) + 0.5`, rounded to two decimals.
///
/// Exactly 0.0 when `pga <= 0`.
#[must_use]
pub fn estimate_magnitude(pga: f64) -> f64 {
    let pga_mm = pga * 1000.0;
    if pga_mm <= 0.0 {
        return 0.0;
    }
    ((pga_mm.log10() + 0.5) * 100.0).round() / 100.0
}

/// Symmetric Hann window (`numpy.hanning`).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn hann_window(len: usize) -> Vec<f64> {
    if len <= 1 {
        return vec![1.0; len];
    }
    let m = (len - 1) as f64;
    (0..len)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / m).cos())
        .collect()
}

/// One-sided magnitude spectrum of a Hann-windowed signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Spectrum {
    /// Bin frequencies `k * fs / n` for `k` in `0..=n/2` (Hz)
    pub frequencies: Vec<f64>,
    /// Bin magnitudes
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    /// Frequency of the strongest bin, skipping DC. First bin wins ties.
    #[must_use]
    pub fn peak_frequency(&self) -> Option<f64> {
        let mut best: Option<(usize, f64)> = None;
        for (k, &mag) in self.magnitudes.iter().enumerate().skip(1) {
            if best.is_none_or(|(_, m)| mag > m) {
                best = Some((k, mag));
            }
        }
        best.map(|(k, _)| self.frequencies[k])
    }
}

/// Real FFT magnitude spectrum after a Hann window.
///
/// Also used by renderers for the log-magnitude plot of the whole record.
#[must_use]
pub fn magnitude_spectrum(samples: &[f64], sample_rate: f64) -> Spectrum {
    let n = samples.len();
    if n == 0 {
        return Spectrum::default();
    }

    let window = hann_window(n);
    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .zip(&window)
        .map(|(&x, &w)| Complex::new(x * w, 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    #[allow(clippy::cast_precision_loss)]
    let resolution = sample_rate / n as f64;
    let bins = n / 2 + 1;
    #[allow(clippy::cast_precision_loss)]
    let frequencies = (0..bins).map(|k| k as f64 * resolution).collect();
    let magnitudes = buffer[..bins].iter().map(|c| c.norm()).collect();

    Spectrum {
        frequencies,
        magnitudes,
    }
}

/// Dominant frequency (Hz) and period (s) of `samples`.
///
/// The period is `f64::INFINITY` when no non-DC bin exists or the peak
/// frequency is zero.
#[must_use]
pub fn dominant_frequency(samples: &[f64], sample_rate: f64) -> (f64, f64) {
    let freq = magnitude_spectrum(samples, sample_rate)
        .peak_frequency()
        .unwrap_or(0.0);
    let period = if freq > 0.0 { 1.0 / freq } else { f64::INFINITY };
    (freq, period)
}
