//! Earthquake Early Warning (EEW) onset detection.
//!
//! Classic STA/LTA trigger over signal energy, evaluated on the whole
//! filtered record at once.

use tracing::debug;

use crate::config::Config;
use crate::models::Onset;

/// Added to the LTA so a silent record yields a zero ratio, not NaN.
pub const LTA_EPSILON: f64 = 1e-12;

// ============================================================================
// STA/LTA Detection Algorithm
// ============================================================================

/// STA/LTA (Short-Term Average / Long-Term Average) detector.
///
/// When the ratio of short-term energy to long-term energy exceeds a
/// threshold, it indicates the arrival of seismic waves. Both averages are
/// centered on the sample they describe, so the trigger index lines up with
/// the record instead of lagging behind it.
#[derive(Debug, Clone)]
pub struct StaLtaDetector {
    /// Short-term window length in samples
    sta_samples: usize,
    /// Long-term window length in samples
    lta_samples: usize,
    /// Trigger threshold (typically 2.5-4.0)
    trigger_threshold: f64,
}

impl StaLtaDetector {
    /// Create a new detector with custom parameters.
    ///
    /// Window lengths are truncated to whole samples, minimum one.
    #[must_use]
    pub fn new(sta_seconds: f64, lta_seconds: f64, sample_rate: f64, threshold: f64) -> Self {
        Self {
            sta_samples: window_samples(sta_seconds, sample_rate),
            lta_samples: window_samples(lta_seconds, sample_rate),
            trigger_threshold: threshold,
        }
    }

    /// Detector using the configured windows and threshold.
    #[must_use]
    pub fn from_config(config: &Config, sample_rate: f64) -> Self {
        Self::new(
            config.sta_window,
            config.lta_window,
            sample_rate,
            config.sta_lta_threshold,
        )
    }

    #[must_use]
    pub fn sta_samples(&self) -> usize {
        self.sta_samples
    }

    #[must_use]
    pub fn lta_samples(&self) -> usize {
        self.lta_samples
    }

    /// STA/LTA ratio for every sample.
    ///
    /// Near the record edges the windows are only partly filled (zero
    /// padding), which is accepted as an approximation. The result has the
    /// same length as `samples` and is never negative.
    #[must_use]
    pub fn ratio(&self, samples: &[f64]) -> Vec<f64> {
        let energy: Vec<f64> = samples.iter().map(|x| x * x).collect();
        let sta = centered_moving_average(&energy, self.sta_samples);
        let lta = centered_moving_average(&energy, self.lta_samples);

        sta.iter()
            .zip(&lta)
            .map(|(s, l)| s / (l + LTA_EPSILON))
            .collect()
    }

    /// Find the first sample whose ratio strictly exceeds the threshold.
    ///
    /// `time` must be the time vector matching `samples`.
    #[must_use]
    pub fn detect(&self, samples: &[f64], time: &[f64]) -> Option<Onset> {
        let ratio = self.ratio(samples);
        let index = ratio.iter().position(|&r| r > self.trigger_threshold)?;
        let onset = Onset {
            time: time.get(index).copied()?,
            index,
            ratio: ratio[index],
        };

        debug!(
            index = onset.index,
            time = onset.time,
            ratio = onset.ratio,
            threshold = self.trigger_threshold,
            "sta/lta trigger"
        );
        Some(onset)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn window_samples(seconds: f64, sample_rate: f64) -> usize {
    ((seconds * sample_rate) as usize).max(1)
}

/// Boxcar average of `window` samples, "same"-length and centered.
///
/// Equivalent to convolving with `window` taps of `1/window` and keeping the
/// central `values.len()` outputs. Running sums keep it O(n).
#[must_use]
pub fn centered_moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let window = window.max(1);
    let offset = (window - 1) / 2;

    let mut prefix = Vec::with_capacity(n + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for v in values {
        acc += v;
        prefix.push(acc);
    }

    #[allow(clippy::cast_precision_loss)]
    let scale = 1.0 / window as f64;
    (0..n)
        .map(|i| {
            let hi = (i + offset + 1).min(n);
            let lo = (i + offset + 1).saturating_sub(window);
            // Cancellation in the running sum can dip just below zero
            ((prefix[hi] - prefix[lo]) * scale).max(0.0)
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
