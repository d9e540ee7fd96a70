//! Zero-phase low-pass pre-filter.
//!
//! A 4th-order Butterworth designed as second-order sections and run
//! forward-backward, so the filtered record has no phase lag relative to the
//! raw one. Onset timing downstream depends on that alignment.

use sci_rs::signal::filter::design::{
    DigitalFilter, FilterBandType, FilterOutputType, Sos, SosFormatFilter, butter_dyn,
};
use sci_rs::signal::filter::sosfiltfilt_dyn;
use tracing::debug;

use crate::config::Config;
use crate::errors::EewError;

/// Butterworth order.
pub const FILTER_ORDER: usize = 4;

/// Upper clamp on the normalized cutoff, just below Nyquist.
pub const MAX_NORMALIZED_CUTOFF: f64 = 0.99;

/// Cutoff as a fraction of Nyquist, clamped to [`MAX_NORMALIZED_CUTOFF`].
#[must_use]
pub fn normalized_cutoff(cutoff: f64, sample_rate: f64) -> f64 {
    (cutoff / (0.5 * sample_rate)).min(MAX_NORMALIZED_CUTOFF)
}

/// Design the low-pass sections for a cutoff and sample rate.
///
/// # Errors
///
/// Returns [`EewError::FilterDesign`] if the normalized cutoff is not in
/// (0, 1) or the design does not produce second-order sections.
pub fn design_lowpass(cutoff: f64, sample_rate: f64) -> Result<Vec<Sos<f64>>, EewError> {
    let wn = normalized_cutoff(cutoff, sample_rate);
    if !wn.is_finite() || wn <= 0.0 {
        return Err(EewError::FilterDesign(format!(
            "normalized cutoff {wn} out of range (cutoff {cutoff} Hz, fs {sample_rate} Hz)"
        )));
    }

    let filter = butter_dyn(
        FILTER_ORDER,
        vec![wn],
        Some(FilterBandType::Lowpass),
        Some(false),
        Some(FilterOutputType::Sos),
        None,
    );

    match filter {
        DigitalFilter::Sos(SosFormatFilter { sos }) => Ok(sos),
        _ => Err(EewError::FilterDesign(
            "butterworth design did not return second-order sections".into(),
        )),
    }
}

/// Minimum record length for forward-backward filtering with `sos`.
///
/// Matches the odd-extension padding used by `sosfiltfilt`.
#[must_use]
pub fn min_filtfilt_len(sos: &[Sos<f64>]) -> usize {
    3 * (2 * sos.len() + 1) + 1
}

/// Low-pass filter `samples` without phase distortion.
///
/// The output always has the same length as the input. Records too short
/// for the filtfilt edge padding are returned unchanged.
///
/// # Errors
///
/// Returns [`EewError::FilterDesign`] if the filter cannot be designed.
pub fn lowpass(samples: &[f64], sample_rate: f64, config: &Config) -> Result<Vec<f64>, EewError> {
    let sos = design_lowpass(config.filter_cutoff, sample_rate)?;

    if samples.len() < min_filtfilt_len(&sos) {
        debug!(
            samples = samples.len(),
            "record too short for zero-phase filtering, passing through"
        );
        return Ok(samples.to_vec());
    }

    debug!(
        cutoff = config.filter_cutoff,
        wn = normalized_cutoff(config.filter_cutoff, sample_rate),
        sections = sos.len(),
        "applying zero-phase low-pass"
    );

    let filtered: Vec<f64> = sosfiltfilt_dyn(samples.iter(), &sos);
    debug_assert_eq!(filtered.len(), samples.len());
    Ok(filtered)
}
