//! End-to-end analysis of one record.
//!
//! Filter → STA/LTA onset → features → classification. Data flows one way
//! and every stage is a pure function of its inputs.

use tracing::{debug, info};

use crate::classifier::classify;
use crate::config::Config;
use crate::eew::StaLtaDetector;
use crate::errors::EewError;
use crate::features::{EventFeatures, onset_segment};
use crate::filters::lowpass;
use crate::models::{AnalysisResult, SeismicEvent, SignalSource, Waveform};

/// Analyze a record and classify the event it contains, if any.
///
/// `time` and `acceleration` must have equal length. The configuration is
/// copied on entry, so the run is unaffected by later edits to the caller's
/// copy. The copy takes `sample_rate` as its rate, so the cutoff is checked
/// against the Nyquist frequency of the record actually being filtered.
///
/// # Errors
///
/// Returns [`EewError::InvalidConfig`] for an invalid configuration,
/// including a cutoff at or above the record's Nyquist frequency, and
/// [`EewError::InvalidInput`] for mismatched lengths or a bad sample rate.
pub fn process_signal(
    source: SignalSource,
    time: &[f64],
    acceleration: &[f64],
    sample_rate: f64,
    config: &Config,
) -> Result<AnalysisResult, EewError> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(EewError::InvalidInput(format!(
            "sample rate must be positive, got {sample_rate}"
        )));
    }

    let config = Config {
        sample_rate,
        ..*config
    };
    config.validate()?;

    if time.len() != acceleration.len() {
        return Err(EewError::InvalidInput(format!(
            "time has {} samples but acceleration has {}",
            time.len(),
            acceleration.len()
        )));
    }

    debug!(
        source = source.as_str(),
        samples = acceleration.len(),
        sample_rate,
        "processing signal"
    );

    let filtered = lowpass(acceleration, sample_rate, &config)?;
    let detector = StaLtaDetector::from_config(&config, sample_rate);

    let Some(onset) = detector.detect(&filtered, time) else {
        info!(source = source.as_str(), "no onset detected");
        return Ok(AnalysisResult::NoDetection { source, filtered });
    };

    let segment = onset_segment(&filtered, onset.index, sample_rate);
    let features = EventFeatures::extract(segment, sample_rate, &config);
    let alert = classify(
        features.pga_g,
        features.magnitude,
        features.dominant_period,
        &config,
    );

    let event = SeismicEvent {
        arrival_time: onset.time,
        arrival_index: onset.index,
        pga_g: features.pga_g,
        dominant_frequency: features.dominant_frequency,
        dominant_period: features.dominant_period,
        magnitude: features.magnitude,
        alert,
    };

    info!(
        source = source.as_str(),
        alert = alert.as_str(),
        arrival = event.arrival_time,
        pga_g = event.pga_g,
        magnitude = event.magnitude,
        "event classified"
    );

    Ok(AnalysisResult::Detected {
        source,
        filtered,
        event,
    })
}

/// Convenience wrapper over [`process_signal`] for a generated waveform.
///
/// # Errors
///
/// Same as [`process_signal`].
pub fn process_waveform(
    source: SignalSource,
    waveform: &Waveform,
    config: &Config,
) -> Result<AnalysisResult, EewError> {
    process_signal(
        source,
        &waveform.time,
        &waveform.acceleration,
        waveform.sample_rate,
        config,
    )
}
