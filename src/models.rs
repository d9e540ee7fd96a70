//! Data models shared by the pipeline stages.
//!
//! A [`Waveform`] flows in, an [`AnalysisResult`] flows out. The result is a
//! tagged variant so callers never touch onset-dependent fields unless an
//! onset was actually detected.

use serde::Serialize;

use crate::errors::EewError;

/// Where a waveform came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    /// Damped modes plus transient pulses
    #[serde(rename = "sintetica")]
    Synthetic,
    /// Tone from a moving source
    Doppler,
}

impl SignalSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalSource::Synthetic => "sintetica",
            SignalSource::Doppler => "doppler",
        }
    }
}

/// Uniformly sampled acceleration record.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Sample times in seconds, starting at zero
    pub time: Vec<f64>,
    /// Ground acceleration (m/s²)
    pub acceleration: Vec<f64>,
    /// Sample rate (Hz)
    pub sample_rate: f64,
}

impl Waveform {
    /// Build a zeroed waveform of `floor(duration * sample_rate)` samples.
    ///
    /// # Errors
    ///
    /// Returns [`EewError::InvalidInput`] for non-positive or non-finite
    /// duration or sample rate.
    pub fn zeros(duration: f64, sample_rate: f64) -> Result<Self, EewError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(EewError::InvalidInput(format!(
                "duration must be positive, got {duration}"
            )));
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(EewError::InvalidInput(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = (duration * sample_rate).floor() as usize;
        #[allow(clippy::cast_precision_loss)]
        let time = (0..n).map(|i| i as f64 / sample_rate).collect();

        Ok(Self {
            time,
            acceleration: vec![0.0; n],
            sample_rate,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.acceleration.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.acceleration.is_empty()
    }
}

/// First STA/LTA exceedance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Onset {
    /// Arrival time (s)
    pub time: f64,
    /// Sample index into the filtered waveform
    pub index: usize,
    /// STA/LTA ratio at the trigger sample
    pub ratio: f64,
}

/// Alert category assigned to a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertKind {
    /// No onset exceeded the trigger threshold
    #[serde(rename = "no_detectado")]
    NoDetection,
    /// Onset found, PGA below the alert threshold
    #[serde(rename = "ruido")]
    Noise,
    /// PGA at or above the alert threshold
    #[serde(rename = "sismica")]
    Seismic,
    /// Strong, long-period event
    #[serde(rename = "tsunami")]
    Tsunami,
}

impl AlertKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::NoDetection => "no_detectado",
            AlertKind::Noise => "ruido",
            AlertKind::Seismic => "sismica",
            AlertKind::Tsunami => "tsunami",
        }
    }

    #[must_use]
    pub fn emoji(&self) -> &'static str {
        match self {
            AlertKind::NoDetection => "⚪",
            AlertKind::Noise => "🟢",
            AlertKind::Seismic => "🟠",
            AlertKind::Tsunami => "🌊",
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Features extracted after an onset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeismicEvent {
    /// Arrival time (s)
    pub arrival_time: f64,
    /// Arrival sample index
    pub arrival_index: usize,
    /// Peak ground acceleration in units of g
    pub pga_g: f64,
    /// Frequency of the strongest non-DC spectral bin (Hz)
    pub dominant_frequency: f64,
    /// Reciprocal of the dominant frequency; `f64::INFINITY` when it is zero
    pub dominant_period: f64,
    /// Magnitude proxy derived from PGA
    pub magnitude: f64,
    /// Classification outcome
    pub alert: AlertKind,
}

impl SeismicEvent {
    /// Dominant period, or `None` for the infinite sentinel.
    #[must_use]
    pub fn finite_period(&self) -> Option<f64> {
        self.dominant_period
            .is_finite()
            .then_some(self.dominant_period)
    }
}

/// Terminal result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    /// Nothing crossed the STA/LTA threshold
    NoDetection {
        source: SignalSource,
        filtered: Vec<f64>,
    },
    /// Onset found and characterized
    Detected {
        source: SignalSource,
        filtered: Vec<f64>,
        event: SeismicEvent,
    },
}

impl AnalysisResult {
    #[must_use]
    pub fn alert(&self) -> AlertKind {
        match self {
            AnalysisResult::NoDetection { .. } => AlertKind::NoDetection,
            AnalysisResult::Detected { event, .. } => event.alert,
        }
    }

    #[must_use]
    pub fn source(&self) -> SignalSource {
        match self {
            AnalysisResult::NoDetection { source, .. }
            | AnalysisResult::Detected { source, .. } => *source,
        }
    }

    /// Low-pass filtered acceleration, same length as the input.
    #[must_use]
    pub fn filtered(&self) -> &[f64] {
        match self {
            AnalysisResult::NoDetection { filtered, .. }
            | AnalysisResult::Detected { filtered, .. } => filtered,
        }
    }

    #[must_use]
    pub fn event(&self) -> Option<&SeismicEvent> {
        match self {
            AnalysisResult::NoDetection { .. } => None,
            AnalysisResult::Detected { event, .. } => Some(event),
        }
    }
}

/// Flattened result for JSON output.
///
/// Onset-dependent fields are `None` when nothing was detected.
#[derive(Debug, Clone, Serialize)]
pub struct OutputResult {
    pub source: SignalSource,
    pub alert_type: AlertKind,
    pub p_time: Option<f64>,
    pub pga_g: Option<f64>,
    pub magnitude: Option<f64>,
    pub dom_freq: Option<f64>,
    pub dom_period: Option<f64>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<OutputSeries>,
}

/// Plot-ready series for an external renderer.
#[derive(Debug, Clone, Serialize)]
pub struct OutputSeries {
    pub time: Vec<f64>,
    pub raw: Vec<f64>,
    pub filtered: Vec<f64>,
    pub spectrum_freq: Vec<f64>,
    pub spectrum_mag: Vec<f64>,
}

impl OutputResult {
    /// Flatten a result together with its explanation text.
    #[must_use]
    pub fn new(result: &AnalysisResult, explanation: String) -> Self {
        let event = result.event();
        Self {
            source: result.source(),
            alert_type: result.alert(),
            p_time: event.map(|e| e.arrival_time),
            pga_g: event.map(|e| e.pga_g),
            magnitude: event.map(|e| e.magnitude),
            dom_freq: event.map(|e| e.dominant_frequency),
            dom_period: event.and_then(SeismicEvent::finite_period),
            explanation,
            series: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_length_is_floor() {
        let w = Waveform::zeros(1.005, 100.0).unwrap();
        assert_eq!(w.len(), 100);
        assert_eq!(w.time.len(), w.acceleration.len());
        assert!((w.time[1] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_waveform_rejects_bad_input() {
        assert!(Waveform::zeros(-1.0, 100.0).is_err());
        assert!(Waveform::zeros(10.0, 0.0).is_err());
        assert!(Waveform::zeros(f64::NAN, 100.0).is_err());
    }

    #[test]
    fn test_alert_labels() {
        assert_eq!(AlertKind::NoDetection.as_str(), "no_detectado");
        assert_eq!(AlertKind::Noise.as_str(), "ruido");
        assert_eq!(AlertKind::Seismic.as_str(), "sismica");
        assert_eq!(AlertKind::Tsunami.as_str(), "tsunami");
        assert_eq!(
            serde_json::to_string(&AlertKind::NoDetection).unwrap(),
            "\"no_detectado\""
        );
    }

    #[test]
    fn test_no_detection_has_no_event() {
        let result = AnalysisResult::NoDetection {
            source: SignalSource::Doppler,
            filtered: vec![0.0; 4],
        };
        assert_eq!(result.alert(), AlertKind::NoDetection);
        assert!(result.event().is_none());
        assert_eq!(result.filtered().len(), 4);

        let out = OutputResult::new(&result, String::new());
        assert!(out.pga_g.is_none());
        assert!(out.dom_period.is_none());
    }

    #[test]
    fn test_infinite_period_is_flattened_to_none() {
        let event = SeismicEvent {
            arrival_time: 1.0,
            arrival_index: 100,
            pga_g: 0.1,
            dominant_frequency: 0.0,
            dominant_period: f64::INFINITY,
            magnitude: 3.5,
            alert: AlertKind::Seismic,
        };
        assert!(event.finite_period().is_none());
    }
}
