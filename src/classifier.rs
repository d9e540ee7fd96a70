//! Alert classification.
//!
//! Stateless threshold rules, evaluated in a fixed order. The
//! [`AlertKind::NoDetection`] outcome is decided before feature extraction by
//! the pipeline and never produced here.

use crate::config::Config;
use crate::models::AlertKind;

/// Classify a detected event.
///
/// Rules, first match wins:
/// 1. `pga_g` below the alert threshold is noise.
/// 2. Magnitude and dominant period both at or above the tsunami thresholds
///    is a tsunami.
/// 3. Anything else is a seismic alert.
///
/// An infinite period counts as long.
#[must_use]
pub fn classify(pga_g: f64, magnitude: f64, period: f64, config: &Config) -> AlertKind {
    if pga_g < config.pga_threshold_g {
        return AlertKind::Noise;
    }
    if magnitude >= config.tsunami_magnitude_threshold && period >= config.tsunami_period_threshold
    {
        return AlertKind::Tsunami;
    }
    AlertKind::Seismic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG;

    #[test]
    fn test_below_threshold_is_noise() {
        assert_eq!(classify(0.01, 9.0, 20.0, &DEFAULT_CONFIG), AlertKind::Noise);
    }

    #[test]
    fn test_tsunami() {
        assert_eq!(classify(0.10, 7.5, 12.0, &DEFAULT_CONFIG), AlertKind::Tsunami);
    }

    #[test]
    fn test_seismic() {
        assert_eq!(classify(0.10, 5.0, 2.0, &DEFAULT_CONFIG), AlertKind::Seismic);
    }

    #[test]
    fn test_tsunami_needs_both_conditions() {
        assert_eq!(classify(0.10, 7.5, 2.0, &DEFAULT_CONFIG), AlertKind::Seismic);
        assert_eq!(classify(0.10, 5.0, 12.0, &DEFAULT_CONFIG), AlertKind::Seismic);
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        assert_eq!(classify(0.05, 1.0, 1.0, &DEFAULT_CONFIG), AlertKind::Seismic);
        assert_eq!(classify(0.05, 7.0, 10.0, &DEFAULT_CONFIG), AlertKind::Tsunami);
    }

    #[test]
    fn test_infinite_period_counts_as_long() {
        assert_eq!(
            classify(0.2, 7.2, f64::INFINITY, &DEFAULT_CONFIG),
            AlertKind::Tsunami
        );
    }

    #[test]
    fn test_amplitude_checked_before_tsunami() {
        // Tsunami-sized magnitude and period but weak shaking stays noise
        assert_eq!(classify(0.049, 8.0, 30.0, &DEFAULT_CONFIG), AlertKind::Noise);
    }

    #[test]
    fn test_per_run_thresholds() {
        let config = Config {
            pga_threshold_g: 0.005,
            ..DEFAULT_CONFIG
        };
        assert_eq!(classify(0.01, 3.0, 1.0, &config), AlertKind::Seismic);
    }
}
