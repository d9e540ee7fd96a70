//! Plain-language explanation of an analysis result.
//!
//! Pure functions: the same result and configuration always produce the
//! same text.

use crate::config::Config;
use crate::models::{AlertKind, AnalysisResult, SeismicEvent};

/// Report language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Spanish,
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "es" | "spanish" | "espanol" | "español" => Ok(Self::Spanish),
            _ => Err(format!("unknown language: {s} (expected: en, es)")),
        }
    }
}

/// Explain `result` in English.
#[must_use]
pub fn explain_result(result: &AnalysisResult, config: &Config) -> String {
    explain_result_in(result, config, Language::English)
}

/// Explain `result` in the requested language.
#[must_use]
pub fn explain_result_in(result: &AnalysisResult, config: &Config, language: Language) -> String {
    let text = match language {
        Language::English => English::sentences(result, config),
        Language::Spanish => Spanish::sentences(result, config),
    };
    text.join(" ")
}

/// Sentence templates for one language.
trait Phrasebook {
    fn no_detection(config: &Config) -> String;
    fn detected(event: &SeismicEvent) -> String;
    fn below_threshold(config: &Config) -> String;
    fn above_threshold(config: &Config) -> String;
    fn period(event: &SeismicEvent) -> String;
    fn undefined_period() -> String;
    fn tsunami(event: &SeismicEvent) -> String;
    fn not_tsunami(event: &SeismicEvent) -> String;

    fn sentences(result: &AnalysisResult, config: &Config) -> Vec<String> {
        let Some(event) = result.event() else {
            return vec![Self::no_detection(config)];
        };

        let mut text = vec![Self::detected(event)];
        if event.pga_g < config.pga_threshold_g {
            text.push(Self::below_threshold(config));
        } else {
            text.push(Self::above_threshold(config));
        }

        match event.finite_period() {
            Some(_) => text.push(Self::period(event)),
            None => text.push(Self::undefined_period()),
        }

        if event.alert == AlertKind::Tsunami {
            text.push(Self::tsunami(event));
        } else {
            text.push(Self::not_tsunami(event));
        }
        text
    }
}

struct English;

impl Phrasebook for English {
    fn no_detection(config: &Config) -> String {
        format!(
            "No significant seismic event was detected. The signal amplitude may be too low \
             or the noise level too high for the STA/LTA ratio to exceed the configured \
             threshold of {:.2}.",
            config.sta_lta_threshold
        )
    }

    fn detected(event: &SeismicEvent) -> String {
        format!(
            "An event was detected at t = {:.2} s with a peak ground acceleration (PGA) of {:.4} g.",
            event.arrival_time, event.pga_g
        )
    }

    fn below_threshold(config: &Config) -> String {
        format!(
            "The acceleration is below the {:.3} g alert threshold, so the system classifies \
             the event as noise.",
            config.pga_threshold_g
        )
    }

    fn above_threshold(config: &Config) -> String {
        format!(
            "The acceleration reaches the {:.3} g alert threshold, indicating a real seismic event.",
            config.pga_threshold_g
        )
    }

    fn period(event: &SeismicEvent) -> String {
        format!(
            "The dominant period of the signal is {:.2} s ({:.2} Hz), which reflects the main \
             frequency of the ground motion.",
            event.dominant_period, event.dominant_frequency
        )
    }

    fn undefined_period() -> String {
        "The dominant period is undefined because no non-zero frequency dominates the spectrum."
            .to_string()
    }

    fn tsunami(event: &SeismicEvent) -> String {
        format!(
            "The combination of a high magnitude estimate ({:.2}) and a long period points to \
             a possible tsunami scenario.",
            event.magnitude
        )
    }

    fn not_tsunami(event: &SeismicEvent) -> String {
        format!(
            "With an estimated magnitude of {:.2}, the magnitude and dominant period do not \
             correspond to a typical tsunami scenario.",
            event.magnitude
        )
    }
}

struct Spanish;

impl Phrasebook for Spanish {
    fn no_detection(config: &Config) -> String {
        format!(
            "No se detectó un evento sísmico significativo. Esto puede deberse a una baja \
             amplitud de la señal o a un nivel alto de ruido, lo que impide que el algoritmo \
             STA/LTA supere el umbral configurado ({:.2}).",
            config.sta_lta_threshold
        )
    }

    fn detected(event: &SeismicEvent) -> String {
        format!(
            "Se detectó un evento en t = {:.2} s con una aceleración pico (PGA) de {:.4} g.",
            event.arrival_time, event.pga_g
        )
    }

    fn below_threshold(config: &Config) -> String {
        format!(
            "La aceleración es baja (umbral {:.3} g), por lo que el sistema clasifica el \
             evento como ruido.",
            config.pga_threshold_g
        )
    }

    fn above_threshold(config: &Config) -> String {
        format!(
            "La aceleración alcanza el umbral configurado ({:.3} g), indicando un evento \
             sísmico real.",
            config.pga_threshold_g
        )
    }

    fn period(event: &SeismicEvent) -> String {
        format!(
            "El periodo dominante de la señal es de {:.2} s ({:.2} Hz), lo cual está \
             relacionado con la frecuencia principal del movimiento del suelo.",
            event.dominant_period, event.dominant_frequency
        )
    }

    fn undefined_period() -> String {
        "El periodo dominante no está definido porque ninguna frecuencia distinta de cero \
         domina el espectro."
            .to_string()
    }

    fn tsunami(event: &SeismicEvent) -> String {
        format!(
            "Debido a la combinación de alta magnitud ({:.2}) y periodo largo, el sistema \
             identifica un posible escenario de tsunami.",
            event.magnitude
        )
    }

    fn not_tsunami(event: &SeismicEvent) -> String {
        format!(
            "Con una magnitud estimada de {:.2}, el periodo dominante no corresponde a un \
             escenario típico de tsunami.",
            event.magnitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG;
    use crate::models::SignalSource;

    fn detected(pga_g: f64, period: f64, magnitude: f64, alert: AlertKind) -> AnalysisResult {
        AnalysisResult::Detected {
            source: SignalSource::Synthetic,
            filtered: vec![0.0; 10],
            event: SeismicEvent {
                arrival_time: 42.5,
                arrival_index: 4250,
                pga_g,
                dominant_frequency: if period.is_finite() { 1.0 / period } else { 0.0 },
                dominant_period: period,
                magnitude,
                alert,
            },
        }
    }

    #[test]
    fn test_no_detection_text() {
        let result = AnalysisResult::NoDetection {
            source: SignalSource::Doppler,
            filtered: vec![],
        };
        let text = explain_result(&result, &DEFAULT_CONFIG);
        assert!(text.starts_with("No significant seismic event"));
        assert!(text.contains("3.00"));
    }

    #[test]
    fn test_seismic_text() {
        let result = detected(0.1234, 0.5, 5.0, AlertKind::Seismic);
        let text = explain_result(&result, &DEFAULT_CONFIG);
        assert!(text.contains("0.1234 g"));
        assert!(text.contains("indicating a real seismic event"));
        assert!(text.contains("0.50 s"));
        assert!(text.contains("do not correspond to a typical tsunami"));
    }

    #[test]
    fn test_noise_text() {
        let result = detected(0.01, 0.5, 2.0, AlertKind::Noise);
        let text = explain_result(&result, &DEFAULT_CONFIG);
        assert!(text.contains("classifies the event as noise"));
    }

    #[test]
    fn test_tsunami_text() {
        let result = detected(0.2, 12.0, 7.5, AlertKind::Tsunami);
        let text = explain_result(&result, &DEFAULT_CONFIG);
        assert!(text.contains("possible tsunami scenario"));
    }

    #[test]
    fn test_undefined_period_text() {
        let result = detected(0.2, f64::INFINITY, 4.0, AlertKind::Seismic);
        let text = explain_result(&result, &DEFAULT_CONFIG);
        assert!(text.contains("undefined"));
        assert!(!text.contains("inf"));
    }

    #[test]
    fn test_explanation_is_deterministic() {
        let result = detected(0.08, 3.3, 4.2, AlertKind::Seismic);
        let a = explain_result(&result, &DEFAULT_CONFIG);
        let b = explain_result(&result, &DEFAULT_CONFIG);
        assert_eq!(a, b);
    }

    #[test]
    fn test_spanish_text() {
        let result = detected(0.2, 12.0, 7.5, AlertKind::Tsunami);
        let text = explain_result_in(&result, &DEFAULT_CONFIG, Language::Spanish);
        assert!(text.starts_with("Se detectó un evento"));
        assert!(text.contains("posible escenario de tsunami"));
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("es".parse::<Language>().unwrap(), Language::Spanish);
        assert_eq!("EN".parse::<Language>().unwrap(), Language::English);
        assert!("fr".parse::<Language>().is_err());
    }
}
