//! Synthetic waveform generators.
//!
//! Both generators draw from a caller-supplied random source. Nothing here
//! seeds anything: pass a seeded `StdRng` for reproducible records.

use std::f64::consts::PI;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::config::Config;
use crate::errors::EewError;
use crate::models::Waveform;

/// Frequency range of the damped modes (Hz), sampled log-uniformly.
const MODE_FREQ_RANGE: (f64, f64) = (0.2, 8.0);
/// Mode amplitude range in units of g, sampled log-uniformly.
const MODE_AMP_RANGE_G: (f64, f64) = (0.0005, 0.01);
/// Exponential damping coefficient range (1/s).
const MODE_DAMPING_RANGE: (f64, f64) = (0.0002, 0.005);
/// Pulse length range (s).
const PULSE_LEN_RANGE: (f64, f64) = (0.2, 0.6);
/// Pulse amplitude range in units of g.
const PULSE_AMP_RANGE_G: (f64, f64) = (0.02, 0.06);
/// Pulses never start within this margin of either record edge (s).
const PULSE_EDGE_MARGIN: f64 = 5.0;
/// Taper fraction of the pulse window.
const PULSE_TAPER_ALPHA: f64 = 0.5;
/// Decay rate of the Doppler envelope (1/s).
const DOPPLER_DECAY: f64 = 0.005;
/// Source velocity is clipped to this fraction of the propagation speed.
const DOPPLER_MAX_MACH: f64 = 0.9;
/// Keeps the noise level finite for a silent signal.
const RMS_FLOOR: f64 = 1e-12;

/// Parameters of the Doppler test tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DopplerParams {
    /// Base frequency of the stationary source (Hz)
    pub f0: f64,
    /// Peak relative velocity of the source (m/s)
    pub v_rel: f64,
    /// Propagation speed (m/s)
    pub c: f64,
    /// Tone amplitude (m/s²)
    pub amplitude: f64,
    /// Target signal-to-noise ratio (dB)
    pub snr_db: f64,
}

impl Default for DopplerParams {
    fn default() -> Self {
        Self::for_config(&crate::config::DEFAULT_CONFIG)
    }
}

impl DopplerParams {
    /// Defaults with the amplitude expressed as 0.02 g of `config`.
    #[must_use]
    pub fn for_config(config: &Config) -> Self {
        Self {
            f0: 0.8,
            v_rel: 30.0,
            c: 300.0,
            amplitude: 0.02 * config.g,
            snr_db: 8.0,
        }
    }
}

/// Generate a seismic-like record: damped modes, transient pulses, noise.
///
/// The output has `floor(duration * sample_rate)` samples and at least one
/// embedded pulse.
///
/// # Errors
///
/// Returns [`EewError::InvalidInput`] for a non-positive duration or sample
/// rate, or an SNR that yields a non-finite noise level.
pub fn generate_synthetic<R: Rng + ?Sized>(
    duration: f64,
    sample_rate: f64,
    snr_db: f64,
    config: &Config,
    rng: &mut R,
) -> Result<Waveform, EewError> {
    let mut waveform = Waveform::zeros(duration, sample_rate)?;
    add_damped_modes(&mut waveform.acceleration, &waveform.time, config.g, rng);
    let arrivals = embed_pulses(&mut waveform.acceleration, duration, sample_rate, config.g, rng);
    debug!(?arrivals, "pulses embedded");
    add_noise(&mut waveform.acceleration, snr_db, rng)?;
    Ok(waveform)
}

/// Add one to three exponentially damped sinusoids.
fn add_damped_modes<R: Rng + ?Sized>(samples: &mut [f64], time: &[f64], g: f64, rng: &mut R) {
    let n_modes = rng.random_range(1..=3);
    for _ in 0..n_modes {
        let freq = log_uniform(rng, MODE_FREQ_RANGE);
        let amp = log_uniform(rng, MODE_AMP_RANGE_G) * g;
        let damping = rng.random_range(MODE_DAMPING_RANGE.0..MODE_DAMPING_RANGE.1);
        let phase = rng.random_range(0.0..2.0 * PI);
        debug!(freq, amp, damping, "adding damped mode");

        for (x, &t) in samples.iter_mut().zip(time) {
            *x += amp * (2.0 * PI * freq * t + phase).sin() * (-damping * t).exp();
        }
    }
}

/// Add one or two Tukey-tapered pulses. Returns their arrival times (s).
fn embed_pulses<R: Rng + ?Sized>(
    samples: &mut [f64],
    duration: f64,
    sample_rate: f64,
    g: f64,
    rng: &mut R,
) -> Vec<f64> {
    let n = samples.len();
    let n_pulses = rng.random_range(1..=2);
    let mut arrivals = Vec::with_capacity(n_pulses);

    for _ in 0..n_pulses {
        let arrival = pulse_arrival(rng, duration);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let start = (arrival * sample_rate) as usize;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pulse_len =
            (rng.random_range(PULSE_LEN_RANGE.0..PULSE_LEN_RANGE.1) * sample_rate) as usize;
        let amp = rng.random_range(PULSE_AMP_RANGE_G.0..PULSE_AMP_RANGE_G.1) * g;
        if start >= n {
            continue;
        }
        debug!(arrival, pulse_len, amp, "embedding pulse");

        let window = tukey(pulse_len, PULSE_TAPER_ALPHA);
        let end = n.min(start + pulse_len);
        for (x, w) in samples[start..end].iter_mut().zip(&window) {
            *x += amp * w;
        }
        arrivals.push(arrival);
    }
    arrivals
}

/// Generate a decaying tone whose frequency is shifted by a moving source.
///
/// The velocity sweeps linearly from `-v_rel` to `+v_rel` over the record,
/// clipped to ±0.9·c.
///
/// # Errors
///
/// Returns [`EewError::InvalidInput`] for a non-positive duration, sample
/// rate or propagation speed.
pub fn generate_doppler<R: Rng + ?Sized>(
    duration: f64,
    sample_rate: f64,
    params: &DopplerParams,
    rng: &mut R,
) -> Result<Waveform, EewError> {
    if !params.c.is_finite() || params.c <= 0.0 {
        return Err(EewError::InvalidInput(format!(
            "propagation speed must be positive, got {}",
            params.c
        )));
    }

    let mut waveform = Waveform::zeros(duration, sample_rate)?;
    let n = waveform.len();
    let limit = DOPPLER_MAX_MACH * params.c;

    let mut phase = 0.0;
    for (i, (x, &t)) in waveform
        .acceleration
        .iter_mut()
        .zip(&waveform.time)
        .enumerate()
    {
        let v = linspace_at(-params.v_rel, params.v_rel, n, i).clamp(-limit, limit);
        let inst_freq = params.f0 * params.c / (params.c - v);
        phase += 2.0 * PI * inst_freq / sample_rate;
        *x = params.amplitude * phase.sin() * (-DOPPLER_DECAY * t).exp();
    }

    debug!(
        f0 = params.f0,
        v_rel = params.v_rel,
        c = params.c,
        samples = n,
        "generated doppler tone"
    );

    add_noise(&mut waveform.acceleration, params.snr_db, rng)?;
    Ok(waveform)
}

/// Add white Gaussian noise with RMS = signal RMS / 10^(snr_db / 20).
///
/// # Errors
///
/// Returns [`EewError::InvalidInput`] if the resulting noise level is not a
/// valid standard deviation.
pub fn add_noise<R: Rng + ?Sized>(
    samples: &mut [f64],
    snr_db: f64,
    rng: &mut R,
) -> Result<(), EewError> {
    if samples.is_empty() {
        return Ok(());
    }

    let noise_std = rms(samples) / 10.0_f64.powf(snr_db / 20.0);
    let noise = Normal::new(0.0, noise_std).map_err(|e| {
        EewError::InvalidInput(format!("SNR {snr_db} dB gives noise level {noise_std}: {e}"))
    })?;

    for x in samples.iter_mut() {
        *x += noise.sample(rng);
    }
    Ok(())
}

/// Root mean square, floored so a silent signal still yields a tiny level.
fn rms(samples: &[f64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let mean_sq = samples.iter().map(|x| x * x).sum::<f64>() / samples.len() as f64;
    mean_sq.sqrt() + RMS_FLOOR
}

fn log_uniform<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    10.0_f64.powf(rng.random_range(lo.log10()..hi.log10()))
}

/// Pulse arrival time, kept away from the record edges.
///
/// Records of 10 s or less have no admissible interval; the pulse then
/// lands at the midpoint.
fn pulse_arrival<R: Rng + ?Sized>(rng: &mut R, duration: f64) -> f64 {
    let lo = PULSE_EDGE_MARGIN;
    let hi = duration - PULSE_EDGE_MARGIN;
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        duration / 2.0
    }
}

/// Value `i` of `n` evenly spaced points over `[start, stop]`.
#[allow(clippy::cast_precision_loss)]
fn linspace_at(start: f64, stop: f64, n: usize, i: usize) -> f64 {
    if n <= 1 {
        return start;
    }
    start + (stop - start) * i as f64 / (n - 1) as f64
}

/// Symmetric Tukey (tapered cosine) window.
///
/// `alpha` is the tapered fraction: 0 gives a rectangle, 1 a Hann window.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn tukey(len: usize, alpha: f64) -> Vec<f64> {
    if len <= 1 || alpha <= 0.0 {
        return vec![1.0; len];
    }
    let alpha = alpha.min(1.0);
    let m = (len - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = (alpha * m / 2.0).floor() as usize;

    (0..len)
        .map(|i| {
            let x = i as f64;
            if i <= width {
                0.5 * (1.0 + (PI * (-1.0 + 2.0 * x / alpha / m)).cos())
            } else if i >= len - width - 1 {
                0.5 * (1.0 + (PI * (-2.0 / alpha + 1.0 + 2.0 * x / alpha / m)).cos())
            } else {
                1.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::DEFAULT_CONFIG;

    #[test]
    fn test_synthetic_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = generate_synthetic(120.0, 100.0, 10.0, &DEFAULT_CONFIG, &mut rng).unwrap();
        assert_eq!(w.len(), 12_000);
        assert_eq!(w.time.len(), w.acceleration.len());
        assert!((w.sample_rate - 100.0).abs() < f64::EPSILON);
        assert!(w.acceleration.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_synthetic_is_reproducible_with_seed() {
        let a = generate_synthetic(30.0, 50.0, 8.0, &DEFAULT_CONFIG, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = generate_synthetic(30.0, 50.0, 8.0, &DEFAULT_CONFIG, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a, b);
    }

    /// Modes and pulses drawn from `seed` in generation order.
    fn replay_layers(seed: u64, w: &Waveform, duration: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let g = DEFAULT_CONFIG.g;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut modes = vec![0.0; w.len()];
        add_damped_modes(&mut modes, &w.time, g, &mut rng);
        let mut pulses = vec![0.0; w.len()];
        let arrivals = embed_pulses(&mut pulses, duration, w.sample_rate, g, &mut rng);
        (modes, pulses, arrivals)
    }

    #[test]
    fn test_synthetic_contains_pulse() {
        let g = DEFAULT_CONFIG.g;
        let mut rng = StdRng::seed_from_u64(3);
        let w = generate_synthetic(60.0, 100.0, 200.0, &DEFAULT_CONFIG, &mut rng).unwrap();
        let (modes, pulses, arrivals) = replay_layers(3, &w, 60.0);

        // Noise at 200 dB is far below this tolerance
        for ((x, m), p) in w.acceleration.iter().zip(&modes).zip(&pulses) {
            assert!((x - (m + p)).abs() < 1e-6);
        }

        assert!(!arrivals.is_empty() && arrivals.len() <= 2);
        for &arrival in &arrivals {
            assert!((5.0..=55.0).contains(&arrival), "arrival {arrival}");
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let start = (arrival * 100.0) as usize;
            // Shortest pulse is 20 samples with a flat top from sample 5
            let peak = pulses[start..start + 20].iter().fold(0.0_f64, |m, &x| m.max(x));
            assert!(peak >= 0.02 * g, "peak {peak} at {arrival} s");
        }

        let exceedances = pulses.iter().filter(|&&x| x >= 0.02 * g).count();
        assert!(exceedances >= 10, "{exceedances} samples at or above 0.02 g");
    }

    #[test]
    fn test_short_record_pulse_at_midpoint() {
        let g = DEFAULT_CONFIG.g;
        let mut rng = StdRng::seed_from_u64(11);
        let w = generate_synthetic(4.0, 100.0, 200.0, &DEFAULT_CONFIG, &mut rng).unwrap();
        assert_eq!(w.len(), 400);

        let (modes, _, arrivals) = replay_layers(11, &w, 4.0);
        assert!(!arrivals.is_empty());
        assert!(arrivals.iter().all(|&a| (a - 2.0).abs() < f64::EPSILON));

        let pulse_part: Vec<f64> = w.acceleration.iter().zip(&modes).map(|(x, m)| x - m).collect();
        assert!(pulse_part[..200].iter().all(|x| x.abs() < 1e-6));
        let peak = pulse_part[200..260].iter().fold(0.0_f64, |m, &x| m.max(x));
        assert!(peak >= 0.02 * g - 1e-6, "peak {peak}");
    }

    #[test]
    fn test_synthetic_rejects_bad_input() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_synthetic(0.0, 100.0, 10.0, &DEFAULT_CONFIG, &mut rng).is_err());
        assert!(generate_synthetic(10.0, -1.0, 10.0, &DEFAULT_CONFIG, &mut rng).is_err());
    }

    #[test]
    fn test_doppler_shape_and_amplitude() {
        let params = DopplerParams {
            snr_db: 200.0,
            ..DopplerParams::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let w = generate_doppler(20.0, 100.0, &params, &mut rng).unwrap();
        assert_eq!(w.len(), 2000);
        let peak = w.acceleration.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        assert!(peak <= params.amplitude * 1.0001);
        assert!(peak > params.amplitude * 0.9);
    }

    /// Mean frequency from rising zero crossings, interpolated between samples.
    #[allow(clippy::cast_precision_loss)]
    fn crossing_frequency(x: &[f64], fs: f64) -> f64 {
        let crossings: Vec<f64> = x
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0] < 0.0 && w[1] >= 0.0)
            .map(|(i, w)| (i as f64 + w[0] / (w[0] - w[1])) / fs)
            .collect();
        let span = crossings[crossings.len() - 1] - crossings[0];
        (crossings.len() - 1) as f64 / span
    }

    #[test]
    fn test_doppler_frequency_sweep() {
        let params = DopplerParams {
            f0: 5.0,
            v_rel: 30.0,
            c: 300.0,
            amplitude: 1.0,
            snr_db: 200.0,
        };
        let fs = 100.0;
        let mut rng = StdRng::seed_from_u64(4);
        let w = generate_doppler(100.0, fs, &params, &mut rng).unwrap();

        // Velocity runs from -v_rel to +v_rel; each 5 s window moves it by 3 m/s
        let start_freq = params.f0 * params.c / (params.c + params.v_rel);
        let end_freq = params.f0 * params.c / (params.c - params.v_rel);
        let first = crossing_frequency(&w.acceleration[..500], fs);
        let last = crossing_frequency(&w.acceleration[w.len() - 500..], fs);

        assert!((first - start_freq).abs() < 0.06, "first {first} vs {start_freq}");
        assert!((last - end_freq).abs() < 0.06, "last {last} vs {end_freq}");
    }

    #[test]
    fn test_doppler_rejects_zero_speed() {
        let params = DopplerParams {
            c: 0.0,
            ..DopplerParams::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_doppler(10.0, 100.0, &params, &mut rng).is_err());
    }

    #[test]
    fn test_doppler_velocity_is_clipped() {
        // v_rel far beyond c must not blow up the instantaneous frequency
        let params = DopplerParams {
            v_rel: 10_000.0,
            snr_db: 200.0,
            ..DopplerParams::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let w = generate_doppler(10.0, 100.0, &params, &mut rng).unwrap();
        assert!(w.acceleration.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_noise_matches_snr() {
        let mut rng = StdRng::seed_from_u64(9);
        let clean: Vec<f64> = (0..20_000).map(|i| (f64::from(i) * 0.1).sin()).collect();
        let mut noisy = clean.clone();
        add_noise(&mut noisy, 20.0, &mut rng).unwrap();

        let noise: Vec<f64> = noisy.iter().zip(&clean).map(|(a, b)| a - b).collect();
        let ratio = rms(&clean) / rms(&noise);
        // 20 dB -> amplitude ratio 10
        assert!((ratio - 10.0).abs() < 0.5, "ratio {ratio}");
    }

    #[test]
    fn test_tukey_window() {
        let w = tukey(11, 0.5);
        assert_eq!(w.len(), 11);
        assert!(w[0].abs() < 1e-12);
        assert!(w[10].abs() < 1e-12);
        assert!((w[5] - 1.0).abs() < 1e-12);
        // symmetric
        for i in 0..11 {
            assert!((w[i] - w[10 - i]).abs() < 1e-12);
        }
        assert_eq!(tukey(1, 0.5), vec![1.0]);
        assert!(tukey(0, 0.5).is_empty());
    }

    #[test]
    fn test_linspace_endpoints() {
        assert!((linspace_at(-30.0, 30.0, 5, 0) + 30.0).abs() < 1e-12);
        assert!((linspace_at(-30.0, 30.0, 5, 4) - 30.0).abs() < 1e-12);
        assert!(linspace_at(-30.0, 30.0, 5, 2).abs() < 1e-12);
    }
}
