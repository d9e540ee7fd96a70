//! Educational seismic early-warning (EEW) pipeline.
//!
//! Synthesize a ground-acceleration record, low-pass it without phase lag,
//! find the onset with an STA/LTA trigger, measure PGA, dominant period and
//! a magnitude proxy, classify the event and explain the outcome.
//!
//! ```no_run
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use sat_eew::{DEFAULT_CONFIG, SignalSource, explain_result, generate_synthetic, process_signal};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let config = DEFAULT_CONFIG;
//! let w = generate_synthetic(120.0, 100.0, 8.0, &config, &mut rng)?;
//! let result = process_signal(SignalSource::Synthetic, &w.time, &w.acceleration, w.sample_rate, &config)?;
//! println!("{}: {}", result.alert(), explain_result(&result, &config));
//! # Ok::<(), sat_eew::errors::EewError>(())
//! ```

pub mod classifier;
pub mod config;
pub mod eew;
pub mod errors;
pub mod features;
pub mod filters;
pub mod generators;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod report;

pub use config::{Config, DEFAULT_CONFIG};
pub use errors::EewError;
pub use generators::{DopplerParams, generate_doppler, generate_synthetic};
pub use models::{AlertKind, AnalysisResult, SeismicEvent, SignalSource, Waveform};
pub use pipeline::process_signal;
pub use report::explain_result;
