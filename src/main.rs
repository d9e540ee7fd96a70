//! sat-eew - educational seismic early-warning demonstrator.
//!
//! Generates a synthetic or Doppler record, runs the detection pipeline and
//! prints the classified result with an explanation.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::error;

use sat_eew::config::{Config, DEFAULT_CONFIG};
use sat_eew::features::magnitude_spectrum;
use sat_eew::generators::{DopplerParams, generate_doppler, generate_synthetic};
use sat_eew::models::{OutputResult, OutputSeries, SignalSource, Waveform};
use sat_eew::output;
use sat_eew::pipeline::process_waveform;
use sat_eew::report::explain_result_in;

mod cli;

use cli::{Cli, Command, RunArgs};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Synthetic(args) => cmd_synthetic(&args),
        Command::Doppler(args) => cmd_doppler(&args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the `synthetic` command.
fn cmd_synthetic(args: &cli::SyntheticArgs) -> Result<()> {
    let config = session_config(&args.run)?;
    let sample_rate = args.run.sample_rate.unwrap_or(config.sample_rate);
    let mut rng = session_rng(args.run.seed);

    let waveform = generate_synthetic(args.duration, sample_rate, args.snr_db, &config, &mut rng)
        .context("failed to generate synthetic signal")?;

    analyze_and_report(SignalSource::Synthetic, &waveform, &config, &args.run)
}

/// Execute the `doppler` command.
fn cmd_doppler(args: &cli::DopplerArgs) -> Result<()> {
    let config = session_config(&args.run)?;
    let sample_rate = args.run.sample_rate.unwrap_or(config.sample_rate);
    let mut rng = session_rng(args.run.seed);

    let params = DopplerParams {
        f0: args.f0,
        v_rel: args.v_rel,
        c: args.c,
        amplitude: args
            .amplitude
            .unwrap_or_else(|| DopplerParams::for_config(&config).amplitude),
        snr_db: args.snr_db,
    };

    let waveform = generate_doppler(args.duration, sample_rate, &params, &mut rng)
        .context("failed to generate doppler signal")?;

    analyze_and_report(SignalSource::Doppler, &waveform, &config, &args.run)
}

/// Copy the default, layer the config file and flags on top, validate.
fn session_config(run: &RunArgs) -> Result<Config> {
    let base = match &run.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => DEFAULT_CONFIG,
    };

    let mut config = run.overrides.apply(base);
    if let Some(rate) = run.sample_rate {
        config.sample_rate = rate;
    }
    config.validate().context("invalid configuration")?;

    tracing::debug!(?config, "session configuration");
    Ok(config)
}

fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            tracing::debug!(seed, "seeding random source");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}

fn analyze_and_report(
    source: SignalSource,
    waveform: &Waveform,
    config: &Config,
    run: &RunArgs,
) -> Result<()> {
    let result = process_waveform(source, waveform, config).context("failed to process signal")?;
    let explanation = explain_result_in(&result, config, run.lang);

    let mut out = OutputResult::new(&result, explanation);
    if run.series {
        let spectrum = magnitude_spectrum(result.filtered(), waveform.sample_rate);
        out.series = Some(OutputSeries {
            time: waveform.time.clone(),
            raw: waveform.acceleration.clone(),
            filtered: result.filtered().to_vec(),
            spectrum_freq: spectrum.frequencies,
            spectrum_mag: spectrum.magnitudes,
        });
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_result(&mut handle, &out, run.format)?;

    Ok(())
}
