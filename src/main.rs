mod cli;
mod config;
mod device;
mod predict;
mod report;
mod window;

use chrono::Utc;
use clap::{error::ErrorKind, CommandFactory, Parser};
use std::io::{self, Write};
use std::process::ExitCode;
use thiserror::Error;

use crate::cli::{Cli, UsageError};
use crate::config::{Config, ConfigError};
use crate::predict::{find_passes, load_catalog, PredictError, Sgp4Propagator};

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Predict(#[from] PredictError),
    #[error("output error: {0}")]
    Io(#[from] io::Error),
    #[error("output error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Usage(e)) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,sat_o_pass=debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(cli: &Cli) -> Result<(), RunError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(name) = config.station.as_ref().and_then(|s| s.name.as_deref()) {
        log::info!("Station: {}", name);
    }

    let (settings, step) = cli::resolve_settings(cli, &config.predict)?;
    let window = cli::resolve_window(cli, step, Utc::now())?;
    let explicit = cli::explicit_site(cli, &config)?;
    let (site, source) = cli::resolve_site(cli.from_dish, explicit, || {
        device::fetch_dish_location(&config.dish)
    })?;
    log::info!(
        "Observer ({}): {:.6}, {:.6}, {:.1} m",
        source,
        site.latitude_deg(),
        site.longitude_deg(),
        site.altitude_m()
    );

    let catalog = load_catalog(&cli.tle_file)?;
    if catalog.is_empty() {
        eprintln!("No element sets parsed from {}.", cli.tle_file.display());
        return Ok(());
    }

    log::info!(
        "Sampling {} satellites from {} to {} every {}s",
        catalog.len(),
        window.start().format("%Y-%m-%d %H:%M:%SZ"),
        window.end().format("%Y-%m-%d %H:%M:%SZ"),
        window.step().num_seconds()
    );

    let propagator = Sgp4Propagator::new(&catalog);
    let passes = find_passes(&catalog, &site, &window, &settings, &propagator);
    if passes.is_empty() {
        eprintln!(
            "No satellites above {}° in that window.",
            settings.min_elevation_deg
        );
        return Ok(());
    }
    log::info!("Found {} passes", passes.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        report::render_json(&passes, &mut out)?;
    } else {
        report::render_text(&passes, &mut out)?;
    }
    out.flush()?;

    Ok(())
}
