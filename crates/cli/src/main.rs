// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lift - chairlift park simulation
//!
//! Runs one simulated day, logs to `<log-dir>/lift.log` and writes the
//! end-of-day report to `<log-dir>/daily_report.txt`.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod report;

use anyhow::Result;
use clap::Parser;
use lift_core::{ConfigError, ParkConfig, SystemClock};
use lift_engine::{Park, Simulation};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use crate::error::CliError;
use crate::report::Format;

const LOG_FILE: &str = "lift.log";

#[derive(Parser)]
#[command(name = "lift", version, about = "Chairlift park simulation")]
struct Cli {
    /// Length of the simulated day in seconds (10-3600)
    #[arg(short = 't', long = "time", value_name = "SECONDS")]
    time: Option<u64>,

    /// Maximum number of visitors to let in (1-500)
    #[arg(short = 'n', long = "visitors", value_name = "VISITORS")]
    visitors: Option<u32>,

    /// TOML file overriding park parameters
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the log file and the daily report
    #[arg(long, value_name = "DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// Seed every random stream for a reproducible day
    #[arg(long)]
    seed: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

impl Cli {
    /// Build the park configuration: file (or defaults), then flags on top
    fn park_config(&self) -> Result<ParkConfig, CliError> {
        let file = self.config.as_deref();
        let mut config = match file {
            Some(path) => read_config(path).map_err(|e| CliError::invalid_config(e, file))?,
            None => ParkConfig::default(),
        };
        if let Some(secs) = self.time {
            config = config.with_simulation_secs(secs);
        }
        if let Some(visitors) = self.visitors {
            config = config.with_max_visitors(visitors);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
            .validate()
            .map_err(|e| CliError::invalid_config(e, file))?;
        Ok(config)
    }
}

fn read_config(path: &Path) -> Result<ParkConfig, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    ParkConfig::from_toml_str(&content)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CliError>() {
                Some(cli_err) => eprint!("{cli_err}"),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Reject bad parameters before touching the filesystem
    let config = cli.park_config()?;
    let _log_guard = setup_logging(&cli.log_dir)?;

    info!(
        duration_secs = config.simulation_duration.as_secs(),
        max_visitors = config.max_visitors,
        seed = ?config.seed,
        "starting simulation"
    );

    let park = Arc::new(Park::new(config, SystemClock));
    let sim = Simulation::start(Arc::clone(&park));

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let signals = {
        let park = Arc::clone(&park);
        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => info!("received SIGTERM"),
                _ = sigint.recv() => info!("received SIGINT"),
                _ = park.shutdown_token().cancelled() => return,
            }
            park.request_shutdown();
        })
    };

    let run_report = sim.run().await;
    signals.abort();

    let rendered = report::render(&run_report, cli.format)?;
    let path = report::write(&cli.log_dir, &rendered)
        .map_err(|e| CliError::log_dir(&cli.log_dir, e))?;
    info!(path = %path.display(), "daily report written");

    println!("{}", report::summary(&run_report));
    println!("Report: {}", path.display());
    Ok(())
}

fn setup_logging(
    log_dir: &Path,
) -> Result<tracing_appender::non_blocking::WorkerGuard, CliError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(log_dir).map_err(|e| CliError::log_dir(log_dir, e))?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Set up subscriber with env filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}
