mod config;
mod data;
mod engine;
mod manager;
mod sampler;
mod summary;
mod types;

use crate::manager::{Manager, SimulationOpts};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sample a synthetic population and simulate its daily trajectories.
    Simulate {
        /// TOML file with the transition and holding-time tables.
        #[arg(long)]
        config: PathBuf,

        /// CSV file with per-country populations and age-group percentages.
        #[arg(long)]
        population: PathBuf,

        /// Countries to include, comma separated.
        #[arg(long, value_delimiter = ',', required = true)]
        countries: Vec<String>,

        /// One synthetic individual per this many real individuals.
        #[arg(long)]
        sample_ratio: u64,

        /// First simulated day (YYYY-MM-DD).
        #[arg(long)]
        start_date: NaiveDate,

        /// Last simulated day (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end_date: NaiveDate,

        /// Fixed RNG seed, for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Recompute the summary from an existing timeseries file.
    Summarize {
        /// Timeseries CSV to aggregate; defaults to the one in the output directory.
        #[arg(long)]
        timeseries: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.out_dir).context("failed to construct mgr")?;

    match args.command {
        Command::Simulate {
            config,
            population,
            countries,
            sample_ratio,
            start_date,
            end_date,
            seed,
        } => mgr.run_simulation(&SimulationOpts {
            config_file: config,
            population_file: population,
            countries,
            sample_ratio,
            start_date,
            end_date,
            seed,
        })?,
        Command::Summarize { timeseries } => mgr.run_summary(timeseries.as_deref())?,
    }

    Ok(())
}
