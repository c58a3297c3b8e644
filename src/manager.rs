use crate::config::Config;
use crate::data::{self, PopulationTable};
use crate::engine::Engine;
use crate::sampler;
use crate::summary::Summary;
use crate::types::DayRecord;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Parameters of one simulation run.
#[derive(Debug)]
pub struct SimulationOpts {
    pub config_file: PathBuf,
    pub population_file: PathBuf,
    pub countries: Vec<String>,
    pub sample_ratio: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub seed: Option<u64>,
}

pub struct Manager {
    out_dir: PathBuf,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(out_dir: P) -> Result<Self> {
        let out_dir = out_dir.as_ref().to_path_buf();
        fs::create_dir_all(&out_dir).with_context(|| format!("failed to create {out_dir:?}"))?;
        Ok(Self { out_dir })
    }

    pub fn run_simulation(&self, opts: &SimulationOpts) -> Result<()> {
        let cfg = Config::from_file(&opts.config_file).context("failed to construct cfg")?;

        let table = PopulationTable::from_file(&opts.population_file)
            .context("failed to load population table")?;

        let samples = sampler::create_samples(&opts.countries, &table, opts.sample_ratio)
            .context("failed to create samples")?;
        log::info!("created {} samples", samples.len());

        let mut engine = match opts.seed {
            Some(seed) => Engine::with_seed(cfg, seed),
            None => Engine::new(cfg),
        }
        .context("failed to construct engine")?;

        let records = engine
            .run(&samples, opts.start_date, opts.end_date)
            .context("failed to run simulation")?;
        log::info!("simulated {} day records", records.len());

        let timeseries_file = self.timeseries_file();
        data::write_timeseries(&records, &timeseries_file)
            .context("failed to write timeseries")?;
        log::info!("wrote {timeseries_file:?}");

        self.write_summary_of(&records)?;

        Ok(())
    }

    pub fn run_summary(&self, timeseries_file: Option<&Path>) -> Result<()> {
        let default_file = self.timeseries_file();
        let timeseries_file = timeseries_file.unwrap_or(&default_file);

        let records =
            data::read_timeseries(timeseries_file).context("failed to read timeseries")?;
        log::info!("read {} day records", records.len());

        self.write_summary_of(&records)?;

        Ok(())
    }

    fn write_summary_of(&self, records: &[DayRecord]) -> Result<()> {
        let summary = Summary::from_records(records);

        let summary_file = self.summary_file();
        data::write_summary(&summary, &summary_file).context("failed to write summary")?;
        log::info!("wrote {summary_file:?}");

        Ok(())
    }

    fn timeseries_file(&self) -> PathBuf {
        self.out_dir.join("simulated-timeseries.csv")
    }

    fn summary_file(&self) -> PathBuf {
        self.out_dir.join("summary-timeseries.csv")
    }
}
