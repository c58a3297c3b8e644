//! Tabular input and output.

use crate::summary::Summary;
use crate::types::{AgeGroup, DayRecord};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

#[derive(Debug, Deserialize)]
struct CountryRow {
    country: String,
    population: u64,
    less_5: f64,
    #[serde(rename = "5_to_14")]
    from_5_to_14: f64,
    #[serde(rename = "15_to_24")]
    from_15_to_24: f64,
    #[serde(rename = "25_to_64")]
    from_25_to_64: f64,
    over_65: f64,
}

/// Aggregate demographic data for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryData {
    pub population: u64,
    /// Age-group percentages, indexed in [`AgeGroup::ALL`] order.
    pub percentages: [f64; 5],
}

impl CountryData {
    pub fn percentage(&self, age_group: AgeGroup) -> f64 {
        self.percentages[age_group as usize]
    }
}

/// Per-country aggregate population dataset, loaded from a CSV file with
/// columns `country, population, less_5, 5_to_14, 15_to_24, 25_to_64, over_65`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationTable {
    countries: BTreeMap<String, CountryData>,
}

impl PopulationTable {
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
        let mut reader = csv::Reader::from_reader(BufReader::new(file));

        let mut countries = BTreeMap::new();
        for row in reader.deserialize::<CountryRow>() {
            let row = row.context("failed to deserialize population row")?;
            let data = CountryData {
                population: row.population,
                percentages: [
                    row.less_5,
                    row.from_5_to_14,
                    row.from_15_to_24,
                    row.from_25_to_64,
                    row.over_65,
                ],
            };
            countries.insert(row.country, data);
        }

        Ok(Self { countries })
    }

    pub fn insert(&mut self, country: String, data: CountryData) {
        self.countries.insert(country, data);
    }

    /// Look up a country by identifier; an unknown country is a hard error.
    pub fn lookup(&self, country: &str) -> Result<&CountryData> {
        let Some(data) = self.countries.get(country) else {
            bail!("unknown country {country:?}");
        };
        Ok(data)
    }
}

/// Write the full day-record sequence to a CSV file, one record per row.
pub fn write_timeseries<P: AsRef<Path>>(records: &[DayRecord], file: P) -> Result<()> {
    let file = file.as_ref();
    let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    for record in records {
        writer
            .serialize(record)
            .context("failed to serialize day record")?;
    }

    writer.flush().context("failed to flush writer stream")?;
    Ok(())
}

/// Read a day-record sequence back from a timeseries CSV file.
pub fn read_timeseries<P: AsRef<Path>>(file: P) -> Result<Vec<DayRecord>> {
    let file = file.as_ref();
    let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut records = Vec::new();
    for record in reader.deserialize::<DayRecord>() {
        records.push(record.context("failed to deserialize day record")?);
    }
    Ok(records)
}

/// Write a pivoted summary to a CSV file: one row per (date, country), one
/// count column per state.
pub fn write_summary<P: AsRef<Path>>(summary: &Summary, file: P) -> Result<()> {
    let file = file.as_ref();
    let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    let states = summary.states();

    let mut header = vec!["date".to_string(), "country".to_string()];
    header.extend(states.iter().cloned());
    writer
        .write_record(&header)
        .context("failed to write summary header")?;

    for ((date, country), counts) in summary.rows() {
        let mut row = vec![date.to_string(), country.clone()];
        for state in &states {
            let count = counts.get(state).copied().unwrap_or(0);
            row.push(count.to_string());
        }
        writer
            .write_record(&row)
            .context("failed to write summary row")?;
    }

    writer.flush().context("failed to flush writer stream")?;
    Ok(())
}
