//! Simulation data types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Age stratum of an individual.
///
/// The five groups match the percentage columns of the population dataset
/// and select which transition and holding-time tables apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "less_5")]
    Less5,
    #[serde(rename = "5_to_14")]
    From5To14,
    #[serde(rename = "15_to_24")]
    From15To24,
    #[serde(rename = "25_to_64")]
    From25To64,
    #[serde(rename = "over_65")]
    Over65,
}

impl AgeGroup {
    /// All age groups, in dataset column order.
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::Less5,
        AgeGroup::From5To14,
        AgeGroup::From15To24,
        AgeGroup::From25To64,
        AgeGroup::Over65,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Less5 => "less_5",
            AgeGroup::From5To14 => "5_to_14",
            AgeGroup::From15To24 => "15_to_24",
            AgeGroup::From25To64 => "25_to_64",
            AgeGroup::Over65 => "over_65",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Individual of the synthetic population.
///
/// Created once by the sampler and never mutated; its position in the
/// sample vector is its `person_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    country: String,
    age_group: AgeGroup,
}

impl Individual {
    pub fn new(country: String, age_group: AgeGroup) -> Self {
        Self { country, age_group }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn age_group(&self) -> AgeGroup {
        self.age_group
    }
}

/// State snapshot of one individual on one calendar day.
///
/// Exactly one record is emitted per (individual, day) pair; the field
/// order matches the columns of the timeseries file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub person_id: usize,
    pub age_group: AgeGroup,
    pub country: String,
    pub date: NaiveDate,
    pub state: String,
    pub staying_days: u32,
    pub prev_state: String,
}
