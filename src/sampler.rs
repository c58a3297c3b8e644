//! Expansion of aggregate population counts into individual samples.

use crate::data::PopulationTable;
use crate::types::{AgeGroup, Individual};
use anyhow::{Context, Result, bail};

/// Create the synthetic population for the selected countries.
///
/// One individual stands in for `sample_ratio` real people: each country
/// contributes `population / sample_ratio` individuals, split across the
/// five age groups by the country's percentage shares (both divisions
/// floored). Output order is countries as selected, age groups in
/// [`AgeGroup::ALL`] order. Deterministic; involves no randomness.
///
/// # Errors
/// Fails on a non-positive sample ratio or on a country missing from the
/// population table, before producing any samples.
pub fn create_samples(
    countries: &[String],
    table: &PopulationTable,
    sample_ratio: u64,
) -> Result<Vec<Individual>> {
    if sample_ratio == 0 {
        bail!("sample ratio must be positive");
    }

    let mut samples = Vec::new();
    for country in countries {
        let data = table
            .lookup(country)
            .context("failed to look up selected country")?;

        let num_samples = data.population / sample_ratio;

        for age_group in AgeGroup::ALL {
            let group_count = (num_samples as f64 * data.percentage(age_group) / 100.0) as u64;
            for _ in 0..group_count {
                samples.push(Individual::new(country.clone(), age_group));
            }
        }
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CountryData;

    fn table_with(country: &str, population: u64, percentages: [f64; 5]) -> PopulationTable {
        let mut table = PopulationTable::default();
        table.insert(
            country.to_string(),
            CountryData {
                population,
                percentages,
            },
        );
        table
    }

    #[test]
    fn even_split_scenario() {
        let table = table_with("A", 1000, [20.0, 20.0, 20.0, 20.0, 20.0]);
        let samples = create_samples(&["A".to_string()], &table, 100).unwrap();

        assert_eq!(samples.len(), 10);
        for age_group in AgeGroup::ALL {
            let count = samples
                .iter()
                .filter(|sample| sample.age_group() == age_group)
                .count();
            assert_eq!(count, 2, "samples for age group {age_group}");
        }
        assert!(samples.iter().all(|sample| sample.country() == "A"));
    }

    #[test]
    fn group_counts_are_floored() {
        // 999 / 100 = 9 samples; 9 * 33 / 100 = 2.97 -> 2 per listed group.
        let table = table_with("A", 999, [33.0, 33.0, 33.0, 1.0, 0.0]);
        let samples = create_samples(&["A".to_string()], &table, 100).unwrap();
        assert_eq!(samples.len(), 6);
    }

    #[test]
    fn sampling_is_idempotent() {
        let table = table_with("A", 12_345, [10.0, 15.0, 20.0, 40.0, 15.0]);
        let countries = vec!["A".to_string()];

        let first = create_samples(&countries, &table, 7).unwrap();
        let second = create_samples(&countries, &table, 7).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_country_fails() {
        let table = table_with("A", 1000, [20.0, 20.0, 20.0, 20.0, 20.0]);
        let countries = vec!["A".to_string(), "Nowhere".to_string()];

        let err = create_samples(&countries, &table, 100).unwrap_err();
        assert!(format!("{err:#}").contains("Nowhere"));
    }

    #[test]
    fn zero_sample_ratio_fails() {
        let table = table_with("A", 1000, [20.0, 20.0, 20.0, 20.0, 20.0]);
        assert!(create_samples(&["A".to_string()], &table, 0).is_err());
    }

    #[test]
    fn ordering_follows_selection_then_age_groups() {
        let mut table = table_with("A", 200, [100.0, 0.0, 0.0, 0.0, 0.0]);
        table.insert(
            "B".to_string(),
            CountryData {
                population: 200,
                percentages: [0.0, 0.0, 0.0, 0.0, 100.0],
            },
        );

        let countries = vec!["B".to_string(), "A".to_string()];
        let samples = create_samples(&countries, &table, 100).unwrap();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0].country(), "B");
        assert_eq!(samples[0].age_group(), AgeGroup::Over65);
        assert_eq!(samples[2].country(), "A");
        assert_eq!(samples[2].age_group(), AgeGroup::Less5);
    }
}
