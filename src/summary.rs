//! Aggregation of day records into per-day, per-country state counts.

use crate::types::DayRecord;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Counts of day records grouped by (date, country, state).
///
/// Rows are kept date-major, country-minor; state columns are the sorted
/// union of states observed in the records.
#[derive(Debug, Default)]
pub struct Summary {
    counts: BTreeMap<(NaiveDate, String), BTreeMap<String, u64>>,
    states: BTreeSet<String>,
}

impl Summary {
    pub fn from_records(records: &[DayRecord]) -> Self {
        let mut summary = Summary::default();
        for record in records {
            summary.add(record);
        }
        summary
    }

    fn add(&mut self, record: &DayRecord) {
        let key = (record.date, record.country.clone());
        let count = self
            .counts
            .entry(key)
            .or_default()
            .entry(record.state.clone())
            .or_insert(0);
        *count += 1;

        self.states.insert(record.state.clone());
    }

    /// Sorted list of all states observed in the records.
    pub fn states(&self) -> Vec<String> {
        self.states.iter().cloned().collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&(NaiveDate, String), &BTreeMap<String, u64>)> {
        self.counts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AgeGroup;

    fn record(person_id: usize, country: &str, day: u32, state: &str) -> DayRecord {
        DayRecord {
            person_id,
            age_group: AgeGroup::From25To64,
            country: country.to_string(),
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            state: state.to_string(),
            staying_days: 0,
            prev_state: state.to_string(),
        }
    }

    #[test]
    fn counts_by_date_country_state() {
        let records = vec![
            record(0, "A", 1, "H"),
            record(1, "A", 1, "H"),
            record(2, "A", 1, "S"),
            record(0, "B", 1, "H"),
            record(0, "A", 2, "S"),
        ];

        let summary = Summary::from_records(&records);
        assert_eq!(summary.states(), vec!["H".to_string(), "S".to_string()]);

        let rows: Vec<_> = summary.rows().collect();
        assert_eq!(rows.len(), 3);

        let jan_1 = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let jan_2 = NaiveDate::from_ymd_opt(2021, 1, 2).unwrap();

        // Date-major, country-minor ordering.
        assert_eq!(*rows[0].0, (jan_1, "A".to_string()));
        assert_eq!(*rows[1].0, (jan_1, "B".to_string()));
        assert_eq!(*rows[2].0, (jan_2, "A".to_string()));

        assert_eq!(rows[0].1.get("H"), Some(&2));
        assert_eq!(rows[0].1.get("S"), Some(&1));
        assert_eq!(rows[1].1.get("H"), Some(&1));
        // Missing combination: no entry, written as 0 downstream.
        assert_eq!(rows[1].1.get("S"), None);
    }

    #[test]
    fn empty_records_yield_empty_summary() {
        let summary = Summary::from_records(&[]);
        assert!(summary.states().is_empty());
        assert_eq!(summary.rows().count(), 0);
    }
}
