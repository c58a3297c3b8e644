use crate::config::Config;
use crate::types::{AgeGroup, DayRecord, Individual};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::weighted::WeightedIndex;
use std::collections::BTreeMap;

/// Prebuilt weighted distribution over next states.
struct StateDist {
    targets: Vec<String>,
    index: WeightedIndex<f64>,
}

/// Trajectory simulation engine.
///
/// Holds the transition and holding-time tables and the random number
/// generator, and walks every individual through the date range one day at
/// a time. Each (age group, state) distribution is turned into a
/// [`WeightedIndex`] once at construction; the daily Markov roll is then a
/// single weighted draw.
pub struct Engine {
    initial_state: String,
    dists: BTreeMap<AgeGroup, BTreeMap<String, StateDist>>,
    holding_times: BTreeMap<AgeGroup, BTreeMap<String, u32>>,
    rng: ChaCha12Rng,
}

impl Engine {
    /// Create a new `Engine` seeded from the operating system.
    pub fn new(cfg: Config) -> Result<Self> {
        let rng = ChaCha12Rng::try_from_os_rng()?;
        Self::with_rng(cfg, rng)
    }

    /// Create a new `Engine` with a fixed seed, for reproducible runs.
    pub fn with_seed(cfg: Config, seed: u64) -> Result<Self> {
        Self::with_rng(cfg, ChaCha12Rng::seed_from_u64(seed))
    }

    fn with_rng(cfg: Config, rng: ChaCha12Rng) -> Result<Self> {
        let mut dists: BTreeMap<AgeGroup, BTreeMap<String, StateDist>> = BTreeMap::new();

        for (&age_group, transitions) in &cfg.transitions {
            for (state, weights) in transitions {
                let targets: Vec<String> = weights.keys().cloned().collect();
                let index =
                    WeightedIndex::new(weights.values().copied()).with_context(|| {
                        format!("invalid weights for state {state:?} in age group {age_group}")
                    })?;

                dists
                    .entry(age_group)
                    .or_default()
                    .insert(state.clone(), StateDist { targets, index });
            }
        }

        Ok(Self {
            initial_state: cfg.initial_state,
            dists,
            holding_times: cfg.holding_times,
            rng,
        })
    }

    /// Simulate every individual across the closed date range.
    ///
    /// Produces one [`DayRecord`] per individual per day, individual-major
    /// (sampler index order), date-ascending within an individual.
    ///
    /// # Errors
    /// Rejects an end date before the start date up front; fails fast on
    /// any age group/state combination missing from the tables.
    pub fn run(
        &mut self,
        samples: &[Individual],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DayRecord>> {
        if end_date < start_date {
            bail!("end date {end_date} is before start date {start_date}");
        }
        let n_days = (end_date - start_date).num_days() as usize + 1;

        let mut records = Vec::with_capacity(samples.len().saturating_mul(n_days));
        for (person_id, sample) in samples.iter().enumerate() {
            self.simulate_individual(person_id, sample, start_date, n_days, &mut records)
                .with_context(|| format!("failed to simulate individual {person_id}"))?;
        }

        Ok(records)
    }

    fn simulate_individual(
        &mut self,
        person_id: usize,
        sample: &Individual,
        start_date: NaiveDate,
        n_days: usize,
        records: &mut Vec<DayRecord>,
    ) -> Result<()> {
        let age_group = sample.age_group();
        let mut state = self.initial_state.clone();
        let mut staying_days: u32 = 0;

        for (i_day, date) in start_date.iter_days().take(n_days).enumerate() {
            let new_state = if i_day == 0 {
                // First day: everyone is in the initial state, no roll.
                state.clone()
            } else if staying_days == 0 {
                let next = self.draw_transition(age_group, &state)?;
                staying_days = self.holding_time(age_group, &next)?;
                next
            } else {
                staying_days -= 1;
                state.clone()
            };

            records.push(DayRecord {
                person_id,
                age_group,
                country: sample.country().to_string(),
                date,
                state: new_state.clone(),
                staying_days,
                prev_state: state,
            });

            state = new_state;
        }

        Ok(())
    }

    fn draw_transition(&mut self, age_group: AgeGroup, state: &str) -> Result<String> {
        let Some(dist) = self
            .dists
            .get(&age_group)
            .and_then(|dists| dists.get(state))
        else {
            bail!("no transition distribution for state {state:?} in age group {age_group}");
        };

        let i_target = dist.index.sample(&mut self.rng);
        Ok(dist.targets[i_target].clone())
    }

    fn holding_time(&self, age_group: AgeGroup, state: &str) -> Result<u32> {
        self.holding_times
            .get(&age_group)
            .and_then(|times| times.get(state))
            .copied()
            .with_context(|| format!("no holding time for state {state:?} in age group {age_group}"))
    }
}
