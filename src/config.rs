use crate::types::AgeGroup;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

/// Distribution over next states: state symbol to unnormalized weight.
pub type StateWeights = BTreeMap<String, f64>;

/// Simulation configuration parameters.
///
/// Holds the transition-probability and holding-time tables, keyed by age
/// group and then by state symbol. The state space is open: the engine
/// treats whatever keys appear here as the set of disease states.
/// Loaded from a TOML file and validated before use; see [`Config::from_file`].
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    /// State every individual starts in on the first simulated day.
    pub initial_state: String,

    /// Per age group, per current state: weighted distribution over next states.
    pub transitions: BTreeMap<AgeGroup, BTreeMap<String, StateWeights>>,

    /// Per age group, per state: days an individual stays put after
    /// transitioning into that state.
    pub holding_times: BTreeMap<AgeGroup, BTreeMap<String, u32>>,
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or deserialized, or if
    /// the tables are incomplete or contain invalid weights.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Check that the tables are closed over every reachable state.
    ///
    /// Every age group must carry both tables, every distribution must be
    /// drawable, and every transition target must itself have an outgoing
    /// distribution and a holding time.
    pub fn validate(&self) -> Result<()> {
        for age_group in AgeGroup::ALL {
            self.validate_age_group(age_group)
                .with_context(|| format!("invalid tables for age group {age_group}"))?;
        }
        Ok(())
    }

    fn validate_age_group(&self, age_group: AgeGroup) -> Result<()> {
        let Some(transitions) = self.transitions.get(&age_group) else {
            bail!("no transition table");
        };
        let Some(holding_times) = self.holding_times.get(&age_group) else {
            bail!("no holding-time table");
        };

        if !transitions.contains_key(&self.initial_state) {
            bail!("initial state {:?} has no distribution", self.initial_state);
        }
        if !holding_times.contains_key(&self.initial_state) {
            bail!("initial state {:?} has no holding time", self.initial_state);
        }

        for (state, weights) in transitions {
            check_weights(weights).with_context(|| format!("invalid weights for state {state:?}"))?;

            for target in weights.keys() {
                if !transitions.contains_key(target) {
                    bail!("reachable state {target:?} has no distribution");
                }
                if !holding_times.contains_key(target) {
                    bail!("reachable state {target:?} has no holding time");
                }
            }
        }

        Ok(())
    }
}

fn check_weights(weights: &StateWeights) -> Result<()> {
    if weights.is_empty() {
        bail!("distribution must not be empty");
    }
    if weights.values().any(|&w| !w.is_finite() || w < 0.0) {
        bail!("weights must be finite and non-negative");
    }
    let sum: f64 = weights.values().sum();
    if sum <= 0.0 {
        bail!("weights must not all be zero");
    }
    Ok(())
}
