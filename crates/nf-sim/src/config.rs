//! `SimConfig` — every tunable of one simulation instance.
//!
//! All sections are optional in TOML; missing values take their defaults.
//!
//! ```toml
//! seed = 7
//! random_chance_per_hour = 0.1
//!
//! [clock]
//! speed = "fast"
//! max_days = 3
//!
//! [threat]
//! decay_per_hour = 5.0
//!
//! [[threat.thresholds]]
//! name = "scouts"
//! points = 40.0
//! cooldown_mins = 60
//! delay_min_mins = 5
//! delay_max_mins = 10
//!
//! [responses.scouts]
//! effect_id = "spawn_scouts"
//! count_min = 1
//! count_max = 2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use nf_action::ActionConfig;
use nf_core::ClockConfig;
use nf_schedule::{DEFAULT_RANDOM_CHANCE_PER_HOUR, ResponseTable};
use nf_threat::ThreatConfig;

use crate::{SimError, SimResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed.  `None` seeds from OS entropy.
    pub seed:                   Option<u64>,
    pub clock:                  ClockConfig,
    pub actions:                ActionConfig,
    pub threat:                 ThreatConfig,
    /// Threshold name → world effect.
    pub responses:              ResponseTable,
    /// Chance that one random event fires per game hour.
    pub random_chance_per_hour: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                   None,
            clock:                  ClockConfig::default(),
            actions:                ActionConfig::default(),
            threat:                 ThreatConfig::default(),
            responses:              ResponseTable::default(),
            random_chance_per_hour: DEFAULT_RANDOM_CHANCE_PER_HOUR,
        }
    }
}

impl SimConfig {
    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> SimResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> SimResult<()> {
        self.clock.validate().map_err(|e| SimError::Config(e.to_string()))?;
        self.threat.validate()?;
        if !(0.0..=1.0).contains(&self.random_chance_per_hour) {
            return Err(SimError::Config(format!(
                "random_chance_per_hour must be in [0, 1], got {}",
                self.random_chance_per_hour
            )));
        }
        if !self.actions.noise_max.is_finite() || self.actions.noise_max <= 0.0 {
            return Err(SimError::Config("actions.noise_max must be positive".into()));
        }
        Ok(())
    }
}
