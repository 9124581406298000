//! Threshold definitions and the trigger requests they emit.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One named escalation threshold.
///
/// The CSV loader reads rows straight into this struct, so field names double
/// as the CSV header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSpec {
    pub name:           String,
    /// Fires when the score is at or above this value.
    pub points:         f32,
    /// Game minutes before the threshold can fire again.
    pub cooldown_mins:  u64,
    /// Range of the suggested response delay, in game minutes.
    pub delay_min_mins: u64,
    pub delay_max_mins: u64,
    /// Higher is more severe.
    #[serde(default)]
    pub priority:       u8,
}

impl ThresholdSpec {
    pub fn new(name: &str, points: f32, cooldown_mins: u64, delay_mins: (u64, u64), priority: u8) -> Self {
        Self {
            name: name.to_owned(),
            points,
            cooldown_mins,
            delay_min_mins: delay_mins.0,
            delay_max_mins: delay_mins.1,
            priority,
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_mins * 60)
    }
}

/// The stock escalation ladder: mongrels sniff around, mongrels attack,
/// marauders raid.
pub fn default_thresholds() -> Vec<ThresholdSpec> {
    vec![
        ThresholdSpec::new("mongrel_investigation", 50.0, 120, (30, 90), 1),
        ThresholdSpec::new("mongrel_attack", 100.0, 240, (10, 30), 2),
        ThresholdSpec::new("marauder_raid", 150.0, 720, (0, 0), 3),
    ]
}

/// A decision to produce a world effect, not yet applied.
///
/// Emitted by [`ThreatScore::check_thresholds`][crate::ThreatScore::check_thresholds]
/// and consumed only by the scheduler.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerRequest {
    pub name:            String,
    pub priority:        u8,
    /// Game time the response should wait.  Zero means "now".
    pub suggested_delay: Duration,
    /// Score at the moment of firing.
    pub points:          f32,
}
