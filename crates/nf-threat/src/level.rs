//! Display-facing threat levels.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    VeryHigh,
    Critical,
}

impl ThreatLevel {
    pub fn from_points(points: f32, bounds: &LevelBounds) -> ThreatLevel {
        if points >= bounds.critical {
            ThreatLevel::Critical
        } else if points >= bounds.very_high {
            ThreatLevel::VeryHigh
        } else if points >= bounds.high {
            ThreatLevel::High
        } else if points >= bounds.medium {
            ThreatLevel::Medium
        } else {
            ThreatLevel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThreatLevel::Low => "LOW",
            ThreatLevel::Medium => "MEDIUM",
            ThreatLevel::High => "HIGH",
            ThreatLevel::VeryHigh => "VERY_HIGH",
            ThreatLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower point bound of each level above `Low`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelBounds {
    pub medium:    f32,
    pub high:      f32,
    pub very_high: f32,
    pub critical:  f32,
}

impl Default for LevelBounds {
    fn default() -> Self {
        Self { medium: 50.0, high: 100.0, very_high: 150.0, critical: 180.0 }
    }
}
