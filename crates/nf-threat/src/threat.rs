//! `ThreatScore` — score residual, hour-based decay, and threshold cooldowns.
//!
//! # Points model
//!
//! `points` is the larger of the current pure score and a decaying residual
//! of earlier scores:
//!
//! ```text
//! points(t) = max(score(state, clock), residual(t))
//! residual  = previous points − decay_per_hour × whole hours with no attractor
//! ```
//!
//! While any attractor is active the residual is frozen (decay is
//! suppressed and the decay clock restarts), so the score never drifts down
//! while the player is still doing the risky thing.  Decay is applied in
//! whole-hour steps only, which keeps the rate hour-denominated no matter how
//! finely the host slices ticks.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use nf_action::ActionState;
use nf_core::{Clock, GameTime, MS_PER_HOUR, SimRng};

use crate::score::{ScoreBreakdown, ScoringWeights, score};
use crate::{LevelBounds, ThreatError, ThreatLevel, ThreatResult, ThresholdSpec, TriggerRequest};

// ── ThreatConfig ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreatConfig {
    pub weights:        ScoringWeights,
    /// Points removed per whole game hour with no attractor active.
    pub decay_per_hour: f32,
    pub thresholds:     Vec<ThresholdSpec>,
    pub levels:         LevelBounds,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            weights:        ScoringWeights::default(),
            decay_per_hour: 10.0,
            thresholds:     crate::default_thresholds(),
            levels:         LevelBounds::default(),
        }
    }
}

impl ThreatConfig {
    pub fn validate(&self) -> ThreatResult<()> {
        if !(self.weights.max_points > 0.0) {
            return Err(ThreatError::InvalidThreshold {
                name:   "max_points".into(),
                reason: "must be positive".into(),
            });
        }
        validate_thresholds(&self.thresholds, self.weights.max_points)
    }
}

/// Names must be unique and non-empty, points in `(0, max_points]`, delay
/// ranges ordered.
pub(crate) fn validate_thresholds(specs: &[ThresholdSpec], max_points: f32) -> ThreatResult<()> {
    let invalid = |spec: &ThresholdSpec, reason: &str| ThreatError::InvalidThreshold {
        name:   spec.name.clone(),
        reason: reason.to_owned(),
    };
    for (i, spec) in specs.iter().enumerate() {
        if spec.name.trim().is_empty() {
            return Err(invalid(spec, "name is empty"));
        }
        if !(spec.points > 0.0 && spec.points <= max_points) {
            return Err(invalid(spec, "points out of range"));
        }
        if spec.delay_min_mins > spec.delay_max_mins {
            return Err(invalid(spec, "delay_min_mins exceeds delay_max_mins"));
        }
        if specs[..i].iter().any(|other| other.name == spec.name) {
            return Err(invalid(spec, "duplicate name"));
        }
    }
    Ok(())
}

// ── Snapshot / view ───────────────────────────────────────────────────────────

/// Serializable threat state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThreatSnapshot {
    pub points:     f32,
    pub last_decay: Option<GameTime>,
    /// Threshold name → game time it last fired (armed thresholds absent).
    pub cooldowns:  BTreeMap<String, GameTime>,
}

/// Read-only threat summary handed to event predicates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ThreatView {
    pub points: f32,
    pub level:  ThreatLevel,
}

// ── ThreatScore ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ThreatScore {
    config:     ThreatConfig,
    points:     f32,
    last_decay: Option<GameTime>,
    cooldowns:  BTreeMap<String, GameTime>,
    breakdown:  ScoreBreakdown,
}

impl ThreatScore {
    /// Build from a config, sorting thresholds highest-first.
    pub fn new(mut config: ThreatConfig) -> Self {
        config
            .thresholds
            .sort_by(|a, b| b.points.total_cmp(&a.points));
        Self {
            config,
            points:     0.0,
            last_decay: None,
            cooldowns:  BTreeMap::new(),
            breakdown:  ScoreBreakdown::default(),
        }
    }

    // ── Per-tick steps ────────────────────────────────────────────────────

    /// Re-score the action state, apply decay, and return the new points.
    pub fn recompute(&mut self, actions: &ActionState, clock: &Clock) -> f32 {
        let breakdown = score(actions, clock, &self.config.weights);
        self.decay(clock.now(), breakdown.has_attractor());
        self.points = self
            .points
            .max(breakdown.total)
            .clamp(0.0, self.config.weights.max_points);
        self.breakdown = breakdown;
        self.points
    }

    /// Subtract `decay_per_hour` for every whole hour since the last decay
    /// step, unless an attractor is active.
    pub fn decay(&mut self, now: GameTime, attractor_active: bool) {
        let Some(last) = self.last_decay else {
            self.last_decay = Some(now);
            return;
        };
        if attractor_active {
            self.last_decay = Some(now);
            return;
        }
        let hours = now.hours_since(last);
        if hours == 0 {
            return;
        }
        let before = self.points;
        self.points = (self.points - self.config.decay_per_hour * hours as f32).max(0.0);
        self.last_decay = Some(GameTime(last.0 + hours * MS_PER_HOUR));
        if before > 0.0 {
            tracing::debug!(hours, before, after = self.points, "threat decayed");
        }
    }

    /// Fire at most one threshold: the highest armed one the score has reached.
    ///
    /// Expired cooldowns are cleared first.  Thresholds still cooling down are
    /// skipped, so a lower armed threshold may fire in their place.
    pub fn check_thresholds(&mut self, now: GameTime, rng: &mut SimRng) -> Option<TriggerRequest> {
        self.expire_cooldowns(now);

        let spec = self
            .config
            .thresholds
            .iter()
            .find(|t| self.points >= t.points && !self.cooldowns.contains_key(&t.name))?;

        let delay_mins = rng.between(spec.delay_min_mins..=spec.delay_max_mins);
        let request = TriggerRequest {
            name:            spec.name.clone(),
            priority:        spec.priority,
            suggested_delay: Duration::from_secs(delay_mins * 60),
            points:          self.points,
        };
        self.cooldowns.insert(spec.name.clone(), now);
        tracing::info!(
            threshold = %request.name,
            points = self.points,
            delay_mins,
            "threat threshold crossed"
        );
        Some(request)
    }

    fn expire_cooldowns(&mut self, now: GameTime) {
        let thresholds = &self.config.thresholds;
        self.cooldowns.retain(|name, fired| {
            thresholds
                .iter()
                .find(|t| &t.name == name)
                .is_some_and(|t| now.since(*fired) < t.cooldown())
        });
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn points(&self) -> f32 {
        self.points
    }

    pub fn level(&self) -> ThreatLevel {
        ThreatLevel::from_points(self.points, &self.config.levels)
    }

    pub fn view(&self) -> ThreatView {
        ThreatView { points: self.points, level: self.level() }
    }

    /// The breakdown from the latest `recompute`.
    pub fn breakdown(&self) -> &ScoreBreakdown {
        &self.breakdown
    }

    /// `true` if `name` is a known threshold that is not cooling down.
    /// Unknown names report `false`.
    pub fn is_armed(&self, name: &str, now: GameTime) -> bool {
        self.cooldown_remaining(name, now).is_some_and(|d| d.is_zero())
    }

    /// Time until `name` re-arms; zero if armed, `None` for unknown names.
    pub fn cooldown_remaining(&self, name: &str, now: GameTime) -> Option<Duration> {
        let spec = self.config.thresholds.iter().find(|t| t.name == name)?;
        let remaining = match self.cooldowns.get(name) {
            Some(fired) => spec.cooldown().saturating_sub(now.since(*fired)),
            None => Duration::ZERO,
        };
        Some(remaining)
    }

    pub fn config(&self) -> &ThreatConfig {
        &self.config
    }

    // ── Snapshot ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> ThreatSnapshot {
        ThreatSnapshot {
            points:     self.points,
            last_decay: self.last_decay,
            cooldowns:  self.cooldowns.clone(),
        }
    }

    pub fn restore(&mut self, snap: ThreatSnapshot) {
        self.points = snap.points.clamp(0.0, self.config.weights.max_points);
        self.last_decay = snap.last_decay;
        self.cooldowns = snap.cooldowns;
        self.breakdown = ScoreBreakdown::default();
    }
}

impl Default for ThreatScore {
    fn default() -> Self {
        ThreatScore::new(ThreatConfig::default())
    }
}
