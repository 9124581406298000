//! The pure scoring function.
//!
//! ```text
//! total = Σ active signal weights
//!       + combo bonus      (if ≥ combo_min_attractors signals are active)
//!       + day escalation   (if any signal is active and day ≥ escalation_start_day)
//! clamped to [0, max_points]
//! ```
//!
//! Bonuses only apply on top of at least one active attractor, so a quiet
//! shelter always scores zero and the residual score is free to decay.

use std::fmt;

use serde::{Deserialize, Serialize};

use nf_action::ActionState;
use nf_core::Clock;

// ── ScoringWeights ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub heat_source:      f32,
    pub smoke_visible:    f32,
    /// Light or heat source active during the night window.
    pub light_at_night:   f32,
    /// Points per point of noise level.
    pub noise_factor:     f32,
    pub opening_exposed:  f32,
    pub door_open:        f32,
    pub cooking_smell:    f32,
    pub seen_outside:     f32,
    pub recent_waste:     f32,

    pub combo_min_attractors: usize,
    pub combo_bonus:          f32,

    pub escalation_start_day: u32,
    pub escalation_per_day:   f32,
    pub escalation_cap:       f32,

    /// Upper clamp of the score.
    pub max_points: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            heat_source:          10.0,
            smoke_visible:        30.0,
            light_at_night:       25.0,
            noise_factor:         0.5,
            opening_exposed:      15.0,
            door_open:            10.0,
            cooking_smell:        20.0,
            seen_outside:         15.0,
            recent_waste:         15.0,
            combo_min_attractors: 3,
            combo_bonus:          25.0,
            escalation_start_day: 2,
            escalation_per_day:   5.0,
            escalation_cap:       40.0,
            max_points:           200.0,
        }
    }
}

// ── Contributions ─────────────────────────────────────────────────────────────

/// One line of a [`ScoreBreakdown`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contribution {
    HeatSource,
    SmokeVisible,
    LightAtNight,
    Noise,
    OpeningExposed,
    DoorOpen,
    CookingSmell,
    SeenOutside,
    RecentWaste,
    ComboBonus,
    DayEscalation,
}

impl Contribution {
    /// `true` for signals the player is actively producing; `false` for the
    /// bonuses stacked on top of them.
    pub fn is_attractor(self) -> bool {
        !matches!(self, Contribution::ComboBonus | Contribution::DayEscalation)
    }
}

impl fmt::Display for Contribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Contribution::HeatSource => "heat source",
            Contribution::SmokeVisible => "smoke visible",
            Contribution::LightAtNight => "light at night",
            Contribution::Noise => "noise",
            Contribution::OpeningExposed => "opening exposed",
            Contribution::DoorOpen => "door open",
            Contribution::CookingSmell => "cooking smell",
            Contribution::SeenOutside => "seen outside",
            Contribution::RecentWaste => "recent waste",
            Contribution::ComboBonus => "combination bonus",
            Contribution::DayEscalation => "day escalation",
        };
        f.write_str(s)
    }
}

/// Itemised result of [`score`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub items: Vec<(Contribution, f32)>,
    /// Clamped sum of `items`.
    pub total: f32,
}

impl ScoreBreakdown {
    pub fn get(&self, c: Contribution) -> Option<f32> {
        self.items.iter().find(|(k, _)| *k == c).map(|(_, v)| *v)
    }

    pub fn attractor_count(&self) -> usize {
        self.items.iter().filter(|(c, _)| c.is_attractor()).count()
    }

    /// `true` while any attractor signal is contributing.
    pub fn has_attractor(&self) -> bool {
        self.attractor_count() > 0
    }
}

// ── score ─────────────────────────────────────────────────────────────────────

/// Score the current action state.  Pure: same inputs, same output.
pub fn score(actions: &ActionState, clock: &Clock, w: &ScoringWeights) -> ScoreBreakdown {
    let s = actions.signals();
    let now = clock.now();
    let mut items: Vec<(Contribution, f32)> = Vec::with_capacity(12);

    if s.heat_source_active {
        items.push((Contribution::HeatSource, w.heat_source));
    }
    if s.smoke_visible {
        items.push((Contribution::SmokeVisible, w.smoke_visible));
    }
    if clock.is_night() && (s.light_active || s.heat_source_active) {
        items.push((Contribution::LightAtNight, w.light_at_night));
    }
    if s.noise_level > 0.0 {
        items.push((Contribution::Noise, s.noise_level * w.noise_factor));
    }
    if s.opening_exposed {
        items.push((Contribution::OpeningExposed, w.opening_exposed));
    }
    if s.door_open.active {
        items.push((Contribution::DoorOpen, w.door_open));
    }
    if s.cooking_smell.active {
        items.push((Contribution::CookingSmell, w.cooking_smell));
    }
    if s.seen_outside.active {
        items.push((Contribution::SeenOutside, w.seen_outside));
    }
    if actions.waste_recent(now) {
        items.push((Contribution::RecentWaste, w.recent_waste));
    }

    let attractors = items.len();
    if attractors > 0 && attractors >= w.combo_min_attractors.max(1) {
        items.push((Contribution::ComboBonus, w.combo_bonus));
    }
    let day = clock.day();
    if attractors > 0 && day >= w.escalation_start_day {
        let days = (day - w.escalation_start_day + 1) as f32;
        let bonus = (days * w.escalation_per_day).min(w.escalation_cap);
        items.push((Contribution::DayEscalation, bonus));
    }

    let sum: f32 = items.iter().map(|(_, v)| v).sum();
    let total = if sum.is_finite() { sum.clamp(0.0, w.max_points) } else { 0.0 };
    ScoreBreakdown { items, total }
}
