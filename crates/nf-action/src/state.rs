//! `ActionState` — the live record of what the player is doing.
//!
//! # Signal kinds
//!
//! | Kind              | Fields                                              |
//! |-------------------|-----------------------------------------------------|
//! | boolean flag      | `heat_source_active`, `ventilated`, `light_active`, `opening_exposed` |
//! | pulsed flag       | `cooking_smell`, `door_open`, `seen_outside`        |
//! | monotonic counter | `waste_disposal_count`                              |
//! | bounded + decay   | `noise_level` ∈ [0, `noise_max`]                    |
//! | timestamp         | `heat_source_since`, `last_noise_at`, `last_waste_at`, `last_activity_at` |
//! | derived           | `smoke_visible` = heat source AND NOT ventilated    |
//!
//! Counters only grow (until [`ActionState::reset`]); the noise level is
//! clamped after every mutation.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use nf_core::{Clock, GameTime};

use crate::action::{Action, PulseFlag, PulseRequest};

// ── ActionConfig ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Ring-buffer capacity of the action history.
    pub history_cap: usize,

    /// Upper bound of `noise_level`.
    pub noise_max: f32,

    /// Game seconds without noise before the level starts to decay.
    pub noise_idle_secs: u64,

    /// Noise points removed per game minute once idle.
    pub noise_decay_per_minute: f32,

    /// Wall-clock lifetime of each pulsed flag, in milliseconds.
    pub cooking_pulse_ms: u64,
    pub door_pulse_ms:    u64,
    pub outside_pulse_ms: u64,

    /// Game hours a waste disposal keeps attracting attention.
    pub waste_scent_hours: u64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            history_cap:            50,
            noise_max:              100.0,
            noise_idle_secs:        10 * 60,
            noise_decay_per_minute: 2.0,
            cooking_pulse_ms:       30_000,
            door_pulse_ms:          5_000,
            outside_pulse_ms:       10_000,
            waste_scent_hours:      6,
        }
    }
}

impl ActionConfig {
    pub fn pulse_duration(&self, flag: PulseFlag) -> Duration {
        let ms = match flag {
            PulseFlag::CookingSmell => self.cooking_pulse_ms,
            PulseFlag::DoorOpen => self.door_pulse_ms,
            PulseFlag::SeenOutside => self.outside_pulse_ms,
        };
        Duration::from_millis(ms)
    }
}

// ── Signals ───────────────────────────────────────────────────────────────────

/// A pulsed flag and the generation of its latest raise.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pulse {
    pub active:     bool,
    pub generation: u32,
}

/// The flat signal record.  Read freely; mutate only through `ActionState`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    pub heat_source_active:   bool,
    pub heat_source_since:    Option<GameTime>,
    pub ventilated:           bool,
    pub light_active:         bool,
    pub opening_exposed:      bool,
    pub noise_level:          f32,
    pub last_noise_at:        Option<GameTime>,
    pub waste_disposal_count: u32,
    pub last_waste_at:        Option<GameTime>,
    pub last_activity_at:     Option<GameTime>,
    pub smoke_visible:        bool,
    pub cooking_smell:        Pulse,
    pub door_open:            Pulse,
    pub seen_outside:         Pulse,
}

impl Signals {
    fn pulse_mut(&mut self, flag: PulseFlag) -> &mut Pulse {
        match flag {
            PulseFlag::CookingSmell => &mut self.cooking_smell,
            PulseFlag::DoorOpen => &mut self.door_open,
            PulseFlag::SeenOutside => &mut self.seen_outside,
        }
    }

    pub fn pulse(&self, flag: PulseFlag) -> bool {
        match flag {
            PulseFlag::CookingSmell => self.cooking_smell.active,
            PulseFlag::DoorOpen => self.door_open.active,
            PulseFlag::SeenOutside => self.seen_outside.active,
        }
    }
}

// ── History ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub at:     GameTime,
    pub action: Action,
}

/// Serializable action state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionSnapshot {
    pub signals: Signals,
    pub history: Vec<ActionRecord>,
}

// ── ActionState ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ActionState {
    config:  ActionConfig,
    signals: Signals,
    history: VecDeque<ActionRecord>,
}

impl ActionState {
    pub fn new(config: ActionConfig) -> Self {
        let cap = config.history_cap;
        Self {
            config,
            signals: Signals::default(),
            history: VecDeque::with_capacity(cap),
        }
    }

    // ── Recording ─────────────────────────────────────────────────────────

    /// Apply one player action at game time `now`.
    ///
    /// Returns a [`PulseRequest`] for pulsed actions; the caller must hand it
    /// to the scheduler's delayed-entry queue so the flag is lowered later.
    pub fn record(&mut self, action: Action, now: GameTime) -> Option<PulseRequest> {
        let s = &mut self.signals;
        match &action {
            Action::HeatSourceOn => {
                if !s.heat_source_active {
                    s.heat_source_since = Some(now);
                }
                s.heat_source_active = true;
            }
            Action::HeatSourceOff => {
                s.heat_source_active = false;
                s.heat_source_since = None;
            }
            Action::VentilationOpened => s.ventilated = true,
            Action::VentilationClosed => s.ventilated = false,
            Action::LightOn => s.light_active = true,
            Action::LightOff => s.light_active = false,
            Action::Noise { level } => {
                let add = if level.is_finite() { level.max(0.0) } else { 0.0 };
                s.noise_level = (s.noise_level + add).clamp(0.0, self.config.noise_max);
                s.last_noise_at = Some(now);
            }
            Action::OpeningExposed => s.opening_exposed = true,
            Action::OpeningSecured => s.opening_exposed = false,
            Action::WasteDisposed => {
                s.waste_disposal_count = s.waste_disposal_count.saturating_add(1);
                s.last_waste_at = Some(now);
            }
            Action::Cooking | Action::DoorOpened | Action::WentOutside => {}
        }
        s.last_activity_at = Some(now);
        s.smoke_visible = s.heat_source_active && !s.ventilated;

        let request = action.pulse().map(|flag| {
            let pulse = s.pulse_mut(flag);
            pulse.active = true;
            pulse.generation = pulse.generation.wrapping_add(1);
            PulseRequest {
                flag,
                generation: pulse.generation,
                after: self.config.pulse_duration(flag),
            }
        });

        tracing::trace!(action = %action, at = %now, "action recorded");
        self.push_history(ActionRecord { at: now, action });
        request
    }

    /// Parse and record a named action.  Unknown names are a logged no-op so
    /// that out-of-date callers cannot break the simulation.
    pub fn record_named(
        &mut self,
        name: &str,
        intensity: Option<f32>,
        now: GameTime,
    ) -> Option<PulseRequest> {
        match Action::parse(name, intensity) {
            Some(action) => self.record(action, now),
            None => {
                tracing::debug!(action = name, "ignoring unknown action");
                None
            }
        }
    }

    /// Lower a pulsed flag if `generation` is still its latest raise.
    ///
    /// Returns `true` if the flag was lowered.
    pub fn clear_pulse(&mut self, flag: PulseFlag, generation: u32) -> bool {
        let pulse = self.signals.pulse_mut(flag);
        if pulse.active && pulse.generation == generation {
            pulse.active = false;
            true
        } else {
            false
        }
    }

    // ── Per-tick update ───────────────────────────────────────────────────

    /// Recompute derived flags and decay noise for the clock's latest step.
    pub fn tick(&mut self, clock: &Clock) {
        let s = &mut self.signals;
        s.smoke_visible = s.heat_source_active && !s.ventilated;

        if s.noise_level <= 0.0 {
            s.noise_level = 0.0;
            return;
        }
        let Some(last) = s.last_noise_at else {
            return;
        };
        let idle = Duration::from_secs(self.config.noise_idle_secs);
        let quiet_for = clock.now().since(last);
        if quiet_for <= idle {
            return;
        }
        // Only the part of this step past the idle threshold counts.
        let decaying = (quiet_for - idle).min(clock.last_step());
        let minutes = decaying.as_secs_f32() / 60.0;
        s.noise_level = (s.noise_level - self.config.noise_decay_per_minute * minutes)
            .clamp(0.0, self.config.noise_max);
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    /// `true` while the last waste disposal is within the scent window.
    pub fn waste_recent(&self, now: GameTime) -> bool {
        self.signals
            .last_waste_at
            .is_some_and(|t| now.hours_since(t) < self.config.waste_scent_hours)
    }

    /// Oldest-first action history, at most `history_cap` entries.
    pub fn history(&self) -> impl Iterator<Item = &ActionRecord> {
        self.history.iter()
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    /// Back to the all-zero state of a new simulation.
    pub fn reset(&mut self) {
        self.signals = Signals::default();
        self.history.clear();
    }

    // ── Snapshot ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> ActionSnapshot {
        ActionSnapshot {
            signals: self.signals.clone(),
            history: self.history.iter().cloned().collect(),
        }
    }

    /// Replace the state with `snap`; `noise_level` is clamped to
    /// `[0, noise_max]`.
    pub fn restore(&mut self, snap: ActionSnapshot) {
        self.signals = snap.signals;
        let noise = self.signals.noise_level;
        self.signals.noise_level = if noise.is_nan() { 0.0 } else { noise.clamp(0.0, self.config.noise_max) };
        self.history.clear();
        for record in snap.history {
            self.push_history(record);
        }
    }

    fn push_history(&mut self, record: ActionRecord) {
        if self.config.history_cap == 0 {
            return;
        }
        while self.history.len() >= self.config.history_cap {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }
}

impl Default for ActionState {
    fn default() -> Self {
        ActionState::new(ActionConfig::default())
    }
}
