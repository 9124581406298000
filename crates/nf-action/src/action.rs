//! The closed set of trackable player actions.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One tracked player action.
///
/// Callers outside the core report actions through
/// [`ActionState::record`][crate::ActionState::record].  String names coming
/// from scripts or UI bindings go through [`Action::parse`], which returns
/// `None` for names this build does not know.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    HeatSourceOn,
    HeatSourceOff,
    VentilationOpened,
    VentilationClosed,
    LightOn,
    LightOff,
    /// A noise-producing action (chopping, hammering, …).  `level` is added to
    /// the current noise level.
    Noise { level: f32 },
    OpeningExposed,
    OpeningSecured,
    WasteDisposed,
    /// Pulsed: the smell lingers for a short while.
    Cooking,
    /// Pulsed: the door swings shut on its own.
    DoorOpened,
    /// Pulsed: the player is briefly visible outside.
    WentOutside,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::HeatSourceOn => "heat_source_on",
            Action::HeatSourceOff => "heat_source_off",
            Action::VentilationOpened => "ventilation_opened",
            Action::VentilationClosed => "ventilation_closed",
            Action::LightOn => "light_on",
            Action::LightOff => "light_off",
            Action::Noise { .. } => "noise",
            Action::OpeningExposed => "opening_exposed",
            Action::OpeningSecured => "opening_secured",
            Action::WasteDisposed => "waste_disposed",
            Action::Cooking => "cooking",
            Action::DoorOpened => "door_opened",
            Action::WentOutside => "went_outside",
        }
    }

    /// Parse an action name.  `intensity` is only used by `noise`
    /// (default 10).
    pub fn parse(name: &str, intensity: Option<f32>) -> Option<Action> {
        let action = match name.trim() {
            "heat_source_on" | "fire_lit" => Action::HeatSourceOn,
            "heat_source_off" | "fire_out" => Action::HeatSourceOff,
            "ventilation_opened" => Action::VentilationOpened,
            "ventilation_closed" => Action::VentilationClosed,
            "light_on" => Action::LightOn,
            "light_off" => Action::LightOff,
            "noise" => Action::Noise { level: intensity.unwrap_or(10.0) },
            "opening_exposed" => Action::OpeningExposed,
            "opening_secured" => Action::OpeningSecured,
            "waste_disposed" => Action::WasteDisposed,
            "cooking" => Action::Cooking,
            "door_opened" => Action::DoorOpened,
            "went_outside" => Action::WentOutside,
            _ => return None,
        };
        Some(action)
    }

    /// The pulsed flag this action raises, if any.
    pub fn pulse(&self) -> Option<PulseFlag> {
        match self {
            Action::Cooking => Some(PulseFlag::CookingSmell),
            Action::DoorOpened => Some(PulseFlag::DoorOpen),
            Action::WentOutside => Some(PulseFlag::SeenOutside),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Noise { level } => write!(f, "noise({level})"),
            other => f.write_str(other.name()),
        }
    }
}

// ── Pulses ────────────────────────────────────────────────────────────────────

/// A flag that is raised by an action and automatically lowered after a fixed
/// wall-clock duration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseFlag {
    CookingSmell,
    DoorOpen,
    SeenOutside,
}

/// Ask the scheduler to lower `flag` after `after` of wall time.
///
/// The reset is tied to `generation`: if the flag is raised again before the
/// reset fires, the stale reset is ignored and only the newest one lowers it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PulseRequest {
    pub flag:       PulseFlag,
    pub generation: u32,
    pub after:      Duration,
}
