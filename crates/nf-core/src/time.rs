//! Simulation time primitives.
//!
//! # Design
//!
//! Two independent time domains run side by side:
//!
//! | Type        | Domain                                                    |
//! |-------------|-----------------------------------------------------------|
//! | `WallTime`  | real milliseconds the host has fed into `Clock::advance`  |
//! | `GameTime`  | simulated milliseconds since day 1, 00:00                 |
//!
//! Both are integer millisecond counters so that cooldown and due-time
//! comparisons are exact (no floating-point drift).  Durations in either
//! domain are plain `std::time::Duration`s; which domain a duration belongs to
//! is carried by the field name (`cooldown` is game time, `pulse` is wall
//! time, and so on).
//!
//! A third, discrete domain — day index and [`TimeOfDay`] slot — is derived
//! from `GameTime` by [`Clock`][crate::Clock].

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const MS_PER_MINUTE: u64 = 60_000;
pub const MS_PER_HOUR: u64 = 3_600_000;
/// One simulated day: 86 400 s.
pub const MS_PER_DAY: u64 = 86_400_000;

// ── GameTime ──────────────────────────────────────────────────────────────────

/// An absolute instant of simulated time, in milliseconds since day 1 00:00.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct GameTime(pub u64);

impl GameTime {
    pub const ZERO: GameTime = GameTime(0);

    /// The instant `hour:minute` on `day` (1-based).
    pub fn at(day: u32, hour: u32, minute: u32) -> GameTime {
        let day0 = day.saturating_sub(1) as u64;
        GameTime(day0 * MS_PER_DAY + hour as u64 * MS_PER_HOUR + minute as u64 * MS_PER_MINUTE)
    }

    /// 1-based day index containing this instant.
    #[inline]
    pub fn day(self) -> u32 {
        u32::try_from(self.0 / MS_PER_DAY).map_or(u32::MAX, |d| d.saturating_add(1))
    }

    /// Milliseconds elapsed since midnight of the current day.
    #[inline]
    pub fn time_of_day_ms(self) -> u64 {
        self.0 % MS_PER_DAY
    }

    #[inline]
    pub fn hour(self) -> u32 {
        (self.time_of_day_ms() / MS_PER_HOUR) as u32
    }

    #[inline]
    pub fn minute(self) -> u32 {
        ((self.time_of_day_ms() % MS_PER_HOUR) / MS_PER_MINUTE) as u32
    }

    /// Game time elapsed from `earlier` to `self`; zero if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: GameTime) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    /// Whole game hours elapsed from `earlier` to `self`.
    #[inline]
    pub fn hours_since(self, earlier: GameTime) -> u64 {
        self.0.saturating_sub(earlier.0) / MS_PER_HOUR
    }
}

impl std::ops::Add<Duration> for GameTime {
    type Output = GameTime;
    #[inline]
    fn add(self, rhs: Duration) -> GameTime {
        GameTime(self.0.saturating_add(u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX)))
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day {} {:02}:{:02}", self.day(), self.hour(), self.minute())
    }
}

// ── WallTime ──────────────────────────────────────────────────────────────────

/// Real (host) time fed into the simulation, in milliseconds since sim start.
///
/// This is *not* read from the OS clock: it only moves when the host calls
/// `Clock::advance`, so a paused or discarded simulation never fires delayed
/// entries behind the host's back.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct WallTime(pub u64);

impl WallTime {
    pub const ZERO: WallTime = WallTime(0);

    #[inline]
    pub fn since(self, earlier: WallTime) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl std::ops::Add<Duration> for WallTime {
    type Output = WallTime;
    #[inline]
    fn add(self, rhs: Duration) -> WallTime {
        WallTime(self.0.saturating_add(u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX)))
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ── TimeOfDay ─────────────────────────────────────────────────────────────────

/// Discrete time-of-day slot used to key scripted events.
///
/// | Slot        | Hours        |
/// |-------------|--------------|
/// | `Morning`   | 06:00–11:59  |
/// | `Afternoon` | 12:00–17:59  |
/// | `Evening`   | 18:00–21:59  |
/// | `Night`     | 22:00–05:59  |
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> TimeOfDay {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            18..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SpeedPreset ───────────────────────────────────────────────────────────────

/// How many simulated seconds pass per real second.
///
/// Deserializes from a preset name; unrecognized names fall back to
/// [`SpeedPreset::Normal`] rather than failing the whole config.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpeedPreset {
    /// 24× — one game day per real hour.
    Slow,
    /// 48× — one game day per 30 real minutes.
    #[default]
    Normal,
    /// 72× — one game day per 20 real minutes.
    Fast,
    /// 144× — one game day per 10 real minutes.
    VeryFast,
}

impl SpeedPreset {
    #[inline]
    pub fn multiplier(self) -> u64 {
        match self {
            SpeedPreset::Slow => 24,
            SpeedPreset::Normal => 48,
            SpeedPreset::Fast => 72,
            SpeedPreset::VeryFast => 144,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpeedPreset::Slow => "slow",
            SpeedPreset::Normal => "normal",
            SpeedPreset::Fast => "fast",
            SpeedPreset::VeryFast => "very_fast",
        }
    }

    /// Look up a preset by name, falling back to the default for unknown names.
    pub fn from_name(name: &str) -> SpeedPreset {
        match name.trim().to_ascii_lowercase().as_str() {
            "slow" => SpeedPreset::Slow,
            "normal" => SpeedPreset::Normal,
            "fast" => SpeedPreset::Fast,
            "very_fast" | "veryfast" => SpeedPreset::VeryFast,
            other => {
                tracing::debug!(preset = other, "unknown speed preset, using default");
                SpeedPreset::default()
            }
        }
    }

    /// Convert a span of game time into the real time it takes at this speed.
    ///
    /// Rounds up so a delayed entry never fires before its game-time delay.
    pub fn game_to_wall(self, game: Duration) -> Duration {
        let ms = (game.as_millis() as u64).div_ceil(self.multiplier());
        Duration::from_millis(ms)
    }
}

impl From<String> for SpeedPreset {
    fn from(name: String) -> Self {
        SpeedPreset::from_name(&name)
    }
}

impl From<SpeedPreset> for String {
    fn from(preset: SpeedPreset) -> Self {
        preset.as_str().to_owned()
    }
}
