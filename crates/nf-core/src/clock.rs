//! The game clock: wall time in, day index and time-of-day out.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::time::{GameTime, MS_PER_DAY, MS_PER_HOUR, SpeedPreset, TimeOfDay, WallTime};

// ── ClockConfig ───────────────────────────────────────────────────────────────

/// Construction-time clock settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Speed preset.  Unknown names in config files fall back to `normal`.
    pub speed: SpeedPreset,

    /// Hour of day 1 at which the run starts.  Default: 8 (08:00).
    pub start_hour: u32,

    /// First hour of the night window.  Default: 18.
    pub night_start_hour: u32,

    /// First hour after the night window.  Default: 6.
    pub night_end_hour: u32,

    /// The run is survived once this many days have fully elapsed.
    /// `None` runs forever.
    pub max_days: Option<u32>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            speed:            SpeedPreset::Normal,
            start_hour:       8,
            night_start_hour: 18,
            night_end_hour:   6,
            max_days:         None,
        }
    }
}

impl ClockConfig {
    /// Reject hours outside `0..24` and an empty night window.
    pub fn validate(&self) -> CoreResult<()> {
        for (name, hour) in [
            ("start_hour", self.start_hour),
            ("night_start_hour", self.night_start_hour),
            ("night_end_hour", self.night_end_hour),
        ] {
            if hour >= 24 {
                return Err(CoreError::Config(format!("{name} must be < 24, got {hour}")));
            }
        }
        if self.night_start_hour == self.night_end_hour {
            return Err(CoreError::Config("night window is empty".into()));
        }
        if self.max_days == Some(0) {
            return Err(CoreError::Config("max_days must be at least 1".into()));
        }
        Ok(())
    }
}

// ── ClockTransition ───────────────────────────────────────────────────────────

/// Boundaries crossed by one call to [`Clock::advance`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClockTransition {
    /// A new day began (possibly several, for very large steps).
    pub day_started: bool,
    pub nightfall:   bool,
    pub dawn:        bool,
}

// ── ClockSnapshot ─────────────────────────────────────────────────────────────

/// Serializable clock state.  `Clock::restore(clock.snapshot())` is a no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub game_ms:  u64,
    pub wall_ms:  u64,
    pub speed:    SpeedPreset,
    pub paused:   bool,
    /// Sub-millisecond real time not yet applied.
    pub carry_ms: f64,
}

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Converts real elapsed time into simulated time at a configurable speed.
///
/// The clock counts game time as one absolute `GameTime`; the day index and
/// time of day are derived from it, so the day counter can never disagree
/// with the time of day.
#[derive(Clone, Debug)]
pub struct Clock {
    config:    ClockConfig,
    now:       GameTime,
    wall:      WallTime,
    speed:     SpeedPreset,
    paused:    bool,
    carry_ms:  f64,
    /// Game time covered by the most recent `advance`.
    last_step: Duration,
}

impl Clock {
    pub fn new(config: ClockConfig) -> Self {
        let start_hour = config.start_hour.min(23);
        Self {
            now:       GameTime::at(1, start_hour, 0),
            wall:      WallTime::ZERO,
            speed:     config.speed,
            paused:    false,
            carry_ms:  0.0,
            last_step: Duration::ZERO,
            config,
        }
    }

    // ── Advancing ─────────────────────────────────────────────────────────

    /// Advance by `real_dt_secs` of host time.
    ///
    /// Non-finite or negative deltas are ignored.  Fractions of a millisecond
    /// are carried into the next call.
    pub fn advance(&mut self, real_dt_secs: f64) -> ClockTransition {
        if !real_dt_secs.is_finite() || real_dt_secs <= 0.0 {
            self.last_step = Duration::ZERO;
            return ClockTransition::default();
        }
        let total = self.carry_ms + real_dt_secs * 1_000.0;
        let whole = total.floor();
        self.carry_ms = total - whole;
        self.advance_ms(whole as u64)
    }

    /// Advance by a whole number of real milliseconds.
    ///
    /// A paused clock moves neither wall nor game time.
    pub fn advance_ms(&mut self, real_ms: u64) -> ClockTransition {
        if self.paused || real_ms == 0 {
            self.last_step = Duration::ZERO;
            return ClockTransition::default();
        }
        let was_night = self.is_night();
        let old_day = self.now.day();

        let game_ms = real_ms.saturating_mul(self.speed.multiplier());
        self.wall = WallTime(self.wall.0.saturating_add(real_ms));
        self.now = GameTime(self.now.0.saturating_add(game_ms));
        self.last_step = Duration::from_millis(game_ms);

        let night = self.is_night();
        ClockTransition {
            day_started: self.now.day() > old_day,
            nightfall:   !was_night && night,
            dawn:        was_night && !night,
        }
    }

    // ── Control ───────────────────────────────────────────────────────────

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_speed(&mut self, speed: SpeedPreset) {
        self.speed = speed;
    }

    pub fn speed(&self) -> SpeedPreset {
        self.speed
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Current absolute game time.
    #[inline]
    pub fn now(&self) -> GameTime {
        self.now
    }

    /// Current wall time (real milliseconds fed in so far).
    #[inline]
    pub fn wall(&self) -> WallTime {
        self.wall
    }

    /// 1-based day index.  Unbounded; see [`ClockConfig::max_days`].
    #[inline]
    pub fn day(&self) -> u32 {
        self.now.day()
    }

    #[inline]
    pub fn hour(&self) -> u32 {
        self.now.hour()
    }

    /// Seconds since midnight of the current day, in `[0, 86 400)`.
    pub fn seconds_into_day(&self) -> u64 {
        (self.now.0 % MS_PER_DAY) / 1_000
    }

    /// `true` inside the configured night window (default 18:00–06:00).
    pub fn is_night(&self) -> bool {
        let h = self.hour();
        let (start, end) = (self.config.night_start_hour, self.config.night_end_hour);
        if start > end {
            h >= start || h < end
        } else {
            h >= start && h < end
        }
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.hour())
    }

    /// Game time covered by the most recent `advance` call.
    pub fn last_step(&self) -> Duration {
        self.last_step
    }

    /// Game hours covered by the most recent `advance` call.
    pub fn last_step_hours(&self) -> f64 {
        self.last_step.as_millis() as f64 / MS_PER_HOUR as f64
    }

    /// Real time it takes for `game` to elapse at the current speed.
    pub fn game_to_wall(&self, game: Duration) -> Duration {
        self.speed.game_to_wall(game)
    }

    /// `true` once `max_days` full days have elapsed.
    pub fn run_complete(&self) -> bool {
        match self.config.max_days {
            Some(max) => self.day() > max,
            None => false,
        }
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    /// `HH:MM` of the current time of day.
    pub fn hh_mm(&self) -> String {
        format!("{:02}:{:02}", self.now.hour(), self.now.minute())
    }

    // ── Snapshot ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            game_ms:  self.now.0,
            wall_ms:  self.wall.0,
            speed:    self.speed,
            paused:   self.paused,
            carry_ms: self.carry_ms,
        }
    }

    pub fn restore(&mut self, snap: ClockSnapshot) {
        self.now = GameTime(snap.game_ms);
        self.wall = WallTime(snap.wall_ms);
        self.speed = snap.speed;
        self.paused = snap.paused;
        self.carry_ms = snap.carry_ms;
        self.last_step = Duration::ZERO;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::new(ClockConfig::default())
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.now, self.time_of_day())
    }
}
