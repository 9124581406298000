//! `nf-threat` — turns player activity into a bounded threat score and
//! escalates it through cooldown-gated thresholds.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`score`]     | `score()`, `ScoringWeights`, `ScoreBreakdown`, `Contribution` |
//! | [`threat`]    | `ThreatScore`, `ThreatConfig`, `ThreatSnapshot`, `ThreatView` |
//! | [`threshold`] | `ThresholdSpec`, `TriggerRequest`, `default_thresholds`   |
//! | [`level`]     | `ThreatLevel`, `LevelBounds`                              |
//! | [`loader`]    | `load_thresholds_csv`, `load_thresholds_reader`           |
//! | [`error`]     | `ThreatError`, `ThreatResult<T>`                          |
//!
//! # Per-tick use
//!
//! ```text
//! threat.recompute(&actions, &clock);                  // score + decay
//! if let Some(req) = threat.check_thresholds(now, rng) // ≤ 1 per tick
//!     { scheduler.handle_trigger(req, …) }
//! ```
//!
//! `ThreatScore` only decides; it never applies an effect.  Trigger requests
//! are consumed by the scheduler.

pub mod error;
pub mod level;
pub mod loader;
pub mod score;
pub mod threat;
pub mod threshold;


pub use error::{ThreatError, ThreatResult};
pub use level::{LevelBounds, ThreatLevel};
pub use loader::{load_thresholds_csv, load_thresholds_reader};
pub use score::{Contribution, ScoreBreakdown, ScoringWeights, score};
pub use threat::{ThreatConfig, ThreatScore, ThreatSnapshot, ThreatView};
pub use threshold::{ThresholdSpec, TriggerRequest, default_thresholds};
