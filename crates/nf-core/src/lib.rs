//! `nf-core` — foundational types for the `rust_nightfall` simulation core.
//!
//! This crate is a dependency of every other `nf-*` crate.  It has no `nf-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`time`]   | `GameTime`, `WallTime`, `TimeOfDay`, `SpeedPreset`         |
//! | [`clock`]  | `Clock`, `ClockConfig`, `ClockTransition`, `ClockSnapshot` |
//! | [`rng`]    | `SimRng`                                                   |
//! | [`ids`]    | `EntryId`, `EventId`                                       |
//! | [`error`]  | `CoreError`, `CoreResult`                                  |

pub mod clock;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use clock::{Clock, ClockConfig, ClockSnapshot, ClockTransition};
pub use error::{CoreError, CoreResult};
pub use ids::{EntryId, EventId};
pub use rng::SimRng;
pub use time::{GameTime, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, SpeedPreset, TimeOfDay, WallTime};
