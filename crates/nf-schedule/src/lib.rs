//! `nf-schedule` — event catalog, delayed-entry queue, and the scheduler.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`event`]     | `EventDefinition`, `EventKind`, `EventClass`, `Predicate`  |
//! | [`catalog`]   | `Catalog` (ordered, unique ids)                            |
//! | [`queue`]     | `DelayQueue`, `Deferred`, `ScheduledEntry`, `QueueSnapshot` |
//! | [`response`]  | `ResponseTable`, `ResponseSpec`, `Response`                |
//! | [`scheduler`] | `Scheduler`, `Outcome`, `FiredEvent`, `SchedulerSnapshot`  |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                       |
//!
//! # Time domains
//!
//! Catalog rules are keyed on game time (day, time-of-day slot, cooldowns).
//! The delayed-entry queue is keyed on wall time: game-time delays are
//! converted with the clock's current speed when an entry is queued, and
//! pulse resets are wall time to begin with.

pub mod catalog;
pub mod error;
pub mod event;
pub mod queue;
pub mod response;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use catalog::Catalog;
pub use error::{ScheduleError, ScheduleResult};
pub use event::{DelayedPhase, EventClass, EventDefinition, EventKind, Predicate};
pub use queue::{Deferred, DelayQueue, QueueSnapshot, ScheduledEntry};
pub use response::{Response, ResponseSpec, ResponseTable};
pub use scheduler::{
    DEFAULT_RANDOM_CHANCE_PER_HOUR, FIRED_LOG_CAP, FiredEvent, Outcome, Scheduler, SchedulerSnapshot,
};
